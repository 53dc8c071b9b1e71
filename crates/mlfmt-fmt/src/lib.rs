//! The syntax-to-document translator: turns a parsed compilation unit
//! into a [`mlfmt_doc::Doc`] and renders it (spec §4.5).
//!
//! Formatting itself never fails — given whatever partial tree the lexer
//! and parser managed to build, this crate always produces *some* text —
//! but lex/parse problems are surfaced alongside it as [`Diagnostic`]s so
//! a caller can still report them.

mod common;
mod dec;
mod exp;
mod module;
mod pat;
mod ty;

use mlfmt_doc::Options;
use mlfmt_lex::LexResult;
use mlfmt_parse::ParseResult;
use mlfmt_util::Diagnostic;

/// The result of formatting one compilation unit: the reformatted text,
/// plus every lexical/syntactic problem encountered along the way.
#[derive(Debug)]
pub struct FormatResult {
    pub formatted: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lexes, parses, and reformats `source` under `opts`.
#[tracing::instrument(level = "debug", skip(source, opts), fields(len = source.len()))]
pub fn format_source(source: &str, opts: &Options) -> FormatResult {
    let lex_result = mlfmt_lex::lex(source);
    let mut diagnostics: Vec<Diagnostic> = match &lex_result {
        LexResult::Success(_) => Vec::new(),
        LexResult::Failure { error, .. } => vec![lex_diagnostic(error)],
    };
    // `tokens()` is `partial` on failure, which the lexer already stopped
    // at the error boundary, so the parser never sees tokens built from
    // text past the point lexing gave up.
    let tokens = lex_result.tokens().to_vec();

    let parse_result = mlfmt_parse::parse(tokens);
    let ast = match parse_result {
        ParseResult::Success(ast) => Some(ast),
        ParseResult::Failure { partial, errors } => {
            diagnostics.extend(errors.iter().map(parse_diagnostic));
            partial
        }
    };

    let formatted = match &ast {
        Some(ast) => mlfmt_doc::render(&module::ast(ast), opts),
        None => source.to_string(),
    };

    tracing::debug!(diagnostic_count = diagnostics.len(), "formatted source");
    FormatResult { formatted, diagnostics }
}

/// Lexes and reformats already-lexed `tokens` (used by callers, like the
/// MLB path walker, that have their own notion of "one file" distinct
/// from "one lex+parse pass").
pub fn format_tokens(tokens: Vec<mlfmt_lex::token::Token>, opts: &Options) -> FormatResult {
    let parse_result = mlfmt_parse::parse(tokens);
    let mut diagnostics = Vec::new();
    let ast = match parse_result {
        ParseResult::Success(ast) => Some(ast),
        ParseResult::Failure { partial, errors } => {
            diagnostics.extend(errors.iter().map(parse_diagnostic));
            partial
        }
    };
    let formatted = ast.as_ref().map(|a| mlfmt_doc::render(&module::ast(a), opts)).unwrap_or_default();
    FormatResult { formatted, diagnostics }
}

fn lex_diagnostic(e: &mlfmt_lex::error::LexError) -> Diagnostic {
    Diagnostic { span: e.span(), what: e.to_string(), explain: None }
}

fn parse_diagnostic(e: &mlfmt_parse::error::ParseError) -> Diagnostic {
    Diagnostic { span: e.span(), what: e.to_string(), explain: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(src: &str) -> String {
        format_source(src, &Options::default()).formatted
    }

    #[test]
    fn reformats_a_simple_val_binding() {
        let out = fmt("val   x   =   1");
        assert_eq!(out, "val x = 1");
    }

    #[test]
    fn reformats_fun_with_multiple_clauses() {
        let out = fmt("fun f 0 = 1 | f n = n * f (n - 1)");
        assert!(out.contains("fun f 0 = 1"));
        assert!(out.contains("| f n = n * f (n - 1)"));
    }

    #[test]
    fn preserves_block_comments() {
        let out = fmt("(* hello *) val x = 1");
        assert!(out.contains("(* hello *)"));
        assert!(out.contains("val x = 1"));
    }

    #[test]
    fn reports_lex_errors_without_losing_the_rest_of_the_file() {
        let result = format_source("val x = 1 \" unterminated", &Options::default());
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn respects_user_declared_infix_in_output() {
        let out = fmt("infix 6 +++ fun f x y = x +++ y");
        assert!(out.contains("x +++ y"));
    }

    #[test]
    fn preserves_long_identifiers() {
        let out = fmt("val x = Foo.Bar.baz");
        assert!(out.contains("Foo.Bar.baz"));
    }

    #[test]
    fn preserves_a_comment_attached_to_a_record_pattern_comma() {
        let out = fmt("fun f {a = x (* keep *), b = y} = x");
        assert!(out.contains("(* keep *)"), "{out}");
    }
}
