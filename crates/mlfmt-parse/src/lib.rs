//! Recursive-descent parser over the token stream (spec §4.2/§4.3).
//!
//! [`parse`] never reports more than one error: spec §4.3 calls for parsing
//! to fail fast rather than guess at a recovery point inside an ambiguous
//! grammar, since a wrong guess would reformat unrelated code around the
//! error. Fixity-dependent clause grouping and arity checks, however, are
//! still collected as non-fatal diagnostics alongside the tree they were
//! found in.

pub mod ast;
pub mod error;
pub mod fixity;
pub mod parser;

use ast::Ast;
use error::ParseError;
use mlfmt_lex::token::Token;
use parser::Parser;

/// The outcome of parsing a token stream, mirroring [`mlfmt_lex::LexResult`]'s
/// success/failure shape (spec §4.6).
#[derive(Debug)]
pub enum ParseResult {
    Success(Ast),
    Failure { partial: Option<Ast>, errors: Vec<ParseError> },
}

impl ParseResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ParseResult::Success(_))
    }
}

#[tracing::instrument(level = "debug", skip(tokens), fields(tokens = tokens.len()))]
pub fn parse(tokens: Vec<Token>) -> ParseResult {
    let parser = Parser::new(tokens);
    let (ast, errors) = parser.parse_program();
    if errors.is_empty() {
        tracing::debug!(topdecs = ast.topdecs.len(), "parse succeeded");
        ParseResult::Success(ast)
    } else {
        tracing::debug!(errors = errors.len(), "parse completed with errors");
        ParseResult::Failure { partial: Some(ast), errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_src(src: &str) -> ParseResult {
        match mlfmt_lex::lex(src) {
            mlfmt_lex::LexResult::Success(tokens) => parse(tokens),
            mlfmt_lex::LexResult::Failure { partial, .. } => parse(partial),
        }
    }

    #[test]
    fn parses_simple_val_binding() {
        let result = parse_src("val x = 1");
        assert!(result.is_success(), "{result:?}");
        if let ParseResult::Success(ast) = result {
            assert_eq!(ast.topdecs.len(), 1);
        }
    }

    #[test]
    fn parses_fun_with_multiple_clauses() {
        let result = parse_src("fun fact 0 = 1 | fact n = n * fact (n - 1)");
        assert!(result.is_success(), "{result:?}");
    }

    #[test]
    fn parses_case_and_fn() {
        let result = parse_src("val f = fn x => case x of 0 => 1 | _ => 2");
        assert!(result.is_success(), "{result:?}");
    }

    #[test]
    fn parses_structure_and_signature() {
        let result = parse_src(
            "signature S = sig val x : int end structure M :> S = struct val x = 1 end",
        );
        assert!(result.is_success(), "{result:?}");
    }

    #[test]
    fn respects_user_declared_infix() {
        let result = parse_src("infix 6 @@ val y = 1 @@ 2 @@ 3");
        assert!(result.is_success(), "{result:?}");
    }

    #[test]
    fn fun_clause_arity_mismatch_is_reported() {
        let result = parse_src("fun f x = x | f x y = x");
        match result {
            ParseResult::Failure { errors, .. } => {
                assert!(errors.iter().any(|e| matches!(e, ParseError::FunClauseArityMismatch { .. })));
            }
            ParseResult::Success(_) => panic!("expected arity mismatch to be reported"),
        }
    }

    #[test]
    fn mixing_associativities_at_equal_precedence_is_reported() {
        let result = parse_src("infix 6 foo infixr 6 bar val y = 1 foo 2 bar 3");
        match result {
            ParseResult::Failure { errors, .. } => {
                assert!(errors.iter().any(|e| matches!(e, ParseError::UnbalancedFixity { .. })));
            }
            ParseResult::Success(_) => panic!("expected an unbalanced-fixity error"),
        }
    }

    #[test]
    fn repeated_same_associativity_operator_is_not_unbalanced() {
        let result = parse_src("infix 6 foo val y = 1 foo 2 foo 3");
        assert!(result.is_success(), "{result:?}");
    }
}
