//! Tokenizer for the source language (spec §4.1).
//!
//! [`lex`] turns a source string into a flat token stream. On a malformed
//! literal or comment it stops at that point: `partial` holds every token
//! scanned up to the error boundary and nothing past it, so a caller (the
//! parser included) never sees a token built from text the lexer couldn't
//! make sense of.

pub mod comment;
pub mod cursor;
pub mod error;
pub mod identifier;
pub mod number;
pub mod operator;
pub mod string;
pub mod token;

use cursor::Cursor;
use error::LexError;
use mlfmt_util::{Pos, Span, Symbol};
use token::{CommentToken, Keyword, Token, TokenKind};

/// The outcome of lexing a source buffer. Mirrors the parser's result shape
/// (spec §4.6): lexing never fully "fails" in the sense of producing
/// nothing, but it does distinguish a clean run from one that recorded
/// diagnostics.
#[derive(Debug)]
pub enum LexResult {
    Success(Vec<Token>),
    Failure { partial: Vec<Token>, error: LexError },
}

impl LexResult {
    pub fn tokens(&self) -> &[Token] {
        match self {
            LexResult::Success(tokens) => tokens,
            LexResult::Failure { partial, .. } => partial,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LexResult::Success(_))
    }
}

/// Tokenizes `source`, tracking `line`/`column` as if `source` were one file
/// (callers stamp the real [`mlfmt_util::SourceId`] in afterward via
/// [`Span`] rewriting, since the lexer itself never opens a [`mlfmt_util::SourceMap`]).
#[tracing::instrument(level = "debug", skip(source), fields(len = source.len()))]
pub fn lex(source: &str) -> LexResult {
    let mut lexer = Lexer::new(source);
    lexer.run();
    match lexer.error {
        None => {
            tracing::debug!(tokens = lexer.tokens.len(), "lex succeeded");
            LexResult::Success(lexer.tokens)
        }
        Some(error) => {
            tracing::debug!(tokens = lexer.tokens.len(), %error, "lex stopped at an error");
            LexResult::Failure { partial: lexer.tokens, error }
        }
    }
}

struct Lexer<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
    error: Option<LexError>,
    pending_comments: Vec<CommentToken>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source), tokens: Vec::new(), error: None, pending_comments: Vec::new() }
    }

    fn pos(&self) -> Pos {
        Pos { offset: self.cursor.position() as u32, line: self.cursor.line(), column: self.cursor.column(), ..Default::default() }
    }

    fn run(&mut self) {
        loop {
            self.skip_whitespace();
            if self.cursor.starts_with("(*") {
                self.scan_comment();
                if self.error.is_some() {
                    break;
                }
                continue;
            }
            if self.cursor.is_at_end() {
                break;
            }
            self.scan_token();
            if self.error.is_some() {
                break;
            }
        }
        let eof_pos = self.pos();
        self.push_token(TokenKind::Eof, Span::new(eof_pos, eof_pos));
    }

    fn skip_whitespace(&mut self) {
        while self.cursor.current().is_whitespace() {
            self.cursor.advance();
        }
    }

    fn scan_comment(&mut self) {
        let start = self.pos();
        let start_offset = self.cursor.position();
        self.cursor.advance();
        self.cursor.advance();
        match comment::scan_block_comment(&mut self.cursor) {
            Ok(()) => {
                let text = self.cursor.slice_from(start_offset);
                self.pending_comments.push(CommentToken { text: Symbol::intern(text), span: Span::new(start, self.pos()) });
            }
            Err(err) => {
                self.error = Some(err);
            }
        }
    }

    fn scan_token(&mut self) {
        let start = self.pos();
        let start_offset = self.cursor.position();
        let c = self.cursor.current();

        let result: Result<TokenKind, LexError> = if identifier::is_ident_start(c) {
            self.cursor.advance();
            identifier::scan_ident(&mut self.cursor);
            let text = self.cursor.slice_from(start_offset);
            Ok(identifier::classify_word(text))
        } else if c == '\'' {
            self.cursor.advance();
            Ok(identifier::scan_tyvar(&mut self.cursor))
        } else if c.is_ascii_digit() || (c == '~' && self.cursor.peek(1).is_ascii_digit()) {
            number::scan_number(&mut self.cursor, start_offset)
        } else if c == '"' {
            self.cursor.advance();
            string::scan_string(&mut self.cursor)
        } else if c == '#' && self.cursor.peek(1) == '"' {
            self.cursor.advance();
            self.cursor.advance();
            string::scan_char(&mut self.cursor)
        } else if let Some(kw) = operator::scan_punctuation(&mut self.cursor) {
            Ok(TokenKind::Keyword(kw))
        } else if operator::is_symbolic(c) {
            self.cursor.advance();
            operator::scan_symbolic(&mut self.cursor);
            let text = self.cursor.slice_from(start_offset);
            Ok(operator::classify_symbolic(text))
        } else {
            self.cursor.advance();
            Err(LexError::IllegalCharacter { span: Span::new(start, self.pos()) })
        };

        match result {
            Ok(kind) => {
                let text = self.cursor.slice_from(start_offset);
                let span = Span::new(start, self.pos());
                self.push_token_with_text(kind, text, span);
            }
            Err(err) => {
                self.error = Some(err);
            }
        }
    }

    fn push_token_with_text(&mut self, kind: TokenKind, text: &str, span: Span) {
        let leading_comments = std::mem::take(&mut self.pending_comments);
        self.tokens.push(Token { kind, text: Symbol::intern(text), span, leading_comments });
    }

    fn push_token(&mut self, kind: TokenKind, span: Span) {
        self.push_token_with_text(kind, "", span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        match lex(src) {
            LexResult::Success(tokens) => tokens.into_iter().map(|t| t.kind).collect(),
            LexResult::Failure { partial, .. } => partial.into_iter().map(|t| t.kind).collect(),
        }
    }

    #[test]
    fn lexes_val_binding() {
        let ks = kinds("val x = 1");
        assert_eq!(
            ks,
            vec![
                TokenKind::Keyword(Keyword::Val),
                TokenKind::Ident,
                TokenKind::Keyword(Keyword::Equals),
                TokenKind::IntLit,
                TokenKind::Eof,
            ]
        );
    }
}
