//! Lex-time error conditions (spec §7).

use mlfmt_util::Span;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated block comment")]
    UnterminatedComment { span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("invalid escape sequence")]
    InvalidEscape { span: Span },

    #[error("invalid numeric literal")]
    InvalidNumber { span: Span },

    #[error("unterminated character literal")]
    UnterminatedChar { span: Span },

    #[error("character literal must contain exactly one character")]
    BadCharLiteral { span: Span },

    #[error("illegal character")]
    IllegalCharacter { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedComment { span }
            | LexError::UnterminatedString { span }
            | LexError::InvalidEscape { span }
            | LexError::InvalidNumber { span }
            | LexError::UnterminatedChar { span }
            | LexError::BadCharLiteral { span }
            | LexError::IllegalCharacter { span } => *span,
        }
    }
}

pub type LexErrorResult<T> = std::result::Result<T, LexError>;
