//! Parse-time error conditions (spec §7).

use mlfmt_util::Span;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String, span: Span },

    #[error("expected {what}")]
    ExpectedProduction { what: String, span: Span },

    #[error("ambiguous mix of operators at equal precedence with conflicting associativity")]
    UnbalancedFixity { span: Span },

    #[error("function clauses for `{name}` disagree on the number of arguments")]
    FunClauseArityMismatch { name: String, span: Span },

    #[error("function clause name `{found}` does not match the name `{expected}` of the preceding clause")]
    FunClauseNameMismatch { expected: String, found: String, span: Span },

    #[error("a lexical error prevented parsing from continuing")]
    LexFailure { span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::ExpectedProduction { span, .. }
            | ParseError::UnbalancedFixity { span, .. }
            | ParseError::FunClauseArityMismatch { span, .. }
            | ParseError::FunClauseNameMismatch { span, .. }
            | ParseError::LexFailure { span, .. } => *span,
        }
    }
}

pub type ParseErrorResult<T> = std::result::Result<T, ParseError>;
