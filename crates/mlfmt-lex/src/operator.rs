//! Symbolic identifiers and reserved symbols.
//!
//! The symbolic character class (spec §4.1): `! % & $ # + - / : < = > ? @ \
//! ~ ^ | *`. `.` is deliberately excluded — it is its own single-character
//! reserved token so the parser can recognize long identifiers by combining
//! `Ident (Dot Ident)*` sequences itself, rather than the lexer gluing
//! qualifiers together. `...` is likewise its own reserved 3-character token
//! (flexible record-pattern rows), never part of a symbolic run.

use crate::cursor::Cursor;
use crate::token::{Keyword, TokenKind};

pub fn is_symbolic(c: char) -> bool {
    matches!(
        c,
        '!' | '%' | '&' | '$' | '#' | '+' | '-' | '/' | ':' | '<' | '=' | '>' | '?' | '@' | '\\' | '~' | '^' | '|' | '*'
    )
}

/// Consumes a maximal run of symbolic characters after the leading one has
/// already been advanced past by the caller.
pub fn scan_symbolic(cursor: &mut Cursor<'_>) {
    while is_symbolic(cursor.current()) {
        cursor.advance();
    }
}

/// Classifies an already-scanned symbolic run as a reserved symbol or a
/// plain symbolic identifier.
pub fn classify_symbolic(text: &str) -> TokenKind {
    match Keyword::lookup_symbol(text) {
        Some(kw) => TokenKind::Keyword(kw),
        None => TokenKind::SymbolicIdent,
    }
}

/// Single-character reserved punctuation outside the symbolic class: the
/// parens/brackets/braces, comma, semicolon, dot, and ellipsis.
pub fn scan_punctuation(cursor: &mut Cursor<'_>) -> Option<Keyword> {
    if cursor.starts_with("...") {
        cursor.advance();
        cursor.advance();
        cursor.advance();
        return Some(Keyword::Ellipsis);
    }
    let kw = match cursor.current() {
        '(' => Keyword::LParen,
        ')' => Keyword::RParen,
        '[' => Keyword::LBracket,
        ']' => Keyword::RBracket,
        '{' => Keyword::LBrace,
        '}' => Keyword::RBrace,
        ',' => Keyword::Comma,
        ';' => Keyword::Semicolon,
        '.' => Keyword::Dot,
        _ => return None,
    };
    cursor.advance();
    Some(kw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_is_reserved() {
        assert_eq!(classify_symbolic("*"), TokenKind::Keyword(Keyword::Star));
    }

    #[test]
    fn double_star_is_symbolic_ident() {
        assert_eq!(classify_symbolic("**"), TokenKind::SymbolicIdent);
    }

    #[test]
    fn dot_is_not_symbolic() {
        assert!(!is_symbolic('.'));
    }

    #[test]
    fn ellipsis_wins_over_dot() {
        let mut c = Cursor::new("...x");
        let start = c.position();
        let kw = scan_punctuation(&mut c).unwrap();
        assert_eq!(kw, Keyword::Ellipsis);
        assert_eq!(c.slice_from(start), "...");
    }

    #[test]
    fn single_dot() {
        let mut c = Cursor::new(".x");
        let kw = scan_punctuation(&mut c).unwrap();
        assert_eq!(kw, Keyword::Dot);
    }
}
