//! Alphanumeric identifiers, reserved words, and type variables.

use crate::cursor::Cursor;
use crate::token::{Keyword, TokenKind};

pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '\''
}

/// Consumes `[a-zA-Z0-9_']*` after the leading letter has already been
/// advanced past by the caller.
pub fn scan_ident(cursor: &mut Cursor<'_>) {
    while is_ident_continue(cursor.current()) {
        cursor.advance();
    }
}

/// Classifies an already-scanned identifier-shaped slice as a reserved word
/// or a plain identifier.
pub fn classify_word(text: &str) -> TokenKind {
    match Keyword::lookup_word(text) {
        Some(kw) => TokenKind::Keyword(kw),
        None => TokenKind::Ident,
    }
}

/// Scans a type variable: `'` followed by an identifier-continue run
/// (equality type variables double the leading quote, e.g. `''a`, which
/// this just folds into the same continue-run scan).
pub fn scan_tyvar(cursor: &mut Cursor<'_>) -> TokenKind {
    while cursor.current() == '\'' || is_ident_continue(cursor.current()) {
        cursor.advance();
    }
    TokenKind::TyVar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_word_wins_over_ident() {
        let mut c = Cursor::new("let x");
        let start = c.position();
        c.advance();
        scan_ident(&mut c);
        let text = c.slice_from(start);
        assert_eq!(classify_word(text), TokenKind::Keyword(Keyword::Let));
        assert_eq!(text, "let");
    }

    #[test]
    fn plain_ident_keeps_trailing_primes() {
        let mut c = Cursor::new("foo'bar");
        let start = c.position();
        c.advance();
        scan_ident(&mut c);
        let text = c.slice_from(start);
        assert_eq!(classify_word(text), TokenKind::Ident);
        assert_eq!(text, "foo'bar");
    }
}
