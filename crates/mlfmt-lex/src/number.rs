//! Numeric literals: decimal/hex integers, word literals, reals.
//!
//! Grammar (spec §4.1):
//!   int  ::= ~? [0-9]+ | ~? 0x [0-9a-fA-F]+
//!   word ::= 0w [0-9]+ | 0wx [0-9a-fA-F]+
//!   real ::= ~? [0-9]+ . [0-9]+ ([eE] ~? [0-9]+)?
//!          | ~? [0-9]+ [eE] ~? [0-9]+
//!
//! `~` is the language's negative sign, not a separate operator token, so a
//! leading `~` is folded into the literal whenever followed by a digit.

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::token::TokenKind;

fn digits(cursor: &mut Cursor<'_>, radix_hex: bool) {
    loop {
        let c = cursor.current();
        let ok = if radix_hex { c.is_ascii_hexdigit() } else { c.is_ascii_digit() };
        if !ok {
            break;
        }
        cursor.advance();
    }
}

/// Scans a numeric literal starting at the current position (which must be
/// `~` or an ASCII digit). Returns the token kind, or a `LexError` for a
/// malformed literal such as a bare `0x` with no hex digits.
pub fn scan_number(cursor: &mut Cursor<'_>, start: usize) -> Result<TokenKind, LexError> {
    if cursor.current() == '~' {
        cursor.advance();
    }

    if cursor.current() == '0' && (cursor.peek(1) == 'w') {
        cursor.advance();
        cursor.advance();
        if cursor.current() == 'x' {
            cursor.advance();
            let digit_start = cursor.position();
            digits(cursor, true);
            if cursor.position() == digit_start {
                return Err(bad_number(cursor, start));
            }
        } else {
            let digit_start = cursor.position();
            digits(cursor, false);
            if cursor.position() == digit_start {
                return Err(bad_number(cursor, start));
            }
        }
        return Ok(TokenKind::WordLit);
    }

    if cursor.current() == '0' && cursor.peek(1) == 'x' {
        cursor.advance();
        cursor.advance();
        let digit_start = cursor.position();
        digits(cursor, true);
        if cursor.position() == digit_start {
            return Err(bad_number(cursor, start));
        }
        return Ok(TokenKind::IntLit);
    }

    let int_start = cursor.position();
    digits(cursor, false);
    if cursor.position() == int_start {
        return Err(bad_number(cursor, start));
    }

    let mut is_real = false;
    if cursor.current() == '.' && cursor.peek(1).is_ascii_digit() {
        is_real = true;
        cursor.advance();
        digits(cursor, false);
    }

    if cursor.current() == 'e' || cursor.current() == 'E' {
        let mark = cursor.position();
        let (mark_line, mark_col) = (cursor.line(), cursor.column());
        cursor.advance();
        if cursor.current() == '~' {
            cursor.advance();
        }
        let exp_start = cursor.position();
        digits(cursor, false);
        if cursor.position() == exp_start {
            // No exponent digits: the `e`/`E` wasn't part of the literal after
            // all. SML tolerates this ambiguity by treating the exponent as
            // absent only when it is itself followed by more digits; here
            // there plainly are none, so the literal is malformed.
            let _ = (mark_line, mark_col);
            return Err(bad_number(cursor, mark));
        }
        is_real = true;
    }

    Ok(if is_real { TokenKind::RealLit } else { TokenKind::IntLit })
}

fn bad_number(cursor: &Cursor<'_>, start: usize) -> LexError {
    let _ = start;
    let pos = cursor.position();
    LexError::InvalidNumber {
        span: mlfmt_util::Span::new(
            mlfmt_util::Pos { offset: pos as u32, line: cursor.line(), column: cursor.column(), ..Default::default() },
            mlfmt_util::Pos { offset: pos as u32, line: cursor.line(), column: cursor.column(), ..Default::default() },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(src: &str) -> TokenKind {
        let mut c = Cursor::new(src);
        scan_number(&mut c, 0).unwrap()
    }

    #[test]
    fn plain_int() {
        assert_eq!(lit("123"), TokenKind::IntLit);
    }

    #[test]
    fn negative_int() {
        assert_eq!(lit("~9"), TokenKind::IntLit);
    }

    #[test]
    fn hex_int() {
        assert_eq!(lit("0xFF"), TokenKind::IntLit);
    }

    #[test]
    fn word_literal() {
        assert_eq!(lit("0w42"), TokenKind::WordLit);
    }

    #[test]
    fn hex_word_literal() {
        assert_eq!(lit("0wxFF"), TokenKind::WordLit);
    }

    #[test]
    fn real_with_fraction() {
        assert_eq!(lit("3.14"), TokenKind::RealLit);
    }

    #[test]
    fn real_with_exponent() {
        assert_eq!(lit("1.0e10"), TokenKind::RealLit);
    }

    #[test]
    fn real_with_negative_exponent() {
        assert_eq!(lit("1.0e~10"), TokenKind::RealLit);
    }

    #[test]
    fn bad_hex_errors() {
        let mut c = Cursor::new("0x");
        assert!(scan_number(&mut c, 0).is_err());
    }
}
