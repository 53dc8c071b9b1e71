//! String and character literals, including escape sequences and the
//! string continuation form `\...\` (a backslash, whitespace/newlines, and a
//! closing backslash, which vanishes from the literal's value but stays
//! inside the token's source slice — spec §4.1, §9).

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::token::TokenKind;

fn dummy_span(cursor: &Cursor<'_>) -> mlfmt_util::Span {
    let pos = mlfmt_util::Pos {
        offset: cursor.position() as u32,
        line: cursor.line(),
        column: cursor.column(),
        ..Default::default()
    };
    mlfmt_util::Span::new(pos, pos)
}

/// Scans the body of a `"..."` string literal; the opening quote has already
/// been consumed by the caller.
pub fn scan_string(cursor: &mut Cursor<'_>) -> Result<TokenKind, LexError> {
    loop {
        if cursor.is_at_end() {
            return Err(LexError::UnterminatedString { span: dummy_span(cursor) });
        }
        match cursor.current() {
            '"' => {
                cursor.advance();
                return Ok(TokenKind::StringLit);
            }
            '\n' => return Err(LexError::UnterminatedString { span: dummy_span(cursor) }),
            '\\' => scan_escape_or_continuation(cursor)?,
            _ => {
                cursor.advance();
            }
        }
    }
}

/// Scans a `#"c"` character literal; the `#"` has already been consumed.
pub fn scan_char(cursor: &mut Cursor<'_>) -> Result<TokenKind, LexError> {
    if cursor.is_at_end() || cursor.current() == '"' {
        return Err(LexError::BadCharLiteral { span: dummy_span(cursor) });
    }
    if cursor.current() == '\\' {
        scan_escape_or_continuation(cursor)?;
    } else {
        cursor.advance();
    }
    if cursor.current() != '"' {
        return Err(LexError::BadCharLiteral { span: dummy_span(cursor) });
    }
    cursor.advance();
    Ok(TokenKind::CharLit)
}

/// Consumes one backslash-led escape: either a recognized single-character
/// escape (`\n \t \\ \" \a \b \f \r \v`), a `\ddd` decimal escape, a
/// `\uXXXX` escape, or a `\...\` whitespace continuation that is dropped
/// from the literal's value but kept in its source slice.
fn scan_escape_or_continuation(cursor: &mut Cursor<'_>) -> Result<(), LexError> {
    debug_assert_eq!(cursor.current(), '\\');
    cursor.advance();
    if cursor.current().is_whitespace() {
        while cursor.current().is_whitespace() {
            cursor.advance();
        }
        if cursor.current() != '\\' {
            return Err(LexError::InvalidEscape { span: dummy_span(cursor) });
        }
        cursor.advance();
        return Ok(());
    }
    match cursor.current() {
        'n' | 't' | '\\' | '"' | 'a' | 'b' | 'f' | 'r' | 'v' => {
            cursor.advance();
            Ok(())
        }
        'u' => {
            cursor.advance();
            for _ in 0..4 {
                if !cursor.current().is_ascii_hexdigit() {
                    return Err(LexError::InvalidEscape { span: dummy_span(cursor) });
                }
                cursor.advance();
            }
            Ok(())
        }
        c if c.is_ascii_digit() => {
            for _ in 0..3 {
                if !cursor.current().is_ascii_digit() {
                    return Err(LexError::InvalidEscape { span: dummy_span(cursor) });
                }
                cursor.advance();
            }
            Ok(())
        }
        _ => Err(LexError::InvalidEscape { span: dummy_span(cursor) }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_string() {
        let mut c = Cursor::new("hello\"");
        assert_eq!(scan_string(&mut c), Ok(TokenKind::StringLit));
    }

    #[test]
    fn string_with_escape() {
        let mut c = Cursor::new("a\\nb\"");
        assert_eq!(scan_string(&mut c), Ok(TokenKind::StringLit));
    }

    #[test]
    fn unterminated_string_errors() {
        let mut c = Cursor::new("abc");
        assert!(scan_string(&mut c).is_err());
    }

    #[test]
    fn newline_in_string_errors() {
        let mut c = Cursor::new("abc\ndef\"");
        assert!(scan_string(&mut c).is_err());
    }

    #[test]
    fn continuation_is_dropped_but_consumed() {
        let mut c = Cursor::new("a\\   \n   \\b\"");
        assert_eq!(scan_string(&mut c), Ok(TokenKind::StringLit));
    }

    #[test]
    fn char_literal() {
        let mut c = Cursor::new("x\"");
        assert_eq!(scan_char(&mut c), Ok(TokenKind::CharLit));
    }

    #[test]
    fn char_literal_rejects_extra_chars() {
        let mut c = Cursor::new("xy\"");
        assert!(scan_char(&mut c).is_err());
    }
}
