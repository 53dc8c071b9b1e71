//! Nested `(* ... *)` block comments. Line comments are not part of the
//! language (spec §4.1): a lone `(*` that never finds its matching `*)`,
//! even across nested comments, is a lex error.

use crate::cursor::Cursor;
use crate::error::LexError;

/// Scans a block comment body; the opening `(*` has already been consumed
/// by the caller. Tracks nesting depth so `(* (* *) *)` closes exactly
/// once at the outermost `*)`.
pub fn scan_block_comment(cursor: &mut Cursor<'_>) -> Result<(), LexError> {
    let mut depth = 1u32;
    loop {
        if cursor.is_at_end() {
            let pos = mlfmt_util::Pos {
                offset: cursor.position() as u32,
                line: cursor.line(),
                column: cursor.column(),
                ..Default::default()
            };
            return Err(LexError::UnterminatedComment { span: mlfmt_util::Span::new(pos, pos) });
        }
        if cursor.starts_with("(*") {
            cursor.advance();
            cursor.advance();
            depth += 1;
            continue;
        }
        if cursor.starts_with("*)") {
            cursor.advance();
            cursor.advance();
            depth -= 1;
            if depth == 0 {
                return Ok(());
            }
            continue;
        }
        cursor.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_comment_closes() {
        let mut c = Cursor::new(" hello *) rest");
        assert!(scan_block_comment(&mut c).is_ok());
        assert_eq!(c.slice_from(0), " hello *)");
    }

    #[test]
    fn nested_comment_requires_matching_close() {
        let mut c = Cursor::new(" (* inner *) outer *) rest");
        assert!(scan_block_comment(&mut c).is_ok());
        assert_eq!(c.slice_from(0), " (* inner *) outer *)");
    }

    #[test]
    fn unterminated_comment_errors() {
        let mut c = Cursor::new(" still open");
        assert!(scan_block_comment(&mut c).is_err());
    }
}
