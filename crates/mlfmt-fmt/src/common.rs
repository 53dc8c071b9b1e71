//! Helpers shared by every syntax-to-document translator module.

use mlfmt_doc::{beside, group, nest, softspace, space, text, Doc};
use mlfmt_lex::token::{CommentToken, Token, TokenKind};
use mlfmt_parse::ast::{Label, LongId, SyntaxSeq};

/// The literal source spelling of a token: a keyword's canonical spelling
/// for reserved words/symbols, or the interned slice for everything else
/// (identifiers, literals, `op`, comments).
pub fn token_text(t: &Token) -> &'static str {
    match t.kind {
        TokenKind::Keyword(kw) => kw.text(),
        _ => t.text.as_str(),
    }
}

pub fn tok(t: &Token) -> Doc {
    beside(leading_comments(t), text(token_text(t)))
}

/// A comment forces its own line: its text embeds a literal `\n` after it,
/// which gives the `Beside` chain it's part of an infinite flat width and
/// so forces every enclosing group to break, after which the trailing
/// `softspace` lands on a fresh, correctly indented line (spec §4.5/§9:
/// comments are reattached at their lead token; see `DESIGN.md` for why a
/// plain `softspace` alone can't do this job).
fn leading_comments(t: &Token) -> Doc {
    let mut doc = Doc::Empty;
    for c in &t.leading_comments {
        doc = beside(doc, comment_doc(c));
    }
    doc
}

fn comment_doc(c: &CommentToken) -> Doc {
    text(format!("{}\n", c.text.as_str()))
}

pub fn longid(id: &LongId) -> Doc {
    let mut doc = Doc::Empty;
    for q in &id.qualifiers {
        doc = beside(doc, beside(tok(q), text(".")));
    }
    beside(doc, tok(&id.last))
}

pub fn label(l: &Label) -> Doc {
    tok(&l.token)
}

/// Lays out a parenthesized, delimited sequence: `open delim item delim
/// item ... close`, grouped so the whole thing stays on one line if it
/// fits and otherwise breaks one item per line with each delimiter at the
/// end of its line, the common "group, then indent the body" shape (spec
/// §4.5).
pub fn delimited<T>(
    open: &Token,
    items: &[T],
    delims: &[Token],
    close: &Token,
    item_doc: impl Fn(&T) -> Doc,
) -> Doc {
    if items.is_empty() {
        return beside(tok(open), tok(close));
    }
    let mut body = Doc::Empty;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            body = beside(body, beside(tok(&delims[i - 1]), softspace()));
        }
        body = beside(body, item_doc(item));
    }
    group(beside(tok(open), beside(nest(1, beside(softspace(), body)), beside(softspace(), tok(close)))))
}

/// The same layout as [`delimited`], but over a [`SyntaxSeq`] (whose
/// delimiter tokens are carried per element rather than in a parallel
/// slice).
pub fn delimited_seq<T>(open: &Token, seq: &SyntaxSeq<T>, close: &Token, item_doc: impl Fn(&T) -> Doc) -> Doc {
    match seq {
        SyntaxSeq::Empty => beside(tok(open), tok(close)),
        SyntaxSeq::One(t) => group(beside(tok(open), beside(nest(1, beside(softspace(), item_doc(t))), beside(softspace(), tok(close))))),
        SyntaxSeq::Many { first, rest } => {
            let mut body = item_doc(first);
            for (delim, item) in rest {
                body = beside(body, beside(tok(delim), beside(softspace(), item_doc(item))));
            }
            group(beside(tok(open), beside(nest(1, beside(softspace(), body)), beside(softspace(), tok(close)))))
        }
    }
}

/// Joins `items` with `sep_kw` tokens between them, each candidate break
/// point deciding independently whether it fits (spec §4.5: used for
/// `and`-chained bindings and `|`-separated clauses/arms, where every
/// binding keeps its own keyword alignment regardless of its neighbors).
pub fn and_chain(items: &[Doc], ands: &[Token]) -> Doc {
    let mut out = Doc::Empty;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out = beside(out, beside(softspace(), beside(tok(&ands[i - 1]), space())));
        }
        out = beside(out, item.clone());
    }
    out
}
