//! Pattern layout (spec §4.5).

use mlfmt_doc::{beside, space, text, Doc};
use mlfmt_parse::ast::{Pat, PatRow};

use crate::common::{delimited, delimited_seq, label, longid, tok};
use crate::ty::ty;

pub fn pat(p: &Pat) -> Doc {
    match p {
        Pat::Wildcard { token, .. } | Pat::Const { token, .. } => tok(token),
        Pat::Var { op, id, .. } => op_prefix(op, longid(id)),
        Pat::Con { op, con, arg, .. } => op_prefix(op, beside(longid(con), beside(space(), arg_pat(arg)))),
        Pat::Infix { left, con, right, .. } => beside(arg_pat(left), beside(space(), beside(tok(con), beside(space(), arg_pat(right))))),
        Pat::Tuple { lparen, elems, commas, rparen, .. } => delimited(lparen, elems, commas, rparen, pat),
        Pat::List { lbracket, elems, commas, rbracket, .. } => delimited(lbracket, elems, commas, rbracket, pat),
        Pat::Record { lbrace, rows, flexible, rbrace, .. } => match flexible {
            None => delimited_seq(lbrace, rows, rbrace, pat_row),
            Some((comma, dots)) => flexible_record(lbrace, rows, comma, dots, rbrace),
        },
        Pat::Layered { op, var, ty: annot, as_, pat: inner, .. } => {
            let mut doc = op_prefix(op, tok(var));
            if let Some((colon, t)) = annot {
                doc = beside(doc, beside(tok(colon), beside(space(), ty(t))));
            }
            beside(doc, beside(space(), beside(tok(as_), beside(space(), pat(inner)))))
        }
        Pat::Typed { pat: inner, colon, ty: t, .. } => beside(pat(inner), beside(space(), beside(tok(colon), beside(space(), ty(t))))),
        Pat::Paren { lparen, inner, rparen, .. } => beside(tok(lparen), beside(pat(inner), tok(rparen))),
    }
}

fn op_prefix(op: &Option<mlfmt_lex::token::Token>, rest: Doc) -> Doc {
    match op {
        Some(t) => beside(tok(t), beside(space(), rest)),
        None => rest,
    }
}

/// A pattern that needs parens when it appears as a constructor/infix
/// argument: anything looser-binding than an atomic pattern.
pub fn arg_pat(p: &Pat) -> Doc {
    match p {
        Pat::Con { .. } | Pat::Infix { .. } | Pat::Layered { .. } | Pat::Typed { .. } => beside(text("("), beside(pat(p), text(")"))),
        _ => pat(p),
    }
}

fn pat_row(row: &PatRow) -> Doc {
    match row {
        PatRow::Field { label: l, pat: Some((eq, p)), .. } => beside(label(l), beside(tok(eq), beside(space(), pat(p)))),
        PatRow::Field { label: l, pat: None, .. } => label(l),
    }
}

/// A `{ ..rows.., ... }` flexible record pattern: the trailing `...`
/// isn't part of the row `SyntaxSeq`, so it's appended manually after
/// whatever rows came before it, using the real comma token that preceded
/// it in the source (so that comma's own comments still round-trip).
fn flexible_record(
    lbrace: &mlfmt_lex::token::Token,
    rows: &mlfmt_parse::ast::SyntaxSeq<PatRow>,
    comma: &Option<mlfmt_lex::token::Token>,
    dots: &mlfmt_lex::token::Token,
    rbrace: &mlfmt_lex::token::Token,
) -> Doc {
    use mlfmt_doc::{group, nest, softspace};
    let mut body = Doc::Empty;
    match rows {
        mlfmt_parse::ast::SyntaxSeq::Empty => {}
        mlfmt_parse::ast::SyntaxSeq::One(r) => body = pat_row(r),
        mlfmt_parse::ast::SyntaxSeq::Many { first, rest } => {
            body = pat_row(first);
            for (delim, r) in rest {
                body = beside(body, beside(tok(delim), beside(softspace(), pat_row(r))));
            }
        }
    }
    if let Some(comma) = comma {
        body = beside(body, beside(tok(comma), softspace()));
    }
    body = beside(body, tok(dots));
    group(beside(tok(lbrace), beside(nest(1, beside(softspace(), body)), beside(softspace(), tok(rbrace)))))
}
