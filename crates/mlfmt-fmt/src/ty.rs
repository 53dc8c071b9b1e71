//! Type expression layout (spec §4.5).

use mlfmt_doc::{beside, space, text, Doc};
use mlfmt_parse::ast::{Ty, TyRow};

use crate::common::{delimited_seq, label, longid, tok};

pub fn ty(t: &Ty) -> Doc {
    match t {
        Ty::Var { token, .. } => tok(token),
        Ty::Con { args, con, .. } => {
            let con_doc = longid(con);
            match args.as_slice() {
                [] => con_doc,
                [one] => beside(arg_ty(one), beside(space(), con_doc)),
                many => {
                    let mut body = Doc::Empty;
                    for (i, a) in many.iter().enumerate() {
                        if i > 0 {
                            body = beside(body, text(", "));
                        }
                        body = beside(body, ty(a));
                    }
                    beside(text("("), beside(body, beside(text(")"), beside(space(), con_doc))))
                }
            }
        }
        Ty::Tuple { elems, stars, .. } => {
            let mut doc = Doc::Empty;
            for (i, e) in elems.iter().enumerate() {
                if i > 0 {
                    doc = beside(doc, beside(space(), beside(tok(&stars[i - 1]), space())));
                }
                doc = beside(doc, arg_ty(e));
            }
            doc
        }
        Ty::Record { lbrace, fields, rbrace, .. } => delimited_seq(lbrace, fields, rbrace, ty_row),
        // `from`/`to` are already parsed at tuple-level precedence or
        // tighter, and the parser records any parens the user wrote as an
        // explicit `Ty::Paren`, so neither operand needs parens added here.
        Ty::Arrow { from, arrow, to, .. } => beside(ty(from), beside(space(), beside(tok(arrow), beside(space(), ty(to))))),
        Ty::Paren { lparen, inner, rparen, .. } => beside(tok(lparen), beside(ty(inner), tok(rparen))),
    }
}

/// A type that needs its own parens when it appears as a constructor
/// argument or tuple/arrow operand (anything with a looser-binding top
/// constructor than juxtaposition/`*`/`->`).
fn arg_ty(t: &Ty) -> Doc {
    match t {
        Ty::Arrow { .. } | Ty::Tuple { .. } => beside(text("("), beside(ty(t), text(")"))),
        _ => ty(t),
    }
}

fn ty_row(row: &TyRow) -> Doc {
    beside(label(&row.label), beside(tok(&row.colon), beside(space(), ty(&row.ty))))
}
