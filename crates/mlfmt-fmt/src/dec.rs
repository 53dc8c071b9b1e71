//! Declaration layout (spec §4.5).

use mlfmt_doc::{above_or_space, beside, group, nest, softspace, space, text, Doc};
use mlfmt_lex::token::Token;
use mlfmt_parse::ast::{ConBind, Dec, DatBind, ExBind, Fixity, FunBind, FunClause, TypBind, ValBind};

use crate::common::{and_chain, longid, tok};
use crate::exp::exp;
use crate::pat::pat;
use crate::ty::ty;

/// A sequence of declarations, one per line once the whole sequence
/// doesn't sit flat — each neighboring pair decides that for itself via
/// `aboveOrSpace`, independent of whatever group encloses the sequence
/// (e.g. a `let`/`local`/`abstype` block that otherwise fits on one line
/// still lays out its own declarations one per line, spec §4.5).
pub fn dec_seq(decs: &[Dec]) -> Doc {
    let mut iter = decs.iter().map(dec);
    let Some(first) = iter.next() else { return Doc::Empty };
    iter.fold(first, above_or_space)
}

pub fn dec(d: &Dec) -> Doc {
    match d {
        Dec::Val { val, tyvars, bindings, ands, .. } => {
            beside(tok(val), beside(space(), beside(tyvar_seq(tyvars), and_chain(&bindings.iter().map(val_bind).collect::<Vec<_>>(), ands))))
        }
        Dec::Fun { fun, tyvars, bindings, ands, .. } => {
            beside(tok(fun), beside(space(), beside(tyvar_seq(tyvars), and_chain(&bindings.iter().map(fun_bind).collect::<Vec<_>>(), ands))))
        }
        Dec::Type { type_, bindings, ands, .. } => beside(tok(type_), beside(space(), and_chain(&bindings.iter().map(typ_bind).collect::<Vec<_>>(), ands))),
        Dec::Datatype { datatype, bindings, ands, withtype, .. } => {
            let mut doc = beside(tok(datatype), beside(space(), and_chain(&bindings.iter().map(dat_bind).collect::<Vec<_>>(), ands)));
            if let Some((withtype_kw, typbinds)) = withtype {
                doc = beside(doc, beside(softspace(), beside(tok(withtype_kw), beside(space(), and_chain(&typbinds.iter().map(typ_bind).collect::<Vec<_>>(), &[])))));
            }
            doc
        }
        Dec::DatatypeRepl { datatype, con, eq, rhs_kw, rhs, .. } => beside(
            tok(datatype),
            beside(space(), beside(tok(con), beside(space(), beside(tok(eq), beside(space(), beside(tok(rhs_kw), beside(space(), longid(rhs)))))))),
        ),
        Dec::Abstype { abstype, bindings, withtype, with, decs, end, .. } => {
            let mut head = beside(tok(abstype), beside(space(), and_chain(&bindings.iter().map(dat_bind).collect::<Vec<_>>(), &[])));
            if let Some((withtype_kw, typbinds)) = withtype {
                head = beside(head, beside(softspace(), beside(tok(withtype_kw), beside(space(), and_chain(&typbinds.iter().map(typ_bind).collect::<Vec<_>>(), &[])))));
            }
            group(beside(
                head,
                beside(
                    softspace(),
                    beside(tok(with), beside(nest(1, beside(softspace(), dec_seq(decs))), beside(softspace(), tok(end)))),
                ),
            ))
        }
        Dec::Exception { exception, bindings, ands, .. } => {
            beside(tok(exception), beside(space(), and_chain(&bindings.iter().map(ex_bind).collect::<Vec<_>>(), ands)))
        }
        Dec::Local { local, decs1, in_, decs2, end, .. } => group(beside(
            tok(local),
            beside(
                nest(1, beside(softspace(), dec_seq(decs1))),
                beside(softspace(), beside(tok(in_), beside(nest(1, beside(softspace(), dec_seq(decs2))), beside(softspace(), tok(end))))),
            ),
        )),
        Dec::Open { open, ids, .. } => beside(tok(open), beside(space(), join_longids(ids))),
        Dec::Fixity { decl, .. } => fixity_dec(decl),
        Dec::Seq { decs, .. } => dec_seq(decs),
        Dec::Empty { .. } => Doc::Empty,
    }
}

fn tyvar_seq(seq: &mlfmt_parse::ast::SyntaxSeq<Token>) -> Doc {
    if seq.is_empty() {
        return Doc::Empty;
    }
    let mut doc = Doc::Empty;
    for (i, tv) in seq.iter().enumerate() {
        if i > 0 {
            doc = beside(doc, text(", "));
        }
        doc = beside(doc, tok(tv));
    }
    if seq.len() == 1 {
        beside(doc, space())
    } else {
        beside(text("("), beside(doc, beside(text(")"), space())))
    }
}

fn val_bind(b: &ValBind) -> Doc {
    let mut doc = Doc::Empty;
    if let Some(rec) = &b.rec {
        doc = beside(doc, beside(tok(rec), space()));
    }
    beside(doc, beside(pat(&b.pat), beside(space(), beside(tok(&b.eq), nest(1, beside(softspace(), exp(&b.exp)))))))
}

/// All clauses of one `fun` binding, `|`-joined and consistently indented
/// under the leading clause's name (spec §4.5: clause continuation).
fn fun_bind(b: &FunBind) -> Doc {
    let mut doc = Doc::Empty;
    for (i, clause) in b.clauses.iter().enumerate() {
        if i > 0 {
            let bar = clause.bar.as_ref().expect("every clause after the first carries its `|`");
            doc = beside(doc, beside(softspace(), beside(tok(bar), space())));
        }
        doc = beside(doc, fun_clause(clause));
    }
    group(doc)
}

fn fun_clause(c: &FunClause) -> Doc {
    let mut doc = Doc::Empty;
    if let Some(op) = &c.op {
        doc = beside(doc, beside(tok(op), space()));
    }
    doc = beside(doc, tok(&c.name));
    for arg in &c.args {
        doc = beside(doc, beside(space(), crate::pat::arg_pat(arg)));
    }
    if let Some((colon, t)) = &c.ty {
        doc = beside(doc, beside(space(), beside(tok(colon), beside(space(), ty(t)))));
    }
    beside(doc, beside(space(), beside(tok(&c.eq), nest(1, beside(softspace(), exp(&c.exp))))))
}

fn typ_bind(b: &TypBind) -> Doc {
    beside(tyvar_seq(&b.tyvars), beside(tok(&b.con), beside(space(), beside(tok(&b.eq), beside(space(), ty(&b.ty))))))
}

pub fn dat_bind(b: &DatBind) -> Doc {
    let mut doc = beside(tyvar_seq(&b.tyvars), beside(tok(&b.con), beside(space(), beside(tok(&b.eq), space()))));
    for (i, c) in b.constructors.iter().enumerate() {
        if i > 0 {
            doc = beside(doc, beside(softspace(), beside(tok(&b.bars[i - 1]), space())));
        }
        doc = beside(doc, con_bind(c));
    }
    group(doc)
}

fn con_bind(c: &ConBind) -> Doc {
    let mut doc = Doc::Empty;
    if let Some(op) = &c.op {
        doc = beside(doc, beside(tok(op), space()));
    }
    doc = beside(doc, tok(&c.con));
    if let Some((of_kw, t)) = &c.of_ty {
        doc = beside(doc, beside(space(), beside(tok(of_kw), beside(space(), ty(t)))));
    }
    doc
}

fn ex_bind(b: &ExBind) -> Doc {
    match b {
        ExBind::New { op, con, of_ty } => {
            let mut doc = Doc::Empty;
            if let Some(op) = op {
                doc = beside(doc, beside(tok(op), space()));
            }
            doc = beside(doc, tok(con));
            if let Some((of_kw, t)) = of_ty {
                doc = beside(doc, beside(space(), beside(tok(of_kw), beside(space(), ty(t)))));
            }
            doc
        }
        ExBind::Alias { op, con, eq, rhs_op, rhs } => {
            let mut doc = Doc::Empty;
            if let Some(op) = op {
                doc = beside(doc, beside(tok(op), space()));
            }
            doc = beside(doc, beside(tok(con), beside(space(), beside(tok(eq), space()))));
            if let Some(rhs_op) = rhs_op {
                doc = beside(doc, beside(tok(rhs_op), space()));
            }
            beside(doc, longid(rhs))
        }
    }
}

fn fixity_dec(f: &Fixity) -> Doc {
    match f {
        Fixity::Infix { kw, precedence, vids } => fixity_like(kw, precedence, vids),
        Fixity::Infixr { kw, precedence, vids } => fixity_like(kw, precedence, vids),
        Fixity::Nonfix { kw, vids } => beside(tok(kw), beside(space(), join_vids(vids))),
    }
}

fn fixity_like(kw: &Token, precedence: &Option<Token>, vids: &[Token]) -> Doc {
    let mut doc = tok(kw);
    if let Some(p) = precedence {
        doc = beside(doc, beside(space(), tok(p)));
    }
    beside(doc, beside(space(), join_vids(vids)))
}

fn join_vids(vids: &[Token]) -> Doc {
    let mut doc = Doc::Empty;
    for (i, v) in vids.iter().enumerate() {
        if i > 0 {
            doc = beside(doc, space());
        }
        doc = beside(doc, tok(v));
    }
    doc
}

fn join_longids(ids: &[mlfmt_parse::ast::LongId]) -> Doc {
    let mut doc = Doc::Empty;
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            doc = beside(doc, space());
        }
        doc = beside(doc, longid(id));
    }
    doc
}
