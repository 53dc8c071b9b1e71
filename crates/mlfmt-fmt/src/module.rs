//! Module-language layout: signatures, structures, functors (spec §4.5).

use mlfmt_doc::{above_or_space, beside, group, nest, softspace, space, text, Doc};
use mlfmt_lex::token::Token;
use mlfmt_parse::ast::{
    Ast, ExDesc, FunctorBind, SigBind, SigExp, Spec, StrBind, StrDec, StrDesc, StrExp, TopDec, TypDesc, ValDesc,
};

use crate::common::{and_chain, longid, tok};
use crate::dec::dec_seq;
use crate::ty::ty;

pub fn ast(a: &Ast) -> Doc {
    let mut doc = Doc::Empty;
    for (i, td) in a.topdecs.iter().enumerate() {
        if i > 0 {
            doc = beside(doc, beside(softspace(), softspace()));
        }
        doc = beside(doc, topdec(td));
        if let Some(semi) = &a.semis[i] {
            doc = beside(doc, tok(semi));
        }
    }
    doc
}

fn topdec(td: &TopDec) -> Doc {
    match td {
        TopDec::Str { structure, bindings, ands, .. } => {
            beside(tok(structure), beside(space(), and_chain(&bindings.iter().map(str_bind).collect::<Vec<_>>(), ands)))
        }
        TopDec::Sig { signature, bindings, ands, .. } => {
            beside(tok(signature), beside(space(), and_chain(&bindings.iter().map(sig_bind).collect::<Vec<_>>(), ands)))
        }
        TopDec::Functor { functor, bindings, ands, .. } => {
            beside(tok(functor), beside(space(), and_chain(&bindings.iter().map(functor_bind).collect::<Vec<_>>(), ands)))
        }
        TopDec::Core { dec, .. } => strdec(dec),
    }
}

pub fn strdec(d: &StrDec) -> Doc {
    match d {
        StrDec::Dec(inner) => crate::dec::dec(inner),
        StrDec::Structure { structure, bindings, ands, .. } => {
            beside(tok(structure), beside(space(), and_chain(&bindings.iter().map(str_bind).collect::<Vec<_>>(), ands)))
        }
        StrDec::Local { local, decs1, in_, decs2, end, .. } => group(beside(
            tok(local),
            beside(
                nest(1, beside(softspace(), strdec_seq(decs1))),
                beside(softspace(), beside(tok(in_), beside(nest(1, beside(softspace(), strdec_seq(decs2))), beside(softspace(), tok(end))))),
            ),
        )),
        StrDec::Seq { decs, .. } => strdec_seq(decs),
        StrDec::Empty { .. } => Doc::Empty,
    }
}

/// Same independence as `dec::dec_seq`: each structure-level declaration
/// decides against its neighbor whether to share a line, regardless of
/// the enclosing `struct`/`let`/`local` block's own fit decision.
fn strdec_seq(decs: &[StrDec]) -> Doc {
    let mut iter = decs.iter().map(strdec);
    let Some(first) = iter.next() else { return Doc::Empty };
    iter.fold(first, above_or_space)
}

fn str_bind(b: &StrBind) -> Doc {
    let mut doc = beside(tok(&b.strid), space());
    if let Some((colon, _opaque, sigexp_)) = &b.constraint {
        doc = beside(doc, beside(tok(colon), beside(space(), beside(sig_exp(sigexp_), space()))));
    }
    beside(doc, beside(tok(&b.eq), nest(1, beside(softspace(), str_exp(&b.strexp)))))
}

fn str_exp(e: &StrExp) -> Doc {
    match e {
        StrExp::Struct { struct_, decs, end, .. } => group(beside(
            tok(struct_),
            beside(nest(1, beside(softspace(), strdec_seq(decs))), beside(softspace(), tok(end))),
        )),
        StrExp::Ident { id, .. } => longid(id),
        StrExp::Constraint { strexp, colon, sigexp: sigexp_, .. } => {
            beside(str_exp(strexp), beside(space(), beside(tok(colon), beside(space(), sig_exp(sigexp_)))))
        }
        StrExp::FunctorApp { functor, lparen, arg, rparen, .. } => {
            beside(tok(functor), beside(tok(lparen), beside(str_exp(arg), tok(rparen))))
        }
        StrExp::Let { let_, decs, in_, strexp, end, .. } => group(beside(
            tok(let_),
            beside(
                nest(1, beside(softspace(), strdec_seq(decs))),
                beside(softspace(), beside(tok(in_), beside(nest(1, beside(softspace(), str_exp(strexp))), beside(softspace(), tok(end))))),
            ),
        )),
    }
}

fn sig_bind(b: &SigBind) -> Doc {
    beside(tok(&b.sigid), beside(space(), beside(tok(&b.eq), beside(space(), sig_exp(&b.sigexp)))))
}

fn sig_exp(e: &SigExp) -> Doc {
    match e {
        SigExp::Sig { sig, spec, end, .. } => {
            group(beside(tok(sig), beside(nest(1, beside(softspace(), spec_doc(spec))), beside(softspace(), tok(end)))))
        }
        SigExp::Ident { id, .. } => tok(id),
        SigExp::Where { sigexp: inner, where_, type_, tyvars, con, eq, ty: t, .. } => beside(
            sig_exp(inner),
            beside(
                space(),
                beside(
                    tok(where_),
                    beside(space(), beside(tok(type_), beside(space(), beside(tyvar_seq_prefix(tyvars), beside(longid(con), beside(space(), beside(tok(eq), beside(space(), ty(t)))))))),
                ),
            ),
        ),
    }
}

fn functor_bind(b: &FunctorBind) -> Doc {
    let mut doc = beside(
        tok(&b.funid),
        beside(tok(&b.lparen), beside(tok(&b.strid), beside(space(), beside(tok(&b.colon), beside(space(), sig_exp(&b.sigexp)))))),
    );
    doc = beside(doc, beside(tok(&b.rparen), space()));
    if let Some((colon, _, sigexp_)) = &b.constraint {
        doc = beside(doc, beside(tok(colon), beside(space(), beside(sig_exp(sigexp_), space()))));
    }
    beside(doc, beside(tok(&b.eq), nest(1, beside(softspace(), str_exp(&b.strexp)))))
}

fn spec_doc(s: &Spec) -> Doc {
    match s {
        Spec::Val { val, descs, ands, .. } => beside(tok(val), beside(space(), and_chain(&descs.iter().map(val_desc).collect::<Vec<_>>(), ands))),
        Spec::Type { type_, descs, ands, .. } => beside(tok(type_), beside(space(), and_chain(&descs.iter().map(typ_desc).collect::<Vec<_>>(), ands))),
        Spec::Eqtype { eqtype, descs, ands, .. } => beside(tok(eqtype), beside(space(), and_chain(&descs.iter().map(typ_desc).collect::<Vec<_>>(), ands))),
        Spec::Datatype { datatype, bindings, ands, .. } => {
            beside(tok(datatype), beside(space(), and_chain(&bindings.iter().map(crate::dec::dat_bind).collect::<Vec<_>>(), ands)))
        }
        Spec::Exception { exception, descs, ands, .. } => {
            beside(tok(exception), beside(space(), and_chain(&descs.iter().map(ex_desc).collect::<Vec<_>>(), ands)))
        }
        Spec::Structure { structure, descs, ands, .. } => {
            beside(tok(structure), beside(space(), and_chain(&descs.iter().map(str_desc).collect::<Vec<_>>(), ands)))
        }
        Spec::Include { include, sigexp: e, .. } => beside(tok(include), beside(space(), sig_exp(e))),
        Spec::Sharing { spec, sharing, ids, eqs, .. } => {
            // `eqs` carries every `=` between the shared identifiers.
            let mut doc = beside(spec_doc(spec), beside(softspace(), beside(tok(sharing), space())));
            for (i, id) in ids.iter().enumerate() {
                if i > 0 {
                    doc = beside(doc, beside(space(), beside(tok(&eqs[i - 1]), space())));
                }
                doc = beside(doc, longid(id));
            }
            doc
        }
        Spec::Seq { specs, .. } => {
            let mut doc = Doc::Empty;
            for (i, s) in specs.iter().enumerate() {
                if i > 0 {
                    doc = beside(doc, softspace());
                }
                doc = beside(doc, spec_doc(s));
            }
            doc
        }
        Spec::Empty { .. } => Doc::Empty,
    }
}

fn val_desc(d: &ValDesc) -> Doc {
    beside(tok(&d.vid), beside(space(), beside(tok(&d.colon), beside(space(), ty(&d.ty)))))
}

fn typ_desc(d: &TypDesc) -> Doc {
    beside(tyvar_seq_prefix(&d.tyvars), tok(&d.con))
}

fn ex_desc(d: &ExDesc) -> Doc {
    let mut doc = tok(&d.con);
    if let Some((of_kw, t)) = &d.of_ty {
        doc = beside(doc, beside(space(), beside(tok(of_kw), beside(space(), ty(t)))));
    }
    doc
}

fn str_desc(d: &StrDesc) -> Doc {
    beside(tok(&d.strid), beside(space(), beside(tok(&d.colon), beside(space(), sig_exp(&d.sigexp)))))
}

fn tyvar_seq_prefix(seq: &mlfmt_parse::ast::SyntaxSeq<Token>) -> Doc {
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
