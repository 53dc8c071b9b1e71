//! Expression layout (spec §4.5).

use mlfmt_doc::{above_or_space, beside, group, nest, softspace, space, text, Doc};
use mlfmt_parse::ast::{Dec, Exp, ExpRow, Match, MatchArm};

use crate::common::{delimited, delimited_seq, label, longid, tok};
use crate::dec::dec_seq;
use crate::ty::ty;

pub fn exp(e: &Exp) -> Doc {
    match e {
        Exp::Const { token, .. } => tok(token),
        Exp::Var { op, id, .. } => match op {
            Some(t) => beside(tok(t), beside(space(), longid(id))),
            None => longid(id),
        },
        Exp::Record { lbrace, rows, rbrace, .. } => delimited_seq(lbrace, rows, rbrace, exp_row),
        Exp::Select { hash, label: l, exp: inner, .. } => beside(tok(hash), beside(label(l), beside(space(), arg_exp(inner)))),
        Exp::Tuple { lparen, elems, commas, rparen, .. } => delimited(lparen, elems, commas, rparen, exp),
        Exp::List { lbracket, elems, commas, rbracket, .. } => delimited(lbracket, elems, commas, rbracket, exp),
        Exp::Seq { lparen, elems, semis, rparen, .. } => {
            let mut body = Doc::Empty;
            for (i, e) in elems.iter().enumerate() {
                if i > 0 {
                    body = beside(body, beside(tok(&semis[i - 1]), softspace()));
                }
                body = beside(body, exp(e));
            }
            group(beside(tok(lparen), beside(nest(1, beside(softspace(), body)), beside(softspace(), tok(rparen)))))
        }
        Exp::Let { let_, decs, in_, body, semis, end, .. } => let_in_end(let_, decs, in_, body, semis, end),
        Exp::App { func, arg, .. } => beside(appexp(func), beside(space(), arg_exp(arg))),
        Exp::Infix { left, op, right, .. } => beside(arg_exp(left), beside(space(), beside(tok(op), beside(space(), arg_exp(right))))),
        Exp::Typed { exp: inner, colon, ty: t, .. } => beside(exp(inner), beside(space(), beside(tok(colon), beside(space(), ty(t))))),
        Exp::Andalso { left, kw, right, .. } => beside(arg_exp(left), beside(space(), beside(tok(kw), beside(space(), arg_exp(right))))),
        Exp::Orelse { left, kw, right, .. } => beside(arg_exp(left), beside(space(), beside(tok(kw), beside(space(), arg_exp(right))))),
        Exp::Handle { exp: inner, handle, match_, .. } => {
            beside(exp(inner), beside(space(), beside(tok(handle), beside(space(), match_doc(match_)))))
        }
        Exp::Raise { raise, exp: inner, .. } => beside(tok(raise), beside(space(), arg_exp(inner))),
        Exp::If { if_, cond, then_, conseq, else_, alt, .. } => group(beside(
            tok(if_),
            beside(
                space(),
                beside(
                    exp(cond),
                    beside(
                        softspace(),
                        beside(
                            tok(then_),
                            beside(
                                nest(1, beside(softspace(), exp(conseq))),
                                beside(softspace(), beside(tok(else_), nest(1, beside(softspace(), exp(alt))))),
                            ),
                        ),
                    ),
                ),
            ),
        )),
        Exp::While { while_, cond, do_, body, .. } => group(beside(
            tok(while_),
            beside(space(), beside(exp(cond), beside(softspace(), beside(tok(do_), nest(1, beside(softspace(), exp(body))))))),
        )),
        Exp::Case { case_, exp: scrutinee, of_, match_, .. } => beside(
            tok(case_),
            beside(space(), beside(exp(scrutinee), beside(space(), beside(tok(of_), beside(space(), match_doc(match_)))))),
        ),
        Exp::Fn { fn_, match_, .. } => beside(tok(fn_), beside(space(), match_doc(match_))),
        Exp::Paren { lparen, inner, rparen, .. } => beside(tok(lparen), beside(exp(inner), tok(rparen))),
    }
}

/// The left-hand operand of an `App` chain: a run of juxtaposed atomic
/// expressions is kept flat rather than re-threaded through `arg_exp`,
/// since `App` is already left-associative with no ambiguity to guard
/// against.
fn appexp(e: &Exp) -> Doc {
    match e {
        Exp::App { .. } => exp(e),
        _ => arg_exp(e),
    }
}

/// An expression that needs parens when used as an application argument,
/// or as an operand of an infix/`andalso`/`orelse` expression: anything
/// with a looser-binding top form than application.
fn arg_exp(e: &Exp) -> Doc {
    match e {
        Exp::App { .. }
        | Exp::Infix { .. }
        | Exp::Typed { .. }
        | Exp::Andalso { .. }
        | Exp::Orelse { .. }
        | Exp::Handle { .. }
        | Exp::Raise { .. }
        | Exp::If { .. }
        | Exp::While { .. }
        | Exp::Case { .. }
        | Exp::Fn { .. } => beside(text("("), beside(exp(e), text(")"))),
        _ => exp(e),
    }
}

fn exp_row(row: &ExpRow) -> Doc {
    beside(label(&row.label), beside(tok(&row.eq), beside(space(), exp(&row.exp))))
}

/// `|`-separated match arms, each deciding against its neighbor via
/// `aboveOrSpace` whether to share a line, independent of whether the
/// whole `case`/`fn` ends up flat (spec §4.5: arms conventionally get
/// their own line once any of them do).
fn match_doc(m: &Match) -> Doc {
    let mut iter = m.arms.iter().enumerate().map(|(i, arm)| {
        if i == 0 {
            match_arm(arm)
        } else {
            let bar = arm.bar.as_ref().expect("every arm after the first carries its `|`");
            beside(tok(bar), beside(space(), match_arm(arm)))
        }
    });
    let Some(first) = iter.next() else { return Doc::Empty };
    let body = iter.fold(first, above_or_space);
    group(nest(1, body))
}

fn match_arm(arm: &MatchArm) -> Doc {
    use crate::pat::pat;
    beside(pat(&arm.pat), beside(space(), beside(tok(&arm.arrow), nest(1, beside(softspace(), exp(&arm.exp))))))
}

/// `let decs in body end`, kept to at least three lines whenever `decs`
/// or `body` is non-trivial (spec §4.5): `let`, the declarations, `in`
/// and the body, `end` each get their own line once the whole binding
/// doesn't fit flat.
fn let_in_end(let_: &mlfmt_lex::token::Token, decs: &[Dec], in_: &mlfmt_lex::token::Token, body: &[Exp], semis: &[mlfmt_lex::token::Token], end: &mlfmt_lex::token::Token) -> Doc {
    let mut body_doc = Doc::Empty;
    for (i, e) in body.iter().enumerate() {
        if i > 0 {
            body_doc = beside(body_doc, beside(tok(&semis[i - 1]), softspace()));
        }
        body_doc = beside(body_doc, exp(e));
    }
    group(beside(
        tok(let_),
        beside(
            nest(1, beside(softspace(), dec_seq(decs))),
            beside(softspace(), beside(tok(in_), beside(nest(1, beside(softspace(), body_doc)), beside(softspace(), tok(end))))),
        ),
    ))
}
