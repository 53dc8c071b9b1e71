//! Token-preserving abstract syntax (spec §3).
//!
//! Every node keeps the tokens it was built from (or, at minimum, their
//! spans) so the printer can recover exact source text for leaves it
//! chooses not to reformat, and so `op`-prefixes and delimiter choice
//! survive into the tree instead of being normalized away during parsing.

use mlfmt_lex::token::Token;
use mlfmt_util::Span;

/// A delimited, possibly-empty sequence, preserving the exact delimiter
/// tokens between elements instead of assuming a canonical one (spec §3:
/// "a sequence is represented as its first element, if any, followed by a
/// list of (delimiter, element) pairs").
#[derive(Debug, Clone)]
pub enum SyntaxSeq<T> {
    Empty,
    One(T),
    Many { first: Box<T>, rest: Vec<(Token, T)> },
}

impl<T> SyntaxSeq<T> {
    pub fn len(&self) -> usize {
        match self {
            SyntaxSeq::Empty => 0,
            SyntaxSeq::One(_) => 1,
            SyntaxSeq::Many { rest, .. } => 1 + rest.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SyntaxSeq::Empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (first, rest): (Option<&T>, &[(Token, T)]) = match self {
            SyntaxSeq::Empty => (None, &[]),
            SyntaxSeq::One(t) => (Some(t), &[]),
            SyntaxSeq::Many { first, rest } => (Some(first.as_ref()), rest.as_slice()),
        };
        first.into_iter().chain(rest.iter().map(|(_, t)| t))
    }
}

/// A long identifier: `Ident (Dot Ident)*`, folded by the parser from the
/// lexer's separate `Ident`/`Dot` tokens (spec §4.1/§4.2; see the lexer's
/// `DESIGN.md` entry for why the lexer itself never emits this).
#[derive(Debug, Clone)]
pub struct LongId {
    /// Structure-identifier qualifiers, in order.
    pub qualifiers: Vec<Token>,
    /// The final component: a value/type/structure/signature identifier.
    pub last: Token,
    pub span: Span,
}

impl LongId {
    pub fn is_qualified(&self) -> bool {
        !self.qualifiers.is_empty()
    }
}

/// A record or pattern-row label: either an identifier or a positive
/// integer (tuple fields are sugar for integer-labeled records).
#[derive(Debug, Clone)]
pub struct Label {
    pub token: Token,
}

// ---------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Ty {
    /// A type variable, e.g. `'a`.
    Var { token: Token, span: Span },
    /// A type constructor applied to zero or more argument types, e.g.
    /// `int`, `'a list`, `(int, bool) pair`. Zero arguments is the common
    /// case of a bare type constructor name.
    Con { args: Vec<Ty>, con: LongId, span: Span },
    /// A `*`-separated tuple type, e.g. `int * bool`.
    Tuple { elems: Vec<Ty>, stars: Vec<Token>, span: Span },
    /// A record type, e.g. `{ x : int, y : int }`.
    Record { lbrace: Token, fields: SyntaxSeq<TyRow>, rbrace: Token, span: Span },
    /// A function type, e.g. `int -> bool`.
    Arrow { from: Box<Ty>, arrow: Token, to: Box<Ty>, span: Span },
    /// A parenthesized type, kept so the printer can decide whether the
    /// parens are still needed rather than always re-adding or dropping them.
    Paren { lparen: Token, inner: Box<Ty>, rparen: Token, span: Span },
}

impl Ty {
    pub fn span(&self) -> Span {
        match self {
            Ty::Var { span, .. }
            | Ty::Con { span, .. }
            | Ty::Tuple { span, .. }
            | Ty::Record { span, .. }
            | Ty::Arrow { span, .. }
            | Ty::Paren { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TyRow {
    pub label: Label,
    pub colon: Token,
    pub ty: Ty,
}

// ---------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Pat {
    Wildcard { token: Token, span: Span },
    /// A special-constant pattern: integer, word, string, or character.
    Const { token: Token, span: Span },
    /// A variable or nullary constructor pattern, with an `op`-prefix flag
    /// preserved from the source (spec §3/§9: `op`-prefix is tracked on
    /// the node rather than folded into the identifier).
    Var { op: Option<Token>, id: LongId, span: Span },
    /// A constructor pattern applied to an argument, e.g. `SOME x`, `x :: xs`
    /// when written prefix-style (`op ::  (x, xs)`).
    Con { op: Option<Token>, con: LongId, arg: Box<Pat>, span: Span },
    /// An infix constructor pattern, e.g. `x :: xs`.
    Infix { left: Box<Pat>, con: Token, right: Box<Pat>, span: Span },
    Tuple { lparen: Token, elems: Vec<Pat>, commas: Vec<Token>, rparen: Token, span: Span },
    List { lbracket: Token, elems: Vec<Pat>, commas: Vec<Token>, rbracket: Token, span: Span },
    /// `flexible` carries the comma preceding `...` along with the `...`
    /// itself, so that comma's own comments round-trip; it's `None` only
    /// when `...` directly follows `{`.
    Record { lbrace: Token, rows: SyntaxSeq<PatRow>, flexible: Option<(Option<Token>, Token)>, rbrace: Token, span: Span },
    /// A layered (`as`) pattern, e.g. `x as (a, b)`.
    Layered { op: Option<Token>, var: Token, ty: Option<(Token, Ty)>, as_: Token, pat: Box<Pat>, span: Span },
    Typed { pat: Box<Pat>, colon: Token, ty: Ty, span: Span },
    Paren { lparen: Token, inner: Box<Pat>, rparen: Token, span: Span },
}

impl Pat {
    pub fn span(&self) -> Span {
        match self {
            Pat::Wildcard { span, .. }
            | Pat::Const { span, .. }
            | Pat::Var { span, .. }
            | Pat::Con { span, .. }
            | Pat::Infix { span, .. }
            | Pat::Tuple { span, .. }
            | Pat::List { span, .. }
            | Pat::Record { span, .. }
            | Pat::Layered { span, .. }
            | Pat::Typed { span, .. }
            | Pat::Paren { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PatRow {
    /// `...` closing a flexible record pattern; represented on
    /// `Pat::Record.flexible` instead, so this variant is unused there and
    /// kept only for completeness of the row grammar.
    Field { label: Label, pat: Option<(Token, Pat)>, span: Span },
}

// ---------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Exp {
    Const { token: Token, span: Span },
    Var { op: Option<Token>, id: LongId, span: Span },
    Record { lbrace: Token, rows: SyntaxSeq<ExpRow>, rbrace: Token, span: Span },
    /// `#label exp` record selector.
    Select { hash: Token, label: Label, exp: Box<Exp>, span: Span },
    Tuple { lparen: Token, elems: Vec<Exp>, commas: Vec<Token>, rparen: Token, span: Span },
    List { lbracket: Token, elems: Vec<Exp>, commas: Vec<Token>, rbracket: Token, span: Span },
    /// A parenthesized sequence `(e1; e2; ...; en)`, n >= 1. A single
    /// element with no semicolons is a plain parenthesized expression.
    Seq { lparen: Token, elems: Vec<Exp>, semis: Vec<Token>, rparen: Token, span: Span },
    Let { let_: Token, decs: Vec<Dec>, in_: Token, body: Vec<Exp>, semis: Vec<Token>, end: Token, span: Span },
    App { func: Box<Exp>, arg: Box<Exp>, span: Span },
    Infix { left: Box<Exp>, op: Token, right: Box<Exp>, span: Span },
    Typed { exp: Box<Exp>, colon: Token, ty: Ty, span: Span },
    Andalso { left: Box<Exp>, kw: Token, right: Box<Exp>, span: Span },
    Orelse { left: Box<Exp>, kw: Token, right: Box<Exp>, span: Span },
    Handle { exp: Box<Exp>, handle: Token, match_: Match, span: Span },
    Raise { raise: Token, exp: Box<Exp>, span: Span },
    If { if_: Token, cond: Box<Exp>, then_: Token, conseq: Box<Exp>, else_: Token, alt: Box<Exp>, span: Span },
    While { while_: Token, cond: Box<Exp>, do_: Token, body: Box<Exp>, span: Span },
    Case { case_: Token, exp: Box<Exp>, of_: Token, match_: Match, span: Span },
    Fn { fn_: Token, match_: Match, span: Span },
    Paren { lparen: Token, inner: Box<Exp>, rparen: Token, span: Span },
}

impl Exp {
    pub fn span(&self) -> Span {
        match self {
            Exp::Const { span, .. }
            | Exp::Var { span, .. }
            | Exp::Record { span, .. }
            | Exp::Select { span, .. }
            | Exp::Tuple { span, .. }
            | Exp::List { span, .. }
            | Exp::Seq { span, .. }
            | Exp::Let { span, .. }
            | Exp::App { span, .. }
            | Exp::Infix { span, .. }
            | Exp::Typed { span, .. }
            | Exp::Andalso { span, .. }
            | Exp::Orelse { span, .. }
            | Exp::Handle { span, .. }
            | Exp::Raise { span, .. }
            | Exp::If { span, .. }
            | Exp::While { span, .. }
            | Exp::Case { span, .. }
            | Exp::Fn { span, .. }
            | Exp::Paren { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpRow {
    pub label: Label,
    pub eq: Token,
    pub exp: Exp,
}

/// One `pat => exp` arm of a `case`/`fn`/`handle`, with the leading `|` of
/// every arm after the first preserved for re-printing.
#[derive(Debug, Clone)]
pub struct MatchArm {
    pub bar: Option<Token>,
    pub pat: Pat,
    pub arrow: Token,
    pub exp: Exp,
}

#[derive(Debug, Clone)]
pub struct Match {
    pub arms: Vec<MatchArm>,
    pub span: Span,
}

// ---------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ValBind {
    pub rec: Option<Token>,
    pub pat: Pat,
    pub eq: Token,
    pub exp: Exp,
}

#[derive(Debug, Clone)]
pub struct FunClause {
    pub bar: Option<Token>,
    pub op: Option<Token>,
    pub name: Token,
    pub args: Vec<Pat>,
    pub ty: Option<(Token, Ty)>,
    pub eq: Token,
    pub exp: Exp,
}

/// All clauses for one function name, joined by `|` (spec §4.2/§9: arity
/// and name agreement across clauses is checked here, not deferred to a
/// later pass, since the parser is the only place that sees every clause
/// together before the printer groups them).
#[derive(Debug, Clone)]
pub struct FunBind {
    pub clauses: Vec<FunClause>,
}

#[derive(Debug, Clone)]
pub struct TypBind {
    pub tyvars: SyntaxSeq<Token>,
    pub con: Token,
    pub eq: Token,
    pub ty: Ty,
}

#[derive(Debug, Clone)]
pub struct ConBind {
    pub op: Option<Token>,
    pub con: Token,
    pub of_ty: Option<(Token, Ty)>,
}

#[derive(Debug, Clone)]
pub struct DatBind {
    pub tyvars: SyntaxSeq<Token>,
    pub con: Token,
    pub eq: Token,
    pub constructors: Vec<ConBind>,
    pub bars: Vec<Token>,
}

#[derive(Debug, Clone)]
pub enum ExBind {
    /// `exception Foo` or `exception Foo of ty`.
    New { op: Option<Token>, con: Token, of_ty: Option<(Token, Ty)> },
    /// `exception Foo = Bar.Baz`, an exception alias.
    Alias { op: Option<Token>, con: Token, eq: Token, rhs_op: Option<Token>, rhs: LongId },
}

#[derive(Debug, Clone)]
pub enum Fixity {
    Infix { kw: Token, precedence: Option<Token>, vids: Vec<Token> },
    Infixr { kw: Token, precedence: Option<Token>, vids: Vec<Token> },
    Nonfix { kw: Token, vids: Vec<Token> },
}

#[derive(Debug, Clone)]
pub enum Dec {
    Val { val: Token, tyvars: SyntaxSeq<Token>, bindings: Vec<ValBind>, ands: Vec<Token>, span: Span },
    Fun { fun: Token, tyvars: SyntaxSeq<Token>, bindings: Vec<FunBind>, ands: Vec<Token>, span: Span },
    Type { type_: Token, bindings: Vec<TypBind>, ands: Vec<Token>, span: Span },
    Datatype { datatype: Token, bindings: Vec<DatBind>, ands: Vec<Token>, withtype: Option<(Token, Vec<TypBind>)>, span: Span },
    /// `datatype T = datatype LongT`, a datatype replication declaration.
    DatatypeRepl { datatype: Token, con: Token, eq: Token, rhs_kw: Token, rhs: LongId, span: Span },
    Abstype { abstype: Token, bindings: Vec<DatBind>, withtype: Option<(Token, Vec<TypBind>)>, with: Token, decs: Vec<Dec>, end: Token, span: Span },
    Exception { exception: Token, bindings: Vec<ExBind>, ands: Vec<Token>, span: Span },
    Local { local: Token, decs1: Vec<Dec>, in_: Token, decs2: Vec<Dec>, end: Token, span: Span },
    Open { open: Token, ids: Vec<LongId>, span: Span },
    Fixity { decl: Fixity, span: Span },
    /// Declarations written back to back with no connective, still kept as
    /// individual `Dec`s rather than merged (spec §3: sequencing is
    /// structural, not a separate node).
    Seq { decs: Vec<Dec>, span: Span },
    Empty { span: Span },
}

impl Dec {
    pub fn span(&self) -> Span {
        match self {
            Dec::Val { span, .. }
            | Dec::Fun { span, .. }
            | Dec::Type { span, .. }
            | Dec::Datatype { span, .. }
            | Dec::DatatypeRepl { span, .. }
            | Dec::Abstype { span, .. }
            | Dec::Exception { span, .. }
            | Dec::Local { span, .. }
            | Dec::Open { span, .. }
            | Dec::Fixity { span, .. }
            | Dec::Seq { span, .. }
            | Dec::Empty { span } => *span,
        }
    }
}

// ---------------------------------------------------------------------
// Modules: signatures, structures, functors
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ValDesc {
    pub vid: Token,
    pub colon: Token,
    pub ty: Ty,
}

#[derive(Debug, Clone)]
pub struct TypDesc {
    pub tyvars: SyntaxSeq<Token>,
    pub con: Token,
}

#[derive(Debug, Clone)]
pub struct ExDesc {
    pub con: Token,
    pub of_ty: Option<(Token, Ty)>,
}

#[derive(Debug, Clone)]
pub struct StrDesc {
    pub strid: Token,
    pub colon: Token,
    pub sigexp: SigExp,
}

#[derive(Debug, Clone)]
pub enum Spec {
    Val { val: Token, descs: Vec<ValDesc>, ands: Vec<Token>, span: Span },
    Type { type_: Token, descs: Vec<TypDesc>, ands: Vec<Token>, span: Span },
    Eqtype { eqtype: Token, descs: Vec<TypDesc>, ands: Vec<Token>, span: Span },
    Datatype { datatype: Token, bindings: Vec<DatBind>, ands: Vec<Token>, span: Span },
    Exception { exception: Token, descs: Vec<ExDesc>, ands: Vec<Token>, span: Span },
    Structure { structure: Token, descs: Vec<StrDesc>, ands: Vec<Token>, span: Span },
    Include { include: Token, sigexp: SigExp, span: Span },
    Sharing { spec: Box<Spec>, sharing: Token, ids: Vec<LongId>, eqs: Vec<Token>, span: Span },
    Seq { specs: Vec<Spec>, span: Span },
    Empty { span: Span },
}

impl Spec {
    pub fn span(&self) -> Span {
        match self {
            Spec::Val { span, .. }
            | Spec::Type { span, .. }
            | Spec::Eqtype { span, .. }
            | Spec::Datatype { span, .. }
            | Spec::Exception { span, .. }
            | Spec::Structure { span, .. }
            | Spec::Include { span, .. }
            | Spec::Sharing { span, .. }
            | Spec::Seq { span, .. }
            | Spec::Empty { span } => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SigExp {
    Sig { sig: Token, spec: Box<Spec>, end: Token, span: Span },
    Ident { id: Token, span: Span },
    Where { sigexp: Box<SigExp>, where_: Token, type_: Token, tyvars: SyntaxSeq<Token>, con: LongId, eq: Token, ty: Ty, span: Span },
}

impl SigExp {
    pub fn span(&self) -> Span {
        match self {
            SigExp::Sig { span, .. } | SigExp::Ident { span, .. } | SigExp::Where { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SigBind {
    pub sigid: Token,
    pub eq: Token,
    pub sigexp: SigExp,
}

#[derive(Debug, Clone)]
pub enum StrExp {
    Struct { struct_: Token, decs: Vec<StrDec>, end: Token, span: Span },
    Ident { id: LongId, span: Span },
    Constraint { strexp: Box<StrExp>, colon: Token, opaque: bool, sigexp: SigExp, span: Span },
    FunctorApp { functor: Token, lparen: Token, arg: Box<StrExp>, rparen: Token, span: Span },
    Let { let_: Token, decs: Vec<StrDec>, in_: Token, strexp: Box<StrExp>, end: Token, span: Span },
}

impl StrExp {
    pub fn span(&self) -> Span {
        match self {
            StrExp::Struct { span, .. }
            | StrExp::Ident { span, .. }
            | StrExp::Constraint { span, .. }
            | StrExp::FunctorApp { span, .. }
            | StrExp::Let { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StrBind {
    pub strid: Token,
    pub constraint: Option<(Token, bool, SigExp)>,
    pub eq: Token,
    pub strexp: StrExp,
}

#[derive(Debug, Clone)]
pub enum StrDec {
    Dec(Dec),
    Structure { structure: Token, bindings: Vec<StrBind>, ands: Vec<Token>, span: Span },
    Local { local: Token, decs1: Vec<StrDec>, in_: Token, decs2: Vec<StrDec>, end: Token, span: Span },
    Seq { decs: Vec<StrDec>, span: Span },
    Empty { span: Span },
}

#[derive(Debug, Clone)]
pub struct FunctorBind {
    pub funid: Token,
    pub lparen: Token,
    pub strid: Token,
    pub colon: Token,
    pub sigexp: SigExp,
    pub rparen: Token,
    pub constraint: Option<(Token, bool, SigExp)>,
    pub eq: Token,
    pub strexp: StrExp,
}

#[derive(Debug, Clone)]
pub enum TopDec {
    Str { structure: Token, bindings: Vec<StrBind>, ands: Vec<Token>, span: Span },
    Sig { signature: Token, bindings: Vec<SigBind>, ands: Vec<Token>, span: Span },
    Functor { functor: Token, bindings: Vec<FunctorBind>, ands: Vec<Token>, span: Span },
    Core { dec: StrDec, span: Span },
}

impl TopDec {
    pub fn span(&self) -> Span {
        match self {
            TopDec::Str { span, .. } | TopDec::Sig { span, .. } | TopDec::Functor { span, .. } | TopDec::Core { span, .. } => *span,
        }
    }
}

/// The root of a parsed compilation unit: a sequence of top-level
/// declarations, each optionally terminated by `;`.
#[derive(Debug, Clone)]
pub struct Ast {
    pub topdecs: Vec<TopDec>,
    pub semis: Vec<Option<Token>>,
    pub span: Span,
}
