//! Recursive-descent parser (spec §4.2/§4.3).
//!
//! The grammar is parsed the way the Definition's grammar is usually
//! implemented: a non-recursive `atexp`/`atpat`/`atty` layer for the
//! bracketed and literal forms, a left-associative `appexp`/`appat` layer
//! built from one-or-more atomic forms (juxtaposition is application), and
//! a precedence-climbing layer on top of that for user-declared infix
//! identifiers. `if`/`case`/`fn`/`while`/`raise`/`handle`/`andalso`/
//! `orelse` sit above the infix layer and extend as far right as
//! possible, so (as in the source language itself) they need parentheses
//! to appear as a function argument.

use mlfmt_lex::token::{Keyword, Token, TokenKind};
use mlfmt_util::Span;

use crate::ast::*;
use crate::error::ParseError;
use crate::fixity::{Assoc, FixityEnv};

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    fixity: FixityEnv,
    errors: Vec<ParseError>,
}

type PResult<T> = Result<T, ParseError>;

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, position: 0, fixity: FixityEnv::with_initial_fixities(), errors: Vec::new() }
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    // -- token-stream primitives -----------------------------------------

    fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn peek(&self, offset: usize) -> &Token {
        let idx = (self.position + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn is_at_end(&self) -> bool {
        self.current().is_eof()
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        tok
    }

    fn check_kw(&self, kw: Keyword) -> bool {
        matches!(self.current().kind, TokenKind::Keyword(k) if k == kw)
    }

    fn match_kw(&mut self, kw: Keyword) -> Option<Token> {
        if self.check_kw(kw) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect_kw(&mut self, kw: Keyword) -> PResult<Token> {
        self.match_kw(kw).ok_or_else(|| ParseError::UnexpectedToken {
            expected: kw.text().to_string(),
            found: token_description(self.current()),
            span: self.current().span,
        })
    }

    fn is_ident_like(tok: &Token) -> bool {
        matches!(tok.kind, TokenKind::Ident | TokenKind::SymbolicIdent)
    }

    fn expect_vid(&mut self) -> PResult<Token> {
        if Self::is_ident_like(self.current()) {
            Ok(self.advance())
        } else {
            Err(ParseError::ExpectedProduction { what: "an identifier".to_string(), span: self.current().span })
        }
    }

    // -- long identifiers --------------------------------------------------

    /// Folds `Ident (Dot Ident)*` into a `LongId` (spec §9: the lexer never
    /// does this itself). The final component may be a symbolic identifier
    /// (e.g. `IntInf.+`), but every qualifier before it must be a plain
    /// structure identifier.
    fn parse_long_id(&mut self) -> PResult<LongId> {
        let first = self.expect_vid()?;
        let start = first.span;
        let mut qualifiers = Vec::new();
        let mut last = first;
        while self.check_kw(Keyword::Dot) {
            qualifiers.push(last);
            self.advance();
            last = self.expect_vid()?;
        }
        let span = start.to(last.span);
        Ok(LongId { qualifiers, last, span })
    }

    fn label(&mut self) -> PResult<Label> {
        if Self::is_ident_like(self.current()) || matches!(self.current().kind, TokenKind::IntLit) {
            Ok(Label { token: self.advance() })
        } else {
            Err(ParseError::ExpectedProduction { what: "a record label".to_string(), span: self.current().span })
        }
    }

    // -- types --------------------------------------------------------------

    fn parse_atomic_ty(&mut self) -> PResult<Ty> {
        let tok = self.current().clone();
        match tok.kind {
            TokenKind::TyVar => {
                self.advance();
                Ok(Ty::Var { span: tok.span, token: tok })
            }
            TokenKind::Keyword(Keyword::LBrace) => {
                let lbrace = self.advance();
                let fields = self.parse_ty_row_seq()?;
                let rbrace = self.expect_kw(Keyword::RBrace)?;
                Ok(Ty::Record { span: lbrace.span.to(rbrace.span), lbrace, fields, rbrace })
            }
            TokenKind::Keyword(Keyword::LParen) => {
                let lparen = self.advance();
                let first = self.parse_ty()?;
                if self.check_kw(Keyword::Comma) {
                    let mut args = vec![first];
                    while self.match_kw(Keyword::Comma).is_some() {
                        args.push(self.parse_ty()?);
                    }
                    let rparen = self.expect_kw(Keyword::RParen)?;
                    let con = self.parse_long_id()?;
                    let span = lparen.span.to(con.span);
                    return Ok(Ty::Con { args, con, span });
                }
                let rparen = self.expect_kw(Keyword::RParen)?;
                let span = lparen.span.to(rparen.span);
                Ok(Ty::Paren { lparen, inner: Box::new(first), rparen, span })
            }
            _ if Self::is_ident_like(&tok) => {
                let con = self.parse_long_id()?;
                Ok(Ty::Con { args: Vec::new(), span: con.span, con })
            }
            _ => Err(ParseError::ExpectedProduction { what: "a type".to_string(), span: tok.span }),
        }
    }

    fn parse_ty_row_seq(&mut self) -> PResult<SyntaxSeq<TyRow>> {
        if self.check_kw(Keyword::RBrace) {
            return Ok(SyntaxSeq::Empty);
        }
        let first = self.parse_ty_row()?;
        let mut rest = Vec::new();
        while self.check_kw(Keyword::Comma) {
            let comma = self.advance();
            rest.push((comma, self.parse_ty_row()?));
        }
        Ok(if rest.is_empty() { SyntaxSeq::One(first) } else { SyntaxSeq::Many { first: Box::new(first), rest } })
    }

    fn parse_ty_row(&mut self) -> PResult<TyRow> {
        let label = self.label()?;
        let colon = self.expect_kw(Keyword::Colon)?;
        let ty = self.parse_ty()?;
        Ok(TyRow { label, colon, ty })
    }

    /// Applies zero or more bare type constructors postfix, e.g. `int list
    /// option`, left-associatively.
    fn parse_ty_con_chain(&mut self) -> PResult<Ty> {
        let mut ty = self.parse_atomic_ty()?;
        while Self::is_ident_like(self.current()) {
            let con = self.parse_long_id()?;
            let span = ty.span().to(con.span);
            ty = Ty::Con { args: vec![ty], con, span };
        }
        Ok(ty)
    }

    fn parse_ty_tuple(&mut self) -> PResult<Ty> {
        let first = self.parse_ty_con_chain()?;
        if !self.check_kw(Keyword::Star) {
            return Ok(first);
        }
        let mut elems = vec![first];
        let mut stars = Vec::new();
        while self.check_kw(Keyword::Star) {
            stars.push(self.advance());
            elems.push(self.parse_ty_con_chain()?);
        }
        let span = elems.first().unwrap().span().to(elems.last().unwrap().span());
        Ok(Ty::Tuple { elems, stars, span })
    }

    pub fn parse_ty(&mut self) -> PResult<Ty> {
        let left = self.parse_ty_tuple()?;
        if self.check_kw(Keyword::Arrow) {
            let arrow = self.advance();
            let right = self.parse_ty()?;
            let span = left.span().to(right.span());
            return Ok(Ty::Arrow { from: Box::new(left), arrow, to: Box::new(right), span });
        }
        Ok(left)
    }

    fn parse_tyvar_seq(&mut self) -> PResult<SyntaxSeq<Token>> {
        if matches!(self.current().kind, TokenKind::TyVar) {
            return Ok(SyntaxSeq::One(self.advance()));
        }
        if self.check_kw(Keyword::LParen) && matches!(self.peek(1).kind, TokenKind::TyVar) {
            self.advance();
            let first = self.advance();
            let mut rest = Vec::new();
            while self.check_kw(Keyword::Comma) {
                let comma = self.advance();
                if !matches!(self.current().kind, TokenKind::TyVar) {
                    return Err(ParseError::ExpectedProduction { what: "a type variable".to_string(), span: self.current().span });
                }
                rest.push((comma, self.advance()));
            }
            self.expect_kw(Keyword::RParen)?;
            return Ok(if rest.is_empty() { SyntaxSeq::One(first) } else { SyntaxSeq::Many { first: Box::new(first), rest } });
        }
        Ok(SyntaxSeq::Empty)
    }

    // -- patterns -------------------------------------------------------

    fn is_atpat_start(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Keyword(Keyword::Underscore)
                | TokenKind::IntLit
                | TokenKind::WordLit
                | TokenKind::RealLit
                | TokenKind::CharLit
                | TokenKind::StringLit
                | TokenKind::Keyword(Keyword::LParen)
                | TokenKind::Keyword(Keyword::LBracket)
                | TokenKind::Keyword(Keyword::LBrace)
                | TokenKind::Keyword(Keyword::Op)
        ) || Self::is_ident_like(self.current())
    }

    fn parse_atomic_pat(&mut self) -> PResult<Pat> {
        let tok = self.current().clone();
        match &tok.kind {
            TokenKind::Keyword(Keyword::Underscore) => {
                self.advance();
                Ok(Pat::Wildcard { span: tok.span, token: tok })
            }
            TokenKind::IntLit | TokenKind::WordLit | TokenKind::RealLit | TokenKind::CharLit | TokenKind::StringLit => {
                self.advance();
                Ok(Pat::Const { span: tok.span, token: tok })
            }
            TokenKind::Keyword(Keyword::LParen) => {
                let lparen = self.advance();
                if self.check_kw(Keyword::RParen) {
                    let rparen = self.advance();
                    return Ok(Pat::Tuple { span: lparen.span.to(rparen.span), lparen, elems: Vec::new(), commas: Vec::new(), rparen });
                }
                let first = self.parse_pat()?;
                if self.check_kw(Keyword::Comma) {
                    let mut elems = vec![first];
                    let mut commas = Vec::new();
                    while self.check_kw(Keyword::Comma) {
                        commas.push(self.advance());
                        elems.push(self.parse_pat()?);
                    }
                    let rparen = self.expect_kw(Keyword::RParen)?;
                    let span = lparen.span.to(rparen.span);
                    return Ok(Pat::Tuple { lparen, elems, commas, rparen, span });
                }
                let rparen = self.expect_kw(Keyword::RParen)?;
                let span = lparen.span.to(rparen.span);
                Ok(Pat::Paren { lparen, inner: Box::new(first), rparen, span })
            }
            TokenKind::Keyword(Keyword::LBracket) => {
                let lbracket = self.advance();
                let mut elems = Vec::new();
                let mut commas = Vec::new();
                if !self.check_kw(Keyword::RBracket) {
                    elems.push(self.parse_pat()?);
                    while self.check_kw(Keyword::Comma) {
                        commas.push(self.advance());
                        elems.push(self.parse_pat()?);
                    }
                }
                let rbracket = self.expect_kw(Keyword::RBracket)?;
                Ok(Pat::List { span: lbracket.span.to(rbracket.span), lbracket, elems, commas, rbracket })
            }
            TokenKind::Keyword(Keyword::LBrace) => {
                let lbrace = self.advance();
                let (rows, flexible) = self.parse_pat_row_seq()?;
                let rbrace = self.expect_kw(Keyword::RBrace)?;
                Ok(Pat::Record { span: lbrace.span.to(rbrace.span), lbrace, rows, flexible, rbrace })
            }
            TokenKind::Keyword(Keyword::Op) => {
                let op = self.advance();
                let id = self.parse_long_id()?;
                let span = op.span.to(id.span);
                Ok(Pat::Var { op: Some(op), id, span })
            }
            _ if Self::is_ident_like(&tok) => {
                let id = self.parse_long_id()?;
                Ok(Pat::Var { op: None, span: id.span, id })
            }
            _ => Err(ParseError::ExpectedProduction { what: "a pattern".to_string(), span: tok.span }),
        }
    }

    fn parse_pat_row_seq(&mut self) -> PResult<(SyntaxSeq<PatRow>, Option<(Option<Token>, Token)>)> {
        if self.check_kw(Keyword::Ellipsis) {
            return Ok((SyntaxSeq::Empty, Some((None, self.advance()))));
        }
        if self.check_kw(Keyword::RBrace) {
            return Ok((SyntaxSeq::Empty, None));
        }
        let first = self.parse_pat_row()?;
        let mut rest = Vec::new();
        let mut flexible = None;
        while self.check_kw(Keyword::Comma) {
            let comma = self.advance();
            if self.check_kw(Keyword::Ellipsis) {
                flexible = Some((Some(comma), self.advance()));
                break;
            }
            rest.push((comma, self.parse_pat_row()?));
        }
        let seq = if rest.is_empty() { SyntaxSeq::One(first) } else { SyntaxSeq::Many { first: Box::new(first), rest } };
        Ok((seq, flexible))
    }

    fn parse_pat_row(&mut self) -> PResult<PatRow> {
        let label = self.label()?;
        let start = label.token.span;
        if self.check_kw(Keyword::Equals) {
            let eq = self.advance();
            let pat = self.parse_pat()?;
            let span = start.to(pat.span());
            return Ok(PatRow::Field { label, pat: Some((eq, pat)), span });
        }
        Ok(PatRow::Field { span: start, label, pat: None })
    }

    /// One-or-more atomic patterns applied as a constructor pattern, e.g.
    /// `SOME x`, `op :: (x, xs)`.
    fn parse_app_pat(&mut self) -> PResult<Pat> {
        let op = self.match_kw(Keyword::Op);
        let first = if op.is_some() {
            let id = self.parse_long_id()?;
            if self.is_atpat_start() {
                let arg = self.parse_atomic_pat()?;
                let span = op.as_ref().unwrap().span.to(arg.span());
                Pat::Con { op, con: id, arg: Box::new(arg), span }
            } else {
                let span = op.as_ref().unwrap().span.to(id.span);
                Pat::Var { op, span, id }
            }
        } else {
            self.parse_atomic_pat()?
        };

        if let Pat::Var { op: None, id, .. } = &first {
            if !id.is_qualified() && self.is_atpat_start() && looks_like_constructor(&id.last) {
                let id = id.clone();
                let arg = self.parse_atomic_pat()?;
                let span = id.span.to(arg.span());
                return Ok(Pat::Con { op: None, con: id, arg: Box::new(arg), span });
            }
        }
        Ok(first)
    }

    fn parse_infix_pat(&mut self) -> PResult<Pat> {
        let mut left = self.parse_app_pat()?;
        loop {
            let is_infix_vid = Self::is_ident_like(self.current()) && self.fixity.is_infix(self.current().text.as_str());
            if !is_infix_vid {
                break;
            }
            let con = self.advance();
            let right = self.parse_app_pat()?;
            let span = left.span().to(right.span());
            left = Pat::Infix { left: Box::new(left), con, right: Box::new(right), span };
        }
        Ok(left)
    }

    pub fn parse_pat(&mut self) -> PResult<Pat> {
        let pat = self.parse_infix_pat()?;
        if let Some(colon) = self.match_kw(Keyword::Colon) {
            let ty = self.parse_ty()?;
            let span = pat.span().to(ty.span());
            return Ok(Pat::Typed { pat: Box::new(pat), colon, ty, span });
        }
        if self.check_kw(Keyword::As) {
            if let Pat::Var { op, id, .. } = &pat {
                let op = op.clone();
                let var = id.last.clone();
                let as_ = self.advance();
                let inner = self.parse_pat()?;
                let span = pat.span().to(inner.span());
                return Ok(Pat::Layered { op, var, ty: None, as_, pat: Box::new(inner), span });
            }
        }
        Ok(pat)
    }

    // -- expressions ------------------------------------------------------

    fn is_atexp_start(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::IntLit
                | TokenKind::WordLit
                | TokenKind::RealLit
                | TokenKind::CharLit
                | TokenKind::StringLit
                | TokenKind::Keyword(Keyword::LParen)
                | TokenKind::Keyword(Keyword::LBracket)
                | TokenKind::Keyword(Keyword::LBrace)
                | TokenKind::Keyword(Keyword::Hash)
                | TokenKind::Keyword(Keyword::Op)
                | TokenKind::Keyword(Keyword::Let)
        ) || Self::is_ident_like(self.current())
    }

    fn parse_atomic_exp(&mut self) -> PResult<Exp> {
        let tok = self.current().clone();
        match &tok.kind {
            TokenKind::IntLit | TokenKind::WordLit | TokenKind::RealLit | TokenKind::CharLit | TokenKind::StringLit => {
                self.advance();
                Ok(Exp::Const { span: tok.span, token: tok })
            }
            TokenKind::Keyword(Keyword::Hash) => {
                let hash = self.advance();
                let label = self.label()?;
                let exp = self.parse_atomic_exp()?;
                let span = hash.span.to(exp.span());
                Ok(Exp::Select { hash, label, exp: Box::new(exp), span })
            }
            TokenKind::Keyword(Keyword::Op) => {
                let op = self.advance();
                let id = self.parse_long_id()?;
                let span = op.span.to(id.span);
                Ok(Exp::Var { op: Some(op), span, id })
            }
            TokenKind::Keyword(Keyword::LBrace) => {
                let lbrace = self.advance();
                let rows = self.parse_exp_row_seq()?;
                let rbrace = self.expect_kw(Keyword::RBrace)?;
                Ok(Exp::Record { span: lbrace.span.to(rbrace.span), lbrace, rows, rbrace })
            }
            TokenKind::Keyword(Keyword::LBracket) => {
                let lbracket = self.advance();
                let mut elems = Vec::new();
                let mut commas = Vec::new();
                if !self.check_kw(Keyword::RBracket) {
                    elems.push(self.parse_exp()?);
                    while self.check_kw(Keyword::Comma) {
                        commas.push(self.advance());
                        elems.push(self.parse_exp()?);
                    }
                }
                let rbracket = self.expect_kw(Keyword::RBracket)?;
                Ok(Exp::List { span: lbracket.span.to(rbracket.span), lbracket, elems, commas, rbracket })
            }
            TokenKind::Keyword(Keyword::LParen) => {
                let lparen = self.advance();
                if self.check_kw(Keyword::RParen) {
                    let rparen = self.advance();
                    return Ok(Exp::Tuple { span: lparen.span.to(rparen.span), lparen, elems: Vec::new(), commas: Vec::new(), rparen });
                }
                let first = self.parse_exp()?;
                if self.check_kw(Keyword::Comma) {
                    let mut elems = vec![first];
                    let mut commas = Vec::new();
                    while self.check_kw(Keyword::Comma) {
                        commas.push(self.advance());
                        elems.push(self.parse_exp()?);
                    }
                    let rparen = self.expect_kw(Keyword::RParen)?;
                    let span = lparen.span.to(rparen.span);
                    return Ok(Exp::Tuple { lparen, elems, commas, rparen, span });
                }
                if self.check_kw(Keyword::Semicolon) {
                    let mut elems = vec![first];
                    let mut semis = Vec::new();
                    while self.check_kw(Keyword::Semicolon) {
                        semis.push(self.advance());
                        elems.push(self.parse_exp()?);
                    }
                    let rparen = self.expect_kw(Keyword::RParen)?;
                    let span = lparen.span.to(rparen.span);
                    return Ok(Exp::Seq { lparen, elems, semis, rparen, span });
                }
                let rparen = self.expect_kw(Keyword::RParen)?;
                let span = lparen.span.to(rparen.span);
                Ok(Exp::Paren { lparen, inner: Box::new(first), rparen, span })
            }
            TokenKind::Keyword(Keyword::Let) => {
                let let_ = self.advance();
                let decs = self.parse_dec_seq()?;
                let in_ = self.expect_kw(Keyword::In)?;
                let mut body = vec![self.parse_exp()?];
                let mut semis = Vec::new();
                while self.check_kw(Keyword::Semicolon) {
                    semis.push(self.advance());
                    body.push(self.parse_exp()?);
                }
                let end = self.expect_kw(Keyword::End)?;
                Ok(Exp::Let { span: let_.span.to(end.span), let_, decs, in_, body, semis, end })
            }
            _ if Self::is_ident_like(&tok) => {
                let id = self.parse_long_id()?;
                Ok(Exp::Var { op: None, span: id.span, id })
            }
            _ => Err(ParseError::ExpectedProduction { what: "an expression".to_string(), span: tok.span }),
        }
    }

    fn parse_exp_row_seq(&mut self) -> PResult<SyntaxSeq<ExpRow>> {
        if self.check_kw(Keyword::RBrace) {
            return Ok(SyntaxSeq::Empty);
        }
        let first = self.parse_exp_row()?;
        let mut rest = Vec::new();
        while self.check_kw(Keyword::Comma) {
            let comma = self.advance();
            rest.push((comma, self.parse_exp_row()?));
        }
        Ok(if rest.is_empty() { SyntaxSeq::One(first) } else { SyntaxSeq::Many { first: Box::new(first), rest } })
    }

    fn parse_exp_row(&mut self) -> PResult<ExpRow> {
        let label = self.label()?;
        let eq = self.expect_kw(Keyword::Equals)?;
        let exp = self.parse_exp()?;
        Ok(ExpRow { label, eq, exp })
    }

    fn parse_appexp(&mut self) -> PResult<Exp> {
        let mut left = self.parse_atomic_exp()?;
        while self.is_atexp_start() {
            let arg = self.parse_atomic_exp()?;
            let span = left.span().to(arg.span());
            left = Exp::App { func: Box::new(left), arg: Box::new(arg), span };
        }
        Ok(left)
    }

    fn current_is_infix_op(&self) -> bool {
        Self::is_ident_like(self.current()) && self.fixity.is_infix(self.current().text.as_str())
    }

    fn parse_infexp(&mut self, min_prec: u8) -> PResult<Exp> {
        let mut left = self.parse_appexp()?;
        let mut last: Option<(u8, Assoc)> = None;
        loop {
            if !self.current_is_infix_op() {
                break;
            }
            let fixity = self.fixity.lookup(self.current().text.as_str()).unwrap();
            if fixity.precedence < min_prec {
                break;
            }
            if let Some((last_prec, last_assoc)) = last {
                if last_prec == fixity.precedence && last_assoc != fixity.assoc {
                    return Err(ParseError::UnbalancedFixity { span: self.current().span });
                }
            }
            let op = self.advance();
            let next_min = match fixity.assoc {
                Assoc::Left => fixity.precedence + 1,
                Assoc::Right => fixity.precedence,
            };
            let right = self.parse_infexp(next_min)?;
            let span = left.span().to(right.span());
            last = Some((fixity.precedence, fixity.assoc));
            left = Exp::Infix { left: Box::new(left), op, right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_typed_exp(&mut self) -> PResult<Exp> {
        let exp = self.parse_infexp(0)?;
        if let Some(colon) = self.match_kw(Keyword::Colon) {
            let ty = self.parse_ty()?;
            let span = exp.span().to(ty.span());
            return Ok(Exp::Typed { exp: Box::new(exp), colon, ty, span });
        }
        Ok(exp)
    }

    fn parse_andalso_exp(&mut self) -> PResult<Exp> {
        let mut left = self.parse_typed_exp()?;
        while self.check_kw(Keyword::Andalso) {
            let kw = self.advance();
            let right = self.parse_typed_exp()?;
            let span = left.span().to(right.span());
            left = Exp::Andalso { left: Box::new(left), kw, right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_orelse_exp(&mut self) -> PResult<Exp> {
        let mut left = self.parse_andalso_exp()?;
        while self.check_kw(Keyword::Orelse) {
            let kw = self.advance();
            let right = self.parse_andalso_exp()?;
            let span = left.span().to(right.span());
            left = Exp::Orelse { left: Box::new(left), kw, right: Box::new(right), span };
        }
        Ok(left)
    }

    pub fn parse_exp(&mut self) -> PResult<Exp> {
        let tok = self.current().clone();
        let mut exp = match tok.kind {
            TokenKind::Keyword(Keyword::Raise) => {
                let raise = self.advance();
                let inner = self.parse_exp()?;
                let span = raise.span.to(inner.span());
                Exp::Raise { raise, exp: Box::new(inner), span }
            }
            TokenKind::Keyword(Keyword::If) => {
                let if_ = self.advance();
                let cond = self.parse_exp()?;
                let then_ = self.expect_kw(Keyword::Then)?;
                let conseq = self.parse_exp()?;
                let else_ = self.expect_kw(Keyword::Else)?;
                let alt = self.parse_exp()?;
                let span = if_.span.to(alt.span());
                Exp::If { if_, cond: Box::new(cond), then_, conseq: Box::new(conseq), else_, alt: Box::new(alt), span }
            }
            TokenKind::Keyword(Keyword::While) => {
                let while_ = self.advance();
                let cond = self.parse_exp()?;
                let do_ = self.expect_kw(Keyword::Do)?;
                let body = self.parse_exp()?;
                let span = while_.span.to(body.span());
                Exp::While { while_, cond: Box::new(cond), do_, body: Box::new(body), span }
            }
            TokenKind::Keyword(Keyword::Case) => {
                let case_ = self.advance();
                let scrutinee = self.parse_exp()?;
                let of_ = self.expect_kw(Keyword::Of)?;
                let match_ = self.parse_match()?;
                let span = case_.span.to(match_.span);
                Exp::Case { case_, exp: Box::new(scrutinee), of_, match_, span }
            }
            TokenKind::Keyword(Keyword::Fn) => {
                let fn_ = self.advance();
                let match_ = self.parse_match()?;
                let span = fn_.span.to(match_.span);
                Exp::Fn { fn_, match_, span }
            }
            _ => self.parse_orelse_exp()?,
        };
        while self.check_kw(Keyword::Handle) {
            let handle = self.advance();
            let match_ = self.parse_match()?;
            let span = exp.span().to(match_.span);
            exp = Exp::Handle { exp: Box::new(exp), handle, match_, span };
        }
        Ok(exp)
    }

    fn parse_match(&mut self) -> PResult<Match> {
        let mut arms = Vec::new();
        let bar = None;
        let pat = self.parse_pat()?;
        let arrow = self.expect_kw(Keyword::DArrow)?;
        let exp = self.parse_exp()?;
        let start = pat.span();
        let mut last_span = exp.span();
        arms.push(MatchArm { bar, pat, arrow, exp });
        while self.check_kw(Keyword::Bar) {
            let bar = Some(self.advance());
            let pat = self.parse_pat()?;
            let arrow = self.expect_kw(Keyword::DArrow)?;
            let exp = self.parse_exp()?;
            last_span = exp.span();
            arms.push(MatchArm { bar, pat, arrow, exp });
        }
        Ok(Match { span: start.to(last_span), arms })
    }

    // -- declarations -----------------------------------------------------

    fn is_dec_start(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Keyword(Keyword::Val)
                | TokenKind::Keyword(Keyword::Fun)
                | TokenKind::Keyword(Keyword::Type)
                | TokenKind::Keyword(Keyword::Datatype)
                | TokenKind::Keyword(Keyword::Abstype)
                | TokenKind::Keyword(Keyword::Exception)
                | TokenKind::Keyword(Keyword::Local)
                | TokenKind::Keyword(Keyword::Open)
                | TokenKind::Keyword(Keyword::Infix)
                | TokenKind::Keyword(Keyword::Infixr)
                | TokenKind::Keyword(Keyword::Nonfix)
        )
    }

    pub fn parse_dec_seq(&mut self) -> PResult<Vec<Dec>> {
        let mut decs = Vec::new();
        while self.is_dec_start() || self.check_kw(Keyword::Semicolon) {
            if self.match_kw(Keyword::Semicolon).is_some() {
                continue;
            }
            decs.push(self.parse_one_dec()?);
        }
        Ok(decs)
    }

    fn parse_one_dec(&mut self) -> PResult<Dec> {
        let tok = self.current().clone();
        match tok.kind {
            TokenKind::Keyword(Keyword::Val) => self.parse_val_dec(),
            TokenKind::Keyword(Keyword::Fun) => self.parse_fun_dec(),
            TokenKind::Keyword(Keyword::Type) => self.parse_type_dec(),
            TokenKind::Keyword(Keyword::Datatype) => self.parse_datatype_dec(),
            TokenKind::Keyword(Keyword::Abstype) => self.parse_abstype_dec(),
            TokenKind::Keyword(Keyword::Exception) => self.parse_exception_dec(),
            TokenKind::Keyword(Keyword::Local) => self.parse_local_dec(),
            TokenKind::Keyword(Keyword::Open) => self.parse_open_dec(),
            TokenKind::Keyword(Keyword::Infix) | TokenKind::Keyword(Keyword::Infixr) | TokenKind::Keyword(Keyword::Nonfix) => {
                self.parse_fixity_dec()
            }
            _ => Err(ParseError::ExpectedProduction { what: "a declaration".to_string(), span: tok.span }),
        }
    }

    fn parse_val_dec(&mut self) -> PResult<Dec> {
        let val = self.advance();
        let tyvars = self.parse_tyvar_seq()?;
        let mut bindings = vec![self.parse_val_bind()?];
        let mut ands = Vec::new();
        while self.check_kw(Keyword::And) {
            ands.push(self.advance());
            bindings.push(self.parse_val_bind()?);
        }
        let span = val.span.to(bindings.last().unwrap().exp.span());
        Ok(Dec::Val { val, tyvars, bindings, ands, span })
    }

    fn parse_val_bind(&mut self) -> PResult<ValBind> {
        let rec = self.match_kw(Keyword::Rec);
        let pat = self.parse_pat()?;
        let eq = self.expect_kw(Keyword::Equals)?;
        let exp = self.parse_exp()?;
        Ok(ValBind { rec, pat, eq, exp })
    }

    fn parse_fun_dec(&mut self) -> PResult<Dec> {
        let fun = self.advance();
        let tyvars = self.parse_tyvar_seq()?;
        let mut bindings = vec![self.parse_fun_bind()?];
        let mut ands = Vec::new();
        while self.check_kw(Keyword::And) {
            ands.push(self.advance());
            bindings.push(self.parse_fun_bind()?);
        }
        let last_clause = bindings.last().unwrap().clauses.last().unwrap();
        let span = fun.span.to(last_clause.exp.span());
        Ok(Dec::Fun { fun, tyvars, bindings, ands, span })
    }

    fn parse_fun_bind(&mut self) -> PResult<FunBind> {
        let mut clauses = vec![self.parse_fun_clause(None)?];
        while self.check_kw(Keyword::Bar) {
            let bar = self.advance();
            clauses.push(self.parse_fun_clause(Some(bar))?);
        }
        let name = clauses[0].name.text.as_str().to_string();
        let arity = clauses[0].args.len();
        for clause in &clauses[1..] {
            if clause.name.text.as_str() != name {
                self.errors.push(ParseError::FunClauseNameMismatch {
                    expected: name.clone(),
                    found: clause.name.text.as_str().to_string(),
                    span: clause.name.span,
                });
            }
            if clause.args.len() != arity {
                self.errors.push(ParseError::FunClauseArityMismatch { name: name.clone(), span: clause.name.span });
            }
        }
        Ok(FunBind { clauses })
    }

    /// One `[op] name pat1 ... patn [: ty] = exp` clause. A clause may also
    /// be written with the function name infix between its first two
    /// arguments (`x ++ y = ...`); that form isn't distinguished here from
    /// plain prefix clauses since the printer reconstructs it from the
    /// original tokens either way.
    fn parse_fun_clause(&mut self, bar: Option<Token>) -> PResult<FunClause> {
        let op = self.match_kw(Keyword::Op);
        let name = self.expect_vid()?;
        let mut args = Vec::new();
        while self.is_atpat_start() {
            args.push(self.parse_atomic_pat()?);
        }
        let ty = if let Some(colon) = self.match_kw(Keyword::Colon) { Some((colon, self.parse_ty()?)) } else { None };
        let eq = self.expect_kw(Keyword::Equals)?;
        let exp = self.parse_exp()?;
        Ok(FunClause { bar, op, name, args, ty, eq, exp })
    }

    fn parse_type_dec(&mut self) -> PResult<Dec> {
        let type_ = self.advance();
        let mut bindings = vec![self.parse_typ_bind()?];
        let mut ands = Vec::new();
        while self.check_kw(Keyword::And) {
            ands.push(self.advance());
            bindings.push(self.parse_typ_bind()?);
        }
        let span = type_.span.to(bindings.last().unwrap().ty.span());
        Ok(Dec::Type { type_, bindings, ands, span })
    }

    fn parse_typ_bind(&mut self) -> PResult<TypBind> {
        let tyvars = self.parse_tyvar_seq()?;
        let con = self.expect_vid()?;
        let eq = self.expect_kw(Keyword::Equals)?;
        let ty = self.parse_ty()?;
        Ok(TypBind { tyvars, con, eq, ty })
    }

    fn parse_datatype_dec(&mut self) -> PResult<Dec> {
        let datatype = self.advance();
        // `datatype T = datatype LongT` replication form.
        if matches!(self.peek(1).kind, TokenKind::Keyword(Keyword::Equals)) && matches!(self.peek(2).kind, TokenKind::Keyword(Keyword::Datatype))
        {
            let con = self.expect_vid()?;
            let eq = self.expect_kw(Keyword::Equals)?;
            let rhs_kw = self.expect_kw(Keyword::Datatype)?;
            let rhs = self.parse_long_id()?;
            let span = datatype.span.to(rhs.span);
            return Ok(Dec::DatatypeRepl { datatype, con, eq, rhs_kw, rhs, span });
        }
        let mut bindings = vec![self.parse_dat_bind()?];
        let mut ands = Vec::new();
        while self.check_kw(Keyword::And) {
            ands.push(self.advance());
            bindings.push(self.parse_dat_bind()?);
        }
        let withtype = if let Some(kw) = self.match_kw(Keyword::Withtype) {
            let mut wbindings = vec![self.parse_typ_bind()?];
            while self.check_kw(Keyword::And) {
                self.advance();
                wbindings.push(self.parse_typ_bind()?);
            }
            Some((kw, wbindings))
        } else {
            None
        };
        let span = datatype.span.to(bindings.last().unwrap().con.span);
        Ok(Dec::Datatype { datatype, bindings, ands, withtype, span })
    }

    fn parse_dat_bind(&mut self) -> PResult<DatBind> {
        let tyvars = self.parse_tyvar_seq()?;
        let con = self.expect_vid()?;
        let eq = self.expect_kw(Keyword::Equals)?;
        let mut constructors = vec![self.parse_con_bind()?];
        let mut bars = Vec::new();
        while self.check_kw(Keyword::Bar) {
            bars.push(self.advance());
            constructors.push(self.parse_con_bind()?);
        }
        Ok(DatBind { tyvars, con, eq, constructors, bars })
    }

    fn parse_con_bind(&mut self) -> PResult<ConBind> {
        let op = self.match_kw(Keyword::Op);
        let con = self.expect_vid()?;
        let of_ty = if let Some(of) = self.match_kw(Keyword::Of) { Some((of, self.parse_ty()?)) } else { None };
        Ok(ConBind { op, con, of_ty })
    }

    fn parse_abstype_dec(&mut self) -> PResult<Dec> {
        let abstype = self.advance();
        let mut bindings = vec![self.parse_dat_bind()?];
        while self.check_kw(Keyword::And) {
            self.advance();
            bindings.push(self.parse_dat_bind()?);
        }
        let withtype = if let Some(kw) = self.match_kw(Keyword::Withtype) {
            let mut wbindings = vec![self.parse_typ_bind()?];
            while self.check_kw(Keyword::And) {
                self.advance();
                wbindings.push(self.parse_typ_bind()?);
            }
            Some((kw, wbindings))
        } else {
            None
        };
        let with = self.expect_kw(Keyword::With)?;
        let decs = self.parse_dec_seq()?;
        let end = self.expect_kw(Keyword::End)?;
        let span = abstype.span.to(end.span);
        Ok(Dec::Abstype { abstype, bindings, withtype, with, decs, end, span })
    }

    fn parse_exception_dec(&mut self) -> PResult<Dec> {
        let exception = self.advance();
        let mut bindings = vec![self.parse_ex_bind()?];
        let mut ands = Vec::new();
        while self.check_kw(Keyword::And) {
            ands.push(self.advance());
            bindings.push(self.parse_ex_bind()?);
        }
        let span = exception.span;
        Ok(Dec::Exception { exception, bindings, ands, span })
    }

    fn parse_ex_bind(&mut self) -> PResult<ExBind> {
        let op = self.match_kw(Keyword::Op);
        let con = self.expect_vid()?;
        if let Some(eq) = self.match_kw(Keyword::Equals) {
            let rhs_op = self.match_kw(Keyword::Op);
            let rhs = self.parse_long_id()?;
            return Ok(ExBind::Alias { op, con, eq, rhs_op, rhs });
        }
        let of_ty = if let Some(of) = self.match_kw(Keyword::Of) { Some((of, self.parse_ty()?)) } else { None };
        Ok(ExBind::New { op, con, of_ty })
    }

    fn parse_local_dec(&mut self) -> PResult<Dec> {
        let local = self.advance();
        self.fixity.push_frame();
        let decs1 = self.parse_dec_seq()?;
        let in_ = self.expect_kw(Keyword::In)?;
        let decs2 = self.parse_dec_seq()?;
        let end = self.expect_kw(Keyword::End)?;
        self.fixity.pop_frame();
        let span = local.span.to(end.span);
        Ok(Dec::Local { local, decs1, in_, decs2, end, span })
    }

    fn parse_open_dec(&mut self) -> PResult<Dec> {
        let open = self.advance();
        let mut ids = vec![self.parse_long_id()?];
        while Self::is_ident_like(self.current()) {
            ids.push(self.parse_long_id()?);
        }
        let span = open.span.to(ids.last().unwrap().span);
        Ok(Dec::Open { open, ids, span })
    }

    fn parse_fixity_dec(&mut self) -> PResult<Dec> {
        let kw_tok = self.current().clone();
        let decl = match kw_tok.kind {
            TokenKind::Keyword(Keyword::Nonfix) => {
                let kw = self.advance();
                let vids = self.parse_vid_list()?;
                Fixity::Nonfix { kw, vids }
            }
            TokenKind::Keyword(Keyword::Infixr) => {
                let kw = self.advance();
                let precedence = self.match_int_literal();
                let vids = self.parse_vid_list()?;
                for vid in &vids {
                    self.fixity.declare(vid.text.as_str(), crate::fixity::Fixity { precedence: precedence_value(&precedence), assoc: Assoc::Right });
                }
                Fixity::Infixr { kw, precedence, vids }
            }
            _ => {
                let kw = self.advance();
                let precedence = self.match_int_literal();
                let vids = self.parse_vid_list()?;
                for vid in &vids {
                    self.fixity.declare(vid.text.as_str(), crate::fixity::Fixity { precedence: precedence_value(&precedence), assoc: Assoc::Left });
                }
                Fixity::Infix { kw, precedence, vids }
            }
        };
        if let Fixity::Nonfix { vids, .. } = &decl {
            for vid in vids {
                self.fixity.declare_nonfix(vid.text.as_str());
            }
        }
        let last_vid_span = match &decl {
            Fixity::Infix { vids, .. } | Fixity::Infixr { vids, .. } | Fixity::Nonfix { vids, .. } => {
                vids.last().map(|t| t.span).unwrap_or(kw_tok.span)
            }
        };
        let span = kw_tok.span.to(last_vid_span);
        Ok(Dec::Fixity { decl, span })
    }

    fn match_int_literal(&mut self) -> Option<Token> {
        if matches!(self.current().kind, TokenKind::IntLit) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn parse_vid_list(&mut self) -> PResult<Vec<Token>> {
        let mut vids = vec![self.expect_vid()?];
        while Self::is_ident_like(self.current()) {
            vids.push(self.expect_vid()?);
        }
        Ok(vids)
    }

    // -- signatures, structures, functors -----------------------------------

    pub fn parse_spec_seq(&mut self) -> PResult<Spec> {
        let mut specs = Vec::new();
        loop {
            match self.current().kind {
                TokenKind::Keyword(Keyword::Val) => specs.push(self.parse_val_spec()?),
                TokenKind::Keyword(Keyword::Type) => specs.push(self.parse_type_spec(false)?),
                TokenKind::Keyword(Keyword::Eqtype) => specs.push(self.parse_type_spec(true)?),
                TokenKind::Keyword(Keyword::Datatype) => specs.push(self.parse_datatype_spec()?),
                TokenKind::Keyword(Keyword::Exception) => specs.push(self.parse_exception_spec()?),
                TokenKind::Keyword(Keyword::Structure) => specs.push(self.parse_structure_spec()?),
                TokenKind::Keyword(Keyword::Include) => specs.push(self.parse_include_spec()?),
                TokenKind::Keyword(Keyword::Sharing) => {
                    let last = specs.pop().unwrap_or(Spec::Empty { span: self.current().span });
                    specs.push(self.parse_sharing_spec(last)?);
                }
                TokenKind::Keyword(Keyword::Semicolon) => {
                    self.advance();
                }
                _ => break,
            }
        }
        if specs.is_empty() {
            return Ok(Spec::Empty { span: self.current().span });
        }
        if specs.len() == 1 {
            return Ok(specs.into_iter().next().unwrap());
        }
        let span = specs.first().unwrap().span().to(specs.last().unwrap().span());
        Ok(Spec::Seq { specs, span })
    }

    fn parse_val_spec(&mut self) -> PResult<Spec> {
        let val = self.advance();
        let mut descs = vec![self.parse_val_desc()?];
        let mut ands = Vec::new();
        while self.check_kw(Keyword::And) {
            ands.push(self.advance());
            descs.push(self.parse_val_desc()?);
        }
        let span = val.span.to(descs.last().unwrap().ty.span());
        Ok(Spec::Val { val, descs, ands, span })
    }

    fn parse_val_desc(&mut self) -> PResult<ValDesc> {
        let vid = self.expect_vid()?;
        let colon = self.expect_kw(Keyword::Colon)?;
        let ty = self.parse_ty()?;
        Ok(ValDesc { vid, colon, ty })
    }

    fn parse_type_spec(&mut self, eq: bool) -> PResult<Spec> {
        let kw = if eq { self.expect_kw(Keyword::Eqtype)? } else { self.expect_kw(Keyword::Type)? };
        let mut descs = vec![self.parse_typ_desc()?];
        let mut ands = Vec::new();
        while self.check_kw(Keyword::And) {
            ands.push(self.advance());
            descs.push(self.parse_typ_desc()?);
        }
        let span = kw.span;
        if eq {
            Ok(Spec::Eqtype { eqtype: kw, descs, ands, span })
        } else {
            Ok(Spec::Type { type_: kw, descs, ands, span })
        }
    }

    fn parse_typ_desc(&mut self) -> PResult<TypDesc> {
        let tyvars = self.parse_tyvar_seq()?;
        let con = self.expect_vid()?;
        Ok(TypDesc { tyvars, con })
    }

    fn parse_datatype_spec(&mut self) -> PResult<Spec> {
        let datatype = self.advance();
        let mut bindings = vec![self.parse_dat_bind()?];
        let mut ands = Vec::new();
        while self.check_kw(Keyword::And) {
            ands.push(self.advance());
            bindings.push(self.parse_dat_bind()?);
        }
        let span = datatype.span;
        Ok(Spec::Datatype { datatype, bindings, ands, span })
    }

    fn parse_exception_spec(&mut self) -> PResult<Spec> {
        let exception = self.advance();
        let mut descs = vec![self.parse_ex_desc()?];
        let mut ands = Vec::new();
        while self.check_kw(Keyword::And) {
            ands.push(self.advance());
            descs.push(self.parse_ex_desc()?);
        }
        let span = exception.span;
        Ok(Spec::Exception { exception, descs, ands, span })
    }

    fn parse_ex_desc(&mut self) -> PResult<ExDesc> {
        let con = self.expect_vid()?;
        let of_ty = if let Some(of) = self.match_kw(Keyword::Of) { Some((of, self.parse_ty()?)) } else { None };
        Ok(ExDesc { con, of_ty })
    }

    fn parse_structure_spec(&mut self) -> PResult<Spec> {
        let structure = self.advance();
        let mut descs = vec![self.parse_str_desc()?];
        let mut ands = Vec::new();
        while self.check_kw(Keyword::And) {
            ands.push(self.advance());
            descs.push(self.parse_str_desc()?);
        }
        let span = structure.span.to(descs.last().unwrap().sigexp.span());
        Ok(Spec::Structure { structure, descs, ands, span })
    }

    fn parse_str_desc(&mut self) -> PResult<StrDesc> {
        let strid = self.expect_vid()?;
        let colon = self.expect_kw(Keyword::Colon)?;
        let sigexp = self.parse_sigexp()?;
        Ok(StrDesc { strid, colon, sigexp })
    }

    fn parse_include_spec(&mut self) -> PResult<Spec> {
        let include = self.advance();
        let sigexp = self.parse_sigexp()?;
        let span = include.span.to(sigexp.span());
        Ok(Spec::Include { include, sigexp, span })
    }

    fn parse_sharing_spec(&mut self, prior: Spec) -> PResult<Spec> {
        let sharing = self.advance();
        self.expect_kw(Keyword::Type).ok();
        let mut ids = vec![self.parse_long_id()?];
        let mut eqs = Vec::new();
        while self.check_kw(Keyword::Equals) {
            eqs.push(self.advance());
            ids.push(self.parse_long_id()?);
        }
        let span = prior.span().to(ids.last().unwrap().span);
        Ok(Spec::Sharing { spec: Box::new(prior), sharing, ids, eqs, span })
    }

    pub fn parse_sigexp(&mut self) -> PResult<SigExp> {
        let base = match self.current().kind {
            TokenKind::Keyword(Keyword::Sig) => {
                let sig = self.advance();
                self.fixity.push_frame();
                let spec = self.parse_spec_seq()?;
                self.fixity.pop_frame();
                let end = self.expect_kw(Keyword::End)?;
                SigExp::Sig { span: sig.span.to(end.span), sig, spec: Box::new(spec), end }
            }
            _ => {
                let id = self.expect_vid()?;
                SigExp::Ident { span: id.span, id }
            }
        };
        if self.check_kw(Keyword::Where) {
            let where_ = self.advance();
            let type_ = self.expect_kw(Keyword::Type)?;
            let tyvars = self.parse_tyvar_seq()?;
            let con = self.parse_long_id()?;
            let eq = self.expect_kw(Keyword::Equals)?;
            let ty = self.parse_ty()?;
            let span = base.span().to(ty.span());
            return Ok(SigExp::Where { sigexp: Box::new(base), where_, type_, tyvars, con, eq, ty, span });
        }
        Ok(base)
    }

    pub fn parse_strexp(&mut self) -> PResult<StrExp> {
        let base = match self.current().kind {
            TokenKind::Keyword(Keyword::Struct) => {
                let struct_ = self.advance();
                self.fixity.push_frame();
                let decs = self.parse_strdec_seq()?;
                self.fixity.pop_frame();
                let end = self.expect_kw(Keyword::End)?;
                StrExp::Struct { span: struct_.span.to(end.span), struct_, decs, end }
            }
            TokenKind::Keyword(Keyword::Let) => {
                let let_ = self.advance();
                let decs = self.parse_strdec_seq()?;
                let in_ = self.expect_kw(Keyword::In)?;
                let strexp = self.parse_strexp()?;
                let end = self.expect_kw(Keyword::End)?;
                StrExp::Let { span: let_.span.to(end.span), let_, decs, in_, strexp: Box::new(strexp), end }
            }
            _ if Self::is_ident_like(self.current()) && matches!(self.peek(1).kind, TokenKind::Keyword(Keyword::LParen)) => {
                let functor = self.advance();
                let lparen = self.expect_kw(Keyword::LParen)?;
                let arg = self.parse_strexp()?;
                let rparen = self.expect_kw(Keyword::RParen)?;
                StrExp::FunctorApp { span: functor.span.to(rparen.span), functor, lparen, arg: Box::new(arg), rparen }
            }
            _ => {
                let id = self.parse_long_id()?;
                StrExp::Ident { span: id.span, id }
            }
        };
        if self.check_kw(Keyword::Colon) || self.check_kw(Keyword::ColonGt) {
            let opaque = self.check_kw(Keyword::ColonGt);
            let colon = self.advance();
            let sigexp = self.parse_sigexp()?;
            let span = base.span().to(sigexp.span());
            return Ok(StrExp::Constraint { strexp: Box::new(base), colon, opaque, sigexp, span });
        }
        Ok(base)
    }

    pub fn parse_strdec_seq(&mut self) -> PResult<Vec<StrDec>> {
        let mut decs = Vec::new();
        loop {
            if self.match_kw(Keyword::Semicolon).is_some() {
                continue;
            }
            if self.is_dec_start() {
                decs.push(StrDec::Dec(self.parse_one_dec()?));
            } else if self.check_kw(Keyword::Structure) {
                decs.push(self.parse_structure_dec()?);
            } else if self.check_kw(Keyword::Local) {
                decs.push(self.parse_strdec_local()?);
            } else {
                break;
            }
        }
        Ok(decs)
    }

    fn parse_structure_dec(&mut self) -> PResult<StrDec> {
        let structure = self.advance();
        let mut bindings = vec![self.parse_str_bind()?];
        let mut ands = Vec::new();
        while self.check_kw(Keyword::And) {
            ands.push(self.advance());
            bindings.push(self.parse_str_bind()?);
        }
        let span = structure.span.to(bindings.last().unwrap().strexp.span());
        Ok(StrDec::Structure { structure, bindings, ands, span })
    }

    fn parse_str_bind(&mut self) -> PResult<StrBind> {
        let strid = self.expect_vid()?;
        let constraint = self.parse_opt_sig_constraint()?;
        let eq = self.expect_kw(Keyword::Equals)?;
        let strexp = self.parse_strexp()?;
        Ok(StrBind { strid, constraint, eq, strexp })
    }

    fn parse_opt_sig_constraint(&mut self) -> PResult<Option<(Token, bool, SigExp)>> {
        if self.check_kw(Keyword::Colon) || self.check_kw(Keyword::ColonGt) {
            let opaque = self.check_kw(Keyword::ColonGt);
            let colon = self.advance();
            let sigexp = self.parse_sigexp()?;
            return Ok(Some((colon, opaque, sigexp)));
        }
        Ok(None)
    }

    fn parse_strdec_local(&mut self) -> PResult<StrDec> {
        let local = self.advance();
        self.fixity.push_frame();
        let decs1 = self.parse_strdec_seq()?;
        let in_ = self.expect_kw(Keyword::In)?;
        let decs2 = self.parse_strdec_seq()?;
        let end = self.expect_kw(Keyword::End)?;
        self.fixity.pop_frame();
        let span = local.span.to(end.span);
        Ok(StrDec::Local { local, decs1, in_, decs2, end, span })
    }

    fn parse_sigbind(&mut self) -> PResult<SigBind> {
        let sigid = self.expect_vid()?;
        let eq = self.expect_kw(Keyword::Equals)?;
        let sigexp = self.parse_sigexp()?;
        Ok(SigBind { sigid, eq, sigexp })
    }

    fn parse_funbind(&mut self) -> PResult<FunctorBind> {
        let funid = self.expect_vid()?;
        let lparen = self.expect_kw(Keyword::LParen)?;
        let strid = self.expect_vid()?;
        let colon = self.expect_kw(Keyword::Colon)?;
        let sigexp = self.parse_sigexp()?;
        let rparen = self.expect_kw(Keyword::RParen)?;
        let constraint = self.parse_opt_sig_constraint()?;
        let eq = self.expect_kw(Keyword::Equals)?;
        let strexp = self.parse_strexp()?;
        Ok(FunctorBind { funid, lparen, strid, colon, sigexp, rparen, constraint, eq, strexp })
    }

    // -- top level ----------------------------------------------------------

    pub fn parse_program(mut self) -> (Ast, Vec<ParseError>) {
        let start = self.current().span;
        let mut topdecs = Vec::new();
        let mut semis = Vec::new();
        while !self.is_at_end() {
            match self.parse_one_topdec() {
                Ok(topdec) => {
                    topdecs.push(topdec);
                    semis.push(self.match_kw(Keyword::Semicolon));
                }
                Err(err) => {
                    self.errors.push(err);
                    break;
                }
            }
        }
        let span = if let Some(last) = topdecs.last() { start.to(last.span()) } else { start };
        (Ast { topdecs, semis, span }, self.errors)
    }

    fn parse_one_topdec(&mut self) -> PResult<TopDec> {
        let tok = self.current().clone();
        match tok.kind {
            TokenKind::Keyword(Keyword::Structure) => {
                let structure = self.advance();
                let mut bindings = vec![self.parse_str_bind()?];
                let mut ands = Vec::new();
                while self.check_kw(Keyword::And) {
                    ands.push(self.advance());
                    bindings.push(self.parse_str_bind()?);
                }
                let span = structure.span.to(bindings.last().unwrap().strexp.span());
                Ok(TopDec::Str { structure, bindings, ands, span })
            }
            TokenKind::Keyword(Keyword::Signature) => {
                let signature = self.advance();
                let mut bindings = vec![self.parse_sigbind()?];
                let mut ands = Vec::new();
                while self.check_kw(Keyword::And) {
                    ands.push(self.advance());
                    bindings.push(self.parse_sigbind()?);
                }
                let span = signature.span.to(bindings.last().unwrap().sigexp.span());
                Ok(TopDec::Sig { signature, bindings, ands, span })
            }
            TokenKind::Keyword(Keyword::Functor) => {
                let functor = self.advance();
                let mut bindings = vec![self.parse_funbind()?];
                let mut ands = Vec::new();
                while self.check_kw(Keyword::And) {
                    ands.push(self.advance());
                    bindings.push(self.parse_funbind()?);
                }
                let span = functor.span.to(bindings.last().unwrap().strexp.span());
                Ok(TopDec::Functor { functor, bindings, ands, span })
            }
            _ => {
                let dec = if self.is_dec_start() {
                    StrDec::Dec(self.parse_one_dec()?)
                } else if self.check_kw(Keyword::Local) {
                    self.parse_strdec_local()?
                } else {
                    return Err(ParseError::ExpectedProduction { what: "a top-level declaration".to_string(), span: tok.span });
                };
                let span = match &dec {
                    StrDec::Dec(d) => d.span(),
                    StrDec::Structure { span, .. } | StrDec::Local { span, .. } | StrDec::Seq { span, .. } => *span,
                    StrDec::Empty { span } => *span,
                };
                Ok(TopDec::Core { dec, span })
            }
        }
    }
}

fn token_description(tok: &Token) -> String {
    format!("{:?}", tok.kind)
}

/// Constructor identifiers conventionally begin with an uppercase letter
/// (`SOME`, `NONE`, `::` notwithstanding — that one's handled by the infix
/// layer). Used only as a heuristic to decide whether a bare identifier
/// followed by another atomic pattern is a constructor application or two
/// separate patterns in a context where both would otherwise parse.
fn looks_like_constructor(tok: &Token) -> bool {
    tok.text.as_str().chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

fn precedence_value(tok: &Option<Token>) -> u8 {
    tok.as_ref().and_then(|t| t.text.as_str().parse().ok()).unwrap_or(0)
}
