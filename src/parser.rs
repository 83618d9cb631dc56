//! Recursive-descent statement parser with a precedence-climbing expression
//! parser (spec §4.2). Binding powers follow the four tiers the grammar
//! defines, lowest to highest:
//!
//! | Tier | Operators | Associativity |
//! |------|-----------|---------------|
//! | equality | `==`, `!=` | Left |
//! | comparison | `<`, `>`, `<=`, `>=` | Left |
//! | additive | `+`, `-` | Left |
//! | multiplicative | `*`, `/` | Left |
//!
//! Primaries are literals, names, calls, parenthesized expressions, and a
//! leading unary minus desugared to `0 - expr` (spec §9).

use crate::ast::*;
use crate::error::PyrustError;
use crate::lexer::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse_program(mut self) -> Result<Program, PyrustError> {
        let mut stmts = Vec::new();
        self.skip_semicolons();
        while !self.check(&TokenKind::Eof) {
            stmts.push(self.parse_stmt()?);
            self.skip_semicolons();
        }
        Ok(Program { stmts })
    }

    /// Parses exactly one statement, for REPL lines. The trailing `Eof` is
    /// left unconsumed only if callers want to check it; the REPL calls
    /// this on a token stream that already ends at `Eof`.
    pub fn parse_single_stmt(mut self) -> Result<Stmt, PyrustError> {
        self.parse_stmt()
    }

    // ------------------------------ Statements -------------------------------

    fn parse_stmt(&mut self) -> Result<Stmt, PyrustError> {
        match self.peek_kind() {
            TokenKind::Let => self.parse_let(),
            TokenKind::Fn => self.parse_fn_decl(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Print => self.parse_print(),
            TokenKind::Ident(_) if self.peek_kind_at(1) == Some(&TokenKind::Eq) => {
                self.parse_assign()
            }
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_let(&mut self) -> Result<Stmt, PyrustError> {
        let span = self.current_span();
        self.advance(); // `let`
        let mutable = self.match_kind(&TokenKind::Mut);
        let name = self.parse_ident()?;
        let declared_type = if self.match_kind(&TokenKind::Colon) {
            Some(self.parse_type_tag()?)
        } else {
            None
        };
        self.expect(&TokenKind::Eq, "'='")?;
        let init = self.parse_expr()?;
        Ok(Stmt::Let(LetStmt {
            name,
            mutable,
            declared_type,
            init,
            span,
        }))
    }

    fn parse_assign(&mut self) -> Result<Stmt, PyrustError> {
        let span = self.current_span();
        let name = self.parse_ident()?;
        self.expect(&TokenKind::Eq, "'='")?;
        let value = self.parse_expr()?;
        Ok(Stmt::Assign(AssignStmt { name, value, span }))
    }

    fn parse_fn_decl(&mut self) -> Result<Stmt, PyrustError> {
        let span = self.current_span();
        self.advance(); // `fn`
        let name = self.parse_ident()?;
        self.expect(&TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let pname = self.parse_ident()?;
                self.expect(&TokenKind::Colon, "':'")?;
                let ty = self.parse_type_tag()?;
                params.push(Param { name: pname, ty });
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "')'")?;
        let return_type = if self.match_kind(&TokenKind::Arrow) {
            Some(self.parse_type_tag()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(Stmt::FnDecl(FnDeclStmt {
            name,
            params,
            return_type,
            body,
            span,
        }))
    }

    fn parse_if(&mut self) -> Result<Stmt, PyrustError> {
        let span = self.current_span();
        self.advance(); // `if`
        let cond = self.parse_expr()?;
        let then_body = self.parse_block()?;
        let else_body = if self.match_kind(&TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::If(IfStmt {
            cond,
            then_body,
            else_body,
            span,
        }))
    }

    fn parse_while(&mut self) -> Result<Stmt, PyrustError> {
        let span = self.current_span();
        self.advance(); // `while`
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::While(WhileStmt { cond, body, span }))
    }

    /// A `return` takes an expression unless the next token starts a new
    /// statement or closes the enclosing block (spec §4.2's statement
    /// boundary rule).
    fn parse_return(&mut self) -> Result<Stmt, PyrustError> {
        let span = self.current_span();
        self.advance(); // `return`
        let value = if self.starts_new_statement_or_closes_block() {
            None
        } else {
            Some(self.parse_expr()?)
        };
        Ok(Stmt::Return(ReturnStmt { value, span }))
    }

    fn parse_print(&mut self) -> Result<Stmt, PyrustError> {
        let span = self.current_span();
        self.advance(); // `print`
        self.expect(&TokenKind::LParen, "'('")?;
        let value = self.parse_expr()?;
        self.expect(&TokenKind::RParen, "')'")?;
        Ok(Stmt::Print(PrintStmt { value, span }))
    }

    fn parse_expr_stmt(&mut self) -> Result<Stmt, PyrustError> {
        let span = self.current_span();
        let value = self.parse_expr()?;
        Ok(Stmt::Expr(ExprStmt { value, span }))
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, PyrustError> {
        self.expect(&TokenKind::LBrace, "'{'")?;
        let mut stmts = Vec::new();
        self.skip_semicolons();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Eof) {
                return Err(PyrustError::ParseError {
                    expected: "'}'".to_string(),
                    found: TokenKind::Eof.to_string(),
                    span: self.current_span(),
                });
            }
            stmts.push(self.parse_stmt()?);
            self.skip_semicolons();
        }
        self.advance(); // `}`
        Ok(stmts)
    }

    /// `;` is an optional statement separator (spec §4.2's grammar is
    /// newline-insensitive; `;` is accepted the same way so scenarios
    /// written with C-style separators, e.g. spec §8 scenario B, parse as
    /// written). It carries no meaning beyond separating statements, so
    /// any run of them is just skipped.
    fn skip_semicolons(&mut self) {
        while self.match_kind(&TokenKind::Semi) {}
    }

    fn starts_new_statement_or_closes_block(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::RBrace
                | TokenKind::Eof
                | TokenKind::Semi
                | TokenKind::Let
                | TokenKind::Fn
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::Print
        )
    }

    // ------------------------------ Expressions -------------------------------

    fn parse_expr(&mut self) -> Result<Expr, PyrustError> {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> Result<Expr, PyrustError> {
        let mut lhs = self.parse_comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::BangEq => BinaryOp::Ne,
                _ => break,
            };
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_comparison()?;
            lhs = Expr::Binary(BinaryExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            });
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Expr, PyrustError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Ge => BinaryOp::Ge,
                _ => break,
            };
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_additive()?;
            lhs = Expr::Binary(BinaryExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            });
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr, PyrustError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary(BinaryExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            });
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, PyrustError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(BinaryExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            });
        }
        Ok(lhs)
    }

    /// Unary minus is not its own AST node (spec §9): `- expr` desugars to
    /// `0 - expr`, so `- 3.5` still widens to `Float` via the ordinary
    /// arithmetic rules instead of needing a dedicated evaluator case.
    fn parse_unary(&mut self) -> Result<Expr, PyrustError> {
        if self.check(&TokenKind::Minus) {
            let span = self.current_span();
            self.advance();
            let rhs = self.parse_unary()?;
            return Ok(Expr::Binary(BinaryExpr {
                op: BinaryOp::Sub,
                lhs: Box::new(Expr::IntLit(IntLitExpr { value: 0, span })),
                rhs: Box::new(rhs),
                span,
            }));
        }
        self.parse_call_or_primary()
    }

    fn parse_call_or_primary(&mut self) -> Result<Expr, PyrustError> {
        if let TokenKind::Ident(_) = self.peek_kind() {
            if self.peek_kind_at(1) == Some(&TokenKind::LParen) {
                return self.parse_call();
            }
        }
        self.parse_primary()
    }

    fn parse_call(&mut self) -> Result<Expr, PyrustError> {
        let callee = self.parse_ident()?;
        let span = callee.span;
        self.expect(&TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "')'")?;
        Ok(Expr::Call(CallExpr { callee, args, span }))
    }

    fn parse_primary(&mut self) -> Result<Expr, PyrustError> {
        let span = self.current_span();
        match self.peek_kind().clone() {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Expr::IntLit(IntLitExpr { value: n, span }))
            }
            TokenKind::Float(n) => {
                self.advance();
                Ok(Expr::FloatLit(FloatLitExpr { value: n, span }))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Expr::StringLit(StringLitExpr { value: s, span }))
            }
            TokenKind::Bool(b) => {
                self.advance();
                Ok(Expr::BoolLit(BoolLitExpr { value: b, span }))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Name(Ident { name, span }))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(Expr::Group(GroupExpr {
                    inner: Box::new(inner),
                    span,
                }))
            }
            other => Err(PyrustError::ParseError {
                expected: "an expression".to_string(),
                found: other.to_string(),
                span,
            }),
        }
    }

    fn parse_type_tag(&mut self) -> Result<TypeTag, PyrustError> {
        let span = self.current_span();
        let tag = match self.peek_kind() {
            TokenKind::TyI32 => TypeTag::Int32,
            TokenKind::TyF64 => TypeTag::Float64,
            TokenKind::TyStr => TypeTag::Str,
            TokenKind::TyBool => TypeTag::Bool,
            other => {
                return Err(PyrustError::ParseError {
                    expected: "a type (i32, f64, str, bool)".to_string(),
                    found: other.to_string(),
                    span,
                })
            }
        };
        self.advance();
        Ok(tag)
    }

    fn parse_ident(&mut self) -> Result<Ident, PyrustError> {
        let span = self.current_span();
        match self.peek_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Ident { name, span })
            }
            other => Err(PyrustError::ParseError {
                expected: "an identifier".to_string(),
                found: other.to_string(),
                span,
            }),
        }
    }

    // -------------------------------- Helpers ---------------------------------

    fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_kind_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn match_kind(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), PyrustError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(PyrustError::ParseError {
                expected: what.to_string(),
                found: self.peek_kind().to_string(),
                span: self.current_span(),
            })
        }
    }
}
