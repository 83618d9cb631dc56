// =============================================================================
// AST: statement and expression node types.
// =============================================================================
// One flat AST stage: the grammar is small enough that there is no separate
// name-resolution pass the way a richer language would need (see ast1.rs in
// the teacher pack, which keeps a pre-resolution/post-resolution split).
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

/// Identifier, e.g. a variable, parameter, or function name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// Top-level program: a sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

/// Declaration-site type annotation. Purely a check against the runtime
/// value's tag at the annotation site; carries no further meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Int32,
    Float64,
    Str,
    Bool,
}

// --------------------------------- Statements --------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let(LetStmt),
    Assign(AssignStmt),
    FnDecl(FnDeclStmt),
    If(IfStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    Print(PrintStmt),
    Expr(ExprStmt),
}

/// `let [mut] name [: Type] = init`
#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt {
    pub name: Ident,
    pub mutable: bool,
    pub declared_type: Option<TypeTag>,
    pub init: Expr,
    pub span: Span,
}

/// `name = value`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

/// `fn name(param: Type, ...) [-> Type] { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FnDeclStmt {
    pub name: Ident,
    pub params: Vec<Param>,
    pub return_type: Option<TypeTag>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: TypeTag,
}

/// `if cond { then } [else { else }]`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_body: Vec<Stmt>,
    pub else_body: Option<Vec<Stmt>>,
    pub span: Span,
}

/// `while cond { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `return [value]`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// `print(value)`
#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub value: Expr,
    pub span: Span,
}

/// A bare expression used for its side effects, e.g. a call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub value: Expr,
    pub span: Span,
}

// -------------------------------- Expressions --------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLit(IntLitExpr),
    FloatLit(FloatLitExpr),
    StringLit(StringLitExpr),
    BoolLit(BoolLitExpr),
    Name(Ident),
    Binary(BinaryExpr),
    Call(CallExpr),
    /// A parenthesized expression. Parentheses affect precedence only;
    /// the parser keeps the node instead of eliding it so spans of the
    /// outer `( ... )` are still available for diagnostics.
    Group(GroupExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntLitExpr {
    pub value: i64,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatLitExpr {
    pub value: f64,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLitExpr {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolLitExpr {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

/// `callee_name(args, ...)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Ident,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupExpr {
    pub inner: Box<Expr>,
    pub span: Span,
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::IntLit(e) => e.span,
            Expr::FloatLit(e) => e.span,
            Expr::StringLit(e) => e.span,
            Expr::BoolLit(e) => e.span,
            Expr::Name(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::Group(e) => e.span,
        }
    }
}
