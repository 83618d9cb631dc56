use thiserror::Error;

pub use crate::ast::Span;

/// All error kinds a Pyrustlang program can fail with (spec §7).
///
/// `Display` renders the two diagnostic shapes the interpreter ever
/// produces: `Error: Line L, Column C: <message>` for errors with a known
/// source position, and `Error: <message>` for runtime errors where a
/// position is not meaningful (e.g. a failed type check deep inside an
/// evaluated expression tree, or a stack overflow).
#[derive(Debug, Error, PartialEq)]
pub enum PyrustError {
    #[error("Line {}, Column {}: Unexpected character: {ch}", span.line, span.col)]
    LexUnexpectedChar { ch: char, span: Span },

    #[error("Line {}, Column {}: Unterminated string literal", span.line, span.col)]
    LexUnterminatedString { span: Span },

    #[error("Line {}, Column {}: Expected {expected}, found {found}", span.line, span.col)]
    ParseError {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Name '{name}' is not defined")]
    NameError { name: String },

    #[error("{message}")]
    TypeMismatch { message: String },

    #[error("Cannot assign to immutable variable '{name}'")]
    ImmutabilityError { name: String },

    #[error(
        "Function '{name}' expects {expected} argument(s), got {found}"
    )]
    ArityError {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("'{name}' is not callable")]
    NotCallable { name: String },

    #[error("Integer overflow in arithmetic")]
    IntegerOverflow,

    #[error("Stack overflow")]
    StackOverflow,
}

impl PyrustError {
    /// Formats the diagnostic exactly as spec §6 mandates: `Error: ...`.
    pub fn diagnostic(&self) -> String {
        format!("Error: {self}")
    }
}
