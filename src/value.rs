use crate::ast::{Param, Stmt, TypeTag};
use crate::environment::Env;
use std::fmt;
use std::rc::Rc;

/// A runtime value. `Function` closures share ownership of the environment
/// they were declared in (see `environment.rs`); everything else is plain
/// data copied on use.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    /// Result of a function with no `return`, a `return` with no value, or
    /// any statement context. Not first-class: cannot be an operand.
    Unit,
    Function(Rc<FunctionValue>),
}

#[derive(Debug)]
pub struct FunctionValue {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeTag>,
    pub body: Vec<Stmt>,
    pub captured_env: Env,
}

impl Value {
    pub fn tag(&self) -> Option<TypeTag> {
        match self {
            Value::Int(_) => Some(TypeTag::Int32),
            Value::Float(_) => Some(TypeTag::Float64),
            Value::Str(_) => Some(TypeTag::Str),
            Value::Bool(_) => Some(TypeTag::Bool),
            Value::Unit | Value::Function(_) => None,
        }
    }

    /// Textual rendering used by `print` and REPL expression echoing
    /// (spec §6). `Unit` and `Function` have no rendering; callers must
    /// reject them before calling this.
    pub fn render(&self) -> Option<String> {
        match self {
            Value::Int(n) => Some(n.to_string()),
            Value::Float(f) => Some(render_float(*f)),
            Value::Str(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Unit | Value::Function(_) => None,
        }
    }
}

/// Shortest round-tripping decimal, with at least one digit after the
/// point. Rust's `f64` `Display` is already shortest-round-trip; it only
/// needs a `.0` patch for whole-valued floats (`Display` renders `10f64`
/// as `10`, not `10.0`).
fn render_float(f: f64) -> String {
    let rendered = format!("{f}");
    if rendered.contains('.') || rendered.contains('e') || rendered.contains("inf") || rendered.contains("NaN") {
        rendered
    } else {
        format!("{rendered}.0")
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Int32 => write!(f, "i32"),
            TypeTag::Float64 => write!(f, "f64"),
            TypeTag::Str => write!(f, "str"),
            TypeTag::Bool => write!(f, "bool"),
        }
    }
}
