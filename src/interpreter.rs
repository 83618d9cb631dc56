//! Statement/expression evaluator (spec §4.3). `return` is modeled as a
//! [`ControlFlow`] value threaded through statement evaluation rather than
//! a host exception, per spec §9.

use crate::ast::*;
use crate::environment::Env;
use crate::error::PyrustError;
use crate::value::{FunctionValue, Value};
use std::io::Write;
use std::rc::Rc;

/// How a sequence of statements finished executing.
enum ControlFlow {
    Normal(Value),
    Returning(Value),
}

/// How many nested calls are allowed before this interpreter reports a
/// `StackOverflow` error instead of overflowing the host stack (spec §5:
/// "stack overflow is reported as an interpreter error, not silent
/// termination").
const MAX_CALL_DEPTH: usize = 2000;

pub struct Interpreter<W: Write> {
    globals: Env,
    out: W,
    call_depth: usize,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self {
            globals: Env::global(),
            out,
            call_depth: 0,
        }
    }

    pub fn run(&mut self, program: &Program) -> Result<(), PyrustError> {
        let globals = self.globals.clone();
        match self.exec_block(&program.stmts, &globals)? {
            ControlFlow::Normal(_) => Ok(()),
            ControlFlow::Returning(_) => Ok(()),
        }
    }

    /// Runs a single statement in the global scope, for the REPL. Returns
    /// the value of a bare expression statement so the REPL can echo it;
    /// any other statement yields `Value::Unit`.
    pub fn run_repl_stmt(&mut self, stmt: &Stmt) -> Result<Value, PyrustError> {
        let globals = self.globals.clone();
        if let Stmt::Expr(expr_stmt) = stmt {
            return self.eval_expr(&expr_stmt.value, &globals);
        }
        match self.exec_stmt(stmt, &globals)? {
            ControlFlow::Normal(v) => Ok(v),
            ControlFlow::Returning(v) => Ok(v),
        }
    }

    fn exec_block(&mut self, stmts: &[Stmt], env: &Env) -> Result<ControlFlow, PyrustError> {
        for stmt in stmts {
            match self.exec_stmt(stmt, env)? {
                ControlFlow::Normal(_) => continue,
                returning @ ControlFlow::Returning(_) => return Ok(returning),
            }
        }
        Ok(ControlFlow::Normal(Value::Unit))
    }

    fn exec_stmt(&mut self, stmt: &Stmt, env: &Env) -> Result<ControlFlow, PyrustError> {
        match stmt {
            Stmt::Let(s) => self.exec_let(s, env),
            Stmt::Assign(s) => self.exec_assign(s, env),
            Stmt::FnDecl(s) => self.exec_fn_decl(s, env),
            Stmt::If(s) => self.exec_if(s, env),
            Stmt::While(s) => self.exec_while(s, env),
            Stmt::Return(s) => self.exec_return(s, env),
            Stmt::Print(s) => self.exec_print(s, env),
            Stmt::Expr(s) => {
                self.eval_expr(&s.value, env)?;
                Ok(ControlFlow::Normal(Value::Unit))
            }
        }
    }

    fn exec_let(&mut self, s: &LetStmt, env: &Env) -> Result<ControlFlow, PyrustError> {
        let value = self.eval_expr(&s.init, env)?;
        if let Some(expected) = s.declared_type {
            require_tag(&value, expected)?;
        }
        env.declare(&s.name.name, value, s.mutable);
        Ok(ControlFlow::Normal(Value::Unit))
    }

    fn exec_assign(&mut self, s: &AssignStmt, env: &Env) -> Result<ControlFlow, PyrustError> {
        let value = self.eval_expr(&s.value, env)?;
        env.assign(&s.name.name, value)?;
        Ok(ControlFlow::Normal(Value::Unit))
    }

    fn exec_fn_decl(&mut self, s: &FnDeclStmt, env: &Env) -> Result<ControlFlow, PyrustError> {
        let function = Value::Function(Rc::new(FunctionValue {
            name: s.name.name.clone(),
            params: s.params.clone(),
            return_type: s.return_type,
            body: s.body.clone(),
            captured_env: env.clone(),
        }));
        env.declare(&s.name.name, function, false);
        Ok(ControlFlow::Normal(Value::Unit))
    }

    fn exec_if(&mut self, s: &IfStmt, env: &Env) -> Result<ControlFlow, PyrustError> {
        let cond = self.eval_expr(&s.cond, env)?;
        let cond = require_bool(cond)?;
        if cond {
            let child = Env::child(env);
            self.exec_block(&s.then_body, &child)
        } else if let Some(else_body) = &s.else_body {
            let child = Env::child(env);
            self.exec_block(else_body, &child)
        } else {
            Ok(ControlFlow::Normal(Value::Unit))
        }
    }

    fn exec_while(&mut self, s: &WhileStmt, env: &Env) -> Result<ControlFlow, PyrustError> {
        loop {
            let cond = self.eval_expr(&s.cond, env)?;
            if !require_bool(cond)? {
                break;
            }
            let child = Env::child(env);
            match self.exec_block(&s.body, &child)? {
                ControlFlow::Normal(_) => continue,
                returning @ ControlFlow::Returning(_) => return Ok(returning),
            }
        }
        Ok(ControlFlow::Normal(Value::Unit))
    }

    fn exec_return(&mut self, s: &ReturnStmt, env: &Env) -> Result<ControlFlow, PyrustError> {
        let value = match &s.value {
            Some(expr) => self.eval_expr(expr, env)?,
            None => Value::Unit,
        };
        Ok(ControlFlow::Returning(value))
    }

    fn exec_print(&mut self, s: &PrintStmt, env: &Env) -> Result<ControlFlow, PyrustError> {
        let value = self.eval_expr(&s.value, env)?;
        let rendered = value.render().ok_or_else(|| PyrustError::TypeMismatch {
            message: "cannot print a value of this type".to_string(),
        })?;
        writeln!(self.out, "{rendered}").map_err(|_| PyrustError::TypeMismatch {
            message: "failed to write to output".to_string(),
        })?;
        Ok(ControlFlow::Normal(Value::Unit))
    }

    // ------------------------------ Expressions -------------------------------

    fn eval_expr(&mut self, expr: &Expr, env: &Env) -> Result<Value, PyrustError> {
        match expr {
            Expr::IntLit(e) => Ok(Value::Int(e.value)),
            Expr::FloatLit(e) => Ok(Value::Float(e.value)),
            Expr::StringLit(e) => Ok(Value::Str(e.value.clone())),
            Expr::BoolLit(e) => Ok(Value::Bool(e.value)),
            Expr::Name(e) => env.get(&e.name),
            Expr::Group(e) => self.eval_expr(&e.inner, env),
            Expr::Binary(e) => self.eval_binary(e, env),
            Expr::Call(e) => self.eval_call(e, env),
        }
    }

    fn eval_binary(&mut self, e: &BinaryExpr, env: &Env) -> Result<Value, PyrustError> {
        // Both operands are always evaluated, left to right; no short-circuit
        // is required because the grammar has no boolean connectives.
        let lhs = self.eval_expr(&e.lhs, env)?;
        let rhs = self.eval_expr(&e.rhs, env)?;
        apply_binary_op(e.op, lhs, rhs)
    }

    fn eval_call(&mut self, e: &CallExpr, env: &Env) -> Result<Value, PyrustError> {
        let callee = env.get(&e.callee.name)?;
        let function = match callee {
            Value::Function(f) => f,
            _ => {
                return Err(PyrustError::NotCallable {
                    name: e.callee.name.clone(),
                })
            }
        };

        let mut args = Vec::with_capacity(e.args.len());
        for arg in &e.args {
            args.push(self.eval_expr(arg, env)?);
        }

        if args.len() != function.params.len() {
            return Err(PyrustError::ArityError {
                name: function.name.clone(),
                expected: function.params.len(),
                found: args.len(),
            });
        }

        // Bind parameters (and check their types) before the call frame is
        // pushed: a rejected argument never entered the frame, so it must
        // not leave `call_depth` incremented for the REPL's next call.
        let call_env = Env::child(&function.captured_env);
        for (param, arg) in function.params.iter().zip(args.into_iter()) {
            require_tag(&arg, param.ty)?;
            call_env.declare(&param.name.name, arg, false);
        }

        self.call_depth += 1;
        if self.call_depth > MAX_CALL_DEPTH {
            self.call_depth -= 1;
            return Err(PyrustError::StackOverflow);
        }
        tracing::debug!(name = %function.name, depth = self.call_depth, "entering call frame");

        let result = match self.exec_block(&function.body, &call_env) {
            Ok(ControlFlow::Returning(v)) => Ok(v),
            Ok(ControlFlow::Normal(_)) => Ok(Value::Unit),
            Err(e) => Err(e),
        };

        self.call_depth -= 1;
        tracing::debug!(name = %function.name, depth = self.call_depth, "exiting call frame");

        let result = result?;
        if let Some(expected) = function.return_type {
            require_tag(&result, expected)?;
        }
        Ok(result)
    }
}

/// Numeric widening: both operands numeric, any `Float` operand forces a
/// `Float` result.
enum Numeric {
    Int(i64),
    Float(f64),
}

fn as_numeric(v: &Value) -> Option<Numeric> {
    match v {
        Value::Int(n) => Some(Numeric::Int(*n)),
        Value::Float(f) => Some(Numeric::Float(*f)),
        _ => None,
    }
}

fn apply_binary_op(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, PyrustError> {
    match op {
        BinaryOp::Add => match (&lhs, &rhs) {
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
            _ => numeric_arith(op, lhs, rhs),
        },
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => numeric_arith(op, lhs, rhs),
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => numeric_compare(op, lhs, rhs),
        BinaryOp::Eq | BinaryOp::Ne => equality(op, lhs, rhs),
    }
}

fn numeric_arith(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, PyrustError> {
    let (a, b) = match (as_numeric(&lhs), as_numeric(&rhs)) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(PyrustError::TypeMismatch {
                message: format!(
                    "operator '{}' cannot be applied to these operand types",
                    op_symbol(op)
                ),
            })
        }
    };

    // Division always widens to Float (spec §4.3), so it never shares the
    // Int/Int fast path the other arithmetic operators do.
    if matches!(op, BinaryOp::Div) {
        let (af, bf) = (to_f64(a), to_f64(b));
        if bf == 0.0 {
            return Err(PyrustError::DivisionByZero);
        }
        return Ok(Value::Float(af / bf));
    }

    match (a, b) {
        (Numeric::Int(a), Numeric::Int(b)) => {
            let result = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Sub => a.checked_sub(b),
                BinaryOp::Mul => a.checked_mul(b),
                _ => unreachable!(),
            };
            result.map(Value::Int).ok_or(PyrustError::IntegerOverflow)
        }
        (a, b) => {
            let (af, bf) = (to_f64(a), to_f64(b));
            let result = match op {
                BinaryOp::Add => af + bf,
                BinaryOp::Sub => af - bf,
                BinaryOp::Mul => af * bf,
                _ => unreachable!(),
            };
            Ok(Value::Float(result))
        }
    }
}

fn numeric_compare(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, PyrustError> {
    let (a, b) = match (as_numeric(&lhs), as_numeric(&rhs)) {
        (Some(a), Some(b)) => (to_f64(a), to_f64(b)),
        _ => {
            return Err(PyrustError::TypeMismatch {
                message: format!(
                    "operator '{}' requires numeric operands",
                    op_symbol(op)
                ),
            })
        }
    };
    let result = match op {
        BinaryOp::Lt => a < b,
        BinaryOp::Gt => a > b,
        BinaryOp::Le => a <= b,
        BinaryOp::Ge => a >= b,
        _ => unreachable!(),
    };
    Ok(Value::Bool(result))
}

fn equality(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, PyrustError> {
    let equal = match (&lhs, &rhs) {
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        _ => match (as_numeric(&lhs), as_numeric(&rhs)) {
            (Some(a), Some(b)) => to_f64(a) == to_f64(b),
            _ => {
                return Err(PyrustError::TypeMismatch {
                    message: "cannot compare values of different types".to_string(),
                })
            }
        },
    };
    Ok(Value::Bool(if op == BinaryOp::Eq { equal } else { !equal }))
}

fn to_f64(n: Numeric) -> f64 {
    match n {
        Numeric::Int(i) => i as f64,
        Numeric::Float(f) => f,
    }
}

fn op_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::Gt => ">",
        BinaryOp::Le => "<=",
        BinaryOp::Ge => ">=",
    }
}

fn require_bool(v: Value) -> Result<bool, PyrustError> {
    match v {
        Value::Bool(b) => Ok(b),
        _ => Err(PyrustError::TypeMismatch {
            message: "condition must be a bool".to_string(),
        }),
    }
}

fn require_tag(v: &Value, expected: TypeTag) -> Result<(), PyrustError> {
    match v.tag() {
        Some(tag) if tag == expected => Ok(()),
        _ => Err(PyrustError::TypeMismatch {
            message: format!("expected a value of type '{expected}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Cursor;
    use crate::lexer::Lexer;
    use crate::line_map::Lines;
    use crate::parser::Parser;

    fn run(src: &str) -> Result<String, PyrustError> {
        let lines = Lines::from_source(src);
        let cursor = Cursor::new(&lines);
        let tokens = Lexer::new(cursor).tokenize()?;
        let program = Parser::new(tokens).parse_program()?;
        let mut out = Vec::new();
        {
            let mut interp = Interpreter::new(&mut out);
            interp.run(&program)?;
        }
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn hello_world() {
        assert_eq!(run(r#"print("Hello, World!")"#).unwrap(), "Hello, World!\n");
    }

    #[test]
    fn division_always_produces_float() {
        assert_eq!(run("print(4 / 2)").unwrap(), "2.0\n");
    }

    #[test]
    fn division_by_zero_errors() {
        let err = run("let a: i32 = 1\nprint(a / 0)").unwrap_err();
        assert!(matches!(err, PyrustError::DivisionByZero));
    }

    #[test]
    fn immutability_is_enforced() {
        let err = run("let x = 1\nx = 2").unwrap_err();
        assert!(matches!(err, PyrustError::ImmutabilityError { .. }));
    }

    #[test]
    fn type_annotation_mismatch_is_rejected() {
        let err = run(r#"let x: i32 = "hi""#).unwrap_err();
        assert!(matches!(err, PyrustError::TypeMismatch { .. }));
    }

    #[test]
    fn shadowing_in_nested_scope() {
        let out = run("let x = 1\nif true { let x = 2\nprint(x) }\nprint(x)").unwrap();
        assert_eq!(out, "2\n1\n");
    }

    #[test]
    fn closure_captures_declaration_scope_and_sees_later_mutation() {
        let out = run("let mut n = 1\nfn f() { print(n) }\nn = 42\nf()").unwrap();
        assert_eq!(out, "42\n");
    }

    #[test]
    fn return_unwinds_out_of_nested_if_and_while() {
        let out = run(
            "fn f(n: i32) -> i32 {\n\
             if n <= 1 { return n }\n\
             let mut i: i32 = 0\n\
             while i < 10 { if i == 3 { return i } i = i + 1 }\n\
             return 99\n\
             }\n\
             print(f(5))\n\
             print(f(0))",
        )
        .unwrap();
        assert_eq!(out, "3\n0\n");
    }

    #[test]
    fn integer_overflow_is_reported() {
        let err = run(&format!("print({} + 1)", i64::MAX)).unwrap_err();
        assert!(matches!(err, PyrustError::IntegerOverflow));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(
            run(r#"print("a" + "b")"#).unwrap(),
            "ab\n"
        );
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        let err = run("fn f(a: i32) { return a }\nprint(f(1, 2))").unwrap_err();
        assert!(matches!(err, PyrustError::ArityError { .. }));
    }

    #[test]
    fn call_to_undefined_name_is_not_callable_or_name_error() {
        let err = run("missing()").unwrap_err();
        assert!(matches!(
            err,
            PyrustError::NameError { .. } | PyrustError::NotCallable { .. }
        ));
    }

    #[test]
    fn fall_through_with_declared_return_type_is_type_mismatch() {
        let err = run("fn f() -> i32 { let x = 1 }\nprint(f())").unwrap_err();
        assert!(matches!(err, PyrustError::TypeMismatch { .. }));
    }

    /// A rejected argument must not leave `call_depth` incremented: in file
    /// mode a `TypeMismatch` aborts the run, so a leaked frame is invisible,
    /// but the REPL keeps the same `Interpreter` across lines and would
    /// eventually report a spurious `StackOverflow` after enough bad calls.
    #[test]
    fn type_mismatched_argument_does_not_leak_call_depth() {
        fn stmt_of(src: &str) -> Stmt {
            let lines = crate::line_map::Lines::from_source(src);
            let cursor = crate::cursor::Cursor::new(&lines);
            let tokens = crate::lexer::Lexer::new(cursor).tokenize().unwrap();
            crate::parser::Parser::new(tokens)
                .parse_program()
                .unwrap()
                .stmts
                .into_iter()
                .next()
                .unwrap()
        }

        let mut out = Vec::new();
        let mut interp = Interpreter::new(&mut out);
        interp
            .run_repl_stmt(&stmt_of("fn f(a: i32) { return a }"))
            .unwrap();

        for _ in 0..(MAX_CALL_DEPTH + 10) {
            let err = interp.run_repl_stmt(&stmt_of(r#"f("wrong type")"#)).unwrap_err();
            assert!(matches!(err, PyrustError::TypeMismatch { .. }));
        }

        let value = interp.run_repl_stmt(&stmt_of("f(1)")).unwrap();
        assert!(matches!(value, Value::Int(1)));
    }
}
