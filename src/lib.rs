//! `shallows_vm`: lexer → parser → evaluator for Pyrustlang, a small
//! statically-annotated, dynamically-checked, tree-walking interpreter.
//!
//! The library exposes one entry point, [`run_source`], that drives the
//! whole pipeline; `src/main.rs` wraps it with a CLI and a REPL.

pub mod ast;
pub mod cursor;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod line_map;
pub mod parser;
pub mod value;

use cursor::Cursor;
use error::PyrustError;
use interpreter::Interpreter;
use lexer::Lexer;
use line_map::Lines;
use parser::Parser;
use std::io::Write;

/// Lexes, parses, and evaluates `source` against a fresh interpreter,
/// writing `print` output to `out`.
pub fn run_source<W: Write>(source: &str, out: W) -> Result<(), PyrustError> {
    let lines = Lines::from_source(source);
    let cursor = Cursor::new(&lines);
    let tokens = Lexer::new(cursor).tokenize()?;
    let program = Parser::new(tokens).parse_program()?;
    let mut interpreter = Interpreter::new(out);
    interpreter.run(&program)
}
