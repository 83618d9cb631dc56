//! `prlc`: file driver and REPL for Pyrustlang (spec §6).

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser as ClapParser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shallows_vm::ast::Stmt;
use shallows_vm::cursor::Cursor;
use shallows_vm::error::PyrustError;
use shallows_vm::interpreter::Interpreter;
use shallows_vm::lexer::Lexer;
use shallows_vm::line_map::Lines;
use shallows_vm::parser::Parser as PrlParser;

/// Pyrustlang interpreter.
///
/// Run a `.prl` file, or start a line-oriented REPL when no path is given.
#[derive(ClapParser, Debug)]
#[command(name = "prlc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A small statically-annotated, dynamically-checked tree-walking interpreter")]
struct Cli {
    /// Source file to run (`.prl` recommended, not required).
    path: Option<PathBuf>,

    /// Increase log verbosity; may be repeated (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable ANSI color in diagnostics.
    #[arg(long, global = true)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.path {
        Some(path) => run_file(&path, cli.no_color),
        None => {
            run_repl();
            ExitCode::SUCCESS
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run_file(path: &PathBuf, no_color: bool) -> ExitCode {
    let source = match read_source(path) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    match shallows_vm::run_source(&source, stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_diagnostic(&err, no_color);
            ExitCode::FAILURE
        }
    }
}

/// Reads the source file, using `anyhow` only at this CLI boundary (the
/// library crate's own pipeline stays on the typed `PyrustError`).
fn read_source(path: &PathBuf) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))
}

fn print_diagnostic(err: &PyrustError, no_color: bool) {
    let message = err.diagnostic();
    if no_color {
        eprintln!("{message}");
    } else {
        eprintln!("\x1b[31m{message}\x1b[0m");
    }
}

/// Line-oriented REPL (spec §6). Each line is lexed and parsed as one
/// statement; a line with unbalanced braces (the start of a multi-line
/// `fn`/`if`/`while`) accumulates continuation lines until braces balance,
/// so a function body can still be typed the natural way. `exit` (an
/// ordinary identifier, not a keyword) ends the session.
fn run_repl() {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut interpreter = Interpreter::new(io::stdout());

    loop {
        print!("prl> ");
        let _ = io::stdout().flush();

        let mut buffer = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(_)) | None => break,
        };

        while brace_depth(&buffer) > 0 {
            print!("...  ");
            let _ = io::stdout().flush();
            match lines.next() {
                Some(Ok(more)) => {
                    buffer.push('\n');
                    buffer.push_str(&more);
                }
                Some(Err(_)) | None => break,
            }
        }

        let trimmed = buffer.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "exit" {
            break;
        }

        match eval_repl_line(&buffer, &mut interpreter) {
            Ok(Some(rendered)) => println!("{rendered}"),
            Ok(None) => {}
            Err(err) => print_diagnostic(&err, false),
        }
    }
}

fn brace_depth(s: &str) -> i64 {
    s.chars().fold(0i64, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

fn eval_repl_line(
    source: &str,
    interpreter: &mut Interpreter<io::Stdout>,
) -> Result<Option<String>, PyrustError> {
    let lines = Lines::from_source(source);
    let cursor = Cursor::new(&lines);
    let tokens = Lexer::new(cursor).tokenize()?;
    let program = PrlParser::new(tokens).parse_program()?;

    let mut last_rendered = None;
    for stmt in &program.stmts {
        let is_bare_expr = matches!(stmt, Stmt::Expr(_));
        let value = interpreter.run_repl_stmt(stmt)?;
        last_rendered = if is_bare_expr { value.render() } else { None };
    }
    Ok(last_rendered)
}
