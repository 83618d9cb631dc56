use std::path::PathBuf;

use shallows_vm::{cursor::Cursor, lexer::Lexer, line_map::Lines};
use tracing::info;

fn main() {
    tracing_subscriber::fmt::init();

    let path = PathBuf::from("demos/showcase.prl");
    let file_len = std::fs::metadata(&path)
        .expect("Failed to get file metadata")
        .len();
    info!("Lexing {} of size {}", path.to_string_lossy(), file_len);
    let lines = Lines::from_path(&path).expect("Failed to read lines from file");
    let cursor = Cursor::new(&lines);
    let lexer = Lexer::new(cursor);

    let now = std::time::Instant::now();
    let tokens = lexer.tokenize().expect("Failed to lex file");
    let time = now.elapsed();

    info!("Lexed {} tokens in {:?}", tokens.len(), time);
    info!("Speed: {} bytes/sec", file_len as f64 / time.as_secs_f64());
}
