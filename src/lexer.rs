use crate::ast::Span;
use crate::cursor::Cursor;
use crate::error::PyrustError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // --- Literals ---
    Ident(String),
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),

    // --- Keywords ---
    Let,
    Mut,
    Fn,
    If,
    Else,
    While,
    Return,
    Print,
    TyI32,
    TyF64,
    TyStr,
    TyBool,

    // --- Punctuation ---
    EqEq,   // ==
    BangEq, // !=
    Le,     // <=
    Ge,     // >=
    Arrow,  // ->
    Lt,     // <
    Gt,     // >
    Eq,     // =
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }
    Colon,  // :
    Comma,  // ,
    Semi,   // ;

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(s) => write!(f, "identifier '{s}'"),
            TokenKind::Int(n) => write!(f, "integer '{n}'"),
            TokenKind::Float(n) => write!(f, "float '{n}'"),
            TokenKind::String(s) => write!(f, "string \"{s}\""),
            TokenKind::Bool(b) => write!(f, "'{b}'"),
            TokenKind::Let => write!(f, "'let'"),
            TokenKind::Mut => write!(f, "'mut'"),
            TokenKind::Fn => write!(f, "'fn'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::Print => write!(f, "'print'"),
            TokenKind::TyI32 => write!(f, "'i32'"),
            TokenKind::TyF64 => write!(f, "'f64'"),
            TokenKind::TyStr => write!(f, "'str'"),
            TokenKind::TyBool => write!(f, "'bool'"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::BangEq => write!(f, "'!='"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::Arrow => write!(f, "'->'"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Semi => write!(f, "';'"),
            TokenKind::Eof => write!(f, "<end of input>"),
        }
    }
}

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(cursor: Cursor<'a>) -> Self {
        Self { cursor }
    }

    /// Lexes the entire input, including the trailing `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, PyrustError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tracing::debug!(count = tokens.len(), "lexed tokens");
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, PyrustError> {
        self.skip_whitespace_and_comments();

        let start_loc = self.cursor.loc();
        let span = Span {
            line: start_loc.line,
            col: start_loc.col,
        };

        let ch = match self.cursor.peek() {
            Some(c) => c,
            None => return Ok(Token { kind: TokenKind::Eof, span }),
        };

        if is_ident_start(ch) {
            let raw = self.cursor.eat_while(is_ident_char);
            let kind = match raw.as_str() {
                "let" => TokenKind::Let,
                "mut" => TokenKind::Mut,
                "fn" => TokenKind::Fn,
                "if" => TokenKind::If,
                "else" => TokenKind::Else,
                "while" => TokenKind::While,
                "return" => TokenKind::Return,
                "print" => TokenKind::Print,
                "true" => TokenKind::Bool(true),
                "false" => TokenKind::Bool(false),
                "i32" => TokenKind::TyI32,
                "f64" => TokenKind::TyF64,
                "str" => TokenKind::TyStr,
                "bool" => TokenKind::TyBool,
                _ => TokenKind::Ident(raw),
            };
            return Ok(Token { kind, span });
        }

        if ch.is_ascii_digit() {
            return self.scan_number(span);
        }

        if ch == '"' || ch == '\'' {
            return self.scan_string(span, ch);
        }

        self.cursor.advance();

        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semi,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '-' => {
                if self.match_char('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '=' => {
                if self.match_char('=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.match_char('=') {
                    TokenKind::BangEq
                } else {
                    return Err(PyrustError::LexUnexpectedChar { ch, span });
                }
            }
            '<' => {
                if self.match_char('=') {
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.match_char('=') {
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            _ => return Err(PyrustError::LexUnexpectedChar { ch, span }),
        };

        Ok(Token { kind, span })
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.cursor.eat_while(|c| c.is_whitespace());
            if self.cursor.peek() == Some('#') {
                self.cursor.eat_while(|c| c != '\n');
            } else {
                break;
            }
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.cursor.peek() == Some(expected) {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    fn scan_string(&mut self, span: Span, quote: char) -> Result<Token, PyrustError> {
        self.cursor.advance(); // opening quote

        let mut value = String::new();
        loop {
            match self.cursor.peek() {
                None => return Err(PyrustError::LexUnterminatedString { span }),
                Some(c) if c == quote => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') => {
                    self.cursor.advance();
                    match self.cursor.advance() {
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),
                        Some('\'') => value.push('\''),
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some(other) => value.push(other),
                        None => return Err(PyrustError::LexUnterminatedString { span }),
                    }
                }
                Some(c) => {
                    self.cursor.advance();
                    value.push(c);
                }
            }
        }

        Ok(Token { kind: TokenKind::String(value), span })
    }

    /// Scans a decimal integer or float literal. A `.` is only treated as a
    /// fractional separator; there is no range/method-call ambiguity in this
    /// grammar, unlike richer languages, so no lookahead beyond one char is
    /// needed.
    fn scan_number(&mut self, span: Span) -> Result<Token, PyrustError> {
        let mut raw = self.cursor.eat_while(|c| c.is_ascii_digit());
        let mut is_float = false;

        if self.cursor.peek() == Some('.') {
            is_float = true;
            raw.push(self.cursor.advance().unwrap());
            raw.push_str(&self.cursor.eat_while(|c| c.is_ascii_digit()));
        }

        if let Some(ch) = self.cursor.peek() {
            if ch == 'e' || ch == 'E' {
                is_float = true;
                raw.push(self.cursor.advance().unwrap());
                if let Some(sign) = self.cursor.peek() {
                    if sign == '+' || sign == '-' {
                        raw.push(self.cursor.advance().unwrap());
                    }
                }
                raw.push_str(&self.cursor.eat_while(|c| c.is_ascii_digit()));
            }
        }

        if is_float {
            let value: f64 = raw.parse().map_err(|_| PyrustError::LexUnexpectedChar {
                ch: raw.chars().next().unwrap_or('?'),
                span,
            })?;
            Ok(Token { kind: TokenKind::Float(value), span })
        } else {
            let value: i64 = raw.parse().map_err(|_| PyrustError::LexUnexpectedChar {
                ch: raw.chars().next().unwrap_or('?'),
                span,
            })?;
            Ok(Token { kind: TokenKind::Int(value), span })
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_map::Lines;

    fn lex(src: &str) -> Vec<TokenKind> {
        let lines = Lines::from_source(src);
        let cursor = Cursor::new(&lines);
        Lexer::new(cursor)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        assert_eq!(
            lex("let mut x = 1"),
            vec![
                TokenKind::Let,
                TokenKind::Mut,
                TokenKind::Ident("x".into()),
                TokenKind::Eq,
                TokenKind::Int(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_operators_longest_match_first() {
        assert_eq!(
            lex("== != <= >= -> < > = + - * /"),
            vec![
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::Arrow,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eq,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_float_and_int_literals() {
        assert_eq!(
            lex("10 3.5 1e3 1.5e-2"),
            vec![
                TokenKind::Int(10),
                TokenKind::Float(3.5),
                TokenKind::Float(1000.0),
                TokenKind::Float(0.015),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_string_escapes() {
        assert_eq!(
            lex(r#""a\nb\t\"c\"""#),
            vec![TokenKind::String("a\nb\t\"c\"".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn skips_comments() {
        assert_eq!(
            lex("let x = 1 # this is a comment\nlet y = 2"),
            vec![
                TokenKind::Let,
                TokenKind::Ident("x".into()),
                TokenKind::Eq,
                TokenKind::Int(1),
                TokenKind::Let,
                TokenKind::Ident("y".into()),
                TokenKind::Eq,
                TokenKind::Int(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_semicolon() {
        assert_eq!(
            lex("c = c + 1; print(c)"),
            vec![
                TokenKind::Ident("c".into()),
                TokenKind::Eq,
                TokenKind::Ident("c".into()),
                TokenKind::Plus,
                TokenKind::Int(1),
                TokenKind::Semi,
                TokenKind::Print,
                TokenKind::LParen,
                TokenKind::Ident("c".into()),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_is_lex_error() {
        let lines = Lines::from_source("\"abc");
        let cursor = Cursor::new(&lines);
        let err = Lexer::new(cursor).tokenize().unwrap_err();
        assert!(matches!(err, PyrustError::LexUnterminatedString { .. }));
    }

    #[test]
    fn unexpected_character_is_lex_error() {
        let lines = Lines::from_source("let x = 1 & 2");
        let cursor = Cursor::new(&lines);
        let err = Lexer::new(cursor).tokenize().unwrap_err();
        assert!(matches!(err, PyrustError::LexUnexpectedChar { ch: '&', .. }));
    }
}
