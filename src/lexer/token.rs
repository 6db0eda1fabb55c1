//! Token definitions
//!
//! Identifiers may start with a letter, `_`, or one of `* + - / < = > ^ ! &
//! . ? | ~ $ %`, and continue with those classes plus digits and `'`. The
//! identifier pattern deliberately rejects an embedded `--` so that comments
//! always win, and a leading `-` directly followed by a digit lexes as a
//! number literal instead.

use logos::{Lexer, Logos};
use serde::Serialize;

/// Skein token
#[derive(Logos, Debug, Clone, PartialEq, Serialize)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"--[^\n]*")]
pub enum Token {
    /// Number literal: optional leading `-`, digits, optional `.` + digits
    #[regex(r"-?[0-9]+\.?[0-9]*", number, priority = 5)]
    Number(f64),

    /// Bare identifier (an executable symbol reference)
    #[regex(
        r"([A-Za-z_*+/<=>^!&.?|~$%]|-[A-Za-z0-9_*+/<=>^!&.?|~$%'])([A-Za-z0-9_*+/<=>^!&.?|~$%']|-[A-Za-z0-9_*+/<=>^!&.?|~$%'])*|-",
        ident,
        priority = 3
    )]
    Ident(String),

    /// `:`-prefixed quoted identifier (non-executable data)
    #[regex(
        r":(([A-Za-z_*+/<=>^!&.?|~$%]|-[A-Za-z0-9_*+/<=>^!&.?|~$%'])([A-Za-z0-9_*+/<=>^!&.?|~$%']|-[A-Za-z0-9_*+/<=>^!&.?|~$%'])*|-)",
        qident,
        priority = 4
    )]
    QuotedIdent(String),

    /// `'`-prefixed character literal, e.g. `'a` or `'\n`
    #[regex(r"'(\\.|[^\\])", character)]
    Character(u8),

    /// Double-quoted string literal, yielding a list of characters
    #[regex(r#""([^"\\]|\\.)*""#, string)]
    Str(Vec<u8>),

    /// `=>name` sigil: operation declaration
    #[regex(
        r"=>[ \t\r\n]*(([A-Za-z_*+/<=>^!&.?|~$%]|-[A-Za-z0-9_*+/<=>^!&.?|~$%'])([A-Za-z0-9_*+/<=>^!&.?|~$%']|-[A-Za-z0-9_*+/<=>^!&.?|~$%'])*|-)",
        sigil_name,
        priority = 6
    )]
    DeclareOperation(String),

    /// `->name` sigil: stored value declaration
    #[regex(
        r"->[ \t\r\n]*(([A-Za-z_*+/<=>^!&.?|~$%]|-[A-Za-z0-9_*+/<=>^!&.?|~$%'])([A-Za-z0-9_*+/<=>^!&.?|~$%']|-[A-Za-z0-9_*+/<=>^!&.?|~$%'])*|-)",
        sigil_name,
        priority = 6
    )]
    DeclareValue(String),

    /// `<-name` sigil: stored value restore
    #[regex(
        r"<-[ \t\r\n]*(([A-Za-z_*+/<=>^!&.?|~$%]|-[A-Za-z0-9_*+/<=>^!&.?|~$%'])([A-Za-z0-9_*+/<=>^!&.?|~$%']|-[A-Za-z0-9_*+/<=>^!&.?|~$%'])*|-)",
        sigil_name,
        priority = 6
    )]
    RestoreValue(String),

    #[token("[")]
    ListOpen,
    #[token("]")]
    ListClose,
    #[token("(")]
    GroupOpen,
    #[token(")")]
    GroupClose,
}

fn number(lex: &mut Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

fn ident(lex: &mut Lexer<Token>) -> String {
    lex.slice().to_string()
}

fn qident(lex: &mut Lexer<Token>) -> String {
    lex.slice()[1..].to_string()
}

fn sigil_name(lex: &mut Lexer<Token>) -> String {
    lex.slice()[2..].trim_start().to_string()
}

/// Map an escape character to the byte it denotes
fn escape_byte(escape: u8) -> Option<u8> {
    match escape {
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        b'a' => Some(0x07),
        b'b' => Some(0x08),
        b'f' => Some(0x0C),
        b'v' => Some(0x0B),
        b's' => Some(b' '),
        b'\\' => Some(b'\\'),
        b'"' => Some(b'"'),
        _ => None,
    }
}

fn character(lex: &mut Lexer<Token>) -> Option<u8> {
    let bytes = lex.slice().as_bytes();
    if bytes[1] == b'\\' {
        escape_byte(bytes[2])
    } else {
        Some(bytes[1])
    }
}

fn string(lex: &mut Lexer<Token>) -> Option<Vec<u8>> {
    let slice = lex.slice();
    let inner = &slice.as_bytes()[1..slice.len() - 1];
    let mut out = Vec::with_capacity(inner.len());
    let mut iter = inner.iter();
    while let Some(&b) = iter.next() {
        if b == b'\\' {
            let escape = *iter.next()?;
            out.push(escape_byte(escape)?);
        } else {
            out.push(b);
        }
    }
    Some(out)
}
