//! skein interpreter library
//!
//! A small stack-oriented language: programs are lists of tagged values,
//! executed against a scope chain and a single shared operand stack.

pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod span;

pub use error::{Result, SyntaxError};
pub use interp::{InterpResult, Interpreter, RuntimeError, Value};
pub use span::Span;
