//! Runtime values
//!
//! Values form owned trees: a list owns its children, the operand stack owns
//! its entries, and a binding slot owns its value. Moving a value between
//! containers transfers ownership; `clone` produces an independent deep copy.

use super::symbol::{Interner, Symbol};
use crate::interp::error::{InterpResult, RuntimeError};
use std::fmt;

/// Type tag of a runtime value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Number,
    Boolean,
    Character,
    QuotedSymbol,
    Symbol,
    List,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Number => "Number",
            Tag::Boolean => "Boolean",
            Tag::Character => "Character",
            Tag::QuotedSymbol => "QuotedSymbol",
            Tag::Symbol => "Symbol",
            Tag::List => "List",
        };
        f.write_str(name)
    }
}

/// Runtime value
///
/// Structural equality is derived: lists compare element-wise and must have
/// equal length, symbols and quoted symbols compare by handle, everything
/// else by payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Double-precision number
    Number(f64),
    /// Boolean
    Boolean(bool),
    /// Single byte
    Character(u8),
    /// Non-executable identifier (data)
    QuotedSymbol(Symbol),
    /// Executable identifier reference
    Symbol(Symbol),
    /// Ordered sequence of owned values
    List(Vec<Value>),
}

impl Value {
    /// Build a list of characters from raw bytes (string literals)
    pub fn string(bytes: &[u8]) -> Self {
        Value::List(bytes.iter().map(|&b| Value::Character(b)).collect())
    }

    pub fn tag(&self) -> Tag {
        match self {
            Value::Number(_) => Tag::Number,
            Value::Boolean(_) => Tag::Boolean,
            Value::Character(_) => Tag::Character,
            Value::QuotedSymbol(_) => Tag::QuotedSymbol,
            Value::Symbol(_) => Tag::Symbol,
            Value::List(_) => Tag::List,
        }
    }

    /// Check that this value carries `expected`
    pub fn check(&self, expected: Tag) -> InterpResult<()> {
        if self.tag() == expected {
            Ok(())
        } else {
            Err(RuntimeError::type_mismatch(expected, self.tag()))
        }
    }

    /// Concatenative display, as the `print` operation shows it: list
    /// elements run together with no brackets, so character lists print as
    /// plain strings
    pub fn display_string(&self, interner: &Interner) -> String {
        let mut out = String::new();
        self.write_display(interner, &mut out);
        out
    }

    fn write_display(&self, interner: &Interner, out: &mut String) {
        match self {
            Value::Number(n) => out.push_str(&n.to_string()),
            Value::Boolean(true) => out.push_str("TRUE"),
            Value::Boolean(false) => out.push_str("FALSE"),
            Value::Character(c) => out.push(*c as char),
            Value::QuotedSymbol(sym) | Value::Symbol(sym) => {
                out.push_str(interner.name(*sym));
            }
            Value::List(items) => {
                for item in items {
                    item.write_display(interner, out);
                }
            }
        }
    }

    /// Source-shaped representation, used for diagnostics and the REPL
    pub fn repr(&self, interner: &Interner) -> String {
        let mut out = String::new();
        self.write_repr(interner, &mut out);
        out
    }

    fn write_repr(&self, interner: &Interner, out: &mut String) {
        match self {
            Value::Number(n) => out.push_str(&n.to_string()),
            Value::Boolean(true) => out.push_str("TRUE"),
            Value::Boolean(false) => out.push_str("FALSE"),
            Value::Character(c) => {
                out.push('\'');
                match *c {
                    b'\n' => out.push_str("\\n"),
                    b'\r' => out.push_str("\\r"),
                    b'\t' => out.push_str("\\t"),
                    b' ' => out.push_str("\\s"),
                    other => out.push(other as char),
                }
            }
            Value::QuotedSymbol(sym) => {
                out.push(':');
                out.push_str(interner.name(*sym));
            }
            Value::Symbol(sym) => out.push_str(interner.name(*sym)),
            Value::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    item.write_repr(interner, out);
                }
                out.push(']');
            }
        }
    }
}
