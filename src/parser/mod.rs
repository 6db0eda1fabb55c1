//! Recursive-descent parser
//!
//! Turns a token stream into the value tree the evaluator walks directly:
//! there is no separate AST. Literals become literal values, identifiers
//! become executable symbols, `[...]` nests, and the two syntactic oddities
//! are handled here:
//!
//! - Declaration sigils desugar into data plus an executable symbol:
//!   `=>name` becomes `:name $=>`, `->name` becomes `:name $->`, and
//!   `<-name` becomes `:name $<-`.
//! - A parenthesized prefix group holds its elements back and splices them
//!   into the output right after the next element, so `(2 3) +` parses as
//!   `+ 2 3`. A group must be followed by an element, and two groups may not
//!   be adjacent.

use crate::error::{Result, SyntaxError};
use crate::interp::symbol::Interner;
use crate::interp::value::Value;
use crate::lexer::{tokenize, Token};
use crate::span::Span;


/// Stack growth parameters for deeply nested lists
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// What a sequence expects to be ended by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Eof,
    ListClose,
    GroupClose,
}

/// Parse source text into a program list
pub fn parse(source: &str, interner: &mut Interner) -> Result<Vec<Value>> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        interner,
    };
    let end = Span::new(source.len(), source.len());
    parser.parse_sequence(Terminator::Eof, end)
}

struct Parser<'a> {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    interner: &'a mut Interner,
}

impl Parser<'_> {
    fn advance(&mut self) -> Option<(Token, Span)> {
        let entry = self.tokens.get(self.pos).cloned();
        if entry.is_some() {
            self.pos += 1;
        }
        entry
    }

    /// Parse elements until `terminator`
    ///
    /// `open` is the span of the delimiter (or end of input) that opened this
    /// sequence, used when the matching closer never arrives.
    fn parse_sequence(&mut self, terminator: Terminator, open: Span) -> Result<Vec<Value>> {
        let mut out = Vec::new();
        // A parsed prefix group waiting for the element to splice after
        let mut pending: Option<(Vec<Value>, Span)> = None;

        while let Some((token, span)) = self.advance() {
            match token {
                Token::ListClose => {
                    if terminator == Terminator::ListClose {
                        return Self::finish(out, pending);
                    }
                    return Err(SyntaxError::parser("unexpected `]`", span));
                }
                Token::GroupClose => {
                    if terminator == Terminator::GroupClose {
                        return Self::finish(out, pending);
                    }
                    return Err(SyntaxError::parser("unexpected `)`", span));
                }
                Token::GroupOpen => {
                    if let Some((_, first)) = &pending {
                        return Err(SyntaxError::parser(
                            "prefix group directly follows another prefix group",
                            first.merge(span),
                        ));
                    }
                    let items = self.parse_nested(Terminator::GroupClose, span)?;
                    pending = Some((items, span));
                    continue;
                }
                Token::ListOpen => {
                    let items = self.parse_nested(Terminator::ListClose, span)?;
                    out.push(Value::List(items));
                }
                Token::Number(n) => out.push(Value::Number(n)),
                Token::Character(c) => out.push(Value::Character(c)),
                Token::Str(bytes) => out.push(Value::string(&bytes)),
                Token::Ident(name) => {
                    out.push(Value::Symbol(self.interner.intern(&name)));
                }
                Token::QuotedIdent(name) => {
                    out.push(Value::QuotedSymbol(self.interner.intern(&name)));
                }
                Token::DeclareOperation(name) => self.desugar_sigil(&mut out, &name, "$=>"),
                Token::DeclareValue(name) => self.desugar_sigil(&mut out, &name, "$->"),
                Token::RestoreValue(name) => self.desugar_sigil(&mut out, &name, "$<-"),
            }
            if let Some((items, _)) = pending.take() {
                out.extend(items);
            }
        }

        match terminator {
            Terminator::Eof => Self::finish(out, pending),
            Terminator::ListClose => Err(SyntaxError::parser("unterminated list", open)),
            Terminator::GroupClose => Err(SyntaxError::parser("unterminated prefix group", open)),
        }
    }

    fn parse_nested(&mut self, terminator: Terminator, open: Span) -> Result<Vec<Value>> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.parse_sequence(terminator, open)
        })
    }

    /// `name=>`-style sigils produce the quoted name followed by the
    /// reserving operation; a pending prefix group splices after both.
    fn desugar_sigil(&mut self, out: &mut Vec<Value>, name: &str, operation: &str) {
        out.push(Value::QuotedSymbol(self.interner.intern(name)));
        out.push(Value::Symbol(self.interner.intern(operation)));
    }

    fn finish(out: Vec<Value>, pending: Option<(Vec<Value>, Span)>) -> Result<Vec<Value>> {
        if let Some((_, span)) = pending {
            return Err(SyntaxError::parser(
                "prefix group is not followed by an element",
                span,
            ));
        }
        Ok(out)
    }
}
