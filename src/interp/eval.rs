//! Stack-machine evaluator
//!
//! Executes a parsed value tree against a scope chain and a single shared
//! operand stack. Literal elements move onto the stack untouched; executable
//! symbols are resolved innermost-first and dispatched by reservation kind.
//! Operation bodies and native continuations in tail position are spliced
//! into an explicit loop instead of recursing, so self-referential operations
//! can iterate indefinitely without growing the host call stack.

use super::error::{InterpResult, RuntimeError};
use super::scope::{Binding, ScopeStack};
use super::symbol::{Interner, Symbol};
use super::value::{Tag, Value};
use std::collections::VecDeque;

/// Stack growth parameters for deep non-tail recursion
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Built-in operation
///
/// A native may pop and push operand-stack values and query or mutate the
/// scope chain. Returning `Some(list)` hands the evaluator a continuation,
/// spliced into control flow exactly as an operation body would be.
pub type NativeFn = fn(&mut Interpreter) -> InterpResult<Option<Vec<Value>>>;

/// What a resolved symbol dispatches to, detached from the scope chain
enum Dispatch {
    Push(Value),
    Run(Vec<Value>),
    Call(NativeFn),
}

/// The interpreter: interner, scope chain and operand stack
#[derive(Debug)]
pub struct Interpreter {
    pub(crate) interner: Interner,
    pub(crate) scopes: ScopeStack,
    pub(crate) stack: Vec<Value>,
}

impl Interpreter {
    /// Create an interpreter with the built-in operations installed in the
    /// outermost frame
    pub fn new() -> Self {
        let mut interp = Interpreter {
            interner: Interner::new(),
            scopes: ScopeStack::new(),
            stack: Vec::new(),
        };
        super::builtins::install(&mut interp);
        interp
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        self.interner.intern(name)
    }

    pub fn symbol_name(&self, sym: Symbol) -> &str {
        self.interner.name(sym)
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// The operand stack, bottom first
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> InterpResult<Value> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow)
    }

    pub fn pop_number(&mut self) -> InterpResult<f64> {
        match self.pop()? {
            Value::Number(n) => Ok(n),
            other => Err(RuntimeError::type_mismatch(Tag::Number, other.tag())),
        }
    }

    pub fn pop_boolean(&mut self) -> InterpResult<bool> {
        match self.pop()? {
            Value::Boolean(b) => Ok(b),
            other => Err(RuntimeError::type_mismatch(Tag::Boolean, other.tag())),
        }
    }

    pub fn pop_list(&mut self) -> InterpResult<Vec<Value>> {
        match self.pop()? {
            Value::List(items) => Ok(items),
            other => Err(RuntimeError::type_mismatch(Tag::List, other.tag())),
        }
    }

    pub fn pop_quoted_symbol(&mut self) -> InterpResult<Symbol> {
        match self.pop()? {
            Value::QuotedSymbol(sym) => Ok(sym),
            other => Err(RuntimeError::type_mismatch(Tag::QuotedSymbol, other.tag())),
        }
    }

    /// Reserve a built-in operation in the current frame
    pub fn declare_native(&mut self, name: &str, native: NativeFn) {
        let sym = self.interner.intern(name);
        self.scopes.declare_native(sym, native);
    }

    /// Parse source text in this interpreter's symbol table
    pub fn parse_source(&mut self, source: &str) -> crate::error::Result<Vec<Value>> {
        crate::parser::parse(source, &mut self.interner)
    }

    /// Execute a program list
    ///
    /// With `scoped`, a fresh frame is pushed before iterating and popped
    /// afterwards, so declarations made during this execution vanish at its
    /// end. Unscoped execution is the deliberate mode that lets file-level
    /// and imported code declare directly into the caller's frame.
    pub fn exec_list(&mut self, list: Vec<Value>, scoped: bool) -> InterpResult<()> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            if scoped {
                self.scopes.push_frame();
            }
            let result = self.run(list);
            if scoped {
                self.scopes.pop_frame();
            }
            result
        })
    }

    /// The iteration loop, including the tail-call trampoline
    ///
    /// A tail-positioned operation body or native continuation replaces the
    /// remaining program and iteration continues in place; no frame is pushed
    /// for the replacement, matching the single frame pushed (or not) on
    /// entry.
    fn run(&mut self, list: Vec<Value>) -> InterpResult<()> {
        let mut program: VecDeque<Value> = VecDeque::from(list);
        while let Some(element) = program.pop_front() {
            let tail = program.is_empty();
            match element {
                Value::Symbol(sym) => {
                    let dispatch = match self.scopes.lookup(sym) {
                        Some(Binding::Value(v)) => Dispatch::Push(v.clone()),
                        Some(Binding::Operation(body)) => Dispatch::Run(body.clone()),
                        Some(Binding::Native(native)) => Dispatch::Call(*native),
                        None => {
                            let name = self.interner.name(sym).to_string();
                            return Err(RuntimeError::NameNotFound(name));
                        }
                    };
                    match dispatch {
                        Dispatch::Push(value) => self.stack.push(value),
                        Dispatch::Run(body) => {
                            if tail {
                                program = VecDeque::from(body);
                            } else {
                                self.exec_list(body, true)?;
                            }
                        }
                        Dispatch::Call(native) => {
                            if let Some(continuation) = native(self)? {
                                if tail {
                                    program = VecDeque::from(continuation);
                                } else {
                                    self.exec_list(continuation, true)?;
                                }
                            }
                        }
                    }
                }
                literal => self.stack.push(literal),
            }
        }
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
