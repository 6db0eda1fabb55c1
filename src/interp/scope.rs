//! Scope chain for name reservations
//!
//! A stack of binding frames; index 0 is the outermost frame. Lookup scans
//! innermost-first, so a reservation in the current frame shadows same-named
//! reservations in ancestor frames. A frame owns its stored values and
//! operation bodies; popping the frame drops them. Natives are plain function
//! pointers and have no ownership to release.

use super::eval::NativeFn;
use super::symbol::Symbol;
use super::value::Value;
use std::collections::HashMap;

/// One reservation: what a name resolves to
#[derive(Clone)]
pub enum Binding {
    /// Built-in operation
    Native(NativeFn),
    /// Stored value, retrievable (cloned) and removable
    Value(Value),
    /// Stored code body, only ever executed
    Operation(Vec<Value>),
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Binding::Native(_) => f.write_str("Native(..)"),
            Binding::Value(v) => write!(f, "Value({v:?})"),
            Binding::Operation(body) => write!(f, "Operation({body:?})"),
        }
    }
}

/// Why an undeclare failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndeclareFailure {
    /// No reservation for the name in the current frame
    NotDeclared,
    /// The reservation is a native or an operation
    WrongKind,
}

/// Stack of binding frames
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<HashMap<Symbol, Binding>>,
}

impl ScopeStack {
    /// Create a scope stack with a single outermost frame
    pub fn new() -> Self {
        ScopeStack {
            frames: vec![HashMap::new()],
        }
    }

    /// Push a new empty frame; it becomes the current frame
    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pop the current frame, dropping everything it owns
    ///
    /// Panics if asked to pop the outermost frame.
    pub fn pop_frame(&mut self) {
        if self.frames.len() <= 1 {
            panic!("cannot pop the outermost frame");
        }
        self.frames.pop();
    }

    /// Current chain depth
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Drop frames until the chain is `depth` deep again
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth.max(1));
    }

    /// Innermost-first lookup across the whole chain
    pub fn lookup(&self, sym: Symbol) -> Option<&Binding> {
        self.frames.iter().rev().find_map(|frame| frame.get(&sym))
    }

    /// Lookup restricted to the current frame
    pub fn lookup_current(&self, sym: Symbol) -> Option<&Binding> {
        self.frames.last().and_then(|frame| frame.get(&sym))
    }

    /// Reserve a native in the current frame
    pub fn declare_native(&mut self, sym: Symbol, native: NativeFn) {
        self.insert(sym, Binding::Native(native));
    }

    /// Reserve a stored value in the current frame
    ///
    /// Re-declaring an existing name replaces the reservation; the previous
    /// value is dropped.
    pub fn declare_value(&mut self, sym: Symbol, value: Value) {
        self.insert(sym, Binding::Value(value));
    }

    /// Reserve an operation body in the current frame
    ///
    /// Returns false without declaring if the name is already reserved in the
    /// current frame.
    pub fn declare_operation(&mut self, sym: Symbol, body: Vec<Value>) -> bool {
        if self.lookup_current(sym).is_some() {
            return false;
        }
        self.insert(sym, Binding::Operation(body));
        true
    }

    /// Remove a stored value from the current frame, returning ownership
    pub fn undeclare_value(&mut self, sym: Symbol) -> Result<Value, UndeclareFailure> {
        let frame = self.frames.last_mut().expect("scope chain is never empty");
        match frame.get(&sym) {
            None => Err(UndeclareFailure::NotDeclared),
            Some(Binding::Value(_)) => match frame.remove(&sym) {
                Some(Binding::Value(v)) => Ok(v),
                _ => unreachable!(),
            },
            Some(_) => Err(UndeclareFailure::WrongKind),
        }
    }

    fn insert(&mut self, sym: Symbol, binding: Binding) {
        self.frames
            .last_mut()
            .expect("scope chain is never empty")
            .insert(sym, binding);
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::symbol::Interner;

    fn sym(interner: &mut Interner, name: &str) -> Symbol {
        interner.intern(name)
    }

    fn stored(scopes: &ScopeStack, s: Symbol) -> Option<&Value> {
        match scopes.lookup(s) {
            Some(Binding::Value(v)) => Some(v),
            _ => None,
        }
    }

    #[test]
    fn test_declare_and_lookup() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let x = sym(&mut interner, "x");

        scopes.declare_value(x, Value::Number(42.0));
        assert_eq!(stored(&scopes, x), Some(&Value::Number(42.0)));
        assert!(scopes.lookup(sym(&mut interner, "y")).is_none());
    }

    #[test]
    fn test_shadowing_and_restore() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let x = sym(&mut interner, "x");

        scopes.declare_value(x, Value::Number(1.0));
        scopes.push_frame();
        scopes.declare_value(x, Value::Number(2.0));

        assert_eq!(stored(&scopes, x), Some(&Value::Number(2.0)));

        scopes.pop_frame();
        assert_eq!(stored(&scopes, x), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_inner_frame_bindings_vanish_on_pop() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let y = sym(&mut interner, "y");

        scopes.push_frame();
        scopes.declare_value(y, Value::Boolean(true));
        assert!(scopes.lookup(y).is_some());
        scopes.pop_frame();
        assert!(scopes.lookup(y).is_none());
    }

    #[test]
    fn test_lookup_current_ignores_ancestors() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let x = sym(&mut interner, "x");

        scopes.declare_value(x, Value::Number(1.0));
        scopes.push_frame();
        assert!(scopes.lookup(x).is_some());
        assert!(scopes.lookup_current(x).is_none());
    }

    #[test]
    fn test_declare_value_replaces_in_same_frame() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let x = sym(&mut interner, "x");

        scopes.declare_value(x, Value::Number(1.0));
        scopes.declare_value(x, Value::Number(99.0));
        assert_eq!(stored(&scopes, x), Some(&Value::Number(99.0)));
    }

    #[test]
    fn test_declare_operation_rejects_existing_name() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let f = sym(&mut interner, "f");

        assert!(scopes.declare_operation(f, vec![Value::Number(1.0)]));
        assert!(!scopes.declare_operation(f, vec![Value::Number(2.0)]));
    }

    #[test]
    fn test_declare_operation_may_shadow_ancestor() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let f = sym(&mut interner, "f");

        assert!(scopes.declare_operation(f, vec![]));
        scopes.push_frame();
        assert!(scopes.declare_operation(f, vec![Value::Number(1.0)]));
    }

    #[test]
    fn test_undeclare_value_returns_ownership() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let x = sym(&mut interner, "x");

        scopes.declare_value(x, Value::Number(7.0));
        assert_eq!(scopes.undeclare_value(x), Ok(Value::Number(7.0)));
        assert!(scopes.lookup(x).is_none());
    }

    #[test]
    fn test_undeclare_missing_name() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let x = sym(&mut interner, "x");
        assert_eq!(scopes.undeclare_value(x), Err(UndeclareFailure::NotDeclared));
    }

    #[test]
    fn test_undeclare_refuses_ancestor_frame() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let x = sym(&mut interner, "x");

        scopes.declare_value(x, Value::Number(1.0));
        scopes.push_frame();
        assert_eq!(scopes.undeclare_value(x), Err(UndeclareFailure::NotDeclared));
    }

    #[test]
    fn test_undeclare_refuses_operation() {
        let mut interner = Interner::new();
        let mut scopes = ScopeStack::new();
        let f = sym(&mut interner, "f");

        scopes.declare_operation(f, vec![]);
        assert_eq!(scopes.undeclare_value(f), Err(UndeclareFailure::WrongKind));
    }

    #[test]
    fn test_truncate_restores_depth() {
        let mut scopes = ScopeStack::new();
        scopes.push_frame();
        scopes.push_frame();
        assert_eq!(scopes.depth(), 3);
        scopes.truncate(1);
        assert_eq!(scopes.depth(), 1);
        // Never drops the outermost frame
        scopes.truncate(0);
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    #[should_panic(expected = "cannot pop the outermost frame")]
    fn test_pop_outermost_panics() {
        let mut scopes = ScopeStack::new();
        scopes.pop_frame();
    }
}
