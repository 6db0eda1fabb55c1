//! Symbol interning
//!
//! Identifier text is interned once; equality between identifiers reduces to
//! handle equality. The table is owned by the runtime instance and handles
//! are never released.

use std::collections::HashMap;

/// Interned identifier handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

/// Identifier-to-handle table
#[derive(Debug, Default)]
pub struct Interner {
    names: Vec<String>,
    table: HashMap<String, Symbol>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning the existing handle on a repeat sighting
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&sym) = self.table.get(name) {
            return sym;
        }
        let sym = Symbol(self.names.len() as u32);
        self.names.push(name.to_string());
        self.table.insert(name.to_string(), sym);
        sym
    }

    /// Resolve a handle back to its text
    pub fn name(&self, sym: Symbol) -> &str {
        &self.names[sym.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_returns_same_handle_for_same_text() {
        let mut interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        assert_eq!(a, b);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_intern_distinct_names() {
        let mut interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern("bar");
        assert_ne!(a, b);
        assert_eq!(interner.name(a), "foo");
        assert_eq!(interner.name(b), "bar");
    }

    #[test]
    fn test_empty_interner() {
        let interner = Interner::new();
        assert!(interner.is_empty());
    }
}
