//! The runtime: values, scopes and the evaluator

pub mod builtins;
pub mod error;
pub mod eval;
pub mod scope;
pub mod symbol;
pub mod value;

pub use error::{InterpResult, RuntimeError};
pub use eval::{Interpreter, NativeFn};
pub use scope::{Binding, ScopeStack};
pub use symbol::{Interner, Symbol};
pub use value::{Tag, Value};
