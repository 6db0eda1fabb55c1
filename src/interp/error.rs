//! Runtime errors for the interpreter

use super::value::Tag;
use thiserror::Error;

/// Fatal condition raised during evaluation
///
/// All of these unwind to the nearest enclosing `try` boundary, or to the top
/// level if there is none.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuntimeError {
    #[error("name not found: {0}")]
    NameNotFound(String),

    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: Tag, found: Tag },

    #[error("tried to pop a value but the stack is empty")]
    StackUnderflow,

    #[error("cannot redeclare operation: {0}")]
    RedeclaredOperation(String),

    #[error("no value named {0} declared in the current scope")]
    UndeclaredValue(String),

    #[error("{0} is not a stored value")]
    NotAStoredValue(String),

    #[error("uncons on an empty list")]
    EmptyList,

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("could not read {path}: {message}")]
    Io { path: String, message: String },
}

impl RuntimeError {
    pub fn type_mismatch(expected: Tag, found: Tag) -> Self {
        Self::TypeMismatch { expected, found }
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let err = RuntimeError::type_mismatch(Tag::Number, Tag::List);
        assert_eq!(
            format!("{err}"),
            "type mismatch: expected Number, got List"
        );
    }

    #[test]
    fn test_name_not_found_display() {
        let err = RuntimeError::NameNotFound("frobnicate".into());
        assert!(format!("{err}").contains("frobnicate"));
    }

    #[test]
    fn test_error_is_std_error() {
        let err = RuntimeError::StackUnderflow;
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_error_clone_and_eq() {
        let err = RuntimeError::RedeclaredOperation("dup".into());
        assert_eq!(err.clone(), err);
        assert_ne!(err, RuntimeError::StackUnderflow);
    }
}
