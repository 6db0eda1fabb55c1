//! Syntax error types and reporting

use crate::span::Span;
use thiserror::Error;

/// Result type alias for parsing
pub type Result<T> = std::result::Result<T, SyntaxError>;

/// Error produced while turning source text into a value tree
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SyntaxError {
    #[error("Lexer error at {span}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span}: {message}")]
    Parser { message: String, span: Span },
}

impl SyntaxError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Lexer { span, .. } => *span,
            Self::Parser { span, .. } => *span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Lexer { message, .. } => message,
            Self::Parser { message, .. } => message,
        }
    }
}

/// Report error with ariadne
pub fn report_error(filename: &str, source: &str, error: &SyntaxError) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let kind = match error {
        SyntaxError::Lexer { .. } => "Lexer",
        SyntaxError::Parser { .. } => "Parser",
    };

    let span = error.span();
    Report::build(ReportKind::Error, (filename, span.start..span.end))
        .with_message(format!("{kind} error"))
        .with_label(
            Label::new((filename, span.start..span.end))
                .with_message(error.message())
                .with_color(Color::Red),
        )
        .finish()
        .print((filename, Source::from(source)))
        .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_error_accessors() {
        let err = SyntaxError::lexer("bad character", Span::new(3, 4));
        assert_eq!(err.span(), Span::new(3, 4));
        assert_eq!(err.message(), "bad character");
    }

    #[test]
    fn test_parser_error_display() {
        let err = SyntaxError::parser("unmatched `[`", Span::new(0, 1));
        let text = format!("{err}");
        assert!(text.starts_with("Parser error"));
        assert!(text.contains("unmatched `[`"));
    }
}
