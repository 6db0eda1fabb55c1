//! Lexer implementation using logos

mod token;

pub use token::Token;

use crate::error::{Result, SyntaxError};
use crate::span::Span;
use logos::Logos;

/// Tokenize source code
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => {
                return Err(SyntaxError::lexer(
                    format!("unexpected character: {:?}", lexer.slice()),
                    span,
                ));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_whitespace_only() {
        assert!(tokenize("  \t\n\r\n  ").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_number_literals() {
        assert_eq!(
            kinds("42 3.25 -7 0.5"),
            vec![
                Token::Number(42.0),
                Token::Number(3.25),
                Token::Number(-7.0),
                Token::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_tokenize_number_trailing_dot() {
        assert_eq!(kinds("5."), vec![Token::Number(5.0)]);
    }

    #[test]
    fn test_tokenize_identifiers() {
        assert_eq!(
            kinds("foo bar_baz x123 can't"),
            vec![
                Token::Ident("foo".into()),
                Token::Ident("bar_baz".into()),
                Token::Ident("x123".into()),
                Token::Ident("can't".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_operator_identifiers() {
        assert_eq!(
            kinds("+ - * / ^ % = > < ! !? $=>"),
            vec![
                Token::Ident("+".into()),
                Token::Ident("-".into()),
                Token::Ident("*".into()),
                Token::Ident("/".into()),
                Token::Ident("^".into()),
                Token::Ident("%".into()),
                Token::Ident("=".into()),
                Token::Ident(">".into()),
                Token::Ident("<".into()),
                Token::Ident("!".into()),
                Token::Ident("!?".into()),
                Token::Ident("$=>".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_negative_number_beats_identifier() {
        // `-` directly followed by a digit is a number, not an identifier
        assert_eq!(kinds("3 -4"), vec![Token::Number(3.0), Token::Number(-4.0)]);
    }

    #[test]
    fn test_tokenize_minus_alone_is_identifier() {
        assert_eq!(
            kinds("3 - 4"),
            vec![
                Token::Number(3.0),
                Token::Ident("-".into()),
                Token::Number(4.0),
            ]
        );
    }

    #[test]
    fn test_tokenize_quoted_identifier() {
        assert_eq!(
            kinds(":foo :-"),
            vec![
                Token::QuotedIdent("foo".into()),
                Token::QuotedIdent("-".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_bare_colon_is_error() {
        assert!(tokenize(":").is_err());
        assert!(tokenize(": foo").is_err());
    }

    #[test]
    fn test_tokenize_character_literals() {
        assert_eq!(
            kinds(r"'a '\n '\s '\\"),
            vec![
                Token::Character(b'a'),
                Token::Character(b'\n'),
                Token::Character(b' '),
                Token::Character(b'\\'),
            ]
        );
    }

    #[test]
    fn test_tokenize_character_unknown_escape_is_error() {
        assert!(tokenize(r"'\z").is_err());
    }

    #[test]
    fn test_tokenize_string_literal() {
        assert_eq!(
            kinds(r#""ab""#),
            vec![Token::Str(vec![b'a', b'b'])]
        );
    }

    #[test]
    fn test_tokenize_string_escapes() {
        assert_eq!(
            kinds(r#""a\n\t\"\\""#),
            vec![Token::Str(vec![b'a', b'\n', b'\t', b'"', b'\\'])]
        );
    }

    #[test]
    fn test_tokenize_string_unknown_escape_is_error() {
        assert!(tokenize(r#""\q""#).is_err());
    }

    #[test]
    fn test_tokenize_unterminated_string_is_error() {
        assert!(tokenize(r#""abc"#).is_err());
    }

    #[test]
    fn test_tokenize_sigils() {
        assert_eq!(
            kinds("=>double ->x <-x"),
            vec![
                Token::DeclareOperation("double".into()),
                Token::DeclareValue("x".into()),
                Token::RestoreValue("x".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_sigil_with_space() {
        assert_eq!(
            kinds("=> double"),
            vec![Token::DeclareOperation("double".into())]
        );
    }

    #[test]
    fn test_tokenize_sigil_requires_name() {
        // `=>` with nothing nameable after it falls back to an identifier
        assert_eq!(kinds("=> 5"), vec![Token::Ident("=>".into()), Token::Number(5.0)]);
    }

    #[test]
    fn test_tokenize_embedded_arrow_stays_identifier() {
        // Sigils apply only at token start; `x->y` is one identifier
        assert_eq!(kinds("x->y"), vec![Token::Ident("x->y".into())]);
    }

    #[test]
    fn test_tokenize_delimiters() {
        assert_eq!(
            kinds("[ ] ( )"),
            vec![
                Token::ListOpen,
                Token::ListClose,
                Token::GroupOpen,
                Token::GroupClose,
            ]
        );
    }

    #[test]
    fn test_tokenize_skips_comments() {
        assert_eq!(
            kinds("1 -- the rest is ignored\n2"),
            vec![Token::Number(1.0), Token::Number(2.0)]
        );
    }

    #[test]
    fn test_tokenize_comment_ends_identifier() {
        assert_eq!(kinds("foo--bar\n"), vec![Token::Ident("foo".into())]);
    }

    #[test]
    fn test_tokenize_comment_at_eof() {
        assert_eq!(kinds("1 -- no newline"), vec![Token::Number(1.0)]);
    }

    #[test]
    fn test_tokenize_unexpected_character_error() {
        let err = tokenize("1 @ 2").unwrap_err();
        assert!(err.message().contains("unexpected character"));
        assert_eq!(err.span(), Span::new(2, 3));
    }

    #[test]
    fn test_tokenize_spans() {
        let tokens = tokenize("12 foo").unwrap();
        assert_eq!(tokens[0].1, Span::new(0, 2));
        assert_eq!(tokens[1].1, Span::new(3, 6));
    }

    #[test]
    fn test_tokenize_string_yields_character_bytes() {
        let tokens = tokenize(r#""hi there""#).unwrap();
        assert_eq!(tokens.len(), 1);
        match &tokens[0].0 {
            Token::Str(bytes) => assert_eq!(bytes, b"hi there"),
            other => panic!("expected Str, got {other:?}"),
        }
    }
}
