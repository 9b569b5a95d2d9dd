//! Parser diagnostics.

use std::fmt;

use crate::token::{Position, Token};

/// One diagnostic from the parser.
///
/// Renders either `found X, expected A, B at line L, char C` or, for
/// message-style diagnostics, `<message> at line L, char C`. Lines and
/// columns are one-based in the rendered text; the stored position stays
/// zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub found: String,
    pub expected: Vec<&'static str>,
    pub message: Option<String>,
    pub position: Position,
}

impl ParseError {
    pub fn unexpected(found: &Token, expected: &[&'static str]) -> ParseError {
        ParseError {
            found: found.lexeme.clone(),
            expected: expected.to_vec(),
            message: None,
            position: found.position,
        }
    }

    pub fn message(message: impl Into<String>, position: Position) -> ParseError {
        ParseError {
            found: String::new(),
            expected: Vec::new(),
            message: Some(message.into()),
            position,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self.position.line + 1;
        let char = self.position.column + 1;
        match &self.message {
            Some(message) => write!(f, "{message} at line {line}, char {char}"),
            None => write!(
                f,
                "found {}, expected {} at line {line}, char {char}",
                self.found,
                self.expected.join(", ")
            ),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn renders_found_expected_with_one_based_position() {
        let token = Token {
            kind: TokenKind::Add,
            lexeme: "+".to_string(),
            position: Position { line: 0, column: 4 },
        };
        let err = ParseError::unexpected(&token, &["*"]);
        assert_eq!(err.to_string(), "found +, expected * at line 1, char 5");
    }

    #[test]
    fn renders_message_diagnostics() {
        let err = ParseError::message(
            "99999999999999999999 is not number",
            Position { line: 2, column: 0 },
        );
        assert_eq!(
            err.to_string(),
            "99999999999999999999 is not number at line 3, char 1"
        );
    }
}
