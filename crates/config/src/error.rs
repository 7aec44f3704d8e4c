//! Directive parsing errors.

use std::fmt;

use thiserror::Error;

/// Location of a token in a directive file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    /// File name the token came from
    pub file: String,
    /// 1-indexed line number; 0 when the input held no tokens
    pub line: usize,
}

impl Position {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// What went wrong while lexing or walking a directive
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveErrorKind {
    /// Too many or too few arguments on a directive line
    #[error("wrong argument count or unexpected line ending after '{after}'")]
    ArgumentCount { after: String },

    /// A quoted token was never closed
    #[error("unterminated quoted string")]
    UnterminatedQuote,

    /// A `}` without a matching `{`
    #[error("unexpected '}}' without an open block")]
    UnexpectedClosingBrace,

    /// A `{` that was never closed
    #[error("unclosed block: missing '}}'")]
    UnclosedBlock,

    /// Free-form message raised by a directive consumer
    #[error("{0}")]
    Message(String),
}

/// An error bound to a position in the directive input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}, at {position}")]
pub struct DirectiveError {
    pub position: Position,
    pub kind: DirectiveErrorKind,
}

impl DirectiveError {
    pub fn new(position: Position, kind: DirectiveErrorKind) -> Self {
        Self { position, kind }
    }

    /// Whether this is an argument-count error
    pub fn is_argument_count(&self) -> bool {
        matches!(self.kind, DirectiveErrorKind::ArgumentCount { .. })
    }
}

/// Result type for directive parsing
pub type DirectiveResult<T> = Result<T, DirectiveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_position() {
        let err = DirectiveError::new(
            Position::new("Caddyfile", 3),
            DirectiveErrorKind::ArgumentCount {
                after: "abc123".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "wrong argument count or unexpected line ending after 'abc123', at Caddyfile:3"
        );
        assert!(err.is_argument_count());

        let err = DirectiveError::new(
            Position::new("Caddyfile", 1),
            DirectiveErrorKind::UnexpectedClosingBrace,
        );
        assert!(err.to_string().contains("'}'"));
    }
}
