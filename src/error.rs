use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Category of an evaluation failure, as surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    UnboundNameError,
    TypeError,
    DimensionMismatchError,
    UnsupportedAngleError,
    UnsupportedAnchorError,
    InvalidArgumentError,
    ResourceLimitError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UnboundNameError => "UnboundNameError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::DimensionMismatchError => "DimensionMismatchError",
            ErrorKind::UnsupportedAngleError => "UnsupportedAngleError",
            ErrorKind::UnsupportedAnchorError => "UnsupportedAnchorError",
            ErrorKind::InvalidArgumentError => "InvalidArgumentError",
            ErrorKind::ResourceLimitError => "ResourceLimitError",
        };
        f.write_str(name)
    }
}

/// A fatal failure of one evaluation pass. There is no partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("UnboundNameError: '{0}' is not defined")]
    UnboundName(String),
    #[error("TypeError: {0}")]
    Type(String),
    #[error("DimensionMismatchError: {0}")]
    DimensionMismatch(String),
    #[error("UnsupportedAngleError: rotation angle {0} is not one of 0, 90, 180, 270")]
    UnsupportedAngle(String),
    #[error("UnsupportedAnchorError: anchor '{0}' is not one of TL, TR, BL, BR, C")]
    UnsupportedAnchor(String),
    #[error("InvalidArgumentError: {0}")]
    InvalidArgument(String),
    #[error("ResourceLimitError: {0}")]
    ResourceLimit(String),
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::UnboundName(_) => ErrorKind::UnboundNameError,
            EvalError::Type(_) => ErrorKind::TypeError,
            EvalError::DimensionMismatch(_) => ErrorKind::DimensionMismatchError,
            EvalError::UnsupportedAngle(_) => ErrorKind::UnsupportedAngleError,
            EvalError::UnsupportedAnchor(_) => ErrorKind::UnsupportedAnchorError,
            EvalError::InvalidArgument(_) => ErrorKind::InvalidArgumentError,
            EvalError::ResourceLimit(_) => ErrorKind::ResourceLimitError,
        }
    }

    pub(crate) fn type_error(msg: impl Into<String>) -> Self {
        EvalError::Type(msg.into())
    }
}

/// Syntax error with a 1-based source location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {line}, column {column}] {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Anything that can go wrong between source text and a finished design.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuiltError {
    #[error(transparent)]
    Syntax(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl QuiltError {
    /// Source location, available only for lex/parse failures.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            QuiltError::Syntax(e) => Some((e.line, e.column)),
            QuiltError::Eval(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_match_display_prefix() {
        let errs = [
            EvalError::UnboundName("x".into()),
            EvalError::Type("bad".into()),
            EvalError::DimensionMismatch("bad".into()),
            EvalError::UnsupportedAngle("45".into()),
            EvalError::UnsupportedAnchor("MID".into()),
            EvalError::InvalidArgument("bad".into()),
            EvalError::ResourceLimit("bad".into()),
        ];
        for e in errs {
            let shown = e.to_string();
            assert!(
                shown.starts_with(&e.kind().to_string()),
                "{shown} should start with {}",
                e.kind()
            );
        }
    }

    #[test]
    fn located_errors_render_line_and_column() {
        let err: QuiltError = ParseError::new(3, 7, "expected ')'").into();
        assert_eq!(err.to_string(), "[line 3, column 7] expected ')'");
        assert_eq!(err.location(), Some((3, 7)));

        let err: QuiltError = EvalError::UnboundName("x".into()).into();
        assert_eq!(err.location(), None);
    }
}
