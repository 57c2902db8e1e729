//! Errors emitted by individual evaluation branches.
//!
//! None of these abort a stream: each one ends exactly one branch and is
//! handed to the caller in place of a match.
use serde_json::Value;
use std::{borrow::Cow, error::Error, fmt, num::ParseIntError};

/// Why the text inside a bracket accessor could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// An integer token failed to parse, e.g. the `x` in `[x]`.
    Integer(ParseIntError),
    /// The bracket text does not follow the selector grammar at all.
    Syntax(String),
}

impl Error for SelectorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Integer(err) => Some(err),
            Self::Syntax(_) => None,
        }
    }
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(err) => write!(f, "{err}"),
            Self::Syntax(message) => write!(f, "invalid selector: {message}"),
        }
    }
}

impl From<ParseIntError> for SelectorError {
    fn from(err: ParseIntError) -> Self {
        Self::Integer(err)
    }
}

/// Error ending a single evaluation branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError<'a> {
    /// The field is absent, or the path tried to continue through a value
    /// that cannot hold it (a scalar, or an array addressed by name).
    NotFound,
    /// A single index resolved outside `[0, length)`.
    OutOfRange {
        /// The bracket text as written, e.g. `"[^5]"`.
        selector: String,
        /// Length of the array the selector was applied to.
        length: usize,
    },
    /// The bracket text could not be parsed.
    ParseFailure {
        /// The bracket text as written.
        selector: String,
        /// What went wrong.
        cause: SelectorError,
    },
    /// The path ended on an object or array while containers are rejected,
    /// see [`ContainerPolicy::Reject`](crate::path::ContainerPolicy::Reject).
    UnexpectedContainer {
        /// The container the path ended on.
        value: Cow<'a, Value>,
    },
}

impl EvalError<'_> {
    /// Detaches the error from the lifetime of the evaluated document.
    #[must_use]
    pub fn into_owned(self) -> EvalError<'static> {
        match self {
            Self::NotFound => EvalError::NotFound,
            Self::OutOfRange { selector, length } => {
                EvalError::OutOfRange { selector, length }
            }
            Self::ParseFailure { selector, cause } => {
                EvalError::ParseFailure { selector, cause }
            }
            Self::UnexpectedContainer { value } => {
                EvalError::UnexpectedContainer {
                    value: Cow::Owned(value.into_owned()),
                }
            }
        }
    }
}

impl Error for EvalError<'_> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ParseFailure { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

impl fmt::Display for EvalError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::OutOfRange { selector, length } => {
                write!(f, "index out of range {selector} with length {length}")
            }
            Self::ParseFailure { selector, cause } => {
                write!(f, "could not parse {selector}: {cause}")
            }
            Self::UnexpectedContainer { value } => {
                let kind = if value.is_array() { "array" } else { "object" };
                write!(f, "found other type: {kind}")
            }
        }
    }
}
