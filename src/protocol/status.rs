/// Status taxonomy returned to callers
///
/// Codes and message texts follow the RPC convention used by existing
/// clients, which pattern-match on the messages.

use crate::graph::GraphError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub const MISSING_FIELDS_MESSAGE: &str =
    "Missing required fields: start_endpoint, end_endpoint, or connections";
pub const DEADLINE_EXCEEDED_MESSAGE: &str = "Dijkstra computation took too long and was aborted";
pub const STREAM_INTERRUPTED_MESSAGE: &str = "Internal error while streaming connection chunks";

/// RPC status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Code {
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    Internal = 13,
}

impl Code {
    /// Numeric value on the wire
    pub fn value(self) -> i32 {
        self as i32
    }

    /// Canonical upper-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Code::NotFound => "NOT_FOUND",
            Code::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of one path request
///
/// Every request ends with exactly one `PathResponse` or one `PathError`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    DeadlineExceeded(String),

    #[error("{0}")]
    Internal(String),
}

impl PathError {
    pub fn missing_fields() -> Self {
        PathError::InvalidArgument(MISSING_FIELDS_MESSAGE.to_string())
    }

    pub fn no_path(start: &str, end: &str) -> Self {
        PathError::NotFound(format!("No path found between {} and {}", start, end))
    }

    pub fn no_alt_path(start: &str, end: &str) -> Self {
        PathError::NotFound(format!("No alt path found between {} and {}", start, end))
    }

    pub fn deadline_exceeded() -> Self {
        PathError::DeadlineExceeded(DEADLINE_EXCEEDED_MESSAGE.to_string())
    }

    pub fn stream_interrupted() -> Self {
        PathError::Internal(STREAM_INTERRUPTED_MESSAGE.to_string())
    }

    /// Status code for this failure
    pub fn code(&self) -> Code {
        match self {
            PathError::InvalidArgument(_) => Code::InvalidArgument,
            PathError::NotFound(_) => Code::NotFound,
            PathError::DeadlineExceeded(_) => Code::DeadlineExceeded,
            PathError::Internal(_) => Code::Internal,
        }
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        match self {
            PathError::InvalidArgument(msg)
            | PathError::NotFound(msg)
            | PathError::DeadlineExceeded(msg)
            | PathError::Internal(msg) => msg,
        }
    }
}

impl From<GraphError> for PathError {
    fn from(err: GraphError) -> Self {
        PathError::InvalidArgument(err.to_string())
    }
}

pub type PathResult<T> = Result<T, PathError>;

/// Failure of the inbound chunk stream itself
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Transport error: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError(message.into())
    }
}
