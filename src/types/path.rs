use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for PathPair validation
#[derive(Error, Debug, PartialEq)]
pub enum PathShapeError {
    #[error("{which} path is empty")]
    EmptyPath { which: &'static str },

    #[error("{which} path starts at {found}, expected {expected}")]
    WrongStart {
        which: &'static str,
        found: String,
        expected: String,
    },

    #[error("{which} path ends at {found}, expected {expected}")]
    WrongEnd {
        which: &'static str,
        found: String,
        expected: String,
    },
}

/// PathPair holds the two routes computed for one request
///
/// Invariants:
/// - both sequences are non-empty
/// - both start at the requested start endpoint and end at the end endpoint
/// - a single-node sequence only occurs when start == end
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathPair {
    /// Shortest walk in the full graph
    pub optimal: Vec<String>,

    /// Shortest walk once the optimal path's final hop is removed
    pub alternative: Vec<String>,
}

impl PathPair {
    /// Create a pair and check it against the requested endpoints
    pub fn from_parts(
        optimal: Vec<String>,
        alternative: Vec<String>,
        start: &str,
        end: &str,
    ) -> Result<Self, PathShapeError> {
        let pair = Self {
            optimal,
            alternative,
        };
        pair.validate(start, end)?;
        Ok(pair)
    }

    /// Validate the pair invariants
    pub fn validate(&self, start: &str, end: &str) -> Result<(), PathShapeError> {
        check_route("optimal", &self.optimal, start, end)?;
        check_route("alternative", &self.alternative, start, end)
    }

    /// Final hop of the optimal path, if it has one
    pub fn optimal_last_hop(&self) -> Option<(&str, &str)> {
        last_hop(&self.optimal)
    }

    /// Final hop of the alternative path, if it has one
    pub fn alternative_last_hop(&self) -> Option<(&str, &str)> {
        last_hop(&self.alternative)
    }

    /// Check whether the two routes differ
    pub fn is_distinct(&self) -> bool {
        self.optimal != self.alternative
    }
}

fn check_route(
    which: &'static str,
    route: &[String],
    start: &str,
    end: &str,
) -> Result<(), PathShapeError> {
    let (first, last) = match (route.first(), route.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(PathShapeError::EmptyPath { which }),
    };

    if first != start {
        return Err(PathShapeError::WrongStart {
            which,
            found: first.clone(),
            expected: start.to_string(),
        });
    }

    if last != end {
        return Err(PathShapeError::WrongEnd {
            which,
            found: last.clone(),
            expected: end.to_string(),
        });
    }

    Ok(())
}

fn last_hop(route: &[String]) -> Option<(&str, &str)> {
    match route {
        [.., before, last] => Some((before.as_str(), last.as_str())),
        _ => None,
    }
}
