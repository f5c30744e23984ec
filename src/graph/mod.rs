/// Request-scoped graph construction
///
/// Turns a flat connection list into an adjacency structure. A graph is
/// built fresh for every request and never shared between requests.

pub mod adjacency;

pub use adjacency::{EdgeSlot, Graph, Neighbor, NodeIndex};

use thiserror::Error;

/// Graph construction errors
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Invalid connection weight {dist} for {from} -> {to}")]
    InvalidWeight { from: String, to: String, dist: f64 },
}

pub type GraphResult<T> = Result<T, GraphError>;
