/// Graph algorithms module
///
/// This module implements the shortest-path solver and the
/// alternative-path policy built on top of it.

pub mod alternative;
pub mod shortest_path;

pub use alternative::{prune_last_hop, solve_alternative};
pub use shortest_path::{dijkstra, DijkstraSolver, PathSolver, ShortestPathResult};

use thiserror::Error;

/// Algorithm errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlgorithmError {
    #[error("Path not found between {start} and {end}")]
    PathNotFound { start: String, end: String },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Computation cancelled after {expanded} node expansions")]
    Cancelled { expanded: usize },
}

pub type AlgorithmResult<T> = Result<T, AlgorithmError>;
