/// Core data types for the path engine
///
/// This module defines the values that cross the engine boundary:
/// - Edge: weighted connection between two named nodes
/// - PathPair: optimal and alternative routes for one request

pub mod edge;
pub mod path;

pub use edge::Edge;
pub use path::{PathPair, PathShapeError};
