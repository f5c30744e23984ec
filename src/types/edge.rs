use serde::{Deserialize, Serialize};

/// Weighted, directed connection between two named nodes
///
/// Represents one entry of a caller-supplied connection list:
/// - `from`: source node name
/// - `to`: target node name
/// - `dist`: non-negative weight
///
/// Node names are opaque and compared by exact string match. An
/// undirected road is expressed by supplying both directions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    /// Source node
    #[serde(default)]
    pub from: String,

    /// Target node
    #[serde(default)]
    pub to: String,

    /// Weight of the connection (missing on the wire means 0)
    #[serde(default)]
    pub dist: f64,
}

impl Edge {
    /// Create a new edge
    pub fn new(from: impl Into<String>, to: impl Into<String>, dist: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            dist,
        }
    }

    /// Create the same connection in the opposite direction
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            dist: self.dist,
        }
    }

    /// Check if this edge starts and ends at the same node
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Check whether the weight can be used by the solver
    ///
    /// Weights must be finite and non-negative.
    pub fn has_valid_weight(&self) -> bool {
        self.dist.is_finite() && self.dist >= 0.0
    }
}
