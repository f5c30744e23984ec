/// Adjacency-list graph over named nodes
///
/// Node names are interned to dense indices in first-seen order while
/// edges are scanned (`from` before `to`). That order is the solver's
/// tie-break order, so it must stay stable for identical input.

use super::{GraphError, GraphResult};
use crate::types::Edge;
use std::collections::HashMap;

/// Dense node identifier, assigned in discovery order
pub type NodeIndex = usize;

/// Outgoing connection stored in an adjacency list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Target node
    pub to: NodeIndex,
    /// Connection weight
    pub dist: f64,
}

/// Position of one specific edge instance in the graph
///
/// Parallel edges between the same pair occupy different slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeSlot {
    /// Source node
    pub from: NodeIndex,
    /// Position within the source node's adjacency list
    pub position: usize,
}

/// Directed, weighted multigraph
///
/// Parallel edges and self-loops are kept as supplied. No reverse edges
/// are inserted implicitly.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    names: Vec<String>,
    index: HashMap<String, NodeIndex>,
    adjacency: Vec<Vec<Neighbor>>,
    edge_count: usize,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from edges in the given order
    ///
    /// # Errors
    /// Returns `GraphError::InvalidWeight` for a negative or non-finite weight
    pub fn from_edges<I>(edges: I) -> GraphResult<Self>
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    /// Append one edge to the source node's adjacency list
    pub fn add_edge(&mut self, edge: Edge) -> GraphResult<EdgeSlot> {
        if !edge.has_valid_weight() {
            return Err(GraphError::InvalidWeight {
                from: edge.from,
                to: edge.to,
                dist: edge.dist,
            });
        }

        let from = self.intern(edge.from);
        let to = self.intern(edge.to);

        let list = &mut self.adjacency[from];
        list.push(Neighbor { to, dist: edge.dist });
        self.edge_count += 1;

        Ok(EdgeSlot {
            from,
            position: list.len() - 1,
        })
    }

    /// Add a node with no edges, returning its index
    ///
    /// Existing nodes keep their index.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeIndex {
        self.intern(name.into())
    }

    fn intern(&mut self, name: String) -> NodeIndex {
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }

        let idx = self.names.len();
        self.index.insert(name.clone(), idx);
        self.names.push(name);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Look up a node by name
    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    /// Name of a node
    ///
    /// # Panics
    /// Panics if `idx` was not issued by this graph
    pub fn node_name(&self, idx: NodeIndex) -> &str {
        &self.names[idx]
    }

    /// Node names in discovery order
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Outgoing edges of a node, in insertion order
    pub fn neighbors(&self, idx: NodeIndex) -> &[Neighbor] {
        self.adjacency.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve an edge slot
    pub fn edge(&self, slot: EdgeSlot) -> Option<&Neighbor> {
        self.adjacency.get(slot.from)?.get(slot.position)
    }

    /// Find the first edge instance from one node to another
    pub fn find_edge(&self, from: &str, to: &str) -> Option<EdgeSlot> {
        let from_idx = self.node_index(from)?;
        let to_idx = self.node_index(to)?;

        self.neighbors(from_idx)
            .iter()
            .position(|n| n.to == to_idx)
            .map(|position| EdgeSlot {
                from: from_idx,
                position,
            })
    }

    /// Remove exactly one edge instance
    ///
    /// Later slots of the same source node shift down by one. Nodes are
    /// never removed, even if they lose all their edges.
    pub fn remove_edge(&mut self, slot: EdgeSlot) -> Option<Neighbor> {
        let list = self.adjacency.get_mut(slot.from)?;
        if slot.position >= list.len() {
            return None;
        }

        self.edge_count -= 1;
        Some(list.remove(slot.position))
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
