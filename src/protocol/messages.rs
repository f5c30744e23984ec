/// Request and response messages
///
/// Field names match the wire schema (`start_endpoint`, `path_opt`, ...).
/// Every field has a serde default so that partially filled messages
/// decode and are rejected by validation instead of by the decoder.

use super::{PathError, PathResult};
use crate::graph::Graph;
use crate::types::{Edge, PathPair};
use serde::{Deserialize, Serialize};

/// Wrapper around a connection list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConnectionList {
    #[serde(default)]
    pub connections: Vec<Edge>,
}

impl From<Vec<Edge>> for ConnectionList {
    fn from(connections: Vec<Edge>) -> Self {
        Self { connections }
    }
}

/// Unary request: the whole graph in one message
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PathRequest {
    #[serde(default)]
    pub start_endpoint: String,

    #[serde(default)]
    pub end_endpoint: String,

    #[serde(default)]
    pub connections: Option<ConnectionList>,
}

impl PathRequest {
    pub fn new(start: impl Into<String>, end: impl Into<String>, connections: Vec<Edge>) -> Self {
        Self {
            start_endpoint: start.into(),
            end_endpoint: end.into(),
            connections: Some(connections.into()),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections
            .as_ref()
            .map(|list| list.connections.len())
            .unwrap_or(0)
    }

    /// Validate and build the request graph
    pub fn prepare(self) -> PathResult<PreparedRequest> {
        let edges = self
            .connections
            .map(|list| list.connections)
            .unwrap_or_default();

        PreparedRequest::build(self.start_endpoint, self.end_endpoint, edges)
    }
}

/// One slice of a map's connection list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConnectionChunk {
    #[serde(default)]
    pub mapname: String,

    #[serde(default)]
    pub chunkid: u32,

    #[serde(default)]
    pub connections: Vec<Edge>,
}

/// Streaming request: one chunk of the graph
///
/// Each chunk restates the endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PathChunkRequest {
    #[serde(default)]
    pub start_endpoint: String,

    #[serde(default)]
    pub end_endpoint: String,

    #[serde(default)]
    pub chunk: Option<ConnectionChunk>,
}

impl PathChunkRequest {
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        mapname: impl Into<String>,
        chunkid: u32,
        connections: Vec<Edge>,
    ) -> Self {
        Self {
            start_endpoint: start.into(),
            end_endpoint: end.into(),
            chunk: Some(ConnectionChunk {
                mapname: mapname.into(),
                chunkid,
                connections,
            }),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.chunk
            .as_ref()
            .map(|chunk| chunk.connections.len())
            .unwrap_or(0)
    }

    /// Check if this chunk names both endpoints
    pub fn has_endpoints(&self) -> bool {
        !self.start_endpoint.is_empty() && !self.end_endpoint.is_empty()
    }
}

/// Successful response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PathResponse {
    pub path_opt: Vec<String>,
    pub path_alt: Vec<String>,
}

impl From<PathPair> for PathResponse {
    fn from(pair: PathPair) -> Self {
        Self {
            path_opt: pair.optimal,
            path_alt: pair.alternative,
        }
    }
}

/// A validated request, ready for the solver
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub start: String,
    pub end: String,
    pub graph: Graph,
}

impl PreparedRequest {
    /// Validate required fields and build the graph
    ///
    /// # Errors
    /// * `InvalidArgument` if an endpoint is empty, there are no
    ///   connections, or a connection has an unusable weight
    pub fn build(start: String, end: String, edges: Vec<Edge>) -> PathResult<Self> {
        if start.is_empty() || end.is_empty() || edges.is_empty() {
            return Err(PathError::missing_fields());
        }

        let graph = Graph::from_edges(edges)?;
        Ok(Self { start, end, graph })
    }
}
