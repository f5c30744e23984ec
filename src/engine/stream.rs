/// Chunked request reassembly
///
/// `StreamAccumulator` owns the edge buffer of one inbound stream. Chunks
/// are appended in arrival order; the graph is built once, in `finish`,
/// after the caller signals end-of-stream.

use crate::protocol::{PathChunkRequest, PathError, PathResult, PreparedRequest, TransportError};
use crate::types::Edge;
use tracing::{debug, info, warn};

#[derive(Debug)]
enum StreamState {
    Receiving,
    Failed(TransportError),
}

/// Buffer for one streamed request
#[derive(Debug)]
pub struct StreamAccumulator {
    start: Option<String>,
    end: Option<String>,
    edges: Vec<Edge>,
    chunks: usize,
    state: StreamState,
}

impl Default for StreamAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self {
            start: None,
            end: None,
            edges: Vec::new(),
            chunks: 0,
            state: StreamState::Receiving,
        }
    }

    /// Append one chunk
    ///
    /// The first chunk naming both endpoints fixes them for the whole
    /// stream; later chunks that disagree are logged and otherwise ignored.
    /// Chunks arriving after a transport failure are dropped.
    pub fn push(&mut self, request: PathChunkRequest) {
        if let StreamState::Failed(_) = self.state {
            debug!("dropping chunk received after stream failure");
            return;
        }

        self.chunks += 1;

        if self.start.is_none() || self.end.is_none() {
            if request.has_endpoints() {
                self.start = Some(request.start_endpoint);
                self.end = Some(request.end_endpoint);
            }
        } else if request.has_endpoints()
            && (self.start.as_deref() != Some(request.start_endpoint.as_str())
                || self.end.as_deref() != Some(request.end_endpoint.as_str()))
        {
            warn!(
                start = ?self.start,
                end = ?self.end,
                chunk_start = %request.start_endpoint,
                chunk_end = %request.end_endpoint,
                "chunk endpoints differ from the first chunk, keeping the first"
            );
        }

        if let Some(chunk) = request.chunk {
            info!(
                mapname = %chunk.mapname,
                chunkid = chunk.chunkid,
                connection_count = chunk.connections.len(),
                "received a chunk of connections"
            );
            self.edges.extend(chunk.connections);
        }
    }

    /// Record a transport failure; the stream can no longer succeed
    pub fn fail(&mut self, err: TransportError) {
        if let StreamState::Receiving = self.state {
            self.state = StreamState::Failed(err);
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, StreamState::Failed(_))
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    pub fn connection_count(&self) -> usize {
        self.edges.len()
    }

    pub fn start_endpoint(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn end_endpoint(&self) -> Option<&str> {
        self.end.as_deref()
    }

    /// End-of-stream: validate and build the graph
    ///
    /// # Errors
    /// * `Internal` if the stream failed
    /// * `InvalidArgument` if endpoints or connections are missing
    pub fn finish(self) -> PathResult<PreparedRequest> {
        if let StreamState::Failed(err) = self.state {
            warn!(error = %err, chunks = self.chunks, "stream ended after transport failure");
            return Err(PathError::stream_interrupted());
        }

        info!(
            chunks = self.chunks,
            total_connections = self.edges.len(),
            "all chunks received"
        );

        PreparedRequest::build(
            self.start.unwrap_or_default(),
            self.end.unwrap_or_default(),
            self.edges,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Code, ConnectionChunk};

    fn chunk(start: &str, end: &str, id: u32, edges: &[(&str, &str, f64)]) -> PathChunkRequest {
        PathChunkRequest::new(
            start,
            end,
            "map_5",
            id,
            edges.iter().map(|(f, t, d)| Edge::new(*f, *t, *d)).collect(),
        )
    }

    #[test]
    fn test_accumulates_in_arrival_order() {
        let mut acc = StreamAccumulator::new();
        acc.push(chunk("A", "C", 1, &[("A", "B", 1.0)]));
        acc.push(chunk("A", "C", 2, &[("B", "C", 1.0), ("C", "A", 1.0)]));

        assert_eq!(acc.chunk_count(), 2);
        assert_eq!(acc.connection_count(), 3);

        let prepared = acc.finish().unwrap();
        let names: Vec<&str> = prepared.graph.node_names().collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(prepared.start, "A");
        assert_eq!(prepared.end, "C");
    }

    #[test]
    fn test_first_chunk_endpoints_win() {
        let mut acc = StreamAccumulator::new();
        acc.push(chunk("A", "C", 1, &[("A", "B", 1.0)]));
        acc.push(chunk("X", "Y", 2, &[("B", "C", 1.0)]));

        assert_eq!(acc.start_endpoint(), Some("A"));
        assert_eq!(acc.end_endpoint(), Some("C"));
    }

    #[test]
    fn test_endpoints_taken_from_first_complete_chunk() {
        let mut acc = StreamAccumulator::new();
        acc.push(chunk("", "", 1, &[("A", "B", 1.0)]));
        assert_eq!(acc.start_endpoint(), None);

        acc.push(chunk("A", "B", 2, &[]));
        assert_eq!(acc.start_endpoint(), Some("A"));
        assert!(acc.finish().is_ok());
    }

    #[test]
    fn test_missing_endpoints_rejected() {
        let mut acc = StreamAccumulator::new();
        acc.push(PathChunkRequest {
            chunk: Some(ConnectionChunk {
                mapname: "map_5".to_string(),
                chunkid: 1,
                connections: vec![Edge::new("City_0", "City_1", 1.0)],
            }),
            ..Default::default()
        });

        let err = acc.finish().unwrap_err();
        assert_eq!(err, PathError::missing_fields());
    }

    #[test]
    fn test_empty_stream_rejected() {
        let acc = StreamAccumulator::new();
        assert_eq!(acc.finish().unwrap_err().code(), Code::InvalidArgument);

        // Endpoints but no connections
        let mut acc = StreamAccumulator::new();
        acc.push(PathChunkRequest {
            start_endpoint: "A".to_string(),
            end_endpoint: "B".to_string(),
            chunk: None,
        });
        assert_eq!(acc.finish().unwrap_err().code(), Code::InvalidArgument);
    }

    #[test]
    fn test_failure_is_terminal() {
        let mut acc = StreamAccumulator::new();
        acc.push(chunk("A", "B", 1, &[("A", "B", 1.0)]));
        acc.fail(TransportError::new("connection reset"));
        acc.push(chunk("A", "B", 2, &[("A", "C", 1.0)]));

        assert!(acc.is_failed());
        assert_eq!(acc.chunk_count(), 1);
        assert_eq!(acc.finish().unwrap_err(), PathError::stream_interrupted());
    }
}
