/// Splitting connection lists into stream chunks

use crate::protocol::PathChunkRequest;
use crate::types::Edge;

/// Connections per chunk used by the map store
pub const DEFAULT_CHUNK_SIZE: usize = 50_000;

/// Split `edges` into consecutive chunk requests of at most `chunk_size`
///
/// Every chunk restates the endpoints and carries `mapname` with a
/// zero-based `chunkid`. Concatenating the chunks' connections in order
/// gives back `edges`. An empty list yields no chunks; a `chunk_size` of
/// zero is treated as one.
pub fn split_into_chunks(
    mapname: &str,
    start: &str,
    end: &str,
    edges: &[Edge],
    chunk_size: usize,
) -> Vec<PathChunkRequest> {
    edges
        .chunks(chunk_size.max(1))
        .enumerate()
        .map(|(id, part)| PathChunkRequest::new(start, end, mapname, id as u32, part.to_vec()))
        .collect()
}
