/// Shortest path algorithms
///
/// Implements Dijkstra's algorithm over a request-scoped `Graph`. Node
/// selection is stable: among unvisited nodes with equal distance the one
/// discovered first wins, so identical input always yields the same path.

use super::{AlgorithmError, AlgorithmResult};
use crate::graph::{EdgeSlot, Graph, NodeIndex};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tokio_util::sync::CancellationToken;

/// Result of shortest path computation
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathResult {
    /// Path as a sequence of node names, start and end inclusive
    pub path: Vec<String>,
    /// Total weight
    pub cost: f64,
    /// Edge instance used for the final hop (None when start == end)
    pub last_edge: Option<EdgeSlot>,
}

/// Pluggable single-pair solver
///
/// Implementations must poll `cancel` often enough that a cancelled
/// computation returns promptly.
pub trait PathSolver: Send + Sync {
    fn solve(
        &self,
        graph: &Graph,
        start: &str,
        end: &str,
        cancel: &CancellationToken,
    ) -> AlgorithmResult<ShortestPathResult>;
}

/// Default solver backed by `dijkstra`
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraSolver;

impl PathSolver for DijkstraSolver {
    fn solve(
        &self,
        graph: &Graph,
        start: &str,
        end: &str,
        cancel: &CancellationToken,
    ) -> AlgorithmResult<ShortestPathResult> {
        dijkstra(graph, start, end, cancel)
    }
}

/// Node in priority queue for Dijkstra's algorithm
#[derive(Debug, Clone, Copy)]
struct DijkstraNode {
    vertex: NodeIndex,
    cost: f64,
}

impl Ord for DijkstraNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap; lower discovery index wins ties
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for DijkstraNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DijkstraNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DijkstraNode {}

/// Find the shortest path from `start` to `end`
///
/// # Arguments
/// * `graph` - Graph to search
/// * `start` - Start node name
/// * `end` - End node name
/// * `cancel` - Checked before every node expansion
///
/// # Returns
/// * `Ok(ShortestPathResult)` - Shortest path found (`[start]` if start == end)
/// * `Err(AlgorithmError::PathNotFound)` - No walk exists
/// * `Err(AlgorithmError::Cancelled)` - `cancel` fired mid-search
pub fn dijkstra(
    graph: &Graph,
    start: &str,
    end: &str,
    cancel: &CancellationToken,
) -> AlgorithmResult<ShortestPathResult> {
    if start == end {
        return Ok(ShortestPathResult {
            path: vec![start.to_string()],
            cost: 0.0,
            last_edge: None,
        });
    }

    let not_found = || AlgorithmError::PathNotFound {
        start: start.to_string(),
        end: end.to_string(),
    };

    // An endpoint that appears in no edge has no out-edges and no in-edges
    let source = graph.node_index(start).ok_or_else(not_found)?;
    let target = graph.node_index(end).ok_or_else(not_found)?;

    let node_count = graph.node_count();
    let mut distances = vec![f64::INFINITY; node_count];
    let mut predecessors: Vec<Option<EdgeSlot>> = vec![None; node_count];
    let mut visited = vec![false; node_count];
    let mut heap = BinaryHeap::new();
    let mut expanded = 0usize;

    distances[source] = 0.0;
    heap.push(DijkstraNode {
        vertex: source,
        cost: 0.0,
    });

    while let Some(DijkstraNode { vertex, cost }) = heap.pop() {
        // Skip stale queue entries
        if visited[vertex] {
            continue;
        }

        if cancel.is_cancelled() {
            return Err(AlgorithmError::Cancelled { expanded });
        }

        visited[vertex] = true;
        expanded += 1;

        if vertex == target {
            break;
        }

        for (position, neighbor) in graph.neighbors(vertex).iter().enumerate() {
            if visited[neighbor.to] {
                continue;
            }

            let new_cost = cost + neighbor.dist;
            if new_cost < distances[neighbor.to] {
                distances[neighbor.to] = new_cost;
                predecessors[neighbor.to] = Some(EdgeSlot {
                    from: vertex,
                    position,
                });
                heap.push(DijkstraNode {
                    vertex: neighbor.to,
                    cost: new_cost,
                });
            }
        }
    }

    let last_edge = predecessors[target].ok_or_else(not_found)?;

    Ok(ShortestPathResult {
        path: reconstruct_path(graph, source, target, &predecessors),
        cost: distances[target],
        last_edge: Some(last_edge),
    })
}

/// Reconstruct path from predecessors
fn reconstruct_path(
    graph: &Graph,
    start: NodeIndex,
    end: NodeIndex,
    predecessors: &[Option<EdgeSlot>],
) -> Vec<String> {
    let mut path = Vec::new();
    let mut current = end;

    // Walk backwards from end to start
    while current != start {
        path.push(graph.node_name(current).to_string());

        match predecessors[current] {
            Some(slot) => current = slot.from,
            None => break,
        }
    }

    path.push(graph.node_name(start).to_string());

    // Reverse to get start -> end order
    path.reverse();
    path
}
