/// Alternative path policy
///
/// The alternative route is the shortest walk in the graph once the one
/// edge instance used by the optimal path's final hop has been removed.

use super::{AlgorithmResult, PathSolver, ShortestPathResult};
use crate::graph::{Graph, Neighbor};
use tokio_util::sync::CancellationToken;

/// Remove the edge instance the optimal path used for its final hop
///
/// Returns the removed edge, or `None` for a single-node path where there
/// is no final hop and the graph is left untouched.
pub fn prune_last_hop(graph: &mut Graph, optimal: &ShortestPathResult) -> Option<Neighbor> {
    let slot = optimal.last_edge?;
    graph.remove_edge(slot)
}

/// Prune the optimal final hop, then solve again on the same graph
///
/// The second pass always runs, even when nothing was pruned.
pub fn solve_alternative(
    solver: &dyn PathSolver,
    graph: &mut Graph,
    start: &str,
    end: &str,
    optimal: &ShortestPathResult,
    cancel: &CancellationToken,
) -> AlgorithmResult<ShortestPathResult> {
    prune_last_hop(graph, optimal);
    solver.solve(graph, start, end, cancel)
}
