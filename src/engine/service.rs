/// Path service: the unary and streaming entry points
///
/// Both entry points share one pipeline:
/// validate -> build graph -> optimal pass -> prune final hop ->
/// alternative pass -> respond. Each pass runs under a
/// `DeadlineSupervisor`; only streaming requests are time-bounded unless
/// `EngineConfig::bound_unary` is set.

use super::deadline::{DeadlineError, DeadlineSupervisor, SolvePhase};
use super::stream::StreamAccumulator;
use super::EngineConfig;
use crate::algorithms::{solve_alternative, AlgorithmError, DijkstraSolver, PathSolver};
use crate::protocol::{
    PathChunkRequest, PathError, PathRequest, PathResponse, PathResult, PreparedRequest,
    TransportError,
};
use crate::types::PathPair;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Process-wide service object
///
/// Holds no per-request state; one instance serves any number of
/// concurrent requests.
#[derive(Clone)]
pub struct PathService {
    config: EngineConfig,
    solver: Arc<dyn PathSolver>,
}

impl PathService {
    /// Create a service backed by the Dijkstra solver
    pub fn new(config: EngineConfig) -> Self {
        Self::with_solver(config, Arc::new(DijkstraSolver))
    }

    /// Create a service with a custom solver
    pub fn with_solver(config: EngineConfig, solver: Arc<dyn PathSolver>) -> Self {
        Self { config, solver }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// GetOptimalPath: the whole graph in one request
    pub async fn get_optimal_path(&self, request: PathRequest) -> PathResult<PathResponse> {
        info!(
            start = %request.start_endpoint,
            end = %request.end_endpoint,
            connection_count = request.connection_count(),
            "received GetOptimalPath request"
        );

        let prepared = request.prepare().map_err(|err| {
            warn!(error = %err, "invalid GetOptimalPath request");
            err
        })?;

        self.compute(prepared, self.config.unary_deadline()).await
    }

    /// GetOptimalPathStream: the graph as an ordered sequence of chunks
    ///
    /// The stream is drained to its end before any computation starts.
    /// A transport error terminates the request with `Internal`.
    pub async fn get_optimal_path_stream<S>(&self, chunks: S) -> PathResult<PathResponse>
    where
        S: Stream<Item = Result<PathChunkRequest, TransportError>>,
    {
        futures::pin_mut!(chunks);
        let mut accumulator = StreamAccumulator::new();

        while let Some(item) = chunks.next().await {
            match item {
                Ok(chunk) => accumulator.push(chunk),
                Err(err) => {
                    error!(
                        error = %err,
                        chunks = accumulator.chunk_count(),
                        "error occurred while streaming connection chunks"
                    );
                    accumulator.fail(err);
                    break;
                }
            }
        }

        let prepared = accumulator.finish().map_err(|err| {
            warn!(error = %err, "invalid GetOptimalPathStream request");
            err
        })?;

        self.compute(prepared, self.config.stream_deadline()).await
    }

    async fn compute(
        &self,
        prepared: PreparedRequest,
        deadline: Option<Duration>,
    ) -> PathResult<PathResponse> {
        let PreparedRequest { start, end, graph } = prepared;
        info!(
            node_count = graph.node_count(),
            edge_count = graph.edge_count(),
            "adjacency list built"
        );

        let supervisor = DeadlineSupervisor::new(deadline);

        // Optimal pass; the graph travels with the task and comes back
        let solver = Arc::clone(&self.solver);
        let (task_start, task_end) = (start.clone(), end.clone());
        let (mut graph, optimal) = supervisor
            .run(SolvePhase::Optimal, move |cancel| {
                let result = solver.solve(&graph, &task_start, &task_end, &cancel);
                (graph, result)
            })
            .await
            .map_err(phase_failure)?;

        let optimal =
            optimal.map_err(|err| solver_failure(err, || PathError::no_path(&start, &end)))?;
        info!(
            hops = optimal.path.len().saturating_sub(1),
            cost = optimal.cost,
            "optimal path found"
        );

        // Alternative pass on the pruned graph
        let solver = Arc::clone(&self.solver);
        let (task_start, task_end) = (start.clone(), end.clone());
        let task_optimal = optimal.clone();
        let alternative = supervisor
            .run(SolvePhase::Alternative, move |cancel| {
                solve_alternative(
                    &*solver,
                    &mut graph,
                    &task_start,
                    &task_end,
                    &task_optimal,
                    &cancel,
                )
            })
            .await
            .map_err(phase_failure)?
            .map_err(|err| {
                if let AlgorithmError::PathNotFound { .. } = err {
                    warn!(start = %start, end = %end, "no alternative path found");
                }
                solver_failure(err, || PathError::no_alt_path(&start, &end))
            })?;

        info!(path_alt = ?alternative.path, cost = alternative.cost, "alternative path found");

        let pair = PathPair::from_parts(optimal.path, alternative.path, &start, &end)
            .map_err(|err| PathError::Internal(err.to_string()))?;

        Ok(pair.into())
    }
}

fn phase_failure(err: DeadlineError) -> PathError {
    match err {
        DeadlineError::Elapsed { .. } => {
            error!(error = %err, "path computation timed out");
            PathError::deadline_exceeded()
        }
        DeadlineError::Join { .. } => {
            error!(error = %err, "path computation failed");
            PathError::Internal(err.to_string())
        }
    }
}

fn solver_failure(err: AlgorithmError, not_found: impl FnOnce() -> PathError) -> PathError {
    match err {
        AlgorithmError::PathNotFound { .. } => not_found(),
        AlgorithmError::Cancelled { .. } => PathError::deadline_exceeded(),
        AlgorithmError::InvalidParameters(msg) => PathError::InvalidArgument(msg),
    }
}
