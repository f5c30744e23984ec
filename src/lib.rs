/// navgraph
///
/// Computes an optimal and a distinct alternative shortest path between two
/// named endpoints in a caller-supplied weighted graph.
///
/// # Architecture
///
/// ```text
/// ┌──────────────────────────────────────────────────┐
/// │           navgraph path engine                   │
/// ├──────────────────────────────────────────────────┤
/// │  ┌────────────────────────────────┐              │
/// │  │   Request Protocol Handler     │ unary/stream │
/// │  └────────────┬───────────────────┘              │
/// │               ↓                                   │
/// │  ┌────────────────────────────────┐              │
/// │  │   Graph Builder                │              │
/// │  └────────────┬───────────────────┘              │
/// │               ↓                                   │
/// │  ┌────────────────────────────────┐              │
/// │  │   Deadline Supervisor          │              │
/// │  │     └─ Shortest-Path Solver ×2 │              │
/// │  └────────────────────────────────┘              │
/// └──────────────────────────────────────────────────┘
/// ```
///
/// # Modules
///
/// - `types`: Core data types (Edge, PathPair)
/// - `graph`: Adjacency-list construction
/// - `algorithms`: Dijkstra solver and alternative-path policy
/// - `engine`: Deadline supervision, stream reassembly, the path service
/// - `protocol`: Request/response messages and status codes
/// - `tools`: Connection import/export and chunking

pub mod algorithms;
pub mod engine;
pub mod graph;
pub mod protocol;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use types::{Edge, PathPair, PathShapeError};

// Re-export graph types
pub use graph::{EdgeSlot, Graph, GraphError, GraphResult, Neighbor, NodeIndex};

// Re-export algorithm types
pub use algorithms::{
    dijkstra, prune_last_hop, solve_alternative, AlgorithmError, AlgorithmResult, DijkstraSolver,
    PathSolver, ShortestPathResult,
};

// Re-export engine types
pub use engine::{
    DeadlineError, DeadlineSupervisor, EngineConfig, PathService, SolvePhase, StreamAccumulator,
    DEFAULT_PHASE_TIMEOUT,
};

// Re-export protocol types
pub use protocol::{
    Code, ConnectionChunk, ConnectionList, PathChunkRequest, PathError, PathRequest, PathResponse,
    PathResult, PreparedRequest, TransportError,
};

// Re-export tool types
pub use tools::{
    export_to_csv, export_to_json, import_from_csv, import_from_json, import_map_from_json,
    split_into_chunks, City, ExportFormat, ExportOptions, MapData, ToolError, ToolResult,
    DEFAULT_CHUNK_SIZE,
};

// Re-export for solver implementations outside this crate
pub use tokio_util::sync::CancellationToken;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
