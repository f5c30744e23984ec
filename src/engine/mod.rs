/// Request execution
///
/// - `deadline`: races each solver phase against a timer
/// - `stream`: reassembles chunked requests
/// - `service`: the two entry points, unary and streaming

pub mod deadline;
pub mod service;
pub mod stream;

pub use deadline::{DeadlineError, DeadlineSupervisor, SolvePhase};
pub use service::PathService;
pub use stream::StreamAccumulator;

use std::time::Duration;

/// Per-phase budget used when nothing else is configured
pub const DEFAULT_PHASE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Engine settings
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Wall-clock budget for one solver phase
    pub phase_timeout: Duration,
    /// Apply the budget to unary requests too (streaming always has it)
    pub bound_unary: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            phase_timeout: DEFAULT_PHASE_TIMEOUT,
            bound_unary: false,
        }
    }
}

impl EngineConfig {
    pub fn new(phase_timeout: Duration, bound_unary: bool) -> Self {
        Self {
            phase_timeout,
            bound_unary,
        }
    }

    /// Deadline for a unary request phase
    pub fn unary_deadline(&self) -> Option<Duration> {
        self.bound_unary.then_some(self.phase_timeout)
    }

    /// Deadline for a streaming request phase
    pub fn stream_deadline(&self) -> Option<Duration> {
        Some(self.phase_timeout)
    }
}
