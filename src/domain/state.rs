use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a collection run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    #[default]
    Pending,
    TargetReached,
    RetriesExhausted,
    /// A stop signal was raised; the output holds a partial result.
    Cancelled,
}

impl TerminationReason {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TerminationReason::Pending)
    }

    /// Whether the run ended the way a run is allowed to end on its own.
    pub fn is_graceful(self) -> bool {
        matches!(
            self,
            TerminationReason::TargetReached | TerminationReason::RetriesExhausted
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TerminationReason::Pending => "pending",
            TerminationReason::TargetReached => "target_reached",
            TerminationReason::RetriesExhausted => "retries_exhausted",
            TerminationReason::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one collection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionReport {
    pub emitted: usize,
    pub termination: TerminationReason,
    pub retry_counter: u32,
    pub iterations: usize,
}
