//! The incremental collection engine.
//!
//! ```text
//! ContentSurface ──batch──▶ Collector ──new?──▶ Ledger
//!        ▲                      │
//!        └──────advance─────────┤──append──▶ OutputSink
//!                               ▼
//!                        RetryController
//! ```
//!
//! - [`Ledger`]: identifiers already emitted
//! - [`RetryController`]: counts iterations without enough progress
//! - [`Collector`]: the loop tying surface, ledger and sink together

pub mod collector;
pub mod config;
pub mod ledger;
pub mod retry;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use collector::Collector;
pub use config::CollectorConfig;
pub use ledger::Ledger;
pub use retry::{Progress, RetryController};
pub use state::CollectionState;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag shared between a run and whoever may stop it.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
