use crate::domain::{CollectionReport, Item, TerminationReason};
use crate::engine::config::CollectorConfig;
use crate::engine::ledger::Ledger;
use crate::engine::retry::{Progress, RetryController};

/// Mutable state of a single collection run.
///
/// Created fresh per source and owned by one collector call at a time. Once
/// `termination` leaves `Pending` it never changes again.
#[derive(Debug, Clone)]
pub struct CollectionState {
    ledger: Ledger,
    emitted_count: usize,
    target: usize,
    retry: RetryController,
    termination: TerminationReason,
    iterations: usize,
}

impl CollectionState {
    pub fn new(config: &CollectorConfig) -> Self {
        Self {
            ledger: Ledger::new(),
            emitted_count: 0,
            target: config.target,
            retry: RetryController::new(config.max_retries, config.low_watermark),
            termination: TerminationReason::Pending,
            iterations: 0,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn emitted_count(&self) -> usize {
        self.emitted_count
    }

    pub fn retry_counter(&self) -> u32 {
        self.retry.counter()
    }

    pub fn termination(&self) -> TerminationReason {
        self.termination
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the loop may run another iteration.
    pub fn should_continue(&self) -> bool {
        self.termination == TerminationReason::Pending && !self.retry.is_exhausted()
    }

    pub fn target_reached(&self) -> bool {
        self.emitted_count >= self.target
    }

    /// Whether this item should be written out.
    pub fn is_new(&self, item: &Item) -> bool {
        !self.ledger.has(item.id())
    }

    /// Account for an item that was written to the sink.
    pub fn record_emitted(&mut self, item: &Item) {
        self.ledger.record(item.id());
        self.emitted_count += 1;
    }

    pub(crate) fn begin_iteration(&mut self) {
        self.iterations += 1;
    }

    pub(crate) fn observe(&mut self, new_added: usize, advanced: bool) -> Progress {
        self.retry.observe(new_added, advanced)
    }

    /// Move to a terminal reason. Has no effect once terminal.
    pub(crate) fn finish(&mut self, reason: TerminationReason) {
        debug_assert!(reason.is_terminal());
        if !self.termination.is_terminal() {
            self.termination = reason;
        }
    }

    /// Settle the termination reason after the loop exits.
    pub(crate) fn settle(&mut self) {
        if self.termination.is_terminal() {
            return;
        }
        if self.target_reached() {
            self.termination = TerminationReason::TargetReached;
        } else if self.retry.is_exhausted() {
            self.termination = TerminationReason::RetriesExhausted;
        }
    }

    pub fn report(&self) -> CollectionReport {
        CollectionReport {
            emitted: self.emitted_count,
            termination: self.termination,
            retry_counter: self.retry.counter(),
            iterations: self.iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(target: usize) -> CollectorConfig {
        CollectorConfig {
            target,
            ..Default::default()
        }
    }

    #[test]
    fn test_fresh_state() {
        let state = CollectionState::new(&config(10));
        assert_eq!(state.emitted_count(), 0);
        assert_eq!(state.retry_counter(), 0);
        assert_eq!(state.termination(), TerminationReason::Pending);
        assert!(state.should_continue());
    }

    #[test]
    fn test_emitted_count_tracks_ledger() {
        let mut state = CollectionState::new(&config(10));
        let keyed = Item::new("1", "a");
        let anon = Item::anonymous("b");

        state.record_emitted(&keyed);
        state.record_emitted(&anon);

        assert_eq!(state.emitted_count(), state.ledger().len());
        assert!(!state.is_new(&keyed));
        assert!(state.is_new(&anon));
    }

    #[test]
    fn test_terminal_reason_is_sticky() {
        let mut state = CollectionState::new(&config(10));
        state.finish(TerminationReason::TargetReached);
        state.finish(TerminationReason::Cancelled);
        assert_eq!(state.termination(), TerminationReason::TargetReached);
        assert!(!state.should_continue());
    }

    #[test]
    fn test_settle_reports_exhaustion() {
        let mut state = CollectionState::new(&CollectorConfig {
            max_retries: 1,
            ..config(10)
        });
        state.observe(0, false);
        assert!(!state.should_continue());

        state.settle();
        assert_eq!(state.termination(), TerminationReason::RetriesExhausted);
    }
}
