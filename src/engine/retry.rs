use tracing::debug;

/// How much an iteration moved the collection forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Nothing new was emitted.
    Stalled,
    /// Something new, but less than the low watermark.
    Weak,
    /// At least the low watermark.
    Strong,
}

impl Progress {
    pub fn classify(new_added: usize, low_watermark: usize) -> Self {
        if new_added == 0 {
            Progress::Stalled
        } else if new_added < low_watermark {
            Progress::Weak
        } else {
            Progress::Strong
        }
    }
}

/// Tracks consecutive lack of progress and decides when to give up.
///
/// - stalled: the counter goes up by one
/// - weak: up by one, then back down by one (floor 0) if the surface still
///   advanced
/// - strong: the counter resets to zero
///
/// The counter never exceeds `max_retries`.
#[derive(Debug, Clone)]
pub struct RetryController {
    counter: u32,
    max_retries: u32,
    low_watermark: usize,
}

impl RetryController {
    pub fn new(max_retries: u32, low_watermark: usize) -> Self {
        Self {
            counter: 0,
            max_retries,
            low_watermark,
        }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn is_exhausted(&self) -> bool {
        self.counter >= self.max_retries
    }

    /// Fold one iteration's outcome into the counter.
    pub fn observe(&mut self, new_added: usize, advanced: bool) -> Progress {
        let progress = Progress::classify(new_added, self.low_watermark);
        let before = self.counter;

        match progress {
            Progress::Stalled => self.bump(),
            Progress::Weak => {
                self.bump();
                if advanced {
                    self.counter = self.counter.saturating_sub(1);
                }
            }
            Progress::Strong => self.counter = 0,
        }

        debug!(
            "Retry counter {} -> {} ({:?}, new={}, advanced={})",
            before, self.counter, progress, new_added, advanced
        );
        progress
    }

    fn bump(&mut self) {
        self.counter = (self.counter + 1).min(self.max_retries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Progress::classify(0, 5), Progress::Stalled);
        assert_eq!(Progress::classify(1, 5), Progress::Weak);
        assert_eq!(Progress::classify(4, 5), Progress::Weak);
        assert_eq!(Progress::classify(5, 5), Progress::Strong);
        assert_eq!(Progress::classify(50, 5), Progress::Strong);
    }

    #[test]
    fn test_stall_always_penalized_even_when_advanced() {
        let mut retry = RetryController::new(5, 5);
        retry.observe(0, true);
        assert_eq!(retry.counter(), 1);
        retry.observe(0, false);
        assert_eq!(retry.counter(), 2);
    }

    #[test]
    fn test_weak_progress_without_advance_is_penalized() {
        let mut retry = RetryController::new(5, 5);
        retry.observe(3, false);
        assert_eq!(retry.counter(), 1);
    }

    #[test]
    fn test_weak_progress_with_advance_nets_zero_from_zero() {
        let mut retry = RetryController::new(5, 5);
        retry.observe(3, true);
        assert_eq!(retry.counter(), 0);
    }

    #[test]
    fn test_strong_progress_resets() {
        let mut retry = RetryController::new(5, 5);
        retry.observe(0, false);
        retry.observe(0, false);
        retry.observe(0, false);
        assert_eq!(retry.counter(), 3);

        assert_eq!(retry.observe(5, false), Progress::Strong);
        assert_eq!(retry.counter(), 0);
    }

    #[test]
    fn test_asymmetric_credit_trace() {
        let mut retry = RetryController::new(5, 5);
        let steps = [(0, false), (2, true), (2, true), (6, true)];

        let trace: Vec<u32> = steps
            .iter()
            .map(|&(new_added, advanced)| {
                retry.observe(new_added, advanced);
                retry.counter()
            })
            .collect();

        assert_eq!(trace, vec![1, 1, 1, 0]);
        assert!(!retry.is_exhausted());
    }

    #[test]
    fn test_counter_is_clamped_to_max() {
        let mut retry = RetryController::new(3, 5);
        for _ in 0..10 {
            retry.observe(0, false);
            assert!(retry.counter() <= 3);
        }
        assert!(retry.is_exhausted());
        assert_eq!(retry.counter(), 3);
    }

    #[test]
    fn test_exhausts_after_max_consecutive_stalls() {
        let mut retry = RetryController::new(3, 5);
        retry.observe(0, false);
        retry.observe(0, false);
        assert!(!retry.is_exhausted());
        retry.observe(0, false);
        assert!(retry.is_exhausted());
    }
}
