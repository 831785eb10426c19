use tracing::{debug, info, warn};

use crate::app::Result;
use crate::domain::{CollectionReport, TerminationReason};
use crate::engine::retry::Progress;
use crate::engine::{CollectionState, CollectorConfig, StopSignal};
use crate::sink::OutputSink;
use crate::surface::ContentSurface;

/// Drives a content surface until the target is met or progress stops.
///
/// Each iteration reads the visible batch, writes every item not yet
/// emitted, asks the surface to advance, updates the retry counter and
/// sleeps. Calls to the surface never overlap.
pub struct Collector {
    config: CollectorConfig,
    stop: StopSignal,
}

impl Collector {
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            config,
            stop: StopSignal::new(),
        }
    }

    /// Use an externally owned stop signal, checked at the top of every iteration.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    /// Run a fresh collection against `source`.
    pub async fn collect<S, K>(
        &self,
        surface: &mut S,
        sink: &mut K,
        source: &str,
    ) -> Result<CollectionReport>
    where
        S: ContentSurface + ?Sized,
        K: OutputSink + ?Sized,
    {
        let mut state = CollectionState::new(&self.config);
        self.collect_into(&mut state, surface, sink, source).await
    }

    /// Run a collection with caller-owned state.
    ///
    /// A state that already reached a terminal reason is left as it is:
    /// nothing is read, written or closed.
    pub async fn collect_into<S, K>(
        &self,
        state: &mut CollectionState,
        surface: &mut S,
        sink: &mut K,
        source: &str,
    ) -> Result<CollectionReport>
    where
        S: ContentSurface + ?Sized,
        K: OutputSink + ?Sized,
    {
        if state.termination().is_terminal() {
            debug!("Collection already finished ({})", state.termination());
            return Ok(state.report());
        }

        // The sink has not been touched yet; a fatal error here leaves it alone.
        surface.entry_point(source).await?;

        info!(
            "Collecting up to {} items (max retries {}, low watermark {})",
            self.config.target, self.config.max_retries, self.config.low_watermark
        );

        if let Err(e) = self.drive(state, surface, sink).await {
            if let Err(close_err) = sink.close() {
                warn!("Failed to close output after error: {}", close_err);
            }
            return Err(e);
        }

        sink.close()?;

        let report = state.report();
        match report.termination {
            TerminationReason::TargetReached => {
                info!("Collected {} items, target reached", report.emitted)
            }
            TerminationReason::RetriesExhausted => info!(
                "Stopped after {} retries with {} items",
                self.config.max_retries, report.emitted
            ),
            TerminationReason::Cancelled => {
                info!("Cancelled with {} items collected", report.emitted)
            }
            TerminationReason::Pending => {}
        }
        Ok(report)
    }

    async fn drive<S, K>(
        &self,
        state: &mut CollectionState,
        surface: &mut S,
        sink: &mut K,
    ) -> Result<()>
    where
        S: ContentSurface + ?Sized,
        K: OutputSink + ?Sized,
    {
        if state.target_reached() {
            state.finish(TerminationReason::TargetReached);
        }

        while state.should_continue() {
            if self.stop.is_raised() {
                info!("Stop requested, finishing with a partial result");
                state.finish(TerminationReason::Cancelled);
                break;
            }

            state.begin_iteration();
            let new_added = self.drain_batch(state, surface, sink).await?;

            if state.target_reached() {
                state.finish(TerminationReason::TargetReached);
                break;
            }

            let advanced = match surface.try_advance().await {
                Ok(advanced) => advanced,
                Err(e) if e.is_transient() => {
                    warn!("Advance failed: {}", e);
                    false
                }
                Err(e) => return Err(e),
            };

            match state.observe(new_added, advanced) {
                Progress::Stalled => info!(
                    "No new items (retry {}/{})",
                    state.retry_counter(),
                    self.config.max_retries
                ),
                _ => info!(
                    "Added {} new items, {} total",
                    new_added,
                    state.emitted_count()
                ),
            }

            tokio::time::sleep(self.config.delay_after(new_added)).await;

            if !state.should_continue() {
                info!("Reached max retries ({}), stopping", self.config.max_retries);
                state.finish(TerminationReason::RetriesExhausted);
            }
        }

        state.settle();
        Ok(())
    }

    /// Emit every new item of the current batch. Returns how many were emitted.
    async fn drain_batch<S, K>(
        &self,
        state: &mut CollectionState,
        surface: &mut S,
        sink: &mut K,
    ) -> Result<usize>
    where
        S: ContentSurface + ?Sized,
        K: OutputSink + ?Sized,
    {
        let batch = match surface.current_batch().await {
            Ok(batch) => batch,
            Err(e) if e.is_transient() => {
                warn!("Batch extraction failed: {}", e);
                return Ok(0);
            }
            Err(e) => return Err(e),
        };

        let mut new_added = 0;
        for entry in batch {
            let item = match entry {
                Ok(item) => item,
                Err(e) if e.is_transient() => {
                    warn!("Skipping item: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if !state.is_new(&item) {
                continue;
            }

            sink.append(&item)?;
            state.record_emitted(&item);
            new_added += 1;

            if state.target_reached() {
                break;
            }
        }

        Ok(new_added)
    }
}
