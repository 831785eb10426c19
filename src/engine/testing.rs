//! Scripted surfaces for exercising the collector without a browser.

use async_trait::async_trait;

use crate::app::{Result, TrawlError};
use crate::domain::Item;
use crate::engine::{CollectorConfig, StopSignal};
use crate::surface::{BatchEntry, ContentSurface};

/// Collector settings with the pauses removed.
pub(crate) fn quick_config(target: usize, max_retries: u32, low_watermark: usize) -> CollectorConfig {
    CollectorConfig {
        target,
        max_retries,
        low_watermark,
        progress_delay_ms: 0,
        stall_delay_ms: 0,
    }
}

pub(crate) fn numbered(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| Item::new(format!("item-{}", i), format!("review {}", i)))
        .collect()
}

/// An infinite-scroll list: `visible` items are shown, each successful
/// advance reveals `step` more until the list runs out.
pub(crate) struct FeedSurface {
    items: Vec<Item>,
    visible: usize,
    step: usize,
    window: Option<usize>,
    broken: Vec<usize>,
    unreachable: bool,
    stop_after: Option<(usize, StopSignal)>,
    pub entry_calls: usize,
    pub batch_calls: usize,
    pub advance_calls: usize,
}

impl FeedSurface {
    pub fn new(items: Vec<Item>, initial: usize, step: usize) -> Self {
        Self {
            visible: initial.min(items.len()),
            items,
            step,
            window: None,
            broken: Vec::new(),
            unreachable: false,
            stop_after: None,
            entry_calls: 0,
            batch_calls: 0,
            advance_calls: 0,
        }
    }

    pub fn numbered(n: usize, initial: usize, step: usize) -> Self {
        Self::new(numbered(n), initial, step)
    }

    /// Only the last `n` revealed items are rendered, like a virtualized list.
    pub fn windowed(mut self, n: usize) -> Self {
        self.window = Some(n);
        self
    }

    /// Items at these positions fail to extract.
    pub fn with_broken(mut self, positions: &[usize]) -> Self {
        self.broken = positions.to_vec();
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Raise `signal` while serving the `n`th batch.
    pub fn stopping_after(mut self, n: usize, signal: StopSignal) -> Self {
        self.stop_after = Some((n, signal));
        self
    }
}

#[async_trait]
impl ContentSurface for FeedSurface {
    async fn entry_point(&mut self, source: &str) -> Result<()> {
        self.entry_calls += 1;
        if self.unreachable {
            return Err(TrawlError::AdapterFatal(format!("{} has no item list", source)));
        }
        Ok(())
    }

    async fn current_batch(&mut self) -> Result<Vec<BatchEntry>> {
        self.batch_calls += 1;
        if let Some((n, ref signal)) = self.stop_after {
            if self.batch_calls >= n {
                signal.raise();
            }
        }

        let start = self
            .window
            .map(|w| self.visible.saturating_sub(w))
            .unwrap_or(0);

        Ok((start..self.visible)
            .map(|i| {
                if self.broken.contains(&i) {
                    Err(TrawlError::AdapterTransient(format!("item {} is malformed", i)))
                } else {
                    Ok(self.items[i].clone())
                }
            })
            .collect())
    }

    async fn try_advance(&mut self) -> Result<bool> {
        self.advance_calls += 1;
        if self.visible < self.items.len() {
            self.visible = (self.visible + self.step).min(self.items.len());
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// One scripted answer to `current_batch`.
pub(crate) enum Step {
    Batch(Vec<Item>),
    Transient,
    Fatal,
}

/// Replays fixed batches and advance answers. Once a script runs out, its
/// last batch repeats and advancing reports no growth.
pub(crate) struct ScriptedSurface {
    steps: Vec<Step>,
    advances: Vec<bool>,
    failing_advance: bool,
    pub batch_calls: usize,
    pub advance_calls: usize,
}

impl ScriptedSurface {
    pub fn new(steps: Vec<Step>, advances: &[bool]) -> Self {
        Self {
            steps,
            advances: advances.to_vec(),
            failing_advance: false,
            batch_calls: 0,
            advance_calls: 0,
        }
    }

    /// Every advance fails with a transient error.
    pub fn with_failing_advance(mut self) -> Self {
        self.failing_advance = true;
        self
    }
}

#[async_trait]
impl ContentSurface for ScriptedSurface {
    async fn entry_point(&mut self, _source: &str) -> Result<()> {
        Ok(())
    }

    async fn current_batch(&mut self) -> Result<Vec<BatchEntry>> {
        let index = self.batch_calls.min(self.steps.len().saturating_sub(1));
        self.batch_calls += 1;

        match self.steps.get(index) {
            Some(Step::Batch(items)) => Ok(items.iter().cloned().map(Ok).collect()),
            Some(Step::Transient) => Err(TrawlError::AdapterTransient("render glitch".into())),
            Some(Step::Fatal) => Err(TrawlError::AdapterFatal("page crashed".into())),
            None => Ok(Vec::new()),
        }
    }

    async fn try_advance(&mut self) -> Result<bool> {
        let answer = self.advances.get(self.advance_calls).copied().unwrap_or(false);
        self.advance_calls += 1;

        if self.failing_advance {
            return Err(TrawlError::AdapterTransient("scroll script threw".into()));
        }
        Ok(answer)
    }
}
