//! Content surfaces: where items come from.
//!
//! A surface shows some items, and shows more after an explicit advance
//! (scrolling an infinite list, pressing "load more"). The collector only ever
//! talks to a surface through [`ContentSurface`].
//!
//! # Architecture
//!
//! ```text
//! BrowserSession (Chromium over CDP) → Page → ChromeSurface → Collector
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use trawl::surface::{BrowserSession, ChromeSurface, SurfaceConfig};
//!
//! let config = SurfaceConfig::default();
//! let browser = BrowserSession::launch(&config, &profile_dir).await?;
//! let mut surface = ChromeSurface::new(browser.page().clone(), config);
//!
//! surface.entry_point("https://example.com/item/1").await?;
//! let batch = surface.current_batch().await?;
//! let advanced = surface.try_advance().await?;
//!
//! browser.close().await;
//! ```

mod browser;
mod chrome;
mod config;
mod script;

pub use browser::BrowserSession;
pub use chrome::ChromeSurface;
pub use config::SurfaceConfig;
pub use script::{link_text_probe, SurfaceScripts};

use crate::app::Result;
use crate::domain::Item;
use async_trait::async_trait;

/// One slot of a batch: an item, or the reason it could not be read.
pub type BatchEntry = Result<Item>;

/// Capability the collector needs from a content surface.
///
/// Calls may block for a bounded time. Implementations report recoverable
/// problems as [`TrawlError::AdapterTransient`](crate::app::TrawlError) and
/// an unreachable surface as
/// [`TrawlError::AdapterFatal`](crate::app::TrawlError).
#[async_trait]
pub trait ContentSurface: Send {
    /// Navigate to the source and open the item list. Called once per run.
    async fn entry_point(&mut self, source: &str) -> Result<()>;

    /// The items currently visible, in surface order.
    ///
    /// Reading the batch has no side effects. A malformed item is reported
    /// in its slot rather than failing the whole batch.
    async fn current_batch(&mut self) -> Result<Vec<BatchEntry>>;

    /// Ask the surface to reveal more items. Returns whether the number of
    /// visible items grew.
    async fn try_advance(&mut self) -> Result<bool>;
}

#[async_trait]
impl<T: ContentSurface + ?Sized> ContentSurface for Box<T> {
    async fn entry_point(&mut self, source: &str) -> Result<()> {
        (**self).entry_point(source).await
    }

    async fn current_batch(&mut self) -> Result<Vec<BatchEntry>> {
        (**self).current_batch().await
    }

    async fn try_advance(&mut self) -> Result<bool> {
        (**self).try_advance().await
    }
}
