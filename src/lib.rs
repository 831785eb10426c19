//! # Trawl
//!
//! Incremental collection of items from pages that reveal content a little
//! at a time, such as infinite-scroll review lists.
//!
//! ## Architecture
//!
//! ```text
//! SessionProvider → ContentSurface → Collector (Ledger, RetryController) → OutputSink
//! ```
//!
//! A run logs in, opens the item list, then repeatedly reads the visible
//! batch, writes every item it has not written before and asks the page for
//! more. It stops at the target count, after too many iterations without
//! progress, or when interrupted.
//!
//! ## Quick Start
//!
//! ```bash
//! # Log in once with a visible browser
//! trawl login --headed
//!
//! # Collect up to 500 reviews into a text file
//! trawl collect "https://item.taobao.com/item.htm?id=..." -o reviews.txt -n 500
//!
//! # Or into SQLite
//! trawl collect "https://item.taobao.com/item.htm?id=..." -o reviews.db
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) holds the loaded configuration and the
/// resolved profile and cookie locations.
pub mod app;

/// Command-line interface using clap.
///
/// - `collect [URL]` - Collect items from a page
/// - `login` - Establish and save a session
/// - `config` - Show the configuration file location
pub mod cli;

/// Configuration loaded from `~/.config/trawl/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Item`](domain::Item): One collected unit with an optional identifier
/// - [`TerminationReason`](domain::TerminationReason): Why a run stopped
/// - [`CollectionReport`](domain::CollectionReport): Outcome of a run
pub mod domain;

/// The collection loop, deduplication ledger and retry policy.
pub mod engine;

/// Login checks, cookie persistence and interactive login.
pub mod session;

/// Destinations for collected items: text files, SQLite, memory.
pub mod sink;

/// Content surfaces backed by headless Chromium.
pub mod surface;
