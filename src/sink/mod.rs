//! Output sinks for collected items.
//!
//! A sink receives items in the order the collector emits them. Appends are
//! sequential and append-only; `close` makes everything appended so far
//! durable. Sinks open their destination lazily, so a run that fails before
//! emitting anything leaves an existing destination untouched.

pub mod file;
pub mod memory;
pub mod sqlite;

use std::path::Path;

use crate::app::Result;
use crate::domain::Item;

pub use file::FileSink;
pub use memory::MemorySink;
pub use sqlite::SqliteSink;

pub trait OutputSink {
    /// Write one item as one record.
    fn append(&mut self, item: &Item) -> Result<()>;

    /// Flush and release the destination. Calling it again is a no-op.
    fn close(&mut self) -> Result<()>;
}

impl<T: OutputSink + ?Sized> OutputSink for Box<T> {
    fn append(&mut self, item: &Item) -> Result<()> {
        (**self).append(item)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Pick a sink for an output path: SQLite for `.db`/`.sqlite`/`.sqlite3`,
/// plain text otherwise.
pub fn open_sink(path: &Path, source: &str) -> Box<dyn OutputSink + Send> {
    if is_database_path(path) {
        Box::new(SqliteSink::new(path, source))
    } else {
        Box::new(FileSink::new(path))
    }
}

fn is_database_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            matches!(
                ext.to_ascii_lowercase().as_str(),
                "db" | "sqlite" | "sqlite3"
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_extensions() {
        assert!(is_database_path(Path::new("reviews.db")));
        assert!(is_database_path(Path::new("out/reviews.SQLITE")));
        assert!(is_database_path(Path::new("reviews.sqlite3")));
        assert!(!is_database_path(Path::new("reviews.txt")));
        assert!(!is_database_path(Path::new("reviews")));
    }
}
