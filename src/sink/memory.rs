use crate::app::{Result, TrawlError};
use crate::domain::Item;
use crate::sink::OutputSink;

/// Keeps emitted items in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    items: Vec<Item>,
    closed: bool,
    fail_after: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose appends start failing once `n` items are stored.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl OutputSink for MemorySink {
    fn append(&mut self, item: &Item) -> Result<()> {
        if self.closed {
            return Err(TrawlError::Sink(std::io::Error::other("sink is closed")));
        }
        if self.fail_after.is_some_and(|n| self.items.len() >= n) {
            return Err(TrawlError::Sink(std::io::Error::other("sink is full")));
        }
        self.items.push(item.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_after_close_fails() {
        let mut sink = MemorySink::new();
        sink.append(&Item::new("1", "a")).unwrap();
        sink.close().unwrap();

        assert!(sink.append(&Item::new("2", "b")).is_err());
        assert_eq!(sink.items().len(), 1);
    }

    #[test]
    fn test_failing_after() {
        let mut sink = MemorySink::failing_after(1);
        assert!(sink.append(&Item::new("1", "a")).is_ok());
        assert!(matches!(
            sink.append(&Item::new("2", "b")),
            Err(TrawlError::Sink(_))
        ));
    }
}
