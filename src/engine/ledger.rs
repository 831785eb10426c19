use std::collections::HashSet;

/// Record of what a run has already emitted.
///
/// Keyed items are remembered by identifier. Items without an identifier are
/// only counted: there is nothing to compare them against, so each one is
/// treated as new. A surface that re-renders an unkeyed item will therefore
/// see it emitted again; dropping content with no usable key is the worse
/// failure.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    seen: HashSet<String>,
    anonymous: usize,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an item with this identifier was already emitted.
    /// Absent identifiers are never considered seen.
    pub fn has(&self, id: Option<&str>) -> bool {
        id.is_some_and(|id| self.seen.contains(id))
    }

    pub fn record(&mut self, id: Option<&str>) {
        match id {
            Some(id) => {
                self.seen.insert(id.to_string());
            }
            None => self.anonymous += 1,
        }
    }

    /// Total emissions recorded, keyed and anonymous.
    pub fn len(&self) -> usize {
        self.seen.len() + self.anonymous
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn anonymous(&self) -> usize {
        self.anonymous
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.seen.iter().map(String::as_str)
    }
}
