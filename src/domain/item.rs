use serde::{Deserialize, Serialize};

/// One unit of content pulled off a surface.
///
/// The identifier is whatever the surface offers to tell items apart. It may
/// be derived from layout position rather than content, so it is neither
/// guaranteed stable across reloads nor guaranteed present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Option<String>,
    pub text: String,
}

impl Item {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            text: text.into(),
        }
    }

    /// An item the surface could not key. It is never deduplicated.
    pub fn anonymous(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
        }
    }

    /// Build an item from raw extraction output. Blank identifiers count as absent.
    pub fn from_parts(id: Option<String>, text: String) -> Self {
        let id = id.filter(|s| !s.trim().is_empty());
        Self { id, text }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The text as a single output record: trimmed, with line breaks folded
    /// into single spaces.
    pub fn record(&self) -> String {
        self.text
            .trim()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
