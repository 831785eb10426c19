pub mod item;
pub mod state;

pub use item::Item;
pub use state::{CollectionReport, TerminationReason};
