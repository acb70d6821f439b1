//! Data models for seengate.
//!
//! Items flowing through a run, the identifier kinds read from them, and the
//! records persisted once an item is accepted.

mod identifier;
mod item;

pub use identifier::{IdentifierKind, SeenRecord, SeenScope};
pub use item::{FieldValue, Item, ItemStatus};
