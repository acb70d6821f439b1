//! Storage backend traits.

mod seen;

pub use seen::SeenRecordStore;
