//! Business logic services.
//!
//! Services sit between the pipeline and storage: they implement filter
//! stages on top of a [`SeenRecordStore`](crate::storage::SeenRecordStore).

pub mod deduplication;

pub use deduplication::{
    AnyIdentifier, PresencePolicy, RejectReason, SeenFilter, SeenMoviesFilter,
};
