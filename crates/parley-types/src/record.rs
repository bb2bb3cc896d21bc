//! The `Record` abstraction shared by every durable log in Parley.
//!
//! Both stored turns and request log entries are append-only records with an
//! integer id assigned by the store. A record type describes how to build
//! itself from its draft once the store has picked the id and timestamp.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record that can live in a `RecordStore`.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The caller-supplied fields, before an id is assigned.
    type Draft: Send + 'static;

    /// Store-assigned id.
    fn id(&self) -> u64;

    /// Build the stored record. `now` is used when the draft carries no
    /// timestamp of its own.
    fn from_draft(id: u64, draft: Self::Draft, now: DateTime<Utc>) -> Self;
}

/// The id the next appended record receives: max existing id + 1, or 1 for an
/// empty set.
pub fn next_id<R: Record>(records: &[R]) -> u64 {
    records.iter().map(Record::id).max().unwrap_or(0) + 1
}
