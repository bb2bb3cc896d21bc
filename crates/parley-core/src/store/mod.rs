//! RecordStore trait definition.
//!
//! A record store is a durable, ordered, append-only-with-clear collection of
//! [`Record`]s. The message history and the request log are two instances of
//! the same trait with independent lifecycles. Implementations live in
//! parley-infra (e.g., `JsonFileStore`).

pub mod window;

use parley_types::error::StoreError;
use parley_types::record::Record;
use parley_types::request_log::RequestLogEntry;
use parley_types::turn::Turn;

pub use window::select_window;

/// Storage interface for an ordered log of records.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait RecordStore<R: Record>: Send + Sync {
    /// Assign the next id (max existing id + 1, or 1 when empty), fill in the
    /// timestamp if the draft has none, persist, and return the stored record.
    ///
    /// Implementations serialize their own read-modify-write cycle so that
    /// concurrent appends within one process never share an id.
    fn append(
        &self,
        draft: R::Draft,
    ) -> impl std::future::Future<Output = Result<R, StoreError>> + Send;

    /// Replace the whole record set with an empty one.
    fn clear(&self) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Read records in storage order (oldest first).
    ///
    /// `limit = Some(n)` with `n > 0` keeps only the `n` most recent records by
    /// position; `None` or `Some(0)` keeps all. `reverse` is applied after the
    /// limit, returning the selected slice newest first.
    fn read(
        &self,
        limit: Option<usize>,
        reverse: bool,
    ) -> impl std::future::Future<Output = Result<Vec<R>, StoreError>> + Send;
}

/// Store of conversation turns.
pub trait MessageStore: RecordStore<Turn> {}

impl<T: RecordStore<Turn>> MessageStore for T {}

/// Store of raw LLM request/response pairs.
pub trait RequestStore: RecordStore<RequestLogEntry> {}

impl<T: RecordStore<RequestLogEntry>> RequestStore for T {}
