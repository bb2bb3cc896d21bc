//! Record store implementations.

pub mod json_file;

pub use json_file::JsonFileStore;

use parley_types::request_log::RequestLogEntry;
use parley_types::turn::Turn;

/// Conversation history persisted as a JSON array.
pub type JsonMessageStore = JsonFileStore<Turn>;

/// Request log persisted as a JSON array.
pub type JsonRequestStore = JsonFileStore<RequestLogEntry>;
