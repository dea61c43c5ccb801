//! # Storage
//!
//! Persistence is split in two layers:
//!
//! - [`StorageBackend`]: raw key/value I/O. It knows how to read and replace
//!   a JSON document under a key, nothing about barcodes.
//! - [`RecordStore`]: the record sequence kept under [`RECORDS_KEY`]. It
//!   decodes the document, treats a missing key as an empty sequence and
//!   appends by rewriting the whole list.
//!
//! Backends:
//!
//! - [`fs_backend::FsBackend`]: one `<key>.json` file per key, replaced
//!   through a temp file and rename.
//! - [`mem_backend::MemBackend`]: in-memory, for tests.

use crate::error::Result;
use serde_json::Value;

pub mod fs_backend;
pub mod mem_backend;
pub mod record_store;

pub use record_store::RecordStore;

/// Key holding the barcode record sequence.
pub const RECORDS_KEY: &str = "barcodes";

/// Abstract key/value storage.
pub trait StorageBackend {
    /// Returns the document stored under `key`, or `None` if nothing was ever written.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replaces the document under `key`.
    /// MUST be atomic: a reader sees either the old or the new document.
    fn set(&self, key: &str, value: &Value) -> Result<()>;
}
