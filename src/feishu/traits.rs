//! Table store traits and error types
//!
//! This module defines the trait interface the table syncer writes through,
//! along with the row and key types it exchanges with a store.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Errors that can occur during table operations
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Bitable request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bitable returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Bitable API error (code {code}): {msg}")]
    Api { code: i64, msg: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid Bitable response: {0}")]
    InvalidResponse(String),

    #[error("Invalid Bitable URL: {0}")]
    InvalidUrl(String),
}

/// Result type for table operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Natural key of a table row
///
/// One row exists per repository per snapshot; the source tag keeps daily,
/// weekly and per-language snapshots apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    /// Repository identifier in `owner/name` form
    pub repo: String,

    /// Snapshot date as UTC midnight epoch milliseconds
    pub date_millis: i64,

    pub source: String,
}

/// A row ready to be written, keyed by its natural key
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub key: RowKey,
    pub fields: Map<String, Value>,
}

impl TableRow {
    /// Request body used by record create and update calls
    pub fn to_record_body(&self) -> Value {
        json!({ "fields": self.fields })
    }
}

/// Trait for table store implementations
///
/// The syncer only needs keyed lookup plus create and update; a store owns
/// persistence and record identifiers.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Finds the record id of the row with this key, if one exists
    async fn find_record(&self, key: &RowKey) -> SyncResult<Option<String>>;

    /// Creates a new row and returns its record id
    async fn create_record(&self, row: &TableRow) -> SyncResult<String>;

    /// Replaces the fields of an existing row
    async fn update_record(&self, record_id: &str, row: &TableRow) -> SyncResult<()>;
}
