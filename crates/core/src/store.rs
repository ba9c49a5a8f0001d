//! Entity store error surface shared by the hierarchy and section stores.

use thiserror::Error;
use kendra_shared::types::KvkId;

/// Errors surfaced by the underlying entity store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The requested KVK does not exist (e.g. deleted mid-flight).
    #[error("KVK not found: {0}")]
    KvkNotFound(KvkId),

    /// Backend failure (connection loss, query error, ...).
    #[error("store backend error: {0}")]
    Backend(String),
}
