//! Error types for the store

use atomix_common::TransactionId;
use thiserror::Error;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
