//! Error types for the coordinator

use atomix_common::TransactionId;
use thiserror::Error;

/// Coordinator error types
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    #[error("Invalid transaction state: {0}")]
    InvalidState(String),

    #[error("Participants already bound for transaction: {0}")]
    ParticipantsAlreadyBound(TransactionId),
}

/// Result type for coordinator operations
pub type Result<T> = std::result::Result<T, CoordinatorError>;
