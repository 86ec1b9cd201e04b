//! 2PC adapter over a store transaction
//!
//! Binds one open store transaction to the coordinator's participant
//! contract: prepare votes yes while the write buffer is still open, and
//! phase 2 flushes or discards it.

use crate::store::TransactionalResourceStore;
use async_trait::async_trait;
use atomix_common::{Participant, ParticipantError, TransactionId};
use std::sync::Arc;

/// A store transaction participating in a two-phase commit
pub struct StoreParticipant {
    name: String,
    store: Arc<TransactionalResourceStore>,
    tid: TransactionId,
}

impl StoreParticipant {
    /// Wrap an open store transaction as a participant
    pub fn new(
        name: impl Into<String>,
        store: Arc<TransactionalResourceStore>,
        tid: TransactionId,
    ) -> Self {
        Self {
            name: name.into(),
            store,
            tid,
        }
    }

    /// The store transaction this participant drives
    pub fn transaction_id(&self) -> TransactionId {
        self.tid
    }
}

#[async_trait]
impl Participant for StoreParticipant {
    fn name(&self) -> &str {
        &self.name
    }

    async fn prepare(&self) -> Result<bool, ParticipantError> {
        // A buffered store can always flush; the only abort condition is a
        // transaction that no longer exists.
        Ok(self.store.contains_transaction(self.tid))
    }

    async fn commit(&self) -> Result<(), ParticipantError> {
        self.store
            .commit(self.tid)
            .map_err(|e| ParticipantError::from(e.to_string()))
    }

    async fn rollback(&self) -> Result<(), ParticipantError> {
        self.store
            .rollback(self.tid)
            .map_err(|e| ParticipantError::from(e.to_string()))
    }
}
