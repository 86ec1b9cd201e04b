//! In-memory registry of in-flight transactions
//!
//! The registry is the only state shared across concurrent coordinator
//! invocations. A plain map behind a mutex is enough: each record is mutated
//! by exactly one coordinator invocation, so contention is limited to the
//! map operations themselves.

use crate::error::{CoordinatorError, Result};
use crate::transaction::{ParticipantVote, Transaction, TransactionState};
use atomix_common::TransactionId;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Thread-safe creation, lookup, and removal of transaction records
#[derive(Default)]
pub struct TransactionRegistry {
    transactions: Mutex<HashMap<TransactionId, Transaction>>,
}

impl TransactionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh transaction record in the `Init` state
    ///
    /// Never fails; UUIDv7 identifiers are unique without coordination.
    pub fn begin(&self) -> TransactionId {
        let id = TransactionId::new();
        self.transactions.lock().insert(id, Transaction::new(id));
        id
    }

    /// Get a snapshot of a live transaction record
    pub fn get(&self, id: TransactionId) -> Result<Transaction> {
        self.transactions
            .lock()
            .get(&id)
            .cloned()
            .ok_or(CoordinatorError::TransactionNotFound(id))
    }

    /// Remove a transaction record
    ///
    /// Idempotent: removing an already-absent id is a no-op, since terminal
    /// cleanup may race with external inspection.
    pub fn remove(&self, id: TransactionId) {
        self.transactions.lock().remove(&id);
    }

    /// Number of live transaction records
    pub fn len(&self) -> usize {
        self.transactions.lock().len()
    }

    /// Whether no transactions are live
    pub fn is_empty(&self) -> bool {
        self.transactions.lock().is_empty()
    }

    /// Bind the participant set, once, before any participant is contacted
    pub(crate) fn bind_participants(&self, id: TransactionId, names: Vec<String>) -> Result<()> {
        let mut txns = self.transactions.lock();
        let txn = txns
            .get_mut(&id)
            .ok_or(CoordinatorError::TransactionNotFound(id))?;
        if !txn.participants.is_empty() {
            return Err(CoordinatorError::ParticipantsAlreadyBound(id));
        }
        txn.participants = names;
        Ok(())
    }

    /// Move a transaction to `next`, enforcing monotonic transitions
    pub(crate) fn transition(&self, id: TransactionId, next: TransactionState) -> Result<()> {
        let mut txns = self.transactions.lock();
        let txn = txns
            .get_mut(&id)
            .ok_or(CoordinatorError::TransactionNotFound(id))?;
        if !txn.state.can_transition_to(next) {
            return Err(CoordinatorError::InvalidState(format!(
                "transaction {} cannot move {:?} -> {:?}",
                id, txn.state, next
            )));
        }
        txn.state = next;
        Ok(())
    }

    /// Record a participant's prepare vote
    pub(crate) fn record_vote(
        &self,
        id: TransactionId,
        participant: &str,
        vote: ParticipantVote,
    ) -> Result<()> {
        let mut txns = self.transactions.lock();
        let txn = txns
            .get_mut(&id)
            .ok_or(CoordinatorError::TransactionNotFound(id))?;
        txn.votes.insert(participant.to_string(), vote);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_begin_creates_init_record() {
        let registry = TransactionRegistry::new();
        let id = registry.begin();
        let txn = registry.get(id).unwrap();
        assert_eq!(txn.state, TransactionState::Init);
        assert!(txn.participants.is_empty());
    }

    #[test]
    fn test_get_unknown_id_fails() {
        let registry = TransactionRegistry::new();
        let id = TransactionId::new();
        assert!(matches!(
            registry.get(id),
            Err(CoordinatorError::TransactionNotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry = TransactionRegistry::new();
        let id = registry.begin();
        registry.remove(id);
        registry.remove(id); // second removal is a no-op
        assert!(registry.get(id).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_bind_participants_rejects_second_bind() {
        let registry = TransactionRegistry::new();
        let id = registry.begin();
        registry
            .bind_participants(id, vec!["a".to_string(), "b".to_string()])
            .unwrap();
        assert!(matches!(
            registry.bind_participants(id, vec!["c".to_string()]),
            Err(CoordinatorError::ParticipantsAlreadyBound(_))
        ));
        assert_eq!(registry.get(id).unwrap().participants, vec!["a", "b"]);
    }

    #[test]
    fn test_transition_enforces_state_machine() {
        let registry = TransactionRegistry::new();
        let id = registry.begin();
        registry.transition(id, TransactionState::Preparing).unwrap();
        assert!(matches!(
            registry.transition(id, TransactionState::Committed),
            Err(CoordinatorError::InvalidState(_))
        ));
        registry.transition(id, TransactionState::Aborting).unwrap();
        registry.transition(id, TransactionState::Aborted).unwrap();
        assert!(registry.get(id).unwrap().is_terminal());
    }

    #[test]
    fn test_concurrent_begin_yields_unique_ids() {
        let registry = Arc::new(TransactionRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            handles.push(std::thread::spawn(move || {
                (0..50).map(|_| registry.begin()).collect::<Vec<_>>()
            }));
        }

        let mut all: Vec<TransactionId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
        assert_eq!(registry.len(), total);
    }
}
