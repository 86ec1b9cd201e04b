//! Buffered-write transactional store
//!
//! Two pieces of state: the committed mapping, and one write buffer per open
//! transaction. The committed mapping's mutex doubles as the store-wide
//! commit lock: every commit merges its buffer while holding it, so commits
//! are globally serialized and readers never observe a half-merged commit.
//! Serialized commits are a known scalability bound of this store, accepted
//! deliberately over sharding.
//!
//! Lock order is always buffers before committed; no path holds both except
//! the transactional read.

use crate::error::{Result, StoreError};
use crate::types::Value;
use atomix_common::TransactionId;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Local key-value resource with read-your-writes isolation
#[derive(Default)]
pub struct TransactionalResourceStore {
    /// Committed mapping; its mutex is the single serializing commit lock
    committed: Mutex<HashMap<String, Value>>,
    /// Per-transaction write buffers holding uncommitted intent
    buffers: Mutex<HashMap<TransactionId, HashMap<String, Value>>>,
}

impl TransactionalResourceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a local transaction with an empty write buffer
    pub fn begin_local(&self) -> TransactionId {
        let tid = TransactionId::new();
        self.buffers.lock().insert(tid, HashMap::new());
        tid
    }

    /// Read a key within a transaction
    ///
    /// Returns the transaction's own buffered value if present, otherwise
    /// the committed value, otherwise `None`.
    pub fn read(&self, tid: TransactionId, key: &str) -> Result<Option<Value>> {
        let buffers = self.buffers.lock();
        let buffer = buffers
            .get(&tid)
            .ok_or(StoreError::TransactionNotFound(tid))?;

        if let Some(value) = buffer.get(key) {
            return Ok(Some(value.clone()));
        }
        Ok(self.committed.lock().get(key).cloned())
    }

    /// Write a key within a transaction
    ///
    /// Only the transaction's buffer is touched; nothing becomes visible to
    /// other readers until commit.
    pub fn write(&self, tid: TransactionId, key: impl Into<String>, value: Value) -> Result<()> {
        let mut buffers = self.buffers.lock();
        let buffer = buffers
            .get_mut(&tid)
            .ok_or(StoreError::TransactionNotFound(tid))?;
        buffer.insert(key.into(), value);
        Ok(())
    }

    /// Commit a transaction's buffer into the committed mapping
    ///
    /// The merge runs entirely under the commit lock, so concurrent readers
    /// see either none or all of this transaction's writes.
    pub fn commit(&self, tid: TransactionId) -> Result<()> {
        let buffer = self
            .buffers
            .lock()
            .remove(&tid)
            .ok_or(StoreError::TransactionNotFound(tid))?;

        let mut committed = self.committed.lock();
        for (key, value) in buffer {
            committed.insert(key, value);
        }
        Ok(())
    }

    /// Discard a transaction's buffer without touching the committed mapping
    pub fn rollback(&self, tid: TransactionId) -> Result<()> {
        self.buffers
            .lock()
            .remove(&tid)
            .map(|_| ())
            .ok_or(StoreError::TransactionNotFound(tid))
    }

    /// Read the committed value of a key, outside any transaction
    pub fn get(&self, key: &str) -> Option<Value> {
        self.committed.lock().get(key).cloned()
    }

    /// Whether a transaction's buffer is still open
    pub fn contains_transaction(&self, tid: TransactionId) -> bool {
        self.buffers.lock().contains_key(&tid)
    }

    /// Number of open (uncommitted) transactions
    pub fn open_transactions(&self) -> usize {
        self.buffers.lock().len()
    }
}
