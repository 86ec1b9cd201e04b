//! Transactional key-value store usable as a 2PC participant
//!
//! A local, in-process resource with buffered-write isolation: each open
//! transaction writes into its own buffer, reads see their own buffer first
//! (read-your-writes), and commit merges the buffer into the committed
//! mapping under a single store-wide serializing lock. The
//! [`StoreParticipant`] adapter lets a store transaction join a two-phase
//! commit round.

mod error;
mod participant;
mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use participant::StoreParticipant;
pub use store::TransactionalResourceStore;
pub use types::Value;
