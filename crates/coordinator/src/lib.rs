//! Two-phase commit coordination for in-process distributed transactions
//!
//! This crate drives transactions across independent resource participants
//! using synchronous two-phase commit: every participant votes in a
//! deadline-bounded prepare phase before any participant is told to commit.
//! Transaction records live in a [`TransactionRegistry`] until they reach a
//! terminal state; the [`TwoPhaseCoordinator`] owns the protocol itself.
//!
//! The coordinator is single-instance and keeps no durable log; it tolerates
//! participant failure and slowness, not its own crash.

mod coordinator;
mod error;
mod registry;
mod transaction;

pub use coordinator::{CoordinatorConfig, TwoPhaseCoordinator, TwoPhaseReport};
pub use error::{CoordinatorError, Result};
pub use registry::TransactionRegistry;
pub use transaction::{ParticipantVote, Transaction, TransactionState};
