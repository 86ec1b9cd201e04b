//! Shared types for the atomix transaction crates
//!
//! This crate holds the pieces that cross crate boundaries: transaction
//! identifiers, the 2PC participant capability contract, and the structured
//! record used to surface post-decision failures.

mod participant;
mod post_decision;
mod transaction_id;

pub use participant::{Participant, ParticipantError};
pub use post_decision::{DecisionPhase, PostDecisionError};
pub use transaction_id::TransactionId;
