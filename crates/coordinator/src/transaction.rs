//! Transaction records and the state machine they move through
//!
//! State transitions are monotonic along one of two paths:
//! `Init → Preparing → Prepared → Committing → Committed` or
//! `Init → Preparing → Aborting → Aborted`. A record can never be observed
//! in both terminal states, and once terminal it accepts no further
//! transition.

use atomix_common::TransactionId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Transaction state in the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionState {
    /// Record created, no participant contacted yet
    Init,
    /// Prepare phase has started
    Preparing,
    /// All participants have voted to prepare
    Prepared,
    /// Commit phase has started
    Committing,
    /// Transaction has been committed
    Committed,
    /// Abort phase has started
    Aborting,
    /// Transaction has been aborted
    Aborted,
}

impl TransactionState {
    /// Whether this state ends the transaction's lifecycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionState::Committed | TransactionState::Aborted)
    }

    /// Whether moving to `next` follows one of the two legal paths
    pub fn can_transition_to(&self, next: TransactionState) -> bool {
        use TransactionState::*;
        matches!(
            (self, next),
            (Init, Preparing)
                | (Preparing, Prepared)
                | (Preparing, Aborting)
                | (Prepared, Committing)
                | (Committing, Committed)
                | (Aborting, Aborted)
        )
    }
}

/// Outcome of a single participant's prepare call
///
/// A timed-out vote decides the transaction exactly like an abort vote; the
/// distinction exists only so diagnostics can say which participant was slow
/// rather than unwilling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantVote {
    /// Participant voted to commit
    Prepared,
    /// Participant voted to abort, or its prepare call failed
    Aborted { reason: String },
    /// Prepare did not answer within the coordinator's deadline
    TimedOut { elapsed: Duration },
}

impl ParticipantVote {
    /// Whether this vote allows the transaction to proceed to commit
    pub fn is_prepared(&self) -> bool {
        matches!(self, ParticipantVote::Prepared)
    }
}

/// Transaction record owned by the registry
///
/// Mutated exclusively by the coordinator invocation driving it; other
/// threads only ever see clones taken under the registry's map lock.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Unique identifier, assigned at creation
    pub id: TransactionId,
    /// Current state
    pub state: TransactionState,
    /// Participant names in caller order, bound once when execution starts
    pub participants: Vec<String>,
    /// Prepare votes recorded so far, keyed by participant name
    pub votes: HashMap<String, ParticipantVote>,
}

impl Transaction {
    /// Create a fresh record in the `Init` state
    pub fn new(id: TransactionId) -> Self {
        Self {
            id,
            state: TransactionState::Init,
            participants: Vec::new(),
            votes: HashMap::new(),
        }
    }

    /// Whether the record has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_path_transitions_allowed() {
        use TransactionState::*;
        let path = [Init, Preparing, Prepared, Committing, Committed];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_abort_path_transitions_allowed() {
        use TransactionState::*;
        let path = [Init, Preparing, Aborting, Aborted];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_backwards_and_cross_path_transitions_rejected() {
        use TransactionState::*;
        assert!(!Preparing.can_transition_to(Init));
        assert!(!Committed.can_transition_to(Aborting));
        assert!(!Aborted.can_transition_to(Committing));
        assert!(!Prepared.can_transition_to(Aborting));
        assert!(!Init.can_transition_to(Committed));
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        use TransactionState::*;
        for next in [Init, Preparing, Prepared, Committing, Committed, Aborting, Aborted] {
            assert!(!Committed.can_transition_to(next));
            assert!(!Aborted.can_transition_to(next));
        }
    }

    #[test]
    fn test_timed_out_vote_is_not_prepared() {
        let vote = ParticipantVote::TimedOut {
            elapsed: Duration::from_millis(100),
        };
        assert!(!vote.is_prepared());
        assert!(ParticipantVote::Prepared.is_prepared());
    }
}
