//! Two-phase commit driver
//!
//! Drives one transaction through prepare/commit/rollback across a fixed,
//! caller-ordered participant set. Phase 1 contacts participants one at a
//! time under a per-participant deadline and short-circuits on the first
//! vote against the transaction; phase 2 is only entered on a unanimous
//! prepared result. Commit and rollback calls are deliberately not
//! time-bounded: a decided transaction must eventually reach every
//! participant, and without a durable log the coordinator has no better
//! option than to keep delivering.

use crate::error::Result;
use crate::registry::TransactionRegistry;
use crate::transaction::{ParticipantVote, TransactionState};
use atomix_common::{DecisionPhase, Participant, PostDecisionError, TransactionId};
use std::sync::Arc;
use std::time::Duration;

/// Coordinator configuration
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Deadline applied to each participant's prepare call
    pub prepare_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            prepare_timeout: Duration::from_secs(5),
        }
    }
}

/// Outcome of one two-phase commit execution
///
/// The boolean decision plus everything diagnostics need: the vote each
/// contacted participant cast (in contact order) and any failures that
/// happened after the decision was already made.
#[derive(Debug, Clone)]
pub struct TwoPhaseReport {
    /// The transaction this report describes
    pub id: TransactionId,
    /// Whether the transaction committed
    pub committed: bool,
    /// Votes in the order participants were contacted; participants never
    /// reached due to short-circuiting do not appear
    pub votes: Vec<(String, ParticipantVote)>,
    /// Commit/rollback failures, observable but outcome-neutral
    pub post_decision_errors: Vec<PostDecisionError>,
}

/// Drives prepare/commit/rollback for one transaction at a time
pub struct TwoPhaseCoordinator {
    registry: Arc<TransactionRegistry>,
    config: CoordinatorConfig,
}

impl TwoPhaseCoordinator {
    /// Create a coordinator with the default configuration
    pub fn new(registry: Arc<TransactionRegistry>) -> Self {
        Self::with_config(registry, CoordinatorConfig::default())
    }

    /// Create a coordinator with an explicit configuration
    pub fn with_config(registry: Arc<TransactionRegistry>, config: CoordinatorConfig) -> Self {
        Self { registry, config }
    }

    /// The registry this coordinator records transactions in
    pub fn registry(&self) -> &Arc<TransactionRegistry> {
        &self.registry
    }

    /// Execute a transaction, reporting only the boolean outcome
    ///
    /// See [`TwoPhaseCoordinator::execute_with_report`] for the variant that
    /// also returns votes and post-decision failures.
    pub async fn execute(
        &self,
        id: TransactionId,
        participants: &[Arc<dyn Participant>],
    ) -> Result<bool> {
        self.execute_with_report(id, participants)
            .await
            .map(|report| report.committed)
    }

    /// Execute a transaction and return the full report
    ///
    /// Participants are contacted for prepare, commit, and rollback in the
    /// order given here; tests rely on that determinism. On return the
    /// transaction has reached a terminal state and been removed from the
    /// registry.
    pub async fn execute_with_report(
        &self,
        id: TransactionId,
        participants: &[Arc<dyn Participant>],
    ) -> Result<TwoPhaseReport> {
        let names: Vec<String> = participants.iter().map(|p| p.name().to_string()).collect();
        self.registry.bind_participants(id, names)?;
        self.registry.transition(id, TransactionState::Preparing)?;

        let (votes, prepared) = self.prepare_phase(id, participants).await?;
        let all_prepared = votes.iter().all(|(_, vote)| vote.is_prepared());

        let mut post_decision_errors = Vec::new();
        let committed = if all_prepared {
            self.registry.transition(id, TransactionState::Prepared)?;
            self.registry.transition(id, TransactionState::Committing)?;
            self.commit_phase(id, participants, &mut post_decision_errors)
                .await;
            self.registry.transition(id, TransactionState::Committed)?;
            true
        } else {
            self.registry.transition(id, TransactionState::Aborting)?;
            self.rollback_prepared(id, &prepared, &mut post_decision_errors)
                .await;
            self.registry.transition(id, TransactionState::Aborted)?;
            false
        };

        // Terminal records are dropped immediately; the registry bounds
        // memory, it is not a durability substitute.
        self.registry.remove(id);

        Ok(TwoPhaseReport {
            id,
            committed,
            votes,
            post_decision_errors,
        })
    }

    /// Phase 1: collect prepare votes sequentially, stopping at the first
    /// vote against the transaction
    ///
    /// Returns the votes in contact order plus the participants that voted
    /// prepared and therefore must be rolled back if the transaction aborts.
    async fn prepare_phase<'a>(
        &self,
        id: TransactionId,
        participants: &'a [Arc<dyn Participant>],
    ) -> Result<(Vec<(String, ParticipantVote)>, Vec<&'a Arc<dyn Participant>>)> {
        let mut votes = Vec::with_capacity(participants.len());
        let mut prepared = Vec::new();

        for participant in participants {
            let name = participant.name().to_string();
            let started = tokio::time::Instant::now();

            let vote = match tokio::time::timeout(self.config.prepare_timeout, participant.prepare())
                .await
            {
                Ok(Ok(true)) => ParticipantVote::Prepared,
                Ok(Ok(false)) => ParticipantVote::Aborted {
                    reason: "participant voted abort".to_string(),
                },
                // Fail-safe default: abort on doubt
                Ok(Err(e)) => ParticipantVote::Aborted {
                    reason: e.to_string(),
                },
                Err(_) => {
                    let elapsed = started.elapsed();
                    tracing::warn!(
                        txn_id = %id,
                        participant = %name,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "prepare timed out"
                    );
                    ParticipantVote::TimedOut { elapsed }
                }
            };

            self.registry.record_vote(id, &name, vote.clone())?;
            let is_prepared = vote.is_prepared();
            if !is_prepared && !matches!(vote, ParticipantVote::TimedOut { .. }) {
                tracing::debug!(txn_id = %id, participant = %name, ?vote, "abort vote");
            }
            votes.push((name, vote));

            if is_prepared {
                prepared.push(participant);
            } else {
                // Short-circuit: remaining participants are never contacted
                // and will not receive a rollback either.
                break;
            }
        }

        Ok((votes, prepared))
    }

    /// Phase 2: deliver commit to every participant, in order
    ///
    /// Commit is the point of no return; a failing delivery is recorded and
    /// logged but cannot un-commit the transaction.
    async fn commit_phase(
        &self,
        id: TransactionId,
        participants: &[Arc<dyn Participant>],
        errors: &mut Vec<PostDecisionError>,
    ) {
        for participant in participants {
            if let Err(e) = participant.commit().await {
                tracing::warn!(
                    txn_id = %id,
                    participant = %participant.name(),
                    error = %e,
                    "commit delivery failed"
                );
                errors.push(PostDecisionError {
                    participant: participant.name().to_string(),
                    phase: DecisionPhase::Commit,
                    error: e.to_string(),
                });
            }
        }
    }

    /// Abort path: roll back only the participants that voted prepared
    async fn rollback_prepared(
        &self,
        id: TransactionId,
        prepared: &[&Arc<dyn Participant>],
        errors: &mut Vec<PostDecisionError>,
    ) {
        for participant in prepared {
            if let Err(e) = participant.rollback().await {
                tracing::warn!(
                    txn_id = %id,
                    participant = %participant.name(),
                    error = %e,
                    "rollback delivery failed"
                );
                errors.push(PostDecisionError {
                    participant: participant.name().to_string(),
                    phase: DecisionPhase::Rollback,
                    error: e.to_string(),
                });
            }
        }
    }
}
