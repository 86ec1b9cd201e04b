//! The 2PC participant capability contract
//!
//! A participant is any resource that can vote on a prepare request and then
//! either make the change durable or undo it. The coordinator depends only
//! on this trait; concrete resources (a local store, a remote service proxy)
//! implement it independently.

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a participant call
///
/// Carries only a human-readable reason. The coordinator never inspects the
/// payload; every participant error on the prepare path is treated as an
/// abort vote, and on the commit/rollback path as a post-decision failure.
#[derive(Debug, Clone, Error)]
#[error("participant failure: {0}")]
pub struct ParticipantError(pub String);

impl From<String> for ParticipantError {
    fn from(reason: String) -> Self {
        Self(reason)
    }
}

impl From<&str> for ParticipantError {
    fn from(reason: &str) -> Self {
        Self(reason.to_string())
    }
}

/// A resource taking part in a two-phase commit
///
/// Calls may block on I/O; the coordinator bounds `prepare` with its
/// configured deadline but lets `commit` and `rollback` run to completion,
/// since a decided transaction must eventually be delivered everywhere.
#[async_trait]
pub trait Participant: Send + Sync {
    /// Identity used in votes, reports, and log records
    fn name(&self) -> &str;

    /// Phase 1: vote on whether the transaction may commit
    ///
    /// `Ok(true)` is a prepared vote, `Ok(false)` an abort vote. An `Err` is
    /// treated exactly like an abort vote (fail-safe: abort on doubt).
    async fn prepare(&self) -> Result<bool, ParticipantError>;

    /// Phase 2: make the prepared changes durable
    ///
    /// Only called after every participant voted prepared. Errors are
    /// recorded but cannot reverse the commit decision.
    async fn commit(&self) -> Result<(), ParticipantError>;

    /// Undo a prepared vote
    ///
    /// Only called on participants that previously returned `true` from
    /// `prepare`. Errors are recorded but do not stop the abort sweep.
    async fn rollback(&self) -> Result<(), ParticipantError>;
}
