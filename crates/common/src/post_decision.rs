//! Structured record of failures after the commit/abort decision
//!
//! Once phase 2 has begun the outcome is fixed; a failing `commit`,
//! `rollback`, or saga `compensate` call can no longer change it. Those
//! failures are still information the caller needs, so they are collected
//! into these records and attached to the execution report instead of being
//! silently swallowed.

use std::fmt;

/// Which post-decision call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionPhase {
    /// 2PC phase-2 commit delivery
    Commit,
    /// 2PC abort-path rollback delivery
    Rollback,
    /// Saga reverse-order compensation
    Compensate,
}

impl fmt::Display for DecisionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionPhase::Commit => write!(f, "commit"),
            DecisionPhase::Rollback => write!(f, "rollback"),
            DecisionPhase::Compensate => write!(f, "compensate"),
        }
    }
}

/// A single participant's post-decision failure
#[derive(Debug, Clone)]
pub struct PostDecisionError {
    /// Participant or step identity
    pub participant: String,
    /// Which call failed
    pub phase: DecisionPhase,
    /// Failure reason as reported by the participant
    pub error: String,
}

impl fmt::Display for PostDecisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed for {}: {}", self.phase, self.participant, self.error)
    }
}
