//! The saga step capability contract

use async_trait::async_trait;
use atomix_common::ParticipantError;

/// One compensatable unit of work in a saga
///
/// `compensate` is expected, not guaranteed, to be a true inverse of
/// `forward`. The executor invokes it at most once, and only after a
/// successful forward execution.
#[async_trait]
pub trait SagaStep: Send + Sync {
    /// Identity used in reports and log records
    fn name(&self) -> &str;

    /// Execute the step's effect
    ///
    /// `Ok(false)` and `Err` both count as a failed attempt against the
    /// retry budget; a retried forward must therefore tolerate re-execution.
    async fn forward(&self) -> Result<bool, ParticipantError>;

    /// Reverse a previously successful forward execution
    async fn compensate(&self) -> Result<bool, ParticipantError>;
}
