//! Ordered, retryable execution of compensatable steps

use crate::step::SagaStep;
use atomix_common::{DecisionPhase, PostDecisionError};
use std::sync::Arc;

/// Saga executor configuration
#[derive(Debug, Clone)]
pub struct SagaConfig {
    /// Retries allowed per step after the first attempt; a step gets
    /// `max_retries + 1` forward attempts in total
    pub max_retries: u32,
}

impl Default for SagaConfig {
    fn default() -> Self {
        // Retries re-execute effectful forwards, so they are opt-in.
        Self { max_retries: 0 }
    }
}

/// One step's execution record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Step identity
    pub name: String,
    /// Forward attempts consumed, including the successful or final one
    pub attempts: u32,
}

/// Outcome of one saga execution
#[derive(Debug, Clone)]
pub struct SagaReport {
    /// Whether every step completed
    pub succeeded: bool,
    /// Steps that completed, in completion order
    pub completed: Vec<StepReport>,
    /// The step that exhausted its retry budget, if any
    pub failed_step: Option<StepReport>,
    /// Compensation failures, observable but outcome-neutral
    pub compensation_errors: Vec<PostDecisionError>,
}

/// Drives an ordered list of steps forward, compensating on failure
pub struct SagaExecutor {
    config: SagaConfig,
}

impl SagaExecutor {
    /// Create an executor with the default configuration (no retries)
    pub fn new() -> Self {
        Self::with_config(SagaConfig::default())
    }

    /// Create an executor with an explicit configuration
    pub fn with_config(config: SagaConfig) -> Self {
        Self { config }
    }

    /// Execute the steps, reporting only the boolean outcome
    pub async fn execute(&self, steps: &[Arc<dyn SagaStep>]) -> bool {
        self.execute_with_report(steps).await.succeeded
    }

    /// Execute the steps and return the full report
    ///
    /// Steps run strictly in order; a step that exhausts its retry budget
    /// triggers reverse-order compensation of every completed step and a
    /// `false` outcome. The failed step itself is never compensated, since
    /// its forward effect never took hold.
    pub async fn execute_with_report(&self, steps: &[Arc<dyn SagaStep>]) -> SagaReport {
        let mut completed: Vec<(&Arc<dyn SagaStep>, StepReport)> = Vec::new();

        for step in steps {
            match self.run_forward(step).await {
                Ok(report) => completed.push((step, report)),
                Err(report) => {
                    let compensation_errors = self.compensate_completed(&completed).await;
                    return SagaReport {
                        succeeded: false,
                        completed: completed.into_iter().map(|(_, r)| r).collect(),
                        failed_step: Some(report),
                        compensation_errors,
                    };
                }
            }
        }

        SagaReport {
            succeeded: true,
            completed: completed.into_iter().map(|(_, r)| r).collect(),
            failed_step: None,
            compensation_errors: Vec::new(),
        }
    }

    /// Run one step's forward effect under the retry budget
    async fn run_forward(&self, step: &Arc<dyn SagaStep>) -> Result<StepReport, StepReport> {
        let budget = self.config.max_retries.saturating_add(1);
        for attempt in 1..=budget {
            match step.forward().await {
                Ok(true) => {
                    return Ok(StepReport {
                        name: step.name().to_string(),
                        attempts: attempt,
                    });
                }
                Ok(false) => {
                    tracing::debug!(
                        step = %step.name(),
                        attempt,
                        budget,
                        "forward execution returned failure"
                    );
                }
                Err(e) => {
                    tracing::debug!(
                        step = %step.name(),
                        attempt,
                        budget,
                        error = %e,
                        "forward execution raised"
                    );
                }
            }
        }

        tracing::warn!(step = %step.name(), budget, "step exhausted its retry budget");
        Err(StepReport {
            name: step.name().to_string(),
            attempts: budget,
        })
    }

    /// Compensate completed steps in strict reverse completion order
    ///
    /// Best-effort: a failing compensation is recorded and the sweep moves
    /// on, so every remaining step still gets its one compensation attempt.
    async fn compensate_completed(
        &self,
        completed: &[(&Arc<dyn SagaStep>, StepReport)],
    ) -> Vec<PostDecisionError> {
        let mut errors = Vec::new();

        for (step, _) in completed.iter().rev() {
            let failure = match step.compensate().await {
                Ok(true) => None,
                Ok(false) => Some("compensation returned failure".to_string()),
                Err(e) => Some(e.to_string()),
            };

            if let Some(error) = failure {
                tracing::warn!(step = %step.name(), error = %error, "compensation failed");
                errors.push(PostDecisionError {
                    participant: step.name().to_string(),
                    phase: DecisionPhase::Compensate,
                    error,
                });
            }
        }

        errors
    }
}

impl Default for SagaExecutor {
    fn default() -> Self {
        Self::new()
    }
}
