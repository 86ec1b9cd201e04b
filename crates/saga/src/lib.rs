//! Saga execution for participants without a native prepare phase
//!
//! Where two-phase commit votes before acting, a saga acts and undoes:
//! steps run forward in order with a bounded retry budget, and on an
//! irrecoverable failure every previously completed step is compensated in
//! strict reverse order. Compensation is best-effort; the saga minimizes
//! inconsistency risk rather than eliminating it.

mod executor;
mod step;

pub use executor::{SagaConfig, SagaExecutor, SagaReport, StepReport};
pub use step::SagaStep;
