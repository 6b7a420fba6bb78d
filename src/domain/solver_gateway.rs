// Domain service interface for submitting models to an optimization solver.
// Defines the contract that any gateway implementation must follow; the
// solver behind it (a managed hybrid service, a local MIP backend, a recorded
// replay) is an external collaborator from the core's point of view.

use super::models::{Model, SolutionSet};
use std::time::Duration;

/// Failures raised at the gateway boundary. Distinct from [`ModelError`]:
/// these happen after a valid model was handed over, and the core never
/// retries them.
///
/// [`ModelError`]: super::builder::ModelError
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("authentication failure: {0}")]
    Authentication(String),

    #[error("solver did not answer within {0:?}")]
    Timeout(Duration),

    #[error("{gateway} cannot solve this model: {reason}")]
    Unsupported { gateway: String, reason: String },

    #[error("solver backend failed: {0}")]
    Backend(String),
}

/// Gateway to an external optimization solver.
///
/// `submit` blocks until the solver answers. The returned solution set keeps
/// the solver's order, may contain infeasible candidates, and may be empty;
/// an empty set is a normal outcome, not an error. No optimality, latency,
/// or cross-run determinism is guaranteed. Callers wanting a deadline set it
/// on the concrete gateway (e.g. a time limit), not here.
pub trait SolverGateway: Send + Sync {
    /// Solve `model`, tagging the job with a human-readable `label`.
    fn submit(&self, model: &Model, label: &str) -> Result<SolutionSet, GatewayError>;

    /// Name of the backing solver, for logs and reports.
    fn name(&self) -> &str;

    /// Whether this gateway accepts models with degree-2 terms.
    fn supports_quadratic(&self) -> bool;
}
