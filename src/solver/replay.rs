//! Deterministic gateway that replays pre-recorded raw samples.
//!
//! The external hybrid service is a black box with no determinism guarantee,
//! so tests and offline runs stand it in with recorded key-to-value samples.
//! Feasibility flags and objective values are derived through
//! [`Model::assignment`], exactly as a live gateway would derive them.

use crate::domain::{GatewayError, Model, SolutionSet, SolverGateway, VarKey};
use log::info;
use std::collections::BTreeMap;

pub struct ReplayGateway {
    samples: Vec<BTreeMap<VarKey, f64>>,
}

impl ReplayGateway {
    pub fn new(samples: Vec<BTreeMap<VarKey, f64>>) -> Self {
        Self { samples }
    }
}

impl SolverGateway for ReplayGateway {
    fn submit(&self, model: &Model, label: &str) -> Result<SolutionSet, GatewayError> {
        info!(
            "replaying {} recorded samples for job '{}'",
            self.samples.len(),
            label
        );
        self.samples
            .iter()
            .map(|sample| {
                model
                    .assignment(sample.clone())
                    .map_err(|e| GatewayError::Backend(format!("recorded sample is invalid: {}", e)))
            })
            .collect()
    }

    fn name(&self) -> &str {
        "replay"
    }

    fn supports_quadratic(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Expression, ModelBuilder, Relation, Sense};

    fn k(i: u32) -> VarKey {
        VarKey::Index(i)
    }

    fn capped_model() -> Model {
        let mut builder = ModelBuilder::new();
        builder.declare_integer(k(0), 5).unwrap();
        builder
            .set_objective(Expression::term(1.0, k(0)), Sense::Minimize)
            .unwrap();
        builder
            .add_constraint(Expression::term(1.0, k(0)), Relation::Le, 3.0, "cap")
            .unwrap();
        builder.build()
    }

    #[test]
    fn samples_come_back_in_recorded_order_with_derived_flags() {
        let model = capped_model();
        let gateway = ReplayGateway::new(vec![
            BTreeMap::from([(k(0), 2.0)]),
            BTreeMap::from([(k(0), 5.0)]),
            BTreeMap::from([(k(0), 1.0)]),
        ]);
        let solutions = gateway.submit(&model, "replay test").unwrap();
        assert_eq!(solutions.len(), 3);
        assert_eq!(solutions[0].objective_value(), 2.0);
        assert!(solutions[0].is_feasible());
        assert!(!solutions[1].is_feasible());
        assert!(solutions[2].is_feasible());
    }

    #[test]
    fn empty_recording_is_a_valid_empty_solution_set() {
        let model = capped_model();
        let gateway = ReplayGateway::new(Vec::new());
        assert!(gateway.submit(&model, "empty").unwrap().is_empty());
    }

    #[test]
    fn malformed_samples_surface_as_backend_errors() {
        let model = capped_model();
        let gateway = ReplayGateway::new(vec![BTreeMap::new()]);
        let err = gateway.submit(&model, "bad").unwrap_err();
        assert!(matches!(err, GatewayError::Backend(_)));
    }
}
