//! Selection of the best feasible assignment and derived reporting.
//!
//! Metrics are recomputed from the assignment's variable values rather than
//! read off the solver's objective: shipped formulations encode "maximize"
//! as a negated minimized sum, so the raw objective mixes sign-encoded
//! profit and cost terms and is display-only.

use crate::domain::{Assignment, Expression, Model, ModelError, Sense, VarKey};
use log::debug;
use serde::Serialize;
use std::fmt;

/// Named expression recomputed against an assignment (total cost, total
/// value, net profit, ...).
#[derive(Debug, Clone)]
pub struct Metric {
    pub name: String,
    pub expression: Expression,
}

impl Metric {
    pub fn new(name: impl Into<String>, expression: Expression) -> Self {
        Self {
            name: name.into(),
            expression,
        }
    }
}

/// A metric evaluated under a concrete assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    pub name: String,
    pub value: f64,
}

/// Pick the best feasible assignment, honoring the model's sense.
///
/// Returns `None` when no candidate is feasible; that is a normal outcome.
/// Equal objective values keep the first candidate in solution-set order
/// (solver-defined tie-break).
pub fn best_feasible<'a>(model: &Model, solutions: &'a [Assignment]) -> Option<&'a Assignment> {
    let mut best: Option<&Assignment> = None;
    for candidate in solutions.iter().filter(|a| a.is_feasible()) {
        best = match best {
            None => Some(candidate),
            Some(current) => {
                let better = match model.sense() {
                    Sense::Minimize => candidate.objective_value() < current.objective_value(),
                    Sense::Maximize => candidate.objective_value() > current.objective_value(),
                };
                Some(if better { candidate } else { current })
            }
        };
    }
    debug!(
        "selected best of {} candidates: {}",
        solutions.len(),
        best.map_or("none feasible".to_string(), |a| a
            .objective_value()
            .to_string())
    );
    best
}

/// Evaluate `metrics` against `assignment`, independent of the solver's
/// reported objective value. A metric referencing a variable the model never
/// declared fails with [`ModelError::UnknownVariable`].
pub fn recompute_metrics(
    model: &Model,
    assignment: &Assignment,
    metrics: &[Metric],
) -> Result<Vec<MetricValue>, ModelError> {
    for metric in metrics {
        for key in metric.expression.keys() {
            if model.domain(key).is_none() {
                return Err(ModelError::UnknownVariable(key));
            }
        }
    }
    Ok(metrics
        .iter()
        .map(|metric| MetricValue {
            name: metric.name.clone(),
            value: metric.expression.evaluate(assignment.values()),
        })
        .collect())
}

/// Value of one variable in a report, listed in key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableValue {
    pub key: VarKey,
    pub value: f64,
}

/// Human-readable solve outcome. "No feasible solution" is a presence flag,
/// never an error.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub solution_found: bool,
    pub variables: Vec<VariableValue>,
    /// Solver-side objective of the selected assignment; display-only.
    pub objective_value: Option<f64>,
    pub metrics: Vec<MetricValue>,
}

/// Assemble a [`Report`] from the selection outcome and recomputed metrics.
pub fn format_report(model: &Model, best: Option<&Assignment>, metrics: Vec<MetricValue>) -> Report {
    match best {
        None => Report {
            solution_found: false,
            variables: Vec::new(),
            objective_value: None,
            metrics: Vec::new(),
        },
        Some(assignment) => Report {
            solution_found: true,
            variables: model
                .variables()
                .map(|v| VariableValue {
                    key: v.key,
                    value: assignment.value(v.key),
                })
                .collect(),
            objective_value: Some(assignment.objective_value()),
            metrics,
        },
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.solution_found {
            return writeln!(f, "No feasible solution found.");
        }
        if let Some(objective) = self.objective_value {
            writeln!(f, "Solution found (raw objective {}).", objective)?;
        }
        for variable in &self.variables {
            writeln!(f, "  {} = {}", variable.key, variable.value)?;
        }
        for metric in &self.metrics {
            writeln!(f, "{}: {}", metric.name, metric.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelBuilder, Relation};
    use std::collections::BTreeMap;

    fn k(i: u32) -> VarKey {
        VarKey::Index(i)
    }

    // One scored variable plus a slack flag whose constraint controls
    // feasibility, so candidates with chosen objective values can be forged.
    fn scored_model(sense: Sense) -> Model {
        let mut builder = ModelBuilder::new();
        builder.declare_integer(k(0), 100).unwrap();
        builder.declare_binary(k(1)).unwrap();
        builder
            .set_objective(Expression::term(1.0, k(0)), sense)
            .unwrap();
        builder
            .add_constraint(Expression::term(1.0, k(1)), Relation::Le, 0.0, "slack off")
            .unwrap();
        builder.build()
    }

    fn candidate(model: &Model, objective: f64, feasible: bool) -> Assignment {
        model
            .assignment(BTreeMap::from([
                (k(0), objective),
                (k(1), if feasible { 0.0 } else { 1.0 }),
            ]))
            .unwrap()
    }

    #[test]
    fn empty_solution_set_yields_none() {
        let model = scored_model(Sense::Minimize);
        assert!(best_feasible(&model, &[]).is_none());
    }

    #[test]
    fn infeasible_candidates_are_ignored_and_minimum_wins() {
        let model = scored_model(Sense::Minimize);
        let solutions = vec![
            candidate(&model, 10.0, true),
            candidate(&model, 4.0, true),
            candidate(&model, 7.0, false),
        ];
        let best = best_feasible(&model, &solutions).unwrap();
        assert_eq!(best.objective_value(), 4.0);
    }

    #[test]
    fn maximize_sense_selects_the_largest_objective() {
        let model = scored_model(Sense::Maximize);
        let solutions = vec![
            candidate(&model, 10.0, true),
            candidate(&model, 4.0, true),
            candidate(&model, 70.0, false),
        ];
        let best = best_feasible(&model, &solutions).unwrap();
        assert_eq!(best.objective_value(), 10.0);
    }

    #[test]
    fn ties_keep_the_first_candidate_in_order() {
        let model = scored_model(Sense::Minimize);
        let first = candidate(&model, 5.0, true);
        let second = candidate(&model, 5.0, true);
        let solutions = vec![first, second];
        let best = best_feasible(&model, &solutions).unwrap();
        assert!(std::ptr::eq(best, &solutions[0]));
    }

    #[test]
    fn metrics_are_recomputed_from_variable_values() {
        // items with values [5, 3] and weights [2, 4], capacity 5;
        // buy one of item 0 and none of item 1
        let mut builder = ModelBuilder::new();
        builder.declare_integer(k(0), 3).unwrap();
        builder.declare_integer(k(1), 3).unwrap();
        builder
            .set_objective(
                Expression::term(2.0 - 5.0, k(0)) + Expression::term(4.0 - 3.0, k(1)),
                Sense::Minimize,
            )
            .unwrap();
        builder
            .add_constraint(
                Expression::term(2.0, k(0)) + Expression::term(4.0, k(1)),
                Relation::Le,
                5.0,
                "capacity",
            )
            .unwrap();
        let model = builder.build();
        let chosen = model
            .assignment(BTreeMap::from([(k(0), 1.0), (k(1), 0.0)]))
            .unwrap();

        let metrics = vec![
            Metric::new(
                "Total weight",
                Expression::term(2.0, k(0)) + Expression::term(4.0, k(1)),
            ),
            Metric::new(
                "Total value",
                Expression::term(5.0, k(0)) + Expression::term(3.0, k(1)),
            ),
        ];
        let values = recompute_metrics(&model, &chosen, &metrics).unwrap();
        assert_eq!(values[0].value, 2.0);
        assert_eq!(values[1].value, 5.0);
    }

    #[test]
    fn metrics_over_unknown_variables_fail() {
        let model = scored_model(Sense::Minimize);
        let chosen = candidate(&model, 1.0, true);
        let metrics = vec![Metric::new("bogus", Expression::term(1.0, k(9)))];
        let err = recompute_metrics(&model, &chosen, &metrics).unwrap_err();
        assert!(matches!(err, ModelError::UnknownVariable(key) if key == k(9)));
    }

    #[test]
    fn report_without_a_solution_is_a_plain_presence_flag() {
        let model = scored_model(Sense::Minimize);
        let report = format_report(&model, None, Vec::new());
        assert!(!report.solution_found);
        assert!(report.objective_value.is_none());
        assert_eq!(report.to_string(), "No feasible solution found.\n");
    }

    #[test]
    fn report_lists_variables_in_key_order_with_metrics() {
        let model = scored_model(Sense::Minimize);
        let chosen = candidate(&model, 3.0, true);
        let metrics = recompute_metrics(
            &model,
            &chosen,
            &[Metric::new("Quantity", Expression::term(1.0, k(0)))],
        )
        .unwrap();
        let report = format_report(&model, Some(&chosen), metrics);
        assert!(report.solution_found);
        assert_eq!(report.objective_value, Some(3.0));
        assert_eq!(
            report.variables,
            vec![
                VariableValue { key: k(0), value: 3.0 },
                VariableValue { key: k(1), value: 0.0 },
            ]
        );
        let rendered = report.to_string();
        assert!(rendered.contains("x0 = 3"));
        assert!(rendered.contains("Quantity: 3"));
    }
}
