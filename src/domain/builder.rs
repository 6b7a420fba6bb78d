// Incremental construction of constrained models.
//
// All checks happen here, synchronously: duplicate keys and labels, negative
// bounds, references to undeclared variables. A failed call leaves the
// builder exactly as it was (validate, then insert).

use super::expression::Expression;
use super::models::{Constraint, Model};
use super::value_objects::{Domain, Relation, Sense, VarKey};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Model construction and assignment validation errors. These are programmer
/// errors: they abort construction and name the offending key or label.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("variable {0} is already declared")]
    DuplicateVariable(VarKey),

    #[error("expression references undeclared variable {0}")]
    UnknownVariable(VarKey),

    #[error("constraint label '{0}' is already used")]
    DuplicateConstraintLabel(String),

    #[error("variable {key}: upper bound {upper_bound} must not be negative")]
    InvalidBound { key: VarKey, upper_bound: i64 },

    #[error("objective is already set")]
    ObjectiveAlreadySet,

    #[error("assignment is missing a value for variable {0}")]
    IncompleteAssignment(VarKey),

    #[error("assignment carries a value for undeclared variable {0}")]
    UnknownAssignmentKey(VarKey),
}

pub type Result<T> = std::result::Result<T, ModelError>;

/// Accumulates variables, an objective, and labeled constraints into an
/// immutable [`Model`].
#[derive(Debug, Default)]
pub struct ModelBuilder {
    variables: BTreeMap<VarKey, Domain>,
    objective: Option<(Expression, Sense)>,
    constraints: Vec<Constraint>,
    labels: BTreeSet<String>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an integer variable over `{0, 1, ..., upper_bound}`.
    pub fn declare_integer(&mut self, key: VarKey, upper_bound: i64) -> Result<()> {
        if upper_bound < 0 {
            return Err(ModelError::InvalidBound { key, upper_bound });
        }
        self.declare(key, Domain::Integer { upper_bound })
    }

    /// Declare a binary variable over `{0, 1}`.
    pub fn declare_binary(&mut self, key: VarKey) -> Result<()> {
        self.declare(key, Domain::Binary)
    }

    fn declare(&mut self, key: VarKey, domain: Domain) -> Result<()> {
        if self.variables.contains_key(&key) {
            return Err(ModelError::DuplicateVariable(key));
        }
        self.variables.insert(key, domain);
        debug!("declared variable {} with domain {:?}", key, domain);
        Ok(())
    }

    /// Register the objective expression and its sense.
    ///
    /// A second call fails with [`ModelError::ObjectiveAlreadySet`]; silent
    /// overwriting would hide exactly the sign-convention mistakes that
    /// maximize-by-negation formulations invite.
    pub fn set_objective(&mut self, expression: Expression, sense: Sense) -> Result<()> {
        if self.objective.is_some() {
            return Err(ModelError::ObjectiveAlreadySet);
        }
        self.check_declared(&expression)?;
        debug!(
            "set objective: {} over {} linear / {} bilinear terms",
            sense,
            expression.linear_terms().count(),
            expression.bilinear_terms().count()
        );
        self.objective = Some((expression, sense));
        Ok(())
    }

    /// Register a labeled constraint `expression <relation> bound`.
    pub fn add_constraint(
        &mut self,
        expression: Expression,
        relation: Relation,
        bound: f64,
        label: impl Into<String>,
    ) -> Result<()> {
        let label = label.into();
        if self.labels.contains(&label) {
            return Err(ModelError::DuplicateConstraintLabel(label));
        }
        self.check_declared(&expression)?;
        debug!("added constraint '{}' ({} {})", label, relation, bound);
        self.labels.insert(label.clone());
        self.constraints.push(Constraint {
            label,
            expression,
            relation,
            bound,
        });
        Ok(())
    }

    fn check_declared(&self, expression: &Expression) -> Result<()> {
        for key in expression.keys() {
            if !self.variables.contains_key(&key) {
                return Err(ModelError::UnknownVariable(key));
            }
        }
        Ok(())
    }

    /// Snapshot the accumulated state as an immutable [`Model`]. The builder
    /// stays usable and later calls never affect a model built earlier.
    ///
    /// Building without an objective yields an empty minimized objective,
    /// matching what constrained-quadratic-model toolkits default to.
    pub fn build(&self) -> Model {
        let (objective, sense) = self
            .objective
            .clone()
            .unwrap_or((Expression::default(), Sense::Minimize));
        debug!(
            "built model: {} variables, {} constraints",
            self.variables.len(),
            self.constraints.len()
        );
        Model::new(
            self.variables.clone(),
            objective,
            sense,
            self.constraints.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(i: u32) -> VarKey {
        VarKey::Index(i)
    }

    #[test]
    fn redeclaring_a_key_fails() {
        let mut builder = ModelBuilder::new();
        builder.declare_integer(k(0), 4).unwrap();
        let err = builder.declare_binary(k(0)).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateVariable(key) if key == k(0)));
    }

    #[test]
    fn negative_upper_bound_is_rejected() {
        let mut builder = ModelBuilder::new();
        let err = builder.declare_integer(k(0), -1).unwrap_err();
        assert!(matches!(err, ModelError::InvalidBound { upper_bound: -1, .. }));
    }

    #[test]
    fn zero_upper_bound_is_a_valid_fixed_variable() {
        let mut builder = ModelBuilder::new();
        builder.declare_integer(k(0), 0).unwrap();
        assert_eq!(builder.build().num_variables(), 1);
    }

    #[test]
    fn objective_can_only_be_set_once() {
        let mut builder = ModelBuilder::new();
        builder.declare_integer(k(0), 4).unwrap();
        builder
            .set_objective(Expression::term(1.0, k(0)), Sense::Minimize)
            .unwrap();
        let err = builder
            .set_objective(Expression::term(-1.0, k(0)), Sense::Minimize)
            .unwrap_err();
        assert!(matches!(err, ModelError::ObjectiveAlreadySet));
    }

    #[test]
    fn objective_must_reference_declared_variables() {
        let mut builder = ModelBuilder::new();
        let err = builder
            .set_objective(Expression::term(1.0, k(3)), Sense::Minimize)
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownVariable(key) if key == k(3)));
    }

    #[test]
    fn constraint_with_undeclared_key_fails_and_leaves_builder_unchanged() {
        let mut builder = ModelBuilder::new();
        builder.declare_integer(k(0), 4).unwrap();
        let err = builder
            .add_constraint(
                Expression::term(1.0, k(0)) + Expression::term(1.0, k(9)),
                Relation::Le,
                3.0,
                "cap",
            )
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownVariable(key) if key == k(9)));

        // the rejected label stays usable and no constraint was recorded
        assert_eq!(builder.build().constraints().len(), 0);
        builder
            .add_constraint(Expression::term(1.0, k(0)), Relation::Le, 3.0, "cap")
            .unwrap();
        assert_eq!(builder.build().constraints().len(), 1);
    }

    #[test]
    fn duplicate_constraint_labels_are_rejected() {
        let mut builder = ModelBuilder::new();
        builder.declare_integer(k(0), 4).unwrap();
        builder
            .add_constraint(Expression::term(1.0, k(0)), Relation::Le, 3.0, "cap")
            .unwrap();
        let err = builder
            .add_constraint(Expression::term(2.0, k(0)), Relation::Ge, 1.0, "cap")
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateConstraintLabel(l) if l == "cap"));
    }

    #[test]
    fn bilinear_terms_pass_through_unlinearized() {
        let mut builder = ModelBuilder::new();
        builder.declare_integer(k(0), 4).unwrap();
        builder.declare_binary(k(1)).unwrap();
        builder
            .add_constraint(Expression::product(1.0, k(0), k(1)), Relation::Ge, 1.0, "c")
            .unwrap();
        let model = builder.build();
        assert!(model.is_quadratic());
        assert_eq!(
            model.constraints()[0]
                .expression
                .bilinear_terms()
                .collect::<Vec<_>>(),
            vec![((k(0), k(1)), 1.0)]
        );
    }

    #[test]
    fn built_models_are_unaffected_by_later_builder_calls() {
        let mut builder = ModelBuilder::new();
        builder.declare_integer(k(0), 4).unwrap();
        builder
            .add_constraint(Expression::term(1.0, k(0)), Relation::Le, 3.0, "cap")
            .unwrap();
        let snapshot = builder.build();

        builder.declare_binary(k(1)).unwrap();
        builder
            .add_constraint(Expression::term(1.0, k(1)), Relation::Le, 1.0, "extra")
            .unwrap();

        assert_eq!(snapshot.num_variables(), 1);
        assert_eq!(snapshot.constraints().len(), 1);

        // ...and a key used by the snapshot still cannot be redeclared
        let err = builder.declare_integer(k(0), 9).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateVariable(key) if key == k(0)));
    }
}
