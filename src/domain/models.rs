use super::builder::ModelError;
use super::expression::Expression;
use super::value_objects::{Domain, Relation, Sense, VarKey};
use std::collections::BTreeMap;

/// Tolerance used when checking constraint satisfaction and domain
/// membership of returned variable values.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Decision variable in a constrained model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable {
    pub key: VarKey,
    pub domain: Domain,
}

/// Labeled linear or bilinear constraint on variables
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub label: String,
    pub expression: Expression,
    pub relation: Relation,
    pub bound: f64,
}

impl Constraint {
    pub fn is_satisfied(&self, values: &BTreeMap<VarKey, f64>) -> bool {
        let lhs = self.expression.evaluate(values);
        match self.relation {
            Relation::Le => lhs <= self.bound + FEASIBILITY_TOLERANCE,
            Relation::Eq => (lhs - self.bound).abs() <= FEASIBILITY_TOLERANCE,
            Relation::Ge => lhs >= self.bound - FEASIBILITY_TOLERANCE,
        }
    }
}

/// Immutable constrained model: declared variables, an objective with a
/// sense, and labeled constraints in insertion order.
///
/// Models are produced only by [`ModelBuilder::build`], which guarantees
/// that every key referenced by the objective or a constraint is declared
/// and that constraint labels are unique.
///
/// [`ModelBuilder::build`]: super::builder::ModelBuilder::build
#[derive(Debug, Clone)]
pub struct Model {
    variables: BTreeMap<VarKey, Domain>,
    objective: Expression,
    sense: Sense,
    constraints: Vec<Constraint>,
}

impl Model {
    pub(crate) fn new(
        variables: BTreeMap<VarKey, Domain>,
        objective: Expression,
        sense: Sense,
        constraints: Vec<Constraint>,
    ) -> Self {
        Self {
            variables,
            objective,
            sense,
            constraints,
        }
    }

    pub fn objective(&self) -> &Expression {
        &self.objective
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Declared variables in key order.
    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.variables.iter().map(|(key, domain)| Variable {
            key: *key,
            domain: *domain,
        })
    }

    pub fn domain(&self, key: VarKey) -> Option<Domain> {
        self.variables.get(&key).copied()
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Whether the objective or any constraint carries a degree-2 term.
    pub fn is_quadratic(&self) -> bool {
        self.objective.is_quadratic()
            || self.constraints.iter().any(|c| c.expression.is_quadratic())
    }

    /// Turn a raw key-to-value mapping into an [`Assignment`], deriving the
    /// feasibility flag and the objective value. The mapping must cover
    /// exactly the declared variables.
    ///
    /// This is the only way to construct an `Assignment`; gateways call it
    /// for every candidate the backing solver returns.
    pub fn assignment(&self, values: BTreeMap<VarKey, f64>) -> Result<Assignment, ModelError> {
        for key in self.variables.keys() {
            if !values.contains_key(key) {
                return Err(ModelError::IncompleteAssignment(*key));
            }
        }
        for key in values.keys() {
            if !self.variables.contains_key(key) {
                return Err(ModelError::UnknownAssignmentKey(*key));
            }
        }

        let in_domain = self
            .variables
            .iter()
            .all(|(key, domain)| domain.contains(values[key], FEASIBILITY_TOLERANCE));
        let is_feasible = in_domain && self.constraints.iter().all(|c| c.is_satisfied(&values));
        let objective_value = self.objective.evaluate(&values);

        Ok(Assignment {
            values,
            is_feasible,
            objective_value,
        })
    }
}

/// Candidate solution returned by a gateway: a complete variable-value
/// mapping with its derived feasibility flag and objective value. Read-only
/// after construction.
#[derive(Debug, Clone)]
pub struct Assignment {
    values: BTreeMap<VarKey, f64>,
    is_feasible: bool,
    objective_value: f64,
}

impl Assignment {
    /// Value of a variable; zero for keys outside the originating model.
    pub fn value(&self, key: VarKey) -> f64 {
        self.values.get(&key).copied().unwrap_or(0.0)
    }

    pub fn values(&self) -> &BTreeMap<VarKey, f64> {
        &self.values
    }

    pub fn is_feasible(&self) -> bool {
        self.is_feasible
    }

    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }
}

/// Ordered collection of candidate assignments, as returned by a gateway.
/// May be empty; never sorted by the library.
pub type SolutionSet = Vec<Assignment>;
