//! Lowering of a (possibly quadratic) model to a flat indexed MIP for
//! linear backends.
//!
//! The builder hands bilinear terms through structurally; local MIP solvers
//! only take linear rows, so each degree-2 term is replaced by an auxiliary
//! product column tied down with exact linearization rows. That is only
//! possible when at least one factor is binary: with y ∈ {0, 1} and
//! x ∈ [0, U], the rows `z ≤ U·y`, `z ≤ x`, `z ≥ x + U·y − U` pin z = x·y
//! (for two binaries this is the AND constraint set). A product of two
//! non-binary variables has no exact linear form and is rejected.

use crate::domain::{Domain, Expression, Model, Relation, Sense, VarKey};
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum LoweringError {
    #[error("product of {0} and {1} cannot be linearized exactly: neither variable is binary")]
    NonBinaryProduct(VarKey, VarKey),

    #[error("square of non-binary variable {0} cannot be linearized exactly")]
    NonBinarySquare(VarKey),

    #[error("model references undeclared variable {0}")]
    UndeclaredVariable(VarKey),
}

/// Bounds and integrality of one column of the lowered problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub lower: f64,
    pub upper: f64,
    pub integer: bool,
}

/// One linear row: sparse terms over columns, a relation, and a bound.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub terms: Vec<(usize, f64)>,
    pub relation: Relation,
    pub bound: f64,
}

/// A model flattened to columns and rows. `var_columns` maps every original
/// decision variable to its column; auxiliary product columns follow the
/// original ones and are not listed there.
#[derive(Debug)]
pub struct LoweredMip {
    pub columns: Vec<Column>,
    pub objective: Vec<f64>,
    pub objective_offset: f64,
    pub sense: Sense,
    pub rows: Vec<Row>,
    pub var_columns: BTreeMap<VarKey, usize>,
}

pub fn lower(model: &Model) -> Result<LoweredMip, LoweringError> {
    let mut lowerer = Lowerer::new(model);
    let (objective_terms, objective_offset) = lowerer.flatten(model.objective())?;

    for constraint in model.constraints() {
        let (terms, offset) = lowerer.flatten(&constraint.expression)?;
        lowerer.rows.push(Row {
            terms: terms.into_iter().collect(),
            relation: constraint.relation,
            bound: constraint.bound - offset,
        });
    }

    // densify only once every auxiliary column exists
    let mut objective = vec![0.0; lowerer.columns.len()];
    for (column, coefficient) in objective_terms {
        objective[column] = coefficient;
    }

    Ok(LoweredMip {
        columns: lowerer.columns,
        objective,
        objective_offset,
        sense: model.sense(),
        rows: lowerer.rows,
        var_columns: lowerer.var_columns,
    })
}

struct Lowerer<'a> {
    model: &'a Model,
    columns: Vec<Column>,
    rows: Vec<Row>,
    var_columns: BTreeMap<VarKey, usize>,
    product_columns: BTreeMap<(VarKey, VarKey), usize>,
}

impl<'a> Lowerer<'a> {
    fn new(model: &'a Model) -> Self {
        let mut columns = Vec::with_capacity(model.num_variables());
        let mut var_columns = BTreeMap::new();
        for variable in model.variables() {
            var_columns.insert(variable.key, columns.len());
            columns.push(Column {
                lower: 0.0,
                upper: variable.domain.upper_bound(),
                integer: true,
            });
        }
        Self {
            model,
            columns,
            rows: Vec::new(),
            var_columns,
            product_columns: BTreeMap::new(),
        }
    }

    /// Flatten an expression to sparse column terms plus a constant offset,
    /// creating product columns for bilinear terms on demand.
    fn flatten(
        &mut self,
        expression: &Expression,
    ) -> Result<(BTreeMap<usize, f64>, f64), LoweringError> {
        let mut terms: BTreeMap<usize, f64> = BTreeMap::new();
        let add = |column: usize, coefficient: f64, terms: &mut BTreeMap<usize, f64>| {
            *terms.entry(column).or_insert(0.0) += coefficient;
        };

        for (key, coefficient) in expression.linear_terms() {
            let column = self.column_of(key)?;
            add(column, coefficient, &mut terms);
        }
        for ((a, b), coefficient) in expression.bilinear_terms() {
            if a == b {
                // x² = x for binary x
                if !self.domain_of(a)?.is_binary() {
                    return Err(LoweringError::NonBinarySquare(a));
                }
                let column = self.column_of(a)?;
                add(column, coefficient, &mut terms);
            } else {
                let column = self.product_column(a, b)?;
                add(column, coefficient, &mut terms);
            }
        }
        Ok((terms, expression.constant_term()))
    }

    fn column_of(&self, key: VarKey) -> Result<usize, LoweringError> {
        self.var_columns
            .get(&key)
            .copied()
            .ok_or(LoweringError::UndeclaredVariable(key))
    }

    fn domain_of(&self, key: VarKey) -> Result<Domain, LoweringError> {
        self.model
            .domain(key)
            .ok_or(LoweringError::UndeclaredVariable(key))
    }

    /// Column holding the value of `a * b`, created with its linearization
    /// rows on first use and shared afterwards.
    fn product_column(&mut self, a: VarKey, b: VarKey) -> Result<usize, LoweringError> {
        if let Some(&column) = self.product_columns.get(&(a, b)) {
            return Ok(column);
        }

        let domain_a = self.domain_of(a)?;
        let domain_b = self.domain_of(b)?;
        let (selector, other) = if domain_a.is_binary() {
            (a, b)
        } else if domain_b.is_binary() {
            (b, a)
        } else {
            return Err(LoweringError::NonBinaryProduct(a, b));
        };
        let upper = self.domain_of(other)?.upper_bound();
        let selector_col = self.column_of(selector)?;
        let other_col = self.column_of(other)?;

        let product_col = self.columns.len();
        // integrality follows from the rows; a continuous column suffices
        self.columns.push(Column {
            lower: 0.0,
            upper,
            integer: false,
        });

        // z ≤ U·y, z ≤ x, z ≥ x + U·y − U
        self.rows.push(Row {
            terms: vec![(product_col, 1.0), (selector_col, -upper)],
            relation: Relation::Le,
            bound: 0.0,
        });
        self.rows.push(Row {
            terms: vec![(product_col, 1.0), (other_col, -1.0)],
            relation: Relation::Le,
            bound: 0.0,
        });
        self.rows.push(Row {
            terms: vec![(product_col, 1.0), (other_col, -1.0), (selector_col, -upper)],
            relation: Relation::Ge,
            bound: -upper,
        });

        self.product_columns.insert((a, b), product_col);
        Ok(product_col)
    }
}
