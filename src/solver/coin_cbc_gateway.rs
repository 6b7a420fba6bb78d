use crate::domain::{GatewayError, Model, Sense, SolutionSet, SolverGateway};
use crate::solver::lowering::lower;
use good_lp::{
    solvers::coin_cbc, variable, variables, Expression as LpExpression, ResolutionError,
    Solution as LpSolution, SolverModel, Variable as LpVariable,
};
use log::{debug, info};
use std::collections::BTreeMap;

/// COIN-OR CBC adapter. Lowers the model to a flat MIP, solves it locally,
/// and returns at most one assignment (CBC reports a single best solution).
pub struct CoinCbcGateway {
    time_limit: Option<f64>,
}

impl CoinCbcGateway {
    pub fn new() -> Self {
        Self { time_limit: None }
    }

    /// Deadline for the blocking solve, in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }
}

impl Default for CoinCbcGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverGateway for CoinCbcGateway {
    fn submit(&self, model: &Model, label: &str) -> Result<SolutionSet, GatewayError> {
        let mip = lower(model).map_err(|e| GatewayError::Unsupported {
            gateway: self.name().to_string(),
            reason: e.to_string(),
        })?;
        info!(
            "submitting '{}' to CBC: {} columns, {} rows",
            label,
            mip.columns.len(),
            mip.rows.len()
        );

        let mut vars = variables!();
        let mut columns: Vec<LpVariable> = Vec::new();
        for column in &mip.columns {
            let var = if column.integer {
                vars.add(variable().integer().min(column.lower).max(column.upper))
            } else {
                vars.add(variable().min(column.lower).max(column.upper))
            };
            columns.push(var);
        }

        // good_lp minimizes, so negate for maximization
        let is_maximize = mip.sense == Sense::Maximize;
        let mut objective: LpExpression = 0.into();
        for (i, &coefficient) in mip.objective.iter().enumerate() {
            if coefficient != 0.0 {
                let c = if is_maximize { -coefficient } else { coefficient };
                objective += c * columns[i];
            }
        }

        let mut lp_model = vars.minimise(objective).using(coin_cbc::coin_cbc);
        if let Some(limit) = self.time_limit {
            lp_model.set_parameter("sec", &limit.to_string());
        }

        for row in &mip.rows {
            let mut lhs: LpExpression = 0.into();
            for &(i, coefficient) in &row.terms {
                lhs += coefficient * columns[i];
            }
            lp_model = match row.relation {
                crate::domain::Relation::Le => lp_model.with(lhs.leq(row.bound)),
                crate::domain::Relation::Eq => lp_model.with(lhs.eq(row.bound)),
                crate::domain::Relation::Ge => lp_model.with(lhs.geq(row.bound)),
            };
        }

        match lp_model.solve() {
            Ok(solution) => {
                let mut values = BTreeMap::new();
                for (key, &column) in &mip.var_columns {
                    // CBC returns integral columns as near-integer floats
                    values.insert(*key, solution.value(columns[column]).round());
                }
                let assignment = model
                    .assignment(values)
                    .map_err(|e| GatewayError::Backend(e.to_string()))?;
                Ok(vec![assignment])
            }
            Err(ResolutionError::Infeasible) => {
                debug!("CBC reports '{}' infeasible", label);
                Ok(Vec::new())
            }
            Err(ResolutionError::Unbounded) => Err(GatewayError::Backend(
                "problem is unbounded: objective can be improved infinitely".to_string(),
            )),
            Err(e) => Err(GatewayError::Backend(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_quadratic(&self) -> bool {
        // degree-2 terms with a binary factor are handled via lowering
        true
    }
}
