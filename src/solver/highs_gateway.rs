// HiGHS adapter: translates a lowered model to the HiGHS RowProblem API.

use crate::domain::{GatewayError, Model, Relation, Sense, SolutionSet, SolverGateway};
use crate::solver::lowering::lower;
use log::{debug, info};
use std::collections::BTreeMap;

pub struct HighsGateway {
    time_limit: Option<f64>,
}

impl HighsGateway {
    pub fn new() -> Self {
        Self { time_limit: None }
    }

    /// Deadline for the blocking solve, in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }
}

impl Default for HighsGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverGateway for HighsGateway {
    fn submit(&self, model: &Model, label: &str) -> Result<SolutionSet, GatewayError> {
        use highs::{HighsModelStatus, RowProblem, Sense as HighsSense};

        let mip = lower(model).map_err(|e| GatewayError::Unsupported {
            gateway: self.name().to_string(),
            reason: e.to_string(),
        })?;
        info!(
            "submitting '{}' to HiGHS: {} columns, {} rows",
            label,
            mip.columns.len(),
            mip.rows.len()
        );

        let mut pb = RowProblem::default();
        let mut columns = Vec::new();
        for (i, column) in mip.columns.iter().enumerate() {
            let objective_coefficient = mip.objective[i];
            let col = if column.integer {
                pb.add_integer_column(objective_coefficient, column.lower..=column.upper)
            } else {
                pb.add_column(objective_coefficient, column.lower..=column.upper)
            };
            columns.push(col);
        }

        for row in &mip.rows {
            let terms: Vec<_> = row
                .terms
                .iter()
                .map(|&(i, coefficient)| (columns[i], coefficient))
                .collect();
            match row.relation {
                Relation::Le => {
                    pb.add_row(..=row.bound, &terms);
                }
                Relation::Eq => {
                    pb.add_row(row.bound..=row.bound, &terms);
                }
                Relation::Ge => {
                    pb.add_row(row.bound.., &terms);
                }
            }
        }

        let sense = if mip.sense == Sense::Maximize {
            HighsSense::Maximise
        } else {
            HighsSense::Minimise
        };
        let mut highs_model = pb.optimise(sense);
        if let Some(limit) = self.time_limit {
            highs_model.set_option("time_limit", limit);
        }

        let solved = highs_model.solve();
        match solved.status() {
            HighsModelStatus::Optimal => {
                let column_values = solved.get_solution().columns().to_vec();
                let mut values = BTreeMap::new();
                for (key, &column) in &mip.var_columns {
                    values.insert(*key, column_values[column].round());
                }
                let assignment = model
                    .assignment(values)
                    .map_err(|e| GatewayError::Backend(e.to_string()))?;
                Ok(vec![assignment])
            }
            HighsModelStatus::Infeasible => {
                debug!("HiGHS reports '{}' infeasible", label);
                Ok(Vec::new())
            }
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                Err(GatewayError::Backend(
                    "problem is unbounded: objective can be improved infinitely".to_string(),
                ))
            }
            status => Err(GatewayError::Backend(format!(
                "HiGHS returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_quadratic(&self) -> bool {
        true
    }
}
