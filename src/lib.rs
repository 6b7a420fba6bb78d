// Domain layer: model construction and the solver-gateway contract
pub mod domain;

// Application layer: instance generation, formulation, reporting
pub mod application;

// Solver gateways: concrete implementations of SolverGateway
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Assignment, Constraint, Domain, Expression, GatewayError, Model, ModelBuilder, ModelError,
    Relation, Sense, SolutionSet, SolverGateway, VarKey, Variable, FEASIBILITY_TOLERANCE,
};

pub use application::{
    best_feasible, format_report, recompute_metrics, Metric, MetricValue, Report, SplitMix64,
};

pub use solver::{Backend, GatewayFactory, ReplayGateway};
