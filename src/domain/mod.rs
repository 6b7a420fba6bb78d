// Domain module: model construction and the solver-gateway contract

pub mod builder;
pub mod expression;
pub mod models;
pub mod solver_gateway;
pub mod value_objects;

pub use builder::{ModelBuilder, ModelError};
pub use expression::Expression;
pub use models::{Assignment, Constraint, Model, SolutionSet, Variable, FEASIBILITY_TOLERANCE};
pub use solver_gateway::{GatewayError, SolverGateway};
pub use value_objects::{Domain, Relation, Sense, VarKey};
