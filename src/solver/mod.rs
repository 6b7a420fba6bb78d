// Solver gateways: concrete implementations of SolverGateway

#[cfg(feature = "cbc")]
pub mod coin_cbc_gateway;
pub mod factory;
#[cfg(feature = "highs")]
pub mod highs_gateway;
pub mod lowering;
pub mod replay;

#[cfg(feature = "cbc")]
pub use coin_cbc_gateway::CoinCbcGateway;
pub use factory::{Backend, GatewayFactory};
#[cfg(feature = "highs")]
pub use highs_gateway::HighsGateway;
pub use replay::ReplayGateway;
