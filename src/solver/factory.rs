use crate::domain::{GatewayError, SolverGateway};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Solver backend to gate submissions through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Automatically select the best compiled-in backend
    Auto,
    /// COIN-OR CBC
    CoinCbc,
    /// HiGHS
    Highs,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Auto => write!(f, "Auto"),
            Backend::CoinCbc => write!(f, "COIN-OR CBC"),
            Backend::Highs => write!(f, "HiGHS"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Backend::Auto),
            "cbc" | "coin-cbc" | "coincbc" => Ok(Backend::CoinCbc),
            "highs" => Ok(Backend::Highs),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

/// Factory for creating gateway instances from a backend choice. Backends
/// that were not compiled in fail at creation time, not at submit time.
pub struct GatewayFactory;

impl GatewayFactory {
    pub fn create(backend: Backend) -> Result<Arc<dyn SolverGateway>, GatewayError> {
        match backend {
            Backend::Auto => Self::auto(),
            Backend::CoinCbc => Self::coin_cbc(),
            Backend::Highs => Self::highs(),
        }
    }

    #[cfg(feature = "highs")]
    fn auto() -> Result<Arc<dyn SolverGateway>, GatewayError> {
        Ok(Arc::new(crate::solver::HighsGateway::new()))
    }

    #[cfg(all(feature = "cbc", not(feature = "highs")))]
    fn auto() -> Result<Arc<dyn SolverGateway>, GatewayError> {
        Ok(Arc::new(crate::solver::CoinCbcGateway::new()))
    }

    #[cfg(not(any(feature = "cbc", feature = "highs")))]
    fn auto() -> Result<Arc<dyn SolverGateway>, GatewayError> {
        Err(GatewayError::Backend(
            "no solver backend compiled in; enable the `cbc` or `highs` feature".to_string(),
        ))
    }

    #[cfg(feature = "cbc")]
    fn coin_cbc() -> Result<Arc<dyn SolverGateway>, GatewayError> {
        Ok(Arc::new(crate::solver::CoinCbcGateway::new()))
    }

    #[cfg(not(feature = "cbc"))]
    fn coin_cbc() -> Result<Arc<dyn SolverGateway>, GatewayError> {
        Err(GatewayError::Backend(
            "CBC backend not compiled in; enable the `cbc` feature".to_string(),
        ))
    }

    #[cfg(feature = "highs")]
    fn highs() -> Result<Arc<dyn SolverGateway>, GatewayError> {
        Ok(Arc::new(crate::solver::HighsGateway::new()))
    }

    #[cfg(not(feature = "highs"))]
    fn highs() -> Result<Arc<dyn SolverGateway>, GatewayError> {
        Err(GatewayError::Backend(
            "HiGHS backend not compiled in; enable the `highs` feature".to_string(),
        ))
    }
}
