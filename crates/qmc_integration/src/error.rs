//! Error types for the integration driver.
//!
//! This module defines structured error types for configuration validation
//! and runtime errors in the replication loop.

use qmc_core::{NetError, StatsError};
use thiserror::Error;

/// Configuration error for the integration driver.
///
/// These errors occur at build time when invalid parameters are provided.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Replication count outside valid range [1, 1_000_000].
    #[error("Invalid replication count {0}: must be in range [1, 1_000_000]")]
    InvalidReplicationCount(usize),

    /// Dimension of zero.
    #[error("Invalid dimension {0}: must be at least 1")]
    InvalidDimension(usize),

    /// Precision outside valid range [1, 63].
    #[error("Invalid precision {0}: must be in range [1, 63]")]
    InvalidPrecision(u32),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

/// Errors raised by an integration run.
///
/// Everything except `Net` and `Stats` is detected before the integrand is
/// first called.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum IntegrationError {
    /// Invalid driver configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The net does not have the configured dimension.
    #[error("Dimension mismatch: configured {expected}, net has {actual}")]
    DimensionMismatch {
        /// Configured dimension.
        expected: usize,
        /// Dimension of the supplied net.
        actual: usize,
    },

    /// The configured precision exceeds what the net provides.
    #[error("Precision {requested} exceeds the net precision {available}")]
    PrecisionTooHigh {
        /// Configured precision.
        requested: u32,
        /// Precision of the supplied net.
        available: u32,
    },

    /// Point stream failure.
    #[error(transparent)]
    Net(#[from] NetError),

    /// Statistics failure.
    #[error(transparent)]
    Stats(#[from] StatsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidReplicationCount(0);
        assert!(err.to_string().contains("Invalid replication count 0"));

        let err = ConfigError::InvalidPrecision(64);
        assert!(err.to_string().contains("Invalid precision 64"));

        let err = ConfigError::InvalidParameter {
            name: "precision",
            value: "must be specified".to_string(),
        };
        assert!(err.to_string().contains("precision"));
    }

    #[test]
    fn test_integration_error_wraps_sources() {
        let err: IntegrationError = NetError::NotInitialised.into();
        assert!(matches!(err, IntegrationError::Net(_)));

        let err = IntegrationError::PrecisionTooHigh {
            requested: 12,
            available: 10,
        };
        assert_eq!(err.to_string(), "Precision 12 exceeds the net precision 10");
    }
}
