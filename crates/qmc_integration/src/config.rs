//! Integration run configuration.
//!
//! This module provides configuration types and builders for replicated
//! quasi-Monte Carlo and Monte Carlo integration runs.

use qmc_core::{ConfidenceLevel, MAX_PRECISION};

use crate::error::ConfigError;

/// Maximum number of replications allowed.
pub const MAX_REPLICATIONS: usize = 1_000_000;

/// How each QMC replication randomises the net.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShiftPolicy {
    /// Draw a fresh random digital shift per replication.
    ///
    /// Replication means are independent, so the Student-t interval is
    /// meaningful.
    #[default]
    Random,

    /// Evaluate the plain net in every replication.
    ///
    /// Deterministic; all replication means coincide.
    Unshifted,
}

/// Integration run configuration.
///
/// Immutable configuration specifying the replication count `N`, the
/// dimension `s`, the precision `m` (each replication evaluates `2^m`
/// points) and the confidence level of the reported error bound.
/// Use [`IntegrationConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use qmc_core::ConfidenceLevel;
/// use qmc_integration::IntegrationConfig;
///
/// let config = IntegrationConfig::builder()
///     .replications(32)
///     .dimension(4)
///     .precision(12)
///     .confidence_level(ConfidenceLevel::P99)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.replications(), 32);
/// assert_eq!(config.points_per_replication(), 4096);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct IntegrationConfig {
    /// Number of independent replications.
    replications: usize,
    /// Dimension of the integration domain.
    dimension: usize,
    /// Points per replication as a power of two.
    precision: u32,
    /// Confidence level of the error bound.
    level: ConfidenceLevel,
    /// Optional seed for reproducibility.
    seed: Option<u64>,
    /// QMC randomisation.
    shift_policy: ShiftPolicy,
}

impl IntegrationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> IntegrationConfigBuilder {
        IntegrationConfigBuilder::default()
    }

    /// Returns the number of replications `N`.
    #[inline]
    pub fn replications(&self) -> usize {
        self.replications
    }

    /// Returns the dimension `s`.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the precision `m`.
    #[inline]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns `2^m`.
    #[inline]
    pub fn points_per_replication(&self) -> u64 {
        1u64 << self.precision
    }

    /// Returns the confidence level.
    #[inline]
    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.level
    }

    /// Returns the optional seed for reproducibility.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the QMC shift policy.
    #[inline]
    pub fn shift_policy(&self) -> ShiftPolicy {
        self.shift_policy
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `replications` is 0 or greater than 1,000,000
    /// - `dimension` is 0
    /// - `precision` is 0 or greater than 63
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replications == 0 || self.replications > MAX_REPLICATIONS {
            return Err(ConfigError::InvalidReplicationCount(self.replications));
        }
        if self.dimension == 0 {
            return Err(ConfigError::InvalidDimension(self.dimension));
        }
        if self.precision == 0 || self.precision > MAX_PRECISION {
            return Err(ConfigError::InvalidPrecision(self.precision));
        }
        Ok(())
    }
}

/// Builder for [`IntegrationConfig`].
///
/// Provides a fluent API with validation at build time. Replications,
/// dimension and precision are required; the level defaults to 95%, the
/// shift policy to [`ShiftPolicy::Random`] and the seed to fresh entropy.
#[derive(Clone, Debug, Default)]
pub struct IntegrationConfigBuilder {
    replications: Option<usize>,
    dimension: Option<usize>,
    precision: Option<u32>,
    level: ConfidenceLevel,
    seed: Option<u64>,
    shift_policy: ShiftPolicy,
}

impl IntegrationConfigBuilder {
    /// Sets the number of replications.
    ///
    /// # Arguments
    ///
    /// * `replications` - Number of replications in [1, 1_000_000]
    #[inline]
    pub fn replications(mut self, replications: usize) -> Self {
        self.replications = Some(replications);
        self
    }

    /// Sets the dimension.
    #[inline]
    pub fn dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Sets the precision.
    ///
    /// # Arguments
    ///
    /// * `precision` - Points per replication as `2^precision`, in [1, 63]
    #[inline]
    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Sets the confidence level.
    #[inline]
    pub fn confidence_level(mut self, level: ConfidenceLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the QMC shift policy.
    #[inline]
    pub fn shift_policy(mut self, shift_policy: ShiftPolicy) -> Self {
        self.shift_policy = shift_policy;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required field is missing or any value
    /// is out of range.
    pub fn build(self) -> Result<IntegrationConfig, ConfigError> {
        let replications = self.replications.ok_or(ConfigError::InvalidParameter {
            name: "replications",
            value: "must be specified".to_string(),
        })?;

        let dimension = self.dimension.ok_or(ConfigError::InvalidParameter {
            name: "dimension",
            value: "must be specified".to_string(),
        })?;

        let precision = self.precision.ok_or(ConfigError::InvalidParameter {
            name: "precision",
            value: "must be specified".to_string(),
        })?;

        let config = IntegrationConfig {
            replications,
            dimension,
            precision,
            level: self.level,
            seed: self.seed,
            shift_policy: self.shift_policy,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> IntegrationConfigBuilder {
        IntegrationConfig::builder()
            .replications(10)
            .dimension(3)
            .precision(8)
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = builder().build().unwrap();

        assert_eq!(config.replications(), 10);
        assert_eq!(config.dimension(), 3);
        assert_eq!(config.precision(), 8);
        assert_eq!(config.points_per_replication(), 256);
        assert_eq!(config.confidence_level(), ConfidenceLevel::P95);
        assert_eq!(config.seed(), None);
        assert_eq!(config.shift_policy(), ShiftPolicy::Random);
    }

    #[test]
    fn test_config_builder_overrides() {
        let config = builder()
            .confidence_level(ConfidenceLevel::P9999)
            .seed(7)
            .shift_policy(ShiftPolicy::Unshifted)
            .build()
            .unwrap();

        assert_eq!(config.confidence_level(), ConfidenceLevel::P9999);
        assert_eq!(config.seed(), Some(7));
        assert_eq!(config.shift_policy(), ShiftPolicy::Unshifted);
    }

    #[test]
    fn test_config_invalid_replications() {
        let result = builder().replications(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidReplicationCount(0))
        ));

        let result = builder().replications(MAX_REPLICATIONS + 1).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidReplicationCount(_))
        ));

        assert!(builder().replications(1).build().is_ok());
        assert!(builder().replications(MAX_REPLICATIONS).build().is_ok());
    }

    #[test]
    fn test_config_invalid_dimension() {
        let result = builder().dimension(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidDimension(0))));
    }

    #[test]
    fn test_config_invalid_precision() {
        assert!(matches!(
            builder().precision(0).build(),
            Err(ConfigError::InvalidPrecision(0))
        ));
        assert!(matches!(
            builder().precision(64).build(),
            Err(ConfigError::InvalidPrecision(64))
        ));
        assert!(builder().precision(63).build().is_ok());
    }

    #[test]
    fn test_config_missing_fields() {
        let result = IntegrationConfig::builder().dimension(1).precision(1).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "replications",
                ..
            })
        ));

        let result = IntegrationConfig::builder()
            .replications(1)
            .dimension(1)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "precision",
                ..
            })
        ));
    }
}
