//! Constant-memory streaming statistics.
//!
//! [`OnlineStats`] keeps only the sample count, the running mean and the
//! running sum of squared deviations (Welford's update), so an estimator
//! over `N * 2^m` integrand evaluations needs no sample buffer.
//!
//! Statistics that are undefined for the current count return
//! `StatsError::InsufficientSamples` instead of a meaningless number.

pub mod student_t;

pub use student_t::ConfidenceLevel;

use crate::error::StatsError;

/// Streaming mean / variance accumulator.
///
/// # Examples
///
/// ```rust
/// use qmc_core::{ConfidenceLevel, OnlineStats};
///
/// let mut stats = OnlineStats::new();
/// for x in [1.0, 2.0, 3.0, 4.0] {
///     stats.add_sample(x);
/// }
///
/// assert_eq!(stats.mean().unwrap(), 2.5);
/// assert!((stats.unbiased_variance().unwrap() - 5.0 / 3.0).abs() < 1e-12);
/// let half_width = stats.confidence_half_width(ConfidenceLevel::P95).unwrap();
/// assert!(half_width > 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OnlineStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl OnlineStats {
    /// Creates an empty accumulator.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one observation.
    #[inline]
    pub fn add_sample(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Number of observations `n`.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Degrees of freedom `n - 1`.
    #[inline]
    pub fn degrees_of_freedom(&self) -> i64 {
        self.count as i64 - 1
    }

    /// Running mean.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InsufficientSamples` when empty.
    #[inline]
    pub fn mean(&self) -> Result<f64, StatsError> {
        self.require(1)?;
        Ok(self.mean)
    }

    /// Unbiased sample variance `M2 / (n - 1)`.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InsufficientSamples` when `n <= 1`.
    pub fn unbiased_variance(&self) -> Result<f64, StatsError> {
        self.require(2)?;
        Ok(self.m2 / (self.count - 1) as f64)
    }

    /// Population variance `M2 / n`; zero for a single observation.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InsufficientSamples` when empty.
    pub fn population_variance(&self) -> Result<f64, StatsError> {
        self.require(1)?;
        Ok(self.m2 / self.count as f64)
    }

    /// Variance of the sample mean, `unbiased_variance / n`.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InsufficientSamples` when `n <= 1`.
    pub fn variance_of_mean(&self) -> Result<f64, StatsError> {
        Ok(self.unbiased_variance()? / self.count as f64)
    }

    /// Standard error of the mean, `sqrt(variance_of_mean)`.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InsufficientSamples` when `n <= 1`.
    pub fn standard_error(&self) -> Result<f64, StatsError> {
        Ok(self.variance_of_mean()?.sqrt())
    }

    /// Half-width of the two-sided Student-t confidence interval,
    /// `t(level, n - 1) * sqrt(variance_of_mean)`.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InsufficientSamples` when `n <= 1`.
    pub fn confidence_half_width(&self, level: ConfidenceLevel) -> Result<f64, StatsError> {
        let standard_error = self.standard_error()?;
        Ok(level.critical_value(self.degrees_of_freedom())? * standard_error)
    }

    /// Half-width relative to the magnitude of the mean.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InsufficientSamples` when `n <= 1`.
    pub fn relative_half_width(&self, level: ConfidenceLevel) -> Result<f64, StatsError> {
        Ok(self.confidence_half_width(level)? / self.mean.abs())
    }

    #[inline]
    fn require(&self, required: u64) -> Result<(), StatsError> {
        if self.count < required {
            return Err(StatsError::InsufficientSamples {
                required,
                actual: self.count,
            });
        }
        Ok(())
    }
}

impl Extend<f64> for OnlineStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.add_sample(x);
        }
    }
}

impl FromIterator<f64> for OnlineStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        stats.extend(iter);
        stats
    }
}
