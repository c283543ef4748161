//! Replicated integration driver.
//!
//! This module provides the orchestration layer for estimating
//! `∫_{[0,1)^s} f(x) dx` by randomised quasi-Monte Carlo or plain Monte
//! Carlo.
//!
//! # Overview
//!
//! The [`IntegrationDriver`] runs `N` replications. Each replication
//! averages `f` over `2^m` points:
//! 1. QMC: the Gray-code stream of a digital net, re-initialised per
//!    replication under a fresh random digital shift
//! 2. MC: independent uniform points from the driver's seeded generator
//!
//! The replication means feed an [`OnlineStats`] accumulator whose
//! Student-t half-width at the configured level is reported as the
//! absolute error bound.
//!
//! # Cancellation
//!
//! The `*_with_cancel` variants poll a [`Cancellation`] token before each
//! replication and return the partial estimate once it fires.

use std::fmt;

use qmc_core::{ConfidenceLevel, DigitalNet, NetError, NetWord, OnlineStats, PointSequence};
use tracing::{debug, info, warn};

use crate::cancel::{Cancellation, NeverCancel};
use crate::config::{IntegrationConfig, ShiftPolicy};
use crate::error::{ConfigError, IntegrationError};
use crate::rng::{UniformPoints, UniformRng};

/// Point source of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntegrationMode {
    /// Randomised quasi-Monte Carlo over a digital net.
    Qmc,
    /// Pseudo-random Monte Carlo.
    Mc,
}

impl fmt::Display for IntegrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationMode::Qmc => write!(f, "QMC"),
            IntegrationMode::Mc => write!(f, "MC"),
        }
    }
}

/// Estimate of an integral with its error bound.
///
/// # Examples
///
/// ```rust
/// use qmc_core::ConfidenceLevel;
/// use qmc_integration::IntegrationResult;
///
/// let result = IntegrationResult {
///     mean: 0.25,
///     abs_error: 0.0025,
///     replications: 16,
///     points_per_replication: 1024,
///     level: ConfidenceLevel::P99,
///     cancelled: false,
/// };
///
/// assert!((result.relative_error() - 0.01).abs() < 1e-15);
/// println!("I = {} +/- {} ({})", result.mean, result.abs_error, result.level);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntegrationResult {
    /// Mean of the replication means.
    ///
    /// NaN when cancellation fired before the first replication; check
    /// [`replications`](Self::replications) before use.
    pub mean: f64,
    /// Student-t half-width at `level` over the replication means.
    ///
    /// Infinite when fewer than two replications completed.
    pub abs_error: f64,
    /// Replications actually completed.
    pub replications: usize,
    /// Integrand evaluations per replication, `2^m`.
    pub points_per_replication: u64,
    /// Confidence level of `abs_error`.
    pub level: ConfidenceLevel,
    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
}

impl IntegrationResult {
    /// Error bound relative to the magnitude of the mean.
    #[inline]
    pub fn relative_error(&self) -> f64 {
        self.abs_error / self.mean.abs()
    }

    /// Total number of integrand evaluations.
    #[inline]
    pub fn evaluations(&self) -> u64 {
        self.replications as u64 * self.points_per_replication
    }
}

/// Replicated QMC / MC integration engine.
///
/// Owns the run configuration and the seeded generator used both for MC
/// points and for QMC digital shifts. The generator persists across runs;
/// [`reset`](Self::reset) rewinds it to the recorded seed.
///
/// # Examples
///
/// ```rust
/// use qmc_core::{build_sobol_matrix, DigitalNet, SobolSeed};
/// use qmc_integration::{IntegrationConfig, IntegrationDriver};
///
/// let seeds = vec![SobolSeed::new(1, 0, vec![1])];
/// let mut net = DigitalNet::new(build_sobol_matrix(&seeds, 2, 12).unwrap());
///
/// let config = IntegrationConfig::builder()
///     .replications(8)
///     .dimension(2)
///     .precision(12)
///     .seed(42)
///     .build()
///     .unwrap();
/// let mut driver = IntegrationDriver::new(config).unwrap();
///
/// // ∫∫ x y dx dy = 1/4
/// let result = driver.integrate_qmc(&mut net, |x| x[0] * x[1]).unwrap();
/// assert!((result.mean - 0.25).abs() < 5e-3);
/// assert!(result.abs_error < 5e-3);
/// ```
#[derive(Debug)]
pub struct IntegrationDriver {
    config: IntegrationConfig,
    rng: UniformRng,
}

impl IntegrationDriver {
    /// Creates a new driver with the given configuration.
    ///
    /// Uses the configured seed, or a seed drawn from OS entropy when none
    /// is set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn new(config: IntegrationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed() {
            Some(seed) => UniformRng::from_seed(seed),
            None => UniformRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    /// Creates a new driver with a specific seed, overriding the config seed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn with_seed(config: IntegrationConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: UniformRng::from_seed(seed),
        })
    }

    /// Returns a reference to the configuration.
    #[inline]
    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// Seed of the driver's generator.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Rewinds the generator to its seed, so the next run repeats the first.
    pub fn reset(&mut self) {
        self.rng = UniformRng::from_seed(self.rng.seed());
    }

    /// Estimates `∫ f` over `[0,1)^s` by randomised QMC on `net`.
    ///
    /// Each replication evaluates the first `2^m` points of the net, with
    /// `m` the configured precision, under a fresh random digital shift
    /// (or unshifted under [`ShiftPolicy::Unshifted`]). The net is left
    /// initialised with the last shift used.
    ///
    /// # Errors
    ///
    /// - `IntegrationError::DimensionMismatch` if the net dimension differs
    ///   from the configured one
    /// - `IntegrationError::PrecisionTooHigh` if the net has fewer than `m`
    ///   bit rows
    ///
    /// Both are detected before `f` is called.
    pub fn integrate_qmc<U, F>(
        &mut self,
        net: &mut DigitalNet<U>,
        f: F,
    ) -> Result<IntegrationResult, IntegrationError>
    where
        U: NetWord,
        F: FnMut(&[f64]) -> f64,
    {
        self.integrate_qmc_with_cancel(net, f, &NeverCancel)
    }

    /// As [`integrate_qmc`](Self::integrate_qmc), polling `cancel` before
    /// each replication.
    ///
    /// A cancelled run still returns `Ok` with `cancelled` set. If no
    /// replication completed, `replications` is 0 and `mean` is NaN, so check
    /// either before reading `mean`.
    ///
    /// # Errors
    ///
    /// As [`integrate_qmc`](Self::integrate_qmc).
    pub fn integrate_qmc_with_cancel<U, F, C>(
        &mut self,
        net: &mut DigitalNet<U>,
        f: F,
        cancel: &C,
    ) -> Result<IntegrationResult, IntegrationError>
    where
        U: NetWord,
        F: FnMut(&[f64]) -> f64,
        C: Cancellation + ?Sized,
    {
        if net.dimension() != self.config.dimension() {
            return Err(IntegrationError::DimensionMismatch {
                expected: self.config.dimension(),
                actual: net.dimension(),
            });
        }
        if self.config.precision() > net.precision() {
            return Err(IntegrationError::PrecisionTooHigh {
                requested: self.config.precision(),
                available: net.precision(),
            });
        }

        let policy = self.config.shift_policy();
        let rng = &mut self.rng;
        let start = |net: &mut DigitalNet<U>| -> Result<(), NetError> {
            match policy {
                ShiftPolicy::Random => net.set_random_shift(&mut *rng),
                ShiftPolicy::Unshifted => net.clear_shift(),
            }
            net.initialise();
            Ok(())
        };
        run_replications(IntegrationMode::Qmc, &self.config, net, start, f, cancel)
    }

    /// Estimates `∫ f` over `[0,1)^s` by plain Monte Carlo.
    ///
    /// Each replication averages `f` over `2^m` independent uniform points
    /// drawn from the driver's generator.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::Stats` only if the accumulator rejects the
    /// replication means, which does not happen for a valid configuration.
    pub fn integrate_mc<F>(&mut self, f: F) -> Result<IntegrationResult, IntegrationError>
    where
        F: FnMut(&[f64]) -> f64,
    {
        self.integrate_mc_with_cancel(f, &NeverCancel)
    }

    /// As [`integrate_mc`](Self::integrate_mc), polling `cancel` before each
    /// replication.
    ///
    /// Cancellation is reported as for
    /// [`integrate_qmc_with_cancel`](Self::integrate_qmc_with_cancel):
    /// `mean` is NaN when `replications` is 0.
    ///
    /// # Errors
    ///
    /// As [`integrate_mc`](Self::integrate_mc).
    pub fn integrate_mc_with_cancel<F, C>(
        &mut self,
        f: F,
        cancel: &C,
    ) -> Result<IntegrationResult, IntegrationError>
    where
        F: FnMut(&[f64]) -> f64,
        C: Cancellation + ?Sized,
    {
        let mut points = UniformPoints::new(&mut self.rng, self.config.dimension());
        run_replications(
            IntegrationMode::Mc,
            &self.config,
            &mut points,
            |_| Ok(()),
            f,
            cancel,
        )
    }
}

/// Replication loop shared by both modes.
///
/// `start` prepares the sequence at the beginning of every replication.
fn run_replications<S, B, F, C>(
    mode: IntegrationMode,
    config: &IntegrationConfig,
    points: &mut S,
    mut start: B,
    mut f: F,
    cancel: &C,
) -> Result<IntegrationResult, IntegrationError>
where
    S: PointSequence + ?Sized,
    B: FnMut(&mut S) -> Result<(), NetError>,
    F: FnMut(&[f64]) -> f64,
    C: Cancellation + ?Sized,
{
    let replications = config.replications();
    let points_per_replication = config.points_per_replication();
    let level = config.confidence_level();

    info!(
        %mode,
        replications,
        dimension = config.dimension(),
        precision = config.precision(),
        %level,
        "Starting integration"
    );

    let mut point = vec![0.0; config.dimension()];
    let mut outer = OnlineStats::new();
    let mut cancelled = false;

    for replication in 0..replications {
        if cancel.is_cancelled() {
            warn!(
                %mode,
                completed = replication,
                requested = replications,
                "Integration cancelled"
            );
            cancelled = true;
            break;
        }

        start(&mut *points)?;
        let mut inner = OnlineStats::new();
        for _ in 0..points_per_replication {
            points.fill_next(&mut point)?;
            inner.add_sample(f(point.as_slice()));
        }
        let replication_mean = inner.mean()?;
        debug!(%mode, replication, mean = replication_mean, "Replication finished");
        outer.add_sample(replication_mean);
    }

    let completed = outer.count() as usize;
    let mean = if completed == 0 { f64::NAN } else { outer.mean()? };
    let abs_error = if completed < 2 {
        f64::INFINITY
    } else {
        outer.confidence_half_width(level)?
    };

    info!(%mode, mean, abs_error, replications = completed, cancelled, "Integration finished");

    Ok(IntegrationResult {
        mean,
        abs_error,
        replications: completed,
        points_per_replication,
        level,
        cancelled,
    })
}
