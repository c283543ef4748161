//! # qmc_integration: Replicated QMC / MC Integration
//!
//! ## Integration Layer Role
//!
//! qmc_integration estimates integrals over the unit hypercube from the
//! point streams of `qmc_core`:
//! - Randomised quasi-Monte Carlo over a [`DigitalNet`](qmc_core::DigitalNet)
//!   with a fresh random digital shift per replication
//! - Plain Monte Carlo over a seeded pseudo-random source (`rng`)
//! - Student-t error bounds over the replication means
//! - Cooperative cancellation between replications (`cancel`)
//!
//! ## Usage Example
//!
//! ```rust
//! use qmc_core::{build_sobol_matrix, ConfidenceLevel, DigitalNet, SobolSeed};
//! use qmc_integration::{IntegrationConfig, IntegrationDriver};
//!
//! let seeds = vec![SobolSeed::new(1, 0, vec![1]), SobolSeed::new(2, 1, vec![1, 3])];
//! let mut net = DigitalNet::new(build_sobol_matrix(&seeds, 3, 10)?);
//!
//! let config = IntegrationConfig::builder()
//!     .replications(16)
//!     .dimension(3)
//!     .precision(10)
//!     .confidence_level(ConfidenceLevel::P99)
//!     .seed(7)
//!     .build()?;
//! let mut driver = IntegrationDriver::new(config)?;
//!
//! // ∫ (x0 + x1 + x2) = 3/2
//! let qmc = driver.integrate_qmc(&mut net, |x| x.iter().sum())?;
//! let mc = driver.integrate_mc(|x| x.iter().sum())?;
//! assert!((qmc.mean - 1.5).abs() < 1e-2);
//! assert!(qmc.abs_error < mc.abs_error);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod cancel;
pub mod config;
pub mod driver;
pub mod error;
pub mod rng;

pub use cancel::{Cancellation, NeverCancel};
pub use config::{IntegrationConfig, IntegrationConfigBuilder, ShiftPolicy, MAX_REPLICATIONS};
pub use driver::{IntegrationDriver, IntegrationMode, IntegrationResult};
pub use error::{ConfigError, IntegrationError};
