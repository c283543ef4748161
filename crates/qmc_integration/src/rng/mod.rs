//! # Pseudo-Random Point Source
//!
//! This module provides the pseudo-random counterpart of the digital-net
//! point stream, used for plain Monte Carlo runs and for drawing the random
//! digital shifts of QMC replications.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: every generator records its seed, so a run can be
//!   repeated exactly
//! - **Shared loop**: [`UniformPoints`] implements
//!   [`PointSequence`](qmc_core::PointSequence), so MC and QMC runs go
//!   through the same replication loop with static dispatch
//! - **rand interop**: [`UniformRng`] implements `RngCore`, so it can be
//!   handed to [`DigitalNet::set_random_shift`](qmc_core::DigitalNet::set_random_shift)
//!
//! ## Module Structure
//!
//! - [`prng`]: seeded generator and the uniform point stream
//!
//! ## Usage Example
//!
//! ```rust
//! use qmc_core::PointSequence;
//! use qmc_integration::rng::{UniformPoints, UniformRng};
//!
//! let mut rng = UniformRng::from_seed(12345);
//! let mut points = UniformPoints::new(&mut rng, 3);
//!
//! let mut point = [0.0; 3];
//! points.fill_next(&mut point).unwrap();
//! assert!(point.iter().all(|&x| (0.0..1.0).contains(&x)));
//! ```

pub mod prng;

pub use prng::{UniformPoints, UniformRng};
