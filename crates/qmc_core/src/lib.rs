//! # qmc_core: Digital-Net Kernel for Quasi-Monte Carlo Integration
//!
//! ## Kernel Layer Role
//!
//! qmc_core is the bottom layer of the workspace and performs no I/O:
//! - Word-width abstraction shared by 32- and 64-bit nets (`bits`)
//! - Canonical generating-matrix representation (`matrix`)
//! - Named net families (`family`)
//! - Sobol direction-number recurrence (`sobol`)
//! - Gray-code digital-net point stream (`net`, `sequence`)
//! - Constant-memory statistics and Student-t bounds (`stats`)
//!
//! Loading matrices from files or databases lives in `qmc_store`; the
//! replication loop lives in `qmc_integration`.
//!
//! ## Usage Example
//!
//! ```rust
//! use qmc_core::{build_sobol_matrix, DigitalNet, OnlineStats, SobolSeed};
//!
//! let seeds = vec![SobolSeed::new(1, 0, vec![1]), SobolSeed::new(2, 1, vec![1, 3])];
//! let matrix = build_sobol_matrix(&seeds, 3, 10).unwrap();
//!
//! let mut net = DigitalNet::new(matrix);
//! net.initialise();
//!
//! let mut stats = OnlineStats::new();
//! for _ in 0..net.cycle_length() {
//!     let x = net.get_point(0) * net.get_point(1) * net.get_point(2);
//!     stats.add_sample(x);
//!     net.next_point().unwrap();
//! }
//! assert!((stats.mean().unwrap() - 0.125).abs() < 1e-2);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `GeneratingMatrix`, `SobolSeed` and `NetFamily`

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod bits;
pub mod error;
pub mod family;
pub mod matrix;
pub mod net;
pub mod sequence;
pub mod sobol;
pub mod stats;

pub use bits::NetWord;
pub use error::{MatrixError, NetError, SobolError, StatsError};
pub use family::{NetFamily, UnknownFamily};
pub use matrix::{max_precision, GeneratingMatrix, MAX_PRECISION};
pub use net::{DigitalNet, DigitalShift, NetState};
pub use sequence::PointSequence;
pub use sobol::{build_sobol_matrix, build_sobol_matrix_as, SobolSeed};
pub use stats::{ConfidenceLevel, OnlineStats};
