//! # qmc_store: Digital-Net Matrix Storage
//!
//! ## Adapter Layer Role
//!
//! qmc_store turns stored digital nets into canonical
//! [`GeneratingMatrix`](qmc_core::GeneratingMatrix) values:
//! - Binary matrix files with a sorted header block (`binary`, `file`)
//! - SQLite databases with width fallback (`relational`)
//! - Caller-supplied in-memory tables (`memory`)
//! - Whitespace-separated text streams (`text`)
//! - Joe–Kuo Sobol seed files (`joe_kuo`)
//!
//! [`DataStore`] selects one backend at construction and applies the width
//! adaptation and Sobol derivation uniformly.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use qmc_core::{DigitalNet, NetFamily};
//! use qmc_store::{BackendKind, DataStore, StoreConfig};
//!
//! let config = StoreConfig::new()
//!     .with_data_root("/var/lib/digitalnet")
//!     .with_backend(BackendKind::Relational);
//! let store = DataStore::from_config(&config)?;
//!
//! let matrix = store.load::<u64>(NetFamily::NxLowWafom, 8, 16)?;
//! let mut net = DigitalNet::new(matrix);
//! net.initialise();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod binary;
pub mod config;
pub mod error;
pub mod file;
pub mod joe_kuo;
pub mod memory;
pub mod record;
pub mod relational;
pub mod source;
pub mod store;
pub mod text;

pub use config::{BackendKind, StoreConfig};
pub use error::{Backend, ConfigError, ParseError, StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryTable;
pub use record::NetRecord;
pub use relational::RelationalStore;
pub use source::NetSource;
pub use store::DataStore;
