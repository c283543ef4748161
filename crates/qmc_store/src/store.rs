//! Backend-independent matrix store.

use qmc_core::{
    build_sobol_matrix_as, max_precision, GeneratingMatrix, MatrixError, NetFamily, NetWord,
    SobolSeed, MAX_PRECISION,
};
use tracing::{debug, info, warn};

use crate::config::{BackendKind, StoreConfig};
use crate::error::{Backend, ConfigError, Request, StoreResult};
use crate::file::FileStore;
use crate::memory::MemoryTable;
use crate::relational::RelationalStore;
use crate::source::NetSource;

/// Matrix store over one of the interchangeable backends.
///
/// The backend is chosen once at construction. [`load`](Self::load) returns
/// the canonical [`GeneratingMatrix`] in the requested word width whatever
/// the backend stores; the Sobol family is derived from the backend's seed
/// table.
///
/// # Examples
///
/// ```rust
/// use qmc_core::{NetFamily, SobolSeed};
/// use qmc_store::{DataStore, MemoryTable};
///
/// let mut table = MemoryTable::new();
/// table.set_sobol_seeds(vec![SobolSeed::new(1, 0, vec![1]), SobolSeed::new(2, 1, vec![1, 3])]);
/// let store = DataStore::Memory(table);
///
/// let matrix = store.load::<u64>(NetFamily::Sobol, 3, 16).unwrap();
/// assert_eq!(matrix.dimension(), 3);
/// assert_eq!(store.s_max(NetFamily::Sobol).unwrap(), 3);
/// assert_eq!(store.m_max(NetFamily::Sobol, 3).unwrap(), 63);
/// ```
#[derive(Debug)]
pub enum DataStore {
    /// Binary files under a data root.
    File(FileStore),
    /// SQLite database.
    Relational(RelationalStore),
    /// Caller-supplied table.
    Memory(MemoryTable),
}

impl DataStore {
    /// Opens the backend named by `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid or the
    /// relational runtime cannot start.
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = match config.backend {
            BackendKind::File => DataStore::File(FileStore::new(&config.data_root)),
            BackendKind::Relational => {
                DataStore::Relational(RelationalStore::open(config.database_path())?)
            }
        };
        info!(
            backend = %store.backend(),
            data_root = %config.data_root.display(),
            "Opened digital-net store"
        );
        Ok(store)
    }

    fn source(&self) -> &dyn NetSource {
        match self {
            DataStore::File(store) => store,
            DataStore::Relational(store) => store,
            DataStore::Memory(table) => table,
        }
    }

    /// Backend identifier.
    pub fn backend(&self) -> Backend {
        self.source().backend()
    }

    /// Loads the `s`-dimensional, precision-`m` matrix of `family` in word
    /// width `U`.
    ///
    /// A stored matrix of higher precision serves a lower-precision request
    /// where the backend allows it; source words of the other width are
    /// adapted.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` when no entry matches
    /// - `StoreError::FormatError` for malformed stored data
    /// - `StoreError::StorageError` on I/O or database failure
    /// - `StoreError::Build` for an invalid shape or a Sobol seed table that
    ///   cannot produce the matrix
    pub fn load<U: NetWord>(
        &self,
        family: NetFamily,
        s: usize,
        m: u32,
    ) -> StoreResult<GeneratingMatrix<U>> {
        let backend = self.backend();
        let request = Request::new(family, s, m, backend);
        if s == 0 {
            return Err(request.build(MatrixError::InvalidDimension(s)));
        }
        let max = max_precision::<U>();
        if m == 0 || m > max {
            return Err(request.build(MatrixError::InvalidPrecision { precision: m, max }));
        }

        let matrix = if family.is_seeded() {
            let seeds = self.source().sobol_seeds(s - 1)?;
            debug!(family = %family, s, m, seeds = seeds.len(), "deriving Sobol matrix");
            build_sobol_matrix_as::<U>(&seeds, s, m).map_err(|e| request.build(e))?
        } else {
            let record = self.source().find_record(family, s, m, U::BITS)?;
            if record.bit_size != U::BITS {
                warn!(
                    family = %family,
                    s,
                    m,
                    requested = U::BITS,
                    found = record.bit_size,
                    %backend,
                    "No net of the requested width; adapting the other width"
                );
            } else if record.precision > m {
                debug!(family = %family, s, m, stored = record.precision, "using leading rows");
            }
            record.validate().map_err(|e| request.format(e))?;
            record.to_matrix::<U>(m).map_err(|e| request.build(e))?
        };

        info!(family = %family, s, m, width = U::BITS, %backend, "Loaded generating matrix");
        Ok(matrix)
    }

    /// First `count` rows of the Sobol seed table.
    ///
    /// # Errors
    ///
    /// As [`load`](Self::load) for the Sobol family.
    pub fn sobol_seeds(&self, count: usize) -> StoreResult<Vec<SobolSeed>> {
        self.source().sobol_seeds(count)
    }

    /// Smallest available dimension of `family`.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if the family has no entries.
    pub fn s_min(&self, family: NetFamily) -> StoreResult<usize> {
        Ok(self.dimension_range(family)?.0)
    }

    /// Largest available dimension of `family`. For Sobol this is the seed
    /// count plus one.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if the family has no entries.
    pub fn s_max(&self, family: NetFamily) -> StoreResult<usize> {
        Ok(self.dimension_range(family)?.1)
    }

    /// Smallest available precision of `family` at dimension `s`.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if no entry has dimension `s`.
    pub fn m_min(&self, family: NetFamily, s: usize) -> StoreResult<u32> {
        Ok(self.precision_range(family, s)?.0)
    }

    /// Largest available precision of `family` at dimension `s`.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if no entry has dimension `s`.
    pub fn m_max(&self, family: NetFamily, s: usize) -> StoreResult<u32> {
        Ok(self.precision_range(family, s)?.1)
    }

    fn dimension_range(&self, family: NetFamily) -> StoreResult<(usize, usize)> {
        if family.is_seeded() {
            let seeds = self.source().sobol_seed_count()?;
            return Ok((1, seeds + 1));
        }
        self.source().dimension_range(family)
    }

    fn precision_range(&self, family: NetFamily, s: usize) -> StoreResult<(u32, u32)> {
        if family.is_seeded() {
            let (lo, hi) = self.dimension_range(family)?;
            if s < lo || s > hi {
                return Err(Request::new(family, s, 0, self.backend()).not_found());
            }
            return Ok((1, MAX_PRECISION));
        }
        self.source().precision_range(family, s)
    }
}

impl From<MemoryTable> for DataStore {
    fn from(table: MemoryTable) -> Self {
        DataStore::Memory(table)
    }
}
