//! Backend trait behind [`DataStore`](crate::DataStore).

use qmc_core::{NetFamily, SobolSeed};

use crate::error::{Backend, StoreResult};
use crate::record::NetRecord;

/// Raw access to one storage backend.
///
/// Implementations return source data untouched; width adaptation, Sobol
/// derivation and logging happen once in [`DataStore`](crate::DataStore).
pub trait NetSource {
    /// Backend identifier used in errors and log fields.
    fn backend(&self) -> Backend;

    /// Record for `family` with dimension `s` and precision at least `m`.
    ///
    /// Backends that store several widths try `bit_size` first and fall
    /// back to the other width.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` when no record qualifies.
    fn find_record(
        &self,
        family: NetFamily,
        s: usize,
        m: u32,
        bit_size: u32,
    ) -> StoreResult<NetRecord>;

    /// First `count` rows of the Sobol seed table (fewer if the table is
    /// shorter).
    fn sobol_seeds(&self, count: usize) -> StoreResult<Vec<SobolSeed>>;

    /// Number of rows in the Sobol seed table.
    fn sobol_seed_count(&self) -> StoreResult<usize>;

    /// Smallest and largest stored dimension of a family.
    fn dimension_range(&self, family: NetFamily) -> StoreResult<(usize, usize)>;

    /// Smallest and largest stored precision of a family at dimension `s`.
    fn precision_range(&self, family: NetFamily, s: usize) -> StoreResult<(u32, u32)>;
}
