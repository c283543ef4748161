//! In-memory matrix table for embedding callers.
//!
//! An embedding host that already holds its matrices (for example as a
//! data frame) fills a [`MemoryTable`] and wraps it in
//! [`DataStore::Memory`](crate::DataStore::Memory). Lookups follow the
//! relational rules: exact dimension, smallest stored precision `>= m`,
//! requested bit width first.

use std::io::{BufRead, Read};

use qmc_core::{GeneratingMatrix, NetFamily, SobolSeed};

use crate::error::{Backend, ParseError, Request, StoreResult};
use crate::joe_kuo::read_seed_table;
use crate::record::NetRecord;
use crate::source::NetSource;
use crate::text::read_text;

/// Caller-supplied matrices and Sobol seeds.
///
/// # Examples
///
/// ```rust
/// use qmc_core::{GeneratingMatrix, NetFamily};
/// use qmc_store::{DataStore, MemoryTable};
///
/// let mut table = MemoryTable::new();
/// table.insert_matrix(NetFamily::NiederreiterXing, &GeneratingMatrix::van_der_corput(12).unwrap());
///
/// let store = DataStore::Memory(table);
/// let matrix = store.load::<u32>(NetFamily::NiederreiterXing, 1, 10).unwrap();
/// assert_eq!(matrix.precision(), 10);
/// assert_eq!(matrix.row(0, 0), 1 << 31);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    records: Vec<(NetFamily, NetRecord)>,
    seeds: Vec<SobolSeed>,
}

impl MemoryTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record after checking its bit size and word count.
    ///
    /// # Errors
    ///
    /// Returns the `ParseError` from [`NetRecord::validate`].
    pub fn insert(&mut self, family: NetFamily, record: NetRecord) -> Result<(), ParseError> {
        record.validate()?;
        self.records.push((family, record));
        Ok(())
    }

    /// Adds a 64-bit matrix.
    pub fn insert_matrix(&mut self, family: NetFamily, matrix: &GeneratingMatrix<u64>) {
        self.records.push((family, NetRecord::from_matrix(matrix)));
    }

    /// Adds one record read from the text format.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the stream is malformed.
    pub fn insert_text<R: Read>(&mut self, family: NetFamily, reader: R) -> Result<(), ParseError> {
        let record = read_text(reader)?;
        self.insert(family, record)
    }

    /// Replaces the Sobol seed table.
    pub fn set_sobol_seeds(&mut self, seeds: Vec<SobolSeed>) {
        self.seeds = seeds;
    }

    /// Replaces the Sobol seed table with the rows of a Joe–Kuo file.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the file is malformed.
    pub fn load_seed_table<R: BufRead>(&mut self, reader: R) -> Result<(), ParseError> {
        self.seeds = read_seed_table(reader, None)?;
        Ok(())
    }

    /// Number of stored matrix records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no matrix records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn family_records(&self, family: NetFamily) -> impl Iterator<Item = &NetRecord> {
        self.records
            .iter()
            .filter(move |(f, _)| *f == family)
            .map(|(_, r)| r)
    }
}

impl NetSource for MemoryTable {
    fn backend(&self) -> Backend {
        Backend::Memory
    }

    fn find_record(
        &self,
        family: NetFamily,
        s: usize,
        m: u32,
        bit_size: u32,
    ) -> StoreResult<NetRecord> {
        let request = Request::new(family, s, m, Backend::Memory);
        for bits in [bit_size, other_width(bit_size)] {
            let best = self
                .family_records(family)
                .filter(|r| r.bit_size == bits && r.dimension == s && r.precision >= m)
                .min_by_key(|r| r.precision);
            if let Some(record) = best {
                return Ok(record.clone());
            }
        }
        Err(request.not_found())
    }

    fn sobol_seeds(&self, count: usize) -> StoreResult<Vec<SobolSeed>> {
        Ok(self.seeds.iter().take(count).cloned().collect())
    }

    fn sobol_seed_count(&self) -> StoreResult<usize> {
        Ok(self.seeds.len())
    }

    fn dimension_range(&self, family: NetFamily) -> StoreResult<(usize, usize)> {
        let dims = self.family_records(family).map(|r| r.dimension);
        min_max(dims).ok_or_else(|| Request::new(family, 0, 0, Backend::Memory).not_found())
    }

    fn precision_range(&self, family: NetFamily, s: usize) -> StoreResult<(u32, u32)> {
        let precisions = self
            .family_records(family)
            .filter(|r| r.dimension == s)
            .map(|r| r.precision);
        min_max(precisions).ok_or_else(|| Request::new(family, s, 0, Backend::Memory).not_found())
    }
}

/// The bit width tried when the requested one has no entry.
pub(crate) fn other_width(bit_size: u32) -> u32 {
    if bit_size == 32 {
        64
    } else {
        32
    }
}

pub(crate) fn min_max<T: Ord + Copy>(values: impl Iterator<Item = T>) -> Option<(T, T)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn record(bit_size: u32, s: usize, m: u32, fill: u64) -> NetRecord {
        NetRecord {
            bit_size,
            dimension: s,
            precision: m,
            words: vec![fill; s * m as usize],
            wafom: None,
            tvalue: None,
        }
    }

    fn table() -> MemoryTable {
        let mut table = MemoryTable::new();
        table.insert(NetFamily::NiederreiterXing, record(64, 2, 10, 1)).unwrap();
        table.insert(NetFamily::NiederreiterXing, record(64, 2, 12, 2)).unwrap();
        table.insert(NetFamily::NiederreiterXing, record(32, 2, 10, 3)).unwrap();
        table.insert(NetFamily::NiederreiterXing, record(64, 3, 8, 4)).unwrap();
        table.insert(NetFamily::OldSobol, record(32, 5, 20, 5)).unwrap();
        table
    }

    #[test]
    fn test_insert_text_overflowing_header() {
        let mut table = MemoryTable::new();
        let result = table.insert_text(
            NetFamily::NxLowWafom,
            "32 9223372036854775807 3".as_bytes(),
        );
        assert!(matches!(result, Err(ParseError::ShapeOverflow { .. })));
        assert!(table.is_empty());
    }

    #[test]
    fn test_smallest_precision_at_least_m() {
        let t = table();
        let found = t.find_record(NetFamily::NiederreiterXing, 2, 11, 64).unwrap();
        assert_eq!(found.words[0], 2);
        let found = t.find_record(NetFamily::NiederreiterXing, 2, 4, 64).unwrap();
        assert_eq!(found.words[0], 1);
    }

    #[test]
    fn test_requested_width_preferred() {
        let found = table()
            .find_record(NetFamily::NiederreiterXing, 2, 10, 32)
            .unwrap();
        assert_eq!(found.bit_size, 32);
        assert_eq!(found.words[0], 3);
    }

    #[test]
    fn test_other_width_fallback() {
        let found = table().find_record(NetFamily::OldSobol, 5, 16, 64).unwrap();
        assert_eq!(found.bit_size, 32);
    }

    #[test]
    fn test_not_found() {
        let err = table()
            .find_record(NetFamily::NiederreiterXing, 2, 13, 64)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                s: 2,
                m: 13,
                backend: Backend::Memory,
                ..
            }
        ));
    }

    #[test]
    fn test_ranges() {
        let t = table();
        assert_eq!(t.dimension_range(NetFamily::NiederreiterXing).unwrap(), (2, 3));
        assert_eq!(
            t.precision_range(NetFamily::NiederreiterXing, 2).unwrap(),
            (10, 12)
        );
        assert!(t.dimension_range(NetFamily::SobolLowWafom).is_err());
        assert!(t.precision_range(NetFamily::NiederreiterXing, 7).is_err());
    }

    #[test]
    fn test_insert_rejects_short_record() {
        let mut t = MemoryTable::new();
        let mut bad = record(64, 2, 2, 0);
        bad.words.truncate(3);
        assert!(t.insert(NetFamily::NxLowWafom, bad).is_err());
        assert!(t.is_empty());
    }

    #[test]
    fn test_insert_text_and_seeds() {
        let mut t = MemoryTable::new();
        t.insert_text(NetFamily::SobolLowWafom, "32 1 2 2147483648 1073741824 -2.0 1".as_bytes())
            .unwrap();
        t.load_seed_table("d s a m_i\n2 1 0 1\n3 2 1 1 3\n".as_bytes())
            .unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.sobol_seed_count().unwrap(), 2);
        assert_eq!(t.sobol_seeds(1).unwrap().len(), 1);
    }
}
