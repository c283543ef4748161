//! Binary file backend.
//!
//! One `<data_root>/<abbreviation>.dat` file per family in the
//! [`binary`](crate::binary) layout, plus `<data_root>/sobolbase.dat` holding
//! the Sobol seed table in Joe–Kuo text form. Files are opened per request.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use qmc_core::{NetFamily, SobolSeed};
use tracing::debug;

use crate::binary::{read_binary, read_headers, Header};
use crate::error::{Backend, Request, StoreResult};
use crate::joe_kuo::{count_seed_rows, read_seed_table};
use crate::memory::min_max;
use crate::record::NetRecord;
use crate::source::NetSource;

/// `<root>/<abbreviation>.dat`.
pub(crate) fn family_file(root: &Path, family: NetFamily) -> PathBuf {
    root.join(format!("{}.dat", family.abbreviation()))
}

/// Directory of binary matrix files.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `root`. No file is touched until a lookup.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding a family's data.
    pub fn path(&self, family: NetFamily) -> PathBuf {
        family_file(&self.root, family)
    }

    fn open(&self, request: Request) -> StoreResult<BufReader<File>> {
        let path = self.path(request.family);
        debug!(path = %path.display(), family = %request.family, "opening matrix file");
        File::open(&path)
            .map(BufReader::new)
            .map_err(|e| request.storage(e))
    }

    fn headers(&self, request: Request) -> StoreResult<Vec<Header>> {
        let mut reader = self.open(request)?;
        read_headers(&mut reader).map_err(|e| request.parse(e))
    }
}

impl NetSource for FileStore {
    fn backend(&self) -> Backend {
        Backend::File
    }

    /// Binary files hold 64-bit words only and are matched on the exact
    /// `(s, m)`; `bit_size` is ignored.
    fn find_record(
        &self,
        family: NetFamily,
        s: usize,
        m: u32,
        _bit_size: u32,
    ) -> StoreResult<NetRecord> {
        let request = Request::new(family, s, m, Backend::File);
        let s32 = u32::try_from(s).map_err(|_| request.not_found())?;
        let mut reader = self.open(request)?;
        debug!(family = %family, s, m, "scanning header block");
        read_binary(&mut reader, s32, m)
            .map_err(|e| request.parse(e))?
            .ok_or_else(|| request.not_found())
    }

    fn sobol_seeds(&self, count: usize) -> StoreResult<Vec<SobolSeed>> {
        let request = Request::new(NetFamily::Sobol, count + 1, 0, Backend::File);
        let reader = self.open(request)?;
        read_seed_table(reader, Some(count)).map_err(|e| request.parse(e))
    }

    fn sobol_seed_count(&self) -> StoreResult<usize> {
        let request = Request::new(NetFamily::Sobol, 0, 0, Backend::File);
        let reader = self.open(request)?;
        count_seed_rows(reader).map_err(|e| request.parse(e))
    }

    fn dimension_range(&self, family: NetFamily) -> StoreResult<(usize, usize)> {
        let request = Request::new(family, 0, 0, Backend::File);
        let headers = self.headers(request)?;
        min_max(headers.iter().map(|h| h.s as usize)).ok_or_else(|| request.not_found())
    }

    fn precision_range(&self, family: NetFamily, s: usize) -> StoreResult<(u32, u32)> {
        let request = Request::new(family, s, 0, Backend::File);
        let headers = self.headers(request)?;
        let precisions = headers
            .iter()
            .filter(|h| h.s as usize == s)
            .map(|h| h.m);
        min_max(precisions).ok_or_else(|| request.not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::write_binary;
    use crate::error::StoreError;
    use qmc_core::GeneratingMatrix;

    fn store_with(matrices: &[GeneratingMatrix<u64>]) -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let mut file = File::create(store.path(NetFamily::NiederreiterXing)).unwrap();
        write_binary(&mut file, matrices).unwrap();
        (dir, store)
    }

    #[test]
    fn test_exact_match_only() {
        let matrix = GeneratingMatrix::<u64>::van_der_corput(6).unwrap();
        let (_dir, store) = store_with(&[matrix.clone()]);
        let record = store
            .find_record(NetFamily::NiederreiterXing, 1, 6, 64)
            .unwrap();
        assert_eq!(record.words, matrix.rows());
        assert!(store
            .find_record(NetFamily::NiederreiterXing, 1, 5, 64)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_missing_file_is_storage_error() {
        let (_dir, store) = store_with(&[]);
        let err = store.find_record(NetFamily::OldSobol, 2, 4, 64).unwrap_err();
        assert!(matches!(
            err,
            StoreError::StorageError {
                family: NetFamily::OldSobol,
                backend: Backend::File,
                ..
            }
        ));
    }

    #[test]
    fn test_ranges_from_headers() {
        let vdc = |m| GeneratingMatrix::<u64>::van_der_corput(m).unwrap();
        let wide = GeneratingMatrix::<u64>::new(3, 2, vec![1; 6]).unwrap();
        let (_dir, store) = store_with(&[vdc(4), vdc(9), wide]);
        assert_eq!(
            store.dimension_range(NetFamily::NiederreiterXing).unwrap(),
            (1, 3)
        );
        assert_eq!(
            store.precision_range(NetFamily::NiederreiterXing, 1).unwrap(),
            (4, 9)
        );
        assert!(store
            .precision_range(NetFamily::NiederreiterXing, 2)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        std::fs::write(
            store.path(NetFamily::Sobol),
            "d s a m_i\n2 1 0 1\n3 2 1 1 3\n4 3 1 1 3 1\n",
        )
        .unwrap();
        assert_eq!(store.sobol_seed_count().unwrap(), 3);
        assert_eq!(store.sobol_seeds(2).unwrap().len(), 2);
    }
}
