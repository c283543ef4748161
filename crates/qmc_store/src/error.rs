//! Error types for matrix storage.
//!
//! This module provides:
//! - `ParseError`: Context-free decoding errors from the binary, text and
//!   seed-file formats
//! - `StoreError`: Store-level errors carrying the family, shape and backend
//!   of the failed request
//! - `ConfigError`: Store configuration errors

use std::fmt;

use qmc_core::{NetFamily, SobolError};
use thiserror::Error;

/// Storage backend identifier, carried by every [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Binary `<abbreviation>.dat` files.
    File,
    /// SQLite database.
    Relational,
    /// Caller-supplied in-memory table.
    Memory,
}

impl Backend {
    /// Lower-case backend name used in log fields and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::File => "file",
            Backend::Relational => "relational",
            Backend::Memory => "memory",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoding errors shared by the on-disk and text formats.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The 8-byte file magic does not match.
    #[error("Magic number mismatch: found {found:#018x}")]
    BadMagic {
        /// Magic word actually read.
        found: u64,
    },

    /// Input ended inside a structure.
    #[error("Unexpected end of data while reading {0}")]
    Truncated(&'static str),

    /// A token that does not parse as the expected field.
    #[error("Invalid {field} token '{token}'")]
    InvalidToken {
        /// Field being parsed.
        field: &'static str,
        /// Offending token.
        token: String,
    },

    /// Fewer matrix words than `s * m`.
    #[error("Too few matrix words: expected {expected}, found {actual}")]
    TooFewWords {
        /// Required word count.
        expected: usize,
        /// Words present.
        actual: usize,
    },

    /// `s * m` does not fit in `usize`.
    #[error("Matrix shape {dimension} x {precision} overflows the word count")]
    ShapeOverflow {
        /// Dimension `s` from the header.
        dimension: usize,
        /// Precision `m` from the header.
        precision: u32,
    },

    /// Bit size other than 32 or 64.
    #[error("Unsupported bit size {0}: must be 32 or 64")]
    UnsupportedBitSize(u32),

    /// Malformed row of a Sobol seed table.
    #[error("Seed row {row}: {reason}")]
    SeedRow {
        /// 0-based data row.
        row: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Underlying reader or writer failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store-level errors.
///
/// Every variant names the requested family, dimension `s`, precision `m`
/// and backend. Range queries that have no `s` or `m` yet report them as 0.
///
/// # Examples
/// ```
/// use qmc_core::NetFamily;
/// use qmc_store::{Backend, StoreError};
///
/// let err = StoreError::NotFound {
///     family: NetFamily::NiederreiterXing,
///     s: 4,
///     m: 10,
///     backend: Backend::File,
/// };
/// assert_eq!(format!("{}", err), "No NX net with s = 4, m = 10 in file store");
/// ```
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entry matches the request.
    #[error("No {family} net with s = {s}, m = {m} in {backend} store")]
    NotFound {
        /// Requested family.
        family: NetFamily,
        /// Requested dimension.
        s: usize,
        /// Requested precision.
        m: u32,
        /// Backend queried.
        backend: Backend,
    },

    /// Stored data is malformed.
    #[error("Malformed {family} data (s = {s}, m = {m}) in {backend} store: {source}")]
    FormatError {
        /// Requested family.
        family: NetFamily,
        /// Requested dimension.
        s: usize,
        /// Requested precision.
        m: u32,
        /// Backend queried.
        backend: Backend,
        /// Decoding failure.
        #[source]
        source: ParseError,
    },

    /// I/O or database failure.
    #[error("{backend} store failure for {family} (s = {s}, m = {m}): {source}")]
    StorageError {
        /// Requested family.
        family: NetFamily,
        /// Requested dimension.
        s: usize,
        /// Requested precision.
        m: u32,
        /// Backend queried.
        backend: Backend,
        /// Backend failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Loaded data could not be turned into a generating matrix.
    #[error("Cannot build {family} matrix (s = {s}, m = {m}) from {backend} store: {source}")]
    Build {
        /// Requested family.
        family: NetFamily,
        /// Requested dimension.
        s: usize,
        /// Requested precision.
        m: u32,
        /// Backend queried.
        backend: Backend,
        /// Construction failure.
        #[source]
        source: SobolError,
    },
}

impl StoreError {
    /// Backend that raised the error.
    pub fn backend(&self) -> Backend {
        match self {
            StoreError::NotFound { backend, .. }
            | StoreError::FormatError { backend, .. }
            | StoreError::StorageError { backend, .. }
            | StoreError::Build { backend, .. } => *backend,
        }
    }

    /// Family of the failed request.
    pub fn family(&self) -> NetFamily {
        match self {
            StoreError::NotFound { family, .. }
            | StoreError::FormatError { family, .. }
            | StoreError::StorageError { family, .. }
            | StoreError::Build { family, .. } => *family,
        }
    }

    /// Whether the error means "no such entry" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Request coordinates attached to errors raised below the store layer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Request {
    pub family: NetFamily,
    pub s: usize,
    pub m: u32,
    pub backend: Backend,
}

impl Request {
    pub(crate) fn new(family: NetFamily, s: usize, m: u32, backend: Backend) -> Self {
        Self {
            family,
            s,
            m,
            backend,
        }
    }

    pub(crate) fn not_found(self) -> StoreError {
        StoreError::NotFound {
            family: self.family,
            s: self.s,
            m: self.m,
            backend: self.backend,
        }
    }

    pub(crate) fn format(self, source: ParseError) -> StoreError {
        StoreError::FormatError {
            family: self.family,
            s: self.s,
            m: self.m,
            backend: self.backend,
            source,
        }
    }

    pub(crate) fn storage<E>(self, source: E) -> StoreError
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        StoreError::StorageError {
            family: self.family,
            s: self.s,
            m: self.m,
            backend: self.backend,
            source: source.into(),
        }
    }

    pub(crate) fn build(self, source: impl Into<SobolError>) -> StoreError {
        StoreError::Build {
            family: self.family,
            s: self.s,
            m: self.m,
            backend: self.backend,
            source: source.into(),
        }
    }

    /// Maps a parse error, keeping I/O failures as storage errors.
    pub(crate) fn parse(self, err: ParseError) -> StoreError {
        match err {
            ParseError::Io(io) => self.storage(io),
            other => self.format(other),
        }
    }
}

/// Store configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Empty data root.
    #[error("Invalid data root: must not be empty")]
    EmptyDataRoot,

    /// Empty or path-like database file name.
    #[error("Invalid database file name '{0}': must be a non-empty file name")]
    InvalidDatabaseFile(String),

    /// Configuration file could not be read or parsed.
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// The relational backend's runtime could not be started.
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Request {
        Request::new(NetFamily::SobolLowWafom, 5, 12, Backend::Relational)
    }

    #[test]
    fn test_not_found_display() {
        let err = request().not_found();
        assert_eq!(
            err.to_string(),
            "No Sobol_LowWAFOM net with s = 5, m = 12 in relational store"
        );
        assert!(err.is_not_found());
        assert_eq!(err.backend(), Backend::Relational);
        assert_eq!(err.family(), NetFamily::SobolLowWafom);
    }

    #[test]
    fn test_io_parse_error_becomes_storage_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = request().parse(ParseError::Io(io));
        assert!(matches!(err, StoreError::StorageError { .. }));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_format_error_keeps_source() {
        let err = request().parse(ParseError::BadMagic { found: 0xdead });
        assert!(matches!(err, StoreError::FormatError { .. }));
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("0x000000000000dead"));
    }

    #[test]
    fn test_build_error_from_sobol() {
        let err = request().build(SobolError::NotEnoughSeeds {
            required: 4,
            available: 1,
        });
        assert!(err.to_string().contains("Cannot build Sobol_LowWAFOM matrix"));
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(Backend::File.to_string(), "file");
        assert_eq!(Backend::Memory.to_string(), "memory");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidDatabaseFile(String::new());
        assert!(err.to_string().contains("Invalid database file"));
    }
}
