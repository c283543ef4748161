//! Canonical generating-matrix representation.
//!
//! A [`GeneratingMatrix`] holds `s * m` words laid out row-major by bit
//! position: `row(i, j) = rows[i * s + j]` for bit position `i` in `[0, m)`
//! and dimension `j` in `[0, s)`. Every storage backend and the Sobol builder
//! produce this one representation.
//!
//! Rows are trusted: linear independence over GF(2) is not re-verified.

use crate::bits::NetWord;
use crate::error::MatrixError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest precision supported by any word width.
///
/// The Gray-code counter spans `2^m` points in a `u64`.
pub const MAX_PRECISION: u32 = 63;

/// Returns the largest precision for words of type `U`.
#[inline]
pub fn max_precision<U: NetWord>() -> u32 {
    U::BITS.min(MAX_PRECISION)
}

/// Digital-net generating matrix over GF(2).
///
/// # Examples
///
/// ```rust
/// use qmc_core::GeneratingMatrix;
///
/// // Two dimensions, two bit rows
/// let matrix = GeneratingMatrix::<u64>::new(2, 2, vec![1 << 63, 1 << 63, 1 << 62, 3 << 62])
///     .unwrap()
///     .with_wafom(Some(0.25))
///     .with_tvalue(Some(0));
///
/// assert_eq!(matrix.row(1, 1), 3 << 62);
/// assert_eq!(matrix.tvalue(), Some(0));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneratingMatrix<U> {
    dimension: usize,
    precision: u32,
    rows: Vec<U>,
    wafom: Option<f64>,
    tvalue: Option<i32>,
}

impl<U: NetWord> GeneratingMatrix<U> {
    /// Creates a matrix from `dimension * precision` row words.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError` if the dimension is zero, the precision is
    /// outside `[1, max_precision::<U>()]`, or `rows.len() != s * m`.
    pub fn new(dimension: usize, precision: u32, rows: Vec<U>) -> Result<Self, MatrixError> {
        validate_shape::<U>(dimension, precision)?;
        let expected = dimension * precision as usize;
        if rows.len() != expected {
            return Err(MatrixError::RowCountMismatch {
                expected,
                actual: rows.len(),
            });
        }
        Ok(Self {
            dimension,
            precision,
            rows,
            wafom: None,
            tvalue: None,
        })
    }

    /// Creates a matrix from words of a `source_bits`-wide source, applying
    /// the width adaptation rule of [`NetWord`].
    ///
    /// Only the first `dimension * precision` words are used, so a record
    /// stored at a higher precision can fill a lower-precision matrix.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError` for an invalid shape, a source width other than
    /// 32 or 64, or fewer than `s * m` words.
    pub fn from_source_words(
        dimension: usize,
        precision: u32,
        words: &[u64],
        source_bits: u32,
    ) -> Result<Self, MatrixError> {
        validate_shape::<U>(dimension, precision)?;
        let expected = dimension * precision as usize;
        if words.len() < expected {
            return Err(MatrixError::RowCountMismatch {
                expected,
                actual: words.len(),
            });
        }
        let rows = words[..expected]
            .iter()
            .map(|&w| U::from_source(w, source_bits))
            .collect::<Option<Vec<U>>>()
            .ok_or(MatrixError::UnsupportedSourceWidth(source_bits))?;
        Self::new(dimension, precision, rows)
    }

    /// Single-dimension matrix whose rows are `2^(w - 1 - i)`.
    ///
    /// Enumerated in Gray-code order this visits every multiple of `2^-m`
    /// in `[0, 1)` exactly once per cycle.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::InvalidPrecision` for an unsupported precision.
    pub fn van_der_corput(precision: u32) -> Result<Self, MatrixError> {
        validate_shape::<U>(1, precision)?;
        let rows = (0..precision).map(U::leading_bit).collect();
        Self::new(1, precision, rows)
    }

    /// Attaches a WAFOM value. `NaN` is stored as absent.
    #[inline]
    pub fn with_wafom(mut self, wafom: Option<f64>) -> Self {
        self.wafom = wafom.filter(|w| !w.is_nan());
        self
    }

    /// Attaches a t-value. Negative values are stored as absent.
    #[inline]
    pub fn with_tvalue(mut self, tvalue: Option<i32>) -> Self {
        self.tvalue = tvalue.filter(|&t| t >= 0);
        self
    }

    /// Number of dimensions `s`.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of bit rows `m`.
    #[inline]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Word width `w` in bits.
    #[inline]
    pub fn bit_width(&self) -> u32 {
        U::BITS
    }

    /// Number of points in one full cycle, `2^m`.
    #[inline]
    pub fn cycle_length(&self) -> u64 {
        1u64 << self.precision
    }

    /// Row for bit position `bit` and dimension `dim`.
    ///
    /// # Panics
    ///
    /// Panics if `bit >= m` or `dim >= s`.
    #[inline]
    pub fn row(&self, bit: usize, dim: usize) -> U {
        assert!(dim < self.dimension, "dimension {} out of range", dim);
        self.rows[bit * self.dimension + dim]
    }

    /// All `s` words of bit position `bit`.
    #[inline]
    pub fn bit_row(&self, bit: usize) -> &[U] {
        let start = bit * self.dimension;
        &self.rows[start..start + self.dimension]
    }

    /// Raw row-major words.
    #[inline]
    pub fn rows(&self) -> &[U] {
        &self.rows
    }

    /// WAFOM quality metric, if the source recorded one.
    #[inline]
    pub fn wafom(&self) -> Option<f64> {
        self.wafom
    }

    /// t-value quality metric, if the source recorded one.
    #[inline]
    pub fn tvalue(&self) -> Option<i32> {
        self.tvalue
    }

    /// Rows widened to 64-bit source words, as written to storage.
    pub fn to_source_words(&self) -> Vec<u64> {
        self.rows.iter().map(|w| w.to_u64_source()).collect()
    }

    /// Re-expresses the matrix in another word width.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::InvalidPrecision` if `m` exceeds the target
    /// width.
    pub fn to_width<V: NetWord>(&self) -> Result<GeneratingMatrix<V>, MatrixError> {
        let words = self.to_source_words();
        Ok(
            GeneratingMatrix::<V>::from_source_words(self.dimension, self.precision, &words, 64)?
                .with_wafom(self.wafom)
                .with_tvalue(self.tvalue),
        )
    }
}

fn validate_shape<U: NetWord>(dimension: usize, precision: u32) -> Result<(), MatrixError> {
    if dimension == 0 {
        return Err(MatrixError::InvalidDimension(dimension));
    }
    let max = max_precision::<U>();
    if precision == 0 || precision > max {
        return Err(MatrixError::InvalidPrecision { precision, max });
    }
    Ok(())
}
