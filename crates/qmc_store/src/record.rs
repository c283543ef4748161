//! Stored generating-matrix record.

use qmc_core::{GeneratingMatrix, MatrixError, NetWord};

use crate::error::ParseError;

/// Matrix data as held by a backend, before width adaptation.
///
/// `words` are the source words in row-major order (`row(i, j) =
/// words[i * s + j]`) zero-extended to `u64`; `bit_size` records whether
/// they came from a 32- or 64-bit source. A record stored at precision `M`
/// can serve any request with `m <= M` by taking its first `s * m` words.
#[derive(Debug, Clone, PartialEq)]
pub struct NetRecord {
    /// Source word width, 32 or 64.
    pub bit_size: u32,
    /// Dimension `s`.
    pub dimension: usize,
    /// Stored precision.
    pub precision: u32,
    /// Row-major source words, at least `s * precision` of them.
    pub words: Vec<u64>,
    /// WAFOM value, absent for NaN or NULL.
    pub wafom: Option<f64>,
    /// t-value, absent for -1 or NULL.
    pub tvalue: Option<i32>,
}

/// Number of words `s * m` in a matrix of the given shape.
///
/// # Errors
///
/// Returns `ParseError::ShapeOverflow` if the product does not fit in
/// `usize`.
pub fn word_count(dimension: usize, precision: u32) -> Result<usize, ParseError> {
    usize::try_from(precision)
        .ok()
        .and_then(|m| dimension.checked_mul(m))
        .ok_or(ParseError::ShapeOverflow {
            dimension,
            precision,
        })
}

impl NetRecord {
    /// Captures a 64-bit matrix as a record.
    pub fn from_matrix(matrix: &GeneratingMatrix<u64>) -> Self {
        Self {
            bit_size: 64,
            dimension: matrix.dimension(),
            precision: matrix.precision(),
            words: matrix.rows().to_vec(),
            wafom: matrix.wafom(),
            tvalue: matrix.tvalue(),
        }
    }

    /// Checks the bit size and that enough words are present.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for an unsupported bit size, a shape whose word
    /// count overflows, or fewer than `s * m` words.
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.bit_size != 32 && self.bit_size != 64 {
            return Err(ParseError::UnsupportedBitSize(self.bit_size));
        }
        let expected = word_count(self.dimension, self.precision)?;
        if self.words.len() < expected {
            return Err(ParseError::TooFewWords {
                expected,
                actual: self.words.len(),
            });
        }
        Ok(())
    }

    /// Builds a precision-`m` matrix in word width `U`, adapting the source
    /// width as needed.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError` if `m` exceeds the stored precision or the
    /// width of `U`.
    pub fn to_matrix<U: NetWord>(&self, m: u32) -> Result<GeneratingMatrix<U>, MatrixError> {
        if m > self.precision {
            return Err(MatrixError::InvalidPrecision {
                precision: m,
                max: self.precision,
            });
        }
        Ok(
            GeneratingMatrix::<U>::from_source_words(self.dimension, m, &self.words, self.bit_size)?
                .with_wafom(self.wafom)
                .with_tvalue(self.tvalue),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_32() -> NetRecord {
        NetRecord {
            bit_size: 32,
            dimension: 2,
            precision: 3,
            words: vec![0x8000_0000, 0x8000_0000, 0x4000_0000, 0xc000_0000, 0x2000_0000, 0xa000_0000],
            wafom: Some(-3.5),
            tvalue: Some(0),
        }
    }

    #[test]
    fn test_32_bit_source_to_64_bit_matrix() {
        let matrix = record_32().to_matrix::<u64>(3).unwrap();
        assert_eq!(matrix.row(0, 0), 0x8000_0000_0000_0000);
        assert_eq!(matrix.row(1, 1), 0xc000_0000_0000_0000);
        assert_eq!(matrix.wafom(), Some(-3.5));
        assert_eq!(matrix.tvalue(), Some(0));
    }

    #[test]
    fn test_prefix_serves_lower_precision() {
        let matrix = record_32().to_matrix::<u32>(2).unwrap();
        assert_eq!(matrix.rows(), &[0x8000_0000, 0x8000_0000, 0x4000_0000, 0xc000_0000]);
    }

    #[test]
    fn test_precision_above_stored_rejected() {
        assert!(record_32().to_matrix::<u32>(4).is_err());
    }

    #[test]
    fn test_validate() {
        let mut record = record_32();
        assert!(record.validate().is_ok());
        record.words.pop();
        assert!(matches!(
            record.validate(),
            Err(ParseError::TooFewWords {
                expected: 6,
                actual: 5
            })
        ));
        record.bit_size = 16;
        assert!(matches!(
            record.validate(),
            Err(ParseError::UnsupportedBitSize(16))
        ));
    }

    #[test]
    fn test_validate_overflowing_shape() {
        let record = NetRecord {
            bit_size: 64,
            dimension: usize::MAX,
            precision: 2,
            words: vec![1, 2],
            wafom: None,
            tvalue: None,
        };
        assert!(matches!(
            record.validate(),
            Err(ParseError::ShapeOverflow {
                dimension: usize::MAX,
                precision: 2
            })
        ));
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(3, 4).unwrap(), 12);
        assert_eq!(word_count(0, 63).unwrap(), 0);
        assert!(word_count(usize::MAX / 2 + 1, 2).is_err());
    }

    #[test]
    fn test_from_matrix_round_trip() {
        let matrix = GeneratingMatrix::<u64>::van_der_corput(5)
            .unwrap()
            .with_tvalue(Some(0));
        let record = NetRecord::from_matrix(&matrix);
        assert_eq!(record.to_matrix::<u64>(5).unwrap(), matrix);
    }
}
