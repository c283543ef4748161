//! Sobol generating matrices derived from seed polynomials.
//!
//! Dimension 0 is the binary van der Corput column `2^(64 - i - 1)`. Every
//! further dimension `c` is seeded from row `c - 1` of a [`SobolSeed`] table
//! (Joe–Kuo layout) and extended with the direction-number recurrence
//!
//! ```text
//! V[i] = V[i-d] ^ (V[i-d] >> d) ^ XOR_{k=1..d-1} a_(d-1-k) * V[i-k]
//! ```
//!
//! After all columns are filled, a downward XOR pass
//! (`row(i) ^= row(i-1)` for `i = L-1 .. 1`) converts direction numbers into
//! generating-matrix rows. The derivation always runs on 64-bit words; 32-bit
//! matrices are obtained through the standard width adaptation.

use crate::bits::NetWord;
use crate::error::{MatrixError, SobolError};
use crate::matrix::{max_precision, GeneratingMatrix};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One row of a Sobol seed table.
///
/// # Examples
///
/// ```rust
/// use qmc_core::SobolSeed;
///
/// // x^2 + x + 1: degree 2, no inner coefficients, m = (1, 3)
/// let seed = SobolSeed::new(2, 0, vec![1, 3]);
/// assert_eq!(seed.degree(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SobolSeed {
    degree: u32,
    coefficient: u32,
    initial: Vec<u32>,
}

impl SobolSeed {
    /// Creates a seed from the polynomial degree `d`, the inner-coefficient
    /// word `a` and the initial direction numbers `m_1..m_d`.
    pub fn new(degree: u32, coefficient: u32, initial: Vec<u32>) -> Self {
        Self {
            degree,
            coefficient,
            initial,
        }
    }

    /// Degree of the primitive polynomial.
    #[inline]
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Inner coefficients of the polynomial packed into a word.
    #[inline]
    pub fn coefficient(&self) -> u32 {
        self.coefficient
    }

    /// Initial direction numbers `m_1..m_d`.
    #[inline]
    pub fn initial(&self) -> &[u32] {
        &self.initial
    }

    fn validate(&self, index: usize) -> Result<(), SobolError> {
        if self.degree == 0 {
            return Err(SobolError::ZeroDegree { index });
        }
        if self.initial.len() < self.degree as usize {
            return Err(SobolError::MissingInitialNumbers {
                index,
                degree: self.degree,
                actual: self.initial.len(),
            });
        }
        Ok(())
    }

    /// Fills `v[1..=len]` with 64-bit direction numbers. `v[0]` is unused.
    fn direction_numbers(&self, v: &mut [u64]) {
        let len = v.len() - 1;
        let d = self.degree as usize;
        let seeded = len.min(d);
        for i in 1..=seeded {
            v[i] = u64::from(self.initial[i - 1]) << (64 - i);
        }
        for i in d + 1..=len {
            let mut next = v[i - d] ^ (v[i - d] >> d);
            for k in 1..d {
                if (self.coefficient >> (d - 1 - k)) & 1 == 1 {
                    next ^= v[i - k];
                }
            }
            v[i] = next;
        }
    }
}

/// Derives a 64-bit Sobol generating matrix of the given shape.
///
/// Uses the first `dimension - 1` rows of `seeds`.
///
/// # Errors
///
/// Returns `SobolError` if the shape is invalid, the table has fewer than
/// `dimension - 1` rows, or a used seed is malformed.
///
/// # Examples
///
/// ```rust
/// use qmc_core::{build_sobol_matrix, SobolSeed};
///
/// let seeds = vec![SobolSeed::new(1, 0, vec![1])];
/// let matrix = build_sobol_matrix(&seeds, 2, 10).unwrap();
/// assert_eq!(matrix.dimension(), 2);
/// assert_eq!(matrix.precision(), 10);
/// ```
pub fn build_sobol_matrix(
    seeds: &[SobolSeed],
    dimension: usize,
    precision: u32,
) -> Result<GeneratingMatrix<u64>, SobolError> {
    if dimension == 0 {
        return Err(MatrixError::InvalidDimension(dimension).into());
    }
    let max = max_precision::<u64>();
    if precision == 0 || precision > max {
        return Err(MatrixError::InvalidPrecision { precision, max }.into());
    }
    let required = dimension - 1;
    if seeds.len() < required {
        return Err(SobolError::NotEnoughSeeds {
            required,
            available: seeds.len(),
        });
    }

    let len = precision as usize;
    let mut rows = vec![0u64; dimension * len];
    for i in 0..len {
        rows[i * dimension] = u64::leading_bit(i as u32);
    }

    let mut v = vec![0u64; len + 1];
    for (index, seed) in seeds[..required].iter().enumerate() {
        seed.validate(index)?;
        seed.direction_numbers(&mut v);
        let col = index + 1;
        for i in 1..=len {
            rows[(i - 1) * dimension + col] = v[i];
        }
    }

    for i in (1..len).rev() {
        for j in 0..dimension {
            rows[i * dimension + j] ^= rows[(i - 1) * dimension + j];
        }
    }

    Ok(GeneratingMatrix::new(dimension, precision, rows)?)
}

/// Derives a Sobol generating matrix in word width `U`.
///
/// # Errors
///
/// As [`build_sobol_matrix`], plus `MatrixError::InvalidPrecision` if the
/// precision exceeds the width of `U`.
pub fn build_sobol_matrix_as<U: NetWord>(
    seeds: &[SobolSeed],
    dimension: usize,
    precision: u32,
) -> Result<GeneratingMatrix<U>, SobolError> {
    Ok(build_sobol_matrix(seeds, dimension, precision)?.to_width::<U>()?)
}
