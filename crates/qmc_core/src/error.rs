//! Error types for structured error handling.
//!
//! This module provides:
//! - `MatrixError`: Errors from generating-matrix construction and width adaptation
//! - `SobolError`: Errors from deriving a matrix out of a Sobol seed table
//! - `NetError`: Errors from the digital-net point stream
//! - `StatsError`: Errors from online statistics and Student-t lookups

use thiserror::Error;

/// Generating-matrix construction errors.
///
/// # Examples
/// ```
/// use qmc_core::MatrixError;
///
/// let err = MatrixError::RowCountMismatch { expected: 20, actual: 19 };
/// assert_eq!(format!("{}", err), "Row count mismatch: expected 20 words, got 19");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// Dimension count must be at least one.
    #[error("Invalid dimension {0}: must be at least 1")]
    InvalidDimension(usize),

    /// Precision outside `1..=max`.
    #[error("Invalid precision {precision}: must be in range [1, {max}]")]
    InvalidPrecision {
        /// Requested precision (number of bit rows).
        precision: u32,
        /// Largest precision supported by the word width.
        max: u32,
    },

    /// The row buffer does not hold exactly `s * m` words.
    #[error("Row count mismatch: expected {expected} words, got {actual}")]
    RowCountMismatch {
        /// Expected number of words (`s * m`).
        expected: usize,
        /// Number of words supplied.
        actual: usize,
    },

    /// Source word width is neither 32 nor 64.
    #[error("Unsupported source bit width {0}: must be 32 or 64")]
    UnsupportedSourceWidth(u32),
}

/// Sobol matrix derivation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SobolError {
    /// Fewer seeds than the `s - 1` non-trivial dimensions need.
    #[error("Sobol seed table too short: {required} seeds required, {available} available")]
    NotEnoughSeeds {
        /// Seeds required for the requested dimension.
        required: usize,
        /// Seeds present in the table.
        available: usize,
    },

    /// A seed polynomial of degree zero.
    #[error("Sobol seed {index} has degree 0")]
    ZeroDegree {
        /// Index of the offending seed row.
        index: usize,
    },

    /// A seed with fewer initial direction numbers than its degree.
    #[error("Sobol seed {index} has {actual} initial numbers, degree {degree} requires that many")]
    MissingInitialNumbers {
        /// Index of the offending seed row.
        index: usize,
        /// Degree of the primitive polynomial.
        degree: u32,
        /// Number of initial direction numbers supplied.
        actual: usize,
    },

    /// Invalid target shape.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// Digital-net point stream errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetError {
    /// `next_point` called before `initialise`, or after the shift changed.
    #[error("Digital net is not initialised: call initialise() after construction or a shift change")]
    NotInitialised,

    /// Shift vector length differs from the net dimension.
    #[error("Digital shift has {actual} values, net dimension is {expected}")]
    ShiftDimensionMismatch {
        /// Net dimension.
        expected: usize,
        /// Shift length supplied.
        actual: usize,
    },

    /// Output buffer length differs from the net dimension.
    #[error("Point buffer has {actual} slots, net dimension is {expected}")]
    BufferDimensionMismatch {
        /// Net dimension.
        expected: usize,
        /// Buffer length supplied.
        actual: usize,
    },

    /// More points requested than one cycle of `2^m` holds.
    #[error("Requested {requested} points but one cycle holds only {cycle_length}")]
    CountExceedsCycle {
        /// Number of points requested.
        requested: u64,
        /// Cycle length `2^m`.
        cycle_length: u64,
    },
}

/// Online statistics errors.
///
/// # Examples
/// ```
/// use qmc_core::StatsError;
///
/// let err = StatsError::InsufficientSamples { required: 2, actual: 1 };
/// assert!(err.to_string().contains("at least 2 samples"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Statistic undefined for the current sample count.
    #[error("Statistic requires at least {required} samples, have {actual}")]
    InsufficientSamples {
        /// Minimum sample count for the statistic.
        required: u64,
        /// Current sample count.
        actual: u64,
    },

    /// Confidence probability not in {0.95, 0.99, 0.999, 0.9999}.
    #[error("Unsupported confidence level {0}: must be one of 0.95, 0.99, 0.999, 0.9999")]
    UnsupportedConfidenceLevel(f64),

    /// Confidence code not in {95, 99, 999, 9999}.
    #[error("Unsupported confidence code {0}: must be one of 95, 99, 999, 9999")]
    UnsupportedConfidenceCode(u32),

    /// Negative degrees of freedom passed to the t-table.
    #[error("Degrees of freedom must be >= 0, got {0}")]
    NegativeDegreesOfFreedom(i64),
}
