//! Point-sequence trait shared by quasi-Monte Carlo and Monte Carlo sources.
//!
//! The integration driver is generic over [`PointSequence`] so that the
//! digital-net stream and the pseudo-random uniform source run through the
//! same replication loop with static dispatch.

use crate::error::NetError;

/// Stream of points in the unit hypercube `[0, 1)^s`.
///
/// Low-discrepancy implementations cover the hypercube more evenly than
/// pseudo-random ones, which is what speeds up convergence of the
/// integration estimate.
pub trait PointSequence {
    /// Returns the dimensionality `s` of each point.
    fn dimension(&self) -> usize;

    /// Writes the current point into `out` and advances the stream.
    ///
    /// # Errors
    ///
    /// Returns `NetError` if the stream is not ready to produce points or if
    /// `out.len() != self.dimension()`.
    fn fill_next(&mut self, out: &mut [f64]) -> Result<(), NetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sequence producing the same constant point forever.
    struct Constant(Vec<f64>);

    impl PointSequence for Constant {
        fn dimension(&self) -> usize {
            self.0.len()
        }

        fn fill_next(&mut self, out: &mut [f64]) -> Result<(), NetError> {
            if out.len() != self.0.len() {
                return Err(NetError::BufferDimensionMismatch {
                    expected: self.0.len(),
                    actual: out.len(),
                });
            }
            out.copy_from_slice(&self.0);
            Ok(())
        }
    }

    fn first_coordinate<S: PointSequence>(seq: &mut S) -> f64 {
        let mut buf = vec![0.0; seq.dimension()];
        seq.fill_next(&mut buf).unwrap();
        buf[0]
    }

    #[test]
    fn test_static_dispatch() {
        let mut seq = Constant(vec![0.25, 0.75]);
        assert_eq!(first_coordinate(&mut seq), 0.25);
    }

    #[test]
    fn test_buffer_mismatch() {
        let mut seq = Constant(vec![0.5]);
        let mut buf = [0.0; 2];
        assert!(matches!(
            seq.fill_next(&mut buf),
            Err(NetError::BufferDimensionMismatch { .. })
        ));
    }
}
