//! Digital-net point stream.
//!
//! [`DigitalNet`] enumerates the points of a digital net in Gray-code order.
//! Consecutive Gray codes differ in exactly one bit, so each step costs one
//! XOR per dimension:
//!
//! ```text
//! b = trailing_zeros(g + 1)
//! point[j] ^= row(b, j)    for every dimension j
//! g = g + 1
//! ```
//!
//! # Lifecycle
//!
//! ```text
//! new() / set_*_shift() ──► Uninitialised ──initialise()──► Ready ──next_point()──┐
//!                                                             ▲                   │
//!                                                             └───────────────────┘
//! ```
//!
//! The point at index 0 is exactly the digital shift (or the origin). After
//! `2^m` calls to `next_point` the stream is back at index 0; the net
//! properties hold only within one such cycle.

use rand::Rng;

use crate::bits::NetWord;
use crate::error::NetError;
use crate::matrix::GeneratingMatrix;
use crate::sequence::PointSequence;

/// XOR offset applied to every point of a net, one word per dimension.
///
/// # Examples
///
/// ```rust
/// use qmc_core::DigitalShift;
///
/// let shift = DigitalShift::from_halves(&[(0x8000_0000, 0x0000_0001)]);
/// assert_eq!(shift.values(), &[0x8000_0000_0000_0001]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigitalShift<U>(Vec<U>);

impl<U: NetWord> DigitalShift<U> {
    /// Creates a shift from explicit per-dimension words.
    #[inline]
    pub fn new(values: Vec<U>) -> Self {
        Self(values)
    }

    /// Draws one uniformly random word per dimension.
    pub fn random<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Self {
        Self((0..dimension).map(|_| U::random(rng)).collect())
    }

    /// Per-dimension shift words.
    #[inline]
    pub fn values(&self) -> &[U] {
        &self.0
    }

    /// Number of dimensions covered by the shift.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }
}

impl DigitalShift<u64> {
    /// Assembles 64-bit shift words from `(high, low)` 32-bit halves, the
    /// form in which embedding hosts without 64-bit integers pass them.
    pub fn from_halves(halves: &[(u32, u32)]) -> Self {
        Self(
            halves
                .iter()
                .map(|&(hi, lo)| (u64::from(hi) << 32) | u64::from(lo))
                .collect(),
        )
    }
}

/// Enumeration state of a [`DigitalNet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetState {
    /// No enumeration in progress; `initialise` must be called.
    Uninitialised,
    /// Points can be read and advanced.
    Ready,
}

/// Stateful digital-net point generator.
///
/// # Examples
///
/// ```rust
/// use qmc_core::{DigitalNet, GeneratingMatrix};
///
/// let matrix = GeneratingMatrix::<u64>::van_der_corput(3).unwrap();
/// let mut net = DigitalNet::new(matrix);
/// net.initialise();
///
/// let mut seen = Vec::new();
/// for _ in 0..8 {
///     seen.push(net.get_point(0));
///     net.next_point().unwrap();
/// }
/// seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
/// assert_eq!(seen, vec![0.0, 0.125, 0.25, 0.375, 0.5, 0.625, 0.75, 0.875]);
/// ```
#[derive(Clone, Debug)]
pub struct DigitalNet<U: NetWord> {
    matrix: GeneratingMatrix<U>,
    shift: Option<DigitalShift<U>>,
    point: Vec<U>,
    index: u64,
    cycles: u64,
    state: NetState,
}

impl<U: NetWord> DigitalNet<U> {
    /// Creates an unshifted generator in the `Uninitialised` state.
    pub fn new(matrix: GeneratingMatrix<U>) -> Self {
        let dimension = matrix.dimension();
        Self {
            matrix,
            shift: None,
            point: vec![U::zero(); dimension],
            index: 0,
            cycles: 0,
            state: NetState::Uninitialised,
        }
    }

    /// Generating matrix driving this stream.
    #[inline]
    pub fn matrix(&self) -> &GeneratingMatrix<U> {
        &self.matrix
    }

    /// Number of dimensions `s`.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.matrix.dimension()
    }

    /// Number of bit rows `m`.
    #[inline]
    pub fn precision(&self) -> u32 {
        self.matrix.precision()
    }

    /// Points per cycle, `2^m`.
    #[inline]
    pub fn cycle_length(&self) -> u64 {
        self.matrix.cycle_length()
    }

    /// Current Gray-code index `g`.
    #[inline]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Number of completed cycles since the last `initialise`.
    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> NetState {
        self.state
    }

    /// Whether `next_point` may be called.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state == NetState::Ready
    }

    /// Installed shift, if any.
    #[inline]
    pub fn shift(&self) -> Option<&DigitalShift<U>> {
        self.shift.as_ref()
    }

    /// Installs an explicit digital shift.
    ///
    /// Any enumeration in progress is invalidated; call
    /// [`initialise`](Self::initialise) before advancing again.
    ///
    /// # Errors
    ///
    /// Returns `NetError::ShiftDimensionMismatch` if the shift does not
    /// cover exactly `s` dimensions.
    pub fn set_digital_shift(&mut self, shift: DigitalShift<U>) -> Result<(), NetError> {
        if shift.dimension() != self.dimension() {
            return Err(NetError::ShiftDimensionMismatch {
                expected: self.dimension(),
                actual: shift.dimension(),
            });
        }
        self.shift = Some(shift);
        self.state = NetState::Uninitialised;
        Ok(())
    }

    /// Installs a shift of one random word per dimension drawn from `rng`.
    ///
    /// Invalidates the enumeration like [`set_digital_shift`](Self::set_digital_shift).
    pub fn set_random_shift<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.shift = Some(DigitalShift::random(self.dimension(), rng));
        self.state = NetState::Uninitialised;
    }

    /// Removes the shift so the net starts at the origin.
    ///
    /// Invalidates the enumeration like [`set_digital_shift`](Self::set_digital_shift).
    pub fn clear_shift(&mut self) {
        self.shift = None;
        self.state = NetState::Uninitialised;
    }

    /// Resets the point to the shift (or the origin) at index 0 and enters
    /// the `Ready` state.
    pub fn initialise(&mut self) {
        self.restart_cycle();
        self.cycles = 0;
        self.state = NetState::Ready;
    }

    fn restart_cycle(&mut self) {
        match &self.shift {
            Some(shift) => self.point.copy_from_slice(shift.values()),
            None => self.point.iter_mut().for_each(|p| *p = U::zero()),
        }
        self.index = 0;
    }

    /// Advances to the next point in Gray-code order.
    ///
    /// The `2^m`-th call completes the cycle and returns the point to its
    /// initial value.
    ///
    /// # Errors
    ///
    /// Returns `NetError::NotInitialised` unless the net is `Ready`.
    #[inline]
    pub fn next_point(&mut self) -> Result<(), NetError> {
        if self.state != NetState::Ready {
            return Err(NetError::NotInitialised);
        }
        let next = self.index + 1;
        if next == self.cycle_length() {
            self.restart_cycle();
            self.cycles += 1;
            return Ok(());
        }
        let bit = next.trailing_zeros() as usize;
        for (p, &r) in self.point.iter_mut().zip(self.matrix.bit_row(bit)) {
            *p ^= r;
        }
        self.index = next;
        Ok(())
    }

    /// Coordinate `dim` of the current point, `point[dim] / 2^w`, in `[0, 1)`.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= s`.
    #[inline]
    pub fn get_point(&self, dim: usize) -> f64 {
        self.point[dim].to_unit()
    }

    /// Raw words of the current point.
    #[inline]
    pub fn point_words(&self) -> &[U] {
        &self.point
    }

    /// Writes every coordinate of the current point into `out`.
    ///
    /// # Errors
    ///
    /// Returns `NetError::BufferDimensionMismatch` if `out.len() != s`.
    pub fn fill_point(&self, out: &mut [f64]) -> Result<(), NetError> {
        if out.len() != self.point.len() {
            return Err(NetError::BufferDimensionMismatch {
                expected: self.point.len(),
                actual: out.len(),
            });
        }
        for (o, p) in out.iter_mut().zip(&self.point) {
            *o = p.to_unit();
        }
        Ok(())
    }

    /// Re-initialises and collects the first `count` points as a row-major
    /// `count x s` buffer. The net is left `Ready` after the last point.
    ///
    /// # Errors
    ///
    /// Returns `NetError::CountExceedsCycle` if `count > 2^m`.
    pub fn points(&mut self, count: u64) -> Result<Vec<f64>, NetError> {
        if count > self.cycle_length() {
            return Err(NetError::CountExceedsCycle {
                requested: count,
                cycle_length: self.cycle_length(),
            });
        }
        let s = self.dimension();
        let mut out = vec![0.0; count as usize * s];
        self.initialise();
        for row in out.chunks_exact_mut(s) {
            self.fill_point(row)?;
            self.next_point()?;
        }
        Ok(out)
    }
}

impl<U: NetWord> PointSequence for DigitalNet<U> {
    #[inline]
    fn dimension(&self) -> usize {
        self.matrix.dimension()
    }

    #[inline]
    fn fill_next(&mut self, out: &mut [f64]) -> Result<(), NetError> {
        if self.state != NetState::Ready {
            return Err(NetError::NotInitialised);
        }
        self.fill_point(out)?;
        self.next_point()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sobol::{build_sobol_matrix, SobolSeed};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sobol_net(dimension: usize, precision: u32) -> DigitalNet<u64> {
        let seeds = vec![
            SobolSeed::new(1, 0, vec![1]),
            SobolSeed::new(2, 1, vec![1, 3]),
            SobolSeed::new(3, 1, vec![1, 3, 1]),
        ];
        DigitalNet::new(build_sobol_matrix(&seeds, dimension, precision).unwrap())
    }

    #[test]
    fn test_next_point_requires_initialise() {
        let mut net = sobol_net(2, 4);
        assert_eq!(net.next_point(), Err(NetError::NotInitialised));
        net.initialise();
        assert!(net.next_point().is_ok());
    }

    #[test]
    fn test_initial_point_is_shift() {
        let mut net = sobol_net(2, 4);
        net.set_digital_shift(DigitalShift::new(vec![1 << 63, 1 << 62]))
            .unwrap();
        net.initialise();
        assert_eq!(net.get_point(0), 0.5);
        assert_eq!(net.get_point(1), 0.25);
        assert_eq!(net.index(), 0);
    }

    #[test]
    fn test_shift_change_invalidates_enumeration() {
        let mut net = sobol_net(2, 4);
        net.initialise();
        net.next_point().unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        net.set_random_shift(&mut rng);
        assert_eq!(net.state(), NetState::Uninitialised);
        assert_eq!(net.next_point(), Err(NetError::NotInitialised));

        net.initialise();
        net.clear_shift();
        assert!(!net.is_ready());
    }

    #[test]
    fn test_shift_dimension_checked() {
        let mut net = sobol_net(3, 4);
        let result = net.set_digital_shift(DigitalShift::new(vec![0, 0]));
        assert_eq!(
            result,
            Err(NetError::ShiftDimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_gray_code_single_bit_flip() {
        let mut net = sobol_net(3, 6);
        net.initialise();
        for g in 0..63u64 {
            let before = net.point_words().to_vec();
            net.next_point().unwrap();
            let bit = (g + 1).trailing_zeros() as usize;
            for j in 0..3 {
                assert_eq!(before[j] ^ net.point_words()[j], net.matrix().row(bit, j));
            }
        }
    }

    #[test]
    fn test_full_cycle_returns_to_shift() {
        let mut net = sobol_net(4, 8);
        let mut rng = StdRng::seed_from_u64(99);
        net.set_random_shift(&mut rng);
        net.initialise();
        let start = net.point_words().to_vec();
        for _ in 0..256 {
            net.next_point().unwrap();
        }
        assert_eq!(net.point_words(), start.as_slice());
        assert_eq!(net.index(), 0);
        assert_eq!(net.cycles(), 1);
    }

    #[test]
    fn test_points_matrix_layout() {
        let mut net = sobol_net(2, 3);
        let pts = net.points(8).unwrap();
        assert_eq!(pts.len(), 16);
        assert_eq!(&pts[0..2], &[0.0, 0.0]);
        assert!(pts.iter().all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn test_points_rejects_count_beyond_cycle() {
        let mut net = sobol_net(2, 3);
        assert_eq!(
            net.points(9),
            Err(NetError::CountExceedsCycle {
                requested: 9,
                cycle_length: 8
            })
        );
    }

    #[test]
    fn test_fill_next_advances() {
        let mut net = DigitalNet::new(GeneratingMatrix::<u32>::van_der_corput(2).unwrap());
        let mut buf = [0.0];
        assert_eq!(net.fill_next(&mut buf), Err(NetError::NotInitialised));
        net.initialise();
        net.fill_next(&mut buf).unwrap();
        assert_eq!(buf[0], 0.0);
        net.fill_next(&mut buf).unwrap();
        assert_eq!(buf[0], 0.5);
        assert_eq!(net.index(), 2);
    }

    #[test]
    fn test_get_point_pure() {
        let mut net = sobol_net(2, 5);
        net.initialise();
        net.next_point().unwrap();
        assert_eq!(net.get_point(1), net.get_point(1));
    }
}
