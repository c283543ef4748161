//! Word-width abstraction for generating-matrix rows.
//!
//! Every matrix, shift and point vector is generic over [`NetWord`], which is
//! implemented for `u32` and `u64`. The trait also carries the width
//! adaptation rule shared by all matrix sources:
//!
//! - 64-bit source into a 32-bit word: shift right by 32 and truncate
//! - 32-bit source into a 64-bit word: shift left by 32

use std::fmt::Debug;
use std::ops::BitXorAssign;

use num_traits::{PrimInt, Unsigned};
use rand::Rng;

/// 2^-32, exact in `f64`.
const TWO_POW_NEG_32: f64 = 1.0 / 4_294_967_296.0;

/// 2^-53, exact in `f64`.
const TWO_POW_NEG_53: f64 = 1.0 / 9_007_199_254_740_992.0;

/// Unsigned word holding one generating-matrix row, shift value or point
/// coordinate.
pub trait NetWord:
    PrimInt
    + Unsigned
    + BitXorAssign
    + Default
    + Debug
    + Send
    + Sync
    + 'static
{
    /// Width of the word in bits.
    const BITS: u32;

    /// Adapts a word read from a 64-bit source.
    fn from_u64_source(word: u64) -> Self;

    /// Adapts a word read from a 32-bit source.
    fn from_u32_source(word: u32) -> Self;

    /// Widens this word to a 64-bit source word (inverse of
    /// [`from_u64_source`](NetWord::from_u64_source) for 64-bit words).
    fn to_u64_source(self) -> u64;

    /// Maps the word to `word / 2^BITS` in `[0, 1)`.
    fn to_unit(self) -> f64;

    /// Draws a uniformly distributed word.
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// Word with only bit `BITS - 1 - position` set, i.e. the binary digit
    /// `2^-(position + 1)` of the fraction.
    #[inline]
    fn leading_bit(position: u32) -> Self {
        Self::one() << (Self::BITS - 1 - position) as usize
    }

    /// Adapts a word from a source of the given bit width.
    ///
    /// Returns `None` when `source_bits` is neither 32 nor 64.
    #[inline]
    fn from_source(word: u64, source_bits: u32) -> Option<Self> {
        match source_bits {
            64 => Some(Self::from_u64_source(word)),
            32 => Some(Self::from_u32_source(word as u32)),
            _ => None,
        }
    }
}

impl NetWord for u64 {
    const BITS: u32 = 64;

    #[inline]
    fn from_u64_source(word: u64) -> Self {
        word
    }

    #[inline]
    fn from_u32_source(word: u32) -> Self {
        u64::from(word) << 32
    }

    #[inline]
    fn to_u64_source(self) -> u64 {
        self
    }

    /// Uses the top 53 bits so the result never rounds up to 1.0.
    #[inline]
    fn to_unit(self) -> f64 {
        (self >> 11) as f64 * TWO_POW_NEG_53
    }

    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen()
    }
}

impl NetWord for u32 {
    const BITS: u32 = 32;

    #[inline]
    fn from_u64_source(word: u64) -> Self {
        ((word >> 32) & 0xffff_ffff) as u32
    }

    #[inline]
    fn from_u32_source(word: u32) -> Self {
        word
    }

    #[inline]
    fn to_u64_source(self) -> u64 {
        u64::from(self) << 32
    }

    #[inline]
    fn to_unit(self) -> f64 {
        f64::from(self) * TWO_POW_NEG_32
    }

    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen()
    }
}
