//! Cooperative cancellation of integration runs.
//!
//! The driver polls a [`Cancellation`] token before each replication. A run
//! that observes cancellation stops at that boundary and reports the
//! replications completed so far.

use std::sync::atomic::{AtomicBool, Ordering};

/// Token polled by the driver between replications.
///
/// Implemented for [`AtomicBool`], for [`NeverCancel`] and for any
/// `Fn() -> bool` closure.
///
/// # Examples
///
/// ```rust
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use qmc_integration::Cancellation;
///
/// let flag = AtomicBool::new(false);
/// assert!(!flag.is_cancelled());
/// flag.store(true, Ordering::Relaxed);
/// assert!(flag.is_cancelled());
///
/// let deadline_passed = || true;
/// assert!(deadline_passed.is_cancelled());
/// ```
pub trait Cancellation {
    /// Returns `true` once the run should stop.
    fn is_cancelled(&self) -> bool;
}

/// Token that never cancels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl Cancellation for AtomicBool {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<F> Cancellation for F
where
    F: Fn() -> bool,
{
    #[inline]
    fn is_cancelled(&self) -> bool {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_never_cancel() {
        assert!(!NeverCancel.is_cancelled());
    }

    #[test]
    fn test_atomic_flag() {
        let flag = AtomicBool::new(false);
        assert!(!flag.is_cancelled());
        flag.store(true, Ordering::Relaxed);
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_closure_budget() {
        let polls = Cell::new(0);
        let token = || {
            polls.set(polls.get() + 1);
            polls.get() > 2
        };
        assert!(!token.is_cancelled());
        assert!(!token.is_cancelled());
        assert!(token.is_cancelled());
    }
}
