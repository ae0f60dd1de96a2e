//! Single-flight flag for operations that must not overlap.

use std::sync::atomic::{AtomicBool, Ordering};

/// A flag that at most one operation can hold at a time.
#[derive(Debug, Default)]
pub struct InFlight(AtomicBool);

/// Releases the flag when dropped, including when the holding future is
/// cancelled.
#[derive(Debug)]
pub struct InFlightGuard<'a>(&'a AtomicBool);

impl InFlight {
    /// Claim the flag, or `None` if it is already held.
    pub fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.0))
    }

    pub fn is_held(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
