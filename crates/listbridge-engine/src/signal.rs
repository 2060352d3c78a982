use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Push-invalidation signal between a notification listener and a client's
/// snapshot cache.
///
/// Single producer, single consumer, no payload: raising an already-raised
/// signal coalesces, so the consumer observes "raised at least once since I
/// last looked". The core treats it strictly as a freshness hint; polling
/// remains the correctness mechanism.
#[derive(Clone, Debug, Default)]
pub struct ChangeSignal {
    raised: Arc<AtomicBool>,
}

impl ChangeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the signal raised. Idempotent.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Consume the signal: true if it was raised since the last `take`.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    /// Observe without consuming.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}
