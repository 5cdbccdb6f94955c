//! Session id allocation.

use std::sync::atomic::{AtomicU64, Ordering};

use tabletop_protocol::SessionId;

const COUNTER_BITS: u32 = 40;
const COUNTER_MASK: u64 = (1 << COUNTER_BITS) - 1;
const EPOCH_MASK: u64 = (1 << 24) - 1;

/// Hands out session ids that are never reused.
///
/// The upper 24 bits are a random per-process epoch and the lower 40 bits
/// a counter, so buttons left over from a previous run don't resolve to
/// a new game that happens to share an id.
#[derive(Debug)]
pub struct SessionIdGenerator {
    epoch: u64,
    next: AtomicU64,
}

impl SessionIdGenerator {
    /// A generator with a random epoch.
    pub fn new() -> Self {
        Self::with_epoch(rand::random::<u64>())
    }

    /// A generator with a fixed epoch; only the low 24 bits are used.
    pub fn with_epoch(epoch: u64) -> Self {
        Self {
            epoch: (epoch & EPOCH_MASK) << COUNTER_BITS,
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> SessionId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        SessionId(self.epoch | (n & COUNTER_MASK))
    }
}

impl Default for SessionIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
