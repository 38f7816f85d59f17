use parking_lot::Mutex;
use std::time::{Duration, Instant};

struct Slot<T> {
    data: T,
    stored_at: Instant,
}

/// Single-slot cache with lazy expiry: an expired `get` clears the slot and
/// returns `None`. No background timer; expiry is only checked on read.
pub struct TtlCache<T> {
    slot: Mutex<Option<Slot<T>>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
        }
    }

    pub fn set(&self, data: T) {
        *self.slot.lock() = Some(Slot {
            data,
            stored_at: Instant::now(),
        });
    }

    /// Returns the cached value if it is still within its TTL, clearing the
    /// slot otherwise.
    pub fn get(&self) -> Option<T> {
        let mut slot = self.slot.lock();
        match &*slot {
            Some(s) if s.stored_at.elapsed() <= self.ttl => Some(s.data.clone()),
            Some(_) => {
                *slot = None;
                None
            }
            None => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.slot
            .lock()
            .as_ref()
            .is_some_and(|s| s.stored_at.elapsed() <= self.ttl)
    }

    pub fn clear(&self) {
        *self.slot.lock() = None;
    }
}
