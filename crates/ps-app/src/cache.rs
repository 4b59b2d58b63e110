//! Memoized pump evaluations with a bounded lifetime.
//!
//! Concurrent requests for the same key share one slot: the first caller
//! computes, the rest block on the slot until the value is ready.

use ps_engine::PumpOutcome;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// `(pump_code, duty signature, config signature)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub pump_code: String,
    pub duty: String,
    pub config: String,
}

impl CacheKey {
    pub fn new(
        pump_code: impl Into<String>,
        duty: impl Into<String>,
        config: impl Into<String>,
    ) -> Self {
        Self {
            pump_code: pump_code.into(),
            duty: duty.into(),
            config: config.into(),
        }
    }
}

#[derive(Debug)]
struct Slot {
    created: Instant,
    value: OnceLock<PumpOutcome>,
}

impl Slot {
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.created) >= ttl
    }
}

/// Whether a lookup was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Hit,
    Computed,
}

#[derive(Debug)]
pub struct EvaluationCache {
    ttl: Duration,
    slots: Mutex<HashMap<CacheKey, Arc<Slot>>>,
}

impl Default for EvaluationCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl EvaluationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<Slot>>> {
        // Slots are only inserted or removed under the lock, so the map is
        // consistent even if a holder panicked.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached outcome for `key`, computing it with `compute` when
    /// absent or expired.
    ///
    /// Inserting a new slot also evicts every expired slot, so the map never
    /// holds more than the entries created within one TTL.
    pub fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> (PumpOutcome, Lookup)
    where
        F: FnOnce() -> PumpOutcome,
    {
        let now = Instant::now();
        let slot = {
            let mut slots = self.slots();
            let live = slots
                .get(&key)
                .filter(|slot| !slot.is_expired(self.ttl, now))
                .cloned();
            match live {
                Some(slot) => slot,
                None => {
                    let before = slots.len();
                    slots.retain(|_, slot| !slot.is_expired(self.ttl, now));
                    let evicted = before - slots.len();
                    if evicted > 0 {
                        tracing::debug!(
                            evicted,
                            remaining = slots.len(),
                            "evicted expired evaluations"
                        );
                    }
                    let slot = Arc::new(Slot {
                        created: now,
                        value: OnceLock::new(),
                    });
                    slots.insert(key, Arc::clone(&slot));
                    slot
                }
            }
        };

        let mut computed = false;
        let value = slot.value.get_or_init(|| {
            computed = true;
            compute()
        });
        let lookup = if computed { Lookup::Computed } else { Lookup::Hit };
        (value.clone(), lookup)
    }

    /// Drop expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut slots = self.slots();
        let before = slots.len();
        slots.retain(|_, slot| !slot.is_expired(self.ttl, now));
        let removed = before - slots.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = slots.len(), "purged expired evaluations");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    pub fn clear(&self) {
        self.slots().clear();
    }
}
