//! Per-(account, date) serialization of state transitions.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Key = (String, NaiveDate);

#[derive(Default)]
pub struct KeyedLocks {
    slots: Mutex<HashMap<Key, Arc<AsyncMutex<()>>>>,
}

/// Held for the whole transition. Dropping it releases the key.
pub struct DayGuard {
    _guard: OwnedMutexGuard<()>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other request holds (account, date).
    pub async fn acquire(&self, account: &str, date: NaiveDate) -> DayGuard {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            // Slots nobody else references are idle; drop them so the map stays small.
            slots.retain(|_, m| Arc::strong_count(m) > 1);
            slots
                .entry((account.to_string(), date))
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        DayGuard {
            _guard: slot.lock_owned().await,
        }
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
