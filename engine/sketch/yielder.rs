use std::collections::HashMap;
use std::hash::Hash;

/// Hands control back to the runtime every `interval` units of work.
#[derive(Debug)]
pub struct Yielder {
    interval: usize,
    pending: usize,
    yields: u64,
}

impl Yielder {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            pending: 0,
            yields: 0,
        }
    }

    /// Marks one unit of work done. Must only be awaited between units.
    pub async fn tick(&mut self) {
        self.pending += 1;
        if self.pending >= self.interval {
            self.pending = 0;
            self.yields += 1;
            tokio::task::yield_now().await;
        }
    }

    pub fn yields(&self) -> u64 {
        self.yields
    }
}

/// Empties `map` at once, then releases its entries one at a time so large
/// maps don't stall the runtime.
pub async fn clear_gently<K: Eq + Hash, V>(map: &mut HashMap<K, V>, yielder: &mut Yielder) {
    let entries = std::mem::take(map);
    for entry in entries {
        drop(entry);
        yielder.tick().await;
    }
}
