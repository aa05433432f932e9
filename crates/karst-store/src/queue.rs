use std::sync::Mutex;

use karst_world::ChunkCoord;

/// Queue storage never shrinks below this many slots.
const FLOOR_CAPACITY: usize = 64;

/// Unordered bag of chunk coordinates awaiting generation and meshing.
/// One mutex guards push, pop, and resize. Capacity doubles on overflow and
/// halves once occupancy drops under half, amortizing allocation churn.
/// Duplicate coordinates are tolerated; the chunk state machine makes a
/// redundant dispatch a no-op.
pub struct WorkQueue {
    items: Mutex<Vec<ChunkCoord>>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Append a coordinate. False when the backing storage cannot grow; the
    /// caller must not leave a store entry that depends on this push.
    pub fn push(&self, coord: ChunkCoord) -> bool {
        let Ok(mut items) = self.items.lock() else {
            return false;
        };
        if items.len() == items.capacity() {
            let target = (items.capacity() * 2).max(FLOOR_CAPACITY);
            let additional = target - items.len();
            if items.try_reserve_exact(additional).is_err() {
                return false;
            }
        }
        items.push(coord);
        true
    }

    /// Remove and return the queued coordinate with the smallest squared
    /// distance to `centre`. A linear scan is fine here: the queue stays
    /// short relative to the cost of generating one chunk.
    pub fn pop_nearest(&self, centre: ChunkCoord) -> Option<ChunkCoord> {
        let Ok(mut items) = self.items.lock() else {
            return None;
        };
        let best = items
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| centre.distance_sq(**c))
            .map(|(i, _)| i)?;
        let coord = items.swap_remove(best);
        if items.capacity() > FLOOR_CAPACITY && items.len() < items.capacity() / 2 {
            let target = (items.capacity() / 2).max(FLOOR_CAPACITY);
            items.shrink_to(target);
        }
        Some(coord)
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.items.lock().map(|v| v.capacity()).unwrap_or(0)
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}
