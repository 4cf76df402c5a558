//! Per-instance value cache with a dirty flag

use std::cell::Cell;

/// Memoized result of a constraint.
///
/// The stored value is only meaningful while `dirty` is false. Every
/// constraint starts dirty and is re-dirtied by its animation frame.
#[derive(Debug, Clone)]
pub(crate) struct ValueCache<T: Copy> {
    value: Cell<T>,
    dirty: Cell<bool>,
    computations: Cell<u64>,
}

impl<T: Copy> ValueCache<T> {
    pub(crate) fn new(initial: T) -> Self {
        Self {
            value: Cell::new(initial),
            dirty: Cell::new(true),
            computations: Cell::new(0),
        }
    }

    pub(crate) fn get(&self) -> T {
        self.value.get()
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub(crate) fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// Store a freshly computed value and clear the dirty flag
    pub(crate) fn store(&self, value: T) {
        self.value.set(value);
        self.dirty.set(false);
    }

    pub(crate) fn record_computation(&self) {
        self.computations.set(self.computations.get() + 1);
    }

    pub(crate) fn computations(&self) -> u64 {
        self.computations.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_dirty() {
        let cache = ValueCache::new(0.0f32);
        assert!(cache.is_dirty());
        cache.store(4.0);
        assert!(!cache.is_dirty());
        assert_eq!(cache.get(), 4.0);
        cache.mark_dirty();
        assert!(cache.is_dirty());
        assert_eq!(cache.get(), 4.0);
    }
}
