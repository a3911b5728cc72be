use std::{
    collections::{HashSet, VecDeque},
    sync::{Mutex, MutexGuard, PoisonError},
};

pub const DEFAULT_DEDUP_CAPACITY: usize = 100;

/// Bounded recency window of message ids. Arrival order decides eviction:
/// once the window overflows, the oldest half is dropped.
pub struct DedupCache {
    capacity: usize,
    state: Mutex<DedupState>,
}

#[derive(Default)]
struct DedupState {
    order: VecDeque<String>,
    index: HashSet<String>,
}

impl DedupState {
    fn push(&mut self, id: &str, capacity: usize) {
        self.order.push_back(id.to_string());
        self.index.insert(id.to_string());

        if self.order.len() > capacity {
            let keep = self.order.len().div_ceil(2);
            let evict = self.order.len() - keep;
            self.order.drain(..evict);
            self.index = self.order.iter().cloned().collect();
        }
    }
}

impl Default for DedupCache {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_CAPACITY)
    }
}

impl DedupCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(DedupState::default()),
        }
    }

    // Index and order are only ever swapped in together, so a poisoned guard is still consistent.
    fn lock(&self) -> MutexGuard<'_, DedupState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, id: &str) {
        self.lock().push(id, self.capacity);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().index.contains(id)
    }

    /// Records `id` and returns `true` if it was not already present.
    /// Test and insert happen under one lock acquisition.
    pub fn check_and_add(&self, id: &str) -> bool {
        let mut state = self.lock();
        if state.index.contains(id) {
            return false;
        }
        state.push(id, self.capacity);
        true
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
