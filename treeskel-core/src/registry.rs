use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use crate::log;
use crate::log::Event::*;

/// Process-wide state for one active search.
///
/// `Bound` is whatever scalar the caller's problem uses (often an integer,
/// but never assumed to be one of the fixed-width types `std::sync::atomic`
/// supports natively). `local_bound` is therefore a `Mutex<Bound>` whose
/// `update_bound` performs an explicit load-compare-store sequence under the
/// lock: this is the generic-`Bound` equivalent of the CAS loop the spec
/// describes, not a literal `compare_exchange`. `stop_search` and `counts`
/// use real atomics since their element types (`bool`, `u64`) are fixed.
pub struct Registry<Bound> {
    local_bound: Mutex<Bound>,
    stop_search: AtomicBool,
    counts: Vec<AtomicU64>,
}

impl<Bound: Clone> Registry<Bound> {
    /// `init`: `max_depth` sizes `counts` to `max_depth + 1`, indices
    /// `0..=max_depth` — always `+1`, regardless of mode, resolving the
    /// inconsistent sizing the original sources showed (see DESIGN.md).
    pub fn new(initial_bound: Bound, max_depth: usize) -> Self {
        let counts = (0..=max_depth).map(|_| AtomicU64::new(0)).collect();
        Registry {
            local_bound: Mutex::new(initial_bound),
            stop_search: AtomicBool::new(false),
            counts,
        }
    }

    /// `updateBound`: sets `local_bound` to `candidate` iff `better(candidate,
    /// local_bound)` holds. Idempotent and safe under concurrent callers
    /// since the whole read-modify-write happens under the lock.
    pub fn update_bound(&self, candidate: Bound, better: impl Fn(&Bound, &Bound) -> bool) {
        let mut guard = self.local_bound.lock().unwrap();
        if better(&candidate, &guard) {
            *guard = candidate;
            log::log(|| BoundUpdated {
                bound: String::new(),
            });
        }
    }

    pub fn local_bound(&self) -> Bound {
        self.local_bound.lock().unwrap().clone()
    }

    /// `setStop`: false -> true at most once is satisfied by `AtomicBool`
    /// being idempotent; repeated calls are equivalent to one (invariant 6,
    /// spec.md §8).
    pub fn set_stop(&self) {
        self.stop_search.store(true, Ordering::SeqCst);
        log::log(|| StopBroadcast);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_search.load(Ordering::SeqCst)
    }

    /// `updateCounts`: called at most once per completed subtree task, to
    /// amortise atomics, as specified.
    pub fn add_counts(&self, local: &[u64]) {
        for (slot, delta) in self.counts.iter().zip(local.iter()) {
            if *delta != 0 {
                slot.fetch_add(*delta, Ordering::Relaxed);
            }
        }
    }

    /// Snapshot of the per-depth node counts. Only meaningful once the
    /// search has reached quiescence.
    pub fn counts(&self) -> Vec<u64> {
        self.counts.iter().map(|c| c.load(Ordering::Relaxed)).collect()
    }

    pub fn max_depth(&self) -> usize {
        self.counts.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_sized_max_depth_plus_one() {
        let reg = Registry::new(0i64, 3);
        assert_eq!(reg.counts().len(), 4);
    }

    #[test]
    fn update_bound_is_monotone_under_maximise() {
        let reg = Registry::new(0i64, 0);
        let better = |new: &i64, cur: &i64| new > cur;
        reg.update_bound(5, better);
        assert_eq!(reg.local_bound(), 5);
        reg.update_bound(3, better);
        assert_eq!(reg.local_bound(), 5, "worse candidate must not regress the bound");
        reg.update_bound(9, better);
        assert_eq!(reg.local_bound(), 9);
    }

    #[test]
    fn stop_is_idempotent() {
        let reg = Registry::new(0i64, 0);
        assert!(!reg.is_stopped());
        reg.set_stop();
        reg.set_stop();
        assert!(reg.is_stopped());
    }

    #[test]
    fn add_counts_is_commutative_across_callers() {
        let reg = Registry::new(0i64, 2);
        reg.add_counts(&[1, 2, 3]);
        reg.add_counts(&[1, 0, 1]);
        assert_eq!(reg.counts(), vec![2, 2, 4]);
    }
}
