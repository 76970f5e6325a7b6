use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_deque::{Injector, Steal, Stealer, Worker as Deque};

use super::{Job, TaskPool};

/// FIFO/LIFO deque-backed pool (spec.md §4.4 "Workpool"): each worker owns
/// one end of a `crossbeam_deque::Worker`, pushes/pops there, and thieves
/// steal from the other end via the matching `Stealer`. Jobs pushed from
/// outside any worker thread of this pool land in a shared `Injector`,
/// mirroring `rayon_core::registry::Registry::inject`.
pub struct Workpool {
    locals: Vec<Deque<Job>>,
    stealers: Vec<Stealer<Job>>,
    injector: Injector<Job>,
    rng_state: Vec<AtomicU64>,
}

impl Workpool {
    /// `breadth_first = true` gives every worker a FIFO deque (thieves and
    /// the owner both see oldest-first order); `false` gives LIFO, the
    /// classic work-stealing shape where the owner works depth-first on the
    /// task it just created while thieves still take the oldest (and
    /// usually biggest) subtrees from the far end.
    pub fn new(num_workers: usize, breadth_first: bool) -> Self {
        let locals: Vec<_> = (0..num_workers)
            .map(|_| if breadth_first { Deque::new_fifo() } else { Deque::new_lifo() })
            .collect();
        let stealers = locals.iter().map(Deque::stealer).collect();
        let rng_state = (0..num_workers)
            .map(|i| AtomicU64::new(seed_for(i)))
            .collect();
        Workpool {
            locals,
            stealers,
            injector: Injector::new(),
            rng_state,
        }
    }

    fn next_victim(&self, worker: usize) -> usize {
        let n = self.stealers.len();
        let mut x = self.rng_state[worker].load(Ordering::Relaxed);
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state[worker].store(x, Ordering::Relaxed);
        (x as usize) % n.max(1)
    }
}

fn seed_for(worker: usize) -> u64 {
    // Any non-zero seed works for xorshift; mix in the worker index so
    // sibling workers don't all pick the same steal order.
    0x9E37_79B9_7F4A_7C15u64 ^ ((worker as u64).wrapping_add(1).wrapping_mul(0x2545_F491_4F6C_DD1D))
}

impl TaskPool for Workpool {
    fn add_work(&self, worker: Option<usize>, job: Job, _depth: usize) {
        match worker {
            Some(w) => self.locals[w].push(job),
            None => self.injector.push(job),
        }
    }

    fn get_local(&self, worker: usize) -> Option<Job> {
        self.locals[worker].pop().or_else(|| loop {
            match self.injector.steal() {
                Steal::Success(job) => return Some(job),
                Steal::Empty => return None,
                Steal::Retry => continue,
            }
        })
    }

    fn steal(&self, worker: usize) -> Option<Job> {
        if self.stealers.len() <= 1 {
            return None;
        }
        let start = self.next_victim(worker);
        let n = self.stealers.len();
        (start..n)
            .chain(0..start)
            .filter(|&i| i != worker)
            .find_map(|victim| loop {
                match self.stealers[victim].steal() {
                    Steal::Success(job) => return Some(job),
                    Steal::Empty => return None,
                    Steal::Retry => continue,
                }
            })
    }

    fn num_workers(&self) -> usize {
        self.locals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_push_pop_round_trips() {
        let pool = Workpool::new(2, false);
        pool.add_work(Some(0), Box::new(|| {}), 0);
        assert!(pool.get_local(0).is_some());
        assert!(pool.get_local(0).is_none());
    }

    #[test]
    fn injected_work_is_visible_to_any_worker() {
        let pool = Workpool::new(2, false);
        pool.add_work(None, Box::new(|| {}), 0);
        assert!(pool.get_local(1).is_some());
    }

    #[test]
    fn steal_finds_work_pushed_by_a_peer() {
        let pool = Workpool::new(2, false);
        pool.add_work(Some(0), Box::new(|| {}), 0);
        assert!(pool.steal(1).is_some());
    }

    #[test]
    fn steal_returns_none_with_a_single_worker() {
        let pool = Workpool::new(1, false);
        assert!(pool.steal(0).is_none());
    }
}
