use std::collections::VecDeque;
use std::sync::Mutex;

use super::{Job, TaskPool};

/// Depth-indexed pool (spec.md §4.4 "DepthPool"): one queue per spawn depth,
/// indexed by `depth - 1` (spawn depths start at 1; see
/// `treeskel::skeleton::depth_bounded`). `get_local` prefers the deepest
/// non-empty queue (DFS-like locality: finish what's closest to a leaf
/// before reaching back for shallower work); `steal` prefers the shallowest
/// non-empty queue (classic "steal big, execute small" — a shallower
/// subtree task represents, on average, a larger unexplored subtree, so
/// it's the better steal payoff).
///
/// Depths aren't known ahead of time (they only run up to `spawn_depth`,
/// which is a runtime parameter), so the per-depth queues live behind a
/// single mutex-guarded `Vec` that grows on first use of a new depth rather
/// than being preallocated to a fixed bound.
pub struct DepthPool {
    queues: Mutex<Vec<VecDeque<Job>>>,
    num_workers: usize,
}

impl DepthPool {
    pub fn new(num_workers: usize) -> Self {
        DepthPool {
            queues: Mutex::new(Vec::new()),
            num_workers,
        }
    }

    fn index(depth: usize) -> usize {
        depth.saturating_sub(1)
    }
}

impl TaskPool for DepthPool {
    fn add_work(&self, _worker: Option<usize>, job: Job, depth: usize) {
        let idx = Self::index(depth);
        let mut queues = self.queues.lock().unwrap();
        if queues.len() <= idx {
            queues.resize_with(idx + 1, VecDeque::new);
        }
        queues[idx].push_back(job);
    }

    fn get_local(&self, _worker: usize) -> Option<Job> {
        let mut queues = self.queues.lock().unwrap();
        queues.iter_mut().rev().find_map(VecDeque::pop_back)
    }

    fn steal(&self, _worker: usize) -> Option<Job> {
        let mut queues = self.queues.lock().unwrap();
        queues.iter_mut().find_map(VecDeque::pop_front)
    }

    fn num_workers(&self) -> usize {
        self.num_workers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn marker(counter: &Arc<AtomicUsize>, tag: usize) -> Job {
        let counter = counter.clone();
        Box::new(move || {
            counter.store(tag, Ordering::SeqCst);
        })
    }

    #[test]
    fn get_local_prefers_the_deepest_queue() {
        let pool = DepthPool::new(1);
        let counter = Arc::new(AtomicUsize::new(0));
        pool.add_work(None, marker(&counter, 1), 1);
        pool.add_work(None, marker(&counter, 3), 3);
        pool.add_work(None, marker(&counter, 2), 2);

        let job = pool.get_local(0).unwrap();
        job();
        assert_eq!(counter.load(Ordering::SeqCst), 3, "deepest non-empty queue should be served first");
    }

    #[test]
    fn steal_prefers_the_shallowest_queue() {
        let pool = DepthPool::new(1);
        let counter = Arc::new(AtomicUsize::new(0));
        pool.add_work(None, marker(&counter, 1), 1);
        pool.add_work(None, marker(&counter, 3), 3);
        pool.add_work(None, marker(&counter, 2), 2);

        let job = pool.steal(0).unwrap();
        job();
        assert_eq!(counter.load(Ordering::SeqCst), 1, "shallowest non-empty queue should be stolen first");
    }

    #[test]
    fn unknown_depth_grows_the_queue_array_lazily() {
        let pool = DepthPool::new(1);
        pool.add_work(None, Box::new(|| {}), 50);
        assert!(pool.get_local(0).is_some());
    }
}
