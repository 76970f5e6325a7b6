use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

/// Reference-counted completion latch standing in for the spec's
/// per-task promise (spec.md §4.7, Design Notes "promise-per-task
/// completion tree"): instead of a hand-wired future tree, every subtree
/// task holds an `Arc<CompletionLatch>` for its parent. Spawning a child
/// increments the count; the child decrements (and notifies) when it, and
/// everything it in turn spawned, has finished. A task's own completion is
/// therefore exactly "my own expansion finished AND every latch I handed to
/// my children reached zero" — the same join-on-scope-exit guarantee
/// structured concurrency gives for free.
pub struct CompletionLatch {
    pending: AtomicUsize,
    lock: Mutex<()>,
    cvar: Condvar,
}

impl CompletionLatch {
    pub fn new() -> Arc<Self> {
        Arc::new(CompletionLatch {
            pending: AtomicUsize::new(1),
            lock: Mutex::new(()),
            cvar: Condvar::new(),
        })
    }

    /// Register one more outstanding unit of work (a spawned child task).
    pub fn increment(&self) {
        self.pending.fetch_add(1, Ordering::AcqRel);
    }

    /// Signal that one unit of work (this task, or one of its children)
    /// has completed. When the count reaches zero, wakes any waiter.
    pub fn decrement(&self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            let _guard = self.lock.lock().unwrap();
            self.cvar.notify_all();
        }
    }

    pub fn is_set(&self) -> bool {
        self.pending.load(Ordering::Acquire) == 0
    }

    /// Block the calling thread until the count reaches zero.
    pub fn wait(&self) {
        let mut guard = self.lock.lock().unwrap();
        while !self.is_set() {
            guard = self.cvar.wait(guard).unwrap();
        }
    }
}
