use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_utils::Backoff;

use crate::log;
use crate::log::Event::*;
use crate::pool::{Job, TaskPool};

thread_local! {
    /// Set for the lifetime of a worker thread's `main_loop`; `None` on any
    /// other thread (the thread that called `search`, a thief from another
    /// pool, etc). Mirrors `rayon_core::registry::WorkerThread::current`.
    static CURRENT_WORKER: Cell<Option<usize>> = const { Cell::new(None) };
}

/// The current thread's worker index within whichever `Scheduler` most
/// recently entered `main_loop` on it, or `None` if this thread isn't a
/// worker.
pub fn current_worker() -> Option<usize> {
    CURRENT_WORKER.with(Cell::get)
}

const STEAL_RETRIES: u32 = 64;
const PARK_TIMEOUT: Duration = Duration::from_micros(500);

/// Runs `num_threads` worker threads against one `TaskPool` (spec.md §4.5).
/// Each worker repeatedly draws a task from its local pool slot; on a miss
/// it attempts to steal from peers with bounded retries and a spin-then-park
/// backoff; if that also fails it parks until woken by new work or a stop
/// broadcast.
pub struct Scheduler {
    pool: Arc<dyn TaskPool>,
    stop: Arc<AtomicBool>,
    wake: Arc<(Mutex<()>, Condvar)>,
    threads: Mutex<Vec<JoinHandle<()>>>,
}

impl Scheduler {
    /// `threadCount = OS threads - 1` by default, per spec.md §4.5 ("default:
    /// OS threads - 1"), floored at 1.
    pub fn default_thread_count() -> usize {
        let cpus = num_cpus::get();
        if cpus <= 1 {
            1
        } else {
            cpus - 1
        }
    }

    pub fn start(pool: Arc<dyn TaskPool>, num_threads: usize) -> Arc<Self> {
        let num_threads = num_threads.max(1);
        let stop = Arc::new(AtomicBool::new(false));
        let wake = Arc::new((Mutex::new(()), Condvar::new()));

        let mut threads = Vec::with_capacity(num_threads);
        for index in 0..num_threads {
            let pool = Arc::clone(&pool);
            let stop = Arc::clone(&stop);
            let wake = Arc::clone(&wake);
            threads.push(
                thread::Builder::new()
                    .name(format!("treeskel-worker-{index}"))
                    .spawn(move || main_loop(index, &*pool, &stop, &wake))
                    .expect("failed to spawn treeskel worker thread"),
            );
        }

        log::log(|| SchedulerStarted { threads: num_threads });

        Arc::new(Scheduler {
            pool,
            stop,
            wake,
            threads: Mutex::new(threads),
        })
    }

    /// Enqueue a task and wake any parked worker that might pick it up.
    /// Always goes through the scheduler (rather than the pool directly) so
    /// parked workers are reliably woken (spec.md §4.5 step 3).
    pub fn submit(&self, job: Job, depth: usize) {
        self.pool.add_work(current_worker(), job, depth);
        let (_lock, cvar) = &*self.wake;
        cvar.notify_all();
    }

    pub fn pool(&self) -> &Arc<dyn TaskPool> {
        &self.pool
    }

    /// `stopSchedulers` broadcast (spec.md §4.5 "Shutdown"): workers finish
    /// their current task and exit; no task is cancelled mid-expansion.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        let (_lock, cvar) = &*self.wake;
        cvar.notify_all();
        log::log(|| SchedulerStopped);
        for handle in self.threads.lock().unwrap().drain(..) {
            let _ = handle.join();
        }
    }
}

fn main_loop(index: usize, pool: &dyn TaskPool, stop: &AtomicBool, wake: &(Mutex<()>, Condvar)) {
    CURRENT_WORKER.with(|c| c.set(Some(index)));

    while !stop.load(Ordering::SeqCst) {
        if let Some(job) = pool.get_local(index) {
            log::log(|| TaskExecuted { worker: index });
            job();
            continue;
        }

        if let Some(job) = steal_with_backoff(index, pool, stop) {
            log::log(|| TaskExecuted { worker: index });
            job();
            continue;
        }

        if stop.load(Ordering::SeqCst) {
            break;
        }

        log::log(|| WorkerParked { worker: index });
        let (lock, cvar) = wake;
        let guard = lock.lock().unwrap();
        let _ = cvar.wait_timeout(guard, PARK_TIMEOUT).unwrap();
        log::log(|| WorkerWoke { worker: index });
    }

    CURRENT_WORKER.with(|c| c.set(None));
}

fn steal_with_backoff(index: usize, pool: &dyn TaskPool, stop: &AtomicBool) -> Option<Job> {
    let backoff = Backoff::new();
    for _ in 0..STEAL_RETRIES {
        if stop.load(Ordering::SeqCst) {
            return None;
        }
        if let Some(job) = pool.steal(index) {
            log::log(|| TaskStolen {
                thief: index,
                victim: usize::MAX,
            });
            return Some(job);
        }
        if backoff.is_completed() {
            break;
        }
        backoff.snooze();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Workpool;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn scheduler_executes_every_submitted_task() {
        let pool: Arc<dyn TaskPool> = Arc::new(Workpool::new(4, false));
        let scheduler = Scheduler::start(pool, 4);

        let executed = Arc::new(AtomicUsize::new(0));
        for _ in 0..200 {
            let executed = executed.clone();
            scheduler.submit(Box::new(move || {
                executed.fetch_add(1, Ordering::SeqCst);
            }), 0);
        }

        // Give the workers a moment to drain; a real caller would use a
        // CompletionLatch instead of sleeping (see skeleton engine tests).
        thread::sleep(Duration::from_millis(200));
        scheduler.stop();

        assert_eq!(executed.load(Ordering::SeqCst), 200);
    }

    #[test]
    fn default_thread_count_is_never_zero() {
        assert!(Scheduler::default_thread_count() >= 1);
    }
}
