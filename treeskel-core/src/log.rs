//! Minimal internal event logging, gated by the `TREESKEL_LOG` environment
//! variable. Mirrors `rayon-core`'s own internal `log` module: the logging
//! path compiles unconditionally but only prints once the env var is set, so
//! there is no `log`/`tracing` dependency to pull in for a debugging
//! facility the teacher itself hand-rolls.

use std::sync::OnceLock;

fn enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var_os("TREESKEL_LOG").is_some())
}

#[derive(Debug)]
pub enum Event {
    TaskSpawned { worker: usize, depth: usize },
    TaskStolen { thief: usize, victim: usize },
    TaskExecuted { worker: usize },
    BoundUpdated { bound: String },
    IncumbentAccepted { bound: String },
    StopBroadcast,
    WorkerParked { worker: usize },
    WorkerWoke { worker: usize },
    SchedulerStarted { threads: usize },
    SchedulerStopped,
}

/// Call-site macro-free logger: takes a closure so that building the `Event`
/// (which may format a `Bound`) is skipped entirely when logging is off.
#[inline]
pub fn log(event: impl FnOnce() -> Event) {
    if enabled() {
        eprintln!("[treeskel] {:?}", event());
    }
}
