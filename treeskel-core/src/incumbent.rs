use std::sync::{Arc, Mutex};

use crate::log;
use crate::log::Event::*;
use crate::transport::ClusterTransport;

/// Single object owning the current best-known candidate. `C` is the
/// caller's `(Solution, Bound, Candidate)` triple (or whatever shape the
/// facade wraps it in); `Bound` is the scalar projected out of it for
/// broadcast. Centralising the incumbent behind one mutex gives a single
/// linearisation point (spec.md §4.3): concurrent `propose` calls are
/// serialised, and only the scalar bound — not the whole candidate — is
/// broadcast to every locality's registry, keeping the pruning fast path
/// local.
pub struct Incumbent<C, Bound> {
    current: Mutex<C>,
    better: Box<dyn Fn(&C, &C) -> bool + Send + Sync>,
    bound_of: Box<dyn Fn(&C) -> Bound + Send + Sync>,
    transport: Arc<dyn ClusterTransport<Bound>>,
}

impl<C: Clone, Bound: Clone> Incumbent<C, Bound> {
    pub fn new(
        initial: C,
        better: impl Fn(&C, &C) -> bool + Send + Sync + 'static,
        bound_of: impl Fn(&C) -> Bound + Send + Sync + 'static,
        transport: Arc<dyn ClusterTransport<Bound>>,
    ) -> Self {
        Incumbent {
            current: Mutex::new(initial),
            better: Box::new(better),
            bound_of: Box::new(bound_of),
            transport,
        }
    }

    /// `propose`: replaces `current` iff `better(candidate, current)` holds,
    /// then broadcasts the new bound. Otherwise a no-op. Returns whether the
    /// candidate was accepted, so callers can decide whether to also update
    /// their own `localBound` cache immediately rather than waiting on the
    /// broadcast round-trip.
    pub fn propose(&self, candidate: C) -> bool {
        let mut guard = self.current.lock().unwrap();
        if (self.better)(&candidate, &guard) {
            let bound = (self.bound_of)(&candidate);
            *guard = candidate;
            drop(guard);
            log::log(|| IncumbentAccepted {
                bound: String::new(),
            });
            self.transport.broadcast_bound(bound);
            true
        } else {
            false
        }
    }

    pub fn get(&self) -> C {
        self.current.lock().unwrap().clone()
    }
}
