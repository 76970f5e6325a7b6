use std::sync::Arc;

use crate::registry::Registry;

/// Abstraction over "tell every locality about this". The spec's source
/// runtime makes `hpx::lcos::broadcast<action>(localities, args)` trivial;
/// this trait is the stand-in the Design Notes call for, so a future
/// networked implementation is a matter of implementing the trait rather
/// than restructuring the registry/incumbent/scheduler.
///
/// `LocalTransport` is the single-process implementation: every "locality"
/// lives in this address space, so broadcast is just a loop over local
/// `Registry` handles. This is the implementation the spec explicitly
/// allows as "sufficient for property checks" (spec.md §9), and it's the
/// only one shipped here: no distributed-runtime crate in this codebase's
/// dependency pack offers an idiomatic Rust equivalent of the original's
/// cluster runtime, and fabricating one would just be a fake dependency.
pub trait ClusterTransport<Bound>: Send + Sync {
    /// Broadcast an improved bound to every locality's registry.
    fn broadcast_bound(&self, bound: Bound);

    /// Broadcast a stop-search request to every locality's registry.
    fn broadcast_stop(&self);

    /// How many localities this transport addresses.
    fn num_localities(&self) -> usize;
}

pub struct LocalTransport<Bound> {
    registries: Vec<Arc<Registry<Bound>>>,
    better: Box<dyn Fn(&Bound, &Bound) -> bool + Send + Sync>,
}

impl<Bound> LocalTransport<Bound> {
    pub fn new(
        registries: Vec<Arc<Registry<Bound>>>,
        better: impl Fn(&Bound, &Bound) -> bool + Send + Sync + 'static,
    ) -> Self {
        LocalTransport {
            registries,
            better: Box::new(better),
        }
    }

    pub fn single(registry: Arc<Registry<Bound>>, better: impl Fn(&Bound, &Bound) -> bool + Send + Sync + 'static) -> Self {
        Self::new(vec![registry], better)
    }
}

impl<Bound: Clone + Send + Sync> ClusterTransport<Bound> for LocalTransport<Bound> {
    fn broadcast_bound(&self, bound: Bound) {
        for reg in &self.registries {
            reg.update_bound(bound.clone(), &self.better);
        }
    }

    fn broadcast_stop(&self) {
        for reg in &self.registries {
            reg.set_stop();
        }
    }

    fn num_localities(&self) -> usize {
        self.registries.len()
    }
}
