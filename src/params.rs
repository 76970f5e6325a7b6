use treeskel_core::{DepthPool, Scheduler, TaskPool, Workpool};

use crate::error::{ConfigError, SearchError};

/// Which task-pool policy (spec.md §4.4) backs a `DepthBounded`/`BnB`
/// search. Mirrors how `ThreadPoolBuilder` lets the caller pick a spawn
/// strategy (breadth-first vs depth-first) without exposing the pool's
/// internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolPolicyKind {
    /// FIFO/LIFO deque (`Workpool`). `breadth_first` selects FIFO ordering
    /// for both the owner and thieves; `false` gives the classic LIFO-owner
    /// / FIFO-thief split.
    Workpool { breadth_first: bool },
    /// Depth-indexed array of queues (`DepthPool`): locals prefer deeper
    /// tasks, thieves prefer shallower ones.
    DepthPool,
}

impl Default for PoolPolicyKind {
    fn default() -> Self {
        PoolPolicyKind::DepthPool
    }
}

impl PoolPolicyKind {
    pub(crate) fn build(self, num_threads: usize) -> std::sync::Arc<dyn TaskPool> {
        match self {
            PoolPolicyKind::Workpool { breadth_first } => {
                std::sync::Arc::new(Workpool::new(num_threads, breadth_first))
            }
            PoolPolicyKind::DepthPool => std::sync::Arc::new(DepthPool::new(num_threads)),
        }
    }
}

/// Search parameters (spec.md §6): `spawn_depth` (depth at or below which
/// to spawn tasks), `max_depth` (inclusive depth bound, `0` = unlimited),
/// `initial_bound` (seed for `localBound`). Immutable after the search
/// starts and broadcast to every locality, per spec.md §3.
#[derive(Debug, Clone)]
pub struct Params<Bound> {
    pub spawn_depth: u32,
    pub max_depth: u32,
    pub initial_bound: Bound,
    pub num_threads: usize,
    pub pool_policy: PoolPolicyKind,
    /// The `PruneLevel` tag (spec.md §4.4/§4.6): once one child at a level
    /// is pruned, skip the rest of that level too, assuming the generator
    /// produces children in non-decreasing bound order. A runtime flag
    /// rather than a compile-time tag — it gates one `if` in the per-node
    /// decision table, not a whole code path, so monomorphising over it
    /// would only bloat the binary for no benefit.
    pub prune_level: bool,
}

impl<Bound> Params<Bound> {
    pub fn builder(initial_bound: Bound) -> ParamsBuilder<Bound> {
        ParamsBuilder::new(initial_bound)
    }
}

impl Params<()> {
    /// `CountNodes` carries no bound at all; this is just
    /// `Params::builder(())` spelled so call sites don't need the unit
    /// literal.
    pub fn counting() -> ParamsBuilder<()> {
        ParamsBuilder::new(())
    }
}

/// Builder with validate-at-build, mirroring `ThreadPoolBuilder`: invalid
/// configurations (spec.md §7.1) are surfaced before any task is spawned,
/// not discovered partway through a search.
#[derive(Debug, Clone)]
pub struct ParamsBuilder<Bound> {
    spawn_depth: u32,
    max_depth: u32,
    initial_bound: Bound,
    num_threads: Option<usize>,
    pool_policy: PoolPolicyKind,
    prune_level: bool,
}

impl<Bound> ParamsBuilder<Bound> {
    pub fn new(initial_bound: Bound) -> Self {
        ParamsBuilder {
            spawn_depth: 0,
            max_depth: 0,
            initial_bound,
            num_threads: None,
            pool_policy: PoolPolicyKind::default(),
            prune_level: false,
        }
    }

    pub fn spawn_depth(mut self, depth: u32) -> Self {
        self.spawn_depth = depth;
        self
    }

    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn num_threads(mut self, n: usize) -> Self {
        self.num_threads = Some(n);
        self
    }

    pub fn pool_policy(mut self, policy: PoolPolicyKind) -> Self {
        self.pool_policy = policy;
        self
    }

    pub fn prune_level(mut self, enabled: bool) -> Self {
        self.prune_level = enabled;
        self
    }

    pub fn build(self) -> Result<Params<Bound>, SearchError> {
        if self.max_depth != 0 && self.spawn_depth > self.max_depth {
            return Err(ConfigError::SpawnDepthExceedsMaxDepth {
                spawn_depth: self.spawn_depth,
                max_depth: self.max_depth,
            }
            .into());
        }
        let num_threads = self.num_threads.unwrap_or_else(Scheduler::default_thread_count);
        Ok(Params {
            spawn_depth: self.spawn_depth,
            max_depth: self.max_depth,
            initial_bound: self.initial_bound,
            num_threads,
            pool_policy: self.pool_policy,
            prune_level: self.prune_level,
        })
    }
}
