use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use treeskel_core::{CompletionLatch, Incumbent, LocalTransport, Registry, Scheduler};

use crate::error::{ConfigError, SearchError, SearchResult};
use crate::generator::{BoundFunction, Candidate, Generator, ObjectiveComparison};
use crate::params::Params;
use crate::skeleton::process_node::{process_node, ProcessNodeOutcome};

/// Result of a `decide` search: either the first candidate meeting the
/// caller's target, or confirmation the whole tree (up to `max_depth`) was
/// exhausted without one (spec.md §7's "not found" is normal termination,
/// not an error).
pub enum Decision<Node> {
    Found(Node),
    NotFound,
}

/// Parallel, spawn-depth-bounded skeleton (spec.md §4.6.2, §6:
/// `DepthBounded<Generator, Tags...>`). Below `params.spawn_depth` every
/// child becomes its own scheduler task; at or past it, expansion continues
/// inline on the worker that reached that depth — `Seq`'s recursion, run as
/// the tail of a `DepthBounded` task instead of from `main`.
pub struct DepthBounded<G>(PhantomData<G>);

impl<Space, Node, G> DepthBounded<G>
where
    G: Generator<Space, Node> + 'static,
    Space: Send + Sync + 'static,
    Node: Clone + Send + 'static,
{
    /// `CountNodes`: no registry, no incumbent, just per-depth counters
    /// merged into one `Registry<()>` at each subtree task's completion
    /// (spec.md §4.2 "updateCounts ... at most once per completed subtree
    /// task").
    pub fn count_nodes(space: Arc<Space>, root: Node, params: &Params<()>) -> SearchResult<Vec<u64>> {
        if params.max_depth == 0 {
            return Err(ConfigError::MaxDepthRequiredForRegistry.into());
        }
        let registry = Arc::new(Registry::new((), params.max_depth as usize));
        let pool = params.pool_policy.build(params.num_threads);
        let scheduler = Scheduler::start(pool, params.num_threads);
        let latch = CompletionLatch::new();

        count_expand(
            Arc::clone(&space),
            root,
            0,
            params.spawn_depth,
            params.max_depth,
            Arc::clone(&registry),
            Arc::clone(&scheduler),
            Arc::clone(&latch),
        )?;

        latch.decrement();
        latch.wait();
        scheduler.stop();

        Ok(registry.counts())
    }

    /// `Optimisation`: returns the best candidate found (or the caller's
    /// `initial_bound`'s owner if nothing ever improved on it — callers seed
    /// `initial` accordingly; see `optimise`'s `initial` parameter).
    pub fn optimise<BF, Obj, Bound>(
        space: Arc<Space>,
        root: Node,
        initial: Node,
        params: &Params<Bound>,
    ) -> SearchResult<Node>
    where
        BF: BoundFunction<Space, Node, Bound> + 'static,
        Obj: ObjectiveComparison<Bound> + 'static,
        Node: Candidate<Bound>,
        Bound: Clone + Send + Sync + 'static,
    {
        if params.max_depth == 0 {
            return Err(ConfigError::MaxDepthRequiredForRegistry.into());
        }
        let registry = Arc::new(Registry::new(params.initial_bound.clone(), params.max_depth as usize));
        let transport = Arc::new(LocalTransport::single(Arc::clone(&registry), Obj::better));
        let incumbent = Arc::new(make_incumbent::<Node, Obj, Bound>(initial, transport));

        run_search::<Space, Node, G, BF, Obj, Bound>(space, root, params, registry, incumbent.clone(), false, None)?;

        Ok(incumbent.get())
    }

    /// `Decision`: stops the whole search as soon as any worker accepts a
    /// candidate for which `target` holds, via `Registry::set_stop` /
    /// `ClusterTransport::broadcast_stop` (spec.md §4.6.1).
    pub fn decide<BF, Obj, Bound>(
        space: Arc<Space>,
        root: Node,
        initial: Node,
        params: &Params<Bound>,
        target: impl Fn(&Bound) -> bool + Send + Sync + 'static,
    ) -> SearchResult<Decision<Node>>
    where
        BF: BoundFunction<Space, Node, Bound> + 'static,
        Obj: ObjectiveComparison<Bound> + 'static,
        Node: Candidate<Bound>,
        Bound: Clone + Send + Sync + 'static,
    {
        if params.max_depth == 0 {
            return Err(ConfigError::MaxDepthRequiredForRegistry.into());
        }
        let registry = Arc::new(Registry::new(params.initial_bound.clone(), params.max_depth as usize));
        let transport = Arc::new(LocalTransport::single(Arc::clone(&registry), Obj::better));
        let incumbent = Arc::new(make_incumbent::<Node, Obj, Bound>(initial, transport));

        let found = Arc::new(Mutex::new(false));
        run_search::<Space, Node, G, BF, Obj, Bound>(
            space,
            root,
            params,
            Arc::clone(&registry),
            Arc::clone(&incumbent),
            true,
            Some((Arc::new(target), Arc::clone(&found), Arc::clone(&registry))),
        )?;

        if *found.lock().unwrap() {
            Ok(Decision::Found(incumbent.get()))
        } else {
            Ok(Decision::NotFound)
        }
    }
}

/// `Incumbent` compares two full candidates (`Node`s) and needs `Node ->
/// Bound` with no `Space` parameter at all — unlike `BoundFunction::ubound`
/// (a relaxation that needs `Space` to estimate what's still reachable),
/// each candidate's own achieved value is self-contained
/// ([`Candidate::achieved`]), so no `Space`/`BoundFunction` capture is
/// needed here at all (spec.md's `Sol/Bnd/Cand` triple collapses to the
/// single `Node` type in this reimplementation; see DESIGN.md).
fn make_incumbent<Node, Obj, Bound>(initial: Node, transport: Arc<LocalTransport<Bound>>) -> Incumbent<Node, Bound>
where
    Node: Candidate<Bound> + Clone + Send + 'static,
    Obj: ObjectiveComparison<Bound> + 'static,
    Bound: Clone + Send + Sync + 'static,
{
    let better = move |new: &Node, cur: &Node| Obj::better(&new.achieved(), &cur.achieved());
    let bound_of = move |n: &Node| n.achieved();
    Incumbent::new(initial, better, bound_of, transport)
}

#[allow(clippy::too_many_arguments)]
fn run_search<Space, Node, G, BF, Obj, Bound>(
    space: Arc<Space>,
    root: Node,
    params: &Params<Bound>,
    registry: Arc<Registry<Bound>>,
    incumbent: Arc<Incumbent<Node, Bound>>,
    decision_mode: bool,
    target: Option<(Arc<dyn Fn(&Bound) -> bool + Send + Sync>, Arc<Mutex<bool>>, Arc<Registry<Bound>>)>,
) -> SearchResult<()>
where
    G: Generator<Space, Node> + 'static,
    Space: Send + Sync + 'static,
    Node: Clone + Send + Candidate<Bound> + 'static,
    BF: BoundFunction<Space, Node, Bound> + 'static,
    Obj: ObjectiveComparison<Bound> + 'static,
    Bound: Clone + Send + Sync + 'static,
{
    let pool = params.pool_policy.build(params.num_threads);
    let scheduler = Scheduler::start(pool, params.num_threads);
    let latch = CompletionLatch::new();
    let prune_level = params.prune_level;

    let outcome = opt_expand::<Space, Node, G, BF, Obj, Bound>(
        Arc::clone(&space),
        root,
        0,
        params.spawn_depth,
        params.max_depth,
        Arc::clone(&registry),
        Arc::clone(&incumbent),
        Arc::clone(&scheduler),
        Arc::clone(&latch),
        decision_mode,
        prune_level,
        target.clone(),
    );

    latch.decrement();
    latch.wait();
    scheduler.stop();

    if let Err(payload) = outcome {
        return Err(SearchError::UserCode(payload));
    }
    Ok(())
}

/// Entry point for one subtree task: accumulates counts for every node it
/// touches inline (not including nodes handed off to further spawned
/// tasks, which report their own counts the same way) into a local buffer,
/// merging into the shared registry exactly once at the end (spec.md §4.2:
/// "updateCounts ... at most once per completed subtree task").
#[allow(clippy::too_many_arguments)]
fn count_expand<Space, Node, G>(
    space: Arc<Space>,
    node: Node,
    depth: u32,
    spawn_depth: u32,
    max_depth: u32,
    registry: Arc<Registry<()>>,
    scheduler: Arc<Scheduler>,
    latch: Arc<CompletionLatch>,
) -> SearchResult<()>
where
    G: Generator<Space, Node> + 'static,
    Space: Send + Sync + 'static,
    Node: Clone + Send + 'static,
{
    let mut local = vec![0u64; registry.max_depth() + 1];
    count_expand_inline::<Space, Node, G>(&space, node, depth, spawn_depth, max_depth, &mut local, &registry, &scheduler, &latch)?;
    registry.add_counts(&local);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn count_expand_inline<Space, Node, G>(
    space: &Arc<Space>,
    node: Node,
    depth: u32,
    spawn_depth: u32,
    max_depth: u32,
    local: &mut Vec<u64>,
    registry: &Arc<Registry<()>>,
    scheduler: &Arc<Scheduler>,
    latch: &Arc<CompletionLatch>,
) -> SearchResult<()>
where
    G: Generator<Space, Node> + 'static,
    Space: Send + Sync + 'static,
    Node: Clone + Send + 'static,
{
    let depth_idx = depth as usize;
    if depth_idx < local.len() {
        local[depth_idx] += 1;
    }

    if max_depth != 0 && depth >= max_depth {
        return Ok(());
    }

    let result = treeskel_core::unwind::catch_user_code(|| {
        let mut generator = G::new(space, &node);
        let n = generator.num_children();
        let mut children = Vec::with_capacity(n as usize);
        for _ in 0..n {
            children.push(generator.next());
        }
        children
    });

    let children = result.map_err(SearchError::UserCode)?;

    for child in children {
        if depth < spawn_depth {
            latch.increment();
            let space = Arc::clone(space);
            let registry = Arc::clone(registry);
            let scheduler_for_task = Arc::clone(scheduler);
            let latch_for_task = Arc::clone(latch);
            let job: treeskel_core::Job = Box::new(move || {
                let _ = count_expand::<Space, Node, G>(space, child, depth + 1, spawn_depth, max_depth, registry, scheduler_for_task, latch_for_task.clone());
                latch_for_task.decrement();
            });
            scheduler.submit(job, (depth + 1) as usize);
        } else {
            count_expand_inline::<Space, Node, G>(space, child, depth + 1, spawn_depth, max_depth, local, registry, scheduler, latch)?;
        }
    }

    Ok(())
}

type DecisionTarget<Bound> = (Arc<dyn Fn(&Bound) -> bool + Send + Sync>, Arc<Mutex<bool>>, Arc<Registry<Bound>>);

#[allow(clippy::too_many_arguments)]
fn opt_expand<Space, Node, G, BF, Obj, Bound>(
    space: Arc<Space>,
    node: Node,
    depth: u32,
    spawn_depth: u32,
    max_depth: u32,
    registry: Arc<Registry<Bound>>,
    incumbent: Arc<Incumbent<Node, Bound>>,
    scheduler: Arc<Scheduler>,
    latch: Arc<CompletionLatch>,
    decision_mode: bool,
    prune_level: bool,
    target: Option<DecisionTarget<Bound>>,
) -> Result<(), Box<dyn std::any::Any + Send + 'static>>
where
    G: Generator<Space, Node> + 'static,
    Space: Send + Sync + 'static,
    Node: Clone + Send + Candidate<Bound> + 'static,
    BF: BoundFunction<Space, Node, Bound> + 'static,
    Obj: ObjectiveComparison<Bound> + 'static,
    Bound: Clone + Send + Sync + 'static,
{
    if max_depth != 0 && depth >= max_depth {
        return Ok(());
    }
    if decision_mode && registry.is_stopped() {
        return Ok(());
    }

    let children = treeskel_core::unwind::catch_user_code(|| {
        let mut generator = G::new(&space, &node);
        let n = generator.num_children();
        let mut children = Vec::with_capacity(n as usize);
        for _ in 0..n {
            children.push(generator.next());
        }
        children
    })?;

    for child in children {
        if decision_mode && registry.is_stopped() {
            break;
        }

        let result = process_node::<Space, Node, Bound, BF, Obj>(&registry, &incumbent, &space, &child, decision_mode, prune_level);

        match result.outcome {
            ProcessNodeOutcome::Exit => break,
            ProcessNodeOutcome::Break => break,
            ProcessNodeOutcome::Prune => continue,
            ProcessNodeOutcome::Continue => {}
        }

        if decision_mode && result.accepted {
            if let Some((target_fn, found, registry_for_stop)) = &target {
                if target_fn(&result.bound) {
                    *found.lock().unwrap() = true;
                    registry_for_stop.set_stop();
                    break;
                }
            }
        }

        if depth < spawn_depth {
            latch.increment();
            let space = Arc::clone(&space);
            let registry = Arc::clone(&registry);
            let incumbent = Arc::clone(&incumbent);
            let scheduler_for_task = Arc::clone(&scheduler);
            let latch_for_task = Arc::clone(&latch);
            let target = target.clone();
            let job: treeskel_core::Job = Box::new(move || {
                let _ = opt_expand::<Space, Node, G, BF, Obj, Bound>(
                    space,
                    child,
                    depth + 1,
                    spawn_depth,
                    max_depth,
                    registry,
                    incumbent,
                    Arc::clone(&scheduler_for_task),
                    latch_for_task.clone(),
                    decision_mode,
                    prune_level,
                    target,
                );
                latch_for_task.decrement();
            });
            scheduler.submit(job, (depth + 1) as usize);
        } else {
            opt_expand::<Space, Node, G, BF, Obj, Bound>(
                Arc::clone(&space),
                child,
                depth + 1,
                spawn_depth,
                max_depth,
                Arc::clone(&registry),
                Arc::clone(&incumbent),
                Arc::clone(&scheduler),
                Arc::clone(&latch),
                decision_mode,
                prune_level,
                target.clone(),
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Maximise;
    use crate::params::Params;

    #[derive(Clone)]
    struct Node {
        depth: u32,
        value: i64,
    }

    struct TreeGen {
        child_depth: u32,
        remaining: u32,
        base_value: i64,
    }

    impl Generator<u32, Node> for TreeGen {
        fn new(max_depth: &u32, node: &Node) -> Self {
            let has_children = node.depth < *max_depth;
            TreeGen {
                child_depth: node.depth + 1,
                remaining: if has_children { 2 } else { 0 },
                base_value: node.value,
            }
        }
        fn num_children(&self) -> u32 {
            self.remaining
        }
        fn next(&mut self) -> Node {
            self.remaining -= 1;
            Node {
                depth: self.child_depth,
                value: self.base_value + self.remaining as i64 + 1,
            }
        }
    }

    struct ValueBound;
    impl BoundFunction<u32, Node, i64> for ValueBound {
        fn ubound(_space: &u32, node: &Node) -> i64 {
            node.value
        }
    }

    impl Candidate<i64> for Node {
        fn achieved(&self) -> i64 {
            self.value
        }
    }

    #[test]
    fn count_nodes_matches_sequential_count_on_a_complete_tree() {
        let space = Arc::new(3u32);
        let root = Node { depth: 0, value: 0 };
        let params = Params::counting().spawn_depth(1).max_depth(3).num_threads(2).build().unwrap();

        let counts = DepthBounded::<TreeGen>::count_nodes(space, root, &params).unwrap();
        assert_eq!(&counts[0..4], &[1, 2, 4, 8]);
    }

    #[test]
    fn optimise_finds_the_highest_value_leaf() {
        let space = Arc::new(3u32);
        let root = Node { depth: 0, value: 0 };
        let initial = Node { depth: 0, value: i64::MIN };
        let params = Params::builder(i64::MIN).spawn_depth(1).max_depth(3).num_threads(2).build().unwrap();

        let best = DepthBounded::<TreeGen>::optimise::<ValueBound, Maximise, i64>(space, root, initial, &params).unwrap();
        assert!(best.value >= 3);
    }
}
