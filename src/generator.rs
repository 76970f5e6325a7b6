/// External contract (spec.md §4.1/§6): constructed from `(&Space, &Node)`,
/// exposes `num_children` eagerly and `next()` callable exactly that many
/// times, in Generator iteration order, each call producing the next child.
/// Not restartable — after `num_children` calls to `next()` a `Generator` is
/// discarded; the engine creates one per expansion frame and never reuses
/// it. Doesn't need to be `Send`/`Sync`: the engine owns exactly one per
/// expansion and never shares it across threads.
pub trait Generator<Space, Node>: Sized {
    fn new(space: &Space, node: &Node) -> Self;
    fn num_children(&self) -> u32;
    fn next(&mut self) -> Node;
}

/// `(space, node) -> Bound`. Pure: no side effects, may be called
/// concurrently by many worker threads (spec.md §6). This is a
/// *relaxation*: an optimistic estimate of what the subtree rooted at
/// `node` could still achieve, used only to decide whether that subtree is
/// still worth exploring. It is not the node's own achieved value — see
/// [`Candidate::achieved`].
pub trait BoundFunction<Space, Node, Bound> {
    fn ubound(space: &Space, node: &Node) -> Bound;
}

/// The node's own achieved objective value: the `Bnd` component of
/// spec.md's `Sol/Bnd/Cand` triple, carried by the node itself rather than
/// derived from `Space`. Distinct from [`BoundFunction::ubound`]: `ubound`
/// is a relaxation that gates pruning (is this subtree still worth
/// exploring?), `achieved` is the real value of *this* candidate and gates
/// the incumbent update (does this candidate actually improve on the best
/// one found so far?). Conflating the two lets an ancestor's optimistic
/// relaxation get written into `local_bound` and prune away the true
/// optimum before it is ever visited.
pub trait Candidate<Bound> {
    fn achieved(&self) -> Bound;
}

/// No bounding at all: `Optimisation`/`Decision` modes require a real
/// `BoundFunction`, but `CountNodes` mode is parameterised over the same
/// type family and needs *some* default to satisfy the trait bounds. This
/// type is never called — `process_node` only invokes `Bound::ubound` when
/// a `BoundFunction` tag is actually selected.
pub struct NoBound;

impl<Space, Node> BoundFunction<Space, Node, ()> for NoBound {
    fn ubound(_space: &Space, _node: &Node) -> () {}
}

/// Orders two candidate bounds, the `Objcmp` of spec.md §4.6 (default:
/// `>`, i.e. maximise).
pub trait ObjectiveComparison<Bound> {
    /// `true` iff `new` should replace `current`.
    fn better(new: &Bound, current: &Bound) -> bool;
}

/// Default comparator: maximise.
pub struct Maximise;

impl<Bound: PartialOrd> ObjectiveComparison<Bound> for Maximise {
    fn better(new: &Bound, current: &Bound) -> bool {
        new > current
    }
}

/// Minimise instead of maximise.
pub struct Minimise;

impl<Bound: PartialOrd> ObjectiveComparison<Bound> for Minimise {
    fn better(new: &Bound, current: &Bound) -> bool {
        new < current
    }
}
