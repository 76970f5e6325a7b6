use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::SearchResult;
use crate::generator::{BoundFunction, Candidate, Generator, ObjectiveComparison};
use crate::params::Params;
use crate::skeleton::depth_bounded::DepthBounded;

/// Branch-and-bound (spec.md §4.6.3, §6: `BnB<Generator, Tags...>`). A
/// specialisation of `DepthBounded`'s `Optimisation` mode with a
/// `BoundFunction` and incumbent updates on every improving node (not only
/// leaves) always on — identical control-flow shape to `DepthBounded`,
/// different per-node processing requirements are simply made mandatory
/// rather than tag-selected, so this delegates to `DepthBounded::optimise`
/// directly instead of duplicating its engine.
pub struct BnB<G>(PhantomData<G>);

impl<Space, Node, G> BnB<G>
where
    G: Generator<Space, Node> + 'static,
    Space: Send + Sync + 'static,
    Node: Clone + Send + 'static,
{
    pub fn search<BF, Obj, Bound>(space: Arc<Space>, root: Node, initial: Node, params: &Params<Bound>) -> SearchResult<Node>
    where
        BF: BoundFunction<Space, Node, Bound> + 'static,
        Obj: ObjectiveComparison<Bound> + 'static,
        Node: Candidate<Bound>,
        Bound: Clone + Send + Sync + 'static,
    {
        DepthBounded::<G>::optimise::<BF, Obj, Bound>(space, root, initial, params)
    }
}
