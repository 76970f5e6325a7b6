use treeskel_core::{Incumbent, Registry};

use crate::generator::{BoundFunction, Candidate, ObjectiveComparison};

/// Outcome of processing one child node against the current bound, the
/// four-way `processNode` decision (spec.md §4.6):
///
/// | condition | outcome |
/// |---|---|
/// | `stopSearch` is set (decision mode only) | `Exit` |
/// | `ubound(child)` doesn't beat `localBound` | `Prune` (or `Break` under `PruneLevel`) |
/// | child's relaxation beats `localBound` | propose `child`'s own achieved value to incumbent, `Continue` |
/// | none of the above | `Continue` |
///
/// `ubound` (a relaxation/estimate) and the child's own achieved value are
/// two distinct quantities, matching the original source's `Sol/Bnd/Cand`
/// split (`ubound(...)` gates the prune check; `get<1>(c)`, the candidate's
/// own bound, gates the incumbent update). Using the relaxation for both
/// would let an ancestor's optimistic estimate get written into
/// `local_bound` and prune away the true optimum before it is ever
/// visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessNodeOutcome {
    Continue,
    Prune,
    /// Like `Prune`, but also stop considering this node's later siblings
    /// (the `PruneLevel` tag, spec.md §4.4/§4.6: once one child is pruned,
    /// assume the generator produces children in non-decreasing bound order
    /// and prune the rest of the level too).
    Break,
    /// A concurrent `stopSearch` fired; unwind without looking at any more
    /// siblings.
    Exit,
}

pub struct ProcessResult<Bound> {
    pub outcome: ProcessNodeOutcome,
    pub accepted: bool,
    pub bound: Bound,
}

/// Runs one node through the decision table. Only called in `Optimisation`/
/// `Decision` mode — `CountNodes` has no bound function and skips this
/// entirely (spec.md §4.6.1).
pub(crate) fn process_node<Space, Node, Bound, BF, Obj>(
    registry: &Registry<Bound>,
    incumbent: &Incumbent<Node, Bound>,
    space: &Space,
    node: &Node,
    decision_mode: bool,
    prune_level: bool,
) -> ProcessResult<Bound>
where
    Node: Candidate<Bound> + Clone,
    Bound: Clone,
    BF: BoundFunction<Space, Node, Bound>,
    Obj: ObjectiveComparison<Bound>,
{
    if decision_mode && registry.is_stopped() {
        let bound = registry.local_bound();
        return ProcessResult {
            outcome: ProcessNodeOutcome::Exit,
            accepted: false,
            bound,
        };
    }

    let local_bound = registry.local_bound();
    let relaxation = BF::ubound(space, node);

    if !Obj::better(&relaxation, &local_bound) {
        let outcome = if prune_level {
            ProcessNodeOutcome::Break
        } else {
            ProcessNodeOutcome::Prune
        };
        return ProcessResult {
            outcome,
            accepted: false,
            bound: relaxation,
        };
    }

    let achieved = node.achieved();
    let accepted = incumbent.propose(node.clone());
    if accepted {
        registry.update_bound(achieved.clone(), Obj::better);
    }

    ProcessResult {
        outcome: ProcessNodeOutcome::Continue,
        accepted,
        bound: achieved,
    }
}
