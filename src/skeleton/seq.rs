use crate::generator::Generator;

/// Single-threaded skeleton (spec.md §4.6.1, §6: `Seq<Generator, Tags...>`).
/// The original `Skeletons::Seq` only ever instantiates `CountNodes` — there
/// is no registry, no incumbent, nothing to broadcast — so that's the only
/// mode exposed here too; `Optimisation`/`Decision` always go through
/// `DepthBounded` (which runs correctly with `spawn_depth = 0`, i.e. every
/// task executed inline on the calling thread, the parallel skeleton's
/// degenerate single-threaded case).
pub struct Seq<G>(std::marker::PhantomData<G>);

impl<Space, Node, G> Seq<G>
where
    G: Generator<Space, Node>,
{
    /// Pure recursion from `root`, counting nodes per depth. `max_depth ==
    /// 0` means unlimited, matching `Params::max_depth` elsewhere.
    pub fn count_nodes(max_depth: u32, space: &Space, root: &Node) -> Vec<u64> {
        let cap = if max_depth == 0 { 64 } else { max_depth as usize + 1 };
        let mut counts = vec![0u64; cap];
        expand(space, root, 0, max_depth, &mut counts);
        counts
    }
}

fn expand<Space, Node, G>(space: &Space, node: &Node, depth: u32, max_depth: u32, counts: &mut Vec<u64>)
where
    G: Generator<Space, Node>,
{
    if depth as usize >= counts.len() {
        counts.resize(depth as usize + 1, 0);
    }
    counts[depth as usize] += 1;

    if max_depth != 0 && depth >= max_depth {
        return;
    }

    let mut generator = G::new(space, node);
    let num_children = generator.num_children();
    for _ in 0..num_children {
        let child = generator.next();
        expand::<Space, Node, G>(space, &child, depth + 1, max_depth, counts);
    }
}
