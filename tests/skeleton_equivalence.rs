//! Cross-skeleton properties (spec.md §8): `Seq` and `DepthBounded` must
//! agree on node counts for the same tree regardless of `spawn_depth` or
//! worker count, and the bound/incumbent invariants must hold under real
//! concurrency, not just the unit-level mocks in `treeskel-core`.

use std::sync::Arc;

use treeskel::{BnB, DepthBounded, Generator, Maximise, Params, Seq};

#[derive(Clone)]
struct Node {
    depth: u32,
}

struct TreeGen {
    child_depth: u32,
    remaining: u32,
}

impl Generator<u32, Node> for TreeGen {
    fn new(max_depth: &u32, node: &Node) -> Self {
        let has_children = node.depth < *max_depth;
        TreeGen {
            child_depth: node.depth + 1,
            remaining: if has_children { 3 } else { 0 },
        }
    }

    fn num_children(&self) -> u32 {
        self.remaining
    }

    fn next(&mut self) -> Node {
        self.remaining -= 1;
        Node { depth: self.child_depth }
    }
}

fn sequential_counts(max_depth: u32) -> Vec<u64> {
    Seq::<TreeGen>::count_nodes(max_depth, &max_depth, &Node { depth: 0 })
}

#[test]
fn depth_bounded_matches_seq_regardless_of_spawn_depth() {
    let max_depth = 4u32;
    let expected = sequential_counts(max_depth);

    for spawn_depth in [0, 1, 2, 4] {
        for threads in [1, 2, 8] {
            let params = Params::counting()
                .spawn_depth(spawn_depth)
                .max_depth(max_depth)
                .num_threads(threads)
                .build()
                .unwrap();
            let got = DepthBounded::<TreeGen>::count_nodes(Arc::new(max_depth), Node { depth: 0 }, &params).unwrap();
            assert_eq!(got, expected, "spawn_depth={spawn_depth} threads={threads}");
        }
    }
}

#[test]
fn count_totals_match_the_closed_form_for_a_ternary_tree() {
    // A complete ternary tree of depth D has (3^(D+1) - 1) / 2 nodes total.
    let max_depth = 3u32;
    let counts = sequential_counts(max_depth);
    let total: u64 = counts.iter().sum();
    assert_eq!(total, (3u64.pow(max_depth + 1) - 1) / 2);
}

#[derive(Clone)]
struct ValueNode {
    depth: u32,
    value: i64,
}

struct ValueGen {
    child_depth: u32,
    remaining: u32,
    base_value: i64,
}

impl Generator<u32, ValueNode> for ValueGen {
    fn new(max_depth: &u32, node: &ValueNode) -> Self {
        let has_children = node.depth < *max_depth;
        ValueGen {
            child_depth: node.depth + 1,
            remaining: if has_children { 2 } else { 0 },
            base_value: node.value,
        }
    }

    fn num_children(&self) -> u32 {
        self.remaining
    }

    fn next(&mut self) -> ValueNode {
        self.remaining -= 1;
        ValueNode {
            depth: self.child_depth,
            value: self.base_value * 2 + self.remaining as i64,
        }
    }
}

struct ValueBound;
impl treeskel::BoundFunction<u32, ValueNode, i64> for ValueBound {
    fn ubound(_space: &u32, node: &ValueNode) -> i64 {
        node.value
    }
}

impl treeskel::Candidate<i64> for ValueNode {
    fn achieved(&self) -> i64 {
        self.value
    }
}

#[test]
fn optimisation_result_is_stable_across_worker_counts() {
    let max_depth = 6u32;
    let root = ValueNode { depth: 0, value: 0 };
    let initial = ValueNode { depth: 0, value: i64::MIN };

    let mut results = Vec::new();
    for threads in [1, 2, 4, 8] {
        let params = Params::builder(i64::MIN).spawn_depth(2).max_depth(max_depth).num_threads(threads).build().unwrap();
        let best = DepthBounded::<ValueGen>::optimise::<ValueBound, Maximise, i64>(Arc::new(max_depth), root.clone(), initial.clone(), &params).unwrap();
        results.push(best.value);
    }

    assert!(results.iter().all(|&v| v == results[0]), "results differ across thread counts: {results:?}");
}

#[test]
fn bnb_agrees_with_depth_bounded_optimise() {
    let max_depth = 6u32;
    let root = ValueNode { depth: 0, value: 0 };
    let initial = ValueNode { depth: 0, value: i64::MIN };
    let params = Params::builder(i64::MIN).spawn_depth(1).max_depth(max_depth).num_threads(4).build().unwrap();

    let via_depth_bounded = DepthBounded::<ValueGen>::optimise::<ValueBound, Maximise, i64>(Arc::new(max_depth), root.clone(), initial.clone(), &params).unwrap();
    let via_bnb = BnB::<ValueGen>::search::<ValueBound, Maximise, i64>(Arc::new(max_depth), root, initial, &params).unwrap();

    assert_eq!(via_depth_bounded.value, via_bnb.value);
}
