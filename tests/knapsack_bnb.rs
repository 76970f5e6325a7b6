//! The branch-and-bound knapsack scenario (spec.md §8, scenario 5): a
//! fixed 0/1 knapsack instance whose optimal value (7) is known up front,
//! checked against `BnB` under varying `spawn_depth`/thread counts so the
//! bounding logic is exercised under real concurrency.

use std::sync::Arc;

use treeskel::{BnB, BoundFunction, Generator, Maximise, Params};

const CAPACITY: i64 = 10;
const ITEMS: [(i64, i64); 4] = [(4, 5), (2, 4), (3, 4), (1, 2)]; // (value, weight)

#[derive(Clone)]
struct Node {
    decided: usize,
    value: i64,
    weight: i64,
}

struct KnapsackGen {
    remaining: u32,
    decided: usize,
    value: i64,
    weight: i64,
    item: (i64, i64),
}

impl Generator<(), Node> for KnapsackGen {
    fn new(_space: &(), node: &Node) -> Self {
        if node.decided >= ITEMS.len() {
            return KnapsackGen {
                remaining: 0,
                decided: node.decided,
                value: node.value,
                weight: node.weight,
                item: (0, 0),
            };
        }
        KnapsackGen {
            remaining: 2,
            decided: node.decided,
            value: node.value,
            weight: node.weight,
            item: ITEMS[node.decided],
        }
    }
    fn num_children(&self) -> u32 {
        self.remaining
    }
    fn next(&mut self) -> Node {
        self.remaining -= 1;
        if self.remaining == 1 {
            Node {
                decided: self.decided + 1,
                value: self.value + self.item.0,
                weight: self.weight + self.item.1,
            }
        } else {
            Node {
                decided: self.decided + 1,
                value: self.value,
                weight: self.weight,
            }
        }
    }
}

struct KnapsackBound;
impl BoundFunction<(), Node, i64> for KnapsackBound {
    fn ubound(_space: &(), node: &Node) -> i64 {
        if node.weight > CAPACITY {
            return i64::MIN;
        }
        let mut bound = node.value;
        let mut slack = CAPACITY - node.weight;
        for &(value, weight) in &ITEMS[node.decided..] {
            if weight <= slack {
                bound += value;
                slack -= weight;
            } else if slack > 0 {
                bound += value * slack / weight;
                slack = 0;
                break;
            }
        }
        bound
    }
}

impl treeskel::Candidate<i64> for Node {
    fn achieved(&self) -> i64 {
        self.value
    }
}

#[test]
fn finds_the_known_optimum_across_spawn_depths_and_thread_counts() {
    for spawn_depth in [0, 1, 2] {
        for threads in [1, 4] {
            let root = Node { decided: 0, value: 0, weight: 0 };
            let initial = Node { decided: ITEMS.len(), value: i64::MIN, weight: 0 };
            let params = Params::builder(i64::MIN)
                .spawn_depth(spawn_depth)
                .max_depth(ITEMS.len() as u32)
                .num_threads(threads)
                .build()
                .unwrap();

            let best = BnB::<KnapsackGen>::search::<KnapsackBound, Maximise, i64>(Arc::new(()), root, initial, &params).unwrap();
            assert_eq!(best.value, 7, "spawn_depth={spawn_depth} threads={threads}");
            assert!(best.weight <= CAPACITY);
        }
    }
}
