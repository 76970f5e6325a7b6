use treeskel::{ConfigError, DepthBounded, Generator, Params, SearchError};
use std::sync::Arc;

#[derive(Clone)]
struct Node;

struct OneChild {
    remaining: u32,
}

impl Generator<(), Node> for OneChild {
    fn new(_space: &(), _node: &Node) -> Self {
        OneChild { remaining: 1 }
    }
    fn num_children(&self) -> u32 {
        self.remaining
    }
    fn next(&mut self) -> Node {
        self.remaining -= 1;
        Node
    }
}

#[test]
fn spawn_depth_beyond_max_depth_is_rejected_before_any_thread_starts() {
    let err = Params::counting().spawn_depth(10).max_depth(2).build().unwrap_err();
    assert!(matches!(err, SearchError::Configuration(ConfigError::SpawnDepthExceedsMaxDepth { spawn_depth: 10, max_depth: 2 })));
}

#[test]
fn unlimited_max_depth_is_rejected_for_registry_backed_skeletons() {
    let params = Params::counting().max_depth(0).build().unwrap();
    let err = DepthBounded::<OneChild>::count_nodes(Arc::new(()), Node, &params).unwrap_err();
    assert!(matches!(err, SearchError::Configuration(ConfigError::MaxDepthRequiredForRegistry)));
}
