#![doc(html_root_url = "https://docs.rs/treeskel/0.1.0")]

//! `treeskel`: a parallel tree-search skeleton framework. Work-stealing
//! enumeration, optimisation and decision search over an implicitly defined
//! tree, expressed against a `Generator` trait the caller implements once
//! per problem; the engine (work-stealing scheduler, distributed-shared-
//! state registry, incumbent protocol, pluggable task-pool policies) lives
//! in `treeskel-core` and is reused unchanged across all three skeletons.
//!
//! Three entry points, one per search shape:
//! - [`skeleton::Seq`] — sequential, node-counting only.
//! - [`skeleton::DepthBounded`] — parallel, spawn-depth-bounded; supports
//!   `count_nodes`, `optimise` and `decide`.
//! - [`skeleton::BnB`] — branch-and-bound, an `Optimisation`-mode
//!   specialisation of `DepthBounded`.
//!
//! Diagnostic event logging is gated behind the `TREESKEL_LOG` environment
//! variable (any non-empty value enables it; see `treeskel_core::log`),
//! mirroring how `rayon-core` gates its own internal event log behind
//! `RAYON_LOG`.

pub mod error;
pub mod generator;
pub mod params;
pub mod skeleton;

pub use error::{ConfigError, SearchError, SearchResult};
pub use generator::{BoundFunction, Candidate, Generator, Maximise, Minimise, NoBound, ObjectiveComparison};
pub use params::{Params, ParamsBuilder, PoolPolicyKind};
pub use skeleton::{BnB, Decision, DepthBounded, Seq};
