//! Core substrate for the `treeskel` parallel tree-search skeleton
//! framework: the distributed-shared-state registry, the single-locality
//! incumbent, the pluggable task-pool policies, and the work-stealing
//! scheduler that runs them. Mirrors the split between `rayon-core` (this
//! crate) and `rayon` (the `treeskel` facade crate): this crate doesn't
//! know what a `Generator` or a search tree is, only how to run boxed jobs
//! across a pool of worker threads and keep a shared bound/stop/counts
//! registry consistent while it does.

pub mod incumbent;
pub mod latch;
pub mod log;
pub mod pool;
pub mod registry;
pub mod scheduler;
pub mod transport;
pub mod unwind;

pub use incumbent::Incumbent;
pub use latch::CompletionLatch;
pub use pool::{DepthPool, Job, TaskPool, Workpool};
pub use registry::Registry;
pub use scheduler::Scheduler;
pub use transport::{ClusterTransport, LocalTransport};
