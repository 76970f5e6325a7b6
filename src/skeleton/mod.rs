//! The three skeleton entry points (spec.md §6): [`seq::Seq`] (sequential,
//! `CountNodes` only), [`depth_bounded::DepthBounded`] (parallel,
//! spawn-depth-bounded, all three search modes), and [`bnb::BnB`]
//! (branch-and-bound, a thin `Optimisation`-mode specialisation of
//! `DepthBounded`).

mod process_node;

pub mod bnb;
pub mod depth_bounded;
pub mod seq;

pub use bnb::BnB;
pub use depth_bounded::{Decision, DepthBounded};
pub use seq::Seq;
