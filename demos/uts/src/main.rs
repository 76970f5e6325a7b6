//! Unbalanced Tree Search, the node-counting benchmark from the original
//! source tree (`apps/enumeration/uts/main.cpp`): binomial and geometric
//! random tree shapes, counted per depth with `Seq` or `DepthBounded`.
//!
//! The original derives each child's RNG stream via an SHA1-based
//! `rng_spawn`, which isn't present anywhere in this workspace's dependency
//! pack; reproducing it exactly would mean hand-rolling a cryptographic
//! primitive, which is a worse idea than picking the one RNG already in the
//! pack (`rand_xoshiro`, pulled in by `SH11235-rshogi`) and re-seeding per
//! node from it. Tree shapes are therefore not bit-for-bit identical to the
//! original UTS generator, but the algorithm (branching formulas, per-node
//! child counts) is.

use std::f64::consts::PI;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use treeskel::{Generator, Params};

#[derive(Parser)]
#[command(about = "Unbalanced Tree Search node-counting benchmark")]
struct Cli {
    /// Which skeleton to run: "seq" (single-threaded) or "dist" (parallel,
    /// spawn-depth-bounded).
    #[arg(long = "skeleton-type", default_value = "seq")]
    skeleton_type: String,

    /// Depth in the tree to spawn tasks until (parallel skeletons only).
    #[arg(short = 's', long = "spawn-depth", default_value_t = 0)]
    spawn_depth: u32,

    /// Depth in the tree to count until.
    #[arg(short = 'd', long = "until-depth", default_value_t = 0)]
    until_depth: u32,

    /// Worker thread count (parallel skeletons only); defaults to OS threads - 1.
    #[arg(long = "threads")]
    threads: Option<usize>,

    /// Which tree shape to generate: "binomial" or "geometric".
    #[arg(long = "uts-t", default_value = "binomial")]
    uts_t: String,

    /// Root branching factor.
    #[arg(long = "uts-b", default_value_t = 4)]
    uts_b: i64,

    /// BIN: probability of a non-leaf node.
    #[arg(long = "uts-q", default_value_t = 15.0 / 64.0)]
    uts_q: f64,

    /// BIN: number of children for a non-leaf node.
    #[arg(long = "uts-m", default_value_t = 4)]
    uts_m: i64,

    /// Root RNG seed.
    #[arg(long = "uts-r", default_value_t = 0)]
    uts_r: u64,

    /// GEO: tree depth parameter.
    #[arg(long = "uts-d", default_value_t = 6)]
    uts_d: i64,

    /// GEO: tree shape function (0: LINEAR, 1: CYCLIC, 2: FIXED, 3: EXPDEC).
    #[arg(long = "uts-a", default_value_t = 0)]
    uts_a: u8,
}

#[derive(Clone, Copy)]
enum TreeType {
    Binomial,
    Geometric,
}

#[derive(Clone, Copy)]
enum GeoShape {
    Linear,
    Cyclic,
    Fixed,
    ExpDec,
}

impl From<u8> for GeoShape {
    fn from(v: u8) -> Self {
        match v {
            1 => GeoShape::Cyclic,
            2 => GeoShape::Fixed,
            3 => GeoShape::ExpDec,
            _ => GeoShape::Linear,
        }
    }
}

#[derive(Clone)]
struct UtsParams {
    tree_type: TreeType,
    root_bf: i64,
    non_leaf_bf: i64,
    non_leaf_prob: f64,
    gen_mx: i64,
    geo_shape: GeoShape,
}

#[derive(Clone)]
struct UtsNode {
    is_root: bool,
    depth: u32,
    seed: u64,
}

struct UtsGen {
    child_depth: u32,
    remaining: u32,
    rng: Xoshiro256StarStar,
}

impl Generator<UtsParams, UtsNode> for UtsGen {
    fn new(space: &UtsParams, node: &UtsNode) -> Self {
        let mut rng = Xoshiro256StarStar::seed_from_u64(node.seed);
        let remaining = match space.tree_type {
            TreeType::Binomial => binomial_num_children(space, node, &mut rng),
            TreeType::Geometric => geometric_num_children(space, node, &mut rng),
        };
        UtsGen {
            child_depth: node.depth + 1,
            remaining,
            rng,
        }
    }

    fn num_children(&self) -> u32 {
        self.remaining
    }

    fn next(&mut self) -> UtsNode {
        self.remaining -= 1;
        UtsNode {
            is_root: false,
            depth: self.child_depth,
            seed: self.rng.next_u64(),
        }
    }
}

fn rand_prob(rng: &mut Xoshiro256StarStar) -> f64 {
    (rng.next_u32() as f64) / 2147483648.0
}

fn binomial_num_children(space: &UtsParams, node: &UtsNode, rng: &mut Xoshiro256StarStar) -> u32 {
    if node.is_root {
        space.root_bf.max(0) as u32
    } else {
        let d = rand_prob(rng);
        if d < space.non_leaf_prob {
            space.non_leaf_bf.max(0) as u32
        } else {
            0
        }
    }
}

fn geometric_num_children(space: &UtsParams, node: &UtsNode, rng: &mut Xoshiro256StarStar) -> u32 {
    let branch_factor = if node.is_root {
        space.root_bf as f64
    } else {
        geometric_branch_factor(space, node.depth)
    };
    let p = 1.0 / (1.0 + branch_factor);
    if p >= 1.0 {
        return 0;
    }
    let u = rand_prob(rng);
    let n = ((1.0 - u).ln() / (1.0 - p).ln()).floor();
    if n.is_finite() && n > 0.0 {
        n as u32
    } else {
        0
    }
}

fn geometric_branch_factor(space: &UtsParams, depth: u32) -> f64 {
    let gen_mx = space.gen_mx as f64;
    match space.geo_shape {
        GeoShape::Cyclic => {
            if depth as i64 > 5 * space.gen_mx {
                0.0
            } else {
                (space.root_bf as f64).powf((2.0 * PI * depth as f64 / gen_mx).sin())
            }
        }
        GeoShape::Fixed => {
            if (depth as i64) < space.gen_mx {
                space.root_bf as f64
            } else {
                0.0
            }
        }
        GeoShape::ExpDec => space.root_bf as f64 * (depth as f64).powf(-(space.root_bf as f64).ln() / gen_mx.ln()),
        GeoShape::Linear => space.root_bf as f64 * (1.0 - depth as f64 / gen_mx),
    }
}

fn main() {
    let cli = Cli::parse();

    let tree_type = match cli.uts_t.as_str() {
        "geometric" => TreeType::Geometric,
        "binomial" => TreeType::Binomial,
        other => {
            eprintln!("invalid tree type: {other}");
            std::process::exit(1);
        }
    };

    let space = UtsParams {
        tree_type,
        root_bf: cli.uts_b,
        non_leaf_bf: cli.uts_m,
        non_leaf_prob: cli.uts_q,
        gen_mx: cli.uts_d,
        geo_shape: GeoShape::from(cli.uts_a),
    };

    let root = UtsNode {
        is_root: true,
        depth: 0,
        seed: cli.uts_r,
    };

    let start = Instant::now();

    let counts = match cli.skeleton_type.as_str() {
        "seq" => treeskel::Seq::<UtsGen>::count_nodes(cli.until_depth, &space, &root),
        "dist" => {
            let max_depth = if cli.until_depth == 0 { 20_000 } else { cli.until_depth };
            let mut builder = Params::counting().spawn_depth(cli.spawn_depth).max_depth(max_depth);
            if let Some(threads) = cli.threads {
                builder = builder.num_threads(threads);
            }
            let params = builder.build().expect("invalid search parameters");
            treeskel::DepthBounded::<UtsGen>::count_nodes(Arc::new(space), root, &params).expect("search failed")
        }
        other => {
            eprintln!("invalid skeleton type: {other}");
            std::process::exit(1);
        }
    };

    let elapsed = start.elapsed();

    println!("Results Table:");
    for (depth, count) in counts.iter().enumerate() {
        println!("{depth}: {count}");
    }
    println!("Total Nodes: {}", counts.iter().sum::<u64>());
    println!("=====");
    println!("cpu = {}", elapsed.as_millis());
}
