use std::any::Any;
use std::fmt;

/// Mirrors `rayon_core::ThreadPoolBuildError`/`ErrorKind`: a hand-rolled
/// error type with manual `Display`/`std::error::Error` impls rather than a
/// `thiserror` derive, since that's the teacher's own idiom for this exact
/// concern and this workspace doesn't otherwise carry that dependency.
///
/// Covers the error kinds from spec.md §7, except §7.4 (decision-mode
/// exhaustion), which the spec calls out as *normal* termination and is
/// therefore represented as a "not found" `Candidate`, not an error.
#[derive(Debug)]
pub enum SearchError {
    /// §7.1: an inconsistent depth bound. Detected at `ParamsBuilder::build`
    /// or at search entry, before any task is spawned. §7.1's other two
    /// cases (missing/incompatible tag combination, a registry op before
    /// init) aren't representable here: mode selection is which inherent
    /// method you call (`count_nodes`/`optimise`/`decide`), not a runtime
    /// tag, and a `Registry` is fully usable the moment `Registry::new`
    /// returns, so there is no pre-init state to guard against.
    Configuration(ConfigError),
    /// §7.2: a `Generator` or `BoundFunction` call panicked. The panic
    /// payload is carried through rather than re-panicking the caller.
    UserCode(Box<dyn Any + Send + 'static>),
    /// §7.3: a broadcast or remote task dispatch failed. Fatal; the source
    /// design doesn't attempt locality-failure recovery and neither does
    /// this reimplementation.
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_depth == 0` combined with a non-zero `spawn_depth`: there is no
    /// depth at which the engine could ever spawn a task.
    SpawnDepthExceedsMaxDepth { spawn_depth: u32, max_depth: u32 },
    /// `max_depth == 0` ("unlimited") was requested for a registry-backed
    /// skeleton (`DepthBounded`/`BnB`): the registry's per-depth counters are
    /// sized once, up front, from `max_depth`, so there is no array to size
    /// without a concrete bound. `Seq` has no registry and genuinely
    /// supports unlimited depth; this is the registry-backed-only relative
    /// of that tag.
    MaxDepthRequiredForRegistry,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Configuration(e) => write!(f, "invalid search configuration: {e}"),
            SearchError::UserCode(_) => write!(f, "generator or bound function panicked"),
            SearchError::Transport(msg) => write!(f, "transport failure: {msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::SpawnDepthExceedsMaxDepth { spawn_depth, max_depth } => write!(
                f,
                "spawn_depth ({spawn_depth}) exceeds max_depth ({max_depth}); no task could ever be spawned"
            ),
            ConfigError::MaxDepthRequiredForRegistry => write!(
                f,
                "max_depth == 0 (unlimited) is only valid for Seq; DepthBounded/BnB need a concrete max_depth to size the registry"
            ),
        }
    }
}

impl std::error::Error for SearchError {}
impl std::error::Error for ConfigError {}

impl From<ConfigError> for SearchError {
    fn from(e: ConfigError) -> Self {
        SearchError::Configuration(e)
    }
}

pub type SearchResult<T> = Result<T, SearchError>;
