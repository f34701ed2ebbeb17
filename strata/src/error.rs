//! Error taxonomy for the generator (see the module-level docs in [`crate`]).

/// Fatal errors that can occur while assembling a pipeline at `Start`.
#[derive(thiserror::Error, Debug)]
pub enum GeneratorError {
    /// A selector string did not name a registered stage, or the configuration was
    /// otherwise self-contradictory (e.g. an empty `biome_gen`).
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// A stage constructor failed for a reason other than an unknown selector.
    #[error("out of resources while constructing stage: {0}")]
    OutOfResources(String),
}

/// A single chunk's generation failed inside one stage. Logged by the worker and
/// otherwise discarded; never propagated past the worker loop or the direct-query API.
#[derive(thiserror::Error, Debug)]
#[error("stage {stage} faulted for chunk ({cx}, {cz}): {reason}")]
pub struct StageError {
    pub stage: &'static str,
    pub cx: i32,
    pub cz: i32,
    pub reason: String,
}

impl StageError {
    pub fn new(stage: &'static str, cx: i32, cz: i32, reason: impl Into<String>) -> Self {
        Self { stage, cx, cz, reason: reason.into() }
    }
}
