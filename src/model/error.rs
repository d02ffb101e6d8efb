use thiserror::Error;

/// Configuration problems reported by the motion components.
///
/// None of these are fatal. The component that hits one skips its update for
/// that tick, holding its last pose, and hands the error back to the host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MotionError {
    #[error("no motion parameters for body `{0}`")]
    UnknownBodyId(String),
    #[error("body `{0}` is set to orbit, but its anchor is unavailable")]
    MissingAnchor(String),
    #[error("camera tracker needs at least one target")]
    EmptyTargetSet,
    #[error("all {0} camera targets are unavailable")]
    AllTargetsUnavailable(usize),
}
