use thiserror::Error;

/// Failures reported by animators and the controller that owns them.
///
/// Every failing call is a no-op: the animator keeps the state it had before
/// the call.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum AnimationError {
    #[error("invalid spring configuration: damping ratio {damping_ratio} and response {response} must both be positive")]
    InvalidConfiguration { damping_ratio: f32, response: f32 },
    #[error("invalid tick: dt must be positive and finite, got {dt}")]
    InvalidTick { dt: f32 },
}
