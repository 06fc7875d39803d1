//! Spring-animated drag controller for a pincushion distortion effect.
//!
//! Pointer drags go into a [`PinchController`], which retargets two
//! [`SpringAnimator`]s every event. A [`FrameClock`] ticks them once per frame
//! and their observers push the new center and magnitude to a
//! [`DistortionSink`].

pub mod clock;
pub mod constants;
pub mod effect;
pub mod error;
pub mod gesture;
pub mod spring;

pub use clock::*;
pub use constants::*;
pub use effect::*;
pub use error::*;
pub use gesture::*;
pub use spring::*;
