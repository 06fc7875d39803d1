//! Per-frame tick source shared by every active animator.

use instant::Instant;

use crate::error::AnimationError;
use crate::spring::{Animatable, SpringAnimator};

/// Anything the frame clock can advance.
pub trait Tick {
    fn tick(&mut self, dt: f32) -> Result<(), AnimationError>;
    fn is_running(&self) -> bool;
}

impl<T: Animatable> Tick for SpringAnimator<T> {
    fn tick(&mut self, dt: f32) -> Result<(), AnimationError> {
        SpringAnimator::tick(self, dt)
    }

    fn is_running(&self) -> bool {
        SpringAnimator::is_running(self)
    }
}

/// Measures the time between frames and hands it to animators.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    last_instant: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed since the previous call.
    ///
    /// The first call only records a baseline. A timestamp that does not move
    /// forward yields `None`, so callers never see a non-positive dt.
    pub fn advance(&mut self, now: Instant) -> Option<f32> {
        let Some(last) = self.last_instant else {
            self.last_instant = Some(now);
            return None;
        };
        if now <= last {
            return None;
        }
        self.last_instant = Some(now);
        Some((now - last).as_secs_f32())
    }

    pub fn frame(&mut self) -> Option<f32> {
        self.advance(Instant::now())
    }

    /// Forget the baseline, e.g. after the host loop was suspended.
    pub fn reset(&mut self) {
        self.last_instant = None;
    }

    /// Advance to `now` and tick every running target with the same dt.
    ///
    /// Returns the dt that was applied, if any.
    pub fn drive(
        &mut self,
        now: Instant,
        targets: &mut [&mut dyn Tick],
    ) -> Result<Option<f32>, AnimationError> {
        let Some(dt) = self.advance(now) else {
            return Ok(None);
        };
        for target in targets.iter_mut().filter(|t| t.is_running()) {
            target.tick(dt)?;
        }
        Ok(Some(dt))
    }
}
