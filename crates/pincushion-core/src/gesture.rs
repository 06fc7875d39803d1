//! Drag gesture to spring target mapping.
//!
//! [`PinchController`] turns one pointer drag into motions for two springs it
//! owns: the distortion center follows the finger in normalized coordinates,
//! and the distortion magnitude swells while the finger is down and relaxes
//! back on release, carrying the lift-off velocity.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::clock::Tick;
use crate::constants::{
    ACTIVE_MAGNITUDE, CENTER_SPRING, PRESS_SPRING, RELEASE_SPRING, RESTING_CENTER,
    RESTING_MAGNITUDE,
};
use crate::effect::DistortionSink;
use crate::error::AnimationError;
use crate::spring::{Motion, SpringAnimator, SpringConfig};

/// Pointer input in device units (px and px/s).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Began { position: Vec2 },
    Changed { position: Vec2 },
    Ended { velocity: Vec2 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging,
    /// Finger lifted, magnitude still relaxing.
    Releasing,
}

/// Per-gesture capture. Reset to empty on release.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureState {
    pub initial_normalized_touch: Option<Vec2>,
    /// First observed position of the gesture, device units.
    pub drag_start: Option<Vec2>,
    pub active: bool,
}

impl GestureState {
    /// Gesture origin for an event at `position`: the captured one, or
    /// `position` itself when nothing has been captured yet.
    fn origin(&self, position: Vec2, reference_length: f32) -> (Vec2, Vec2) {
        let start = self.drag_start.unwrap_or(position);
        let touch = self
            .initial_normalized_touch
            .unwrap_or(start / reference_length);
        (start, touch)
    }

    /// Record the gesture origin on its first event; later events keep it.
    fn capture(&mut self, start: Vec2, touch: Vec2) {
        self.drag_start.get_or_insert(start);
        self.initial_normalized_touch.get_or_insert(touch);
        self.active = true;
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Resting and active effect values plus the spring profile for each stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerConfig {
    pub resting_center: Vec2,
    pub resting_magnitude: f32,
    pub active_magnitude: f32,
    /// Center spring while dragging.
    pub center_spring: SpringConfig,
    /// Magnitude spring while the finger is down.
    pub press_spring: SpringConfig,
    /// Magnitude spring after lift-off.
    pub release_spring: SpringConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            resting_center: RESTING_CENTER,
            resting_magnitude: RESTING_MAGNITUDE,
            active_magnitude: ACTIVE_MAGNITUDE,
            center_spring: CENTER_SPRING,
            press_spring: PRESS_SPRING,
            release_spring: RELEASE_SPRING,
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), AnimationError> {
        self.center_spring.validate()?;
        self.press_spring.validate()?;
        self.release_spring.validate()
    }
}

#[inline]
fn is_valid_reference(reference_length: f32) -> bool {
    reference_length.is_finite() && reference_length > 0.0
}

/// Owns the center and magnitude springs and retargets them from drag events.
pub struct PinchController {
    config: ControllerConfig,
    center: SpringAnimator<Vec2>,
    magnitude: SpringAnimator<f32>,
    gesture: GestureState,
    phase: GesturePhase,
}

impl PinchController {
    pub fn new(config: ControllerConfig) -> Result<Self, AnimationError> {
        config.validate()?;
        Ok(Self {
            center: SpringAnimator::new(config.center_spring, config.resting_center)?,
            magnitude: SpringAnimator::new(config.press_spring, config.resting_magnitude)?,
            gesture: GestureState::default(),
            phase: GesturePhase::Idle,
            config,
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn center(&self) -> Vec2 {
        self.center.value()
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude.value()
    }

    pub fn center_animator(&self) -> &SpringAnimator<Vec2> {
        &self.center
    }

    pub fn magnitude_animator(&self) -> &SpringAnimator<f32> {
        &self.magnitude
    }

    /// Forward both animated values to `sink` from now on.
    ///
    /// The sink receives the current values immediately so it starts in sync.
    pub fn attach<S: DistortionSink + 'static>(&mut self, sink: Rc<RefCell<S>>) {
        {
            let mut s = sink.borrow_mut();
            s.set_center(self.center.value());
            s.set_magnitude(self.magnitude.value());
        }
        let center_sink = Rc::clone(&sink);
        self.center
            .set_observer(move |center| center_sink.borrow_mut().set_center(center));
        self.magnitude
            .set_observer(move |magnitude| sink.borrow_mut().set_magnitude(magnitude));
    }

    pub fn handle(&mut self, event: PointerEvent, reference_length: f32) {
        match event {
            PointerEvent::Began { position } => self.drag_began(position, reference_length),
            PointerEvent::Changed { position } => self.drag_changed(position, reference_length),
            PointerEvent::Ended { velocity } => self.drag_ended(velocity, reference_length),
        }
    }

    /// Start a new gesture at `position`, discarding any unfinished one.
    pub fn drag_began(&mut self, position: Vec2, reference_length: f32) {
        if self.gesture.active {
            log::warn!("[gesture] begin while dragging; restarting gesture");
            self.gesture.clear();
        }
        self.drag_changed(position, reference_length);
    }

    pub fn drag_changed(&mut self, position: Vec2, reference_length: f32) {
        if !is_valid_reference(reference_length) {
            log::warn!(
                "[gesture] ignoring drag event with reference length {}",
                reference_length
            );
            return;
        }

        let (start, touch) = self.gesture.origin(position, reference_length);
        let translation = (position - start) / reference_length;
        let target_center = touch + translation;
        if !target_center.is_finite() {
            log::warn!("[gesture] ignoring drag event at {:?}", position);
            return;
        }
        self.gesture.capture(start, touch);

        if self.phase != GesturePhase::Dragging {
            log::debug!("[gesture] begin drag at ({:.3},{:.3})", touch.x, touch.y);
            self.phase = GesturePhase::Dragging;
        }

        let center = Motion::toward(target_center).with_spring(self.config.center_spring);
        if let Err(e) = self.center.apply(center) {
            log::error!("[gesture] center motion rejected: {}", e);
        }
        let magnitude =
            Motion::toward(self.config.active_magnitude).with_spring(self.config.press_spring);
        if let Err(e) = self.magnitude.apply(magnitude) {
            log::error!("[gesture] magnitude motion rejected: {}", e);
        }
    }

    /// Lift-off. The horizontal release velocity is carried into the magnitude.
    ///
    /// A release that never saw a drag event injects no velocity. The center
    /// keeps settling toward wherever the finger last was.
    pub fn drag_ended(&mut self, velocity: Vec2, reference_length: f32) {
        let normalized = if self.gesture.initial_normalized_touch.is_some()
            && is_valid_reference(reference_length)
            && velocity.is_finite()
        {
            velocity / reference_length
        } else {
            Vec2::ZERO
        };

        let magnitude = Motion::toward(self.config.resting_magnitude)
            .with_spring(self.config.release_spring)
            .with_velocity(normalized.x);
        if let Err(e) = self.magnitude.apply(magnitude) {
            log::error!("[gesture] release motion rejected: {}", e);
        }

        log::debug!(
            "[gesture] release with velocity ({:.3},{:.3})",
            normalized.x,
            normalized.y
        );
        self.gesture.clear();
        self.phase = GesturePhase::Releasing;
    }

    pub fn tick(&mut self, dt: f32) -> Result<(), AnimationError> {
        self.center.tick(dt)?;
        self.magnitude.tick(dt)?;
        if self.phase == GesturePhase::Releasing
            && !self.center.is_running()
            && !self.magnitude.is_running()
        {
            log::debug!("[gesture] settled");
            self.phase = GesturePhase::Idle;
        }
        Ok(())
    }
}

impl Tick for PinchController {
    fn tick(&mut self, dt: f32) -> Result<(), AnimationError> {
        PinchController::tick(self, dt)
    }

    fn is_running(&self) -> bool {
        self.center.is_running()
            || self.magnitude.is_running()
            || self.phase == GesturePhase::Releasing
    }
}
