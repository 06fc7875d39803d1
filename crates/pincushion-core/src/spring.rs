//! Damped-harmonic-oscillator animation of scalar and vector values.
//!
//! A [`SpringAnimator`] moves a value toward a target following
//! `a = -2ζω·v - ω²·(x - target)` with `ω = 2π / response`. Each tick uses the
//! exact solution of that equation over `dt`, so the result does not depend on
//! the frame rate and a spring with `ζ >= 1` never overshoots its target.

use std::f32::consts::TAU;
use std::fmt;
use std::ops::{Add, Mul, Sub};

use glam::Vec2;

use crate::constants::{
    CRITICAL_DAMPING_TOLERANCE, SETTLE_DISPLACEMENT_EPSILON, SETTLE_VELOCITY_EPSILON,
};
use crate::error::AnimationError;

/// Stiffness and damping of a spring, expressed the way designers tune them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// ζ: below 1 oscillates, 1 is critically damped, above 1 creeps in.
    pub damping_ratio: f32,
    /// τ in seconds: period of the undamped spring. Smaller is stiffer.
    pub response: f32,
}

impl SpringConfig {
    pub const fn new(damping_ratio: f32, response: f32) -> Self {
        Self {
            damping_ratio,
            response,
        }
    }

    /// Both parameters must be positive, and small enough in combination
    /// that the step coefficients stay finite.
    pub fn validate(&self) -> Result<(), AnimationError> {
        let valid = |x: f32| x.is_finite() && x > 0.0;
        let in_range = || {
            let omega = self.angular_frequency();
            let zeta = self.damping_ratio;
            (omega * omega).is_normal()
                && (zeta * zeta).is_finite()
                && (2.0 * zeta * omega).powi(2).is_finite()
        };
        if valid(self.damping_ratio) && valid(self.response) && in_range() {
            Ok(())
        } else {
            Err(AnimationError::InvalidConfiguration {
                damping_ratio: self.damping_ratio,
                response: self.response,
            })
        }
    }

    /// Undamped angular frequency ω in radians per second.
    #[inline]
    pub fn angular_frequency(&self) -> f32 {
        TAU / self.response
    }

    /// Coefficients of the exact step over `dt`.
    ///
    /// With displacement `x = value - target` and velocity `v`, one step is
    /// `x' = a·x + b·v` and `v' = c·x + d·v`.
    fn step_coefficients(&self, dt: f32) -> [f32; 4] {
        let zeta = self.damping_ratio;
        let omega = self.angular_frequency();

        if (zeta - 1.0).abs() < CRITICAL_DAMPING_TOLERANCE {
            let decay = (-omega * dt).exp();
            return [
                decay * (1.0 + omega * dt),
                decay * dt,
                -decay * omega * omega * dt,
                decay * (1.0 - omega * dt),
            ];
        }

        if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega * dt).exp();
            let (sin, cos) = (omega_d * dt).sin_cos();
            let damped = zeta * omega / omega_d;
            return [
                decay * (cos + damped * sin),
                decay * sin / omega_d,
                -decay * omega * omega * sin / omega_d,
                decay * (cos - damped * sin),
            ];
        }

        // Two real roots. r_slow = -ω(ζ - s) is rewritten to avoid cancellation.
        let s = (zeta * zeta - 1.0).sqrt();
        let r_slow = -omega / (zeta + s);
        let r_fast = -omega * (zeta + s);
        let e_slow = (r_slow * dt).exp();
        let e_fast = (r_fast * dt).exp();
        let span = r_slow - r_fast;
        [
            (r_slow * e_fast - r_fast * e_slow) / span,
            (e_slow - e_fast) / span,
            r_slow * r_fast * (e_fast - e_slow) / span,
            (r_slow * e_slow - r_fast * e_fast) / span,
        ]
    }
}

/// A value the spring can move: closed under addition, subtraction and scaling.
pub trait Animatable:
    Copy + PartialEq + fmt::Debug + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self>
{
    const ZERO: Self;

    /// Euclidean norm, used for the settling test.
    fn norm(self) -> f32;
}

impl Animatable for f32 {
    const ZERO: Self = 0.0;

    #[inline]
    fn norm(self) -> f32 {
        self.abs()
    }
}

impl Animatable for Vec2 {
    const ZERO: Self = Vec2::ZERO;

    #[inline]
    fn norm(self) -> f32 {
        self.length()
    }
}

/// Explicit retarget command a controller applies to an animator it owns.
///
/// Fields left as `None` keep the animator's current setting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion<T> {
    pub spring: Option<SpringConfig>,
    pub velocity: Option<T>,
    pub target: Option<T>,
}

impl<T> Default for Motion<T> {
    fn default() -> Self {
        Self {
            spring: None,
            velocity: None,
            target: None,
        }
    }
}

impl<T> Motion<T> {
    pub fn toward(target: T) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    pub fn with_spring(mut self, spring: SpringConfig) -> Self {
        self.spring = Some(spring);
        self
    }

    pub fn with_velocity(mut self, velocity: T) -> Self {
        self.velocity = Some(velocity);
        self
    }
}

type Observer<T> = Box<dyn FnMut(T)>;

/// Animates one value toward a target; ticks only while running.
pub struct SpringAnimator<T: Animatable> {
    value: T,
    velocity: T,
    target: T,
    spring: SpringConfig,
    running: bool,
    observer: Option<Observer<T>>,
}

impl<T: Animatable> SpringAnimator<T> {
    /// Create a stopped animator resting at `value`.
    pub fn new(spring: SpringConfig, value: T) -> Result<Self, AnimationError> {
        spring.validate()?;
        Ok(Self {
            value,
            velocity: T::ZERO,
            target: value,
            spring,
            running: false,
            observer: None,
        })
    }

    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    #[inline]
    pub fn velocity(&self) -> T {
        self.velocity
    }

    #[inline]
    pub fn target(&self) -> T {
        self.target
    }

    #[inline]
    pub fn spring(&self) -> SpringConfig {
        self.spring
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True when value and velocity are within the settling thresholds.
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).norm() < SETTLE_DISPLACEMENT_EPSILON
            && self.velocity.norm() < SETTLE_VELOCITY_EPSILON
    }

    pub fn set_target(&mut self, target: T) {
        self.target = target;
    }

    pub fn set_velocity(&mut self, velocity: T) {
        self.velocity = velocity;
    }

    pub fn set_spring(&mut self, spring: SpringConfig) -> Result<(), AnimationError> {
        spring.validate()?;
        self.spring = spring;
        Ok(())
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Register the single value-changed observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: impl FnMut(T) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Apply a motion and start the animator.
    ///
    /// The spring is validated before anything is touched.
    pub fn apply(&mut self, motion: Motion<T>) -> Result<(), AnimationError> {
        if let Some(spring) = motion.spring {
            self.set_spring(spring)?;
        }
        if let Some(velocity) = motion.velocity {
            self.velocity = velocity;
        }
        if let Some(target) = motion.target {
            self.target = target;
        }
        self.start();
        Ok(())
    }

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> Result<(), AnimationError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(AnimationError::InvalidTick { dt });
        }
        if !self.running {
            return Ok(());
        }

        let previous = self.value;
        let [a, b, c, d] = self.spring.step_coefficients(dt);
        let displacement = self.value - self.target;
        let velocity = self.velocity;
        self.value = self.target + displacement * a + velocity * b;
        self.velocity = displacement * c + velocity * d;

        if self.is_settled() {
            self.value = self.target;
            self.velocity = T::ZERO;
            self.running = false;
            log::trace!("[spring] settled at {:?}", self.value);
        }

        if self.value != previous {
            let value = self.value;
            if let Some(observer) = &mut self.observer {
                observer(value);
            }
        }
        Ok(())
    }
}

impl<T: Animatable> fmt::Debug for SpringAnimator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpringAnimator")
            .field("value", &self.value)
            .field("velocity", &self.velocity)
            .field("target", &self.target)
            .field("spring", &self.spring)
            .field("running", &self.running)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
