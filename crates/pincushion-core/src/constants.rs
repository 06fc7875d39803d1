use glam::Vec2;

use crate::spring::SpringConfig;

// Shared tuning constants for the drag-to-distort interaction.

// Effect parameters (normalized units)
pub const RESTING_CENTER: Vec2 = Vec2::new(0.5, 0.5); // lens center when nothing is touched
pub const RESTING_MAGNITUDE: f32 = 0.0; // no distortion at rest
pub const ACTIVE_MAGNITUDE: f32 = 0.5; // distortion strength while a finger is down

// Spring profiles
pub const CENTER_SPRING: SpringConfig = SpringConfig::new(0.92, 0.2); // snappy: follows the finger closely
pub const PRESS_SPRING: SpringConfig = SpringConfig::new(0.3, 0.8); // loose: magnitude wobbles in
pub const RELEASE_SPRING: SpringConfig = SpringConfig::new(0.7, 0.6); // settle: magnitude relaxes back

// Settling thresholds
pub const SETTLE_DISPLACEMENT_EPSILON: f32 = 1e-4; // |value - target| below which motion is done
pub const SETTLE_VELOCITY_EPSILON: f32 = 1e-3; // |velocity| below which motion is done

// Damping ratios this close to 1 use the critically damped solution
pub const CRITICAL_DAMPING_TOLERANCE: f32 = 1e-4;
