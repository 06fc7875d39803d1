//! Consumer side of the animated values.
//!
//! The distortion stage itself lives outside this crate. It only sees a
//! [`DistortionSink`] being fed, and can upload [`DistortionUniforms`] as-is.

use glam::Vec2;

use crate::constants::{RESTING_CENTER, RESTING_MAGNITUDE};

/// Receives the animated effect parameters whenever they change.
pub trait DistortionSink {
    fn set_center(&mut self, center: Vec2);
    fn set_magnitude(&mut self, magnitude: f32);
}

/// Latest parameters as seen by the effect stage. Values are not clamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistortionParams {
    pub center: Vec2,
    pub magnitude: f32,
}

impl Default for DistortionParams {
    fn default() -> Self {
        Self {
            center: RESTING_CENTER,
            magnitude: RESTING_MAGNITUDE,
        }
    }
}

impl DistortionParams {
    pub fn uniforms(&self) -> DistortionUniforms {
        DistortionUniforms {
            center: self.center.to_array(),
            magnitude: self.magnitude,
            _pad: 0.0,
        }
    }
}

impl DistortionSink for DistortionParams {
    fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    fn set_magnitude(&mut self, magnitude: f32) {
        self.magnitude = magnitude;
    }
}

/// Uniform block layout expected by the distortion shader (16 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DistortionUniforms {
    pub center: [f32; 2],
    pub magnitude: f32,
    pub _pad: f32,
}

impl DistortionUniforms {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
