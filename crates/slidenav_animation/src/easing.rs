//! Easing curves
//!
//! The overlay only ever needs a handful of curves, named the way
//! motion designers name them (`power2.out` and friends).

use serde::{Deserialize, Serialize};

/// Easing profile applied to a transition's normalized progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Easing {
    /// Constant velocity
    #[serde(rename = "linear")]
    Linear,
    /// Cubic acceleration from rest
    #[serde(rename = "power2.in")]
    Power2In,
    /// Cubic deceleration into the target
    #[default]
    #[serde(rename = "power2.out")]
    Power2Out,
    /// Accelerate for the first half, decelerate for the second
    #[serde(rename = "power2.inOut")]
    Power2InOut,
}

impl Easing {
    /// Map linear progress `t` (clamped to 0..=1) onto the curve
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Power2In => t * t * t,
            Easing::Power2Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Easing::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let p = -2.0 * t + 2.0;
                    1.0 - p * p * p / 2.0
                }
            }
        }
    }

    /// The token used in configuration files
    pub fn token(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::Power2In => "power2.in",
            Easing::Power2Out => "power2.out",
            Easing::Power2InOut => "power2.inOut",
        }
    }
}
