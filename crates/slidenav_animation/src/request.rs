//! Transition requests
//!
//! A request describes one movement of the overlay surface: where to go,
//! how long to take and which curve to follow. Requests are created per
//! transition and dropped once the runner has picked them up.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;

/// Default duration for both the enter and exit movement
pub const DEFAULT_DURATION_MS: u32 = 700;

/// Resting positions of the overlay surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetOffset {
    /// Fully visible, covering the viewport
    OnScreen,
    /// Parked above the viewport
    OffScreenUp,
    /// Parked below the viewport
    OffScreenDown,
}

impl TargetOffset {
    /// Vertical offset in percent of the surface height
    pub fn percent(&self) -> f32 {
        match self {
            TargetOffset::OnScreen => 0.0,
            TargetOffset::OffScreenUp => -100.0,
            TargetOffset::OffScreenDown => 100.0,
        }
    }
}

/// A single timed movement of the overlay surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionRequest {
    pub target: TargetOffset,
    pub duration_ms: u32,
    pub easing: Easing,
}

impl TransitionRequest {
    pub fn new(target: TargetOffset, duration_ms: u32, easing: Easing) -> Self {
        Self {
            target,
            duration_ms,
            easing,
        }
    }

    /// Slide the overlay into view, decelerating as it lands
    pub fn enter() -> Self {
        Self::new(TargetOffset::OnScreen, DEFAULT_DURATION_MS, Easing::Power2Out)
    }

    /// Slide the overlay up and out, accelerating as it leaves
    pub fn exit() -> Self {
        Self::new(
            TargetOffset::OffScreenUp,
            DEFAULT_DURATION_MS,
            Easing::Power2In,
        )
    }

    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}
