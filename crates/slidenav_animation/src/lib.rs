//! Slidenav Transition Runner
//!
//! Timed offset tweens for the navigation overlay surface.
//!
//! # Features
//!
//! - **Transition Requests**: target offset, duration and easing per movement
//! - **Awaitable Handles**: every `animate_to` returns a future that resolves
//!   when the surface arrives (or is superseded or cancelled)
//! - **Scheduler**: deterministic stepping for tests, wall-clock ticking for
//!   host loops, or a background frame thread
//! - **TransitionRunner**: the trait the overlay controller talks to

pub mod easing;
pub mod handle;
pub mod request;
pub mod runner;
pub mod scheduler;

pub use easing::Easing;
pub use handle::{TransitionCompleter, TransitionHandle, TransitionId, TransitionOutcome};
pub use request::{TargetOffset, TransitionRequest, DEFAULT_DURATION_MS};
pub use runner::{SurfaceAnimator, TransitionRunner};
pub use scheduler::{
    SchedulerHandle, SurfaceId, TransitionScheduler, WakeCallback, DEFAULT_TARGET_FPS,
};
