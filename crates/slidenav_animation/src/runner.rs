//! Transition runner
//!
//! The seam between the overlay controller and whatever actually moves
//! pixels. A runner drives exactly one property, the surface's vertical
//! offset, and reports completion through the returned handle. Keeping
//! concurrent calls apart is the caller's job.

use crate::handle::TransitionHandle;
use crate::request::{TargetOffset, TransitionRequest};
use crate::scheduler::{SchedulerHandle, SurfaceId};

/// Executes timed transitions of the overlay surface
pub trait TransitionRunner: Send + Sync {
    /// Start moving the surface toward `request.target`
    fn animate_to(&self, request: TransitionRequest) -> TransitionHandle;
}

/// [`TransitionRunner`] backed by a surface on a [`TransitionScheduler`]
///
/// The surface is unregistered when the animator is dropped.
///
/// [`TransitionScheduler`]: crate::scheduler::TransitionScheduler
pub struct SurfaceAnimator {
    handle: SchedulerHandle,
    surface: SurfaceId,
}

impl SurfaceAnimator {
    /// Register a new surface resting at `initial`
    ///
    /// Returns `None` if the scheduler has already been dropped.
    pub fn new(handle: SchedulerHandle, initial: TargetOffset) -> Option<Self> {
        let surface = handle.add_surface(initial)?;
        Some(Self { handle, surface })
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Current vertical offset in percent of the surface height
    pub fn offset(&self) -> Option<f32> {
        self.handle.surface_offset(self.surface)
    }

    pub fn is_animating(&self) -> bool {
        self.handle.is_animating(self.surface)
    }

    /// Stop the running transition where it is
    pub fn cancel(&self) -> bool {
        self.handle.cancel(self.surface)
    }
}

impl TransitionRunner for SurfaceAnimator {
    fn animate_to(&self, request: TransitionRequest) -> TransitionHandle {
        self.handle.animate(self.surface, request)
    }
}

impl Drop for SurfaceAnimator {
    fn drop(&mut self) {
        self.handle.remove_surface(self.surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::TransitionOutcome;
    use crate::scheduler::TransitionScheduler;

    #[test]
    fn test_animator_drives_its_surface() {
        let scheduler = TransitionScheduler::new();
        let animator = SurfaceAnimator::new(scheduler.handle(), TargetOffset::OffScreenUp).unwrap();
        assert_eq!(animator.offset(), Some(-100.0));

        let mut transition = animator.animate_to(TransitionRequest::enter());
        assert!(animator.is_animating());

        scheduler.advance(700);
        assert_eq!(transition.try_outcome(), Some(TransitionOutcome::Completed));
        assert_eq!(animator.offset(), Some(0.0));
    }

    #[test]
    fn test_drop_unregisters_surface() {
        let scheduler = TransitionScheduler::new();
        let animator = SurfaceAnimator::new(scheduler.handle(), TargetOffset::OnScreen).unwrap();
        let mut transition = animator.animate_to(TransitionRequest::exit());
        assert_eq!(scheduler.surface_count(), 1);

        drop(animator);
        assert_eq!(scheduler.surface_count(), 0);
        assert_eq!(transition.try_outcome(), Some(TransitionOutcome::Cancelled));
    }

    #[test]
    fn test_off_screen_down_target() {
        let scheduler = TransitionScheduler::new();
        let animator = SurfaceAnimator::new(scheduler.handle(), TargetOffset::OnScreen).unwrap();
        let _transition = animator.animate_to(TransitionRequest::new(
            TargetOffset::OffScreenDown,
            200,
            crate::Easing::Power2InOut,
        ));
        scheduler.advance(200);
        assert_eq!(animator.offset(), Some(100.0));
    }

    #[test]
    fn test_dead_scheduler() {
        let handle = TransitionScheduler::new().handle();
        assert!(SurfaceAnimator::new(handle, TargetOffset::OnScreen).is_none());
    }
}
