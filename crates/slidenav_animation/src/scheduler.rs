//! Transition scheduler
//!
//! Owns every animated surface and steps their tweens each frame.
//! Surfaces are registered through a [`SchedulerHandle`]; a tween that
//! reaches its target resolves the [`TransitionHandle`] it was started with.
//!
//! The scheduler can be stepped by hand (`advance`, `tick`) from a host
//! event loop, or run on its own frame thread via `start_background()`.

use crate::easing::Easing;
use crate::handle::{TransitionCompleter, TransitionHandle, TransitionOutcome};
use crate::request::{TargetOffset, TransitionRequest};
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default frame rate of the background thread
pub const DEFAULT_TARGET_FPS: u32 = 120;

new_key_type! {
    /// Handle to a registered overlay surface
    pub struct SurfaceId;
}

/// An in-flight movement of one surface
#[derive(Debug)]
struct Tween {
    from: f32,
    to: f32,
    duration_ms: f32,
    elapsed_ms: f32,
    easing: Easing,
    completer: TransitionCompleter,
}

impl Tween {
    fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    fn sample(&self) -> f32 {
        let eased = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }

    fn is_done(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

/// One animated surface: its current vertical offset and at most one tween
#[derive(Debug)]
struct SurfaceState {
    offset: f32,
    tween: Option<Tween>,
}

/// Internal state of the transition scheduler
struct SchedulerInner {
    surfaces: SlotMap<SurfaceId, SurfaceState>,
    last_frame: Instant,
    target_fps: u32,
}

impl SchedulerInner {
    /// Step every tween by `dt_ms`. Returns true while any tween is still running.
    fn step(&mut self, dt_ms: f32) -> bool {
        let mut active = false;

        for (id, surface) in self.surfaces.iter_mut() {
            let (offset, done) = match surface.tween.as_mut() {
                Some(tween) => {
                    tween.elapsed_ms += dt_ms;
                    (tween.sample(), tween.is_done())
                }
                None => continue,
            };

            surface.offset = offset;

            if !done {
                active = true;
                continue;
            }

            if let Some(mut tween) = surface.tween.take() {
                surface.offset = tween.to;
                tracing::debug!(
                    "TransitionScheduler: surface {:?} reached {} after {}ms",
                    id,
                    tween.to,
                    tween.elapsed_ms
                );
                tween.completer.resolve(TransitionOutcome::Completed);
            }
        }

        active
    }

    fn start(&mut self, id: SurfaceId, request: TransitionRequest) -> TransitionHandle {
        // Time spent idle must not count toward the first frame
        if !self.has_active() {
            self.last_frame = Instant::now();
        }

        let Some(surface) = self.surfaces.get_mut(id) else {
            tracing::warn!(
                "TransitionScheduler: animate_to on unknown surface {:?}",
                id
            );
            return TransitionHandle::resolved(TransitionOutcome::Cancelled);
        };

        let (completer, handle) = TransitionHandle::pair();
        let tween = Tween {
            from: surface.offset,
            to: request.target.percent(),
            duration_ms: request.duration_ms as f32,
            elapsed_ms: 0.0,
            easing: request.easing,
            completer,
        };

        tracing::debug!(
            "TransitionScheduler: surface {:?} {} -> {:?} over {}ms ({})",
            id,
            surface.offset,
            request.target,
            request.duration_ms,
            request.easing.token()
        );

        if let Some(mut previous) = surface.tween.replace(tween) {
            tracing::warn!(
                "TransitionScheduler: transition {:?} on surface {:?} superseded",
                previous.completer.id(),
                id
            );
            previous.completer.resolve(TransitionOutcome::Superseded);
        }

        handle
    }

    fn cancel(&mut self, id: SurfaceId) -> bool {
        let Some(mut tween) = self.surfaces.get_mut(id).and_then(|s| s.tween.take()) else {
            return false;
        };
        tracing::debug!(
            "TransitionScheduler: transition {:?} on surface {:?} cancelled",
            tween.completer.id(),
            id
        );
        tween.completer.resolve(TransitionOutcome::Cancelled);
        true
    }

    fn has_active(&self) -> bool {
        self.surfaces.iter().any(|(_, s)| s.tween.is_some())
    }
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Callback type for waking up the main thread from the frame thread
///
/// Called while transitions are running so the host can redraw the surface.
pub type WakeCallback = Arc<dyn Fn() + Send + Sync>;

/// The scheduler that steps all overlay surfaces
///
/// Components hold a [`SchedulerHandle`] rather than the scheduler itself.
/// When the scheduler is dropped, every pending [`TransitionHandle`]
/// resolves as [`TransitionOutcome::Cancelled`].
///
/// # Background Thread Mode
///
/// ```ignore
/// let mut scheduler = TransitionScheduler::new();
/// scheduler.start_background(); // steps at 120fps on its own thread
/// ```
pub struct TransitionScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Stop signal for background thread
    stop_flag: Arc<AtomicBool>,
    /// Set by the frame thread while transitions are running
    needs_redraw: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
    wake_callback: Option<WakeCallback>,
}

impl TransitionScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                surfaces: SlotMap::with_key(),
                last_frame: Instant::now(),
                target_fps: DEFAULT_TARGET_FPS,
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            needs_redraw: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
            wake_callback: None,
        }
    }

    /// Set a wake callback invoked from the frame thread while transitions run
    pub fn set_wake_callback<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.wake_callback = Some(Arc::new(callback));
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        lock(&self.inner).target_fps = fps.max(1);
    }

    pub fn target_fps(&self) -> u32 {
        lock(&self.inner).target_fps
    }

    /// Start stepping surfaces on a background thread
    ///
    /// The thread sets the `needs_redraw` flag whenever a transition is
    /// running and calls the wake callback, if one is set.
    pub fn start_background(&mut self) {
        if self.thread_handle.is_some() {
            return; // Already running
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let needs_redraw = Arc::clone(&self.needs_redraw);
        let wake_callback = self.wake_callback.clone();

        tracing::debug!("TransitionScheduler: starting frame thread");

        self.thread_handle = Some(thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                let start = Instant::now();

                let (has_active, fps) = {
                    let mut inner = lock(&inner);
                    let now = Instant::now();
                    let dt_ms = (now - inner.last_frame).as_secs_f32() * 1000.0;
                    inner.last_frame = now;
                    (inner.step(dt_ms), inner.target_fps)
                };

                if has_active {
                    needs_redraw.store(true, Ordering::Release);
                    if let Some(ref callback) = wake_callback {
                        callback();
                    }
                }

                let frame_duration = Duration::from_micros(1_000_000 / u64::from(fps.max(1)));
                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        }));
    }

    /// Stop the background thread
    pub fn stop_background(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    pub fn is_background_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Check and clear the needs_redraw flag
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Step all surfaces by wall-clock time since the previous step
    ///
    /// Returns true if any transition is still running.
    pub fn tick(&self) -> bool {
        let mut inner = lock(&self.inner);
        let now = Instant::now();
        let dt_ms = (now - inner.last_frame).as_secs_f32() * 1000.0;
        inner.last_frame = now;
        inner.step(dt_ms)
    }

    /// Step all surfaces by a fixed amount of time
    ///
    /// Returns true if any transition is still running.
    pub fn advance(&self, dt_ms: u32) -> bool {
        let mut inner = lock(&self.inner);
        inner.last_frame = Instant::now();
        inner.step(dt_ms as f32)
    }

    pub fn has_active_transitions(&self) -> bool {
        lock(&self.inner).has_active()
    }

    pub fn surface_count(&self) -> usize {
        lock(&self.inner).surfaces.len()
    }
}

impl Default for TransitionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TransitionScheduler {
    fn drop(&mut self) {
        self.stop_background();
    }
}

/// Weak handle to a [`TransitionScheduler`]
///
/// Every operation is a safe no-op once the scheduler has been dropped.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a surface resting at `initial`
    pub fn add_surface(&self, initial: TargetOffset) -> Option<SurfaceId> {
        let inner = self.inner.upgrade()?;
        let id = lock(&inner).surfaces.insert(SurfaceState {
            offset: initial.percent(),
            tween: None,
        });
        Some(id)
    }

    /// Unregister a surface, cancelling its transition if one is running
    pub fn remove_surface(&self, id: SurfaceId) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = lock(&inner);
            inner.cancel(id);
            inner.surfaces.remove(id);
        }
    }

    /// Start moving a surface. An unknown surface or a dead scheduler
    /// yields a handle that is already cancelled.
    pub fn animate(&self, id: SurfaceId, request: TransitionRequest) -> TransitionHandle {
        match self.inner.upgrade() {
            Some(inner) => lock(&inner).start(id, request),
            None => TransitionHandle::resolved(TransitionOutcome::Cancelled),
        }
    }

    /// Stop a surface where it is. Returns false if nothing was running.
    pub fn cancel(&self, id: SurfaceId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).cancel(id))
            .unwrap_or(false)
    }

    pub fn surface_offset(&self, id: SurfaceId) -> Option<f32> {
        let inner = self.inner.upgrade()?;
        let inner = lock(&inner);
        inner.surfaces.get(id).map(|s| s.offset)
    }

    pub fn is_animating(&self, id: SurfaceId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| {
                lock(&inner)
                    .surfaces
                    .get(id)
                    .is_some_and(|s| s.tween.is_some())
            })
            .unwrap_or(false)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
