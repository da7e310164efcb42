//! Overlay Controller
//!
//! Owns the overlay's [`OverlayState`], turns toggle/close intents into
//! transitions on a [`TransitionRunner`], and closes the overlay whenever
//! the host starts a page change.
//!
//! # Sequencing
//!
//! - A request consults the transition table under the state lock, moves
//!   to `Opening`/`Closing`, then releases the lock and awaits the runner.
//! - While that transition runs, further toggle/close requests find no
//!   table entry and return immediately. At most one transition is ever
//!   in flight.
//! - The settled state is committed strictly after the handle resolves.
//! - A superseded or cancelled transition rolls the state back to where
//!   it started. The surface stays wherever the runner stopped it.
//! - There is no timeout: a runner that never resolves leaves the overlay
//!   in `Opening`/`Closing` for good.
//!
//! # Example
//!
//! ```ignore
//! let scheduler = TransitionScheduler::new();
//! let runner = SurfaceAnimator::new(scheduler.handle(), TargetOffset::OffScreenUp).unwrap();
//! let controller = OverlayController::new(Arc::new(runner), OverlayTimings::default());
//! controller.attach_navigation(&router)?;
//!
//! controller.request_toggle().await; // Closed -> Opening -> Open
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use slidenav_animation::{TransitionOutcome, TransitionRequest, TransitionRunner};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{Result, SlidenavError};
use crate::navigation::NavigationEvents;
use crate::state::{OverlayEvent, OverlayState, StateTransitions};

// =============================================================================
// OverlayTimings
// =============================================================================

/// The two movements the controller asks for
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayTimings {
    /// Transition used on the way in (`Closed -> Opening`)
    pub enter: TransitionRequest,
    /// Transition used on the way out (`Open -> Closing`)
    pub exit: TransitionRequest,
}

impl Default for OverlayTimings {
    fn default() -> Self {
        Self {
            enter: TransitionRequest::enter(),
            exit: TransitionRequest::exit(),
        }
    }
}

// =============================================================================
// ControllerShared
// =============================================================================

struct ControllerState {
    state: OverlayState,
    transitions: u64,
}

/// State shared between the controller and its navigation listener
struct ControllerShared {
    inner: Mutex<ControllerState>,
    runner: Arc<dyn TransitionRunner>,
    timings: OverlayTimings,
    state_tx: watch::Sender<OverlayState>,
}

impl ControllerShared {
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit(&self, inner: &mut ControllerState, next: OverlayState) {
        tracing::debug!("OverlayController: {:?} -> {:?}", inner.state, next);
        inner.state = next;
        self.state_tx.send_replace(next);
    }

    /// Movement that carries the overlay out of a moving state
    ///
    /// Toggle and Close only ever lead to `Opening` or `Closing`.
    fn request_for(&self, moving: OverlayState) -> TransitionRequest {
        if moving == OverlayState::Opening {
            self.timings.enter
        } else {
            self.timings.exit
        }
    }

    /// Feed an intent through the table and run the resulting transition
    async fn drive(&self, event: OverlayEvent) -> OverlayState {
        let request = {
            let mut inner = self.lock();
            let Some(next) = inner.state.on_event(event) else {
                tracing::debug!(
                    "OverlayController: {:?} ignored while {:?}",
                    event,
                    inner.state
                );
                return inner.state;
            };
            self.commit(&mut inner, next);
            inner.transitions += 1;
            self.request_for(next)
        };

        let outcome = self.runner.animate_to(request).await;

        let mut inner = self.lock();
        let settle = match outcome {
            TransitionOutcome::Completed => OverlayEvent::TransitionSettled,
            TransitionOutcome::Superseded | TransitionOutcome::Cancelled => {
                tracing::warn!(
                    "OverlayController: transition to {:?} ended {:?}, rolling back",
                    request.target,
                    outcome
                );
                OverlayEvent::TransitionAborted
            }
        };
        match inner.state.on_event(settle) {
            Some(next) => self.commit(&mut inner, next),
            None => tracing::warn!(
                "OverlayController: {:?} arrived while {:?}",
                settle,
                inner.state
            ),
        }
        inner.state
    }

    async fn request_toggle(&self) -> OverlayState {
        let open = self.lock().state.is_open();
        if open {
            return self.request_close().await;
        }
        self.drive(OverlayEvent::Toggle).await
    }

    async fn request_close(&self) -> OverlayState {
        self.drive(OverlayEvent::Close).await
    }
}

// =============================================================================
// OverlayController
// =============================================================================

/// Owner of the overlay's open/closed state
///
/// Dropping the controller unregisters its navigation listener.
pub struct OverlayController {
    shared: Arc<ControllerShared>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl OverlayController {
    /// Create a closed controller driving `runner`
    pub fn new(runner: Arc<dyn TransitionRunner>, timings: OverlayTimings) -> Self {
        let (state_tx, _) = watch::channel(OverlayState::Closed);
        Self {
            shared: Arc::new(ControllerShared {
                inner: Mutex::new(ControllerState {
                    state: OverlayState::Closed,
                    transitions: 0,
                }),
                runner,
                timings,
                state_tx,
            }),
            listener: Mutex::new(None),
        }
    }

    pub fn state(&self) -> OverlayState {
        self.shared.lock().state
    }

    /// Whether overlay content is mounted (anything but `Closed`)
    pub fn is_mounted(&self) -> bool {
        self.state().is_mounted()
    }

    /// Number of transitions handed to the runner so far
    pub fn transition_count(&self) -> u64 {
        self.shared.lock().transitions
    }

    pub fn timings(&self) -> OverlayTimings {
        self.shared.timings
    }

    /// Observe every committed state, including `Opening` and `Closing`
    pub fn watch_state(&self) -> watch::Receiver<OverlayState> {
        self.shared.state_tx.subscribe()
    }

    /// Open a closed overlay, close an open one, ignore one in motion
    ///
    /// Resolves with the state once the started transition has settled, or
    /// immediately with the current state when the request was ignored.
    pub async fn request_toggle(&self) -> OverlayState {
        self.shared.request_toggle().await
    }

    /// Close an open overlay; ignored when closed or already moving
    pub async fn request_close(&self) -> OverlayState {
        self.shared.request_close().await
    }

    /// Close because the host began a page change
    pub async fn on_external_navigation_start(&self) -> OverlayState {
        tracing::debug!("OverlayController: navigation started");
        self.shared.request_close().await
    }

    /// Register the navigation listener for this controller's lifetime
    ///
    /// Every navigation-start event requests a close. Attaching again
    /// replaces the previous listener. Must be called inside a tokio runtime.
    pub fn attach_navigation(&self, events: &dyn NavigationEvents) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SlidenavError::NoRuntime)?;

        let mut subscription = events.subscribe();
        let shared = Arc::clone(&self.shared);
        let task = runtime.spawn(async move {
            while let Some(event) = subscription.next().await {
                tracing::debug!("OverlayController: {:?}", event);
                shared.request_close().await;
            }
            tracing::debug!("OverlayController: navigation source closed");
        });

        let previous = self.listener_slot().replace(task);
        if let Some(previous) = previous {
            tracing::warn!("OverlayController: navigation listener replaced");
            previous.abort();
        }
        Ok(())
    }

    /// Unregister the navigation listener. Returns false if none was attached.
    pub fn detach_navigation(&self) -> bool {
        match self.listener_slot().take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listener_slot()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Tear down external wiring
    pub fn shutdown(&self) {
        if self.detach_navigation() {
            tracing::debug!("OverlayController: navigation listener detached");
        }
    }

    fn listener_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for OverlayController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
