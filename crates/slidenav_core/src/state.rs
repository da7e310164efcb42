//! Overlay lifecycle state machine
//!
//! The whole re-entrancy story of the overlay lives in one table:
//! requests that arrive while a transition is running have no entry and
//! are therefore dropped.

use std::hash::Hash;

/// Events fed into the overlay state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayEvent {
    /// The toggle control was activated
    Toggle,
    /// Something asked the overlay to close (user, router, host)
    Close,
    /// The running transition reached its target
    TransitionSettled,
    /// The running transition was superseded or cancelled
    ///
    /// The state returns to where the transition started, but the surface
    /// is not moved back: a close aborted halfway reports `Open` with the
    /// surface still partly off screen until the next transition.
    TransitionAborted,
}

/// A state type driven by a fixed transition table
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: OverlayEvent) -> Option<Self>;
}

/// State machine for the overlay lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum OverlayState {
    /// Overlay content is unmounted
    #[default]
    Closed,
    /// Enter transition is running
    Opening,
    /// Overlay is fully on screen and interactive
    Open,
    /// Exit transition is running
    Closing,
}

impl OverlayState {
    /// Check if overlay content should be mounted
    pub fn is_mounted(&self) -> bool {
        !matches!(self, OverlayState::Closed)
    }

    /// Check if overlay is fully open and interactive
    pub fn is_open(&self) -> bool {
        matches!(self, OverlayState::Open)
    }

    /// Check if a transition is in flight
    pub fn is_animating(&self) -> bool {
        matches!(self, OverlayState::Opening | OverlayState::Closing)
    }
}

impl StateTransitions for OverlayState {
    fn on_event(&self, event: OverlayEvent) -> Option<Self> {
        use OverlayEvent::*;
        use OverlayState::*;

        match (self, event) {
            // Closed -> Opening: mount and start the enter transition
            (Closed, Toggle) => Some(Opening),

            // Opening -> Open: enter transition finished
            (Opening, TransitionSettled) => Some(Open),

            // Open -> Closing: toggling an open overlay is a close request
            (Open, Toggle) | (Open, Close) => Some(Closing),

            // Closing -> Closed: exit transition finished, unmount
            (Closing, TransitionSettled) => Some(Closed),

            // A transition that never arrived leaves the overlay where it started
            (Opening, TransitionAborted) => Some(Closed),
            (Closing, TransitionAborted) => Some(Open),

            _ => None,
        }
    }
}
