//! Navigation collaborator
//!
//! The overlay listens to one stream ("a page transition started") and
//! writes to one sink ("go to this path"). Both are traits so the host
//! router can be plugged in; [`NavigationBus`] is the in-process version.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Capacity of the in-process navigation channel
const NAVIGATION_CHANNEL_CAPACITY: usize = 64;

/// Paths kept by [`NavigationBus::history`]; older ones are dropped
pub const NAVIGATION_HISTORY_LIMIT: usize = 256;

/// Notification emitted by the host when a page change begins
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationEvent {
    Started { path: String },
}

/// Receiving end of a navigation event stream
pub struct NavigationSubscription {
    rx: broadcast::Receiver<NavigationEvent>,
}

impl NavigationSubscription {
    pub fn new(rx: broadcast::Receiver<NavigationEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next navigation. Returns `None` once the source is gone.
    ///
    /// A lagging receiver skips ahead to the oldest retained event, which is
    /// still a navigation start.
    pub async fn next(&mut self) -> Option<NavigationEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!("Navigation subscription lagged, {} events skipped", missed);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

/// Source of navigation-start notifications
pub trait NavigationEvents: Send + Sync {
    fn subscribe(&self) -> NavigationSubscription;
}

/// Command sink that moves the host to another page
pub trait NavigationSink: Send + Sync {
    fn navigate(&self, path: &str);
}

/// In-process router: every `navigate` is recorded and announced
///
/// Only the last [`NAVIGATION_HISTORY_LIMIT`] paths are remembered.
pub struct NavigationBus {
    events: broadcast::Sender<NavigationEvent>,
    history: Mutex<VecDeque<String>>,
}

impl NavigationBus {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(NAVIGATION_CHANNEL_CAPACITY);
        Self {
            events,
            history: Mutex::new(VecDeque::new()),
        }
    }

    /// Recent paths navigated to, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn current_path(&self) -> Option<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }
}

impl Default for NavigationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationEvents for NavigationBus {
    fn subscribe(&self) -> NavigationSubscription {
        NavigationSubscription::new(self.events.subscribe())
    }
}

impl NavigationSink for NavigationBus {
    fn navigate(&self, path: &str) {
        tracing::debug!("NavigationBus: navigating to {}", path);
        {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            if history.len() == NAVIGATION_HISTORY_LIMIT {
                history.pop_front();
            }
            history.push_back(path.to_string());
        }
        // No subscribers is fine: nothing is listening for page changes yet
        let _ = self.events.send(NavigationEvent::Started {
            path: path.to_string(),
        });
    }
}
