//! Transition completion handles
//!
//! `animate_to` hands back a [`TransitionHandle`] that resolves once the
//! movement is over. The producing side keeps the matching
//! [`TransitionCompleter`]. Dropping the completer without resolving it
//! resolves the handle as [`TransitionOutcome::Cancelled`], so a runner
//! that goes away never leaves a handle pending forever.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

static NEXT_TRANSITION_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of one in-flight transition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u64);

impl TransitionId {
    fn next() -> Self {
        Self(NEXT_TRANSITION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// How a transition ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionOutcome {
    /// The surface reached its target
    Completed,
    /// Another transition took over the same surface before this one finished
    Superseded,
    /// The transition was stopped, or its runner went away
    Cancelled,
}

impl TransitionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TransitionOutcome::Completed)
    }
}

/// Awaitable reference to an in-flight transition
#[derive(Debug)]
pub struct TransitionHandle {
    id: TransitionId,
    rx: Option<oneshot::Receiver<TransitionOutcome>>,
    outcome: Option<TransitionOutcome>,
}

impl TransitionHandle {
    /// Create a handle together with the completer that resolves it
    pub fn pair() -> (TransitionCompleter, TransitionHandle) {
        let id = TransitionId::next();
        let (tx, rx) = oneshot::channel();
        (
            TransitionCompleter { id, tx: Some(tx) },
            TransitionHandle {
                id,
                rx: Some(rx),
                outcome: None,
            },
        )
    }

    /// A handle that is already resolved
    pub fn resolved(outcome: TransitionOutcome) -> Self {
        Self {
            id: TransitionId::next(),
            rx: None,
            outcome: Some(outcome),
        }
    }

    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// Non-blocking check; returns the outcome once the transition is over
    pub fn try_outcome(&mut self) -> Option<TransitionOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        let rx = self.rx.as_mut()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => TransitionOutcome::Cancelled,
        };
        self.settle(outcome);
        Some(outcome)
    }

    pub fn is_finished(&mut self) -> bool {
        self.try_outcome().is_some()
    }

    fn settle(&mut self, outcome: TransitionOutcome) {
        self.outcome = Some(outcome);
        self.rx = None;
    }
}

impl Future for TransitionHandle {
    type Output = TransitionOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(outcome) = this.outcome {
            return Poll::Ready(outcome);
        }
        let Some(rx) = this.rx.as_mut() else {
            return Poll::Ready(TransitionOutcome::Cancelled);
        };
        match Pin::new(rx).poll(cx) {
            Poll::Ready(result) => {
                let outcome = result.unwrap_or(TransitionOutcome::Cancelled);
                this.settle(outcome);
                Poll::Ready(outcome)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Producer side of a [`TransitionHandle`]
#[derive(Debug)]
pub struct TransitionCompleter {
    id: TransitionId,
    tx: Option<oneshot::Sender<TransitionOutcome>>,
}

impl TransitionCompleter {
    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// Resolve the paired handle. Later calls are ignored.
    pub fn resolve(&mut self, outcome: TransitionOutcome) {
        if let Some(tx) = self.tx.take() {
            // The handle may already be gone; nobody is waiting then
            let _ = tx.send(outcome);
        }
    }

    pub fn complete(mut self) {
        self.resolve(TransitionOutcome::Completed);
    }

    pub fn cancel(mut self) {
        self.resolve(TransitionOutcome::Cancelled);
    }

    /// Whether the paired handle has been dropped
    pub fn is_abandoned(&self) -> bool {
        self.tx.as_ref().map_or(true, |tx| tx.is_closed())
    }
}
