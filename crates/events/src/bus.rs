//! Publish/subscribe abstraction (mechanics only).
//!
//! A store publishes a message after each successful write; anything that renders the
//! catalog can subscribe and re-read. The bus is for distribution only: the store stays
//! the source of truth, so a missed notification costs a stale screen, never data.
//!
//! Delivery is best-effort fan-out. Subscribers should treat a notification as "something
//! changed, re-read" rather than as a delta to apply.

use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// A subscription to a message stream.
///
/// Each subscription gets a copy of every message published after it was created.
///
/// ```ignore
/// let subscription = store.subscribe();
///
/// while let Ok(change) = subscription.recv() {
///     refresh(change);
/// }
/// ```
///
/// Subscriptions are meant for a single consuming thread.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Drain every message that is already queued.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Transport-agnostic pub/sub bus.
///
/// `publish()` may fail (lock poisoning, a broken transport). Publishers decide whether
/// that is worth surfacing; the write it describes has already happened.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
