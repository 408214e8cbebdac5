//! # Replay-Latest Streams
//!
//! Observable channels for session state that late observers can still
//! render from. A [`ReplayLatest`] caches the last value emitted and fans
//! every new value out to all attached [`Subscription`]s.
//!
//! ## Semantics
//!
//! - A subscription first receives the cached value (if any), then every
//!   value emitted after it attached, in emission order.
//! - Each subscription has its own unbounded queue, so a slow observer never
//!   delays emission or other observers.
//! - Dropped subscriptions are pruned on the next emission.
//!
//! ```text
//!              emit(v3)
//! producer ───────────────┐
//!                         ▼
//!              ┌────────────────────┐   v1? v2? v3 ...  ┌───────────┐
//!              │ latest: Some(v3)   ├──────────────────>│ observer  │
//!              │ subscribers: [..]  ├──────────────────>│ observer  │
//!              └────────────────────┘                   └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::ReplayLatest;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let stream = ReplayLatest::new();
//! stream.emit("paused");
//!
//! let mut late = stream.subscribe();
//! assert_eq!(late.recv().await, Some("paused"));
//!
//! stream.emit("playing");
//! assert_eq!(late.recv().await, Some("playing"));
//! # }
//! ```

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

struct Inner<T> {
    latest: Option<T>,
    subscribers: Vec<UnboundedSender<T>>,
}

/// Single-producer, multi-observer stream with replay of the latest value.
///
/// Cloning yields another handle to the same stream.
pub struct ReplayLatest<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T: Clone> ReplayLatest<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                latest: None,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Cache `value` and deliver it to every live subscription.
    ///
    /// Returns the number of subscriptions that received it.
    pub fn emit(&self, value: T) -> usize {
        let mut inner = self.inner.lock();
        inner
            .subscribers
            .retain(|subscriber| subscriber.send(value.clone()).is_ok());
        inner.latest = Some(value);
        inner.subscribers.len()
    }

    /// Attach a new observer.
    ///
    /// The cached value is queued before the subscription is registered, under
    /// the same lock as [`emit`](Self::emit), so no emission is missed or
    /// delivered twice.
    pub fn subscribe(&self) -> Subscription<T> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        if let Some(latest) = &inner.latest {
            // Receiver is alive until this function returns.
            let _ = sender.send(latest.clone());
        }
        inner.subscribers.push(sender);
        Subscription { receiver }
    }

    /// Most recent emission, without subscribing.
    pub fn latest(&self) -> Option<T> {
        self.inner.lock().latest.clone()
    }

    /// Number of subscriptions that have not been dropped.
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.subscribers.retain(|subscriber| !subscriber.is_closed());
        inner.subscribers.len()
    }
}

impl<T: Clone> Default for ReplayLatest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ReplayLatest<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReplayLatest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ReplayLatest")
            .field("latest", &inner.latest)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

/// Observer handle returned by [`ReplayLatest::subscribe`].
pub struct Subscription<T> {
    receiver: UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Wait for the next value. Returns `None` once every stream handle is gone.
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// Next queued value, if one is ready.
    pub fn try_recv(&mut self) -> Option<T> {
        match self.receiver.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Take every value currently queued.
    pub fn drain(&mut self) -> Vec<T> {
        let mut values = Vec::new();
        while let Some(value) = self.try_recv() {
            values.push(value);
        }
        values
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stream_has_no_latest() {
        let stream: ReplayLatest<u32> = ReplayLatest::new();
        assert_eq!(stream.latest(), None);
        assert_eq!(stream.subscriber_count(), 0);
        assert_eq!(stream.emit(1), 0);
        assert_eq!(stream.latest(), Some(1));
    }

    #[test]
    fn early_subscriber_sees_every_emission() {
        let stream = ReplayLatest::new();
        let mut sub = stream.subscribe();
        assert!(sub.try_recv().is_none());

        stream.emit(1);
        stream.emit(2);
        stream.emit(3);

        assert_eq!(sub.drain(), vec![1, 2, 3]);
    }

    #[test]
    fn late_subscriber_gets_latest_then_future() {
        let stream = ReplayLatest::new();
        stream.emit("a");
        stream.emit("b");

        let mut late = stream.subscribe();
        assert_eq!(late.try_recv(), Some("b"));
        assert_eq!(late.try_recv(), None);

        stream.emit("c");
        assert_eq!(late.drain(), vec!["c"]);
    }

    #[test]
    fn multicast_to_all_subscribers() {
        let stream = ReplayLatest::new();
        let mut first = stream.subscribe();
        let mut second = stream.subscribe();

        assert_eq!(stream.emit(7), 2);
        assert_eq!(first.try_recv(), Some(7));
        assert_eq!(second.try_recv(), Some(7));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let stream = ReplayLatest::new();
        let kept = stream.subscribe();
        let dropped = stream.subscribe();
        assert_eq!(stream.subscriber_count(), 2);

        drop(dropped);
        assert_eq!(stream.emit(1), 1);
        assert_eq!(stream.subscriber_count(), 1);
        drop(kept);
    }

    #[test]
    fn clones_share_state() {
        let stream = ReplayLatest::new();
        let handle = stream.clone();
        let mut sub = handle.subscribe();

        stream.emit(42);
        assert_eq!(handle.latest(), Some(42));
        assert_eq!(sub.try_recv(), Some(42));
    }

    #[tokio::test]
    async fn recv_waits_for_emission_from_another_task() {
        let stream = ReplayLatest::new();
        let mut sub = stream.subscribe();

        let producer = stream.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            producer.emit(99u64);
        });

        assert_eq!(sub.recv().await, Some(99));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn recv_ends_when_stream_dropped() {
        let stream: ReplayLatest<u8> = ReplayLatest::new();
        let mut sub = stream.subscribe();
        drop(stream);
        assert_eq!(sub.recv().await, None);
    }
}
