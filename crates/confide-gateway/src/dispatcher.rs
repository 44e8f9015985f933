use std::sync::Arc;

use tokio::sync::broadcast;

use confide_types::events::FeedEvent;

/// Events buffered per subscriber before it starts lagging.
const FEED_CAPACITY: usize = 256;

/// Fans out live feed events to every connected subscriber.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    broadcast_tx: broadcast::Sender<FeedEvent>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            inner: Arc::new(DispatcherInner { broadcast_tx }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Broadcast an event to all subscribers. No subscribers is not an error.
    pub fn broadcast(&self, event: FeedEvent) {
        let _ = self.inner.broadcast_tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.broadcast_tx.receiver_count()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str) -> FeedEvent {
        FeedEvent::ConfessionCreate {
            id: id.into(),
            message: "m".into(),
            created_at: "2026-03-01T10:00:00.000Z".into(),
        }
    }

    #[tokio::test]
    async fn every_subscriber_receives_broadcasts() {
        let dispatcher = Dispatcher::new();
        let mut a = dispatcher.subscribe();
        let mut b = dispatcher.subscribe();
        assert_eq!(dispatcher.subscriber_count(), 2);

        dispatcher.broadcast(event("1"));

        for rx in [&mut a, &mut b] {
            let received = rx.recv().await.unwrap();
            assert!(matches!(received, FeedEvent::ConfessionCreate { ref id, .. } if id == "1"));
        }
    }

    #[test]
    fn broadcast_without_subscribers_is_noop() {
        let dispatcher = Dispatcher::new();
        dispatcher.broadcast(event("1"));
        assert_eq!(dispatcher.subscriber_count(), 0);
    }
}
