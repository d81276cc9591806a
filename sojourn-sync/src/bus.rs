use chrono::Utc;
use tokio::sync::broadcast;
use tracing::info;

use sojourn_shared::{Collection, StoreChangedEvent};

const DEFAULT_CAPACITY: usize = 64;

/// In-process broadcast channel that keeps independently rendered views in
/// agreement: after every successful store mutation the writing view
/// publishes the collection's new snapshot, and every other open view
/// re-reads and re-renders. Last-writer-wins; there is no locking and no
/// merge of concurrent writes.
#[derive(Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<StoreChangedEvent>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register an observer. Any number of views may subscribe; a slow
    /// receiver that falls behind the channel capacity sees a `Lagged`
    /// error and should re-read the store.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChangedEvent> {
        self.sender.subscribe()
    }

    /// Broadcast a mutation. Publishing with no open observers is normal
    /// (a single view editing alone) and not an error.
    pub fn publish(&self, collection: Collection, snapshot: serde_json::Value) {
        let event = StoreChangedEvent {
            collection,
            snapshot,
            occurred_at: Utc::now(),
        };
        let delivered = self.sender.send(event).unwrap_or(0);
        info!(
            collection = collection.as_str(),
            observers = delivered,
            "store change broadcast"
        );
    }

    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn observers_receive_each_mutation() {
        let bus = ChangeBus::new();
        let mut admin_view = bus.subscribe();
        let mut customer_view = bus.subscribe();

        bus.publish(Collection::CustomRequests, json!([{"status": "APPROVED"}]));

        for receiver in [&mut admin_view, &mut customer_view] {
            let event = receiver.recv().await.unwrap();
            assert_eq!(event.collection, Collection::CustomRequests);
            assert_eq!(event.snapshot[0]["status"], "APPROVED");
        }
    }

    #[tokio::test]
    async fn publishing_without_observers_is_fine() {
        let bus = ChangeBus::new();
        assert_eq!(bus.observer_count(), 0);
        bus.publish(Collection::Receipts, json!([]));
    }

    #[tokio::test]
    async fn late_subscribers_only_see_later_changes() {
        let bus = ChangeBus::new();
        bus.publish(Collection::TripBookings, json!([1]));

        let mut view = bus.subscribe();
        bus.publish(Collection::TripBookings, json!([1, 2]));

        let event = view.recv().await.unwrap();
        assert_eq!(event.snapshot, json!([1, 2]));
    }
}
