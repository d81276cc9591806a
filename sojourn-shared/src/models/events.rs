use chrono::{DateTime, Utc};

use super::Collection;

/// Broadcast after every successful store mutation. Carries the collection
/// name and a full snapshot so observing views re-render without a
/// read-back round trip.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct StoreChangedEvent {
    pub collection: Collection,
    pub snapshot: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}
