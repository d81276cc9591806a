use std::collections::HashMap;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use sojourn_core::{EngineError, EngineResult, Money};

use crate::lifecycle::{check_transition, Actor, BookingStatus};
use crate::models::{BookingDraft, BookingPatch, BookingRequest, Category};

/// Persisted booking collections, keyed independently per category so
/// cross-category queries are never needed. Shared mutable state across
/// views; writers broadcast a change notification instead of locking.
#[derive(Debug, Default)]
pub struct BookingStore {
    collections: HashMap<Category, HashMap<Uuid, BookingRequest>>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a new record. Assigns the id, stamps `created_at`, and
    /// freezes the quoted price as computed for the draft's selections.
    pub fn create(
        &mut self,
        draft: BookingDraft,
        quoted_price: Money,
        initial_status: BookingStatus,
    ) -> EngineResult<BookingRequest> {
        draft.requester.validate()?;
        draft.schedule.validate()?;
        if draft.party_size == 0 {
            return Err(EngineError::InvalidBookingInput(
                "party size must be positive".to_string(),
            ));
        }

        let category = draft.selections.category();
        let now = Utc::now();
        let record = BookingRequest {
            id: Uuid::new_v4(),
            category,
            requester: draft.requester,
            schedule: draft.schedule,
            party_size: draft.party_size,
            selections: draft.selections,
            quoted_price,
            status: initial_status,
            created_at: now,
            updated_at: now,
        };

        let bucket = self.collections.entry(category).or_default();
        if bucket.contains_key(&record.id) {
            // cannot happen with v4 ids; treated as malformed input per the
            // taxonomy's catch-all rule
            return Err(EngineError::InvalidBookingInput(format!(
                "duplicate booking id {}",
                record.id
            )));
        }
        bucket.insert(record.id, record.clone());
        info!(
            booking_id = %record.id,
            category = ?category,
            status = record.status.as_str(),
            quoted_price,
            "booking record created"
        );
        Ok(record)
    }

    pub fn get(&self, category: Category, id: Uuid) -> EngineResult<&BookingRequest> {
        self.collections
            .get(&category)
            .and_then(|bucket| bucket.get(&id))
            .ok_or_else(|| EngineError::NotFound(format!("booking {id} in {category:?}")))
    }

    /// Records of one category, optionally filtered by status, oldest first.
    pub fn list(&self, category: Category, filter: Option<BookingStatus>) -> Vec<&BookingRequest> {
        let mut records: Vec<&BookingRequest> = self
            .collections
            .get(&category)
            .map(|bucket| bucket.values().collect())
            .unwrap_or_default();
        if let Some(status) = filter {
            records.retain(|r| r.status == status);
        }
        records.sort_by_key(|r| (r.created_at, r.id));
        records
    }

    /// Apply a partial update. Validate-then-apply: any rejected field
    /// leaves the whole record unchanged. `requester` and `quoted_price`
    /// are immutable for the record's entire life; schedule and party size
    /// may only change while the record is still pending review.
    ///
    /// Quotes are never silently recomputed, so a pending edit keeps the
    /// quote from the original submission. A customer who wants the edit
    /// repriced cancels and submits a fresh draft.
    pub fn update(
        &mut self,
        category: Category,
        id: Uuid,
        patch: BookingPatch,
    ) -> EngineResult<BookingRequest> {
        let record = self.get_mut(category, id)?;

        if patch.quoted_price.is_some() {
            return Err(EngineError::Immutable(
                "quoted_price is frozen at creation".to_string(),
            ));
        }
        if patch.requester.is_some() {
            return Err(EngineError::Immutable(
                "requester is frozen at creation".to_string(),
            ));
        }
        let editable = record.status == BookingStatus::Pending;
        if (patch.schedule.is_some() || patch.party_size.is_some()) && !editable {
            return Err(EngineError::Immutable(format!(
                "booking fields are frozen once {}",
                record.status.as_str()
            )));
        }
        if let Some(schedule) = &patch.schedule {
            schedule.validate()?;
        }
        if let Some(party_size) = patch.party_size {
            if party_size == 0 {
                return Err(EngineError::InvalidBookingInput(
                    "party size must be positive".to_string(),
                ));
            }
        }

        if let Some(schedule) = patch.schedule {
            record.schedule = schedule;
        }
        if let Some(party_size) = patch.party_size {
            record.party_size = party_size;
        }
        record.updated_at = Utc::now();
        info!(booking_id = %id, category = ?category, "booking record updated");
        Ok(record.clone())
    }

    /// Move a record through the lifecycle state machine. Illegal attempts
    /// are a no-op on the record. Each applied transition is logged with
    /// its timestamp; only the current state is retained.
    pub fn transition(
        &mut self,
        category: Category,
        id: Uuid,
        to: BookingStatus,
        actor: Actor,
    ) -> EngineResult<BookingRequest> {
        let record = self.get_mut(category, id)?;
        check_transition(record.status, to, actor)?;

        let from = record.status;
        record.status = to;
        record.updated_at = Utc::now();
        info!(
            booking_id = %id,
            category = ?category,
            from = from.as_str(),
            to = to.as_str(),
            actor = ?actor,
            at = %record.updated_at,
            "lifecycle transition applied"
        );
        Ok(record.clone())
    }

    /// Full snapshot of one collection, for the change broadcast.
    pub fn snapshot(&self, category: Category) -> serde_json::Value {
        serde_json::to_value(self.list(category, None)).unwrap_or(serde_json::Value::Null)
    }

    fn get_mut(&mut self, category: Category, id: Uuid) -> EngineResult<&mut BookingRequest> {
        self.collections
            .get_mut(&category)
            .and_then(|bucket| bucket.get_mut(&id))
            .ok_or_else(|| EngineError::NotFound(format!("booking {id} in {category:?}")))
    }
}
