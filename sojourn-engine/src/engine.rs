use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use sojourn_booking::lifecycle::check_transition;
use sojourn_booking::{
    project_rows, Actor, BookingDraft, BookingPatch, BookingRequest, BookingStatus, BookingStore,
    Category, ExportRow, Selections,
};
use sojourn_core::pricing::{compute_price, compute_stay_price};
use sojourn_core::{DiscountTable, EngineResult, Money, TripPackage};
use sojourn_settlement::{
    PaymentDetails, Receipt, ReceiptBook, ReceiptConfig, SettlementConfig, SettlementSimulator,
};
use sojourn_shared::Collection;
use sojourn_sync::ChangeBus;

/// Business rules for one engine instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub receipts: ReceiptConfig,
    #[serde(default)]
    pub settlement: SettlementConfig,
}

/// An administrator's decision on a pending custom-trip request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewVerdict {
    Approve,
    Reject,
}

/// The booking engine behind every booking surface: quotes, records, the
/// lifecycle state machine, settlement, receipts, and the change broadcast
/// that keeps other open views current. Each view calls in; the engine
/// mutates, then publishes the affected collection's snapshot.
pub struct Engine {
    store: BookingStore,
    discounts: DiscountTable,
    receipts: ReceiptBook,
    simulator: SettlementSimulator,
    bus: ChangeBus,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            store: BookingStore::new(),
            discounts: DiscountTable::new(),
            receipts: ReceiptBook::new(config.receipts),
            simulator: SettlementSimulator::new(config.settlement),
            bus: ChangeBus::new(),
        }
    }

    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    pub fn store(&self) -> &BookingStore {
        &self.store
    }

    pub fn receipts(&self) -> &ReceiptBook {
        &self.receipts
    }

    pub fn discounts(&self) -> &DiscountTable {
        &self.discounts
    }

    // ---- catalog / admin -------------------------------------------------

    pub fn add_package(
        &mut self,
        name: impl Into<String>,
        base_price: Money,
    ) -> EngineResult<TripPackage> {
        let package = self.discounts.insert_package(name, base_price)?;
        self.publish_discounts();
        Ok(package)
    }

    /// Administrator-set discount. Prospective only: existing quotes stay
    /// frozen, the change affects future submissions.
    pub fn set_discount(&mut self, package_id: Uuid, percent: u8) -> EngineResult<()> {
        self.discounts.set_discount(package_id, percent)?;
        self.publish_discounts();
        Ok(())
    }

    /// Decide a pending custom-trip request.
    pub fn review_request(
        &mut self,
        request_id: Uuid,
        verdict: ReviewVerdict,
    ) -> EngineResult<BookingRequest> {
        let target = match verdict {
            ReviewVerdict::Approve => BookingStatus::Approved,
            ReviewVerdict::Reject => BookingStatus::Rejected,
        };
        let record =
            self.store
                .transition(Category::Custom, request_id, target, Actor::Administrator)?;
        self.publish_category(Category::Custom);
        Ok(record)
    }

    pub fn start_fulfillment(&mut self, category: Category, id: Uuid) -> EngineResult<BookingRequest> {
        let record =
            self.store
                .transition(category, id, BookingStatus::InProgress, Actor::Administrator)?;
        self.publish_category(category);
        Ok(record)
    }

    pub fn revert_fulfillment(
        &mut self,
        category: Category,
        id: Uuid,
    ) -> EngineResult<BookingRequest> {
        let record =
            self.store
                .transition(category, id, BookingStatus::Approved, Actor::Administrator)?;
        self.publish_category(category);
        Ok(record)
    }

    // ---- quoting ---------------------------------------------------------

    /// Price a draft exactly as submission would. Pure; calling this twice
    /// with the same draft and discount table yields the same figure.
    pub fn quote(&self, draft: &BookingDraft) -> EngineResult<Money> {
        match &draft.selections {
            Selections::Trip {
                package_id,
                accommodation,
                transport,
            } => {
                let base = self.discounts.effective_price(*package_id)?;
                compute_price(
                    base,
                    draft.party_size,
                    &[accommodation.modifier(), transport.modifier()],
                )
            }
            Selections::Hotel {
                nightly_rate,
                room_tier,
            } => compute_stay_price(
                *nightly_rate,
                draft.party_size,
                &[room_tier.modifier()],
                draft.schedule.start,
                draft.schedule.end,
            ),
            Selections::Casino { entry_price, .. } => {
                compute_price(*entry_price, draft.party_size, &[])
            }
            Selections::Custom {
                daily_rate,
                accommodation,
                transport,
                ..
            } => compute_stay_price(
                *daily_rate,
                draft.party_size,
                &[accommodation.modifier(), transport.modifier()],
                draft.schedule.start,
                draft.schedule.end,
            ),
        }
    }

    // ---- customer flow ---------------------------------------------------

    /// Validate a draft, freeze its quote, and persist the record. Custom
    /// trip requests enter the lifecycle at `Pending` awaiting review;
    /// trip/hotel/casino bookings need no review and start `Approved`,
    /// awaiting settlement.
    pub fn submit_booking(&mut self, draft: BookingDraft) -> EngineResult<BookingRequest> {
        let quoted_price = self.quote(&draft)?;
        let initial_status = match draft.selections.category() {
            Category::Custom => BookingStatus::Pending,
            _ => BookingStatus::Approved,
        };
        let record = self.store.create(draft, quoted_price, initial_status)?;
        self.publish_category(record.category);
        Ok(record)
    }

    pub fn update_booking(
        &mut self,
        category: Category,
        id: Uuid,
        patch: BookingPatch,
    ) -> EngineResult<BookingRequest> {
        let record = self.store.update(category, id, patch)?;
        self.publish_category(category);
        Ok(record)
    }

    pub fn cancel_booking(
        &mut self,
        category: Category,
        id: Uuid,
        actor: Actor,
    ) -> EngineResult<BookingRequest> {
        let record = self
            .store
            .transition(category, id, BookingStatus::Cancelled, actor)?;
        self.publish_category(category);
        Ok(record)
    }

    /// The final charge the payment surface shows: frozen quote plus tax
    /// and booking fee.
    pub fn settled_total(&self, category: Category, id: Uuid) -> EngineResult<Money> {
        let record = self.store.get(category, id)?;
        Ok(self.receipts.settled_total(record.quoted_price))
    }

    /// Collect payment for an approved booking. On success the booking is
    /// confirmed and its receipt issued, exactly once; both the booking
    /// collection and the receipts collection are re-broadcast. A failed
    /// validation or an illegal state leaves everything untouched.
    pub async fn settle_booking(
        &mut self,
        category: Category,
        id: Uuid,
        details: PaymentDetails,
    ) -> EngineResult<(BookingRequest, Receipt)> {
        let booking = self.store.get(category, id)?;
        // fail before the provider delay if confirmation would be illegal
        check_transition(booking.status, BookingStatus::Confirmed, Actor::Customer)?;
        let amount = self.receipts.settled_total(booking.quoted_price);

        let settlement = self.simulator.settle(&details, amount).await?;

        let confirmed =
            self.store
                .transition(category, id, BookingStatus::Confirmed, Actor::Customer)?;
        let receipt = self.receipts.issue(&confirmed, &settlement);
        info!(
            booking_id = %id,
            settlement_ref = %settlement.reference,
            amount,
            "booking settled and confirmed"
        );

        self.publish_category(category);
        self.bus
            .publish(Collection::Receipts, self.receipts.snapshot());
        Ok((confirmed, receipt))
    }

    // ---- read side -------------------------------------------------------

    /// The audit/export table over every booking collection.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        let config = self.receipts.config();
        let mut rows = Vec::new();
        for category in [
            Category::Trip,
            Category::Hotel,
            Category::Casino,
            Category::Custom,
        ] {
            let records = self.store.list(category, None);
            rows.extend(project_rows(&records, config.tax_rate, config.booking_fee));
        }
        rows
    }

    fn publish_category(&self, category: Category) {
        self.bus
            .publish(category.collection(), self.store.snapshot(category));
    }

    fn publish_discounts(&self) {
        let snapshot =
            serde_json::to_value(self.discounts.list()).unwrap_or(serde_json::Value::Null);
        self.bus.publish(Collection::Discounts, snapshot);
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
