use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use sojourn_booking::BookingRequest;
use sojourn_core::money::round_half_even;
use sojourn_core::{EngineError, EngineResult, Money};

use crate::simulator::SettlementRecord;

/// Fixed, illustrative tax and fee rules applied at settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptConfig {
    pub tax_rate: f64,
    pub booking_fee: Money,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            tax_rate: 0.05,
            booking_fee: 99,
        }
    }
}

/// Issued for exactly one successful settlement; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Receipt {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub settlement_ref: String,
    pub base_amount: Money,
    pub tax: Money,
    pub fee: Money,
    pub amount: Money,
    pub issued_at: DateTime<Utc>,
}

/// Receipts keyed by booking id. Issue is read-or-create: a second call
/// for the same booking (a re-download, a stale view retrying) returns the
/// stored receipt and never records a second charge.
#[derive(Debug, Default)]
pub struct ReceiptBook {
    config: ReceiptConfig,
    receipts: HashMap<Uuid, Receipt>,
}

impl ReceiptBook {
    pub fn new(config: ReceiptConfig) -> Self {
        Self {
            config,
            receipts: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ReceiptConfig {
        &self.config
    }

    pub fn tax_for(&self, quoted_price: Money) -> Money {
        round_half_even(quoted_price as f64 * self.config.tax_rate)
    }

    /// The final charge for a quote: `quoted + tax + fee`. Exposed so the
    /// payment surface can show the figure before settlement runs.
    pub fn settled_total(&self, quoted_price: Money) -> Money {
        quoted_price + self.tax_for(quoted_price) + self.config.booking_fee
    }

    /// Derive and store the receipt for a settled booking, or return the
    /// one already issued.
    pub fn issue(&mut self, booking: &BookingRequest, settlement: &SettlementRecord) -> Receipt {
        if let Some(existing) = self.receipts.get(&booking.id) {
            return existing.clone();
        }

        let tax = self.tax_for(booking.quoted_price);
        let receipt = Receipt {
            id: Uuid::new_v4(),
            booking_id: booking.id,
            settlement_ref: settlement.reference.clone(),
            base_amount: booking.quoted_price,
            tax,
            fee: self.config.booking_fee,
            amount: booking.quoted_price + tax + self.config.booking_fee,
            issued_at: Utc::now(),
        };
        self.receipts.insert(booking.id, receipt.clone());
        info!(
            receipt_id = %receipt.id,
            booking_id = %booking.id,
            amount = receipt.amount,
            "receipt issued"
        );
        receipt
    }

    pub fn get(&self, booking_id: Uuid) -> EngineResult<&Receipt> {
        self.receipts
            .get(&booking_id)
            .ok_or_else(|| EngineError::NotFound(format!("receipt for booking {booking_id}")))
    }

    pub fn list(&self) -> Vec<&Receipt> {
        let mut receipts: Vec<&Receipt> = self.receipts.values().collect();
        receipts.sort_by_key(|r| (r.issued_at, r.id));
        receipts
    }

    /// Full snapshot for the change broadcast.
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self.list()).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sojourn_booking::{BookingStatus, Category, Requester, Schedule, Selections};
    use sojourn_core::pricing::{AccommodationTier, TransportMode};

    fn confirmed_booking(quoted_price: Money) -> BookingRequest {
        BookingRequest {
            id: Uuid::new_v4(),
            category: Category::Trip,
            requester: Requester {
                name: "Amina Rahman".to_string(),
                email: "amina@example.com".to_string(),
                phone: "+880-171-555-0199".to_string(),
            },
            schedule: Schedule {
                start: NaiveDate::from_ymd_opt(2025, 8, 10).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 8, 14).unwrap(),
            },
            party_size: 2,
            selections: Selections::Trip {
                package_id: Uuid::new_v4(),
                accommodation: AccommodationTier::Premium,
                transport: TransportMode::Flight,
            },
            quoted_price,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn settlement(amount: Money) -> SettlementRecord {
        SettlementRecord {
            reference: "stl_test".to_string(),
            method: "CARD".to_string(),
            amount,
            settled_at: Utc::now(),
        }
    }

    #[test]
    fn tax_and_fee_breakdown() {
        let mut book = ReceiptBook::new(ReceiptConfig::default());
        let booking = confirmed_booking(36_400);

        let receipt = book.issue(&booking, &settlement(38_319));
        assert_eq!(receipt.base_amount, 36_400);
        assert_eq!(receipt.tax, 1_820);
        assert_eq!(receipt.fee, 99);
        assert_eq!(receipt.amount, 38_319);
    }

    #[test]
    fn settled_total_matches_receipt_amount() {
        let book = ReceiptBook::new(ReceiptConfig::default());
        assert_eq!(book.settled_total(36_400), 38_319);
    }

    #[test]
    fn issuing_twice_returns_the_same_receipt() {
        let mut book = ReceiptBook::new(ReceiptConfig::default());
        let booking = confirmed_booking(36_400);

        let first = book.issue(&booking, &settlement(38_319));
        let second = book.issue(&booking, &settlement(38_319));
        assert_eq!(first.id, second.id);
        assert_eq!(first.amount, second.amount);
        assert_eq!(book.list().len(), 1);
    }

    #[test]
    fn unknown_booking_has_no_receipt() {
        let book = ReceiptBook::new(ReceiptConfig::default());
        assert!(matches!(
            book.get(Uuid::new_v4()),
            Err(EngineError::NotFound(_))
        ));
    }
}
