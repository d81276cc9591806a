use chrono::{DateTime, Utc};
use serde::Serialize;

use sojourn_core::money::round_half_even;
use sojourn_core::Money;

use crate::lifecycle::BookingStatus;
use crate::models::BookingRequest;

/// One row of the audit/export table. A stateless projection of booking
/// records; amounts use the same formula the receipt recorder applies, so
/// exported totals reconcile with issued receipts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportRow {
    pub user: String,
    pub trip: String,
    pub booking_date: DateTime<Utc>,
    pub base_price: Money,
    pub tax: Money,
    pub profit: Money,
    pub total: Money,
    pub status: BookingStatus,
}

/// Project booking records into export rows. `profit` is the flat booking
/// fee, the only margin in the engine's fixed formula.
pub fn project_rows(
    records: &[&BookingRequest],
    tax_rate: f64,
    booking_fee: Money,
) -> Vec<ExportRow> {
    records
        .iter()
        .map(|record| {
            let tax = round_half_even(record.quoted_price as f64 * tax_rate);
            ExportRow {
                user: record.requester.name.clone(),
                trip: record.selections.label(),
                booking_date: record.created_at,
                base_price: record.quoted_price,
                tax,
                profit: booking_fee,
                total: record.quoted_price + tax + booking_fee,
                status: record.status,
            }
        })
        .collect()
}
