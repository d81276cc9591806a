use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sojourn_core::pricing::{AccommodationTier, RoomTier, TransportMode};
use sojourn_core::{EngineError, EngineResult, Money};
use sojourn_shared::Collection;

use crate::lifecycle::BookingStatus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Trip,
    Hotel,
    Casino,
    Custom,
}

impl Category {
    pub fn collection(&self) -> Collection {
        match self {
            Category::Trip => Collection::TripBookings,
            Category::Hotel => Collection::HotelBookings,
            Category::Casino => Collection::CasinoBookings,
            Category::Custom => Collection::CustomRequests,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Requester {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Requester {
    /// Field-level UI validation lives upstream; the engine still refuses
    /// empty contact fields and an email without a plausible shape.
    pub fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::InvalidBookingInput(
                "requester name must not be empty".to_string(),
            ));
        }
        if self.phone.trim().is_empty() {
            return Err(EngineError::InvalidBookingInput(
                "requester phone must not be empty".to_string(),
            ));
        }
        let well_formed = match self.email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
            }
            None => false,
        };
        if !well_formed {
            return Err(EngineError::InvalidBookingInput(format!(
                "requester email {:?} is not well-formed",
                self.email
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schedule {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Schedule {
    pub fn validate(&self) -> EngineResult<()> {
        if self.end < self.start {
            return Err(EngineError::InvalidBookingInput(format!(
                "schedule end {} precedes start {}",
                self.end, self.start
            )));
        }
        Ok(())
    }
}

/// Category-specific booking selections. Consumed only by the pricing
/// calculator at submission time; the resulting quote is frozen on the
/// record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Selections {
    Trip {
        package_id: Uuid,
        accommodation: AccommodationTier,
        transport: TransportMode,
    },
    Hotel {
        nightly_rate: Money,
        room_tier: RoomTier,
    },
    Casino {
        visit_package: String,
        entry_price: Money,
    },
    Custom {
        destination: String,
        daily_rate: Money,
        accommodation: AccommodationTier,
        transport: TransportMode,
    },
}

impl Selections {
    pub fn category(&self) -> Category {
        match self {
            Selections::Trip { .. } => Category::Trip,
            Selections::Hotel { .. } => Category::Hotel,
            Selections::Casino { .. } => Category::Casino,
            Selections::Custom { .. } => Category::Custom,
        }
    }

    /// Short human-readable label for listings and the export view.
    pub fn label(&self) -> String {
        match self {
            Selections::Trip { package_id, .. } => format!("trip package {package_id}"),
            Selections::Hotel { room_tier, .. } => format!("hotel stay ({room_tier:?})"),
            Selections::Casino { visit_package, .. } => format!("casino visit: {visit_package}"),
            Selections::Custom { destination, .. } => format!("custom trip to {destination}"),
        }
    }
}

/// What a booking surface submits. The store assigns id, timestamps, and
/// initial status; the engine computes the quote.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingDraft {
    pub requester: Requester,
    pub schedule: Schedule,
    pub party_size: u32,
    pub selections: Selections,
}

/// A persisted booking record. `quoted_price` and `created_at` are frozen
/// at creation; `requester` is immutable; `status` only moves through the
/// lifecycle state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub id: Uuid,
    pub category: Category,
    pub requester: Requester,
    pub schedule: Schedule,
    pub party_size: u32,
    pub selections: Selections,
    pub quoted_price: Money,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied through `BookingStore::update`. Fields the
/// lifecycle has frozen are rejected whole, never partially applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingPatch {
    pub schedule: Option<Schedule>,
    pub party_size: Option<u32>,
    pub requester: Option<Requester>,
    pub quoted_price: Option<Money>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requester(email: &str) -> Requester {
        Requester {
            name: "Amina Rahman".to_string(),
            email: email.to_string(),
            phone: "+880-171-555-0199".to_string(),
        }
    }

    #[test]
    fn accepts_plausible_email() {
        assert!(requester("amina@example.com").validate().is_ok());
    }

    #[test]
    fn rejects_malformed_contact() {
        assert!(requester("no-at-sign").validate().is_err());
        assert!(requester("dangling@").validate().is_err());

        let mut blank_name = requester("amina@example.com");
        blank_name.name = "  ".to_string();
        assert!(blank_name.validate().is_err());
    }
}
