pub mod events;

use serde::{Deserialize, Serialize};

/// Logical collections a view can observe. One per booking category,
/// plus receipts and the discount table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Collection {
    TripBookings,
    HotelBookings,
    CasinoBookings,
    CustomRequests,
    Receipts,
    Discounts,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::TripBookings => "TRIP_BOOKINGS",
            Collection::HotelBookings => "HOTEL_BOOKINGS",
            Collection::CasinoBookings => "CASINO_BOOKINGS",
            Collection::CustomRequests => "CUSTOM_REQUESTS",
            Collection::Receipts => "RECEIPTS",
            Collection::Discounts => "DISCOUNTS",
        }
    }
}
