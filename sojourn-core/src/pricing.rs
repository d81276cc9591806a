use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::{round_half_even, Money};
use crate::{EngineError, EngineResult};

/// A multiplicative price modifier (accommodation tier, transport mode...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Modifier {
    pub label: String,
    pub factor: f64,
}

impl Modifier {
    pub fn new(label: impl Into<String>, factor: f64) -> Self {
        Self {
            label: label.into(),
            factor,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccommodationTier {
    Standard,
    Premium,
    Luxury,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportMode {
    Bus,
    AcRail,
    Flight,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomTier {
    Standard,
    Deluxe,
    Suite,
}

impl AccommodationTier {
    pub fn modifier(&self) -> Modifier {
        match self {
            AccommodationTier::Standard => Modifier::new("accommodation:standard", 1.0),
            AccommodationTier::Premium => Modifier::new("accommodation:premium", 1.3),
            AccommodationTier::Luxury => Modifier::new("accommodation:luxury", 1.5),
        }
    }
}

impl TransportMode {
    pub fn modifier(&self) -> Modifier {
        match self {
            TransportMode::Bus => Modifier::new("transport:bus", 1.0),
            TransportMode::AcRail => Modifier::new("transport:ac-rail", 1.2),
            TransportMode::Flight => Modifier::new("transport:flight", 1.4),
        }
    }
}

impl RoomTier {
    pub fn modifier(&self) -> Modifier {
        match self {
            RoomTier::Standard => Modifier::new("room:standard", 1.0),
            RoomTier::Deluxe => Modifier::new("room:deluxe", 1.25),
            RoomTier::Suite => Modifier::new("room:suite", 1.6),
        }
    }
}

/// Number of nights covered by a stay, minimum 1. `end < start` is
/// rejected before any price math runs.
pub fn nights_between(start: NaiveDate, end: NaiveDate) -> EngineResult<i64> {
    if end < start {
        return Err(EngineError::InvalidBookingInput(format!(
            "schedule end {end} precedes start {start}"
        )));
    }
    Ok((end - start).num_days().max(1))
}

/// Flat-rate price: `round(base * party_size * product of factors)`.
///
/// Pure and deterministic; identical inputs always yield the same quote so
/// a stored `quoted_price` can be re-verified at any later point.
pub fn compute_price(base: Money, party_size: u32, modifiers: &[Modifier]) -> EngineResult<Money> {
    let factor = combined_factor(base, party_size, modifiers)?;
    Ok(round_half_even(
        base as f64 * party_size as f64 * factor,
    ))
}

/// Per-night price over a schedule: the flat-rate formula multiplied by
/// `nights_between(start, end)`, rounded once at the end.
pub fn compute_stay_price(
    base: Money,
    party_size: u32,
    modifiers: &[Modifier],
    start: NaiveDate,
    end: NaiveDate,
) -> EngineResult<Money> {
    let nights = nights_between(start, end)?;
    let factor = combined_factor(base, party_size, modifiers)?;
    Ok(round_half_even(
        base as f64 * party_size as f64 * factor * nights as f64,
    ))
}

fn combined_factor(base: Money, party_size: u32, modifiers: &[Modifier]) -> EngineResult<f64> {
    if base <= 0 {
        return Err(EngineError::InvalidBookingInput(format!(
            "base price must be positive, got {base}"
        )));
    }
    if party_size == 0 {
        return Err(EngineError::InvalidBookingInput(
            "party size must be positive".to_string(),
        ));
    }
    let mut factor = 1.0;
    for modifier in modifiers {
        if modifier.factor <= 0.0 {
            return Err(EngineError::InvalidBookingInput(format!(
                "modifier {} has non-positive factor {}",
                modifier.label, modifier.factor
            )));
        }
        factor *= modifier.factor;
    }
    Ok(factor)
}
