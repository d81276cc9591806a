pub mod discounts;
pub mod money;
pub mod pricing;

pub use discounts::{DiscountTable, TripPackage};
pub use money::Money;

/// The engine's error taxonomy. Every variant is local and recoverable:
/// a rejected operation leaves all stores unchanged and the caller may
/// surface the message and retry.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid booking input: {0}")]
    InvalidBookingInput(String),
    #[error("Invalid discount: {0}")]
    InvalidDiscount(String),
    #[error("Invalid payment details: {0}")]
    InvalidPaymentDetails(String),
    #[error("Illegal transition from {from} to {to}")]
    IllegalTransition { from: String, to: String },
    #[error("Field is immutable: {0}")]
    Immutable(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
