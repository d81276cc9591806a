pub mod engine;

pub use engine::{Engine, EngineConfig, ReviewVerdict};

pub use sojourn_booking::{
    Actor, BookingDraft, BookingPatch, BookingRequest, BookingStatus, Category, ExportRow,
    Requester, Schedule, Selections,
};
pub use sojourn_core::{EngineError, EngineResult, Money, TripPackage};
pub use sojourn_settlement::{
    PaymentDetails, Receipt, ReceiptConfig, SettlementConfig, SettlementRecord,
};
pub use sojourn_shared::{Collection, StoreChangedEvent};
