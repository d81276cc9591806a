pub mod export;
pub mod lifecycle;
pub mod models;
pub mod store;

pub use export::{project_rows, ExportRow};
pub use lifecycle::{Actor, BookingStatus};
pub use models::{BookingDraft, BookingPatch, BookingRequest, Category, Requester, Schedule, Selections};
pub use store::BookingStore;
