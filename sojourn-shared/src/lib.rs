pub mod models;

pub use models::events::StoreChangedEvent;
pub use models::Collection;
