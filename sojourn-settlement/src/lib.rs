pub mod receipts;
pub mod simulator;

pub use receipts::{Receipt, ReceiptBook, ReceiptConfig};
pub use simulator::{PaymentDetails, SettlementConfig, SettlementRecord, SettlementSimulator};
