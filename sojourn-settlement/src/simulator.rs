use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use sojourn_core::{EngineError, EngineResult, Money};

/// Payment input for one of the three supported settlement methods.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentDetails {
    Card { number: String },
    Transfer { account: String },
    Wallet { handle: String },
}

impl PaymentDetails {
    pub fn method(&self) -> &'static str {
        match self {
            PaymentDetails::Card { .. } => "CARD",
            PaymentDetails::Transfer { .. } => "TRANSFER",
            PaymentDetails::Wallet { .. } => "WALLET",
        }
    }

    /// Shape check per method. Runs before the simulated provider call, so
    /// invalid input settles nothing and touches no store.
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            PaymentDetails::Card { number } => {
                let digits: String = number
                    .chars()
                    .filter(|c| !matches!(c, ' ' | '-'))
                    .collect();
                if digits.len() < 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(EngineError::InvalidPaymentDetails(
                        "card number needs at least 16 digits".to_string(),
                    ));
                }
            }
            PaymentDetails::Transfer { account } => {
                if account.len() < 8 || !account.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(EngineError::InvalidPaymentDetails(
                        "transfer account needs at least 8 alphanumeric characters".to_string(),
                    ));
                }
            }
            PaymentDetails::Wallet { handle } => {
                let well_formed = match handle.split_once('@') {
                    Some((user, namespace)) => !user.is_empty() && !namespace.is_empty(),
                    None => false,
                };
                if !well_formed {
                    return Err(EngineError::InvalidPaymentDetails(
                        "wallet handle must be of the form user@namespace".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Outcome of a simulated settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub reference: String,
    pub method: String,
    pub amount: Money,
    pub settled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Fixed simulated provider latency.
    pub delay_ms: u64,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self { delay_ms: 750 }
    }
}

/// Simulated payment provider. After validation it always succeeds once
/// the fixed delay elapses; there is no decline path, matching the site's
/// observed behavior.
pub struct SettlementSimulator {
    delay: Duration,
}

impl SettlementSimulator {
    pub fn new(config: SettlementConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
        }
    }

    /// Collect `amount` using `details`. Suspends the caller for the
    /// configured delay, then returns a unique settlement reference.
    pub async fn settle(
        &self,
        details: &PaymentDetails,
        amount: Money,
    ) -> EngineResult<SettlementRecord> {
        details.validate()?;
        if amount <= 0 {
            return Err(EngineError::InvalidPaymentDetails(format!(
                "settlement amount must be positive, got {amount}"
            )));
        }

        tokio::time::sleep(self.delay).await;

        let record = SettlementRecord {
            reference: format!("stl_{}", Uuid::new_v4().simple()),
            method: details.method().to_string(),
            amount,
            settled_at: Utc::now(),
        };
        info!(
            reference = %record.reference,
            method = record.method,
            amount,
            "settlement simulated"
        );
        Ok(record)
    }
}

impl Default for SettlementSimulator {
    fn default() -> Self {
        Self::new(SettlementConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> SettlementSimulator {
        SettlementSimulator::new(SettlementConfig { delay_ms: 0 })
    }

    #[tokio::test]
    async fn card_separators_are_stripped() {
        let details = PaymentDetails::Card {
            number: "4111-1111 1111-1111".to_string(),
        };
        let record = instant().settle(&details, 38_319).await.unwrap();
        assert_eq!(record.method, "CARD");
        assert_eq!(record.amount, 38_319);
        assert!(record.reference.starts_with("stl_"));
    }

    #[tokio::test]
    async fn short_card_number_rejected() {
        let details = PaymentDetails::Card {
            number: "4111 1111".to_string(),
        };
        assert!(matches!(
            instant().settle(&details, 1_000).await,
            Err(EngineError::InvalidPaymentDetails(_))
        ));
    }

    #[tokio::test]
    async fn wallet_needs_a_namespace() {
        for bad in ["no-at-sign", "@ns", "user@"] {
            let details = PaymentDetails::Wallet {
                handle: bad.to_string(),
            };
            assert!(instant().settle(&details, 1_000).await.is_err(), "{bad}");
        }

        let details = PaymentDetails::Wallet {
            handle: "amina@sojournpay".to_string(),
        };
        assert!(instant().settle(&details, 1_000).await.is_ok());
    }

    #[tokio::test]
    async fn transfer_account_shape() {
        let bad = PaymentDetails::Transfer {
            account: "ab-12".to_string(),
        };
        assert!(instant().settle(&bad, 1_000).await.is_err());

        let good = PaymentDetails::Transfer {
            account: "BD41SOJO9912".to_string(),
        };
        assert!(instant().settle(&good, 1_000).await.is_ok());
    }

    #[tokio::test]
    async fn references_are_unique() {
        let simulator = instant();
        let details = PaymentDetails::Wallet {
            handle: "amina@sojournpay".to_string(),
        };
        let first = simulator.settle(&details, 500).await.unwrap();
        let second = simulator.settle(&details, 500).await.unwrap();
        assert_ne!(first.reference, second.reference);
    }
}
