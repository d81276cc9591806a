use serde::{Deserialize, Serialize};

use sojourn_core::{EngineError, EngineResult};

/// Lifecycle state of a booking or custom-trip request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    InProgress,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Rejected | BookingStatus::Confirmed | BookingStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Who is attempting a transition. Review of pending requests is
/// administrator-only; confirmation is the customer's move (the engine
/// additionally gates it behind a successful settlement).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Actor {
    Administrator,
    Customer,
}

/// Check a single transition against the legality table. The caller
/// mutates the record only on `Ok`, so a rejected attempt leaves it
/// byte-for-byte unchanged.
pub fn check_transition(
    from: BookingStatus,
    to: BookingStatus,
    actor: Actor,
) -> EngineResult<()> {
    use BookingStatus::*;

    let legal = match (from, to) {
        _ if from.is_terminal() => false,
        (Pending, Approved) | (Pending, Rejected) => actor == Actor::Administrator,
        (Approved, InProgress) => actor == Actor::Administrator,
        (Approved, Confirmed) => true,
        (Approved, Cancelled) => true,
        (InProgress, Approved) => actor == Actor::Administrator,
        (InProgress, Confirmed) => true,
        _ => false,
    };

    if legal {
        Ok(())
    } else {
        Err(EngineError::IllegalTransition {
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn admin_reviews_pending_requests() {
        assert!(check_transition(Pending, Approved, Actor::Administrator).is_ok());
        assert!(check_transition(Pending, Rejected, Actor::Administrator).is_ok());
        assert!(check_transition(Pending, Approved, Actor::Customer).is_err());
        assert!(check_transition(Pending, Rejected, Actor::Customer).is_err());
    }

    #[test]
    fn fulfillment_can_pause_and_resume() {
        assert!(check_transition(Approved, InProgress, Actor::Administrator).is_ok());
        assert!(check_transition(InProgress, Approved, Actor::Administrator).is_ok());
        assert!(check_transition(InProgress, Confirmed, Actor::Customer).is_ok());
    }

    #[test]
    fn terminal_states_admit_nothing() {
        for terminal in [Rejected, Confirmed, Cancelled] {
            for target in [Pending, Approved, Rejected, InProgress, Confirmed, Cancelled] {
                assert!(
                    check_transition(terminal, target, Actor::Administrator).is_err(),
                    "{terminal:?} -> {target:?} should be illegal"
                );
            }
        }
    }

    #[test]
    fn rejected_request_can_never_be_approved() {
        assert!(matches!(
            check_transition(Rejected, Approved, Actor::Administrator),
            Err(EngineError::IllegalTransition { .. })
        ));
    }

    #[test]
    fn full_transition_table() {
        let all = [Pending, Approved, Rejected, InProgress, Confirmed, Cancelled];
        // every pair an administrator may drive; everything else is illegal
        let legal = [
            (Pending, Approved),
            (Pending, Rejected),
            (Approved, InProgress),
            (Approved, Confirmed),
            (Approved, Cancelled),
            (InProgress, Approved),
            (InProgress, Confirmed),
        ];

        for from in all {
            for to in all {
                let result = check_transition(from, to, Actor::Administrator);
                if legal.contains(&(from, to)) {
                    assert!(result.is_ok(), "{from:?} -> {to:?} should be legal");
                } else {
                    assert!(
                        matches!(result, Err(EngineError::IllegalTransition { .. })),
                        "{from:?} -> {to:?} should be illegal"
                    );
                }
            }
        }
    }

    #[test]
    fn no_skipping_review() {
        assert!(check_transition(Pending, Confirmed, Actor::Administrator).is_err());
        assert!(check_transition(Pending, InProgress, Actor::Administrator).is_err());
    }
}
