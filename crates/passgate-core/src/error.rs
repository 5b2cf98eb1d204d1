//! Typed failure taxonomy for the lifecycle engine and its store contract.
//!
//! Every failed transition is returned to the caller as a value; the engine
//! never retries internally and a failed transition leaves the request in its
//! prior state. `StoreUnavailable` is the only kind a shell may retry
//! transparently — everything else is a definitive decision that must be
//! shown to the actor.

use crate::model::{ActorId, RequestId, Status};
use chrono::NaiveTime;

/// Why the engine refused (or failed to apply) a transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("operations are allowed only between {start} and {end}")]
    OutsideAllowedWindow { start: NaiveTime, end: NaiveTime },

    #[error("actor {actor} is not permitted to {action}")]
    Forbidden { actor: ActorId, action: &'static str },

    #[error("action {action} is not legal for a request in status {status}")]
    InvalidTransition {
        status: Status,
        action: &'static str,
    },

    #[error("missing required input: {what}")]
    MissingInput { what: &'static str },

    #[error("request {0} not found")]
    NotFound(RequestId),

    #[error("request {0} was modified concurrently")]
    Conflict(RequestId),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl EngineError {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::OutsideAllowedWindow { .. } => "E1001",
            Self::Forbidden { .. } => "E2001",
            Self::InvalidTransition { .. } => "E2002",
            Self::MissingInput { .. } => "E2003",
            Self::NotFound(_) => "E2004",
            Self::Conflict(_) => "E3001",
            Self::StoreUnavailable(_) => "E5001",
        }
    }

    /// Optional remediation hint that shells can surface to the actor.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::OutsideAllowedWindow { .. } => Some("Try again during service hours."),
            Self::Forbidden { .. } | Self::NotFound(_) => None,
            Self::InvalidTransition { .. } => {
                Some("Check the request status; terminal requests accept no further actions.")
            }
            Self::MissingInput { .. } => Some("Provide the missing reason or operator selection."),
            Self::Conflict(_) => Some("Reload the request and retry against its current state."),
            Self::StoreUnavailable(_) => Some("Try again shortly."),
        }
    }

    /// Only `StoreUnavailable` may be retried transparently by the shell.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

/// Failures reported by a request store implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("request {0} not found")]
    NotFound(RequestId),

    #[error("version conflict on request {0}")]
    Conflict(RequestId),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Conflict(id) => Self::Conflict(id),
            StoreError::Unavailable(reason) => Self::StoreUnavailable(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineError, StoreError};
    use crate::model::{ActorId, RequestId, Status};
    use std::collections::HashSet;

    fn all_variants() -> Vec<EngineError> {
        vec![
            EngineError::OutsideAllowedWindow {
                start: chrono::NaiveTime::from_hms_opt(8, 0, 0).expect("time"),
                end: chrono::NaiveTime::from_hms_opt(22, 0, 0).expect("time"),
            },
            EngineError::Forbidden {
                actor: ActorId(1),
                action: "approve",
            },
            EngineError::InvalidTransition {
                status: Status::Cancelled,
                action: "approve",
            },
            EngineError::MissingInput { what: "reason" },
            EngineError::NotFound(RequestId(5)),
            EngineError::Conflict(RequestId(5)),
            EngineError::StoreUnavailable("connection refused".to_string()),
        ]
    }

    #[test]
    fn codes_are_unique_and_machine_friendly() {
        let mut seen = HashSet::new();
        for err in all_variants() {
            let code = err.code();
            assert!(seen.insert(code), "duplicate code {code}");
            assert_eq!(code.len(), 5);
            assert!(code.starts_with('E'));
            assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn only_store_unavailable_is_retryable() {
        for err in all_variants() {
            assert_eq!(
                err.is_retryable(),
                matches!(err, EngineError::StoreUnavailable(_))
            );
        }
    }

    #[test]
    fn store_errors_map_into_engine_errors() {
        assert_eq!(
            EngineError::from(StoreError::NotFound(RequestId(9))),
            EngineError::NotFound(RequestId(9))
        );
        assert_eq!(
            EngineError::from(StoreError::Conflict(RequestId(9))),
            EngineError::Conflict(RequestId(9))
        );
        assert!(matches!(
            EngineError::from(StoreError::Unavailable("down".to_string())),
            EngineError::StoreUnavailable(_)
        ));
    }
}
