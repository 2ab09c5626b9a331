//! Adoption request status state machine.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The payment status of an adoption request.
///
/// State transitions:
/// ```text
/// Pending ──┬──► Paid
///           └──► Failed
/// ```
///
/// Only the signature verifier's outcome moves a request out of `Pending`;
/// an abandoned checkout stays `Pending` forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdoptionStatus {
    /// Intake saved, payment not yet verified.
    #[default]
    Pending,

    /// Payment callback verified (terminal state).
    Paid,

    /// Payment callback rejected or the attempt failed (terminal state).
    Failed,
}

impl AdoptionStatus {
    /// Returns true if the request can be marked paid in this state.
    pub fn can_mark_paid(&self) -> bool {
        matches!(self, AdoptionStatus::Pending)
    }

    /// Returns true if the request can be marked failed in this state.
    pub fn can_mark_failed(&self) -> bool {
        matches!(self, AdoptionStatus::Pending)
    }

    /// Returns true if confirmation e-mails may be sent in this state.
    pub fn can_notify(&self) -> bool {
        matches!(self, AdoptionStatus::Paid)
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, AdoptionStatus::Paid | AdoptionStatus::Failed)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionStatus::Pending => "pending",
            AdoptionStatus::Paid => "paid",
            AdoptionStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AdoptionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AdoptionStatus::Pending),
            "paid" => Ok(AdoptionStatus::Paid),
            "failed" => Ok(AdoptionStatus::Failed),
            other => Err(DomainError::UnknownValue {
                kind: "adoption status",
                value: other.to_string(),
            }),
        }
    }
}
