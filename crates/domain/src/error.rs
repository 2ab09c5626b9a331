//! Domain error types.

use thiserror::Error;

/// Errors that can occur while constructing or validating domain values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// An adopter intake field failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidIntake {
        field: &'static str,
        reason: &'static str,
    },

    /// A paid listing is missing its price.
    #[error("price is required for paid adoption listings")]
    PriceRequired,

    /// A free listing carries a price.
    #[error("price is not allowed for free adoption listings")]
    PriceNotAllowed,

    /// A listing field failed validation.
    #[error("invalid listing {field}: {reason}")]
    InvalidListing {
        field: &'static str,
        reason: &'static str,
    },

    /// More supplementary images than the listing supports.
    #[error("too many supplementary images: {0} (maximum 3)")]
    TooManyImages(usize),

    /// A stored string does not map to a known enum value.
    #[error("unknown {kind} value: {value}")]
    UnknownValue { kind: &'static str, value: String },
}
