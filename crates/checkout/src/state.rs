//! Checkout state machine.

use serde::{Deserialize, Serialize};

/// The state of one adoption attempt.
///
/// State transitions:
/// ```text
/// Intake ──► Saved ──► OrderCreated ──► AwaitingPayment ──► Verifying ──► Confirmed
///              │             │                 │                │
///              └─────────────┴─────────────────┴────────────────┴──► Failed
/// ```
///
/// The flow suspends at `AwaitingPayment` while the adopter completes the
/// externally hosted payment UI; the provider's callback resumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutState {
    /// Collecting adopter fields.
    #[default]
    Intake,

    /// Adoption request persisted, no order yet.
    Saved,

    /// Provider order registered.
    OrderCreated,

    /// Order handed to the payment widget, waiting on the adopter.
    AwaitingPayment,

    /// Provider callback received, signature check in progress.
    Verifying,

    /// Payment verified, pet claimed (terminal state).
    Confirmed,

    /// Attempt failed (terminal state, reachable from any state).
    Failed,
}

impl CheckoutState {
    /// Returns true if the adoption request can be persisted in this state.
    pub fn can_save(&self) -> bool {
        matches!(self, CheckoutState::Intake)
    }

    /// Returns true if a provider order can be created in this state.
    pub fn can_create_order(&self) -> bool {
        matches!(self, CheckoutState::Saved)
    }

    /// Returns true if the order can be handed to the payment widget.
    pub fn can_await_payment(&self) -> bool {
        matches!(self, CheckoutState::OrderCreated)
    }

    /// Returns true if a provider callback can be verified in this state.
    pub fn can_verify(&self) -> bool {
        matches!(self, CheckoutState::AwaitingPayment)
    }

    /// Returns true if the attempt can be confirmed in this state.
    pub fn can_confirm(&self) -> bool {
        matches!(self, CheckoutState::Verifying)
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutState::Confirmed | CheckoutState::Failed)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Intake => "Intake",
            CheckoutState::Saved => "Saved",
            CheckoutState::OrderCreated => "OrderCreated",
            CheckoutState::AwaitingPayment => "AwaitingPayment",
            CheckoutState::Verifying => "Verifying",
            CheckoutState::Confirmed => "Confirmed",
            CheckoutState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
