//! The adoption checkout pipeline.
//!
//! Drives one adoption attempt from intake through payment verification to
//! confirmation e-mails:
//! - [`SignatureVerifier`] validates the payment provider's callback
//! - [`PaymentGateway`] registers orders with the provider
//! - [`Notifier`] composes and dispatches the confirmation e-mails
//! - [`CheckoutCoordinator`] sequences the state machine over a store

pub mod coordinator;
pub mod error;
pub mod notify;
pub mod retry;
pub mod services;
pub mod signature;
pub mod state;

pub use coordinator::{
    CheckoutCoordinator, CheckoutSession, Confirmation, NotificationStatus, PaymentCallback,
};
pub use error::CheckoutError;
pub use notify::{Notifier, SendReport};
pub use services::email::{EmailError, EmailMessage, EmailSender, InMemoryMailer, ResendMailer};
pub use services::payment::{
    GatewayError, InMemoryPaymentGateway, PaymentGateway, ProviderOrder, RazorpayGateway,
};
pub use signature::{SignatureError, SignatureVerifier};
pub use state::CheckoutState;
