//! Checkout error types.

use common::{AdoptionId, PetId};
use domain::{AdoptionStatus, DomainError, Money};
use store::StoreError;
use thiserror::Error;

use crate::services::email::EmailError;
use crate::services::payment::GatewayError;
use crate::signature::SignatureError;

/// Errors that can occur while driving an adoption attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Domain validation error.
    #[error("validation error: {0}")]
    Domain(#[from] DomainError),

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Pet not found.
    #[error("pet not found: {0}")]
    PetNotFound(PetId),

    /// Adoption request not found.
    #[error("adoption request not found: {0}")]
    AdoptionNotFound(AdoptionId),

    /// Another adoption already claimed this pet.
    #[error("pet {0} already has a confirmed adoption")]
    PetAlreadyAdopted(PetId),

    /// The client-supplied amount does not match the server-derived fee.
    #[error("quoted fee is {quoted} but the client supplied {supplied}")]
    AmountMismatch { quoted: Money, supplied: Money },

    /// Order creation failed at the payment provider.
    #[error("order creation failed: {0}")]
    OrderCreation(#[from] GatewayError),

    /// The callback or configuration kept verification from running.
    #[error("signature verification unavailable: {0}")]
    Signature(#[from] SignatureError),

    /// The request is not in the status the operation requires.
    #[error("adoption {id} is {actual}, expected {expected}")]
    InvalidStatus {
        id: AdoptionId,
        expected: &'static str,
        actual: AdoptionStatus,
    },

    /// There is no address to deliver a required message to.
    #[error("missing {0}, nothing to notify")]
    MissingRecipient(&'static str),

    /// E-mail dispatch failed.
    #[error("notification failed: {0}")]
    Notification(#[from] EmailError),
}
