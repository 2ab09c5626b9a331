//! Store traits.

use async_trait::async_trait;
use common::{AdoptionId, PetId};
use domain::{AdoptionRequest, Pet};

use crate::Result;

/// Persistence operations for pet listings.
#[async_trait]
pub trait PetStore: Send + Sync {
    /// Persists a new listing.
    async fn create_pet(&self, pet: &Pet) -> Result<()>;

    /// Loads a listing by ID. Returns None if it does not exist.
    async fn get_pet(&self, id: PetId) -> Result<Option<Pet>>;

    /// Returns all listings, newest first.
    async fn list_pets(&self) -> Result<Vec<Pet>>;

    /// Replaces a listing. Returns false if it does not exist.
    async fn update_pet(&self, pet: &Pet) -> Result<bool>;

    /// Deletes a listing immediately. Returns false if it did not exist.
    async fn delete_pet(&self, id: PetId) -> Result<bool>;

    /// Claims a pet for a confirmed adoption.
    ///
    /// Conditional write: returns true only for the first caller, so at
    /// most one adoption per pet can reach the confirmed state even when
    /// two adopters pay concurrently.
    async fn claim_pet(&self, id: PetId, adoption_id: AdoptionId) -> Result<bool>;
}

/// Persistence operations for adoption requests.
#[async_trait]
pub trait AdoptionStore: Send + Sync {
    /// Persists a new pending request.
    async fn create_adoption(&self, request: &AdoptionRequest) -> Result<()>;

    /// Loads a request by ID. Returns None if it does not exist.
    async fn get_adoption(&self, id: AdoptionId) -> Result<Option<AdoptionRequest>>;

    /// Records the payment-provider order id. Returns false if the request
    /// does not exist.
    async fn set_order(&self, id: AdoptionId, order_id: &str) -> Result<bool>;

    /// Transitions a pending request to paid, recording the provider
    /// payment id. Returns false if the request is missing or not pending.
    async fn mark_paid(&self, id: AdoptionId, payment_id: &str) -> Result<bool>;

    /// Transitions a pending request to failed. Returns false if the
    /// request is missing or not pending.
    async fn mark_failed(&self, id: AdoptionId) -> Result<bool>;

    /// Sets `notified_at` on a paid, not-yet-notified request.
    ///
    /// Conditional write: returns true only for the first caller, making
    /// the confirmation e-mails at-most-once across sessions and devices.
    async fn mark_notified(&self, id: AdoptionId) -> Result<bool>;
}
