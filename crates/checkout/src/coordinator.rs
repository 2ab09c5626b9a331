//! Checkout coordinator orchestrating one adoption attempt.

use common::{AdoptionId, PetId};
use domain::{AdoptionIntake, AdoptionRequest, Money};
use store::{AdoptionStore, PetStore};

use crate::error::CheckoutError;
use crate::notify::{Notifier, SendReport};
use crate::services::email::EmailSender;
use crate::services::payment::{PaymentGateway, ProviderOrder};
use crate::signature::SignatureVerifier;
use crate::state::CheckoutState;

/// Currency every order is charged in.
pub const CURRENCY: &str = "INR";

/// Fields the provider reports when a payment completes.
#[derive(Debug, Clone)]
pub struct PaymentCallback {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// A checkout handed to the payment widget, suspended on the adopter.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub adoption_id: AdoptionId,
    pub order: ProviderOrder,
    pub state: CheckoutState,
}

/// Outcome of processing a payment callback.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub adoption_id: AdoptionId,
    pub valid: bool,
    pub state: CheckoutState,
}

/// Outcome of a notification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    /// Both messages were dispatched by this call.
    Dispatched(SendReport),
    /// An earlier call already claimed the notification; nothing was sent.
    AlreadySent,
}

/// Orchestrates the adoption pipeline over a store, a payment gateway, and
/// a mailer.
///
/// ```text
/// Intake ──► Saved ──► OrderCreated ──► AwaitingPayment ──► Verifying ──► Confirmed
/// ```
///
/// The coordinator never retries a side effect itself; retries live inside
/// the gateway and mailer where they are idempotent-safe. Nothing reaches
/// `Confirmed` without a verified signature, and side effects are observable
/// only at `Saved` (DB write), `Confirmed` (DB writes) and notification
/// (e-mail sends).
pub struct CheckoutCoordinator<S, G, M>
where
    S: PetStore + AdoptionStore,
    G: PaymentGateway,
    M: EmailSender,
{
    store: S,
    gateway: G,
    verifier: SignatureVerifier,
    notifier: Notifier<M>,
    platform_fee: Money,
}

impl<S, G, M> CheckoutCoordinator<S, G, M>
where
    S: PetStore + AdoptionStore,
    G: PaymentGateway,
    M: EmailSender,
{
    /// Creates a new coordinator.
    pub fn new(
        store: S,
        gateway: G,
        verifier: SignatureVerifier,
        notifier: Notifier<M>,
        platform_fee: Money,
    ) -> Self {
        Self {
            store,
            gateway,
            verifier,
            notifier,
            platform_fee,
        }
    }

    /// Saves the intake and registers a provider order.
    ///
    /// The adoption request is persisted before the order is attempted, so
    /// an abandoned or failed payment still leaves a contact record behind.
    /// `client_amount` is only ever cross-checked against the server-derived
    /// fee; the charged amount never comes from the client.
    #[tracing::instrument(skip(self, intake), fields(%pet_id))]
    pub async fn begin(
        &self,
        pet_id: PetId,
        intake: AdoptionIntake,
        client_amount: Option<Money>,
    ) -> Result<CheckoutSession, CheckoutError> {
        metrics::counter!("checkout_started_total").increment(1);

        let pet = self
            .store
            .get_pet(pet_id)
            .await?
            .ok_or(CheckoutError::PetNotFound(pet_id))?;
        if pet.is_adopted() {
            return Err(CheckoutError::PetAlreadyAdopted(pet_id));
        }

        let request = AdoptionRequest::new(pet_id, intake);
        self.store.create_adoption(&request).await?;
        tracing::info!(adoption_id = %request.id, state = %CheckoutState::Saved, "adoption request saved");

        let fee = pet.fee(self.platform_fee);
        if let Some(supplied) = client_amount
            && supplied != fee
        {
            metrics::counter!("checkout_amount_mismatch_total").increment(1);
            return Err(CheckoutError::AmountMismatch {
                quoted: fee,
                supplied,
            });
        }

        // Receipt is keyed by the adoption, so a retried call de-duplicates
        // at the provider instead of opening a second order.
        let receipt = format!("adoption_{}", request.id);
        let order = match self.gateway.create_order(fee, CURRENCY, &receipt).await {
            Ok(order) => order,
            Err(err) => {
                metrics::counter!("checkout_failed_total").increment(1);
                tracing::warn!(adoption_id = %request.id, error = %err, "order creation failed");
                return Err(err.into());
            }
        };
        self.store.set_order(request.id, &order.order_id).await?;
        tracing::info!(
            adoption_id = %request.id,
            order_id = %order.order_id,
            amount = %order.amount,
            state = %CheckoutState::AwaitingPayment,
            "order created, awaiting payment"
        );

        Ok(CheckoutSession {
            adoption_id: request.id,
            order,
            state: CheckoutState::AwaitingPayment,
        })
    }

    /// Verifies a provider callback and settles the attempt.
    ///
    /// A valid signature claims the pet and marks the request paid; an
    /// invalid one marks it failed. The integrity verdict is never silently
    /// downgraded: a rejected callback always surfaces as `valid: false`.
    #[tracing::instrument(skip(self, callback), fields(%adoption_id, order_id = %callback.order_id))]
    pub async fn confirm(
        &self,
        adoption_id: AdoptionId,
        callback: &PaymentCallback,
    ) -> Result<Confirmation, CheckoutError> {
        let start = std::time::Instant::now();

        let request = self
            .store
            .get_adoption(adoption_id)
            .await?
            .ok_or(CheckoutError::AdoptionNotFound(adoption_id))?;

        if !request.status.can_mark_paid() {
            return Err(CheckoutError::InvalidStatus {
                id: adoption_id,
                expected: "pending",
                actual: request.status,
            });
        }

        tracing::info!(state = %CheckoutState::Verifying, "verifying payment callback");
        let valid = self.verifier.verify(
            &callback.order_id,
            &callback.payment_id,
            &callback.signature,
        )?;
        // The callback must also belong to the order this attempt opened.
        let matches_order = request.order_id.as_deref() == Some(callback.order_id.as_str());

        if !valid || !matches_order {
            self.store.mark_failed(adoption_id).await?;
            metrics::counter!("signature_rejections_total").increment(1);
            metrics::counter!("checkout_failed_total").increment(1);
            tracing::warn!(valid, matches_order, state = %CheckoutState::Failed, "payment callback rejected");
            return Ok(Confirmation {
                adoption_id,
                valid: false,
                state: CheckoutState::Failed,
            });
        }

        if !self.store.claim_pet(request.pet_id, adoption_id).await? {
            self.store.mark_failed(adoption_id).await?;
            metrics::counter!("checkout_failed_total").increment(1);
            tracing::warn!(pet_id = %request.pet_id, "pet already claimed by another adoption");
            return Err(CheckoutError::PetAlreadyAdopted(request.pet_id));
        }

        if !self.store.mark_paid(adoption_id, &callback.payment_id).await? {
            // Lost a race with a concurrent callback for the same request.
            return Err(CheckoutError::InvalidStatus {
                id: adoption_id,
                expected: "pending",
                actual: request.status,
            });
        }

        metrics::counter!("checkout_confirmed_total").increment(1);
        metrics::histogram!("checkout_confirm_duration_seconds")
            .record(start.elapsed().as_secs_f64());
        tracing::info!(state = %CheckoutState::Confirmed, "adoption confirmed");

        Ok(Confirmation {
            adoption_id,
            valid: true,
            state: CheckoutState::Confirmed,
        })
    }

    /// Dispatches the confirmation e-mails for a paid adoption, at most once.
    ///
    /// The notified flag is claimed before sending, so a reload from any
    /// session or device cannot dispatch twice.
    #[tracing::instrument(skip(self), fields(%adoption_id))]
    pub async fn notify(
        &self,
        adoption_id: AdoptionId,
    ) -> Result<NotificationStatus, CheckoutError> {
        let request = self
            .store
            .get_adoption(adoption_id)
            .await?
            .ok_or(CheckoutError::AdoptionNotFound(adoption_id))?;
        let pet = self
            .store
            .get_pet(request.pet_id)
            .await?
            .ok_or(CheckoutError::PetNotFound(request.pet_id))?;

        if !request.status.can_notify() {
            return Err(CheckoutError::InvalidStatus {
                id: adoption_id,
                expected: "paid",
                actual: request.status,
            });
        }

        if !self.store.mark_notified(adoption_id).await? {
            return Ok(NotificationStatus::AlreadySent);
        }

        let report = self.notifier.notify(&request, &pet).await?;
        Ok(NotificationStatus::Dispatched(report))
    }
}
