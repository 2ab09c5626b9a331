//! Adoption checkout and confirmation endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use checkout::{EmailSender, NotificationStatus, PaymentGateway};
use common::AdoptionId;
use domain::{AdoptionIntake, AdoptionRequest, AdoptionStatus, Money};
use serde::{Deserialize, Serialize};
use store::{AdoptionStore, PetStore};

use crate::AppState;
use crate::error::ApiError;
use crate::routes::pets::parse_pet_id;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateAdoptionRequest {
    pub pet_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub state: String,
    pub location: String,
    pub landmark: String,
    /// Optional cross-check only; the charged amount is derived server-side.
    pub amount_rupees: Option<i64>,
}

// -- Response types --

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub adoption_id: String,
    pub order_id: String,
    pub amount_paise: i64,
    pub currency: String,
    pub state: String,
}

#[derive(Serialize)]
pub struct AdoptionResponse {
    pub id: String,
    pub pet_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub state: String,
    pub location: String,
    pub landmark: String,
    pub status: AdoptionStatus,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub notified_at: Option<String>,
    pub created_at: String,
}

impl From<AdoptionRequest> for AdoptionResponse {
    fn from(request: AdoptionRequest) -> Self {
        Self {
            id: request.id.to_string(),
            pet_id: request.pet_id.to_string(),
            full_name: request.full_name,
            email: request.email,
            phone: request.phone,
            state: request.state,
            location: request.location,
            landmark: request.landmark,
            status: request.status,
            order_id: request.order_id,
            payment_id: request.payment_id,
            notified_at: request.notified_at.map(|t| t.to_rfc3339()),
            created_at: request.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct NotifyResponse {
    pub ok: bool,
    pub already_notified: bool,
}

// -- Handlers --

/// POST /adoptions — save the intake and open a payment order.
#[tracing::instrument(skip(state, req))]
pub async fn create<S, G, M>(
    State(state): State<Arc<AppState<S, G, M>>>,
    Json(req): Json<CreateAdoptionRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError>
where
    S: PetStore + AdoptionStore + Clone + 'static,
    G: PaymentGateway + 'static,
    M: EmailSender + 'static,
{
    let pet_id = parse_pet_id(&req.pet_id)?;
    let intake = AdoptionIntake::new(
        req.full_name,
        req.email,
        req.phone,
        req.state,
        req.location,
        req.landmark,
    )?;
    let client_amount = req.amount_rupees.map(Money::from_rupees);

    let session = state
        .coordinator
        .begin(pet_id, intake, client_amount)
        .await?;

    let response = CheckoutResponse {
        adoption_id: session.adoption_id.to_string(),
        order_id: session.order.order_id,
        amount_paise: session.order.amount.paise(),
        currency: session.order.currency,
        state: session.state.to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /adoptions/{id} — load an adoption request by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S, G, M>(
    State(state): State<Arc<AppState<S, G, M>>>,
    Path(id): Path<String>,
) -> Result<Json<AdoptionResponse>, ApiError>
where
    S: PetStore + AdoptionStore + Clone + 'static,
    G: PaymentGateway + 'static,
    M: EmailSender + 'static,
{
    let adoption_id = parse_adoption_id(&id)?;
    let request = state
        .store
        .get_adoption(adoption_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Adoption {id} not found")))?;

    Ok(Json(request.into()))
}

/// POST /adoptions/{id}/notify — dispatch confirmation e-mails, at most once.
///
/// The adoption and pet records are re-read server-side, so the payment
/// status gate cannot be bypassed with a forged payload.
#[tracing::instrument(skip(state))]
pub async fn notify<S, G, M>(
    State(state): State<Arc<AppState<S, G, M>>>,
    Path(id): Path<String>,
) -> Result<Json<NotifyResponse>, ApiError>
where
    S: PetStore + AdoptionStore + Clone + 'static,
    G: PaymentGateway + 'static,
    M: EmailSender + 'static,
{
    let adoption_id = parse_adoption_id(&id)?;
    let status = state.coordinator.notify(adoption_id).await?;

    Ok(Json(NotifyResponse {
        ok: true,
        already_notified: matches!(status, NotificationStatus::AlreadySent),
    }))
}

pub(crate) fn parse_adoption_id(id: &str) -> Result<AdoptionId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid adoption ID: {e}")))?;
    Ok(AdoptionId::from_uuid(uuid))
}
