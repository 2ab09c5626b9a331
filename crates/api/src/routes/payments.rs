//! Payment callback verification endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use checkout::{EmailSender, PaymentCallback, PaymentGateway};
use serde::{Deserialize, Serialize};
use store::{AdoptionStore, PetStore};

use crate::AppState;
use crate::error::ApiError;
use crate::routes::adoptions::parse_adoption_id;

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub adoption_id: String,
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

/// POST /payments/verify — verify a provider callback and settle the attempt.
///
/// Returns `valid: false` for a rejected signature; missing fields and a
/// missing server secret are errors, never verdicts.
#[tracing::instrument(skip(state, req))]
pub async fn verify<S, G, M>(
    State(state): State<Arc<AppState<S, G, M>>>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError>
where
    S: PetStore + AdoptionStore + Clone + 'static,
    G: PaymentGateway + 'static,
    M: EmailSender + 'static,
{
    let adoption_id = parse_adoption_id(&req.adoption_id)?;
    let callback = PaymentCallback {
        order_id: req.order_id,
        payment_id: req.payment_id,
        signature: req.signature,
    };

    let confirmation = state.coordinator.confirm(adoption_id, &callback).await?;

    Ok(Json(VerifyResponse {
        valid: confirmation.valid,
    }))
}
