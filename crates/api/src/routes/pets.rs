//! Pet listing CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use checkout::{EmailSender, PaymentGateway};
use common::PetId;
use domain::{
    AdoptionType, AgeBracket, Money, Pet, PetCategory, PetDraft, Sex,
};
use serde::{Deserialize, Serialize};
use store::{AdoptionStore, PetStore};

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct PetRequest {
    pub name: String,
    pub category: PetCategory,
    pub age: AgeBracket,
    pub sex: Sex,
    pub location: String,
    pub health_status: String,
    pub vaccinated: bool,
    pub personality: Option<String>,
    pub adoption_type: AdoptionType,
    pub price_rupees: Option<i64>,
    pub main_image: String,
    #[serde(default)]
    pub extra_images: Vec<String>,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: String,
    pub description: Option<String>,
}

impl PetRequest {
    fn into_draft(self) -> PetDraft {
        PetDraft {
            name: self.name,
            category: self.category,
            age: self.age,
            sex: self.sex,
            location: self.location,
            health_status: self.health_status,
            vaccinated: self.vaccinated,
            personality: self.personality,
            adoption_type: self.adoption_type,
            price: self.price_rupees.map(Money::from_rupees),
            main_image: self.main_image,
            extra_images: self.extra_images,
            owner_name: self.owner_name,
            owner_phone: self.owner_phone,
            owner_email: self.owner_email,
            description: self.description,
        }
    }
}

// -- Response types --

#[derive(Serialize)]
pub struct PetResponse {
    pub id: String,
    pub name: String,
    pub category: PetCategory,
    pub age: AgeBracket,
    pub sex: Sex,
    pub location: String,
    pub health_status: String,
    pub vaccinated: bool,
    pub personality: Option<String>,
    pub adoption_type: AdoptionType,
    pub price_rupees: Option<i64>,
    pub main_image: String,
    pub extra_images: Vec<String>,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: String,
    pub description: Option<String>,
    pub adopted: bool,
    pub created_at: String,
}

impl From<Pet> for PetResponse {
    fn from(pet: Pet) -> Self {
        Self {
            id: pet.id.to_string(),
            name: pet.name,
            category: pet.category,
            age: pet.age,
            sex: pet.sex,
            location: pet.location,
            health_status: pet.health_status,
            vaccinated: pet.vaccinated,
            personality: pet.personality,
            adoption_type: pet.adoption_type,
            price_rupees: pet.price.map(|p| p.rupees()),
            main_image: pet.main_image,
            extra_images: pet.extra_images,
            owner_name: pet.owner_name,
            owner_phone: pet.owner_phone,
            owner_email: pet.owner_email,
            description: pet.description,
            adopted: pet.adopted_by.is_some(),
            created_at: pet.created_at.to_rfc3339(),
        }
    }
}

// -- Handlers --

/// POST /pets — create a new listing.
#[tracing::instrument(skip(state, req))]
pub async fn create<S, G, M>(
    State(state): State<Arc<AppState<S, G, M>>>,
    Json(req): Json<PetRequest>,
) -> Result<(StatusCode, Json<PetResponse>), ApiError>
where
    S: PetStore + AdoptionStore + Clone + 'static,
    G: PaymentGateway + 'static,
    M: EmailSender + 'static,
{
    let pet = Pet::new(req.into_draft())?;
    state.store.create_pet(&pet).await?;

    Ok((StatusCode::CREATED, Json(pet.into())))
}

/// GET /pets — list all listings, newest first.
#[tracing::instrument(skip(state))]
pub async fn list<S, G, M>(
    State(state): State<Arc<AppState<S, G, M>>>,
) -> Result<Json<Vec<PetResponse>>, ApiError>
where
    S: PetStore + AdoptionStore + Clone + 'static,
    G: PaymentGateway + 'static,
    M: EmailSender + 'static,
{
    let pets = state.store.list_pets().await?;
    Ok(Json(pets.into_iter().map(PetResponse::from).collect()))
}

/// GET /pets/{id} — load a listing by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S, G, M>(
    State(state): State<Arc<AppState<S, G, M>>>,
    Path(id): Path<String>,
) -> Result<Json<PetResponse>, ApiError>
where
    S: PetStore + AdoptionStore + Clone + 'static,
    G: PaymentGateway + 'static,
    M: EmailSender + 'static,
{
    let pet_id = parse_pet_id(&id)?;
    let pet = state
        .store
        .get_pet(pet_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Pet {id} not found")))?;

    Ok(Json(pet.into()))
}

/// PUT /pets/{id} — replace a listing's fields.
#[tracing::instrument(skip(state, req))]
pub async fn update<S, G, M>(
    State(state): State<Arc<AppState<S, G, M>>>,
    Path(id): Path<String>,
    Json(req): Json<PetRequest>,
) -> Result<Json<PetResponse>, ApiError>
where
    S: PetStore + AdoptionStore + Clone + 'static,
    G: PaymentGateway + 'static,
    M: EmailSender + 'static,
{
    let pet_id = parse_pet_id(&id)?;
    let mut pet = state
        .store
        .get_pet(pet_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Pet {id} not found")))?;

    pet.update(req.into_draft())?;

    if !state.store.update_pet(&pet).await? {
        return Err(ApiError::NotFound(format!("Pet {id} not found")));
    }

    Ok(Json(pet.into()))
}

/// DELETE /pets/{id} — delete a listing immediately.
#[tracing::instrument(skip(state))]
pub async fn delete<S, G, M>(
    State(state): State<Arc<AppState<S, G, M>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    S: PetStore + AdoptionStore + Clone + 'static,
    G: PaymentGateway + 'static,
    M: EmailSender + 'static,
{
    let pet_id = parse_pet_id(&id)?;
    if !state.store.delete_pet(pet_id).await? {
        return Err(ApiError::NotFound(format!("Pet {id} not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn parse_pet_id(id: &str) -> Result<PetId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid pet ID: {e}")))?;
    Ok(PetId::from_uuid(uuid))
}
