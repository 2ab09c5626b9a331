use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{AdoptionId, PetId};
use domain::{AdoptionRequest, Pet};
use tokio::sync::RwLock;

use crate::{
    Result,
    store::{AdoptionStore, PetStore},
};

/// In-memory store implementation for testing.
///
/// This implementation keeps all rows in memory and provides the same
/// interface and conditional-write semantics as the PostgreSQL
/// implementation.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    pets: Arc<RwLock<HashMap<PetId, Pet>>>,
    adoptions: Arc<RwLock<HashMap<AdoptionId, AdoptionRequest>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored listings.
    pub async fn pet_count(&self) -> usize {
        self.pets.read().await.len()
    }

    /// Returns the number of stored adoption requests.
    pub async fn adoption_count(&self) -> usize {
        self.adoptions.read().await.len()
    }
}

#[async_trait]
impl PetStore for InMemoryStore {
    async fn create_pet(&self, pet: &Pet) -> Result<()> {
        self.pets.write().await.insert(pet.id, pet.clone());
        Ok(())
    }

    async fn get_pet(&self, id: PetId) -> Result<Option<Pet>> {
        Ok(self.pets.read().await.get(&id).cloned())
    }

    async fn list_pets(&self) -> Result<Vec<Pet>> {
        let pets = self.pets.read().await;
        let mut all: Vec<Pet> = pets.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn update_pet(&self, pet: &Pet) -> Result<bool> {
        let mut pets = self.pets.write().await;
        match pets.get_mut(&pet.id) {
            Some(existing) => {
                *existing = pet.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_pet(&self, id: PetId) -> Result<bool> {
        Ok(self.pets.write().await.remove(&id).is_some())
    }

    async fn claim_pet(&self, id: PetId, adoption_id: AdoptionId) -> Result<bool> {
        let mut pets = self.pets.write().await;
        match pets.get_mut(&id) {
            Some(pet) if pet.adopted_by.is_none() => {
                pet.adopted_by = Some(adoption_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl AdoptionStore for InMemoryStore {
    async fn create_adoption(&self, request: &AdoptionRequest) -> Result<()> {
        self.adoptions
            .write()
            .await
            .insert(request.id, request.clone());
        Ok(())
    }

    async fn get_adoption(&self, id: AdoptionId) -> Result<Option<AdoptionRequest>> {
        Ok(self.adoptions.read().await.get(&id).cloned())
    }

    async fn set_order(&self, id: AdoptionId, order_id: &str) -> Result<bool> {
        let mut adoptions = self.adoptions.write().await;
        match adoptions.get_mut(&id) {
            Some(request) => {
                request.order_id = Some(order_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_paid(&self, id: AdoptionId, payment_id: &str) -> Result<bool> {
        let mut adoptions = self.adoptions.write().await;
        match adoptions.get_mut(&id) {
            Some(request) if request.status.can_mark_paid() => {
                request.status = domain::AdoptionStatus::Paid;
                request.payment_id = Some(payment_id.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_failed(&self, id: AdoptionId) -> Result<bool> {
        let mut adoptions = self.adoptions.write().await;
        match adoptions.get_mut(&id) {
            Some(request) if request.status.can_mark_failed() => {
                request.status = domain::AdoptionStatus::Failed;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_notified(&self, id: AdoptionId) -> Result<bool> {
        let mut adoptions = self.adoptions.write().await;
        match adoptions.get_mut(&id) {
            Some(request) if request.status.can_notify() && request.notified_at.is_none() => {
                request.notified_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
