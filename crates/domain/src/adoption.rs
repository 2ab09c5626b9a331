//! Adoption requests.

use chrono::{DateTime, Utc};
use common::{AdoptionId, PetId};
use serde::{Deserialize, Serialize};

use crate::intake::AdoptionIntake;
use crate::status::AdoptionStatus;

/// One adopter's intake for one pet.
///
/// Created before payment is attempted, so the record survives an abandoned
/// checkout and the adopter stays reachable. `status` is the durable record
/// of the verifier's outcome; `notified_at` is set at most once when the
/// confirmation e-mails go out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdoptionRequest {
    pub id: AdoptionId,
    pub pet_id: PetId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub state: String,
    pub location: String,
    pub landmark: String,
    pub status: AdoptionStatus,
    /// Payment-provider order id, set once the order is created.
    pub order_id: Option<String>,
    /// Payment-provider payment id, set when the callback verifies.
    pub payment_id: Option<String>,
    pub notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AdoptionRequest {
    /// Creates a pending request from validated intake.
    pub fn new(pet_id: PetId, intake: AdoptionIntake) -> Self {
        Self {
            id: AdoptionId::new(),
            pet_id,
            full_name: intake.full_name().to_string(),
            email: intake.email().to_string(),
            phone: intake.phone().to_string(),
            state: intake.state().to_string(),
            location: intake.location().to_string(),
            landmark: intake.landmark().to_string(),
            status: AdoptionStatus::Pending,
            order_id: None,
            payment_id: None,
            notified_at: None,
            created_at: Utc::now(),
        }
    }
}
