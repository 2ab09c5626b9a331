use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pet listing.
///
/// Wraps a UUID to provide type safety and prevent mixing up
/// pet identifiers with other UUID-based identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(Uuid);

impl PetId {
    /// Creates a new random pet ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a pet ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PetId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PetId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<PetId> for Uuid {
    fn from(id: PetId) -> Self {
        id.0
    }
}

/// Unique identifier for an adoption request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdoptionId(Uuid);

impl AdoptionId {
    /// Creates a new random adoption ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an adoption ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AdoptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AdoptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for AdoptionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<AdoptionId> for Uuid {
    fn from(id: AdoptionId) -> Self {
        id.0
    }
}
