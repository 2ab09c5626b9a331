//! Pet listings and their classification enums.

use chrono::{DateTime, Utc};
use common::{AdoptionId, PetId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::money::Money;

/// Species of a listed pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetCategory {
    Dog,
    Cat,
    Rabbit,
    Bird,
    Hen,
    Goat,
    Cow,
    Other,
}

impl PetCategory {
    /// Returns the category name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PetCategory::Dog => "dog",
            PetCategory::Cat => "cat",
            PetCategory::Rabbit => "rabbit",
            PetCategory::Bird => "bird",
            PetCategory::Hen => "hen",
            PetCategory::Goat => "goat",
            PetCategory::Cow => "cow",
            PetCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for PetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PetCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dog" => Ok(PetCategory::Dog),
            "cat" => Ok(PetCategory::Cat),
            "rabbit" => Ok(PetCategory::Rabbit),
            "bird" => Ok(PetCategory::Bird),
            "hen" => Ok(PetCategory::Hen),
            "goat" => Ok(PetCategory::Goat),
            "cow" => Ok(PetCategory::Cow),
            "other" => Ok(PetCategory::Other),
            other => Err(DomainError::UnknownValue {
                kind: "pet category",
                value: other.to_string(),
            }),
        }
    }
}

/// Age bracket of a listed pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBracket {
    Puppy,
    Young,
    Adult,
    Senior,
}

impl AgeBracket {
    /// Returns the bracket name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBracket::Puppy => "puppy",
            AgeBracket::Young => "young",
            AgeBracket::Adult => "adult",
            AgeBracket::Senior => "senior",
        }
    }
}

impl std::fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgeBracket {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "puppy" => Ok(AgeBracket::Puppy),
            "young" => Ok(AgeBracket::Young),
            "adult" => Ok(AgeBracket::Adult),
            "senior" => Ok(AgeBracket::Senior),
            other => Err(DomainError::UnknownValue {
                kind: "age bracket",
                value: other.to_string(),
            }),
        }
    }
}

/// Sex of a listed pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Returns the sex as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Sex {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            other => Err(DomainError::UnknownValue {
                kind: "sex",
                value: other.to_string(),
            }),
        }
    }
}

/// Whether adopting this pet is free or carries a listed price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdoptionType {
    Free,
    Paid,
}

impl AdoptionType {
    /// Returns the adoption type as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionType::Free => "Free",
            AdoptionType::Paid => "Paid",
        }
    }
}

impl std::fmt::Display for AdoptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AdoptionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Free" => Ok(AdoptionType::Free),
            "Paid" => Ok(AdoptionType::Paid),
            other => Err(DomainError::UnknownValue {
                kind: "adoption type",
                value: other.to_string(),
            }),
        }
    }
}

/// Maximum number of supplementary images per listing.
pub const MAX_EXTRA_IMAGES: usize = 3;

/// Administrator-submitted fields for creating or updating a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetDraft {
    pub name: String,
    pub category: PetCategory,
    pub age: AgeBracket,
    pub sex: Sex,
    pub location: String,
    pub health_status: String,
    pub vaccinated: bool,
    /// Free-text personality tags, comma-joined.
    pub personality: Option<String>,
    pub adoption_type: AdoptionType,
    /// Listed price. Must be present iff `adoption_type` is `Paid`.
    pub price: Option<Money>,
    pub main_image: String,
    pub extra_images: Vec<String>,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: String,
    pub description: Option<String>,
}

impl PetDraft {
    fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidListing {
                field: "name",
                reason: "must not be empty",
            });
        }
        match (self.adoption_type, self.price) {
            (AdoptionType::Paid, None) => return Err(DomainError::PriceRequired),
            (AdoptionType::Paid, Some(price)) if !price.is_positive() => {
                return Err(DomainError::InvalidListing {
                    field: "price",
                    reason: "must be positive",
                });
            }
            (AdoptionType::Free, Some(_)) => return Err(DomainError::PriceNotAllowed),
            _ => {}
        }
        if self.extra_images.len() > MAX_EXTRA_IMAGES {
            return Err(DomainError::TooManyImages(self.extra_images.len()));
        }
        Ok(())
    }
}

/// A listed animal.
///
/// Invariant: `price` is present exactly when `adoption_type` is `Paid`,
/// enforced at construction and on update. `adopted_by` is the claim set by
/// the first confirmed adoption; it is never written by listing updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub category: PetCategory,
    pub age: AgeBracket,
    pub sex: Sex,
    pub location: String,
    pub health_status: String,
    pub vaccinated: bool,
    pub personality: Option<String>,
    pub adoption_type: AdoptionType,
    pub price: Option<Money>,
    pub main_image: String,
    pub extra_images: Vec<String>,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: String,
    pub description: Option<String>,
    pub adopted_by: Option<AdoptionId>,
    pub created_at: DateTime<Utc>,
}

impl Pet {
    /// Creates a new listing from a validated draft.
    pub fn new(draft: PetDraft) -> Result<Self, DomainError> {
        draft.validate()?;
        Ok(Self {
            id: PetId::new(),
            name: draft.name,
            category: draft.category,
            age: draft.age,
            sex: draft.sex,
            location: draft.location,
            health_status: draft.health_status,
            vaccinated: draft.vaccinated,
            personality: draft.personality,
            adoption_type: draft.adoption_type,
            price: draft.price,
            main_image: draft.main_image,
            extra_images: draft.extra_images,
            owner_name: draft.owner_name,
            owner_phone: draft.owner_phone,
            owner_email: draft.owner_email,
            description: draft.description,
            adopted_by: None,
            created_at: Utc::now(),
        })
    }

    /// Replaces the listing fields from a validated draft.
    ///
    /// Identity, claim, and creation timestamp are preserved.
    pub fn update(&mut self, draft: PetDraft) -> Result<(), DomainError> {
        draft.validate()?;
        self.name = draft.name;
        self.category = draft.category;
        self.age = draft.age;
        self.sex = draft.sex;
        self.location = draft.location;
        self.health_status = draft.health_status;
        self.vaccinated = draft.vaccinated;
        self.personality = draft.personality;
        self.adoption_type = draft.adoption_type;
        self.price = draft.price;
        self.main_image = draft.main_image;
        self.extra_images = draft.extra_images;
        self.owner_name = draft.owner_name;
        self.owner_phone = draft.owner_phone;
        self.owner_email = draft.owner_email;
        self.description = draft.description;
        Ok(())
    }

    /// Returns true if a confirmed adoption has claimed this pet.
    pub fn is_adopted(&self) -> bool {
        self.adopted_by.is_some()
    }

    /// The amount charged at checkout for this pet.
    ///
    /// Paid listings charge their listed price; free listings charge the
    /// platform fee. Always derived server-side, never from client input.
    pub fn fee(&self, platform_fee: Money) -> Money {
        match (self.adoption_type, self.price) {
            (AdoptionType::Paid, Some(price)) => price,
            _ => platform_fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PetDraft {
        PetDraft {
            name: "Bruno".to_string(),
            category: PetCategory::Dog,
            age: AgeBracket::Young,
            sex: Sex::Male,
            location: "Bangalore".to_string(),
            health_status: "Healthy".to_string(),
            vaccinated: true,
            personality: Some("playful, gentle".to_string()),
            adoption_type: AdoptionType::Paid,
            price: Some(Money::from_rupees(500)),
            main_image: "https://storage.example.com/bruno.jpg".to_string(),
            extra_images: vec![],
            owner_name: "Ravi Kumar".to_string(),
            owner_phone: "9888877776".to_string(),
            owner_email: "ravi@example.com".to_string(),
            description: None,
        }
    }

    #[test]
    fn test_paid_listing_requires_price() {
        let mut d = draft();
        d.price = None;
        assert_eq!(Pet::new(d).unwrap_err(), DomainError::PriceRequired);
    }

    #[test]
    fn test_free_listing_rejects_price() {
        let mut d = draft();
        d.adoption_type = AdoptionType::Free;
        assert_eq!(Pet::new(d).unwrap_err(), DomainError::PriceNotAllowed);
    }

    #[test]
    fn test_free_listing_without_price_is_valid() {
        let mut d = draft();
        d.adoption_type = AdoptionType::Free;
        d.price = None;
        let pet = Pet::new(d).unwrap();
        assert!(!pet.is_adopted());
    }

    #[test]
    fn test_rejects_empty_name() {
        let mut d = draft();
        d.name = "  ".to_string();
        assert!(Pet::new(d).is_err());
    }

    #[test]
    fn test_rejects_nonpositive_price() {
        let mut d = draft();
        d.price = Some(Money::zero());
        assert!(Pet::new(d).is_err());
    }

    #[test]
    fn test_rejects_too_many_extra_images() {
        let mut d = draft();
        d.extra_images = vec![
            "a.jpg".to_string(),
            "b.jpg".to_string(),
            "c.jpg".to_string(),
            "d.jpg".to_string(),
        ];
        assert_eq!(Pet::new(d).unwrap_err(), DomainError::TooManyImages(4));
    }

    #[test]
    fn test_fee_paid_listing_uses_listed_price() {
        let pet = Pet::new(draft()).unwrap();
        assert_eq!(pet.fee(Money::from_rupees(500)), Money::from_rupees(500));

        let mut d = draft();
        d.price = Some(Money::from_rupees(1200));
        let pet = Pet::new(d).unwrap();
        assert_eq!(pet.fee(Money::from_rupees(500)), Money::from_rupees(1200));
    }

    #[test]
    fn test_fee_free_listing_uses_platform_fee() {
        let mut d = draft();
        d.adoption_type = AdoptionType::Free;
        d.price = None;
        let pet = Pet::new(d).unwrap();
        assert_eq!(pet.fee(Money::from_rupees(500)), Money::from_rupees(500));
    }

    #[test]
    fn test_update_preserves_identity_and_claim() {
        let mut pet = Pet::new(draft()).unwrap();
        let id = pet.id;
        let created_at = pet.created_at;
        pet.adopted_by = Some(common::AdoptionId::new());

        let mut d = draft();
        d.name = "Sheru".to_string();
        pet.update(d).unwrap();

        assert_eq!(pet.id, id);
        assert_eq!(pet.created_at, created_at);
        assert_eq!(pet.name, "Sheru");
        assert!(pet.is_adopted());
    }

    #[test]
    fn test_update_revalidates_price_invariant() {
        let mut pet = Pet::new(draft()).unwrap();
        let mut d = draft();
        d.price = None;
        assert_eq!(pet.update(d).unwrap_err(), DomainError::PriceRequired);
    }

    #[test]
    fn test_enum_parse_roundtrip() {
        for category in [
            PetCategory::Dog,
            PetCategory::Cat,
            PetCategory::Rabbit,
            PetCategory::Bird,
            PetCategory::Hen,
            PetCategory::Goat,
            PetCategory::Cow,
            PetCategory::Other,
        ] {
            let parsed: PetCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("hamster".parse::<PetCategory>().is_err());

        let age: AgeBracket = "senior".parse().unwrap();
        assert_eq!(age, AgeBracket::Senior);
        let sex: Sex = "female".parse().unwrap();
        assert_eq!(sex, Sex::Female);
        let adoption_type: AdoptionType = "Paid".parse().unwrap();
        assert_eq!(adoption_type, AdoptionType::Paid);
    }
}
