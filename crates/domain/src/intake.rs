//! Adopter intake validation.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Adopter-submitted fields, validated at the boundary.
///
/// Construction is the validation gate: a value of this type always carries
/// a non-empty name and a plausible e-mail and phone number. Snapshots are
/// immutable once built; the pipeline never mutates intake fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionIntake {
    full_name: String,
    email: String,
    phone: String,
    state: String,
    location: String,
    landmark: String,
}

impl AdoptionIntake {
    /// Validates and builds an intake record. All fields are trimmed.
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        state: impl Into<String>,
        location: impl Into<String>,
        landmark: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let full_name = full_name.into().trim().to_string();
        let email = email.into().trim().to_string();
        let phone = phone.into().trim().to_string();
        let state = state.into().trim().to_string();
        let location = location.into().trim().to_string();
        let landmark = landmark.into().trim().to_string();

        if full_name.is_empty() {
            return Err(DomainError::InvalidIntake {
                field: "full_name",
                reason: "must not be empty",
            });
        }
        if !plausible_email(&email) {
            return Err(DomainError::InvalidIntake {
                field: "email",
                reason: "must look like an e-mail address",
            });
        }
        if !plausible_phone(&phone) {
            return Err(DomainError::InvalidIntake {
                field: "phone",
                reason: "must be 7 to 15 digits",
            });
        }
        if state.is_empty() {
            return Err(DomainError::InvalidIntake {
                field: "state",
                reason: "must not be empty",
            });
        }
        if location.is_empty() {
            return Err(DomainError::InvalidIntake {
                field: "location",
                reason: "must not be empty",
            });
        }
        if landmark.is_empty() {
            return Err(DomainError::InvalidIntake {
                field: "landmark",
                reason: "must not be empty",
            });
        }

        Ok(Self {
            full_name,
            email,
            phone,
            state,
            location,
            landmark,
        })
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn landmark(&self) -> &str {
        &self.landmark
    }
}

/// Syntactic plausibility only: one `@` with non-empty local part and a
/// dotted domain. Deliverability is the e-mail provider's problem.
fn plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || email.contains(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// 7 to 15 digits after stripping common separators and a leading `+`.
fn plausible_phone(phone: &str) -> bool {
    let digits: String = phone
        .strip_prefix('+')
        .unwrap_or(phone)
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}
