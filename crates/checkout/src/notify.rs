//! Confirmation e-mail composition and dispatch.

use domain::{AdoptionRequest, Pet};

use crate::error::CheckoutError;
use crate::services::email::{EmailMessage, EmailSender};

/// Which of the two confirmation messages were delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendReport {
    pub adopter_sent: bool,
    pub owner_sent: bool,
}

/// Composes and dispatches the post-payment confirmation e-mails.
///
/// Two messages per adoption: the adopter's copy carries the owner's contact
/// details, the owner's copy carries the adopter's and sets the adopter as
/// reply-to. Both sends are attempted concurrently and independently; the
/// call fails if either is refused, and nothing is rolled back or re-sent.
pub struct Notifier<M: EmailSender> {
    mailer: M,
    from: String,
    /// Routes all owner copies to one address when set (staging).
    owner_override: Option<String>,
}

impl<M: EmailSender> Notifier<M> {
    /// Creates a notifier sending from `from`.
    pub fn new(mailer: M, from: impl Into<String>, owner_override: Option<String>) -> Self {
        Self {
            mailer,
            from: from.into(),
            owner_override,
        }
    }

    /// Sends both confirmation messages for a paid adoption.
    #[tracing::instrument(skip(self, adoption, pet), fields(adoption_id = %adoption.id, pet_id = %pet.id))]
    pub async fn notify(
        &self,
        adoption: &AdoptionRequest,
        pet: &Pet,
    ) -> Result<SendReport, CheckoutError> {
        if adoption.email.is_empty() {
            return Err(CheckoutError::MissingRecipient("adopter e-mail"));
        }
        if pet.owner_email.is_empty() {
            return Err(CheckoutError::MissingRecipient("owner e-mail"));
        }

        let owner_to = self
            .owner_override
            .clone()
            .unwrap_or_else(|| pet.owner_email.clone());

        let adopter_message = EmailMessage {
            from: self.from.clone(),
            to: adoption.email.clone(),
            reply_to: None,
            subject: format!("Adoption confirmed for {}", pet.name),
            text: adopter_body(adoption, pet),
        };
        let owner_message = EmailMessage {
            from: self.from.clone(),
            to: owner_to,
            reply_to: Some(adoption.email.clone()),
            subject: format!("New adoption for {}", pet.name),
            text: owner_body(adoption, pet),
        };

        let (adopter, owner) = tokio::join!(
            self.mailer.send(&adopter_message),
            self.mailer.send(&owner_message),
        );

        if let Err(err) = &adopter {
            tracing::warn!(error = %err, "adopter confirmation rejected");
        }
        if let Err(err) = &owner {
            tracing::warn!(error = %err, "owner notification rejected");
        }

        match (adopter, owner) {
            (Ok(()), Ok(())) => {
                metrics::counter!("adoption_emails_sent_total").increment(2);
                Ok(SendReport {
                    adopter_sent: true,
                    owner_sent: true,
                })
            }
            (Err(err), _) | (_, Err(err)) => {
                metrics::counter!("adoption_emails_failed_total").increment(1);
                Err(CheckoutError::Notification(err))
            }
        }
    }
}

fn pet_details(pet: &Pet) -> String {
    format!(
        "Pet Details:\n\
         - Name: {}\n\
         - Category: {}\n\
         - Age: {}\n\
         - Gender: {}\n\
         - Health: {}\n\
         - Vaccination: {}\n\
         - Location: {}",
        pet.name,
        pet.category,
        pet.age,
        pet.sex,
        pet.health_status,
        if pet.vaccinated { "yes" } else { "no" },
        pet.location,
    )
}

fn adopter_details(adoption: &AdoptionRequest) -> String {
    format!(
        "- Name: {}\n\
         - Email: {}\n\
         - Phone: {}\n\
         - State: {}\n\
         - Location: {}\n\
         - Landmark: {}",
        adoption.full_name,
        adoption.email,
        adoption.phone,
        adoption.state,
        adoption.location,
        adoption.landmark,
    )
}

fn adopter_body(adoption: &AdoptionRequest, pet: &Pet) -> String {
    format!(
        "Hi {},\n\n\
         Your adoption payment was successful. Here are the details we sent:\n\n\
         {}\n\n\
         Owner Contact Details:\n\
         - Name: {}\n\
         - Email: {}\n\
         - Phone: {}\n\n\
         Your Contact Details:\n\
         {}\n\n\
         Thank you for adopting with us!",
        adoption.full_name,
        pet_details(pet),
        pet.owner_name,
        pet.owner_email,
        pet.owner_phone,
        adopter_details(adoption),
    )
}

fn owner_body(adoption: &AdoptionRequest, pet: &Pet) -> String {
    format!(
        "Hello {},\n\n\
         A payment has been completed for adoption. Please reach out to the \
         adopter with next steps.\n\n\
         {}\n\n\
         Adopter Details:\n\
         {}\n\n\
         Please contact the adopter to arrange the next steps.",
        pet.owner_name,
        pet_details(pet),
        adopter_details(adoption),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::email::InMemoryMailer;
    use common::PetId;
    use domain::{
        AdoptionIntake, AdoptionType, AgeBracket, Money, PetCategory, PetDraft, Sex,
    };

    fn pet() -> Pet {
        Pet::new(PetDraft {
            name: "Bruno".to_string(),
            category: PetCategory::Dog,
            age: AgeBracket::Young,
            sex: Sex::Male,
            location: "Bangalore".to_string(),
            health_status: "Healthy".to_string(),
            vaccinated: true,
            personality: None,
            adoption_type: AdoptionType::Paid,
            price: Some(Money::from_rupees(500)),
            main_image: "https://storage.example.com/bruno.jpg".to_string(),
            extra_images: vec![],
            owner_name: "Ravi Kumar".to_string(),
            owner_phone: "9888877776".to_string(),
            owner_email: "ravi@example.com".to_string(),
            description: None,
        })
        .unwrap()
    }

    fn adoption(pet_id: PetId) -> AdoptionRequest {
        let intake = AdoptionIntake::new(
            "Asha Rao",
            "asha@example.com",
            "9999999999",
            "KA",
            "Bangalore",
            "Near Park",
        )
        .unwrap();
        AdoptionRequest::new(pet_id, intake)
    }

    #[tokio::test]
    async fn test_notify_sends_both_messages() {
        let mailer = InMemoryMailer::new();
        let notifier = Notifier::new(mailer.clone(), "Adoptions <no-reply@example.com>", None);

        let pet = pet();
        let adoption = adoption(pet.id);
        let report = notifier.notify(&adoption, &pet).await.unwrap();

        assert!(report.adopter_sent);
        assert!(report.owner_sent);
        assert_eq!(mailer.attempt_count(), 2);
        assert_eq!(mailer.sent_count(), 2);

        let to_adopter = &mailer.sent_to("asha@example.com")[0];
        assert_eq!(to_adopter.subject, "Adoption confirmed for Bruno");
        assert!(to_adopter.reply_to.is_none());
        assert!(to_adopter.text.contains("Ravi Kumar"));
        assert!(to_adopter.text.contains("- Vaccination: yes"));

        let to_owner = &mailer.sent_to("ravi@example.com")[0];
        assert_eq!(to_owner.subject, "New adoption for Bruno");
        assert_eq!(to_owner.reply_to.as_deref(), Some("asha@example.com"));
        assert!(to_owner.text.contains("Asha Rao"));
        assert!(to_owner.text.contains("- Landmark: Near Park"));
    }

    #[tokio::test]
    async fn test_owner_override_redirects_owner_copy() {
        let mailer = InMemoryMailer::new();
        let notifier = Notifier::new(
            mailer.clone(),
            "Adoptions <no-reply@example.com>",
            Some("ops@example.com".to_string()),
        );

        let pet = pet();
        let adoption = adoption(pet.id);
        notifier.notify(&adoption, &pet).await.unwrap();

        assert_eq!(mailer.sent_to("ops@example.com").len(), 1);
        assert!(mailer.sent_to("ravi@example.com").is_empty());
    }

    #[tokio::test]
    async fn test_one_rejection_fails_the_call_but_both_are_attempted() {
        let mailer = InMemoryMailer::new();
        mailer.set_fail_recipient("ravi@example.com");
        let notifier = Notifier::new(mailer.clone(), "Adoptions <no-reply@example.com>", None);

        let pet = pet();
        let adoption = adoption(pet.id);
        let result = notifier.notify(&adoption, &pet).await;

        assert!(matches!(result, Err(CheckoutError::Notification(_))));
        assert_eq!(mailer.attempt_count(), 2);
        assert_eq!(mailer.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_owner_email_is_a_precondition_failure() {
        let mailer = InMemoryMailer::new();
        let notifier = Notifier::new(mailer.clone(), "Adoptions <no-reply@example.com>", None);

        let mut pet = pet();
        pet.owner_email = String::new();
        let adoption = adoption(pet.id);

        let result = notifier.notify(&adoption, &pet).await;
        assert!(matches!(
            result,
            Err(CheckoutError::MissingRecipient("owner e-mail"))
        ));
        assert_eq!(mailer.attempt_count(), 0);
    }
}
