use async_trait::async_trait;
use common::{AdoptionId, PetId};
use domain::{AdoptionRequest, Money, Pet};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Result,
    store::{AdoptionStore, PetStore},
};

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_pet(row: PgRow) -> Result<Pet> {
        Ok(Pet {
            id: PetId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            category: row.try_get::<String, _>("category")?.parse()?,
            age: row.try_get::<String, _>("age")?.parse()?,
            sex: row.try_get::<String, _>("sex")?.parse()?,
            location: row.try_get("location")?,
            health_status: row.try_get("health_status")?,
            vaccinated: row.try_get("vaccinated")?,
            personality: row.try_get("personality")?,
            adoption_type: row.try_get::<String, _>("adoption_type")?.parse()?,
            price: row
                .try_get::<Option<i64>, _>("price_paise")?
                .map(Money::from_paise),
            main_image: row.try_get("main_image")?,
            extra_images: row.try_get("extra_images")?,
            owner_name: row.try_get("owner_name")?,
            owner_phone: row.try_get("owner_phone")?,
            owner_email: row.try_get("owner_email")?,
            description: row.try_get("description")?,
            adopted_by: row
                .try_get::<Option<Uuid>, _>("adopted_by")?
                .map(AdoptionId::from_uuid),
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_adoption(row: PgRow) -> Result<AdoptionRequest> {
        Ok(AdoptionRequest {
            id: AdoptionId::from_uuid(row.try_get::<Uuid, _>("id")?),
            pet_id: PetId::from_uuid(row.try_get::<Uuid, _>("pet_id")?),
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            state: row.try_get("state")?,
            location: row.try_get("location")?,
            landmark: row.try_get("landmark")?,
            status: row.try_get::<String, _>("status")?.parse()?,
            order_id: row.try_get("order_id")?,
            payment_id: row.try_get("payment_id")?,
            notified_at: row.try_get("notified_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

const PET_COLUMNS: &str = "id, name, category, age, sex, location, health_status, vaccinated, \
     personality, adoption_type, price_paise, main_image, extra_images, owner_name, \
     owner_phone, owner_email, description, adopted_by, created_at";

const ADOPTION_COLUMNS: &str = "id, pet_id, full_name, email, phone, state, location, landmark, \
     status, order_id, payment_id, notified_at, created_at";

#[async_trait]
impl PetStore for PostgresStore {
    async fn create_pet(&self, pet: &Pet) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pets (id, name, category, age, sex, location, health_status, vaccinated,
                personality, adoption_type, price_paise, main_image, extra_images, owner_name,
                owner_phone, owner_email, description, adopted_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(pet.id.as_uuid())
        .bind(&pet.name)
        .bind(pet.category.as_str())
        .bind(pet.age.as_str())
        .bind(pet.sex.as_str())
        .bind(&pet.location)
        .bind(&pet.health_status)
        .bind(pet.vaccinated)
        .bind(&pet.personality)
        .bind(pet.adoption_type.as_str())
        .bind(pet.price.map(|p| p.paise()))
        .bind(&pet.main_image)
        .bind(&pet.extra_images)
        .bind(&pet.owner_name)
        .bind(&pet.owner_phone)
        .bind(&pet.owner_email)
        .bind(&pet.description)
        .bind(pet.adopted_by.map(|id| id.as_uuid()))
        .bind(pet.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_pet(&self, id: PetId) -> Result<Option<Pet>> {
        let row = sqlx::query(&format!("SELECT {PET_COLUMNS} FROM pets WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_pet).transpose()
    }

    async fn list_pets(&self) -> Result<Vec<Pet>> {
        let rows = sqlx::query(&format!(
            "SELECT {PET_COLUMNS} FROM pets ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_pet).collect()
    }

    async fn update_pet(&self, pet: &Pet) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE pets
            SET name = $2, category = $3, age = $4, sex = $5, location = $6,
                health_status = $7, vaccinated = $8, personality = $9, adoption_type = $10,
                price_paise = $11, main_image = $12, extra_images = $13, owner_name = $14,
                owner_phone = $15, owner_email = $16, description = $17
            WHERE id = $1
            "#,
        )
        .bind(pet.id.as_uuid())
        .bind(&pet.name)
        .bind(pet.category.as_str())
        .bind(pet.age.as_str())
        .bind(pet.sex.as_str())
        .bind(&pet.location)
        .bind(&pet.health_status)
        .bind(pet.vaccinated)
        .bind(&pet.personality)
        .bind(pet.adoption_type.as_str())
        .bind(pet.price.map(|p| p.paise()))
        .bind(&pet.main_image)
        .bind(&pet.extra_images)
        .bind(&pet.owner_name)
        .bind(&pet.owner_phone)
        .bind(&pet.owner_email)
        .bind(&pet.description)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_pet(&self, id: PetId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pets WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    #[tracing::instrument(skip(self))]
    async fn claim_pet(&self, id: PetId, adoption_id: AdoptionId) -> Result<bool> {
        // Conditional write: only the first adoption gets the claim.
        let result =
            sqlx::query("UPDATE pets SET adopted_by = $2 WHERE id = $1 AND adopted_by IS NULL")
                .bind(id.as_uuid())
                .bind(adoption_id.as_uuid())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl AdoptionStore for PostgresStore {
    async fn create_adoption(&self, request: &AdoptionRequest) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO adoption_requests (id, pet_id, full_name, email, phone, state, location,
                landmark, status, order_id, payment_id, notified_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(request.pet_id.as_uuid())
        .bind(&request.full_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.state)
        .bind(&request.location)
        .bind(&request.landmark)
        .bind(request.status.as_str())
        .bind(&request.order_id)
        .bind(&request.payment_id)
        .bind(request.notified_at)
        .bind(request.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_adoption(&self, id: AdoptionId) -> Result<Option<AdoptionRequest>> {
        let row = sqlx::query(&format!(
            "SELECT {ADOPTION_COLUMNS} FROM adoption_requests WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_adoption).transpose()
    }

    async fn set_order(&self, id: AdoptionId, order_id: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE adoption_requests SET order_id = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    #[tracing::instrument(skip(self, payment_id))]
    async fn mark_paid(&self, id: AdoptionId, payment_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE adoption_requests
            SET status = 'paid', payment_id = $2
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id.as_uuid())
        .bind(payment_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_failed(&self, id: AdoptionId) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE adoption_requests SET status = 'failed' WHERE id = $1 AND status = 'pending'",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    #[tracing::instrument(skip(self))]
    async fn mark_notified(&self, id: AdoptionId) -> Result<bool> {
        // Conditional write: at most one caller ever sees true.
        let result = sqlx::query(
            r#"
            UPDATE adoption_requests
            SET notified_at = NOW()
            WHERE id = $1 AND status = 'paid' AND notified_at IS NULL
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
