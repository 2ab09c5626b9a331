//! Persistence for pets and adoption requests.
//!
//! Exposes the [`PetStore`] and [`AdoptionStore`] traits with two
//! implementations: PostgreSQL (sqlx) and an in-memory twin for tests.
//! The conditional writes (`claim_pet`, `mark_paid`, `mark_notified`)
//! carry the pipeline's uniqueness guarantees.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::StoreError;
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use store::{AdoptionStore, PetStore};

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
