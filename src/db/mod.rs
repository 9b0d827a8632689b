//! Persistence for generation metadata.
//!
//! One append-only table. The orchestrator only inserts; the admin page only
//! reads. Concurrency control is left entirely to Postgres.

pub mod mock;
pub mod postgres;

pub use mock::MockGenerationStore;
pub use postgres::PgGenerationStore;

use crate::models::{GenerationRecord, NewGeneration};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GenerationStore: Send + Sync {
    /// Idempotently create the `generations` table.
    async fn init_schema(&self) -> Result<()>;
    /// Append one metadata row. Rows are never updated or deleted.
    async fn insert(&self, row: &NewGeneration) -> Result<()>;
    /// All rows, newest first.
    async fn list_all(&self) -> Result<Vec<GenerationRecord>>;
    async fn count(&self) -> Result<i64>;
}
