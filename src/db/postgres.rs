use super::GenerationStore;
use crate::models::{GenerationRecord, NewGeneration};
use crate::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Column list for `generations` queries.
const GENERATION_COLUMNS: &str = "id, created_at, ip_address, city, country, phrase, subtitle, \
     media_type, vibe, movie_genre, flyer_style, image_url, replicate_url";

pub struct PgGenerationStore {
    pool: PgPool,
}

impl PgGenerationStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenerationStore for PgGenerationStore {
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS generations (
                id SERIAL PRIMARY KEY,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                ip_address VARCHAR(45),
                city VARCHAR(100),
                country VARCHAR(100),
                phrase TEXT NOT NULL,
                subtitle TEXT,
                media_type VARCHAR(50),
                vibe TEXT,
                movie_genre VARCHAR(50),
                flyer_style TEXT,
                image_url TEXT,
                replicate_url TEXT
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert(&self, row: &NewGeneration) -> Result<()> {
        sqlx::query(
            "INSERT INTO generations \
                (ip_address, city, country, phrase, subtitle, media_type, \
                 vibe, movie_genre, flyer_style, image_url, replicate_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(&row.ip_address)
        .bind(&row.city)
        .bind(&row.country)
        .bind(&row.phrase)
        .bind(&row.subtitle)
        .bind(&row.media_type)
        .bind(&row.vibe)
        .bind(&row.movie_genre)
        .bind(&row.flyer_style)
        .bind(&row.image_url)
        .bind(&row.replicate_url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<GenerationRecord>> {
        let query =
            format!("SELECT {GENERATION_COLUMNS} FROM generations ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, GenerationRecord>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn count(&self) -> Result<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM generations")
            .fetch_one(&self.pool)
            .await?)
    }
}
