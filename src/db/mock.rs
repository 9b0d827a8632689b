use super::GenerationStore;
use crate::models::{GenerationRecord, NewGeneration};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockGenerationStore {
    rows: Arc<Mutex<Vec<NewGeneration>>>,
    insert_count: Arc<Mutex<usize>>,
    fail_inserts: bool,
    schema_initialized: Arc<Mutex<bool>>,
}

impl MockGenerationStore {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            insert_count: Arc::new(Mutex::new(0)),
            fail_inserts: false,
            schema_initialized: Arc::new(Mutex::new(false)),
        }
    }

    /// Make every insert fail, to exercise the logged-and-discarded path.
    pub fn with_insert_failure(mut self) -> Self {
        self.fail_inserts = true;
        self
    }

    pub fn get_insert_count(&self) -> usize {
        *self.insert_count.lock().unwrap()
    }

    pub fn get_rows(&self) -> Vec<NewGeneration> {
        self.rows.lock().unwrap().clone()
    }

    pub fn schema_initialized(&self) -> bool {
        *self.schema_initialized.lock().unwrap()
    }
}

impl Default for MockGenerationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationStore for MockGenerationStore {
    async fn init_schema(&self) -> Result<()> {
        *self.schema_initialized.lock().unwrap() = true;
        Ok(())
    }

    async fn insert(&self, row: &NewGeneration) -> Result<()> {
        let mut count = self.insert_count.lock().unwrap();
        *count += 1;

        if self.fail_inserts {
            return Err(Error::Generic("simulated insert failure".to_string()));
        }

        self.rows.lock().unwrap().push(row.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<GenerationRecord>> {
        let rows = self.rows.lock().unwrap();
        let now = Utc::now();
        Ok(rows
            .iter()
            .enumerate()
            .rev()
            .map(|(index, row)| GenerationRecord {
                id: index as i32 + 1,
                created_at: now,
                ip_address: row.ip_address.clone(),
                city: row.city.clone(),
                country: row.country.clone(),
                phrase: row.phrase.clone(),
                subtitle: row.subtitle.clone(),
                media_type: row.media_type.clone(),
                vibe: row.vibe.clone(),
                movie_genre: row.movie_genre.clone(),
                flyer_style: row.flyer_style.clone(),
                image_url: Some(row.image_url.clone()),
                replicate_url: Some(row.replicate_url.clone()),
            })
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }
}
