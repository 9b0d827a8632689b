//! Best-effort archival of generated images.
//!
//! Two independent steps run after a successful generation: mirror the
//! provider's image into durable storage, and append a metadata row. Both
//! return results internally, and both failures are logged and deliberately
//! discarded — archival must never break the user-facing request.

use crate::db::GenerationStore;
use crate::models::NewGeneration;
use crate::storage::StorageService;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Archiver {
    storage: Box<dyn StorageService>,
    store: Arc<dyn GenerationStore>,
    http: reqwest::Client,
}

impl Archiver {
    pub fn new(storage: Box<dyn StorageService>, store: Arc<dyn GenerationStore>) -> Self {
        Self::new_with_client(storage, store, reqwest::Client::new())
    }

    pub fn new_with_client(
        storage: Box<dyn StorageService>,
        store: Arc<dyn GenerationStore>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            storage,
            store,
            http,
        }
    }

    /// Settle the final image URL and record the generation.
    ///
    /// Returns the durable storage URL when the mirror succeeded, otherwise
    /// the provider URL unchanged. Never fails.
    pub async fn persist(&self, provider_url: &str, mut row: NewGeneration) -> String {
        let image_url = match self.mirror_image(provider_url).await {
            Ok(url) => {
                info!("Mirrored image to durable storage: {}", url);
                url
            }
            Err(e) => {
                warn!(
                    "Mirror to durable storage failed: {}. Serving provider URL.",
                    e
                );
                provider_url.to_string()
            }
        };

        row.image_url = image_url.clone();
        row.replicate_url = provider_url.to_string();
        if let Err(e) = self.store.insert(&row).await {
            warn!("Failed to record generation: {}", e);
        }

        image_url
    }

    async fn mirror_image(&self, provider_url: &str) -> Result<String> {
        let response = self
            .http
            .get(provider_url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = response.bytes().await?;

        let key = format!(
            "artifacts/{}.{}",
            Uuid::new_v4(),
            extension_for(&content_type)
        );
        self.storage.upload_image(&key, &bytes, &content_type).await
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        t if t.starts_with("image/png") => "png",
        t if t.starts_with("image/webp") => "webp",
        t if t.starts_with("image/gif") => "gif",
        _ => "jpg",
    }
}
