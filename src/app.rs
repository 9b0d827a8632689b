//! Application orchestration for the generation pipeline.
//!
//! One request flows: build prompt → preferred provider (→ fallback provider
//! on failure) → best-effort archive → final URL. Handlers hold the [`App`]
//! behind an `Arc` and call [`App::generate`].

use crate::archive::Archiver;
use crate::db::{GenerationStore, PgGenerationStore};
use crate::fallback::generate_with_fallback;
use crate::models::{
    Config, GenerateRequest, GenerationRecord, NewGeneration, ProviderKind, RequestOrigin,
};
use crate::prompt::{build_prompt, PromptInput};
use crate::providers::{FluxClient, IdeogramClient, ImageGenerationService};
use crate::storage::{StorageClient, StorageService};
use crate::Result;
use std::sync::Arc;
use tracing::info;

/// Coordinates prompt building, provider fallback, and archival.
pub struct App {
    ideogram: Box<dyn ImageGenerationService>,
    flux: Box<dyn ImageGenerationService>,
    archiver: Archiver,
    store: Arc<dyn GenerationStore>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub ideogram: Box<dyn ImageGenerationService>,
    pub flux: Box<dyn ImageGenerationService>,
    pub storage: Box<dyn StorageService>,
    pub store: Arc<dyn GenerationStore>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// This is primarily useful for integration tests and local harnesses
    /// that need to inject mocks.
    pub fn with_services(services: AppServices) -> Self {
        let archiver = Archiver::new(services.storage, Arc::clone(&services.store));
        Self {
            ideogram: services.ideogram,
            flux: services.flux,
            archiver,
            store: services.store,
        }
    }

    /// Construct an app from environment configuration.
    pub async fn from_config(config: &Config) -> Result<Self> {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();

        let ideogram = Box::new(IdeogramClient::new_with_client(
            config.replicate_api_token.clone(),
            http_client.clone(),
        ));
        let flux = Box::new(FluxClient::new_with_client(
            config.replicate_api_token.clone(),
            http_client,
        ));

        let storage = Box::new(
            StorageClient::new(
                config.storage_access_key_id.clone(),
                config.storage_secret_access_key.clone(),
                config.storage_endpoint.clone(),
                config.storage_bucket.clone(),
                config.storage_base_url.clone(),
            )
            .await?,
        );

        let store: Arc<dyn GenerationStore> =
            Arc::new(PgGenerationStore::connect(&config.database_url).await?);
        info!("Database connection pool created");

        Ok(Self::with_services(AppServices {
            ideogram,
            flux,
            storage,
            store,
        }))
    }

    /// Run the full pipeline for one request. The caller has already
    /// validated that the phrase is present.
    pub async fn generate(&self, request: &GenerateRequest, origin: RequestOrigin) -> Result<String> {
        let phrase = request.phrase().unwrap_or_default().to_string();
        let input = PromptInput {
            phrase: phrase.clone(),
            subtitle: request.subtitle.clone(),
            media_type: request.media_type.clone(),
            vibe: request.vibe.clone(),
            movie_genre: request.movie_genre.clone(),
            flyer_style: request.flyer_style.clone(),
            decade: request.decade.clone(),
            found_at: request.found_at.clone(),
        };
        let prompt = build_prompt(&input, &mut rand::thread_rng());
        info!("Built prompt ({} chars)", prompt.len());

        let preferred = request.preferred_provider();
        let (primary, secondary) = self.provider_pair(preferred);
        let (provider_url, used) = generate_with_fallback(primary, secondary, &prompt).await?;
        info!("Image generated by {}", used);

        let row = NewGeneration {
            ip_address: origin.ip_address,
            city: origin.city,
            country: origin.country,
            phrase,
            subtitle: request.subtitle.clone(),
            media_type: request.media_type.clone(),
            vibe: request.vibe.clone(),
            movie_genre: request.movie_genre.clone(),
            flyer_style: request.flyer_style.clone(),
            ..Default::default()
        };

        Ok(self.archiver.persist(&provider_url, row).await)
    }

    fn provider_pair(
        &self,
        preferred: ProviderKind,
    ) -> (&dyn ImageGenerationService, &dyn ImageGenerationService) {
        match preferred {
            ProviderKind::Ideogram => (self.ideogram.as_ref(), self.flux.as_ref()),
            ProviderKind::Flux => (self.flux.as_ref(), self.ideogram.as_ref()),
        }
    }

    pub async fn init_db(&self) -> Result<()> {
        self.store.init_schema().await
    }

    pub async fn list_generations(&self) -> Result<Vec<GenerationRecord>> {
        self.store.list_all().await
    }

    pub async fn generation_count(&self) -> Result<i64> {
        self.store.count().await
    }
}
