//! Hosted image-generation provider integration.
//!
//! Each provider wraps one Replicate-hosted model behind a uniform
//! prompt-to-URL contract. Requests pick a preferred provider; the fallback
//! controller supplies the other on failure.

pub mod flux;
pub mod ideogram;
pub mod mock;
pub mod replicate;

pub use flux::FluxClient;
pub use ideogram::IdeogramClient;
pub use mock::MockImageGenerationClient;

use crate::models::ProviderKind;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Which hosted provider this client talks to.
    fn kind(&self) -> ProviderKind;
    /// Generate one image for the prompt and return its hosted URL.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
