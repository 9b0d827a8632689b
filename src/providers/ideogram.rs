use super::replicate::ReplicateHttpClient;
use super::ImageGenerationService;
use crate::models::ProviderKind;
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const MODEL: &str = "ideogram-ai/ideogram-v3-quality";

/// Ideogram renders legible typography, which is what a phrase-bearing
/// artifact needs most; it is the default provider.
pub struct IdeogramClient {
    http: ReplicateHttpClient,
}

#[derive(Debug, Serialize)]
struct IdeogramInput<'a> {
    prompt: &'a str,
    aspect_ratio: &'a str,
    style_type: &'a str,
    magic_prompt_option: &'a str,
}

impl IdeogramClient {
    pub fn new(api_token: String) -> Self {
        Self::new_with_client(api_token, reqwest::Client::new())
    }

    pub fn new_with_client(api_token: String, client: reqwest::Client) -> Self {
        Self {
            http: ReplicateHttpClient::new_with_client(
                api_token,
                Duration::from_secs(120),
                client,
            ),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ImageGenerationService for IdeogramClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ideogram
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let input = IdeogramInput {
            prompt,
            aspect_ratio: "1:1",
            style_type: "Realistic",
            magic_prompt_option: "Auto",
        };

        tracing::debug!("Requesting ideogram generation");
        self.http
            .create_prediction(MODEL, &input)
            .await?
            .first_output_url()
    }
}
