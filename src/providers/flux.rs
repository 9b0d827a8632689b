use super::replicate::ReplicateHttpClient;
use super::ImageGenerationService;
use crate::models::ProviderKind;
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const MODEL: &str = "black-forest-labs/flux-1.1-pro";

pub struct FluxClient {
    http: ReplicateHttpClient,
}

#[derive(Debug, Serialize)]
struct FluxInput<'a> {
    prompt: &'a str,
    aspect_ratio: &'a str,
    output_format: &'a str,
    prompt_upsampling: bool,
    safety_tolerance: u8,
}

impl FluxClient {
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
impl ImageGenerationService for FluxClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Flux
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let input = FluxInput {
            prompt,
            aspect_ratio: "1:1",
            output_format: "jpg",
            prompt_upsampling: false,
            safety_tolerance: 2,
        };

        tracing::debug!("Requesting flux generation");
        self.http
            .create_prediction(MODEL, &input)
            .await?
            .first_output_url()
    }
}
