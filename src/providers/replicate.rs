//! Shared HTTP plumbing for Replicate-hosted models.

use crate::{Error, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.replicate.com";

pub struct ReplicateHttpClient {
    client: Client,
    api_token: String,
    base_url: String,
    timeout: Duration,
}

impl ReplicateHttpClient {
    pub fn new(api_token: String, timeout: Duration) -> Self {
        Self::new_with_client(api_token, timeout, Client::new())
    }

    pub fn new_with_client(api_token: String, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            api_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Create a synchronous prediction (`Prefer: wait`) for a hosted model.
    pub async fn create_prediction<Req: Serialize>(
        &self,
        model: &str,
        input: &Req,
    ) -> Result<Prediction> {
        let url = format!("{}/v1/models/{}/predictions", self.base_url, model);
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Prefer", "wait")
            .json(&serde_json::json!({ "input": input }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Replicate: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Replicate API error (status {}): {}", status, error_text);
            return Err(Error::Provider(extract_error_message(status, &error_text)));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Replicate response: {}\nBody: {}", e, body);
            Error::Provider(format!("Failed to parse Replicate response: {}", e))
        })
    }
}

/// Pull a human-readable message out of a Replicate error payload, falling
/// back to a generic message when the body is not the expected JSON shape.
fn extract_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["detail", "error", "title"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| format!("Failed to generate image (status {})", status))
}

#[derive(Debug, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Prediction {
    /// Models return either a single URL or an ordered list of URLs; the
    /// first element wins.
    pub fn first_output_url(self) -> Result<String> {
        if let Some(message) = self.error {
            return Err(Error::Provider(message));
        }
        match self.output {
            Some(serde_json::Value::String(url)) => Ok(url),
            Some(serde_json::Value::Array(items)) => items
                .first()
                .and_then(|item| item.as_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    Error::Provider("Replicate returned an empty output list".to_string())
                }),
            _ => Err(Error::Provider(
                "No output in Replicate prediction".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_first_output_url_single_string() {
        let prediction = Prediction {
            output: Some(serde_json::json!("https://replicate.delivery/out.png")),
            error: None,
        };
        assert_eq!(
            prediction.first_output_url().unwrap(),
            "https://replicate.delivery/out.png"
        );
    }

    #[test]
    fn test_first_output_url_takes_first_of_list() {
        let prediction = Prediction {
            output: Some(serde_json::json!([
                "https://replicate.delivery/a.png",
                "https://replicate.delivery/b.png"
            ])),
            error: None,
        };
        assert_eq!(
            prediction.first_output_url().unwrap(),
            "https://replicate.delivery/a.png"
        );
    }

    #[test]
    fn test_first_output_url_rejects_empty_list_and_missing_output() {
        let empty = Prediction {
            output: Some(serde_json::json!([])),
            error: None,
        };
        assert!(matches!(empty.first_output_url(), Err(Error::Provider(_))));

        let missing = Prediction {
            output: None,
            error: None,
        };
        assert!(matches!(missing.first_output_url(), Err(Error::Provider(_))));
    }

    #[test]
    fn test_first_output_url_surfaces_prediction_error() {
        let failed = Prediction {
            output: None,
            error: Some("NSFW content detected".to_string()),
        };
        let err = failed.first_output_url().unwrap_err();
        assert!(err.to_string().contains("NSFW content detected"));
    }

    #[test]
    fn test_extract_error_message_prefers_detail_field() {
        let message = extract_error_message(
            StatusCode::PAYMENT_REQUIRED,
            r#"{"detail": "Insufficient credit"}"#,
        );
        assert_eq!(message, "Insufficient credit");
    }

    #[test]
    fn test_extract_error_message_falls_back_to_generic() {
        let message = extract_error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(message, "Failed to generate image (status 502 Bad Gateway)");
    }

    #[tokio::test]
    async fn test_create_prediction_sends_bearer_token_and_prefer_wait() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/models/owner/model/predictions"))
            .and(header("Authorization", "Bearer r8_test"))
            .and(header("Prefer", "wait"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "output": "https://replicate.delivery/out.png"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReplicateHttpClient::new("r8_test".to_string(), Duration::from_secs(5))
            .with_base_url(server.uri());

        let prediction = client
            .create_prediction("owner/model", &serde_json::json!({ "prompt": "x" }))
            .await
            .unwrap();
        assert_eq!(
            prediction.first_output_url().unwrap(),
            "https://replicate.delivery/out.png"
        );
    }

    #[tokio::test]
    async fn test_create_prediction_extracts_payload_detail_on_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/models/owner/model/predictions"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "detail": "Prompt was flagged"
            })))
            .mount(&server)
            .await;

        let client = ReplicateHttpClient::new("r8_test".to_string(), Duration::from_secs(5))
            .with_base_url(server.uri());

        let err = client
            .create_prediction("owner/model", &serde_json::json!({ "prompt": "x" }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert_eq!(err.to_string(), "Prompt was flagged");
    }
}
