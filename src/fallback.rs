//! Two-try provider cascade.
//!
//! The preferred provider goes first; on failure the alternate is attempted
//! exactly once and a second failure surfaces as the request's error. No
//! retries, no backoff.

use crate::models::ProviderKind;
use crate::providers::ImageGenerationService;
use crate::Result;
use tracing::{error, warn};

/// Returns the generated image URL together with the provider that actually
/// produced it.
pub async fn generate_with_fallback(
    primary: &dyn ImageGenerationService,
    secondary: &dyn ImageGenerationService,
    prompt: &str,
) -> Result<(String, ProviderKind)> {
    match primary.generate(prompt).await {
        Ok(url) => Ok((url, primary.kind())),
        Err(primary_err) => {
            warn!(
                "Provider {} failed: {}. Trying {} once.",
                primary.kind(),
                primary_err,
                secondary.kind()
            );
            match secondary.generate(prompt).await {
                Ok(url) => Ok((url, secondary.kind())),
                Err(secondary_err) => {
                    error!(
                        "Fallback provider {} also failed: {}",
                        secondary.kind(),
                        secondary_err
                    );
                    Err(secondary_err)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockImageGenerationClient;

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let primary = MockImageGenerationClient::new(ProviderKind::Ideogram)
            .with_url_response("https://replicate.delivery/primary.png".to_string());
        let secondary = MockImageGenerationClient::new(ProviderKind::Flux);

        let (url, used) = generate_with_fallback(&primary, &secondary, "prompt")
            .await
            .unwrap();

        assert_eq!(url, "https://replicate.delivery/primary.png");
        assert_eq!(used, ProviderKind::Ideogram);
        assert_eq!(primary.get_call_count(), 1);
        assert_eq!(secondary.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back_once() {
        let primary = MockImageGenerationClient::new(ProviderKind::Ideogram)
            .with_error_response("primary down".to_string());
        let secondary = MockImageGenerationClient::new(ProviderKind::Flux)
            .with_url_response("https://replicate.delivery/fallback.jpg".to_string());

        let (url, used) = generate_with_fallback(&primary, &secondary, "prompt")
            .await
            .unwrap();

        assert_eq!(url, "https://replicate.delivery/fallback.jpg");
        assert_eq!(used, ProviderKind::Flux);
        assert_eq!(primary.get_call_count(), 1);
        assert_eq!(secondary.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_both_failing_surfaces_secondary_error() {
        let primary = MockImageGenerationClient::new(ProviderKind::Flux)
            .with_error_response("flux down".to_string());
        let secondary = MockImageGenerationClient::new(ProviderKind::Ideogram)
            .with_error_response("ideogram down".to_string());

        let err = generate_with_fallback(&primary, &secondary, "prompt")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("ideogram down"));
        assert_eq!(primary.get_call_count(), 1);
        assert_eq!(secondary.get_call_count(), 1);
    }
}
