use super::ImageGenerationService;
use crate::models::ProviderKind;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted provider for tests: queued URL/error responses are served in
/// order, cycling when exhausted.
#[derive(Clone)]
pub struct MockImageGenerationClient {
    kind: ProviderKind,
    responses: Arc<Mutex<Vec<std::result::Result<String, String>>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockImageGenerationClient {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_url_response(self, url: String) -> Self {
        self.responses.lock().unwrap().push(Ok(url));
        self
    }

    pub fn with_error_response(self, message: String) -> Self {
        self.responses.lock().unwrap().push(Err(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(format!(
                "https://replicate.delivery/mock/{}-{}.png",
                self.kind, *count
            ));
        }

        let index = (*count - 1) % responses.len();
        match &responses[index] {
            Ok(url) => Ok(url.clone()),
            Err(message) => Err(Error::Provider(message.clone())),
        }
    }
}
