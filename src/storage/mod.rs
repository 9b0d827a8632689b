//! Durable object storage for generated images.
//!
//! Provider URLs are transient; a copy of each image is mirrored to
//! S3-compatible storage (DigitalOcean Spaces) so the archive outlives the
//! provider's retention window.

pub mod client;
pub mod mock;

pub use client::StorageClient;
pub use mock::MockStorageClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Upload image bytes under `key` and return the public URL.
    async fn upload_image(&self, key: &str, data: &[u8], content_type: &str) -> Result<String>;
}
