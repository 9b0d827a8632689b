//! Data models and structures
//!
//! Defines the core data structures for generation requests, persisted
//! generation records, and application configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// The retro media formats the prompt builder knows how to stage.
///
/// Request bodies carry the media type as a free string; [`MediaType::parse`]
/// maps known labels (including labels from earlier UI revisions) onto this
/// closed set. Anything else falls through to the generic template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Book,
    VinylRecord,
    VhsTape,
    GigFlyer,
    Cassette,
}

impl MediaType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Book" | "Autobiography" => Some(MediaType::Book),
            "Vinyl Record" | "Vinyl" => Some(MediaType::VinylRecord),
            "VHS Tape" | "VHS" => Some(MediaType::VhsTape),
            "Gig Flyer" | "Gig Poster" => Some(MediaType::GigFlyer),
            "Cassette" | "Cassette Tape" => Some(MediaType::Cassette),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Book => "Book",
            MediaType::VinylRecord => "Vinyl Record",
            MediaType::VhsTape => "VHS Tape",
            MediaType::GigFlyer => "Gig Flyer",
            MediaType::Cassette => "Cassette",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which hosted generation model a request prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Ideogram,
    Flux,
}

impl ProviderKind {
    /// Lenient parse of the client-supplied `modelChoice` flag. Unknown
    /// values yield `None` and the caller falls back to the default.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ideogram" => Some(ProviderKind::Ideogram),
            "flux" => Some(ProviderKind::Flux),
            _ => None,
        }
    }

    /// The alternate provider used for the single fallback attempt.
    pub fn other(self) -> Self {
        match self {
            ProviderKind::Ideogram => ProviderKind::Flux,
            ProviderKind::Flux => ProviderKind::Ideogram,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Ideogram => f.write_str("ideogram"),
            ProviderKind::Flux => f.write_str("flux"),
        }
    }
}

/// Body of `POST /api/generate`. Everything except the phrase is optional;
/// the phrase is validated at the handler so a missing value produces a 400
/// rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub phrase: Option<String>,
    pub subtitle: Option<String>,
    pub media_type: Option<String>,
    pub vibe: Option<String>,
    pub movie_genre: Option<String>,
    pub flyer_style: Option<String>,
    pub decade: Option<String>,
    pub found_at: Option<String>,
    pub model_choice: Option<String>,
}

impl GenerateRequest {
    /// The trimmed phrase, or `None` when absent/blank.
    pub fn phrase(&self) -> Option<&str> {
        self.phrase
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    pub fn preferred_provider(&self) -> ProviderKind {
        self.model_choice
            .as_deref()
            .and_then(ProviderKind::parse)
            .unwrap_or(ProviderKind::Ideogram)
    }
}

/// Requester identity derived from reverse-proxy headers. Never computed
/// locally; absent headers stay `None`.
#[derive(Debug, Clone, Default)]
pub struct RequestOrigin {
    pub ip_address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Metadata row appended once per successful generation.
#[derive(Debug, Clone, Default)]
pub struct NewGeneration {
    pub ip_address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phrase: String,
    pub subtitle: Option<String>,
    pub media_type: Option<String>,
    pub vibe: Option<String>,
    pub movie_genre: Option<String>,
    pub flyer_style: Option<String>,
    /// Best available copy: durable storage URL when the mirror succeeded,
    /// otherwise the raw provider URL.
    pub image_url: String,
    /// Raw provider URL, kept as a fallback reference.
    pub replicate_url: String,
}

/// A row from the `generations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenerationRecord {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phrase: String,
    pub subtitle: Option<String>,
    pub media_type: Option<String>,
    pub vibe: Option<String>,
    pub movie_genre: Option<String>,
    pub flyer_style: Option<String>,
    pub image_url: Option<String>,
    pub replicate_url: Option<String>,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub replicate_api_token: String,
    pub database_url: String,
    pub storage_access_key_id: String,
    pub storage_secret_access_key: String,
    pub storage_endpoint: String,
    pub storage_bucket: String,
    pub storage_base_url: String,
    pub admin_username: String,
    /// Argon2id PHC hash of the admin password. Credentials never appear in
    /// source or in cookie values.
    pub admin_password_hash: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            replicate_api_token: require_var("REPLICATE_API_TOKEN")?,
            database_url: require_var("DATABASE_URL")?,
            storage_access_key_id: require_var("STORAGE_ACCESS_KEY_ID")?,
            storage_secret_access_key: require_var("STORAGE_SECRET_ACCESS_KEY")?,
            storage_endpoint: std::env::var("STORAGE_ENDPOINT")
                .unwrap_or_else(|_| "https://nyc3.digitaloceanspaces.com".to_string()),
            storage_bucket: std::env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "artifact-archive".to_string()),
            storage_base_url: std::env::var("STORAGE_BASE_URL")
                .unwrap_or_else(|_| "https://cdn.artifact-archive.com".to_string()),
            admin_username: require_var("ADMIN_USERNAME")?,
            admin_password_hash: require_var("ADMIN_PASSWORD_HASH")?,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| crate::Error::Generic("PORT must be a number".to_string()))?,
        })
    }
}

fn require_var(name: &str) -> crate::Result<String> {
    std::env::var(name).map_err(|_| crate::Error::Generic(format!("{} not set", name)))
}
