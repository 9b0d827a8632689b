//! HTTP surface: the JSON API plus the server-rendered admin pages.

pub mod admin;
pub mod generate;
pub mod session;

use crate::app::App;
use crate::models::RequestOrigin;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use session::SessionStore;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Admin credentials loaded from configuration.
pub struct AdminCredentials {
    pub username: String,
    /// Argon2id PHC hash; the plaintext never reaches the server config.
    pub password_hash: String,
}

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything lives behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub app: Arc<App>,
    pub sessions: Arc<SessionStore>,
    pub admin: Arc<AdminCredentials>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", post(generate::generate))
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/logout", post(admin::logout))
        .route("/api/admin/init-db", get(admin::init_db))
        .route("/admin", get(admin::dashboard))
        .route("/admin/login", get(admin::login_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Requester identity from reverse-proxy headers. Nothing is computed
/// locally; absent headers stay `None`.
pub fn request_origin(headers: &HeaderMap) -> RequestOrigin {
    let ip_address = header_value(headers, "x-forwarded-for")
        .and_then(|value| value.split(',').next().map(|ip| ip.trim().to_string()));
    RequestOrigin {
        ip_address,
        city: header_value(headers, "x-geo-city"),
        country: header_value(headers, "x-geo-country"),
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_origin_takes_first_forwarded_ip() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "203.0.113.9, 10.0.0.1".parse().unwrap(),
        );
        headers.insert("x-geo-city", "Chicago".parse().unwrap());
        headers.insert("x-geo-country", "US".parse().unwrap());

        let origin = request_origin(&headers);
        assert_eq!(origin.ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(origin.city.as_deref(), Some("Chicago"));
        assert_eq!(origin.country.as_deref(), Some("US"));
    }

    #[test]
    fn test_request_origin_missing_headers() {
        let origin = request_origin(&HeaderMap::new());
        assert!(origin.ip_address.is_none());
        assert!(origin.city.is_none());
        assert!(origin.country.is_none());
    }
}
