//! Server-side admin sessions and Argon2id password verification.
//!
//! The cookie carries only an opaque random token; credentials never appear
//! in source or in cookie values, and every token maps to a server-side
//! entry with an expiry.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::http::HeaderMap;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "admin_session";
const SESSION_TTL_DAYS: i64 = 7;

pub struct SessionStore {
    sessions: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Issue a fresh random session token.
    pub fn issue(&self) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);
        self.sessions
            .write()
            .unwrap()
            .insert(token.clone(), expires_at);
        token
    }

    /// Check a token; expired entries are pruned on sight.
    pub fn validate(&self, token: &str) -> bool {
        let now = Utc::now();
        let mut sessions = self.sessions.write().unwrap();
        match sessions.get(token) {
            Some(expires_at) if *expires_at > now => true,
            Some(_) => {
                sessions.remove(token);
                false
            }
            None => false,
        }
    }

    pub fn revoke(&self, token: &str) {
        self.sessions.write().unwrap().remove(token);
    }

    #[cfg(test)]
    pub(crate) fn insert_expired(&self, token: &str) {
        self.sessions
            .write()
            .unwrap()
            .insert(token.to_string(), Utc::now() - Duration::seconds(1));
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string suitable for `ADMIN_PASSWORD_HASH`.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// A malformed stored hash is logged and treated as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::error!("Stored admin password hash is not a valid PHC string: {}", e);
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        60 * 60 * 24 * SESSION_TTL_DAYS
    )
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Extract the session token from a request's `Cookie` header.
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers
        .get(axum::http::header::COOKIE)?
        .to_str()
        .ok()?;
    cookies.split(';').map(str::trim).find_map(|pair| {
        pair.strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    #[test]
    fn test_issue_and_validate_token() {
        let store = SessionStore::new();
        let token = store.issue();
        assert!(store.validate(&token));
        assert!(!store.validate("not-a-token"));
    }

    #[test]
    fn test_revoked_token_is_invalid() {
        let store = SessionStore::new();
        let token = store.issue();
        store.revoke(&token);
        assert!(!store.validate(&token));
    }

    #[test]
    fn test_expired_token_is_invalid_and_pruned() {
        let store = SessionStore::new();
        store.insert_expired("stale");
        assert!(!store.validate("stale"));
        // Pruned: a second check hits the None arm.
        assert!(!store.validate("stale"));
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct-horse-battery-staple").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct-horse-battery-staple", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_verify_password_with_malformed_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_session_token_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            "theme=dark; admin_session=abc123; other=1".parse().unwrap(),
        );
        assert_eq!(
            session_token_from_headers(&headers),
            Some("abc123".to_string())
        );

        let empty = HeaderMap::new();
        assert_eq!(session_token_from_headers(&empty), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("abc123");
        assert!(cookie.starts_with("admin_session=abc123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));

        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
