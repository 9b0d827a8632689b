//! Admin login, database bootstrap, and the server-rendered dashboard.

use super::session::{
    clear_session_cookie, session_cookie, session_token_from_headers, verify_password,
};
use super::AppState;
use crate::models::GenerationRecord;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

/// Approximate per-image cost used for the spend estimate. Actual billing
/// varies by provider and model; this is a deliberate placeholder.
const COST_PER_IMAGE: f64 = 0.08;

const LOGIN_HTML: &str = include_str!("../../templates/admin_login.html");

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Response {
    // Argon2 verification runs unconditionally so a bad username costs the
    // same as a bad password.
    let password_ok = verify_password(&request.password, &state.admin.password_hash);
    if !password_ok || request.username != state.admin.username {
        warn!("Rejected admin login for username {:?}", request.username);
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid credentials" })),
        )
            .into_response();
    }

    let token = state.sessions.issue();
    (
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(json!({ "success": true })),
    )
        .into_response()
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token_from_headers(&headers) {
        state.sessions.revoke(&token);
    }
    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "success": true })),
    )
        .into_response()
}

pub async fn init_db(State(state): State<AppState>) -> Response {
    match state.app.init_db().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Database initialized successfully" })),
        )
            .into_response(),
        Err(e) => {
            error!("Database init error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to initialize database", "details": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_HTML)
}

pub async fn dashboard(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let authorized = session_token_from_headers(&headers)
        .map(|token| state.sessions.validate(&token))
        .unwrap_or(false);
    if !authorized {
        return Redirect::to("/admin/login").into_response();
    }

    // Listing failures render an empty archive rather than a 500.
    let generations = state.app.list_generations().await.unwrap_or_else(|e| {
        warn!("Failed to fetch generations: {}", e);
        Vec::new()
    });
    let count = state
        .app
        .generation_count()
        .await
        .unwrap_or(generations.len() as i64);

    Html(render_dashboard(&generations, count)).into_response()
}

fn render_dashboard(generations: &[GenerationRecord], count: i64) -> String {
    let estimated_spend = count as f64 * COST_PER_IMAGE;

    let body = if generations.is_empty() {
        "<p class=\"empty\">No artifacts generated yet. Initialize the database at \
         <code>/api/admin/init-db</code>.</p>"
            .to_string()
    } else {
        let mut rows = String::new();
        for generation in generations {
            let location = match (&generation.city, &generation.country) {
                (Some(city), Some(country)) => format!("{}, {}", city, country),
                (None, Some(country)) => country.clone(),
                _ => "Unknown location".to_string(),
            };
            rows.push_str(&format!(
                "<tr>\
                 <td><a href=\"{url}\">{phrase}</a></td>\
                 <td>{media}</td>\
                 <td>{vibe}</td>\
                 <td>{location}</td>\
                 <td>{ip}</td>\
                 <td>{created}</td>\
                 </tr>\n",
                url = escape_html(generation.image_url.as_deref().unwrap_or("#")),
                phrase = escape_html(&generation.phrase),
                media = escape_html(generation.media_type.as_deref().unwrap_or("-")),
                vibe = escape_html(generation.vibe.as_deref().unwrap_or("-")),
                location = escape_html(&location),
                ip = escape_html(generation.ip_address.as_deref().unwrap_or("-")),
                created = generation.created_at.format("%b %e, %Y %H:%M UTC"),
            ));
        }
        format!(
            "<table>\
             <thead><tr><th>Phrase</th><th>Media</th><th>Vibe</th>\
             <th>Location</th><th>IP</th><th>Created</th></tr></thead>\
             <tbody>{}</tbody></table>",
            rows
        )
    };

    format!(
        "<!DOCTYPE html>\n\
         <html><head><title>Artifacts Admin</title>\
         <style>\
         body{{font-family:monospace;background:#1a1a2e;color:#eaeaea;padding:2rem}}\
         h1{{color:#cc5500}}\
         .stats{{display:flex;gap:2rem;margin-bottom:2rem}}\
         .stat{{background:#252542;border:1px solid #3d3d5c;padding:1rem;border-radius:8px}}\
         table{{border-collapse:collapse;width:100%}}\
         td,th{{border-bottom:1px solid #3d3d5c;padding:0.5rem;text-align:left}}\
         a{{color:#cc5500}}\
         </style></head><body>\
         <h1>Artifacts Admin</h1>\
         <p>Usage tracking and image archive</p>\
         <div class=\"stats\">\
         <div class=\"stat\">Total artifacts: <strong>{count}</strong></div>\
         <div class=\"stat\">Estimated spend: <strong>${spend:.2}</strong> @ ${cost}/image</div>\
         </div>\
         {body}\
         </body></html>",
        count = count,
        spend = estimated_spend,
        cost = COST_PER_IMAGE,
        body = body,
    )
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(phrase: &str) -> GenerationRecord {
        GenerationRecord {
            id: 1,
            created_at: Utc::now(),
            ip_address: Some("203.0.113.9".to_string()),
            city: Some("Chicago".to_string()),
            country: Some("US".to_string()),
            phrase: phrase.to_string(),
            subtitle: None,
            media_type: Some("Vinyl Record".to_string()),
            vibe: Some("Mallsoft".to_string()),
            movie_genre: None,
            flyer_style: None,
            image_url: Some("https://cdn.test/artifacts/a.png".to_string()),
            replicate_url: Some("https://replicate.delivery/a.png".to_string()),
        }
    }

    #[test]
    fn test_render_dashboard_lists_rows_and_spend() {
        let page = render_dashboard(&[record("Midnight Static")], 25);
        assert!(page.contains("Midnight Static"));
        assert!(page.contains("Chicago, US"));
        assert!(page.contains("Total artifacts: <strong>25</strong>"));
        // 25 * 0.08
        assert!(page.contains("$2.00"));
    }

    #[test]
    fn test_render_dashboard_empty_state() {
        let page = render_dashboard(&[], 0);
        assert!(page.contains("No artifacts generated yet"));
        assert!(page.contains("/api/admin/init-db"));
    }

    #[test]
    fn test_render_dashboard_escapes_user_text() {
        let page = render_dashboard(&[record("<script>alert(1)</script>")], 1);
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & \"b\" <c>"), "a &amp; &quot;b&quot; &lt;c&gt;");
    }
}
