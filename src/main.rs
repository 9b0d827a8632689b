use anyhow::Result;
use artifact_archive::app::App;
use artifact_archive::http::session::SessionStore;
use artifact_archive::http::{build_router, AdminCredentials, AppState};
use artifact_archive::models::Config;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artifact_archive=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting artifact-archive");

    let config = Config::from_env()?;
    let app = App::from_config(&config).await?;

    let state = AppState {
        app: Arc::new(app),
        sessions: Arc::new(SessionStore::new()),
        admin: Arc::new(AdminCredentials {
            username: config.admin_username.clone(),
            password_hash: config.admin_password_hash.clone(),
        }),
    };

    let router = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
