//! Atelier API server

use atelier_server::{AppState, build_router, config::Config, mail::ResendMailer, open_store};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atelier_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let store = open_store(&config)?;
    if config.resend_email.is_none() {
        info!("RESEND_EMAIL not set, the contact form will answer with an error");
    }
    let mailer = Arc::new(ResendMailer::new(config.resend_api_key.clone()));
    let addr = config.bind;
    let state = AppState::new(store, mailer, config);

    info!("Atelier server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
