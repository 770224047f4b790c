use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use contact_api::config::Config;
use contact_api::mailer::{Mailer, SmtpMailer};
use contact_api::routes::{build_router, cors_layer};
use contact_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting contact API v{}", env!("CARGO_PKG_VERSION"));

    // Mail relay is optional: without EMAIL_PASS submissions are accepted but not delivered
    let mailer: Option<Arc<dyn Mailer>> = match &config.mail {
        Some(relay) => {
            let mailer = SmtpMailer::new(relay).context("Invalid mail relay configuration")?;
            info!(
                "Mail relay configured: {} -> {}",
                relay.smtp_host, relay.recipient
            );
            Some(Arc::new(mailer))
        }
        None => {
            info!("EMAIL_PASS not set, contact notifications will not be delivered");
            None
        }
    };

    let cors = cors_layer(&config)?;

    let state = AppState {
        mailer,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
