use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pr_labeler::config::DEFAULT_CONFIG_PATH;
use pr_labeler::github::OctocrabClient;
use pr_labeler::labeler::Labeler;
use pr_labeler::server::{AppState, build_router};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pr_labeler=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let token = std::env::var("GITHUB_TOKEN").context("GITHUB_TOKEN must be set")?;
    let secret = std::env::var("WEBHOOK_SECRET").context("WEBHOOK_SECRET must be set")?;
    let config_path =
        std::env::var("LABELER_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let addr: SocketAddr = std::env::var("LABELER_BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .context("LABELER_BIND_ADDR must be a socket address")?;

    let client = OctocrabClient::from_token(token)
        .context("failed to build GitHub client")?
        .with_config_path(config_path);
    tracing::info!(config_path = client.config_path(), "Using labeler config path");

    let app = build_router(AppState::new(Labeler::new(client), secret));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
