use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use wire_http::server::Server;
use wire_http_app::{Config, app_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let config = Arc::new(Config::parse());
    info!(?config, "parsed config");

    let server = Server::builder()
        .address(config.address())
        .handler(app_router(Arc::clone(&config)))
        .build()
        .context("invalid server configuration")?;

    let server = server.bind().await.with_context(|| format!("failed to bind to {}:{}", config.host, config.port))?;
    server.serve().await;
    Ok(())
}
