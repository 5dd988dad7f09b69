use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use signaler::server::{
    NoopHooks, QueryAuthenticator, RoomRegistry, SignalingService, TransportConfig, router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "signaler", version, about = "WebRTC signaling relay")]
struct Args {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Seconds between keepalive pings.
    #[arg(long, env = "SIGNALER_PING_PERIOD_SECS", default_value_t = 5)]
    ping_period_secs: u64,

    /// Seconds a single write may take before the session is dropped.
    #[arg(long, env = "SIGNALER_WRITE_TIMEOUT_SECS", default_value_t = 10)]
    write_timeout_secs: u64,

    /// Accepted API keys. Any key is accepted when none are given.
    #[arg(long = "api-key", env = "SIGNALER_API_KEYS", value_delimiter = ',')]
    api_keys: Vec<String>,
}

impl Args {
    fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            ping_period: Duration::from_secs(self.ping_period_secs.max(1)),
            write_timeout: Duration::from_secs(self.write_timeout_secs.max(1)),
            ..TransportConfig::default()
        }
    }

    fn authenticator(&self) -> QueryAuthenticator {
        if self.api_keys.is_empty() {
            QueryAuthenticator::new()
        } else {
            QueryAuthenticator::with_allowed_api_keys(self.api_keys.iter().map(String::as_str))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let service = SignalingService::new(
        Arc::new(RoomRegistry::new()),
        Arc::new(args.authenticator()),
        Arc::new(NoopHooks),
        args.transport_config(),
    );
    let app = router(service);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!("{}", "📡 Signaler is up".green().bold());
    info!("Signaling server listening on ws://{}", addr);
    if !args.api_keys.is_empty() {
        info!("Accepting {} API key(s)", args.api_keys.len());
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Signaling server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
