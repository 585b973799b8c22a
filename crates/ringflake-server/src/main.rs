#![doc = include_str!("../README.md")]

mod server;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ringflake::{Bootstrap, HostResolver, HttpPeerClient, SystemClock};
use server::cache::ExpiringLruCache;
use server::config::{CliArgs, ServerConfig};
use server::service::{AppState, Generator, router};
use server::store::InMemoryUrlStore;
use server::telemetry::init_telemetry;
use tokio::net::TcpListener;
use tokio::signal;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    // Headless DNS records for freshly scheduled peers may lag behind.
    tokio::time::sleep(config.startup_delay).await;

    let assignment = Bootstrap::from_parts(
        HostResolver::new(config.host_port),
        HttpPeerClient::new(config.peer_timeout),
        config.layout,
    )
    .with_timeout(config.bootstrap_timeout)
    .run(config.host_address.as_deref(), &config.node_list)
    .await
    .context("failed to assign a node identity")?;

    tracing::info!(
        identity = %assignment.identity,
        local = %assignment.local.url,
        "starting new node"
    );

    let state = AppState {
        generator: Arc::new(Generator::new(
            assignment.identity,
            config.layout,
            SystemClock::with_epoch(config.epoch),
        )),
        store: Arc::new(InMemoryUrlStore::new()),
        cache: Arc::new(ExpiringLruCache::new(config.cache_capacity, config.cache_ttl)),
        url_domain: Arc::from(config.url_domain.as_str()),
        short_id_width: config.short_id_width,
    };

    let listener = TcpListener::bind(config.server_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server_addr))?;
    tracing::info!(addr = %config.server_addr, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shut down successfully");
    Ok(())
}

fn log_startup_info(config: &ServerConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting shortener with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Starting shortener on {} with peers [{}]",
            config.server_addr,
            config.node_list
        );
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Shutdown signal received, terminating gracefully...");
}
