//! Waitlist Engine - Main Entry Point
//! JSON-RPC server + notification dispatcher over a SQLite-backed queue

mod config;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{DaemonConfig, LogFormat};
use waitlist_api_rpc::{RpcServer, RpcServerConfig};
use waitlist_core::application::{dispatch_channel, shutdown_channel, WaitlistService};
use waitlist_core::domain::NoticeTemplates;
use waitlist_core::port::time_provider::SystemTimeProvider;
use waitlist_core::port::Notifier;
use waitlist_infra_notify::{LogNotifier, SendGridConfig, SendGridNotifier};
use waitlist_infra_sqlite::{create_pool, run_migrations, SqliteReservationStore};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_LOG_FILTER: &str = "waitlist_core=info,waitlist_infra_sqlite=info,\
waitlist_infra_notify=info,waitlist_api_rpc=info,waitlist_engine=info";

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Failed to create env filter")?;

    match format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

fn build_notifier(config: &DaemonConfig) -> Result<Arc<dyn Notifier>> {
    match &config.mail {
        Some(mail) => {
            info!(from = %mail.from, "Delivering notices through SendGrid");
            let notifier =
                SendGridNotifier::new(SendGridConfig::new(mail.api_key.clone(), mail.from.clone()))
                    .map_err(|e| anyhow::anyhow!("Notifier setup failed: {}", e))?;
            Ok(Arc::new(notifier))
        }
        None => {
            warn!("SENDGRID_API_KEY not set, notices will only be logged");
            Ok(Arc::new(LogNotifier::new()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration and initialize logging
    let config = DaemonConfig::from_env()?;
    init_logging(config.log_format)?;

    info!("Waitlist Engine v{} starting...", VERSION);

    // 2. Initialize database
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    let db_url = config.db_path.to_string_lossy().into_owned();
    info!(db_path = %db_url, "Initializing database...");

    let pool = create_pool(&db_url)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 3. Setup dependencies (DI wiring)
    let store = Arc::new(SqliteReservationStore::new(pool.clone()));
    let notifier = build_notifier(&config)?;
    let (dispatcher, dispatch_worker) = dispatch_channel(notifier, config.dispatch_capacity);

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let dispatch_handle = tokio::spawn(dispatch_worker.run(shutdown_rx));

    let service = Arc::new(WaitlistService::new(
        store,
        dispatcher,
        Arc::new(SystemTimeProvider),
        NoticeTemplates::new(config.resource_name.clone()),
    ));

    // 4. Start JSON-RPC server
    let rpc_config = RpcServerConfig {
        port: config.rpc_port,
        ..Default::default()
    };
    let (rpc_addr, rpc_handle) = RpcServer::new(rpc_config, service)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(%rpc_addr, resource = %config.resource_name, "System ready");
    info!("Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Graceful shutdown: stop accepting requests, then flush queued notices
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    shutdown_tx.shutdown();
    if tokio::time::timeout(std::time::Duration::from_secs(5), dispatch_handle)
        .await
        .is_err()
    {
        warn!("Notification dispatcher did not finish within 5s");
    }

    pool.close().await;
    info!("Shutdown complete.");

    Ok(())
}
