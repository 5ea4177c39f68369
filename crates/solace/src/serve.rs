// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `solace serve` command implementation.
//!
//! Wires storage, the OpenAI provider and the chat service into the HTTP
//! gateway and runs until SIGINT/SIGTERM.

use std::sync::Arc;
#[cfg(not(target_env = "msvc"))]
use std::time::Duration;

use solace_chat::ChatService;
use solace_config::SolaceConfig;
use solace_core::{SolaceError, StorageAdapter};
use solace_gateway::{GatewayState, HealthState, JwtVerifier};
use solace_openai::OpenAiProvider;
use solace_prometheus::PrometheusAdapter;
use solace_storage::SqliteStorage;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the server until a shutdown signal arrives.
pub async fn run_serve(config: SolaceConfig) -> Result<(), SolaceError> {
    init_tracing(&config.app.log_level);

    info!(name = %config.app.name, "starting solace serve");

    let verifier = JwtVerifier::new(&config.auth);
    if !verifier.is_configured() {
        return Err(SolaceError::Config(
            "auth.jwt_secret is not set; refusing to start without token verification \
             (set it in solace.toml or SOLACE_AUTH_JWT_SECRET)"
                .into(),
        ));
    }

    let prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>> =
        if config.prometheus.enabled {
            match PrometheusAdapter::new() {
                Ok(adapter) => {
                    let render: Arc<dyn Fn() -> String + Send + Sync> =
                        Arc::new(move || adapter.render());
                    Some(render)
                }
                Err(e) => {
                    warn!(error = %e, "prometheus disabled");
                    None
                }
            }
        } else {
            None
        };

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage: Arc<dyn StorageAdapter> = Arc::new(storage);
    info!(path = %config.storage.database_path, "storage initialized");

    let provider = OpenAiProvider::new(&config.openai)?;
    let chat = ChatService::from_config(Arc::clone(&storage), Arc::new(provider), &config);
    info!(
        daily_limit = chat.daily_limit(),
        history_limit = config.chat.history_limit,
        "chat service ready"
    );

    let cancel = shutdown::install_signal_handler();

    let mem_cancel = cancel.clone();
    let monitor = tokio::spawn(async move {
        memory_monitor(mem_cancel).await;
    });

    let state = GatewayState {
        chat,
        verifier: Arc::new(verifier),
        health: HealthState::new(prometheus_render),
    };
    let served = solace_gateway::start_server(&config.server, state, cancel.clone()).await;

    cancel.cancel();
    let _ = monitor.await;

    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to close storage cleanly");
    }

    served?;
    info!("solace serve shutdown complete");
    Ok(())
}

/// Samples jemalloc stats every 5 seconds into the memory gauges.
#[cfg(not(target_env = "msvc"))]
async fn memory_monitor(cancel: tokio_util::sync::CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(5));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                // Stats are cached until the epoch advances.
                let _ = tikv_jemalloc_ctl::epoch::advance();
                let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
                let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);

                solace_prometheus::set_memory_heap(allocated as f64);
                solace_prometheus::set_memory_resident(resident as f64);
            }
            _ = cancel.cancelled() => {
                tracing::debug!("memory monitor shutting down");
                break;
            }
        }
    }
}

/// Stub memory monitor for MSVC (no jemalloc).
#[cfg(target_env = "msvc")]
async fn memory_monitor(cancel: tokio_util::sync::CancellationToken) {
    cancel.cancelled().await;
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("solace={log_level},warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}
