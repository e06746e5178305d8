#![forbid(unsafe_code)]

use binsight_server::{build_router, AdminCredentials, ApiConfig, AppState};
use binsight_store::{JsonFileStore, MemoryStore, SqliteStore, SubmissionStore};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("SURVEY_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn build_store() -> Result<Arc<dyn SubmissionStore>, String> {
    let kind = env::var("SURVEY_STORE").unwrap_or_else(|_| "file".to_string());
    match kind.as_str() {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "file" => {
            let path = PathBuf::from(
                env::var("SURVEY_DATA_FILE")
                    .unwrap_or_else(|_| "data/submissions.json".to_string()),
            );
            Ok(Arc::new(JsonFileStore::new(path)))
        }
        "sqlite" => {
            let path = PathBuf::from(
                env::var("SURVEY_SQLITE_PATH")
                    .unwrap_or_else(|_| "data/submissions.sqlite".to_string()),
            );
            let store =
                SqliteStore::open(&path).map_err(|e| format!("sqlite store open failed: {e}"))?;
            Ok(Arc::new(store))
        }
        other => Err(format!(
            "unsupported SURVEY_STORE value {other}; use memory, file, or sqlite"
        )),
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("SURVEY_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let api = ApiConfig {
        max_body_bytes: env_usize("SURVEY_MAX_BODY_BYTES", 1024 * 1024),
        list_cache_max_age_secs: env_u64("SURVEY_LIST_CACHE_MAX_AGE_SECS", 0),
    };
    let admin = AdminCredentials::from_env();
    if admin.is_none() {
        warn!("admin credentials not configured; list/clear/delete are open");
    }

    let store = build_store()?;
    let state = AppState::with_config(store, api, admin);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind failed on {bind_addr}: {e}"))?;
    info!("survey server listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}
