#![forbid(unsafe_code)]
//! Axum application wiring: state, router, and handlers for the
//! submission collection and admin endpoints.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use binsight_store::SubmissionStore;
use sha2::{Digest, Sha256};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

mod auth;
mod config;
mod handlers;

pub use config::{AdminCredentials, ApiConfig};

pub const CRATE_NAME: &str = "binsight-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubmissionStore>,
    pub api: ApiConfig,
    pub admin: Option<AdminCredentials>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self::with_config(store, ApiConfig::default(), None)
    }

    #[must_use]
    pub fn with_config(
        store: Arc<dyn SubmissionStore>,
        api: ApiConfig,
        admin: Option<AdminCredentials>,
    ) -> Self {
        Self {
            store,
            api,
            admin,
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route("/version", get(handlers::version_handler))
        .route(
            "/api/submissions",
            get(handlers::list_submissions_handler)
                .post(handlers::submit_handler)
                .delete(handlers::clear_submissions_handler),
        )
        .route("/api/submissions/:id", delete(handlers::delete_one_handler))
        .route("/api/submit", post(handlers::submit_handler))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}

#[must_use]
pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod handler_tests;
