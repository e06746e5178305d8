use crate::auth::admin_allowed;
use crate::{sha256_hex, AppState, CRATE_NAME};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use binsight_api::{
    map_error, store_error_to_api, validation_issues_to_api, ApiError, ApiErrorBody, OkBody,
    SubmitAccepted,
};
use binsight_model::{now_iso, validate, RawSubmission, RecordId};
use serde_json::json;
use std::sync::atomic::Ordering;
use tracing::{info, warn};

fn api_error_response(err: ApiError) -> Response {
    let status = StatusCode::from_u16(map_error(&err).status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let unauthorized = status == StatusCode::UNAUTHORIZED;
    let mut response = (status, Json(ApiErrorBody::from(err))).into_response();
    if unauthorized {
        response
            .headers_mut()
            .insert("www-authenticate", HeaderValue::from_static("Basic"));
    }
    response
}

fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

fn if_none_match(headers: &HeaderMap) -> Option<String> {
    headers
        .get("if-none-match")
        .and_then(|v| v.to_str().ok())
        .map(std::string::ToString::to_string)
}

fn put_cache_headers(headers: &mut HeaderMap, max_age_secs: u64, etag: &str) {
    if let Ok(value) = HeaderValue::from_str(&format!("private, max-age={max_age_secs}")) {
        headers.insert("cache-control", value);
    }
    if let Ok(value) = HeaderValue::from_str(etag) {
        headers.insert("etag", value);
    }
}

fn require_admin(headers: &HeaderMap, state: &AppState) -> Result<(), ApiError> {
    if admin_allowed(headers, state.admin.as_ref()) {
        Ok(())
    } else {
        Err(ApiError::unauthorized())
    }
}

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub(crate) async fn version_handler() -> impl IntoResponse {
    Json(json!({
        "name": CRATE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub(crate) async fn list_submissions_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, route = "/api/submissions", "request start");

    if let Err(err) = require_admin(&headers, &state) {
        return with_request_id(api_error_response(err), &request_id);
    }

    let records = match state.store.list_all().await {
        Ok(v) => v,
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "list failed");
            return with_request_id(api_error_response(store_error_to_api(&e)), &request_id);
        }
    };

    let bytes = serde_json::to_vec(&records).unwrap_or_default();
    let etag = format!("\"{}\"", sha256_hex(&bytes));
    if if_none_match(&headers).as_deref() == Some(etag.as_str()) {
        let mut resp = StatusCode::NOT_MODIFIED.into_response();
        put_cache_headers(resp.headers_mut(), state.api.list_cache_max_age_secs, &etag);
        return with_request_id(resp, &request_id);
    }

    let mut resp = Response::builder()
        .status(StatusCode::OK)
        .body(axum::body::Body::from(bytes))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response());
    resp.headers_mut()
        .insert("content-type", HeaderValue::from_static("application/json"));
    put_cache_headers(resp.headers_mut(), state.api.list_cache_max_age_secs, &etag);
    info!(request_id = %request_id, count = records.len(), "list complete");
    with_request_id(resp, &request_id)
}

pub(crate) async fn submit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, route = "/api/submit", "request start");

    let raw: RawSubmission = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "submit body unreadable");
            return with_request_id(
                api_error_response(ApiError::invalid_payload(&e.to_string())),
                &request_id,
            );
        }
    };

    // Re-run the full pipeline server-side; clients validate first but the
    // store only ever sees records that passed here.
    let record = raw.normalize(&now_iso());
    let issues = validate(&record);
    if !issues.is_empty() {
        info!(request_id = %request_id, issues = issues.len(), "submission rejected");
        return with_request_id(
            api_error_response(validation_issues_to_api(&issues)),
            &request_id,
        );
    }

    match state.store.append(&record).await {
        Ok(id) => {
            info!(request_id = %request_id, id = %id, "submission accepted");
            let resp = (StatusCode::CREATED, Json(SubmitAccepted::new(id))).into_response();
            with_request_id(resp, &request_id)
        }
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "append failed");
            with_request_id(api_error_response(store_error_to_api(&e)), &request_id)
        }
    }
}

pub(crate) async fn clear_submissions_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, route = "/api/submissions", "clear requested");

    if let Err(err) = require_admin(&headers, &state) {
        return with_request_id(api_error_response(err), &request_id);
    }

    match state.store.delete_all().await {
        Ok(()) => {
            info!(request_id = %request_id, "submissions cleared");
            with_request_id(Json(OkBody::new()).into_response(), &request_id)
        }
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "clear failed");
            with_request_id(api_error_response(store_error_to_api(&e)), &request_id)
        }
    }
}

pub(crate) async fn delete_one_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, id = %id, "delete requested");

    if let Err(err) = require_admin(&headers, &state) {
        return with_request_id(api_error_response(err), &request_id);
    }

    match state.store.delete_one(&RecordId::new(id.clone())).await {
        Ok(()) => with_request_id(Json(OkBody::new()).into_response(), &request_id),
        Err(e) if e.code == binsight_store::StoreErrorCode::NotFound => {
            with_request_id(api_error_response(ApiError::not_found(&id)), &request_id)
        }
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "delete failed");
            with_request_id(api_error_response(store_error_to_api(&e)), &request_id)
        }
    }
}
