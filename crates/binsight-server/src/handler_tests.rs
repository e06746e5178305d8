use crate::config::{AdminCredentials, ApiConfig};
use crate::handlers::{
    clear_submissions_handler, delete_one_handler, list_submissions_handler, submit_handler,
};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use binsight_model::StoredRecord;
use binsight_store::MemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;

fn state() -> AppState {
    AppState::new(Arc::new(MemoryStore::new()))
}

fn gated_state() -> AppState {
    AppState::with_config(
        Arc::new(MemoryStore::new()),
        ApiConfig::default(),
        Some(AdminCredentials {
            user: "admin".to_string(),
            password: "s3cret".to_string(),
        }),
    )
}

fn admin_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let encoded = STANDARD.encode("admin:s3cret");
    headers.insert(
        "authorization",
        HeaderValue::from_str(&format!("Basic {encoded}")).expect("header"),
    );
    headers
}

fn valid_submission() -> Value {
    json!({
        "timestamp": "2025-04-01T10:00:00.000Z",
        "consentParticipate": "Yes",
        "studentStatus": "Undergraduate",
        "responsibility": "Weekly",
        "location": "Dorm",
        "mainGoal": "Reduce odors",
        "problems": {
            "odors": 1, "overflow": 2, "leaks": 3, "pests": 4, "touching_lid": 5
        },
        "features": ["Smart sensor"],
        "interestLevel": "Very interested",
        "decisionMaker": "Myself",
        "usersCount": "1",
        "openEnded": "All good."
    })
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn submit(state: &AppState, payload: &Value) -> Response {
    submit_handler(
        State(state.clone()),
        HeaderMap::new(),
        Bytes::from(serde_json::to_vec(payload).expect("encode payload")),
    )
    .await
}

#[tokio::test]
async fn valid_submission_is_stored_and_listed() {
    let state = state();
    let response = submit(&state, &valid_submission()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let id = body["id"].as_str().expect("id").to_string();

    let response = list_submissions_handler(State(state.clone()), HeaderMap::new()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed: Vec<StoredRecord> =
        serde_json::from_value(body_json(response).await).expect("stored records");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id.as_str(), id);
    assert_eq!(listed[0].record.consent_participate, "Yes");

    // End to end: one stored record exports as header plus one data row.
    let csv = binsight_export::to_csv(&listed);
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("timestamp,consentParticipate"));
    assert!(lines[1].contains("Reduce odors"));
    assert!(lines[1].contains("3.00"));
}

#[tokio::test]
async fn refused_consent_is_rejected_with_field_errors() {
    let state = state();
    let mut payload = valid_submission();
    payload["consentParticipate"] = json!("No");
    let response = submit(&state, &payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "validation_failed");
    assert_eq!(
        body["details"]["field_errors"][0]["field"],
        "consentParticipate"
    );

    let response = list_submissions_handler(State(state), HeaderMap::new()).await;
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().expect("array").len(), 0);
}

#[tokio::test]
async fn raw_form_fields_are_normalized_server_side() {
    let state = state();
    let mut payload = valid_submission();
    payload["location"] = json!("Other");
    payload["locationOther"] = json!("Compost bin");
    payload["features"] = json!(["Smart sensor", "None of the above"]);
    payload["problems"]["odors"] = json!("1");
    let response = submit(&state, &payload).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = list_submissions_handler(State(state), HeaderMap::new()).await;
    let listed: Vec<StoredRecord> =
        serde_json::from_value(body_json(response).await).expect("stored records");
    assert_eq!(listed[0].record.location, "Other: Compost bin");
    assert_eq!(listed[0].record.features, vec!["None of the above"]);
    assert_eq!(listed[0].record.problems.odors, Some(1.0));
}

#[tokio::test]
async fn unreadable_body_is_a_payload_error() {
    let state = state();
    let response = submit_handler(
        State(state),
        HeaderMap::new(),
        Bytes::from_static(b"{ not json"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_payload");
}

#[tokio::test]
async fn list_etag_round_trip_yields_not_modified() {
    let state = state();
    submit(&state, &valid_submission()).await;

    let response = list_submissions_handler(State(state.clone()), HeaderMap::new()).await;
    let etag = response
        .headers()
        .get("etag")
        .and_then(|v| v.to_str().ok())
        .expect("etag")
        .to_string();

    let mut headers = HeaderMap::new();
    headers.insert("if-none-match", HeaderValue::from_str(&etag).expect("etag"));
    let response = list_submissions_handler(State(state), headers).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn admin_gate_blocks_list_and_clear_without_credentials() {
    let state = gated_state();
    let response = list_submissions_handler(State(state.clone()), HeaderMap::new()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get("www-authenticate")
            .and_then(|v| v.to_str().ok()),
        Some("Basic")
    );

    let response = clear_submissions_handler(State(state.clone()), HeaderMap::new()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = list_submissions_handler(State(state), admin_headers()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn submit_stays_open_when_the_gate_is_configured() {
    let state = gated_state();
    let response = submit(&state, &valid_submission()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn clear_empties_the_store() {
    let state = state();
    submit(&state, &valid_submission()).await;
    let response = clear_submissions_handler(State(state.clone()), HeaderMap::new()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    let response = list_submissions_handler(State(state), HeaderMap::new()).await;
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().expect("array").len(), 0);
}

#[tokio::test]
async fn deleting_one_record_leaves_the_rest() {
    let state = state();
    submit(&state, &valid_submission()).await;
    let second = submit(&state, &valid_submission()).await;
    let second_id = body_json(second).await["id"]
        .as_str()
        .expect("id")
        .to_string();

    let response = delete_one_handler(
        State(state.clone()),
        HeaderMap::new(),
        Path(second_id.clone()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = list_submissions_handler(State(state), HeaderMap::new()).await;
    let listed: Vec<StoredRecord> =
        serde_json::from_value(body_json(response).await).expect("stored records");
    assert_eq!(listed.len(), 1);
    assert_ne!(listed[0].id.as_str(), second_id);
}

#[tokio::test]
async fn deleting_a_missing_id_is_not_found() {
    let state = state();
    let response = delete_one_handler(
        State(state),
        HeaderMap::new(),
        Path("no-such-id".to_string()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["details"]["id"], "no-such-id");
}

#[tokio::test]
async fn request_id_is_propagated_from_the_caller() {
    let state = state();
    let mut headers = HeaderMap::new();
    headers.insert("x-request-id", HeaderValue::from_static("trace-42"));
    let response = list_submissions_handler(State(state), headers).await;
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("trace-42")
    );
}
