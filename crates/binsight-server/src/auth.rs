use crate::config::AdminCredentials;
use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Check the `Authorization: Basic …` header against the configured
/// credential. With no credential configured the gate is open.
#[must_use]
pub(crate) fn admin_allowed(headers: &HeaderMap, admin: Option<&AdminCredentials>) -> bool {
    let Some(expected) = admin else {
        return true;
    };
    let Some(raw) = headers.get("authorization").and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let Some(encoded) = raw.trim().strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
        return false;
    };
    let Ok(pair) = String::from_utf8(decoded) else {
        return false;
    };
    match pair.split_once(':') {
        Some((user, password)) => user == expected.user && password == expected.password,
        None => false,
    }
}
