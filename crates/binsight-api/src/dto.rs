// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};
use binsight_model::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a 201 submit response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitAccepted {
    pub success: bool,
    pub id: RecordId,
}

impl SubmitAccepted {
    #[must_use]
    pub fn new(id: RecordId) -> Self {
        Self { success: true, id }
    }
}

/// Body of a successful clear/delete response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OkBody {
    pub success: bool,
}

impl OkBody {
    #[must_use]
    pub fn new() -> Self {
        Self { success: true }
    }
}

impl Default for OkBody {
    fn default() -> Self {
        Self::new()
    }
}

/// Error body every failing endpoint returns:
/// `{ "success": false, "error": <message>, "code": <code>, "details": … }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiErrorBody {
    pub success: bool,
    pub error: String,
    pub code: ApiErrorCode,
    pub details: Value,
}

impl From<ApiError> for ApiErrorBody {
    fn from(err: ApiError) -> Self {
        Self {
            success: false,
            error: err.message,
            code: err.code,
            details: err.details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_accepted_carries_the_id() {
        let body = SubmitAccepted::new(RecordId::new("abc"));
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["success"], true);
        assert_eq!(json["id"], "abc");
    }

    #[test]
    fn error_body_flattens_the_api_error() {
        let body = ApiErrorBody::from(ApiError::not_found("abc"));
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "submission not found");
        assert_eq!(json["code"], "not_found");
        assert_eq!(json["details"]["id"], "abc");
    }
}
