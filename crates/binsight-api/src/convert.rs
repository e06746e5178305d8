// SPDX-License-Identifier: Apache-2.0

use crate::ApiError;
use binsight_model::ValidationIssue;
use binsight_store::{StoreError, StoreErrorCode};
use serde_json::json;

/// Map a storage failure onto the API error model. Backend detail stays
/// in `details` for operators; the message is the retryable user-facing
/// one.
#[must_use]
pub fn store_error_to_api(err: &StoreError) -> ApiError {
    match err.code {
        StoreErrorCode::NotFound => ApiError::new(
            crate::ApiErrorCode::NotFound,
            "submission not found",
            json!({"reason": err.message}),
        ),
        StoreErrorCode::Malformed | StoreErrorCode::Io => {
            ApiError::store_unavailable(&err.message)
        }
        _ => ApiError::internal(&err.message),
    }
}

/// Turn the validator's ordered findings into one `validation_failed`
/// API error, preserving their order in `field_errors`.
#[must_use]
pub fn validation_issues_to_api(issues: &[ValidationIssue]) -> ApiError {
    let field_errors: Vec<_> = issues
        .iter()
        .map(|issue| json!({"field": issue.field, "message": issue.message}))
        .collect();
    ApiError::validation_failed(json!(field_errors))
}
