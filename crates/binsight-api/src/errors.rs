// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ApiErrorCode {
    ValidationFailed,
    InvalidPayload,
    Unauthorized,
    NotFound,
    StoreUnavailable,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "validation_failed",
            Self::InvalidPayload => "invalid_payload",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::StoreUnavailable => "store_unavailable",
            Self::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn validation_failed(field_errors: Value) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            "validation failed",
            json!({"field_errors": field_errors}),
        )
    }

    #[must_use]
    pub fn invalid_payload(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidPayload,
            "invalid payload",
            json!({"reason": reason}),
        )
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(
            ApiErrorCode::Unauthorized,
            "admin credentials required",
            json!({}),
        )
    }

    #[must_use]
    pub fn not_found(id: &str) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            "submission not found",
            json!({"id": id}),
        )
    }

    #[must_use]
    pub fn store_unavailable(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::StoreUnavailable,
            "storage backend unavailable",
            json!({"reason": reason}),
        )
    }

    #[must_use]
    pub fn internal(reason: &str) -> Self {
        Self::new(ApiErrorCode::Internal, "internal error", json!({"reason": reason}))
    }
}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiErrorCode>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_as_snake_case_strings() {
        let json = serde_json::to_value(ApiErrorCode::StoreUnavailable).expect("serialize");
        assert_eq!(json, "store_unavailable");
        assert_eq!(
            ApiErrorCode::StoreUnavailable.as_str(),
            "store_unavailable"
        );
    }

    #[test]
    fn validation_failed_wraps_field_errors() {
        let err = ApiError::validation_failed(serde_json::json!([
            {"field": "consentParticipate", "message": "Consent to participate is required (select Yes)."}
        ]));
        assert_eq!(err.code, ApiErrorCode::ValidationFailed);
        assert_eq!(err.details["field_errors"][0]["field"], "consentParticipate");
    }
}
