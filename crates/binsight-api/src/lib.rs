// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod convert;
mod dto;
mod error_mapping;
mod errors;

pub use convert::{store_error_to_api, validation_issues_to_api};
pub use dto::{ApiErrorBody, OkBody, SubmitAccepted};
pub use error_mapping::{map_error, ApiErrorMapping};
pub use errors::{ApiError, ApiErrorCode};

pub const CRATE_NAME: &str = "binsight-api";
