#![forbid(unsafe_code)]
//! Survey record SSOT: the canonical submission shape plus the
//! normalization and validation pipeline every backend shares.

mod normalize;
mod record;
mod stored;
mod time;
mod validate;

pub use normalize::{number_or_null, RawProblems, RawSubmission};
pub use record::{
    ProblemRatings, SurveyRecord, CONSENT_YES, FEATURE_NONE_OF_THE_ABOVE, OTHER_PREFIX,
    OTHER_SENTINEL, PROBLEM_FIELDS,
};
pub use stored::{RecordId, StoredRecord};
pub use time::{now_iso, parse_iso};
pub use validate::{validate, ValidationIssue};

pub const CRATE_NAME: &str = "binsight-model";
