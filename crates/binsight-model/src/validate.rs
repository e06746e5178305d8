use crate::record::{SurveyRecord, CONSENT_YES, OTHER_SENTINEL};
use std::fmt::{Display, Formatter};

/// One validation finding, tied to the wire name of the offending field.
/// The validator returns these in a fixed order the UI relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: &'static str,
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Check a normalized record against the required-field and conditional
/// rules. Empty result = valid. All applicable findings accumulate; only
/// the problem-ratings rule short-circuits internally, emitting a single
/// combined message for the first missing rating in scan order.
#[must_use]
pub fn validate(record: &SurveyRecord) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if record.consent_participate != CONSENT_YES {
        issues.push(ValidationIssue {
            field: "consentParticipate",
            message: "Consent to participate is required (select Yes).",
        });
    }
    if record.student_status.is_empty() {
        issues.push(ValidationIssue {
            field: "studentStatus",
            message: "Student status is required.",
        });
    }
    if record.responsibility.is_empty() {
        issues.push(ValidationIssue {
            field: "responsibility",
            message: "Responsibility frequency is required.",
        });
    }
    if record.location.is_empty() {
        issues.push(ValidationIssue {
            field: "location",
            message: "Primary location is required.",
        });
    }
    if record.main_goal.is_empty() {
        issues.push(ValidationIssue {
            field: "mainGoal",
            message: "Main goal is required.",
        });
    }
    if record.problems.first_missing().is_some() {
        issues.push(ValidationIssue {
            field: "problems",
            message: "Please rate all problem areas (1-5).",
        });
    }
    if record.interest_level.is_empty() {
        issues.push(ValidationIssue {
            field: "interestLevel",
            message: "Interest level is required.",
        });
    }
    if record.decision_maker.is_empty() {
        issues.push(ValidationIssue {
            field: "decisionMaker",
            message: "Decision maker is required.",
        });
    }
    if record.users_count.is_empty() {
        issues.push(ValidationIssue {
            field: "usersCount",
            message: "Users count is required.",
        });
    }

    if incomplete_other(&record.location) {
        issues.push(ValidationIssue {
            field: "location",
            message: "Please specify the Other location.",
        });
    }
    if incomplete_other(&record.main_goal) {
        issues.push(ValidationIssue {
            field: "mainGoal",
            message: "Please specify the Other main goal.",
        });
    }
    if incomplete_other(&record.decision_maker) {
        issues.push(ValidationIssue {
            field: "decisionMaker",
            message: "Please specify the Other decision maker.",
        });
    }

    issues
}

/// True for a value that chose the "Other" path but carries no usable
/// free text: it starts with the sentinel yet is not of the form
/// `Other:` + whitespace + non-whitespace.
fn incomplete_other(value: &str) -> bool {
    if !value.starts_with(OTHER_SENTINEL) {
        return false;
    }
    match value.strip_prefix("Other:") {
        Some(rest) => {
            !(rest.starts_with(|c: char| c.is_whitespace()) && !rest.trim().is_empty())
        }
        None => true,
    }
}
