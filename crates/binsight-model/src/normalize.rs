use crate::record::{
    ProblemRatings, SurveyRecord, FEATURE_NONE_OF_THE_ABOVE, OTHER_PREFIX, OTHER_SENTINEL,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw problem ratings exactly as a form or client delivers them: numbers,
/// numeric strings, empty strings, or nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawProblems {
    #[serde(default)]
    pub odors: Option<Value>,
    #[serde(default)]
    pub overflow: Option<Value>,
    #[serde(default)]
    pub leaks: Option<Value>,
    #[serde(default)]
    pub pests: Option<Value>,
    #[serde(default)]
    pub touching_lid: Option<Value>,
}

/// A submission before normalization: every field optional, string-valued
/// the way an HTML form produces them, with the free-text companions for
/// the "Other" selections carried separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSubmission {
    pub timestamp: Option<String>,
    pub consent_participate: Option<String>,
    pub student_status: Option<String>,
    pub responsibility: Option<String>,
    pub location: Option<String>,
    pub location_other: Option<String>,
    pub main_goal: Option<String>,
    pub main_goal_other: Option<String>,
    pub problems: RawProblems,
    pub features: Vec<String>,
    pub interest_level: Option<String>,
    pub decision_maker: Option<String>,
    pub decision_maker_other: Option<String>,
    pub users_count: Option<String>,
    pub open_ended: Option<String>,
}

impl RawSubmission {
    /// Produce the canonical record. Total: no raw input fails here, it
    /// only degrades (unparseable ratings become unanswered and are left
    /// for the validator to flag). `assigned_at` is used as the creation
    /// timestamp when the client did not send one.
    #[must_use]
    pub fn normalize(&self, assigned_at: &str) -> SurveyRecord {
        let timestamp = match self.timestamp.as_deref().map(str::trim) {
            Some(ts) if !ts.is_empty() => ts.to_string(),
            _ => assigned_at.to_string(),
        };

        let mut features = self.features.clone();
        if features.iter().any(|f| f == FEATURE_NONE_OF_THE_ABOVE) {
            features = vec![FEATURE_NONE_OF_THE_ABOVE.to_string()];
        }

        SurveyRecord {
            timestamp,
            consent_participate: plain(&self.consent_participate),
            student_status: plain(&self.student_status),
            responsibility: plain(&self.responsibility),
            location: rewrite_other(&self.location, &self.location_other),
            main_goal: rewrite_other(&self.main_goal, &self.main_goal_other),
            problems: ProblemRatings {
                odors: number_or_null(self.problems.odors.as_ref()),
                overflow: number_or_null(self.problems.overflow.as_ref()),
                leaks: number_or_null(self.problems.leaks.as_ref()),
                pests: number_or_null(self.problems.pests.as_ref()),
                touching_lid: number_or_null(self.problems.touching_lid.as_ref()),
            },
            features,
            interest_level: plain(&self.interest_level),
            decision_maker: rewrite_other(&self.decision_maker, &self.decision_maker_other),
            users_count: plain(&self.users_count),
            open_ended: self
                .open_ended
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl From<&SurveyRecord> for RawSubmission {
    fn from(record: &SurveyRecord) -> Self {
        Self {
            timestamp: Some(record.timestamp.clone()),
            consent_participate: Some(record.consent_participate.clone()),
            student_status: Some(record.student_status.clone()),
            responsibility: Some(record.responsibility.clone()),
            location: Some(record.location.clone()),
            location_other: None,
            main_goal: Some(record.main_goal.clone()),
            main_goal_other: None,
            problems: RawProblems {
                odors: record.problems.odors.map(Value::from),
                overflow: record.problems.overflow.map(Value::from),
                leaks: record.problems.leaks.map(Value::from),
                pests: record.problems.pests.map(Value::from),
                touching_lid: record.problems.touching_lid.map(Value::from),
            },
            features: record.features.clone(),
            interest_level: Some(record.interest_level.clone()),
            decision_maker: Some(record.decision_maker.clone()),
            decision_maker_other: None,
            users_count: Some(record.users_count.clone()),
            open_ended: Some(record.open_ended.clone()),
        }
    }
}

fn plain(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Apply the "Other" rewrite: an exact sentinel selection becomes
/// `Other: <free text>`; anything else passes through unchanged. An
/// already-rewritten value never matches the sentinel, so the rewrite
/// is idempotent.
fn rewrite_other(selection: &Option<String>, other_text: &Option<String>) -> String {
    let selection = selection.as_deref().unwrap_or_default();
    if selection == OTHER_SENTINEL {
        let text = other_text.as_deref().unwrap_or_default().trim();
        format!("{OTHER_PREFIX}{text}")
    } else {
        selection.to_string()
    }
}

/// Coerce a raw rating to a finite number. Absent values, empty strings,
/// and anything unparseable or non-finite degrade to `None`; this never
/// fails.
#[must_use]
pub fn number_or_null(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Null => None,
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}
