use serde::{Deserialize, Serialize};

/// The consent answer a record must carry to be accepted.
pub const CONSENT_YES: &str = "Yes";

/// Raw select value that marks a free-text answer.
pub const OTHER_SENTINEL: &str = "Other";

/// Prefix of a rewritten free-text answer, e.g. `Other: Compost bin`.
pub const OTHER_PREFIX: &str = "Other: ";

/// Checkbox option that is mutually exclusive with every other feature.
pub const FEATURE_NONE_OF_THE_ABOVE: &str = "None of the above";

/// Problem-area rating fields in their fixed scan order.
pub const PROBLEM_FIELDS: [&str; 5] = ["odors", "overflow", "leaks", "pests", "touching_lid"];

/// The five problem-area ratings. `None` means unanswered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProblemRatings {
    #[serde(default)]
    pub odors: Option<f64>,
    #[serde(default)]
    pub overflow: Option<f64>,
    #[serde(default)]
    pub leaks: Option<f64>,
    #[serde(default)]
    pub pests: Option<f64>,
    #[serde(default)]
    pub touching_lid: Option<f64>,
}

impl ProblemRatings {
    /// Ratings paired with their field names, in scan order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("odors", self.odors),
            ("overflow", self.overflow),
            ("leaks", self.leaks),
            ("pests", self.pests),
            ("touching_lid", self.touching_lid),
        ]
    }

    /// First unanswered rating field in scan order, if any.
    #[must_use]
    pub fn first_missing(&self) -> Option<&'static str> {
        self.entries()
            .into_iter()
            .find(|(_, v)| v.is_none())
            .map(|(name, _)| name)
    }

    /// Arithmetic mean of the five ratings, defined only when all five
    /// are present. Partial data never averages.
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        let mut sum = 0.0;
        for (_, value) in self.entries() {
            sum += value?;
        }
        Some(sum / 5.0)
    }
}

/// Canonical survey submission. Created once at submit time, immutable
/// thereafter; the wire shape is this struct, flat, in camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyRecord {
    pub timestamp: String,
    pub consent_participate: String,
    pub student_status: String,
    pub responsibility: String,
    pub location: String,
    pub main_goal: String,
    pub problems: ProblemRatings,
    pub features: Vec<String>,
    pub interest_level: String,
    pub decision_maker: String,
    pub users_count: String,
    pub open_ended: String,
}

impl SurveyRecord {
    /// Derived mean of the problem ratings; absent unless all five were
    /// answered.
    #[must_use]
    pub fn problems_avg(&self) -> Option<f64> {
        self.problems.average()
    }
}
