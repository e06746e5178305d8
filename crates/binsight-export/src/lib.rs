#![forbid(unsafe_code)]
//! Read-side views over stored survey records. Everything here is pure
//! string generation; the byte output is stable for identical input.

mod csv;
mod table;

pub use csv::{to_csv, CSV_HEADERS};
pub use table::{render_table, EMPTY_STATE_HTML};

use binsight_model::StoredRecord;

pub const CRATE_NAME: &str = "binsight-export";

/// Pretty-printed JSON array of stored records, the payload the JSON
/// export download carries.
pub fn to_json(records: &[StoredRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Two-decimal rendering of a derived problems average; absent averages
/// render as the empty string in every view.
#[must_use]
pub(crate) fn format_avg(avg: Option<f64>) -> String {
    avg.map(|v| format!("{v:.2}")).unwrap_or_default()
}
