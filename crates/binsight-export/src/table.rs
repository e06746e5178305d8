use crate::format_avg;
use binsight_model::{parse_iso, StoredRecord};

/// Fragment shown in place of data rows when nothing is stored yet.
pub const EMPTY_STATE_HTML: &str =
    r#"<tr class="empty-state"><td colspan="12">No submissions yet.</td></tr>"#;

/// Render records as `<tr>` rows in the export column order, one row per
/// record, every text cell HTML-escaped. An empty collection renders the
/// empty-state fragment and no data rows.
#[must_use]
pub fn render_table(records: &[StoredRecord]) -> String {
    if records.is_empty() {
        return EMPTY_STATE_HTML.to_string();
    }
    records
        .iter()
        .map(|stored| {
            let r = &stored.record;
            let cells = [
                format_date(&r.timestamp),
                r.consent_participate.clone(),
                r.student_status.clone(),
                r.responsibility.clone(),
                r.location.clone(),
                r.main_goal.clone(),
                format_avg(r.problems_avg()),
                r.features.join(", "),
                r.interest_level.clone(),
                r.decision_maker.clone(),
                r.users_count.clone(),
                r.open_ended.clone(),
            ];
            let tds: String = cells
                .iter()
                .map(|cell| format!("<td>{}</td>", escape_html(cell)))
                .collect();
            format!("<tr>{tds}</tr>")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display form of a stored timestamp; unparseable values pass through
/// as-is rather than disappearing.
fn format_date(raw: &str) -> String {
    match parse_iso(raw) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => raw.to_string(),
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use binsight_model::{ProblemRatings, RecordId, SurveyRecord};

    #[test]
    fn empty_collection_renders_the_empty_state() {
        let html = render_table(&[]);
        assert_eq!(html, EMPTY_STATE_HTML);
        assert_eq!(html.matches("<tr>").count(), 0);
    }

    #[test]
    fn rows_escape_markup_and_format_the_average() {
        let stored = StoredRecord {
            id: RecordId::new("id-1"),
            record: SurveyRecord {
                timestamp: "2025-04-01T10:30:00.000Z".to_string(),
                consent_participate: "Yes".to_string(),
                open_ended: "<script>alert('x') & \"more\"</script>".to_string(),
                problems: ProblemRatings {
                    odors: Some(2.0),
                    overflow: Some(2.0),
                    leaks: Some(2.0),
                    pests: Some(2.0),
                    touching_lid: Some(3.0),
                },
                ..SurveyRecord::default()
            },
        };
        let html = render_table(&[stored]);
        assert!(html.contains("<td>2025-04-01 10:30</td>"));
        assert!(html.contains("<td>2.20</td>"));
        assert!(html.contains("&lt;script&gt;alert(&#039;x&#039;) &amp; &quot;more&quot;&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn unparseable_timestamp_passes_through() {
        let stored = StoredRecord {
            id: RecordId::new("id-1"),
            record: SurveyRecord {
                timestamp: "sometime".to_string(),
                ..SurveyRecord::default()
            },
        };
        assert!(render_table(&[stored]).contains("<td>sometime</td>"));
    }

    #[test]
    fn one_row_per_record() {
        let stored = |id: &str| StoredRecord {
            id: RecordId::new(id),
            record: SurveyRecord::default(),
        };
        let html = render_table(&[stored("a"), stored("b"), stored("c")]);
        assert_eq!(html.matches("<tr>").count(), 3);
    }
}
