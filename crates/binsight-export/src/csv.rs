use crate::format_avg;
use binsight_model::StoredRecord;

/// Fixed export column order. The table view uses the same order.
pub const CSV_HEADERS: [&str; 12] = [
    "timestamp",
    "consentParticipate",
    "studentStatus",
    "responsibility",
    "location",
    "mainGoal",
    "problems_avg",
    "features",
    "interestLevel",
    "decisionMaker",
    "usersCount",
    "openEnded",
];

/// Serialize records to CSV text: header row plus one row per record.
/// An empty collection yields the empty string. Cells containing a
/// comma, double quote, or newline are quoted with internal quotes
/// doubled; `features` members join with `"; "`.
#[must_use]
pub fn to_csv(records: &[StoredRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(CSV_HEADERS.join(","));
    for stored in records {
        let r = &stored.record;
        let cells = [
            r.timestamp.as_str(),
            r.consent_participate.as_str(),
            r.student_status.as_str(),
            r.responsibility.as_str(),
            r.location.as_str(),
            r.main_goal.as_str(),
            &format_avg(r.problems_avg()),
            &r.features.join("; "),
            r.interest_level.as_str(),
            r.decision_maker.as_str(),
            r.users_count.as_str(),
            r.open_ended.as_str(),
        ];
        rows.push(
            cells
                .iter()
                .map(|cell| escape_cell(cell))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    rows.join("\n")
}

fn escape_cell(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binsight_model::{ProblemRatings, RecordId, SurveyRecord};

    fn stored(record: SurveyRecord) -> StoredRecord {
        StoredRecord {
            id: RecordId::new("id-1"),
            record,
        }
    }

    fn sample_record() -> SurveyRecord {
        SurveyRecord {
            timestamp: "2025-04-01T10:00:00.000Z".to_string(),
            consent_participate: "Yes".to_string(),
            student_status: "Undergraduate".to_string(),
            responsibility: "Weekly".to_string(),
            location: "Dorm".to_string(),
            main_goal: "Reduce odors".to_string(),
            problems: ProblemRatings {
                odors: Some(1.0),
                overflow: Some(2.0),
                leaks: Some(3.0),
                pests: Some(4.0),
                touching_lid: Some(5.0),
            },
            features: vec!["Smart sensor".to_string(), "Foot pedal".to_string()],
            interest_level: "Very interested".to_string(),
            decision_maker: "Myself".to_string(),
            users_count: "2-3".to_string(),
            open_ended: "Fine.".to_string(),
        }
    }

    #[test]
    fn empty_collection_yields_empty_text() {
        assert_eq!(to_csv(&[]), "");
    }

    #[test]
    fn one_record_is_header_plus_one_row() {
        let csv = to_csv(&[stored(sample_record())]);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CSV_HEADERS.join(","));
        assert_eq!(
            lines[1],
            "2025-04-01T10:00:00.000Z,Yes,Undergraduate,Weekly,Dorm,Reduce odors,\
             3.00,Smart sensor; Foot pedal,Very interested,Myself,2-3,Fine."
        );
    }

    #[test]
    fn partial_ratings_leave_the_average_cell_empty() {
        let mut record = sample_record();
        record.problems.pests = None;
        let csv = to_csv(&[stored(record)]);
        let row = csv.lines().nth(1).expect("data row");
        assert!(row.contains(",Reduce odors,,Smart sensor; Foot pedal,"));
    }

    #[test]
    fn cells_with_commas_quotes_and_newlines_are_quoted() {
        let mut record = sample_record();
        record.open_ended = "line one\nsays \"hello\", twice".to_string();
        let csv = to_csv(&[stored(record)]);
        assert!(csv.ends_with("\"line one\nsays \"\"hello\"\", twice\""));
    }

    // Minimal RFC-4180 reader, enough to prove the escaping round-trips.
    fn parse_csv(text: &str) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        let mut row = Vec::new();
        let mut cell = String::new();
        let mut quoted = false;
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if quoted {
                match c {
                    '"' if chars.peek() == Some(&'"') => {
                        chars.next();
                        cell.push('"');
                    }
                    '"' => quoted = false,
                    other => cell.push(other),
                }
            } else {
                match c {
                    '"' => quoted = true,
                    ',' => row.push(std::mem::take(&mut cell)),
                    '\n' => {
                        row.push(std::mem::take(&mut cell));
                        rows.push(std::mem::take(&mut row));
                    }
                    other => cell.push(other),
                }
            }
        }
        row.push(cell);
        rows.push(row);
        rows
    }

    #[test]
    fn awkward_cells_survive_a_csv_round_trip() {
        let mut record = sample_record();
        record.open_ended = "a,b\n\"c\" d".to_string();
        record.location = "Other: room 1, floor 2".to_string();
        let csv = to_csv(&[stored(record.clone())]);
        let rows = parse_csv(&csv);
        assert_eq!(rows.len(), 2);
        let data = &rows[1];
        assert_eq!(data[4], record.location);
        assert_eq!(data[11], record.open_ended);
        assert_eq!(data[1], "Yes");
    }
}
