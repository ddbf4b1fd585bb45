use super::status::{Status, StatusMap};
use super::{ReportRow, ReportSummary};
use crate::types::scoring::{ScoredTarget, SkippedTarget};
use crate::types::target::target_key;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    summary: &'a ReportSummary,
    targets: Vec<JsonRow<'a>>,
    skipped: &'a [SkippedTarget],
}

#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    status: Status,
    #[serde(flatten)]
    target: &'a ScoredTarget,
}

pub fn to_json(
    rows: &[ReportRow<'_>],
    summary: &ReportSummary,
    skipped: &[SkippedTarget],
) -> Result<String, serde_json::Error> {
    let report = JsonReport {
        summary,
        targets: rows
            .iter()
            .map(|row| JsonRow {
                status: row.status,
                target: row.target,
            })
            .collect(),
        skipped,
    };
    let mut rendered = serde_json::to_string_pretty(&report)?;
    rendered.push('\n');
    Ok(rendered)
}

#[derive(Debug, Deserialize)]
struct PriorReport {
    #[serde(default)]
    targets: Vec<PriorRow>,
}

#[derive(Debug, Deserialize)]
struct PriorRow {
    name: String,
    path: String,
    #[serde(default)]
    status: Option<String>,
}

pub fn parse_statuses(content: &str) -> Result<StatusMap, String> {
    let prior: PriorReport = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let mut statuses = StatusMap::new();
    for row in prior.targets {
        let Some(status) = row.status.and_then(|status| status.parse().ok()) else {
            continue;
        };
        statuses
            .entry(target_key(&row.path, &row.name))
            .or_insert(status);
    }
    Ok(statuses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::build_rows;
    use crate::report::fixtures::{scored, skipped_target};
    use crate::types::scoring::Priority;

    #[test]
    fn json_report_flattens_target_fields_next_to_status() {
        let targets = vec![scored("charge", "src/payments/charge.ts", 7.9, Priority::P0)];
        let rows = build_rows(&targets, &StatusMap::new());
        let skipped = [skipped_target("ghost", "src/ghost.ts")];
        let summary = ReportSummary::from_rows(&rows, skipped.len());

        let rendered = to_json(&rows, &summary, &skipped).expect("json should serialize");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("json should parse");
        let row = &value["targets"][0];
        assert_eq!(row["status"], "TODO");
        assert_eq!(row["name"], "charge");
        assert_eq!(row["path"], "src/payments/charge.ts");
        assert_eq!(row["BC"], 7);
        assert_eq!(row["coverageScore"], 5);
        assert_eq!(row["priority"], "P0");
        assert_eq!(value["summary"]["byPriority"]["P0"], 1);
        assert_eq!(value["summary"]["skipped"], 1);
        assert_eq!(value["skipped"][0]["key"], "src/ghost.ts#ghost");
        assert_eq!(value["skipped"][0]["reason"], "file_not_found");
    }

    #[test]
    fn parses_statuses_and_ignores_unknown_values() {
        let content = r#"{
  "targets": [
    { "name": "charge", "path": "src/payments/charge.ts", "status": "DONE" },
    { "name": "refund", "path": "src/payments/refund.ts", "status": "later" },
    { "name": "fmt", "path": "src/utils/fmt.ts" }
  ]
}"#;
        let statuses = parse_statuses(content).expect("json should parse");
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses.get("src/payments/charge.ts#charge"), Some(&Status::Done));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_statuses("{ \"targets\": [ }").is_err());
    }
}
