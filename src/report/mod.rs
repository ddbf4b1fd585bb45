pub mod csv;
pub mod json;
pub mod md;
pub mod status;

use crate::error::{Result, TestRankError};
use crate::types::scoring::{Priority, ScoredTarget, SkippedTarget};
use serde::Serialize;
use status::{Status, StatusMap};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Md,
    Csv,
    Json,
}

impl OutputFormat {
    /// Infers the format from the destination's extension; Markdown otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Self::Csv,
            Some("json") => Self::Json,
            _ => Self::Md,
        }
    }
}

/// One rendered line: a scored target plus its carried-forward status.
#[derive(Debug, Clone, Copy)]
pub struct ReportRow<'a> {
    pub status: Status,
    pub target: &'a ScoredTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total: usize,
    pub skipped: usize,
    pub by_priority: BTreeMap<String, usize>,
    pub by_layer: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
}

impl ReportSummary {
    pub fn from_rows(rows: &[ReportRow<'_>], skipped: usize) -> Self {
        let mut summary = Self {
            total: rows.len(),
            skipped,
            by_priority: Priority::ALL
                .iter()
                .map(|priority| (priority.as_str().to_string(), 0))
                .collect(),
            by_layer: BTreeMap::new(),
            by_status: Status::ALL
                .iter()
                .map(|status| (status.as_str().to_string(), 0))
                .collect(),
        };
        for row in rows {
            *summary
                .by_priority
                .entry(row.target.priority.as_str().to_string())
                .or_insert(0) += 1;
            *summary
                .by_layer
                .entry(row.target.layer.clone())
                .or_insert(0) += 1;
            *summary
                .by_status
                .entry(row.status.as_str().to_string())
                .or_insert(0) += 1;
        }
        summary
    }

    pub fn count(&self, priority: Priority) -> usize {
        self.by_priority
            .get(priority.as_str())
            .copied()
            .unwrap_or(0)
    }

    /// One-line human summary, e.g. `3 targets: P0=1 P1=1 P2=0 P3=1 (1 skipped)`.
    pub fn headline(&self) -> String {
        let tiers = Priority::ALL
            .iter()
            .map(|priority| format!("{}={}", priority, self.count(*priority)))
            .collect::<Vec<_>>()
            .join(" ");
        let mut line = format!("{} targets: {}", self.total, tiers);
        if self.skipped > 0 {
            line.push_str(&format!(" ({} skipped)", self.skipped));
        }
        line
    }
}

/// Merges prior statuses into the ranked rows. Unknown keys default to
/// `TODO`; prior keys with no current target are dropped.
pub fn build_rows<'a>(targets: &'a [ScoredTarget], prior: &StatusMap) -> Vec<ReportRow<'a>> {
    let mut ordered: Vec<&ScoredTarget> = targets.iter().collect();
    ordered.sort_by(|a, b| b.score.total_cmp(&a.score));
    ordered
        .into_iter()
        .map(|target| ReportRow {
            status: prior.get(&target.key()).copied().unwrap_or_default(),
            target,
        })
        .collect()
}

/// CSV carries ranked rows only; the other formats also list skipped targets.
pub fn render(
    rows: &[ReportRow<'_>],
    summary: &ReportSummary,
    skipped: &[SkippedTarget],
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Md => Ok(md::to_markdown(rows, summary, skipped)),
        OutputFormat::Csv => Ok(csv::to_csv(rows)),
        OutputFormat::Json => json::to_json(rows, summary, skipped).map_err(TestRankError::Json),
    }
}

/// Reads any report already at `path`, carries its statuses forward, and
/// overwrites it with the new ranking. Assumes a single writer.
pub fn write_report(
    path: &Path,
    targets: &[ScoredTarget],
    skipped: &[SkippedTarget],
    format: OutputFormat,
) -> Result<ReportSummary> {
    let prior = status::load_prior_statuses(path);
    let rows = build_rows(targets, &prior);
    let summary = ReportSummary::from_rows(&rows, skipped.len());
    let rendered = render(&rows, &summary, skipped, format)?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, rendered)?;
    info!(
        path = %path.display(),
        rows = rows.len(),
        carried = rows.iter().filter(|row| prior.contains_key(&row.target.key())).count(),
        "report written"
    );
    Ok(summary)
}


#[cfg(test)]
mod tests {
    use super::fixtures::{scored, skipped_target};
    use super::*;
    use tempfile::TempDir;

    fn targets() -> Vec<ScoredTarget> {
        vec![
            scored("refund", "src/payments/refund.ts", 5.2, Priority::P2),
            scored("charge", "src/payments/charge.ts", 7.9, Priority::P0),
            scored("format", "src/utils/format.ts", 5.2, Priority::P2),
        ]
    }

    #[test]
    fn format_inferred_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out/r.CSV")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("r.json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("TEST_PRIORITY")), OutputFormat::Md);
    }

    #[test]
    fn rows_sorted_by_score_with_stable_ties_and_default_status() {
        let targets = targets();
        let mut prior = StatusMap::new();
        prior.insert("src/utils/format.ts#format".to_string(), Status::Skip);
        prior.insert("src/gone.ts#removed".to_string(), Status::Done);

        let rows = build_rows(&targets, &prior);
        let names: Vec<_> = rows.iter().map(|row| row.target.target.name.as_str()).collect();
        assert_eq!(names, vec!["charge", "refund", "format"]);
        let statuses: Vec<_> = rows.iter().map(|row| row.status).collect();
        assert_eq!(statuses, vec![Status::Todo, Status::Todo, Status::Skip]);
    }

    #[test]
    fn summary_counts_tiers_layers_and_statuses() {
        let targets = targets();
        let rows = build_rows(&targets, &StatusMap::new());
        let summary = ReportSummary::from_rows(&rows, 2);
        assert_eq!(summary.count(Priority::P0), 1);
        assert_eq!(summary.count(Priority::P1), 0);
        assert_eq!(summary.count(Priority::P2), 2);
        assert_eq!(summary.by_layer.get("services"), Some(&3));
        assert_eq!(summary.by_status.get("TODO"), Some(&3));
        assert_eq!(summary.headline(), "3 targets: P0=1 P1=0 P2=2 P3=0 (2 skipped)");
    }

    #[test]
    fn rerun_carries_done_status_with_new_score() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("TEST_PRIORITY.md");
        std::fs::write(
            &path,
            "| Status | Score | Priority | Name | Path | Type | Layer | Coverage % \
             | Coverage Score | BC | CC | ER | Testability | Dependencies |\n\
             |---|---|---|---|---|---|---|---|---|---|---|---|---|---|\n\
             | DONE | 8.1 | P0 | charge | src/payments/charge.ts | function | services \
             | 47.0 | 5 | 7 | 3 | 6 | 4 | 2 |\n",
        )
        .expect("prior report should write");

        let summary = write_report(&path, &targets(), &[], OutputFormat::Md)
            .expect("report should write");
        assert_eq!(summary.by_status.get("DONE"), Some(&1));

        let rendered = std::fs::read_to_string(&path).expect("report should read");
        assert!(rendered.contains("| DONE | 7.90 | P0 | charge | src/payments/charge.ts |"));
        assert!(rendered.contains("| TODO | 5.20 | P2 | refund |"));
    }

    #[test]
    fn regenerating_is_byte_identical() {
        let dir = TempDir::new().expect("temp dir should be created");
        let skipped = [skipped_target("ghost", "src/ghost.ts")];
        for format in [OutputFormat::Md, OutputFormat::Csv, OutputFormat::Json] {
            let path = dir.path().join(format!("report-{format:?}"));
            write_report(&path, &targets(), &skipped, format).expect("first write");
            let first = std::fs::read(&path).expect("first read");
            write_report(&path, &targets(), &skipped, format).expect("second write");
            let second = std::fs::read(&path).expect("second read");
            assert_eq!(first, second, "{format:?} output changed between runs");
        }
    }

    #[test]
    fn manual_edits_survive_regeneration_across_formats() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("report.out");
        write_report(&path, &targets(), &[], OutputFormat::Csv).expect("csv write");
        let edited = std::fs::read_to_string(&path)
            .expect("csv read")
            .replace("TODO,5.20,P2,refund", "SKIP,5.20,P2,refund");
        std::fs::write(&path, edited).expect("edit write");

        write_report(&path, &targets(), &[], OutputFormat::Md).expect("md write");
        let rendered = std::fs::read_to_string(&path).expect("md read");
        assert!(rendered.contains("| SKIP | 5.20 | P2 | refund |"));
    }

    #[test]
    fn write_report_creates_parent_directories() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("reports/nested/ranking.md");
        write_report(&path, &targets(), &[], OutputFormat::Md).expect("report should write");
        assert!(path.exists());
    }
}
