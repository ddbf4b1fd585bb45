use super::status::{Status, StatusMap};
use super::{ReportRow, ReportSummary};
use crate::types::scoring::{Priority, SkippedTarget};
use crate::types::target::{single_line, target_key};

const TABLE_HEADER: [&str; 14] = [
    "Status",
    "Score",
    "Priority",
    "Name",
    "Path",
    "Type",
    "Layer",
    "Coverage %",
    "Coverage Score",
    "BC",
    "CC",
    "ER",
    "Testability",
    "Dependencies",
];

const PREAMBLE: &str =
    "Edit the Status column (TODO, DONE, SKIP); it is preserved when the report is regenerated.";

pub fn to_markdown(
    rows: &[ReportRow<'_>],
    summary: &ReportSummary,
    skipped: &[SkippedTarget],
) -> String {
    let mut output = String::new();
    output.push_str("# Test Priority Report\n\n");
    output.push_str(PREAMBLE);
    output.push_str("\n\n");

    output.push_str("## Summary\n\n");
    output.push_str("| Priority | Count |\n|----------|-------|\n");
    for priority in Priority::ALL {
        output.push_str(&format!("| {} | {} |\n", priority, summary.count(priority)));
    }
    output.push('\n');
    output.push_str(&format!("Total targets: {}\n", summary.total));
    if summary.skipped > 0 {
        output.push_str(&format!("Skipped targets: {}\n", summary.skipped));
    }
    output.push_str(&format!(
        "Progress: {}\n\n",
        Status::ALL
            .iter()
            .map(|status| format!(
                "{} {}",
                summary.by_status.get(status.as_str()).copied().unwrap_or(0),
                status
            ))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    output.push_str("### By Layer\n\n");
    if summary.by_layer.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for (layer, count) in &summary.by_layer {
            output.push_str(&format!("- {}: {}\n", escape(layer), count));
        }
        output.push('\n');
    }

    if !skipped.is_empty() {
        output.push_str("### Skipped\n\n");
        for entry in skipped {
            output.push_str(&format!("- {}: {}\n", escape(&entry.key), entry.reason));
        }
        output.push('\n');
    }

    output.push_str("## Ranked Targets\n\n");
    output.push_str(&format!("| {} |\n", TABLE_HEADER.join(" | ")));
    output.push_str(&format!("|{}\n", "---|".repeat(TABLE_HEADER.len())));
    for row in rows {
        let scored = row.target;
        let cells = [
            row.status.to_string(),
            format!("{:.2}", scored.score),
            scored.priority.to_string(),
            escape(&scored.target.name),
            escape(&scored.target.path),
            escape(&scored.target.kind),
            escape(&scored.layer),
            scored
                .coverage_pct
                .map_or_else(|| "-".to_string(), |pct| format!("{pct:.1}")),
            scored.coverage_score.to_string(),
            scored.bc.to_string(),
            scored.cc.to_string(),
            scored.er.to_string(),
            scored.testability.to_string(),
            scored.dependency_count.to_string(),
        ];
        output.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    output
}

fn escape(cell: &str) -> String {
    single_line(cell).replace('|', "\\|")
}

/// Column positions of a status-bearing table, located from its header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    status: usize,
    name: usize,
    path: usize,
}

impl Columns {
    fn from_header(cells: &[String]) -> Option<Self> {
        let find = |label: &str| {
            cells
                .iter()
                .position(|cell| cell.eq_ignore_ascii_case(label))
        };
        Some(Self {
            status: find("status")?,
            name: find("name")?,
            path: find("path")?,
        })
    }

    fn read(&self, cells: &[String]) -> Option<(String, Status)> {
        let status = cells.get(self.status)?.parse().ok()?;
        let name = cells.get(self.name)?;
        let path = cells.get(self.path)?;
        Some((target_key(path, name), status))
    }
}

enum TableState {
    Outside,
    Status(Columns),
    Other,
}

/// Recovers statuses from every Markdown table whose header has `Status`,
/// `Name` and `Path` columns. Rows with an unrecognized status are ignored.
pub fn parse_statuses(content: &str) -> Result<StatusMap, String> {
    let mut statuses = StatusMap::new();
    let mut found_table = false;
    let mut state = TableState::Outside;

    for line in content.lines().map(str::trim) {
        if !line.starts_with('|') {
            state = TableState::Outside;
            continue;
        }
        let cells = split_row(line);
        if is_separator(&cells) {
            continue;
        }
        match state {
            TableState::Outside => {
                state = match Columns::from_header(&cells) {
                    Some(columns) => {
                        found_table = true;
                        TableState::Status(columns)
                    }
                    None => TableState::Other,
                };
            }
            TableState::Status(columns) => {
                if let Some((key, status)) = columns.read(&cells) {
                    statuses.entry(key).or_insert(status);
                }
            }
            TableState::Other => {}
        }
    }

    if found_table {
        Ok(statuses)
    } else {
        Err("no table with Status, Name and Path columns".to_string())
    }
}

fn split_row(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = if inner.ends_with('|') && !inner.ends_with("\\|") {
        &inner[..inner.len() - 1]
    } else {
        inner
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            other => current.push(other),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

fn is_separator(cells: &[String]) -> bool {
    cells.iter().all(|cell| {
        !cell.is_empty() && cell.chars().all(|c| matches!(c, '-' | ':' | ' '))
    })
}
