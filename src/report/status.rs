use super::{csv, json, md};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Operator annotation carried from one report to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    #[default]
    #[serde(rename = "TODO")]
    Todo,
    #[serde(rename = "DONE")]
    Done,
    #[serde(rename = "SKIP")]
    Skip,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::Done, Status::Skip];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::Done => "DONE",
            Self::Skip => "SKIP",
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TODO" => Ok(Self::Todo),
            "DONE" => Ok(Self::Done),
            "SKIP" => Ok(Self::Skip),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `path#name` -> status recovered from a previous report.
pub type StatusMap = HashMap<String, Status>;

/// Reads the report already at `path`, if any, and recovers its statuses.
///
/// A missing file is a first run. An unreadable or unparseable file is
/// logged and treated as empty so every target starts at `TODO`.
pub fn load_prior_statuses(path: &Path) -> StatusMap {
    if !path.exists() {
        debug!(path = %path.display(), "no prior report");
        return StatusMap::new();
    }
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "prior report unreadable; statuses reset");
            return StatusMap::new();
        }
    };
    match parse_statuses(&content) {
        Ok(statuses) => {
            debug!(path = %path.display(), recovered = statuses.len(), "loaded prior statuses");
            statuses
        }
        Err(reason) => {
            warn!(path = %path.display(), %reason, "prior report unparseable; statuses reset");
            StatusMap::new()
        }
    }
}

/// Detects the prior report's format from its content, so switching output
/// formats between runs still carries statuses forward. A leading byte order
/// mark, as spreadsheet editors write, is ignored.
pub fn parse_statuses(content: &str) -> Result<StatusMap, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let first_line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();

    if first_line.starts_with('{') {
        json::parse_statuses(content)
    } else if first_line.to_ascii_lowercase().starts_with("status,") {
        csv::parse_statuses(content)
    } else {
        md::parse_statuses(content)
    }
}
