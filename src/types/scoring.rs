use crate::types::target::FunctionTarget;
use serde::Serialize;
use std::fmt;

/// Priority tier. `P0` is the most urgent and compares greatest:
/// `P0 > P1 > P2 > P3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::P0, Priority::P1, Priority::P2, Priority::P3];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::P0 => "P0",
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::P0 => 3,
            Self::P1 => 2,
            Self::P2 => 1,
            Self::P3 => 0,
        }
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredTarget {
    #[serde(flatten)]
    pub target: FunctionTarget,
    #[serde(rename = "BC")]
    pub bc: u8,
    #[serde(rename = "CC")]
    pub cc: u8,
    #[serde(rename = "ER")]
    pub er: u8,
    #[serde(rename = "ROI")]
    pub roi: u8,
    pub testability: u8,
    pub coverage_score: u8,
    pub coverage_pct: Option<f64>,
    pub score: f64,
    pub priority: Priority,
    pub layer: String,
    pub dependency_count: usize,
}

impl ScoredTarget {
    pub fn key(&self) -> String {
        self.target.key()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    FileNotFound,
    FunctionNotFound,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound => f.write_str("source file not found"),
            Self::FunctionNotFound => f.write_str("function not found in source"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedTarget {
    pub key: String,
    pub path: String,
    pub name: String,
    pub reason: SkipReason,
}

impl SkippedTarget {
    pub fn new(target: &FunctionTarget, reason: SkipReason) -> Self {
        Self {
            key: target.key(),
            path: target.path.clone(),
            name: target.name.clone(),
            reason,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankOutcome {
    /// Sorted by score descending; ties keep input order.
    pub scored: Vec<ScoredTarget>,
    pub skipped: Vec<SkippedTarget>,
    pub graph_nodes: usize,
}
