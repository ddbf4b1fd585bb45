use crate::error::{Result, TestRankError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One unit of analysis, as emitted by the upstream scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionTarget {
    pub name: String,
    pub path: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub exported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_hint: Option<ImpactHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cyclomatic: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognitive: Option<u32>,
}

fn default_kind() -> String {
    "function".to_string()
}

impl FunctionTarget {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: default_kind(),
            exported: false,
            impact_hint: None,
            cyclomatic: None,
            cognitive: None,
        }
    }

    pub fn key(&self) -> String {
        target_key(&self.path, &self.name)
    }

    pub fn hint(&self) -> ImpactHint {
        self.impact_hint.unwrap_or_default()
    }
}

/// `path#name` identity used to carry statuses between reports. Line breaks
/// become spaces, as they do in the Markdown table.
pub fn target_key(path: &str, name: &str) -> String {
    format!("{}#{}", single_line(path), single_line(name))
}

pub fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImpactHint {
    pub has_external: bool,
    pub has_async: bool,
    pub has_try_catch: bool,
    pub has_complex_logic: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GitSignals {
    pub total_commits: u32,
    pub recent_commits: u32,
    pub unique_authors: u32,
    pub avg_time_gap: f64,
    pub cross_module_refs: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageEntry {
    pub line_coverage: Option<f64>,
}

/// Materialized output of the external collaborators for one run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanInput {
    pub targets: Vec<FunctionTarget>,
    pub git_signals: HashMap<String, GitSignals>,
    pub coverage: HashMap<String, CoverageEntry>,
    pub cognitive: HashMap<String, HashMap<String, u32>>,
}

impl ScanInput {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TestRankError::PathNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| TestRankError::ScanInput(format!("{}: {}", path.display(), e)))
    }

    pub fn git_signals_for(&self, path: &str) -> GitSignals {
        self.git_signals.get(path).copied().unwrap_or_default()
    }

    pub fn coverage_for(&self, path: &str) -> Option<f64> {
        self.coverage.get(path).and_then(|entry| entry.line_coverage)
    }

    pub fn external_cognitive(&self, path: &str, name: &str) -> Option<u32> {
        self.cognitive
            .get(path)
            .and_then(|functions| functions.get(name))
            .copied()
    }
}
