use crate::error::{Result, TestRankError};
use crate::matching::PathPattern;
use crate::types::suggestion::AiSuggestions;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub mode: ScoringMode,
    /// Evaluated in declaration order; the first matching layer wins.
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
    pub weights: Option<WeightsConfig>,
    pub thresholds: Option<ThresholdsConfig>,
    #[serde(default)]
    pub main_chain_paths: Vec<String>,
    #[serde(default)]
    pub overrides: OverridesConfig,
    #[serde(default)]
    pub dependency_signal: DependencySignal,
    #[serde(default)]
    pub ai_enhancement: AiEnhancementConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    Layered,
    #[default]
    Unified,
}

/// Which graph-derived quantity feeds `dependency_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencySignal {
    /// Files importing the target's file.
    #[default]
    FanIn,
    /// Files the target's file imports.
    FanOut,
    /// Total node count of the graph, the same value on every target.
    GraphSize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayerConfig {
    pub name: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    pub weights: Option<WeightsConfig>,
    pub thresholds: Option<ThresholdsConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeightsConfig {
    pub bc: Option<f64>,
    pub cc: Option<f64>,
    pub er: Option<f64>,
    pub testability: Option<f64>,
    pub dependency_count: Option<f64>,
    pub coverage: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThresholdsConfig {
    pub p0: Option<f64>,
    pub p1: Option<f64>,
    pub p2: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OverridesConfig {
    pub bc: BTreeMap<String, f64>,
    pub er: BTreeMap<String, f64>,
    pub roi: BTreeMap<String, f64>,
    pub testability: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiEnhancementConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub suggestions: AiSuggestions,
}

impl Default for AiEnhancementConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            suggestions: AiSuggestions::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub bc: f64,
    pub cc: f64,
    pub er: f64,
    pub testability: f64,
    pub dependency_count: f64,
    pub coverage: f64,
}

impl Weights {
    fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("bc", self.bc),
            ("cc", self.cc),
            ("er", self.er),
            ("testability", self.testability),
            ("dependency_count", self.dependency_count),
            ("coverage", self.coverage),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub p0: f64,
    pub p1: f64,
    pub p2: f64,
}

impl WeightsConfig {
    fn missing_fields(&self, prefix: &str) -> Vec<String> {
        [
            ("bc", self.bc),
            ("cc", self.cc),
            ("er", self.er),
            ("testability", self.testability),
            ("dependency_count", self.dependency_count),
            ("coverage", self.coverage),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(field, _)| format!("{prefix}.{field}"))
        .collect()
    }

    pub fn resolve(&self, prefix: &str) -> Result<Weights> {
        match (
            self.bc,
            self.cc,
            self.er,
            self.testability,
            self.dependency_count,
            self.coverage,
        ) {
            (
                Some(bc),
                Some(cc),
                Some(er),
                Some(testability),
                Some(dependency_count),
                Some(coverage),
            ) => Ok(Weights {
                bc,
                cc,
                er,
                testability,
                dependency_count,
                coverage,
            }),
            _ => Err(TestRankError::MissingConfigFields(
                self.missing_fields(prefix),
            )),
        }
    }
}

impl ThresholdsConfig {
    fn missing_fields(&self, prefix: &str) -> Vec<String> {
        [("p0", self.p0), ("p1", self.p1), ("p2", self.p2)]
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(field, _)| format!("{prefix}.{field}"))
            .collect()
    }

    pub fn resolve(&self, prefix: &str) -> Result<Thresholds> {
        match (self.p0, self.p1, self.p2) {
            (Some(p0), Some(p1), Some(p2)) => Ok(Thresholds { p0, p1, p2 }),
            _ => Err(TestRankError::MissingConfigFields(
                self.missing_fields(prefix),
            )),
        }
    }
}

impl ScoringConfig {
    /// Configuration used when no config file exists anywhere.
    pub fn builtin() -> Self {
        Self {
            mode: ScoringMode::Unified,
            layers: Vec::new(),
            weights: Some(WeightsConfig {
                bc: Some(0.25),
                cc: Some(0.15),
                er: Some(0.25),
                testability: Some(0.10),
                dependency_count: Some(0.10),
                coverage: Some(0.15),
            }),
            thresholds: Some(ThresholdsConfig {
                p0: Some(7.0),
                p1: Some(5.5),
                p2: Some(4.0),
            }),
            main_chain_paths: Vec::new(),
            overrides: OverridesConfig::default(),
            dependency_signal: DependencySignal::default(),
            ai_enhancement: AiEnhancementConfig::default(),
        }
    }

    /// Suggestions in effect for this run; empty when AI enhancement is off.
    pub fn suggestions(&self) -> Option<&AiSuggestions> {
        self.ai_enhancement
            .enabled
            .then_some(&self.ai_enhancement.suggestions)
    }

    /// Checks every table the active mode needs before any scoring begins.
    /// Missing fields are reported together.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        match &self.weights {
            Some(weights) => missing.extend(weights.missing_fields("weights")),
            None => missing.push("weights".to_string()),
        }
        match &self.thresholds {
            Some(thresholds) => missing.extend(thresholds.missing_fields("thresholds")),
            None => missing.push("thresholds".to_string()),
        }

        if self.mode == ScoringMode::Layered {
            if self.layers.is_empty() {
                return Err(TestRankError::ConfigParse(
                    "mode = \"layered\" requires at least one [[layers]] entry".to_string(),
                ));
            }
            for layer in &self.layers {
                if layer.name.trim().is_empty() {
                    return Err(TestRankError::ConfigParse(
                        "layers entries must have a non-empty name".to_string(),
                    ));
                }
                let prefix = format!("layers[{}]", layer.name);
                if layer.patterns.is_empty() {
                    missing.push(format!("{prefix}.patterns"));
                }
                if let Some(weights) = &layer.weights {
                    missing.extend(weights.missing_fields(&format!("{prefix}.weights")));
                }
                if let Some(thresholds) = &layer.thresholds {
                    missing.extend(thresholds.missing_fields(&format!("{prefix}.thresholds")));
                }
            }
        }

        if !missing.is_empty() {
            return Err(TestRankError::MissingConfigFields(missing));
        }

        if let Some(weights) = &self.weights {
            validate_weights(&weights.resolve("weights")?, "weights")?;
        }
        if let Some(thresholds) = &self.thresholds {
            validate_thresholds(&thresholds.resolve("thresholds")?, "thresholds")?;
        }
        for layer in &self.layers {
            let prefix = format!("layers[{}]", layer.name);
            if let Some(weights) = &layer.weights {
                let label = format!("{prefix}.weights");
                validate_weights(&weights.resolve(&label)?, &label)?;
            }
            if let Some(thresholds) = &layer.thresholds {
                let label = format!("{prefix}.thresholds");
                validate_thresholds(&thresholds.resolve(&label)?, &label)?;
            }
            for pattern in &layer.patterns {
                PathPattern::compile(pattern)?;
            }
        }
        for pattern in &self.main_chain_paths {
            PathPattern::compile(pattern)?;
        }

        Ok(())
    }
}

fn validate_weights(weights: &Weights, label: &str) -> Result<()> {
    if let Some((field, _)) = weights
        .entries()
        .into_iter()
        .find(|(_, weight)| !(0.0..=1.0).contains(weight))
    {
        return Err(TestRankError::ConfigParse(format!(
            "{label}.{field} must be between 0.0 and 1.0"
        )));
    }
    let sum: f64 = weights.entries().iter().map(|(_, weight)| weight).sum();
    if (sum - 1.0).abs() > 0.001 {
        return Err(TestRankError::ConfigParse(format!(
            "{label} must sum to 1.0 (found {sum:.3})"
        )));
    }
    Ok(())
}

fn validate_thresholds(thresholds: &Thresholds, label: &str) -> Result<()> {
    if thresholds.p0 < thresholds.p1 || thresholds.p1 < thresholds.p2 {
        return Err(TestRankError::ConfigParse(format!(
            "{label} must satisfy p0 >= p1 >= p2 (found {} / {} / {})",
            thresholds.p0, thresholds.p1, thresholds.p2
        )));
    }
    Ok(())
}
