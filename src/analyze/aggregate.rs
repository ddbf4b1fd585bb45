use super::layer::LayerMatch;
use crate::error::Result;
use crate::types::config::{ScoringConfig, ScoringMode, Thresholds, Weights};
use crate::types::scoring::Priority;

/// The dependency signal saturates so a hub file cannot swamp the other metrics.
pub const DEPENDENCY_CAP: usize = 10;

/// Per-target metric values fed into the weighted sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricScores {
    pub bc: u8,
    pub cc: u8,
    pub er: u8,
    pub testability: u8,
    pub coverage_score: u8,
    pub dependency_count: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct LayerTable {
    weights: Option<Weights>,
    thresholds: Option<Thresholds>,
}

/// Weight and threshold tables resolved once from a validated config.
#[derive(Debug, Clone)]
pub struct ScoringTables {
    mode: ScoringMode,
    weights: Weights,
    thresholds: Thresholds,
    layers: Vec<LayerTable>,
}

impl ScoringTables {
    pub fn from_config(config: &ScoringConfig) -> Result<Self> {
        let weights = config.weights.clone().unwrap_or_default().resolve("weights")?;
        let thresholds = config
            .thresholds
            .clone()
            .unwrap_or_default()
            .resolve("thresholds")?;

        let layers = match config.mode {
            ScoringMode::Layered => config
                .layers
                .iter()
                .map(|layer| {
                    let prefix = format!("layers[{}]", layer.name);
                    Ok(LayerTable {
                        weights: layer
                            .weights
                            .as_ref()
                            .map(|w| w.resolve(&format!("{prefix}.weights")))
                            .transpose()?,
                        thresholds: layer
                            .thresholds
                            .as_ref()
                            .map(|t| t.resolve(&format!("{prefix}.thresholds")))
                            .transpose()?,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            ScoringMode::Unified => Vec::new(),
        };

        Ok(Self {
            mode: config.mode,
            weights,
            thresholds,
            layers,
        })
    }

    fn layer_table(&self, layer: &LayerMatch<'_>) -> Option<&LayerTable> {
        match (self.mode, layer) {
            (ScoringMode::Layered, LayerMatch::Matched { index, .. }) => self.layers.get(*index),
            _ => None,
        }
    }

    /// Layer table when the layer defines one in layered mode, else the global table.
    pub fn resolve_weights(&self, layer: &LayerMatch<'_>) -> Weights {
        self.layer_table(layer)
            .and_then(|table| table.weights)
            .unwrap_or(self.weights)
    }

    pub fn resolve_thresholds(&self, layer: &LayerMatch<'_>) -> Thresholds {
        self.layer_table(layer)
            .and_then(|table| table.thresholds)
            .unwrap_or(self.thresholds)
    }
}

/// Weighted sum rounded to two decimals. Coverage contributes its gap, so
/// well-covered targets rank lower.
pub fn weighted_score(metrics: &MetricScores, weights: &Weights) -> f64 {
    let dependency = metrics.dependency_count.min(DEPENDENCY_CAP) as f64;
    let coverage_gap = f64::from(10u8.saturating_sub(metrics.coverage_score));
    let raw = f64::from(metrics.bc) * weights.bc
        + f64::from(metrics.cc) * weights.cc
        + f64::from(metrics.er) * weights.er
        + f64::from(metrics.testability) * weights.testability
        + dependency * weights.dependency_count
        + coverage_gap * weights.coverage;
    (raw * 100.0).round() / 100.0
}

pub fn priority_for(score: f64, thresholds: &Thresholds) -> Priority {
    if score >= thresholds.p0 {
        Priority::P0
    } else if score >= thresholds.p1 {
        Priority::P1
    } else if score >= thresholds.p2 {
        Priority::P2
    } else {
        Priority::P3
    }
}

pub fn aggregate(
    metrics: &MetricScores,
    layer: &LayerMatch<'_>,
    tables: &ScoringTables,
) -> (f64, Priority) {
    let score = weighted_score(metrics, &tables.resolve_weights(layer));
    (score, priority_for(score, &tables.resolve_thresholds(layer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LAYERED: &str = r#"
mode = "layered"

[weights]
bc = 0.25
cc = 0.15
er = 0.25
testability = 0.10
dependency_count = 0.10
coverage = 0.15

[thresholds]
p0 = 7.0
p1 = 5.5
p2 = 4.0

[[layers]]
name = "services"
patterns = ["src/services/**"]

[layers.weights]
bc = 0.5
cc = 0.0
er = 0.5
testability = 0.0
dependency_count = 0.0
coverage = 0.0

[layers.thresholds]
p0 = 9.0
p1 = 8.0
p2 = 7.0

[[layers]]
name = "utils"
patterns = ["src/utils/**"]
"#;

    fn metrics() -> MetricScores {
        MetricScores {
            bc: 8,
            cc: 4,
            er: 6,
            testability: 5,
            coverage_score: 3,
            dependency_count: 2,
        }
    }

    fn layered_tables() -> ScoringTables {
        let cfg: ScoringConfig = toml::from_str(LAYERED).expect("config should parse");
        cfg.validate().expect("config should validate");
        ScoringTables::from_config(&cfg).expect("tables should resolve")
    }

    #[test]
    fn weighted_score_uses_coverage_gap_and_capped_dependencies() {
        let weights = ScoringConfig::builtin()
            .weights
            .expect("builtin weights")
            .resolve("weights")
            .expect("builtin weights complete");
        // 8*.25 + 4*.15 + 6*.25 + 5*.10 + 2*.10 + 7*.15 = 5.85
        assert_eq!(weighted_score(&metrics(), &weights), 5.85);

        let hub = MetricScores {
            dependency_count: 250,
            ..metrics()
        };
        // 5.85 - 0.2 + 1.0
        assert_eq!(weighted_score(&hub, &weights), 6.65);
    }

    #[test]
    fn priority_thresholds_are_inclusive() {
        let thresholds = Thresholds {
            p0: 7.0,
            p1: 5.5,
            p2: 4.0,
        };
        assert_eq!(priority_for(7.0, &thresholds), Priority::P0);
        assert_eq!(priority_for(6.99, &thresholds), Priority::P1);
        assert_eq!(priority_for(4.0, &thresholds), Priority::P2);
        assert_eq!(priority_for(3.99, &thresholds), Priority::P3);
    }

    #[test]
    fn layered_mode_uses_layer_table() {
        let tables = layered_tables();
        let services = LayerMatch::Matched {
            index: 0,
            name: "services",
        };
        let (score, priority) = aggregate(&metrics(), &services, &tables);
        assert_eq!(score, 7.0);
        assert_eq!(priority, Priority::P2);
    }

    #[test]
    fn layer_without_tables_and_unmatched_fall_back_to_global() {
        let tables = layered_tables();
        let utils = LayerMatch::Matched {
            index: 1,
            name: "utils",
        };
        assert_eq!(aggregate(&metrics(), &utils, &tables), (5.85, Priority::P1));
        assert_eq!(
            aggregate(&metrics(), &LayerMatch::Unmatched, &tables),
            (5.85, Priority::P1)
        );
    }

    #[test]
    fn unified_mode_ignores_layer_tables() {
        let cfg: ScoringConfig =
            toml::from_str(&LAYERED.replace("mode = \"layered\"", "mode = \"unified\""))
                .expect("config should parse");
        let tables = ScoringTables::from_config(&cfg).expect("tables should resolve");
        let services = LayerMatch::Matched {
            index: 0,
            name: "services",
        };
        assert_eq!(aggregate(&metrics(), &services, &tables), (5.85, Priority::P1));
    }

    proptest! {
        #[test]
        fn higher_score_never_gets_lower_tier(
            a in 0.0f64..12.0,
            b in 0.0f64..12.0,
            p2 in 0.0f64..4.0,
            gap1 in 0.0f64..3.0,
            gap0 in 0.0f64..3.0,
        ) {
            let thresholds = Thresholds { p0: p2 + gap1 + gap0, p1: p2 + gap1, p2 };
            if a > b {
                prop_assert!(priority_for(a, &thresholds) >= priority_for(b, &thresholds));
            }
        }

        #[test]
        fn builtin_score_stays_within_scale(
            bc in 1u8..=10,
            cc in 1u8..=10,
            er in 1u8..=10,
            testability in 1u8..=10,
            coverage_score in 0u8..=10,
            dependency_count in 0usize..500,
        ) {
            let weights = ScoringConfig::builtin()
                .weights
                .expect("builtin weights")
                .resolve("weights")
                .expect("builtin weights complete");
            let metrics = MetricScores {
                bc,
                cc,
                er,
                testability,
                coverage_score,
                dependency_count,
            };
            let score = weighted_score(&metrics, &weights);
            prop_assert!((0.0..=10.0).contains(&score));
        }
    }
}
