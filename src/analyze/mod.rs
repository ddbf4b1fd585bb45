pub mod aggregate;
pub mod layer;

use crate::error::Result;
use crate::graph::builder::build_graph;
use crate::graph::source::SourceProvider;
use crate::graph::DependencyGraph;
use crate::metrics::{business, complexity, coverage, error_risk, roi, testability};
use crate::types::config::ScoringConfig;
use crate::types::scoring::{RankOutcome, ScoredTarget, SkipReason, SkippedTarget};
use crate::types::target::{FunctionTarget, ScanInput};
use aggregate::{MetricScores, ScoringTables};
use layer::LayerMatcher;
use tracing::{debug, info, warn};

/// Scores every target in `input` and returns them ranked.
///
/// The config is validated before anything else; a config error aborts the
/// run. Targets whose source cannot be resolved are skipped and reported,
/// never scored as zero.
pub fn rank(
    input: &ScanInput,
    config: &ScoringConfig,
    source: &dyn SourceProvider,
) -> Result<RankOutcome> {
    config.validate()?;
    let matcher = LayerMatcher::compile(&config.layers)?;
    let tables = ScoringTables::from_config(config)?;

    let graph = build_graph(
        input.targets.iter().map(|target| target.path.as_str()),
        source,
    );
    let engine = Engine {
        input,
        config,
        graph: &graph,
        matcher: &matcher,
        tables: &tables,
    };

    let mut scored = Vec::with_capacity(input.targets.len());
    let mut skipped = Vec::new();
    for target in &input.targets {
        match engine.score(target) {
            Ok(result) => scored.push(result),
            Err(reason) => {
                let entry = SkippedTarget::new(target, reason);
                warn!(path = %entry.path, name = %entry.name, %reason, "skipping target");
                skipped.push(entry);
            }
        }
    }

    sort_by_score(&mut scored);
    info!(
        scored = scored.len(),
        skipped = skipped.len(),
        "ranking complete"
    );
    Ok(RankOutcome {
        scored,
        skipped,
        graph_nodes: graph.node_count(),
    })
}

/// Score descending; the sort is stable so ties keep input order.
pub fn sort_by_score(targets: &mut [ScoredTarget]) {
    targets.sort_by(|a, b| b.score.total_cmp(&a.score));
}

struct Engine<'a> {
    input: &'a ScanInput,
    config: &'a ScoringConfig,
    graph: &'a DependencyGraph,
    matcher: &'a LayerMatcher,
    tables: &'a ScoringTables,
}

impl Engine<'_> {
    fn score(&self, target: &FunctionTarget) -> std::result::Result<ScoredTarget, SkipReason> {
        let path = target.path.as_str();
        let node = self.graph.node(path).ok_or(SkipReason::FileNotFound)?;
        if !node.mentions(&target.name) {
            return Err(SkipReason::FunctionNotFound);
        }

        let hint = target.hint();
        let git = self.input.git_signals_for(path);
        let coverage_pct = self.input.coverage_for(path);

        let metrics = MetricScores {
            bc: business::business_criticality(path, hint, self.config),
            cc: complexity::code_complexity(
                target,
                self.input.external_cognitive(path, &target.name),
            ),
            er: error_risk::error_risk(path, &git, hint, self.config),
            testability: testability::testability(path, hint, self.config),
            coverage_score: coverage::coverage_score(coverage_pct),
            dependency_count: self
                .graph
                .dependency_count(path, self.config.dependency_signal),
        };
        let roi = roi::roi(path, hint, &self.config.overrides.roi);

        let layer = self.matcher.match_path(path);
        let (score, priority) = aggregate::aggregate(&metrics, &layer, self.tables);
        debug!(
            key = %target.key(),
            layer = layer.name(),
            score,
            priority = %priority,
            "scored target"
        );

        Ok(ScoredTarget {
            target: target.clone(),
            bc: metrics.bc,
            cc: metrics.cc,
            er: metrics.er,
            roi,
            testability: metrics.testability,
            coverage_score: metrics.coverage_score,
            coverage_pct,
            score,
            priority,
            layer: layer.name().to_string(),
            dependency_count: metrics.dependency_count,
        })
    }
}
