use super::resolver::{self, from_overrides, from_suggestions};
use crate::matching::path_matches;
use crate::types::config::ScoringConfig;
use crate::types::target::ImpactHint;

const MAIN_CHAIN_BC: f64 = 9.0;
const EXTERNAL_OR_ASYNC_BC: f64 = 7.0;
const DEFAULT_BC: f64 = 5.0;

/// Business criticality: suggestion, then override, then main-chain and
/// lexical heuristics, then the default.
pub fn business_criticality(path: &str, hint: ImpactHint, config: &ScoringConfig) -> u8 {
    let suggestions = config
        .suggestions()
        .map(|suggestions| suggestions.business_critical_paths.as_slice());

    let suggested = || from_suggestions(suggestions, path, |s| s.suggested_bc);
    let overridden = || from_overrides(&config.overrides.bc, path);
    let heuristic = || heuristic_bc(path, hint, &config.main_chain_paths);

    resolver::resolve(&[&suggested, &overridden, &heuristic], DEFAULT_BC)
}

fn heuristic_bc(path: &str, hint: ImpactHint, main_chain_paths: &[String]) -> Option<f64> {
    if main_chain_paths
        .iter()
        .any(|pattern| path_matches(pattern, path))
    {
        Some(MAIN_CHAIN_BC)
    } else if hint.has_external || hint.has_async {
        Some(EXTERNAL_OR_ASYNC_BC)
    } else {
        None
    }
}
