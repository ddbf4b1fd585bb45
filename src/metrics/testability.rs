use super::resolver::{self, from_overrides, from_suggestions};
use crate::types::config::ScoringConfig;
use crate::types::target::ImpactHint;

const BASE_TESTABILITY: f64 = 5.0;

/// How cheap the target is to put under test; higher means easier.
pub fn testability(path: &str, hint: ImpactHint, config: &ScoringConfig) -> u8 {
    let suggestions = config
        .suggestions()
        .map(|suggestions| suggestions.testability_adjustments.as_slice());

    let suggested = || {
        from_suggestions(suggestions, path, |s| s.adjustment)
            .map(|adjustment| BASE_TESTABILITY + adjustment)
    };
    let overridden = || from_overrides(&config.overrides.testability, path);
    let heuristic = || {
        let mut score = BASE_TESTABILITY;
        for penalty in [hint.has_complex_logic, hint.has_async, hint.has_external] {
            if penalty {
                score -= 1.0;
            }
        }
        if hint.has_try_catch {
            score -= 0.5;
        }
        Some(score)
    };

    resolver::resolve(&[&suggested, &overridden, &heuristic], BASE_TESTABILITY)
}
