use super::resolver::{self, from_overrides, from_suggestions};
use super::{clamp_score, MAX_SCORE, MIN_SCORE};
use crate::types::config::ScoringConfig;
use crate::types::target::{GitSignals, ImpactHint};

const BASE_LIKELIHOOD: u8 = 3;
const BASE_IMPACT: u8 = 3;

/// Failure likelihood derived from change history.
pub fn likelihood(git: &GitSignals) -> u8 {
    let mut score = BASE_LIKELIHOOD;
    score += tiered(git.total_commits, 50, 20);
    score += tiered(git.recent_commits, 10, 5);
    score += tiered(git.unique_authors, 10, 5);
    if git.cross_module_refs > 3 {
        score += 1;
    }
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Blast radius derived from the target's lexical properties.
pub fn impact(hint: ImpactHint) -> u8 {
    let mut score = BASE_IMPACT;
    if hint.has_external {
        score += 2;
    }
    score += u8::from(hint.has_async)
        + u8::from(hint.has_try_catch)
        + u8::from(hint.has_complex_logic);
    score.clamp(MIN_SCORE, MAX_SCORE)
}

fn tiered(value: u32, high: u32, low: u32) -> u8 {
    if value > high {
        2
    } else if value > low {
        1
    } else {
        0
    }
}

pub fn error_risk(path: &str, git: &GitSignals, hint: ImpactHint, config: &ScoringConfig) -> u8 {
    let suggestions = config
        .suggestions()
        .map(|suggestions| suggestions.high_risk_modules.as_slice());

    let suggested = || from_suggestions(suggestions, path, |s| s.suggested_er);
    let overridden = || from_overrides(&config.overrides.er, path);
    let heuristic = || {
        let combined = f64::from(likelihood(git)) + f64::from(impact(hint));
        Some(f64::from(clamp_score(combined / 2.0)))
    };

    resolver::resolve(&[&suggested, &overridden, &heuristic], f64::from(MIN_SCORE))
}
