use crate::matching::path_matches;
use crate::types::suggestion::Suggestion;
use std::collections::BTreeMap;
use tracing::debug;

/// One step of a precedence chain. Returns `None` to defer to the next step.
pub type Resolver<'a> = &'a dyn Fn() -> Option<f64>;

/// Walks `chain` in order and clamps the first value produced; falls back to `default`.
pub fn resolve(chain: &[Resolver<'_>], default: f64) -> u8 {
    let value = chain.iter().find_map(|step| step()).unwrap_or(default);
    super::clamp_score(value)
}

/// First suggestion (in list order) whose pattern matches `path` and that
/// carries the category-specific field selected by `field`.
pub fn from_suggestions(
    suggestions: Option<&[Suggestion]>,
    path: &str,
    field: fn(&Suggestion) -> Option<f64>,
) -> Option<f64> {
    suggestions?
        .iter()
        .filter(|suggestion| path_matches(&suggestion.pattern, path))
        .find_map(|suggestion| {
            let value = field(suggestion)?;
            debug!(
                path,
                pattern = %suggestion.pattern,
                confidence = suggestion.confidence,
                reason = %suggestion.reason,
                evidence = suggestion.evidence.len(),
                value,
                "applied suggestion"
            );
            Some(value)
        })
}

/// Exact path entry first, then the first pattern key that matches.
pub fn from_overrides(overrides: &BTreeMap<String, f64>, path: &str) -> Option<f64> {
    overrides.get(path).copied().or_else(|| {
        overrides
            .iter()
            .find(|(pattern, _)| path_matches(pattern, path))
            .map(|(_, value)| *value)
    })
}
