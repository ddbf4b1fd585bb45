use serde::Deserialize;

/// Pre-validated AI suggestions. Each list is confidence-sorted and bounded upstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AiSuggestions {
    pub business_critical_paths: Vec<Suggestion>,
    pub high_risk_modules: Vec<Suggestion>,
    pub testability_adjustments: Vec<Suggestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Suggestion {
    pub pattern: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub evidence: Vec<String>,
    pub suggested_bc: Option<f64>,
    pub suggested_er: Option<f64>,
    pub adjustment: Option<f64>,
}

#[cfg(test)]
impl Suggestion {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            confidence: 1.0,
            reason: String::new(),
            evidence: Vec::new(),
            suggested_bc: None,
            suggested_er: None,
            adjustment: None,
        }
    }
}
