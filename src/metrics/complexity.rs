use crate::types::target::FunctionTarget;

/// Where a target's complexity figure came from, in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexitySource {
    ExternalCognitive(u32),
    Cognitive(u32),
    Cyclomatic(u32),
}

impl ComplexitySource {
    pub fn select(target: &FunctionTarget, external_cognitive: Option<u32>) -> Self {
        external_cognitive
            .map(Self::ExternalCognitive)
            .or_else(|| target.cognitive.map(Self::Cognitive))
            .unwrap_or(Self::Cyclomatic(target.cyclomatic.unwrap_or(1)))
    }

    pub fn score(self) -> u8 {
        match self {
            Self::ExternalCognitive(value) | Self::Cognitive(value) => cognitive_band(value),
            Self::Cyclomatic(value) => cyclomatic_band(value),
        }
    }
}

pub fn code_complexity(target: &FunctionTarget, external_cognitive: Option<u32>) -> u8 {
    ComplexitySource::select(target, external_cognitive).score()
}

pub fn cognitive_band(value: u32) -> u8 {
    match value {
        0..=5 => 1,
        6..=10 => 3,
        11..=15 => 5,
        16..=20 => 7,
        21..=30 => 9,
        _ => 10,
    }
}

pub fn cyclomatic_band(value: u32) -> u8 {
    match value {
        0..=3 => 1,
        4..=5 => 3,
        6..=10 => 5,
        11..=15 => 7,
        16..=20 => 9,
        _ => 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cognitive_band_edges() {
        let cases = [(5, 1), (6, 3), (10, 3), (15, 5), (20, 7), (30, 9), (31, 10)];
        for (value, expected) in cases {
            assert_eq!(cognitive_band(value), expected, "cognitive {value}");
        }
    }

    #[test]
    fn cyclomatic_band_edges() {
        let cases = [(3, 1), (4, 3), (5, 3), (10, 5), (15, 7), (20, 9), (21, 10)];
        for (value, expected) in cases {
            assert_eq!(cyclomatic_band(value), expected, "cyclomatic {value}");
        }
    }

    #[test]
    fn external_cognitive_preferred_over_target_metrics() {
        let mut target = FunctionTarget::new("run", "src/a.ts");
        target.cognitive = Some(3);
        target.cyclomatic = Some(25);
        assert_eq!(
            ComplexitySource::select(&target, Some(18)),
            ComplexitySource::ExternalCognitive(18)
        );
        assert_eq!(code_complexity(&target, Some(18)), 7);
    }

    #[test]
    fn target_cognitive_preferred_over_cyclomatic() {
        let mut target = FunctionTarget::new("run", "src/a.ts");
        target.cognitive = Some(12);
        target.cyclomatic = Some(25);
        assert_eq!(code_complexity(&target, None), 5);
    }

    #[test]
    fn missing_metrics_default_to_lowest_band() {
        let target = FunctionTarget::new("run", "src/a.ts");
        assert_eq!(
            ComplexitySource::select(&target, None),
            ComplexitySource::Cyclomatic(1)
        );
        assert_eq!(code_complexity(&target, None), 1);
    }
}
