use super::resolver::{self, from_overrides};
use crate::types::target::ImpactHint;
use std::collections::BTreeMap;

const BASE_ROI: f64 = 5.0;

pub fn roi(path: &str, hint: ImpactHint, overrides: &BTreeMap<String, f64>) -> u8 {
    let overridden = || from_overrides(overrides, path);
    let heuristic = || {
        let mut score = BASE_ROI;
        if hint.has_complex_logic {
            score += 2.0;
        }
        if hint.has_try_catch {
            score += 1.0;
        }
        if hint.has_async {
            score += 1.0;
        }
        Some(score)
    };

    resolver::resolve(&[&overridden, &heuristic], BASE_ROI)
}
