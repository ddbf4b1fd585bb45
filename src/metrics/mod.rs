//! Per-target metric calculators.
//!
//! Every calculator is a pure function of its inputs and returns an integer
//! score in `[1, 10]`, except coverage which may be `0`.

pub mod business;
pub mod complexity;
pub mod coverage;
pub mod error_risk;
pub mod resolver;
pub mod roi;
pub mod testability;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

/// Rounds half away from zero and clamps into `[1, 10]`. Non-finite input maps to 1.
pub fn clamp_score(value: f64) -> u8 {
    if !value.is_finite() {
        return MIN_SCORE;
    }
    value
        .round()
        .clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE)) as u8
}
