/// Maps a line-coverage percentage to `[0, 10]`.
///
/// Unknown, negative and exactly-zero coverage all map to `0`; any positive
/// coverage maps to at least `1`.
pub fn coverage_score(line_coverage: Option<f64>) -> u8 {
    match line_coverage {
        Some(pct) if pct.is_finite() && pct > 0.0 => (pct / 10.0).ceil().clamp(1.0, 10.0) as u8,
        _ => 0,
    }
}
