//! Helper functions for integration tests

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// First non-comment line of a CSV file
#[allow(dead_code)]
pub fn csv_header(content: &str) -> &str {
    content
        .lines()
        .find(|line| !line.starts_with('#'))
        .unwrap_or_default()
}
