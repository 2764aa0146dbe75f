//! Errors raised while building bins or extracting profiles

use thiserror::Error;

/// Input-validation failures of the profile extraction
///
/// Every variant describes malformed input. A bin that simply contains no
/// particles is never an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("At least 2 bin edges are required, got {0}")]
    TooFewEdges(usize),

    #[error("Bin edge [{index}] = {value} must be finite and strictly positive")]
    NonPositiveEdge { index: usize, value: f64 },

    #[error("Bin edges must be strictly increasing: edge[{index}] = {current} does not exceed the previous edge {previous}")]
    NotAscending {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("Invalid radius range: r_min = {r_min}, r_max = {r_max} (need 0 < r_min < r_max)")]
    InvalidRange { r_min: f64, r_max: f64 },

    #[error("Data length mismatch: {radii} radii versus {weights} weights")]
    LengthMismatch { radii: usize, weights: usize },

    #[error("Invalid radius for particle [{index}]: {value} (must be finite and >= 0)")]
    InvalidRadius { index: usize, value: f64 },

    #[error("Invalid weight for particle [{index}]: NaN or Inf")]
    InvalidWeight { index: usize },

    #[error("Center has {center} components but positions have {positions} dimensions")]
    DimensionMismatch { center: usize, positions: usize },
}
