//! Radial bin edges
//!
//! A [`RadialBins`] holds the thresholds against which particle radii are
//! accumulated. Edges are validated once at construction, so every consumer
//! can rely on them being finite, strictly positive and strictly increasing.

use super::error::ProfileError;

/// Ordered, validated radius thresholds
///
/// `M + 1` edges define `M` bins. Bin `i` spans `[edge[i], edge[i+1])`.
///
/// # Example
///
/// ```rust
/// use radprof_rs::profile::RadialBins;
///
/// let bins = RadialBins::log_spaced(0.01, 0.5, 200).unwrap();
/// assert_eq!(bins.n_bins(), 199);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RadialBins {
    edges: Vec<f64>,
}

impl RadialBins {
    /// Build bins from explicit edges
    ///
    /// # Errors
    ///
    /// - fewer than 2 edges
    /// - an edge that is NaN, infinite, zero or negative
    /// - an edge that does not exceed its predecessor
    pub fn new(edges: Vec<f64>) -> Result<Self, ProfileError> {
        if edges.len() < 2 {
            return Err(ProfileError::TooFewEdges(edges.len()));
        }

        for (index, &value) in edges.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(ProfileError::NonPositiveEdge { index, value });
            }
        }

        for (index, pair) in edges.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ProfileError::NotAscending {
                    index: index + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }

        Ok(Self { edges })
    }

    /// `n_edges` logarithmically spaced edges from `r_min` to `r_max`, both included
    ///
    /// Same sampling as `logspace(log10(r_min), log10(r_max), n_edges)`.
    pub fn log_spaced(r_min: f64, r_max: f64, n_edges: usize) -> Result<Self, ProfileError> {
        Self::check_range(r_min, r_max)?;
        if n_edges < 2 {
            return Err(ProfileError::TooFewEdges(n_edges));
        }

        let lo = r_min.log10();
        let hi = r_max.log10();
        let step = (hi - lo) / (n_edges - 1) as f64;

        let edges = (0..n_edges)
            .map(|i| 10f64.powf(lo + step * i as f64))
            .collect();

        Self::new(edges)
    }

    /// `n_edges` evenly spaced edges from `r_min` to `r_max`, both included
    pub fn linear(r_min: f64, r_max: f64, n_edges: usize) -> Result<Self, ProfileError> {
        Self::check_range(r_min, r_max)?;
        if n_edges < 2 {
            return Err(ProfileError::TooFewEdges(n_edges));
        }

        let step = (r_max - r_min) / (n_edges - 1) as f64;
        let edges = (0..n_edges)
            .map(|i| r_min + step * i as f64)
            .collect();

        Self::new(edges)
    }

    fn check_range(r_min: f64, r_max: f64) -> Result<(), ProfileError> {
        let valid = r_min.is_finite() && r_max.is_finite() && r_min > 0.0 && r_max > r_min;
        if valid {
            Ok(())
        } else {
            Err(ProfileError::InvalidRange { r_min, r_max })
        }
    }

    /// All edges, ascending
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins (edges - 1)
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Outer edge of every bin; the radius a profile value is reported at
    pub fn outer_edges(&self) -> &[f64] {
        &self.edges[1..]
    }

    /// Width of every bin
    pub fn widths(&self) -> Vec<f64> {
        self.edges.windows(2).map(|pair| pair[1] - pair[0]).collect()
    }

    pub fn r_min(&self) -> f64 {
        self.edges[0]
    }

    pub fn r_max(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }
}

// =================================================================================================
// Tests
// =================================================================================================
