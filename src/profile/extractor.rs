//! Radially binned profile extraction
//!
//! The extractor turns per-particle radii and weights into per-bin values.
//! Particles are sorted by radius once and prefix-summed, after which every
//! bin edge is a binary search away: O(N log N + M log N) for N particles and
//! M bins instead of rescanning all particles for every edge.

use ndarray::ArrayView2;
use std::f64::consts::PI;

use super::bins::RadialBins;
use super::error::ProfileError;

// =================================================================================================
// Geometry
// =================================================================================================

/// Shape of the shells a density is normalised by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    /// 2-D rings: measure `2πR`
    Annular,

    /// 3-D spheres: measure `4πR²`
    Spherical,
}

impl Geometry {
    /// Geometry matching the dimensionality of particle positions
    pub fn from_dimension(dimension: usize) -> Option<Self> {
        match dimension {
            2 => Some(Self::Annular),
            3 => Some(Self::Spherical),
            _ => None,
        }
    }

    /// Surface measure of the shell boundary at `outer`
    ///
    /// Only the outer edge enters the normalisation, so
    /// `ΔM / ΔR / shell_measure(R_out)` is a first-order estimate of the shell
    /// density, not the exact `ΔM / V_shell`.
    pub fn shell_measure(&self, outer: f64) -> f64 {
        match self {
            Self::Annular => 2.0 * PI * outer,
            Self::Spherical => 4.0 * PI * outer * outer,
        }
    }
}

// =================================================================================================
// Profile
// =================================================================================================

/// Per-bin values, each reported at the bin's outer edge
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    radii: Vec<f64>,
    values: Vec<f64>,
}

impl Profile {
    fn new(radii: Vec<f64>, values: Vec<f64>) -> Self {
        debug_assert_eq!(radii.len(), values.len());
        Self { radii, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// (radius, value) pairs in bin order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.radii.iter().copied().zip(self.values.iter().copied())
    }

    /// Pairs usable on logarithmic axes (finite, strictly positive value)
    pub fn positive_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.iter().filter(|(_, v)| v.is_finite() && *v > 0.0)
    }
}

// =================================================================================================
// Radii
// =================================================================================================

/// Euclidean distance of every particle (row of `positions`) to `center`
///
/// # Errors
///
/// `DimensionMismatch` if `center` and the position columns disagree.
pub fn radii_from_center(
    positions: ArrayView2<f64>,
    center: &[f64],
) -> Result<Vec<f64>, ProfileError> {
    if positions.ncols() != center.len() {
        return Err(ProfileError::DimensionMismatch {
            center: center.len(),
            positions: positions.ncols(),
        });
    }

    let radii = positions
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .zip(center.iter())
                .map(|(x, c)| (x - c) * (x - c))
                .sum::<f64>()
                .sqrt()
        })
        .collect();

    Ok(radii)
}

// =================================================================================================
// Extractor
// =================================================================================================

/// Radially binned aggregation of particle weights
///
/// Stateless: every method takes `&self`, never mutates its inputs, and
/// returns identical output for identical input.
///
/// # Example
///
/// ```rust
/// use radprof_rs::profile::{Geometry, ProfileExtractor, RadialBins};
///
/// let bins = RadialBins::new(vec![1.0, 2.0, 4.0, 8.0]).unwrap();
/// let extractor = ProfileExtractor::new(Geometry::Spherical);
///
/// let radii = [1.5, 3.0, 3.5];
/// let masses = [1.0, 2.0, 1.0];
///
/// let cumulative = extractor.cumulative(&radii, &masses, &bins).unwrap();
/// assert_eq!(cumulative, vec![0.0, 1.0, 4.0, 4.0]);
///
/// let density = extractor.density(&radii, &masses, &bins).unwrap();
/// assert_eq!(density.len(), 3);
/// assert_eq!(density.values()[2], 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileExtractor {
    geometry: Geometry,
}

impl Default for ProfileExtractor {
    fn default() -> Self {
        Self::new(Geometry::Spherical)
    }
}

/// Particles ordered by radius
struct SortedParticles {
    radii: Vec<f64>,
    weights: Vec<f64>,
}

impl SortedParticles {
    fn build(radii: &[f64], weights: &[f64]) -> Result<Self, ProfileError> {
        if radii.len() != weights.len() {
            return Err(ProfileError::LengthMismatch {
                radii: radii.len(),
                weights: weights.len(),
            });
        }

        for (index, &value) in radii.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(ProfileError::InvalidRadius { index, value });
            }
        }

        if let Some(index) = weights.iter().position(|w| !w.is_finite()) {
            return Err(ProfileError::InvalidWeight { index });
        }

        let mut order: Vec<usize> = (0..radii.len()).collect();
        order.sort_by(|&a, &b| radii[a].total_cmp(&radii[b]));

        Ok(Self {
            radii: order.iter().map(|&i| radii[i]).collect(),
            weights: order.iter().map(|&i| weights[i]).collect(),
        })
    }

    /// Number of particles with radius strictly below `edge`
    fn count_below(&self, edge: f64) -> usize {
        self.radii.partition_point(|&r| r < edge)
    }

    /// `prefix[k]` = sum of the `k` innermost weights
    fn prefix_sums(&self) -> Vec<f64> {
        let mut prefix = Vec::with_capacity(self.weights.len() + 1);
        let mut total = 0.0;
        prefix.push(total);
        for w in &self.weights {
            total += w;
            prefix.push(total);
        }
        prefix
    }
}

impl ProfileExtractor {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Total weight of particles with radius strictly below each edge
    ///
    /// Returns one value per edge (`M + 1` values), non-decreasing when all
    /// weights are non-negative.
    pub fn cumulative(
        &self,
        radii: &[f64],
        weights: &[f64],
        bins: &RadialBins,
    ) -> Result<Vec<f64>, ProfileError> {
        let sorted = SortedParticles::build(radii, weights)?;
        let prefix = sorted.prefix_sums();

        Ok(bins
            .edges()
            .iter()
            .map(|&edge| prefix[sorted.count_below(edge)])
            .collect())
    }

    /// Shell density of every bin
    ///
    /// `value[i] = ΔW / ΔR / shell_measure(edge[i+1])` where `ΔW` is the
    /// cumulative weight difference across the bin. Empty bins give `0`.
    pub fn density(
        &self,
        radii: &[f64],
        weights: &[f64],
        bins: &RadialBins,
    ) -> Result<Profile, ProfileError> {
        let cumulative = self.cumulative(radii, weights, bins)?;
        let edges = bins.edges();

        let values: Vec<f64> = (0..bins.n_bins())
            .map(|i| {
                let enclosed = cumulative[i + 1] - cumulative[i];
                let width = edges[i + 1] - edges[i];
                enclosed / width / self.geometry.shell_measure(edges[i + 1])
            })
            .collect();

        let empty = values.iter().filter(|v| **v == 0.0).count();
        if empty > 0 {
            log::debug!("{} of {} density bins are empty", empty, values.len());
        }

        Ok(Profile::new(bins.outer_edges().to_vec(), values))
    }

    /// Number of particles falling in every bin
    pub fn counts(&self, radii: &[f64], bins: &RadialBins) -> Result<Vec<usize>, ProfileError> {
        let ones = vec![1.0; radii.len()];
        let sorted = SortedParticles::build(radii, &ones)?;

        Ok(bins
            .edges()
            .windows(2)
            .map(|pair| sorted.count_below(pair[1]) - sorted.count_below(pair[0]))
            .collect())
    }

    /// Arithmetic mean of a per-particle field in every bin
    ///
    /// Bins without particles have no mean and hold `NaN`.
    pub fn mean(
        &self,
        radii: &[f64],
        values: &[f64],
        bins: &RadialBins,
    ) -> Result<Profile, ProfileError> {
        let sorted = SortedParticles::build(radii, values)?;

        let means: Vec<f64> = bins
            .edges()
            .windows(2)
            .map(|pair| {
                let lo = sorted.count_below(pair[0]);
                let hi = sorted.count_below(pair[1]);
                if hi == lo {
                    f64::NAN
                } else {
                    sorted.weights[lo..hi].iter().sum::<f64>() / (hi - lo) as f64
                }
            })
            .collect();

        Ok(Profile::new(bins.outer_edges().to_vec(), means))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
