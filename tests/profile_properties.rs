//! Integration tests: radial binning contract
//!
//! Properties every extractor result must satisfy, independent of where the
//! particles come from.

use approx::assert_relative_eq;
use radprof_rs::profile::{Geometry, ProfileError, ProfileExtractor, RadialBins};

/// A fixed, irregular particle set
fn particles() -> (Vec<f64>, Vec<f64>) {
    let radii: Vec<f64> = (0..500).map(|i| 0.01 + (i as f64 * 0.618_034).fract() * 3.0).collect();
    let weights: Vec<f64> = (0..500).map(|i| 1.0 + (i % 7) as f64).collect();
    (radii, weights)
}

// =================================================================================================
// Output shape
// =================================================================================================

#[test]
fn test_one_value_per_bin() {
    let (radii, weights) = particles();
    let extractor = ProfileExtractor::default();

    let edge_sets = vec![
        vec![0.5, 1.0],
        vec![0.1, 0.2, 0.4, 0.8, 1.6, 3.2],
        vec![1e-3, 1e-2, 1e-1, 1.0, 10.0, 100.0],
        (1..=64).map(|i| i as f64 * 0.05).collect(),
    ];

    for edges in edge_sets {
        let m = edges.len() - 1;
        let bins = RadialBins::new(edges).unwrap();

        assert_eq!(extractor.density(&radii, &weights, &bins).unwrap().len(), m);
        assert_eq!(extractor.mean(&radii, &weights, &bins).unwrap().len(), m);
        assert_eq!(extractor.counts(&radii, &bins).unwrap().len(), m);
        assert_eq!(extractor.cumulative(&radii, &weights, &bins).unwrap().len(), m + 1);
    }
}

#[test]
fn test_profile_radii_are_outer_edges() {
    let (radii, weights) = particles();
    let bins = RadialBins::log_spaced(0.05, 2.0, 12).unwrap();

    let profile = ProfileExtractor::default().density(&radii, &weights, &bins).unwrap();
    assert_eq!(profile.radii(), bins.outer_edges());
}

// =================================================================================================
// Determinism and purity
// =================================================================================================

#[test]
fn test_identical_inputs_identical_outputs() {
    let (radii, weights) = particles();
    let bins = RadialBins::linear(0.1, 3.0, 30).unwrap();
    let extractor = ProfileExtractor::new(Geometry::Annular);

    let first = extractor.density(&radii, &weights, &bins).unwrap();
    let second = extractor.density(&radii, &weights, &bins).unwrap();
    assert_eq!(first, second);

    // Inputs untouched
    assert_eq!((radii, weights), particles());
}

#[test]
fn test_order_of_particles_irrelevant() {
    let (radii, weights) = particles();
    let bins = RadialBins::linear(0.1, 3.0, 10).unwrap();
    let extractor = ProfileExtractor::default();

    let forward = extractor.counts(&radii, &bins).unwrap();

    let reversed_radii: Vec<f64> = radii.iter().rev().copied().collect();
    let backward = extractor.counts(&reversed_radii, &bins).unwrap();
    assert_eq!(forward, backward);
}

// =================================================================================================
// Semantics
// =================================================================================================

#[test]
fn test_reference_scenario() {
    let bins = RadialBins::new(vec![1.0, 2.0, 4.0, 8.0]).unwrap();
    let radii = [1.5, 3.0, 3.5];
    let masses = [1.0, 2.0, 1.0];
    let extractor = ProfileExtractor::new(Geometry::Spherical);

    let cumulative = extractor.cumulative(&radii, &masses, &bins).unwrap();
    assert_eq!(cumulative, vec![0.0, 1.0, 4.0, 4.0]);

    let density = extractor.density(&radii, &masses, &bins).unwrap();
    let four_pi = 4.0 * std::f64::consts::PI;
    assert_relative_eq!(density.values()[0], 1.0 / 1.0 / (four_pi * 4.0), epsilon = 1e-15);
    assert_relative_eq!(density.values()[1], 3.0 / 2.0 / (four_pi * 16.0), epsilon = 1e-15);
    assert_eq!(density.values()[2], 0.0);
}

#[test]
fn test_edge_is_exclusive() {
    // A particle exactly on an edge belongs to the bin it opens
    let bins = RadialBins::new(vec![1.0, 2.0, 3.0]).unwrap();
    let counts = ProfileExtractor::default().counts(&[2.0], &bins).unwrap();
    assert_eq!(counts, vec![0, 1]);
}

#[test]
fn test_counts_sum_to_particles_in_range() {
    let (radii, _) = particles();
    let bins = RadialBins::linear(0.5, 2.5, 9).unwrap();

    let counts = ProfileExtractor::default().counts(&radii, &bins).unwrap();
    let inside = radii.iter().filter(|&&r| (0.5..2.5).contains(&r)).count();
    assert_eq!(counts.iter().sum::<usize>(), inside);
}

#[test]
fn test_density_integrates_back_to_mass() {
    // Σ ρ_i · ΔR_i · shell(R_i) recovers the binned mass
    let (radii, weights) = particles();
    let bins = RadialBins::log_spaced(0.02, 3.5, 40).unwrap();
    let extractor = ProfileExtractor::default();

    let density = extractor.density(&radii, &weights, &bins).unwrap();
    let recovered: f64 = density
        .iter()
        .zip(bins.widths())
        .map(|((r, rho), width)| rho * width * Geometry::Spherical.shell_measure(r))
        .sum();

    let cumulative = extractor.cumulative(&radii, &weights, &bins).unwrap();
    let binned = cumulative[cumulative.len() - 1] - cumulative[0];
    assert_relative_eq!(recovered, binned, max_relative = 1e-12);
}

// =================================================================================================
// Rejection of malformed input
// =================================================================================================

#[test]
fn test_malformed_edges_rejected() {
    assert!(matches!(RadialBins::new(vec![1.0]), Err(ProfileError::TooFewEdges(1))));
    assert!(matches!(
        RadialBins::new(vec![0.0, 1.0]),
        Err(ProfileError::NonPositiveEdge { index: 0, .. })
    ));
    assert!(matches!(
        RadialBins::new(vec![1.0, f64::NAN]),
        Err(ProfileError::NonPositiveEdge { index: 1, .. })
    ));
    assert!(matches!(
        RadialBins::new(vec![1.0, 3.0, 2.0]),
        Err(ProfileError::NotAscending { index: 2, .. })
    ));
    assert!(matches!(
        RadialBins::new(vec![1.0, 1.0]),
        Err(ProfileError::NotAscending { index: 1, .. })
    ));
}

#[test]
fn test_mismatched_particles_rejected() {
    let bins = RadialBins::new(vec![1.0, 2.0]).unwrap();
    let extractor = ProfileExtractor::default();

    assert!(matches!(
        extractor.density(&[1.0, 1.5], &[1.0], &bins),
        Err(ProfileError::LengthMismatch { radii: 2, weights: 1 })
    ));
    assert!(matches!(
        extractor.density(&[-1.0], &[1.0], &bins),
        Err(ProfileError::InvalidRadius { index: 0, .. })
    ));
    assert!(matches!(
        extractor.density(&[1.0], &[f64::INFINITY], &bins),
        Err(ProfileError::InvalidWeight { index: 0 })
    ));
}

#[test]
fn test_log_spaced_matches_logspace() {
    // 10^x for x evenly spaced on [-2, log10(0.5)]
    let expected = [0.01, 0.026_591_479_484_724_94, 0.070_710_678_118_654_76, 0.188_030_216_710_343_3, 0.5];
    let bins = RadialBins::log_spaced(0.01, 0.5, 5).unwrap();

    for (edge, expected) in bins.edges().iter().zip(expected) {
        assert_relative_eq!(*edge, expected, max_relative = 1e-12);
    }
}
