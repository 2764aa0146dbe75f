//! Plummer sphere density check
//!
//! Density profiles of up to [`MAX_PLOTTED_FILES`](crate::cli::MAX_PLOTTED_FILES)
//! snapshots in one log–log figure, with the analytical profile on top.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::AnalysisError;
use crate::cli::{validate_file_count, PlummerSettings};
use crate::models::PlummerModel;
use crate::output::{export_profiles_csv, plot_density_profiles, CsvConfig, CsvMetadata, PlotConfig};
use crate::profile::{radii_from_center, Geometry, Profile, ProfileExtractor, RadialBins};
use crate::snapshot::{load_snapshot, Snapshot};

/// What a Plummer run produced
#[derive(Debug, Clone)]
pub struct PlummerRun {
    /// (legend label, density profile) per snapshot, in input order
    pub profiles: Vec<(String, Profile)>,

    pub figure: PathBuf,

    pub csv: Option<PathBuf>,
}

/// Density profile of the gravity particles around `[shift; D]`
///
/// The initial conditions place the sphere at `shift` on every axis, so
/// the particles are measured from there. 3-D snapshots use spherical shells,
/// 2-D ones annuli.
pub fn plummer_density_profile(
    snapshot: &Snapshot,
    shift: f64,
    bins: &RadialBins,
) -> Result<Profile, AnalysisError> {
    let particles = snapshot.gravity_particles()?;
    let dimension = particles.dimension();
    let geometry = Geometry::from_dimension(dimension).ok_or(AnalysisError::Dimension(dimension))?;

    let center = vec![shift; dimension];
    let radii = radii_from_center(particles.positions(), &center)?;
    let masses = particles.masses().to_vec();
    debug!("{} particles, {} bins", radii.len(), bins.n_bins());

    Ok(ProfileExtractor::new(geometry).density(&radii, &masses, bins)?)
}

/// Run the Plummer density check
///
/// # Errors
///
/// - more than 20 files, before anything is read
/// - invalid model parameters or bin range
/// - any snapshot that cannot be loaded or binned
/// - plotting or export failures
pub fn run_plummer(settings: &PlummerSettings) -> Result<PlummerRun, AnalysisError> {
    validate_file_count(settings.files.len())?;

    let model = PlummerModel::new(settings.softening, settings.total_mass)?;
    let bins = RadialBins::log_spaced(settings.r_min, settings.r_max, settings.n_samples)?;

    let mut profiles = Vec::with_capacity(settings.files.len());
    for path in &settings.files {
        info!("{}", path.display());
        let snapshot = load_snapshot(path)
            .map_err(|source| AnalysisError::Load { path: path.clone(), source })?;

        let profile = plummer_density_profile(&snapshot, settings.shift, &bins)?;
        let empty = profile.values().iter().filter(|rho| **rho == 0.0).count();
        if empty > 0 {
            warn!("{}: {} of {} bins hold no particles", path.display(), empty, profile.len());
        }

        profiles.push((format!("t = {:.3} Gyr", snapshot.metadata.time_gyr()), profile));
    }

    let title = format!(
        "Plummer Density Profile: a = {:.1e} kpc, M = {:.1e} M☉",
        settings.softening,
        settings.total_mass * 1.0e10
    );
    let config = PlotConfig::density_profile(title);
    let analytical = model.sample(bins.edges());
    let series: Vec<(&str, &Profile)> =
        profiles.iter().map(|(label, profile)| (label.as_str(), profile)).collect();

    plot_density_profiles(&series, Some(&analytical), &settings.output, Some(&config))
        .map_err(|e| AnalysisError::output(&settings.output, e))?;
    info!("Wrote {}", settings.output.display());

    let csv = match &settings.csv {
        Some(path) => {
            write_profiles_csv(path, &bins, &profiles, settings)?;
            info!("Wrote {}", path.display());
            Some(path.clone())
        }
        None => None,
    };

    Ok(PlummerRun { profiles, figure: settings.output.clone(), csv })
}

/// CSV column of one snapshot: its legend label and file stem
///
/// Two snapshots at the same time still get distinct columns.
fn column_name(label: &str, path: &Path) -> String {
    match path.file_stem() {
        Some(stem) => format!("{} ({})", label, stem.to_string_lossy()),
        None => label.to_string(),
    }
}

/// One density column per snapshot plus the analytical profile
fn write_profiles_csv(
    path: &Path,
    bins: &RadialBins,
    profiles: &[(String, Profile)],
    settings: &PlummerSettings,
) -> Result<(), AnalysisError> {
    let model = PlummerModel::new(settings.softening, settings.total_mass)?;

    let mut columns: Vec<Vec<f64>> =
        profiles.iter().map(|(_, profile)| profile.values().to_vec()).collect();
    columns.push(bins.outer_edges().iter().map(|&r| model.density(r)).collect());

    let column_names: Vec<String> = profiles
        .iter()
        .zip(&settings.files)
        .map(|((label, _), file)| column_name(label, file))
        .collect();
    let mut names: Vec<&str> = column_names.iter().map(String::as_str).collect();
    names.push("analytical");

    let mut metadata = CsvMetadata {
        analysis: Some("Plummer density".to_string()),
        bins: Some(bins.n_bins()),
        ..Default::default()
    };
    metadata.add_custom("Softening", settings.softening.to_string());
    metadata.add_custom("Total mass", settings.total_mass.to_string());
    let config = CsvConfig::default().radius_header("r").with_metadata(metadata);

    export_profiles_csv(bins.outer_edges(), &columns, &names, path, Some(&config))
        .map_err(|e| AnalysisError::output(path, e))
}

// =================================================================================================
// Tests
// =================================================================================================
