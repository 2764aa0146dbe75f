//! Strömgren sphere check
//!
//! For every snapshot of a radiative-transfer run: distance of each gas
//! particle to the ionizing star, neutral hydrogen fraction and temperature,
//! plotted side by side against the TT1D reference.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::AnalysisError;
use crate::cli::StromgrenSettings;
use crate::models::{
    gas_temperature, ion_mass_fractions, mean_molecular_weight, neutral_fraction, ModelError,
    ReferenceSolution, RtScheme,
};
use crate::output::{
    export_profiles_csv, plot_stromgren_comparison, CsvConfig, CsvMetadata, Panel, PlotConfig,
};
use crate::profile::{radii_from_center, Profile, ProfileError, ProfileExtractor, RadialBins};
use crate::snapshot::{
    derived_output_path, load_snapshot, snapshot_list, IonizationData, ParticleKind, Snapshot,
    SnapshotError, SpeciesFields,
};

/// Suffix of the figure written next to each snapshot
pub const FIGURE_SUFFIX: &str = "-Stromgren3DMF.png";

/// Suffix of the binned-profile table written next to each snapshot
pub const CSV_SUFFIX: &str = "-Stromgren3DMF.csv";

/// γ of a monatomic ideal gas, used when the snapshot does not record one
const DEFAULT_ADIABATIC_INDEX: f64 = 5.0 / 3.0;

/// Per-gas-particle quantities of one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct StromgrenFields {
    /// Distance to the source
    pub radii: Vec<f64>,

    pub neutral_fraction: Vec<f64>,

    /// Gas temperature [K]
    pub temperature: Vec<f64>,
}

/// Binned means of [`StromgrenFields`]
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedFields {
    pub neutral_fraction: Profile,
    pub temperature: Profile,
}

impl StromgrenFields {
    pub fn binned(&self, bins: &RadialBins) -> Result<BinnedFields, ProfileError> {
        let extractor = ProfileExtractor::default();
        Ok(BinnedFields {
            neutral_fraction: extractor.mean(&self.radii, &self.neutral_fraction, bins)?,
            temperature: extractor.mean(&self.radii, &self.temperature, bins)?,
        })
    }
}

/// What one snapshot produced
#[derive(Debug, Clone, PartialEq)]
pub struct StromgrenOutput {
    pub snapshot: PathBuf,
    pub figure: PathBuf,
    pub csv: Option<PathBuf>,
}

/// Gas state shared by the hydrogen and hydrogen-helium checks
pub(super) struct GasState<'a> {
    pub radii: Vec<f64>,
    pub scheme: RtScheme,
    pub ionization: &'a IonizationData,
    pub imf: SpeciesFields,
    pub temperature: Vec<f64>,
}

/// Gas neutral fraction and temperature against distance to the source
///
/// The first star particle is the source.
///
/// # Errors
///
/// - no stars or no gas
/// - unknown RT scheme, or missing ionization data / internal energies
pub fn stromgren_fields(snapshot: &Snapshot) -> Result<StromgrenFields, AnalysisError> {
    let gas = gas_state(snapshot)?;
    Ok(StromgrenFields {
        neutral_fraction: neutral_fraction(&gas.imf).to_vec(),
        radii: gas.radii,
        temperature: gas.temperature,
    })
}

pub(super) fn gas_state(snapshot: &Snapshot) -> Result<GasState<'_>, AnalysisError> {
    let stars = snapshot.require(ParticleKind::Stars)?;
    if stars.len() > 1 {
        warn!("{} star particles, using the first one as the source", stars.len());
    }
    let source = stars
        .position(0)
        .ok_or(SnapshotError::MissingParticles(ParticleKind::Stars))?;

    let gas = snapshot.require(ParticleKind::Gas)?;
    let radii = radii_from_center(gas.positions(), &source)?;

    let metadata = &snapshot.metadata;
    let scheme = metadata
        .rt_scheme
        .as_deref()
        .map(RtScheme::from_metadata)
        .ok_or(ModelError::MissingField("RT scheme"))?;
    let ionization = gas.ionization().ok_or(ModelError::MissingField("ionization data"))?;
    let imf = ion_mass_fractions(&scheme, ionization)?;

    let energies = gas
        .internal_energies()
        .ok_or(ModelError::MissingField("internal energies"))?;
    let gamma = metadata.adiabatic_index.unwrap_or_else(|| {
        warn!("No adiabatic index in snapshot, assuming {:.4}", DEFAULT_ADIABATIC_INDEX);
        DEFAULT_ADIABATIC_INDEX
    });

    let mu = mean_molecular_weight(&imf);
    let temperature = gas_temperature(energies, mu.view(), gamma, &metadata.units)?;
    debug!("{} gas particles, scheme {:?}", radii.len(), scheme);

    Ok(GasState { radii, scheme, ionization, imf, temperature: temperature.to_vec() })
}

/// Half the box size along the first axis, the radial extent of the figures
pub(super) fn half_box(snapshot: &Snapshot) -> Result<f64, AnalysisError> {
    snapshot
        .metadata
        .boxsize
        .first()
        .map(|size| size / 2.0)
        .filter(|half| half.is_finite() && *half > 0.0)
        .ok_or(AnalysisError::MissingBoxSize)
}

/// Snapshots selected by `settings`, and the reference table if one is given
pub(super) fn stromgren_inputs(
    settings: &StromgrenSettings,
) -> Result<(Vec<PathBuf>, Option<ReferenceSolution>), AnalysisError> {
    let files = snapshot_list(
        &settings.dir,
        &settings.basename,
        &settings.extension,
        settings.snapshot.into(),
    )?;

    let reference = match &settings.reference {
        Some(path) => Some(ReferenceSolution::from_path(path)?),
        None => {
            warn!("No TT1D reference table given, plotting simulation data only");
            None
        }
    };
    Ok((files, reference))
}

pub(super) fn load(path: &Path) -> Result<Snapshot, AnalysisError> {
    info!("working on {}", path.display());
    load_snapshot(path).map_err(|source| AnalysisError::Load { path: path.to_path_buf(), source })
}

/// CSV metadata and column layout shared by the per-snapshot tables
pub(super) fn binned_csv_config(
    snapshot_path: &Path,
    snapshot: &Snapshot,
    analysis: &str,
    n_bins: usize,
) -> CsvConfig {
    let name = snapshot_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut metadata = CsvMetadata::from_snapshot(&name, snapshot.metadata.time_myr(), "Myr");
    metadata.analysis = Some(analysis.to_string());
    metadata.bins = Some(n_bins);

    CsvConfig::default()
        .radius_header(format!("r [{}]", snapshot.metadata.units.length_label()))
        .with_metadata(metadata)
}

/// Bins of the binned means: `n_bins` equal-width shells ending at `half_box`
///
/// Edges sit at `k · half_box / (n_bins + 1)` for `k = 1..=n_bins + 1`;
/// the innermost sphere is not binned. `None` when `n_bins` is 0.
pub fn stromgren_bins(half_box: f64, n_bins: usize) -> Result<Option<RadialBins>, ProfileError> {
    if n_bins == 0 {
        return Ok(None);
    }
    let width = half_box / (n_bins + 1) as f64;
    RadialBins::linear(width, half_box, n_bins + 1).map(Some)
}

/// Run the Strömgren check on every selected snapshot
///
/// # Errors
///
/// - no matching snapshot, or an unreadable reference table
/// - the first snapshot that cannot be analysed, plotted or exported
pub fn run_stromgren(settings: &StromgrenSettings) -> Result<Vec<StromgrenOutput>, AnalysisError> {
    let (files, reference) = stromgren_inputs(settings)?;

    files
        .iter()
        .map(|path| plot_snapshot(path, reference.as_ref(), settings))
        .collect()
}

fn plot_snapshot(
    path: &Path,
    reference: Option<&ReferenceSolution>,
    settings: &StromgrenSettings,
) -> Result<StromgrenOutput, AnalysisError> {
    let snapshot = load(path)?;
    let half_box = half_box(&snapshot)?;

    let fields = stromgren_fields(&snapshot)?;
    let binned = match stromgren_bins(half_box, settings.n_bins)? {
        Some(bins) => Some(fields.binned(&bins)?),
        None => None,
    };

    let mut xhi_panel = Panel::new("Neutral Fraction", &fields.radii, &fields.neutral_fraction);
    let mut temperature_panel = Panel::new("T [K]", &fields.radii, &fields.temperature);
    if let Some(binned) = &binned {
        xhi_panel = xhi_panel.with_binned(&binned.neutral_fraction);
        temperature_panel = temperature_panel.with_binned(&binned.temperature);
    }
    if let Some(reference) = reference {
        if !reference.neutral_fraction.is_empty() {
            xhi_panel = xhi_panel.with_reference(&reference.neutral_fraction);
        }
        if !reference.temperature.is_empty() {
            temperature_panel = temperature_panel.with_reference(&reference.temperature);
        }
    }

    let config = PlotConfig::stromgren(format!("t = {:.3} Myr", snapshot.metadata.time_myr()))
        .xlabel(format!("r [{}]", snapshot.metadata.units.length_label()));

    let figure = derived_output_path(path, FIGURE_SUFFIX);
    plot_stromgren_comparison(&[xhi_panel, temperature_panel], half_box, &figure, Some(&config))
        .map_err(|e| AnalysisError::output(&figure, e))?;
    info!("Wrote {}", figure.display());

    let csv = if settings.csv {
        match &binned {
            Some(binned) => {
                let csv_path = derived_output_path(path, CSV_SUFFIX);
                write_binned_csv(&csv_path, path, &snapshot, binned)?;
                info!("Wrote {}", csv_path.display());
                Some(csv_path)
            }
            None => {
                warn!("CSV export needs binned profiles, skipping {}", path.display());
                None
            }
        }
    } else {
        None
    };

    Ok(StromgrenOutput { snapshot: path.to_path_buf(), figure, csv })
}

fn write_binned_csv(
    csv_path: &Path,
    snapshot_path: &Path,
    snapshot: &Snapshot,
    binned: &BinnedFields,
) -> Result<(), AnalysisError> {
    let config = binned_csv_config(
        snapshot_path,
        snapshot,
        "Strömgren 3D MF",
        binned.neutral_fraction.len(),
    );

    export_profiles_csv(
        binned.neutral_fraction.radii(),
        &[
            binned.neutral_fraction.values().to_vec(),
            binned.temperature.values().to_vec(),
        ],
        &["neutral_fraction", "temperature"],
        csv_path,
        Some(&config),
    )
    .map_err(|e| AnalysisError::output(csv_path, e))
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::models::{BOLTZMANN_CGS, PROTON_MASS_CGS};
    use crate::snapshot::{IonizationData, ParticleSet, SpeciesFields, UnitSystem};
    use ndarray::array;

    fn snapshot(scheme: Option<&str>) -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.metadata.units = UnitSystem::cgs();
        snapshot.metadata.boxsize = vec![2.0, 2.0, 2.0];
        snapshot.metadata.rt_scheme = scheme.map(str::to_string);
        snapshot.metadata.adiabatic_index = Some(5.0 / 3.0);

        let stars = ParticleSet::new(ParticleKind::Stars, array![[1.0, 1.0, 1.0]], array![1.0]).unwrap();

        // Neutral hydrogen at 1e4 K: u = 3/2 k T / m_p
        let u = 1.5 * BOLTZMANN_CGS * 1.0e4 / PROTON_MASS_CGS;
        let gas = ParticleSet::new(
            ParticleKind::Gas,
            array![[1.5, 1.0, 1.0], [1.0, 1.0, 0.2]],
            array![1.0, 1.0],
        )
        .unwrap()
        .with_internal_energies(array![u, u])
        .unwrap()
        .with_ionization(IonizationData::IonMassFractions(SpeciesFields {
            hi: array![1.0, 0.5],
            hii: array![0.0, 0.5],
            hei: array![0.0, 0.0],
            heii: array![0.0, 0.0],
            heiii: array![0.0, 0.0],
        }))
        .unwrap();

        snapshot.insert(stars);
        snapshot.insert(gas);
        snapshot
    }

    #[test]
    fn test_fields_from_first_star() {
        let fields = stromgren_fields(&snapshot(Some("GEAR M1closure"))).unwrap();

        assert_relative_eq!(fields.radii[0], 0.5, epsilon = 1e-15);
        assert_relative_eq!(fields.radii[1], 0.8, epsilon = 1e-15);
        assert_eq!(fields.neutral_fraction, vec![1.0, 0.5]);
        assert_relative_eq!(fields.temperature[0], 1.0e4, epsilon = 1e-8);
        // Half-ionized hydrogen has μ = 2/3
        assert_relative_eq!(fields.temperature[1], 1.0e4 * 2.0 / 3.0, epsilon = 1e-8);
    }

    #[test]
    fn test_fields_need_scheme() {
        assert!(matches!(
            stromgren_fields(&snapshot(None)),
            Err(AnalysisError::Model(ModelError::MissingField("RT scheme")))
        ));
        assert!(matches!(
            stromgren_fields(&snapshot(Some("none"))),
            Err(AnalysisError::Model(ModelError::UnsupportedScheme(_)))
        ));
    }

    #[test]
    fn test_fields_need_stars() {
        let mut snap = snapshot(Some("GEAR M1closure"));
        snap.stars = None;
        assert!(matches!(
            stromgren_fields(&snap),
            Err(AnalysisError::Snapshot(SnapshotError::MissingParticles(ParticleKind::Stars)))
        ));
    }

    #[test]
    fn test_stromgren_bins() {
        assert!(stromgren_bins(1.0, 0).unwrap().is_none());

        let bins = stromgren_bins(1.0, 4).unwrap().unwrap();
        assert_eq!(bins.n_bins(), 4);
        assert_relative_eq!(bins.r_min(), 0.2, epsilon = 1e-15);
        assert_relative_eq!(bins.r_max(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_binned_fields() {
        let fields = stromgren_fields(&snapshot(Some("GEAR M1closure"))).unwrap();
        let bins = RadialBins::new(vec![0.25, 0.75, 1.0]).unwrap();
        let binned = fields.binned(&bins).unwrap();

        assert_eq!(binned.neutral_fraction.values(), &[1.0, 0.5]);
        assert_eq!(binned.temperature.len(), 2);
    }
}
