//! Strömgren sphere check with hydrogen and helium chemistry
//!
//! The same run layout as the hydrogen check, but the left panel scatters the
//! abundance `n_s / n_H` of every ionization state of H and He, each in its
//! own colour with its TT1D curve. The right panel is the gas temperature.

use std::path::{Path, PathBuf};

use log::{info, warn};
use plotters::style::{RGBColor, BLACK, BLUE, GREEN, RED, YELLOW};

use super::stromgren::{
    binned_csv_config, gas_state, half_box, load, stromgren_bins, stromgren_inputs,
    StromgrenOutput,
};
use super::AnalysisError;
use crate::cli::StromgrenSettings;
use crate::models::{species_abundances, ReferenceSolution, Species};
use crate::output::{export_profiles_csv, plot_stromgren_comparison, Panel, PlotConfig, Series};
use crate::profile::{Profile, ProfileError, ProfileExtractor, RadialBins};
use crate::snapshot::{derived_output_path, Snapshot};

/// Suffix of the figure written next to each snapshot
pub const HHE_FIGURE_SUFFIX: &str = "-Stromgren3DMFHHe.png";

/// Suffix of the binned-profile table written next to each snapshot
pub const HHE_CSV_SUFFIX: &str = "-Stromgren3DMFHHe.csv";

/// Fixed y extent of the abundance panel
const ABUNDANCE_RANGE: (f64, f64) = (1e-5, 1.1);

fn species_color(species: Species) -> RGBColor {
    match species {
        Species::HI => BLACK,
        Species::HII => RED,
        Species::HeI => BLUE,
        Species::HeII => GREEN,
        Species::HeIII => YELLOW,
    }
}

/// Per-gas-particle species abundances and temperature of one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct HheFields {
    /// Distance to the source
    pub radii: Vec<f64>,

    /// `n_s / n_H`, in [`Species::ALL`] order
    pub abundances: [Vec<f64>; 5],

    /// Gas temperature [K]
    pub temperature: Vec<f64>,
}

/// Binned means of [`HheFields`]
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedHhe {
    /// In [`Species::ALL`] order
    pub abundances: Vec<Profile>,
    pub temperature: Profile,
}

impl HheFields {
    pub fn abundance(&self, species: Species) -> &[f64] {
        &self.abundances[species as usize]
    }

    pub fn binned(&self, bins: &RadialBins) -> Result<BinnedHhe, ProfileError> {
        let extractor = ProfileExtractor::default();
        let abundances = Species::ALL
            .iter()
            .map(|&species| extractor.mean(&self.radii, self.abundance(species), bins))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BinnedHhe {
            abundances,
            temperature: extractor.mean(&self.radii, &self.temperature, bins)?,
        })
    }
}

/// Gas species abundances and temperature against distance to the source
///
/// The first star particle is the source.
///
/// # Errors
///
/// Same as [`stromgren_fields`](super::stromgren_fields).
pub fn stromgren_hhe_fields(snapshot: &Snapshot) -> Result<HheFields, AnalysisError> {
    let gas = gas_state(snapshot)?;
    let abundances = species_abundances(&gas.scheme, gas.ionization)?;

    Ok(HheFields {
        abundances: Species::ALL.map(|species| species.field(&abundances).to_vec()),
        radii: gas.radii,
        temperature: gas.temperature,
    })
}

/// Run the hydrogen-helium Strömgren check on every selected snapshot
///
/// # Errors
///
/// - no matching snapshot, or an unreadable reference table
/// - the first snapshot that cannot be analysed, plotted or exported
pub fn run_stromgren_hhe(
    settings: &StromgrenSettings,
) -> Result<Vec<StromgrenOutput>, AnalysisError> {
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

    let fields = stromgren_hhe_fields(&snapshot)?;
    let binned = match stromgren_bins(half_box, settings.n_bins)? {
        Some(bins) => Some(fields.binned(&bins)?),
        None => None,
    };

    let mut abundance_panel = Panel::layered("Abundances", &fields.radii)
        .with_log_y(true)
        .with_y_range(ABUNDANCE_RANGE.0, ABUNDANCE_RANGE.1);
    for species in Species::ALL {
        let curve = reference
            .map(|r| r.species.curve(species))
            .filter(|curve| !curve.is_empty());
        abundance_panel = abundance_panel.with_series(Series {
            label: Some(species.label().to_string()),
            values: fields.abundance(species),
            color: Some(species_color(species)),
            reference: curve,
        });
    }

    let mut temperature_panel = Panel::new("T [K]", &fields.radii, &fields.temperature);
    if let Some(binned) = &binned {
        temperature_panel = temperature_panel.with_binned(&binned.temperature);
    }
    if let Some(curve) = reference.map(|r| &r.temperature).filter(|c| !c.is_empty()) {
        temperature_panel = temperature_panel.with_reference(curve);
    }

    let config = PlotConfig::stromgren(format!("t = {:.3} Myr", snapshot.metadata.time_myr()))
        .xlabel(format!("r [{}]", snapshot.metadata.units.length_label()));

    let figure = derived_output_path(path, HHE_FIGURE_SUFFIX);
    plot_stromgren_comparison(
        &[abundance_panel, temperature_panel],
        half_box,
        &figure,
        Some(&config),
    )
    .map_err(|e| AnalysisError::output(&figure, e))?;
    info!("Wrote {}", figure.display());

    let csv = match (&binned, settings.csv) {
        (Some(binned), true) => {
            let csv_path = derived_output_path(path, HHE_CSV_SUFFIX);
            write_binned_csv(&csv_path, path, &snapshot, binned)?;
            info!("Wrote {}", csv_path.display());
            Some(csv_path)
        }
        (None, true) => {
            warn!("CSV export needs binned profiles, skipping {}", path.display());
            None
        }
        (_, false) => None,
    };

    Ok(StromgrenOutput { snapshot: path.to_path_buf(), figure, csv })
}

fn write_binned_csv(
    csv_path: &Path,
    snapshot_path: &Path,
    snapshot: &Snapshot,
    binned: &BinnedHhe,
) -> Result<(), AnalysisError> {
    let config = binned_csv_config(
        snapshot_path,
        snapshot,
        "Strömgren 3D MF HHe",
        binned.temperature.len(),
    );

    let mut columns: Vec<Vec<f64>> =
        binned.abundances.iter().map(|p| p.values().to_vec()).collect();
    columns.push(binned.temperature.values().to_vec());
    let mut names: Vec<&str> = Species::ALL.iter().map(|s| s.label()).collect();
    names.push("temperature");

    export_profiles_csv(
        binned.temperature.radii(),
        &columns,
        &names,
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
    use crate::models::{ModelError, BOLTZMANN_CGS, PROTON_MASS_CGS};
    use crate::snapshot::{IonizationData, ParticleKind, ParticleSet, SpeciesFields, UnitSystem};
    use approx::assert_relative_eq;
    use ndarray::array;

    /// Star at the centre; a neutral particle at r = 0.5 and an ionized one at r = 0.8
    fn snapshot(data: IonizationData, scheme: &str) -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.metadata.units = UnitSystem::cgs();
        snapshot.metadata.boxsize = vec![2.0, 2.0, 2.0];
        snapshot.metadata.rt_scheme = Some(scheme.to_string());
        snapshot.metadata.adiabatic_index = Some(5.0 / 3.0);

        let stars = ParticleSet::new(ParticleKind::Stars, array![[1.0, 1.0, 1.0]], array![1.0]).unwrap();
        let u = 1.5 * BOLTZMANN_CGS * 1.0e4 / PROTON_MASS_CGS;
        let gas = ParticleSet::new(
            ParticleKind::Gas,
            array![[1.5, 1.0, 1.0], [1.0, 1.0, 0.2]],
            array![1.0, 1.0],
        )
        .unwrap()
        .with_internal_energies(array![u, u])
        .unwrap()
        .with_ionization(data)
        .unwrap();

        snapshot.insert(stars);
        snapshot.insert(gas);
        snapshot
    }

    fn gear() -> Snapshot {
        let data = IonizationData::IonMassFractions(SpeciesFields {
            hi: array![0.75, 0.0],
            hii: array![0.0, 0.75],
            hei: array![0.25, 0.0],
            heii: array![0.0, 0.0],
            heiii: array![0.0, 0.25],
        });
        snapshot(data, "GEAR M1closure")
    }

    #[test]
    fn test_fields_per_species() {
        let fields = stromgren_hhe_fields(&gear()).unwrap();

        assert_eq!(fields.radii.len(), 2);
        assert_eq!(fields.abundance(Species::HI), &[1.0, 0.0]);
        assert_eq!(fields.abundance(Species::HII), &[0.0, 1.0]);
        // n_He / n_H = Y / (4 X) = 1/12
        assert_relative_eq!(fields.abundance(Species::HeI)[0], 1.0 / 12.0, max_relative = 1e-12);
        assert_relative_eq!(fields.abundance(Species::HeIII)[1], 1.0 / 12.0, max_relative = 1e-12);
        assert_eq!(fields.abundance(Species::HeII), &[0.0, 0.0]);
        assert_eq!(fields.temperature.len(), 2);
    }

    #[test]
    fn test_sph_abundances_as_stored() {
        let data = IonizationData::ElementAbundances {
            hydrogen_mass_fraction: array![0.75, 0.75],
            helium_mass_fraction: array![0.25, 0.25],
            electron_abundance: None,
            abundances: SpeciesFields {
                hi: array![1.0, 0.0],
                hii: array![0.0, 1.0],
                hei: array![1.0 / 12.0, 0.0],
                heii: array![0.0, 0.0],
                heiii: array![0.0, 1.0 / 12.0],
            },
        };
        let sph = stromgren_hhe_fields(&snapshot(data, "SPH M1closure")).unwrap();
        let gear = stromgren_hhe_fields(&gear()).unwrap();

        for species in Species::ALL {
            for (a, b) in sph.abundance(species).iter().zip(gear.abundance(species)) {
                assert_relative_eq!(*a, *b, epsilon = 1e-15);
            }
        }
        for (a, b) in sph.temperature.iter().zip(&gear.temperature) {
            assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_fields_need_matching_data() {
        let data = IonizationData::IonMassFractions(SpeciesFields {
            hi: array![1.0, 1.0],
            hii: array![0.0, 0.0],
            hei: array![0.0, 0.0],
            heii: array![0.0, 0.0],
            heiii: array![0.0, 0.0],
        });
        assert!(matches!(
            stromgren_hhe_fields(&snapshot(data, "SPH M1closure")),
            Err(AnalysisError::Model(ModelError::MissingField(_)))
        ));
    }

    #[test]
    fn test_binned_per_species() {
        let fields = stromgren_hhe_fields(&gear()).unwrap();
        let bins = RadialBins::new(vec![0.25, 0.75, 1.0]).unwrap();
        let binned = fields.binned(&bins).unwrap();

        assert_eq!(binned.abundances.len(), Species::ALL.len());
        assert_eq!(binned.abundances[Species::HI as usize].values(), &[1.0, 0.0]);
        assert_eq!(binned.abundances[Species::HII as usize].values(), &[0.0, 1.0]);
        assert_eq!(binned.temperature.len(), 2);
    }

    #[test]
    fn test_species_colors_distinct() {
        let mut colors: Vec<_> = Species::ALL.iter().map(|&s| species_color(s)).collect();
        colors.dedup();
        assert_eq!(colors.len(), 5);
    }
}
