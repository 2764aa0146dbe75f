//! Hydrogen/helium ionization state of the gas
//!
//! Converts what the radiative-transfer scheme stores into ion mass
//! fractions and species abundances, then derives the neutral hydrogen
//! fraction, the mean molecular weight and the gas temperature.

use ndarray::{Array1, ArrayView1, Zip};

use super::ModelError;
use crate::snapshot::{IonizationData, SpeciesFields, UnitSystem};

/// Proton mass [g]
pub const PROTON_MASS_CGS: f64 = 1.672_621_923_69e-24;

/// Boltzmann constant [erg/K]
pub const BOLTZMANN_CGS: f64 = 1.380_649e-16;

/// Atomic mass of hydrogen species [amu]
const HYDROGEN_AMU: f64 = 1.0;

/// Atomic mass of helium species [amu]
const HELIUM_AMU: f64 = 4.0;

// =================================================================================================
// Species
// =================================================================================================

/// Ionization state of hydrogen or helium
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
    HI,
    HII,
    HeI,
    HeII,
    HeIII,
}

impl Species {
    pub const ALL: [Species; 5] = [Self::HI, Self::HII, Self::HeI, Self::HeII, Self::HeIII];

    pub fn label(self) -> &'static str {
        match self {
            Self::HI => "HI",
            Self::HII => "HII",
            Self::HeI => "HeI",
            Self::HeII => "HeII",
            Self::HeIII => "HeIII",
        }
    }

    /// Atomic mass of the element [amu]
    pub fn atomic_mass(self) -> f64 {
        match self {
            Self::HI | Self::HII => HYDROGEN_AMU,
            Self::HeI | Self::HeII | Self::HeIII => HELIUM_AMU,
        }
    }

    /// This species' array in `fields`
    pub fn field(self, fields: &SpeciesFields) -> &Array1<f64> {
        match self {
            Self::HI => &fields.hi,
            Self::HII => &fields.hii,
            Self::HeI => &fields.hei,
            Self::HeII => &fields.heii,
            Self::HeIII => &fields.heiii,
        }
    }
}

// =================================================================================================
// Radiative-transfer schemes
// =================================================================================================

/// Radiative-transfer implementation that wrote the snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RtScheme {
    /// Stores ion mass fractions directly
    GearM1Closure,

    /// Stores element mass fractions and species abundances
    SphM1Closure,

    Other(String),
}

impl RtScheme {
    /// Recognise a scheme from the `RT Scheme` metadata string
    ///
    /// Matching is on the prefix, as scheme strings carry extra details
    /// (e.g. `"GEAR M1closure 4 photon groups"`).
    pub fn from_metadata(name: &str) -> Self {
        let name = name.trim();
        if name.starts_with("GEAR M1closure") {
            Self::GearM1Closure
        } else if name.starts_with("SPH M1closure") {
            Self::SphM1Closure
        } else {
            Self::Other(name.to_string())
        }
    }
}

// =================================================================================================
// Ion mass fractions
// =================================================================================================

/// Ion mass fractions of every gas particle
///
/// - GEAR M1closure: the stored fractions
/// - SPH M1closure: `X_H · (n_s / n_H) · A_s`, with `A_s` the atomic mass of
///   the species (1 for hydrogen, 4 for helium)
///
/// # Errors
///
/// - `UnsupportedScheme` for any other scheme
/// - `MissingField` if the stored data does not match the scheme
pub fn ion_mass_fractions(
    scheme: &RtScheme,
    data: &IonizationData,
) -> Result<SpeciesFields, ModelError> {
    match (scheme, data) {
        (RtScheme::GearM1Closure, IonizationData::IonMassFractions(fields)) => Ok(fields.clone()),
        (
            RtScheme::SphM1Closure,
            IonizationData::ElementAbundances { hydrogen_mass_fraction, abundances, .. },
        ) => {
            let convert = |abundance: &Array1<f64>, amu: f64| -> Array1<f64> {
                hydrogen_mass_fraction * abundance * amu
            };
            Ok(SpeciesFields {
                hi: convert(&abundances.hi, HYDROGEN_AMU),
                hii: convert(&abundances.hii, HYDROGEN_AMU),
                hei: convert(&abundances.hei, HELIUM_AMU),
                heii: convert(&abundances.heii, HELIUM_AMU),
                heiii: convert(&abundances.heiii, HELIUM_AMU),
            })
        }
        (RtScheme::GearM1Closure, _) => Err(ModelError::MissingField("ion mass fractions")),
        (RtScheme::SphM1Closure, _) => {
            Err(ModelError::MissingField("element mass fractions and species abundances"))
        }
        (RtScheme::Other(name), _) => Err(ModelError::UnsupportedScheme(name.clone())),
    }
}

/// Species abundances `n_s / n_H` of every gas particle
///
/// - GEAR M1closure: `X_s / (A_s · X_H)`, with the hydrogen mass fraction
///   `X_H = X_HI + X_HII` taken per particle
/// - SPH M1closure: the stored abundances
///
/// Particles without hydrogen get NaN abundances.
///
/// # Errors
///
/// Same as [`ion_mass_fractions`].
pub fn species_abundances(
    scheme: &RtScheme,
    data: &IonizationData,
) -> Result<SpeciesFields, ModelError> {
    match (scheme, data) {
        (RtScheme::SphM1Closure, IonizationData::ElementAbundances { abundances, .. }) => {
            Ok(abundances.clone())
        }
        (RtScheme::GearM1Closure, IonizationData::IonMassFractions(imf)) => {
            let hydrogen = &imf.hi + &imf.hii;
            let convert = |species: Species| -> Array1<f64> {
                Zip::from(species.field(imf))
                    .and(&hydrogen)
                    .map_collect(|&x, &x_h| {
                        if x_h > 0.0 {
                            x / (species.atomic_mass() * x_h)
                        } else {
                            f64::NAN
                        }
                    })
            };
            Ok(SpeciesFields {
                hi: convert(Species::HI),
                hii: convert(Species::HII),
                hei: convert(Species::HeI),
                heii: convert(Species::HeII),
                heiii: convert(Species::HeIII),
            })
        }
        // Scheme/data mismatches report the same errors as the mass fractions
        _ => ion_mass_fractions(scheme, data),
    }
}

// =================================================================================================
// Derived quantities
// =================================================================================================

/// Neutral hydrogen fraction `HI / (HI + HII)`
pub fn neutral_fraction(imf: &SpeciesFields) -> Array1<f64> {
    Zip::from(&imf.hi)
        .and(&imf.hii)
        .map_collect(|&hi, &hii| hi / (hi + hii))
}

/// Mean molecular weight from ion mass fractions
///
/// `1/μ = X_HI + 2 X_HII + X_HeI/4 + 2 X_HeII/4 + 3 X_HeIII/4`: every ion
/// contributes its nucleus plus its free electrons per unit atomic mass.
pub fn mean_molecular_weight(imf: &SpeciesFields) -> Array1<f64> {
    let one_over_mu = &imf.hi
        + &(&imf.hii * 2.0)
        + &(&imf.hei * 0.25)
        + &(&imf.heii * 0.5)
        + &(&imf.heiii * 0.75);
    one_over_mu.mapv(|x| 1.0 / x)
}

/// Gas temperature [K]
///
/// `T = u (γ - 1) μ m_p / k_B`, with the specific internal energy `u`
/// converted from internal units to erg/g.
///
/// # Errors
///
/// `InvalidParameter` if γ ≤ 1, `LengthMismatch` if the arrays differ.
pub fn gas_temperature(
    internal_energy: ArrayView1<f64>,
    mu: ArrayView1<f64>,
    gamma: f64,
    units: &UnitSystem,
) -> Result<Array1<f64>, ModelError> {
    if !(gamma.is_finite() && gamma > 1.0) {
        return Err(ModelError::InvalidParameter { name: "adiabatic_index", value: gamma });
    }
    if internal_energy.len() != mu.len() {
        return Err(ModelError::LengthMismatch {
            expected: internal_energy.len(),
            actual: mu.len(),
        });
    }

    let to_cgs = units.specific_energy_cgs();
    Ok(Zip::from(internal_energy)
        .and(mu)
        .map_collect(|&u, &mu| u * to_cgs * (gamma - 1.0) * mu * PROTON_MASS_CGS / BOLTZMANN_CGS))
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn fields(hi: f64, hii: f64, hei: f64, heii: f64, heiii: f64) -> SpeciesFields {
        SpeciesFields {
            hi: array![hi],
            hii: array![hii],
            hei: array![hei],
            heii: array![heii],
            heiii: array![heiii],
        }
    }

    #[test]
    fn test_scheme_from_metadata() {
        assert_eq!(RtScheme::from_metadata("GEAR M1closure"), RtScheme::GearM1Closure);
        assert_eq!(
            RtScheme::from_metadata(" SPH M1closure (Chan+21) "),
            RtScheme::SphM1Closure
        );
        assert_eq!(RtScheme::from_metadata("none"), RtScheme::Other("none".to_string()));
    }

    #[test]
    fn test_gear_fractions_pass_through() {
        let imf = fields(0.5, 0.26, 0.24, 0.0, 0.0);
        let data = IonizationData::IonMassFractions(imf.clone());
        assert_eq!(ion_mass_fractions(&RtScheme::GearM1Closure, &data).unwrap(), imf);
    }

    #[test]
    fn test_sph_abundances_to_mass_fractions() {
        let data = IonizationData::ElementAbundances {
            hydrogen_mass_fraction: array![0.75],
            helium_mass_fraction: array![0.25],
            electron_abundance: None,
            abundances: fields(0.2, 0.8, 0.05, 0.02, 0.01),
        };

        let imf = ion_mass_fractions(&RtScheme::SphM1Closure, &data).unwrap();
        assert_relative_eq!(imf.hi[0], 0.15, epsilon = 1e-15);
        assert_relative_eq!(imf.hii[0], 0.6, epsilon = 1e-15);
        assert_relative_eq!(imf.hei[0], 0.15, epsilon = 1e-15);
        assert_relative_eq!(imf.heii[0], 0.06, epsilon = 1e-15);
        assert_relative_eq!(imf.heiii[0], 0.03, epsilon = 1e-15);
    }

    #[test]
    fn test_scheme_data_mismatch() {
        let data = IonizationData::IonMassFractions(fields(1.0, 0.0, 0.0, 0.0, 0.0));
        assert!(matches!(
            ion_mass_fractions(&RtScheme::SphM1Closure, &data),
            Err(ModelError::MissingField(_))
        ));
        assert!(matches!(
            ion_mass_fractions(&RtScheme::Other("none".into()), &data),
            Err(ModelError::UnsupportedScheme(ref s)) if s == "none"
        ));
    }

    #[test]
    fn test_species_labels_and_masses() {
        let labels: Vec<_> = Species::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["HI", "HII", "HeI", "HeII", "HeIII"]);
        assert_eq!(Species::HII.atomic_mass(), 1.0);
        assert_eq!(Species::HeIII.atomic_mass(), 4.0);

        let imf = fields(0.1, 0.2, 0.3, 0.4, 0.5);
        assert_eq!(Species::HeII.field(&imf)[0], 0.4);
    }

    #[test]
    fn test_sph_abundances_pass_through() {
        let abundances = fields(0.2, 0.8, 0.05, 0.02, 0.01);
        let data = IonizationData::ElementAbundances {
            hydrogen_mass_fraction: array![0.75],
            helium_mass_fraction: array![0.25],
            electron_abundance: None,
            abundances: abundances.clone(),
        };
        assert_eq!(species_abundances(&RtScheme::SphM1Closure, &data).unwrap(), abundances);
    }

    #[test]
    fn test_gear_abundances_from_mass_fractions() {
        // X_H = 0.75, n_He / n_H = 0.25 / (4 · 0.75) split 3:2:1 over the ions
        let data = IonizationData::IonMassFractions(fields(0.15, 0.6, 0.125, 0.25 / 3.0, 0.25 / 6.0));
        let abundances = species_abundances(&RtScheme::GearM1Closure, &data).unwrap();

        assert_relative_eq!(abundances.hi[0], 0.2, epsilon = 1e-15);
        assert_relative_eq!(abundances.hii[0], 0.8, epsilon = 1e-15);
        assert_relative_eq!(abundances.hei[0], 0.125 / 3.0, max_relative = 1e-12);
        assert_relative_eq!(abundances.heii[0], 0.25 / 9.0, max_relative = 1e-12);
        assert_relative_eq!(abundances.heiii[0], 0.25 / 18.0, max_relative = 1e-12);
    }

    #[test]
    fn test_sph_and_gear_abundances_agree() {
        let sph = fields(0.2, 0.8, 0.05, 0.02, 0.01);
        let data = IonizationData::ElementAbundances {
            hydrogen_mass_fraction: array![0.75],
            helium_mass_fraction: array![0.25],
            electron_abundance: None,
            abundances: sph.clone(),
        };
        let imf = ion_mass_fractions(&RtScheme::SphM1Closure, &data).unwrap();
        let data = IonizationData::IonMassFractions(imf);
        let gear = species_abundances(&RtScheme::GearM1Closure, &data).unwrap();

        for species in Species::ALL {
            let (from_imf, stored) = (species.field(&gear)[0], species.field(&sph)[0]);
            assert_relative_eq!(from_imf, stored, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_gear_abundances_without_hydrogen() {
        let data = IonizationData::IonMassFractions(fields(0.0, 0.0, 1.0, 0.0, 0.0));
        let abundances = species_abundances(&RtScheme::GearM1Closure, &data).unwrap();
        assert!(abundances.hei[0].is_nan());
    }

    #[test]
    fn test_abundances_scheme_data_mismatch() {
        let data = IonizationData::IonMassFractions(fields(1.0, 0.0, 0.0, 0.0, 0.0));
        assert!(matches!(
            species_abundances(&RtScheme::SphM1Closure, &data),
            Err(ModelError::MissingField(_))
        ));
        assert!(matches!(
            species_abundances(&RtScheme::Other("none".into()), &data),
            Err(ModelError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_neutral_fraction() {
        let imf = fields(0.25, 0.5, 0.25, 0.0, 0.0);
        let x = neutral_fraction(&imf);
        assert_relative_eq!(x[0], 1.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_mean_molecular_weight_limits() {
        // Neutral hydrogen: μ = 1
        let mu = mean_molecular_weight(&fields(1.0, 0.0, 0.0, 0.0, 0.0));
        assert_relative_eq!(mu[0], 1.0, epsilon = 1e-15);

        // Fully ionized hydrogen: μ = 1/2
        let mu = mean_molecular_weight(&fields(0.0, 1.0, 0.0, 0.0, 0.0));
        assert_relative_eq!(mu[0], 0.5, epsilon = 1e-15);

        // Neutral primordial gas X = 0.76: μ ≈ 1.22
        let mu = mean_molecular_weight(&fields(0.76, 0.0, 0.24, 0.0, 0.0));
        assert_relative_eq!(mu[0], 1.0 / 0.82, epsilon = 1e-12);
    }

    #[test]
    fn test_gas_temperature() {
        // u = 3/2 k T / (μ m_p) at γ = 5/3 gives back T
        let temperature = 1.0e4;
        let mu = 0.6;
        let u = 1.5 * BOLTZMANN_CGS * temperature / (mu * PROTON_MASS_CGS);

        let t = gas_temperature(
            array![u].view(),
            array![mu].view(),
            5.0 / 3.0,
            &UnitSystem::cgs(),
        )
        .unwrap();
        assert_relative_eq!(t[0], temperature, max_relative = 1e-12);
    }

    #[test]
    fn test_gas_temperature_converts_units() {
        let units = UnitSystem { length_cgs: 1.0e5, time_cgs: 1.0, mass_cgs: 1.0 };
        let cgs = gas_temperature(array![1.0e10].view(), array![1.0].view(), 1.4, &UnitSystem::cgs()).unwrap();
        let kms = gas_temperature(array![1.0].view(), array![1.0].view(), 1.4, &units).unwrap();
        assert_relative_eq!(cgs[0], kms[0], max_relative = 1e-12);
    }

    #[test]
    fn test_gas_temperature_rejects_bad_input() {
        let units = UnitSystem::cgs();
        assert!(gas_temperature(array![1.0].view(), array![1.0].view(), 1.0, &units).is_err());
        assert!(matches!(
            gas_temperature(array![1.0, 2.0].view(), array![1.0].view(), 1.4, &units),
            Err(ModelError::LengthMismatch { expected: 2, actual: 1 })
        ));
    }
}
