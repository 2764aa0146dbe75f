//! Analytical models and reference solutions
//!
//! The ground truth simulated profiles are compared against:
//!
//! - **plummer**: analytical density of a Plummer sphere (gravity test)
//! - **ionization**: ion mass fractions, species abundances, neutral
//!   fraction, mean molecular weight and temperature of the gas
//!   (radiative-transfer test)
//! - **reference**: tabulated TT1D solution of the Strömgren sphere

pub mod ionization;
pub mod plummer;
pub mod reference;

use std::path::PathBuf;
use thiserror::Error;

pub use ionization::{
    gas_temperature, ion_mass_fractions, mean_molecular_weight, neutral_fraction,
    species_abundances, RtScheme, Species, BOLTZMANN_CGS, PROTON_MASS_CGS,
};
pub use plummer::PlummerModel;
pub use reference::{ReferenceCurve, ReferenceSolution, SpeciesCurves};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid model parameter {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Unsupported RT scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("Snapshot does not provide {0}")]
    MissingField(&'static str),

    #[error("Data length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Reference row {row}: {reason}")]
    InvalidReference { row: usize, reason: String },

    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
