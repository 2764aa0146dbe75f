//! Command-line interface
//!
//! `clap` definitions for the `radprof` binary and the run settings they
//! convert into. Settings carry the documented defaults through `Default`, so
//! library callers can run an analysis without going through argument parsing.
//!
//! ```text
//! radprof plummer snap_0000.csv snap_0010.csv -a 0.05 -M 1e-5 -o density.png
//! radprof stromgren 3 --dir run/ --reference TT1D.csv
//! radprof stromgren-hhe --reference TT1D_HHe.csv --csv
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

/// Most snapshots a single density figure can hold
pub const MAX_PLOTTED_FILES: usize = 20;

/// Snapshot prefix of the hydrogen-only Strömgren run
pub const MF_BASENAME: &str = "output_MF";

/// Snapshot prefix of the hydrogen-helium Strömgren run
pub const HHE_BASENAME: &str = "output_HHe";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("Too many ({0}) files provided (cannot plot more than 20).")]
    TooManyFiles(usize),

    #[error("No snapshot files provided")]
    NoFiles,
}

/// Reject file lists that cannot be plotted in one figure
///
/// Called before any snapshot is read.
pub fn validate_file_count(count: usize) -> Result<(), CliError> {
    match count {
        0 => Err(CliError::NoFiles),
        n if n > MAX_PLOTTED_FILES => Err(CliError::TooManyFiles(n)),
        _ => Ok(()),
    }
}

// =================================================================================================
// Arguments
// =================================================================================================

#[derive(Parser, Debug)]
#[command(
    name = "radprof",
    author,
    version,
    about = "Radial profiles of particle-simulation snapshots against analytical and reference solutions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Density profiles of a Plummer sphere against the analytical model
    Plummer(PlummerArgs),

    /// Neutral fraction and temperature of a Strömgren sphere against TT1D
    Stromgren(StromgrenArgs),

    /// H and He species abundances and temperature of a Strömgren sphere against TT1D
    #[command(name = "stromgren-hhe")]
    StromgrenHhe(StromgrenArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PlummerArgs {
    /// Snapshot files to be imaged
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Softening length of the model
    #[arg(short = 'a', default_value_t = 0.05)]
    pub softening: f64,

    /// Total mass of the model [1e10 M☉]
    #[arg(short = 'M', default_value_t = 1.0e-5)]
    pub mass: f64,

    /// Innermost bin edge
    #[arg(long = "rmin", default_value_t = 0.01)]
    pub r_min: f64,

    /// Outermost bin edge
    #[arg(long = "rmax", default_value_t = 0.5)]
    pub r_max: f64,

    /// Number of radii to sample (bin edges)
    #[arg(long = "nbsamples", default_value_t = 200)]
    pub n_samples: usize,

    /// Shift applied to the particles in the initial conditions
    #[arg(long, default_value_t = 2.0)]
    pub shift: f64,

    /// Figure path (.png or .svg)
    #[arg(short = 'o', long = "output", default_value = "plummer_density.png")]
    pub output: PathBuf,

    /// Also write the profiles to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StromgrenArgs {
    /// Snapshot number; every snapshot is plotted when absent
    pub snapnr: Option<u32>,

    /// Directory holding the snapshots
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Snapshot file prefix [default: output_MF, or output_HHe for stromgren-hhe]
    #[arg(long)]
    pub basename: Option<String>,

    /// Snapshot file extension
    #[arg(long, default_value = "hdf5")]
    pub extension: String,

    /// TT1D reference table (quantity,radius,value)
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Radial bins of the binned means (0 disables them)
    #[arg(long = "nbins", default_value_t = 50)]
    pub n_bins: usize,

    /// Also write the binned profiles next to each figure
    #[arg(long)]
    pub csv: bool,
}

// =================================================================================================
// Settings
// =================================================================================================

/// Plummer density check
#[derive(Debug, Clone, PartialEq)]
pub struct PlummerSettings {
    pub files: Vec<PathBuf>,
    pub softening: f64,
    pub total_mass: f64,
    pub r_min: f64,
    pub r_max: f64,
    pub n_samples: usize,
    pub shift: f64,
    pub output: PathBuf,
    pub csv: Option<PathBuf>,
}

impl Default for PlummerSettings {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            softening: 0.05,
            total_mass: 1.0e-5,
            r_min: 0.01,
            r_max: 0.5,
            n_samples: 200,
            shift: 2.0,
            output: PathBuf::from("plummer_density.png"),
            csv: None,
        }
    }
}

impl PlummerSettings {
    /// Builder pattern: set snapshot files
    pub fn files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }

    /// Builder pattern: set figure path
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Builder pattern: set model parameters
    pub fn model(mut self, softening: f64, total_mass: f64) -> Self {
        self.softening = softening;
        self.total_mass = total_mass;
        self
    }
}

impl From<&PlummerArgs> for PlummerSettings {
    fn from(args: &PlummerArgs) -> Self {
        Self {
            files: args.files.clone(),
            softening: args.softening,
            total_mass: args.mass,
            r_min: args.r_min,
            r_max: args.r_max,
            n_samples: args.n_samples,
            shift: args.shift,
            output: args.output.clone(),
            csv: args.csv.clone(),
        }
    }
}

/// Strömgren sphere check
#[derive(Debug, Clone, PartialEq)]
pub struct StromgrenSettings {
    pub dir: PathBuf,
    pub basename: String,
    pub extension: String,
    pub snapshot: Option<u32>,
    pub reference: Option<PathBuf>,
    pub n_bins: usize,
    pub csv: bool,
}

impl Default for StromgrenSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            basename: MF_BASENAME.to_string(),
            extension: "hdf5".to_string(),
            snapshot: None,
            reference: None,
            n_bins: 50,
            csv: false,
        }
    }
}

impl StromgrenSettings {
    /// Builder pattern: set snapshot location
    pub fn location(
        mut self,
        dir: impl Into<PathBuf>,
        basename: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        self.dir = dir.into();
        self.basename = basename.into();
        self.extension = extension.into();
        self
    }

    /// Builder pattern: set reference table
    pub fn reference(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference = Some(path.into());
        self
    }
}

impl StromgrenArgs {
    /// Settings for a run whose snapshots default to `default_basename`
    pub fn settings(&self, default_basename: &str) -> StromgrenSettings {
        StromgrenSettings {
            basename: self.basename.clone().unwrap_or_else(|| default_basename.to_string()),
            ..StromgrenSettings::from(self)
        }
    }
}

impl From<&StromgrenArgs> for StromgrenSettings {
    fn from(args: &StromgrenArgs) -> Self {
        Self {
            dir: args.dir.clone(),
            basename: args.basename.clone().unwrap_or_else(|| MF_BASENAME.to_string()),
            extension: args.extension.clone(),
            snapshot: args.snapnr,
            reference: args.reference.clone(),
            n_bins: args.n_bins,
            csv: args.csv,
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
