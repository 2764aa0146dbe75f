//! End-to-end analyses
//!
//! Each analysis turns run settings into figures (and optional CSV tables):
//!
//! 1. **Settings** (`PlummerSettings`, `StromgrenSettings`) - WHAT to analyse
//!    - snapshot files, model parameters, binning, output paths
//!
//! 2. **Pipeline** (`run_plummer`, `run_stromgren`, `run_stromgren_hhe`) - HOW
//!    - load every snapshot through [`load_snapshot`](crate::snapshot::load_snapshot)
//!    - derive per-particle quantities and bin them with
//!      [`ProfileExtractor`](crate::profile::ProfileExtractor)
//!    - render and export
//!
//! Snapshots are processed one after the other; the first error aborts the
//! run.
//!
//! # Module Organization
//!
//! - **`plummer`**: density profiles against the Plummer model
//! - **`stromgren`**: neutral fraction and temperature against TT1D
//! - **`stromgren_hhe`**: H and He species abundances and temperature against TT1D

pub mod plummer;
pub mod stromgren;
pub mod stromgren_hhe;

use std::path::PathBuf;

use thiserror::Error;

use crate::cli::CliError;
use crate::models::ModelError;
use crate::profile::ProfileError;
use crate::snapshot::SnapshotError;

pub use plummer::{plummer_density_profile, run_plummer, PlummerRun};
pub use stromgren::{
    run_stromgren, stromgren_bins, stromgren_fields, BinnedFields, StromgrenFields, StromgrenOutput,
};
pub use stromgren_hhe::{run_stromgren_hhe, stromgren_hhe_fields, BinnedHhe, HheFields};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Cli(#[from] CliError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: SnapshotError,
    },

    #[error("Particles are {0}-dimensional, expected 2 or 3")]
    Dimension(usize),

    #[error("Snapshot has no box size")]
    MissingBoxSize,

    #[error("Cannot write {}: {message}", .path.display())]
    Output { path: PathBuf, message: String },
}

impl AnalysisError {
    /// Wrap a plotting or export failure, whose error type is opaque
    pub(crate) fn output(path: &std::path::Path, error: Box<dyn std::error::Error>) -> Self {
        Self::Output { path: path.to_path_buf(), message: error.to_string() }
    }
}
