//! Snapshot reading errors

use std::path::PathBuf;
use thiserror::Error;

use super::data::ParticleKind;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[cfg(feature = "hdf5")]
    #[error(transparent)]
    Hdf5(#[from] hdf5::Error),

    #[error("Unsupported snapshot format: {0}")]
    UnsupportedFormat(String),

    #[error("Snapshot is missing column '{0}'")]
    MissingColumn(String),

    #[error("Row {row}, column '{column}': '{value}' is not a number")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}: unknown particle type '{value}'")]
    UnknownParticleKind { row: usize, value: String },

    #[error("Invalid metadata '{key}': '{value}'")]
    Metadata { key: String, value: String },

    #[error("Incomplete ionization data: {0}")]
    IncompleteIonization(String),

    #[error("Positions must be 2-D or 3-D, got {0} dimensions")]
    Dimension(usize),

    #[error("Field '{field}' has {actual} values but there are {expected} particles")]
    FieldLength {
        field: &'static str,
        actual: usize,
        expected: usize,
    },

    #[error("Snapshot has no {0:?} particles")]
    MissingParticles(ParticleKind),

    #[error("Didn't find any snapshots named '{basename}*.{extension}' in {}", .dir.display())]
    NoSnapshots {
        dir: PathBuf,
        basename: String,
        extension: String,
    },

    #[error("Didn't find file {}", .0.display())]
    SnapshotNotFound(PathBuf),
}
