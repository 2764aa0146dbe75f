//! Snapshot loading
//!
//! A snapshot reader turns a file into a [`Snapshot`]: metadata plus the
//! particle families present in the file. Readers are interchangeable behind
//! the [`SnapshotReader`] trait; [`load_snapshot`] picks one from the file
//! extension.
//!
//! # Available formats
//!
//! | Format | Extension | Module | Availability |
//! |--------|-----------|--------|--------------|
//! | Particle table | `.csv` | [`csv`] | always |
//! | SWIFT HDF5 | `.hdf5`, `.h5` | `hdf5` | feature `hdf5` |
//!
//! # Usage
//!
//! ```rust,ignore
//! use radprof_rs::snapshot::{load_snapshot, ParticleKind};
//!
//! let snapshot = load_snapshot(Path::new("output_MF_0010.hdf5"))?;
//! let gas = snapshot.require(ParticleKind::Gas)?;
//! println!("{} gas particles at t = {:.3} Myr", gas.len(), snapshot.metadata.time_myr());
//! ```

pub mod csv;
pub mod data;
pub mod discovery;
pub mod error;

#[cfg(feature = "hdf5")]
pub mod hdf5;

use std::path::Path;

pub use self::csv::{parse_csv_snapshot, CsvSnapshotReader};
pub use data::{
    IonizationData, ParticleKind, ParticleSet, Snapshot, SnapshotMetadata, SpeciesFields,
    UnitSystem,
};
pub use discovery::{derived_output_path, snapshot_list, Selection};
pub use error::SnapshotError;

#[cfg(feature = "hdf5")]
pub use self::hdf5::Hdf5SnapshotReader;

/// Abstraction over snapshot file formats
///
/// Implementations read the whole file eagerly; the returned snapshot owns
/// all of its data.
pub trait SnapshotReader {
    /// Read the snapshot stored at `path`
    ///
    /// # Errors
    ///
    /// Any I/O or format error of the underlying file. Nothing is retried.
    fn read(&self, path: &Path) -> Result<Snapshot, SnapshotError>;
}

/// Read a snapshot, choosing the reader from the file extension
pub fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => CsvSnapshotReader.read(path),
        #[cfg(feature = "hdf5")]
        "hdf5" | "h5" => Hdf5SnapshotReader.read(path),
        #[cfg(not(feature = "hdf5"))]
        "hdf5" | "h5" => Err(SnapshotError::UnsupportedFormat(format!(
            ".{ext} (rebuild with the `hdf5` feature)"
        ))),
        other => Err(SnapshotError::UnsupportedFormat(format!(".{other}"))),
    }
}

// =================================================================================================
// Tests
// =================================================================================================
