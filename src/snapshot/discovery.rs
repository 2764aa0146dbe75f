//! Locating snapshot files and naming the figures derived from them

use std::path::{Path, PathBuf};

use super::error::SnapshotError;

/// Which snapshots of a series to process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every file of the series
    All,

    /// The single snapshot `{basename}_{n:04}`
    Number(u32),
}

impl From<Option<u32>> for Selection {
    fn from(number: Option<u32>) -> Self {
        number.map_or(Self::All, Self::Number)
    }
}

/// List the snapshot files of a series
///
/// - [`Selection::All`]: every file in `dir` named
///   `{basename}_{digits}.{extension}`, sorted by name. Figures and tables
///   written next to the snapshots never match.
/// - [`Selection::Number`]: exactly `{dir}/{basename}_{n:04}.{extension}`
///
/// # Errors
///
/// - `NoSnapshots` when nothing matches
/// - `SnapshotNotFound` when the numbered file does not exist
/// - `Io` when `dir` cannot be listed
pub fn snapshot_list(
    dir: &Path,
    basename: &str,
    extension: &str,
    selection: Selection,
) -> Result<Vec<PathBuf>, SnapshotError> {
    match selection {
        Selection::Number(number) => {
            let path = dir.join(format!("{basename}_{number:04}.{extension}"));
            if path.is_file() {
                Ok(vec![path])
            } else {
                Err(SnapshotError::SnapshotNotFound(path))
            }
        }
        Selection::All => {
            let io_error = |source: std::io::Error| SnapshotError::Io { path: dir.to_path_buf(), source };

            let mut files = Vec::new();
            for entry in std::fs::read_dir(dir).map_err(io_error)? {
                let entry = entry.map_err(io_error)?;
                let name = entry.file_name();
                let Some(name) = name.to_str() else {
                    continue;
                };
                if is_series_member(name, basename, extension) && entry.path().is_file() {
                    files.push(entry.path());
                }
            }

            if files.is_empty() {
                return Err(SnapshotError::NoSnapshots {
                    dir: dir.to_path_buf(),
                    basename: basename.to_string(),
                    extension: extension.to_string(),
                });
            }

            files.sort();
            Ok(files)
        }
    }
}

/// `{basename}_{digits}.{extension}`
fn is_series_member(name: &str, basename: &str, extension: &str) -> bool {
    name.strip_prefix(basename)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix(extension))
        .and_then(|rest| rest.strip_suffix('.'))
        .is_some_and(|number| !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()))
}

/// Figure path next to `snapshot`: extension dropped, `suffix` appended
///
/// `output_MF_0003.hdf5` with suffix `-Stromgren3DMF.png` gives
/// `output_MF_0003-Stromgren3DMF.png`.
pub fn derived_output_path(snapshot: &Path, suffix: &str) -> PathBuf {
    let stem = snapshot
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    snapshot.with_file_name(format!("{stem}{suffix}"))
}

// =================================================================================================
// Tests
// =================================================================================================
