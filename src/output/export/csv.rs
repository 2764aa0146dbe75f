//! CSV export of radial profiles
//!
//! Writes one row per bin: the radius column followed by one column per
//! profile, readable by pandas, gnuplot, spreadsheets and the like.
//!
//! # Quick Examples
//!
//! ## Single profile
//!
//! ```rust,ignore
//! use radprof_rs::output::export::export_profile_csv;
//!
//! export_profile_csv(&profile, "density", Path::new("density.csv"), None)?;
//! ```
//!
//! **Output** (`density.csv`):
//! ```csv
//! r,density
//! 0.012000,1.254310
//! 0.014400,1.251208
//! ...
//! ```
//!
//! ## Several columns with metadata
//!
//! ```rust,ignore
//! use radprof_rs::output::export::{export_profiles_csv, CsvConfig, CsvMetadata};
//!
//! let metadata = CsvMetadata::from_snapshot("output_MF_0003.hdf5", 0.5, "Myr");
//! let config = CsvConfig::default().with_metadata(metadata);
//!
//! export_profiles_csv(
//!     xhi.radii(),
//!     &[xhi.values().to_vec(), temperature.values().to_vec()],
//!     &["neutral_fraction", "temperature"],
//!     Path::new("profiles.csv"),
//!     Some(&config),
//! )?;
//! ```
//!
//! **Output** (`profiles.csv`):
//! ```csv
//! # Radial Profile Data
//! # Generated: 2026-02-11T15:30:00+00:00
//! # Snapshot: output_MF_0003.hdf5
//! # Time: 0.5 Myr
//! #
//! r,neutral_fraction,temperature
//! 0.020000,0.000012,21034.118200
//! 0.040000,nan,nan
//! ...
//! ```
//!
//! Bins without particles have no mean; they are written as `nan`.

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::profile::Profile;

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Fields
///
/// - `delimiter`: Column separator (default: ',')
/// - `decimal_separator`: Decimal point character (default: '.')
/// - `precision`: Number of decimal places (default: 6)
/// - `include_metadata`: Add header comments with snapshot info
/// - `metadata`: Snapshot metadata to include
/// - `radius_header`: Header of the radius column (default: "r")
///
/// # Example
///
/// ```rust,ignore
/// let config = CsvConfig {
///     delimiter: ';',
///     precision: 10,
///     ..Default::default()
/// };
/// ```
#[derive(Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,

    /// Header of the radius column (default: "r")
    pub radius_header: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            radius_header: "r".to_string(),
        }
    }
}

impl CsvConfig {
    /// Semicolon-delimited, comma as decimal separator
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: set the radius column header
    pub fn radius_header(mut self, header: impl Into<String>) -> Self {
        self.radius_header = header.into();
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// Only fields that are set appear in the header.
#[derive(Clone, Default)]
pub struct CsvMetadata {
    /// Snapshot file the profiles come from
    pub snapshot: Option<String>,

    /// Simulation time, with its unit
    pub time: Option<(f64, String)>,

    /// Analysis that produced the profiles (e.g. "Strömgren 3D MF")
    pub analysis: Option<String>,

    /// Number of radial bins
    pub bins: Option<usize>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    pub fn from_snapshot(snapshot: &str, time: f64, unit: &str) -> Self {
        Self {
            snapshot: Some(snapshot.to_string()),
            time: Some((time, unit.to_string())),
            ..Default::default()
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom.push((key.into(), value.into()));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Write metadata header comments
fn write_metadata_header<W: Write>(out: &mut W, metadata: &CsvMetadata) -> std::io::Result<()> {
    writeln!(out, "# Radial Profile Data")?;

    let now = chrono::Utc::now();
    writeln!(out, "# Generated: {}", now.to_rfc3339())?;

    if let Some(snapshot) = &metadata.snapshot {
        writeln!(out, "# Snapshot: {}", snapshot)?;
    }
    if let Some((time, unit)) = &metadata.time {
        writeln!(out, "# Time: {} {}", time, unit)?;
    }
    if let Some(analysis) = &metadata.analysis {
        writeln!(out, "# Analysis: {}", analysis)?;
    }
    if let Some(bins) = metadata.bins {
        writeln!(out, "# Bins: {}", bins)?;
    }

    for (key, value) in &metadata.custom {
        writeln!(out, "# {}: {}", key, value)?;
    }

    writeln!(out, "#")
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }

    let formatted = format!("{:.prec$}", value, prec = config.precision);
    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

// =============================================================================
// Export Functions
// =============================================================================

/// Export profile columns sharing one radius column
///
/// # Arguments
///
/// * `radii` - Radius of every row
/// * `columns` - One value vector per profile, each as long as `radii`
/// * `names` - Column headers, one per profile
/// * `output_path` - Output file path
/// * `config` - Optional CSV configuration (uses default if None)
///
/// # Errors
///
/// - Empty data
/// - Mismatched lengths (names vs columns, column vs radii)
/// - Non-finite radius, or infinite value (`NaN` values are allowed)
/// - A delimiter outside ASCII
/// - File creation or write errors
///
/// Headers and cells that contain the delimiter are quoted.
pub fn export_profiles_csv(
    radii: &[f64],
    columns: &[Vec<f64>],
    names: &[&str],
    output_path: &Path,
    config: Option<&CsvConfig>,
) -> Result<(), Box<dyn Error>> {
    // ============================= Validation =============================

    if radii.is_empty() || columns.is_empty() {
        return Err("Empty data: radii and profile columns must not be empty".into());
    }

    if columns.len() != names.len() {
        return Err(format!(
            "Data length mismatch: {} profile columns versus {} names",
            columns.len(),
            names.len()
        )
        .into());
    }

    if radii.iter().any(|r| !r.is_finite()) {
        return Err("Invalid data: NaN or Inf detected in radii".into());
    }

    for (name, column) in names.iter().zip(columns) {
        if column.len() != radii.len() {
            return Err(format!(
                "Column [{}] length mismatch: {} values vs {} radii",
                name,
                column.len(),
                radii.len()
            )
            .into());
        }

        if column.iter().any(|v| v.is_infinite()) {
            return Err(format!("Invalid data: Inf detected in column {}", name).into());
        }
    }

    // ============================= Configuration ==========================

    let binding = CsvConfig::default();
    let config = config.unwrap_or(&binding);

    let delimiter = u8::try_from(config.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| format!("Delimiter '{}' is not an ASCII character", config.delimiter))?;

    // ============================= Write ==================================

    let mut out = BufWriter::new(File::create(output_path)?);

    if config.include_metadata {
        if let Some(metadata) = &config.metadata {
            write_metadata_header(&mut out, metadata)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(std::iter::once(config.radius_header.as_str()).chain(names.iter().copied()))?;

    for (row, radius) in radii.iter().enumerate() {
        let cells = std::iter::once(format_number(*radius, config))
            .chain(columns.iter().map(|column| format_number(column[row], config)));
        writer.write_record(cells)?;
    }

    writer.flush()?;
    Ok(())
}

/// Export a single profile
pub fn export_profile_csv(
    profile: &Profile,
    name: &str,
    output_path: &Path,
    config: Option<&CsvConfig>,
) -> Result<(), Box<dyn Error>> {
    export_profiles_csv(
        profile.radii(),
        &[profile.values().to_vec()],
        &[name],
        output_path,
        config,
    )
}

// =================================================================================================
// Tests
// =================================================================================================
