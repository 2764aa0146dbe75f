//! Export of radial profiles for external analysis
//!
//! # Available formats
//!
//! | Format  | Module  |
//! |---------|---------|
//! | CSV     | [`csv`] |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use radprof_rs::output::export::{export_profiles_csv, CsvConfig};
//!
//! export_profiles_csv(&radii, &[xhi, temperature], &["xHI", "T"], path, None)?;
//! ```

pub mod csv;

pub use self::csv::{export_profile_csv, export_profiles_csv, CsvConfig, CsvMetadata};
