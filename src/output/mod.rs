//! Output of profile analyses
//!
//! - **Visualization**: PNG/SVG plots using plotters
//! - **Export**: CSV tables of binned profiles
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs
//! ├── visualization/      ← Plots
//! │   ├── config.rs
//! │   ├── density.rs
//! │   └── stromgren.rs
//! └── export/             ← Data export
//!     └── csv.rs
//! ```
//!
//! Both sub-modules take plain slices or [`Profile`](crate::profile::Profile)
//! values, so they know nothing about snapshots.

pub mod export;
pub mod visualization;

pub use export::{export_profile_csv, export_profiles_csv, CsvConfig, CsvMetadata};
pub use visualization::{
    plot_density_profiles, plot_stromgren_comparison, Panel, PlotConfig, Series,
};
