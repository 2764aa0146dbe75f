//! radprof-rs: radial profiles of particle-simulation snapshots
//!
//! Loads snapshots of gravity and radiative-transfer test runs, bins
//! per-particle quantities by distance to a center and compares the
//! resulting profiles with analytical models or tabulated reference
//! solutions.
//!
//! # Architecture
//!
//! The binning core knows nothing about snapshots or plots:
//!
//! 1. **Profiles** ([`profile`]): bin edges, and a stateless extractor turning
//!    (radius, weight) pairs into cumulative, density, count or mean profiles
//! 2. **Snapshots** ([`snapshot`]): readers behind one trait, file discovery
//! 3. **Models** ([`models`]): Plummer sphere, ionization chemistry, TT1D tables
//! 4. **Output** ([`output`]): plotters figures and CSV export
//! 5. **Analyses** ([`analysis`]): the Plummer and Strömgren pipelines the
//!    `radprof` binary runs, configured through [`cli`] settings
//!
//! # Quick Start
//!
//! ```rust
//! use radprof_rs::models::PlummerModel;
//! use radprof_rs::profile::{ProfileExtractor, RadialBins};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = PlummerModel::new(0.05, 1.0e-5)?;
//! let bins = RadialBins::log_spaced(0.01, 0.5, 20)?;
//!
//! // Particles on a few shells, one unit of mass each
//! let radii = [0.02, 0.05, 0.05, 0.1, 0.3];
//! let masses = [1.0; 5];
//!
//! let density = ProfileExtractor::default().density(&radii, &masses, &bins)?;
//! assert_eq!(density.len(), bins.n_bins());
//!
//! let analytical = model.sample(bins.outer_edges());
//! assert_eq!(analytical.len(), density.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`profile`]: Radial binning (the core)
//! - [`snapshot`]: Snapshot data model, readers and discovery
//! - [`models`]: Analytical models and reference solutions
//! - [`output`]: Visualization and export
//! - [`cli`]: Command-line definitions and run settings
//! - [`analysis`]: End-to-end analyses

pub mod profile;
pub mod snapshot;

pub mod models;

pub mod analysis;
pub mod cli;
pub mod output;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use radprof_rs::prelude::*;
    //! ```
    pub use crate::models::{PlummerModel, ReferenceSolution, RtScheme, Species};
    pub use crate::profile::{Geometry, Profile, ProfileExtractor, RadialBins};
    pub use crate::snapshot::{load_snapshot, ParticleKind, Snapshot, SnapshotReader};
}
