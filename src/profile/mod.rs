//! Radially binned profiles
//!
//! This is the numerical core of the crate: given particle radii with
//! associated weights and a set of bin edges, produce one value per bin.
//!
//! # Organization
//!
//! - **bins**: validated bin edges (`RadialBins`)
//! - **extractor**: cumulative/density/mean extraction (`ProfileExtractor`)
//! - **error**: input-validation failures (`ProfileError`)
//!
//! # Density
//!
//! For edges `R_0 < R_1 < ... < R_M` and the cumulative weight `W(R)` of all
//! particles with radius strictly below `R`:
//!
//! ```text
//! ρ_i = (W(R_{i+1}) - W(R_i)) / (R_{i+1} - R_i) / S(R_{i+1})
//! ```
//!
//! with `S(R) = 4πR²` in 3-D and `2πR` in 2-D.
//!
//! # Quick Start
//!
//! ```rust
//! use radprof_rs::profile::{ProfileExtractor, RadialBins, Geometry};
//!
//! let bins = RadialBins::log_spaced(0.01, 0.5, 200)?;
//! let extractor = ProfileExtractor::new(Geometry::Spherical);
//!
//! let radii = vec![0.02, 0.1, 0.3];
//! let masses = vec![1e-8, 1e-8, 1e-8];
//! let profile = extractor.density(&radii, &masses, &bins)?;
//! assert_eq!(profile.len(), bins.n_bins());
//! # Ok::<(), radprof_rs::profile::ProfileError>(())
//! ```

pub mod bins;
pub mod error;
pub mod extractor;

pub use bins::RadialBins;
pub use error::ProfileError;
pub use extractor::{radii_from_center, Geometry, Profile, ProfileExtractor};
