//! Visualization of radial profiles
//!
//! Static plots rendered with the `plotters` library. The backend follows the
//! output extension: `.svg` renders an SVG, anything else a bitmap (PNG).
//!
//! # Organization
//!
//! - **config**: Shared plot configuration (`PlotConfig`)
//! - **density**: Binned density profiles against an analytical model (log–log)
//! - **stromgren**: Multi-panel per-particle scatter against reference solutions,
//!   one or several coloured fields per panel
//!
//! # Quick Start
//!
//! ## Density profiles
//!
//! ```rust,ignore
//! use radprof_rs::output::visualization::{plot_density_profiles, PlotConfig};
//!
//! let config = PlotConfig::density_profile("Plummer Density Profile");
//! plot_density_profiles(&[("t = 0.000 Gyr", &profile)], Some(&model), path, Some(&config))?;
//! ```
//!
//! ## Strömgren sphere
//!
//! ```rust,ignore
//! use radprof_rs::output::visualization::{plot_stromgren_comparison, Panel};
//!
//! let panels = [
//!     Panel::new("neutral fraction", &radii, &xhi).with_reference(&tt1d.neutral_fraction),
//!     Panel::new("T [K]", &radii, &temperature),
//! ];
//! plot_stromgren_comparison(&panels, half_box, path, None)?;
//! ```
//!
//! # When to Use Which Module
//!
//! | Use Case | Module | Function |
//! |----------|--------|----------|
//! | Gravity test, density vs radius | `density` | `plot_density_profiles` |
//! | RT test, particle fields vs radius | `stromgren` | `plot_stromgren_comparison` |

pub mod config;
pub mod density;
pub mod stromgren;

use std::path::Path;

pub use config::{IntoOptionalTitle, PlotConfig, NO_TITLE};
pub use density::plot_density_profiles;
pub use stromgren::{plot_stromgren_comparison, Panel, Series};

/// Whether the output path asks for the SVG backend
pub(crate) fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

/// Axis ranges covering every point with strictly positive, finite coordinates
///
/// Returns `((x_min, x_max), (y_min, y_max))`, or `None` if no point
/// qualifies. A degenerate range is widened by a factor of two each way so a
/// log axis can still be built.
pub(crate) fn positive_bounds(
    points: impl Iterator<Item = (f64, f64)>,
) -> Option<((f64, f64), (f64, f64))> {
    let mut bounds: Option<((f64, f64), (f64, f64))> = None;

    for (x, y) in points {
        if !(x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0) {
            continue;
        }
        bounds = Some(match bounds {
            None => ((x, x), (y, y)),
            Some(((x_lo, x_hi), (y_lo, y_hi))) => {
                ((x_lo.min(x), x_hi.max(x)), (y_lo.min(y), y_hi.max(y)))
            }
        });
    }

    bounds.map(|(x, y)| (widen(x), widen(y)))
}

fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if lo < hi {
        (lo, hi)
    } else {
        (lo / 2.0, hi * 2.0)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
