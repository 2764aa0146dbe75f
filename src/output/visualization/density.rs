//! Density profile plotting
//!
//! Overlays the binned density profiles of one or more snapshots on an
//! analytical curve, on log–log axes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use radprof_rs::output::visualization::{plot_density_profiles, PlotConfig};
//!
//! let series = vec![("t = 0.000 Gyr", &profile_0), ("t = 0.100 Gyr", &profile_1)];
//! let analytical = model.sample(bins.edges());
//! plot_density_profiles(&series, Some(&analytical), Path::new("density.png"), None)?;
//! ```

use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

use super::config::{PlotConfig, NO_TITLE};
use super::{is_svg, positive_bounds};
use crate::profile::Profile;

/// Plot density profiles against an analytical prediction
///
/// Each profile is drawn as markers in its own colour and labelled in the
/// legend; the analytical curve, if any, is a line in `config.line_color`.
/// Empty bins (zero density) cannot appear on a log axis and are skipped.
///
/// # Arguments
///
/// * `profiles` - (legend label, profile) per snapshot
/// * `analytical` - Optional (r, ρ) samples of the model
/// * `output_path` - Path to save the plot (PNG or SVG)
/// * `config` - Optional plot configuration
///
/// # Errors
///
/// - no profiles given
/// - nothing strictly positive to plot
/// - drawing backend failures
pub fn plot_density_profiles(
    profiles: &[(&str, &Profile)],
    analytical: Option<&[(f64, f64)]>,
    output_path: &Path,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    if profiles.is_empty() {
        return Err("No profiles provided".into());
    }

    // Create default config if needed (avoid temporary value)
    let default_config = PlotConfig::density_profile(NO_TITLE);
    let config = config.unwrap_or(&default_config);

    let points = profiles
        .iter()
        .flat_map(|(_, profile)| profile.positive_points())
        .chain(analytical.unwrap_or(&[]).iter().copied());

    let (x_range, y_range) =
        positive_bounds(points).ok_or("No positive density values to plot")?;

    if is_svg(output_path) {
        let backend = SVGBackend::new(output_path, (config.width, config.height));
        plot_density_impl(backend, profiles, analytical, config, x_range, y_range)
    } else {
        let backend = BitMapBackend::new(output_path, (config.width, config.height));
        plot_density_impl(backend, profiles, analytical, config, x_range, y_range)
    }
}

/// Implementation for density plotting with concrete backend
fn plot_density_impl<DB: DrawingBackend>(
    backend: DB,
    profiles: &[(&str, &Profile)],
    analytical: Option<&[(f64, f64)]>,
    config: &PlotConfig,
    (x_min, x_max): (f64, f64),
    (y_min, y_max): (f64, f64),
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;

    // Half a decade of headroom on the density axis
    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 32).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (x_min..x_max).log_scale(),
            (y_min / 3.0..y_max * 3.0).log_scale(),
        )?;

    let x_format = |x: &f64| format!("{:.2e}", x);
    let y_format = |y: &f64| format!("{:.1e}", y);

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(&config.xlabel)
        .y_desc(&config.ylabel)
        .x_label_formatter(&x_format)
        .y_label_formatter(&y_format);

    if config.show_grid {
        mesh.draw()?;
    } else {
        mesh.disable_mesh().draw()?;
    }

    for (idx, (label, profile)) in profiles.iter().enumerate() {
        let color = config.get_series_color(idx);
        let size = config.marker_size;

        chart
            .draw_series(
                profile
                    .positive_points()
                    .map(move |(r, rho)| Circle::new((r, rho), size, color.filled())),
            )?
            .label(*label)
            .legend(move |(x, y)| Circle::new((x + 10, y), 3, color.filled()));
    }

    if let Some(curve) = analytical {
        let line_color = config.line_color;
        chart
            .draw_series(LineSeries::new(
                curve.iter().copied().filter(|(r, rho)| *r > 0.0 && *rho > 0.0),
                line_color.stroke_width(config.line_width),
            ))?
            .label("Analytical Prediction")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&config.background.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;

    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
