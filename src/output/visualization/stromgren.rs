//! Strömgren sphere comparison plots
//!
//! Side-by-side panels sharing the radial axis `[0, half box]`. Each panel
//! scatters one or more per-particle fields against distance to the source
//! and can overlay the binned mean and the TT1D reference curves.

use plotters::coord::ranged1d::{AsRangedCoord, ValueFormatter};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

use super::config::{PlotConfig, NO_TITLE};
use super::is_svg;
use crate::models::ReferenceCurve;
use crate::profile::Profile;

/// Colour of the binned mean line
const BINNED_COLOR: RGBColor = RED;

/// One scattered field of a panel
#[derive(Debug, Clone)]
pub struct Series<'a> {
    /// Legend entry; unlabelled series stay out of the legend
    pub label: Option<String>,

    /// Per-particle field, same length as the panel's radii
    pub values: &'a [f64],

    /// Scatter and reference colour; `None` uses `PlotConfig::scatter_color`
    pub color: Option<RGBColor>,

    /// Reference curve drawn in the series colour
    pub reference: Option<&'a ReferenceCurve>,
}

/// One panel of a comparison figure
#[derive(Debug, Clone)]
pub struct Panel<'a> {
    /// Y-axis label
    pub ylabel: String,

    /// Per-particle distance to the source
    pub radii: &'a [f64],

    /// Fields scattered against `radii`, drawn in order
    pub series: Vec<Series<'a>>,

    /// Binned mean of the field
    pub binned: Option<&'a Profile>,

    /// Reference solution for the field
    pub reference: Option<&'a ReferenceCurve>,

    /// Logarithmic y axis; `None` follows `PlotConfig::log_y`
    pub log_y: Option<bool>,

    /// Fixed y-axis extent; `None` fits the drawn values
    pub y_range: Option<(f64, f64)>,
}

impl<'a> Panel<'a> {
    /// Panel scattering a single field
    pub fn new(ylabel: impl Into<String>, radii: &'a [f64], values: &'a [f64]) -> Self {
        Self::layered(ylabel, radii).with_series(Series {
            label: None,
            values,
            color: None,
            reference: None,
        })
    }

    /// Panel with no field yet; add them with [`with_series`](Self::with_series)
    pub fn layered(ylabel: impl Into<String>, radii: &'a [f64]) -> Self {
        Self {
            ylabel: ylabel.into(),
            radii,
            series: Vec::new(),
            binned: None,
            reference: None,
            log_y: None,
            y_range: None,
        }
    }

    pub fn with_series(mut self, series: Series<'a>) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_y_range(mut self, y_min: f64, y_max: f64) -> Self {
        self.y_range = Some((y_min, y_max));
        self
    }

    pub fn with_binned(mut self, profile: &'a Profile) -> Self {
        self.binned = Some(profile);
        self
    }

    pub fn with_reference(mut self, curve: &'a ReferenceCurve) -> Self {
        self.reference = Some(curve);
        self
    }

    pub fn with_log_y(mut self, log_y: bool) -> Self {
        self.log_y = Some(log_y);
        self
    }

    /// Every y value the panel would draw
    fn y_values(&self) -> impl Iterator<Item = f64> + '_ {
        let binned = self.binned.map(|p| p.values()).unwrap_or(&[]);
        let reference = self.reference.map(|c| c.values.as_slice()).unwrap_or(&[]);
        let series = self.series.iter().flat_map(|s| {
            let reference = s.reference.map(|c| c.values.as_slice()).unwrap_or(&[]);
            s.values.iter().chain(reference)
        });
        series.chain(binned).chain(reference).copied()
    }

    /// Y-axis extent: the fixed range if set, else fitted to the values
    fn y_extent(&self, log_y: bool) -> Result<(f64, f64), String> {
        match self.y_range {
            Some((lo, hi)) if lo < hi && (!log_y || lo > 0.0) => Ok((lo, hi)),
            Some((lo, hi)) => {
                Err(format!("Panel '{}' has invalid y range [{}, {}]", self.ylabel, lo, hi))
            }
            None => y_bounds(self.y_values(), log_y)
                .ok_or_else(|| format!("Panel '{}' has no values to plot", self.ylabel)),
        }
    }
}

/// Plot a multi-panel comparison of particle fields against radius
///
/// # Arguments
///
/// * `panels` - One panel per quantity, laid out left to right
/// * `x_max` - Upper end of the radial axis (half the box size)
/// * `output_path` - Path to save the plot (PNG or SVG)
/// * `config` - Optional plot configuration (`PlotConfig::stromgren` if None)
///
/// # Errors
///
/// - no panels, or a series whose values differ in length from its panel's radii
/// - `x_max` not finite and positive
/// - a panel with nothing drawable on its y axis
/// - drawing backend failures
pub fn plot_stromgren_comparison(
    panels: &[Panel<'_>],
    x_max: f64,
    output_path: &Path,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    if panels.is_empty() {
        return Err("No panels provided".into());
    }
    if !(x_max.is_finite() && x_max > 0.0) {
        return Err(format!("Invalid radial extent: {}", x_max).into());
    }
    for panel in panels {
        if let Some(series) = panel.series.iter().find(|s| s.values.len() != panel.radii.len()) {
            return Err(format!(
                "Panel '{}' length mismatch: {} radii versus {} values",
                panel.ylabel,
                panel.radii.len(),
                series.values.len()
            )
            .into());
        }
    }

    let default_config = PlotConfig::stromgren(NO_TITLE);
    let config = config.unwrap_or(&default_config);

    if is_svg(output_path) {
        let backend = SVGBackend::new(output_path, (config.width, config.height));
        plot_stromgren_impl(backend, panels, x_max, config)
    } else {
        let backend = BitMapBackend::new(output_path, (config.width, config.height));
        plot_stromgren_impl(backend, panels, x_max, config)
    }
}

fn plot_stromgren_impl<DB: DrawingBackend>(
    backend: DB,
    panels: &[Panel<'_>],
    x_max: f64,
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;
    let root = root.titled(&config.title, ("sans-serif", 32).into_font())?;

    let areas = root.split_evenly((1, panels.len()));
    for (area, panel) in areas.iter().zip(panels) {
        let log_y = panel.log_y.unwrap_or(config.log_y);
        let (y_min, y_max) = panel.y_extent(log_y)?;

        if log_y {
            draw_panel(area, panel, x_max, (y_min..y_max).log_scale(), true, config)?;
        } else {
            draw_panel(area, panel, x_max, y_min..y_max, false, config)?;
        }
    }

    root.present()?;

    Ok(())
}

/// Draw one panel on its drawing area, for either a linear or a log y axis
fn draw_panel<DB, Y>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel<'_>,
    x_max: f64,
    y_spec: Y,
    log_y: bool,
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    Y: AsRangedCoord<Value = f64>,
    Y::CoordDescType: ValueFormatter<f64>,
{
    let drawable = |v: f64| v.is_finite() && (!log_y || v > 0.0);

    let mut chart = ChartBuilder::on(area)
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..x_max, y_spec)?;

    let y_format = |y: &f64| {
        if log_y {
            format!("{:.0e}", y)
        } else {
            format!("{}", y)
        }
    };

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(&config.xlabel)
        .y_desc(&panel.ylabel)
        .y_label_formatter(&y_format);

    if config.show_grid {
        mesh.draw()?;
    } else {
        mesh.disable_mesh().draw()?;
    }

    let size = config.marker_size;
    let mut labelled = false;

    for series in &panel.series {
        let color = series.color.unwrap_or(config.scatter_color);
        let scatter = color.mix(config.scatter_opacity);
        let drawn = chart.draw_series(
            panel
                .radii
                .iter()
                .zip(series.values)
                .filter(|&(r, v)| r.is_finite() && drawable(*v))
                .map(|(&r, &v)| Circle::new((r, v), size, scatter.filled())),
        )?;
        if let Some(label) = &series.label {
            drawn.label(label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
            });
            labelled = true;
        }

        if let Some(curve) = series.reference {
            chart.draw_series(LineSeries::new(
                curve.points().filter(|&(_, v)| drawable(v)),
                color.stroke_width(config.line_width),
            ))?;
        }
    }

    if let Some(profile) = panel.binned {
        chart
            .draw_series(LineSeries::new(
                profile.iter().filter(|&(_, v)| drawable(v)),
                BINNED_COLOR.stroke_width(config.line_width),
            ))?
            .label("binned mean")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BINNED_COLOR));
        labelled = true;
    }

    if let Some(curve) = panel.reference {
        let line_color = config.line_color;
        chart
            .draw_series(LineSeries::new(
                curve.points().filter(|&(_, v)| drawable(v)),
                line_color.stroke_width(config.line_width),
            ))?
            .label("TT1D")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_color));
        labelled = true;
    }

    if labelled {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(&config.background.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    Ok(())
}

/// Y-axis extent of the drawable values, padded for readability
fn y_bounds(values: impl Iterator<Item = f64>, log_y: bool) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .filter(|v| v.is_finite() && (!log_y || *v > 0.0))
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;

    if log_y {
        Some((lo / 2.0, hi * 2.0))
    } else {
        let pad = if hi > lo { 0.05 * (hi - lo) } else { 0.5 * lo.abs().max(1.0) };
        Some((lo - pad, hi + pad))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
