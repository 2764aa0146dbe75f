//! Plot configuration shared across visualization modules
//!
//! One [`PlotConfig`] value is passed to every rendering call; there is no
//! global plotting state.

use plotters::prelude::*;

/// Configuration for customizing plots
///
/// Used by both density-profile and Strömgren plots.
///
/// # Fields
///
/// - `width`, `height`: Dimensions in pixels
/// - `title`: Plot title
/// - `xlabel`, `ylabel`: Axis labels
/// - `line_color`: Colour of analytical/reference curves
/// - `series_colors`: Optional colours for data series (one per snapshot)
/// - `scatter_color`, `scatter_opacity`: Per-particle scatter style
/// - `marker_size`: Marker radius in pixels
/// - `log_y`: Logarithmic y axis for Strömgren panels (density plots are always log–log)
///
/// # Example
///
/// ```rust,ignore
/// use radprof_rs::output::visualization::PlotConfig;
/// use plotters::prelude::*;
///
/// let mut config = PlotConfig::density_profile("Plummer, a = 0.05");
/// config.line_color = RED;
/// config.width = 1920;
/// ```
#[derive(Clone)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,

    /// Image height in pixels (default: 768)
    pub height: u32,

    /// Plot title (default: "Plot")
    pub title: String,

    /// X-axis label (default: "r")
    pub xlabel: String,

    /// Y-axis label (default: empty, set by plot type)
    pub ylabel: String,

    /// Analytical / reference curve colour (default: BLACK)
    pub line_color: RGBColor,

    /// Optional colours for data series
    ///
    /// If None, uses the default palette: [BLUE, RED, GREEN, MAGENTA, CYAN, ...]
    pub series_colors: Option<Vec<RGBColor>>,

    /// Per-particle scatter colour (default: BLUE)
    pub scatter_color: RGBColor,

    /// Per-particle scatter opacity (default: 0.6)
    pub scatter_opacity: f64,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Line width in pixels (default: 2)
    pub line_width: u32,

    /// Marker radius in pixels (default: 2)
    pub marker_size: u32,

    /// Show grid lines (default: true)
    pub show_grid: bool,

    /// Logarithmic y axis (default: false)
    pub log_y: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Plot".to_string(),
            xlabel: "r".to_string(),
            ylabel: String::new(),
            line_color: BLACK,
            series_colors: None,
            scatter_color: BLUE,
            scatter_opacity: 0.6,
            background: WHITE,
            line_width: 2,
            marker_size: 2,
            show_grid: true,
            log_y: false,
        }
    }
}

/// Helper trait to accept both `String` and `None` for optional titles
pub trait IntoOptionalTitle {
    fn into_optional_title(self) -> Option<String>;
}

impl IntoOptionalTitle for &str {
    fn into_optional_title(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoOptionalTitle for String {
    fn into_optional_title(self) -> Option<String> {
        Some(self)
    }
}

impl<T: IntoOptionalTitle> IntoOptionalTitle for Option<T> {
    fn into_optional_title(self) -> Option<String> {
        self.and_then(|t| t.into_optional_title())
    }
}

/// Constant for no title (default title will be used)
///
/// # Example
///
/// ```rust,ignore
/// let config = PlotConfig::density_profile(NO_TITLE);
/// ```
pub const NO_TITLE: Option<&str> = None;

impl PlotConfig {
    /// Log–log density profile with optional custom title
    ///
    /// Title defaults to "Density Profile".
    pub fn density_profile(title: impl IntoOptionalTitle) -> Self {
        Self {
            width: 1008,
            height: 840,
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "Density Profile".to_string()),
            xlabel: "r [kpc]".to_string(),
            ylabel: "ρ(r) [M☉ kpc⁻³]".to_string(),
            log_y: true,
            ..Self::default()
        }
    }

    /// Two-panel Strömgren comparison with optional custom title
    ///
    /// Title defaults to "Strömgren Sphere". Each panel carries its own
    /// y-axis label, so `ylabel` is left empty.
    pub fn stromgren(title: impl IntoOptionalTitle) -> Self {
        Self {
            width: 2000,
            height: 800,
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "Strömgren Sphere".to_string()),
            log_y: true,
            marker_size: 1,
            ..Self::default()
        }
    }

    /// Builder pattern: set x-axis label
    pub fn xlabel(mut self, label: impl Into<String>) -> Self {
        self.xlabel = label.into();
        self
    }

    /// Create config with custom series colors
    pub fn with_series_colors(mut self, colors: Vec<RGBColor>) -> Self {
        self.series_colors = Some(colors);
        self
    }

    /// Get color for data series at index i
    ///
    /// Uses custom colors if provided, otherwise falls back to default palette
    pub(crate) fn get_series_color(&self, series_index: usize) -> RGBColor {
        if let Some(ref colors) = self.series_colors {
            if series_index < colors.len() {
                return colors[series_index];
            }
        }

        // Default palette
        let default_colors = [
            BLUE,
            RED,
            GREEN,
            MAGENTA,
            CYAN,
            RGBColor(255, 165, 0),  // Orange
            RGBColor(128, 0, 128),   // Purple
            RGBColor(165, 42, 42),   // Brown
            RGBColor(128, 128, 128), // Grey
            RGBColor(0, 128, 128),   // Teal
        ];

        default_colors[series_index % default_colors.len()]
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_config_default() {
        let config = PlotConfig::default();
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 768);
        assert!(config.show_grid);
        assert!(!config.log_y);
    }

    #[test]
    fn test_density_profile_config_default() {
        let config = PlotConfig::density_profile(NO_TITLE);
        assert_eq!(config.title, "Density Profile");
        assert!(config.log_y);
        assert_eq!(config.xlabel, "r [kpc]");
    }

    #[test]
    fn test_density_profile_config_with_string() {
        let title = format!("Plummer: a = {:.1e}", 0.05);
        let config = PlotConfig::density_profile(title);
        assert_eq!(config.title, "Plummer: a = 5.0e-2");
    }

    #[test]
    fn test_stromgren_config() {
        let config = PlotConfig::stromgren("Run 7").xlabel("r [kpc]");
        assert_eq!(config.title, "Run 7");
        assert_eq!(config.xlabel, "r [kpc]");
        assert!(config.log_y);
        assert_eq!((config.width, config.height), (2000, 800));
    }

    #[test]
    fn test_get_series_color_default_palette() {
        let config = PlotConfig::default();
        assert_eq!(config.get_series_color(0), BLUE);
        assert_eq!(config.get_series_color(1), RED);
        assert_eq!(config.get_series_color(10), BLUE); // Wraparound
    }

    #[test]
    fn test_get_series_color_custom() {
        use plotters::style::full_palette::{LIGHTBLUE, LIGHTGREEN, ORANGE};
        let config = PlotConfig::default().with_series_colors(vec![ORANGE, LIGHTGREEN, LIGHTBLUE]);
        assert_eq!(config.get_series_color(0), ORANGE);
        assert_eq!(config.get_series_color(2), LIGHTBLUE);
        assert_eq!(config.get_series_color(3), RED); // Falls back to palette
    }
}
