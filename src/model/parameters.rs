//! Defines the `MapParameters` struct, which represents the contents of `map.toml`.
use crate::classify::BinEdges;
use crate::input::{input_err_msg, read_toml};
use crate::projection::Crs;
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const MAP_PARAMETERS_FILE_NAME: &str = "map.toml";

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_title, String, "Average Migration Network".to_string());
define_param_default!(default_width, u32, 1000);
define_param_default!(default_height, u32, 1200);
define_param_default!(default_margin, u32, 20);
define_param_default!(default_title_font_size, u32, 24);
define_param_default!(default_label_font_size, u32, 12);
define_param_default!(default_legend_font_size, u32, 14);
define_param_default!(default_marker_size, u32, 5);
define_param_default!(default_line_width_scale, f64, 2.0);
define_param_default!(default_display_width, String, "70%".to_string());
define_param_default!(default_display_height, String, "auto".to_string());

/// Represents the contents of the entire map file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct MapParameters {
    /// The title of the map. The selected year is appended to it.
    #[serde(default = "default_title")]
    pub title: String,
    /// The coordinate reference system of the boundary vertices
    #[serde(default)]
    pub crs: Crs,
    /// Which end of each classification bin includes the threshold value
    #[serde(default)]
    pub bin_edges: BinEdges,
    /// The year shown initially. Defaults to the earliest year in the flow data.
    pub default_year: Option<u32>,
    /// Parameters controlling how the map is drawn
    #[serde(default)]
    pub figure: FigureParameters,
}

impl Default for MapParameters {
    fn default() -> Self {
        Self {
            title: default_title(),
            crs: Crs::default(),
            bin_edges: BinEdges::default(),
            default_year: None,
            figure: FigureParameters::default(),
        }
    }
}

/// Presentation parameters for drawing the map
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct FigureParameters {
    /// Width of the figure in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Height of the figure in pixels
    #[serde(default = "default_height")]
    pub height: u32,
    /// Blank space around the map in pixels
    #[serde(default = "default_margin")]
    pub margin: u32,
    /// Font size of the title in points. plotters writes SVG font sizes in pixels, at 1.24
    /// points per pixel.
    #[serde(default = "default_title_font_size")]
    pub title_font_size: u32,
    /// Font size of the city names in points
    #[serde(default = "default_label_font_size")]
    pub label_font_size: u32,
    /// Font size of the legend entries in points
    #[serde(default = "default_legend_font_size")]
    pub legend_font_size: u32,
    /// Radius of the city markers in pixels
    #[serde(default = "default_marker_size")]
    pub marker_size: u32,
    /// Factor converting flow widths into pixels
    #[serde(default = "default_line_width_scale")]
    pub line_width_scale: f64,
    /// Width hint given to whatever displays an exported image
    #[serde(default = "default_display_width")]
    pub display_width: String,
    /// Height hint given to whatever displays an exported image
    #[serde(default = "default_display_height")]
    pub display_height: String,
}

impl Default for FigureParameters {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: default_margin(),
            title_font_size: default_title_font_size(),
            label_font_size: default_label_font_size(),
            legend_font_size: default_legend_font_size(),
            marker_size: default_marker_size(),
            line_width_scale: default_line_width_scale(),
            display_width: default_display_width(),
            display_height: default_display_height(),
        }
    }
}

impl FigureParameters {
    /// Check that the parameters describe a drawable figure
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("title_font_size", self.title_font_size),
            ("label_font_size", self.label_font_size),
            ("legend_font_size", self.legend_font_size),
            ("marker_size", self.marker_size),
        ] {
            ensure!(value > 0, "figure.{name} must be greater than zero");
        }

        ensure!(
            2 * self.margin < self.width.min(self.height),
            "figure.margin is too large for the figure size"
        );

        ensure!(
            self.line_width_scale.is_finite() && self.line_width_scale > 0.0,
            "figure.line_width_scale must be a finite number greater than zero"
        );

        Ok(())
    }

    /// Convert a flow width into a whole number of pixels, never less than one
    pub fn stroke_width(&self, width: f64) -> u32 {
        (width * self.line_width_scale).round().max(1.0) as u32
    }
}

impl MapParameters {
    /// Read a map file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `map_dir` - Folder containing map input files
    ///
    /// # Returns
    ///
    /// The map file contents as a [`MapParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(map_dir: P) -> Result<MapParameters> {
        let file_path = map_dir.as_ref().join(MAP_PARAMETERS_FILE_NAME);
        let map_params: MapParameters = read_toml(&file_path)?;

        map_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(map_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        ensure!(!self.title.trim().is_empty(), "title cannot be empty");
        self.figure.validate()
    }
}
