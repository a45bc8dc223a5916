//! The interaction controller, which owns the selected year and redraws the map when it changes.
//!
//! A controller holds one user's view of a map. The [`MapModel`] itself is read-only and shared
//! through an [`Arc`], so any number of controllers can display the same map independently.
use crate::model::MapModel;
use crate::model::parameters::FigureParameters;
use crate::scene::Scene;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::io::Write;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::Builder;

/// Somewhere a rendered scene can be displayed
pub trait SceneSurface {
    /// Display the scene, replacing whatever was shown before
    fn show(&mut self, scene: &Scene) -> Result<()>;
}

/// The state of a [`Controller`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Showing the scene for the selected year
    Idle,
    /// Rendering the scene for a newly selected year
    Recomputing,
}

/// Owns the selected year and keeps the displayed scene in step with it
pub struct Controller<S: SceneSurface> {
    model: Arc<MapModel>,
    surface: S,
    selected_year: u32,
    state: ControllerState,
    scene: Scene,
}

impl<S: SceneSurface> Controller<S> {
    /// Create a new controller showing the model's default year.
    ///
    /// The initial scene is rendered and shown on `surface` straight away.
    pub fn new(model: Arc<MapModel>, mut surface: S) -> Result<Self> {
        let selected_year = model.default_year();
        let scene = model.render(selected_year);
        surface.show(&scene)?;

        Ok(Self {
            model,
            surface,
            selected_year,
            state: ControllerState::Idle,
            scene,
        })
    }

    /// The currently selected year
    pub fn selected_year(&self) -> u32 {
        self.selected_year
    }

    /// The range of years which can be selected
    pub fn year_bounds(&self) -> RangeInclusive<u32> {
        self.model.years.clone()
    }

    /// The current state of the controller
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// The scene for the selected year
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The surface the scene is shown on
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Handle the user selecting a year.
    ///
    /// The scene is rendered for the new year and shown on the surface. Selecting the year which
    /// is already selected does nothing. A year outside [`Self::year_bounds`] is not an error: it
    /// gives a map with no flows.
    pub fn on_year_changed(&mut self, year: u32) -> Result<&Scene> {
        if year == self.selected_year {
            debug!("Year {year} is already selected");
            return Ok(&self.scene);
        }

        if !self.model.years.contains(&year) {
            warn!(
                "Year {year} is outside the range of years in the data ({}-{})",
                self.model.years.start(),
                self.model.years.end()
            );
        }

        self.selected_year = year;
        self.state = ControllerState::Recomputing;
        self.scene = self.model.render(year);
        debug!(
            "Rendered {} flow(s) for year {year}",
            self.scene.segments.len()
        );

        // Go back to idle even if the surface fails, as the scene is consistent with the year
        let result = self.surface.show(&self.scene);
        self.state = ControllerState::Idle;
        result?;

        Ok(&self.scene)
    }

    /// Move the selected year by `delta` years, staying within [`Self::year_bounds`]
    pub fn step(&mut self, delta: i32) -> Result<&Scene> {
        let bounds = self.year_bounds();
        let year = i64::from(self.selected_year) + i64::from(delta);
        let year = year.clamp(i64::from(*bounds.start()), i64::from(*bounds.end()));

        // The clamp keeps the year inside a range of u32s
        self.on_year_changed(u32::try_from(year)?)
    }
}

/// Presentation hints and location of a scene exported as an image file
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    /// Path to the image file
    pub path: PathBuf,
    /// Suggested display width (e.g. "70%")
    pub width: String,
    /// Suggested display height (e.g. "auto")
    pub height: String,
}

/// A surface which draws each scene to the same SVG file, overwriting it
pub struct SvgFileSurface {
    path: PathBuf,
    figure: FigureParameters,
}

impl SvgFileSurface {
    /// Create a surface which writes to the given path
    pub fn new(path: PathBuf, figure: FigureParameters) -> Self {
        Self { path, figure }
    }

    /// The path of the SVG file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SceneSurface for SvgFileSurface {
    fn show(&mut self, scene: &Scene) -> Result<()> {
        let svg = scene.to_svg(&self.figure)?;
        fs::write(&self.path, svg)
            .with_context(|| format!("Could not write {}", self.path.display()))
    }
}

/// A surface which writes each scene to a new temporary SVG file.
///
/// The files are kept after the program exits so that whatever displays them can read them.
pub struct TempImageSurface {
    figure: FigureParameters,
    latest: Option<ImageHandle>,
}

impl TempImageSurface {
    /// Create a new surface
    pub fn new(figure: FigureParameters) -> Self {
        Self {
            figure,
            latest: None,
        }
    }

    /// The most recently written image, if any
    pub fn latest(&self) -> Option<&ImageHandle> {
        self.latest.as_ref()
    }
}

impl SceneSurface for TempImageSurface {
    fn show(&mut self, scene: &Scene) -> Result<()> {
        let svg = scene.to_svg(&self.figure)?;
        let mut file = Builder::new()
            .prefix(&format!("migration_map_{}_", scene.year))
            .suffix(".svg")
            .tempfile()
            .context("Failed to create temporary image file")?;
        file.write_all(svg.as_bytes())?;
        let (_, path) = file.keep()?;

        self.latest = Some(ImageHandle {
            path,
            width: self.figure.display_width.clone(),
            height: self.figure.display_height.clone(),
        });

        Ok(())
    }
}
