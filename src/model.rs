//! The model represents the static data for a map: cities, classified flows and parameters.
use crate::city::CityMap;
use crate::classify::{BinEdges, is_defined};
use crate::flow::{ClassifiedSegment, FlowRecord, build_segments};
use crate::geometry::GeometryIndex;
use crate::input::{read_cities, read_flows};
use crate::scene::{Scene, render};
use anyhow::{Context, Result, bail, ensure};
use itertools::{Itertools, MinMaxResult};
use log::{info, warn};
use std::ops::RangeInclusive;
use std::path::Path;

pub mod parameters;
pub use parameters::MapParameters;

/// Static data for a migration map.
///
/// Built once from the input files and never modified afterwards, so it can be shared between
/// any number of controllers.
#[derive(Debug)]
pub struct MapModel {
    /// Parameters from the map file
    pub parameters: MapParameters,
    /// The cities, with boundaries and centroids
    pub cities: CityMap,
    /// Centroids for all cities
    pub index: GeometryIndex,
    /// One classified segment per flow record, in input order
    pub segments: Vec<ClassifiedSegment>,
    /// The earliest and latest years in the flow data
    pub years: RangeInclusive<u32>,
}

impl MapModel {
    /// Read a map from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `map_dir` - Folder containing map input files
    pub fn from_path<P: AsRef<Path>>(map_dir: P) -> Result<MapModel> {
        let map_dir = map_dir.as_ref();
        let parameters = MapParameters::from_path(map_dir)?;
        let cities = read_cities(map_dir, parameters.crs)?;
        let flows = read_flows(map_dir)?;

        let model = Self::new(parameters, cities, &flows)
            .with_context(|| format!("Invalid map in {}", map_dir.display()))?;
        info!(
            "Loaded {} cities and {} flows for {}-{}",
            model.cities.len(),
            model.segments.len(),
            model.years.start(),
            model.years.end()
        );

        Ok(model)
    }

    /// Derive a model from parameters, cities and flow records.
    ///
    /// Fails if there are no flows, if any flow refers to an unknown city or if the default year is
    /// outside the range of years in the data.
    pub fn new(parameters: MapParameters, cities: CityMap, flows: &[FlowRecord]) -> Result<Self> {
        let years = match flows.iter().map(|flow| flow.year).minmax() {
            MinMaxResult::NoElements => bail!("No flow records provided"),
            MinMaxResult::OneElement(year) => year..=year,
            MinMaxResult::MinMax(min, max) => min..=max,
        };

        if let Some(year) = parameters.default_year {
            ensure!(
                years.contains(&year),
                "default_year {year} is outside the range of years in the flow data ({}-{})",
                years.start(),
                years.end()
            );
        }

        warn_undefined_intensities(flows, parameters.bin_edges);

        let index = GeometryIndex::from_cities(&cities);
        let segments = build_segments(flows, &index, parameters.bin_edges)?;

        Ok(Self {
            parameters,
            cities,
            index,
            segments,
            years,
        })
    }

    /// The year to show before the user selects one
    pub fn default_year(&self) -> u32 {
        self.parameters
            .default_year
            .unwrap_or_else(|| *self.years.start())
    }

    /// All years which have at least one flow, in ascending order
    pub fn flow_years(&self) -> Vec<u32> {
        self.segments
            .iter()
            .map(|segment| segment.year)
            .sorted_unstable()
            .dedup()
            .collect()
    }

    /// Render the scene for the given year
    pub fn render(&self, year: u32) -> Scene {
        render(year, &self.segments, &self.cities, &self.parameters.title)
    }
}

/// Warn about flows whose intensity falls outside every defined bin
fn warn_undefined_intensities(flows: &[FlowRecord], edges: BinEdges) {
    let count = flows
        .iter()
        .filter(|flow| !is_defined(flow.intensity, edges))
        .count();
    if count > 0 {
        warn!(
            "{count} flow record(s) have an intensity outside the defined ranges and will be \
            drawn with the fallback style"
        );
    }
}
