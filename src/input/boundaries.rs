//! Code for reading city boundaries from a CSV file of polygon vertices.
use super::*;
use crate::city::{City, CityID, CityMap};
use crate::id::HasID;
use crate::projection::{Crs, to_web_mercator};
use anyhow::{Context, Result, ensure};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

const BOUNDARIES_FILE_NAME: &str = "boundaries.csv";

/// A single vertex of a city boundary
#[derive(Deserialize, PartialEq, Debug)]
struct BoundaryVertexRaw {
    city_id: String,
    part: u32,
    x: f64,
    y: f64,
}

/// Read city boundaries from the map directory and project them into the map plane.
///
/// # Arguments
///
/// * `map_dir` - Folder containing map input files
/// * `crs` - The coordinate reference system the vertices are given in
///
/// # Returns
///
/// The cities in the order in which they first appear in the file, or an error.
pub fn read_cities(map_dir: &Path, crs: Crs) -> Result<CityMap> {
    let file_path = map_dir.join(BOUNDARIES_FILE_NAME);
    let vertices = read_csv(&file_path)?;
    read_cities_from_iter(vertices, crs).with_context(|| input_err_msg(&file_path))
}

/// Assemble cities from an iterator of boundary vertices.
///
/// Vertices are grouped by city and part, keeping their order within the file. Each part is the
/// exterior ring of one polygon.
fn read_cities_from_iter<I>(iter: I, crs: Crs) -> Result<CityMap>
where
    I: Iterator<Item = BoundaryVertexRaw>,
{
    let mut rings: IndexMap<String, IndexMap<u32, Vec<Coord<f64>>>> = IndexMap::new();
    for vertex in iter {
        rings
            .entry(vertex.city_id)
            .or_default()
            .entry(vertex.part)
            .or_default()
            .push(Coord {
                x: vertex.x,
                y: vertex.y,
            });
    }

    let mut cities = CityMap::new();
    for (city_id, parts) in rings {
        let city = build_city(city_id.into(), parts, crs)?;
        let id = city.get_id().clone();
        cities.insert(id, city);
    }

    Ok(cities)
}

/// Build a single city from its boundary parts
fn build_city(id: CityID, parts: IndexMap<u32, Vec<Coord<f64>>>, crs: Crs) -> Result<City> {
    ensure!(!id.0.trim().is_empty(), "City ID cannot be empty");

    let mut polygons = Vec::with_capacity(parts.len());
    for (part, mut coords) in parts {
        // The ring may or may not repeat its first vertex at the end
        if coords.len() > 1 && coords.first() == coords.last() {
            coords.pop();
        }
        ensure!(
            coords.len() >= 3,
            "Part {part} of city {id} must have at least three distinct vertices"
        );
        polygons.push(Polygon::new(LineString::new(coords), vec![]));
    }

    let boundary = to_web_mercator(&MultiPolygon::new(polygons), crs)
        .with_context(|| format!("Invalid boundary for city {id}"))?;

    City::new(id, boundary)
}
