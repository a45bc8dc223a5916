//! Cities are the nodes of the migration map, each with a boundary and a centroid.
use crate::id::{define_id_getter, define_id_type};
use anyhow::{Context, Result};
use geo::{Centroid, MultiPolygon, Point};
use indexmap::IndexMap;

define_id_type! {CityID}

/// A map of [`City`]s, keyed by city ID, in the order they were read
pub type CityMap = IndexMap<CityID, City>;

/// A city, with its boundary in the projected map plane
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    /// Unique identifier for the city (e.g. "Shanghai")
    pub id: CityID,
    /// The geometric centre of the city's boundary
    pub centroid: Point<f64>,
    /// The city's boundary
    pub boundary: MultiPolygon<f64>,
}
define_id_getter! {City, CityID}

impl City {
    /// Create a new [`City`], computing its centroid from its boundary.
    ///
    /// Fails if the boundary has no area and no extent from which to derive a centre.
    pub fn new(id: CityID, boundary: MultiPolygon<f64>) -> Result<Self> {
        let centroid = boundary
            .centroid()
            .with_context(|| format!("Boundary of city {id} is empty"))?;

        Ok(Self {
            id,
            centroid,
            boundary,
        })
    }
}
