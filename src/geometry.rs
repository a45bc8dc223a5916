//! The geometry index, which maps each city to the point its flows are drawn from.
use crate::city::{CityID, CityMap};
use geo::{BoundingRect, Coord, Point, Rect};
use indexmap::IndexMap;

/// Lookup table from city ID to the city's projected centroid.
///
/// Built once from the city boundaries and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryIndex(IndexMap<CityID, Point<f64>>);

impl GeometryIndex {
    /// Build the index from a set of cities
    pub fn from_cities(cities: &CityMap) -> Self {
        Self(
            cities
                .iter()
                .map(|(id, city)| (id.clone(), city.centroid))
                .collect(),
        )
    }

    /// Get the centroid for the city with the given ID, if known
    pub fn get(&self, id: &str) -> Option<Point<f64>> {
        self.0.get(id).copied()
    }

    /// Whether the index contains the given city
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// The number of cities in the index
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(CityID, Point<f64>)> for GeometryIndex {
    fn from_iter<I: IntoIterator<Item = (CityID, Point<f64>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The smallest rectangle enclosing the boundaries of all cities.
///
/// Returns `None` if there are no cities.
pub fn cities_extent(cities: &CityMap) -> Option<Rect<f64>> {
    cities
        .values()
        .filter_map(|city| city.boundary.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                },
            )
        })
}
