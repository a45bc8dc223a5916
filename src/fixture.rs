//! Fixtures for tests

use crate::city::{City, CityID, CityMap};
use crate::classify::BinEdges;
use crate::flow::{ClassifiedSegment, FlowRecord, build_segments};
use crate::geometry::GeometryIndex;
use crate::model::MapModel;
use crate::model::parameters::MapParameters;
use geo::{MultiPolygon, Rect, coord};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// A 2x2 square boundary centred on the given point
pub fn square(x: f64, y: f64) -> MultiPolygon<f64> {
    let rect = Rect::new(coord! { x: x - 1.0, y: y - 1.0 }, coord! { x: x + 1.0, y: y + 1.0 });
    MultiPolygon::new(vec![rect.to_polygon()])
}

/// Create a city whose centroid is at the given point
pub fn city(id: &str, x: f64, y: f64) -> City {
    City::new(id.into(), square(x, y)).unwrap()
}

/// Three cities: A at (0, 0), B at (10, 0) and C at (5, 10)
#[fixture]
pub fn cities() -> CityMap {
    [city("A", 0.0, 0.0), city("B", 10.0, 0.0), city("C", 5.0, 10.0)]
        .into_iter()
        .map(|city| (city.id.clone(), city))
        .collect()
}

#[fixture]
pub fn geometry_index(cities: CityMap) -> GeometryIndex {
    GeometryIndex::from_cities(&cities)
}

#[fixture]
pub fn flow_records() -> Vec<FlowRecord> {
    [
        ("A", "B", 2020, 150.0),
        ("A", "C", 2020, 800.0),
        ("B", "C", 2020, 12_000.0),
        ("A", "B", 2021, 5000.0),
        ("B", "C", 2022, 1000.0),
    ]
    .into_iter()
    .map(|(city1, city2, year, intensity)| FlowRecord {
        city1: CityID::new(city1),
        city2: CityID::new(city2),
        year,
        intensity,
    })
    .collect()
}

#[fixture]
pub fn segments(
    flow_records: Vec<FlowRecord>,
    geometry_index: GeometryIndex,
) -> Vec<ClassifiedSegment> {
    build_segments(&flow_records, &geometry_index, BinEdges::default()).unwrap()
}

#[fixture]
pub fn map_model(cities: CityMap, flow_records: Vec<FlowRecord>) -> MapModel {
    MapModel::new(MapParameters::default(), cities, &flow_records).unwrap()
}
