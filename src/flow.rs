//! Migration flows between pairs of cities and the segments used to draw them.
use crate::city::CityID;
use crate::classify::{BinEdges, FlowClass, classify};
use crate::geometry::GeometryIndex;
use anyhow::{Context, Result};
use geo::Point;
use itertools::Itertools;
use serde::Deserialize;

/// The migration intensity between a pair of cities in a given year
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlowRecord {
    /// The first city of the pair
    pub city1: CityID,
    /// The second city of the pair
    pub city2: CityID,
    /// The year the intensity applies to
    pub year: u32,
    /// The migration intensity (average migration index)
    #[serde(rename = "avg_migration_index")]
    pub intensity: f64,
}

/// A straight line between two city centroids, styled according to the flow's class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedSegment {
    /// The centroid of the first city
    pub origin: Point<f64>,
    /// The centroid of the second city
    pub destination: Point<f64>,
    /// The year of the flow
    pub year: u32,
    /// The class the flow's intensity falls into
    pub class: FlowClass,
    /// The stroke width to draw the segment with
    pub width: f64,
}

impl ClassifiedSegment {
    /// Create a new segment, classifying the given intensity
    pub fn new(
        origin: Point<f64>,
        destination: Point<f64>,
        year: u32,
        intensity: f64,
        edges: BinEdges,
    ) -> Self {
        let class = classify(intensity, edges);
        Self {
            origin,
            destination,
            year,
            class,
            width: class.width(),
        }
    }
}

/// Look up a city's centroid, failing if the city is unknown
fn resolve(index: &GeometryIndex, id: &CityID) -> Result<Point<f64>> {
    index
        .get(id.0.as_ref())
        .with_context(|| format!("Unknown city ID {id} found"))
}

/// Build the segments for every flow record.
///
/// The output has one segment per record, in the same order as the input. If any record refers to
/// a city which is not in `index`, the whole operation fails.
///
/// # Arguments
///
/// * `records` - The flow records
/// * `index` - Centroids for all known cities
/// * `edges` - The bin-edge convention to classify intensities with
pub fn build_segments(
    records: &[FlowRecord],
    index: &GeometryIndex,
    edges: BinEdges,
) -> Result<Vec<ClassifiedSegment>> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| -> Result<_> {
            let resolve_endpoints = || -> Result<_> {
                Ok((resolve(index, &record.city1)?, resolve(index, &record.city2)?))
            };
            let (origin, destination) = resolve_endpoints().with_context(|| {
                format!(
                    "Invalid flow record {} ({} to {}, {})",
                    idx + 1,
                    record.city1,
                    record.city2,
                    record.year
                )
            })?;

            Ok(ClassifiedSegment::new(
                origin,
                destination,
                record.year,
                record.intensity,
                edges,
            ))
        })
        .try_collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, geometry_index};
    use rstest::rstest;

    fn record(city1: &str, city2: &str, year: u32, intensity: f64) -> FlowRecord {
        FlowRecord {
            city1: city1.into(),
            city2: city2.into(),
            year,
            intensity,
        }
    }

    #[rstest]
    fn test_build_segments(geometry_index: GeometryIndex) {
        let records = [
            record("A", "B", 2020, 150.0),
            record("B", "C", 2020, 1200.0),
            record("A", "C", 2021, 5000.0),
        ];
        let segments = build_segments(&records, &geometry_index, BinEdges::default()).unwrap();
        assert_eq!(segments.len(), records.len());
        assert_eq!(
            segments[0],
            ClassifiedSegment {
                origin: Point::new(0.0, 0.0),
                destination: Point::new(10.0, 0.0),
                year: 2020,
                class: FlowClass::Neutral,
                width: 0.3,
            }
        );
        assert_eq!(segments[1].class, FlowClass::Medium);
        assert_eq!(segments[2].class, FlowClass::High);
        assert_eq!(segments[2].width, FlowClass::High.width());
        assert_eq!(segments[2].year, 2021);
    }

    #[rstest]
    fn test_build_segments_undefined_intensity(geometry_index: GeometryIndex) {
        let records = [record("A", "B", 2020, -5.0), record("A", "B", 2020, 9000.0)];
        let segments = build_segments(&records, &geometry_index, BinEdges::default()).unwrap();
        assert!(segments.iter().all(|s| s.class == FlowClass::Undefined));
    }

    #[rstest]
    fn test_build_segments_empty(geometry_index: GeometryIndex) {
        assert!(
            build_segments(&[], &geometry_index, BinEdges::default())
                .unwrap()
                .is_empty()
        );
    }

    #[rstest]
    #[case(record("A", "Z", 2020, 1.0))]
    #[case(record("Z", "B", 2020, 1.0))]
    fn test_build_segments_unknown_city(geometry_index: GeometryIndex, #[case] bad: FlowRecord) {
        let records = [record("A", "B", 2020, 1.0), bad];
        assert_error!(
            build_segments(&records, &geometry_index, BinEdges::default()),
            format!(
                "Invalid flow record 2 ({} to {}, 2020)",
                records[1].city1, records[1].city2
            )
        );
    }
}
