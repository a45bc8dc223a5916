//! Reprojection of boundary coordinates into the planar map projection.
//!
//! All maps are drawn in Web Mercator (EPSG:3857), the projection used for web map tiles.
use anyhow::{Result, ensure};
use geo::{Coord, MapCoords, MultiPolygon};
use serde_string_enum::DeserializeLabeledStringEnum;
use std::f64::consts::FRAC_PI_4;

/// Semi-major axis of the WGS84 ellipsoid in metres, as used by Web Mercator
const EARTH_RADIUS: f64 = 6_378_137.0;

/// The maximum latitude representable in Web Mercator
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

/// A coordinate reference system that boundary data may be supplied in
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, DeserializeLabeledStringEnum)]
pub enum Crs {
    /// Longitude/latitude in degrees on the WGS84 datum
    #[default]
    #[string = "epsg:4326"]
    Wgs84,
    /// Web Mercator in metres
    #[string = "epsg:3857"]
    WebMercator,
}

/// Project a single longitude/latitude coordinate (degrees) into Web Mercator
pub fn lon_lat_to_web_mercator(coord: Coord<f64>) -> Result<Coord<f64>> {
    let Coord { x: lon, y: lat } = coord;
    ensure!(
        lon.is_finite() && (-180.0..=180.0).contains(&lon),
        "Longitude {lon} is outside the range -180 to 180"
    );
    ensure!(
        lat.is_finite() && (-MAX_MERCATOR_LATITUDE..=MAX_MERCATOR_LATITUDE).contains(&lat),
        "Latitude {lat} cannot be represented in Web Mercator"
    );

    Ok(Coord {
        x: EARTH_RADIUS * lon.to_radians(),
        y: EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln(),
    })
}

/// Check that an already-projected coordinate is usable
fn check_finite(coord: Coord<f64>) -> Result<Coord<f64>> {
    ensure!(
        coord.x.is_finite() && coord.y.is_finite(),
        "Coordinate ({}, {}) is not finite",
        coord.x,
        coord.y
    );

    Ok(coord)
}

/// Reproject a boundary from the given CRS into Web Mercator
pub fn to_web_mercator(boundary: &MultiPolygon<f64>, crs: Crs) -> Result<MultiPolygon<f64>> {
    match crs {
        Crs::Wgs84 => boundary.try_map_coords(lon_lat_to_web_mercator),
        Crs::WebMercator => boundary.try_map_coords(check_finite),
    }
}
