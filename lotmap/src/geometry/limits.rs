// Bounds applied when a geometry leaves the editor for the backend

use super::coords::Geometry;
use crate::error::GeometryError;

pub const MAX_POSITIONS: usize = 100_000;

pub const LON_MIN: f64 = -180.0;
pub const LON_MAX: f64 = 180.0;
pub const LAT_MIN: f64 = -90.0;
pub const LAT_MAX: f64 = 90.0;

#[inline]
pub fn in_lon_bounds(x: f64) -> bool { x.is_finite() && (LON_MIN..=LON_MAX).contains(&x) }

#[inline]
pub fn in_lat_bounds(y: f64) -> bool { y.is_finite() && (LAT_MIN..=LAT_MAX).contains(&y) }

/// Checks a geometry before it is submitted. The translator itself never
/// validates; this is the only gate.
pub fn validate_geometry(g: &Geometry) -> Result<(), GeometryError> {
    if g.coordinates.is_empty() {
        return Err(GeometryError::Empty);
    }
    let count = g.position_count();
    if count > MAX_POSITIONS {
        return Err(GeometryError::TooManyPositions { count, max: MAX_POSITIONS });
    }
    let mut index = 0usize;
    let mut failure: Option<GeometryError> = None;
    g.coordinates.for_each_position(&mut |p| {
        if failure.is_none() {
            failure = check_position(index, p).err();
        }
        index += 1;
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn check_position(index: usize, p: &[f64]) -> Result<(), GeometryError> {
    if p.len() < 2 {
        return Err(GeometryError::ShortPosition { index });
    }
    if p.iter().any(|v| !v.is_finite()) {
        return Err(GeometryError::NonFinite { index });
    }
    if !in_lon_bounds(p[0]) || !in_lat_bounds(p[1]) {
        return Err(GeometryError::OutOfRange { index, lon: p[0], lat: p[1] });
    }
    Ok(())
}
