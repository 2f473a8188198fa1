use super::coords::{Coordinates, Geometry, GeometryType};
use crate::model::{LonLat, ShapeKind};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Bounds {
    pub fn from_point(p: LonLat) -> Bounds {
        Bounds { west: p.lon, south: p.lat, east: p.lon, north: p.lat }
    }

    pub fn extend(&mut self, p: LonLat) {
        self.west = self.west.min(p.lon);
        self.east = self.east.max(p.lon);
        self.south = self.south.min(p.lat);
        self.north = self.north.max(p.lat);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }

    pub fn center(&self) -> LonLat {
        LonLat::new((self.west + self.east) / 2.0, (self.south + self.north) / 2.0)
    }

    /// Closed ring SW, NW, NE, SE, SW.
    pub fn ring(&self) -> Vec<LonLat> {
        vec![
            LonLat::new(self.west, self.south),
            LonLat::new(self.west, self.north),
            LonLat::new(self.east, self.north),
            LonLat::new(self.east, self.south),
            LonLat::new(self.west, self.south),
        ]
    }
}

/// Bounding box over every position with at least two components.
pub fn bounds(g: &Geometry) -> Option<Bounds> {
    coordinates_bounds(&g.coordinates)
}

pub fn coordinates_bounds(c: &Coordinates) -> Option<Bounds> {
    let mut out: Option<Bounds> = None;
    c.for_each_position(&mut |p| {
        if p.len() < 2 {
            return;
        }
        let pt = LonLat::new(p[0], p[1]);
        match out.as_mut() {
            Some(b) => b.extend(pt),
            None => out = Some(Bounds::from_point(pt)),
        }
    });
    out
}

/// Center of the bounding box; the anchor used by the move handle and by
/// paste placement.
pub fn centroid(g: &Geometry) -> Option<LonLat> {
    bounds(g).map(|b| b.center())
}

/// Rebuilds a geometry in the structure its shape kind requires. A
/// rectangle becomes the axis-aligned box around its points; polygons are
/// returned unchanged.
pub fn rebuild(kind: ShapeKind, g: &Geometry) -> Geometry {
    match kind {
        ShapeKind::Polygon => g.clone(),
        ShapeKind::Rectangle => match bounds(g) {
            Some(b) => Geometry {
                kind: GeometryType::Polygon,
                coordinates: Coordinates::Nested(vec![Coordinates::ring(&b.ring())]),
            },
            None => g.clone(),
        },
    }
}

/// Rectangle when `g` is a hole-free polygon whose closed ring has four
/// corners joined by axis-aligned edges; polygon otherwise.
pub fn detect_kind(g: &Geometry) -> ShapeKind {
    let single_ring = matches!(&g.coordinates, Coordinates::Nested(rings) if rings.len() == 1);
    if g.kind != GeometryType::Polygon || !single_ring {
        return ShapeKind::Polygon;
    }
    let Some(ring) = g.outer_ring() else { return ShapeKind::Polygon };
    if ring.len() != 5 || ring[0] != ring[4] {
        return ShapeKind::Polygon;
    }
    let corners = &ring[..4];
    let distinct = |vals: Vec<f64>| {
        let mut v = vals;
        v.sort_by(|a, b| a.total_cmp(b));
        v.dedup();
        v.len()
    };
    let lons = distinct(corners.iter().map(|p| p.lon).collect());
    let lats = distinct(corners.iter().map(|p| p.lat).collect());
    let axis_edges = ring.windows(2).all(|w| (w[0].lon == w[1].lon) != (w[0].lat == w[1].lat));
    if lons == 2 && lats == 2 && axis_edges {
        ShapeKind::Rectangle
    } else {
        ShapeKind::Polygon
    }
}
