use crate::model::LonLat;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
}

/// GeoJSON coordinates: a single position or any depth of nested arrays.
///
/// Positions are kept as plain number lists so that a third (altitude)
/// component survives a round trip through the editor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinates {
    Nested(Vec<Coordinates>),
    Position(Vec<f64>),
}

impl Coordinates {
    pub fn position(lon: f64, lat: f64) -> Coordinates {
        Coordinates::Position(vec![lon, lat])
    }

    pub fn ring(points: &[LonLat]) -> Coordinates {
        Coordinates::Nested(points.iter().map(|p| Coordinates::position(p.lon, p.lat)).collect())
    }

    /// Visits every leaf position in document order.
    pub fn for_each_position<F: FnMut(&[f64])>(&self, f: &mut F) {
        match self {
            Coordinates::Position(p) => f(p),
            Coordinates::Nested(items) => {
                for item in items {
                    item.for_each_position(f);
                }
            }
        }
    }

    pub fn position_count(&self) -> usize {
        let mut n = 0;
        self.for_each_position(&mut |_| n += 1);
        n
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Coordinates::Position(p) => p.is_empty(),
            Coordinates::Nested(items) => items.iter().all(|c| c.is_empty()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: GeometryType,
    pub coordinates: Coordinates,
}

impl Geometry {
    /// Single-ring polygon. The ring is closed if the caller left it open.
    pub fn polygon(ring: &[LonLat]) -> Geometry {
        let mut points = ring.to_vec();
        if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
            if first != last {
                points.push(*first);
            }
        }
        Geometry {
            kind: GeometryType::Polygon,
            coordinates: Coordinates::Nested(vec![Coordinates::ring(&points)]),
        }
    }

    /// Outer ring of a polygon (or of the first polygon of a multipolygon).
    pub fn outer_ring(&self) -> Option<Vec<LonLat>> {
        let ring = match (self.kind, &self.coordinates) {
            (GeometryType::Polygon, Coordinates::Nested(rings)) => rings.first()?,
            (GeometryType::MultiPolygon, Coordinates::Nested(polys)) => match polys.first()? {
                Coordinates::Nested(rings) => rings.first()?,
                Coordinates::Position(_) => return None,
            },
            _ => return None,
        };
        let Coordinates::Nested(points) = ring else { return None };
        points
            .iter()
            .map(|p| match p {
                Coordinates::Position(v) if v.len() >= 2 => Some(LonLat::new(v[0], v[1])),
                _ => None,
            })
            .collect()
    }

    pub fn position_count(&self) -> usize {
        self.coordinates.position_count()
    }
}
