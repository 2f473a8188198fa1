use super::coords::{Coordinates, Geometry};
use crate::model::LonLat;

/// Returns a copy of `geometry` with every position shifted by
/// `(dlon, dlat)`. Nesting depth and lengths are preserved; a position
/// shorter than two numbers is shifted on the axes it has.
pub fn translate(geometry: &Geometry, dlon: f64, dlat: f64) -> Geometry {
    Geometry {
        kind: geometry.kind,
        coordinates: translate_coordinates(&geometry.coordinates, dlon, dlat),
    }
}

pub fn translate_by(geometry: &Geometry, offset: LonLat) -> Geometry {
    translate(geometry, offset.lon, offset.lat)
}

pub fn translate_coordinates(coords: &Coordinates, dlon: f64, dlat: f64) -> Coordinates {
    match coords {
        Coordinates::Nested(items) => Coordinates::Nested(
            items.iter().map(|c| translate_coordinates(c, dlon, dlat)).collect(),
        ),
        Coordinates::Position(p) => {
            let mut out = p.clone();
            if let Some(x) = out.get_mut(0) {
                *x += dlon;
            }
            if let Some(y) = out.get_mut(1) {
                *y += dlat;
            }
            Coordinates::Position(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::coords::GeometryType;
    use serde_json::json;

    #[test]
    fn keeps_altitude() {
        let g: Geometry = serde_json::from_value(json!({"type":"Point","coordinates":[1.0, 2.0, 30.0]})).unwrap();
        let t = translate(&g, 0.5, -0.5);
        assert_eq!(t.coordinates, Coordinates::Position(vec![1.5, 1.5, 30.0]));
    }

    #[test]
    fn input_is_untouched() {
        let g = Geometry::polygon(&[LonLat::new(0.0, 0.0), LonLat::new(1.0, 0.0), LonLat::new(1.0, 1.0)]);
        let before = g.clone();
        let t = translate(&g, 2.0, 3.0);
        assert_eq!(g, before);
        assert_eq!(t.kind, GeometryType::Polygon);
        assert_eq!(t.outer_ring().unwrap()[2], LonLat::new(3.0, 4.0));
    }

    #[test]
    fn short_positions_shift_what_they_have() {
        let c = Coordinates::Nested(vec![Coordinates::Position(vec![1.0]), Coordinates::Position(vec![])]);
        let t = translate_coordinates(&c, 1.0, 1.0);
        assert_eq!(t, Coordinates::Nested(vec![Coordinates::Position(vec![2.0]), Coordinates::Position(vec![])]));
    }
}
