use crate::geometry::bounds::{centroid, rebuild};
use crate::geometry::coords::Geometry;
use crate::geometry::translate::translate_by;
use crate::model::{LonLat, LotAttributes, LotId, LotStatus, ShapeKind, ShapeRecord};

/// Frozen copy of a lot taken by `copy`.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipboardSnapshot {
    pub source: LotId,
    pub geometry: Geometry,
    /// Bounding-box center at copy time.
    pub centroid: LonLat,
    pub attributes: LotAttributes,
    pub kind: ShapeKind,
}

impl ClipboardSnapshot {
    /// None when the record is not a persisted lot or has no positions.
    pub fn capture(record: &ShapeRecord) -> Option<ClipboardSnapshot> {
        let source = record.key.lot_id()?;
        Some(ClipboardSnapshot {
            source,
            geometry: record.geometry.clone(),
            centroid: centroid(&record.geometry)?,
            attributes: record.attributes.clone(),
            kind: record.kind,
        })
    }

    /// The snapshot's geometry moved so its centroid lands on `at`, rebuilt
    /// in the structure of the original shape kind.
    pub fn place_at(&self, at: LonLat) -> Geometry {
        let moved = translate_by(&self.geometry, at.offset_from(self.centroid));
        rebuild(self.kind, &moved)
    }

    /// Attributes for a pasted lot: successor number, status reset.
    pub fn pasted_attributes(&self) -> LotAttributes {
        LotAttributes {
            numero_lote: next_lot_number(&self.attributes.numero_lote),
            estado: LotStatus::Available,
            ..self.attributes.clone()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipboardPhase {
    Empty,
    Holding,
    Pasting,
}

#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    snapshot: Option<ClipboardSnapshot>,
    /// Cursor to restore when the armed paste ends.
    armed: Option<String>,
}

impl Clipboard {
    pub fn phase(&self) -> ClipboardPhase {
        match (&self.snapshot, &self.armed) {
            (None, _) => ClipboardPhase::Empty,
            (Some(_), None) => ClipboardPhase::Holding,
            (Some(_), Some(_)) => ClipboardPhase::Pasting,
        }
    }

    pub fn snapshot(&self) -> Option<&ClipboardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_pasting(&self) -> bool {
        self.phase() == ClipboardPhase::Pasting
    }

    /// Stores a new snapshot. An armed paste is left armed and will use it.
    pub fn store(&mut self, snapshot: ClipboardSnapshot) {
        self.snapshot = Some(snapshot);
    }

    /// Holding -> Pasting. False when empty or already pasting.
    pub fn arm(&mut self, prior_cursor: &str) -> bool {
        if self.phase() != ClipboardPhase::Holding {
            return false;
        }
        self.armed = Some(prior_cursor.to_string());
        true
    }

    /// Pasting -> Holding, handing back the cursor to restore.
    pub fn disarm(&mut self) -> Option<String> {
        self.armed.take()
    }
}

/// Successor of a lot number: a trailing run of digits is incremented as
/// an integer (`A1` -> `A2`, `L09` -> `L10`, `L007` -> `L8`), anything
/// else gets `-1` appended.
pub fn next_lot_number(base: &str) -> String {
    let prefix_len = base.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (prefix, digits) = base.split_at(prefix_len);
    if digits.is_empty() {
        return format!("{}-1", base);
    }
    format!("{}{}", prefix, increment_decimal(digits.trim_start_matches('0')))
}

/// Adds one to a decimal string of any length.
fn increment_decimal(digits: &str) -> String {
    let mut out: Vec<u8> = digits.bytes().collect();
    let mut i = out.len();
    loop {
        if i == 0 {
            out.insert(0, b'1');
            break;
        }
        i -= 1;
        if out[i] == b'9' {
            out[i] = b'0';
        } else {
            out[i] += 1;
            break;
        }
    }
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Financing, ShapeKey};

    #[test]
    fn successor_numbers() {
        assert_eq!(next_lot_number("A1"), "A2");
        assert_eq!(next_lot_number("Lote"), "Lote-1");
        assert_eq!(next_lot_number("M3-12"), "M3-13");
        assert_eq!(next_lot_number("19"), "20");
        assert_eq!(next_lot_number("L99"), "L100");
        assert_eq!(next_lot_number("L007"), "L8");
        assert_eq!(next_lot_number("X0"), "X1");
        assert_eq!(next_lot_number(""), "-1");
        assert_eq!(next_lot_number("99999999999999999999999"), "100000000000000000000000");
    }

    #[test]
    fn phases() {
        let mut c = Clipboard::default();
        assert_eq!(c.phase(), ClipboardPhase::Empty);
        assert!(!c.arm(""));
        let rec = ShapeRecord {
            key: ShapeKey::Lot(1),
            geometry: Geometry::polygon(&[LonLat::new(0.0, 0.0), LonLat::new(2.0, 0.0), LonLat::new(2.0, 2.0)]),
            kind: ShapeKind::Polygon,
            attributes: LotAttributes {
                numero_lote: "A1".into(),
                manzana: "A".into(),
                precio: 1.0,
                metros_cuadrados: 1,
                estado: LotStatus::Sold,
                fraccionamiento_id: 1,
            },
            financing: Financing::default(),
        };
        c.store(ClipboardSnapshot::capture(&rec).unwrap());
        assert_eq!(c.phase(), ClipboardPhase::Holding);
        assert!(c.arm("grab"));
        assert!(!c.arm("x"));
        assert_eq!(c.phase(), ClipboardPhase::Pasting);
        assert_eq!(c.disarm().as_deref(), Some("grab"));
        assert_eq!(c.phase(), ClipboardPhase::Holding);
        let attrs = c.snapshot().unwrap().pasted_attributes();
        assert_eq!(attrs.numero_lote, "A2");
        assert_eq!(attrs.estado, LotStatus::Available);
    }

    #[test]
    fn drafts_cannot_be_captured() {
        let rec = ShapeRecord {
            key: ShapeKey::Draft,
            geometry: Geometry::polygon(&[LonLat::new(0.0, 0.0), LonLat::new(1.0, 1.0), LonLat::new(1.0, 0.0)]),
            kind: ShapeKind::Polygon,
            attributes: LotAttributes {
                numero_lote: "1".into(),
                manzana: "A".into(),
                precio: 1.0,
                metros_cuadrados: 1,
                estado: LotStatus::Available,
                fraccionamiento_id: 1,
            },
            financing: Financing::default(),
        };
        assert!(ClipboardSnapshot::capture(&rec).is_none());
    }
}
