use crate::error::FormError;
use crate::geometry::coords::Geometry;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub type LotId = u32;
pub type PlotId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 255 }
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v * 16 + v;
                }
                Some(Color::rgb(out[0], out[1], out[2]))
            }
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: byte(6)? }),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| de::Error::custom(format!("invalid color '{}'", s)))
    }
}

/// Path options understood by the map adapter (stroke + fill).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub color: Color,
    pub weight: f32,
    pub fill_opacity: f32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fill_color: Option<Color>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> LonLat {
        LonLat { lon, lat }
    }

    /// Offset that carries `from` onto `self`.
    pub fn offset_from(&self, from: LonLat) -> LonLat {
        LonLat { lon: self.lon - from.lon, lat: self.lat - from.lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LotStatus {
    #[default]
    #[serde(rename = "disponible")]
    Available,
    #[serde(rename = "reservado")]
    Reserved,
    #[serde(rename = "vendido")]
    Sold,
}

impl LotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotStatus::Available => "disponible",
            LotStatus::Reserved => "reservado",
            LotStatus::Sold => "vendido",
        }
    }
}

impl fmt::Display for LotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LotStatus {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "disponible" => Ok(LotStatus::Available),
            "reservado" => Ok(LotStatus::Reserved),
            "vendido" => Ok(LotStatus::Sold),
            other => Err(FormError::InvalidStatus(other.to_string())),
        }
    }
}

/// Sale attributes of a lot, independent of its geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LotAttributes {
    pub numero_lote: String,
    pub manzana: String,
    pub precio: f64,
    pub metros_cuadrados: u32,
    pub estado: LotStatus,
    pub fraccionamiento_id: PlotId,
}

/// Financing figures some lots carry; display only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Financing {
    pub precio_financiado_130: Option<f64>,
    pub precio_cuota_130: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Polygon,
    Rectangle,
}

/// Stable identity of a shape, independent of whatever object the map
/// library uses to draw it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKey {
    Lot(LotId),
    Draft,
}

impl ShapeKey {
    pub fn lot_id(&self) -> Option<LotId> {
        match self {
            ShapeKey::Lot(id) => Some(*id),
            ShapeKey::Draft => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeRecord {
    pub key: ShapeKey,
    pub geometry: Geometry,
    pub kind: ShapeKind,
    pub attributes: LotAttributes,
    pub financing: Financing,
}

/// A fractionation plot as listed by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub id: PlotId,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub ciudad_id: Option<u32>,
    #[serde(default)]
    pub ciudad_nombre: String,
    pub geometry: Geometry,
}
