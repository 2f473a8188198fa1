use crate::error::ApiError;
use crate::geometry::bounds::detect_kind;
use crate::geometry::coords::Geometry;
use crate::model::{
    Financing, LotAttributes, LotId, LotStatus, Plot, PlotId, ShapeKey, ShapeRecord,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Feature<P> {
    #[serde(rename = "type", default = "feature_tag")]
    pub tag: String,
    pub geometry: Geometry,
    pub properties: P,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureCollection<P> {
    #[serde(rename = "type", default = "collection_tag")]
    pub tag: String,
    pub features: Vec<Feature<P>>,
}

fn feature_tag() -> String {
    "Feature".to_string()
}

fn collection_tag() -> String {
    "FeatureCollection".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LotProperties {
    pub id: LotId,
    pub numero_lote: String,
    pub manzana: String,
    pub precio: f64,
    pub metros_cuadrados: u32,
    #[serde(default)]
    pub estado: LotStatus,
    pub fraccionamiento_id: PlotId,
    #[serde(default)]
    pub precio_financiado_130: Option<f64>,
    #[serde(default)]
    pub precio_cuota_130: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotProperties {
    pub id: PlotId,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub ciudad_id: Option<u32>,
    #[serde(default)]
    pub ciudad_nombre: Option<String>,
}

pub type LotFeature = Feature<LotProperties>;
pub type PlotFeature = Feature<PlotProperties>;

impl LotFeature {
    /// Lots from the backend arrive as plain GeoJSON polygons; an
    /// axis-aligned box is tracked as a rectangle.
    pub fn into_record(self) -> ShapeRecord {
        let p = self.properties;
        ShapeRecord {
            key: ShapeKey::Lot(p.id),
            kind: detect_kind(&self.geometry),
            geometry: self.geometry,
            attributes: LotAttributes {
                numero_lote: p.numero_lote,
                manzana: p.manzana,
                precio: p.precio,
                metros_cuadrados: p.metros_cuadrados,
                estado: p.estado,
                fraccionamiento_id: p.fraccionamiento_id,
            },
            financing: Financing {
                precio_financiado_130: p.precio_financiado_130,
                precio_cuota_130: p.precio_cuota_130,
            },
        }
    }
}

impl PlotFeature {
    pub fn into_plot(self) -> Plot {
        let p = self.properties;
        Plot {
            id: p.id,
            nombre: p.nombre,
            descripcion: p.descripcion.unwrap_or_default(),
            ciudad_id: p.ciudad_id,
            ciudad_nombre: p.ciudad_nombre.unwrap_or_default(),
            geometry: self.geometry,
        }
    }
}

fn decode_collection<P: DeserializeOwned>(v: Value) -> Result<Vec<Feature<P>>, ApiError> {
    serde_json::from_value::<FeatureCollection<P>>(v)
        .map(|fc| fc.features)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

pub fn decode_lots(v: Value) -> Result<Vec<LotFeature>, ApiError> {
    decode_collection(v)
}

pub fn decode_plots(v: Value) -> Result<Vec<PlotFeature>, ApiError> {
    decode_collection(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_lot_collection() {
        let v = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]},
                "properties": {
                    "id": 4, "numero_lote": "12", "manzana": "M3", "precio": 50000000.0,
                    "precio_financiado_130": null, "precio_cuota_130": 1200000.0,
                    "metros_cuadrados": 360, "estado": "vendido", "fraccionamiento_id": 2
                }
            }]
        });
        let lots = decode_lots(v).unwrap();
        assert_eq!(lots.len(), 1);
        let rec = lots.into_iter().next().unwrap().into_record();
        assert_eq!(rec.key, ShapeKey::Lot(4));
        assert_eq!(rec.attributes.estado, LotStatus::Sold);
        assert_eq!(rec.financing.precio_cuota_130, Some(1200000.0));
        assert_eq!(rec.financing.precio_financiado_130, None);
    }

    #[test]
    fn decodes_plot_with_null_description() {
        let v = json!({"type":"FeatureCollection","features":[{
            "type":"Feature",
            "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]},
            "properties":{"id":1,"nombre":"Las Lomas","descripcion":null,"ciudad_id":null,"ciudad_nombre":""}
        }]});
        let plot = decode_plots(v).unwrap().remove(0).into_plot();
        assert_eq!(plot.nombre, "Las Lomas");
        assert_eq!(plot.descripcion, "");
    }

    #[test]
    fn rejects_non_collections() {
        assert!(matches!(decode_lots(json!({"error": "boom"})), Err(ApiError::Decode(_))));
    }
}
