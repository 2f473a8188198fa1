use crate::error::FormError;
use crate::model::{LotAttributes, LotStatus};
use serde::{Deserialize, Serialize};

/// The lot data-entry form as the page holds it: every field is raw text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotForm {
    pub numero_lote: String,
    pub manzana: String,
    pub precio: String,
    pub metros_cuadrados: String,
    pub estado: String,
    pub fraccionamiento_id: String,
}

impl LotForm {
    pub fn from_attributes(a: &LotAttributes) -> LotForm {
        LotForm {
            numero_lote: a.numero_lote.clone(),
            manzana: a.manzana.clone(),
            precio: a.precio.to_string(),
            metros_cuadrados: a.metros_cuadrados.to_string(),
            estado: a.estado.as_str().to_string(),
            fraccionamiento_id: a.fraccionamiento_id.to_string(),
        }
    }

    /// Converts the text fields into lot attributes, rejecting the first
    /// field that does not hold a usable value.
    pub fn validate(&self) -> Result<LotAttributes, FormError> {
        let numero_lote = self.numero_lote.trim();
        if numero_lote.is_empty() {
            return Err(FormError::MissingLotNumber);
        }
        let manzana = self.manzana.trim();
        if manzana.is_empty() {
            return Err(FormError::MissingBlock);
        }
        let precio = self
            .precio
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or_else(|| FormError::InvalidPrice(self.precio.clone()))?;
        let metros_cuadrados = self
            .metros_cuadrados
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|m| *m > 0)
            .ok_or_else(|| FormError::InvalidArea(self.metros_cuadrados.clone()))?;
        let estado = if self.estado.trim().is_empty() {
            LotStatus::Available
        } else {
            self.estado.parse::<LotStatus>()?
        };
        let fraccionamiento_id = self
            .fraccionamiento_id
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(FormError::MissingPlot)?;
        Ok(LotAttributes {
            numero_lote: numero_lote.to_string(),
            manzana: manzana.to_string(),
            precio,
            metros_cuadrados,
            estado,
            fraccionamiento_id,
        })
    }
}

/// Fractionation plot form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotForm {
    pub nombre: String,
    pub descripcion: String,
    pub ciudad_id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlotFields {
    pub nombre: String,
    pub descripcion: String,
    pub ciudad_id: Option<u32>,
}

impl PlotForm {
    pub fn validate(&self) -> Result<PlotFields, FormError> {
        let nombre = self.nombre.trim();
        if nombre.is_empty() {
            return Err(FormError::MissingPlotName);
        }
        let ciudad = self.ciudad_id.trim();
        let ciudad_id = if ciudad.is_empty() {
            None
        } else {
            Some(ciudad.parse::<u32>().map_err(|_| FormError::InvalidCity(self.ciudad_id.clone()))?)
        };
        Ok(PlotFields {
            nombre: nombre.to_string(),
            descripcion: self.descripcion.trim().to_string(),
            ciudad_id,
        })
    }
}
