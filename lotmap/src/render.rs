use crate::form::LotForm;
use crate::geometry::bounds::Bounds;
use crate::geometry::coords::Geometry;
use crate::model::{Financing, LonLat, LotAttributes, Plot, PlotId, ShapeKey, ShapeKind, ShapeStyle};
use serde::Serialize;

/// Instructions for the page's map adapter. The editor never talks to a
/// mapping library directly; it queues these and the adapter replays them.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Create or regenerate the renderable for `key`, binding its click
    /// handler and tooltip afresh.
    UpsertShape {
        key: ShapeKey,
        kind: ShapeKind,
        geometry: Geometry,
        style: ShapeStyle,
        #[serde(skip_serializing_if = "Option::is_none")]
        popup: Option<String>,
        editable: bool,
    },
    RemoveShape { key: ShapeKey },
    SetStyle { key: ShapeKey, style: ShapeStyle },
    /// Apply `style` for `millis`, then `restore`.
    FlashStyle { key: ShapeKey, style: ShapeStyle, restore: ShapeStyle, millis: u32 },
    PlaceHandle { at: LonLat },
    RemoveHandle,
    SetCursor { cursor: String },
    FillForm { values: LotForm },
    ClearForm,
    UpsertPlot { id: PlotId, geometry: Geometry, style: ShapeStyle, popup: String },
    RemovePlot { id: PlotId },
    SetPlotDraft { geometry: Geometry, style: ShapeStyle },
    RemovePlotDraft,
    FitBounds { bounds: Bounds },
}

/// Tooltip shown on a lot.
pub fn lot_popup(a: &LotAttributes, f: &Financing) -> String {
    let mut s = format!(
        "<b>Manzana:</b> {}<br><b>Lote:</b> {}<br><b>Estado:</b> {}<br><b>Precio:</b> ${}<br><b>Sup:</b> {} m²",
        escape(&a.manzana),
        escape(&a.numero_lote),
        a.estado,
        group_thousands(a.precio),
        a.metros_cuadrados
    );
    if let Some(v) = f.precio_financiado_130 {
        s.push_str(&format!("<br><b>Financiado:</b> ${}", group_thousands(v)));
    }
    if let Some(v) = f.precio_cuota_130 {
        s.push_str(&format!("<br><b>Cuota:</b> ${}", group_thousands(v)));
    }
    s
}

pub fn plot_popup(p: &Plot) -> String {
    format!("<b>{}</b><br>{}", escape(&p.nombre), escape(&p.descripcion))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// `50000000` -> `50.000.000`; fractional amounts keep two decimals.
pub fn group_thousands(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let neg = v < 0.0;
    let cents = (v.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);
    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if frac > 0 {
        grouped.push_str(&format!(",{:02}", frac));
    }
    if neg {
        grouped.insert(0, '-');
    }
    grouped
}
