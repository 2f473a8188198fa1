//! Requests the editor sends to the backend and decoding of its replies.
//!
//! Building a request is pure; the bindings crate performs the actual
//! fetch and feeds the JSON body back through [`decode_mutation`].

use crate::error::ApiError;
use crate::form::PlotFields;
use crate::geometry::coords::Geometry;
use crate::model::{LotAttributes, LotId, PlotId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PATCH")]
    Patch,
    #[serde(rename = "DELETE")]
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, path: String, body: Option<Value>) -> ApiRequest {
        ApiRequest { method, path, body }
    }

    /// Absolute URL given the configured base (empty for same origin).
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path)
    }
}

/// Body of lot create/update requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LotPayload {
    #[serde(flatten)]
    pub attributes: LotAttributes,
    pub geojson: Geometry,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotPayload {
    pub nombre: String,
    pub descripcion: String,
    pub ciudad_id: Option<u32>,
    pub geojson: Geometry,
}

impl PlotPayload {
    pub fn new(fields: PlotFields, geojson: Geometry) -> PlotPayload {
        PlotPayload {
            nombre: fields.nombre,
            descripcion: fields.descripcion,
            ciudad_id: fields.ciudad_id,
            geojson,
        }
    }
}

pub fn list_lots(plot: Option<PlotId>) -> ApiRequest {
    let path = match plot {
        Some(id) => format!("/api/lotes?fraccionamiento_id={}", id),
        None => "/api/lotes".to_string(),
    };
    ApiRequest::new(Method::Get, path, None)
}

pub fn list_plots() -> ApiRequest {
    ApiRequest::new(Method::Get, "/api/fraccionamientos".to_string(), None)
}

pub fn create_lot(payload: &LotPayload) -> ApiRequest {
    ApiRequest::new(Method::Post, "/api/admin/lotes".to_string(), serde_json::to_value(payload).ok())
}

pub fn update_lot(id: LotId, payload: &LotPayload) -> ApiRequest {
    ApiRequest::new(Method::Patch, format!("/api/admin/lotes/{}", id), serde_json::to_value(payload).ok())
}

pub fn delete_lot(id: LotId) -> ApiRequest {
    ApiRequest::new(Method::Delete, format!("/api/admin/lotes/{}", id), None)
}

pub fn create_plot(payload: &PlotPayload) -> ApiRequest {
    ApiRequest::new(
        Method::Post,
        "/api/admin/fraccionamientos".to_string(),
        serde_json::to_value(payload).ok(),
    )
}

pub fn update_plot(id: PlotId, payload: &PlotPayload) -> ApiRequest {
    ApiRequest::new(
        Method::Patch,
        format!("/api/admin/fraccionamientos/{}", id),
        serde_json::to_value(payload).ok(),
    )
}

pub fn delete_plot(id: PlotId) -> ApiRequest {
    ApiRequest::new(Method::Delete, format!("/api/admin/fraccionamientos/{}", id), None)
}

/// What a successful create/update/delete reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MutationOutcome {
    pub id: Option<u32>,
}

#[derive(Deserialize)]
struct MutationReply {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    error: Option<String>,
}

/// Decodes the reply to a mutating request. A reply succeeds when it says
/// `ok: true` or carries the new record's `id`; otherwise its `error` text
/// is surfaced.
pub fn decode_mutation(status: u16, body: Value) -> Result<MutationOutcome, ApiError> {
    let reply: Option<MutationReply> = serde_json::from_value(body).ok();
    let success_status = (200..300).contains(&status);
    match reply {
        Some(r) if success_status && (r.ok || r.id.is_some()) => Ok(MutationOutcome { id: r.id }),
        Some(r) => {
            let message = r.error.unwrap_or_else(|| "unknown error".to_string());
            if success_status {
                Err(ApiError::Rejected(message))
            } else {
                Err(ApiError::Status { status, message })
            }
        }
        None if success_status => Err(ApiError::Decode("reply is not an object".to_string())),
        None => Err(ApiError::Status { status, message: "server error".to_string() }),
    }
}

/// Decodes the status of a listing request; the body itself goes through
/// [`crate::feature`].
pub fn check_status(status: u16, body: &Value) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let message = body
        .get("error")
        .and_then(|e| e.as_str())
        .unwrap_or("server error")
        .to_string();
    Err(ApiError::Status { status, message })
}
