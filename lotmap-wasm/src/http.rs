//! Runs an [`ApiRequest`] through `window.fetch`.

use lotmap::api::{check_status, ApiRequest};
use lotmap::ApiError;
use serde_json::Value;
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

fn js_message(v: &JsValue) -> String {
    v.as_string().unwrap_or_else(|| format!("{:?}", v))
}

fn network(v: JsValue) -> ApiError {
    ApiError::Network(js_message(&v))
}

fn build(base: &str, req: &ApiRequest) -> Result<Request, ApiError> {
    let init = RequestInit::new();
    init.set_method(req.method.as_str());
    if let Some(body) = &req.body {
        let headers = Headers::new().map_err(network)?;
        headers.set("Content-Type", "application/json").map_err(network)?;
        init.set_headers(&headers);
        let text = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        init.set_body(&JsValue::from_str(&text));
    }
    Request::new_with_str_and_init(&req.url(base), &init).map_err(network)
}

/// Sends the request and returns the status with the decoded JSON body.
/// A non-JSON body is a decode error on success and `null` otherwise, so
/// server error pages still surface through the status.
pub async fn send(base: &str, req: &ApiRequest) -> Result<(u16, Value), ApiError> {
    let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".to_string()))?;
    let request = build(base, req)?;
    debug!(method = req.method.as_str(), path = %req.path, "fetch");
    let resp: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;
    let status = resp.status();
    let text = JsFuture::from(resp.text().map_err(network)?)
        .await
        .map_err(network)?
        .as_string()
        .unwrap_or_default();
    let body = match serde_json::from_str::<Value>(&text) {
        Ok(v) => v,
        Err(e) if resp.ok() => return Err(ApiError::Decode(e.to_string())),
        Err(_) => {
            warn!(status, path = %req.path, "non-JSON error reply");
            Value::Null
        }
    };
    Ok((status, body))
}

/// GET that must succeed; the body is returned for the caller to decode.
pub async fn fetch_json(base: &str, req: &ApiRequest) -> Result<Value, ApiError> {
    let (status, body) = send(base, req).await?;
    check_status(status, &body)?;
    Ok(body)
}
