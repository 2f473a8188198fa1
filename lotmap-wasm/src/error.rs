use crate::interop::{new_obj, set_kv};
use lotmap::EditorError;
use tracing::error;
use wasm_bindgen::JsValue;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn invalid_arg(param: &str, message: impl Into<String>) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("invalid_argument", message, Some(d.into()))
}

/// Envelope for an editor error; form errors name the offending field.
pub fn editor(e: &EditorError) -> JsValue {
    let data = match e {
        EditorError::Form(f) => {
            let d = new_obj(); set_kv(&d, "field", &JsValue::from_str(f.field()));
            Some(d.into())
        }
        _ => None,
    };
    err(e.code(), e.to_string(), data)
}

/// Logs the failure, shows the blocking alert, and returns its envelope.
pub fn report(action: &str, e: &EditorError) -> JsValue {
    error!(action, code = e.code(), "{}", e);
    if let Some(w) = web_sys::window() {
        let _ = w.alert_with_message(&format!("Error al {}: {}", action, e));
    }
    editor(e)
}
