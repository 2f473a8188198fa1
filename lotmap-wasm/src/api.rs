use crate::{error, http, interop, logging, LotEditor, Shared};
use js_sys::Promise;
use lotmap::api::{decode_mutation, ApiRequest, MutationOutcome};
use lotmap::feature::{decode_lots, decode_plots};
use lotmap::form::{LotForm, PlotForm};
use lotmap::model::PlotId;
use lotmap::motion::Direction;
use lotmap::{
    ClipboardPhase, DrawTarget, EditorConfig, EditorError, Geometry, KeyInput, LonLat, LotAttributes,
    LotId, ShapeKey, ShapeKind,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Sends `tracing` output to the browser console. `level` is one of
/// error, warn, info, debug, trace (default info).
#[wasm_bindgen]
pub fn init_logging(level: Option<String>) -> bool {
    logging::init(level.as_deref())
}

fn from_js<T: DeserializeOwned>(param: &str, v: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(v).map_err(|e| error::invalid_arg(param, e.to_string()))
}

fn point(lon: f64, lat: f64) -> Result<LonLat, JsValue> {
    if !lon.is_finite() {
        return Err(error::non_finite("lon"));
    }
    if !lat.is_finite() {
        return Err(error::non_finite("lat"));
    }
    Ok(LonLat::new(lon, lat))
}

/// `null`/`undefined` for empty map, a lot id number, `"draft"`, or a
/// serialized `ShapeKey`.
fn hit_key(hit: JsValue) -> Result<Option<ShapeKey>, JsValue> {
    if hit.is_null() || hit.is_undefined() {
        return Ok(None);
    }
    if let Some(n) = hit.as_f64() {
        if n.fract() != 0.0 || n < 0.0 || n > u32::MAX as f64 {
            return Err(error::invalid_arg("hit", "lot id must be a non-negative integer"));
        }
        return Ok(Some(ShapeKey::Lot(n as LotId)));
    }
    from_js("hit", hit).map(Some)
}

fn draw_args(target: &str, kind: &str) -> Result<(DrawTarget, ShapeKind), JsValue> {
    let target = match target {
        "lot" => DrawTarget::Lot,
        "plot" => DrawTarget::Plot,
        _ => return Err(error::invalid_arg("target", "expected 'lot' or 'plot'")),
    };
    let kind = match kind {
        "polygon" => ShapeKind::Polygon,
        "rectangle" => ShapeKind::Rectangle,
        _ => return Err(error::invalid_arg("kind", "expected 'polygon' or 'rectangle'")),
    };
    Ok((target, kind))
}

fn direction(dir: &str) -> Option<Direction> {
    Direction::from_key(dir).or_else(|| serde_json::from_value(serde_json::Value::String(dir.to_string())).ok())
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn resolved(v: JsValue) -> Promise {
    Promise::resolve(&v)
}

// Async flows. The session is only borrowed between awaits.

fn api_base(inner: &Shared) -> String {
    inner.borrow().config().api_base.clone()
}

async fn mutate(inner: &Shared, req: &ApiRequest) -> Result<MutationOutcome, EditorError> {
    let (status, body) = http::send(&api_base(inner), req).await?;
    Ok(decode_mutation(status, body)?)
}

async fn reload_lots(inner: &Shared, req: ApiRequest) -> Result<u32, EditorError> {
    let body = http::fetch_json(&api_base(inner), &req).await?;
    let features = decode_lots(body)?;
    let mut session = inner.borrow_mut();
    session.lots_loaded(features);
    Ok(session.store().lot_count() as u32)
}

async fn reload_plots(inner: &Shared, req: ApiRequest) -> Result<u32, EditorError> {
    let body = http::fetch_json(&api_base(inner), &req).await?;
    let features = decode_plots(body)?;
    let mut session = inner.borrow_mut();
    session.plots_loaded(features);
    Ok(session.plots().len() as u32)
}

fn outcome_id(outcome: MutationOutcome) -> JsValue {
    outcome.id.map_or(JsValue::NULL, |id| JsValue::from_f64(id as f64))
}

/// Reloads after a finished mutation. A failure here is reported on its
/// own; the mutation already succeeded.
fn spawn_lot_reload(inner: Shared, req: ApiRequest) {
    spawn_local(async move {
        if let Err(e) = reload_lots(&inner, req).await {
            error::report("cargar los lotes", &e);
        }
    });
}

fn spawn_plot_reload(inner: Shared, req: ApiRequest) {
    spawn_local(async move {
        if let Err(e) = reload_plots(&inner, req).await {
            error::report("cargar los fraccionamientos", &e);
        }
    });
}

async fn create_lot(inner: Shared, prepared: Result<(PlotId, ApiRequest), EditorError>) -> Result<JsValue, EditorError> {
    let (plot, req) = prepared?;
    let outcome = mutate(&inner, &req).await?;
    let reload = inner.borrow_mut().lot_created(plot);
    spawn_lot_reload(inner, reload);
    Ok(outcome_id(outcome))
}

async fn update_lot(
    inner: Shared,
    prepared: Result<(LotId, LotAttributes, ApiRequest), EditorError>,
) -> Result<JsValue, EditorError> {
    let (id, attributes, req) = prepared?;
    mutate(&inner, &req).await?;
    let reload = inner.borrow_mut().lot_updated(id, attributes);
    spawn_lot_reload(inner, reload);
    Ok(JsValue::from_f64(id as f64))
}

async fn delete_lot(inner: Shared, id: LotId, req: ApiRequest) -> Result<JsValue, EditorError> {
    mutate(&inner, &req).await?;
    let reload = inner.borrow_mut().lot_deleted(id);
    spawn_lot_reload(inner, reload);
    Ok(JsValue::TRUE)
}

async fn save_plot(inner: Shared, prepared: Result<ApiRequest, EditorError>) -> Result<JsValue, EditorError> {
    let req = prepared?;
    let outcome = mutate(&inner, &req).await?;
    let reload = inner.borrow_mut().plot_saved();
    spawn_plot_reload(inner, reload);
    Ok(outcome_id(outcome))
}

async fn delete_plot(inner: Shared, id: PlotId, req: ApiRequest) -> Result<JsValue, EditorError> {
    mutate(&inner, &req).await?;
    let reload = inner.borrow_mut().plot_deleted(id);
    spawn_plot_reload(inner, reload);
    Ok(JsValue::TRUE)
}

/// Resolves to an envelope; failures are also logged and alerted.
fn settle(action: &'static str, fut: impl std::future::Future<Output = Result<JsValue, EditorError>> + 'static) -> Promise {
    future_to_promise(async move {
        Ok(match fut.await {
            Ok(v) => error::ok(v),
            Err(e) => error::report(action, &e),
        })
    })
}

#[wasm_bindgen]
impl LotEditor {
    /// `config` may be `undefined`/`null` for defaults or a partial
    /// `EditorConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<LotEditor, JsValue> {
        let config: EditorConfig = if config.is_null() || config.is_undefined() {
            EditorConfig::default()
        } else {
            from_js("config", config)?
        };
        Ok(crate::LotEditor::rs_new(config))
    }

    pub fn config(&self) -> JsValue {
        interop::to_js(self.inner.borrow().config())
    }

    /// Render commands queued since the last call, oldest first.
    pub fn drain_commands(&self) -> JsValue {
        let cmds = self.inner.borrow_mut().drain_commands();
        interop::to_js(&cmds)
    }

    // Selection
    pub fn select(&self, id: u32) -> bool {
        self.inner.borrow_mut().select(id)
    }
    pub fn select_res(&self, id: u32) -> JsValue {
        if self.inner.borrow().store().lot(id).is_none() {
            return error::invalid_arg("id", format!("unknown lot {}", id));
        }
        error::ok(JsValue::from_bool(self.inner.borrow_mut().select(id)))
    }
    pub fn deselect(&self) -> bool {
        self.inner.borrow_mut().deselect()
    }
    pub fn selected(&self) -> Option<u32> {
        self.inner.borrow().selected()
    }
    pub fn map_click(&self, lon: f64, lat: f64, hit: JsValue) -> bool {
        match (point(lon, lat), hit_key(hit)) {
            (Ok(at), Ok(hit)) => self.inner.borrow_mut().map_click(at, hit),
            _ => false,
        }
    }
    pub fn map_click_res(&self, lon: f64, lat: f64, hit: JsValue) -> JsValue {
        let at = match point(lon, lat) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let hit = match hit_key(hit) {
            Ok(h) => h,
            Err(e) => return e,
        };
        error::ok(JsValue::from_bool(self.inner.borrow_mut().map_click(at, hit)))
    }

    // Moving
    pub fn handle_down(&self) -> bool {
        self.inner.borrow_mut().handle_down()
    }
    pub fn handle_move(&self, lon: f64, lat: f64) -> bool {
        match point(lon, lat) {
            Ok(at) => self.inner.borrow_mut().handle_move(at),
            Err(_) => false,
        }
    }
    pub fn handle_move_res(&self, lon: f64, lat: f64) -> JsValue {
        match point(lon, lat) {
            Ok(at) => error::ok(JsValue::from_bool(self.inner.borrow_mut().handle_move(at))),
            Err(e) => e,
        }
    }
    pub fn handle_up(&self) -> bool {
        self.inner.borrow_mut().handle_up()
    }
    pub fn is_dragging(&self) -> bool {
        self.inner.borrow().move_state() == lotmap::motion::MoveState::DraggingHandle
    }
    /// `dir` is an arrow key name or up/down/left/right.
    pub fn nudge(&self, dir: &str, large: bool) -> bool {
        match direction(dir) {
            Some(d) => self.inner.borrow_mut().nudge(d, large),
            None => false,
        }
    }
    pub fn nudge_res(&self, dir: &str, large: bool) -> JsValue {
        match direction(dir) {
            Some(d) => error::ok(JsValue::from_bool(self.inner.borrow_mut().nudge(d, large))),
            None => error::invalid_arg("dir", format!("unknown direction '{}'", dir)),
        }
    }

    /// True when the key was consumed; the page should `preventDefault`.
    pub fn key_down(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        let input = KeyInput { key: key.to_string(), ctrl, shift };
        self.inner.borrow_mut().key_down(&input)
    }

    // Clipboard
    pub fn copy(&self) -> bool {
        self.inner.borrow_mut().copy()
    }
    pub fn paste(&self) -> bool {
        self.inner.borrow_mut().paste()
    }
    pub fn cancel_paste(&self) -> bool {
        self.inner.borrow_mut().cancel_paste()
    }
    pub fn is_pasting(&self) -> bool {
        self.inner.borrow().is_pasting()
    }
    pub fn clipboard_phase(&self) -> String {
        match self.inner.borrow().clipboard_phase() {
            ClipboardPhase::Empty => "empty",
            ClipboardPhase::Holding => "holding",
            ClipboardPhase::Pasting => "pasting",
        }
        .to_string()
    }
    pub fn cursor(&self) -> String {
        self.inner.borrow().cursor().to_string()
    }

    // Drawing
    pub fn draw_created(&self, target: &str, kind: &str, geometry: JsValue) -> bool {
        let Ok((target, kind)) = draw_args(target, kind) else { return false };
        let Ok(geometry) = from_js::<Geometry>("geometry", geometry) else { return false };
        self.inner.borrow_mut().draw_created(target, kind, geometry)
    }
    pub fn draw_created_res(&self, target: &str, kind: &str, geometry: JsValue) -> JsValue {
        let (target, kind) = match draw_args(target, kind) {
            Ok(v) => v,
            Err(e) => return e,
        };
        let geometry = match from_js::<Geometry>("geometry", geometry) {
            Ok(g) => g,
            Err(e) => return e,
        };
        error::ok(JsValue::from_bool(self.inner.borrow_mut().draw_created(target, kind, geometry)))
    }
    pub fn geometry_edited(&self, hit: JsValue, geometry: JsValue) -> bool {
        let Ok(Some(key)) = hit_key(hit) else { return false };
        let Ok(geometry) = from_js::<Geometry>("geometry", geometry) else { return false };
        self.inner.borrow_mut().geometry_edited(key, geometry)
    }
    pub fn draft(&self) -> JsValue {
        match self.inner.borrow().draft() {
            Some(rec) => {
                let o = interop::new_obj();
                interop::set_kv(&o, "geometry", &interop::to_js(&rec.geometry));
                interop::set_kv(&o, "attributes", &interop::to_js(&rec.attributes));
                o.into()
            }
            None => JsValue::NULL,
        }
    }

    // Plots
    pub fn edit_plot(&self, id: Option<u32>) -> JsValue {
        match self.inner.borrow_mut().edit_plot(id) {
            Some(form) => interop::to_js(&form),
            None => JsValue::NULL,
        }
    }
    pub fn plot_filter(&self) -> Option<u32> {
        self.inner.borrow().plot_filter()
    }

    /// Installs a lot FeatureCollection fetched by the page itself.
    pub fn apply_lots_res(&self, collection: JsValue) -> JsValue {
        let body = match from_js::<serde_json::Value>("collection", collection) {
            Ok(v) => v,
            Err(e) => return e,
        };
        match decode_lots(body) {
            Ok(features) => {
                let mut session = self.inner.borrow_mut();
                session.lots_loaded(features);
                error::ok(JsValue::from_f64(session.store().lot_count() as f64))
            }
            Err(e) => error::editor(&EditorError::from(e)),
        }
    }
    pub fn apply_plots_res(&self, collection: JsValue) -> JsValue {
        let body = match from_js::<serde_json::Value>("collection", collection) {
            Ok(v) => v,
            Err(e) => return e,
        };
        match decode_plots(body) {
            Ok(features) => {
                let mut session = self.inner.borrow_mut();
                session.plots_loaded(features);
                error::ok(JsValue::from_f64(session.plots().len() as f64))
            }
            Err(e) => error::editor(&EditorError::from(e)),
        }
    }

    // Backend
    pub fn load_plots(&self) -> Promise {
        let inner = self.inner.clone();
        settle("cargar los fraccionamientos", async move {
            let n = reload_plots(&inner, lotmap::api::list_plots()).await?;
            Ok(JsValue::from_f64(n as f64))
        })
    }
    pub fn load_lots(&self) -> Promise {
        let inner = self.inner.clone();
        let req = inner.borrow().reload_request();
        settle("cargar los lotes", async move {
            let n = reload_lots(&inner, req).await?;
            Ok(JsValue::from_f64(n as f64))
        })
    }
    /// Shows one plot's lots, or all lots for `None`.
    pub fn filter_plot(&self, id: Option<u32>) -> Promise {
        let inner = self.inner.clone();
        let req = inner.borrow_mut().filter_plot(id);
        settle("cargar los lotes", async move {
            let n = reload_lots(&inner, req).await?;
            Ok(JsValue::from_f64(n as f64))
        })
    }
    pub fn save_lot(&self, form: JsValue) -> Promise {
        let form: LotForm = match from_js("form", form) {
            Ok(f) => f,
            Err(e) => return resolved(e),
        };
        let prepared = self.inner.borrow().create_lot_request(&form);
        settle("guardar el lote", create_lot(self.inner.clone(), prepared))
    }
    /// After a vertex edit: offers to save the selected lot's new shape with
    /// the current form values. Resolves `{ok:true, value:false}` when
    /// nothing is selected or the prompt is declined.
    pub fn save_edited_shape(&self, form: JsValue) -> Promise {
        if self.inner.borrow().selected().is_none()
            || !confirm("¿Deseas guardar la nueva forma del lote seleccionado?")
        {
            return resolved(error::ok(JsValue::FALSE));
        }
        self.update_lot(form)
    }
    pub fn update_lot(&self, form: JsValue) -> Promise {
        let form: LotForm = match from_js("form", form) {
            Ok(f) => f,
            Err(e) => return resolved(e),
        };
        let prepared = self.inner.borrow().update_lot_request(&form);
        settle("actualizar el lote", update_lot(self.inner.clone(), prepared))
    }
    /// Asks for confirmation first; a declined prompt resolves `{ok:true, value:false}`.
    pub fn delete_lot(&self) -> Promise {
        let prepared = self.inner.borrow().delete_lot_request();
        let (id, req) = match prepared {
            Ok(v) => v,
            Err(e) => return resolved(error::report("eliminar el lote", &e)),
        };
        if !confirm("¿Eliminar este lote?") {
            return resolved(error::ok(JsValue::FALSE));
        }
        settle("eliminar el lote", delete_lot(self.inner.clone(), id, req))
    }
    pub fn save_plot(&self, form: JsValue) -> Promise {
        let form: PlotForm = match from_js("form", form) {
            Ok(f) => f,
            Err(e) => return resolved(e),
        };
        let prepared = self.inner.borrow().save_plot_request(&form);
        settle("guardar el fraccionamiento", save_plot(self.inner.clone(), prepared))
    }
    pub fn delete_plot(&self) -> Promise {
        let (id, req) = match self.inner.borrow().delete_plot_request() {
            Ok(v) => v,
            Err(e) => return resolved(error::report("eliminar el fraccionamiento", &e)),
        };
        if !confirm("¿Eliminar fraccionamiento seleccionado? (Debe no tener lotes)") {
            return resolved(error::ok(JsValue::FALSE));
        }
        settle("eliminar el fraccionamiento", delete_plot(self.inner.clone(), id, req))
    }
}
