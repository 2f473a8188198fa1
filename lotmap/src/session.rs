use crate::api::{self, ApiRequest, LotPayload, PlotPayload};
use crate::clipboard::{Clipboard, ClipboardPhase, ClipboardSnapshot};
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::feature::{LotFeature, PlotFeature};
use crate::form::{LotForm, PlotForm};
use crate::geometry::bounds::{bounds, centroid, rebuild};
use crate::geometry::coords::Geometry;
use crate::geometry::limits::validate_geometry;
use crate::geometry::tolerance::{near_zero, EPS_DEG};
use crate::geometry::translate::translate_by;
use crate::layers::ShapeStore;
use crate::model::{
    Financing, LonLat, LotAttributes, LotId, LotStatus, Plot, PlotId, ShapeKey, ShapeKind,
    ShapeRecord, ShapeStyle,
};
use crate::motion::{Direction, MoveController, MoveState};
use crate::render::{lot_popup, plot_popup, RenderCommand};
use crate::selection::Selection;
use crate::style;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const CROSSHAIR: &str = "crosshair";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawTarget {
    Lot,
    Plot,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: &str) -> KeyInput {
        KeyInput { key: key.to_string(), ..Default::default() }
    }

    pub fn with_ctrl(mut self) -> KeyInput {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> KeyInput {
        self.shift = true;
        self
    }
}

/// All editor state of one map screen.
///
/// Every handler runs to completion synchronously and records what the map
/// should show as [`RenderCommand`]s; the page drains them after each call.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    store: ShapeStore,
    selection: Selection,
    motion: MoveController,
    clipboard: Clipboard,
    cursor: String,
    draft_seq: u32,
    plots: Vec<Plot>,
    plot_draft: Option<Geometry>,
    editing_plot: Option<PlotId>,
    plot_filter: Option<PlotId>,
    commands: Vec<RenderCommand>,
}

impl Default for EditorSession {
    fn default() -> Self {
        EditorSession::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> EditorSession {
        EditorSession {
            config: config.sanitized(),
            store: ShapeStore::new(),
            selection: Selection::default(),
            motion: MoveController::default(),
            clipboard: Clipboard::default(),
            cursor: String::new(),
            draft_seq: 0,
            plots: Vec::new(),
            plot_draft: None,
            editing_plot: None,
            plot_filter: None,
            commands: Vec::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn selected(&self) -> Option<LotId> {
        self.selection.current()
    }

    pub fn selected_record(&self) -> Option<&ShapeRecord> {
        self.selection.current().and_then(|id| self.store.lot(id))
    }

    pub fn draft(&self) -> Option<&ShapeRecord> {
        self.store.draft()
    }

    pub fn move_state(&self) -> MoveState {
        self.motion.state()
    }

    pub fn clipboard_phase(&self) -> ClipboardPhase {
        self.clipboard.phase()
    }

    pub fn clipboard(&self) -> Option<&ClipboardSnapshot> {
        self.clipboard.snapshot()
    }

    pub fn is_pasting(&self) -> bool {
        self.clipboard.is_pasting()
    }

    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    pub fn plot_draft(&self) -> Option<&Geometry> {
        self.plot_draft.as_ref()
    }

    pub fn plot_filter(&self) -> Option<PlotId> {
        self.plot_filter
    }

    pub fn drain_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    fn push(&mut self, cmd: RenderCommand) {
        self.commands.push(cmd);
    }

    fn style_of(&self, key: ShapeKey) -> Option<ShapeStyle> {
        match key {
            ShapeKey::Draft => self.store.draft().map(|_| style::draft()),
            ShapeKey::Lot(id) => {
                let status = self.store.lot(id)?.attributes.estado;
                Some(if self.selection.is_selected(id) {
                    style::selected(status)
                } else {
                    style::for_status(status)
                })
            }
        }
    }

    /// Regenerates the renderable of `key` from its record.
    fn emit_shape(&mut self, key: ShapeKey) {
        let Some(style) = self.style_of(key) else { return };
        let Some(rec) = self.store.get(key) else { return };
        let popup = match key {
            ShapeKey::Lot(_) => Some(lot_popup(&rec.attributes, &rec.financing)),
            ShapeKey::Draft => None,
        };
        let cmd = RenderCommand::UpsertShape {
            key,
            kind: rec.kind,
            geometry: rec.geometry.clone(),
            style,
            popup,
            editable: self.store.is_editable(key),
        };
        self.push(cmd);
    }

    fn place_handle(&mut self, id: LotId) {
        if let Some(at) = self.store.lot(id).and_then(|r| centroid(&r.geometry)) {
            self.push(RenderCommand::PlaceHandle { at });
        }
    }

    fn form_for(&self, attributes: &LotAttributes) -> LotForm {
        let mut form = LotForm::from_attributes(attributes);
        if attributes.fraccionamiento_id == 0 {
            form.fraccionamiento_id.clear();
        }
        form
    }

    // Selection

    /// Selects a persisted lot. Returns false for unknown ids.
    pub fn select(&mut self, id: LotId) -> bool {
        let Some(attributes) = self.store.lot(id).map(|r| r.attributes.clone()) else {
            return false;
        };
        if let Some(prev) = self.selection.replace(id) {
            self.motion.end_drag();
            if let Some(style) = self.style_of(ShapeKey::Lot(prev)) {
                self.push(RenderCommand::SetStyle { key: ShapeKey::Lot(prev), style });
            }
        }
        let key = ShapeKey::Lot(id);
        if self.store.make_editable(key) {
            self.emit_shape(key);
        } else if let Some(style) = self.style_of(key) {
            self.push(RenderCommand::SetStyle { key, style });
        }
        self.place_handle(id);
        let form = self.form_for(&attributes);
        self.push(RenderCommand::FillForm { values: form });
        self.plot_filter = Some(attributes.fraccionamiento_id);
        debug!(lot = id, "lot selected");
        true
    }

    pub fn deselect(&mut self) -> bool {
        let Some(prev) = self.selection.clear() else { return false };
        self.motion.end_drag();
        if let Some(style) = self.style_of(ShapeKey::Lot(prev)) {
            self.push(RenderCommand::SetStyle { key: ShapeKey::Lot(prev), style });
        }
        self.push(RenderCommand::RemoveHandle);
        self.push(RenderCommand::ClearForm);
        debug!(lot = prev, "lot deselected");
        true
    }

    /// A click on the map. `hit` is the shape under the pointer, if any.
    /// While a paste is armed the click places the paste instead. Only
    /// persisted lots are selectable; a click on the draft counts as a
    /// click on the map.
    pub fn map_click(&mut self, at: LonLat, hit: Option<ShapeKey>) -> bool {
        if self.clipboard.is_pasting() {
            return self.paste_at(at);
        }
        match hit {
            Some(ShapeKey::Lot(id)) => self.select(id),
            Some(ShapeKey::Draft) | None => self.deselect(),
        }
    }

    // Moving

    pub fn handle_down(&mut self) -> bool {
        self.motion.begin_drag(self.selection.current().is_some())
    }

    /// Handle dragged to `at`: the selected lot follows so its centroid
    /// sits under the handle.
    pub fn handle_move(&mut self, at: LonLat) -> bool {
        let Some(id) = self.selection.current() else { return false };
        let Some(current) = self.store.lot(id).and_then(|r| centroid(&r.geometry)) else {
            return false;
        };
        match self.motion.drag_offset(at, current) {
            Some(offset) => self.apply_offset(id, offset),
            None => false,
        }
    }

    pub fn handle_up(&mut self) -> bool {
        self.motion.end_drag()
    }

    pub fn nudge(&mut self, dir: Direction, large: bool) -> bool {
        let Some(id) = self.selection.current() else { return false };
        match self.motion.nudge_offset(dir, large, &self.config) {
            Some(offset) => self.apply_offset(id, offset),
            None => false,
        }
    }

    fn apply_offset(&mut self, id: LotId, offset: LonLat) -> bool {
        if near_zero(offset.lon, EPS_DEG) && near_zero(offset.lat, EPS_DEG) {
            return false;
        }
        let Some(moved) = self.store.lot(id).map(|r| translate_by(&r.geometry, offset)) else {
            return false;
        };
        let key = ShapeKey::Lot(id);
        self.store.set_geometry(key, moved);
        self.store.make_editable(key);
        self.emit_shape(key);
        self.place_handle(id);
        debug!(lot = id, dlon = offset.lon, dlat = offset.lat, "lot moved");
        true
    }

    // Keyboard

    /// Returns true when the key was consumed and the page should
    /// suppress its default action.
    pub fn key_down(&mut self, key: &KeyInput) -> bool {
        if key.ctrl {
            match key.key.as_str() {
                "c" | "C" => {
                    self.copy();
                    return true;
                }
                "v" | "V" => {
                    self.paste();
                    return true;
                }
                _ => {}
            }
        }
        if key.key == "Escape" {
            return self.cancel_paste();
        }
        match Direction::from_key(&key.key) {
            Some(dir) => self.nudge(dir, key.shift),
            None => false,
        }
    }

    // Clipboard

    pub fn copy(&mut self) -> bool {
        let Some(rec) = self.selected_record() else { return false };
        let Some(snapshot) = ClipboardSnapshot::capture(rec) else { return false };
        let key = rec.key;
        self.clipboard.store(snapshot);
        if let Some(current) = self.style_of(key) {
            self.push(RenderCommand::FlashStyle {
                key,
                style: style::copy_flash(current),
                restore: current,
                millis: self.config.copy_flash_ms,
            });
        }
        debug!(?key, "lot copied");
        true
    }

    /// Arms paste mode: the next map click places the clipboard contents.
    pub fn paste(&mut self) -> bool {
        if !self.clipboard.arm(&self.cursor) {
            return false;
        }
        self.cursor = CROSSHAIR.to_string();
        self.push(RenderCommand::SetCursor { cursor: CROSSHAIR.to_string() });
        debug!("paste armed");
        true
    }

    pub fn cancel_paste(&mut self) -> bool {
        let Some(prior) = self.clipboard.disarm() else { return false };
        self.cursor = prior.clone();
        self.push(RenderCommand::SetCursor { cursor: prior });
        true
    }

    fn paste_at(&mut self, at: LonLat) -> bool {
        let Some(snapshot) = self.clipboard.snapshot().cloned() else {
            self.cancel_paste();
            return false;
        };
        if !at.is_finite() {
            self.cancel_paste();
            return false;
        }
        let attributes = snapshot.pasted_attributes();
        let record = ShapeRecord {
            key: ShapeKey::Draft,
            geometry: snapshot.place_at(at),
            kind: snapshot.kind,
            attributes: attributes.clone(),
            financing: Financing::default(),
        };
        self.install_draft(record);
        self.push(RenderCommand::FlashStyle {
            key: ShapeKey::Draft,
            style: style::paste_flash(),
            restore: style::draft(),
            millis: self.config.paste_flash_ms,
        });
        let form = self.form_for(&attributes);
        self.push(RenderCommand::FillForm { values: form });
        self.cancel_paste();
        debug!(source = snapshot.source, numero = %attributes.numero_lote, "lot pasted");
        true
    }

    // Drafts

    fn install_draft(&mut self, record: ShapeRecord) {
        if self.store.install_draft(record).is_some() {
            self.push(RenderCommand::RemoveShape { key: ShapeKey::Draft });
        }
        self.emit_shape(ShapeKey::Draft);
    }

    /// A shape finished drawing with the map's drawing tools.
    pub fn draw_created(&mut self, target: DrawTarget, kind: ShapeKind, geometry: Geometry) -> bool {
        if geometry.coordinates.is_empty() {
            return false;
        }
        let geometry = rebuild(kind, &geometry);
        match target {
            DrawTarget::Lot => {
                self.draft_seq += 1;
                let attributes = LotAttributes {
                    numero_lote: format!("L{}", self.draft_seq),
                    manzana: self.config.default_block.clone(),
                    precio: self.config.default_price,
                    metros_cuadrados: self.config.default_area,
                    estado: LotStatus::Available,
                    fraccionamiento_id: self.plot_filter.unwrap_or(0),
                };
                let form = self.form_for(&attributes);
                self.install_draft(ShapeRecord {
                    key: ShapeKey::Draft,
                    geometry,
                    kind,
                    attributes,
                    financing: Financing::default(),
                });
                self.push(RenderCommand::FillForm { values: form });
            }
            DrawTarget::Plot => {
                if self.plot_draft.is_some() {
                    self.push(RenderCommand::RemovePlotDraft);
                }
                self.plot_draft = Some(geometry.clone());
                self.push(RenderCommand::SetPlotDraft { geometry, style: style::plot_draft() });
            }
        }
        debug!(?target, ?kind, "shape drawn");
        true
    }

    /// Vertex edits made with the drawing tools.
    pub fn geometry_edited(&mut self, key: ShapeKey, geometry: Geometry) -> bool {
        if !self.store.set_geometry(key, geometry) {
            return false;
        }
        self.emit_shape(key);
        if let ShapeKey::Lot(id) = key {
            if self.selection.is_selected(id) {
                self.place_handle(id);
            }
        }
        true
    }

    // Loading

    /// Replaces the displayed lots. Selection, drag and the editable group
    /// are reset; a pending draft survives.
    pub fn lots_loaded(&mut self, features: Vec<LotFeature>) {
        let removed = self.store.replace_lots(features.into_iter().map(LotFeature::into_record));
        for id in removed {
            self.push(RenderCommand::RemoveShape { key: ShapeKey::Lot(id) });
        }
        self.motion.end_drag();
        if self.selection.clear().is_some() {
            self.push(RenderCommand::RemoveHandle);
        }
        let keys: Vec<ShapeKey> = self.store.lots().map(|r| r.key).collect();
        for key in keys {
            self.emit_shape(key);
        }
        info!(count = self.store.lot_count(), "lots loaded");
    }

    pub fn plots_loaded(&mut self, features: Vec<PlotFeature>) {
        for p in std::mem::take(&mut self.plots) {
            self.push(RenderCommand::RemovePlot { id: p.id });
        }
        self.plots = features.into_iter().map(PlotFeature::into_plot).collect();
        let upserts: Vec<RenderCommand> = self
            .plots
            .iter()
            .map(|p| RenderCommand::UpsertPlot {
                id: p.id,
                geometry: p.geometry.clone(),
                style: style::plot(),
                popup: plot_popup(p),
            })
            .collect();
        let all = self.plots.iter().filter_map(|p| bounds(&p.geometry)).reduce(|a, b| a.union(&b));
        for cmd in upserts {
            self.push(cmd);
        }
        if let Some(bounds) = all {
            self.push(RenderCommand::FitBounds { bounds });
        }
        info!(count = self.plots.len(), "plots loaded");
    }

    /// Filters the lot layer to one plot (or all) and returns the listing
    /// request to run.
    pub fn filter_plot(&mut self, plot: Option<PlotId>) -> ApiRequest {
        self.plot_filter = plot;
        let target = match plot {
            Some(id) => self.plots.iter().find(|p| p.id == id).and_then(|p| bounds(&p.geometry)),
            None => self
                .plots
                .iter()
                .filter_map(|p| bounds(&p.geometry))
                .reduce(|a, b| a.union(&b)),
        };
        if let Some(bounds) = target {
            self.push(RenderCommand::FitBounds { bounds });
        }
        api::list_lots(plot)
    }

    /// Loads an existing plot into the plot draft for editing; `None`
    /// clears it. Returns the values for the plot form.
    pub fn edit_plot(&mut self, plot: Option<PlotId>) -> Option<PlotForm> {
        if self.plot_draft.take().is_some() {
            self.push(RenderCommand::RemovePlotDraft);
        }
        self.editing_plot = None;
        let p = self.plots.iter().find(|p| Some(p.id) == plot)?.clone();
        self.editing_plot = Some(p.id);
        self.plot_draft = Some(p.geometry.clone());
        self.push(RenderCommand::SetPlotDraft { geometry: p.geometry.clone(), style: style::plot_draft() });
        if let Some(bounds) = bounds(&p.geometry) {
            self.push(RenderCommand::FitBounds { bounds });
        }
        Some(PlotForm {
            nombre: p.nombre,
            descripcion: p.descripcion,
            ciudad_id: p.ciudad_id.map(|c| c.to_string()).unwrap_or_default(),
        })
    }

    pub fn reload_request(&self) -> ApiRequest {
        api::list_lots(self.plot_filter)
    }

    // Submitting

    /// POST for the draft, or for the selected lot when nothing is drafted.
    /// Returns the plot the lot is saved into along with the request.
    pub fn create_lot_request(&self, form: &LotForm) -> Result<(PlotId, ApiRequest), EditorError> {
        let target = self
            .store
            .draft()
            .or_else(|| self.selected_record())
            .ok_or(EditorError::NoTarget)?;
        let attributes = form.validate()?;
        validate_geometry(&target.geometry)?;
        let plot = attributes.fraccionamiento_id;
        Ok((plot, api::create_lot(&LotPayload { attributes, geojson: target.geometry.clone() })))
    }

    pub fn update_lot_request(
        &self,
        form: &LotForm,
    ) -> Result<(LotId, LotAttributes, ApiRequest), EditorError> {
        let id = self.selection.current().ok_or(EditorError::NoSelectedLot)?;
        let rec = self.store.lot(id).ok_or(EditorError::NoSelectedLot)?;
        let attributes = form.validate()?;
        validate_geometry(&rec.geometry)?;
        let payload = LotPayload { attributes: attributes.clone(), geojson: rec.geometry.clone() };
        Ok((id, attributes, api::update_lot(id, &payload)))
    }

    pub fn delete_lot_request(&self) -> Result<(LotId, ApiRequest), EditorError> {
        let id = self.selection.current().ok_or(EditorError::NoSelectedLot)?;
        Ok((id, api::delete_lot(id)))
    }

    pub fn save_plot_request(&self, form: &PlotForm) -> Result<ApiRequest, EditorError> {
        let fields = form.validate()?;
        let geometry = self.plot_draft.as_ref().ok_or(EditorError::NoPlotDraft)?;
        validate_geometry(geometry)?;
        let payload = PlotPayload::new(fields, geometry.clone());
        Ok(match self.editing_plot {
            Some(id) => api::update_plot(id, &payload),
            None => api::create_plot(&payload),
        })
    }

    pub fn delete_plot_request(&self) -> Result<(PlotId, ApiRequest), EditorError> {
        let id = self.editing_plot.ok_or(EditorError::NoTarget)?;
        Ok((id, api::delete_plot(id)))
    }

    // Outcomes

    /// The draft was saved: drop it, clear the form, and reload the plot
    /// it was saved into.
    pub fn lot_created(&mut self, plot: PlotId) -> ApiRequest {
        if self.store.take_draft().is_some() {
            self.push(RenderCommand::RemoveShape { key: ShapeKey::Draft });
        }
        self.push(RenderCommand::ClearForm);
        self.plot_filter = Some(plot);
        info!(plot, "lot created");
        api::list_lots(Some(plot))
    }

    pub fn lot_updated(&mut self, id: LotId, attributes: LotAttributes) -> ApiRequest {
        let plot = attributes.fraccionamiento_id;
        if self.store.set_attributes(ShapeKey::Lot(id), attributes) {
            self.emit_shape(ShapeKey::Lot(id));
        }
        self.plot_filter = Some(plot);
        info!(lot = id, "lot updated");
        api::list_lots(Some(plot))
    }

    pub fn lot_deleted(&mut self, id: LotId) -> ApiRequest {
        if self.selection.is_selected(id) {
            self.deselect();
        }
        if self.store.remove_lot(id).is_some() {
            self.push(RenderCommand::RemoveShape { key: ShapeKey::Lot(id) });
        }
        info!(lot = id, "lot deleted");
        api::list_lots(self.plot_filter)
    }

    /// A plot was created, updated or deleted.
    pub fn plot_saved(&mut self) -> ApiRequest {
        if self.plot_draft.take().is_some() {
            self.push(RenderCommand::RemovePlotDraft);
        }
        self.editing_plot = None;
        api::list_plots()
    }

    pub fn plot_deleted(&mut self, id: PlotId) -> ApiRequest {
        let before = self.plots.len();
        self.plots.retain(|p| p.id != id);
        if self.plots.len() != before {
            self.push(RenderCommand::RemovePlot { id });
        }
        if self.plot_filter == Some(id) {
            self.plot_filter = None;
        }
        info!(plot = id, "plot deleted");
        self.plot_saved()
    }
}
