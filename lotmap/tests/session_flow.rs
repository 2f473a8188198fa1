use lotmap::feature::{LotFeature, LotProperties};
use lotmap::form::LotForm;
use lotmap::geometry::bounds::centroid;
use lotmap::geometry::tolerance::{approx_eq, EPS_CENTROID};
use lotmap::model::Financing;
use lotmap::motion::MoveState;
use lotmap::style;
use lotmap::{
    ClipboardPhase, DrawTarget, EditorSession, Geometry, KeyInput, LonLat, LotStatus, RenderCommand,
    ShapeKey, ShapeKind,
};

fn square(lon: f64, lat: f64, size: f64) -> Geometry {
    Geometry::polygon(&[
        LonLat::new(lon, lat),
        LonLat::new(lon, lat + size),
        LonLat::new(lon + size, lat + size),
        LonLat::new(lon + size, lat),
    ])
}

fn lot(id: u32, numero: &str, estado: LotStatus, geometry: Geometry) -> LotFeature {
    LotFeature {
        tag: "Feature".into(),
        geometry,
        properties: LotProperties {
            id,
            numero_lote: numero.into(),
            manzana: "M3".into(),
            precio: 50_000_000.0,
            metros_cuadrados: 360,
            estado,
            fraccionamiento_id: 2,
            precio_financiado_130: None,
            precio_cuota_130: None,
        },
    }
}

fn session() -> EditorSession {
    let mut s = EditorSession::default();
    s.lots_loaded(vec![
        lot(7, "M3-12", LotStatus::Reserved, square(-57.60, -25.30, 0.001)),
        lot(8, "A1", LotStatus::Sold, square(-57.50, -25.30, 0.001)),
    ]);
    s.drain_commands();
    s
}

fn first_position(g: &Geometry) -> LonLat {
    g.outer_ring().unwrap()[0]
}

#[test]
fn selecting_highlights_fills_form_and_places_handle() {
    let mut s = session();
    assert!(s.select(7));
    let cmds = s.drain_commands();
    assert!(matches!(
        &cmds[0],
        RenderCommand::UpsertShape { key: ShapeKey::Lot(7), editable: true, style: st, .. }
            if *st == style::selected(LotStatus::Reserved)
    ));
    assert!(matches!(cmds[1], RenderCommand::PlaceHandle { .. }));
    match &cmds[2] {
        RenderCommand::FillForm { values } => {
            assert_eq!(values.numero_lote, "M3-12");
            assert_eq!(values.estado, "reservado");
            assert_eq!(values.fraccionamiento_id, "2");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(s.plot_filter(), Some(2));
}

#[test]
fn selecting_another_lot_restores_the_previous_style() {
    let mut s = session();
    s.select(7);
    s.drain_commands();
    s.select(8);
    let cmds = s.drain_commands();
    assert_eq!(
        cmds[0],
        RenderCommand::SetStyle { key: ShapeKey::Lot(7), style: style::for_status(LotStatus::Reserved) }
    );
    assert_eq!(s.selected(), Some(8));
    assert!(!s.select(99));
    assert_eq!(s.selected(), Some(8));
}

#[test]
fn shift_arrow_right_moves_by_large_step() {
    let mut s = session();
    s.select(7);
    let before = s.selected_record().unwrap().clone();
    assert!(s.key_down(&KeyInput::new("ArrowRight").with_shift()));
    let after = s.selected_record().unwrap();
    let (a, b) = (first_position(&before.geometry), first_position(&after.geometry));
    assert!(approx_eq(b.lon, a.lon + 0.0001, 1e-12));
    assert_eq!(b.lat, a.lat);
    assert_eq!(after.attributes, before.attributes);
    assert_eq!(after.attributes.precio, 50_000_000.0);
    assert_eq!(after.attributes.estado, LotStatus::Reserved);
}

#[test]
fn arrows_without_selection_are_ignored() {
    let mut s = session();
    assert!(!s.key_down(&KeyInput::new("ArrowUp")));
    assert!(s.drain_commands().is_empty());
}

#[test]
fn dragging_the_handle_moves_the_centroid_under_it() {
    let mut s = session();
    assert!(!s.handle_down());
    s.select(7);
    assert!(s.handle_down());
    assert_eq!(s.move_state(), MoveState::DraggingHandle);
    let target = LonLat::new(-57.0, -25.0);
    assert!(s.handle_move(target));
    let c = centroid(&s.selected_record().unwrap().geometry).unwrap();
    assert!(approx_eq(c.lon, target.lon, EPS_CENTROID));
    assert!(approx_eq(c.lat, target.lat, EPS_CENTROID));
    // arrows are ignored mid-drag
    assert!(!s.key_down(&KeyInput::new("ArrowLeft")));
    assert!(s.handle_up());
    assert_eq!(s.move_state(), MoveState::Idle);
}

#[test]
fn copy_paste_places_centroid_at_click() {
    let mut s = session();
    s.select(7);
    assert!(s.key_down(&KeyInput::new("c").with_ctrl()));
    assert_eq!(s.clipboard_phase(), ClipboardPhase::Holding);
    assert!(s.key_down(&KeyInput::new("v").with_ctrl()));
    assert_eq!(s.cursor(), "crosshair");
    let click = LonLat::new(-57.3, -25.1);
    assert!(s.map_click(click, None));
    let draft = s.draft().unwrap();
    let c = centroid(&draft.geometry).unwrap();
    assert!(approx_eq(c.lon, click.lon, EPS_CENTROID));
    assert!(approx_eq(c.lat, click.lat, EPS_CENTROID));
    assert_eq!(draft.attributes.numero_lote, "M3-13");
    assert_eq!(draft.attributes.estado, LotStatus::Available);
    assert_eq!(draft.attributes.precio, 50_000_000.0);
    assert_eq!(draft.financing, Financing::default());
    assert_eq!(s.clipboard_phase(), ClipboardPhase::Holding);
    assert_eq!(s.cursor(), "");
    // the paste click does not deselect
    assert_eq!(s.selected(), Some(7));
}

#[test]
fn a_second_paste_replaces_the_draft() {
    let mut s = session();
    s.select(8);
    s.copy();
    s.paste();
    s.map_click(LonLat::new(-57.0, -25.0), None);
    s.drain_commands();
    s.paste();
    s.map_click(LonLat::new(-56.0, -24.0), Some(ShapeKey::Lot(7)));
    let cmds = s.drain_commands();
    assert!(cmds.contains(&RenderCommand::RemoveShape { key: ShapeKey::Draft }));
    let draft = s.draft().unwrap();
    assert_eq!(draft.attributes.numero_lote, "A2");
    let c = centroid(&draft.geometry).unwrap();
    assert!(approx_eq(c.lon, -56.0, EPS_CENTROID));
    assert_eq!(s.store().lot_count(), 2);
    assert_eq!(s.selected(), Some(8));
}

#[test]
fn copy_flashes_and_restores_the_current_style() {
    let mut s = session();
    assert!(!s.copy());
    s.select(7);
    s.drain_commands();
    assert!(s.copy());
    let cmds = s.drain_commands();
    assert_eq!(cmds.len(), 1);
    match &cmds[0] {
        RenderCommand::FlashStyle { key, style: flash, restore, millis } => {
            assert_eq!(*key, ShapeKey::Lot(7));
            assert_eq!(flash.color, style::COPY_FLASH);
            assert_eq!(*restore, style::selected(LotStatus::Reserved));
            assert_eq!(*millis, 300);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn paste_without_clipboard_is_a_no_op() {
    let mut s = session();
    assert!(!s.paste());
    assert!(!s.is_pasting());
    assert!(!s.key_down(&KeyInput::new("Escape")));
    assert!(s.key_down(&KeyInput::new("V").with_ctrl()));
    assert!(s.drain_commands().is_empty());
}

#[test]
fn escape_restores_the_prior_cursor() {
    let mut s = session();
    s.select(7);
    s.copy();
    s.paste();
    s.drain_commands();
    assert!(s.key_down(&KeyInput::new("Escape")));
    assert_eq!(s.drain_commands(), vec![RenderCommand::SetCursor { cursor: String::new() }]);
    assert!(!s.is_pasting());
    assert!(s.clipboard().is_some());
}

#[test]
fn clicking_empty_map_deselects() {
    let mut s = session();
    s.select(7);
    s.drain_commands();
    assert!(s.map_click(LonLat::new(0.0, 0.0), None));
    assert_eq!(s.selected(), None);
    assert_eq!(
        s.drain_commands(),
        vec![
            RenderCommand::SetStyle { key: ShapeKey::Lot(7), style: style::for_status(LotStatus::Reserved) },
            RenderCommand::RemoveHandle,
            RenderCommand::ClearForm,
        ]
    );
    assert!(!s.map_click(LonLat::new(0.0, 0.0), None));
}

#[test]
fn reloading_lots_resets_selection_but_keeps_the_draft() {
    let mut s = session();
    s.select(7);
    s.copy();
    s.paste();
    s.map_click(LonLat::new(-57.0, -25.0), None);
    assert_eq!(s.store().editable_len(), 2);
    s.lots_loaded(vec![lot(9, "B1", LotStatus::Available, square(-57.4, -25.3, 0.001))]);
    assert_eq!(s.selected(), None);
    assert_eq!(s.store().editable_keys().collect::<Vec<_>>(), vec![ShapeKey::Draft]);
    assert!(s.store().lot(7).is_none());
    assert!(s.draft().is_some());
    let cmds = s.drain_commands();
    assert!(cmds.contains(&RenderCommand::RemoveShape { key: ShapeKey::Lot(7) }));
    assert!(cmds.contains(&RenderCommand::RemoveHandle));
}

#[test]
fn drawn_rectangle_becomes_a_numbered_draft() {
    let mut s = session();
    s.select(7);
    let tri = Geometry::polygon(&[LonLat::new(0.0, 0.0), LonLat::new(2.0, 0.0), LonLat::new(1.0, 1.0)]);
    assert!(s.draw_created(DrawTarget::Lot, ShapeKind::Rectangle, tri));
    let draft = s.draft().unwrap();
    assert_eq!(draft.kind, ShapeKind::Rectangle);
    assert_eq!(draft.geometry.outer_ring().unwrap().len(), 5);
    assert_eq!(draft.attributes.numero_lote, "L1");
    assert_eq!(draft.attributes.fraccionamiento_id, 2);
    assert_eq!(draft.attributes.metros_cuadrados, 200);
}

#[test]
fn submitting_the_draft_builds_a_post() {
    let mut s = session();
    let tri = Geometry::polygon(&[LonLat::new(0.0, 0.0), LonLat::new(2.0, 0.0), LonLat::new(1.0, 1.0)]);
    s.draw_created(DrawTarget::Lot, ShapeKind::Polygon, tri);
    let form = LotForm {
        numero_lote: "L1".into(),
        manzana: "M1".into(),
        precio: "50000000".into(),
        metros_cuadrados: "200".into(),
        estado: "disponible".into(),
        fraccionamiento_id: "3".into(),
    };
    let (plot, req) = s.create_lot_request(&form).unwrap();
    assert_eq!(plot, 3);
    assert_eq!(req.path, "/api/admin/lotes");
    let body = req.body.unwrap();
    assert_eq!(body["numero_lote"], "L1");
    assert_eq!(body["geojson"]["type"], "Polygon");

    let reload = s.lot_created(plot);
    assert_eq!(reload.path, "/api/lotes?fraccionamiento_id=3");
    assert!(s.draft().is_none());
    assert!(s.drain_commands().ends_with(&[
        RenderCommand::RemoveShape { key: ShapeKey::Draft },
        RenderCommand::ClearForm,
    ]));
}

#[test]
fn submit_errors_are_typed() {
    let s = session();
    let form = LotForm::default();
    assert_eq!(s.create_lot_request(&form).unwrap_err().code(), "no_target");
    assert_eq!(s.update_lot_request(&form).unwrap_err().code(), "no_target");

    let mut s = session();
    s.select(7);
    assert_eq!(s.update_lot_request(&LotForm::default()).unwrap_err().code(), "invalid_form");
}

#[test]
fn updating_the_selected_lot_keeps_its_moved_geometry() {
    let mut s = session();
    s.select(7);
    s.nudge(lotmap::motion::Direction::Up, false);
    let form = LotForm {
        numero_lote: "M3-12".into(),
        manzana: "M3".into(),
        precio: "60000000".into(),
        metros_cuadrados: "360".into(),
        estado: "vendido".into(),
        fraccionamiento_id: "2".into(),
    };
    let (id, attrs, req) = s.update_lot_request(&form).unwrap();
    assert_eq!(id, 7);
    assert_eq!(req.path, "/api/admin/lotes/7");
    let moved = first_position(&s.selected_record().unwrap().geometry);
    assert_eq!(req.body.as_ref().unwrap()["geojson"]["coordinates"][0][0][1], moved.lat);
    s.lot_updated(id, attrs);
    assert_eq!(s.selected_record().unwrap().attributes.estado, LotStatus::Sold);
}

#[test]
fn deleting_the_selected_lot_clears_it() {
    let mut s = session();
    s.select(8);
    let (id, req) = s.delete_lot_request().unwrap();
    assert_eq!(req.path, "/api/admin/lotes/8");
    s.lot_deleted(id);
    assert_eq!(s.selected(), None);
    assert!(s.store().lot(8).is_none());
}

#[test]
fn boxed_lots_paste_back_as_rectangles() {
    let mut s = session();
    assert_eq!(s.store().lot(7).unwrap().kind, ShapeKind::Rectangle);
    s.select(7);
    s.copy();
    assert_eq!(s.clipboard().unwrap().kind, ShapeKind::Rectangle);
    s.paste();
    let click = LonLat::new(-56.5, -24.5);
    assert!(s.map_click(click, None));
    let draft = s.draft().unwrap();
    assert_eq!(draft.kind, ShapeKind::Rectangle);
    let ring = draft.geometry.outer_ring().unwrap();
    assert_eq!(ring.len(), 5);
    assert_eq!(ring[0].lon, ring[1].lon);
    assert_eq!(ring[1].lat, ring[2].lat);
    let c = centroid(&draft.geometry).unwrap();
    assert!(approx_eq(c.lon, click.lon, EPS_CENTROID));
    assert!(approx_eq(c.lat, click.lat, EPS_CENTROID));
    match s.drain_commands().iter().find(|c| matches!(c, RenderCommand::UpsertShape { key: ShapeKey::Draft, .. })) {
        Some(RenderCommand::UpsertShape { kind, .. }) => assert_eq!(*kind, ShapeKind::Rectangle),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn irregular_lots_paste_back_as_polygons() {
    let mut s = session();
    let pentagon = Geometry::polygon(&[
        LonLat::new(-57.0, -25.0),
        LonLat::new(-57.0, -24.99),
        LonLat::new(-56.995, -24.985),
        LonLat::new(-56.99, -24.99),
        LonLat::new(-56.99, -25.0),
    ]);
    s.lots_loaded(vec![lot(10, "C4", LotStatus::Available, pentagon.clone())]);
    s.select(10);
    s.copy();
    s.paste();
    s.map_click(LonLat::new(-56.0, -24.0), None);
    let draft = s.draft().unwrap();
    assert_eq!(draft.kind, ShapeKind::Polygon);
    assert_eq!(draft.geometry.position_count(), pentagon.position_count());
}

#[test]
fn clicking_the_draft_deselects() {
    let mut s = session();
    let tri = Geometry::polygon(&[LonLat::new(0.0, 0.0), LonLat::new(2.0, 0.0), LonLat::new(1.0, 1.0)]);
    s.draw_created(DrawTarget::Lot, ShapeKind::Polygon, tri);
    s.select(7);
    assert!(s.map_click(LonLat::new(1.0, 0.5), Some(ShapeKey::Draft)));
    assert_eq!(s.selected(), None);
    assert!(s.draft().is_some());
}
