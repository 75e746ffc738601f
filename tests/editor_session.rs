use eframe_sketch::color::{self, WHITE};
use eframe_sketch::{
    DrawingStore, EditorConfig, EditorError, EditorSession, GesturePhase, MemoryStore, RasterSurface,
    ToolKind, ValidationError,
};
use egui::Pos2;
use image::Rgba;

fn default_session() -> EditorSession {
    EditorSession::new(EditorConfig::default()).unwrap()
}

fn all_pixels_are(surface: &RasterSurface, pixel: Rgba<u8>) -> bool {
    surface.pixels().pixels().all(|p| *p == pixel)
}

#[test]
fn test_brush_stroke_then_undo() {
    let mut session = default_session();
    assert_eq!(session.surface().width(), 800);
    assert_eq!(session.surface().height(), 500);

    session.select_tool(ToolKind::Brush);
    session.select_color_hex("#6366f1");
    session.select_brush_size(5);

    session.gesture_start(Pos2::new(100.0, 100.0));
    assert_eq!(session.phase(), GesturePhase::Stroking);
    session.gesture_move(Pos2::new(150.0, 150.0));
    session.gesture_end();
    assert_eq!(session.phase(), GesturePhase::Idle);

    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history().index(), 1);
    assert_eq!(session.surface().read_pixel(125, 125), Rgba([0x63, 0x66, 0xf1, 255]));

    assert!(session.undo());
    assert_eq!(session.history().index(), 0);
    assert!(all_pixels_are(session.surface(), WHITE));

    assert!(session.redo());
    assert_eq!(session.surface().read_pixel(125, 125), Rgba([0x63, 0x66, 0xf1, 255]));
}

#[test]
fn test_fill_then_save() {
    let mut session = default_session();
    session.select_tool(ToolKind::Fill);
    session.select_color_hex("#000000");
    session.gesture_start(Pos2::new(0.0, 0.0));
    session.gesture_end();

    assert!(all_pixels_are(session.surface(), Rgba([0, 0, 0, 255])));
    assert_eq!(session.history().len(), 2);

    let png = session.commit_for_save("Test").unwrap();
    let decoded = RasterSurface::from_png(&png).unwrap();
    assert_eq!(decoded.pixels(), session.surface().pixels());

    assert!(matches!(
        session.commit_for_save(""),
        Err(EditorError::Validation(ValidationError::EmptyTitle))
    ));
    assert_eq!(session.history().len(), 2);
}

#[test]
fn test_eraser_paints_background() {
    let mut session = default_session();
    session.select_tool(ToolKind::Fill);
    session.select_color_hex("#22c55e");
    session.gesture_start(Pos2::new(10.0, 10.0));

    session.select_tool(ToolKind::Eraser);
    session.select_brush_size(10);
    session.gesture_start(Pos2::new(200.0, 200.0));
    session.gesture_move(Pos2::new(300.0, 200.0));
    session.gesture_leave();

    assert_eq!(session.surface().read_pixel(250, 200), WHITE);
    assert_eq!(session.surface().read_pixel(250, 300), Rgba([0x22, 0xc5, 0x5e, 255]));
    assert_eq!(session.history().len(), 3);
}

#[test]
fn test_new_stroke_after_undo_discards_redo() {
    let mut session = default_session();
    for y in [50.0, 100.0, 150.0] {
        session.gesture_start(Pos2::new(10.0, y));
        session.gesture_move(Pos2::new(60.0, y));
        session.gesture_end();
    }
    assert_eq!(session.history().len(), 4);

    assert!(session.undo());
    assert!(session.undo());
    session.gesture_start(Pos2::new(10.0, 300.0));
    session.gesture_move(Pos2::new(60.0, 300.0));
    session.gesture_end();

    assert_eq!(session.history().len(), 3);
    assert!(!session.can_redo());
    assert!(!session.redo());
    // the undone strokes are gone, the first one and the new one remain
    assert_ne!(session.surface().read_pixel(30, 50), WHITE);
    assert_eq!(session.surface().read_pixel(30, 100), WHITE);
    assert_ne!(session.surface().read_pixel(30, 300), WHITE);
}

#[test]
fn test_undo_and_redo_at_the_ends_are_noops() {
    let mut session = default_session();
    let revision = session.revision();
    assert!(!session.undo());
    assert!(!session.redo());
    assert_eq!(session.revision(), revision);
    assert_eq!(session.history().index(), 0);
}

#[test]
fn test_save_to_store() {
    let mut session = default_session();
    let mut store = MemoryStore::new();

    session.select_tool(ToolKind::Rectangle);
    session.gesture_start(Pos2::new(20.0, 20.0));
    session.gesture_move(Pos2::new(120.0, 80.0));
    session.gesture_end();

    let record = session.save_to(&mut store, "Boxes").unwrap();
    assert_eq!(record.title, "Boxes");
    assert!(record.data.starts_with("data:image/png;base64,"));

    let stored = store.get(record.id).unwrap();
    let surface = RasterSurface::from_data_url(&stored.data).unwrap();
    assert_eq!(surface.pixels(), session.surface().pixels());

    assert!(session.save_to(&mut store, "  ").is_err());
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn test_export_for_download() {
    let session = default_session();
    let png = session.export_for_download().unwrap();
    assert_eq!(&png[1..4], b"PNG");
    assert_eq!(EditorSession::download_file_name("Test"), "Test.png");
}

#[test]
fn test_invalid_colour_selects_black() {
    let mut session = default_session();
    session.select_color_hex("not a colour");
    assert_eq!(session.selection().color, color::parse_hex_or_black("#000000"));
}
