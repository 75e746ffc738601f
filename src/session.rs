use egui::{Color32, Pos2};

use crate::color;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::history::History;
use crate::store::{self, DrawingRecord, DrawingStore, NewDrawing};
use crate::surface::RasterSurface;
use crate::tools::{GestureOutcome, GesturePhase, ToolKind, ToolSelection, ToolStateMachine};

/// One open drawing: its surface, history and the current tool selection.
///
/// This is the only owner of the surface. Tools borrow it for the duration
/// of a pointer event, and every completed gesture lands in the history as a
/// snapshot.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    surface: RasterSurface,
    history: History,
    selection: ToolSelection,
    machine: ToolStateMachine,
    /// Bumped whenever the surface pixels change
    revision: u64,
}

impl EditorSession {
    /// Blank canvas sized per `config`, with the blank state as the first history entry
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        let background = color::to_pixel(color::parse_hex_or_black(&config.background));
        let surface =
            RasterSurface::with_background(config.canvas_width, config.canvas_height, background);

        let initial = surface.export_snapshot()?;
        let history = match config.history_limit {
            Some(limit) => History::with_max_depth(initial, limit),
            None => History::new(initial),
        };

        let selection = ToolSelection {
            tool: ToolKind::Brush,
            color: color::parse_hex_or_black(&config.initial_color),
            brush_size: config.initial_brush_size.clamp(config.min_brush_size, config.max_brush_size),
        };
        let machine = ToolStateMachine::new(&selection, surface.background());

        log::info!(
            "New {}x{} editor session",
            surface.width(),
            surface.height()
        );
        Ok(Self {
            config,
            surface,
            history,
            selection,
            machine,
            revision: 0,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &ToolSelection {
        &self.selection
    }

    pub fn phase(&self) -> GesturePhase {
        self.machine.phase()
    }

    /// Changes whenever the surface does; compare against a cached value to
    /// know when to re-upload a texture
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn select_tool(&mut self, tool: ToolKind) {
        self.update_selection(|selection| selection.tool = tool);
    }

    pub fn select_color(&mut self, color: Color32) {
        let opaque = Color32::from_rgb(color.r(), color.g(), color.b());
        self.update_selection(|selection| selection.color = opaque);
    }

    /// `#rrggbb`; anything else selects black
    pub fn select_color_hex(&mut self, hex: &str) {
        self.select_color(color::parse_hex_or_black(hex));
    }

    /// Clamped into the configured brush size range
    pub fn select_brush_size(&mut self, size: u32) {
        let size = size.clamp(self.config.min_brush_size, self.config.max_brush_size);
        self.update_selection(|selection| selection.brush_size = size);
    }

    fn update_selection(&mut self, change: impl FnOnce(&mut ToolSelection)) {
        let mut selection = self.selection;
        change(&mut selection);
        if selection == self.selection {
            return;
        }
        // finish what the old tool was doing before it goes away
        self.gesture_end();
        self.selection = selection;
        self.machine.set_selection(&self.selection, self.surface.background());
        log::debug!("Tool selection is now {:?}", self.selection);
    }

    pub fn gesture_start(&mut self, point: Pos2) -> GestureOutcome {
        if self.machine.is_active() {
            // a release we never saw; keep what that gesture drew
            self.gesture_end();
        }
        let outcome = self.machine.gesture_start(point, &mut self.surface);
        self.apply(outcome)
    }

    pub fn gesture_move(&mut self, point: Pos2) -> GestureOutcome {
        let outcome = self.machine.gesture_move(point, &mut self.surface);
        self.apply(outcome)
    }

    pub fn gesture_end(&mut self) -> GestureOutcome {
        let outcome = self.machine.gesture_end();
        self.apply(outcome)
    }

    /// The pointer left the canvas. Same as ending the gesture.
    pub fn gesture_leave(&mut self) -> GestureOutcome {
        let outcome = self.machine.gesture_leave();
        self.apply(outcome)
    }

    fn apply(&mut self, outcome: GestureOutcome) -> GestureOutcome {
        match outcome {
            GestureOutcome::Updated | GestureOutcome::Filled { pixels: 1.. } => self.revision += 1,
            _ => {}
        }
        if outcome.needs_snapshot() {
            if let Err(err) = self.record_snapshot() {
                log::error!("Failed to record history after {:?}: {}", outcome, err);
            }
        }
        outcome
    }

    fn record_snapshot(&mut self) -> Result<(), EditorError> {
        let snapshot = self.surface.export_snapshot()?;
        self.history.record(snapshot);
        log::debug!(
            "Recorded snapshot {} of {}",
            self.history.index() + 1,
            self.history.len()
        );
        Ok(())
    }

    /// Paint the whole surface with the background colour
    pub fn clear(&mut self) -> Result<(), EditorError> {
        self.gesture_end();
        self.surface.fill(self.surface.background());
        self.revision += 1;
        self.record_snapshot()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Step back one history entry. Returns false when there was nothing to
    /// undo or the snapshot could not be restored.
    pub fn undo(&mut self) -> bool {
        self.gesture_end();
        let previous = self.history.index();
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot, previous)
    }

    /// Step forward one history entry; see [`EditorSession::undo`]
    pub fn redo(&mut self) -> bool {
        self.gesture_end();
        let previous = self.history.index();
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot, previous)
    }

    fn restore(&mut self, snapshot: crate::surface::Snapshot, previous: usize) -> bool {
        match self.surface.restore_snapshot(&snapshot) {
            Ok(()) => {
                self.revision += 1;
                log::debug!("Restored history entry {}", self.history.index());
                true
            }
            Err(err) => {
                log::error!("Failed to restore history entry {}: {}", self.history.index(), err);
                self.history.set_index(previous);
                false
            }
        }
    }

    /// PNG bytes for a client-side file save
    pub fn export_for_download(&self) -> Result<Vec<u8>, EditorError> {
        Ok(self.surface.export_encoding()?)
    }

    /// `<title>.png`, or `drawing.png` without a title
    pub fn download_file_name(title: &str) -> String {
        let title = title.trim();
        if title.is_empty() {
            "drawing.png".to_owned()
        } else {
            format!("{title}.png")
        }
    }

    /// PNG bytes to hand to a store. The title is required.
    pub fn commit_for_save(&mut self, title: &str) -> Result<Vec<u8>, EditorError> {
        store::validate_title(title)?;
        self.gesture_end();
        Ok(self.surface.export_encoding()?)
    }

    /// Commit and create a record in `store`
    pub fn save_to(
        &mut self,
        store: &mut dyn DrawingStore,
        title: &str,
    ) -> Result<DrawingRecord, EditorError> {
        let png = self.commit_for_save(title)?;
        let record = store.create(NewDrawing::from_png(title, &png))?;
        log::info!("Saved {:?} as {}", record.title, record.id);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_session() -> EditorSession {
        EditorSession::new(EditorConfig {
            canvas_width: 40,
            canvas_height: 30,
            ..EditorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_new_session_defaults() {
        let session = small_session();
        assert_eq!(session.selection().tool, ToolKind::Brush);
        assert_eq!(session.selection().color, Color32::from_rgb(0x63, 0x66, 0xf1));
        assert_eq!(session.selection().brush_size, 5);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_brush_size_is_clamped() {
        let mut session = small_session();
        session.select_brush_size(0);
        assert_eq!(session.selection().brush_size, 1);
        session.select_brush_size(500);
        assert_eq!(session.selection().brush_size, 50);
    }

    #[test]
    fn test_tool_change_mid_gesture_commits() {
        let mut session = small_session();
        session.gesture_start(Pos2::new(5.0, 5.0));
        session.gesture_move(Pos2::new(20.0, 5.0));
        session.select_tool(ToolKind::Fill);
        assert_eq!(session.phase(), GesturePhase::Idle);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_missed_release_is_committed_on_next_press() {
        let mut session = small_session();
        session.gesture_start(Pos2::new(5.0, 5.0));
        session.gesture_move(Pos2::new(20.0, 5.0));
        session.gesture_start(Pos2::new(5.0, 20.0));
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.phase(), GesturePhase::Stroking);
    }

    #[test]
    fn test_noop_fill_records_nothing() {
        let mut session = small_session();
        session.select_tool(ToolKind::Fill);
        session.select_color_hex("#ffffff");
        let revision = session.revision();
        assert_eq!(
            session.gesture_start(Pos2::new(1.0, 1.0)),
            GestureOutcome::Filled { pixels: 0 }
        );
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.revision(), revision);
    }

    #[test]
    fn test_clear_records_history() {
        let mut session = small_session();
        session.select_tool(ToolKind::Fill);
        session.select_color(Color32::BLACK);
        session.gesture_start(Pos2::new(1.0, 1.0));
        session.clear().unwrap();
        assert_eq!(session.history().len(), 3);
        assert!(session.surface().pixels().pixels().all(|p| *p == color::WHITE));
        assert!(session.undo());
        assert_eq!(session.surface().read_pixel(0, 0), image::Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_failed_undo_restore_rolls_back() {
        let mut session = small_session();
        let wrong_size = RasterSurface::new(3, 3).export_snapshot().unwrap();
        session.history.record(wrong_size);
        session.surface.write_pixel(5, 5, image::Rgba([0, 0, 0, 255]));
        session.record_snapshot().unwrap();

        let pixels = session.surface().pixels().clone();
        let revision = session.revision();
        assert_eq!(session.history().index(), 2);

        assert!(!session.undo());
        assert_eq!(session.history().index(), 2);
        assert_eq!(session.surface().pixels(), &pixels);
        assert_eq!(session.revision(), revision);
        assert!(session.can_undo());
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(EditorSession::download_file_name("Sunset"), "Sunset.png");
        assert_eq!(EditorSession::download_file_name("  "), "drawing.png");
    }

    #[test]
    fn test_history_limit_from_config() {
        let mut session = EditorSession::new(EditorConfig {
            canvas_width: 4,
            canvas_height: 4,
            history_limit: Some(2),
            ..EditorConfig::default()
        })
        .unwrap();
        session.clear().unwrap();
        session.clear().unwrap();
        assert_eq!(session.history().len(), 2);
    }
}
