use egui::{Key, KeyboardShortcut, Modifiers, Rect, TextureId};

use crate::config::EditorConfig;
use crate::error::{DecodeError, EditorError};
use crate::input::{GestureEvent, InputHandler};
use crate::panels::{central_panel, gallery_panel, tools_panel};
use crate::session::EditorSession;
use crate::store::{DrawingId, DrawingRecord, DrawingStore};
use crate::surface::RasterSurface;
use crate::texture_manager::{TextureKey, TextureManager};

const UNDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
const REDO: KeyboardShortcut =
    KeyboardShortcut::new(Modifiers::COMMAND.plus(Modifiers::SHIFT), Key::Z);
const REDO_ALT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Y);

/// Last user-facing result, shown under the tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// A stored drawing decoded for display
#[derive(Debug)]
pub struct ViewedDrawing {
    pub record: DrawingRecord,
    pub surface: RasterSurface,
}

/// Saved drawings window
#[derive(Debug, Default)]
pub struct Gallery {
    pub open: bool,
    pub records: Vec<DrawingRecord>,
    pub viewing: Option<ViewedDrawing>,
    /// `records` must be re-read from the store
    pub stale: bool,
    /// Drawing waiting for the user to confirm its deletion
    pub pending_delete: Option<DrawingId>,
}

pub enum GalleryAction {
    View(DrawingId),
    /// Ask before deleting
    RequestDelete(DrawingId),
    ConfirmDelete,
    CancelDelete,
    DownloadViewed,
    CloseViewer,
}

pub struct PaintApp {
    session: EditorSession,
    input: InputHandler,
    textures: TextureManager,
    store: Box<dyn DrawingStore>,
    title: String,
    gallery: Gallery,
    status: Option<Status>,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: EditorConfig,
        store: Box<dyn DrawingStore>,
    ) -> Result<Self, EditorError> {
        Ok(Self::with_session(EditorSession::new(config)?, store))
    }

    pub fn with_session(session: EditorSession, store: Box<dyn DrawingStore>) -> Self {
        Self {
            session,
            input: InputHandler::new(Rect::NOTHING),
            textures: TextureManager::new(8),
            store,
            title: String::new(),
            gallery: Gallery {
                stale: true,
                ..Gallery::default()
            },
            status: None,
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditorSession {
        &mut self.session
    }

    pub fn title_mut(&mut self) -> &mut String {
        &mut self.title
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn toggle_gallery(&mut self) {
        self.gallery.open = !self.gallery.open;
        self.gallery.stale = true;
    }

    pub fn close_gallery(&mut self) {
        self.gallery.open = false;
    }

    /// Feed this frame's pointer input on the canvas to the session
    pub fn handle_canvas_input(&mut self, ctx: &egui::Context, canvas_rect: Rect, hovered: bool) {
        self.input.set_canvas_rect(canvas_rect);
        for event in self.input.process_input(ctx, hovered) {
            match event {
                GestureEvent::Start(point) => self.session.gesture_start(point),
                GestureEvent::Move(point) => self.session.gesture_move(point),
                GestureEvent::End => self.session.gesture_end(),
                GestureEvent::Leave => self.session.gesture_leave(),
            };
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // a focused text field gets its own undo
        if ctx.wants_keyboard_input() {
            return;
        }
        // the shift variant first, plain Cmd+Z would also match it
        if ctx.input_mut(|i| i.consume_shortcut(&REDO) || i.consume_shortcut(&REDO_ALT)) {
            self.redo();
        } else if ctx.input_mut(|i| i.consume_shortcut(&UNDO)) {
            self.undo();
        }
    }

    /// Texture of the editing surface, re-uploaded when the session revision moves
    pub fn canvas_texture(&mut self, ctx: &egui::Context) -> Result<TextureId, DecodeError> {
        let surface = self.session.surface();
        self.textures.get_or_update(
            TextureKey::Canvas,
            self.session.revision(),
            || Ok(surface.to_color_image()),
            ctx,
        )
    }

    /// Texture and size of the drawing open in the gallery viewer
    pub fn viewed_texture(
        &mut self,
        ctx: &egui::Context,
    ) -> Option<Result<(TextureId, egui::Vec2), DecodeError>> {
        let viewed = self.gallery.viewing.as_ref()?;
        let surface = &viewed.surface;
        let size = egui::vec2(surface.width() as f32, surface.height() as f32);
        let texture = self.textures.get_or_update(
            TextureKey::Drawing(viewed.record.id),
            0,
            || Ok(surface.to_color_image()),
            ctx,
        );
        Some(texture.map(|id| (id, size)))
    }

    pub fn undo(&mut self) {
        if !self.session.undo() {
            log::debug!("Nothing undone");
        }
    }

    pub fn redo(&mut self) {
        if !self.session.redo() {
            log::debug!("Nothing redone");
        }
    }

    pub fn clear(&mut self) {
        if let Err(err) = self.session.clear() {
            self.report_error("Clear failed", &err);
        }
    }

    /// Store the current drawing under the title field
    pub fn save(&mut self) {
        match self.session.save_to(self.store.as_mut(), &self.title) {
            Ok(record) => {
                self.status = Some(Status::Info(format!("Saved \"{}\"", record.title)));
                self.gallery.stale = true;
            }
            Err(err) => self.report_error("Save failed", &err),
        }
    }

    /// Write the drawing as a PNG into the configured download directory
    pub fn download(&mut self) {
        let file_name = EditorSession::download_file_name(&self.title);
        let png = self.session.export_for_download();
        self.write_download(&file_name, png);
    }

    fn write_download(&mut self, file_name: &str, png: Result<Vec<u8>, EditorError>) {
        let path = self.session.config().download_dir.join(file_name);
        let result = png.and_then(|png| std::fs::write(&path, png).map_err(EditorError::Download));
        match result {
            Ok(()) => {
                log::info!("Downloaded drawing to {}", path.display());
                self.status = Some(Status::Info(format!("Wrote {}", path.display())));
            }
            Err(err) => self.report_error("Download failed", &err),
        }
    }

    /// Re-read the gallery listing if something changed since the last read
    pub fn refresh_gallery(&mut self) {
        if !self.gallery.stale {
            return;
        }
        self.gallery.stale = false;
        match self.store.list() {
            Ok(records) => self.gallery.records = records,
            Err(err) => self.report_error("Could not list drawings", &EditorError::Store(err)),
        }
    }

    pub fn apply_gallery_action(&mut self, action: GalleryAction) {
        match action {
            GalleryAction::View(id) => match self.open_drawing(id) {
                Ok(viewed) => {
                    if let Some(previous) = self.gallery.viewing.replace(viewed) {
                        self.textures.invalidate(TextureKey::Drawing(previous.record.id));
                    }
                }
                Err(err) => self.report_error("Could not open drawing", &err),
            },
            GalleryAction::RequestDelete(id) => self.gallery.pending_delete = Some(id),
            GalleryAction::CancelDelete => self.gallery.pending_delete = None,
            GalleryAction::ConfirmDelete => {
                let Some(id) = self.gallery.pending_delete.take() else {
                    return;
                };
                if let Err(err) = self.store.delete(id) {
                    self.report_error("Delete failed", &EditorError::Store(err));
                    return;
                }
                self.textures.invalidate(TextureKey::Drawing(id));
                if self.gallery.viewing.as_ref().is_some_and(|viewed| viewed.record.id == id) {
                    self.gallery.viewing = None;
                }
                self.gallery.stale = true;
                self.status = Some(Status::Info("Drawing deleted".to_owned()));
            }
            GalleryAction::DownloadViewed => {
                let Some(viewed) = &self.gallery.viewing else {
                    return;
                };
                let file_name = EditorSession::download_file_name(&viewed.record.title);
                let png = viewed.surface.export_encoding().map_err(EditorError::from);
                self.write_download(&file_name, png);
            }
            GalleryAction::CloseViewer => {
                if let Some(viewed) = self.gallery.viewing.take() {
                    self.textures.invalidate(TextureKey::Drawing(viewed.record.id));
                }
            }
        }
    }

    fn open_drawing(&self, id: DrawingId) -> Result<ViewedDrawing, EditorError> {
        let record = self.store.get(id)?;
        let surface = RasterSurface::from_data_url(&record.data)?;
        log::debug!("Opened drawing {} ({}x{})", id, surface.width(), surface.height());
        Ok(ViewedDrawing { record, surface })
    }

    fn report_error(&mut self, context: &str, err: &EditorError) {
        log::error!("{}: {}", context, err);
        self.status = Some(Status::Error(format!("{context}: {err}")));
    }
}

impl eframe::App for PaintApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.textures.begin_frame();
        self.handle_shortcuts(ctx);

        tools_panel(self, ctx);
        gallery_panel(self, ctx);
        central_panel(self, ctx);
    }
}
