use eframe::egui;

use crate::tools::ToolKind;

const SIZE: egui::Vec2 = egui::vec2(30.0, 30.0);

/// Round toggle for one tool, drawn like a palette swatch with the tool's glyph
pub struct ToolButton {
    pub tool: ToolKind,
    pub selected: bool,
}

impl ToolButton {
    pub fn new(tool: ToolKind, selected: bool) -> Self {
        Self { tool, selected }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) = ui.allocate_exact_size(SIZE, egui::Sense::click());
        if ui.is_rect_visible(rect) {
            let visuals = ui.style().interact_selectable(&response, self.selected);
            let radius = rect.width() / 2.0;
            let painter = ui.painter();
            painter.circle_filled(rect.center(), radius, visuals.bg_fill);
            painter.circle_stroke(rect.center(), radius - 0.5, visuals.bg_stroke);
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.tool.icon(),
                egui::FontId::proportional(16.0),
                visuals.fg_stroke.color,
            );
        }

        response.on_hover_text(self.tool.name())
    }
}
