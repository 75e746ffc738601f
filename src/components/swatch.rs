use eframe::egui;

/// A clickable colour square
pub struct Swatch {
    pub color: egui::Color32,
    pub selected: bool,
}

impl Swatch {
    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) = ui.allocate_exact_size(egui::vec2(22.0, 22.0), egui::Sense::click());
        if ui.is_rect_visible(rect) {
            ui.painter().rect_filled(rect, 11.0, self.color);
            let outline = if self.selected {
                egui::Stroke::new(2.0, egui::Color32::from_rgb(33, 150, 243))
            } else {
                egui::Stroke::new(1.0, egui::Color32::from_gray(90))
            };
            ui.painter().rect_stroke(rect, 11.0, outline);
        }
        response
    }
}
