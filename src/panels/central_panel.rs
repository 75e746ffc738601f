use crate::PaintApp;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let surface = app.session().surface();
        let size = egui::vec2(surface.width() as f32, surface.height() as f32);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        let canvas_rect = response.rect;

        app.handle_canvas_input(ctx, canvas_rect, response.hovered());

        match app.canvas_texture(ctx) {
            Ok(texture) => {
                painter.image(
                    texture,
                    canvas_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            Err(err) => log::error!("Failed to upload canvas texture: {}", err),
        }

        response.on_hover_cursor(egui::CursorIcon::Crosshair);
    });
}
