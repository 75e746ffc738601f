use crate::PaintApp;
use crate::app::GalleryAction;

const PREVIEW_WIDTH: f32 = 400.0;

pub fn gallery_panel(app: &mut PaintApp, ctx: &egui::Context) {
    if !app.gallery().open {
        return;
    }
    app.refresh_gallery();

    let mut open = true;
    let mut actions = Vec::new();
    egui::Window::new("Gallery")
        .open(&mut open)
        .default_width(PREVIEW_WIDTH + 20.0)
        .show(ctx, |ui| {
            if app.gallery().records.is_empty() {
                ui.label("No saved drawings yet");
            }

            egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                egui::Grid::new("gallery_grid")
                    .num_columns(3)
                    .spacing([20.0, 4.0])
                    .striped(true)
                    .show(ui, |ui| {
                        for record in &app.gallery().records {
                            ui.label(record.title.as_str());
                            ui.label(record.created_at.format("%Y-%m-%d %H:%M").to_string());
                            ui.horizontal(|ui| {
                                if ui.button("View").clicked() {
                                    actions.push(GalleryAction::View(record.id));
                                }
                                if ui.button("Delete").clicked() {
                                    actions.push(GalleryAction::RequestDelete(record.id));
                                }
                            });
                            ui.end_row();
                        }
                    });
            });

            if let Some(viewed) = app.viewed_texture(ctx) {
                ui.separator();
                match viewed {
                    Ok((texture, size)) => {
                        let scale = (PREVIEW_WIDTH / size.x).min(1.0);
                        ui.image((texture, size * scale));
                    }
                    Err(err) => {
                        ui.colored_label(ui.visuals().error_fg_color, err.to_string());
                    }
                }
                ui.horizontal(|ui| {
                    if ui.button("Download").clicked() {
                        actions.push(GalleryAction::DownloadViewed);
                    }
                    if ui.button("Close").clicked() {
                        actions.push(GalleryAction::CloseViewer);
                    }
                });
            }
        });

    if let Some(pending) = app.gallery().pending_delete {
        let title = app
            .gallery()
            .records
            .iter()
            .find(|record| record.id == pending)
            .map_or("this drawing", |record| record.title.as_str())
            .to_owned();
        egui::Window::new("Delete drawing?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!("Delete \"{title}\"? This cannot be undone."));
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        actions.push(GalleryAction::ConfirmDelete);
                    }
                    if ui.button("Cancel").clicked() {
                        actions.push(GalleryAction::CancelDelete);
                    }
                });
            });
    }

    for action in actions {
        app.apply_gallery_action(action);
    }
    if !open {
        app.close_gallery();
    }
}
