use crate::PaintApp;
use crate::app::Status;
use crate::color;
use crate::components::{Swatch, ToolButton};
use crate::tools::ToolKind;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active_tool = app.session().selection().tool;
            ui.horizontal_wrapped(|ui| {
                for tool in ToolKind::ALL {
                    if ToolButton::new(tool, tool == active_tool).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", tool.name());
                        app.session_mut().select_tool(tool);
                    }
                }
            });
            ui.label(format!("State: {}", app.session().phase().name()));
            ui.separator();

            colour_section(app, ui);
            ui.separator();

            let range = app.session().config().brush_size_range();
            let mut brush_size = app.session().selection().brush_size;
            if ui
                .add(egui::Slider::new(&mut brush_size, range).text("Size"))
                .changed()
            {
                app.session_mut().select_brush_size(brush_size);
            }
            ui.separator();

            ui.horizontal(|ui| {
                let can_undo = app.session().can_undo();
                let can_redo = app.session().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.redo();
                }
                if ui.button("Clear").clicked() {
                    app.clear();
                }
            });
            let history = app.session().history();
            ui.label(format!("History: {} of {}", history.index() + 1, history.len()));
            ui.separator();

            ui.label("Title");
            ui.text_edit_singleline(app.title_mut());
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    app.save();
                }
                if ui.button("Download").clicked() {
                    app.download();
                }
                let label = if app.gallery().open { "Hide gallery" } else { "Gallery" };
                if ui.button(label).clicked() {
                    app.toggle_gallery();
                }
            });

            match app.status() {
                Some(Status::Info(message)) => {
                    ui.label(message.as_str());
                }
                Some(Status::Error(message)) => {
                    ui.colored_label(ui.visuals().error_fg_color, message.as_str());
                }
                None => {}
            }
        });
}

fn colour_section(app: &mut PaintApp, ui: &mut egui::Ui) {
    let current = app.session().selection().color;
    let palette: Vec<egui::Color32> = app
        .session()
        .config()
        .palette
        .iter()
        .filter_map(|hex| color::parse_hex(hex))
        .collect();

    ui.horizontal_wrapped(|ui| {
        for swatch in palette {
            let response = Swatch {
                color: swatch,
                selected: swatch == current,
            }
            .show(ui);
            if response.on_hover_text(color::to_hex(swatch)).clicked() {
                app.session_mut().select_color(swatch);
            }
        }
    });

    ui.horizontal(|ui| {
        let mut picked = current;
        if ui.color_edit_button_srgba(&mut picked).changed() {
            app.session_mut().select_color(picked);
        }
        ui.monospace(color::to_hex(current));
    });
}
