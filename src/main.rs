#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

#[cfg(not(target_arch = "wasm32"))]
use eframe_sketch::{DrawingStore, EditorConfig, JsonFileStore, MemoryStore, PaintApp};

#[cfg(not(target_arch = "wasm32"))]
const CONFIG_PATH: &str = "sketch.json";

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = match EditorConfig::load_or_default(CONFIG_PATH) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Ignoring {}: {}", CONFIG_PATH, err);
            EditorConfig::default()
        }
    };

    let store: Box<dyn DrawingStore> = match JsonFileStore::open(&config.store_path) {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::warn!(
                "Could not open {}: {}; drawings will not outlive this run",
                config.store_path.display(),
                err
            );
            Box::new(MemoryStore::new())
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.canvas_width as f32 + 260.0, config.canvas_height as f32 + 40.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "eframe sketch",
        native_options,
        Box::new(|cc| Ok(Box::new(PaintApp::new(cc, config, store)?))),
    )
}

// The canvas only ships as a native app for now.
#[cfg(target_arch = "wasm32")]
fn main() {}
