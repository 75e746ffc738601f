use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings an editor session starts from.
///
/// Every field has a default, so a config file only needs the keys it wants
/// to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// `#rrggbb`; also the eraser colour
    pub background: String,
    pub initial_color: String,
    pub initial_brush_size: u32,
    pub min_brush_size: u32,
    pub max_brush_size: u32,
    /// Keep at most this many snapshots. `None` keeps everything.
    pub history_limit: Option<usize>,
    /// Swatches offered by the colour picker
    pub palette: Vec<String>,
    /// JSON file holding saved drawings
    pub store_path: PathBuf,
    /// Where downloaded PNGs are written
    pub download_dir: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 500,
            background: "#ffffff".to_owned(),
            initial_color: "#6366f1".to_owned(),
            initial_brush_size: 5,
            min_brush_size: 1,
            max_brush_size: 50,
            history_limit: None,
            palette: [
                "#6366f1", // indigo
                "#8b5cf6", // violet
                "#ec4899", // pink
                "#f43f5e", // rose
                "#f97316", // orange
                "#eab308", // yellow
                "#22c55e", // green
                "#06b6d4", // cyan
                "#000000",
                "#ffffff",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            store_path: PathBuf::from("drawings.json"),
            download_dir: PathBuf::from("."),
        }
    }
}

impl EditorConfig {
    /// Read a JSON config file and check it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config: Self = serde_json::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        log::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// `load` when the file exists, defaults otherwise
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas must not be empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.min_brush_size == 0 || self.min_brush_size > self.max_brush_size {
            return Err(ConfigError::Invalid(format!(
                "brush size range {}..={} is empty or starts at zero",
                self.min_brush_size, self.max_brush_size
            )));
        }
        if crate::color::parse_hex(&self.background).is_none() {
            return Err(ConfigError::Invalid(format!(
                "background {:?} is not a #rrggbb colour",
                self.background
            )));
        }
        Ok(())
    }

    pub fn brush_size_range(&self) -> RangeInclusive<u32> {
        self.min_brush_size..=self.max_brush_size
    }
}
