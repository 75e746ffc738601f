#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod color;
pub mod components;
pub mod config;
pub mod error;
pub mod fill;
pub mod history;
pub mod input;
pub mod panels;
pub mod session;
pub mod store;
pub mod stroke;
pub mod surface;
pub mod texture_manager;
pub mod tools;

pub use app::PaintApp;
pub use config::EditorConfig;
pub use error::{ConfigError, DecodeError, EditorError, EncodeError, StoreError, ValidationError};
pub use history::History;
pub use input::{GestureEvent, InputHandler};
pub use session::EditorSession;
pub use store::{DrawingRecord, DrawingStore, JsonFileStore, MemoryStore, NewDrawing};
pub use surface::{RasterSurface, Snapshot};
pub use tools::{GestureOutcome, GesturePhase, Tool, ToolKind, ToolSelection, ToolStateMachine};
