use egui::{Color32, Pos2};
use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::surface::RasterSurface;

mod draw_stroke_tool;
pub use draw_stroke_tool::DrawStrokeTool;

mod fill_tool;
pub use fill_tool::FillTool;

mod shape_tool;
pub use shape_tool::{Shape, ShapeTool, triangle_vertices};

/// Every tool the toolbox offers
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    #[serde(alias = "bucket")]
    Fill,
    Line,
    Rectangle,
    Circle,
    Triangle,
    /// Selectable but draws nothing yet
    Text,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Fill,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Triangle,
        ToolKind::Text,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Brush => "Brush",
            ToolKind::Eraser => "Eraser",
            ToolKind::Fill => "Bucket Fill",
            ToolKind::Line => "Line",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Circle => "Circle",
            ToolKind::Triangle => "Triangle",
            ToolKind::Text => "Text",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ToolKind::Brush => "🖌",
            ToolKind::Eraser => "⌫",
            ToolKind::Fill => "💧",
            ToolKind::Line => "➖",
            ToolKind::Rectangle => "⬜",
            ToolKind::Circle => "⭕",
            ToolKind::Triangle => "🔺",
            ToolKind::Text => "T",
        }
    }

    /// The shape drawn by a previewing tool, `None` for the others
    pub fn shape(self) -> Option<Shape> {
        match self {
            ToolKind::Line => Some(Shape::Line),
            ToolKind::Rectangle => Some(Shape::Rectangle),
            ToolKind::Circle => Some(Shape::Circle),
            ToolKind::Triangle => Some(Shape::Triangle),
            ToolKind::Text => Some(Shape::Text),
            ToolKind::Brush | ToolKind::Eraser | ToolKind::Fill => None,
        }
    }
}

/// Tool, colour and width the next gesture uses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSelection {
    pub tool: ToolKind,
    pub color: Color32,
    pub brush_size: u32,
}

impl Default for ToolSelection {
    fn default() -> Self {
        Self {
            tool: ToolKind::Brush,
            color: Color32::from_rgb(0x63, 0x66, 0xf1),
            brush_size: 5,
        }
    }
}

/// Where the state machine is within a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    /// Brush or eraser path in progress, painted as it goes
    Stroking,
    /// Shape tool dragging out a preview
    PreviewingShape,
}

impl GesturePhase {
    pub fn name(self) -> &'static str {
        match self {
            GesturePhase::Idle => "Idle",
            GesturePhase::Stroking => "Stroking",
            GesturePhase::PreviewingShape => "PreviewingShape",
        }
    }
}

/// What a pointer event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Nothing happened: no gesture, or the point was not finite
    Ignored,
    /// A stroke or shape preview began
    Started,
    /// The surface changed mid-gesture
    Updated,
    /// A fill ran to completion; the gesture is already over
    Filled { pixels: usize },
    /// A gesture ended and its result is now the permanent surface
    Committed,
}

impl GestureOutcome {
    /// Whether the caller should record a history snapshot
    pub fn needs_snapshot(self) -> bool {
        match self {
            GestureOutcome::Committed => true,
            GestureOutcome::Filled { pixels } => pixels > 0,
            _ => false,
        }
    }
}

/// Interface for all drawing tools
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    fn phase(&self) -> GesturePhase;

    /// Handle pointer press on the canvas
    fn on_pointer_down(&mut self, pos: Pos2, surface: &mut RasterSurface) -> GestureOutcome;

    /// Handle pointer movement. Tools without a gesture in progress ignore it.
    fn on_pointer_move(&mut self, pos: Pos2, surface: &mut RasterSurface) -> GestureOutcome;

    /// Finish the gesture, leaving whatever was drawn on the surface
    fn on_pointer_up(&mut self) -> GestureOutcome;
}

/// All available tool implementations, dispatched without boxing
#[derive(Debug, Clone)]
pub enum ToolType {
    DrawStroke(DrawStrokeTool),
    Fill(FillTool),
    Shape(ShapeTool),
}

impl ToolType {
    /// Build the tool for `selection`. The eraser paints `background`.
    pub fn for_selection(selection: &ToolSelection, background: Rgba<u8>) -> Self {
        let width = selection.brush_size as f32;
        match selection.tool {
            ToolKind::Brush => Self::DrawStroke(DrawStrokeTool::brush(selection.color, width)),
            ToolKind::Eraser => Self::DrawStroke(DrawStrokeTool::eraser(background, width)),
            ToolKind::Fill => Self::Fill(FillTool::new(selection.color)),
            kind => {
                let shape = kind.shape().unwrap_or(Shape::Text);
                Self::Shape(ShapeTool::new(shape, selection.color, width))
            }
        }
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        match self {
            Self::DrawStroke(tool) => tool.name(),
            Self::Fill(tool) => tool.name(),
            Self::Shape(tool) => tool.name(),
        }
    }

    fn phase(&self) -> GesturePhase {
        match self {
            Self::DrawStroke(tool) => tool.phase(),
            Self::Fill(tool) => tool.phase(),
            Self::Shape(tool) => tool.phase(),
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2, surface: &mut RasterSurface) -> GestureOutcome {
        match self {
            Self::DrawStroke(tool) => tool.on_pointer_down(pos, surface),
            Self::Fill(tool) => tool.on_pointer_down(pos, surface),
            Self::Shape(tool) => tool.on_pointer_down(pos, surface),
        }
    }

    fn on_pointer_move(&mut self, pos: Pos2, surface: &mut RasterSurface) -> GestureOutcome {
        match self {
            Self::DrawStroke(tool) => tool.on_pointer_move(pos, surface),
            Self::Fill(tool) => tool.on_pointer_move(pos, surface),
            Self::Shape(tool) => tool.on_pointer_move(pos, surface),
        }
    }

    fn on_pointer_up(&mut self) -> GestureOutcome {
        match self {
            Self::DrawStroke(tool) => tool.on_pointer_up(),
            Self::Fill(tool) => tool.on_pointer_up(),
            Self::Shape(tool) => tool.on_pointer_up(),
        }
    }
}

/// Turns gesture events into surface edits for the selected tool.
///
/// Holds the per-gesture state (anchor point and the active tool's path or
/// preview). The surface is borrowed per call, never owned.
#[derive(Debug, Clone)]
pub struct ToolStateMachine {
    tool: ToolType,
    anchor: Option<Pos2>,
}

impl ToolStateMachine {
    pub fn new(selection: &ToolSelection, background: Rgba<u8>) -> Self {
        Self {
            tool: ToolType::for_selection(selection, background),
            anchor: None,
        }
    }

    /// Swap in the tool for a new selection. Any gesture in progress is
    /// dropped, so callers should end it first.
    pub fn set_selection(&mut self, selection: &ToolSelection, background: Rgba<u8>) {
        if self.is_active() {
            log::warn!("Tool changed mid-gesture, dropping the gesture state");
        }
        self.tool = ToolType::for_selection(selection, background);
        self.anchor = None;
    }

    pub fn phase(&self) -> GesturePhase {
        self.tool.phase()
    }

    pub fn is_active(&self) -> bool {
        self.phase() != GesturePhase::Idle
    }

    /// Start point of the current gesture
    pub fn anchor(&self) -> Option<Pos2> {
        self.anchor
    }

    pub fn tool(&self) -> &ToolType {
        &self.tool
    }

    pub fn gesture_start(&mut self, point: Pos2, surface: &mut RasterSurface) -> GestureOutcome {
        if !point.is_finite() {
            log::debug!("Ignoring gesture start at non-finite point {:?}", point);
            return GestureOutcome::Ignored;
        }
        self.anchor = Some(point);
        let outcome = self.tool.on_pointer_down(point, surface);
        if !self.is_active() {
            // fill (and anything else instantaneous) has no gesture to track
            self.anchor = None;
        }
        outcome
    }

    pub fn gesture_move(&mut self, point: Pos2, surface: &mut RasterSurface) -> GestureOutcome {
        if !point.is_finite() || !self.is_active() {
            return GestureOutcome::Ignored;
        }
        self.tool.on_pointer_move(point, surface)
    }

    pub fn gesture_end(&mut self) -> GestureOutcome {
        if !self.is_active() {
            return GestureOutcome::Ignored;
        }
        self.anchor = None;
        self.tool.on_pointer_up()
    }

    /// The pointer left the canvas mid-gesture: keep what was drawn
    pub fn gesture_leave(&mut self) -> GestureOutcome {
        self.gesture_end()
    }
}
