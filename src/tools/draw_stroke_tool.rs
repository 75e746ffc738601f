use egui::{Color32, Pos2};
use image::Rgba;

use super::{GestureOutcome, GesturePhase, Tool};
use crate::color;
use crate::stroke::{Stroke, StrokeStyle};
use crate::surface::RasterSurface;

/// Freehand brush, or the eraser when it paints the background colour
#[derive(Debug, Clone)]
pub struct DrawStrokeTool {
    style: StrokeStyle,
    eraser: bool,
    // Transient state: the stroke being drawn (if any)
    current_stroke: Option<Stroke>,
}

impl DrawStrokeTool {
    pub fn brush(color: Color32, width: f32) -> Self {
        Self {
            style: StrokeStyle::new(color::to_pixel(color), width),
            eraser: false,
            current_stroke: None,
        }
    }

    pub fn eraser(background: Rgba<u8>, width: f32) -> Self {
        Self {
            style: StrokeStyle::new(background, width),
            eraser: true,
            current_stroke: None,
        }
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn current_stroke(&self) -> Option<&Stroke> {
        self.current_stroke.as_ref()
    }
}

impl Tool for DrawStrokeTool {
    fn name(&self) -> &'static str {
        if self.eraser { "Eraser" } else { "Brush" }
    }

    fn phase(&self) -> GesturePhase {
        if self.current_stroke.is_some() {
            GesturePhase::Stroking
        } else {
            GesturePhase::Idle
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2, _surface: &mut RasterSurface) -> GestureOutcome {
        // The path only gets paint once it is extended
        self.current_stroke = Some(Stroke::begin(pos, self.style));
        GestureOutcome::Started
    }

    fn on_pointer_move(&mut self, pos: Pos2, surface: &mut RasterSurface) -> GestureOutcome {
        match &mut self.current_stroke {
            Some(stroke) => {
                stroke.extend_to(pos, surface);
                GestureOutcome::Updated
            }
            None => GestureOutcome::Ignored,
        }
    }

    fn on_pointer_up(&mut self) -> GestureOutcome {
        match self.current_stroke.take() {
            Some(stroke) => {
                log::debug!(
                    "{} stroke finished with {} points",
                    self.name(),
                    stroke.points().len()
                );
                GestureOutcome::Committed
            }
            None => GestureOutcome::Ignored,
        }
    }
}
