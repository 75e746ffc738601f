use egui::{Color32, Pos2};

use super::{GestureOutcome, GesturePhase, Tool};
use crate::fill;
use crate::surface::RasterSurface;

/// Bucket fill. The whole gesture happens on pointer down.
#[derive(Debug, Clone)]
pub struct FillTool {
    color: Color32,
}

impl FillTool {
    pub fn new(color: Color32) -> Self {
        Self { color }
    }
}

impl Tool for FillTool {
    fn name(&self) -> &'static str {
        "Bucket Fill"
    }

    fn phase(&self) -> GesturePhase {
        GesturePhase::Idle
    }

    fn on_pointer_down(&mut self, pos: Pos2, surface: &mut RasterSurface) -> GestureOutcome {
        let pixels = fill::flood_fill(
            surface,
            pos.x.floor() as i64,
            pos.y.floor() as i64,
            self.color,
        );
        GestureOutcome::Filled { pixels }
    }

    fn on_pointer_move(&mut self, _pos: Pos2, _surface: &mut RasterSurface) -> GestureOutcome {
        GestureOutcome::Ignored
    }

    fn on_pointer_up(&mut self) -> GestureOutcome {
        GestureOutcome::Ignored
    }
}
