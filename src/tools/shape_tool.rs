use egui::{Color32, Pos2};
use image::RgbaImage;

use super::{GestureOutcome, GesturePhase, Tool};
use crate::color;
use crate::stroke::{self, StrokeStyle};
use crate::surface::RasterSurface;

/// Outline shapes dragged out from an anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Segment from anchor to pointer
    Line,
    /// Axis-aligned box with anchor and pointer as opposite corners
    Rectangle,
    /// Centred on the anchor, passing through the pointer
    Circle,
    /// Apex at the anchor, horizontal base through the pointer
    Triangle,
    /// Reserved; draws nothing
    Text,
}

impl Shape {
    pub fn draw(self, surface: &mut RasterSurface, anchor: Pos2, point: Pos2, style: StrokeStyle) {
        match self {
            Shape::Line => stroke::draw_line(surface, anchor, point, style),
            Shape::Rectangle => stroke::draw_rect_outline(surface, anchor, point, style),
            Shape::Circle => {
                stroke::draw_circle_outline(surface, anchor, anchor.distance(point), style)
            }
            Shape::Triangle => {
                stroke::draw_polygon_outline(surface, &triangle_vertices(anchor, point), style)
            }
            Shape::Text => {}
        }
    }
}

/// Isosceles triangle: apex at `anchor`, base from `point` to its mirror
/// across the vertical through the apex.
pub fn triangle_vertices(anchor: Pos2, point: Pos2) -> [Pos2; 3] {
    [anchor, point, Pos2::new(2.0 * anchor.x - point.x, point.y)]
}

/// Shape preview in progress
#[derive(Debug, Clone)]
struct Preview {
    anchor: Pos2,
    /// Surface content as of the last commit; every update starts from it
    base: RgbaImage,
}

#[derive(Debug, Clone)]
pub struct ShapeTool {
    shape: Shape,
    style: StrokeStyle,
    preview: Option<Preview>,
}

impl ShapeTool {
    pub fn new(shape: Shape, color: Color32, width: f32) -> Self {
        Self {
            shape,
            style: StrokeStyle::new(color::to_pixel(color), width),
            preview: None,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }
}

impl Tool for ShapeTool {
    fn name(&self) -> &'static str {
        match self.shape {
            Shape::Line => "Line",
            Shape::Rectangle => "Rectangle",
            Shape::Circle => "Circle",
            Shape::Triangle => "Triangle",
            Shape::Text => "Text",
        }
    }

    fn phase(&self) -> GesturePhase {
        if self.preview.is_some() {
            GesturePhase::PreviewingShape
        } else {
            GesturePhase::Idle
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2, surface: &mut RasterSurface) -> GestureOutcome {
        self.preview = Some(Preview {
            anchor: pos,
            base: surface.pixels().clone(),
        });
        GestureOutcome::Started
    }

    fn on_pointer_move(&mut self, pos: Pos2, surface: &mut RasterSurface) -> GestureOutcome {
        let Some(preview) = &self.preview else {
            return GestureOutcome::Ignored;
        };
        // drop the previous preview before drawing the new one
        surface.copy_from(&preview.base);
        self.shape.draw(surface, preview.anchor, pos, self.style);
        GestureOutcome::Updated
    }

    fn on_pointer_up(&mut self) -> GestureOutcome {
        match self.preview.take() {
            Some(_) => GestureOutcome::Committed,
            None => GestureOutcome::Ignored,
        }
    }
}
