use egui::{Context, Pos2, Rect};

/// Pointer gesture events in canvas-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Primary button pressed over the canvas
    Start(Pos2),
    /// Pointer moved while a gesture is in progress
    Move(Pos2),
    /// Primary button released
    End,
    /// Pointer left the canvas (or the window) mid-gesture
    Leave,
}

/// One frame of primary-button pointer state, in screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    pub pos: Option<Pos2>,
    pub pressed: bool,
    pub down: bool,
    pub released: bool,
}

/// Handles converting raw egui input into gesture events for the canvas
#[derive(Debug)]
pub struct InputHandler {
    canvas_rect: Rect,
    last_pointer_pos: Option<Pos2>,
    gesture_active: bool,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            canvas_rect,
            last_pointer_pos: None,
            gesture_active: false,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    fn to_canvas(&self, pos: Pos2) -> Pos2 {
        (pos - self.canvas_rect.min).to_pos2()
    }

    /// Read this frame's pointer state from egui and translate it.
    ///
    /// `canvas_hovered` is false when something (a window) covers the canvas
    /// under the pointer; presses there do not start a gesture.
    pub fn process_input(&mut self, ctx: &Context, canvas_hovered: bool) -> Vec<GestureEvent> {
        let sample = ctx.input(|input| PointerSample {
            pos: input.pointer.hover_pos(),
            pressed: input.pointer.primary_pressed() && canvas_hovered,
            down: input.pointer.primary_down(),
            released: input.pointer.primary_released(),
        });
        self.translate(sample)
    }

    pub fn translate(&mut self, sample: PointerSample) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        if sample.pressed {
            if let Some(pos) = sample.pos.filter(|pos| self.canvas_rect.contains(*pos)) {
                events.push(GestureEvent::Start(self.to_canvas(pos)));
                self.gesture_active = true;
                self.last_pointer_pos = Some(pos);
            }
        } else if self.gesture_active {
            match sample.pos {
                Some(pos) if self.canvas_rect.contains(pos) => {
                    if self.last_pointer_pos != Some(pos) {
                        events.push(GestureEvent::Move(self.to_canvas(pos)));
                        self.last_pointer_pos = Some(pos);
                    }
                }
                _ => {
                    events.push(GestureEvent::Leave);
                    self.gesture_active = false;
                    self.last_pointer_pos = None;
                }
            }
        }

        if self.gesture_active && (sample.released || !sample.down) {
            events.push(GestureEvent::End);
            self.gesture_active = false;
            self.last_pointer_pos = None;
        }

        events
    }
}
