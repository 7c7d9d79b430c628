use crate::{
    canvas::{raster::RasterCanvas, snapshot::Snapshot},
    export::tensor::{ExportRequest, ExportedTensor, export_tensor},
    foundation::{core::Point, error::InkResult},
};

/// Pointer input as delivered by a UI shell, in canvas-local pixels (origin top-left).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Clear,
}

/// Recorder state. A clear collapses straight back into `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawState {
    #[default]
    Idle,
    Drawing,
}

/// Canvas mutation requested by a state transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    None,
    BeginStroke(Point),
    ExtendStroke(Point),
    FinishStroke,
    Clear,
}

impl DrawState {
    /// Pure transition function.
    pub fn next(self, event: PointerEvent) -> (Self, Action) {
        match (self, event) {
            (_, PointerEvent::Down { x, y }) => {
                (Self::Drawing, Action::BeginStroke(Point::new(x, y)))
            }
            (Self::Drawing, PointerEvent::Move { x, y }) => {
                (Self::Drawing, Action::ExtendStroke(Point::new(x, y)))
            }
            (Self::Idle, PointerEvent::Move { .. }) => (Self::Idle, Action::None),
            (Self::Drawing, PointerEvent::Up) => (Self::Idle, Action::FinishStroke),
            (Self::Idle, PointerEvent::Up) => (Self::Idle, Action::None),
            (_, PointerEvent::Clear) => (Self::Idle, Action::Clear),
        }
    }
}

/// Drives a [`RasterCanvas`] from pointer events.
///
/// The recorder is the canvas' only writer. Ink changes only mark a redraw as pending;
/// [`StrokeRecorder::redraw`] paints everything accumulated since the previous redraw in one
/// incremental pass, so a burst of moves between two paints costs a single render.
#[derive(Debug)]
pub struct StrokeRecorder {
    canvas: RasterCanvas,
    state: DrawState,
    redraw_pending: bool,
}

impl StrokeRecorder {
    pub fn new(canvas: RasterCanvas) -> Self {
        Self {
            canvas,
            state: DrawState::Idle,
            redraw_pending: false,
        }
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn canvas(&self) -> &RasterCanvas {
        &self.canvas
    }

    pub fn into_canvas(self) -> RasterCanvas {
        self.canvas
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw_pending
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.handle(PointerEvent::Down { x, y });
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.handle(PointerEvent::Move { x, y });
    }

    pub fn pointer_up(&mut self) {
        self.handle(PointerEvent::Up);
    }

    pub fn clear(&mut self) {
        self.handle(PointerEvent::Clear);
    }

    /// Apply one event. Returns the canvas action that was taken.
    pub fn handle(&mut self, event: PointerEvent) -> Action {
        let (next, action) = self.state.next(event);
        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, "draw state change");
        }
        self.state = next;

        match action {
            Action::None => {}
            Action::BeginStroke(p) => {
                self.canvas.begin_stroke(p);
                self.redraw_pending = true;
            }
            Action::ExtendStroke(p) => {
                self.canvas.extend_stroke(p);
                self.redraw_pending = true;
            }
            Action::FinishStroke => {
                self.canvas.finish_stroke();
            }
            Action::Clear => {
                // Clearing repaints the buffer immediately; nothing is left to draw.
                self.canvas.clear();
                self.redraw_pending = false;
            }
        }
        action
    }

    /// Apply a sequence of events in order.
    pub fn replay<'a>(&mut self, events: impl IntoIterator<Item = &'a PointerEvent>) {
        for event in events {
            self.handle(*event);
        }
    }

    /// Paint pending ink. Returns `false` when nothing was pending.
    pub fn redraw(&mut self) -> bool {
        if !self.redraw_pending {
            return false;
        }
        self.canvas.render_pending();
        self.redraw_pending = false;
        true
    }

    /// Snapshot of the canvas with all pending ink painted.
    pub fn snapshot(&mut self) -> Snapshot {
        self.redraw();
        self.canvas.snapshot()
    }

    /// Export the current ink as a tensor.
    pub fn export(&mut self, req: &ExportRequest) -> InkResult<ExportedTensor> {
        // A rejected request must not paint pending ink.
        req.validate()?;
        let snap = self.snapshot();
        export_tensor(&snap, req)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/recorder.rs"]
mod tests;
