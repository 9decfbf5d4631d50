use crate::control::Snapshot;
use vybe_properties::{Color, Rect};

/// Drawing surface handed to [`crate::DesignerAxWidget::paint`].
pub trait Painter {
    fn draw_snapshot(&mut self, at: Rect, snapshot: &Snapshot);

    /// Icon shown in place of a control that is not loaded.
    fn draw_indicator(&mut self, at: Rect);

    fn draw_frame(&mut self, rect: Rect, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    Snapshot(Rect, Snapshot),
    Indicator(Rect),
    Frame(Rect, Color),
}

/// Painter that records its calls, for headless front ends and tests.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    pub ops: Vec<PaintOp>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Painter for RecordingPainter {
    fn draw_snapshot(&mut self, at: Rect, snapshot: &Snapshot) {
        self.ops.push(PaintOp::Snapshot(at, snapshot.clone()));
    }

    fn draw_indicator(&mut self, at: Rect) {
        self.ops.push(PaintOp::Indicator(at));
    }

    fn draw_frame(&mut self, rect: Rect, color: Color) {
        self.ops.push(PaintOp::Frame(rect, color));
    }
}
