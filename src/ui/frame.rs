//! Display list produced by a watch face for one frame

use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::Rgb565,
    primitives::Rectangle,
};

use super::Paint;
use crate::complications::{DisplayString, ImageHandle};

/// Most operations a frame holds
pub const MAX_OPS: usize = 10;

/// One drawing layer, painted in order
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill the whole screen
    Fill(Rgb565),
    /// Host image scaled into `bounds`
    Image { image: ImageHandle, bounds: Rectangle },
    /// Translucent color over everything painted so far
    Scrim { color: Rgb565, alpha: u8 },
    /// Text centered horizontally on `baseline`, `size` pixels high
    Text {
        text: DisplayString,
        baseline: Point,
        size: u32,
        paint: Paint,
    },
    /// Circular arc, angles in degrees clockwise from 3 o'clock
    Arc {
        center: Point,
        diameter: u32,
        start: f32,
        sweep: f32,
        paint: Paint,
    },
    /// Unfilled circle
    Circle {
        center: Point,
        diameter: u32,
        paint: Paint,
    },
}

/// Ordered drawing operations for one screen refresh
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    size: Size,
    ops: heapless::Vec<DrawOp, MAX_OPS>,
}

impl Frame {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ops: heapless::Vec::new(),
        }
    }

    /// Append an operation, dropping it when the frame is full
    pub fn push(&mut self, op: DrawOp) {
        if self.ops.push(op).is_err() {
            warn!("Frame is full, dropping draw operation");
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Every text painted in this frame
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// `(start, sweep, paint)` of every arc in this frame
    pub fn arcs(&self) -> impl Iterator<Item = (f32, f32, Paint)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Arc {
                start,
                sweep,
                paint,
                ..
            } => Some((*start, *sweep, *paint)),
            _ => None,
        })
    }

    pub fn has_text(&self, text: &str) -> bool {
        self.texts().any(|shown| shown == text)
    }

    pub fn has_image(&self) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, DrawOp::Image { .. }))
    }
}
