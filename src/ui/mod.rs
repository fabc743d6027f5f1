//! UI definitions module

use chrono::NaiveDateTime;
use embedded_graphics::{
    geometry::Size,
    pixelcolor::{Rgb565, RgbColor},
};

mod complication_watchface;
pub mod frame;
pub mod painter;

pub use complication_watchface::{format_time, seconds_sweep, ComplicationWatchface};
pub use frame::{DrawOp, Frame};

pub trait WatchFace {
    /// Recompute the cached layout for a new screen size
    fn resize(&mut self, size: Size);

    /// Draw the face for local time `now`
    fn render(&self, now: NaiveDateTime) -> Frame;
}

/// Display mode flags of a watch face
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WatchFaceState {
    /// Low-power display mode
    pub ambient: bool,
    /// Notifications are muted
    pub muted: bool,
    /// Seconds arc swings backwards during this minute
    pub second_mode: bool,
}

/// Color, opacity and stroke of a drawing operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paint {
    pub color: Rgb565,
    pub alpha: u8,
    pub stroke_width: u32,
    /// No anti-aliasing, reduced intensity
    pub low_power: bool,
}

impl Paint {
    pub const fn new(color: Rgb565, alpha: u8) -> Self {
        Self {
            color,
            alpha,
            stroke_width: 1,
            low_power: false,
        }
    }

    pub const fn with_stroke(mut self, stroke_width: u32) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    /// Color as it shows over a black background
    pub fn blended(&self) -> Rgb565 {
        let alpha = if self.low_power {
            self.alpha / 2
        } else {
            self.alpha
        };
        blend(self.color, Rgb565::BLACK, alpha)
    }
}

/// Composite `top` over `bottom` with opacity `alpha`
pub fn blend(top: Rgb565, bottom: Rgb565, alpha: u8) -> Rgb565 {
    let a = alpha as u16;
    let mix = |t: u8, b: u8| ((t as u16 * a + b as u16 * (255 - a)) / 255) as u8;
    Rgb565::new(
        mix(top.r(), bottom.r()),
        mix(top.g(), bottom.g()),
        mix(top.b(), bottom.b()),
    )
}
