//! Complication watchface
//!
//! Time in the middle, complication title and body around it, a seconds arc
//! swinging back and forth once per minute and a range arc on the opposite
//! side. Ambient mode keeps the time and a thin circle only.

use chrono::{NaiveDateTime, Timelike};
use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::{Rgb565, RgbColor},
};

use super::{DrawOp, Frame, Paint, WatchFace, WatchFaceState};
use crate::{
    complications::{state::display_string, ComplicationData, ComplicationState, Error, Slot},
    system::config::{FaceConfig, TimeFormat},
};

/// Degrees the seconds arc grows per second
const DEGREES_PER_SECOND: f32 = 6.0;
/// Base rotation of the range arc, opposite the seconds arc
const RANGE_ARC_OFFSET: f32 = 90.0;

/// Render engine of the complication face
pub struct ComplicationWatchface {
    config: FaceConfig,
    /// Latest complication values
    complications: ComplicationState,
    /// Mode flags
    state: WatchFaceState,
    /// Screen size
    size: Size,
    center_x: f32,
    center_y: f32,
    /// Cached time text height
    text_size: u32,
    /// Cached title and body text height
    small_text_size: u32,
    text_paint: Paint,
    small_text_paint: Paint,
    second_paint: Paint,
}

impl ComplicationWatchface {
    pub fn new(config: FaceConfig) -> Self {
        Self {
            complications: ComplicationState::new(),
            state: WatchFaceState::default(),
            size: Size::zero(),
            center_x: 0.0,
            center_y: 0.0,
            text_size: 0,
            small_text_size: 0,
            text_paint: Paint::new(Rgb565::WHITE, config.text_alpha).with_stroke(2),
            small_text_paint: Paint::new(Rgb565::WHITE, config.small_text_alpha)
                .with_stroke(config.ambient_stroke_width),
            second_paint: Paint::new(Rgb565::WHITE, config.arc_alpha)
                .with_stroke(config.second_stroke_width),
            config,
        }
    }

    /// Switch between ambient and interactive drawing style
    pub fn set_ambient(&mut self, ambient: bool) {
        self.state.ambient = ambient;
        self.text_paint.low_power = ambient;
        self.small_text_paint.low_power = ambient;
    }

    /// Dim the arcs while muted. Returns whether the mute state changed.
    pub fn set_muted(&mut self, muted: bool) -> bool {
        if self.state.muted == muted {
            return false;
        }
        self.state.muted = muted;
        self.second_paint.alpha = if muted {
            self.config.muted_arc_alpha
        } else {
            self.config.arc_alpha
        };
        true
    }

    /// Flip the swing direction of the seconds arc
    pub fn toggle_second_mode(&mut self) {
        self.state.second_mode = !self.state.second_mode;
    }

    pub fn set_utc_offset(&mut self, seconds: i32) {
        self.config.utc_offset = seconds;
    }

    /// Feed a complication update for slot `id`, text evaluated at `now_ms`
    pub fn apply_complication(
        &mut self,
        id: i32,
        data: Option<&ComplicationData<'_>>,
        now_ms: i64,
    ) -> Result<Slot, Error> {
        let center = (self.center_x, self.center_y);
        self.complications.apply(id, data, center, now_ms)
    }

    pub fn config(&self) -> &FaceConfig {
        &self.config
    }

    pub fn complications(&self) -> &ComplicationState {
        &self.complications
    }

    pub fn state(&self) -> WatchFaceState {
        self.state
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn center(&self) -> (f32, f32) {
        (self.center_x, self.center_y)
    }

    /// Cached `(time, title and body)` text heights
    pub fn text_sizes(&self) -> (u32, u32) {
        (self.text_size, self.small_text_size)
    }

    pub fn second_paint(&self) -> Paint {
        self.second_paint
    }

    fn draw_background(&self, frame: &mut Frame) {
        frame.push(DrawOp::Fill(Rgb565::BLACK));
        if self.state.ambient {
            return;
        }
        if let Some(background) = self.complications.background() {
            // Images narrower than the screen leave black side strips
            frame.push(DrawOp::Image {
                image: background.image,
                bounds: background.bounds,
            });
            frame.push(DrawOp::Scrim {
                color: Rgb565::BLACK,
                alpha: self.config.scrim_alpha,
            });
        }
    }

    fn draw_watch_face(&self, frame: &mut Frame, now: NaiveDateTime) {
        let height = self.size.height as f32;
        let time_y = self.center_y + height * self.config.time_offset_ratio;

        let mut buf = [0u8; 16];
        let time = format_time(&now, self.config.time_format, &mut buf);
        frame.push(DrawOp::Text {
            text: display_string(time),
            baseline: point(self.center_x, time_y),
            size: self.text_size,
            paint: self.text_paint,
        });

        let center = point(self.center_x, self.center_y);

        if self.state.ambient {
            let radius = self.size.width as f32 * 0.5 - self.config.ambient_circle_margin;
            frame.push(DrawOp::Circle {
                center,
                diameter: (libm::roundf(radius * 2.0).max(0.0)) as u32,
                paint: self.small_text_paint,
            });
            return;
        }

        self.draw_text(
            frame,
            self.complications.title(),
            time_y - height * self.config.title_offset_ratio,
        );
        self.draw_text(
            frame,
            self.complications.text(),
            time_y + height * self.config.body_offset_ratio,
        );

        // Arcs run inside the screen edge by half their stroke
        let diameter = self
            .size
            .width
            .min(self.size.height)
            .saturating_sub(self.second_paint.stroke_width);

        let sweep = seconds_sweep(now.second(), self.state.second_mode);
        frame.push(DrawOp::Arc {
            center,
            diameter,
            start: -0.5 * sweep,
            sweep,
            paint: self.second_paint,
        });

        if self.complications.has_range() {
            let sweep = self.complications.range_rotation();
            frame.push(DrawOp::Arc {
                center,
                diameter,
                start: RANGE_ARC_OFFSET - 0.5 * sweep,
                sweep,
                paint: self.second_paint,
            });
        }
    }

    fn draw_text(&self, frame: &mut Frame, text: &str, y: f32) {
        if text.is_empty() {
            return;
        }
        frame.push(DrawOp::Text {
            text: display_string(text),
            baseline: point(self.center_x, y),
            size: self.small_text_size,
            paint: self.small_text_paint,
        });
    }
}

impl WatchFace for ComplicationWatchface {
    fn resize(&mut self, size: Size) {
        debug!("Resizing face to {}x{}", size.width, size.height);
        self.size = size;
        self.center_x = size.width as f32 / 2.0;
        self.center_y = size.height as f32 / 2.0;

        let height = size.height as f32;
        self.text_size = libm::roundf(height * self.config.text_ratio) as u32;
        self.small_text_size = libm::roundf(height * self.config.small_text_ratio) as u32;

        self.complications
            .relayout((self.center_x, self.center_y));
    }

    fn render(&self, now: NaiveDateTime) -> Frame {
        let mut frame = Frame::new(self.size);
        self.draw_background(&mut frame);
        self.draw_watch_face(&mut frame, now);
        frame
    }
}

/// Seconds arc sweep in degrees, mirrored while `second_mode` is set
pub fn seconds_sweep(second: u32, second_mode: bool) -> f32 {
    let sweep = second as f32 * DEGREES_PER_SECOND;
    if second_mode {
        360.0 - sweep
    } else {
        sweep
    }
}

/// Short time string without the trailing AM/PM marker
pub fn format_time<'a>(now: &NaiveDateTime, format: TimeFormat, buf: &'a mut [u8]) -> &'a str {
    let shown = match format {
        TimeFormat::TwelveHour => {
            let (pm, hour) = now.hour12();
            format_no_std::show(
                buf,
                format_args!(
                    "{}:{:02} {}",
                    hour,
                    now.minute(),
                    if pm { "PM" } else { "AM" }
                ),
            )
        }
        TimeFormat::TwentyFourHour => format_no_std::show(
            buf,
            format_args!("{:02}:{:02}", now.hour(), now.minute()),
        ),
    };
    shown
        .unwrap_or("")
        .split(' ')
        .next()
        .unwrap_or("")
}

fn point(x: f32, y: f32) -> Point {
    Point::new(libm::roundf(x) as i32, libm::roundf(y) as i32)
}
