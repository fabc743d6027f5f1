//! Complication watch face
//!
//! Renders a watch face with the current time, a swinging seconds arc and up to
//! three complications (background image, ranged value arc, title/body text)
//! delivered by an external host. The host feeds lifecycle events through
//! [`engine::WatchFaceEvents`] and asks for frames, which are display lists
//! that [`ui::painter`] rasterizes onto any embedded-graphics display.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod complications;
pub mod config_surface;
pub mod engine;
pub mod system;
pub mod ui;

pub use complications::{ComplicationData, ComplicationText, ImageHandle, PayloadKind, Slot};
pub use engine::{Engine, Invalidate, WatchFaceEvents};
pub use system::{config::FaceConfig, scheduler::TickTimer};
pub use ui::frame::{DrawOp, Frame};
