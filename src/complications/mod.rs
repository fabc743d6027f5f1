//! Complication payloads delivered by data providers

use core::fmt;

use embedded_graphics::geometry::Size;

pub mod registry;
pub mod state;

pub use registry::{slot_id, slot_ids, supported_payload_kinds, COMPLICATION_IDS};
pub use state::{ComplicationState, DisplayString, RANGE_ABSENT};

/// Fixed complication positions on the face
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    /// Full screen image behind the time
    Background,
    /// Progress arc around the edge
    Range,
    /// Title above and body below the time
    TopText,
}

/// Kinds of data a provider can deliver
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadKind {
    NoData,
    Empty,
    ShortText,
    LongText,
    RangedValue,
    Icon,
    SmallImage,
    LargeImage,
}

/// Handle to an image owned by the host.
///
/// The pixels never pass through the face: the painter resolves the handle
/// through an [`ImageStore`](crate::ui::painter::ImageStore).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageHandle {
    /// Host side identifier
    pub id: u16,
    /// Intrinsic image size in pixels
    pub size: Size,
}

impl ImageHandle {
    pub const fn new(id: u16, width: u32, height: u32) -> Self {
        Self {
            id,
            size: Size::new(width, height),
        }
    }
}

/// Provider text that may depend on the time it is shown at
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ComplicationText<'a> {
    /// Fixed text
    Plain(&'a str),
    /// Distance to a reference instant, e.g. "5m" or "2h"
    TimeDifference {
        /// Reference instant in milliseconds since the Unix epoch
        reference_ms: i64,
    },
}

/// Data for one complication update, fully formed by the host
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ComplicationData<'a> {
    NoData,
    Empty,
    ShortText {
        title: Option<ComplicationText<'a>>,
        text: Option<ComplicationText<'a>>,
    },
    LongText {
        title: Option<ComplicationText<'a>>,
        text: Option<ComplicationText<'a>>,
    },
    RangedValue {
        min: f32,
        max: f32,
        value: f32,
    },
    Icon(Option<ImageHandle>),
    SmallImage(Option<ImageHandle>),
    LargeImage(Option<ImageHandle>),
}

impl ComplicationData<'_> {
    /// Kind tag of this payload
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::NoData => PayloadKind::NoData,
            Self::Empty => PayloadKind::Empty,
            Self::ShortText { .. } => PayloadKind::ShortText,
            Self::LongText { .. } => PayloadKind::LongText,
            Self::RangedValue { .. } => PayloadKind::RangedValue,
            Self::Icon(_) => PayloadKind::Icon,
            Self::SmallImage(_) => PayloadKind::SmallImage,
            Self::LargeImage(_) => PayloadKind::LargeImage,
        }
    }
}

/// Reasons a complication update was not applied as delivered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Payload kind not accepted by the slot
    WrongKind { slot: Slot, kind: PayloadKind },
    /// Update addressed to an id no slot owns
    UnknownSlot(i32),
    /// Ranged value with `max == min`
    EmptyRange,
    /// Image payload without an image, the previous image stays
    MissingImage,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongKind { slot, kind } => {
                write!(f, "wrong {:?} complication type: {:?}", slot, kind)
            }
            Self::UnknownSlot(id) => write!(f, "no complication slot with id {}", id),
            Self::EmptyRange => f.write_str("ranged value has an empty range"),
            Self::MissingImage => f.write_str("image complication without an image"),
        }
    }
}
