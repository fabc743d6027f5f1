//! Latest complication values, derived from raw provider payloads

use embedded_graphics::{
    geometry::{Point, Size},
    primitives::Rectangle,
};

use super::{ComplicationData, ComplicationText, Error, ImageHandle, Slot};

/// Angle marking "no active range complication"
pub const RANGE_ABSENT: f32 = -1.0;

const STR_LEN: usize = 64;

/// Text shown on the face, truncated on a char boundary when longer
pub type DisplayString = heapless::String<STR_LEN>;

/// Background image and where it is painted
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Background {
    pub image: ImageHandle,
    pub bounds: Rectangle,
}

/// Most recent value of every slot
#[derive(Clone, Debug, PartialEq)]
pub struct ComplicationState {
    background: Option<Background>,
    range_rotation: f32,
    title: DisplayString,
    text: DisplayString,
}

impl Default for ComplicationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplicationState {
    pub fn new() -> Self {
        Self {
            background: None,
            range_rotation: RANGE_ABSENT,
            title: DisplayString::new(),
            text: DisplayString::new(),
        }
    }

    /// Route an update to the slot owning `id`.
    ///
    /// `center` is the current screen center, `now_ms` the timestamp text is
    /// evaluated at.
    pub fn apply(
        &mut self,
        id: i32,
        data: Option<&ComplicationData<'_>>,
        center: (f32, f32),
        now_ms: i64,
    ) -> Result<Slot, Error> {
        let slot = Slot::from_id(id).ok_or(Error::UnknownSlot(id))?;
        match slot {
            Slot::Background => self.apply_background(data, center),
            Slot::Range => self.apply_range(data),
            Slot::TopText => self.apply_text(data, now_ms),
        }
        .map(|_| slot)
    }

    /// Store a large image background scaled to fill the screen height.
    ///
    /// Other payload kinds clear the background. An image payload without an
    /// image keeps the previous one. The error tells why.
    pub fn apply_background(
        &mut self,
        data: Option<&ComplicationData<'_>>,
        center: (f32, f32),
    ) -> Result<(), Error> {
        let data = match data {
            Some(data) => data,
            None => {
                self.background = None;
                return Ok(());
            }
        };

        match data {
            ComplicationData::LargeImage(Some(image)) => {
                self.background = Some(Background {
                    image: *image,
                    bounds: background_bounds(image.size, center),
                });
                Ok(())
            }
            ComplicationData::LargeImage(None) => Err(Error::MissingImage),
            other => {
                self.background = None;
                Err(Error::WrongKind {
                    slot: Slot::Background,
                    kind: other.kind(),
                })
            }
        }
    }

    /// Store the arc angle for a ranged value, or the absent sentinel.
    pub fn apply_range(&mut self, data: Option<&ComplicationData<'_>>) -> Result<(), Error> {
        self.range_rotation = RANGE_ABSENT;
        match data {
            None => Ok(()),
            Some(ComplicationData::RangedValue { min, max, value }) => {
                match range_rotation(*min, *max, *value) {
                    Some(angle) => {
                        self.range_rotation = angle;
                        Ok(())
                    }
                    None => Err(Error::EmptyRange),
                }
            }
            Some(other) => Err(Error::WrongKind {
                slot: Slot::Range,
                kind: other.kind(),
            }),
        }
    }

    /// Store title and body of a short or long text, evaluated at `now_ms`.
    pub fn apply_text(
        &mut self,
        data: Option<&ComplicationData<'_>>,
        now_ms: i64,
    ) -> Result<(), Error> {
        self.title.clear();
        self.text.clear();

        let (title, text) = match data {
            None => return Ok(()),
            Some(ComplicationData::ShortText { title, text })
            | Some(ComplicationData::LongText { title, text }) => (title, text),
            Some(other) => {
                return Err(Error::WrongKind {
                    slot: Slot::TopText,
                    kind: other.kind(),
                })
            }
        };

        // Plain text is cleaned before it is truncated
        match text {
            Some(ComplicationText::Plain(text)) => push_truncated(&mut self.text, text.trim()),
            Some(text) => {
                let mut buf = DisplayString::new();
                text.evaluate(now_ms, &mut buf);
                push_truncated(&mut self.text, buf.trim());
            }
            None => {}
        }
        match title {
            Some(ComplicationText::Plain(title)) => {
                push_truncated(&mut self.title, clean_title(title))
            }
            Some(title) => {
                let mut buf = DisplayString::new();
                title.evaluate(now_ms, &mut buf);
                push_truncated(&mut self.title, clean_title(&buf));
            }
            None => {}
        }

        Ok(())
    }

    /// Recompute image placement after the screen size changed
    pub fn relayout(&mut self, center: (f32, f32)) {
        if let Some(background) = self.background.as_mut() {
            background.bounds = background_bounds(background.image.size, center);
        }
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    /// Arc angle in degrees, [`RANGE_ABSENT`] without a ranged value
    pub fn range_rotation(&self) -> f32 {
        self.range_rotation
    }

    pub fn has_range(&self) -> bool {
        self.range_rotation >= 0.0
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl ComplicationText<'_> {
    /// Write the text as shown at `now_ms` into `out`
    pub fn evaluate(&self, now_ms: i64, out: &mut DisplayString) {
        match self {
            Self::Plain(text) => push_truncated(out, text),
            Self::TimeDifference { reference_ms } => {
                let mut buf = [0u8; 16];
                let shown = format_time_difference(now_ms, *reference_ms, &mut buf);
                push_truncated(out, shown);
            }
        }
    }
}

/// Arc angle for a ranged value, `None` when the range is empty.
///
/// Values outside `[min, max]` are not clamped.
pub fn range_rotation(min: f32, max: f32, value: f32) -> Option<f32> {
    let span = max - min;
    if span == 0.0 || !span.is_finite() || !value.is_finite() {
        return None;
    }
    Some(value * 360.0 / span)
}

/// Placement for an image of `size`: scaled to the screen height, centered
/// horizontally and anchored at the top.
pub fn background_bounds(size: Size, center: (f32, f32)) -> Rectangle {
    let (center_x, center_y) = center;
    let ar = if size.width == size.height || size.height == 0 {
        1.0
    } else {
        size.width as f32 / size.height as f32
    };
    let half_width = center_x * ar;
    let width = (half_width * 2.0) as u32;
    let height = center_y as u32 * 2;

    Rectangle::new(
        Point::new((center_x - half_width) as i32, 0),
        Size::new(width, height),
    )
}

/// Strip a parenthesized suffix, then a " - " suffix, until neither remains.
pub fn clean_title(title: &str) -> &str {
    let mut title = title.trim();
    while let Some(idx) = title.rfind('(') {
        title = title[..idx].trim();
    }
    while title.contains(" - ") {
        match title.rfind('-') {
            Some(idx) => title = title[..idx].trim(),
            None => break,
        }
    }
    title
}

/// Short single unit distance between two instants, rounded up
fn format_time_difference(now_ms: i64, reference_ms: i64, buf: &mut [u8]) -> &str {
    const MINUTE: u64 = 60_000;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    let diff = now_ms.abs_diff(reference_ms);
    let ceil = |unit: u64| diff.div_ceil(unit);
    let shown = if diff < MINUTE {
        format_no_std::show(buf, format_args!("Now"))
    } else if diff < HOUR {
        format_no_std::show(buf, format_args!("{}m", ceil(MINUTE)))
    } else if diff < DAY {
        format_no_std::show(buf, format_args!("{}h", ceil(HOUR)))
    } else {
        format_no_std::show(buf, format_args!("{}d", ceil(DAY)))
    };
    shown.unwrap_or("")
}

/// Copy `text` into a display string, truncated to capacity
pub fn display_string(text: &str) -> DisplayString {
    let mut out = DisplayString::new();
    push_truncated(&mut out, text);
    out
}

/// Append as much of `text` as fits
fn push_truncated(out: &mut DisplayString, text: &str) {
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complications::PayloadKind;

    const CENTER: (f32, f32) = (100.0, 100.0);

    #[test]
    fn range_angle_follows_value() {
        let mut state = ComplicationState::new();
        let data = ComplicationData::RangedValue {
            min: 0.0,
            max: 100.0,
            value: 25.0,
        };
        assert_eq!(state.apply_range(Some(&data)), Ok(()));
        assert_eq!(state.range_rotation(), 90.0);
        assert!(state.has_range());

        assert_eq!(state.apply_range(None), Ok(()));
        assert_eq!(state.range_rotation(), RANGE_ABSENT);
    }

    #[test]
    fn range_rejects_other_kinds() {
        let mut state = ComplicationState::new();
        let ranged = ComplicationData::RangedValue {
            min: 0.0,
            max: 10.0,
            value: 5.0,
        };
        state.apply_range(Some(&ranged)).unwrap();

        let text = ComplicationData::ShortText {
            title: None,
            text: Some(ComplicationText::Plain("12")),
        };
        assert_eq!(
            state.apply_range(Some(&text)),
            Err(Error::WrongKind {
                slot: Slot::Range,
                kind: PayloadKind::ShortText
            })
        );
        assert_eq!(state.range_rotation(), RANGE_ABSENT);
    }

    #[test]
    fn empty_range_is_absent() {
        let mut state = ComplicationState::new();
        let data = ComplicationData::RangedValue {
            min: 5.0,
            max: 5.0,
            value: 5.0,
        };
        assert_eq!(state.apply_range(Some(&data)), Err(Error::EmptyRange));
        assert!(!state.has_range());
    }

    #[test]
    fn range_is_not_clamped() {
        assert_eq!(range_rotation(0.0, 10.0, 15.0), Some(540.0));
        // Offset ranges only use the span
        assert_eq!(range_rotation(10.0, 20.0, 15.0), Some(540.0));
    }

    #[test]
    fn wide_background_is_centered_and_top_anchored() {
        let bounds = background_bounds(Size::new(400, 200), CENTER);
        assert_eq!(bounds.top_left, Point::new(-100, 0));
        assert_eq!(bounds.size, Size::new(400, 200));
    }

    #[test]
    fn square_background_fills_screen() {
        let bounds = background_bounds(Size::new(50, 50), CENTER);
        assert_eq!(bounds, Rectangle::new(Point::zero(), Size::new(200, 200)));
    }

    #[test]
    fn background_cleared_by_null_and_wrong_kind() {
        let mut state = ComplicationState::new();
        let image = ComplicationData::LargeImage(Some(ImageHandle::new(7, 10, 10)));
        state.apply_background(Some(&image), CENTER).unwrap();
        assert_eq!(state.background().map(|b| b.image.id), Some(7));

        state.apply_background(None, CENTER).unwrap();
        assert!(state.background().is_none());

        state.apply_background(Some(&image), CENTER).unwrap();
        assert_eq!(
            state.apply_background(Some(&ComplicationData::Icon(None)), CENTER),
            Err(Error::WrongKind {
                slot: Slot::Background,
                kind: PayloadKind::Icon
            })
        );
        assert!(state.background().is_none());
    }

    #[test]
    fn image_less_payload_keeps_background() {
        let mut state = ComplicationState::new();
        let image = ComplicationData::LargeImage(Some(ImageHandle::new(7, 10, 10)));
        state.apply_background(Some(&image), CENTER).unwrap();

        assert_eq!(
            state.apply_background(Some(&ComplicationData::LargeImage(None)), CENTER),
            Err(Error::MissingImage)
        );
        assert_eq!(state.background().map(|b| b.image.id), Some(7));
    }

    #[test]
    fn relayout_moves_background() {
        let mut state = ComplicationState::new();
        let image = ComplicationData::LargeImage(Some(ImageHandle::new(1, 20, 10)));
        state.apply_background(Some(&image), (0.0, 0.0)).unwrap();
        state.relayout(CENTER);
        assert_eq!(
            state.background().map(|b| b.bounds),
            Some(Rectangle::new(Point::new(-100, 0), Size::new(400, 200)))
        );
    }

    #[test]
    fn title_suffixes_are_stripped() {
        assert_eq!(clean_title("  Weather (Lisbon) "), "Weather");
        assert_eq!(clean_title("Next event - Calendar"), "Next event");
        assert_eq!(clean_title("Steps - today (fit)"), "Steps");
        assert_eq!(clean_title("a(b(c"), "a");
        assert_eq!(clean_title("Well-being"), "Well-being");
        assert_eq!(clean_title("A - B-C"), "A");
    }

    #[test]
    fn text_is_evaluated_and_trimmed() {
        let mut state = ComplicationState::new();
        let data = ComplicationData::LongText {
            title: Some(ComplicationText::Plain("Meeting (work)")),
            text: Some(ComplicationText::TimeDifference {
                reference_ms: 90 * 60_000,
            }),
        };
        state.apply_text(Some(&data), 0).unwrap();
        assert_eq!(state.title(), "Meeting");
        assert_eq!(state.text(), "2h");

        state.apply_text(Some(&data), 90 * 60_000 - 30_000).unwrap();
        assert_eq!(state.text(), "Now");
    }

    #[test]
    fn text_cleared_by_other_kinds() {
        let mut state = ComplicationState::new();
        let data = ComplicationData::ShortText {
            title: Some(ComplicationText::Plain("Title")),
            text: Some(ComplicationText::Plain(" 12 ")),
        };
        state.apply_text(Some(&data), 0).unwrap();
        assert_eq!((state.title(), state.text()), ("Title", "12"));

        let ranged = ComplicationData::RangedValue {
            min: 0.0,
            max: 1.0,
            value: 0.5,
        };
        assert!(state.apply_text(Some(&ranged), 0).is_err());
        assert_eq!((state.title(), state.text()), ("", ""));
    }

    #[test]
    fn long_text_is_truncated() {
        let long = "x".repeat(100);
        let mut state = ComplicationState::new();
        let data = ComplicationData::LongText {
            title: None,
            text: Some(ComplicationText::Plain(&long)),
        };
        state.apply_text(Some(&data), 0).unwrap();
        assert_eq!(state.text().len(), STR_LEN);
    }

    #[test]
    fn long_title_suffix_is_stripped_before_truncation() {
        // The " - " separator straddles the display capacity
        let long = format!("{} - Calendar", "a".repeat(62));
        let mut state = ComplicationState::new();
        let data = ComplicationData::ShortText {
            title: Some(ComplicationText::Plain(&long)),
            text: None,
        };
        state.apply_text(Some(&data), 0).unwrap();
        assert_eq!(state.title(), "a".repeat(62));
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut state = ComplicationState::new();
        assert_eq!(
            state.apply(9, None, CENTER, 0),
            Err(Error::UnknownSlot(9))
        );
        assert_eq!(state.apply(1, None, CENTER, 0), Ok(Slot::Range));
    }
}
