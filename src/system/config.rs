//! General face configuration

use embassy_time::Duration;

/// How the time string is formatted before the locale suffix is dropped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeFormat {
    /// "3:07 PM", shown as "3:07"
    TwelveHour,
    /// "15:07"
    TwentyFourHour,
}

/// Look and timing of the face
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceConfig {
    /// Redraw period in interactive mode
    pub update_interval: Duration,
    /// Stroke of the seconds and range arcs
    pub second_stroke_width: u32,
    /// Stroke of the ambient circle
    pub ambient_stroke_width: u32,
    /// Distance between the ambient circle and the screen edge
    pub ambient_circle_margin: f32,
    /// Opacity of the time text
    pub text_alpha: u8,
    /// Opacity of title and body text
    pub small_text_alpha: u8,
    /// Opacity of the black scrim over background images
    pub scrim_alpha: u8,
    /// Arc opacity
    pub arc_alpha: u8,
    /// Arc opacity while notifications are muted
    pub muted_arc_alpha: u8,
    /// Time text size as a fraction of the screen height
    pub text_ratio: f32,
    /// Title and body text size as a fraction of the screen height
    pub small_text_ratio: f32,
    /// Time baseline below the screen center, as a fraction of the height
    pub time_offset_ratio: f32,
    /// Title baseline above the time baseline, as a fraction of the height
    pub title_offset_ratio: f32,
    /// Body baseline below the time baseline, as a fraction of the height
    pub body_offset_ratio: f32,
    pub time_format: TimeFormat,
    /// Local time offset from UTC in seconds
    pub utc_offset: i32,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_millis(1000),
            second_stroke_width: 20,
            ambient_stroke_width: 1,
            ambient_circle_margin: 20.0,
            text_alpha: 0xAA,
            small_text_alpha: 0x88,
            scrim_alpha: 0xAA,
            arc_alpha: 0xFF,
            muted_arc_alpha: 80,
            text_ratio: 0.25,
            small_text_ratio: 0.075,
            time_offset_ratio: 0.10,
            title_offset_ratio: 0.20,
            body_offset_ratio: 0.075,
            time_format: TimeFormat::TwelveHour,
            utc_offset: 0,
        }
    }
}

impl FaceConfig {
    /// Create new face configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_format(mut self, time_format: TimeFormat) -> Self {
        self.time_format = time_format;
        self
    }

    pub fn with_utc_offset(mut self, seconds: i32) -> Self {
        self.utc_offset = seconds;
        self
    }

    /// Redraw period in whole milliseconds, never zero
    pub fn update_interval_ms(&self) -> u64 {
        self.update_interval.as_millis().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_face_style() {
        let config = FaceConfig::new();
        assert_eq!(config.update_interval_ms(), 1000);
        assert_eq!(config.second_stroke_width, 20);
        assert_eq!((config.arc_alpha, config.muted_arc_alpha), (255, 80));
        assert_eq!(config.time_format, TimeFormat::TwelveHour);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let config = FaceConfig {
            update_interval: Duration::from_millis(0),
            ..FaceConfig::default()
        };
        assert_eq!(config.update_interval_ms(), 1);
    }

    #[test]
    fn builders_override_fields() {
        let config = FaceConfig::new()
            .with_time_format(TimeFormat::TwentyFourHour)
            .with_utc_offset(3_600);
        assert_eq!(config.time_format, TimeFormat::TwentyFourHour);
        assert_eq!(config.utc_offset, 3_600);
    }
}
