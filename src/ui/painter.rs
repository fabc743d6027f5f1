//! Rasterizes frames onto embedded-graphics displays

use embedded_graphics::{
    geometry::{Angle, Point, Size},
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::{raw::RawU16, Rgb565, RgbColor},
    prelude::*,
    primitives::{Arc, Circle, PrimitiveStyleBuilder, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
    Pixel,
};
use profont::{
    PROFONT_10_POINT, PROFONT_12_POINT, PROFONT_14_POINT, PROFONT_18_POINT, PROFONT_24_POINT,
    PROFONT_7_POINT, PROFONT_9_POINT,
};

use super::{blend, DrawOp, Frame, Paint};
use crate::complications::ImageHandle;

/// Fonts from largest to smallest
const FONTS: [&MonoFont<'static>; 7] = [
    &PROFONT_24_POINT,
    &PROFONT_18_POINT,
    &PROFONT_14_POINT,
    &PROFONT_12_POINT,
    &PROFONT_10_POINT,
    &PROFONT_9_POINT,
    &PROFONT_7_POINT,
];

/// Source of the pixels behind an [`ImageHandle`]
pub trait ImageStore {
    /// Pixel at `(x, y)` of `image`, `None` outside the image or when the
    /// image is unknown
    fn pixel(&self, image: ImageHandle, x: u32, y: u32) -> Option<Rgb565>;

    fn contains(&self, image: ImageHandle) -> bool;
}

/// Store without images, every background falls back to black
pub struct NoImages;

impl ImageStore for NoImages {
    fn pixel(&self, _image: ImageHandle, _x: u32, _y: u32) -> Option<Rgb565> {
        None
    }

    fn contains(&self, _image: ImageHandle) -> bool {
        false
    }
}

/// Big endian RGB565 pixel data, row by row
#[derive(Clone, Copy, Debug)]
pub struct RawImage<'a> {
    pub id: u16,
    pub width: u32,
    pub data: &'a [u8],
}

impl RawImage<'_> {
    fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        if x >= self.width {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 2;
        let bytes = self.data.get(idx..idx + 2)?;
        Some(Rgb565::from(RawU16::new(u16::from_be_bytes([
            bytes[0], bytes[1],
        ]))))
    }
}

/// Fixed capacity store of raw images
pub struct RawImageStore<'a, const N: usize> {
    images: heapless::Vec<RawImage<'a>, N>,
}

impl<const N: usize> Default for RawImageStore<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> RawImageStore<'a, N> {
    pub fn new() -> Self {
        Self {
            images: heapless::Vec::new(),
        }
    }

    /// Add an image, handing it back when the store is full
    pub fn insert(&mut self, image: RawImage<'a>) -> Result<(), RawImage<'a>> {
        self.images.retain(|stored| stored.id != image.id);
        self.images.push(image)
    }

    fn get(&self, id: u16) -> Option<&RawImage<'a>> {
        self.images.iter().find(|image| image.id == id)
    }
}

impl<const N: usize> ImageStore for RawImageStore<'_, N> {
    fn pixel(&self, image: ImageHandle, x: u32, y: u32) -> Option<Rgb565> {
        self.get(image.id)?.pixel(x, y)
    }

    fn contains(&self, image: ImageHandle) -> bool {
        self.get(image.id).is_some()
    }
}

/// Largest font not taller than `height`, the smallest one otherwise
pub fn font_for_height(height: u32) -> &'static MonoFont<'static> {
    FONTS
        .iter()
        .copied()
        .find(|font| font.character_size.height <= height)
        .unwrap_or(FONTS[FONTS.len() - 1])
}

/// Paint every operation of `frame` onto `target`, in order.
///
/// Images missing from `images` leave a black backdrop.
pub fn paint<D, S>(frame: &Frame, target: &mut D, images: &S) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
    S: ImageStore + ?Sized,
{
    let mut ops = frame.ops().iter().peekable();
    while let Some(op) = ops.next() {
        match op {
            DrawOp::Fill(color) => target.clear(*color)?,
            DrawOp::Image { image, bounds } => {
                // Blend a following scrim into the image pixels
                let scrim = match ops.peek() {
                    Some(DrawOp::Scrim { color, alpha }) => Some((*color, *alpha)),
                    _ => None,
                };
                if scrim.is_some() {
                    ops.next();
                }

                if images.contains(*image) {
                    draw_scaled(target, images, *image, *bounds, scrim)?;
                } else {
                    warn!("Background image {} is missing", image.id);
                    target.clear(Rgb565::BLACK)?;
                }
            }
            DrawOp::Scrim { color, alpha } => {
                target.clear(blend(*color, Rgb565::BLACK, *alpha))?;
            }
            DrawOp::Text {
                text,
                baseline,
                size,
                paint,
            } => {
                let style = MonoTextStyle::new(font_for_height(*size), paint.blended());
                let text_style = TextStyleBuilder::new()
                    .alignment(Alignment::Center)
                    .baseline(Baseline::Alphabetic)
                    .build();
                Text::with_text_style(text, *baseline, style, text_style).draw(target)?;
            }
            DrawOp::Arc {
                center,
                diameter,
                start,
                sweep,
                paint,
            } => {
                Arc::with_center(
                    *center,
                    *diameter,
                    Angle::from_degrees(*start),
                    Angle::from_degrees(*sweep),
                )
                .into_styled(stroke(paint))
                .draw(target)?;
            }
            DrawOp::Circle {
                center,
                diameter,
                paint,
            } => {
                Circle::with_center(*center, *diameter)
                    .into_styled(stroke(paint))
                    .draw(target)?;
            }
        }
    }
    Ok(())
}

fn stroke(paint: &Paint) -> embedded_graphics::primitives::PrimitiveStyle<Rgb565> {
    PrimitiveStyleBuilder::new()
        .stroke_color(paint.blended())
        .stroke_width(paint.stroke_width)
        .build()
}

/// Nearest neighbour scaling of `image` into `bounds`, clipped to the target
fn draw_scaled<D, S>(
    target: &mut D,
    images: &S,
    image: ImageHandle,
    bounds: Rectangle,
    scrim: Option<(Rgb565, u8)>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
    S: ImageStore + ?Sized,
{
    let Size { width, height } = bounds.size;
    if width == 0 || height == 0 || image.size.width == 0 || image.size.height == 0 {
        return Ok(());
    }

    let area = bounds.intersection(&target.bounding_box());
    let origin = bounds.top_left;
    let pixels = area.points().filter_map(|p: Point| {
        let dx = (p.x - origin.x) as u64;
        let dy = (p.y - origin.y) as u64;
        let sx = (dx * image.size.width as u64 / width as u64) as u32;
        let sy = (dy * image.size.height as u64 / height as u64) as u32;
        images.pixel(image, sx, sy).map(|color| {
            let color = match scrim {
                Some((scrim, alpha)) => blend(scrim, color, alpha),
                None => color,
            };
            Pixel(p, color)
        })
    });
    target.draw_iter(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_choice_follows_height() {
        assert_eq!(
            font_for_height(60).character_size,
            PROFONT_24_POINT.character_size
        );
        assert_eq!(
            font_for_height(0).character_size,
            PROFONT_7_POINT.character_size
        );
        assert!(font_for_height(18).character_size.height <= 18);
    }

    #[test]
    fn raw_store_reads_big_endian_pixels() {
        // 2x1 image: red, blue
        let data = [0xF8, 0x00, 0x00, 0x1F];
        let mut store: RawImageStore<'_, 2> = RawImageStore::new();
        store
            .insert(RawImage {
                id: 4,
                width: 2,
                data: &data,
            })
            .unwrap();

        let handle = ImageHandle::new(4, 2, 1);
        assert!(store.contains(handle));
        assert_eq!(store.pixel(handle, 0, 0), Some(Rgb565::RED));
        assert_eq!(store.pixel(handle, 1, 0), Some(Rgb565::BLUE));
        assert_eq!(store.pixel(handle, 2, 0), None);
        assert_eq!(store.pixel(handle, 0, 1), None);
        assert!(!store.contains(ImageHandle::new(5, 2, 1)));
    }

    #[test]
    fn full_store_returns_image() {
        let mut store: RawImageStore<'_, 1> = RawImageStore::new();
        let image = RawImage {
            id: 1,
            width: 0,
            data: &[],
        };
        assert!(store.insert(image).is_ok());
        // Replacing the same id does not need space
        assert!(store.insert(image).is_ok());
        assert!(store.insert(RawImage { id: 2, ..image }).is_err());
    }
}
