use std::convert::Infallible;

use complication_watchface::{
    ui::{
        painter::{paint, NoImages, RawImage, RawImageStore},
        ComplicationWatchface, WatchFace,
    },
    ComplicationData, FaceConfig, ImageHandle,
};
use chrono::NaiveDate;
use embedded_graphics::{
    pixelcolor::{Rgb565, RgbColor},
    prelude::*,
};

/// In-memory RGB565 display
struct Framebuffer {
    size: Size,
    pixels: Vec<Rgb565>,
}

impl Framebuffer {
    fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            pixels: vec![Rgb565::MAGENTA; (width * height) as usize],
        }
    }

    fn at(&self, x: u32, y: u32) -> Rgb565 {
        self.pixels[(y * self.size.width + x) as usize]
    }

    fn count(&self, color: Rgb565) -> usize {
        self.pixels.iter().filter(|pixel| **pixel == color).count()
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && point.y >= 0
                && (point.x as u32) < self.size.width
                && (point.y as u32) < self.size.height
            {
                let idx = point.y as u32 * self.size.width + point.x as u32;
                self.pixels[idx as usize] = color;
            }
        }
        Ok(())
    }
}

fn face(width: u32, height: u32) -> ComplicationWatchface {
    let mut face = ComplicationWatchface::new(FaceConfig::default());
    face.resize(Size::new(width, height));
    face
}

fn noon() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 3)
        .unwrap()
        .and_hms_opt(12, 0, 30)
        .unwrap()
}

#[test]
fn interactive_face_paints_time_and_arc() {
    let face = face(240, 240);
    let mut display = Framebuffer::new(240, 240);
    paint(&face.render(noon()), &mut display, &NoImages).unwrap();

    // Backdrop covers the screen, the arc is fully opaque
    assert_eq!(display.count(Rgb565::MAGENTA), 0);
    assert!(display.count(Rgb565::BLACK) > 0);
    assert!(display.count(Rgb565::WHITE) > 0);
}

#[test]
fn missing_background_falls_back_to_black() {
    let mut face = face(64, 64);
    let image = ComplicationData::LargeImage(Some(ImageHandle::new(5, 64, 64)));
    face.apply_complication(0, Some(&image), 0).unwrap();

    let mut display = Framebuffer::new(64, 64);
    paint(&face.render(noon()), &mut display, &NoImages).unwrap();
    assert_eq!(display.at(0, 0), Rgb565::BLACK);
}

#[test]
fn background_is_scaled_and_dimmed() {
    // 1x1 red image stretched over the whole screen
    let data = [0xF8, 0x00];
    let mut images: RawImageStore<'_, 1> = RawImageStore::new();
    images
        .insert(RawImage {
            id: 5,
            width: 1,
            data: &data,
        })
        .unwrap();

    let mut face = face(64, 64);
    let image = ComplicationData::LargeImage(Some(ImageHandle::new(5, 1, 1)));
    face.apply_complication(0, Some(&image), 0).unwrap();

    let mut display = Framebuffer::new(64, 64);
    paint(&face.render(noon()), &mut display, &images).unwrap();

    // Corner pixels are far from text and inside the arc stroke margin
    let corner = display.at(0, 0);
    assert!(corner.r() > 0 && corner.r() < Rgb565::RED.r());
    assert_eq!((corner.g(), corner.b()), (0, 0));
}

#[test]
fn ambient_face_leaves_most_pixels_dark() {
    let mut face = face(240, 240);
    face.set_ambient(true);
    let mut display = Framebuffer::new(240, 240);
    paint(&face.render(noon()), &mut display, &NoImages).unwrap();

    let lit = 240 * 240 - display.count(Rgb565::BLACK);
    assert!(lit > 0);
    assert!(lit < 240 * 240 / 10);
}

#[test]
fn portrait_background_repaints_every_pixel() {
    // 1x2 red image, half as wide as the screen once scaled
    let data = [0xF8, 0x00, 0xF8, 0x00];
    let mut images: RawImageStore<'_, 1> = RawImageStore::new();
    images
        .insert(RawImage {
            id: 5,
            width: 1,
            data: &data,
        })
        .unwrap();

    let mut face = face(240, 240);
    let image = ComplicationData::LargeImage(Some(ImageHandle::new(5, 1, 2)));
    face.apply_complication(0, Some(&image), 0).unwrap();

    let mut display = Framebuffer::new(240, 240);
    paint(&face.render(noon()), &mut display, &images).unwrap();

    assert_eq!(display.count(Rgb565::MAGENTA), 0);
    // Side strip left of the image, outside the arc ring
    assert_eq!(display.at(2, 10), Rgb565::BLACK);
    // Dimmed image in the middle, clear of text and arcs
    let inside = display.at(120, 60);
    assert!(inside.r() > 0 && inside.r() < Rgb565::RED.r());
}
