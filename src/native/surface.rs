//! Raster drawing surface — pure pixel work, no OS calls.
//!
//! Takes frames in, scales them onto a canvas, and encodes PNG out.

use crate::capture::{png_data_url, DrawingSurface, FrameDimensions, PlatformError, EMPTY_DATA_URL};
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// Largest canvas area we agree to allocate (16384 x 16384).
pub const MAX_SURFACE_PIXELS: u64 = 16_384 * 16_384;

pub struct RasterSurface {
    canvas: RgbaImage,
}

impl RasterSurface {
    pub fn new(size: FrameDimensions) -> Result<Self, PlatformError> {
        let pixels = u64::from(size.width) * u64::from(size.height);
        if pixels > MAX_SURFACE_PIXELS {
            return Err(PlatformError::new(format!(
                "Cannot allocate a {}x{} drawing surface",
                size.width, size.height
            ))
            .with_detail(format!(
                "{} pixels exceeds the {} pixel limit",
                pixels, MAX_SURFACE_PIXELS
            )));
        }

        Ok(Self {
            canvas: RgbaImage::new(size.width, size.height),
        })
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }
}

impl DrawingSurface for RasterSurface {
    type Frame = RgbaImage;

    fn draw_frame(&mut self, frame: &RgbaImage, x: u32, y: u32, width: u32, height: u32) {
        if width == 0 || height == 0 || frame.width() == 0 || frame.height() == 0 {
            return;
        }

        if frame.dimensions() == (width, height) {
            imageops::replace(&mut self.canvas, frame, i64::from(x), i64::from(y));
        } else {
            let scaled = imageops::resize(frame, width, height, FilterType::Triangle);
            imageops::replace(&mut self.canvas, &scaled, i64::from(x), i64::from(y));
        }
    }

    fn to_data_url(&self) -> Result<String, PlatformError> {
        if self.canvas.width() == 0 || self.canvas.height() == 0 {
            return Ok(EMPTY_DATA_URL.to_string());
        }

        let start = std::time::Instant::now();
        let mut png_bytes: Vec<u8> = Vec::new();
        self.canvas
            .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|e| PlatformError::new(format!("PNG encoding failed: {}", e)))?;

        log::info!(
            "[NATIVE] PNG encoded in {}ms ({} bytes)",
            start.elapsed().as_millis(),
            png_bytes.len()
        );
        Ok(png_data_url(&png_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::decode_data_url;
    use image::Rgba;

    #[test]
    fn draws_same_size_frame_verbatim() {
        let mut surface = RasterSurface::new(FrameDimensions::new(4, 3)).unwrap();
        let frame = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]));
        surface.draw_frame(&frame, 0, 0, 4, 3);
        assert_eq!(surface.canvas().get_pixel(3, 2), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn scales_frame_to_target_rectangle() {
        let mut surface = RasterSurface::new(FrameDimensions::new(8, 8)).unwrap();
        let frame = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        surface.draw_frame(&frame, 0, 0, 8, 8);
        let px = surface.canvas().get_pixel(7, 7);
        assert!(px[0] > 250 && px[1] < 5 && px[3] > 250, "got {:?}", px);
    }

    #[test]
    fn encodes_png_data_url() {
        let surface = RasterSurface::new(FrameDimensions::new(5, 2)).unwrap();
        let url = surface.to_data_url().unwrap();
        let decoded = decode_data_url(&url).unwrap();
        assert_eq!(&decoded.bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
        let img = image::load_from_memory(&decoded.bytes).unwrap();
        assert_eq!((img.width(), img.height()), (5, 2));
    }

    #[test]
    fn zero_area_surface_encodes_empty_url() {
        let mut surface = RasterSurface::new(FrameDimensions::new(0, 0)).unwrap();
        surface.draw_frame(&RgbaImage::new(3, 3), 0, 0, 0, 0);
        assert_eq!(surface.to_data_url().unwrap(), EMPTY_DATA_URL);
    }

    #[test]
    fn oversized_surface_is_refused() {
        let result = RasterSurface::new(FrameDimensions::new(100_000, 100_000));
        assert!(result.is_err());
    }
}
