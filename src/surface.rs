use std::io::Cursor;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, Rgba, RgbaImage};

use crate::color::{self, TRANSPARENT};
use crate::error::{DecodeError, EncodeError};

/// Prefix of the data urls drawings are stored as
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Immutable PNG-encoded copy of a surface at one instant.
///
/// Cloning is cheap; the encoded bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    png: Arc<[u8]>,
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Decode back into a pixel buffer
    pub fn decode(&self) -> Result<RgbaImage, DecodeError> {
        decode_png(&self.png)
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png", &format!("<{} bytes>", self.png.len()))
            .finish()
    }
}

/// The mutable pixel buffer of the current drawing.
///
/// Dimensions are fixed at construction. Pixel access takes signed
/// coordinates; anything outside the buffer reads as transparent and
/// writes are dropped.
#[derive(Clone, Debug)]
pub struct RasterSurface {
    pixels: RgbaImage,
    background: Rgba<u8>,
}

impl RasterSurface {
    /// Opaque white surface
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, color::WHITE)
    }

    pub fn with_background(width: u32, height: u32, background: Rgba<u8>) -> Self {
        let background = Rgba([background[0], background[1], background[2], 255]);
        Self {
            pixels: RgbaImage::from_pixel(width, height, background),
            background,
        }
    }

    /// Build a surface from an encoded PNG, e.g. a stored drawing
    pub fn from_png(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(Self {
            pixels: decode_png(bytes)?,
            background: color::WHITE,
        })
    }

    pub fn from_data_url(data_url: &str) -> Result<Self, DecodeError> {
        Self::from_png(&decode_data_url(data_url)?)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width()) && y < i64::from(self.height())
    }

    pub fn read_pixel(&self, x: i64, y: i64) -> Rgba<u8> {
        if self.contains(x, y) {
            *self.pixels.get_pixel(x as u32, y as u32)
        } else {
            TRANSPARENT
        }
    }

    pub fn write_pixel(&mut self, x: i64, y: i64, pixel: Rgba<u8>) {
        if self.contains(x, y) {
            self.pixels.put_pixel(x as u32, y as u32, pixel);
        }
    }

    /// Paint every pixel
    pub fn fill(&mut self, pixel: Rgba<u8>) {
        for p in self.pixels.pixels_mut() {
            *p = pixel;
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Overwrite the whole buffer with a same-sized copy. Used to drop a shape
    /// preview before drawing the next one.
    pub(crate) fn copy_from(&mut self, source: &RgbaImage) {
        if source.dimensions() != self.pixels.dimensions() {
            log::error!(
                "Refusing to copy a {:?} buffer onto a {:?} surface",
                source.dimensions(),
                self.pixels.dimensions()
            );
            return;
        }
        self.pixels.copy_from_slice(source.as_raw());
    }

    pub fn export_snapshot(&self) -> Result<Snapshot, EncodeError> {
        Ok(Snapshot {
            width: self.width(),
            height: self.height(),
            png: encode_png(&self.pixels)?.into(),
        })
    }

    /// Replace the pixel content with a snapshot's. On error the surface is
    /// left as it was.
    pub fn restore_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), DecodeError> {
        let decoded = snapshot.decode()?;
        if decoded.dimensions() != self.pixels.dimensions() {
            return Err(DecodeError::DimensionMismatch {
                width: self.width(),
                height: self.height(),
                found_width: decoded.width(),
                found_height: decoded.height(),
            });
        }
        self.pixels = decoded;
        Ok(())
    }

    /// PNG bytes of the current content
    pub fn export_encoding(&self) -> Result<Vec<u8>, EncodeError> {
        encode_png(&self.pixels)
    }

    pub fn export_data_url(&self) -> Result<String, EncodeError> {
        Ok(encode_data_url(&self.export_encoding()?))
    }

    /// Pixel data in the shape egui textures are uploaded from
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(
            [self.width() as usize, self.height() as usize],
            self.pixels.as_raw(),
        )
    }
}

fn encode_png(pixels: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
    let mut bytes = Vec::new();
    pixels.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn decode_png(bytes: &[u8]) -> Result<RgbaImage, DecodeError> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.into_rgba8())
}

pub fn encode_data_url(png: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(png))
}

/// Extract the PNG bytes from a `data:image/png;base64,` url
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, DecodeError> {
    let payload = data_url
        .trim()
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or(DecodeError::NotADataUrl)?;
    Ok(STANDARD.decode(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn test_new_surface_is_opaque_white() {
        let surface = RasterSurface::new(8, 4);
        assert_eq!((surface.width(), surface.height()), (8, 4));
        assert!(surface.pixels().pixels().all(|p| *p == color::WHITE));
    }

    #[test]
    fn test_out_of_bounds_access_is_ignored() {
        let mut surface = RasterSurface::new(10, 10);
        surface.write_pixel(-1, 5, RED);
        surface.write_pixel(10, 5, RED);
        surface.write_pixel(5, 10, RED);
        assert_eq!(surface.read_pixel(0, 5), color::WHITE);
        assert_eq!(surface.read_pixel(9, 5), color::WHITE);
        assert_eq!(surface.read_pixel(-1, 5), TRANSPARENT);
        assert_eq!(surface.read_pixel(10, 5), TRANSPARENT);
        assert!(surface.pixels().pixels().all(|p| *p == color::WHITE));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut surface = RasterSurface::new(16, 16);
        surface.write_pixel(3, 4, RED);
        surface.write_pixel(15, 15, Rgba([1, 2, 3, 255]));
        let snapshot = surface.export_snapshot().unwrap();
        let before = surface.pixels().clone();

        surface.fill(Rgba([0, 0, 0, 255]));
        surface.restore_snapshot(&snapshot).unwrap();
        assert_eq!(surface.pixels(), &before);
    }

    #[test]
    fn test_snapshot_does_not_alias_surface() {
        let mut surface = RasterSurface::new(4, 4);
        let snapshot = surface.export_snapshot().unwrap();
        surface.write_pixel(1, 1, RED);
        let decoded = snapshot.decode().unwrap();
        assert_eq!(*decoded.get_pixel(1, 1), color::WHITE);
    }

    #[test]
    fn test_restore_rejects_mismatched_dimensions() {
        let other = RasterSurface::new(5, 5).export_snapshot().unwrap();
        let mut surface = RasterSurface::new(4, 4);
        surface.write_pixel(0, 0, RED);
        let err = surface.restore_snapshot(&other).unwrap_err();
        assert!(matches!(err, DecodeError::DimensionMismatch { found_width: 5, .. }));
        assert_eq!(surface.read_pixel(0, 0), RED);
    }

    #[test]
    fn test_restore_rejects_garbage() {
        let garbage = Snapshot {
            width: 4,
            height: 4,
            png: Arc::from(&b"definitely not a png"[..]),
        };
        let mut surface = RasterSurface::new(4, 4);
        assert!(matches!(
            surface.restore_snapshot(&garbage),
            Err(DecodeError::Image(_))
        ));
    }

    #[test]
    fn test_data_url_round_trip() {
        let mut surface = RasterSurface::new(6, 3);
        surface.write_pixel(2, 1, RED);
        let url = surface.export_data_url().unwrap();
        assert!(url.starts_with(PNG_DATA_URL_PREFIX));

        let loaded = RasterSurface::from_data_url(&url).unwrap();
        assert_eq!(loaded.pixels(), surface.pixels());
    }

    #[test]
    fn test_data_url_rejects_other_schemes() {
        assert!(matches!(
            decode_data_url("data:image/jpeg;base64,AAAA"),
            Err(DecodeError::NotADataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(DecodeError::Base64(_))
        ));
    }
}
