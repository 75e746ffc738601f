//! Conversions between the colour types used by the editor.
//!
//! Tool colours are `egui::Color32` (what the front-end picks with), pixels are
//! `image::Rgba<u8>`, and colours cross the UI boundary as `#rrggbb` strings.

use egui::Color32;
use image::Rgba;

/// Fully transparent pixel, returned for reads outside the surface
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Opaque white, the canvas background
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Parse `#rrggbb` (leading `#` optional, any case).
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Like [`parse_hex`] but malformed input becomes black.
pub fn parse_hex_or_black(hex: &str) -> Color32 {
    parse_hex(hex).unwrap_or_else(|| {
        log::warn!("Malformed colour {:?}, falling back to black", hex);
        Color32::BLACK
    })
}

/// Lowercase `#rrggbb`, alpha dropped
pub fn to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Opaque pixel with the colour's RGB channels
pub fn to_pixel(color: Color32) -> Rgba<u8> {
    Rgba([color.r(), color.g(), color.b(), 255])
}

pub fn from_pixel(pixel: Rgba<u8>) -> Color32 {
    Color32::from_rgb(pixel[0], pixel[1], pixel[2])
}

/// Channel equality ignoring alpha
pub fn same_rgb(a: Rgba<u8>, b: Rgba<u8>) -> bool {
    a[0] == b[0] && a[1] == b[1] && a[2] == b[2]
}
