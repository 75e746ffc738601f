//! Bucket fill: breadth-first, 4-connected region recolour.

use std::collections::VecDeque;

use egui::Color32;

use crate::color::{self, same_rgb};
use crate::surface::RasterSurface;

/// Recolour the region of pixels connected to `(x, y)` that share its RGB.
///
/// `hex_color` is the UI's `#rrggbb` string; malformed input fills black.
/// Returns the number of pixels recoloured (0 for a seed outside the surface
/// or when the region already has the fill colour).
pub fn flood_fill_hex(surface: &mut RasterSurface, x: i64, y: i64, hex_color: &str) -> usize {
    flood_fill(surface, x, y, color::parse_hex_or_black(hex_color))
}

pub fn flood_fill(surface: &mut RasterSurface, x: i64, y: i64, fill_color: Color32) -> usize {
    if !surface.contains(x, y) {
        return 0;
    }

    let target = surface.read_pixel(x, y);
    let fill = color::to_pixel(fill_color);
    if same_rgb(target, fill) {
        return 0;
    }

    // Neighbours are pushed unconditionally; a pixel that was already
    // recoloured no longer matches the target and is skipped when popped.
    let mut queue = VecDeque::new();
    queue.push_back((x, y));
    let mut filled = 0;

    while let Some((nx, ny)) = queue.pop_front() {
        if !surface.contains(nx, ny) {
            continue;
        }
        if !same_rgb(surface.read_pixel(nx, ny), target) {
            continue;
        }

        surface.write_pixel(nx, ny, fill);
        filled += 1;

        queue.push_back((nx + 1, ny));
        queue.push_back((nx - 1, ny));
        queue.push_back((nx, ny + 1));
        queue.push_back((nx, ny - 1));
    }

    log::debug!(
        "Flood fill at ({}, {}) recoloured {} pixels to {}",
        x,
        y,
        filled,
        color::to_hex(fill_color)
    );
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn test_fill_uniform_canvas() {
        let mut surface = RasterSurface::new(20, 10);
        assert_eq!(flood_fill_hex(&mut surface, 0, 0, "#000000"), 200);
        assert!(surface.pixels().pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn test_seed_outside_is_noop() {
        let mut surface = RasterSurface::new(5, 5);
        assert_eq!(flood_fill(&mut surface, -1, 0, Color32::BLACK), 0);
        assert_eq!(flood_fill(&mut surface, 5, 5, Color32::BLACK), 0);
        assert!(surface.pixels().pixels().all(|p| *p == color::WHITE));
    }

    #[test]
    fn test_same_colour_is_noop() {
        let mut surface = RasterSurface::new(5, 5);
        surface.write_pixel(2, 2, BLACK);
        let before = surface.pixels().clone();
        assert_eq!(flood_fill_hex(&mut surface, 0, 0, "#ffffff"), 0);
        assert_eq!(surface.pixels(), &before);
    }

    #[test]
    fn test_fill_is_4_connected() {
        // wall down the middle column
        let mut surface = RasterSurface::new(9, 9);
        for y in 0..9 {
            surface.write_pixel(4, y, BLACK);
        }
        let filled = flood_fill(&mut surface, 0, 0, Color32::RED);
        assert_eq!(filled, 4 * 9);
        assert_eq!(surface.read_pixel(3, 8), color::to_pixel(Color32::RED));
        assert_eq!(surface.read_pixel(4, 4), BLACK);
        assert_eq!(surface.read_pixel(5, 0), color::WHITE);
    }

    #[test]
    fn test_diagonal_gap_does_not_leak() {
        let mut surface = RasterSurface::new(3, 3);
        // (0, 0) touches the centre only diagonally
        surface.fill(BLACK);
        surface.write_pixel(1, 1, color::WHITE);
        surface.write_pixel(0, 0, color::WHITE);
        assert_eq!(flood_fill(&mut surface, 1, 1, Color32::GREEN), 1);
        assert_eq!(surface.read_pixel(0, 0), color::WHITE);
    }

    #[test]
    fn test_fill_forces_opaque_alpha() {
        let mut surface = RasterSurface::new(2, 1);
        surface.write_pixel(0, 0, Rgba([255, 255, 255, 10]));
        flood_fill(&mut surface, 0, 0, Color32::BLUE);
        assert_eq!(surface.read_pixel(0, 0)[3], 255);
        assert_eq!(surface.read_pixel(1, 0), color::to_pixel(Color32::BLUE));
    }
}
