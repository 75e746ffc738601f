use egui::{Pos2, Rect, Vec2};
use image::Rgba;

use crate::surface::RasterSurface;

/// Colour and width a path is stroked with.
///
/// Caps and joins are always round: a pixel is covered when its centre lies
/// within `width / 2` of the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba<u8>,
    pub width: f32,
}

impl StrokeStyle {
    pub fn new(color: Rgba<u8>, width: f32) -> Self {
        Self { color, width }
    }

    fn radius(&self) -> f32 {
        (self.width * 0.5).max(0.5)
    }
}

/// Freehand path being drawn by the brush or eraser.
///
/// Unlike a vector stroke it has no life of its own once painted: each new
/// point rasterizes the segment from the previous point straight onto the
/// surface.
#[derive(Debug, Clone)]
pub struct Stroke {
    points: Vec<Pos2>,
    style: StrokeStyle,
}

impl Stroke {
    /// Begin a path. Nothing is painted until the path is extended.
    pub fn begin(start: Pos2, style: StrokeStyle) -> Self {
        Self {
            points: vec![start],
            style,
        }
    }

    /// Extend the path and paint the new segment
    pub fn extend_to(&mut self, point: Pos2, surface: &mut RasterSurface) {
        if let Some(&last) = self.points.last() {
            draw_segment(surface, last, point, self.style);
        }
        self.points.push(point);
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }
}

/// Segment with round caps, the way the brush paints
pub fn draw_segment(surface: &mut RasterSurface, a: Pos2, b: Pos2, style: StrokeStyle) {
    let r = style.radius();
    let bounds = Rect::from_two_pos(a, b).expand(r);
    covered_pixels(surface, bounds, |center| distance_to_segment(center, a, b) <= r)
        .into_iter()
        .for_each(|(x, y)| surface.write_pixel(x, y, style.color));
}

/// Straight line with flat ends that stop exactly at `a` and `b`
pub fn draw_line(surface: &mut RasterSurface, a: Pos2, b: Pos2, style: StrokeStyle) {
    let r = style.radius();
    let bounds = Rect::from_two_pos(a, b).expand(r);
    covered_pixels(surface, bounds, |center| {
        distance_along_segment(center, a, b).is_some_and(|d| d <= r)
    })
    .into_iter()
    .for_each(|(x, y)| surface.write_pixel(x, y, style.color));
}

/// Outline of the axis-aligned box with `a` and `b` as opposite corners
pub fn draw_rect_outline(surface: &mut RasterSurface, a: Pos2, b: Pos2, style: StrokeStyle) {
    let corners = [a, Pos2::new(b.x, a.y), b, Pos2::new(a.x, b.y)];
    draw_polygon_outline(surface, &corners, style);
}

pub fn draw_circle_outline(surface: &mut RasterSurface, center: Pos2, radius: f32, style: StrokeStyle) {
    let r = style.radius();
    let bounds = Rect::from_center_size(center, Vec2::splat(2.0 * (radius + r)));
    covered_pixels(surface, bounds, |p| (p.distance(center) - radius).abs() <= r)
        .into_iter()
        .for_each(|(x, y)| surface.write_pixel(x, y, style.color));
}

/// Mitred outline of the convex polygon through `points`.
///
/// A pixel is covered when the largest signed distance from its centre to
/// the edge lines lies in `(-r, r]`. Corners sharper than [`MITER_LIMIT`]
/// are bevelled. Polygons without area fall back to flat-ended lines.
pub fn draw_polygon_outline(surface: &mut RasterSurface, points: &[Pos2], style: StrokeStyle) {
    let r = style.radius();
    let Some(edges) = outward_edges(points) else {
        for (i, &from) in points.iter().enumerate() {
            draw_line(surface, from, points[(i + 1) % points.len()], style);
        }
        return;
    };
    let bevels = bevel_planes(&edges, r);

    let bounds = Rect::from_points(points).expand(r * MITER_LIMIT);
    covered_pixels(surface, bounds, |center| {
        let outside = edges
            .iter()
            .map(|edge| edge.distance(center))
            .fold(f32::NEG_INFINITY, f32::max);
        outside > -r && outside <= r && bevels.iter().all(|bevel| bevel.distance(center) <= 0.0)
    })
    .into_iter()
    .for_each(|(x, y)| surface.write_pixel(x, y, style.color));
}

/// Miter length over stroke width past which a corner is bevelled
pub const MITER_LIMIT: f32 = 10.0;

/// Line through `origin` with a unit `normal` pointing outwards
#[derive(Debug, Clone, Copy)]
struct HalfPlane {
    origin: Pos2,
    normal: Vec2,
}

impl HalfPlane {
    fn distance(&self, p: Pos2) -> f32 {
        (p - self.origin).dot(self.normal)
    }
}

/// One half-plane per edge, in order, normals facing away from the centroid.
/// `None` when the polygon encloses no area.
fn outward_edges(points: &[Pos2]) -> Option<Vec<HalfPlane>> {
    if points.len() < 3 {
        return None;
    }
    let n = points.len();
    let twice_area: f32 = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    if twice_area.abs() < 1e-3 {
        return None;
    }
    let centroid = points.iter().fold(Vec2::ZERO, |sum, p| sum + p.to_vec2()) / n as f32;

    let edges = (0..n)
        .filter_map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            let along = b - a;
            if along.length_sq() == 0.0 {
                return None;
            }
            let mut normal = Vec2::new(along.y, -along.x).normalized();
            if (centroid - a.to_vec2()).dot(normal) > 0.0 {
                normal = -normal;
            }
            Some(HalfPlane { origin: a, normal })
        })
        .collect();
    Some(edges)
}

/// Cut-off planes for corners whose miter would be longer than the limit
fn bevel_planes(edges: &[HalfPlane], r: f32) -> Vec<HalfPlane> {
    let n = edges.len();
    (0..n)
        .filter_map(|i| {
            let (incoming, outgoing) = (edges[i], edges[(i + 1) % n]);
            // sine of half the interior angle
            let half_sin = ((1.0 + incoming.normal.dot(outgoing.normal)) * 0.5).sqrt();
            if half_sin * MITER_LIMIT >= 1.0 {
                return None;
            }
            let bisector = (incoming.normal + outgoing.normal).normalized();
            Some(HalfPlane {
                origin: outgoing.origin + bisector * (r * half_sin),
                normal: bisector,
            })
        })
        .collect()
}

/// Pixels of `surface` inside `bounds` whose centre passes `covered`
fn covered_pixels(
    surface: &RasterSurface,
    bounds: Rect,
    covered: impl Fn(Pos2) -> bool,
) -> Vec<(i64, i64)> {
    let min_x = (bounds.min.x.floor() as i64).max(0);
    let min_y = (bounds.min.y.floor() as i64).max(0);
    let max_x = (bounds.max.x.ceil() as i64).min(i64::from(surface.width()) - 1);
    let max_y = (bounds.max.y.ceil() as i64).min(i64::from(surface.height()) - 1);

    let mut hits = Vec::new();
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            if covered(Pos2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                hits.push((x, y));
            }
        }
    }
    hits
}

/// Distance to the segment when `p` projects onto it, `None` past either end
fn distance_along_segment(p: Pos2, a: Pos2, b: Pos2) -> Option<f32> {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return None;
    }
    let t = (p - a).dot(ab) / len_sq;
    (0.0..=1.0).contains(&t).then(|| p.distance(a + ab * t))
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
