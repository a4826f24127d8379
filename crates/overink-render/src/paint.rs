//! Stroke rasterization: polylines with round caps into a raster buffer.

use crate::raster::{Blend, RasterBuffer};
use kurbo::{Point, Vec2};
use overink_core::geometry::{point_dist_sq, point_to_segment_dist_sq};
use overink_core::{Rgb, Stroke, ToolKind};

/// Resolved visual parameters for painting one stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintStyle {
    pub color: Rgb,
    pub width: f64,
    pub opacity: f64,
    pub blend: Blend,
}

impl PaintStyle {
    /// The style a committed or live stroke paints with. `None` for eraser
    /// strokes, which deposit no ink of their own.
    pub fn for_stroke(stroke: &Stroke) -> Option<Self> {
        match stroke.tool {
            ToolKind::Eraser => None,
            ToolKind::Pen => Some(Self {
                color: stroke.color,
                width: stroke.line_width,
                opacity: stroke.opacity,
                blend: Blend::SourceOver,
            }),
            ToolKind::Highlighter => Some(Self {
                color: stroke.color,
                width: stroke.line_width,
                opacity: stroke.opacity,
                blend: Blend::Darken,
            }),
        }
    }

    /// The translucent red cursor trail shown while an eraser drag is live.
    pub fn eraser_preview(width: f64) -> Self {
        Self {
            color: Rgb::new(200, 0, 0),
            width,
            opacity: 0.6,
            blend: Blend::SourceOver,
        }
    }
}

/// Paint a polyline into `buffer` with round caps and joins.
///
/// `points` are document coordinates; `offset` translates them into buffer
/// coordinates (zero for the committed buffer, the negated scroll offsets
/// for the viewport buffer). Coverage falls off linearly over the last
/// pixel of the radius, which antialiases the edge.
pub fn paint_polyline(buffer: &mut RasterBuffer, points: &[Point], offset: Vec2, style: &PaintStyle) {
    if points.is_empty() {
        return;
    }
    let radius = style.width / 2.0;
    let shifted: Vec<Point> = points.iter().map(|&p| p + offset).collect();

    // Bounding box of the whole polyline, inflated by the radius.
    let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
    let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
    for p in &shifted {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let x0 = (min_x - radius - 1.0).floor().max(0.0) as u32;
    let y0 = (min_y - radius - 1.0).floor().max(0.0) as u32;
    let x1 = ((max_x + radius + 1.0).ceil() as i64).clamp(0, buffer.width() as i64) as u32;
    let y1 = ((max_y + radius + 1.0).ceil() as i64).clamp(0, buffer.height() as i64) as u32;

    for y in y0..y1 {
        for x in x0..x1 {
            let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let dist_sq = if shifted.len() == 1 {
                point_dist_sq(shifted[0], center)
            } else {
                shifted
                    .windows(2)
                    .map(|seg| point_to_segment_dist_sq(center, seg[0], seg[1]))
                    .fold(f64::MAX, f64::min)
            };
            let coverage = (radius + 0.5 - dist_sq.sqrt()).clamp(0.0, 1.0);
            if coverage > 0.0 {
                buffer.blend_pixel(x, y, style.color, style.opacity * coverage, style.blend);
            }
        }
    }
}

/// Paint a stroke with its own style; eraser strokes paint nothing.
pub fn paint_stroke(buffer: &mut RasterBuffer, stroke: &Stroke, offset: Vec2) {
    if let Some(style) = PaintStyle::for_stroke(stroke) {
        paint_polyline(buffer, &stroke.points, offset, &style);
    }
}

/// Paint the live preview of an in-progress stroke. Pen and highlighter
/// preview with their real style; the eraser previews as a red trail.
pub fn paint_live_stroke(buffer: &mut RasterBuffer, stroke: &Stroke, offset: Vec2) {
    let style = PaintStyle::for_stroke(stroke)
        .unwrap_or_else(|| PaintStyle::eraser_preview(stroke.line_width));
    paint_polyline(buffer, &stroke.points, offset, &style);
}
