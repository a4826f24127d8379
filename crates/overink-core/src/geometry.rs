//! Distance computations used by the eraser resolver.

use kurbo::Point;

/// Squared distance between two points.
pub fn point_dist_sq(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx * dx + dy * dy
}

/// Squared distance from a point to the line segment a→b.
///
/// Projects the point onto the infinite line through the segment, clamps
/// the projection parameter to [0, 1], and measures the squared distance
/// to the clamped projection. A degenerate segment (a == b) falls back to
/// the squared point distance.
pub fn point_to_segment_dist_sq(p: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(p.x - a.x, p.y - a.y);

    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return point_dist_sq(p, a);
    }

    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    point_dist_sq(p, proj)
}
