//! Eraser hit-testing: which committed strokes does an eraser path touch.

use crate::geometry::{point_dist_sq, point_to_segment_dist_sq};
use crate::stroke::{Stroke, StrokeId};

/// Determine which strokes the completed eraser path touches.
///
/// For every non-eraser stroke, every point sampled along the eraser's path
/// is tested against every consecutive segment of the stroke (or against
/// the lone point for single-point strokes). The collision threshold is
/// `(eraser_width/2 + stroke_width/2)²` in squared-distance space. The
/// first colliding sample dooms the whole stroke and evaluation moves on.
///
/// Returns the ids to remove; the caller removes them as a single batch so
/// every stroke in the sweep was evaluated against a stable collection.
/// O(strokes × eraser-points × segments) — fine, erasing is a discrete
/// user action, not a per-frame path.
pub fn resolve(eraser_points: &[kurbo::Point], eraser_width: f64, strokes: &[Stroke]) -> Vec<StrokeId> {
    let mut doomed = Vec::new();

    'strokes: for stroke in strokes {
        if stroke.is_eraser() || stroke.points.is_empty() {
            continue;
        }

        let radius = eraser_width / 2.0 + stroke.line_width / 2.0;
        let threshold_sq = radius * radius;

        for &eraser_point in eraser_points {
            let hit = if stroke.points.len() == 1 {
                point_dist_sq(stroke.points[0], eraser_point) < threshold_sq
            } else {
                stroke
                    .points
                    .windows(2)
                    .any(|seg| point_to_segment_dist_sq(eraser_point, seg[0], seg[1]) < threshold_sq)
            };

            if hit {
                doomed.push(stroke.id);
                continue 'strokes;
            }
        }
    }

    doomed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{Rgb, ToolKind};
    use kurbo::Point;

    fn pen_segment(from: Point, to: Point, width: f64) -> Stroke {
        let mut stroke = Stroke::new(ToolKind::Pen, from, Rgb::BLACK, width, 1.0);
        stroke.points.push(to);
        stroke
    }

    #[test]
    fn test_point_inside_threshold_removes_stroke() {
        // Segment (0,0)-(100,0), width 2; eraser point (50,1), width 2.
        // threshold² = (1+1)² = 4, squared distance = 1 → removed.
        let stroke = pen_segment(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 2.0);
        let id = stroke.id;

        let doomed = resolve(&[Point::new(50.0, 1.0)], 2.0, &[stroke]);
        assert_eq!(doomed, vec![id]);
    }

    #[test]
    fn test_point_outside_threshold_spares_stroke() {
        // Same widths, eraser at (50,10): squared distance 100 > 4.
        let stroke = pen_segment(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 2.0);

        let doomed = resolve(&[Point::new(50.0, 10.0)], 2.0, &[stroke]);
        assert!(doomed.is_empty());
    }

    #[test]
    fn test_single_point_stroke() {
        let dot = Stroke::new(ToolKind::Pen, Point::new(10.0, 10.0), Rgb::BLACK, 2.0, 1.0);
        let id = dot.id;

        let doomed = resolve(&[Point::new(12.0, 10.0)], 4.0, &[dot.clone()]);
        assert_eq!(doomed, vec![id]);

        let doomed = resolve(&[Point::new(20.0, 10.0)], 4.0, &[dot]);
        assert!(doomed.is_empty());
    }

    #[test]
    fn test_wider_stroke_is_easier_to_hit() {
        let thin = pen_segment(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 2.0);
        let thick = pen_segment(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 16.0);
        let thin_hit = resolve(&[Point::new(50.0, 8.0)], 2.0, std::slice::from_ref(&thin));
        let thick_hit = resolve(&[Point::new(50.0, 8.0)], 2.0, std::slice::from_ref(&thick));

        assert!(thin_hit.is_empty());
        assert_eq!(thick_hit, vec![thick.id]);
    }

    #[test]
    fn test_sweep_marks_multiple_strokes() {
        let a = pen_segment(Point::new(0.0, 0.0), Point::new(0.0, 100.0), 2.0);
        let b = pen_segment(Point::new(10.0, 0.0), Point::new(10.0, 100.0), 2.0);
        let far = pen_segment(Point::new(500.0, 0.0), Point::new(500.0, 100.0), 2.0);
        let expected = vec![a.id, b.id];

        // An eraser path crossing both nearby strokes.
        let path = [Point::new(-2.0, 50.0), Point::new(5.0, 50.0), Point::new(12.0, 50.0)];
        let doomed = resolve(&path, 4.0, &[a, b, far]);
        assert_eq!(doomed, expected);
    }

    #[test]
    fn test_empty_inputs() {
        let stroke = pen_segment(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 2.0);
        assert!(resolve(&[], 4.0, std::slice::from_ref(&stroke)).is_empty());
        assert!(resolve(&[Point::new(0.0, 0.0)], 4.0, &[]).is_empty());
    }
}
