//! Viewport and document geometry tracking.

use kurbo::{Point, Vec2};

/// What a geometry update changed, and therefore which buffers the
/// rendering pipeline must resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionChange {
    /// Nothing differs; skip buffer resizing.
    None,
    /// Viewport size or scroll offsets changed; resize the viewport buffer
    /// and repaint from the existing committed buffer.
    ViewportOnly,
    /// Total document size changed; additionally resize the committed
    /// buffer and rebuild it from the store.
    Document,
}

/// Current viewport size, scroll offsets, and total document size.
///
/// Recomputed by the host on every resize/scroll tick and fed to
/// [`update`](Self::update); never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub total_width: f64,
    pub total_height: f64,
}

impl Viewport {
    /// Compare `next` against the current geometry and adopt it.
    pub fn update(&mut self, next: Viewport) -> DimensionChange {
        if next == *self {
            return DimensionChange::None;
        }
        let document_changed = next.total_width != self.total_width
            || next.total_height != self.total_height;
        *self = next;
        if document_changed {
            DimensionChange::Document
        } else {
            DimensionChange::ViewportOnly
        }
    }

    /// Convert a viewport-relative point to document coordinates.
    pub fn to_document(&self, point: Point) -> Point {
        Point::new(point.x + self.scroll_x, point.y + self.scroll_y)
    }

    /// Convert a document point to viewport coordinates.
    pub fn to_viewport(&self, point: Point) -> Point {
        Point::new(point.x - self.scroll_x, point.y - self.scroll_y)
    }

    /// Scroll by `delta`, clamped so the viewport stays inside the document.
    pub fn scroll_by(&mut self, delta: Vec2) {
        let max_x = (self.total_width - self.viewport_width).max(0.0);
        let max_y = (self.total_height - self.viewport_height).max(0.0);
        self.scroll_x = (self.scroll_x + delta.x).clamp(0.0, max_x);
        self.scroll_y = (self.scroll_y + delta.y).clamp(0.0, max_y);
    }
}
