//! Tool selection and per-tool configuration.

use crate::stroke::{HIGHLIGHTER_OPACITY, Rgb, Stroke, ToolKind};
use kurbo::Point;
use std::ops::RangeInclusive;

/// Allowed pen width range.
pub const PEN_WIDTH_RANGE: RangeInclusive<f64> = 1.0..=20.0;
/// Allowed highlighter width range.
pub const HIGHLIGHTER_WIDTH_RANGE: RangeInclusive<f64> = 5.0..=50.0;
/// Allowed eraser width range.
pub const ERASER_WIDTH_RANGE: RangeInclusive<f64> = 1.0..=100.0;

/// Active tool plus per-tool color and width settings.
///
/// Read by stroke creation; mutated by the (out-of-scope) UI layer through
/// the engine's collaborator surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolConfig {
    current_tool: ToolKind,
    pen_color: Rgb,
    pen_width: f64,
    highlighter_color: Rgb,
    highlighter_width: f64,
    eraser_width: f64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::Pen,
            pen_color: Rgb::BLACK,
            pen_width: 2.0,
            highlighter_color: Rgb::new(0x00, 0xff, 0x00),
            highlighter_width: 20.0,
            eraser_width: 15.0,
        }
    }
}

impl ToolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_tool(&self) -> ToolKind {
        self.current_tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
    }

    /// Configured color of a tool. The eraser has none.
    pub fn color_of(&self, tool: ToolKind) -> Option<Rgb> {
        match tool {
            ToolKind::Pen => Some(self.pen_color),
            ToolKind::Highlighter => Some(self.highlighter_color),
            ToolKind::Eraser => None,
        }
    }

    /// Set the color of a tool; a color for the eraser is ignored.
    pub fn set_color(&mut self, tool: ToolKind, color: Rgb) {
        match tool {
            ToolKind::Pen => self.pen_color = color,
            ToolKind::Highlighter => self.highlighter_color = color,
            ToolKind::Eraser => {}
        }
    }

    /// Configured width of a tool.
    pub fn width_of(&self, tool: ToolKind) -> f64 {
        match tool {
            ToolKind::Pen => self.pen_width,
            ToolKind::Highlighter => self.highlighter_width,
            ToolKind::Eraser => self.eraser_width,
        }
    }

    /// Set the width of a tool, clamped to the tool's allowed range.
    pub fn set_width(&mut self, tool: ToolKind, width: f64) {
        match tool {
            ToolKind::Pen => {
                self.pen_width = width.clamp(*PEN_WIDTH_RANGE.start(), *PEN_WIDTH_RANGE.end());
            }
            ToolKind::Highlighter => {
                self.highlighter_width = width
                    .clamp(*HIGHLIGHTER_WIDTH_RANGE.start(), *HIGHLIGHTER_WIDTH_RANGE.end());
            }
            ToolKind::Eraser => {
                self.eraser_width =
                    width.clamp(*ERASER_WIDTH_RANGE.start(), *ERASER_WIDTH_RANGE.end());
            }
        }
    }

    /// Opacity new strokes of a tool are created with.
    pub fn opacity_of(&self, tool: ToolKind) -> f64 {
        match tool {
            ToolKind::Highlighter => HIGHLIGHTER_OPACITY,
            ToolKind::Pen | ToolKind::Eraser => 1.0,
        }
    }

    /// Build a new in-progress stroke for the current tool at `origin`
    /// (document coordinates).
    pub fn start_stroke(&self, origin: Point) -> Stroke {
        let tool = self.current_tool;
        Stroke::new(
            tool,
            origin,
            self.color_of(tool).unwrap_or(Rgb::BLACK),
            self.width_of(tool),
            self.opacity_of(tool),
        )
    }
}
