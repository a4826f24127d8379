//! Stroke data model and its persisted wire format.

use crate::tools::ToolConfig;
use kurbo::Point;
use peniko::Color;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Fixed translucency applied to every highlighter stroke.
pub const HIGHLIGHTER_OPACITY: f64 = 0.4;

/// Unique identifier for strokes (session-local, never persisted).
pub type StrokeId = Uuid;

/// Available annotation tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pen,
    Highlighter,
    Eraser,
}

/// RGB color, serialized as a `#rrggbb` hex string on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Format as a `#rrggbb` hex string.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for Color {
    fn from(color: Rgb) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, 255)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Rgb::from_hex(&hex)
            .ok_or_else(|| D::Error::custom(format!("invalid color string: {:?}", hex)))
    }
}

/// One user-drawn mark.
///
/// Points are in document coordinates (scroll-independent); insertion order
/// is drawing order. A finalized highlighter stroke holds exactly its two
/// endpoints. Eraser strokes exist only transiently to drive hit-testing and
/// are never committed or persisted.
#[derive(Debug, Clone)]
pub struct Stroke {
    pub id: StrokeId,
    pub tool: ToolKind,
    pub points: Vec<Point>,
    /// Meaningful for pen and highlighter only.
    pub color: Rgb,
    /// Positive width; pen 1–20, highlighter 5–50, eraser fixed at the
    /// configured eraser width at draw time.
    pub line_width: f64,
    /// In [0, 1]; 1.0 for pen, [`HIGHLIGHTER_OPACITY`] for highlighter.
    pub opacity: f64,
}

impl Stroke {
    /// Create a stroke starting at `origin` with a fresh id.
    pub fn new(tool: ToolKind, origin: Point, color: Rgb, line_width: f64, opacity: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            tool,
            points: vec![origin],
            color,
            line_width,
            opacity,
        }
    }

    pub fn is_eraser(&self) -> bool {
        self.tool == ToolKind::Eraser
    }
}

fn default_record_color() -> Rgb {
    Rgb::BLACK
}

/// Wire format for a persisted stroke.
///
/// Shape on the wire: `tool`, `points`, `color`, `lineWidth`, `opacity`.
/// Width and opacity are optional because legacy payloads omit them; ids
/// are session-local and never written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StrokeRecord {
    pub tool: ToolKind,
    pub points: Vec<Point>,
    #[serde(default = "default_record_color")]
    pub color: Rgb,
    #[serde(rename = "lineWidth", default)]
    pub line_width: Option<f64>,
    #[serde(default)]
    pub opacity: Option<f64>,
}

impl StrokeRecord {
    pub(crate) fn from_stroke(stroke: &Stroke) -> Self {
        Self {
            tool: stroke.tool,
            points: stroke.points.clone(),
            color: stroke.color,
            line_width: Some(stroke.line_width),
            opacity: Some(stroke.opacity),
        }
    }

    /// Convert to a runtime stroke, back-filling fields a legacy payload
    /// omitted with the tool's current defaults.
    pub(crate) fn into_stroke(self, config: &ToolConfig) -> Stroke {
        let line_width = self.line_width.unwrap_or_else(|| match self.tool {
            ToolKind::Pen | ToolKind::Highlighter => config.width_of(self.tool),
            ToolKind::Eraser => 1.0,
        });
        let opacity = self.opacity.unwrap_or(match self.tool {
            ToolKind::Highlighter => HIGHLIGHTER_OPACITY,
            ToolKind::Pen | ToolKind::Eraser => 1.0,
        });
        Stroke {
            id: Uuid::new_v4(),
            tool: self.tool,
            points: self.points,
            color: self.color,
            line_width,
            opacity,
        }
    }
}
