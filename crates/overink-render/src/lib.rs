//! OverInk Render Library
//!
//! CPU rasterization for the annotation layer: the two-tier buffer
//! pipeline, stroke painting with the per-tool blend modes, and PNG export.

mod export;
mod paint;
mod pipeline;
mod raster;

pub use export::{RenderError, write_png};
pub use paint::{PaintStyle, paint_live_stroke, paint_polyline, paint_stroke};
pub use pipeline::{FrameScheduler, RenderPipeline};
pub use raster::{Blend, RasterBuffer};
