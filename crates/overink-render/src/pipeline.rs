//! Two-tier rendering pipeline: committed buffer, viewport buffer, and the
//! frame-coalescing scheduler that throttles live repaints.

use crate::paint::{paint_live_stroke, paint_stroke};
use crate::raster::RasterBuffer;
use kurbo::Vec2;
use overink_core::{DimensionChange, Effect, Engine, Stroke, Viewport};

/// Coalesces live repaint requests to at most one per display frame.
///
/// Pointer events arrive faster than frames; everything between two frames
/// folds into a single pending flag the frame callback consumes.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a repaint on the next frame. Returns `true` if this call
    /// newly scheduled one, `false` if one was already pending.
    pub fn schedule(&mut self) -> bool {
        let fresh = !self.pending;
        self.pending = true;
        fresh
    }

    /// Drop the pending request; an authoritative redraw supersedes it.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// Consume the pending request. Called once per frame; returns whether
    /// a repaint was due.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// The two raster tiers and the scheduler driving them.
///
/// The committed buffer spans the whole document and holds every committed
/// stroke; it is rebuilt only when the collection changes. The viewport
/// buffer spans the visible region and is recomposed cheaply per frame:
/// blit the committed window, then paint the live stroke on top.
pub struct RenderPipeline {
    committed: RasterBuffer,
    viewport_buf: RasterBuffer,
    scheduler: FrameScheduler,
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self {
            committed: RasterBuffer::new(0, 0),
            viewport_buf: RasterBuffer::new(0, 0),
            scheduler: FrameScheduler::new(),
        }
    }

    /// Repaint the committed buffer from scratch in insertion order.
    pub fn rebuild_committed(&mut self, strokes: &[Stroke]) {
        self.committed.clear();
        for stroke in strokes {
            paint_stroke(&mut self.committed, stroke, Vec2::ZERO);
        }
    }

    /// Recompose the viewport buffer: committed window first, live stroke
    /// (if any) on top.
    pub fn render_viewport(&mut self, viewport: &Viewport, live: Option<&Stroke>) {
        self.viewport_buf.clear();
        // One integral scroll offset shared by the blit and the live
        // overlay, so the preview stays aligned with committed ink at
        // fractional scroll positions.
        let scroll_x = viewport.scroll_x.round().max(0.0);
        let scroll_y = viewport.scroll_y.round().max(0.0);
        self.viewport_buf
            .copy_from(&self.committed, scroll_x as u32, scroll_y as u32);
        if let Some(stroke) = live {
            paint_live_stroke(
                &mut self.viewport_buf,
                stroke,
                Vec2::new(-scroll_x, -scroll_y),
            );
        }
    }

    /// React to a geometry update: resize only the buffers the change
    /// invalidates, then recompose the viewport.
    pub fn handle_dimension_change(
        &mut self,
        change: DimensionChange,
        viewport: &Viewport,
        strokes: &[Stroke],
        live: Option<&Stroke>,
    ) {
        match change {
            DimensionChange::None => return,
            DimensionChange::ViewportOnly => {
                self.viewport_buf.resize(
                    viewport.viewport_width.ceil() as u32,
                    viewport.viewport_height.ceil() as u32,
                );
            }
            DimensionChange::Document => {
                self.viewport_buf.resize(
                    viewport.viewport_width.ceil() as u32,
                    viewport.viewport_height.ceil() as u32,
                );
                self.committed.resize(
                    viewport.total_width.ceil() as u32,
                    viewport.total_height.ceil() as u32,
                );
                self.rebuild_committed(strokes);
            }
        }
        self.render_viewport(viewport, live);
    }

    /// Execute the rendering effects of one handled event. `ScrollBy` is
    /// the host's to perform (it owns the scrollable surface) and is
    /// skipped here.
    pub fn apply(&mut self, effects: &[Effect], engine: &Engine) {
        for effect in effects {
            match effect {
                Effect::ScheduleRepaint => {
                    self.scheduler.schedule();
                }
                Effect::CancelScheduledRepaint => self.scheduler.cancel(),
                Effect::RebuildCommitted => self.rebuild_committed(engine.strokes()),
                Effect::RepaintViewport => {
                    self.render_viewport(engine.viewport(), engine.live_stroke())
                }
                Effect::ScrollBy(_) => {}
            }
        }
    }

    /// Per-frame tick: repaint the viewport if a coalesced repaint is due.
    /// Returns whether anything was repainted.
    pub fn on_frame(&mut self, engine: &Engine) -> bool {
        if self.scheduler.take() {
            self.render_viewport(engine.viewport(), engine.live_stroke());
            true
        } else {
            false
        }
    }

    pub fn committed(&self) -> &RasterBuffer {
        &self.committed
    }

    pub fn viewport_buffer(&self) -> &RasterBuffer {
        &self.viewport_buf
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}
