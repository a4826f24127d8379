//! The annotation engine: owns all state, ties the components together.

use crate::eraser;
use crate::gesture::{GestureMachine, GestureOutcome, GesturePhase, InputEvent};
use crate::storage::{PageKey, PageStore};
use crate::store::StrokeStore;
use crate::stroke::{Rgb, Stroke, ToolKind};
use crate::tools::ToolConfig;
use crate::viewport::{DimensionChange, Viewport};
use kurbo::Vec2;

/// What the host adapter must do after an event was handled.
///
/// The engine mutates its own state (store, persistence) synchronously;
/// effects only carry the rendering and scrolling work that lives outside
/// the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Schedule one coalesced viewport repaint before the next display
    /// frame; idempotent while a frame is already pending.
    ScheduleRepaint,
    /// Drop any pending scheduled repaint; an authoritative redraw follows.
    CancelScheduledRepaint,
    /// Rebuild the committed buffer from the store.
    RebuildCommitted,
    /// Repaint the viewport buffer now.
    RepaintViewport,
    /// Scroll the underlying surface by this delta.
    ScrollBy(Vec2),
}

/// The annotation engine for one page.
///
/// Owns the stroke collection, tool configuration, active gesture, and
/// viewport geometry; everything else (toolbar, widgets, the actual
/// surfaces) calls in through this type. Starts inactive: gesture handling
/// is enabled with [`toggle_active`](Self::toggle_active).
pub struct Engine {
    store: StrokeStore,
    config: ToolConfig,
    gesture: GestureMachine,
    viewport: Viewport,
    backend: Box<dyn PageStore>,
    key: PageKey,
    active: bool,
}

impl Engine {
    /// Create an engine for the page identified by `key`, loading any
    /// previously persisted strokes from `backend`.
    ///
    /// A corrupt persisted payload is logged and deleted and the engine
    /// starts empty; startup never fails on bad data.
    pub fn new(key: PageKey, backend: Box<dyn PageStore>) -> Self {
        let config = ToolConfig::default();
        let store = match backend.load(&key) {
            Ok(Some(payload)) => match StrokeStore::from_json(&payload, &config) {
                Ok(store) => {
                    log::debug!("loaded {} strokes for {}", store.len(), key);
                    store
                }
                Err(err) => {
                    log::warn!("discarding corrupt payload for {}: {}", key, err);
                    if let Err(err) = backend.delete(&key) {
                        log::warn!("failed to delete corrupt payload: {}", err);
                    }
                    StrokeStore::new()
                }
            },
            Ok(None) => StrokeStore::new(),
            Err(err) => {
                log::warn!("failed to load strokes for {}: {}", key, err);
                StrokeStore::new()
            }
        };

        Self {
            store,
            config,
            gesture: GestureMachine::new(),
            viewport: Viewport::default(),
            backend,
            key,
            active: false,
        }
    }

    /// Run one input event through the gesture machine.
    ///
    /// Ignored entirely while the engine is inactive.
    pub fn handle_event(&mut self, event: InputEvent) -> Vec<Effect> {
        if !self.active {
            return Vec::new();
        }

        let outcomes = self.gesture.handle_event(event, &self.config, &self.viewport);
        let mut effects = Vec::new();
        for outcome in outcomes {
            match outcome {
                GestureOutcome::ScheduleRepaint => effects.push(Effect::ScheduleRepaint),
                GestureOutcome::CancelScheduledRepaint => {
                    effects.push(Effect::CancelScheduledRepaint)
                }
                GestureOutcome::RepaintViewport => effects.push(Effect::RepaintViewport),
                GestureOutcome::ScrollBy(delta) => effects.push(Effect::ScrollBy(delta)),
                GestureOutcome::Finish(stroke) => self.finish_stroke(stroke, &mut effects),
                GestureOutcome::Undo => {
                    if self.undo() {
                        effects.push(Effect::RebuildCommitted);
                        effects.push(Effect::RepaintViewport);
                    }
                }
            }
        }
        effects
    }

    /// Finalize a completed stroke and commit the result.
    fn finish_stroke(&mut self, stroke: Stroke, effects: &mut Vec<Effect>) {
        match stroke.tool {
            ToolKind::Eraser => {
                // Never committed; the eraser's only job is removal.
                let doomed = eraser::resolve(&stroke.points, stroke.line_width, self.store.strokes());
                if !doomed.is_empty() {
                    let removed = self.store.remove_batch(&doomed);
                    log::debug!("erased {} strokes", removed);
                }
            }
            ToolKind::Highlighter => {
                if let Some(highlight) = finalize_highlighter(stroke) {
                    self.store.append(highlight);
                }
            }
            ToolKind::Pen => {
                if !stroke.points.is_empty() {
                    self.store.append(stroke);
                }
            }
        }

        effects.push(Effect::CancelScheduledRepaint);
        effects.push(Effect::RebuildCommitted);
        effects.push(Effect::RepaintViewport);
        self.persist();
    }

    /// Remove the most recent stroke. No-op on an empty store: no
    /// persistence write, nothing to repaint. Returns whether anything was
    /// undone; callers outside the gesture path repaint on `true`.
    pub fn undo(&mut self) -> bool {
        if self.store.undo().is_some() {
            self.persist();
            true
        } else {
            false
        }
    }

    /// Remove every stroke and delete the persisted record. Irreversible,
    /// so the caller must pass `confirmed = true` after prompting the user;
    /// `confirmed = false` is a no-op. Returns whether anything happened.
    pub fn clear(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        self.store.clear();
        if let Err(err) = self.backend.delete(&self.key) {
            log::warn!("failed to delete persisted strokes for {}: {}", self.key, err);
        }
        log::debug!("cleared all strokes for {}", self.key);
        true
    }

    /// Enable or disable gesture handling and rendering entirely. Turning
    /// the layer off aborts any gesture in flight. Returns the new state.
    pub fn toggle_active(&mut self) -> bool {
        self.active = !self.active;
        if !self.active {
            self.gesture.reset();
        }
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn select_tool(&mut self, tool: ToolKind) {
        self.config.set_tool(tool);
    }

    pub fn current_tool(&self) -> ToolKind {
        self.config.current_tool()
    }

    pub fn set_color(&mut self, tool: ToolKind, color: Rgb) {
        self.config.set_color(tool, color);
    }

    pub fn color_of(&self, tool: ToolKind) -> Option<Rgb> {
        self.config.color_of(tool)
    }

    /// Set a tool's width, clamped to the tool's allowed range.
    pub fn set_width(&mut self, tool: ToolKind, width: f64) {
        self.config.set_width(tool, width);
    }

    pub fn width_of(&self, tool: ToolKind) -> f64 {
        self.config.width_of(tool)
    }

    /// Feed freshly measured geometry in; the result tells the rendering
    /// pipeline which buffers to resize.
    pub fn update_viewport(&mut self, next: Viewport) -> DimensionChange {
        self.viewport.update(next)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Committed strokes in paint order.
    pub fn strokes(&self) -> &[Stroke] {
        self.store.strokes()
    }

    pub fn stroke_count(&self) -> usize {
        self.store.len()
    }

    /// The in-progress stroke, if a drawing gesture is active.
    pub fn live_stroke(&self) -> Option<&Stroke> {
        self.gesture.live_stroke()
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.gesture.phase()
    }

    /// Serialize and write the store. Failures (quota, serialization) are
    /// logged and swallowed; the in-memory collection stays authoritative
    /// for the session.
    fn persist(&mut self) {
        match self.store.to_json() {
            Ok(payload) => {
                if let Err(err) = self.backend.save(&self.key, &payload) {
                    log::error!("failed to save strokes for {}: {}", self.key, err);
                }
            }
            Err(err) => log::error!("failed to serialize strokes for {}: {}", self.key, err),
        }
    }
}

/// Collapse a finished highlighter stroke to its two endpoints; a
/// zero-length (single click) highlight is discarded entirely.
fn finalize_highlighter(mut stroke: Stroke) -> Option<Stroke> {
    let first = *stroke.points.first()?;
    let last = *stroke.points.last()?;
    if first == last {
        return None;
    }
    stroke.points = vec![first, last];
    Some(stroke)
}
