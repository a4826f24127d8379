//! Gesture state machine: raw pointer/touch events in, outcomes out.
//!
//! The machine is decoupled from any concrete input-event API: the host
//! adapter translates its platform's events into [`InputEvent`] values
//! (including a millisecond timestamp where the tap-timeout window needs
//! one) and interprets the returned outcomes. All positions are viewport
//! coordinates; the machine converts to document coordinates itself.

use crate::stroke::{Stroke, ToolKind};
use crate::tools::ToolConfig;
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};

/// Midpoint movement (px) beyond which a two-finger contact becomes a pan.
pub const PAN_MOVE_THRESHOLD: f64 = 15.0;

/// Window (ms) within which a two-finger contact-and-lift counts as a tap.
pub const TWO_FINGER_TAP_TIMEOUT_MS: u64 = 300;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A raw input event, already translated out of the host's event API.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// One or more fingers made contact; `touches` holds every current
    /// contact point.
    TouchStart { touches: Vec<Point>, time_ms: u64 },
    /// Contact points moved.
    TouchMove { touches: Vec<Point> },
    /// Fingers lifted; `touches` holds the contacts that remain.
    TouchEnd { touches: Vec<Point>, time_ms: u64 },
    MouseDown { position: Point, button: MouseButton },
    MouseMove { position: Point },
    MouseUp { position: Point },
    /// The pointer left the surface; treated as an implicit release.
    MouseLeave,
}

/// What a transition asks the engine to do.
#[derive(Debug, Clone)]
pub enum GestureOutcome {
    /// Schedule one coalesced live repaint before the next display frame.
    ScheduleRepaint,
    /// Drop any pending coalesced repaint; the live preview it would have
    /// painted is gone.
    CancelScheduledRepaint,
    /// Repaint the viewport now (a live preview was discarded).
    RepaintViewport,
    /// Scroll the underlying surface by this delta.
    ScrollBy(Vec2),
    /// A stroke finished; finalize and commit it.
    Finish(Stroke),
    /// A two-finger tap fired.
    Undo,
}

/// Interaction states. Cyclic: every completed gesture returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Drawing,
    MultiTouchStart,
    Panning,
}

/// The active gesture: interaction phase, the in-progress stroke, and the
/// transient pan/tap bookkeeping. Created on first contact, consumed on
/// release, never persisted.
#[derive(Debug, Default)]
pub struct GestureMachine {
    phase: GesturePhase,
    live: Option<Stroke>,
    touch_start_time_ms: u64,
    initial_mid: Option<Point>,
    last_mid: Option<Point>,
    tap_consumed: bool,
}

fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

impl GestureMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// The in-progress stroke, if a drawing gesture is active.
    pub fn live_stroke(&self) -> Option<&Stroke> {
        self.live.as_ref()
    }

    /// Abort whatever gesture is in flight and return to `Idle`.
    pub fn reset(&mut self) {
        self.phase = GesturePhase::Idle;
        self.live = None;
        self.clear_pan_anchors();
    }

    /// Run one event through the machine.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        config: &ToolConfig,
        viewport: &Viewport,
    ) -> Vec<GestureOutcome> {
        match event {
            InputEvent::TouchStart { touches, time_ms } => {
                self.on_touch_start(&touches, time_ms, config, viewport)
            }
            InputEvent::TouchMove { touches } => self.on_touch_move(&touches, viewport),
            InputEvent::TouchEnd { touches, time_ms } => self.on_touch_end(&touches, time_ms),
            InputEvent::MouseDown { position, button } => {
                self.on_mouse_down(position, button, config, viewport)
            }
            InputEvent::MouseMove { position } => self.on_mouse_move(position, viewport),
            // Leaving the surface behaves identically to a release: no
            // waiting for a pointer-up that may never come.
            InputEvent::MouseUp { .. } | InputEvent::MouseLeave => self.on_mouse_up(),
        }
    }

    fn on_touch_start(
        &mut self,
        touches: &[Point],
        time_ms: u64,
        config: &ToolConfig,
        viewport: &Viewport,
    ) -> Vec<GestureOutcome> {
        match touches {
            [contact] => {
                if self.phase == GesturePhase::Panning {
                    return Vec::new();
                }
                self.phase = GesturePhase::Drawing;
                self.live = Some(config.start_stroke(viewport.to_document(*contact)));
                self.tap_consumed = false;
                Vec::new()
            }
            [first, second] => {
                let mut outcomes = Vec::new();
                // A second finger landing discards any stray single-finger
                // stroke; its live preview must vanish, including a repaint
                // already scheduled for it.
                if self.live.take().is_some() {
                    outcomes.push(GestureOutcome::CancelScheduledRepaint);
                    outcomes.push(GestureOutcome::RepaintViewport);
                }
                self.phase = GesturePhase::MultiTouchStart;
                self.touch_start_time_ms = time_ms;
                let mid = midpoint(*first, *second);
                self.initial_mid = Some(mid);
                self.last_mid = Some(mid);
                outcomes
            }
            _ => Vec::new(),
        }
    }

    fn on_touch_move(&mut self, touches: &[Point], viewport: &Viewport) -> Vec<GestureOutcome> {
        match (self.phase, touches) {
            (GesturePhase::Drawing, [contact]) => {
                if self.live.is_none() {
                    return Vec::new();
                }
                self.extend_live(viewport.to_document(*contact));
                vec![GestureOutcome::ScheduleRepaint]
            }
            (GesturePhase::MultiTouchStart, [first, second]) => {
                let mid = midpoint(*first, *second);
                if let Some(initial) = self.initial_mid {
                    if (mid - initial).hypot() > PAN_MOVE_THRESHOLD {
                        self.phase = GesturePhase::Panning;
                    }
                }
                Vec::new()
            }
            (GesturePhase::Panning, [first, second]) => {
                let mid = midpoint(*first, *second);
                let mut outcomes = Vec::new();
                if let Some(last) = self.last_mid {
                    let delta = mid - last;
                    // Drag-to-pan: the surface scrolls against the fingers.
                    outcomes.push(GestureOutcome::ScrollBy(Vec2::new(-delta.x, -delta.y)));
                }
                self.last_mid = Some(mid);
                outcomes
            }
            _ => Vec::new(),
        }
    }

    fn on_touch_end(&mut self, touches: &[Point], time_ms: u64) -> Vec<GestureOutcome> {
        let mut outcomes = Vec::new();

        match self.phase {
            GesturePhase::Drawing => {
                if touches.is_empty() {
                    if let Some(stroke) = self.live.take() {
                        if !stroke.points.is_empty() {
                            outcomes.push(GestureOutcome::Finish(stroke));
                        }
                    }
                    self.phase = GesturePhase::Idle;
                }
            }
            GesturePhase::MultiTouchStart => {
                let elapsed = time_ms.saturating_sub(self.touch_start_time_ms);
                // The guard flag keeps a straggling lift of one-of-two
                // fingers from firing a second undo in the same sequence.
                if elapsed < TWO_FINGER_TAP_TIMEOUT_MS && !self.tap_consumed {
                    outcomes.push(GestureOutcome::Undo);
                    self.tap_consumed = true;
                }
                if touches.len() < 2 {
                    self.phase = GesturePhase::Idle;
                    self.clear_pan_anchors();
                }
            }
            GesturePhase::Panning => {
                if touches.len() < 2 {
                    self.phase = GesturePhase::Idle;
                    self.clear_pan_anchors();
                }
            }
            GesturePhase::Idle => {}
        }

        // Safety net: with every finger lifted the gesture is over no
        // matter which branch fired above.
        if touches.is_empty() {
            self.phase = GesturePhase::Idle;
            self.clear_pan_anchors();
            if self.live.take().is_some() {
                outcomes.push(GestureOutcome::CancelScheduledRepaint);
                outcomes.push(GestureOutcome::RepaintViewport);
            }
        }

        outcomes
    }

    fn on_mouse_down(
        &mut self,
        position: Point,
        button: MouseButton,
        config: &ToolConfig,
        viewport: &Viewport,
    ) -> Vec<GestureOutcome> {
        if button != MouseButton::Left {
            return Vec::new();
        }
        self.phase = GesturePhase::Drawing;
        self.live = Some(config.start_stroke(viewport.to_document(position)));
        Vec::new()
    }

    fn on_mouse_move(&mut self, position: Point, viewport: &Viewport) -> Vec<GestureOutcome> {
        if self.phase != GesturePhase::Drawing || self.live.is_none() {
            return Vec::new();
        }
        self.extend_live(viewport.to_document(position));
        vec![GestureOutcome::ScheduleRepaint]
    }

    fn on_mouse_up(&mut self) -> Vec<GestureOutcome> {
        if self.phase != GesturePhase::Drawing {
            return Vec::new();
        }
        self.phase = GesturePhase::Idle;
        match self.live.take() {
            Some(stroke) if !stroke.points.is_empty() => vec![GestureOutcome::Finish(stroke)],
            _ => Vec::new(),
        }
    }

    /// Append a point to the live stroke. The highlighter keeps exactly two
    /// points throughout, so the live preview already matches the final
    /// straight segment.
    fn extend_live(&mut self, doc_point: Point) {
        if let Some(stroke) = &mut self.live {
            match stroke.tool {
                ToolKind::Highlighter => {
                    if stroke.points.len() <= 1 {
                        stroke.points.push(doc_point);
                    } else {
                        stroke.points[1] = doc_point;
                    }
                }
                ToolKind::Pen | ToolKind::Eraser => stroke.points.push(doc_point),
            }
        }
    }

    fn clear_pan_anchors(&mut self) {
        self.initial_mid = None;
        self.last_mid = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (GestureMachine, ToolConfig, Viewport) {
        (GestureMachine::new(), ToolConfig::default(), Viewport::default())
    }

    fn touch_start(machine: &mut GestureMachine, config: &ToolConfig, viewport: &Viewport, touches: Vec<Point>, time_ms: u64) -> Vec<GestureOutcome> {
        machine.handle_event(InputEvent::TouchStart { touches, time_ms }, config, viewport)
    }

    fn touch_move(machine: &mut GestureMachine, config: &ToolConfig, viewport: &Viewport, touches: Vec<Point>) -> Vec<GestureOutcome> {
        machine.handle_event(InputEvent::TouchMove { touches }, config, viewport)
    }

    fn touch_end(machine: &mut GestureMachine, config: &ToolConfig, viewport: &Viewport, touches: Vec<Point>, time_ms: u64) -> Vec<GestureOutcome> {
        machine.handle_event(InputEvent::TouchEnd { touches, time_ms }, config, viewport)
    }

    fn count_undos(outcomes: &[GestureOutcome]) -> usize {
        outcomes
            .iter()
            .filter(|o| matches!(o, GestureOutcome::Undo))
            .count()
    }

    #[test]
    fn test_single_finger_draws() {
        let (mut machine, config, viewport) = setup();

        touch_start(&mut machine, &config, &viewport, vec![Point::new(10.0, 10.0)], 0);
        assert_eq!(machine.phase(), GesturePhase::Drawing);

        let outcomes = touch_move(&mut machine, &config, &viewport, vec![Point::new(12.0, 14.0)]);
        assert!(matches!(outcomes[0], GestureOutcome::ScheduleRepaint));
        assert_eq!(machine.live_stroke().unwrap().points.len(), 2);

        let outcomes = touch_end(&mut machine, &config, &viewport, vec![], 100);
        assert!(matches!(outcomes[0], GestureOutcome::Finish(_)));
        assert_eq!(machine.phase(), GesturePhase::Idle);
        assert!(machine.live_stroke().is_none());
    }

    #[test]
    fn test_points_are_document_coordinates() {
        let (mut machine, config, _) = setup();
        let viewport = Viewport {
            scroll_x: 100.0,
            scroll_y: 200.0,
            ..Viewport::default()
        };

        touch_start(&mut machine, &config, &viewport, vec![Point::new(10.0, 10.0)], 0);
        let stroke = machine.live_stroke().unwrap();
        assert_eq!(stroke.points[0], Point::new(110.0, 210.0));
    }

    #[test]
    fn test_two_finger_tap_fires_one_undo() {
        let (mut machine, config, viewport) = setup();
        let fingers = vec![Point::new(100.0, 100.0), Point::new(140.0, 100.0)];

        touch_start(&mut machine, &config, &viewport, fingers, 1000);
        assert_eq!(machine.phase(), GesturePhase::MultiTouchStart);

        // First finger lifts inside the window: undo fires.
        let outcomes = touch_end(&mut machine, &config, &viewport, vec![Point::new(140.0, 100.0)], 1100);
        assert_eq!(count_undos(&outcomes), 1);
        assert_eq!(machine.phase(), GesturePhase::Idle);

        // Straggling lift of the second finger must not fire again.
        let outcomes = touch_end(&mut machine, &config, &viewport, vec![], 1120);
        assert_eq!(count_undos(&outcomes), 0);
    }

    #[test]
    fn test_slow_two_finger_lift_is_not_a_tap() {
        let (mut machine, config, viewport) = setup();
        let fingers = vec![Point::new(100.0, 100.0), Point::new(140.0, 100.0)];

        touch_start(&mut machine, &config, &viewport, fingers, 1000);
        let outcomes = touch_end(&mut machine, &config, &viewport, vec![], 1400);
        assert_eq!(count_undos(&outcomes), 0);
    }

    #[test]
    fn test_midpoint_movement_promotes_to_pan() {
        let (mut machine, config, viewport) = setup();

        touch_start(
            &mut machine,
            &config,
            &viewport,
            vec![Point::new(100.0, 100.0), Point::new(140.0, 100.0)],
            0,
        );

        // Move within the threshold: still waiting.
        touch_move(
            &mut machine,
            &config,
            &viewport,
            vec![Point::new(105.0, 100.0), Point::new(145.0, 100.0)],
        );
        assert_eq!(machine.phase(), GesturePhase::MultiTouchStart);

        // Move beyond the 15px threshold.
        touch_move(
            &mut machine,
            &config,
            &viewport,
            vec![Point::new(100.0, 130.0), Point::new(140.0, 130.0)],
        );
        assert_eq!(machine.phase(), GesturePhase::Panning);

        // The pan anchor stays at the initial midpoint through promotion,
        // so the first pan move scrolls by the full distance from it:
        // midpoint went 100 -> 140 against the anchor at 100.
        let outcomes = touch_move(
            &mut machine,
            &config,
            &viewport,
            vec![Point::new(100.0, 140.0), Point::new(140.0, 140.0)],
        );
        match outcomes[0] {
            GestureOutcome::ScrollBy(delta) => {
                assert!((delta.x).abs() < f64::EPSILON);
                assert!((delta.y - -40.0).abs() < f64::EPSILON);
            }
            ref other => panic!("expected ScrollBy, got {:?}", other),
        }

        // Subsequent moves scroll by the incremental midpoint delta.
        let outcomes = touch_move(
            &mut machine,
            &config,
            &viewport,
            vec![Point::new(100.0, 150.0), Point::new(140.0, 150.0)],
        );
        match outcomes[0] {
            GestureOutcome::ScrollBy(delta) => {
                assert!((delta.y - -10.0).abs() < f64::EPSILON);
            }
            ref other => panic!("expected ScrollBy, got {:?}", other),
        }

        // A pan never fires undo, however short.
        let outcomes = touch_end(&mut machine, &config, &viewport, vec![], 50);
        assert_eq!(count_undos(&outcomes), 0);
        assert_eq!(machine.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_second_finger_discards_stray_stroke() {
        let (mut machine, config, viewport) = setup();

        touch_start(&mut machine, &config, &viewport, vec![Point::new(10.0, 10.0)], 0);
        touch_move(&mut machine, &config, &viewport, vec![Point::new(12.0, 12.0)]);
        assert!(machine.live_stroke().is_some());

        let outcomes = touch_start(
            &mut machine,
            &config,
            &viewport,
            vec![Point::new(12.0, 12.0), Point::new(60.0, 10.0)],
            10,
        );
        assert!(machine.live_stroke().is_none());
        assert_eq!(machine.phase(), GesturePhase::MultiTouchStart);
        // The repaint scheduled for the discarded preview is withdrawn
        // before the viewport is redrawn without it.
        assert!(matches!(outcomes[0], GestureOutcome::CancelScheduledRepaint));
        assert!(matches!(outcomes[1], GestureOutcome::RepaintViewport));
    }

    #[test]
    fn test_highlighter_live_stroke_keeps_two_points() {
        let (mut machine, mut config, viewport) = setup();
        config.set_tool(ToolKind::Highlighter);

        touch_start(&mut machine, &config, &viewport, vec![Point::new(0.0, 0.0)], 0);
        for i in 1..=5 {
            touch_move(&mut machine, &config, &viewport, vec![Point::new(i as f64 * 10.0, 0.0)]);
        }

        let stroke = machine.live_stroke().unwrap();
        assert_eq!(stroke.points.len(), 2);
        assert_eq!(stroke.points[1], Point::new(50.0, 0.0));
    }

    #[test]
    fn test_mouse_draw_cycle() {
        let (mut machine, config, viewport) = setup();

        machine.handle_event(
            InputEvent::MouseDown {
                position: Point::new(5.0, 5.0),
                button: MouseButton::Left,
            },
            &config,
            &viewport,
        );
        assert_eq!(machine.phase(), GesturePhase::Drawing);

        machine.handle_event(
            InputEvent::MouseMove { position: Point::new(9.0, 9.0) },
            &config,
            &viewport,
        );

        let outcomes = machine.handle_event(
            InputEvent::MouseUp { position: Point::new(9.0, 9.0) },
            &config,
            &viewport,
        );
        assert!(matches!(outcomes[0], GestureOutcome::Finish(_)));
        assert_eq!(machine.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_right_button_ignored() {
        let (mut machine, config, viewport) = setup();

        let outcomes = machine.handle_event(
            InputEvent::MouseDown {
                position: Point::new(5.0, 5.0),
                button: MouseButton::Right,
            },
            &config,
            &viewport,
        );
        assert!(outcomes.is_empty());
        assert_eq!(machine.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_mouse_leave_finalizes_like_release() {
        let (mut machine, config, viewport) = setup();

        machine.handle_event(
            InputEvent::MouseDown {
                position: Point::new(5.0, 5.0),
                button: MouseButton::Left,
            },
            &config,
            &viewport,
        );
        machine.handle_event(
            InputEvent::MouseMove { position: Point::new(30.0, 30.0) },
            &config,
            &viewport,
        );

        let outcomes = machine.handle_event(InputEvent::MouseLeave, &config, &viewport);
        assert!(matches!(outcomes[0], GestureOutcome::Finish(_)));
        assert_eq!(machine.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_mouse_move_without_press_does_nothing() {
        let (mut machine, config, viewport) = setup();
        let outcomes = machine.handle_event(
            InputEvent::MouseMove { position: Point::new(30.0, 30.0) },
            &config,
            &viewport,
        );
        assert!(outcomes.is_empty());
    }
}
