//! OverInk Core Library
//!
//! Platform-agnostic state and logic for a freehand annotation layer over a
//! scrollable document: stroke model, tool configuration, gesture state
//! machine, eraser hit-testing, viewport tracking, and keyed persistence.

pub mod engine;
pub mod eraser;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod storage;
pub mod store;
pub mod stroke;
pub mod tools;
pub mod viewport;

pub use engine::{Effect, Engine};
pub use error::StoreError;
pub use gesture::{
    GestureMachine, GestureOutcome, GesturePhase, InputEvent, MouseButton, PAN_MOVE_THRESHOLD,
    TWO_FINGER_TAP_TIMEOUT_MS,
};
pub use storage::{FileStore, MemoryStore, PageKey, PageStore};
pub use store::StrokeStore;
pub use stroke::{HIGHLIGHTER_OPACITY, Rgb, Stroke, StrokeId, ToolKind};
pub use tools::ToolConfig;
pub use viewport::{DimensionChange, Viewport};
