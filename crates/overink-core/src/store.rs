//! Ordered collection of committed strokes.

use crate::error::StoreError;
use crate::stroke::{Stroke, StrokeId, StrokeRecord};
use crate::tools::ToolConfig;

/// The committed strokes of one page, in paint order.
///
/// Append-only except for: [`undo`](Self::undo) removes the last stroke,
/// [`clear`](Self::clear) empties the collection, and
/// [`remove_batch`](Self::remove_batch) removes the subset matched by the
/// eraser resolver. Owned exclusively by the engine.
#[derive(Debug, Default)]
pub struct StrokeStore {
    strokes: Vec<Stroke>,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stroke. The gesture machine is responsible for producing
    /// valid strokes; no validation happens here.
    pub fn append(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Remove and return the most recent stroke, if any.
    pub fn undo(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    /// Remove every stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// Remove all strokes whose ids appear in `doomed`, as a single batch.
    /// Returns how many strokes were removed.
    pub fn remove_batch(&mut self, doomed: &[StrokeId]) -> usize {
        let before = self.strokes.len();
        self.strokes.retain(|stroke| !doomed.contains(&stroke.id));
        before - self.strokes.len()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    pub fn last(&self) -> Option<&Stroke> {
        self.strokes.last()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Serialize all strokes except eraser-tool strokes.
    ///
    /// Erasers leave no visible mark and their job, removal, is already
    /// reflected by the absence of the erased strokes.
    pub fn to_json(&self) -> Result<String, StoreError> {
        let records: Vec<StrokeRecord> = self
            .strokes
            .iter()
            .filter(|stroke| !stroke.is_eraser())
            .map(StrokeRecord::from_stroke)
            .collect();
        Ok(serde_json::to_string(&records)?)
    }

    /// Parse a previously persisted payload.
    ///
    /// Strokes missing `opacity` or `lineWidth` are back-filled with the
    /// tool's current default, so payloads written by older versions keep
    /// loading.
    pub fn from_json(payload: &str, config: &ToolConfig) -> Result<Self, StoreError> {
        let records: Vec<StrokeRecord> = serde_json::from_str(payload)?;
        Ok(Self {
            strokes: records
                .into_iter()
                .map(|record| record.into_stroke(config))
                .collect(),
        })
    }
}
