//! Bounded gallery of whole-drawing snapshots.
//!
//! Each snapshot owns PNG-encoded copies of every layer, the sticker overlay and the
//! template it belongs to. Snapshots are shared as `Arc` and never mutated after
//! capture. Only the most recent `capacity` snapshots are kept; older ones are dropped
//! silently when a new one arrives.
use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Local};
use image::RgbaImage;
use rayon::prelude::*;

use super::compositor::{GlyphRasterizer, composite, thumbnail};
use super::layer::{LayerId, LayerMeta};
use super::stack::LayerStack;
use super::sticker::{Sticker, StickerLayer};
use crate::utils::{exporter::encode_png, profiler::ScopeTimer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SnapshotId(pub u64);

/// One layer as recorded in a snapshot.
#[derive(Debug)]
pub struct SnapshotLayer {
    pub meta: LayerMeta,
    /// PNG bytes; empty if encoding failed (restores as transparent).
    pub png: Arc<[u8]>,
}

#[derive(Debug)]
pub struct HistorySnapshot {
    id: SnapshotId,
    timestamp: DateTime<Local>,
    thumbnail: RgbaImage,
    template_id: Option<String>,
    stickers: Vec<Sticker>,
    layers: Vec<SnapshotLayer>,
    active: Option<LayerId>,
}

impl HistorySnapshot {
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn thumbnail(&self) -> &RgbaImage {
        &self.thumbnail
    }

    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref()
    }

    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    pub fn layers(&self) -> &[SnapshotLayer] {
        &self.layers
    }

    pub fn active(&self) -> Option<LayerId> {
        self.active
    }
}

/// Borrowed view of everything a snapshot records.
pub struct DrawingState<'a> {
    pub stack: &'a LayerStack,
    pub stickers: &'a StickerLayer,
    pub template_id: Option<&'a str>,
    pub dirty: bool,
    /// Draws the stickers into the thumbnail.
    pub glyphs: &'a dyn GlyphRasterizer,
}

impl DrawingState<'_> {
    /// Unchanged, template-less or empty drawings are not worth a snapshot.
    pub fn worth_capturing(&self) -> bool {
        self.dirty && self.template_id.is_some() && !self.stack.is_empty()
    }
}

pub struct History {
    snapshots: VecDeque<Arc<HistorySnapshot>>,
    capacity: usize,
    next_id: u64,
    thumbnail_width: u32,
}

impl History {
    pub fn new(capacity: usize, thumbnail_width: u32) -> Self {
        Self {
            snapshots: VecDeque::new(),
            capacity: capacity.max(1),
            next_id: 0,
            thumbnail_width,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<HistorySnapshot>> {
        self.snapshots.iter()
    }

    pub fn latest(&self) -> Option<&Arc<HistorySnapshot>> {
        self.snapshots.front()
    }

    pub fn get(&self, id: SnapshotId) -> Option<Arc<HistorySnapshot>> {
        self.snapshots.iter().find(|s| s.id == id).cloned()
    }

    /// Record the drawing if it is worth it. Returns the new snapshot, or `None` when
    /// capture was suppressed.
    pub fn capture(&mut self, state: &DrawingState<'_>) -> Option<Arc<HistorySnapshot>> {
        if !state.worth_capturing() {
            log::debug!("history capture skipped (dirty={}, template={:?})", state.dirty, state.template_id);
            return None;
        }
        let _timer = ScopeTimer::new("history_capture");

        let ordered = state.stack.ascending();
        let layers: Vec<SnapshotLayer> = ordered
            .par_iter()
            .map(|layer| {
                let png: Arc<[u8]> = match encode_png(layer.pixels()) {
                    Ok(bytes) => bytes.into(),
                    Err(err) => {
                        log::warn!("{}: snapshot encode failed: {err}", layer.id());
                        Arc::from(Vec::new())
                    }
                };
                SnapshotLayer {
                    meta: layer.meta.clone(),
                    png,
                }
            })
            .collect();

        let flat = composite(state.stack, state.stickers, state.glyphs);
        let snapshot = Arc::new(HistorySnapshot {
            id: SnapshotId(self.next_id),
            timestamp: Local::now(),
            thumbnail: thumbnail(&flat, self.thumbnail_width),
            template_id: state.template_id.map(str::to_string),
            stickers: state.stickers.to_vec(),
            layers,
            active: state.stack.active_id(),
        });
        self.next_id += 1;

        self.snapshots.push_front(snapshot.clone());
        while self.snapshots.len() > self.capacity {
            if let Some(evicted) = self.snapshots.pop_back() {
                log::debug!("history full, dropped snapshot {}", evicted.id.0);
            }
        }
        log::debug!("captured snapshot {} ({} layers)", snapshot.id.0, snapshot.layers.len());
        Some(snapshot)
    }
}
