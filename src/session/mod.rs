//! The drawing session: everything one open drawing owns, plus the rules that tie the
//! tools, the layer stack and the history gallery together.
pub mod input;
pub mod restore;

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use rand::Rng;
use rayon::prelude::*;

use crate::brush_engine::{
    brush::Brush,
    fill::flood_fill_with,
    sampler::{Sample, sample},
};
use crate::canvas::{
    CANVAS_HEIGHT, CANVAS_WIDTH, Layer, LayerId, LayerStack,
    compositor::{NoGlyphs, composite},
    glyphs::FontGlyphs,
    history::{DrawingState, History, HistorySnapshot, SnapshotId},
    stack::NewLayer,
    sticker::{StickerId, StickerLayer},
    view::ViewState,
};
use crate::config::{EmptyClick, PainterConfig};
use crate::error::Result;
use crate::template::{OVERLAY_Z, Template, TemplateLayer, builtin::OUTLINES};
use crate::utils::{
    color::Color,
    exporter::{ExportFormat, save_flattened},
    profiler::ScopeTimer,
    vector::Vec2,
};
use input::Gesture;
pub use input::Tool;
use restore::{DecodedLayer, RestoreQueue};

pub struct Session {
    config: PainterConfig,
    stack: LayerStack,
    stickers: StickerLayer,
    template_id: Option<String>,
    dirty: bool,
    history: History,
    brush: Brush,
    tool: Tool,
    view: ViewState,
    viewport: Vec2,
    /// Bumped on every template load or restore; stale async decodes are dropped.
    generation: u64,
    /// Bumped whenever pixels change, so hosts know when to re-upload textures.
    revision: u64,
    restores: RestoreQueue,
    gesture: Gesture,
    /// Draws stickers into exports and gallery thumbnails.
    glyphs: FontGlyphs,
}

impl Session {
    pub fn new(config: PainterConfig) -> Self {
        let brush = Brush {
            width: config.brush_width,
            color: config.default_color,
            ..Brush::default()
        };
        let viewport = Vec2::new(
            CANVAS_WIDTH as f32 + config.fit_padding * 2.0,
            CANVAS_HEIGHT as f32 + config.fit_padding * 2.0,
        );
        Self {
            history: History::new(config.history_capacity, config.thumbnail_width),
            config,
            stack: LayerStack::new(),
            stickers: StickerLayer::new(),
            template_id: None,
            dirty: false,
            brush,
            tool: Tool::Brush,
            view: ViewState::default(),
            viewport,
            generation: 0,
            revision: 0,
            restores: RestoreQueue::new(),
            gesture: Gesture::Idle,
            glyphs: FontGlyphs::egui_defaults(),
        }
    }

    pub fn config(&self) -> &PainterConfig {
        &self.config
    }

    pub fn stack(&self) -> &LayerStack {
        &self.stack
    }

    pub fn stickers(&self) -> &StickerLayer {
        &self.stickers
    }

    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn color(&self) -> Color {
        self.brush.color
    }

    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn set_brush_width(&mut self, width: f32) {
        self.brush.width = width.max(1.0);
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn mark_dirty(&mut self) {
        if !self.dirty {
            log::debug!("session dirty");
        }
        self.dirty = true;
        self.touch();
    }

    /// Replace the drawing with a fresh copy of `template`. The outgoing drawing is
    /// captured into history first if it changed.
    pub fn load_template(&mut self, template: &Template) {
        let _timer = ScopeTimer::new("load_template");
        self.capture_history();
        self.gesture = Gesture::Idle;

        let buffers: Vec<RgbaImage> = template.layers.par_iter().map(TemplateLayer::render).collect();
        self.stack.clear();
        for (index, (layer, pixels)) in template.layers.iter().zip(buffers).enumerate() {
            let id = self.stack.push_layer(NewLayer {
                name: layer.name.clone(),
                icon: layer.icon.clone(),
                z_index: template.z_index_of(index),
                locked: layer.locked,
                lock_alpha: layer.lock_alpha && !layer.locked,
            });
            self.stack.replace_pixels(id, pixels);
        }

        self.stickers.clear();
        self.template_id = Some(template.id.clone());
        self.dirty = false;
        self.generation += 1;
        self.select_first_paintable();
        self.view.fit(self.viewport, self.config.fit_padding);
        self.touch();
        log::info!("loaded template '{}' ({} layers)", template.id, self.stack.len());
    }

    fn select_first_paintable(&mut self) {
        let first = self
            .stack
            .iter()
            .find(|l| !l.is_locked() && l.z_index() < OVERLAY_Z)
            .map(Layer::id);
        match first {
            Some(id) => {
                self.stack.select(id);
            }
            None => self.stack.clear_active(),
        }
        self.restore_active_color();
    }

    /// Switching layers brings back the color last used on that layer, or the default.
    fn restore_active_color(&mut self) {
        if let Some(layer) = self.stack.active() {
            self.brush.color = layer.last_color().unwrap_or(self.config.default_color);
        }
    }

    /// Set the drawing color and remember it on the active layer.
    pub fn set_color(&mut self, color: Color) {
        self.brush.color = color;
        if let Some(id) = self.stack.active_id() {
            self.stack.set_last_color(id, color);
        }
    }

    /// Palette "mix" mode: average the current color with `other`.
    pub fn mix_color(&mut self, other: Color) {
        self.set_color(self.brush.color.mix(other));
    }

    pub fn add_layer(&mut self) -> LayerId {
        let id = self.stack.add_layer(format!("Layer {}", self.stack.len() + 1));
        self.restore_active_color();
        self.touch();
        id
    }

    pub fn select_layer(&mut self, id: LayerId) -> bool {
        if self.stack.active_id() == Some(id) {
            return true;
        }
        let ok = self.stack.select(id);
        if ok {
            self.restore_active_color();
        }
        ok
    }

    pub fn toggle_visibility(&mut self, id: LayerId) -> Option<bool> {
        let visible = self.stack.toggle_visibility(id)?;
        self.touch();
        Some(visible)
    }

    pub fn toggle_alpha_lock(&mut self, id: LayerId) -> Option<bool> {
        self.stack.toggle_alpha_lock(id)
    }

    /// Show or hide the template's outline layer.
    pub fn toggle_outlines(&mut self) -> Option<bool> {
        let id = self.stack.find_by_name(OUTLINES)?.id();
        self.toggle_visibility(id)
    }

    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        let before = self.stack.active_id();
        if self.stack.remove_layer(id).is_none() {
            return false;
        }
        if self.stack.active_id() != before {
            self.restore_active_color();
        }
        self.mark_dirty();
        true
    }

    /// Click-to-activate: the topmost paintable layer with paint under `point` becomes
    /// active. Misses follow the configured empty-click policy.
    pub fn activate_at(&mut self, point: Vec2) -> Option<LayerId> {
        let before = self.stack.active_id();
        let hit = self.stack.activate_at(point);
        if hit.is_none() && self.config.empty_click == EmptyClick::Deselect {
            self.stack.clear_active();
        }
        if self.stack.active_id() != before {
            self.restore_active_color();
        }
        hit
    }

    /// Flood fill the active layer from `point` with the current color.
    pub fn fill_at(&mut self, point: Vec2) -> bool {
        let Some(id) = self.stack.active_id() else {
            return false;
        };
        let color = self.brush.color;
        let Some(layer) = self.stack.get_mut(id) else {
            return false;
        };
        if !layer.accepts_input() {
            return false;
        }
        let options = self.config.fill_options(layer.lock_alpha());
        let seed = (point.x.floor() as i64, point.y.floor() as i64);
        let filled = flood_fill_with(layer.pixels_mut(), seed, color, &options);
        if filled {
            self.mark_dirty();
        }
        filled
    }

    /// Eyedropper: adopt the color under `point` and go back to the brush.
    pub fn sample_at(&mut self, point: Vec2) -> Sample {
        let found = sample(&self.stack, point);
        self.set_color(found.color);
        if self.tool == Tool::Eyedropper {
            self.tool = Tool::Brush;
        }
        found
    }

    pub fn place_sticker(&mut self, glyph: &str, point: Vec2) -> Option<StickerId> {
        let jitter = self.config.sticker_jitter_degrees.abs();
        let rotation = if jitter > 0.0 {
            rand::rng().random_range(-jitter..=jitter).to_radians()
        } else {
            0.0
        };
        let id = self.stickers.place(glyph, point, self.config.sticker_size, rotation)?;
        self.mark_dirty();
        Some(id)
    }

    /// Move a sticker; leaving the canvas deletes it. Returns whether it still exists.
    pub fn move_sticker(&mut self, id: StickerId, point: Vec2) -> bool {
        if self.stickers.get(id).is_none() {
            return false;
        }
        let kept = self.stickers.move_to(id, point);
        self.mark_dirty();
        kept
    }

    /// Flattened drawing with stickers, as exported.
    pub fn composite(&self) -> RgbaImage {
        composite(&self.stack, &self.stickers, &self.glyphs)
    }

    /// Layers only; hosts draw the stickers over this themselves.
    pub fn composite_layers(&self) -> RgbaImage {
        composite(&self.stack, &self.stickers, &NoGlyphs)
    }

    pub fn export(&self, path: &Path, format: ExportFormat) -> Result<()> {
        save_flattened(&self.composite(), path, format)
    }

    /// Snapshot the drawing into the gallery if it changed since the last capture.
    pub fn capture_history(&mut self) -> Option<Arc<HistorySnapshot>> {
        let state = DrawingState {
            stack: &self.stack,
            stickers: &self.stickers,
            template_id: self.template_id.as_deref(),
            dirty: self.dirty,
            glyphs: &self.glyphs,
        };
        let snapshot = self.history.capture(&state)?;
        self.dirty = false;
        Some(snapshot)
    }

    /// Bring back a gallery snapshot. Layer metadata, stickers and template apply at
    /// once; pixels arrive through [`Session::pump_restores`].
    pub fn restore(&mut self, id: SnapshotId) -> bool {
        let Some(snapshot) = self.history.get(id) else {
            log::warn!("restore of unknown snapshot {}", id.0);
            return false;
        };
        self.capture_history();
        self.gesture = Gesture::Idle;

        self.stack.clear();
        for layer in snapshot.layers() {
            self.stack.push_restored(layer.meta.clone());
        }
        self.stickers = StickerLayer::from_stickers(snapshot.stickers().to_vec());
        self.template_id = snapshot.template_id().map(str::to_string);
        self.dirty = false;
        self.generation += 1;

        match snapshot.active() {
            Some(active) if self.stack.select(active) => self.restore_active_color(),
            _ => self.select_first_paintable(),
        }
        for layer in snapshot.layers() {
            self.restores.schedule(self.generation, layer.meta.id, layer.png.clone());
        }
        self.touch();
        log::info!(
            "restoring snapshot {} from {}",
            id.0,
            snapshot.timestamp().format("%H:%M:%S")
        );
        true
    }

    /// Apply finished restore decodes without blocking. Returns how many layers changed.
    pub fn pump_restores(&mut self) -> usize {
        let done = self.restores.drain();
        self.apply_decoded(done)
    }

    /// Block until every pending decode is in, then apply the current ones.
    pub fn finish_restores(&mut self) -> usize {
        let done = self.restores.wait_all();
        self.apply_decoded(done)
    }

    pub fn restores_pending(&self) -> bool {
        self.restores.in_flight() > 0
    }

    fn apply_decoded(&mut self, done: Vec<DecodedLayer>) -> usize {
        let mut applied = 0;
        for decoded in done {
            if decoded.generation != self.generation {
                log::debug!(
                    "dropping stale decode for {} (generation {} != {})",
                    decoded.layer,
                    decoded.generation,
                    self.generation
                );
                continue;
            }
            let Some(pixels) = decoded.pixels else {
                continue;
            };
            // Strokes made while the decode was in flight stay on top of the restored pixels.
            if self.stack.underlay_pixels(decoded.layer, pixels) {
                applied += 1;
            }
        }
        if applied > 0 {
            self.touch();
        }
        applied
    }
}
