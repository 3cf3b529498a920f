use image::RgbaImage;

use super::layer::{Layer, LayerId, LayerMeta};
use crate::utils::{color::Color, vector::Vec2};

/// Parameters for a layer entering the stack (from a template, a restore or the UI).
#[derive(Clone, Debug)]
pub struct NewLayer {
    pub name: String,
    pub icon: Option<String>,
    pub z_index: i32,
    pub locked: bool,
    pub lock_alpha: bool,
}

/// Ordered collection of layers plus the single optional "active" selection.
///
/// Layers are stored in insertion order; z-order is `(z_index, insertion order)`.
#[derive(Clone, Debug, Default)]
pub struct LayerStack {
    layers: Vec<Layer>,
    active: Option<LayerId>,
    next_id: u64,
    next_seq: u64,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    /// Bottom-to-top order.
    pub fn ascending(&self) -> Vec<&Layer> {
        let mut ordered: Vec<&Layer> = self.layers.iter().collect();
        ordered.sort_by_key(|l| (l.z_index(), l.seq));
        ordered
    }

    /// Top-to-bottom order.
    pub fn descending(&self) -> Vec<&Layer> {
        let mut ordered = self.ascending();
        ordered.reverse();
        ordered
    }

    fn top_z(&self) -> Option<i32> {
        self.layers.iter().map(|l| l.z_index()).max()
    }

    /// Insert a layer without touching the active selection.
    pub fn push_layer(&mut self, new: NewLayer) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.insert(LayerMeta {
            id,
            name: new.name,
            icon: new.icon,
            z_index: new.z_index,
            visible: true,
            locked: new.locked,
            lock_alpha: new.lock_alpha,
            last_color: None,
        });
        id
    }

    /// Re-insert a layer under its recorded identity (history restore).
    pub(crate) fn push_restored(&mut self, meta: LayerMeta) -> LayerId {
        self.next_id = self.next_id.max(meta.id.0 + 1);
        let id = meta.id;
        self.insert(meta);
        id
    }

    fn insert(&mut self, meta: LayerMeta) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.layers.push(Layer::new(meta, seq));
    }

    /// Add a blank, unlocked layer on top of everything and make it active.
    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        let z_index = self.top_z().map_or(0, |z| z + 1);
        let id = self.push_layer(NewLayer {
            name: name.into(),
            icon: Some("📄".to_string()),
            z_index,
            locked: false,
            lock_alpha: false,
        });
        self.active = Some(id);
        log::debug!("added {id} at z {z_index}");
        id
    }

    /// Drop every layer and the selection (a new template replaces the stack).
    pub fn clear(&mut self) {
        self.layers.clear();
        self.active = None;
    }

    pub fn active_id(&self) -> Option<LayerId> {
        self.active
    }

    pub fn active(&self) -> Option<&Layer> {
        self.active.and_then(|id| self.get(id))
    }

    /// Select a layer for input. Locked or unknown layers are rejected.
    pub fn select(&mut self, id: LayerId) -> bool {
        match self.get(id) {
            Some(layer) if !layer.is_locked() => {
                self.active = Some(id);
                true
            }
            _ => false,
        }
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// Flip visibility; returns the new state.
    pub fn toggle_visibility(&mut self, id: LayerId) -> Option<bool> {
        let layer = self.get_mut(id)?;
        layer.meta.visible = !layer.meta.visible;
        Some(layer.meta.visible)
    }

    /// Flip alpha-lock on an unlocked layer; returns the new state.
    pub fn toggle_alpha_lock(&mut self, id: LayerId) -> Option<bool> {
        let layer = self.get_mut(id)?;
        if layer.is_locked() {
            return None;
        }
        layer.meta.lock_alpha = !layer.meta.lock_alpha;
        Some(layer.meta.lock_alpha)
    }

    pub(crate) fn set_last_color(&mut self, id: LayerId, color: Color) {
        if let Some(layer) = self.get_mut(id) {
            layer.meta.last_color = Some(color);
        }
    }

    pub(crate) fn replace_pixels(&mut self, id: LayerId, pixels: RgbaImage) -> bool {
        self.get_mut(id).is_some_and(|l| l.replace_pixels(pixels))
    }

    pub(crate) fn underlay_pixels(&mut self, id: LayerId, pixels: RgbaImage) -> bool {
        self.get_mut(id).is_some_and(|l| l.underlay(pixels))
    }

    /// Topmost visible, unlocked layer with a nonzero-alpha pixel under `point`.
    pub fn hit_test(&self, point: Vec2) -> Option<LayerId> {
        let (x, y) = (point.x.floor() as i64, point.y.floor() as i64);
        self.descending()
            .into_iter()
            .filter(|l| l.accepts_input())
            .find(|l| l.pixel(x, y).a > 0)
            .map(|l| l.id())
    }

    /// Make the hit-tested layer active, if any.
    pub fn activate_at(&mut self, point: Vec2) -> Option<LayerId> {
        let hit = self.hit_test(point)?;
        self.active = Some(hit);
        Some(hit)
    }

    /// Remove a layer. If it was active, activity moves to the nearest unlocked layer
    /// below it, then the topmost unlocked layer, then nothing.
    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let idx = self.layers.iter().position(|l| l.id() == id)?;
        let removed_key = (self.layers[idx].z_index(), self.layers[idx].seq);
        let removed = self.layers.remove(idx);

        if self.active == Some(id) {
            let candidates: Vec<&Layer> = self
                .descending()
                .into_iter()
                .filter(|l| !l.is_locked())
                .collect();
            let next = candidates
                .iter()
                .find(|l| (l.z_index(), l.seq) < removed_key)
                .or_else(|| candidates.first())
                .map(|l| l.id());
            self.active = next;
        }
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::layer::write_pixel;

    fn new_layer(name: &str, z: i32, locked: bool) -> NewLayer {
        NewLayer {
            name: name.into(),
            icon: None,
            z_index: z,
            locked,
            lock_alpha: false,
        }
    }

    #[test]
    fn ties_break_by_insertion_order() {
        let mut stack = LayerStack::new();
        let a = stack.push_layer(new_layer("a", 1, false));
        let b = stack.push_layer(new_layer("b", 0, false));
        let c = stack.push_layer(new_layer("c", 1, false));
        let order: Vec<LayerId> = stack.ascending().iter().map(|l| l.id()).collect();
        assert_eq!(order, vec![b, a, c]);
        let top: Vec<LayerId> = stack.descending().iter().map(|l| l.id()).collect();
        assert_eq!(top, vec![c, a, b]);
    }

    #[test]
    fn add_layer_goes_on_top_and_becomes_active() {
        let mut stack = LayerStack::new();
        stack.push_layer(new_layer("outlines", 999, true));
        let id = stack.add_layer("Layer 2");
        assert_eq!(stack.active_id(), Some(id));
        assert_eq!(stack.descending()[0].id(), id);
    }

    #[test]
    fn locked_layers_cannot_be_selected_or_alpha_toggled() {
        let mut stack = LayerStack::new();
        let locked = stack.push_layer(new_layer("outlines", 5, true));
        assert!(!stack.select(locked));
        assert_eq!(stack.active_id(), None);
        assert_eq!(stack.toggle_alpha_lock(locked), None);
        assert_eq!(stack.toggle_visibility(locked), Some(false));
    }

    #[test]
    fn hit_test_skips_locked_and_hidden() {
        let mut stack = LayerStack::new();
        let low = stack.push_layer(new_layer("low", 0, false));
        let hidden = stack.push_layer(new_layer("hidden", 1, false));
        let locked = stack.push_layer(new_layer("locked", 2, true));
        for id in [low, hidden, locked] {
            write_pixel(stack.get_mut(id).unwrap().pixels_mut(), 10, 10, Color::BLACK);
        }
        stack.toggle_visibility(hidden);

        assert_eq!(stack.activate_at(Vec2::new(10.5, 10.5)), Some(low));
        assert_eq!(stack.active_id(), Some(low));
        assert_eq!(stack.hit_test(Vec2::new(50.0, 50.0)), None);
    }

    #[test]
    fn removing_active_layer_reassigns_downward() {
        let mut stack = LayerStack::new();
        let bottom = stack.push_layer(new_layer("bottom", 0, false));
        stack.push_layer(new_layer("lines", 1, true));
        let top = stack.push_layer(new_layer("top", 2, false));
        stack.select(top);

        stack.remove_layer(top);
        assert_eq!(stack.active_id(), Some(bottom));
        stack.remove_layer(bottom);
        assert_eq!(stack.active_id(), None);
    }

    #[test]
    fn removing_bottom_active_layer_falls_back_to_topmost() {
        let mut stack = LayerStack::new();
        let bottom = stack.push_layer(new_layer("bottom", 0, false));
        let top = stack.push_layer(new_layer("top", 3, false));
        stack.select(bottom);
        stack.remove_layer(bottom);
        assert_eq!(stack.active_id(), Some(top));
    }
}
