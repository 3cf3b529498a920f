use super::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::utils::vector::{Vec2, distance};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StickerId(pub u64);

/// Overlay glyph drawn above every layer, positioned in logical coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Sticker {
    pub id: StickerId,
    pub glyph: String,
    pub pos: Vec2,
    pub size: f32,
    /// Radians, clockwise on screen.
    pub rotation: f32,
}

impl Sticker {
    pub fn contains(&self, point: Vec2) -> bool {
        distance(self.pos, point) <= self.size * 0.5
    }
}

pub fn inside_canvas(point: Vec2) -> bool {
    point.x >= 0.0 && point.y >= 0.0 && point.x < CANVAS_WIDTH as f32 && point.y < CANVAS_HEIGHT as f32
}

/// Stickers in placement order; later stickers draw (and hit-test) on top.
#[derive(Clone, Debug, Default)]
pub struct StickerLayer {
    stickers: Vec<Sticker>,
    next_id: u64,
}

impl StickerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stickers(stickers: Vec<Sticker>) -> Self {
        let next_id = stickers.iter().map(|s| s.id.0 + 1).max().unwrap_or(0);
        Self { stickers, next_id }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sticker> {
        self.stickers.iter()
    }

    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Sticker> {
        self.stickers.clone()
    }

    pub fn clear(&mut self) {
        self.stickers.clear();
    }

    pub fn get(&self, id: StickerId) -> Option<&Sticker> {
        self.stickers.iter().find(|s| s.id == id)
    }

    /// Place a sticker. Points outside the canvas are refused.
    pub fn place(&mut self, glyph: &str, pos: Vec2, size: f32, rotation: f32) -> Option<StickerId> {
        if !inside_canvas(pos) {
            return None;
        }
        let id = StickerId(self.next_id);
        self.next_id += 1;
        self.stickers.push(Sticker {
            id,
            glyph: glyph.to_string(),
            pos,
            size,
            rotation,
        });
        Some(id)
    }

    /// Topmost sticker under `point`.
    pub fn hit_test(&self, point: Vec2) -> Option<StickerId> {
        self.stickers.iter().rev().find(|s| s.contains(point)).map(|s| s.id)
    }

    /// Move a sticker. Returns `false` when the move took it off the canvas, in which
    /// case it has been deleted.
    pub fn move_to(&mut self, id: StickerId, pos: Vec2) -> bool {
        let Some(idx) = self.stickers.iter().position(|s| s.id == id) else {
            return false;
        };
        if inside_canvas(pos) {
            self.stickers[idx].pos = pos;
            true
        } else {
            self.stickers.remove(idx);
            log::debug!("sticker {} dropped outside canvas, removed", id.0);
            false
        }
    }
}
