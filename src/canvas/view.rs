//! Screen <-> logical canvas mapping and the pan/zoom view state.
//!
//! The view only ever changes where the canvas is *displayed*. Every tool receives
//! logical coordinates produced by [`map_to_logical`], so pan, zoom and letterboxing
//! can never leak into stored pixels.
use super::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::utils::vector::Vec2;

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 5.0;

/// Axis-aligned screen rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    /// A rect that can be inverted (positive, finite extent).
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Edge-inclusive containment.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }
}

/// Convert a screen position into logical canvas pixels given the on-screen rect the
/// canvas currently occupies. Points outside the rect map outside `[0,800)x[0,600)`.
pub fn map_to_logical(screen: Vec2, rect: DisplayRect) -> Vec2 {
    Vec2::new(
        (screen.x - rect.left) * (CANVAS_WIDTH as f32 / rect.width),
        (screen.y - rect.top) * (CANVAS_HEIGHT as f32 / rect.height),
    )
}

/// Forward transform, the exact inverse of [`map_to_logical`].
pub fn map_to_screen(logical: Vec2, rect: DisplayRect) -> Vec2 {
    Vec2::new(
        rect.left + logical.x * (rect.width / CANVAS_WIDTH as f32),
        rect.top + logical.y * (rect.height / CANVAS_HEIGHT as f32),
    )
}

/// Mapping for hit-testing callers: anything outside the displayed rect is "no target".
pub fn map_hit(screen: Vec2, rect: DisplayRect) -> Option<Vec2> {
    if !rect.is_valid() || !rect.contains(screen) {
        return None;
    }
    Some(map_to_logical(screen, rect))
}

/// Display-only pan and zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    scale: f32,
    offset: Vec2,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewState {
    pub fn new(scale: f32, offset: Vec2) -> Self {
        Self {
            scale: clamp_zoom(scale),
            offset,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Where the canvas lands inside `viewport`: centered, scaled about its center, then
    /// translated by the pan offset.
    pub fn display_rect(&self, viewport: DisplayRect) -> DisplayRect {
        let center = viewport.center() + self.offset;
        let width = CANVAS_WIDTH as f32 * self.scale;
        let height = CANVAS_HEIGHT as f32 * self.scale;
        DisplayRect::new(center.x - width * 0.5, center.y - height * 0.5, width, height)
    }

    /// Largest scale (never above 1:1) that fits the canvas with `padding` on each side.
    /// Resets the pan offset.
    pub fn fit(&mut self, viewport: Vec2, padding: f32) {
        let scale_x = (viewport.x - padding * 2.0) / CANVAS_WIDTH as f32;
        let scale_y = (viewport.y - padding * 2.0) / CANVAS_HEIGHT as f32;
        self.scale = clamp_zoom(scale_x.min(scale_y).min(1.0));
        self.offset = Vec2::ZERO;
    }

    /// One wheel notch: positive `direction` zooms in by `step`, negative zooms out.
    pub fn zoom_wheel(&mut self, direction: f32, step: f32) {
        if direction == 0.0 || direction.is_nan() {
            return;
        }
        self.scale = clamp_zoom(self.scale + direction.signum() * step);
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset = self.offset + delta;
    }

    /// Two-finger gesture: multiply the scale by the finger-distance ratio and follow
    /// the centroid.
    pub fn pinch(&mut self, scale_factor: f32, centroid_delta: Vec2) {
        if scale_factor.is_finite() && scale_factor > 0.0 {
            self.scale = clamp_zoom(self.scale * scale_factor);
        }
        self.pan(centroid_delta);
    }
}

fn clamp_zoom(scale: f32) -> f32 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(MIN_ZOOM, MAX_ZOOM)
}
