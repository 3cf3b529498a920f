//! Pointer and navigation input for a [`Session`].
//!
//! Hosts translate their own events into these calls and pass ambient state (whether
//! the current press is a pan, where the canvas is on screen) explicitly.
use super::Session;
use crate::brush_engine::{brush::BrushTool, stroke::StrokeState};
use crate::canvas::{
    sticker::StickerId,
    view::{DisplayRect, map_hit, map_to_logical},
};
use crate::utils::vector::Vec2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tool {
    Brush,
    Eraser,
    Eyedropper,
    Fill,
    /// Place the given glyph as a sticker, or drag an existing one.
    Stamp(String),
}

impl Tool {
    pub fn label(&self) -> &str {
        match self {
            Tool::Brush => "Brush",
            Tool::Eraser => "Eraser",
            Tool::Eyedropper => "Picker",
            Tool::Fill => "Fill",
            Tool::Stamp(glyph) => glyph,
        }
    }
}

/// What the pointer is doing between down and up.
#[derive(Default)]
pub(crate) enum Gesture {
    #[default]
    Idle,
    Stroke(StrokeState),
    Sticker(StickerId),
    Pan {
        last: Vec2,
    },
}

impl Session {
    /// Viewport size used by fit-to-screen.
    pub fn set_viewport(&mut self, size: Vec2) {
        self.viewport = size;
    }

    pub fn fit_view(&mut self) {
        self.view.fit(self.viewport, self.config.fit_padding);
    }

    /// Positive `notches` zoom in.
    pub fn zoom_wheel(&mut self, notches: f32) {
        self.view.zoom_wheel(notches, self.config.wheel_zoom_step);
    }

    pub fn pinch(&mut self, scale_factor: f32, centroid_delta: Vec2) {
        self.view.pinch(scale_factor, centroid_delta);
    }

    pub fn is_gesture_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Pan { .. })
    }

    /// Start a gesture at `screen`. `rect` is where the canvas is currently displayed.
    pub fn pointer_down(&mut self, screen: Vec2, rect: DisplayRect, is_pan_gesture: bool) {
        if is_pan_gesture {
            self.gesture = Gesture::Pan { last: screen };
            return;
        }
        if !rect.is_valid() {
            return;
        }

        match self.tool.clone() {
            Tool::Brush | Tool::Eraser => {
                if let Some(logical) = map_hit(screen, rect) {
                    self.activate_at(logical);
                }
                self.begin_stroke(map_to_logical(screen, rect));
            }
            Tool::Eyedropper => {
                if let Some(logical) = map_hit(screen, rect) {
                    self.sample_at(logical);
                }
            }
            Tool::Fill => {
                if let Some(logical) = map_hit(screen, rect) {
                    self.fill_at(logical);
                }
            }
            Tool::Stamp(glyph) => {
                let Some(logical) = map_hit(screen, rect) else {
                    return;
                };
                match self.stickers.hit_test(logical) {
                    Some(id) => self.gesture = Gesture::Sticker(id),
                    None => {
                        self.place_sticker(&glyph, logical);
                    }
                }
            }
        }
    }

    pub fn pointer_move(&mut self, screen: Vec2, rect: DisplayRect) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Pan { last } => {
                let delta = screen - *last;
                *last = screen;
                self.view.pan(delta);
            }
            Gesture::Stroke(stroke) => {
                if !rect.is_valid() {
                    return;
                }
                let changed = stroke.add_point(&mut self.stack, &self.brush, map_to_logical(screen, rect));
                if changed > 0 {
                    self.mark_dirty();
                }
            }
            Gesture::Sticker(id) => {
                let id = *id;
                if !rect.is_valid() {
                    return;
                }
                if !self.move_sticker(id, map_to_logical(screen, rect)) {
                    self.gesture = Gesture::Idle;
                }
            }
        }
    }

    pub fn pointer_up(&mut self) {
        if let Gesture::Stroke(stroke) = std::mem::take(&mut self.gesture) {
            log::debug!("stroke on {} finished (wrote: {})", stroke.layer(), stroke.has_written());
        }
    }

    /// Begin a freehand stroke on the active layer. Points outside the canvas are fine;
    /// they simply do not land on any pixel.
    pub fn begin_stroke(&mut self, logical: Vec2) -> bool {
        let Some(layer) = self.stack.active().filter(|l| l.accepts_input()) else {
            return false;
        };
        self.brush.tool = match self.tool {
            Tool::Eraser => BrushTool::Erase,
            _ => BrushTool::Paint,
        };
        let mut stroke = StrokeState::begin(layer.id());
        let changed = stroke.add_point(&mut self.stack, &self.brush, logical);
        self.gesture = Gesture::Stroke(stroke);
        if changed > 0 {
            self.mark_dirty();
        }
        true
    }
}
