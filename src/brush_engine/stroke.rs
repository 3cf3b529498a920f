use crate::brush_engine::brush::Brush;
use crate::canvas::{LayerId, LayerStack};
use crate::utils::{profiler::ScopeTimer, vector::Vec2};

/// One pointer-down..pointer-up gesture.
///
/// The target layer is fixed when the stroke begins; activating another layer mid-gesture
/// does not retarget it.
pub struct StrokeState {
    layer: LayerId,
    last_pos: Option<Vec2>,
    pixels_written: usize,
    _timer: ScopeTimer,
}

impl StrokeState {
    pub fn begin(layer: LayerId) -> Self {
        Self {
            layer,
            last_pos: None,
            pixels_written: 0,
            _timer: ScopeTimer::new("stroke"),
        }
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn last_pos(&self) -> Option<Vec2> {
        self.last_pos
    }

    /// True once any point of this stroke changed a pixel.
    pub fn has_written(&self) -> bool {
        self.pixels_written > 0
    }

    /// Draw from the previous point (or from `pos` itself for the first point) to `pos`.
    /// Returns the number of pixels changed; zero when the layer has gone away, been
    /// locked or hidden.
    pub fn add_point(&mut self, stack: &mut LayerStack, brush: &Brush, pos: Vec2) -> usize {
        let from = self.last_pos.unwrap_or(pos);
        self.last_pos = Some(pos);

        let Some(layer) = stack.get_mut(self.layer) else {
            return 0;
        };
        if !layer.accepts_input() {
            return 0;
        }
        let lock_alpha = layer.lock_alpha();
        let changed = brush.draw_segment(layer.pixels_mut(), from, pos, lock_alpha);
        self.pixels_written += changed;
        changed
    }
}
