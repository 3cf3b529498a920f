//! Layered raster canvas: layers, stacking, compositing, overlay stickers,
//! history snapshots and the screen/logical coordinate transform.
pub mod compositor;
pub mod glyphs;
pub mod history;
pub mod layer;
pub mod stack;
pub mod sticker;
pub mod view;

/// Width of the logical canvas every tool operates in.
pub const CANVAS_WIDTH: u32 = 800;
/// Height of the logical canvas every tool operates in.
pub const CANVAS_HEIGHT: u32 = 600;

pub use layer::{Layer, LayerId, LayerMeta};
pub use stack::LayerStack;
