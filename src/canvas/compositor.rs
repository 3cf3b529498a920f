use image::RgbaImage;
use rayon::prelude::*;

use super::layer::Layer;
use super::stack::LayerStack;
use super::sticker::{Sticker, StickerLayer};
use super::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::utils::{
    color::{Color, source_over},
    profiler::ScopeTimer,
};

/// Canvas background shown under all layers and used by export.
pub const BACKGROUND: Color = Color::WHITE;

/// Draws sticker glyphs into a flattened raster, after every layer.
pub trait GlyphRasterizer: Sync {
    fn draw(&self, sticker: &Sticker, target: &mut RgbaImage);
}

/// Rasterizer that leaves stickers out, for the screen texture where the host draws them live.
pub struct NoGlyphs;

impl GlyphRasterizer for NoGlyphs {
    fn draw(&self, _sticker: &Sticker, _target: &mut RgbaImage) {}
}

/// Flatten the stack: white background, visible layers bottom to top, then stickers.
pub fn composite(
    stack: &LayerStack,
    stickers: &StickerLayer,
    glyphs: &dyn GlyphRasterizer,
) -> RgbaImage {
    let _timer = ScopeTimer::new("composite");
    let visible: Vec<&Layer> = stack
        .ascending()
        .into_iter()
        .filter(|l| l.is_visible())
        .collect();

    let mut out = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND.to_rgba());
    let row_len = CANVAS_WIDTH as usize * 4;
    let buf: &mut [u8] = &mut out;
    buf.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        let start = y * row_len;
        for layer in &visible {
            let src_row = &layer.pixels().as_raw()[start..start + row_len];
            for (dst, src) in row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
                if src[3] == 0 {
                    continue;
                }
                let blended = source_over(
                    Color::rgba(src[0], src[1], src[2], src[3]),
                    Color::rgba(dst[0], dst[1], dst[2], dst[3]),
                    1.0,
                );
                dst.copy_from_slice(&[blended.r, blended.g, blended.b, blended.a]);
            }
        }
    });

    for sticker in stickers.iter() {
        glyphs.draw(sticker, &mut out);
    }
    out
}

/// Downscaled copy for the history gallery.
pub fn thumbnail(flat: &RgbaImage, width: u32) -> RgbaImage {
    let width = width.clamp(1, CANVAS_WIDTH);
    let height = (width * CANVAS_HEIGHT / CANVAS_WIDTH).max(1);
    image::imageops::thumbnail(flat, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::layer::write_pixel;
    use crate::canvas::LayerId;
    use crate::canvas::stack::NewLayer;

    fn layer(stack: &mut LayerStack, z: i32) -> LayerId {
        stack.push_layer(NewLayer {
            name: format!("z{z}"),
            icon: None,
            z_index: z,
            locked: false,
            lock_alpha: false,
        })
    }

    #[test]
    fn empty_stack_is_white() {
        let flat = composite(&LayerStack::new(), &StickerLayer::new(), &NoGlyphs);
        assert!(flat.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn higher_z_wins_and_hidden_layers_are_skipped() {
        let mut stack = LayerStack::new();
        let low = layer(&mut stack, 0);
        let high = layer(&mut stack, 1);
        write_pixel(stack.get_mut(low).unwrap().pixels_mut(), 5, 5, Color::rgb(0, 0, 255));
        write_pixel(stack.get_mut(high).unwrap().pixels_mut(), 5, 5, Color::rgb(0, 255, 0));

        let flat = composite(&stack, &StickerLayer::new(), &NoGlyphs);
        assert_eq!(flat.get_pixel(5, 5).0, [0, 255, 0, 255]);

        stack.toggle_visibility(high);
        let flat = composite(&stack, &StickerLayer::new(), &NoGlyphs);
        assert_eq!(flat.get_pixel(5, 5).0, [0, 0, 255, 255]);
    }

    #[test]
    fn thumbnail_keeps_aspect() {
        let flat = composite(&LayerStack::new(), &StickerLayer::new(), &NoGlyphs);
        assert_eq!(thumbnail(&flat, 160).dimensions(), (160, 120));
    }
}
