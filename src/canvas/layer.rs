use image::RgbaImage;
use rayon::prelude::*;

use super::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::utils::color::{Color, source_over};

/// Stable layer identifier. Never reused within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// Everything about a layer except its pixels. This is what history snapshots record
/// next to the encoded pixel data.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerMeta {
    pub id: LayerId,
    pub name: String,
    pub icon: Option<String>,
    pub z_index: i32,
    pub visible: bool,
    pub locked: bool,
    pub lock_alpha: bool,
    pub last_color: Option<Color>,
}

/// Single paintable layer backed by an owned 800x600 straight-alpha RGBA buffer.
#[derive(Clone, Debug)]
pub struct Layer {
    pub meta: LayerMeta,
    pub(crate) seq: u64,
    pixels: RgbaImage,
}

impl Layer {
    /// Allocate a fully transparent layer.
    pub(crate) fn new(meta: LayerMeta, seq: u64) -> Self {
        Self {
            meta,
            seq,
            pixels: RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT),
        }
    }

    pub fn id(&self) -> LayerId {
        self.meta.id
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn z_index(&self) -> i32 {
        self.meta.z_index
    }

    pub fn is_visible(&self) -> bool {
        self.meta.visible
    }

    pub fn is_locked(&self) -> bool {
        self.meta.locked
    }

    pub fn lock_alpha(&self) -> bool {
        self.meta.lock_alpha
    }

    pub fn last_color(&self) -> Option<Color> {
        self.meta.last_color
    }

    /// Whether input may mutate this layer at all.
    pub fn accepts_input(&self) -> bool {
        self.meta.visible && !self.meta.locked
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// Replace the whole buffer. Buffers of the wrong size are rejected and leave the
    /// layer untouched.
    pub(crate) fn replace_pixels(&mut self, pixels: RgbaImage) -> bool {
        if !self.fits(&pixels) {
            return false;
        }
        self.pixels = pixels;
        true
    }

    /// Slide `below` under the current pixels: existing paint is blended over it and
    /// transparent pixels take its value.
    pub(crate) fn underlay(&mut self, mut below: RgbaImage) -> bool {
        if !self.fits(&below) {
            return false;
        }
        let row_len = CANVAS_WIDTH as usize * 4;
        let top = self.pixels.as_raw();
        let raw: &mut [u8] = &mut below;
        raw.par_chunks_mut(row_len)
            .zip(top.par_chunks(row_len))
            .for_each(|(dst_row, src_row)| {
                for (dst, src) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
                    if src[3] == 0 {
                        continue;
                    }
                    let out = source_over(
                        Color::rgba(src[0], src[1], src[2], src[3]),
                        Color::rgba(dst[0], dst[1], dst[2], dst[3]),
                        1.0,
                    );
                    dst.copy_from_slice(&[out.r, out.g, out.b, out.a]);
                }
            });
        self.pixels = below;
        true
    }

    fn fits(&self, pixels: &RgbaImage) -> bool {
        let ok = pixels.dimensions() == (CANVAS_WIDTH, CANVAS_HEIGHT);
        if !ok {
            log::warn!(
                "{}: ignoring {}x{} buffer",
                self.meta.id,
                pixels.width(),
                pixels.height()
            );
        }
        ok
    }

    /// Read a pixel; anything outside the buffer reads as fully transparent.
    pub fn pixel(&self, x: i64, y: i64) -> Color {
        read_pixel(&self.pixels, x, y)
    }

    /// Number of pixels with nonzero alpha.
    pub fn opaque_pixel_count(&self) -> usize {
        self.pixels.pixels().filter(|p| p.0[3] > 0).count()
    }
}

/// Bounds-checked pixel read shared by every tool.
pub fn read_pixel(buffer: &RgbaImage, x: i64, y: i64) -> Color {
    if x < 0 || y < 0 || x >= buffer.width() as i64 || y >= buffer.height() as i64 {
        return Color::TRANSPARENT;
    }
    Color::from_rgba(buffer.get_pixel(x as u32, y as u32))
}

/// Bounds-checked pixel write; out-of-range writes are dropped.
pub fn write_pixel(buffer: &mut RgbaImage, x: i64, y: i64, color: Color) {
    if x < 0 || y < 0 || x >= buffer.width() as i64 || y >= buffer.height() as i64 {
        return;
    }
    buffer.put_pixel(x as u32, y as u32, color.to_rgba());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> LayerMeta {
        LayerMeta {
            id: LayerId(1),
            name: "Layer 1".into(),
            icon: None,
            z_index: 0,
            visible: true,
            locked: false,
            lock_alpha: false,
            last_color: None,
        }
    }

    #[test]
    fn out_of_range_reads_are_transparent() {
        let layer = Layer::new(meta(), 0);
        assert_eq!(layer.pixel(-1, 0), Color::TRANSPARENT);
        assert_eq!(layer.pixel(800, 10), Color::TRANSPARENT);
    }

    #[test]
    fn out_of_range_writes_are_dropped() {
        let mut layer = Layer::new(meta(), 0);
        write_pixel(layer.pixels_mut(), 900, 10, Color::BLACK);
        write_pixel(layer.pixels_mut(), 3, 4, Color::BLACK);
        assert_eq!(layer.opaque_pixel_count(), 1);
    }

    #[test]
    fn wrong_sized_buffer_is_rejected() {
        let mut layer = Layer::new(meta(), 0);
        assert!(!layer.replace_pixels(RgbaImage::new(10, 10)));
        assert_eq!(layer.pixels().dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }

    #[test]
    fn underlay_keeps_existing_paint_on_top() {
        let mut layer = Layer::new(meta(), 0);
        write_pixel(layer.pixels_mut(), 3, 4, Color::rgb(255, 0, 0));
        write_pixel(layer.pixels_mut(), 5, 5, Color::rgba(0, 0, 255, 0));

        let below = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Color::rgb(0, 200, 0).to_rgba());
        assert!(layer.underlay(below));
        assert_eq!(layer.pixel(3, 4), Color::rgb(255, 0, 0));
        assert_eq!(layer.pixel(5, 5), Color::rgb(0, 200, 0));
        assert_eq!(layer.pixel(799, 599), Color::rgb(0, 200, 0));

        assert!(!layer.underlay(RgbaImage::new(4, 4)));
        assert_eq!(layer.pixel(3, 4), Color::rgb(255, 0, 0));
    }
}
