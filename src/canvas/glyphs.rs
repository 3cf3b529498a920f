//! Sticker glyphs for flattened output (export and gallery thumbnails).
//!
//! Each sticker string is laid out left to right into a coverage mask, then stamped
//! centered on the sticker position, rotated, with source-over in [`STICKER_INK`].
use ab_glyph::{Font, FontArc, OutlinedGlyph, PxScale, ScaleFont, point};
use eframe::egui;
use image::RgbaImage;

use super::compositor::GlyphRasterizer;
use super::sticker::Sticker;
use crate::utils::{
    color::{Color, source_over},
    vector::Vec2,
};

/// Ink used for sticker glyphs, both on screen and in flattened output.
pub const STICKER_INK: Color = Color::rgb(40, 40, 48);

/// Fonts tried in order; each character uses the first one that has it.
#[derive(Clone, Default)]
pub struct FontGlyphs {
    fonts: Vec<FontArc>,
}

impl FontGlyphs {
    pub fn new(fonts: Vec<FontArc>) -> Self {
        Self { fonts }
    }

    /// egui's bundled proportional family, which ends in its emoji faces.
    pub fn egui_defaults() -> Self {
        let defs = egui::FontDefinitions::default();
        let names = defs
            .families
            .get(&egui::FontFamily::Proportional)
            .cloned()
            .unwrap_or_default();
        let fonts: Vec<FontArc> = names
            .iter()
            .filter_map(|name| {
                let data = defs.font_data.get(name)?;
                match FontArc::try_from_vec(data.font.to_vec()) {
                    Ok(font) => Some(font),
                    Err(err) => {
                        log::warn!("skipping font '{name}': {err}");
                        None
                    }
                }
            })
            .collect();
        if fonts.is_empty() {
            log::warn!("no sticker fonts loaded, flattened output will omit stickers");
        } else {
            log::debug!("loaded {} sticker fonts", fonts.len());
        }
        Self { fonts }
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    fn font_for(&self, ch: char) -> Option<&FontArc> {
        self.fonts.iter().find(|f| f.glyph_id(ch).0 != 0)
    }

    fn mask(&self, text: &str, size: f32) -> Option<Mask> {
        let scale = PxScale::from(size.max(1.0));
        let mut pen = 0.0f32;
        let mut outlined: Vec<OutlinedGlyph> = Vec::new();
        for ch in text.chars() {
            let Some(font) = self.font_for(ch) else {
                log::debug!("no font has {ch:?}");
                continue;
            };
            let scaled = font.as_scaled(scale);
            let mut glyph = scaled.scaled_glyph(ch);
            glyph.position = point(pen, scaled.ascent());
            pen += scaled.h_advance(glyph.id);
            if let Some(outline) = font.outline_glyph(glyph) {
                outlined.push(outline);
            }
        }
        if outlined.is_empty() {
            return None;
        }

        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for outline in &outlined {
            let b = outline.px_bounds();
            min_x = min_x.min(b.min.x);
            min_y = min_y.min(b.min.y);
            max_x = max_x.max(b.max.x);
            max_y = max_y.max(b.max.y);
        }
        let width = (max_x - min_x).ceil().max(1.0) as usize;
        let height = (max_y - min_y).ceil().max(1.0) as usize;
        let mut coverage = vec![0.0f32; width * height];
        for outline in &outlined {
            let b = outline.px_bounds();
            let ox = (b.min.x - min_x).max(0.0) as usize;
            let oy = (b.min.y - min_y).max(0.0) as usize;
            outline.draw(|x, y, c| {
                let (ix, iy) = (ox + x as usize, oy + y as usize);
                if ix < width && iy < height {
                    let cell = &mut coverage[iy * width + ix];
                    *cell = cell.max(c);
                }
            });
        }
        Some(Mask {
            width,
            height,
            coverage,
        })
    }
}

struct Mask {
    width: usize,
    height: usize,
    coverage: Vec<f32>,
}

impl Mask {
    /// Nearest-neighbour lookup; outside the mask is uncovered.
    fn sample(&self, x: f32, y: f32) -> f32 {
        if x < 0.0 || y < 0.0 {
            return 0.0;
        }
        let (ix, iy) = (x as usize, y as usize);
        if ix >= self.width || iy >= self.height {
            return 0.0;
        }
        self.coverage[iy * self.width + ix]
    }
}

impl GlyphRasterizer for FontGlyphs {
    fn draw(&self, sticker: &Sticker, target: &mut RgbaImage) {
        let Some(mask) = self.mask(&sticker.glyph, sticker.size) else {
            return;
        };
        let half = Vec2::new(mask.width as f32 * 0.5, mask.height as f32 * 0.5);
        let reach = half.length() + 1.0;
        let (w, h) = (target.width() as i64, target.height() as i64);
        let x0 = ((sticker.pos.x - reach).floor() as i64).max(0);
        let x1 = ((sticker.pos.x + reach).ceil() as i64).min(w - 1);
        let y0 = ((sticker.pos.y - reach).floor() as i64).max(0);
        let y1 = ((sticker.pos.y + reach).ceil() as i64).min(h - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let offset = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - sticker.pos;
                let local = offset.rotated(-sticker.rotation) + half;
                let cov = mask.sample(local.x, local.y);
                if cov <= 0.0 {
                    continue;
                }
                let px = target.get_pixel_mut(x as u32, y as u32);
                *px = source_over(STICKER_INK, Color::from_rgba(px), cov).to_rgba();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::sticker::StickerId;
    use crate::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH};

    fn sticker(glyph: &str, size: f32, rotation: f32) -> Sticker {
        Sticker {
            id: StickerId(1),
            glyph: glyph.to_string(),
            pos: Vec2::new(200.0, 150.0),
            size,
            rotation,
        }
    }

    fn stamped(glyphs: &FontGlyphs, s: &Sticker) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Color::WHITE.to_rgba());
        glyphs.draw(s, &mut img);
        img
    }

    /// Inked pixels as (x, y) pairs.
    fn inked(img: &RgbaImage) -> Vec<(u32, u32)> {
        img.enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [255, 255, 255, 255])
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn bundled_fonts_load() {
        let glyphs = FontGlyphs::egui_defaults();
        assert!(!glyphs.is_empty());
        assert!(glyphs.font_for('A').is_some());
        assert!(glyphs.font_for('⭐').is_some());
    }

    #[test]
    fn glyph_lands_around_the_sticker_center() {
        let glyphs = FontGlyphs::egui_defaults();
        let img = stamped(&glyphs, &sticker("A", 48.0, 0.0));
        let ink = inked(&img);
        assert!(!ink.is_empty());
        for (x, y) in &ink {
            assert!((*x as f32 - 200.0).abs() <= 40.0 && (*y as f32 - 150.0).abs() <= 40.0);
        }
        // Source-over keeps the background opaque.
        assert!(img.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn size_scales_the_ink() {
        let glyphs = FontGlyphs::egui_defaults();
        let small = inked(&stamped(&glyphs, &sticker("A", 24.0, 0.0))).len();
        let large = inked(&stamped(&glyphs, &sticker("A", 96.0, 0.0))).len();
        assert!(large > small * 4, "{small} vs {large}");
    }

    #[test]
    fn rotation_turns_the_glyph() {
        let glyphs = FontGlyphs::egui_defaults();
        let upright = stamped(&glyphs, &sticker("L", 64.0, 0.0));
        let turned = stamped(&glyphs, &sticker("L", 64.0, std::f32::consts::FRAC_PI_2));
        assert_ne!(upright, turned);

        let spread = |img: &RgbaImage| {
            let ink = inked(img);
            let w = ink.iter().map(|p| p.0).max().unwrap() - ink.iter().map(|p| p.0).min().unwrap();
            let h = ink.iter().map(|p| p.1).max().unwrap() - ink.iter().map(|p| p.1).min().unwrap();
            (w, h)
        };
        let (w0, h0) = spread(&upright);
        let (w1, h1) = spread(&turned);
        // An upright L is taller than wide; a quarter turn swaps that.
        assert!(h0 > w0);
        assert!(w1 > h1);
    }

    #[test]
    fn missing_characters_draw_nothing() {
        let img = stamped(&FontGlyphs::default(), &sticker("A", 48.0, 0.0));
        assert!(inked(&img).is_empty());
    }
}
