use crate::utils::{
    color::{Color, destination_out, source_atop, source_over},
    profiler::ScopeTimer,
    vector::{Vec2, distance_to_segment},
};
use image::RgbaImage;
use rayon::prelude::*;

/// Which pointer tool is driving the brush.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BrushTool {
    Paint,
    Erase,
}

/// Per-pixel rule used while rasterizing a stroke. Chosen once per stroke from the tool
/// and the target layer's alpha lock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompositeMode {
    /// Source-over everywhere.
    Paint,
    /// Recolor only pixels that already have alpha; alpha is never changed.
    PaintInside,
    /// Drive alpha toward zero under the stroke.
    Erase,
    /// Recolor existing pixels to opaque white, keeping the silhouette paintable.
    SmartErase,
}

impl CompositeMode {
    pub fn select(tool: BrushTool, lock_alpha: bool) -> Self {
        match (tool, lock_alpha) {
            (BrushTool::Paint, false) => CompositeMode::Paint,
            (BrushTool::Paint, true) => CompositeMode::PaintInside,
            (BrushTool::Erase, false) => CompositeMode::Erase,
            (BrushTool::Erase, true) => CompositeMode::SmartErase,
        }
    }

    fn apply(self, color: Color, dst: Color, coverage: f32) -> Color {
        match self {
            CompositeMode::Paint => source_over(color, dst, coverage),
            CompositeMode::PaintInside => source_atop(color, dst, coverage),
            CompositeMode::Erase => destination_out(dst, coverage),
            CompositeMode::SmartErase => source_atop(Color::WHITE, dst, coverage),
        }
    }
}

/// Round-capped brush used for freehand strokes.
#[derive(Clone, Debug)]
pub struct Brush {
    pub width: f32,
    pub color: Color,
    pub tool: BrushTool,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            width: 50.0,
            color: Color::BLACK,
            tool: BrushTool::Paint,
        }
    }
}

impl Brush {
    pub fn new(width: f32, color: Color, tool: BrushTool) -> Self {
        Self { width, color, tool }
    }

    pub fn mode(&self, lock_alpha: bool) -> CompositeMode {
        CompositeMode::select(self.tool, lock_alpha)
    }

    /// Rasterize one capsule from `from` to `to` into `buffer`.
    ///
    /// The capsule covers both end disks, so a single-point segment draws a dot and
    /// consecutive segments join round. Edges get a one pixel anti-aliased rim. Pixels
    /// outside the buffer are skipped. Returns how many pixels actually changed.
    pub fn draw_segment(&self, buffer: &mut RgbaImage, from: Vec2, to: Vec2, lock_alpha: bool) -> usize {
        let radius = (self.width * 0.5).max(0.5);
        let mode = self.mode(lock_alpha);
        let (w, h) = (buffer.width() as i64, buffer.height() as i64);

        let reach = radius + 1.0;
        let x0 = ((from.x.min(to.x) - reach).floor() as i64).max(0);
        let x1 = ((from.x.max(to.x) + reach).ceil() as i64).min(w - 1);
        let y0 = ((from.y.min(to.y) - reach).floor() as i64).max(0);
        let y1 = ((from.y.max(to.y) + reach).ceil() as i64).min(h - 1);
        if x0 > x1 || y0 > y1 {
            return 0;
        }

        let _timer = ScopeTimer::new("draw_segment");
        let color = self.color;
        let row_bytes = w as usize * 4;
        let raw: &mut [u8] = buffer;
        let rows = &mut raw[y0 as usize * row_bytes..(y1 as usize + 1) * row_bytes];

        rows.par_chunks_mut(row_bytes)
            .enumerate()
            .map(|(i, row)| {
                let y = y0 + i as i64;
                let mut changed = 0;
                for x in x0..=x1 {
                    let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    let coverage = (radius + 0.5 - distance_to_segment(center, from, to)).clamp(0.0, 1.0);
                    if coverage <= 0.0 {
                        continue;
                    }
                    let px = &mut row[x as usize * 4..x as usize * 4 + 4];
                    let dst = Color::rgba(px[0], px[1], px[2], px[3]);
                    let out = mode.apply(color, dst, coverage);
                    if out != dst {
                        px.copy_from_slice(&[out.r, out.g, out.b, out.a]);
                        changed += 1;
                    }
                }
                changed
            })
            .sum()
    }

    /// Stamp a single disk. Used for the first point of a stroke.
    pub fn draw_dot(&self, buffer: &mut RgbaImage, at: Vec2, lock_alpha: bool) -> usize {
        self.draw_segment(buffer, at, at, lock_alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn opaque_count(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p.0[3] > 0).count()
    }

    #[test]
    fn mode_table() {
        assert_eq!(CompositeMode::select(BrushTool::Paint, false), CompositeMode::Paint);
        assert_eq!(CompositeMode::select(BrushTool::Paint, true), CompositeMode::PaintInside);
        assert_eq!(CompositeMode::select(BrushTool::Erase, false), CompositeMode::Erase);
        assert_eq!(CompositeMode::select(BrushTool::Erase, true), CompositeMode::SmartErase);
    }

    #[test]
    fn dot_paints_center_and_not_far_away() {
        let mut img = RgbaImage::new(100, 100);
        let brush = Brush::new(10.0, Color::rgb(255, 0, 0), BrushTool::Paint);
        let changed = brush.draw_dot(&mut img, Vec2::new(50.0, 50.0), false);
        assert!(changed > 0);
        assert_eq!(img.get_pixel(50, 50), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(70, 50).0[3], 0);
    }

    #[test]
    fn segment_off_buffer_is_noop() {
        let mut img = RgbaImage::new(20, 20);
        let brush = Brush::new(4.0, Color::BLACK, BrushTool::Paint);
        assert_eq!(brush.draw_segment(&mut img, Vec2::new(-50.0, -50.0), Vec2::new(-40.0, -30.0), false), 0);
    }

    #[test]
    fn locked_alpha_paint_keeps_footprint() {
        let mut img = RgbaImage::new(40, 40);
        for y in 10..20 {
            for x in 10..20 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 200]));
            }
        }
        let before = opaque_count(&img);
        let brush = Brush::new(30.0, Color::rgb(0, 0, 255), BrushTool::Paint);
        brush.draw_segment(&mut img, Vec2::new(0.0, 0.0), Vec2::new(39.0, 39.0), true);
        assert_eq!(opaque_count(&img), before);
        assert_eq!(img.get_pixel(15, 15), &Rgba([0, 0, 255, 200]));
    }

    #[test]
    fn erase_never_raises_alpha() {
        let mut img = RgbaImage::from_pixel(30, 30, Rgba([10, 20, 30, 180]));
        let before = img.clone();
        let brush = Brush::new(12.0, Color::BLACK, BrushTool::Erase);
        brush.draw_segment(&mut img, Vec2::new(5.0, 5.0), Vec2::new(25.0, 20.0), false);
        for (a, b) in img.pixels().zip(before.pixels()) {
            assert!(a.0[3] <= b.0[3]);
        }
        assert_eq!(img.get_pixel(15, 12).0[3], 0);
    }

    #[test]
    fn smart_erase_only_touches_rgb() {
        let mut img = RgbaImage::new(30, 30);
        img.put_pixel(15, 15, Rgba([200, 0, 0, 255]));
        img.put_pixel(16, 15, Rgba([200, 0, 0, 90]));
        let brush = Brush::new(20.0, Color::BLACK, BrushTool::Erase);
        brush.draw_dot(&mut img, Vec2::new(15.5, 15.5), true);
        assert_eq!(img.get_pixel(15, 15), &Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(16, 15), &Rgba([255, 255, 255, 90]));
        assert_eq!(opaque_count(&img), 2);
    }
}
