//! Scanline flood fill.
//!
//! Spans run vertically: each popped seed walks up to the top of its run, then fills
//! downward while seeding the columns on either side once per contiguous run. Two
//! tolerances apply. A seed pixel closer than `seed_tolerance` to the fill color means
//! the region is already filled and nothing happens. Neighbours within `span_tolerance`
//! of the seed color join the region, so anti-aliased outline edges do not leave
//! speckles behind.
use crate::utils::{color::Color, profiler::ScopeTimer};
use image::RgbaImage;

pub const SEED_TOLERANCE: u8 = 3;
pub const SPAN_TOLERANCE: u8 = 30;

#[derive(Clone, Copy, Debug)]
pub struct FillOptions {
    pub seed_tolerance: u8,
    pub span_tolerance: u8,
    /// On alpha-locked layers transparent pixels never join the region.
    pub lock_alpha: bool,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            seed_tolerance: SEED_TOLERANCE,
            span_tolerance: SPAN_TOLERANCE,
            lock_alpha: false,
        }
    }
}

/// Fill with default tolerances. Returns false when nothing was filled.
pub fn flood_fill(buffer: &mut RgbaImage, seed: (i64, i64), color: Color) -> bool {
    flood_fill_with(buffer, seed, color, &FillOptions::default())
}

pub fn flood_fill_with(buffer: &mut RgbaImage, seed: (i64, i64), color: Color, options: &FillOptions) -> bool {
    let spans = buffer.width() as usize * buffer.height() as usize;
    flood_fill_capped(buffer, seed, color, options, spans)
}

/// Fill that stops after `max_iterations` popped spans, keeping what it wrote so far.
fn flood_fill_capped(
    buffer: &mut RgbaImage,
    seed: (i64, i64),
    color: Color,
    options: &FillOptions,
    max_iterations: usize,
) -> bool {
    let (w, h) = (buffer.width() as i64, buffer.height() as i64);
    let (sx, sy) = seed;
    if sx < 0 || sy < 0 || sx >= w || sy >= h {
        return false;
    }

    let fill = color.with_alpha(255);
    let target = Color::from_rgba(buffer.get_pixel(sx as u32, sy as u32));
    if is_close(target, fill, options.seed_tolerance) {
        log::debug!("fill skipped, seed already {}", target);
        return false;
    }
    if options.lock_alpha && target.a == 0 {
        return false;
    }

    let _timer = ScopeTimer::new("flood_fill");
    let region = Region {
        target,
        tolerance: options.span_tolerance,
        lock_alpha: options.lock_alpha,
        width: w,
    };
    let mut visited = vec![false; (w * h) as usize];
    let mut stack = vec![(sx, sy)];
    let mut iterations = 0;
    let mut filled = 0usize;

    while let Some((x, mut y)) = stack.pop() {
        if iterations >= max_iterations {
            log::warn!("fill hit iteration cap with {} seeds pending", stack.len() + 1);
            break;
        }
        iterations += 1;

        while y >= 0 && region.matches(buffer, &visited, x, y) {
            y -= 1;
        }
        y += 1;

        let mut span_left = false;
        let mut span_right = false;
        while y < h && region.matches(buffer, &visited, x, y) {
            buffer.put_pixel(x as u32, y as u32, fill.to_rgba());
            visited[(y * w + x) as usize] = true;
            filled += 1;

            if x > 0 {
                if region.matches(buffer, &visited, x - 1, y) {
                    if !span_left {
                        stack.push((x - 1, y));
                        span_left = true;
                    }
                } else {
                    span_left = false;
                }
            }
            if x < w - 1 {
                if region.matches(buffer, &visited, x + 1, y) {
                    if !span_right {
                        stack.push((x + 1, y));
                        span_right = true;
                    }
                } else {
                    span_right = false;
                }
            }
            y += 1;
        }
    }

    log::debug!("filled {filled} pixels in {iterations} spans");
    filled > 0
}

/// Strictly closer than `tolerance` on every channel.
fn is_close(a: Color, b: Color, tolerance: u8) -> bool {
    tolerance > 0 && a.within_tolerance(b, tolerance - 1)
}

struct Region {
    target: Color,
    tolerance: u8,
    lock_alpha: bool,
    width: i64,
}

impl Region {
    fn matches(&self, buffer: &RgbaImage, visited: &[bool], x: i64, y: i64) -> bool {
        if visited[(y * self.width + x) as usize] {
            return false;
        }
        let px = Color::from_rgba(buffer.get_pixel(x as u32, y as u32));
        if self.lock_alpha && px.a == 0 {
            return false;
        }
        px.within_tolerance(self.target, self.tolerance)
    }
}
