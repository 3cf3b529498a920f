use image::RgbaImage;
use rayon::prelude::*;

use super::shape::{Paint, Polyline, Shape};
use crate::utils::{
    color::{Color, source_over},
    vector::{Vec2, distance_to_segment},
};

/// Vertical samples per pixel row when filling.
const SUBSAMPLES: usize = 4;

pub fn draw_shape(buffer: &mut RgbaImage, shape: &Shape) {
    let lines = shape.geometry.flatten();
    match shape.paint {
        Paint::Fill { color } => fill_polylines(buffer, &lines, color),
        Paint::Stroke { color, width } => stroke_polylines(buffer, &lines, color, width),
    }
}

/// Nonzero-winding fill. Every polyline is treated as closed.
pub fn fill_polylines(buffer: &mut RgbaImage, lines: &[Polyline], color: Color) {
    let edges: Vec<(Vec2, Vec2)> = lines
        .iter()
        .filter(|l| l.points.len() > 2)
        .flat_map(|l| {
            let closed = Polyline {
                points: l.points.clone(),
                closed: true,
            };
            closed.segments().collect::<Vec<_>>()
        })
        .filter(|(a, b)| a.y != b.y)
        .collect();
    let Some((y0, y1)) = vertical_extent(edges.iter().flat_map(|(a, b)| [*a, *b]), 0.0) else {
        return;
    };

    paint_rows(buffer, y0, y1, color, |y, cov| {
        let weight = 1.0 / SUBSAMPLES as f32;
        let mut crossings: Vec<(f32, i32)> = Vec::new();
        for s in 0..SUBSAMPLES {
            let sy = y as f32 + (s as f32 + 0.5) / SUBSAMPLES as f32;
            crossings.clear();
            for (a, b) in &edges {
                let (lo, hi, dir) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
                if sy < lo.y || sy >= hi.y {
                    continue;
                }
                let x = lo.x + (sy - lo.y) / (hi.y - lo.y) * (hi.x - lo.x);
                crossings.push((x, dir));
            }
            crossings.sort_by(|p, q| p.0.total_cmp(&q.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding != 0 {
                    add_span(cov, pair[0].0, pair[1].0, weight);
                }
            }
        }
    });
}

/// Round-capped, round-joined stroke with a one pixel anti-aliased rim.
pub fn stroke_polylines(buffer: &mut RgbaImage, lines: &[Polyline], color: Color, width: f32) {
    let radius = (width * 0.5).max(0.5);
    for line in lines {
        let segments: Vec<(Vec2, Vec2)> = match line.points.as_slice() {
            [] => continue,
            [only] => vec![(*only, *only)],
            _ => line.segments().collect(),
        };
        let Some((y0, y1)) = vertical_extent(line.points.iter().copied(), radius + 1.0) else {
            continue;
        };
        let x_min = line.points.iter().map(|p| p.x).fold(f32::MAX, f32::min) - radius - 1.0;
        let x_max = line.points.iter().map(|p| p.x).fold(f32::MIN, f32::max) + radius + 1.0;

        paint_rows(buffer, y0, y1, color, |y, cov| {
            let w = cov.len() as i64;
            let cy = y as f32 + 0.5;
            let near: Vec<&(Vec2, Vec2)> = segments
                .iter()
                .filter(|(a, b)| cy >= a.y.min(b.y) - radius - 1.0 && cy <= a.y.max(b.y) + radius + 1.0)
                .collect();
            if near.is_empty() {
                return;
            }
            let xa = (x_min.floor() as i64).max(0);
            let xb = (x_max.ceil() as i64).min(w - 1);
            for x in xa..=xb {
                let p = Vec2::new(x as f32 + 0.5, cy);
                let d = near
                    .iter()
                    .map(|(a, b)| distance_to_segment(p, *a, *b))
                    .fold(f32::MAX, f32::min);
                let c = (radius + 0.5 - d).clamp(0.0, 1.0);
                if c > cov[x as usize] {
                    cov[x as usize] = c;
                }
            }
        });
    }
}

fn vertical_extent(points: impl Iterator<Item = Vec2>, pad: f32) -> Option<(i64, i64)> {
    let (lo, hi) = points.fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    if lo > hi {
        return None;
    }
    Some(((lo - pad).floor() as i64, (hi + pad).ceil() as i64))
}

fn add_span(cov: &mut [f32], xa: f32, xb: f32, weight: f32) {
    let w = cov.len() as f32;
    let (xa, xb) = (xa.max(0.0), xb.min(w));
    if xb <= xa {
        return;
    }
    let ia = xa.floor() as usize;
    let ib = xb.floor() as usize;
    if ia == ib {
        cov[ia] += (xb - xa) * weight;
        return;
    }
    cov[ia] += (ia as f32 + 1.0 - xa) * weight;
    for c in &mut cov[ia + 1..ib] {
        *c += weight;
    }
    if ib < cov.len() {
        cov[ib] += (xb - ib as f32) * weight;
    }
}

/// Build a coverage row for each buffer row in `y0..=y1` and composite `color` through it.
fn paint_rows<F>(buffer: &mut RgbaImage, y0: i64, y1: i64, color: Color, coverage: F)
where
    F: Fn(i64, &mut [f32]) + Sync,
{
    let (w, h) = (buffer.width() as usize, buffer.height() as i64);
    let (y0, y1) = (y0.max(0), y1.min(h - 1));
    if y0 > y1 {
        return;
    }
    let row_bytes = w * 4;
    let raw: &mut [u8] = buffer;
    raw[y0 as usize * row_bytes..(y1 as usize + 1) * row_bytes]
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(i, row)| {
            let mut cov = vec![0.0f32; w];
            coverage(y0 + i as i64, &mut cov);
            for (x, c) in cov.into_iter().enumerate() {
                if c <= 0.0 {
                    continue;
                }
                let px = &mut row[x * 4..x * 4 + 4];
                let out = source_over(color, Color::rgba(px[0], px[1], px[2], px[3]), c.min(1.0));
                px.copy_from_slice(&[out.r, out.g, out.b, out.a]);
            }
        });
}
