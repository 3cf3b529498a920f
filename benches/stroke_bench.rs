use criterion::{criterion_group, criterion_main, Criterion};
use image::RgbaImage;
use layer_painter::{
    brush_engine::brush::{Brush, BrushTool},
    canvas::{CANVAS_HEIGHT, CANVAS_WIDTH},
    utils::{color::Color, vector::Vec2},
};

fn bench_segments(c: &mut Criterion) {
    let opaque = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Color::rgb(0, 0, 255).to_rgba());
    let paint = Brush::new(50.0, Color::rgb(255, 0, 0), BrushTool::Paint);
    let erase = Brush::new(50.0, Color::BLACK, BrushTool::Erase);

    let mut group = c.benchmark_group("segment_50px");
    for (name, brush, lock_alpha) in [
        ("paint", &paint, false),
        ("paint_inside", &paint, true),
        ("erase", &erase, false),
        ("smart_erase", &erase, true),
    ] {
        let mut buffer = opaque.clone();
        group.bench_function(name, |b| {
            b.iter(|| {
                brush.draw_segment(
                    &mut buffer,
                    Vec2::new(100.0, 300.0),
                    Vec2::new(700.0, 300.0),
                    lock_alpha,
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_segments);
criterion_main!(benches);
