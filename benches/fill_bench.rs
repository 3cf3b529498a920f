use criterion::{criterion_group, criterion_main, Criterion};
use image::RgbaImage;
use layer_painter::{
    brush_engine::fill::flood_fill,
    canvas::{CANVAS_HEIGHT, CANVAS_WIDTH},
    template::builtin,
    utils::color::Color,
};

fn bench_fill_blank(c: &mut Criterion) {
    let blank = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Color::WHITE.to_rgba());

    c.bench_function("fill_blank_800x600", |b| {
        b.iter_batched(
            || blank.clone(),
            |mut buffer| flood_fill(&mut buffer, (400, 300), Color::rgb(255, 0, 0)),
            criterion::BatchSize::LargeInput,
        );
    });
}

fn bench_fill_template_shape(c: &mut Criterion) {
    // One white petal bounded by transparency and anti-aliased rims.
    let template = builtin::flower();
    let petals = template.layers[1].render();

    c.bench_function("fill_flower_layer", |b| {
        b.iter_batched(
            || petals.clone(),
            |mut buffer| flood_fill(&mut buffer, (510, 300), Color::rgb(0, 0, 255)),
            criterion::BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, bench_fill_blank, bench_fill_template_shape);
criterion_main!(benches);
