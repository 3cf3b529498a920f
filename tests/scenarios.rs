use image::RgbaImage;
use layer_painter::{
    PainterConfig, Session, Tool,
    brush_engine::{
        brush::{Brush, BrushTool},
        fill::flood_fill,
    },
    canvas::{
        CANVAS_HEIGHT, CANVAS_WIDTH, LayerId,
        view::{DisplayRect, ViewState, map_to_logical, map_to_screen},
    },
    template::{Geometry, Shape, Template, TemplateLayer, builtin},
    utils::{color::Color, vector::Vec2},
};

const BLUE: Color = Color::rgb(0, 0, 255);
const GREEN: Color = Color::rgb(0, 255, 0);
const RED: Color = Color::rgb(255, 0, 0);

/// Identity placement: one screen pixel per logical pixel.
fn identity_rect() -> DisplayRect {
    DisplayRect::new(0.0, 0.0, CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32)
}

fn single_layer(id: &str, shapes: Vec<Shape>) -> Template {
    Template {
        id: id.to_string(),
        name: id.to_string(),
        icon: None,
        layers: vec![TemplateLayer::new("Only", None, shapes)],
    }
}

fn opaque_set(img: &RgbaImage) -> Vec<bool> {
    img.pixels().map(|p| p[3] > 0).collect()
}

fn active_layer(session: &Session) -> LayerId {
    session.stack().active_id().expect("an active layer")
}

#[test]
fn fill_blank_buffer_then_refill_is_noop() {
    let mut buffer = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Color::WHITE.to_rgba());

    assert!(flood_fill(&mut buffer, (400, 300), RED));
    assert!(buffer.pixels().all(|p| Color::from_rgba(p) == RED));

    let before = buffer.clone();
    assert!(!flood_fill(&mut buffer, (400, 300), RED));
    assert_eq!(buffer, before);
}

#[test]
fn session_fill_sets_dirty_once() {
    let mut session = Session::new(PainterConfig::default());
    session.load_template(&single_layer(
        "paper",
        vec![Shape::fill(Geometry::rect(100.0, 100.0, 600.0, 400.0), Color::WHITE)],
    ));
    assert!(!session.is_dirty());

    session.set_color(RED);
    assert!(session.fill_at(Vec2::new(400.0, 300.0)));
    assert!(session.is_dirty());

    let id = active_layer(&session);
    let pixels = session.stack().get(id).unwrap().pixels().clone();
    assert_eq!(Color::from_rgba(pixels.get_pixel(400, 300)), RED);
    assert_eq!(Color::from_rgba(pixels.get_pixel(150, 150)), RED);

    assert!(!session.fill_at(Vec2::new(400.0, 300.0)));
    assert_eq!(session.stack().get(id).unwrap().pixels(), &pixels);
}

#[test]
fn fill_inside_closed_outline_does_not_leak() {
    let mut buffer = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Color::WHITE.to_rgba());
    let pen = Brush::new(6.0, Color::BLACK, BrushTool::Paint);
    let corners = [
        Vec2::new(200.0, 150.0),
        Vec2::new(600.0, 150.0),
        Vec2::new(600.0, 450.0),
        Vec2::new(200.0, 450.0),
    ];
    for i in 0..corners.len() {
        pen.draw_segment(&mut buffer, corners[i], corners[(i + 1) % corners.len()], false);
    }
    let outlined = buffer.clone();

    assert!(flood_fill(&mut buffer, (400, 300), BLUE));
    for (x, y, px) in buffer.enumerate_pixels() {
        let inside = (196..=604).contains(&x) && (146..=454).contains(&y);
        if !inside {
            assert_eq!(px, outlined.get_pixel(x, y), "leaked to ({x},{y})");
        }
    }
    assert_eq!(Color::from_rgba(buffer.get_pixel(400, 300)), BLUE);
}

#[test]
fn alpha_locked_stroke_keeps_disk_shape() {
    let mut session = Session::new(PainterConfig::default());
    session.load_template(&single_layer(
        "disk",
        vec![Shape::fill(Geometry::circle(Vec2::new(100.0, 150.0), 30.0), BLUE)],
    ));
    let id = active_layer(&session);
    let layer = session.stack().get(id).unwrap();
    assert!(layer.lock_alpha());
    let before = layer.pixels().clone();

    session.set_color(RED);
    session.set_brush_width(50.0);
    session.set_tool(Tool::Brush);
    let rect = identity_rect();
    session.pointer_down(Vec2::new(100.0, 100.0), rect, false);
    session.pointer_move(Vec2::new(100.0, 200.0), rect);
    session.pointer_up();

    let after = session.stack().get(id).unwrap().pixels();
    assert_eq!(opaque_set(&before), opaque_set(after));
    for (b, a) in before.pixels().zip(after.pixels()) {
        assert_eq!(b[3], a[3]);
    }
    assert_eq!(Color::from_rgba(after.get_pixel(100, 150)), RED);
    assert_eq!(after.get_pixel(100, 100)[3], 0);
}

#[test]
fn true_erase_only_lowers_alpha_and_smart_erase_keeps_it() {
    let mut base = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BLUE.to_rgba());
    for x in 0..CANVAS_WIDTH {
        for y in 0..100 {
            base.put_pixel(x, y, BLUE.with_alpha(128).to_rgba());
        }
    }
    let eraser = Brush::new(40.0, Color::BLACK, BrushTool::Erase);
    let from = Vec2::new(50.0, 80.0);
    let to = Vec2::new(700.0, 120.0);

    let mut erased = base.clone();
    assert!(eraser.draw_segment(&mut erased, from, to, false) > 0);
    for (b, a) in base.pixels().zip(erased.pixels()) {
        assert!(a[3] <= b[3]);
    }
    assert_eq!(erased.get_pixel(400, 100)[3], 0);

    let mut smart = base.clone();
    assert!(eraser.draw_segment(&mut smart, from, to, true) > 0);
    for (b, a) in base.pixels().zip(smart.pixels()) {
        assert_eq!(a[3], b[3]);
    }
    assert_eq!(Color::from_rgba(smart.get_pixel(400, 100)), Color::WHITE);
}

#[test]
fn eyedropper_prefers_topmost_layer() {
    let full = || Geometry::rect(0.0, 0.0, CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32);
    let template = Template {
        id: "stacked".to_string(),
        name: "Stacked".to_string(),
        icon: None,
        layers: vec![
            TemplateLayer::new("B", None, vec![Shape::fill(full(), BLUE)]),
            TemplateLayer::new("A", None, vec![Shape::fill(full(), GREEN)]),
        ],
    };
    let mut session = Session::new(PainterConfig::default());
    session.load_template(&template);
    session.set_tool(Tool::Eyedropper);

    session.pointer_down(Vec2::new(300.0, 200.0), identity_rect(), false);
    session.pointer_up();

    assert_eq!(session.color(), GREEN);
    assert_eq!(session.color().to_hex(), "#00ff00");
    assert_eq!(*session.tool(), Tool::Brush);
}

#[test]
fn clean_template_switches_capture_nothing() {
    let mut session = Session::new(PainterConfig::default());
    session.load_template(&builtin::flower());
    session.load_template(&builtin::robot());
    session.load_template(&builtin::pizza());
    assert!(session.history().is_empty());
}

#[test]
fn mapping_inverts_the_render_transform() {
    let viewports = [
        DisplayRect::new(0.0, 0.0, 1024.0, 768.0),
        DisplayRect::new(230.0, 48.0, 970.0, 700.0),
    ];
    let views = [
        ViewState::new(1.0, Vec2::ZERO),
        ViewState::new(0.5, Vec2::new(-40.0, 12.5)),
        ViewState::new(3.7, Vec2::new(300.0, -220.0)),
    ];
    let points = [
        Vec2::new(0.5, 0.5),
        Vec2::new(400.0, 300.0),
        Vec2::new(799.25, 12.0),
        Vec2::new(33.3, 599.0),
    ];
    for viewport in viewports {
        for view in &views {
            let rect = view.display_rect(viewport);
            for p in points {
                let back = map_to_logical(map_to_screen(p, rect), rect);
                assert!((back.x - p.x).abs() < 1e-2 && (back.y - p.y).abs() < 1e-2, "{p:?} -> {back:?}");
            }
        }
    }
}
