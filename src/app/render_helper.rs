use crate::PainterApp;
use crate::app::painter::GridSettings;
use crate::canvas::{
    CANVAS_HEIGHT, CANVAS_WIDTH,
    glyphs::STICKER_INK,
    sticker::StickerLayer,
    view::{DisplayRect, map_to_screen},
};
use crate::utils::{profiler::ScopeTimer, vector::Vec2};
use eframe::egui::{self, Color32, TextureOptions};
use image::RgbaImage;

pub struct CanvasView {
    /// Where the 800x600 canvas is drawn this frame.
    pub rect: DisplayRect,
    pub response: egui::Response,
}

pub(crate) fn color_image(img: &RgbaImage) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied(
        [img.width() as usize, img.height() as usize],
        img.as_raw(),
    )
}

fn to_egui_rect(rect: DisplayRect) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(rect.left, rect.top),
        egui::vec2(rect.width, rect.height),
    )
}

/// Re-flatten and upload the canvas when the session's pixels changed. Stickers are
/// left out here and drawn live by [`draw_stickers`].
pub fn update_canvas_texture(app: &mut PainterApp, ctx: &egui::Context) {
    let revision = app.session.revision();
    if app.canvas_texture.is_some() && app.uploaded_revision == Some(revision) {
        return;
    }

    let _timer = ScopeTimer::new("texture_upload");
    let flat = app.session.composite_layers();
    let image = color_image(&flat);
    match app.canvas_texture.as_mut() {
        Some(texture) => texture.set(image, TextureOptions::LINEAR),
        None => {
            app.canvas_texture = Some(ctx.load_texture("canvas", image, TextureOptions::LINEAR));
        }
    }
    app.uploaded_revision = Some(revision);
}

pub fn draw_canvas(app: &mut PainterApp, ui: &mut egui::Ui) -> CanvasView {
    let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

    app.session.set_viewport(Vec2::new(rect.width(), rect.height()));
    if app.first_frame {
        app.session.fit_view();
        app.first_frame = false;
    }

    let viewport = DisplayRect::new(rect.min.x, rect.min.y, rect.width(), rect.height());
    let shown = app.session.view().display_rect(viewport);
    let canvas_rect = to_egui_rect(shown);
    let painter = ui.painter_at(rect);

    painter.rect_filled(
        canvas_rect.translate(egui::vec2(0.0, 6.0)).expand(2.0),
        egui::Rounding::same(4.0),
        Color32::from_black_alpha(90),
    );
    if let Some(texture) = &app.canvas_texture {
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.image(texture.id(), canvas_rect, uv, Color32::WHITE);
    }
    if app.grid.visible {
        draw_grid(&painter, shown, &app.grid);
    }
    draw_stickers(&painter, app.session.stickers(), shown);

    CanvasView {
        rect: shown,
        response,
    }
}

fn draw_grid(painter: &egui::Painter, shown: DisplayRect, grid: &GridSettings) {
    let step_x = grid.spacing * shown.width / CANVAS_WIDTH as f32;
    let step_y = grid.spacing * shown.height / CANVAS_HEIGHT as f32;
    if step_x < 2.0 || step_y < 2.0 {
        return;
    }
    let alpha = (grid.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    let stroke = egui::Stroke::new(1.0, Color32::from_black_alpha(alpha));

    let mut x = shown.left;
    while x <= shown.right() {
        painter.line_segment([egui::pos2(x, shown.top), egui::pos2(x, shown.bottom())], stroke);
        x += step_x;
    }
    let mut y = shown.top;
    while y <= shown.bottom() {
        painter.line_segment([egui::pos2(shown.left, y), egui::pos2(shown.right(), y)], stroke);
        y += step_y;
    }
}

fn draw_stickers(painter: &egui::Painter, stickers: &StickerLayer, shown: DisplayRect) {
    let ink = STICKER_INK.to_color32();
    let scale = shown.width / CANVAS_WIDTH as f32;
    for sticker in stickers.iter() {
        let center = map_to_screen(sticker.pos, shown);
        let galley = painter.layout_no_wrap(
            sticker.glyph.clone(),
            egui::FontId::proportional(sticker.size * scale),
            ink,
        );
        // TextShape rotates about its top-left corner, so offset it to spin about the center.
        let half = galley.size() * 0.5;
        let turned = Vec2::new(half.x, half.y).rotated(sticker.rotation);
        let pos = egui::pos2(center.x - turned.x, center.y - turned.y);
        painter.add(egui::epaint::TextShape::new(pos, galley, ink).with_angle(sticker.rotation));
    }
}
