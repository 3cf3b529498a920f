use crate::PainterApp;
use crate::session::Tool;
use crate::utils::{
    color::Color,
    exporter::{ExportFormat, default_file_name},
};
use eframe::egui;
use std::path::PathBuf;

pub const PALETTE: [Color; 10] = [
    Color::rgb(0xff, 0x00, 0x00),
    Color::rgb(0xff, 0xa5, 0x00),
    Color::rgb(0xff, 0xff, 0x00),
    Color::rgb(0x00, 0xff, 0x00),
    Color::rgb(0x00, 0x00, 0xff),
    Color::rgb(0x80, 0x00, 0x80),
    Color::rgb(0xff, 0x69, 0xb4),
    Color::rgb(0x8b, 0x45, 0x13),
    Color::BLACK,
    Color::WHITE,
];

pub const BRUSH_SIZES: [f32; 3] = [10.0, 30.0, 60.0];

pub fn top_bar(app: &mut PainterApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("quick_settings").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            for tool in [Tool::Brush, Tool::Eyedropper, Tool::Fill, Tool::Eraser] {
                let selected = *app.session.tool() == tool;
                if ui.selectable_label(selected, tool.label()).clicked() {
                    app.session.set_tool(tool);
                }
            }
            ui.separator();

            let mut width = app.session.brush().width;
            for size in BRUSH_SIZES {
                if ui.selectable_label(width == size, format!("{size:.0}")).clicked() {
                    width = size;
                }
            }
            ui.add(egui::Slider::new(&mut width, 1.0..=150.0).show_value(false));
            if width != app.session.brush().width {
                app.session.set_brush_width(width);
            }
            ui.separator();

            let current = app.session.color().to_color32();
            let (text, fill) = if app.mixing {
                ("Pick one!", egui::Color32::GOLD)
            } else {
                ("Mix", current)
            };
            if ui
                .add(egui::Button::new(egui::RichText::new(text).color(egui::Color32::GRAY)).fill(fill))
                .on_hover_text("Tap, then pick a color to mix it with the current one")
                .clicked()
            {
                app.mixing = !app.mixing;
            }
            for color in PALETTE {
                let swatch = egui::Button::new("")
                    .fill(color.to_color32())
                    .min_size(egui::vec2(22.0, 22.0));
                if ui.add(swatch).on_hover_text(color.to_hex()).clicked() {
                    pick_palette(app, color);
                }
            }
            let mut rgb = [current.r(), current.g(), current.b()];
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                app.session.set_color(Color::rgb(rgb[0], rgb[1], rgb[2]));
            }
            ui.separator();

            let busy = app.export_task.is_some();
            if ui.add_enabled(!busy, egui::Button::new("Save")).clicked() {
                if let Some(path) = pick_file() {
                    app.start_export(path);
                }
            }
            if let Some(msg) = &app.export_message {
                ui.label(msg);
            }
        });
    });
}

/// Palette clicks set (or, in mix mode, blend into) the current color and return to the
/// brush unless a tool that uses the color directly is active.
fn pick_palette(app: &mut PainterApp, color: Color) {
    if app.mixing {
        app.session.mix_color(color);
        app.mixing = false;
    } else {
        app.session.set_color(color);
    }
    if !matches!(app.session.tool(), Tool::Fill | Tool::Stamp(_)) {
        app.session.set_tool(Tool::Brush);
    }
}

fn pick_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_file_name(ExportFormat::PNG))
        .add_filter("PNG", &["png"])
        .add_filter("JPEG", &["jpg", "jpeg"])
        .save_file()
}
