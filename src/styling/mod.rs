use eframe::egui;

/// Dark chrome around the canvas with rounded, roomy controls for touch screens.
pub fn apply_global_style(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = egui::Color32::from_rgb(22, 25, 34);
    visuals.window_fill = egui::Color32::from_rgb(26, 30, 40);
    visuals.extreme_bg_color = egui::Color32::from_rgb(30, 34, 46);
    visuals.widgets.inactive.bg_fill = egui::Color32::from_rgb(38, 43, 58);
    visuals.widgets.hovered.bg_fill = egui::Color32::from_rgb(52, 78, 122);
    visuals.widgets.active.bg_fill = egui::Color32::from_rgb(255, 170, 60);
    visuals.widgets.inactive.fg_stroke.color = egui::Color32::from_rgb(225, 228, 238);
    visuals.widgets.hovered.fg_stroke.color = egui::Color32::WHITE;
    visuals.selection.bg_fill = egui::Color32::from_rgb(255, 150, 40);
    visuals.selection.stroke.color = egui::Color32::WHITE;
    visuals.window_rounding = egui::Rounding::same(14.0);
    for widget in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = egui::Rounding::same(12.0);
    }
    visuals.popup_shadow = egui::Shadow {
        offset: egui::vec2(0.0, 6.0),
        blur: 20.0,
        spread: 0.0,
        color: egui::Color32::from_rgba_premultiplied(0, 0, 0, 100),
    };

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(14.0, 10.0);
    style.spacing.interact_size.y = 32.0;
    style.interaction.selectable_labels = false;

    ctx.set_style(style);
}
