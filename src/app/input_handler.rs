use super::render_helper::CanvasView;
use crate::PainterApp;
use crate::utils::vector::Vec2;
use eframe::egui;

fn to_vec2(pos: egui::Pos2) -> Vec2 {
    Vec2::new(pos.x, pos.y)
}

/// Feed this frame's egui events into the session.
///
/// Middle-drag, or primary-drag while space is held, pans. A two-finger touch pinches.
/// Presses only start a gesture over the canvas area; releases always end it.
pub fn handle_input(app: &mut PainterApp, ctx: &egui::Context, view: &CanvasView) {
    if let Some(touch) = ctx.multi_touch() {
        app.session.pointer_up();
        let delta = touch.translation_delta;
        app.session.pinch(touch.zoom_delta, Vec2::new(delta.x, delta.y));
        ctx.request_repaint();
        return;
    }

    let (events, space_down, fit_pressed) = ctx.input(|i| {
        (
            i.events.clone(),
            i.key_down(egui::Key::Space),
            i.modifiers.command && i.key_pressed(egui::Key::Num0),
        )
    });
    if fit_pressed {
        app.session.fit_view();
    }

    let hovered = view.response.hovered();
    for event in events {
        match event {
            egui::Event::PointerButton {
                pos,
                button,
                pressed: true,
                ..
            } => {
                if !hovered || app.session.is_gesture_active() {
                    continue;
                }
                let pan = button == egui::PointerButton::Middle
                    || (button == egui::PointerButton::Primary && space_down);
                if pan || button == egui::PointerButton::Primary {
                    app.session.pointer_down(to_vec2(pos), view.rect, pan);
                }
            }
            egui::Event::PointerButton { pressed: false, .. } | egui::Event::PointerGone => {
                app.session.pointer_up();
            }
            egui::Event::PointerMoved(pos) => {
                if app.session.is_gesture_active() {
                    app.session.pointer_move(to_vec2(pos), view.rect);
                }
            }
            egui::Event::MouseWheel { delta, .. } if hovered && delta.y != 0.0 => {
                app.session.zoom_wheel(delta.y.signum());
            }
            _ => {}
        }
    }
}
