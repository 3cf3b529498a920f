use crate::canvas::{LayerId, LayerStack, compositor::BACKGROUND};
use crate::utils::{color::Color, vector::Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleSource {
    Layer(LayerId),
    Background,
}

/// Result of an eyedropper lookup. The color is always opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sample {
    pub color: Color,
    pub source: SampleSource,
}

impl Sample {
    pub fn is_background(&self) -> bool {
        self.source == SampleSource::Background
    }
}

/// Topmost visible layer with any alpha at `point` wins; otherwise the canvas background.
/// Hidden layers are skipped, locked ones are not.
pub fn sample(stack: &LayerStack, point: Vec2) -> Sample {
    let (x, y) = (point.x.floor() as i64, point.y.floor() as i64);
    stack
        .descending()
        .into_iter()
        .filter(|layer| layer.is_visible())
        .find_map(|layer| {
            let px = layer.pixel(x, y);
            (px.a > 0).then(|| Sample {
                color: px.with_alpha(255),
                source: SampleSource::Layer(layer.id()),
            })
        })
        .unwrap_or(Sample {
            color: BACKGROUND,
            source: SampleSource::Background,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::stack::NewLayer;
    use crate::utils::color::Color;
    use image::{Rgba, RgbaImage};

    fn solid(stack: &mut LayerStack, name: &str, z: i32, rgba: [u8; 4]) -> LayerId {
        let id = stack.push_layer(NewLayer {
            name: name.into(),
            icon: None,
            z_index: z,
            locked: false,
            lock_alpha: false,
        });
        stack.replace_pixels(id, RgbaImage::from_pixel(800, 600, Rgba(rgba)));
        id
    }

    #[test]
    fn topmost_visible_layer_wins() {
        let mut stack = LayerStack::new();
        solid(&mut stack, "blue", 0, [0, 0, 255, 255]);
        let green = solid(&mut stack, "green", 1, [0, 255, 0, 255]);
        let s = sample(&stack, Vec2::new(10.0, 10.0));
        assert_eq!(s.source, SampleSource::Layer(green));
        assert_eq!(s.color.to_hex(), "#00ff00");

        stack.toggle_visibility(green);
        assert_eq!(sample(&stack, Vec2::new(10.0, 10.0)).color, Color::rgb(0, 0, 255));
    }

    #[test]
    fn translucent_pixels_report_opaque_rgb() {
        let mut stack = LayerStack::new();
        solid(&mut stack, "wash", 0, [10, 20, 30, 1]);
        assert_eq!(sample(&stack, Vec2::new(1.0, 1.0)).color, Color::rgb(10, 20, 30));
    }

    #[test]
    fn empty_or_outside_is_background() {
        let mut stack = LayerStack::new();
        assert!(sample(&stack, Vec2::new(5.0, 5.0)).is_background());
        solid(&mut stack, "red", 0, [255, 0, 0, 255]);
        let s = sample(&stack, Vec2::new(900.0, 5.0));
        assert!(s.is_background());
        assert_eq!(s.color, Color::WHITE);
    }
}
