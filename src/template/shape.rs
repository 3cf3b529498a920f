//! Drawing primitives that make up a template layer.
//!
//! Geometry flattens to polylines in logical canvas coordinates (y down). Angles are
//! radians, increasing clockwise on screen.
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::utils::{color::Color, vector::Vec2};

const CURVE_STEPS: usize = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Ellipse {
        center: Vec2,
        rx: f32,
        ry: f32,
        #[serde(default)]
        rotation: f32,
    },
    /// Clockwise sweep from `start` to `end`. A sweep of a full turn is a circle.
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        /// Join the end back to the start when stroking.
        #[serde(default)]
        close: bool,
    },
    Path {
        commands: Vec<PathCmd>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCmd {
    MoveTo { to: Vec2 },
    LineTo { to: Vec2 },
    QuadTo { ctrl: Vec2, to: Vec2 },
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
    Close,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Paint {
    Fill { color: Color },
    Stroke { color: Color, width: f32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub geometry: Geometry,
    pub paint: Paint,
}

impl Shape {
    pub fn fill(geometry: Geometry, color: Color) -> Self {
        Self {
            geometry,
            paint: Paint::Fill { color },
        }
    }

    pub fn stroke(geometry: Geometry, color: Color, width: f32) -> Self {
        Self {
            geometry,
            paint: Paint::Stroke { color, width },
        }
    }
}

/// Flattened subpath. Fills treat every polyline as closed regardless of `closed`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

impl Polyline {
    /// Consecutive point pairs, including the closing edge when `closed`.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let closing = match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(&first), Some(&last)) if self.points.len() > 1 => Some((last, first)),
            _ => None,
        };
        self.points.windows(2).map(|w| (w[0], w[1])).chain(closing)
    }
}

impl Geometry {
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Geometry::Rect { x, y, width, height }
    }

    pub fn circle(center: Vec2, radius: f32) -> Self {
        Geometry::Arc {
            center,
            radius,
            start: 0.0,
            end: TAU,
            close: false,
        }
    }

    pub fn ellipse(center: Vec2, rx: f32, ry: f32, rotation: f32) -> Self {
        Geometry::Ellipse { center, rx, ry, rotation }
    }

    pub fn flatten(&self) -> Vec<Polyline> {
        match *self {
            Geometry::Rect { x, y, width, height } => vec![Polyline {
                points: vec![
                    Vec2::new(x, y),
                    Vec2::new(x + width, y),
                    Vec2::new(x + width, y + height),
                    Vec2::new(x, y + height),
                ],
                closed: true,
            }],
            Geometry::Ellipse { center, rx, ry, rotation } => {
                let n = round_steps(rx.max(ry));
                let points = (0..n)
                    .map(|i| {
                        let t = i as f32 / n as f32 * TAU;
                        center + Vec2::new(rx * t.cos(), ry * t.sin()).rotated(rotation)
                    })
                    .collect();
                vec![Polyline { points, closed: true }]
            }
            Geometry::Arc {
                center,
                radius,
                start,
                end,
                close,
            } => {
                let raw = end - start;
                let full = raw >= TAU;
                let sweep = if full { TAU } else { raw.rem_euclid(TAU) };
                let n = ((round_steps(radius) as f32 * sweep / TAU).ceil() as usize).max(2);
                let count = if full { n } else { n + 1 };
                let points = (0..count)
                    .map(|i| {
                        let t = start + sweep * i as f32 / n as f32;
                        center + Vec2::new(t.cos(), t.sin()) * radius
                    })
                    .collect();
                vec![Polyline {
                    points,
                    closed: full || close,
                }]
            }
            Geometry::Path { ref commands } => flatten_path(commands),
        }
    }
}

fn round_steps(radius: f32) -> usize {
    ((radius * 0.75).ceil() as usize).clamp(24, 256)
}

fn flatten_path(commands: &[PathCmd]) -> Vec<Polyline> {
    let mut out = Vec::new();
    let mut current = Polyline::default();
    let mut pen = Vec2::ZERO;

    for cmd in commands {
        match *cmd {
            PathCmd::MoveTo { to } => {
                if current.points.len() > 1 {
                    out.push(std::mem::take(&mut current));
                }
                current.points.clear();
                current.points.push(to);
                pen = to;
            }
            PathCmd::LineTo { to } => {
                if current.points.is_empty() {
                    current.points.push(pen);
                }
                current.points.push(to);
                pen = to;
            }
            PathCmd::QuadTo { ctrl, to } => {
                if current.points.is_empty() {
                    current.points.push(pen);
                }
                let from = pen;
                for i in 1..=CURVE_STEPS {
                    let t = i as f32 / CURVE_STEPS as f32;
                    let u = 1.0 - t;
                    current.points.push(from * (u * u) + ctrl * (2.0 * u * t) + to * (t * t));
                }
                pen = to;
            }
            PathCmd::CubicTo { ctrl1, ctrl2, to } => {
                if current.points.is_empty() {
                    current.points.push(pen);
                }
                let from = pen;
                for i in 1..=CURVE_STEPS {
                    let t = i as f32 / CURVE_STEPS as f32;
                    let u = 1.0 - t;
                    current.points.push(
                        from * (u * u * u) + ctrl1 * (3.0 * u * u * t) + ctrl2 * (3.0 * u * t * t) + to * (t * t * t),
                    );
                }
                pen = to;
            }
            PathCmd::Close => {
                if let Some(&first) = current.points.first() {
                    current.closed = true;
                    pen = first;
                    out.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if current.points.len() > 1 {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_is_closed_square() {
        let lines = Geometry::rect(0.0, 0.0, 10.0, 5.0).flatten();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].segments().count(), 4);
    }

    #[test]
    fn reversed_half_arc_goes_over_the_top() {
        // PI -> 0 sweeps clockwise through 3PI/2, the top of the circle on screen.
        let lines = Geometry::Arc {
            center: Vec2::new(0.0, 0.0),
            radius: 10.0,
            start: std::f32::consts::PI,
            end: 0.0,
            close: false,
        }
        .flatten();
        let min_y = lines[0].points.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert!((min_y + 10.0).abs() < 0.1);
        assert!(!lines[0].closed);
    }

    #[test]
    fn path_splits_on_move_and_honours_close() {
        let cmds = vec![
            PathCmd::MoveTo { to: Vec2::new(0.0, 0.0) },
            PathCmd::LineTo { to: Vec2::new(5.0, 0.0) },
            PathCmd::MoveTo { to: Vec2::new(0.0, 5.0) },
            PathCmd::LineTo { to: Vec2::new(5.0, 5.0) },
            PathCmd::LineTo { to: Vec2::new(5.0, 9.0) },
            PathCmd::Close,
        ];
        let lines = Geometry::Path { commands: cmds }.flatten();
        assert_eq!(lines.len(), 2);
        assert!(!lines[0].closed);
        assert!(lines[1].closed);
        assert_eq!(lines[1].segments().count(), 3);
    }

    #[test]
    fn curves_end_on_their_target() {
        let lines = Geometry::Path {
            commands: vec![
                PathCmd::MoveTo { to: Vec2::new(0.0, 0.0) },
                PathCmd::CubicTo {
                    ctrl1: Vec2::new(10.0, 40.0),
                    ctrl2: Vec2::new(30.0, -40.0),
                    to: Vec2::new(40.0, 0.0),
                },
            ],
        }
        .flatten();
        let last = *lines[0].points.last().unwrap();
        assert!((last.x - 40.0).abs() < 1e-3 && last.y.abs() < 1e-3);
    }

    #[test]
    fn shapes_round_trip_through_json() {
        let shape = Shape::stroke(Geometry::circle(Vec2::new(1.0, 2.0), 3.0), Color::BLACK, 4.0);
        let json = serde_json::to_string(&shape).unwrap();
        assert!(json.contains("\"kind\":\"arc\""));
        assert_eq!(serde_json::from_str::<Shape>(&json).unwrap(), shape);
    }
}
