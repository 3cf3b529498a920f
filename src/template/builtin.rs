//! Templates shipped with the app. Every drawing is laid out around the canvas center
//! with white fillable shapes and a locked black "Outlines" layer on top.
use std::f32::consts::PI;

use super::shape::{Geometry, PathCmd, Shape};
use super::{Template, TemplateLayer};
use crate::utils::{color::Color, vector::Vec2};

pub const OUTLINES: &str = "Outlines";
pub const OUTLINES_Z: i32 = 999;

const CX: f32 = 400.0;
const CY: f32 = 300.0;

pub fn all() -> Vec<Template> {
    vec![flower(), kitty_face(), robot(), pizza(), butterfly(), burger()]
}

fn at(dx: f32, dy: f32) -> Vec2 {
    Vec2::new(CX + dx, CY + dy)
}

fn rect(dx: f32, dy: f32, w: f32, h: f32) -> Geometry {
    Geometry::rect(CX + dx, CY + dy, w, h)
}

fn circle(dx: f32, dy: f32, r: f32) -> Geometry {
    Geometry::circle(at(dx, dy), r)
}

fn ellipse(dx: f32, dy: f32, rx: f32, ry: f32, rotation: f32) -> Geometry {
    Geometry::ellipse(at(dx, dy), rx, ry, rotation)
}

fn path(commands: Vec<PathCmd>) -> Geometry {
    Geometry::Path { commands }
}

fn m(dx: f32, dy: f32) -> PathCmd {
    PathCmd::MoveTo { to: at(dx, dy) }
}

fn l(dx: f32, dy: f32) -> PathCmd {
    PathCmd::LineTo { to: at(dx, dy) }
}

fn q(cx: f32, cy: f32, dx: f32, dy: f32) -> PathCmd {
    PathCmd::QuadTo {
        ctrl: at(cx, cy),
        to: at(dx, dy),
    }
}

fn c(c1: (f32, f32), c2: (f32, f32), to: (f32, f32)) -> PathCmd {
    PathCmd::CubicTo {
        ctrl1: at(c1.0, c1.1),
        ctrl2: at(c2.0, c2.1),
        to: at(to.0, to.1),
    }
}

fn fillable(name: &str, icon: &str, geometry: Vec<Geometry>) -> TemplateLayer {
    let shapes = geometry.into_iter().map(|g| Shape::fill(g, Color::WHITE)).collect();
    TemplateLayer::new(name, Some(icon), shapes)
}

fn outlines(width: f32, geometry: Vec<Geometry>) -> TemplateLayer {
    TemplateLayer {
        locked: true,
        lock_alpha: false,
        z_index: Some(OUTLINES_Z),
        ..TemplateLayer::new(
            OUTLINES,
            Some("✏️"),
            geometry.into_iter().map(|g| Shape::stroke(g, Color::BLACK, width)).collect(),
        )
    }
}

fn template(id: &str, name: &str, icon: &str, layers: Vec<TemplateLayer>) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        icon: Some(icon.to_string()),
        layers,
    }
}

pub fn flower() -> Template {
    let stem = || {
        vec![
            rect(-15.0, 60.0, 30.0, 240.0),
            ellipse(40.0, 150.0, 40.0, 15.0, PI / 4.0),
            ellipse(-40.0, 180.0, 40.0, 15.0, -PI / 4.0),
        ]
    };
    let petals = || {
        (0..6)
            .map(|i| {
                let angle = (i as f32 * 60.0).to_radians();
                circle(angle.cos() * 110.0, angle.sin() * 110.0, 60.0)
            })
            .collect::<Vec<_>>()
    };
    let center = || circle(0.0, 0.0, 70.0);

    let mut lines = stem();
    lines.extend(petals());
    lines.push(center());

    template(
        "flower",
        "Big Flower",
        "🌻",
        vec![
            fillable("Stem", "🌿", stem()),
            fillable("Petals", "🌸", petals()),
            fillable("Center", "🟡", vec![center()]),
            outlines(4.0, lines),
        ],
    )
}

pub fn kitty_face() -> Template {
    let ears = || {
        vec![
            path(vec![m(-120.0, -80.0), l(-140.0, -180.0), l(-60.0, -140.0)]),
            path(vec![m(120.0, -80.0), l(140.0, -180.0), l(60.0, -140.0)]),
        ]
    };
    let face = || ellipse(0.0, -20.0, 140.0, 120.0, 0.0);
    let eyes = || vec![ellipse(-50.0, -40.0, 12.0, 20.0, 0.0), ellipse(50.0, -40.0, 12.0, 20.0, 0.0)];
    let nose = || path(vec![m(-15.0, 10.0), l(15.0, 10.0), l(0.0, 25.0), PathCmd::Close]);

    let mut lines = ears();
    lines.push(face());
    lines.extend(eyes());
    lines.push(nose());
    lines.push(path(vec![
        m(-80.0, 20.0),
        l(-180.0, 10.0),
        m(-80.0, 30.0),
        l(-180.0, 40.0),
        m(80.0, 20.0),
        l(180.0, 10.0),
        m(80.0, 30.0),
        l(180.0, 40.0),
    ]));
    lines.push(path(vec![m(0.0, 25.0), l(0.0, 50.0)]));
    for dx in [-15.0, 15.0] {
        lines.push(Geometry::Arc {
            center: at(dx, 50.0),
            radius: 15.0,
            start: 0.0,
            end: PI,
            close: false,
        });
    }

    template(
        "kitty_face",
        "Kitty Face",
        "🐱",
        vec![
            fillable("Ears", "👂", ears()),
            fillable("Face Base", "😺", vec![face()]),
            fillable("Eyes", "👀", eyes()),
            fillable("Mouth Area", "👄", vec![ellipse(0.0, 40.0, 40.0, 30.0, 0.0)]),
            fillable("Nose", "👃", vec![nose()]),
            outlines(5.0, lines),
        ],
    )
}

pub fn robot() -> Template {
    let body = || rect(-80.0, -20.0, 160.0, 180.0);
    let head = || rect(-70.0, -160.0, 140.0, 120.0);
    let screen = || rect(-50.0, -130.0, 100.0, 60.0);
    let arm_curve = |s: f32| c((120.0 * s, 60.0), (120.0 * s, 100.0), (80.0 * s, 140.0));
    let arm = |s: f32| {
        path(vec![
            m(80.0 * s, 20.0),
            arm_curve(s),
            l(60.0 * s, 140.0),
            c((100.0 * s, 100.0), (100.0 * s, 60.0), (80.0 * s, 40.0)),
        ])
    };
    let stick = |s: f32| path(vec![m(40.0 * s, -160.0), l(60.0 * s, -220.0), l(55.0 * s, -220.0), l(35.0 * s, -160.0)]);

    let mut lines = vec![
        head(),
        path(vec![m(-40.0, -160.0), l(-60.0, -220.0), m(40.0, -160.0), l(60.0, -220.0)]),
        circle(-60.0, -220.0, 8.0),
        circle(60.0, -220.0, 8.0),
        body(),
        path(vec![m(-80.0, 20.0), arm_curve(-1.0)]),
        path(vec![m(80.0, 20.0), arm_curve(1.0)]),
        screen(),
    ];
    lines.extend([-30.0, 0.0, 30.0].map(|dx| circle(dx, 40.0, 10.0)));

    template(
        "robot",
        "Robot",
        "🤖",
        vec![
            fillable("Body", "🤖", vec![body()]),
            fillable("Head", "🖥️", vec![head()]),
            fillable("Arms", "🦾", vec![arm(-1.0), arm(1.0)]),
            fillable(
                "Antennae",
                "📡",
                vec![circle(-60.0, -220.0, 8.0), circle(60.0, -220.0, 8.0), stick(-1.0), stick(1.0)],
            ),
            fillable("Screen", "📺", vec![screen()]),
            outlines(5.0, lines),
        ],
    )
}

pub fn pizza() -> Template {
    let slice = || path(vec![m(-100.0, -100.0), q(0.0, -160.0, 100.0, -100.0), l(0.0, 150.0), PathCmd::Close]);
    let pepperoni = || {
        vec![
            circle(-30.0, -60.0, 20.0),
            circle(40.0, -40.0, 22.0),
            circle(10.0, 50.0, 20.0),
            circle(-20.0, 10.0, 18.0),
        ]
    };

    let mut lines = vec![slice(), path(vec![m(-100.0, -100.0), q(0.0, -60.0, 100.0, -100.0)])];
    lines.extend(pepperoni());

    template(
        "pizza",
        "Pizza Slice",
        "🍕",
        vec![
            fillable("Crust", "🍕", vec![slice()]),
            fillable("Toppings", "🍄", pepperoni()),
            outlines(5.0, lines),
        ],
    )
}

pub fn butterfly() -> Template {
    let bottom_wing = |s: f32| {
        path(vec![
            m(10.0 * s, 30.0),
            c((60.0 * s, 40.0), (90.0 * s, 90.0), (50.0 * s, 130.0)),
            c((20.0 * s, 150.0), (10.0 * s, 100.0), (10.0 * s, 80.0)),
        ])
    };
    let top_wing = |s: f32| {
        path(vec![
            m(10.0 * s, 10.0),
            c((80.0 * s, -60.0), (140.0 * s, -60.0), (130.0 * s, 20.0)),
            c((120.0 * s, 80.0), (40.0 * s, 60.0), (10.0 * s, 30.0)),
        ])
    };
    let spots = || {
        vec![
            circle(-90.0, -10.0, 15.0),
            circle(90.0, -10.0, 15.0),
            circle(-50.0, 100.0, 10.0),
            circle(50.0, 100.0, 10.0),
        ]
    };
    let body = || vec![ellipse(0.0, 40.0, 12.0, 60.0, 0.0), circle(0.0, -30.0, 20.0)];
    let feeler = |s: f32| vec![m(10.0 * s, -40.0), q(30.0 * s, -80.0, 50.0 * s, -80.0)];
    let antenna = |s: f32| {
        let mut cmds = feeler(s);
        cmds.push(l(55.0 * s, -75.0));
        cmds.push(q(35.0 * s, -75.0, 15.0 * s, -35.0));
        path(cmds)
    };

    let mut lines = vec![top_wing(-1.0), top_wing(1.0), bottom_wing(-1.0), bottom_wing(1.0)];
    lines.extend(spots());
    lines.extend(body());
    lines.push(path(feeler(-1.0)));
    lines.push(path(feeler(1.0)));

    template(
        "butterfly",
        "Butterfly",
        "🦋",
        vec![
            fillable("Bottom Wings", "✨", vec![bottom_wing(-1.0), bottom_wing(1.0)]),
            fillable("Top Wings", "🦋", vec![top_wing(-1.0), top_wing(1.0)]),
            fillable("Wing Spots", "⚪", spots()),
            fillable("Body", "🐛", body()),
            fillable("Antennae", "📡", vec![antenna(-1.0), antenna(1.0)]),
            outlines(5.0, lines),
        ],
    )
}

pub fn burger() -> Template {
    let bottom = || rect(-100.0, 120.0, 200.0, 40.0);
    let patty = || rect(-110.0, 80.0, 220.0, 40.0);
    let cheese = || rect(-115.0, 60.0, 230.0, 20.0);
    let tomato = || rect(-100.0, 10.0, 200.0, 30.0);
    let lettuce = |closed: bool| {
        let mut cmds = vec![m(-120.0, 60.0)];
        for i in 0..10 {
            let x = -120.0 + i as f32 * 24.0;
            cmds.push(q(x + 12.0, 80.0, x + 24.0, 60.0));
        }
        cmds.push(l(120.0, 40.0));
        cmds.push(l(-120.0, 40.0));
        if closed {
            cmds.push(PathCmd::Close);
        }
        path(cmds)
    };
    let bun = |close: bool| Geometry::Arc {
        center: at(0.0, 10.0),
        radius: 110.0,
        start: PI,
        end: 0.0,
        close,
    };

    let mut lines = vec![bottom(), patty(), cheese(), lettuce(true), tomato(), bun(true)];
    lines.extend([(-40.0, -40.0, 0.5), (20.0, -60.0, -0.2), (60.0, -30.0, 0.8)].map(|(dx, dy, rot)| {
        ellipse(dx, dy, 5.0, 2.0, rot)
    }));

    template(
        "burger",
        "Giant Burger",
        "🍔",
        vec![
            fillable("Bottom Bun", "🍞", vec![bottom()]),
            fillable("Patty", "🥩", vec![patty()]),
            fillable(
                "Cheese",
                "🧀",
                vec![cheese(), rect(-80.0, 80.0, 20.0, 20.0), rect(40.0, 80.0, 20.0, 15.0)],
            ),
            fillable("Lettuce", "🥬", vec![lettuce(false)]),
            fillable("Tomato", "🍅", vec![tomato()]),
            fillable("Top Bun", "🥯", vec![bun(false)]),
            outlines(5.0, lines),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::OVERLAY_Z;

    #[test]
    fn every_builtin_has_a_locked_outline_on_top() {
        for t in all() {
            let last = t.layers.last().unwrap();
            assert_eq!(last.name, OUTLINES, "{}", t.id);
            assert!(last.locked && !last.lock_alpha);
            let top = t.z_index_of(t.layers.len() - 1);
            assert!(top >= OVERLAY_Z);
            assert!((0..t.layers.len() - 1).all(|i| t.z_index_of(i) < top));
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<String> = all().into_iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn flower_center_is_opaque_white() {
        let t = flower();
        let center = t.layers.iter().find(|l| l.name == "Center").unwrap().render();
        assert_eq!(center.get_pixel(400, 300).0, [255, 255, 255, 255]);
        assert_eq!(center.get_pixel(10, 10).0[3], 0);
    }

    #[test]
    fn builtins_survive_json() {
        let t = burger();
        assert_eq!(Template::from_json(&t.to_json().unwrap()).unwrap(), t);
    }
}
