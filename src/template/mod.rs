//! Templates: pre-drawn, named layer sets a drawing starts from.
//!
//! A template is plain data. Each layer is a list of [`Shape`]s rendered once, at load
//! time, into that layer's pixel buffer.
pub mod builtin;
pub mod raster;
pub mod shape;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::error::{PainterError, Result};
pub use shape::{Geometry, Paint, PathCmd, Shape};

/// Layers at or above this z are overlays and never picked as the initial target.
pub const OVERLAY_Z: i32 = 900;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub layers: Vec<TemplateLayer>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateLayer {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub locked: bool,
    /// Defaults to the layer's position in the list.
    #[serde(default)]
    pub z_index: Option<i32>,
    #[serde(default = "default_lock_alpha")]
    pub lock_alpha: bool,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

fn default_lock_alpha() -> bool {
    true
}

impl TemplateLayer {
    pub fn new(name: &str, icon: Option<&str>, shapes: Vec<Shape>) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.map(str::to_string),
            locked: false,
            z_index: None,
            lock_alpha: true,
            shapes,
        }
    }

    /// Rasterize this layer's shapes into a fresh transparent canvas-sized buffer.
    pub fn render(&self) -> RgbaImage {
        let mut buffer = RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        for shape in &self.shapes {
            raster::draw_shape(&mut buffer, shape);
        }
        buffer
    }
}

impl Template {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| PainterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let template = Self::from_json(&text)?;
        log::info!("loaded template '{}' from {}", template.id, path.display());
        Ok(template)
    }

    pub fn z_index_of(&self, index: usize) -> i32 {
        self.layers
            .get(index)
            .and_then(|l| l.z_index)
            .unwrap_or(index as i32)
    }
}

/// The set of templates offered to the user, built-ins first.
#[derive(Clone, Debug)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
}

impl Default for TemplateLibrary {
    fn default() -> Self {
        Self {
            templates: builtin::all(),
        }
    }
}

impl TemplateLibrary {
    pub fn empty() -> Self {
        Self { templates: Vec::new() }
    }

    /// Add a template, replacing any existing one with the same id.
    pub fn insert(&mut self, template: Template) {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&Template> {
        self.get(id).ok_or_else(|| PainterError::UnknownTemplate(id.to_string()))
    }

    pub fn first(&self) -> Option<&Template> {
        self.templates.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_defaults_apply() {
        let t = Template::from_json(
            r##"{
                "id": "dot",
                "name": "Dot",
                "layers": [
                    {"name": "Fill", "shapes": [
                        {"geometry": {"kind": "arc", "center": {"x": 400, "y": 300}, "radius": 50, "start": 0, "end": 6.3},
                         "paint": {"type": "fill", "color": "#ffffff"}}
                    ]},
                    {"name": "Outlines", "locked": true, "lock_alpha": false, "z_index": 999}
                ]
            }"##,
        )
        .unwrap();
        assert!(t.layers[0].lock_alpha);
        assert!(!t.layers[0].locked);
        assert_eq!(t.z_index_of(0), 0);
        assert_eq!(t.z_index_of(1), 999);
        assert_eq!(t.layers[0].render().get_pixel(400, 300).0, [255, 255, 255, 255]);
    }

    #[test]
    fn bad_json_is_a_format_error() {
        assert!(matches!(Template::from_json("{"), Err(PainterError::TemplateFormat(_))));
    }

    #[test]
    fn library_lookup_and_replace() {
        let mut lib = TemplateLibrary::default();
        assert!(lib.require("nope").is_err());
        let before = lib.len();
        let mut flower = lib.require("flower").unwrap().clone();
        flower.name = "Daisy".into();
        lib.insert(flower);
        assert_eq!(lib.len(), before);
        assert_eq!(lib.get("flower").unwrap().name, "Daisy");
    }
}
