use eframe::egui::Color32;
use image::Rgba;

use crate::error::PainterError;

/// Straight (non-premultiplied) 8-bit sRGB color, the unit every buffer stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Construct from 0-255 channel values.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 0-255 channel values.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Parse `#rrggbb` (or `#rrggbbaa`). The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self, PainterError> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || PainterError::InvalidColor(hex.to_string());
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Lowercase `#rrggbb`; alpha is dropped, matching what the eyedropper reports.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// True when every channel (alpha included) differs by at most `tolerance`.
    pub fn within_tolerance(&self, other: Color, tolerance: u8) -> bool {
        self.r.abs_diff(other.r) <= tolerance
            && self.g.abs_diff(other.g) <= tolerance
            && self.b.abs_diff(other.b) <= tolerance
            && self.a.abs_diff(other.a) <= tolerance
    }

    /// Per-channel rounded average, used by the palette "mix" mode. Result is opaque.
    pub fn mix(&self, other: Color) -> Color {
        let avg = |a: u8, b: u8| ((a as u16 + b as u16 + 1) / 2) as u8;
        Color::rgb(avg(self.r, other.r), avg(self.g, other.g), avg(self.b, other.b))
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_rgba(&self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }

    pub fn from_rgba(px: &Rgba<u8>) -> Self {
        let [r, g, b, a] = px.0;
        Self::rgba(r, g, b, a)
    }

    /// Convert to egui's 8-bit color format.
    pub fn to_color32(&self) -> Color32 {
        Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }

    /// Convert from egui's 8-bit color format.
    pub fn from_color32(c: Color32) -> Self {
        let [r, g, b, a] = c.to_srgba_unmultiplied();
        Self::rgba(r, g, b, a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = PainterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.a == 255 {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_str(&format!("{}{:02x}", self.to_hex(), self.a))
        }
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Source-over for straight alpha, `coverage` in 0..=1 scales the source alpha.
pub fn source_over(src: Color, dst: Color, coverage: f32) -> Color {
    let sa = src.a as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = dst.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Color::TRANSPARENT;
    }
    let blend = |s: u8, d: u8| {
        let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Color::rgba(
        blend(src.r, dst.r),
        blend(src.g, dst.g),
        blend(src.b, dst.b),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}

/// Source-atop: recolor toward `src` by `coverage * src.a`, leaving alpha untouched.
pub fn source_atop(src: Color, dst: Color, coverage: f32) -> Color {
    if dst.a == 0 {
        return dst;
    }
    let t = src.a as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    let lerp = |s: u8, d: u8| (d as f32 + (s as f32 - d as f32) * t).round().clamp(0.0, 255.0) as u8;
    Color::rgba(lerp(src.r, dst.r), lerp(src.g, dst.g), lerp(src.b, dst.b), dst.a)
}

/// Destination-out: alpha shrinks by `coverage`, color channels are kept.
pub fn destination_out(dst: Color, coverage: f32) -> Color {
    let keep = 1.0 - coverage.clamp(0.0, 1.0);
    let a = (dst.a as f32 * keep).floor().clamp(0.0, 255.0) as u8;
    Color { a, ..dst }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parse_and_format() {
        let c = Color::from_hex("#FF8000").unwrap();
        assert_eq!(c, Color::rgb(255, 128, 0));
        assert_eq!(c.to_hex(), "#ff8000");
        assert_eq!(Color::from_hex("00ff0080").unwrap().a, 0x80);
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
    }

    #[test]
    fn mix_averages_channels() {
        let mixed = Color::rgb(255, 0, 0).mix(Color::rgb(0, 0, 255));
        assert_eq!(mixed, Color::rgb(128, 0, 128));
    }

    #[test]
    fn tolerance_is_inclusive_per_channel() {
        let a = Color::rgb(100, 100, 100);
        assert!(a.within_tolerance(Color::rgb(130, 70, 100), 30));
        assert!(!a.within_tolerance(Color::rgb(131, 100, 100), 30));
        assert!(!a.within_tolerance(a.with_alpha(200), 30));
    }

    #[test]
    fn opaque_source_over_replaces() {
        let out = source_over(Color::rgb(10, 20, 30), Color::rgba(200, 200, 200, 50), 1.0);
        assert_eq!(out, Color::rgb(10, 20, 30));
    }

    #[test]
    fn atop_keeps_alpha_and_skips_transparent() {
        let dst = Color::rgba(255, 255, 255, 90);
        let out = source_atop(Color::rgb(0, 0, 0), dst, 1.0);
        assert_eq!(out, Color::rgba(0, 0, 0, 90));
        assert_eq!(source_atop(Color::BLACK, Color::TRANSPARENT, 1.0), Color::TRANSPARENT);
    }

    #[test]
    fn destination_out_never_raises_alpha() {
        let dst = Color::rgba(1, 2, 3, 200);
        assert_eq!(destination_out(dst, 1.0).a, 0);
        assert!(destination_out(dst, 0.3).a <= 200);
        assert_eq!(destination_out(dst, 0.0).a, 200);
    }
}
