//! Draw List
//!
//! Engine-agnostic draw commands emitted by scenes each frame.
//! The renderer turns these into egui shapes; tests inspect them directly.

use glam::Vec2;

// ============================================================================
// Color
// ============================================================================

/// 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::from_rgb_hex(0xffffff);

    /// Builds an opaque color from `0xRRGGBB`.
    pub const fn from_rgb_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
            a: 255,
        }
    }

    /// Parses a CSS-style `#rrggbb` string.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_rgb_hex)
    }

    /// Linear-ish float components for the clear color.
    pub fn to_f64_rgba(self) -> [f64; 4] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        ]
    }
}

// ============================================================================
// Commands
// ============================================================================

/// A single thing to draw, in game-space pixels (origin top-left).
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Texture drawn centered on `center`, optionally multiplied by `tint`.
    Image {
        texture: &'static str,
        center: Vec2,
        size: Vec2,
        tint: Option<Color>,
    },
    /// Text anchored at its top-left corner.
    Text {
        text: String,
        position: Vec2,
        size_px: f32,
        color: Color,
    },
}

/// Ordered list of draw commands for one frame. Later commands paint on top.
#[derive(Default, Debug)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&mut self, texture: &'static str, center: Vec2, size: Vec2, tint: Option<Color>) {
        self.commands.push(DrawCommand::Image {
            texture,
            center,
            size,
            tint,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, position: Vec2, size_px: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            position,
            size_px,
            color,
        });
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    /// Text of every label, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                DrawCommand::Image { .. } => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_css_hex() {
        assert_eq!(
            Color::parse_hex("#000033"),
            Some(Color { r: 0, g: 0, b: 0x33, a: 255 })
        );
        assert_eq!(Color::parse_hex("#FBFBAC"), Some(Color::from_rgb_hex(0xfbfbac)));
        assert_eq!(Color::parse_hex("000033"), None);
        assert_eq!(Color::parse_hex("#0033"), None);
        assert_eq!(Color::parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn rejects_signed_hex() {
        assert_eq!(Color::parse_hex("#+fffff"), None);
        assert_eq!(Color::parse_hex("#-00001"), None);
        assert_eq!(Color::parse_hex("# 00001"), None);
    }

    #[test]
    fn texts_skip_images() {
        let mut list = DrawList::new();
        list.text("a", Vec2::ZERO, 12.0, Color::WHITE);
        list.image("star", Vec2::ZERO, Vec2::ONE, None);
        list.text("b", Vec2::ZERO, 12.0, Color::WHITE);
        assert_eq!(list.texts(), vec!["a", "b"]);
        assert_eq!(list.len(), 3);
    }
}
