//! Text entity.

use super::EntityId;
use crate::theme::InkColor;
use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use uuid::Uuid;

/// Horizontal text alignment relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Font family options, mapped to generic families by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontFamily {
    #[default]
    SansSerif,
    Serif,
    Monospace,
}

impl FontFamily {
    /// Display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            FontFamily::SansSerif => "Sans",
            FontFamily::Serif => "Serif",
            FontFamily::Monospace => "Mono",
        }
    }
}

/// Approximate advance per character as a fraction of the font size.
/// Used for hit-testing; the renderer measures real glyph runs.
const APPROX_CHAR_WIDTH: f64 = 0.6;
/// Line height as a fraction of the font size.
pub const LINE_HEIGHT: f64 = 1.2;

/// A multi-line text block anchored at a world point.
#[derive(Debug, Clone)]
pub struct TextEntity {
    pub(crate) id: EntityId,
    /// Anchor in world coordinates; the top of the first line. Alignment
    /// decides whether lines start at, center on, or end at the anchor x.
    pub anchor: Point,
    /// Text content; lines separated by '\n'.
    pub content: String,
    /// Font size in world units.
    pub size: f64,
    pub align: TextAlign,
    pub font: FontFamily,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    /// Explicit fill or theme-bound.
    pub fill: InkColor,
    /// Optional highlight rectangle behind the glyphs.
    pub highlight: Option<Color>,
}

impl TextEntity {
    /// Create a plain text entity with default styling.
    pub fn new(anchor: Point, content: String, size: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            anchor,
            content,
            size,
            align: TextAlign::default(),
            font: FontFamily::default(),
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            fill: InkColor::ThemeBound,
            highlight: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Width of the widest line, estimated from character count.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        max_line_len as f64 * self.size * APPROX_CHAR_WIDTH
    }

    /// Total height from the line count.
    fn approximate_height(&self) -> f64 {
        self.content.lines().count().max(1) as f64 * self.size * LINE_HEIGHT
    }

    /// Approximate bounding box, adjusted for alignment: a centered block
    /// extends half its width to each side of the anchor, a right-aligned
    /// block entirely to the left.
    pub fn bounds(&self) -> Rect {
        let width = self.approximate_width();
        let height = self.approximate_height();
        let (min_x, max_x) = match self.align {
            TextAlign::Left => (self.anchor.x, self.anchor.x + width),
            TextAlign::Center => (self.anchor.x - width / 2.0, self.anchor.x + width / 2.0),
            TextAlign::Right => (self.anchor.x - width, self.anchor.x),
        };
        Rect::new(min_x, self.anchor.y, max_x, self.anchor.y + height)
    }

    /// True if the world point falls inside the approximate bounds.
    pub fn hit_test(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    /// Move the anchor by a world-space delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.anchor += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_left_aligned() {
        let text = TextEntity::new(Point::new(100.0, 100.0), "Hello".to_string(), 32.0);
        let bounds = text.bounds();
        assert!((bounds.x0 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - (100.0 + 5.0 * 32.0 * 0.6)).abs() < 1e-9);
        assert!((bounds.height() - 32.0 * LINE_HEIGHT).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_center_aligned() {
        let mut text = TextEntity::new(Point::new(0.0, 0.0), "ab".to_string(), 10.0);
        text.align = TextAlign::Center;
        let bounds = text.bounds();
        assert!((bounds.x0 + bounds.x1).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_right_aligned() {
        let mut text = TextEntity::new(Point::new(50.0, 0.0), "ab".to_string(), 10.0);
        text.align = TextAlign::Right;
        let bounds = text.bounds();
        assert!((bounds.x1 - 50.0).abs() < 1e-9);
        assert!(bounds.x0 < 50.0);
    }

    #[test]
    fn test_multiline_height_uses_widest_line() {
        let text = TextEntity::new(Point::ZERO, "a\nlonger line\nb".to_string(), 20.0);
        let bounds = text.bounds();
        assert!((bounds.height() - 3.0 * 20.0 * LINE_HEIGHT).abs() < 1e-9);
        assert!((bounds.width() - 11.0 * 20.0 * 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test() {
        let text = TextEntity::new(Point::new(100.0, 100.0), "Hello World".to_string(), 32.0);
        let bounds = text.bounds();
        assert!(text.hit_test(bounds.center()));
        assert!(!text.hit_test(Point::new(0.0, 0.0)));
    }
}
