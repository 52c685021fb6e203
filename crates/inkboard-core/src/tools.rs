//! Tool configuration: brush kinds, sizing/alpha policy, text defaults.
//!
//! This is pure data and policy. The gesture router and renderer consume it;
//! only the host toolbar UI mutates it.

use crate::entity::{FontFamily, Stroke, TextAlign};
use crate::theme::InkColor;
use kurbo::Point;
use peniko::Color;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolKind {
    Select,
    #[default]
    Pen,
    Marker,
    Highlighter,
    /// Pixel eraser: draws strokes composited with destination-out.
    Eraser,
    /// Stroke eraser: deletes whole strokes it scrubs over.
    StrokeEraser,
    Text,
}

impl ToolKind {
    /// True for tools that stream a path stroke while dragging.
    pub fn is_drawing(self) -> bool {
        matches!(
            self,
            ToolKind::Pen
                | ToolKind::Marker
                | ToolKind::Highlighter
                | ToolKind::Eraser
                | ToolKind::StrokeEraser
        )
    }

    /// True for either eraser variant.
    pub fn is_eraser(self) -> bool {
        matches!(self, ToolKind::Eraser | ToolKind::StrokeEraser)
    }

    /// Size multiplier applied to the user-chosen base size.
    pub fn size_multiplier(self) -> f64 {
        match self {
            ToolKind::Marker => 2.0,
            ToolKind::Highlighter | ToolKind::Eraser => 6.0,
            ToolKind::StrokeEraser => 4.0,
            _ => 1.0,
        }
    }

    /// Minimum rendered width for this kind, in world units.
    pub fn min_width(self) -> f64 {
        match self {
            ToolKind::Marker => 4.0,
            ToolKind::Highlighter => 10.0,
            ToolKind::Eraser => 8.0,
            ToolKind::StrokeEraser => 12.0,
            _ => 1.0,
        }
    }

    /// Stroke alpha for this kind. Highlighters are translucent.
    pub fn alpha(self) -> f64 {
        match self {
            ToolKind::Highlighter => 0.28,
            _ => 1.0,
        }
    }
}

/// Compute the rendered stroke width for a tool kind and base size.
pub fn stroke_width(kind: ToolKind, base_size: f64) -> f64 {
    (base_size * kind.size_multiplier()).max(kind.min_width())
}

/// Default base size for drawing tools.
pub const DEFAULT_BASE_SIZE: f64 = 2.0;
/// Default font size for new text entities.
pub const DEFAULT_TEXT_SIZE: f64 = 32.0;

/// Snapshot of the toolbar state, read per gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolConfig {
    /// Active tool.
    pub kind: ToolKind,
    /// Base stroke size before the kind multiplier.
    pub size: f64,
    /// Explicit brush color; None means theme-bound.
    pub color: Option<Color>,
    /// Font size for new text.
    pub text_size: f64,
    /// Alignment for new text.
    pub text_align: TextAlign,
    /// Font family for new text.
    pub text_font: FontFamily,
    pub text_bold: bool,
    pub text_italic: bool,
    pub text_underline: bool,
    pub text_strikethrough: bool,
    /// Explicit text fill color; None means theme-bound.
    pub text_color: Option<Color>,
    /// Optional highlight rectangle behind the glyphs.
    pub text_highlight: Option<Color>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            kind: ToolKind::Pen,
            size: DEFAULT_BASE_SIZE,
            color: None,
            text_size: DEFAULT_TEXT_SIZE,
            text_align: TextAlign::Left,
            text_font: FontFamily::SansSerif,
            text_bold: false,
            text_italic: false,
            text_underline: false,
            text_strikethrough: false,
            text_color: None,
            text_highlight: None,
        }
    }
}

impl ToolConfig {
    /// Seed a new stroke at a world point from the current tool settings.
    ///
    /// Erasers always draw theme-independent (the compositing mode does the
    /// work), so their color stays theme-bound.
    pub fn make_stroke(&self, world: Point, pressure: f64) -> Stroke {
        let is_eraser = self.kind == ToolKind::Eraser;
        let color = if is_eraser {
            InkColor::ThemeBound
        } else {
            self.color.into()
        };
        let mut stroke = Stroke::new(
            self.kind,
            stroke_width(self.kind, self.size),
            color,
            self.kind.alpha(),
            is_eraser,
        );
        stroke.add_point(world, pressure);
        stroke
    }

    /// World-space scrub radius for the stroke eraser.
    pub fn scrub_radius(&self) -> f64 {
        stroke_width(ToolKind::StrokeEraser, self.size) / 2.0
    }
}
