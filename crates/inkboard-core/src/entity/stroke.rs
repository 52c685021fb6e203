//! Freehand path stroke entity.

use super::{point_to_polyline_dist, EntityId};
use crate::theme::InkColor;
use crate::tools::ToolKind;
use kurbo::{BezPath, Point, Rect};
use uuid::Uuid;

/// Pressure reported when the input device does not provide one.
pub const DEFAULT_PRESSURE: f64 = 0.5;

/// One sample of a freehand path: a world-space position plus normalized
/// pen pressure in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePoint {
    pub pos: Point,
    pub pressure: f64,
}

/// A freehand path with uniform style.
///
/// Points are append-only while the stroke is being drawn; the style is fixed
/// at creation time. Line cap and join are always round.
#[derive(Debug, Clone)]
pub struct Stroke {
    pub(crate) id: EntityId,
    /// Path samples in world coordinates.
    pub points: Vec<StrokePoint>,
    /// Brush kind this stroke was drawn with.
    pub kind: ToolKind,
    /// Rendered line width in world units (tool size x kind multiplier,
    /// floor-clamped per kind).
    pub width: f64,
    /// Explicit color or theme-bound.
    pub color: InkColor,
    /// Stroke opacity.
    pub alpha: f64,
    /// True for pixel-eraser strokes, rendered with destination-out
    /// compositing on the ink layer.
    pub erase: bool,
}

impl Stroke {
    /// Create an empty stroke with the given style.
    pub fn new(kind: ToolKind, width: f64, color: InkColor, alpha: f64, erase: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            kind,
            width,
            color,
            alpha,
            erase,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Append a path sample.
    pub fn add_point(&mut self, pos: Point, pressure: f64) {
        self.points.push(StrokePoint { pos, pressure });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of the path, inflated by half the line width.
    pub fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for p in &self.points {
            min_x = min_x.min(p.pos.x);
            min_y = min_y.min(p.pos.y);
            max_x = max_x.max(p.pos.x);
            max_y = max_y.max(p.pos.y);
        }
        Rect::new(min_x, min_y, max_x, max_y).inflate(self.width / 2.0, self.width / 2.0)
    }

    /// True if the world point passes within `radius` of the path,
    /// accounting for the stroke's own width.
    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        if self.points.is_empty() {
            return false;
        }
        let positions: Vec<Point> = self.points.iter().map(|p| p.pos).collect();
        point_to_polyline_dist(point, &positions) <= radius + self.width / 2.0
    }

    /// The path as a polyline for rendering.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some(first) = self.points.first() {
            path.move_to(first.pos);
            for p in self.points.iter().skip(1) {
                path.line_to(p.pos);
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pen_stroke() -> Stroke {
        Stroke::new(ToolKind::Pen, 2.0, InkColor::ThemeBound, 1.0, false)
    }

    #[test]
    fn test_new_stroke_is_empty() {
        let stroke = pen_stroke();
        assert!(stroke.is_empty());
        assert_eq!(stroke.bounds(), Rect::ZERO);
    }

    #[test]
    fn test_add_points() {
        let mut stroke = pen_stroke();
        stroke.add_point(Point::new(0.0, 0.0), 0.5);
        stroke.add_point(Point::new(10.0, 10.0), 0.8);
        assert_eq!(stroke.len(), 2);
        assert!((stroke.points[1].pressure - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds_include_width() {
        let mut stroke = pen_stroke();
        stroke.add_point(Point::new(0.0, 0.0), 0.5);
        stroke.add_point(Point::new(100.0, 50.0), 0.5);
        let bounds = stroke.bounds();
        assert!((bounds.x0 + 1.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 101.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_along_path() {
        let mut stroke = pen_stroke();
        stroke.add_point(Point::new(0.0, 0.0), 0.5);
        stroke.add_point(Point::new(100.0, 0.0), 0.5);
        assert!(stroke.hit_test(Point::new(50.0, 0.0), 5.0));
        assert!(stroke.hit_test(Point::new(50.0, 5.5), 5.0));
        assert!(!stroke.hit_test(Point::new(50.0, 20.0), 5.0));
    }

    #[test]
    fn test_hit_test_single_point() {
        let mut stroke = pen_stroke();
        stroke.add_point(Point::new(10.0, 10.0), 0.5);
        assert!(stroke.hit_test(Point::new(12.0, 10.0), 3.0));
        assert!(!stroke.hit_test(Point::new(30.0, 10.0), 3.0));
    }

    #[test]
    fn test_to_path_element_count() {
        let mut stroke = pen_stroke();
        for i in 0..5 {
            stroke.add_point(Point::new(i as f64, 0.0), 0.5);
        }
        assert_eq!(stroke.to_path().elements().len(), 5);
    }
}
