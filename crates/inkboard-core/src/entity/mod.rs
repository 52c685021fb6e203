//! Scene entity definitions.
//!
//! The scene is a flat ordered list of these variants; list order is draw
//! order (later = on top). Rendering and hit-testing dispatch on the variant.

mod image;
mod stroke;
mod text;

pub use image::{Corner, ImageEntity, MIN_IMAGE_SIZE};
pub use stroke::{Stroke, StrokePoint, DEFAULT_PRESSURE};
pub use text::{FontFamily, TextAlign, TextEntity, LINE_HEIGHT};

use kurbo::{Point, Rect};
use uuid::Uuid;

/// Unique identifier for entities.
pub type EntityId = Uuid;

/// Distance from a point to a line segment (a -> b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    if points.len() == 1 {
        let dx = point.x - points[0].x;
        let dy = point.y - points[0].y;
        return (dx * dx + dy * dy).sqrt();
    }
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// A drawable scene member.
#[derive(Debug, Clone)]
pub enum Entity {
    Stroke(Stroke),
    Image(ImageEntity),
    Text(TextEntity),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Stroke(s) => s.id,
            Entity::Image(i) => i.id,
            Entity::Text(t) => t.id,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Entity::Stroke(s) => s.bounds(),
            Entity::Image(i) => i.rect(),
            Entity::Text(t) => t.bounds(),
        }
    }

    pub fn is_stroke(&self) -> bool {
        matches!(self, Entity::Stroke(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Entity::Image(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Entity::Text(_))
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            Entity::Stroke(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_stroke_mut(&mut self) -> Option<&mut Stroke> {
        match self {
            Entity::Stroke(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageEntity> {
        match self {
            Entity::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageEntity> {
        match self {
            Entity::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextEntity> {
        match self {
            Entity::Text(t) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_to_segment_dist() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < f64::EPSILON);
        // Beyond the segment end, distance is to the endpoint.
        assert!((point_to_segment_dist(Point::new(14.0, 3.0), a, b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_point_to_degenerate_segment() {
        let p = Point::new(3.0, 4.0);
        let dist = point_to_segment_dist(p, Point::ZERO, Point::ZERO);
        assert!((dist - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_point_to_polyline_dist() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        let d = point_to_polyline_dist(Point::new(12.0, 5.0), &pts);
        assert!((d - 2.0).abs() < f64::EPSILON);
    }
}
