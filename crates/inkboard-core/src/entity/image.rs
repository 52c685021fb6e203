//! Raster image entity.

use super::EntityId;
use kurbo::{Point, Rect, Vec2};
use std::sync::Arc;
use uuid::Uuid;

/// Minimum image extent per axis in world units, enforced on every resize step.
pub const MIN_IMAGE_SIZE: f64 = 10.0;

/// Corner of an image's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// All four corners in overlay drawing order.
    pub fn all() -> [Corner; 4] {
        [
            Corner::TopLeft,
            Corner::TopRight,
            Corner::BottomRight,
            Corner::BottomLeft,
        ]
    }

    /// The corner's position on a rectangle.
    pub fn position(self, rect: Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(rect.x0, rect.y0),
            Corner::TopRight => Point::new(rect.x1, rect.y0),
            Corner::BottomLeft => Point::new(rect.x0, rect.y1),
            Corner::BottomRight => Point::new(rect.x1, rect.y1),
        }
    }
}

/// A raster image placed on the board.
///
/// The entity owns the encoded bytes (PNG/JPEG/WebP); decoding is deferred to
/// the renderer, which caches the decoded pixels by entity id and releases
/// them once the entity is gone.
#[derive(Debug, Clone)]
pub struct ImageEntity {
    pub(crate) id: EntityId,
    /// Top-left corner in world coordinates.
    pub position: Point,
    /// Display width in world units.
    pub width: f64,
    /// Display height in world units.
    pub height: f64,
    /// Source bitmap width in pixels.
    pub source_width: u32,
    /// Source bitmap height in pixels.
    pub source_height: u32,
    /// Encoded image bytes.
    pub data: Arc<Vec<u8>>,
}

impl ImageEntity {
    /// Create an image entity from encoded bytes, displayed at source size.
    pub fn new(position: Point, data: Vec<u8>, source_width: u32, source_height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: source_width as f64,
            height: source_height as f64,
            source_width,
            source_height,
            data: Arc::new(data),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Scale the display size to fit within max dimensions, preserving the
    /// source aspect ratio.
    pub fn fit_within(mut self, max_width: f64, max_height: f64) -> Self {
        let factor = (max_width / self.source_width as f64)
            .min(max_height / self.source_height as f64);
        self.width = self.source_width as f64 * factor;
        self.height = self.source_height as f64 * factor;
        self
    }

    /// Center the image on a world point.
    pub fn centered_at(mut self, center: Point) -> Self {
        self.position = Point::new(center.x - self.width / 2.0, center.y - self.height / 2.0);
        self
    }

    /// The world-space bounding rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    /// True if the world point falls inside the bounding box.
    pub fn hit_test(&self, point: Point) -> bool {
        self.rect().contains(point)
    }

    /// Move the image by a world-space delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Drag one corner to a world point, re-anchoring the opposite corner.
    ///
    /// Width and height are clamped to [`MIN_IMAGE_SIZE`] per axis; the
    /// clamp applies on every step, so a fast inward drag can never collapse
    /// or invert the box.
    pub fn resize_corner(&mut self, corner: Corner, target: Point) {
        let right = self.position.x + self.width;
        let bottom = self.position.y + self.height;
        match corner {
            Corner::TopLeft => {
                self.width = right - target.x;
                self.height = bottom - target.y;
                self.position = target;
            }
            Corner::TopRight => {
                self.width = target.x - self.position.x;
                self.height = bottom - target.y;
                self.position.y = target.y;
            }
            Corner::BottomLeft => {
                self.width = right - target.x;
                self.height = target.y - self.position.y;
                self.position.x = target.x;
            }
            Corner::BottomRight => {
                self.width = target.x - self.position.x;
                self.height = target.y - self.position.y;
            }
        }
        if self.width < MIN_IMAGE_SIZE {
            self.width = MIN_IMAGE_SIZE;
            // Keep the opposite edge fixed when clamping a left-side drag.
            if matches!(corner, Corner::TopLeft | Corner::BottomLeft) {
                self.position.x = right - MIN_IMAGE_SIZE;
            }
        }
        if self.height < MIN_IMAGE_SIZE {
            self.height = MIN_IMAGE_SIZE;
            if matches!(corner, Corner::TopLeft | Corner::TopRight) {
                self.position.y = bottom - MIN_IMAGE_SIZE;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_at(x: f64, y: f64, w: u32, h: u32) -> ImageEntity {
        ImageEntity::new(Point::new(x, y), vec![0u8; 16], w, h)
    }

    #[test]
    fn test_fit_within_wide_image() {
        let img = image_at(0.0, 0.0, 1000, 500).fit_within(400.0, 400.0);
        assert!((img.width - 400.0).abs() < 0.01);
        assert!((img.height - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_fit_within_scales_up_small_image() {
        let img = image_at(0.0, 0.0, 10, 10).fit_within(300.0, 200.0);
        assert!((img.width - 200.0).abs() < 0.01);
        assert!((img.height - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_centered_at() {
        let img = image_at(0.0, 0.0, 100, 50).centered_at(Point::new(0.0, 0.0));
        assert!((img.position.x + 50.0).abs() < f64::EPSILON);
        assert!((img.position.y + 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let img = image_at(10.0, 20.0, 100, 50);
        assert!(img.hit_test(Point::new(50.0, 40.0)));
        assert!(!img.hit_test(Point::new(5.0, 40.0)));
        assert!(!img.hit_test(Point::new(50.0, 80.0)));
    }

    #[test]
    fn test_resize_bottom_right() {
        let mut img = image_at(0.0, 0.0, 100, 100);
        img.resize_corner(Corner::BottomRight, Point::new(60.0, 40.0));
        assert!((img.width - 60.0).abs() < f64::EPSILON);
        assert!((img.height - 40.0).abs() < f64::EPSILON);
        assert!((img.position.x).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_top_left_anchors_opposite_corner() {
        let mut img = image_at(0.0, 0.0, 100, 100);
        img.resize_corner(Corner::TopLeft, Point::new(30.0, 20.0));
        let rect = img.rect();
        assert!((rect.x1 - 100.0).abs() < f64::EPSILON);
        assert!((rect.y1 - 100.0).abs() < f64::EPSILON);
        assert!((img.width - 70.0).abs() < f64::EPSILON);
        assert!((img.height - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let mut img = image_at(0.0, 0.0, 100, 100);
        img.resize_corner(Corner::BottomRight, Point::new(2.0, -50.0));
        assert!((img.width - MIN_IMAGE_SIZE).abs() < f64::EPSILON);
        assert!((img.height - MIN_IMAGE_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_clamp_keeps_right_edge_for_left_drag() {
        let mut img = image_at(0.0, 0.0, 100, 100);
        img.resize_corner(Corner::TopLeft, Point::new(300.0, 300.0));
        let rect = img.rect();
        assert!((img.width - MIN_IMAGE_SIZE).abs() < f64::EPSILON);
        assert!((rect.x1 - 100.0).abs() < f64::EPSILON);
        assert!((rect.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_translate() {
        let mut img = image_at(10.0, 10.0, 50, 50);
        img.translate(Vec2::new(-5.0, 15.0));
        assert!((img.position.x - 5.0).abs() < f64::EPSILON);
        assert!((img.position.y - 25.0).abs() < f64::EPSILON);
    }
}
