//! View transform for pan/zoom between screen and world space.

use kurbo::{Point, Rect, Size, Vec2};

/// Minimum allowed zoom scale.
pub const MIN_SCALE: f64 = 0.05;
/// Maximum allowed zoom scale.
pub const MAX_SCALE: f64 = 20.0;

/// The view transform mapping world coordinates to screen coordinates.
///
/// screen = world * scale + pan. Pan is in screen pixels, scale is a
/// uniform zoom factor clamped to [`MIN_SCALE`, `MAX_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Horizontal pan in screen pixels.
    pub pan_x: f64,
    /// Vertical pan in screen pixels.
    pub pan_y: f64,
    /// Uniform zoom factor.
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            scale: 1.0,
        }
    }
}

impl ViewTransform {
    /// Create an identity view transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.scale,
            (screen.y - self.pan_y) / self.scale,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.pan_x,
            world.y * self.scale + self.pan_y,
        )
    }

    /// Pan the view by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan_x += delta.x;
        self.pan_y += delta.y;
    }

    /// Zoom by a factor, keeping the world point under `screen` fixed.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        self.set_scale_anchored(screen, self.scale * factor);
    }

    /// Set an absolute scale, keeping the world point under `screen` fixed.
    ///
    /// This is the anchoring primitive shared by wheel zoom and pinch zoom:
    /// the world point currently under the anchor stays under it after the
    /// scale change.
    pub fn set_scale_anchored(&mut self, screen: Point, new_scale: f64) {
        let anchor_world = self.screen_to_world(screen);
        let next = new_scale.clamp(MIN_SCALE, MAX_SCALE);
        self.scale = next;
        self.pan_x = screen.x - anchor_world.x * next;
        self.pan_y = screen.y - anchor_world.y * next;
    }

    /// Reset to the identity transform.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The world-space rectangle currently visible in a viewport of the
    /// given size (in the same pixel units as the pan).
    pub fn visible_world_rect(&self, viewport: Size) -> Rect {
        let top_left = self.screen_to_world(Point::ZERO);
        let bottom_right = self.screen_to_world(Point::new(viewport.width, viewport.height));
        Rect::new(top_left.x, top_left.y, bottom_right.x, bottom_right.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_identity_round_trip() {
        let view = ViewTransform::new();
        let screen = Point::new(123.0, 456.0);
        let world = view.screen_to_world(screen);
        assert!((world.x - screen.x).abs() < TOL);
        assert!((world.y - screen.y).abs() < TOL);
    }

    #[test]
    fn test_round_trip_with_pan_and_scale() {
        let view = ViewTransform {
            pan_x: -37.5,
            pan_y: 210.25,
            scale: 2.75,
        };
        for &(sx, sy) in &[(0.0, 0.0), (100.0, 100.0), (-50.0, 640.0), (1919.0, 1.0)] {
            let screen = Point::new(sx, sy);
            let back = view.world_to_screen(view.screen_to_world(screen));
            assert!((back.x - sx).abs() < TOL);
            assert!((back.y - sy).abs() < TOL);
        }
    }

    #[test]
    fn test_zoom_at_anchors_cursor() {
        let mut view = ViewTransform::new();
        let anchor = Point::new(100.0, 100.0);
        let before = view.screen_to_world(anchor);

        view.zoom_at(anchor, 2.0);

        assert!((view.scale - 2.0).abs() < TOL);
        let after = view.screen_to_world(anchor);
        assert!((after.x - before.x).abs() < TOL);
        assert!((after.y - before.y).abs() < TOL);
    }

    #[test]
    fn test_zoom_anchoring_with_existing_pan() {
        let mut view = ViewTransform {
            pan_x: 80.0,
            pan_y: -40.0,
            scale: 0.5,
        };
        let anchor = Point::new(333.0, 77.0);
        let before = view.screen_to_world(anchor);

        view.zoom_at(anchor, 3.0);

        let after = view.screen_to_world(anchor);
        assert!((after.x - before.x).abs() < 1e-6);
        assert!((after.y - before.y).abs() < 1e-6);
    }

    #[test]
    fn test_scale_clamps_high() {
        let mut view = ViewTransform::new();
        for _ in 0..100 {
            view.zoom_at(Point::new(50.0, 50.0), 1.5);
        }
        assert!(view.scale <= MAX_SCALE);
        assert!((view.scale - MAX_SCALE).abs() < TOL);
    }

    #[test]
    fn test_scale_clamps_low() {
        let mut view = ViewTransform::new();
        for _ in 0..100 {
            view.zoom_at(Point::new(50.0, 50.0), 0.5);
        }
        assert!(view.scale >= MIN_SCALE);
        assert!((view.scale - MIN_SCALE).abs() < TOL);
    }

    #[test]
    fn test_pan_accumulates() {
        let mut view = ViewTransform::new();
        view.pan(Vec2::new(10.0, -5.0));
        view.pan(Vec2::new(2.5, 2.5));
        assert!((view.pan_x - 12.5).abs() < TOL);
        assert!((view.pan_y + 2.5).abs() < TOL);
    }

    #[test]
    fn test_reset() {
        let mut view = ViewTransform {
            pan_x: 99.0,
            pan_y: 99.0,
            scale: 4.0,
        };
        view.reset();
        assert_eq!(view, ViewTransform::default());
    }

    #[test]
    fn test_visible_world_rect_grows_when_zoomed_out() {
        let mut view = ViewTransform::new();
        let viewport = Size::new(800.0, 600.0);
        let at_identity = view.visible_world_rect(viewport);
        view.zoom_at(Point::new(400.0, 300.0), 0.5);
        let zoomed_out = view.visible_world_rect(viewport);
        assert!(zoomed_out.width() > at_identity.width());
        assert!(zoomed_out.height() > at_identity.height());
    }
}
