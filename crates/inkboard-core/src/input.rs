//! Semantic input event types fed to the gesture router.
//!
//! The application shell translates raw window events into these before they
//! reach the core; the core never sees the windowing library's types.

use kurbo::{Point, Vec2};
use std::time::Instant;

/// Identifies one pointer (mouse or touch contact) across a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

/// Pointer buttons the router cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Input device class, used to route touch contacts to pinch handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDevice {
    Mouse,
    Touch,
    Pen,
}

/// A pointer-down or pointer-up event in screen coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PointerInput {
    pub id: PointerId,
    pub device: PointerDevice,
    pub position: Point,
    pub button: PointerButton,
    /// Normalized pressure; [`crate::entity::DEFAULT_PRESSURE`] when the
    /// device does not report one.
    pub pressure: f64,
}

/// Modifier key state, tracked by the shell and passed with wheel events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Platform command modifier: Ctrl, or Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Unit the wheel delta was reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelUnit {
    /// Precise pixel deltas (trackpads, high-resolution wheels).
    Pixel,
    /// Whole-line notches (classic mouse wheels).
    Line,
}

/// A wheel/scroll event in screen coordinates, delta already in pixels.
#[derive(Debug, Clone, Copy)]
pub struct WheelInput {
    pub position: Point,
    pub delta: Vec2,
    pub unit: WheelUnit,
    pub modifiers: Modifiers,
}

impl WheelInput {
    /// Best-effort classifier for "discrete mouse wheel notch" versus
    /// "trackpad two-finger scroll": line-unit deltas, or a large
    /// near-vertical-only pixel delta. Not guaranteed correct; wheel zoom
    /// also triggers on ctrl/alt regardless of this answer.
    pub fn is_discrete_wheel(&self) -> bool {
        self.unit == WheelUnit::Line
            || (self.delta.y.abs() >= 120.0 && self.delta.x.abs() < 1.0)
    }
}

/// Taps closer together than this (milliseconds) can form a double tap.
pub const DOUBLE_TAP_MS: u128 = 300;
/// Taps further apart than this (screen pixels) never form a double tap.
pub const DOUBLE_TAP_RADIUS: f64 = 30.0;

/// Detects double-taps/double-clicks from successive pointer-downs.
#[derive(Debug, Default)]
pub struct TapTracker {
    last: Option<(Instant, Point)>,
}

impl TapTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tap; true when it completes a double tap. The tracker resets
    /// after firing so a triple tap is not reported as two doubles.
    pub fn register_tap(&mut self, position: Point) -> bool {
        let now = Instant::now();
        if let Some((then, prev)) = self.last {
            let dx = position.x - prev.x;
            let dy = position.y - prev.y;
            let close = dx * dx + dy * dy < DOUBLE_TAP_RADIUS * DOUBLE_TAP_RADIUS;
            if now.duration_since(then).as_millis() < DOUBLE_TAP_MS && close {
                self.last = None;
                return true;
            }
        }
        self.last = Some((now, position));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wheel(dx: f64, dy: f64, unit: WheelUnit) -> WheelInput {
        WheelInput {
            position: Point::ZERO,
            delta: Vec2::new(dx, dy),
            unit,
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn test_line_unit_is_wheel() {
        assert!(wheel(0.0, 3.0, WheelUnit::Line).is_discrete_wheel());
    }

    #[test]
    fn test_large_vertical_pixel_delta_is_wheel() {
        assert!(wheel(0.0, 120.0, WheelUnit::Pixel).is_discrete_wheel());
        assert!(wheel(0.5, -240.0, WheelUnit::Pixel).is_discrete_wheel());
    }

    #[test]
    fn test_trackpad_scroll_is_not_wheel() {
        assert!(!wheel(4.0, 18.0, WheelUnit::Pixel).is_discrete_wheel());
        // Horizontal component rules out a plain wheel notch.
        assert!(!wheel(30.0, 150.0, WheelUnit::Pixel).is_discrete_wheel());
        assert!(!wheel(0.0, 80.0, WheelUnit::Pixel).is_discrete_wheel());
    }

    #[test]
    fn test_double_tap_same_spot() {
        let mut taps = TapTracker::new();
        let p = Point::new(10.0, 10.0);
        assert!(!taps.register_tap(p));
        assert!(taps.register_tap(p));
        // Fired and reset: the next tap starts a fresh pair.
        assert!(!taps.register_tap(p));
    }

    #[test]
    fn test_double_tap_too_far() {
        let mut taps = TapTracker::new();
        assert!(!taps.register_tap(Point::new(0.0, 0.0)));
        assert!(!taps.register_tap(Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_command_modifier() {
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        let meta = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        assert!(ctrl.command());
        assert!(meta.command());
        assert!(!Modifiers::default().command());
    }
}
