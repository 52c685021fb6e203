//! Gesture router: interprets pointer/wheel events into semantic actions.
//!
//! One router instance tracks a single pointer-down-to-pointer-up session at
//! a time, plus the touch bookkeeping needed for pinch zoom. All of this is
//! plain mutable state, deliberately separate from anything that triggers
//! redraws; the only field a host UI observes is the image selection.

use crate::entity::{Corner, Entity};
use crate::input::{
    PointerButton, PointerDevice, PointerId, PointerInput, TapTracker, WheelInput,
};
use crate::scene::SceneStore;
use crate::text_edit::TextEditSession;
use crate::tools::{ToolConfig, ToolKind};
use crate::view::ViewTransform;
use kurbo::{Point, Vec2};
use std::collections::HashMap;

/// Hit radius for image resize handles, in screen pixels. Divided by the
/// view scale so handles are equally grabbable at any zoom.
pub const HANDLE_HIT_RADIUS: f64 = 20.0;

/// Exponent base for ctrl/pinch-trackpad zoom (coarse).
const ZOOM_BASE_CTRL: f64 = 1.02;
/// Exponent base for plain wheel-notch zoom (fine).
const ZOOM_BASE_WHEEL: f64 = 1.0015;

/// The gesture currently owning the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Streaming points into the stroke with this id.
    Drawing { stroke: crate::entity::EntityId },
    /// Scrub-deleting whole strokes under the pointer.
    Erasing,
    Panning,
    /// Dragging an image body; `grab` is the world offset from the image
    /// origin to the grab point.
    MovingImage { index: usize, grab: Vec2 },
    /// Dragging a corner handle of an image.
    ResizingImage { index: usize, corner: Corner },
    /// Two-finger pinch zoom.
    Pinching,
}

/// Live pinch descriptor, captured when the second finger lands.
#[derive(Debug, Clone, Copy)]
struct PinchState {
    first: PointerId,
    second: PointerId,
    start_dist: f64,
    start_scale: f64,
    start_pan: Vec2,
    /// Screen midpoint at pinch start; the world point under it stays
    /// anchored to the (moving) midpoint.
    origin: Point,
}

/// Things the host shell reacts to (cursor, tool state, text overlay).
#[derive(Debug, Clone)]
pub enum RouterEvent {
    /// The view transform was reset to identity.
    ViewReset,
    /// An image became selected.
    ImageSelected(usize),
    /// A modal text-edit session should open.
    BeginTextEdit(TextEditSession),
}

/// Pointer/wheel state machine. Mutates the scene store and view transform;
/// reads the tool configuration as a per-gesture snapshot.
#[derive(Debug, Default)]
pub struct GestureRouter {
    gesture: Gesture,
    /// Pointer that owns the active gesture; events from others are ignored.
    owner: Option<PointerId>,
    last_screen: Point,
    space_held: bool,
    touch_points: HashMap<PointerId, Point>,
    pinch: Option<PinchState>,
    selected_image: Option<usize>,
    taps: TapTracker,
}

impl GestureRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn space_held(&self) -> bool {
        self.space_held
    }

    /// Space toggles pan-readiness for future pointer-downs.
    pub fn set_space_held(&mut self, held: bool) {
        self.space_held = held;
    }

    pub fn selected_image(&self) -> Option<usize> {
        self.selected_image
    }

    pub fn has_selected_image(&self) -> bool {
        self.selected_image.is_some()
    }

    /// Drop the image selection (after undo/clear, where indices go stale).
    pub fn deselect_image(&mut self) {
        self.selected_image = None;
    }

    /// Route a pointer-down event.
    pub fn pointer_down(
        &mut self,
        input: PointerInput,
        scene: &mut SceneStore,
        view: &mut ViewTransform,
        tool: &ToolConfig,
    ) -> Option<RouterEvent> {
        if input.device == PointerDevice::Touch {
            if let Some(event) = self.touch_down(input, scene, view) {
                return Some(event);
            }
            if self.gesture == Gesture::Pinching {
                return None;
            }
        }

        let panning = self.space_held || input.button == PointerButton::Middle;
        if panning {
            self.begin(Gesture::Panning, input);
            return None;
        }
        if input.button != PointerButton::Primary {
            return None;
        }

        // Mouse double-click probes text first, then images, then falls back
        // to a view reset on empty background.
        if input.device != PointerDevice::Touch && self.taps.register_tap(input.position) {
            let world = view.screen_to_world(input.position);
            if let Some(index) = scene.topmost_text_at(world) {
                if let Some(text) = scene.get(index).and_then(Entity::as_text) {
                    return Some(RouterEvent::BeginTextEdit(TextEditSession::edit_existing(
                        index, text,
                    )));
                }
            }
            if let Some(index) = scene.topmost_image_at(world) {
                self.selected_image = Some(index);
                return Some(RouterEvent::ImageSelected(index));
            }
            view.reset();
            return Some(RouterEvent::ViewReset);
        }

        match tool.kind {
            ToolKind::Text => {
                let world = view.screen_to_world(input.position);
                let session = match scene.topmost_text_at(world) {
                    Some(index) => scene
                        .get(index)
                        .and_then(Entity::as_text)
                        .map(|text| TextEditSession::edit_existing(index, text))?,
                    None => TextEditSession::new_at(world, tool),
                };
                Some(RouterEvent::BeginTextEdit(session))
            }
            ToolKind::StrokeEraser => {
                self.begin(Gesture::Erasing, input);
                let world = view.screen_to_world(input.position);
                self.scrub(world, scene, tool);
                None
            }
            kind if kind.is_drawing() => {
                let world = view.screen_to_world(input.position);
                let stroke = tool.make_stroke(world, input.pressure);
                let id = scene.begin_stroke(stroke);
                self.begin(Gesture::Drawing { stroke: id }, input);
                None
            }
            ToolKind::Select => self.select_down(input, scene, view),
            _ => None,
        }
    }

    /// Route a pointer-move event. Moves from pointers that don't own the
    /// current gesture are ignored.
    pub fn pointer_move(
        &mut self,
        id: PointerId,
        position: Point,
        pressure: f64,
        scene: &mut SceneStore,
        view: &mut ViewTransform,
        tool: &ToolConfig,
    ) {
        if let std::collections::hash_map::Entry::Occupied(mut entry) =
            self.touch_points.entry(id)
        {
            entry.insert(position);
            if self.pinch.is_some() {
                self.update_pinch(view);
                return;
            }
        }

        if self.owner != Some(id) {
            return;
        }
        let delta = position - self.last_screen;
        self.last_screen = position;

        match self.gesture {
            Gesture::Panning => view.pan(delta),
            Gesture::Drawing { stroke } => {
                let world = view.screen_to_world(position);
                if let Some(s) = scene.stroke_mut(stroke) {
                    s.add_point(world, pressure);
                }
            }
            Gesture::Erasing => {
                let world = view.screen_to_world(position);
                self.scrub(world, scene, tool);
            }
            Gesture::MovingImage { index, grab } => {
                let world = view.screen_to_world(position);
                if let Some(img) = scene_image_mut(scene, index) {
                    img.position = world - grab;
                }
            }
            Gesture::ResizingImage { index, corner } => {
                let world = view.screen_to_world(position);
                if let Some(img) = scene_image_mut(scene, index) {
                    img.resize_corner(corner, world);
                }
            }
            Gesture::Idle | Gesture::Pinching => {}
        }
    }

    /// Route a pointer-up event.
    pub fn pointer_up(&mut self, id: PointerId, scene: &mut SceneStore) {
        self.touch_points.remove(&id);
        if let Some(pinch) = self.pinch {
            // Pinch ends as soon as either tracked finger lifts.
            if pinch.first == id || pinch.second == id {
                self.pinch = None;
                if self.gesture == Gesture::Pinching {
                    self.gesture = Gesture::Idle;
                }
            }
        }

        if self.owner != Some(id) {
            return;
        }
        self.owner = None;
        if let Gesture::Drawing { stroke } = self.gesture {
            // Finalize the undo record for the streamed stroke.
            scene.register_stroke(stroke);
        }
        self.gesture = Gesture::Idle;
    }

    /// Pointer-cancel (OS gesture interrupt): unconditionally reset to idle.
    /// A trivially short streamed stroke is treated as an accidental tap and
    /// removed; longer streams stay as already drawn, without an undo record.
    pub fn pointer_cancel(&mut self, scene: &mut SceneStore) {
        log::debug!("pointer cancel: resetting interaction state");
        if let Gesture::Drawing { stroke } = self.gesture {
            if scene.stroke_len(stroke).unwrap_or(0) <= 1 {
                scene.discard_stroke(stroke);
            }
        }
        self.gesture = Gesture::Idle;
        self.owner = None;
        self.pinch = None;
        self.touch_points.clear();
    }

    /// Halt an in-progress draw (Escape, or before an undo). Discards the
    /// stroke when it only has its seed point.
    pub fn cancel_active_draw(&mut self, scene: &mut SceneStore) {
        if let Gesture::Drawing { stroke } = self.gesture {
            if scene.stroke_len(stroke).unwrap_or(0) <= 1 {
                scene.discard_stroke(stroke);
            }
            self.gesture = Gesture::Idle;
            self.owner = None;
        }
    }

    /// Wheel input: anchored zoom for ctrl/alt or discrete wheel notches,
    /// two-finger trackpad pan otherwise.
    pub fn wheel(&mut self, input: WheelInput, view: &mut ViewTransform) {
        let zooming =
            input.modifiers.ctrl || input.modifiers.alt || input.is_discrete_wheel();
        if zooming {
            let base = if input.modifiers.ctrl {
                ZOOM_BASE_CTRL
            } else {
                ZOOM_BASE_WHEEL
            };
            view.zoom_at(input.position, base.powf(-input.delta.y));
        } else {
            view.pan(-input.delta);
        }
    }

    /// Delete the currently selected image through the undo log.
    pub fn delete_selected_image(&mut self, scene: &mut SceneStore) {
        if let Some(index) = self.selected_image.take() {
            if scene.get(index).is_some_and(Entity::is_image) {
                scene.delete_entities(&[index]);
            }
        }
    }

    fn begin(&mut self, gesture: Gesture, input: PointerInput) {
        self.gesture = gesture;
        self.owner = Some(input.id);
        self.last_screen = input.position;
    }

    /// Touch-specific bookkeeping: double-tap view reset and pinch start.
    fn touch_down(
        &mut self,
        input: PointerInput,
        scene: &mut SceneStore,
        view: &mut ViewTransform,
    ) -> Option<RouterEvent> {
        let double = self.taps.register_tap(input.position);
        self.touch_points.insert(input.id, input.position);

        if double {
            view.reset();
            return Some(RouterEvent::ViewReset);
        }

        if self.touch_points.len() == 2 && self.pinch.is_none() {
            // Second finger: whatever was in progress on the first becomes a
            // pinch. A just-started stroke is discarded as accidental.
            self.cancel_active_draw(scene);
            let mut iter = self.touch_points.iter();
            let (&id_a, &pos_a) = iter.next()?;
            let (&id_b, &pos_b) = iter.next()?;
            self.pinch = Some(PinchState {
                first: id_a,
                second: id_b,
                start_dist: (pos_b - pos_a).hypot().max(1e-3),
                start_scale: view.scale,
                start_pan: Vec2::new(view.pan_x, view.pan_y),
                origin: pos_a.midpoint(pos_b),
            });
            self.gesture = Gesture::Pinching;
            self.owner = None;
        }
        None
    }

    fn update_pinch(&mut self, view: &mut ViewTransform) {
        let Some(pinch) = self.pinch else { return };
        let (Some(&a), Some(&b)) = (
            self.touch_points.get(&pinch.first),
            self.touch_points.get(&pinch.second),
        ) else {
            return;
        };
        let dist = (b - a).hypot();
        let ratio = dist / pinch.start_dist;
        let next = (pinch.start_scale * ratio)
            .clamp(crate::view::MIN_SCALE, crate::view::MAX_SCALE);

        // The world point that sat under the initial midpoint follows the
        // current midpoint, which yields both anchored zoom and two-finger
        // translation in one rule.
        let world_x = (pinch.origin.x - pinch.start_pan.x) / pinch.start_scale;
        let world_y = (pinch.origin.y - pinch.start_pan.y) / pinch.start_scale;
        let mid = a.midpoint(b);
        view.scale = next;
        view.pan_x = mid.x - world_x * next;
        view.pan_y = mid.y - world_y * next;
    }

    /// Select-tool pointer-down: handle, then image body, then pan.
    fn select_down(
        &mut self,
        input: PointerInput,
        scene: &mut SceneStore,
        view: &ViewTransform,
    ) -> Option<RouterEvent> {
        let world = view.screen_to_world(input.position);

        // (a) Corner handles of the already-selected image. The hit radius
        // is fixed in screen pixels so it doesn't shrink as you zoom in.
        if let Some(index) = self.selected_image {
            match scene.get(index).and_then(Entity::as_image) {
                Some(img) => {
                    let tolerance = HANDLE_HIT_RADIUS / view.scale;
                    let rect = img.rect();
                    for corner in Corner::all() {
                        if (world - corner.position(rect)).hypot() < tolerance {
                            self.begin(Gesture::ResizingImage { index, corner }, input);
                            return None;
                        }
                    }
                }
                None => self.selected_image = None,
            }
        }

        // (b) Any image body, topmost first.
        if let Some(index) = scene.topmost_image_at(world) {
            let grab = scene
                .get(index)
                .and_then(Entity::as_image)
                .map(|img| world - img.position)?;
            self.selected_image = Some(index);
            self.begin(Gesture::MovingImage { index, grab }, input);
            return Some(RouterEvent::ImageSelected(index));
        }

        // (c) Background: deselect and pan.
        self.selected_image = None;
        self.begin(Gesture::Panning, input);
        None
    }

    /// Stroke-eraser scrub: delete every stroke within the scrub radius of
    /// the point, keeping the image selection index in step with the splice.
    fn scrub(&mut self, world: Point, scene: &mut SceneStore, tool: &ToolConfig) {
        let hits = scene.strokes_within(world, tool.scrub_radius());
        if hits.is_empty() {
            return;
        }
        if let Some(sel) = self.selected_image {
            let removed_below = hits.iter().filter(|&&i| i < sel).count();
            self.selected_image = Some(sel - removed_below);
        }
        scene.delete_entities(&hits);
    }
}

fn scene_image_mut(
    scene: &mut SceneStore,
    index: usize,
) -> Option<&mut crate::entity::ImageEntity> {
    scene.entity_mut(index).and_then(Entity::as_image_mut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ImageEntity;

    fn down(id: u64, x: f64, y: f64) -> PointerInput {
        PointerInput {
            id: PointerId(id),
            device: PointerDevice::Mouse,
            position: Point::new(x, y),
            button: PointerButton::Primary,
            pressure: 0.5,
        }
    }

    fn touch(id: u64, x: f64, y: f64) -> PointerInput {
        PointerInput {
            device: PointerDevice::Touch,
            ..down(id, x, y)
        }
    }

    fn setup() -> (GestureRouter, SceneStore, ViewTransform, ToolConfig) {
        (
            GestureRouter::new(),
            SceneStore::new(),
            ViewTransform::new(),
            ToolConfig::default(),
        )
    }

    #[test]
    fn test_draw_stream_and_register() {
        let (mut router, mut scene, mut view, tool) = setup();

        router.pointer_down(down(1, 10.0, 10.0), &mut scene, &mut view, &tool);
        assert!(matches!(router.gesture(), Gesture::Drawing { .. }));
        assert_eq!(scene.len(), 1);

        router.pointer_move(PointerId(1), Point::new(20.0, 20.0), 0.7, &mut scene, &mut view, &tool);
        router.pointer_move(PointerId(1), Point::new(30.0, 25.0), 0.7, &mut scene, &mut view, &tool);
        assert_eq!(scene.entities()[0].as_stroke().unwrap().len(), 3);
        assert!(!scene.can_undo());

        router.pointer_up(PointerId(1), &mut scene);
        assert_eq!(router.gesture(), Gesture::Idle);
        assert!(scene.can_undo());

        scene.undo();
        assert!(scene.is_empty());
    }

    #[test]
    fn test_moves_from_other_pointers_ignored() {
        let (mut router, mut scene, mut view, tool) = setup();
        router.pointer_down(down(1, 0.0, 0.0), &mut scene, &mut view, &tool);
        router.pointer_move(PointerId(9), Point::new(50.0, 50.0), 0.5, &mut scene, &mut view, &tool);
        assert_eq!(scene.entities()[0].as_stroke().unwrap().len(), 1);
        router.pointer_up(PointerId(9), &mut scene);
        // The foreign pointer-up didn't end the gesture either.
        assert!(matches!(router.gesture(), Gesture::Drawing { .. }));
    }

    #[test]
    fn test_trivial_cancel_leaves_scene_unchanged() {
        let (mut router, mut scene, mut view, tool) = setup();
        router.pointer_down(down(1, 10.0, 10.0), &mut scene, &mut view, &tool);
        router.pointer_cancel(&mut scene);
        assert!(scene.is_empty());
        assert_eq!(router.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_cancel_keeps_longer_stream_without_record() {
        let (mut router, mut scene, mut view, tool) = setup();
        router.pointer_down(down(1, 0.0, 0.0), &mut scene, &mut view, &tool);
        router.pointer_move(PointerId(1), Point::new(40.0, 0.0), 0.5, &mut scene, &mut view, &tool);
        router.pointer_cancel(&mut scene);
        assert_eq!(scene.len(), 1);
        assert!(!scene.can_undo());
    }

    #[test]
    fn test_space_pan() {
        let (mut router, mut scene, mut view, tool) = setup();
        router.set_space_held(true);
        router.pointer_down(down(1, 100.0, 100.0), &mut scene, &mut view, &tool);
        assert_eq!(router.gesture(), Gesture::Panning);
        router.pointer_move(PointerId(1), Point::new(130.0, 90.0), 0.5, &mut scene, &mut view, &tool);
        assert!((view.pan_x - 30.0).abs() < f64::EPSILON);
        assert!((view.pan_y + 10.0).abs() < f64::EPSILON);
        // Panning never touches entities.
        assert!(scene.is_empty());
    }

    #[test]
    fn test_middle_button_pan() {
        let (mut router, mut scene, mut view, tool) = setup();
        let input = PointerInput {
            button: PointerButton::Middle,
            ..down(1, 0.0, 0.0)
        };
        router.pointer_down(input, &mut scene, &mut view, &tool);
        assert_eq!(router.gesture(), Gesture::Panning);
    }

    fn select_tool() -> ToolConfig {
        ToolConfig {
            kind: ToolKind::Select,
            ..ToolConfig::default()
        }
    }

    fn add_image(scene: &mut SceneStore, x: f64, y: f64, w: u32, h: u32) {
        scene.add_image(ImageEntity::new(Point::new(x, y), vec![0u8; 8], w, h));
    }

    #[test]
    fn test_select_and_move_image() {
        let (mut router, mut scene, mut view, _) = setup();
        let tool = select_tool();
        add_image(&mut scene, 100.0, 100.0, 50, 50);

        let event = router.pointer_down(down(1, 120.0, 120.0), &mut scene, &mut view, &tool);
        assert!(matches!(event, Some(RouterEvent::ImageSelected(0))));
        assert!(router.has_selected_image());

        router.pointer_move(PointerId(1), Point::new(140.0, 110.0), 0.5, &mut scene, &mut view, &tool);
        let img = scene.entities()[0].as_image().unwrap();
        assert!((img.position.x - 120.0).abs() < f64::EPSILON);
        assert!((img.position.y - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_handle_beats_body() {
        let (mut router, mut scene, mut view, _) = setup();
        let tool = select_tool();
        add_image(&mut scene, 0.0, 0.0, 100, 100);

        // First click selects.
        router.pointer_down(down(1, 50.0, 50.0), &mut scene, &mut view, &tool);
        router.pointer_up(PointerId(1), &mut scene);

        // Wait out the double-click window so the next down is a fresh tap.
        std::thread::sleep(std::time::Duration::from_millis(320));

        // Click near the bottom-right corner grabs the handle.
        router.pointer_down(down(1, 95.0, 95.0), &mut scene, &mut view, &tool);
        assert!(matches!(
            router.gesture(),
            Gesture::ResizingImage {
                corner: Corner::BottomRight,
                ..
            }
        ));

        router.pointer_move(PointerId(1), Point::new(60.0, 70.0), 0.5, &mut scene, &mut view, &tool);
        let img = scene.entities()[0].as_image().unwrap();
        assert!((img.width - 60.0).abs() < f64::EPSILON);
        assert!((img.height - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_background_click_deselects_and_pans() {
        let (mut router, mut scene, mut view, _) = setup();
        let tool = select_tool();
        add_image(&mut scene, 0.0, 0.0, 10, 10);
        router.pointer_down(down(1, 5.0, 5.0), &mut scene, &mut view, &tool);
        router.pointer_up(PointerId(1), &mut scene);
        std::thread::sleep(std::time::Duration::from_millis(320));

        router.pointer_down(down(1, 500.0, 500.0), &mut scene, &mut view, &tool);
        assert!(!router.has_selected_image());
        assert_eq!(router.gesture(), Gesture::Panning);
    }

    #[test]
    fn test_delete_selected_image_is_undoable() {
        let (mut router, mut scene, mut view, _) = setup();
        let tool = select_tool();
        add_image(&mut scene, 0.0, 0.0, 50, 50);
        router.pointer_down(down(1, 10.0, 10.0), &mut scene, &mut view, &tool);
        router.pointer_up(PointerId(1), &mut scene);

        router.delete_selected_image(&mut scene);
        assert!(scene.is_empty());
        assert!(!router.has_selected_image());

        scene.undo();
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_pinch_zoom_clamps_and_anchors() {
        let (mut router, mut scene, mut view, tool) = setup();

        router.pointer_down(touch(1, 100.0, 100.0), &mut scene, &mut view, &tool);
        router.pointer_down(touch(2, 200.0, 100.0), &mut scene, &mut view, &tool);
        assert_eq!(router.gesture(), Gesture::Pinching);

        let mid_world_before = view.screen_to_world(Point::new(150.0, 100.0));

        // Spread symmetrically around the fixed midpoint: pure zoom-in.
        router.pointer_move(PointerId(1), Point::new(50.0, 100.0), 0.5, &mut scene, &mut view, &tool);
        router.pointer_move(PointerId(2), Point::new(250.0, 100.0), 0.5, &mut scene, &mut view, &tool);
        assert!((view.scale - 2.0).abs() < 1e-9);

        let mid_world_after = view.screen_to_world(Point::new(150.0, 100.0));
        assert!((mid_world_after.x - mid_world_before.x).abs() < 1e-9);
        assert!((mid_world_after.y - mid_world_before.y).abs() < 1e-9);

        // Lift one finger: pinch over.
        router.pointer_up(PointerId(2), &mut scene);
        assert_eq!(router.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_second_finger_discards_seed_stroke() {
        let (mut router, mut scene, mut view, tool) = setup();
        router.pointer_down(touch(1, 100.0, 100.0), &mut scene, &mut view, &tool);
        assert_eq!(scene.len(), 1);
        router.pointer_down(touch(2, 200.0, 100.0), &mut scene, &mut view, &tool);
        assert!(scene.is_empty());
        assert_eq!(router.gesture(), Gesture::Pinching);
    }

    #[test]
    fn test_touch_double_tap_resets_view() {
        let (mut router, mut scene, mut view, tool) = setup();
        view.pan(Vec2::new(40.0, 40.0));
        view.zoom_at(Point::ZERO, 2.0);

        router.pointer_down(touch(1, 10.0, 10.0), &mut scene, &mut view, &tool);
        router.pointer_up(PointerId(1), &mut scene);
        let event = router.pointer_down(touch(1, 12.0, 12.0), &mut scene, &mut view, &tool);
        assert!(matches!(event, Some(RouterEvent::ViewReset)));
        assert_eq!(view, ViewTransform::default());
    }

    #[test]
    fn test_wheel_ctrl_zooms_plain_pans() {
        let (mut router, _scene, mut view, _tool) = setup();
        let ctrl = crate::input::Modifiers {
            ctrl: true,
            ..Default::default()
        };
        router.wheel(
            WheelInput {
                position: Point::new(100.0, 100.0),
                delta: Vec2::new(0.0, -50.0),
                unit: crate::input::WheelUnit::Pixel,
                modifiers: ctrl,
            },
            &mut view,
        );
        assert!(view.scale > 1.0);

        let before = view.pan_x;
        router.wheel(
            WheelInput {
                position: Point::new(100.0, 100.0),
                delta: Vec2::new(10.0, 20.0),
                unit: crate::input::WheelUnit::Pixel,
                modifiers: Default::default(),
            },
            &mut view,
        );
        assert!((view.pan_x - (before - 10.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wheel_notch_zooms_without_ctrl() {
        let (mut router, _scene, mut view, _tool) = setup();
        router.wheel(
            WheelInput {
                position: Point::ZERO,
                delta: Vec2::new(0.0, -120.0),
                unit: crate::input::WheelUnit::Pixel,
                modifiers: Default::default(),
            },
            &mut view,
        );
        assert!(view.scale > 1.0);
    }

    #[test]
    fn test_stroke_eraser_scrubs() {
        let (mut router, mut scene, mut view, _) = setup();
        let mut stroke = crate::entity::Stroke::new(
            ToolKind::Pen,
            2.0,
            crate::theme::InkColor::ThemeBound,
            1.0,
            false,
        );
        stroke.add_point(Point::new(0.0, 0.0), 0.5);
        stroke.add_point(Point::new(100.0, 0.0), 0.5);
        scene.add_stroke(stroke);
        add_image(&mut scene, 0.0, -20.0, 200, 40);

        let tool = ToolConfig {
            kind: ToolKind::StrokeEraser,
            ..ToolConfig::default()
        };
        router.pointer_down(down(1, 50.0, 0.0), &mut scene, &mut view, &tool);
        // The stroke is gone, the image survives.
        assert_eq!(scene.len(), 1);
        assert!(scene.entities()[0].is_image());

        scene.undo();
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_text_tool_starts_session() {
        let (mut router, mut scene, mut view, _) = setup();
        let tool = ToolConfig {
            kind: ToolKind::Text,
            ..ToolConfig::default()
        };
        let event = router.pointer_down(down(1, 40.0, 60.0), &mut scene, &mut view, &tool);
        let Some(RouterEvent::BeginTextEdit(session)) = event else {
            panic!("expected a text session");
        };
        assert!(session.existing.is_none());
        assert!((session.anchor.x - 40.0).abs() < f64::EPSILON);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_text_tool_edits_existing_in_place() {
        let (mut router, mut scene, mut view, _) = setup();
        scene.add_text(crate::entity::TextEntity::new(
            Point::new(10.0, 10.0),
            "hi there".to_string(),
            32.0,
        ));
        let tool = ToolConfig {
            kind: ToolKind::Text,
            ..ToolConfig::default()
        };
        let event = router.pointer_down(down(1, 30.0, 20.0), &mut scene, &mut view, &tool);
        let Some(RouterEvent::BeginTextEdit(session)) = event else {
            panic!("expected a text session");
        };
        assert_eq!(session.existing, Some(0));
        assert_eq!(session.content, "hi there");
    }

    #[test]
    fn test_escape_discards_seed_stroke() {
        let (mut router, mut scene, mut view, tool) = setup();
        router.pointer_down(down(1, 10.0, 10.0), &mut scene, &mut view, &tool);
        router.cancel_active_draw(&mut scene);
        assert!(scene.is_empty());
        assert_eq!(router.gesture(), Gesture::Idle);
    }
}
