//! Runtime board state and the command surface exposed to the host shell.

use crate::gesture::{GestureRouter, RouterEvent};
use crate::input::{PointerId, PointerInput, WheelInput};
use crate::scene::SceneStore;
use crate::tools::ToolConfig;
use crate::view::ViewTransform;
use kurbo::{Point, Size};

/// Aggregates the scene, view transform, gesture router, and tool snapshot
/// for one whiteboard session.
///
/// The host shell feeds input events in and issues the command surface
/// (`undo`, `redo`, `clear_canvas`, image selection commands); the renderer
/// reads the scene and view every frame and never mutates them.
#[derive(Debug, Default)]
pub struct Board {
    pub scene: SceneStore,
    pub view: ViewTransform,
    pub gestures: GestureRouter,
    pub tool: ToolConfig,
    pub viewport_size: Size,
}

impl Board {
    pub fn new() -> Self {
        Self {
            viewport_size: Size::new(800.0, 600.0),
            ..Self::default()
        }
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
    }

    /// Replace the tool snapshot (toolbar input).
    pub fn set_tool(&mut self, tool: ToolConfig) {
        self.tool = tool;
    }

    pub fn pointer_down(&mut self, input: PointerInput) -> Option<RouterEvent> {
        self.gestures
            .pointer_down(input, &mut self.scene, &mut self.view, &self.tool)
    }

    pub fn pointer_move(&mut self, id: PointerId, position: Point, pressure: f64) {
        self.gestures.pointer_move(
            id,
            position,
            pressure,
            &mut self.scene,
            &mut self.view,
            &self.tool,
        );
    }

    pub fn pointer_up(&mut self, id: PointerId) {
        self.gestures.pointer_up(id, &mut self.scene);
    }

    pub fn pointer_cancel(&mut self) {
        self.gestures.pointer_cancel(&mut self.scene);
    }

    pub fn wheel(&mut self, input: WheelInput) {
        self.gestures.wheel(input, &mut self.view);
    }

    /// Undo the last operation, cancelling an in-progress draw first.
    /// Selection indices are positional, so the selection is dropped.
    pub fn undo(&mut self) {
        self.gestures.cancel_active_draw(&mut self.scene);
        self.gestures.deselect_image();
        self.scene.undo();
    }

    pub fn redo(&mut self) {
        self.gestures.deselect_image();
        self.scene.redo();
    }

    /// Clear the whole board (undoable).
    pub fn clear_canvas(&mut self) {
        self.gestures.deselect_image();
        self.scene.clear();
    }

    pub fn delete_selected_image(&mut self) {
        self.gestures.delete_selected_image(&mut self.scene);
    }

    pub fn has_selected_image(&self) -> bool {
        self.gestures.has_selected_image()
    }

    /// Halt an in-progress draw (Escape).
    pub fn cancel_active_draw(&mut self) {
        self.gestures.cancel_active_draw(&mut self.scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ImageEntity;
    use crate::input::{PointerButton, PointerDevice};

    fn pen_down(board: &mut Board, x: f64, y: f64) {
        board.pointer_down(PointerInput {
            id: PointerId(1),
            device: PointerDevice::Mouse,
            position: Point::new(x, y),
            button: PointerButton::Primary,
            pressure: 0.5,
        });
    }

    #[test]
    fn test_undo_cancels_live_draw_first() {
        let mut board = Board::new();
        pen_down(&mut board, 10.0, 10.0);
        // Undo mid-draw: the seed stroke is discarded, not committed.
        board.undo();
        assert!(board.scene.is_empty());
        assert!(!board.scene.can_undo());
    }

    #[test]
    fn test_clear_drops_selection() {
        let mut board = Board::new();
        board.tool.kind = crate::tools::ToolKind::Select;
        board
            .scene
            .add_image(ImageEntity::new(Point::ZERO, vec![0u8; 4], 50, 50));
        pen_down(&mut board, 10.0, 10.0);
        assert!(board.has_selected_image());

        board.clear_canvas();
        assert!(!board.has_selected_image());
        assert!(board.scene.is_empty());

        board.undo();
        assert_eq!(board.scene.len(), 1);
    }

    #[test]
    fn test_command_surface_no_ops_on_empty_board() {
        let mut board = Board::new();
        board.undo();
        board.redo();
        board.clear_canvas();
        board.delete_selected_image();
        assert!(board.scene.is_empty());
        assert!(!board.has_selected_image());
    }
}
