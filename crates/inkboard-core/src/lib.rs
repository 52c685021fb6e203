//! Inkboard Core Library
//!
//! Platform-agnostic data structures and interaction logic for the Inkboard
//! whiteboard: view transform, scene store with operation-based undo/redo,
//! gesture routing, tool configuration, and theme resolution.

pub mod board;
pub mod entity;
pub mod gesture;
pub mod input;
pub mod perf;
pub mod scene;
pub mod text_edit;
pub mod theme;
pub mod tools;
pub mod view;

pub use board::Board;
pub use entity::{
    Corner, Entity, EntityId, FontFamily, ImageEntity, Stroke, StrokePoint, TextAlign, TextEntity,
};
pub use gesture::{Gesture, GestureRouter, RouterEvent, HANDLE_HIT_RADIUS};
pub use input::{Modifiers, PointerButton, PointerDevice, PointerId, PointerInput, WheelInput};
pub use perf::{PerfMetrics, PerformanceMonitor};
pub use scene::{Operation, SceneStore};
pub use text_edit::{CommitOutcome, TextEditSession};
pub use theme::{InkColor, Theme, ThemeColors};
pub use tools::{ToolConfig, ToolKind};
pub use view::ViewTransform;
