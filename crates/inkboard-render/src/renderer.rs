//! Renderer trait abstraction.

use inkboard_core::scene::SceneStore;
use inkboard_core::text_edit::TextEditSession;
use inkboard_core::theme::ThemeColors;
use inkboard_core::view::ViewTransform;
use kurbo::Size;
use thiserror::Error;

/// Grid line spacing in world units.
pub const GRID_SIZE: f64 = 100.0;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Everything a renderer needs for one frame. The renderer only reads;
/// all mutation happens in event handlers on the same thread.
pub struct RenderContext<'a> {
    /// The scene to render.
    pub scene: &'a SceneStore,
    /// Current pan/zoom.
    pub view: &'a ViewTransform,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Resolved palette for the active theme; theme-bound entity colors
    /// re-resolve against this every frame.
    pub colors: ThemeColors,
    /// Index of the selected image, for the selection overlay.
    pub selected_image: Option<usize>,
    /// Live text session; the entity at `session.existing` is skipped and
    /// the session buffer drawn in its place.
    pub editing: Option<&'a TextEditSession>,
    /// Whether the edit caret is in its visible blink phase.
    pub caret_visible: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        scene: &'a SceneStore,
        view: &'a ViewTransform,
        viewport_size: Size,
        colors: ThemeColors,
    ) -> Self {
        Self {
            scene,
            view,
            viewport_size,
            scale_factor: 1.0,
            colors,
            selected_image: None,
            editing: None,
            caret_visible: false,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_selected_image(mut self, index: Option<usize>) -> Self {
        self.selected_image = index;
        self
    }

    pub fn with_editing(mut self, session: Option<&'a TextEditSession>, caret: bool) -> Self {
        self.editing = session;
        self.caret_visible = caret;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the frame's draw commands. Called once per animation frame.
    fn build_scene(&mut self, ctx: &RenderContext<'_>);
}
