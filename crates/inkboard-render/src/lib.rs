//! Inkboard Render Library
//!
//! Renderer abstraction and implementations for Inkboard. The default
//! implementation uses Vello for GPU-accelerated 2D rendering and Parley
//! for text layout.

mod renderer;
#[cfg(feature = "vello-renderer")]
pub mod text_editor;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{RenderContext, Renderer, RendererError, GRID_SIZE};
#[cfg(feature = "vello-renderer")]
pub use text_editor::{TextEditResult, TextEditState, TextKey, TextModifiers};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
