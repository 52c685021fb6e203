//! Inkboard Application
//!
//! The native application shell: windowing, translation of raw window events
//! into core input events, clipboard/drag-drop image intake, and screenshot
//! capture.

mod app;
mod event_handler;
mod shortcuts;

pub use app::{App, AppConfig};
pub use shortcuts::{Shortcut, ShortcutRegistry};
