//! Translation of raw window events into core input events and commands.

use crate::app::{encode_png, ActiveTextEdit, AppState};
use inkboard_core::entity::{ImageEntity, DEFAULT_PRESSURE};
use inkboard_core::input::WheelUnit;
use inkboard_core::{
    Gesture, Modifiers, PointerButton, PointerDevice, PointerId, PointerInput, RouterEvent,
    TextEditSession, ToolKind, WheelInput,
};
use inkboard_render::{TextEditResult, TextEditState, TextKey, TextModifiers};
use kurbo::{Point, Vec2};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::CursorIcon;

/// Pointer id reserved for the mouse; touch contacts are offset past it.
const MOUSE_POINTER: PointerId = PointerId(0);

/// Pasted/dropped images are fitted into this fraction of the viewport.
const PASTE_VIEWPORT_FRACTION: f64 = 0.6;

/// Pixels per wheel line notch.
const LINE_DELTA_PX: f64 = 20.0;

impl AppState {
    /// Entry point for all raw input events.
    pub(crate) fn handle_input(
        &mut self,
        event: WindowEvent,
        render_cx: &vello::util::RenderContext,
    ) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Point::new(position.x, position.y);
                self.board
                    .pointer_move(MOUSE_POINTER, self.cursor, DEFAULT_PRESSURE);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = map_button(button) else {
                    return;
                };
                match state {
                    ElementState::Pressed => {
                        // Any pointer interaction closes (commits) a live
                        // text session first, like losing focus does.
                        self.commit_text_session();
                        let event = self.board.pointer_down(PointerInput {
                            id: MOUSE_POINTER,
                            device: PointerDevice::Mouse,
                            position: self.cursor,
                            button,
                            pressure: DEFAULT_PRESSURE,
                        });
                        self.apply_router_event(event);
                    }
                    ElementState::Released => {
                        self.board.pointer_up(MOUSE_POINTER);
                        self.update_cursor();
                    }
                }
            }

            WindowEvent::Touch(touch) => self.on_touch(touch),

            WindowEvent::MouseWheel { delta, .. } => {
                // Convert to the browser's sign convention: positive y means
                // scrolling down, and wheel-up zooms in.
                let (delta, unit) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (
                        Vec2::new(-x as f64 * LINE_DELTA_PX, -y as f64 * LINE_DELTA_PX),
                        WheelUnit::Line,
                    ),
                    MouseScrollDelta::PixelDelta(pos) => {
                        (Vec2::new(-pos.x, -pos.y), WheelUnit::Pixel)
                    }
                };
                self.board.wheel(WheelInput {
                    position: self.cursor,
                    delta,
                    unit,
                    modifiers: self.modifiers,
                });
            }

            WindowEvent::ModifiersChanged(mods) => {
                let state = mods.state();
                self.modifiers = Modifiers {
                    shift: state.shift_key(),
                    ctrl: state.control_key(),
                    alt: state.alt_key(),
                    meta: state.super_key(),
                };
            }

            WindowEvent::KeyboardInput { event, .. } => self.on_key(event, render_cx),

            WindowEvent::DroppedFile(path) => self.on_dropped_file(&path),

            WindowEvent::Focused(false) => {
                self.commit_text_session();
            }

            _ => {}
        }
    }

    fn on_touch(&mut self, touch: winit::event::Touch) {
        use winit::event::TouchPhase;

        let id = PointerId(touch.id.wrapping_add(1));
        let position = Point::new(touch.location.x, touch.location.y);
        let pressure = touch
            .force
            .map(|f| f.normalized())
            .unwrap_or(DEFAULT_PRESSURE);

        match touch.phase {
            TouchPhase::Started => {
                self.commit_text_session();
                let event = self.board.pointer_down(PointerInput {
                    id,
                    device: PointerDevice::Touch,
                    position,
                    button: PointerButton::Primary,
                    pressure,
                });
                self.apply_router_event(event);
            }
            TouchPhase::Moved => self.board.pointer_move(id, position, pressure),
            TouchPhase::Ended => self.board.pointer_up(id),
            TouchPhase::Cancelled => self.board.pointer_cancel(),
        }
    }

    fn on_key(&mut self, event: KeyEvent, render_cx: &vello::util::RenderContext) {
        if event.state == ElementState::Released {
            if matches!(event.logical_key, Key::Named(NamedKey::Space)) {
                self.board.gestures.set_space_held(false);
                self.update_cursor();
            }
            return;
        }

        // A live text session consumes the keyboard.
        if self.text_edit.is_some() {
            self.on_text_key(&event);
            return;
        }

        match &event.logical_key {
            Key::Named(NamedKey::Space) => {
                self.board.gestures.set_space_held(true);
                self.update_cursor();
            }
            Key::Named(NamedKey::Escape) => self.board.cancel_active_draw(),
            Key::Named(NamedKey::Delete) => self.board.delete_selected_image(),
            Key::Named(NamedKey::Backspace) => {
                if self.modifiers.command() {
                    self.board.clear_canvas();
                } else {
                    self.board.delete_selected_image();
                }
            }
            Key::Named(NamedKey::F2) => {
                self.theme = self.theme.toggled();
                log::info!("Theme: {:?}", self.theme);
            }
            Key::Character(c) => {
                let key = c.to_ascii_lowercase();
                if self.modifiers.command() {
                    match key.as_str() {
                        "z" if self.modifiers.shift => self.board.redo(),
                        "z" => self.board.undo(),
                        "y" => self.board.redo(),
                        "v" => self.paste_from_clipboard(),
                        "e" => self.export_screenshot(render_cx),
                        _ => {}
                    }
                } else if let Some(kind) = tool_for_key(key.as_str()) {
                    self.board.tool.kind = kind;
                    self.update_cursor();
                }
            }
            _ => {}
        }
    }

    /// Route a key press to the live text editor.
    fn on_text_key(&mut self, event: &KeyEvent) {
        let action_mod = self.modifiers.command();
        let key = match &event.logical_key {
            Key::Named(NamedKey::Escape) => TextKey::Escape,
            Key::Named(NamedKey::Backspace) => TextKey::Backspace,
            Key::Named(NamedKey::Delete) => TextKey::Delete,
            Key::Named(NamedKey::Enter) => TextKey::Enter,
            Key::Named(NamedKey::ArrowLeft) => TextKey::Left,
            Key::Named(NamedKey::ArrowRight) => TextKey::Right,
            Key::Named(NamedKey::ArrowUp) => TextKey::Up,
            Key::Named(NamedKey::ArrowDown) => TextKey::Down,
            Key::Named(NamedKey::Home) => TextKey::Home,
            Key::Named(NamedKey::End) => TextKey::End,
            Key::Named(NamedKey::Space) => TextKey::Character(" ".to_string()),
            Key::Character(c) if action_mod && (c == "v" || c == "V") => {
                // Clipboard text paste; anything unreadable is "nothing".
                let Some(text) = arboard::Clipboard::new()
                    .ok()
                    .and_then(|mut cb| cb.get_text().ok())
                else {
                    return;
                };
                TextKey::Paste(text)
            }
            Key::Character(c) if action_mod && !(c == "a" || c == "A") => {
                // Swallow other shortcuts while editing instead of typing
                // the letter.
                return;
            }
            Key::Character(c) => TextKey::Character(c.to_string()),
            _ => return,
        };
        self.feed_text_key(key);
    }

    /// Feed one editing key to the live session and apply the outcome.
    pub(crate) fn feed_text_key(&mut self, key: TextKey) {
        let mods = TextModifiers {
            shift: self.modifiers.shift,
            ctrl: self.modifiers.ctrl,
            alt: self.modifiers.alt,
            meta: self.modifiers.meta,
        };
        let (font_cx, layout_cx) = self.board_renderer.contexts_mut();
        let Some(edit) = self.text_edit.as_mut() else {
            return;
        };
        match edit.editor.handle_key(key, mods, font_cx, layout_cx) {
            TextEditResult::Handled => {
                edit.session.content = edit.editor.text();
            }
            TextEditResult::Commit => self.commit_text_session(),
            TextEditResult::Cancel => {
                self.text_edit = None;
            }
            TextEditResult::NotHandled => {}
        }
    }

    /// Open a modal text session, committing any previous one first.
    pub(crate) fn open_text_session(&mut self, session: TextEditSession) {
        self.commit_text_session();
        let mut editor = TextEditState::new(&session.content, session.size as f32);
        // Start with the caret at the end of the existing content.
        let (font_cx, layout_cx) = self.board_renderer.contexts_mut();
        editor.driver(font_cx, layout_cx).move_to_text_end();
        self.text_edit = Some(ActiveTextEdit { session, editor });
    }

    /// Commit a live session (Enter / focus loss / next gesture).
    pub(crate) fn commit_text_session(&mut self) {
        if let Some(mut edit) = self.text_edit.take() {
            edit.session.content = edit.editor.text();
            let outcome = edit.session.commit(&mut self.board.scene);
            log::debug!("text session closed: {outcome:?}");
        }
    }

    fn apply_router_event(&mut self, event: Option<RouterEvent>) {
        match event {
            Some(RouterEvent::BeginTextEdit(session)) => {
                self.board.tool.kind = ToolKind::Text;
                self.open_text_session(session);
            }
            Some(RouterEvent::ImageSelected(_)) => {
                self.board.tool.kind = ToolKind::Select;
            }
            Some(RouterEvent::ViewReset) | None => {}
        }
        self.update_cursor();
    }

    /// Clipboard paste: image onto the board, or text into a live session.
    /// Every failure mode degrades silently to "nothing to paste".
    pub(crate) fn paste_from_clipboard(&mut self) {
        if self.text_edit.is_some() {
            if let Some(text) = arboard::Clipboard::new()
                .ok()
                .and_then(|mut cb| cb.get_text().ok())
            {
                self.feed_text_key(TextKey::Paste(text));
            }
            return;
        }

        let image = match arboard::Clipboard::new() {
            Ok(mut clipboard) => clipboard.get_image().ok(),
            Err(e) => {
                log::debug!("clipboard unavailable: {e}");
                None
            }
        };
        let Some(image) = image else {
            log::debug!("paste: no image on clipboard");
            return;
        };

        let width = image.width as u32;
        let height = image.height as u32;
        // Store PNG rather than raw RGBA; far smaller for large pastes.
        let Some(png_data) = encode_png(&image.bytes, width, height) else {
            log::warn!("failed to encode pasted image");
            return;
        };
        self.place_image(png_data, width, height);
        log::info!("Pasted image from clipboard: {width}x{height}");
    }

    fn on_dropped_file(&mut self, path: &std::path::Path) {
        let Ok(bytes) = std::fs::read(path) else {
            log::warn!("could not read dropped file: {path:?}");
            return;
        };
        match image::load_from_memory(&bytes) {
            Ok(decoded) => {
                let (width, height) = decoded.to_rgba8().dimensions();
                self.place_image(bytes, width, height);
                log::info!("Dropped image: {width}x{height}");
            }
            Err(err) => {
                // Not an image (or corrupt): silently ignore the drop.
                log::debug!("dropped file is not a decodable image: {err}");
            }
        }
    }

    /// Size a new image to ~60% of the viewport (in screen terms, so the
    /// apparent size is zoom-independent) and center it in the current view.
    fn place_image(&mut self, data: Vec<u8>, width: u32, height: u32) {
        let view = &self.board.view;
        let viewport = self.board.viewport_size;
        let max_w = viewport.width * PASTE_VIEWPORT_FRACTION / view.scale;
        let max_h = viewport.height * PASTE_VIEWPORT_FRACTION / view.scale;
        let center = view.screen_to_world(Point::new(
            viewport.width / 2.0,
            viewport.height / 2.0,
        ));

        let entity = ImageEntity::new(Point::ZERO, data, width, height)
            .fit_within(max_w, max_h)
            .centered_at(center);
        self.board.scene.add_image(entity);
    }

    /// Capture the current view and save it through a file dialog.
    fn export_screenshot(&mut self, render_cx: &vello::util::RenderContext) {
        let Some(png_data) = self.capture_frame(render_cx) else {
            log::error!("screenshot capture failed");
            return;
        };
        let dialog = rfd::FileDialog::new()
            .set_title("Export Screenshot")
            .set_file_name("whiteboard.png")
            .add_filter("PNG Image", &["png"]);
        if let Some(path) = dialog.save_file() {
            match std::fs::write(&path, &png_data) {
                Ok(()) => log::info!("Exported screenshot to {path:?}"),
                Err(e) => log::error!("Failed to write PNG: {e}"),
            }
        }
    }

    fn update_cursor(&self) {
        let icon = if matches!(
            self.board.gestures.gesture(),
            Gesture::Panning | Gesture::Pinching
        ) {
            CursorIcon::Grabbing
        } else if self.board.gestures.space_held() {
            CursorIcon::Grab
        } else {
            match self.board.tool.kind {
                ToolKind::Select => CursorIcon::Default,
                ToolKind::Text => CursorIcon::Text,
                _ => CursorIcon::Crosshair,
            }
        };
        self.window.set_cursor(winit::window::Cursor::Icon(icon));
    }
}

fn map_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

fn tool_for_key(key: &str) -> Option<ToolKind> {
    match key {
        "s" => Some(ToolKind::Select),
        "p" => Some(ToolKind::Pen),
        "m" => Some(ToolKind::Marker),
        "h" => Some(ToolKind::Highlighter),
        "e" => Some(ToolKind::Eraser),
        "x" => Some(ToolKind::StrokeEraser),
        "t" => Some(ToolKind::Text),
        _ => None,
    }
}
