//! Live text editing state backed by Parley's PlainEditor.
//!
//! The core owns the session semantics (commit/cancel rules); this type owns
//! the keystroke-level editing and caret state while a session is open.

use parley::editing::{PlainEditor, PlainEditorDriver};
use parley::{FontContext, GenericFamily, LayoutContext, StyleProperty};
use peniko::Brush;
use std::time::{Duration, Instant};

/// Keyboard key for text editing.
#[derive(Debug, Clone, PartialEq)]
pub enum TextKey {
    Character(String),
    Backspace,
    Delete,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Escape,
    /// Clipboard text to insert at the cursor.
    Paste(String),
}

/// Keyboard modifiers for text editing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl TextModifiers {
    /// The action modifier (Ctrl, or Cmd on macOS).
    pub fn action_mod(&self) -> bool {
        if cfg!(target_os = "macos") {
            self.meta
        } else {
            self.ctrl
        }
    }
}

/// Result of handling a text editing event.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEditResult {
    /// Event was handled; text may have changed.
    Handled,
    /// Enter without shift: commit the session.
    Commit,
    /// Escape: discard the session.
    Cancel,
    /// Event was not handled (pass to other handlers).
    NotHandled,
}

/// Editor state for one live text session.
pub struct TextEditState {
    editor: PlainEditor<Brush>,
    cursor_visible: bool,
    start_time: Option<Instant>,
    blink_period: Duration,
}

impl TextEditState {
    /// Create an edit state seeded with the session's current content.
    pub fn new(text: &str, font_size: f32) -> Self {
        let mut editor = PlainEditor::new(font_size);
        editor.set_text(text);
        editor.set_scale(1.0);

        // The renderer swaps in the session's family/weight per frame.
        let styles = editor.edit_styles();
        styles.insert(GenericFamily::SansSerif.into());
        styles.insert(StyleProperty::Brush(Brush::Solid(peniko::Color::BLACK)));

        let mut state = Self {
            editor,
            cursor_visible: true,
            start_time: None,
            blink_period: Duration::from_millis(500),
        };
        state.cursor_reset();
        state
    }

    pub fn editor_mut(&mut self) -> &mut PlainEditor<Brush> {
        &mut self.editor
    }

    /// Create a driver for performing edit operations.
    pub fn driver<'a>(
        &'a mut self,
        font_cx: &'a mut FontContext,
        layout_cx: &'a mut LayoutContext<Brush>,
    ) -> PlainEditorDriver<'a, Brush> {
        self.editor.driver(font_cx, layout_cx)
    }

    /// The current text content.
    pub fn text(&self) -> String {
        self.editor.text().to_string()
    }

    pub fn set_brush(&mut self, brush: Brush) {
        let styles = self.editor.edit_styles();
        styles.insert(StyleProperty::Brush(brush));
    }

    pub fn set_font_size(&mut self, size: f32) {
        let styles = self.editor.edit_styles();
        styles.insert(StyleProperty::FontSize(size));
    }

    /// Restart the caret blink phase (called on every edit).
    pub fn cursor_reset(&mut self) {
        self.start_time = Some(Instant::now());
        self.cursor_visible = true;
    }

    /// Update caret visibility from the blink clock.
    pub fn cursor_blink(&mut self) {
        self.cursor_visible = self.start_time.is_some_and(|start| {
            let elapsed = Instant::now().duration_since(start);
            (elapsed.as_millis() / self.blink_period.as_millis()) % 2 == 0
        });
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Handle one key press. Enter commits, Shift+Enter inserts a newline,
    /// Escape cancels; everything else edits the buffer.
    pub fn handle_key(
        &mut self,
        key: TextKey,
        modifiers: TextModifiers,
        font_cx: &mut FontContext,
        layout_cx: &mut LayoutContext<Brush>,
    ) -> TextEditResult {
        if self.editor.is_composing() {
            return TextEditResult::NotHandled;
        }

        self.cursor_reset();
        let action_mod = modifiers.action_mod();
        let shift = modifiers.shift;

        let mut drv = self.editor.driver(font_cx, layout_cx);

        match key {
            TextKey::Escape => return TextEditResult::Cancel,
            TextKey::Enter => {
                if shift {
                    drv.insert_or_replace_selection("\n");
                } else {
                    return TextEditResult::Commit;
                }
            }
            TextKey::Backspace => {
                if action_mod {
                    drv.backdelete_word();
                } else {
                    drv.backdelete();
                }
            }
            TextKey::Delete => {
                if action_mod {
                    drv.delete_word();
                } else {
                    drv.delete();
                }
            }
            TextKey::Left => {
                if action_mod {
                    if shift {
                        drv.select_word_left();
                    } else {
                        drv.move_word_left();
                    }
                } else if shift {
                    drv.select_left();
                } else {
                    drv.move_left();
                }
            }
            TextKey::Right => {
                if action_mod {
                    if shift {
                        drv.select_word_right();
                    } else {
                        drv.move_word_right();
                    }
                } else if shift {
                    drv.select_right();
                } else {
                    drv.move_right();
                }
            }
            TextKey::Up => {
                if shift {
                    drv.select_up();
                } else {
                    drv.move_up();
                }
            }
            TextKey::Down => {
                if shift {
                    drv.select_down();
                } else {
                    drv.move_down();
                }
            }
            TextKey::Home => {
                if shift {
                    drv.select_to_line_start();
                } else {
                    drv.move_to_line_start();
                }
            }
            TextKey::End => {
                if shift {
                    drv.select_to_line_end();
                } else {
                    drv.move_to_line_end();
                }
            }
            TextKey::Paste(ref text) => {
                drv.insert_or_replace_selection(text);
            }
            TextKey::Character(ref c) => {
                if action_mod && (c == "a" || c == "A") {
                    drv.select_all();
                } else if !action_mod {
                    drv.insert_or_replace_selection(c);
                }
            }
        }

        TextEditResult::Handled
    }
}

impl Default for TextEditState {
    fn default() -> Self {
        Self::new("", 32.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contexts() -> (FontContext, LayoutContext<Brush>) {
        (FontContext::new(), LayoutContext::new())
    }

    #[test]
    fn test_typing_appends() {
        let (mut font_cx, mut layout_cx) = contexts();
        let mut state = TextEditState::new("", 32.0);
        for c in ["h", "i"] {
            let result = state.handle_key(
                TextKey::Character(c.to_string()),
                TextModifiers::default(),
                &mut font_cx,
                &mut layout_cx,
            );
            assert_eq!(result, TextEditResult::Handled);
        }
        assert_eq!(state.text(), "hi");
    }

    #[test]
    fn test_enter_commits_shift_enter_breaks_line() {
        let (mut font_cx, mut layout_cx) = contexts();
        let mut state = TextEditState::new("line", 32.0);

        let shift = TextModifiers {
            shift: true,
            ..TextModifiers::default()
        };
        assert_eq!(
            state.handle_key(TextKey::Enter, shift, &mut font_cx, &mut layout_cx),
            TextEditResult::Handled
        );
        assert_eq!(
            state.handle_key(
                TextKey::Enter,
                TextModifiers::default(),
                &mut font_cx,
                &mut layout_cx
            ),
            TextEditResult::Commit
        );
        assert_eq!(state.text(), "line\n");
    }

    #[test]
    fn test_escape_cancels() {
        let (mut font_cx, mut layout_cx) = contexts();
        let mut state = TextEditState::new("anything", 32.0);
        assert_eq!(
            state.handle_key(
                TextKey::Escape,
                TextModifiers::default(),
                &mut font_cx,
                &mut layout_cx
            ),
            TextEditResult::Cancel
        );
        // Cancel leaves the buffer alone; the session owner just drops it.
        assert_eq!(state.text(), "anything");
    }

    #[test]
    fn test_backspace() {
        let (mut font_cx, mut layout_cx) = contexts();
        let mut state = TextEditState::new("ab", 32.0);
        // Cursor starts at the beginning; move to the end first.
        state.handle_key(TextKey::End, TextModifiers::default(), &mut font_cx, &mut layout_cx);
        state.handle_key(
            TextKey::Backspace,
            TextModifiers::default(),
            &mut font_cx,
            &mut layout_cx,
        );
        assert_eq!(state.text(), "a");
    }

    #[test]
    fn test_paste_inserts() {
        let (mut font_cx, mut layout_cx) = contexts();
        let mut state = TextEditState::new("", 32.0);
        state.handle_key(
            TextKey::Paste("from clipboard".to_string()),
            TextModifiers::default(),
            &mut font_cx,
            &mut layout_cx,
        );
        assert_eq!(state.text(), "from clipboard");
    }
}
