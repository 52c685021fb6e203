//! Keyboard shortcut registry and documentation.

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("V", true, false, "Paste image or text"),
            Shortcut::new("E", true, false, "Export screenshot to PNG"),
            Shortcut::new("Backspace", true, false, "Clear canvas"),
            Shortcut::new("Delete", false, false, "Delete selected image"),
            Shortcut::new("Escape", false, false, "Cancel stroke / text edit"),
            Shortcut::new("Space", false, false, "Hold to pan"),
            Shortcut::new("F2", false, false, "Toggle light/dark theme"),
            Shortcut::new("S", false, false, "Select tool"),
            Shortcut::new("P", false, false, "Pen"),
            Shortcut::new("M", false, false, "Marker"),
            Shortcut::new("H", false, false, "Highlighter"),
            Shortcut::new("E", false, false, "Eraser"),
            Shortcut::new("X", false, false, "Stroke eraser"),
            Shortcut::new("T", false, false, "Text"),
        ]
    }

    /// Print all shortcuts to the console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
