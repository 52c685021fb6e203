//! Modal text-edit session.
//!
//! While a session is live, the edited content exists only here; the scene
//! store is untouched until the session commits. Committing an edit of an
//! existing entity overwrites it in place at its original index, preserving
//! z-order; committing new text appends it.

use crate::entity::{FontFamily, TextAlign, TextEntity};
use crate::scene::SceneStore;
use crate::theme::InkColor;
use crate::tools::ToolConfig;
use kurbo::Point;
use peniko::Color;

/// What happened when a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A text entity was written to the scene.
    Committed,
    /// Nothing was written (cancelled, or the content was blank).
    Discarded,
}

/// A live text-editing session.
#[derive(Debug, Clone)]
pub struct TextEditSession {
    /// World anchor for the text.
    pub anchor: Point,
    /// Index of the entity being edited in place, if any.
    pub existing: Option<usize>,
    /// Editable content; the shell's editor keeps this in sync.
    pub content: String,
    pub size: f64,
    pub align: TextAlign,
    pub font: FontFamily,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub fill: InkColor,
    pub highlight: Option<Color>,
}

impl TextEditSession {
    /// Start a session for new text at a world point, styled from the
    /// toolbar's text defaults.
    pub fn new_at(anchor: Point, tool: &ToolConfig) -> Self {
        Self {
            anchor,
            existing: None,
            content: String::new(),
            size: tool.text_size,
            align: tool.text_align,
            font: tool.text_font,
            bold: tool.text_bold,
            italic: tool.text_italic,
            underline: tool.text_underline,
            strikethrough: tool.text_strikethrough,
            fill: tool.text_color.into(),
            highlight: tool.text_highlight,
        }
    }

    /// Start an edit-in-place session for an existing entity, carrying over
    /// its anchor, content, and style.
    pub fn edit_existing(index: usize, entity: &TextEntity) -> Self {
        Self {
            anchor: entity.anchor,
            existing: Some(index),
            content: entity.content.clone(),
            size: entity.size,
            align: entity.align,
            font: entity.font,
            bold: entity.bold,
            italic: entity.italic,
            underline: entity.underline,
            strikethrough: entity.strikethrough,
            fill: entity.fill,
            highlight: entity.highlight,
        }
    }

    /// Build the committed entity from the session state.
    fn into_entity(self) -> TextEntity {
        let mut entity = TextEntity::new(self.anchor, self.content, self.size);
        entity.align = self.align;
        entity.font = self.font;
        entity.bold = self.bold;
        entity.italic = self.italic;
        entity.underline = self.underline;
        entity.strikethrough = self.strikethrough;
        entity.fill = self.fill;
        entity.highlight = self.highlight;
        entity
    }

    /// Commit the session. Whitespace-only content commits nothing and
    /// leaves any existing entity untouched.
    pub fn commit(self, scene: &mut SceneStore) -> CommitOutcome {
        if self.content.trim().is_empty() {
            return CommitOutcome::Discarded;
        }
        match self.existing {
            Some(index) => {
                let entity = self.into_entity();
                scene.replace_text(index, entity);
            }
            None => {
                scene.add_text(self.into_entity());
            }
        }
        CommitOutcome::Committed
    }
}
