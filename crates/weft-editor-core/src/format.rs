//! The formatting capability the shell edits through.
//!
//! The shell never reaches into a rendering surface to format text. It hands
//! a [`StyleOp`] and a range to something implementing
//! [`FormattingCapability`], which for the rich view is the [`Document`] tree.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::model::{Alignment, Block, BlockKind, Document, ImageNode, Inline, InlineStyle};
use crate::types::Range;

/// On/off character formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Bold,
    Italic,
    Underline,
}

impl Mark {
    pub const ALL: [Mark; 3] = [Mark::Bold, Mark::Italic, Mark::Underline];

    pub fn is_set(self, style: &InlineStyle) -> bool {
        match self {
            Mark::Bold => style.bold,
            Mark::Italic => style.italic,
            Mark::Underline => style.underline,
        }
    }

    pub fn set(self, style: &mut InlineStyle, on: bool) {
        match self {
            Mark::Bold => style.bold = on,
            Mark::Italic => style.italic = on,
            Mark::Underline => style.underline = on,
        }
    }
}

/// A single formatting transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleOp {
    /// Remove the mark if every character already has it, otherwise add it.
    Toggle(Mark),
    FontFamily(SmolStr),
    FontSize(SmolStr),
    Color(SmolStr),
    Align(Alignment),
    Block(BlockKind),
}

impl StyleOp {
    /// Block-level ops apply to whole blocks, so a caret is enough to target one.
    pub fn is_block_level(&self) -> bool {
        matches!(self, StyleOp::Align(_) | StyleOp::Block(_))
    }
}

/// Editing operations a rich-text surface exposes to the shell.
pub trait FormattingCapability {
    /// Size of the flat offset space.
    fn content_len(&self) -> usize;

    /// Range of the word touching `offset`, if any.
    fn word_range(&self, offset: usize) -> Option<Range>;

    /// Whether every character in `range` carries `mark`. False for a range
    /// with no text.
    fn mark_active(&self, range: Range, mark: Mark) -> bool;

    /// Apply `op` over `range`. Returns true if anything changed.
    fn apply_formatting(&mut self, range: Range, op: &StyleOp) -> bool;

    /// Replace `range` with text, returning the offset after the insertion.
    fn replace_with_text(&mut self, range: Range, text: &str) -> usize;

    /// Replace `range` with parsed content, returning the offset after it.
    fn replace_with_fragment(&mut self, range: Range, fragment: Document) -> usize;

    /// Replace `range` with an image, returning the offset after it.
    fn replace_with_image(&mut self, range: Range, image: ImageNode) -> usize;
}

impl Document {
    /// Apply `f` to every run in `range`, reporting whether any style differed.
    fn restyle(&mut self, range: Range, f: impl Fn(&mut InlineStyle)) -> bool {
        let changed = self.styles_in(range).into_iter().any(|style| {
            let mut updated = style.clone();
            f(&mut updated);
            updated != *style
        });
        if changed {
            self.update_runs(range, f);
        }
        changed
    }

    fn reblock(&mut self, range: Range, f: impl Fn(&mut Block) -> bool) -> bool {
        let mut changed = false;
        self.update_blocks(range, |block| changed |= f(block));
        changed
    }
}

impl FormattingCapability for Document {
    fn content_len(&self) -> usize {
        self.len()
    }

    fn word_range(&self, offset: usize) -> Option<Range> {
        self.word_at(offset)
    }

    fn mark_active(&self, range: Range, mark: Mark) -> bool {
        let styles = self.styles_in(range);
        !styles.is_empty() && styles.into_iter().all(|s| mark.is_set(s))
    }

    fn apply_formatting(&mut self, range: Range, op: &StyleOp) -> bool {
        let range = range.normalize().clamp(self.len());
        match op {
            StyleOp::Toggle(mark) => {
                let on = !self.mark_active(range, *mark);
                self.restyle(range, |s| mark.set(s, on))
            }
            StyleOp::FontFamily(family) => {
                self.restyle(range, |s| s.font_family = Some(family.clone()))
            }
            StyleOp::FontSize(size) => self.restyle(range, |s| s.font_size = Some(size.clone())),
            StyleOp::Color(color) => self.restyle(range, |s| s.color = Some(color.clone())),
            StyleOp::Align(align) => self.reblock(range, |block| {
                let changed = block.align != Some(*align);
                block.align = Some(*align);
                changed
            }),
            StyleOp::Block(kind) => self.reblock(range, |block| {
                let changed = block.kind != *kind;
                block.kind = *kind;
                changed
            }),
        }
    }

    fn replace_with_text(&mut self, range: Range, text: &str) -> usize {
        let range = range.normalize().clamp(self.len());
        self.delete(range);
        self.insert_text(range.start, text, None)
    }

    fn replace_with_fragment(&mut self, range: Range, fragment: Document) -> usize {
        self.replace(range, fragment)
    }

    fn replace_with_image(&mut self, range: Range, image: ImageNode) -> usize {
        let range = range.normalize().clamp(self.len());
        self.delete(range);
        self.insert_inline(range.start, Inline::Image(image))
    }
}
