//! Structured document model for the rich-text surface.
//!
//! A [`Document`] is a list of [`Block`]s (paragraphs and headings), each a
//! list of [`Inline`]s (styled text runs, images and line breaks). Every
//! toolbar action is a transformation over this tree addressed by flat
//! offsets: one unit per character, image or line break, and one unit for the
//! boundary between two blocks.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::types::Range;

/// Placeholder char used for images in [`Document::plain_text`].
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Heading level, always within 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub fn new(level: u8) -> Option<Self> {
        (1..=6).contains(&level).then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| format!("heading level {level} is outside 1..=6"))
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.0
    }
}

/// Block-level element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    #[default]
    Paragraph,
    Heading(HeadingLevel),
}

impl BlockKind {
    /// The element name used when serializing this block.
    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "p",
            BlockKind::Heading(level) => match level.get() {
                1 => "h1",
                2 => "h2",
                3 => "h3",
                4 => "h4",
                5 => "h5",
                _ => "h6",
            },
        }
    }

    /// Parse a block element name (`p`, `h1`..`h6`, with or without `<>`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().trim_start_matches('<').trim_end_matches('>');
        match tag.to_ascii_lowercase().as_str() {
            "p" | "div" => Some(BlockKind::Paragraph),
            other => {
                let level = other.strip_prefix('h')?.parse::<u8>().ok()?;
                HeadingLevel::new(level).map(BlockKind::Heading)
            }
        }
    }
}

/// Horizontal alignment of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_css(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }

    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            _ => None,
        }
    }
}

/// Character-level formatting of a text run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InlineStyle {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SmolStr>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl InlineStyle {
    /// True when no formatting is applied.
    pub fn is_plain(&self) -> bool {
        *self == InlineStyle::default()
    }

    /// True when the run needs a `<span style>` wrapper.
    pub fn has_span_style(&self) -> bool {
        self.font_family.is_some() || self.font_size.is_some() || self.color.is_some()
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "InlineStyle::is_plain")]
    pub style: InlineStyle,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, InlineStyle::default())
    }
}

/// An inline image element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageNode {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub draggable: bool,
}

impl ImageNode {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: None,
            style: None,
            draggable: false,
        }
    }
}

/// Inline content of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inline {
    Text(TextRun),
    Image(ImageNode),
    LineBreak,
}

impl Inline {
    /// Length in flat offset units.
    pub fn len(&self) -> usize {
        match self {
            Inline::Text(run) => run.text.chars().count(),
            Inline::Image(_) | Inline::LineBreak => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A paragraph or heading.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
    #[serde(default)]
    pub inlines: Vec<Inline>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            align: None,
            inlines: Vec::new(),
        }
    }

    pub fn paragraph() -> Self {
        Self::new(BlockKind::Paragraph)
    }

    pub fn with_inlines(mut self, inlines: Vec<Inline>) -> Self {
        self.inlines = inlines;
        self
    }

    pub fn with_align(mut self, align: Option<Alignment>) -> Self {
        self.align = align;
        self
    }

    /// Length in flat offset units.
    pub fn len(&self) -> usize {
        self.inlines.iter().map(Inline::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text content with images as U+FFFC and line breaks as `\n`.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for inline in &self.inlines {
            match inline {
                Inline::Text(run) => out.push_str(&run.text),
                Inline::Image(_) => out.push(OBJECT_REPLACEMENT),
                Inline::LineBreak => out.push('\n'),
            }
        }
        out
    }

    /// Ensure an inline boundary exists at `offset` and return the index of
    /// the first inline at or after it.
    fn split_at(&mut self, offset: usize) -> usize {
        let mut pos = 0;
        for idx in 0..self.inlines.len() {
            if pos == offset {
                return idx;
            }
            let len = self.inlines[idx].len();
            if offset < pos + len {
                // Only text runs span more than one unit.
                if let Inline::Text(run) = &mut self.inlines[idx] {
                    let byte = byte_offset(&run.text, offset - pos);
                    let tail = run.text.split_off(byte);
                    let style = run.style.clone();
                    self.inlines
                        .insert(idx + 1, Inline::Text(TextRun::new(tail, style)));
                }
                return idx + 1;
            }
            pos += len;
        }
        self.inlines.len()
    }

    fn split_off(&mut self, offset: usize) -> Vec<Inline> {
        let idx = self.split_at(offset);
        self.inlines.split_off(idx)
    }

    fn remove_range(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let a = self.split_at(start);
        let b = self.split_at(end);
        self.inlines.drain(a..b);
    }

    fn insert_inlines(&mut self, offset: usize, items: Vec<Inline>) {
        let idx = self.split_at(offset);
        self.inlines.splice(idx..idx, items);
    }

    /// Apply `f` to the style of every text run inside `start..end`.
    fn update_runs(&mut self, start: usize, end: usize, f: &mut impl FnMut(&mut InlineStyle)) {
        if start >= end {
            return;
        }
        let a = self.split_at(start);
        let b = self.split_at(end);
        for inline in &mut self.inlines[a..b] {
            if let Inline::Text(run) = inline {
                f(&mut run.style);
            }
        }
    }

    /// Drop empty runs and merge neighbours with identical style.
    pub fn normalize(&mut self) {
        let mut merged: Vec<Inline> = Vec::with_capacity(self.inlines.len());
        for inline in self.inlines.drain(..) {
            match inline {
                Inline::Text(run) if run.text.is_empty() => {}
                Inline::Text(run) => match merged.last_mut() {
                    Some(Inline::Text(prev)) if prev.style == run.style => {
                        prev.text.push_str(&run.text)
                    }
                    _ => merged.push(Inline::Text(run)),
                },
                other => merged.push(other),
            }
        }
        self.inlines = merged;
    }
}

/// What occupies a single flat offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unit<'a> {
    Char(char, &'a InlineStyle),
    Image(&'a ImageNode),
    LineBreak,
    BlockBreak,
}

/// The rich-text document tree.
///
/// Always holds at least one block; the empty document is one empty paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::paragraph()],
        }
    }

    /// Build a document from blocks, normalizing them.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut doc = Self { blocks };
        doc.normalize();
        doc
    }

    /// A single paragraph of unstyled text.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.insert_text(0, text, Some(InlineStyle::default()));
        doc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Total length in flat offset units.
    pub fn len(&self) -> usize {
        self.blocks.iter().map(Block::len).sum::<usize>() + self.blocks.len().saturating_sub(1)
    }

    /// True only for the default document: one empty, unaligned paragraph.
    ///
    /// An empty heading or an aligned empty paragraph still has structure to
    /// serialize.
    pub fn is_empty(&self) -> bool {
        matches!(
            self.blocks.as_slice(),
            [only] if only.inlines.is_empty()
                && only.kind == BlockKind::Paragraph
                && only.align.is_none()
        )
    }

    /// Text content, blocks separated by `\n`. Same length as [`Self::len`].
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Flat offset where block `idx` starts.
    pub fn block_start(&self, idx: usize) -> usize {
        self.blocks[..idx.min(self.blocks.len())]
            .iter()
            .map(|b| b.len() + 1)
            .sum()
    }

    /// Map a flat offset to `(block index, offset inside block)`.
    ///
    /// Offsets past the end clamp to the end of the last block.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let mut start = 0;
        for (idx, block) in self.blocks.iter().enumerate() {
            let end = start + block.len();
            if offset <= end {
                return (idx, offset - start);
            }
            start = end + 1;
        }
        let last = self.blocks.len() - 1;
        (last, self.blocks[last].len())
    }

    /// Indices of the blocks touched by `range`.
    pub fn blocks_in(&self, range: Range) -> std::ops::RangeInclusive<usize> {
        let range = range.normalize();
        let (first, _) = self.locate(range.start);
        let (last, _) = self.locate(range.end);
        first..=last
    }

    /// The unit at `offset`, or `None` at the end of the document.
    pub fn unit_at(&self, offset: usize) -> Option<Unit<'_>> {
        if offset >= self.len() {
            return None;
        }
        let (bi, mut local) = self.locate(offset);
        let block = &self.blocks[bi];
        if local == block.len() {
            return Some(Unit::BlockBreak);
        }
        for inline in &block.inlines {
            let len = inline.len();
            if local < len {
                return Some(match inline {
                    Inline::Text(run) => {
                        let c = run.text.chars().nth(local)?;
                        Unit::Char(c, &run.style)
                    }
                    Inline::Image(img) => Unit::Image(img),
                    Inline::LineBreak => Unit::LineBreak,
                });
            }
            local -= len;
        }
        None
    }

    /// Style a character typed at `offset` picks up: the style of the run
    /// before the caret, or the run after it at the start of a block.
    pub fn style_at(&self, offset: usize) -> InlineStyle {
        let (bi, local) = self.locate(offset);
        let mut pos = 0;
        let mut before: Option<&InlineStyle> = None;
        let mut after: Option<&InlineStyle> = None;
        for inline in &self.blocks[bi].inlines {
            if let Inline::Text(run) = inline {
                if pos < local {
                    before = Some(&run.style);
                } else if after.is_none() {
                    after = Some(&run.style);
                }
            }
            pos += inline.len();
        }
        before.or(after).cloned().unwrap_or_default()
    }

    /// Styles of every text run overlapping `range` with at least one char.
    pub fn styles_in(&self, range: Range) -> Vec<&InlineStyle> {
        let range = range.normalize();
        let mut styles = Vec::new();
        let mut block_start = 0;
        for block in &self.blocks {
            let mut pos = block_start;
            for inline in &block.inlines {
                let len = inline.len();
                if let Inline::Text(run) = inline
                    && pos < range.end
                    && pos + len > range.start
                {
                    styles.push(&run.style);
                }
                pos += len;
            }
            block_start = pos + 1;
            if block_start > range.end {
                break;
            }
        }
        styles
    }

    /// Range of the word around `offset`, if the caret touches one.
    pub fn word_at(&self, offset: usize) -> Option<Range> {
        let is_word = |unit: Option<Unit<'_>>| {
            matches!(unit, Some(Unit::Char(c, _)) if c.is_alphanumeric() || c == '_')
        };

        let mut start = offset.min(self.len());
        while start > 0 && is_word(self.unit_at(start - 1)) {
            start -= 1;
        }
        let mut end = offset.min(self.len());
        while is_word(self.unit_at(end)) {
            end += 1;
        }
        (start < end).then(|| Range::new(start, end))
    }

    /// Sources of every image, in document order.
    pub fn image_sources(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().flat_map(|b| {
            b.inlines.iter().filter_map(|i| match i {
                Inline::Image(img) => Some(img.src.as_str()),
                _ => None,
            })
        })
    }

    // === Edits ===

    /// Delete the content in `range`, merging blocks it spans.
    pub fn delete(&mut self, range: Range) {
        let range = range.normalize().clamp(self.len());
        if range.is_empty() {
            return;
        }
        let (sb, so) = self.locate(range.start);
        let (eb, eo) = self.locate(range.end);
        if sb == eb {
            self.blocks[sb].remove_range(so, eo);
        } else {
            let tail = self.blocks[eb].split_off(eo);
            let len = self.blocks[sb].len();
            self.blocks[sb].remove_range(so, len);
            self.blocks.drain(sb + 1..=eb);
            self.blocks[sb].inlines.extend(tail);
        }
        self.normalize();
    }

    /// Insert another document at `offset`, returning the offset after it.
    ///
    /// A single-block fragment is spliced inline. Longer fragments split the
    /// target block: the first fragment block joins the head of the target,
    /// the last one takes over its tail.
    pub fn insert_fragment(&mut self, offset: usize, fragment: Document) -> usize {
        let offset = offset.min(self.len());
        let frag_len = fragment.len();
        let (bi, local) = self.locate(offset);
        let mut blocks = fragment.blocks;

        if blocks.len() <= 1 {
            if let Some(block) = blocks.pop() {
                self.blocks[bi].insert_inlines(local, block.inlines);
            }
        } else {
            let tail = self.blocks[bi].split_off(local);
            let first = blocks.remove(0);
            self.blocks[bi].inlines.extend(first.inlines);
            if let Some(last) = blocks.last_mut() {
                last.inlines.extend(tail);
            }
            let at = bi + 1;
            self.blocks.splice(at..at, blocks);
        }

        self.normalize();
        offset + frag_len
    }

    /// Insert text at `offset`; `\n` starts a new block of the same kind.
    ///
    /// With `style` unset the text inherits [`Self::style_at`].
    pub fn insert_text(&mut self, offset: usize, text: &str, style: Option<InlineStyle>) -> usize {
        let offset = offset.min(self.len());
        let style = style.unwrap_or_else(|| self.style_at(offset));
        let (bi, _) = self.locate(offset);
        let template = &self.blocks[bi];
        let blocks = text
            .split('\n')
            .map(|line| {
                Block::new(template.kind)
                    .with_align(template.align)
                    .with_inlines(vec![Inline::Text(TextRun::new(line, style.clone()))])
            })
            .collect();
        self.insert_fragment(offset, Document { blocks })
    }

    /// Insert a single inline at `offset`, returning the offset after it.
    pub fn insert_inline(&mut self, offset: usize, inline: Inline) -> usize {
        let offset = offset.min(self.len());
        let len = inline.len();
        let (bi, local) = self.locate(offset);
        self.blocks[bi].insert_inlines(local, vec![inline]);
        self.normalize();
        offset + len
    }

    /// Replace `range` with a fragment, returning the offset after it.
    pub fn replace(&mut self, range: Range, fragment: Document) -> usize {
        let range = range.normalize().clamp(self.len());
        self.delete(range);
        self.insert_fragment(range.start, fragment)
    }

    /// Apply `f` to the style of every text run inside `range`.
    pub fn update_runs(&mut self, range: Range, mut f: impl FnMut(&mut InlineStyle)) {
        let range = range.normalize().clamp(self.len());
        if range.is_empty() {
            return;
        }
        let mut block_start = 0;
        for block in &mut self.blocks {
            let len = block.len();
            let start = range.start.max(block_start);
            let end = range.end.min(block_start + len);
            if start < end {
                block.update_runs(start - block_start, end - block_start, &mut f);
            }
            block_start += len + 1;
            if block_start > range.end {
                break;
            }
        }
        self.normalize();
    }

    /// Apply `f` to every block touched by `range`.
    pub fn update_blocks(&mut self, range: Range, mut f: impl FnMut(&mut Block)) {
        for idx in self.blocks_in(range) {
            f(&mut self.blocks[idx]);
        }
    }

    pub fn normalize(&mut self) {
        if self.blocks.is_empty() {
            self.blocks.push(Block::paragraph());
        }
        for block in &mut self.blocks {
            block.normalize();
        }
    }
}

/// Byte offset of the `char_idx`th char, or the string length past the end.
pub(crate) fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> InlineStyle {
        InlineStyle {
            bold: true,
            ..Default::default()
        }
    }

    fn two_paragraphs() -> Document {
        Document::from_blocks(vec![
            Block::paragraph().with_inlines(vec![Inline::Text(TextRun::plain("hello"))]),
            Block::paragraph().with_inlines(vec![Inline::Text(TextRun::plain("world"))]),
        ])
    }

    #[test]
    fn test_len_counts_block_boundaries() {
        let doc = two_paragraphs();
        assert_eq!(doc.len(), 11);
        assert_eq!(doc.plain_text(), "hello\nworld");
        assert_eq!(doc.block_start(1), 6);
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
        assert_eq!(doc.unit_at(0), None);
    }

    #[test]
    fn test_locate() {
        let doc = two_paragraphs();
        assert_eq!(doc.locate(0), (0, 0));
        assert_eq!(doc.locate(5), (0, 5));
        assert_eq!(doc.locate(6), (1, 0));
        assert_eq!(doc.locate(11), (1, 5));
        assert_eq!(doc.locate(99), (1, 5));
    }

    #[test]
    fn test_unit_at() {
        let doc = two_paragraphs();
        assert!(matches!(doc.unit_at(0), Some(Unit::Char('h', _))));
        assert_eq!(doc.unit_at(5), Some(Unit::BlockBreak));
        assert!(matches!(doc.unit_at(6), Some(Unit::Char('w', _))));
        assert_eq!(doc.unit_at(11), None);
    }

    #[test]
    fn test_insert_text_inside_run() {
        let mut doc = Document::from_text("hed");
        let end = doc.insert_text(2, "llo worl", None);
        assert_eq!(end, 10);
        assert_eq!(doc.plain_text(), "hello world");
        // Same style merges back into one run.
        assert_eq!(doc.blocks()[0].inlines.len(), 1);
    }

    #[test]
    fn test_insert_text_with_newline_splits_block() {
        let mut doc = Document::from_text("ab");
        doc.insert_text(1, "x\ny", None);
        assert_eq!(doc.plain_text(), "ax\nyb");
        assert_eq!(doc.blocks().len(), 2);
    }

    #[test]
    fn test_delete_within_block() {
        let mut doc = Document::from_text("hello world");
        doc.delete(Range::new(5, 11));
        assert_eq!(doc.plain_text(), "hello");
    }

    #[test]
    fn test_delete_across_blocks_merges() {
        let mut doc = two_paragraphs();
        doc.delete(Range::new(3, 8));
        assert_eq!(doc.plain_text(), "helrld");
        assert_eq!(doc.blocks().len(), 1);
    }

    #[test]
    fn test_delete_everything_leaves_empty_paragraph() {
        let mut doc = two_paragraphs();
        doc.delete(Range::new(0, doc.len()));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_empty_structured_block_is_not_empty() {
        let mut doc = Document::new();
        doc.update_blocks(Range::caret(0), |b| {
            b.kind = BlockKind::Heading(HeadingLevel::new(1).unwrap())
        });
        assert_eq!(doc.len(), 0);
        assert!(!doc.is_empty());

        let mut doc = Document::new();
        doc.update_blocks(Range::caret(0), |b| b.align = Some(Alignment::Center));
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_update_runs_splits_and_merges() {
        let mut doc = Document::from_text("hello world");
        doc.update_runs(Range::new(0, 5), |s| s.bold = true);
        let inlines = &doc.blocks()[0].inlines;
        assert_eq!(inlines.len(), 2);
        assert_eq!(inlines[0], Inline::Text(TextRun::new("hello", bold())));

        doc.update_runs(Range::new(0, 5), |s| s.bold = false);
        assert_eq!(doc.blocks()[0].inlines.len(), 1);
    }

    #[test]
    fn test_update_runs_across_blocks() {
        let mut doc = two_paragraphs();
        doc.update_runs(Range::new(3, 8), |s| s.italic = true);
        let styles = doc.styles_in(Range::new(3, 8));
        assert_eq!(styles.len(), 2);
        assert!(styles.iter().all(|s| s.italic));
        assert!(!doc.styles_in(Range::new(0, 3))[0].italic);
    }

    #[test]
    fn test_style_at_inherits_previous_run() {
        let mut doc = Document::from_text("ab");
        doc.update_runs(Range::new(0, 1), |s| s.bold = true);
        assert!(doc.style_at(1).bold);
        assert!(doc.style_at(0).bold); // block start takes the following run
        assert!(!doc.style_at(2).bold);
    }

    #[test]
    fn test_word_at() {
        let doc = Document::from_text("say hello_there now");
        assert_eq!(doc.word_at(6), Some(Range::new(4, 15)));
        assert_eq!(doc.word_at(4), Some(Range::new(4, 15)));
        assert_eq!(doc.word_at(15), Some(Range::new(4, 15)));
        assert_eq!(Document::from_text("a  b").word_at(2), None);
    }

    #[test]
    fn test_insert_inline_image() {
        let mut doc = Document::from_text("ab");
        let end = doc.insert_inline(1, Inline::Image(ImageNode::new("blob:x")));
        assert_eq!(end, 2);
        assert_eq!(doc.len(), 3);
        assert!(matches!(doc.unit_at(1), Some(Unit::Image(_))));
        assert_eq!(doc.image_sources().collect::<Vec<_>>(), vec!["blob:x"]);
    }

    #[test]
    fn test_multibyte_split() {
        let mut doc = Document::from_text("héllo wörld");
        doc.update_runs(Range::new(1, 8), |s| s.underline = true);
        assert_eq!(doc.plain_text(), "héllo wörld");
        assert_eq!(doc.blocks()[0].inlines.len(), 3);
    }

    #[test]
    fn test_block_kind_tags() {
        assert_eq!(BlockKind::from_tag("h3").map(|k| k.tag()), Some("h3"));
        assert_eq!(BlockKind::from_tag("<H2>").map(|k| k.tag()), Some("h2"));
        assert_eq!(BlockKind::from_tag("p"), Some(BlockKind::Paragraph));
        assert_eq!(BlockKind::from_tag("h7"), None);
    }
}
