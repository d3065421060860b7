//! Markup → [`Document`] conversion.
//!
//! Accepts arbitrary markup without validation. Block elements become
//! paragraphs or headings, known formatting elements and CSS declarations
//! become [`InlineStyle`] flags, and anything else is unwrapped so its text
//! survives.

use smol_str::SmolStr;

use super::tokenizer::{StartTag, Token, Tokenizer};
use crate::model::{Alignment, Block, BlockKind, Document, ImageNode, Inline, InlineStyle, TextRun};

/// Elements whose content is dropped entirely.
const SKIPPED: &[&str] = &["script", "style", "head", "title", "template"];

/// Elements that never have content.
const VOID: &[&str] = &[
    "area", "base", "col", "embed", "hr", "input", "link", "meta", "param", "source", "track",
    "wbr",
];

/// Elements that start a new block.
const BLOCKS: &[&str] = &[
    "p",
    "div",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "li",
    "ul",
    "ol",
    "pre",
    "section",
    "article",
    "header",
    "footer",
    "center",
    "figure",
    "table",
    "tr",
];

fn is_block(name: &str) -> bool {
    BLOCKS.contains(&name)
}

/// An open block element.
struct OpenBlock {
    name: SmolStr,
    kind: BlockKind,
    align: Option<Alignment>,
    /// Style stack depth when the element opened.
    style_depth: usize,
}

struct Builder {
    blocks: Vec<Block>,
    current: Option<Block>,
    open_blocks: Vec<OpenBlock>,
    styles: Vec<(SmolStr, InlineStyle)>,
    skipping: Option<SmolStr>,
}

impl Builder {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            current: None,
            open_blocks: Vec::new(),
            styles: Vec::new(),
            skipping: None,
        }
    }

    fn style(&self) -> InlineStyle {
        self.styles
            .last()
            .map(|(_, s)| s.clone())
            .unwrap_or_default()
    }

    fn inherited_align(&self) -> Option<Alignment> {
        self.open_blocks.iter().rev().find_map(|b| b.align)
    }

    /// The block receiving inline content, opening an implicit one if needed.
    fn current_block(&mut self) -> &mut Block {
        if self.current.is_none() {
            let kind = self
                .open_blocks
                .last()
                .map(|b| b.kind)
                .unwrap_or_default();
            let align = self.inherited_align();
            self.current = Some(Block::new(kind).with_align(align));
        }
        self.current.get_or_insert_with(Block::paragraph)
    }

    fn flush(&mut self) {
        if let Some(block) = self.current.take() {
            self.blocks.push(block);
        }
    }

    fn start_block(&mut self, tag: &StartTag) {
        // A nested block supersedes an enclosing one that has no content yet.
        match self.current.as_ref().map(|b| b.inlines.is_empty()) {
            Some(true) => self.current = None,
            Some(false) => self.flush(),
            None => {}
        }

        let kind = BlockKind::from_tag(&tag.name)
            .filter(|k| matches!(k, BlockKind::Heading(_)))
            .or_else(|| self.open_blocks.last().map(|b| b.kind))
            .unwrap_or_default();
        let align = block_alignment(tag).or_else(|| self.inherited_align());

        self.open_blocks.push(OpenBlock {
            name: tag.name.clone(),
            kind,
            align,
            style_depth: self.styles.len(),
        });
        self.current = Some(Block::new(kind).with_align(align));
    }

    fn end_block(&mut self, name: &str) {
        let Some(idx) = self.open_blocks.iter().rposition(|b| b.name == name) else {
            return;
        };
        let depth = self.open_blocks[idx].style_depth;
        self.open_blocks.truncate(idx);
        self.styles.truncate(depth);
        self.flush();
    }

    fn push_inline(&mut self, inline: Inline) {
        self.current_block().inlines.push(inline);
    }

    fn text(&mut self, text: String) {
        if self.current.is_none() && text.trim().is_empty() {
            // Formatting whitespace between blocks.
            return;
        }
        let style = self.style();
        self.push_inline(Inline::Text(TextRun::new(text, style)));
    }

    fn start_tag(&mut self, tag: StartTag) {
        let name = tag.name.as_str();
        if SKIPPED.contains(&name) {
            if !tag.self_closing {
                self.skipping = Some(tag.name.clone());
            }
            return;
        }
        if is_block(name) {
            self.start_block(&tag);
            if tag.self_closing {
                self.end_block(name);
            }
            return;
        }
        match name {
            "br" => self.push_inline(Inline::LineBreak),
            "img" => self.push_inline(Inline::Image(image_node(&tag))),
            _ if VOID.contains(&name) || tag.self_closing => {}
            _ => {
                let mut style = self.style();
                apply_element_style(&tag, &mut style);
                self.styles.push((tag.name.clone(), style));
            }
        }
    }

    fn end_tag(&mut self, name: SmolStr) {
        if is_block(&name) {
            self.end_block(&name);
        } else if let Some(idx) = self.styles.iter().rposition(|(n, _)| *n == name) {
            // Never unwind styles opened outside the current block.
            let floor = self.open_blocks.last().map_or(0, |b| b.style_depth);
            if idx >= floor {
                self.styles.truncate(idx);
            }
        }
    }

    fn feed(&mut self, token: Token) {
        if let Some(skipping) = &self.skipping {
            if matches!(&token, Token::EndTag(name) if name == skipping) {
                self.skipping = None;
            }
            return;
        }
        match token {
            Token::StartTag(tag) => self.start_tag(tag),
            Token::EndTag(name) => self.end_tag(name),
            Token::Text(text) => self.text(text),
            Token::Comment | Token::Declaration => {}
        }
    }

    fn finish(mut self) -> Document {
        self.flush();
        Document::from_blocks(self.blocks)
    }
}

/// Parse markup into a document. Never fails.
pub fn parse_document(markup: &str) -> Document {
    let mut builder = Builder::new();
    for token in Tokenizer::new(markup) {
        builder.feed(token);
    }
    builder.finish()
}

/// Split a `style` attribute into lowercased property names and values.
pub fn style_declarations(style: &str) -> impl Iterator<Item = (String, &str)> {
    style.split(';').filter_map(|decl| {
        let (prop, value) = decl.split_once(':')?;
        let value = value.trim();
        (!value.is_empty()).then(|| (prop.trim().to_ascii_lowercase(), value))
    })
}

fn block_alignment(tag: &StartTag) -> Option<Alignment> {
    if tag.name == "center" {
        return Some(Alignment::Center);
    }
    let from_style = tag.attr("style").and_then(|style| {
        style_declarations(style)
            .filter(|(prop, _)| prop == "text-align")
            .find_map(|(_, value)| Alignment::from_css(value))
    });
    from_style.or_else(|| tag.attr("align").and_then(Alignment::from_css))
}

fn apply_element_style(tag: &StartTag, style: &mut InlineStyle) {
    match tag.name.as_str() {
        "b" | "strong" => style.bold = true,
        "i" | "em" => style.italic = true,
        "u" | "ins" => style.underline = true,
        "font" => {
            if let Some(face) = tag.attr("face") {
                style.font_family = Some(face.trim().into());
            }
            if let Some(size) = tag.attr("size").and_then(legacy_font_size) {
                style.font_size = Some(size.into());
            }
            if let Some(color) = tag.attr("color") {
                style.color = Some(color.trim().into());
            }
        }
        _ => {}
    }

    if let Some(css) = tag.attr("style") {
        for (prop, value) in style_declarations(css) {
            match prop.as_str() {
                "font-weight" => style.bold = is_bold_weight(value),
                "font-style" => style.italic = value.eq_ignore_ascii_case("italic"),
                "text-decoration" | "text-decoration-line" => {
                    style.underline = value.to_ascii_lowercase().contains("underline")
                }
                "font-family" => style.font_family = Some(value.into()),
                "font-size" => style.font_size = Some(value.into()),
                "color" => style.color = Some(value.into()),
                _ => {}
            }
        }
    }
}

fn is_bold_weight(value: &str) -> bool {
    match value.to_ascii_lowercase().as_str() {
        "bold" | "bolder" => true,
        other => other.parse::<u16>().is_ok_and(|w| w >= 600),
    }
}

/// Map `<font size="1".."7">` to the CSS keywords browsers use for them.
pub(crate) fn legacy_font_size(size: &str) -> Option<&'static str> {
    Some(match size.trim() {
        "1" => "x-small",
        "2" => "small",
        "3" => "medium",
        "4" => "large",
        "5" => "x-large",
        "6" => "xx-large",
        "7" => "xxx-large",
        _ => return None,
    })
}

fn image_node(tag: &StartTag) -> ImageNode {
    ImageNode {
        src: tag.attr("src").unwrap_or_default().to_string(),
        alt: tag.attr("alt").map(str::to_string),
        style: tag.attr("style").map(str::to_string),
        draggable: tag
            .attr("draggable")
            .is_some_and(|v| v.is_empty() || v.eq_ignore_ascii_case("true")),
    }
}
