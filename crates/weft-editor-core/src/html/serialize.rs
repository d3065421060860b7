//! [`Document`] → markup conversion.
//!
//! Output is canonical: one wrapper order per style, no redundant elements,
//! so parsing the output and serializing again yields the same string.

use pulldown_cmark_escape::{FmtWriter, StrWrite, escape_html, escape_html_body_text};

use crate::model::{Block, Document, ImageNode, Inline, InlineStyle, TextRun};

/// Serialize a document to markup. The empty document is the empty string.
pub fn serialize_document(doc: &Document) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_document(&mut FmtWriter(&mut out), doc);
    out
}

/// Markup for a single image element.
pub fn image_markup(img: &ImageNode) -> String {
    let mut out = String::new();
    let _ = write_image(&mut FmtWriter(&mut out), img);
    out
}

pub fn write_document<W: StrWrite>(w: &mut W, doc: &Document) -> Result<(), W::Error> {
    if doc.is_empty() {
        return Ok(());
    }
    for block in doc.blocks() {
        write_block(w, block)?;
    }
    Ok(())
}

fn write_block<W: StrWrite>(w: &mut W, block: &Block) -> Result<(), W::Error> {
    let tag = block.kind.tag();
    w.write_str("<")?;
    w.write_str(tag)?;
    if let Some(align) = block.align {
        w.write_str(" style=\"text-align: ")?;
        w.write_str(align.as_css())?;
        w.write_str(";\"")?;
    }
    w.write_str(">")?;
    for inline in &block.inlines {
        match inline {
            Inline::Text(run) => write_run(w, run)?,
            Inline::Image(img) => write_image(w, img)?,
            Inline::LineBreak => w.write_str("<br>")?,
        }
    }
    w.write_str("</")?;
    w.write_str(tag)?;
    w.write_str(">")
}

fn write_run<W: StrWrite>(w: &mut W, run: &TextRun) -> Result<(), W::Error> {
    let style = &run.style;
    if style.has_span_style() {
        w.write_str("<span style=\"")?;
        escape_html(&mut *w, &span_css(style))?;
        w.write_str("\">")?;
    }
    let marks = [(style.bold, "b"), (style.italic, "i"), (style.underline, "u")];
    for (_, tag) in marks.iter().filter(|(on, _)| *on) {
        w.write_str("<")?;
        w.write_str(tag)?;
        w.write_str(">")?;
    }

    escape_html_body_text(&mut *w, &run.text)?;

    for (_, tag) in marks.iter().rev().filter(|(on, _)| *on) {
        w.write_str("</")?;
        w.write_str(tag)?;
        w.write_str(">")?;
    }
    if style.has_span_style() {
        w.write_str("</span>")?;
    }
    Ok(())
}

fn span_css(style: &InlineStyle) -> String {
    let decls = [
        ("font-family", &style.font_family),
        ("font-size", &style.font_size),
        ("color", &style.color),
    ];
    decls
        .iter()
        .filter_map(|(prop, value)| value.as_ref().map(|v| format!("{prop}: {v};")))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn write_image<W: StrWrite>(w: &mut W, img: &ImageNode) -> Result<(), W::Error> {
    w.write_str("<img src=\"")?;
    escape_html(&mut *w, &img.src)?;
    w.write_str("\"")?;
    if let Some(alt) = &img.alt {
        w.write_str(" alt=\"")?;
        escape_html(&mut *w, alt)?;
        w.write_str("\"")?;
    }
    if let Some(style) = &img.style {
        w.write_str(" style=\"")?;
        escape_html(&mut *w, style)?;
        w.write_str("\"")?;
    }
    if img.draggable {
        w.write_str(" draggable=\"true\"")?;
    }
    w.write_str(" />")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, BlockKind, HeadingLevel};

    fn styled(text: &str, f: impl FnOnce(&mut InlineStyle)) -> Inline {
        let mut style = InlineStyle::default();
        f(&mut style);
        Inline::Text(TextRun::new(text, style))
    }

    #[test]
    fn test_empty_document_is_empty_string() {
        assert_eq!(serialize_document(&Document::new()), "");
    }

    #[test]
    fn test_paragraph_with_marks() {
        let doc = Document::from_blocks(vec![Block::paragraph().with_inlines(vec![
            Inline::Text(TextRun::plain("a ")),
            styled("b", |s| {
                s.bold = true;
                s.underline = true;
            }),
            styled(" & c", |s| s.color = Some("#FF0000".into())),
        ])]);
        insta::assert_snapshot!(
            serialize_document(&doc),
            @r#"<p>a <b><u>b</u></b><span style="color: #FF0000;"> &amp; c</span></p>"#
        );
    }

    #[test]
    fn test_heading_alignment() {
        let doc = Document::from_blocks(vec![
            Block::new(BlockKind::Heading(HeadingLevel::new(1).unwrap()))
                .with_align(Some(Alignment::Center))
                .with_inlines(vec![Inline::Text(TextRun::plain("Title"))]),
        ]);
        insta::assert_snapshot!(
            serialize_document(&doc),
            @r#"<h1 style="text-align: center;">Title</h1>"#
        );
    }

    #[test]
    fn test_image_markup() {
        let img = ImageNode {
            src: "blob:weft/3".into(),
            alt: None,
            style: Some("max-width: 100%; height: auto;".into()),
            draggable: true,
        };
        insta::assert_snapshot!(
            image_markup(&img),
            @r#"<img src="blob:weft/3" style="max-width: 100%; height: auto;" draggable="true" />"#
        );
    }

    #[test]
    fn test_span_combines_declarations() {
        let doc = Document::from_blocks(vec![Block::paragraph().with_inlines(vec![styled(
            "x",
            |s| {
                s.font_family = Some("Times New Roman".into());
                s.font_size = Some("18px".into());
                s.italic = true;
            },
        )])]);
        assert_eq!(
            serialize_document(&doc),
            "<p><span style=\"font-family: Times New Roman; font-size: 18px;\"><i>x</i></span></p>"
        );
    }
}
