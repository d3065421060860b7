//! Command execution against a formatting capability.
//!
//! [`execute_command`] is the single dispatch point for toolbar commands. It
//! is generic over [`FormattingCapability`], so it never depends on how the
//! rich surface is stored.

use crate::commands::EditorCommand;
use crate::format::{FormattingCapability, StyleOp};
use crate::html::parse_document;
use crate::types::{Range, Selection};

/// Execute a command against `doc` and the current selection.
///
/// Returns true if the content changed. Insertions move the selection to a
/// caret after the inserted content.
pub fn execute_command<D: FormattingCapability + ?Sized>(
    doc: &mut D,
    selection: &mut Option<Selection>,
    command: &EditorCommand,
) -> bool {
    match command {
        EditorCommand::InsertText(text) => {
            let range = insertion_range(doc, *selection);
            let end = doc.replace_with_text(range, text);
            *selection = Some(Selection::collapsed(end));
            !text.is_empty() || !range.is_empty()
        }
        EditorCommand::InsertHtml(markup) => {
            let fragment = parse_document(markup);
            let range = insertion_range(doc, *selection);
            let inserted = !fragment.is_empty();
            let end = doc.replace_with_fragment(range, fragment);
            *selection = Some(Selection::collapsed(end));
            inserted || !range.is_empty()
        }
        other => match other.style_op() {
            Some(op) => execute_style(doc, *selection, &op),
            None => false,
        },
    }
}

/// Where an insertion lands: the selection, or the end of the content.
pub fn insertion_range<D: FormattingCapability + ?Sized>(
    doc: &D,
    selection: Option<Selection>,
) -> Range {
    match selection {
        Some(sel) => sel.clamp(doc.content_len()).to_range(),
        None => Range::caret(doc.content_len()),
    }
}

fn execute_style<D: FormattingCapability + ?Sized>(
    doc: &mut D,
    selection: Option<Selection>,
    op: &StyleOp,
) -> bool {
    // Formatting needs somewhere to apply.
    let Some(selection) = selection else {
        tracing::debug!(?op, "formatting ignored without a selection");
        return false;
    };
    let mut range = selection.clamp(doc.content_len()).to_range();

    // A bare caret formats the word around it.
    if range.is_caret() && !op.is_block_level() {
        match doc.word_range(range.start) {
            Some(word) => range = word,
            None => return false,
        }
    }

    doc.apply_formatting(range, op)
}
