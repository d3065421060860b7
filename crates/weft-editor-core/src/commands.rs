//! Toolbar commands.
//!
//! [`EditorCommand`] is the semantic operation behind each toolbar control,
//! decoupled from how it was triggered. Front ends that speak in
//! `execCommand`-style names go through [`EditorCommand::parse`].

use std::fmt;

use smol_str::SmolStr;

use crate::error::{EditorError, Result};
use crate::format::{Mark, StyleOp};
use crate::html::legacy_font_size;
use crate::model::{Alignment, BlockKind};

/// All commands the toolbar can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    // === Character formatting ===
    Bold,
    Italic,
    Underline,

    // === Block formatting ===
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
    /// Turn the touched blocks into paragraphs or headings.
    FormatBlock(BlockKind),

    // === Value styles ===
    FontName(SmolStr),
    /// A CSS length such as `18px`.
    FontSize(SmolStr),
    ForeColor(SmolStr),

    // === Insertion ===
    /// Replace the selection with text.
    InsertText(String),
    /// Replace the selection with parsed markup.
    InsertHtml(String),
}

impl EditorCommand {
    /// Parse an `execCommand`-style name and optional value.
    ///
    /// Names match case-insensitively. Value-taking commands reject a missing
    /// or unusable value instead of guessing.
    pub fn parse(name: &str, value: Option<&str>) -> Result<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let required = |command: &str| {
            value.ok_or_else(|| EditorError::invalid_argument(command, "a value is required"))
        };

        Ok(match lower.as_str() {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "underline" => Self::Underline,
            "justifyleft" => Self::JustifyLeft,
            "justifycenter" => Self::JustifyCenter,
            "justifyright" => Self::JustifyRight,
            "formatblock" => {
                let tag = required("formatBlock")?;
                let kind = BlockKind::from_tag(tag).ok_or_else(|| {
                    let reason = format!("`{tag}` is not p or h1-h6");
                    EditorError::invalid_argument("formatBlock", reason)
                })?;
                Self::FormatBlock(kind)
            }
            "fontname" => Self::FontName(css_value("fontName", required("fontName")?)?),
            "fontsize" => {
                let size = required("fontSize")?.trim();
                match legacy_font_size(size) {
                    Some(keyword) => Self::FontSize(keyword.into()),
                    None => Self::FontSize(css_value("fontSize", size)?),
                }
            }
            "forecolor" => Self::ForeColor(css_value("foreColor", required("foreColor")?)?),
            "inserttext" => Self::InsertText(required("insertText")?.to_string()),
            "inserthtml" => Self::InsertHtml(required("insertHTML")?.to_string()),
            _ => return Err(EditorError::UnknownCommand(name.into())),
        })
    }

    /// The `execCommand` name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::JustifyLeft => "justifyLeft",
            Self::JustifyCenter => "justifyCenter",
            Self::JustifyRight => "justifyRight",
            Self::FormatBlock(_) => "formatBlock",
            Self::FontName(_) => "fontName",
            Self::FontSize(_) => "fontSize",
            Self::ForeColor(_) => "foreColor",
            Self::InsertText(_) => "insertText",
            Self::InsertHtml(_) => "insertHTML",
        }
    }

    /// The formatting transformation behind this command, if it is one.
    pub fn style_op(&self) -> Option<StyleOp> {
        Some(match self {
            Self::Bold => StyleOp::Toggle(Mark::Bold),
            Self::Italic => StyleOp::Toggle(Mark::Italic),
            Self::Underline => StyleOp::Toggle(Mark::Underline),
            Self::JustifyLeft => StyleOp::Align(Alignment::Left),
            Self::JustifyCenter => StyleOp::Align(Alignment::Center),
            Self::JustifyRight => StyleOp::Align(Alignment::Right),
            Self::FormatBlock(kind) => StyleOp::Block(*kind),
            Self::FontName(family) => StyleOp::FontFamily(family.clone()),
            Self::FontSize(size) => StyleOp::FontSize(size.clone()),
            Self::ForeColor(color) => StyleOp::Color(color.clone()),
            Self::InsertText(_) | Self::InsertHtml(_) => return None,
        })
    }
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values end up inside a `style` attribute, so they may not break out of it.
fn css_value(command: &str, value: &str) -> Result<SmolStr> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EditorError::invalid_argument(command, "value is empty"));
    }
    if value.contains([';', '"', '<', '>', '{', '}']) {
        return Err(EditorError::invalid_argument(
            command,
            format!("`{value}` is not a plain CSS value"),
        ));
    }
    Ok(value.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    #[test]
    fn test_parse_plain_commands() {
        assert_eq!(EditorCommand::parse("bold", None), Ok(EditorCommand::Bold));
        assert_eq!(
            EditorCommand::parse("justifyCenter", None),
            Ok(EditorCommand::JustifyCenter)
        );
        assert_eq!(EditorCommand::parse("UNDERLINE", None), Ok(EditorCommand::Underline));
    }

    #[test]
    fn test_parse_value_commands() {
        assert_eq!(
            EditorCommand::parse("formatBlock", Some("h2")),
            Ok(EditorCommand::FormatBlock(BlockKind::Heading(
                HeadingLevel::new(2).unwrap()
            )))
        );
        assert_eq!(
            EditorCommand::parse("formatBlock", Some("<p>")),
            Ok(EditorCommand::FormatBlock(BlockKind::Paragraph))
        );
        assert_eq!(
            EditorCommand::parse("fontSize", Some("18px")),
            Ok(EditorCommand::FontSize("18px".into()))
        );
        assert_eq!(
            EditorCommand::parse("fontSize", Some("7")),
            Ok(EditorCommand::FontSize("xxx-large".into()))
        );
        assert_eq!(
            EditorCommand::parse("foreColor", Some(" #FFA500 ")),
            Ok(EditorCommand::ForeColor("#FFA500".into()))
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            EditorCommand::parse("strikeThrough", None),
            Err(EditorError::UnknownCommand(_))
        ));
        assert!(matches!(
            EditorCommand::parse("fontName", None),
            Err(EditorError::InvalidArgument { .. })
        ));
        assert!(matches!(
            EditorCommand::parse("formatBlock", Some("h9")),
            Err(EditorError::InvalidArgument { .. })
        ));
        assert!(matches!(
            EditorCommand::parse("foreColor", Some("red; background: url(x)")),
            Err(EditorError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        let commands = [
            EditorCommand::Italic,
            EditorCommand::JustifyRight,
            EditorCommand::FontName("Georgia".into()),
            EditorCommand::InsertText("{{date}}".into()),
        ];
        for command in commands {
            let value = match &command {
                EditorCommand::FontName(v) => Some(v.to_string()),
                EditorCommand::InsertText(v) => Some(v.clone()),
                _ => None,
            };
            assert_eq!(EditorCommand::parse(command.name(), value.as_deref()), Ok(command));
        }
    }
}
