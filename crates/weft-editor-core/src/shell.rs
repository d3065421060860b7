//! The editor shell: toolbar, rich/raw view switching, image and variable
//! insertion.
//!
//! Exactly one representation of the content is authoritative at a time. In
//! rich mode that is the [`Document`]; in raw mode it is the markup string.
//! Conversions happen only when the mode flips or the host pushes content.

use std::borrow::Cow;
use std::collections::HashSet;
use std::rc::Rc;

use serde::Serialize;
use smol_str::{SmolStr, format_smolstr};

use crate::commands::EditorCommand;
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::execute::{execute_command, insertion_range};
use crate::format::{FormattingCapability, Mark};
use crate::html::{image_markup, parse_document, serialize_document};
use crate::media::{DisplayableRef, ImageFile, ReferenceRegistry, image_node};
use crate::model::{Alignment, BlockKind, Document, HeadingLevel};
use crate::platform::ChangeNotifier;
use crate::types::Selection;
use crate::variables::{VariableInserter, token, validate_name};

/// Which view the shell is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Rich,
    Raw,
}

#[derive(Debug)]
struct RichSurface {
    doc: Document,
    selection: Option<Selection>,
    /// The markup the document was parsed from, until the first edit.
    pristine: Option<String>,
}

impl RichSurface {
    fn parse(markup: &str) -> Self {
        Self {
            doc: parse_document(markup),
            selection: None,
            pristine: Some(markup.to_string()),
        }
    }

    fn content(&self) -> Cow<'_, str> {
        match &self.pristine {
            Some(markup) => Cow::Borrowed(markup),
            None => Cow::Owned(serialize_document(&self.doc)),
        }
    }
}

#[derive(Debug)]
enum Surface {
    Rich(RichSurface),
    Raw(String),
}

/// One heading entry in the toolbar menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingEntry {
    pub level: HeadingLevel,
    pub tag: &'static str,
    pub label: String,
    /// Font size used to preview the entry inside the menu.
    pub preview_size: SmolStr,
}

/// Everything a front end needs to draw the toolbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolbar {
    pub marks: Vec<Mark>,
    pub headings: Vec<HeadingEntry>,
    pub font_sizes: Vec<SmolStr>,
    pub font_families: Vec<SmolStr>,
    pub colors: Vec<SmolStr>,
    pub alignments: Vec<Alignment>,
    pub variables: Vec<SmolStr>,
    /// Label of the view toggle: the mode it switches to.
    pub view_toggle: &'static str,
}

/// The editor component.
///
/// Owns every displayable reference it inserts and releases them once they no
/// longer occur in the content, or when the shell is dropped.
pub struct EditorShell<N: ChangeNotifier = ()> {
    config: EditorConfig,
    surface: Surface,
    registry: Rc<ReferenceRegistry>,
    notifier: N,
    /// Last content reported to or received from the host.
    last_content: String,
    pending_image: Option<ImageFile>,
    inserter: VariableInserter,
    owned_refs: Vec<DisplayableRef>,
}

impl<N: ChangeNotifier> EditorShell<N> {
    pub fn new(
        config: EditorConfig,
        initial: &str,
        registry: Rc<ReferenceRegistry>,
        notifier: N,
    ) -> Result<Self> {
        config.validate()?;
        let inserter = VariableInserter::new(config.variables.iter().map(|v| v.name.as_str()))?;
        Ok(Self {
            config,
            surface: Surface::Rich(RichSurface::parse(initial)),
            registry,
            notifier,
            last_content: initial.to_string(),
            pending_image: None,
            inserter,
            owned_refs: Vec::new(),
        })
    }

    // === Content ===

    /// The current content string: serialized markup in rich mode, the raw
    /// text in raw mode.
    pub fn content(&self) -> Cow<'_, str> {
        match &self.surface {
            Surface::Rich(rich) => rich.content(),
            Surface::Raw(raw) => Cow::Borrowed(raw),
        }
    }

    /// Replace the content from the host side.
    ///
    /// The host already knows this value, so no notification is sent.
    pub fn set_content(&mut self, markup: &str) {
        if markup == self.last_content {
            return;
        }
        match &mut self.surface {
            Surface::Rich(rich) => *rich = RichSurface::parse(markup),
            Surface::Raw(raw) => *raw = markup.to_string(),
        }
        self.last_content = markup.to_string();
        self.release_orphans();
    }

    pub fn view_mode(&self) -> ViewMode {
        match self.surface {
            Surface::Rich(_) => ViewMode::Rich,
            Surface::Raw(_) => ViewMode::Raw,
        }
    }

    /// The document tree, in rich mode.
    pub fn document(&self) -> Option<&Document> {
        match &self.surface {
            Surface::Rich(rich) => Some(&rich.doc),
            Surface::Raw(_) => None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn registry(&self) -> &Rc<ReferenceRegistry> {
        &self.registry
    }

    /// Flip between the rich surface and the raw markup view.
    ///
    /// The outgoing view becomes the source of truth for the incoming one.
    pub fn toggle_view_mode(&mut self) -> ViewMode {
        let next = match &self.surface {
            Surface::Rich(rich) => Surface::Raw(rich.content().into_owned()),
            Surface::Raw(raw) => Surface::Rich(RichSurface::parse(raw)),
        };
        self.surface = next;
        tracing::debug!(mode = ?self.view_mode(), "view mode toggled");
        if self.view_mode() == ViewMode::Rich {
            self.release_orphans();
        }
        self.notify();
        self.view_mode()
    }

    /// Placeholder text to show, if the current view is empty.
    pub fn placeholder(&self) -> Option<&str> {
        if !self.content().is_empty() {
            return None;
        }
        Some(match self.surface {
            Surface::Rich(_) => self.config.placeholder.as_str(),
            Surface::Raw(_) => self.config.raw_placeholder.as_str(),
        })
    }

    pub fn placeholder_visible(&self) -> bool {
        self.placeholder().is_some()
    }

    pub fn toolbar(&self) -> Toolbar {
        let headings = self
            .config
            .heading_levels
            .iter()
            .map(|&level| HeadingEntry {
                level,
                tag: BlockKind::Heading(level).tag(),
                label: format!("Heading {}", level.get()),
                preview_size: format_smolstr!("{}px", 20 - 2 * u32::from(level.get())),
            })
            .collect();
        Toolbar {
            marks: Mark::ALL.to_vec(),
            headings,
            font_sizes: self.config.font_sizes.clone(),
            font_families: self.config.font_families.clone(),
            colors: self.config.colors.clone(),
            alignments: vec![Alignment::Left, Alignment::Center, Alignment::Right],
            variables: self.inserter.names().to_vec(),
            view_toggle: match self.surface {
                Surface::Rich(_) => "HTML",
                Surface::Raw(_) => "Preview",
            },
        }
    }

    // === Rich surface editing ===

    pub fn selection(&self) -> Option<Selection> {
        match &self.surface {
            Surface::Rich(rich) => rich.selection,
            Surface::Raw(_) => None,
        }
    }

    /// Move the rich-surface selection. Ignored in raw mode.
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        if let Surface::Rich(rich) = &mut self.surface {
            let len = rich.doc.content_len();
            rich.selection = selection.map(|s| s.clamp(len));
        }
    }

    /// Run a toolbar command. Returns whether the content changed.
    pub fn apply_command(&mut self, command: &EditorCommand) -> Result<bool> {
        let Surface::Rich(rich) = &mut self.surface else {
            return Err(EditorError::CommandInRawMode {
                command: command.name().into(),
            });
        };
        let changed = execute_command(&mut rich.doc, &mut rich.selection, command);
        tracing::debug!(%command, changed, "command applied");
        if changed {
            rich.pristine = None;
            self.after_rich_edit();
        }
        Ok(changed)
    }

    /// Run a command given by its `execCommand` name.
    pub fn apply_named_command(&mut self, name: &str, value: Option<&str>) -> Result<bool> {
        let command = EditorCommand::parse(name, value)?;
        self.apply_command(&command)
    }

    /// Type text over the selection.
    pub fn type_text(&mut self, text: &str) -> Result<bool> {
        self.apply_command(&EditorCommand::InsertText(text.to_string()))
    }

    /// Delete the selected content.
    pub fn delete_selection(&mut self) -> Result<bool> {
        let Surface::Rich(rich) = &mut self.surface else {
            return Err(EditorError::CommandInRawMode {
                command: "delete".into(),
            });
        };
        let Some(selection) = rich.selection.filter(|s| !s.is_collapsed()) else {
            return Ok(false);
        };
        rich.doc.delete(selection.to_range());
        rich.selection = Some(Selection::collapsed(selection.start()));
        rich.pristine = None;
        self.after_rich_edit();
        Ok(true)
    }

    // === Raw view editing ===

    /// Replace the raw markup text.
    pub fn edit_raw(&mut self, text: impl Into<String>) -> Result<()> {
        let Surface::Raw(raw) = &mut self.surface else {
            return Err(EditorError::RawEditInRichMode);
        };
        *raw = text.into();
        self.notify();
        Ok(())
    }

    // === Variables ===

    pub fn variable_inserter(&self) -> &VariableInserter {
        &self.inserter
    }

    /// Insert `{{name}}`: over the selection in rich mode (or at the end
    /// without one), appended to the text in raw mode.
    pub fn insert_variable(&mut self, name: &str) -> Result<()> {
        let token = token(validate_name(name)?);
        match &mut self.surface {
            Surface::Rich(_) => {
                self.apply_command(&EditorCommand::InsertText(token))?;
            }
            Surface::Raw(raw) => {
                raw.push_str(&token);
                self.notify();
            }
        }
        Ok(())
    }

    // === Images ===

    /// A file was picked. Non-images are dropped without opening the cropper.
    pub fn handle_image_selected(&mut self, file: ImageFile) -> bool {
        if !file.is_image() {
            tracing::debug!(
                name = %file.name,
                mime_type = %file.mime_type,
                "ignoring non-image file"
            );
            return false;
        }
        tracing::debug!(name = %file.name, "image selected, opening cropper");
        self.pending_image = Some(file);
        true
    }

    /// The image waiting to be cropped.
    pub fn pending_image(&self) -> Option<&ImageFile> {
        self.pending_image.as_ref()
    }

    pub fn cropper_open(&self) -> bool {
        self.pending_image.is_some()
    }

    /// Insert the cropped image and close the cropper.
    ///
    /// The shell takes ownership of `reference`.
    pub fn handle_crop_result(&mut self, reference: DisplayableRef) {
        let node = image_node(&reference, &self.config.image_style);
        self.owned_refs.push(reference);
        self.pending_image = None;

        match &mut self.surface {
            Surface::Rich(rich) => {
                let range = insertion_range(&rich.doc, rich.selection);
                let end = rich.doc.replace_with_image(range, node);
                rich.selection = Some(Selection::collapsed(end));
                rich.pristine = None;
                self.after_rich_edit();
            }
            Surface::Raw(raw) => {
                raw.push_str(&image_markup(&node));
                self.notify();
            }
        }
    }

    pub fn handle_crop_cancelled(&mut self) {
        tracing::debug!("crop cancelled");
        self.pending_image = None;
    }

    // === Internals ===

    fn after_rich_edit(&mut self) {
        self.release_orphans();
        self.notify();
    }

    /// Report the content if it differs from what the host last saw.
    fn notify(&mut self) {
        let content = self.content();
        if content == self.last_content {
            return;
        }
        let content = content.into_owned();
        self.notifier.content_changed(&content);
        self.last_content = content;
    }

    /// Release owned references the content no longer mentions.
    ///
    /// Raw text is left alone while it is being typed; its references are
    /// checked once it is parsed again.
    fn release_orphans(&mut self) {
        if self.owned_refs.is_empty() {
            return;
        }
        let parsed;
        let doc = match &self.surface {
            Surface::Rich(rich) => &rich.doc,
            Surface::Raw(raw) => {
                parsed = parse_document(raw);
                &parsed
            }
        };
        let live: HashSet<&str> = doc.image_sources().collect();
        let registry = &self.registry;
        self.owned_refs.retain(|reference| {
            let keep = live.contains(reference.as_str());
            if !keep {
                tracing::debug!(%reference, "releasing image no longer in content");
                registry.release(reference);
            }
            keep
        });
    }
}

impl<N: ChangeNotifier> Drop for EditorShell<N> {
    fn drop(&mut self) {
        for reference in self.owned_refs.drain(..) {
            self.registry.release(&reference);
        }
    }
}

impl<N: ChangeNotifier> std::fmt::Debug for EditorShell<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorShell")
            .field("mode", &self.view_mode())
            .field("content", &self.content())
            .field("pending_image", &self.pending_image.as_ref().map(|i| &i.name))
            .field("owned_refs", &self.owned_refs)
            .finish_non_exhaustive()
    }
}
