//! weft-editor-core: rich-text template editor logic without framework
//! dependencies.
//!
//! This crate provides:
//! - [`Document`] - structured rich-text tree addressed by flat offsets
//! - [`html`] - lenient markup parsing and canonical serialization
//! - [`EditorCommand`] and [`execute_command`] - toolbar commands over any
//!   [`FormattingCapability`]
//! - [`EditorShell`] - rich/raw view switching, image and variable insertion
//! - [`VariableInserter`] and [`preview`] - `{{name}}` template variables
//! - [`ReferenceRegistry`] - in-memory displayable image references

pub mod commands;
pub mod config;
pub mod error;
pub mod execute;
pub mod format;
pub mod html;
pub mod media;
pub mod model;
pub mod platform;
pub mod preview;
pub mod shell;
pub mod types;
pub mod variables;

pub use commands::EditorCommand;
pub use config::{EditorConfig, PreviewConfig};
pub use error::{EditorError, Result};
pub use execute::execute_command;
pub use format::{FormattingCapability, Mark, StyleOp};
pub use media::{DisplayableRef, ImageFile, ReferenceRegistry, Resource, ScopedRef};
pub use model::{
    Alignment, Block, BlockKind, Document, HeadingLevel, ImageNode, Inline, InlineStyle, TextRun,
};
pub use platform::ChangeNotifier;
pub use preview::{Preview, render_preview, substitute_variables, variable_legend};
pub use shell::{EditorShell, Toolbar, ViewMode};
pub use smol_str::SmolStr;
pub use types::{Range, Selection};
pub use variables::{Variable, VariableInserter};
