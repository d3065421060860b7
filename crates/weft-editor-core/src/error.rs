//! Error types for the editor core.

use miette::Diagnostic;
use smol_str::SmolStr;

/// Errors surfaced by the editor shell and its helpers.
///
/// None of these are fatal to the host: the shell is left unchanged whenever
/// one is returned.
#[derive(thiserror::Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditorError {
    /// Formatting commands only exist on the rich-text surface.
    #[error("`{command}` is not available while editing raw markup")]
    #[diagnostic(
        code(weft::command::raw_mode),
        help("switch back to the rich-text view before applying formatting")
    )]
    CommandInRawMode { command: SmolStr },

    /// Raw markup can only be typed into the raw view.
    #[error("raw markup can only be edited in the HTML view")]
    #[diagnostic(
        code(weft::raw::rich_mode),
        help("toggle to the HTML view first")
    )]
    RawEditInRichMode,

    /// The command name is not one the editor understands.
    #[error("unknown editor command `{0}`")]
    #[diagnostic(code(weft::command::unknown))]
    UnknownCommand(SmolStr),

    /// The command needs an argument that was missing or malformed.
    #[error("invalid argument for `{command}`: {reason}")]
    #[diagnostic(code(weft::command::argument))]
    InvalidArgument { command: SmolStr, reason: String },

    /// Variable names end up inside `{{…}}` tokens and must be identifiers.
    #[error("`{0}` is not a valid variable name")]
    #[diagnostic(
        code(weft::variable::invalid),
        help("variable names start with a letter or underscore and contain only letters, digits and underscores")
    )]
    InvalidVariable(SmolStr),

    /// The variable is not offered by the inserter.
    #[error("unknown variable `{0}`")]
    #[diagnostic(code(weft::variable::unknown))]
    UnknownVariable(SmolStr),

    /// Editor configuration could not be loaded.
    #[error("invalid editor configuration: {0}")]
    #[diagnostic(code(weft::config))]
    Config(String),
}

impl EditorError {
    pub(crate) fn invalid_argument(command: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            command: command.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
