//! Template variables and the inserter that offers them.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::{EditorError, Result};

/// Variables every inserter offers after the host's own.
pub const DEFAULT_VARIABLES: [&str; 8] = [
    "userName",
    "userEmail",
    "firstName",
    "lastName",
    "companyName",
    "date",
    "time",
    "currentYear",
];

static VARIABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// True for names that can sit inside a `{{…}}` token.
pub fn is_valid_name(name: &str) -> bool {
    VARIABLE_NAME.is_match(name)
}

pub fn validate_name(name: &str) -> Result<&str> {
    if is_valid_name(name) {
        Ok(name)
    } else {
        Err(EditorError::InvalidVariable(name.into()))
    }
}

/// The literal token inserted for `name`.
pub fn token(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

/// A variable the host knows about, with an optional sample value for previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Parse a `name=value` pair; a bare `name` has no sample value.
    pub fn parse_pair(pair: &str) -> Result<Self> {
        let (name, value) = match pair.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.to_string())),
            None => (pair.trim(), None),
        };
        validate_name(name)?;
        Ok(Self {
            name: name.into(),
            value,
        })
    }
}

/// Offers the host's variables plus [`DEFAULT_VARIABLES`] for insertion.
///
/// Holds no state between selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInserter {
    names: Vec<SmolStr>,
}

impl Default for VariableInserter {
    fn default() -> Self {
        Self {
            names: DEFAULT_VARIABLES.into_iter().map(SmolStr::new_static).collect(),
        }
    }
}

impl VariableInserter {
    /// Host names first, then the defaults, keeping the first occurrence of
    /// each name.
    pub fn new<I, S>(host: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<SmolStr> = Vec::new();
        for name in host {
            let name = validate_name(name.as_ref())?;
            if !names.iter().any(|n| n == name) {
                names.push(name.into());
            }
        }
        for name in DEFAULT_VARIABLES {
            if !names.iter().any(|n| n == name) {
                names.push(SmolStr::new_static(name));
            }
        }
        Ok(Self { names })
    }

    pub fn names(&self) -> &[SmolStr] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Hand `name` to `on_insert` exactly once.
    pub fn select(&self, name: &str, on_insert: impl FnOnce(&str)) -> Result<()> {
        if !self.contains(name) {
            return Err(EditorError::UnknownVariable(name.into()));
        }
        tracing::debug!(name, "variable selected");
        on_insert(name);
        Ok(())
    }
}
