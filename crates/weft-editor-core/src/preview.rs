//! The host's live preview: content with sample values substituted.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::config::PreviewConfig;
use crate::html::{parse_document, serialize_document};
use crate::variables::Variable;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}").unwrap());

/// What the preview pane shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Preview {
    /// Nothing to render; show the placeholder instead of an empty tree.
    Empty { placeholder: String },
    Rendered { html: String },
}

/// Replace every `{{name}}` whose name has a sample value. Other tokens stay.
pub fn substitute_variables<'a>(content: &'a str, variables: &[Variable]) -> Cow<'a, str> {
    TOKEN.replace_all(content, |caps: &Captures<'_>| {
        let name = &caps[1];
        variables
            .iter()
            .find(|v| v.name == name)
            .and_then(|v| v.value.clone())
            .unwrap_or_else(|| caps[0].to_string())
    })
}

pub fn render_preview(content: &str, variables: &[Variable], config: &PreviewConfig) -> Preview {
    let substituted = substitute_variables(content, variables);
    let html = serialize_document(&parse_document(&substituted));
    if html.is_empty() {
        Preview::Empty {
            placeholder: config.empty_placeholder.clone(),
        }
    } else {
        Preview::Rendered { html }
    }
}

/// `{{name}} → value` lines for the variables that have sample values.
pub fn variable_legend(variables: &[Variable]) -> Vec<String> {
    variables
        .iter()
        .filter_map(|v| {
            let value = v.value.as_deref()?;
            Some(format!("{{{{{}}}}} → {value}", v.name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Variable> {
        vec![
            Variable::new("userName", "John Doe"),
            Variable::new("companyName", "Acme Corporation"),
            Variable {
                name: "date".into(),
                value: None,
            },
        ]
    }

    #[test]
    fn test_substitution_is_global_and_leaves_unknown_tokens() {
        let out = substitute_variables(
            "Hi {{userName}}, from {{companyName}}. Bye {{userName}} {{date}} {{other}}",
            &samples(),
        );
        assert_eq!(
            out,
            "Hi John Doe, from Acme Corporation. Bye John Doe {{date}} {{other}}"
        );
    }

    #[test]
    fn test_empty_content_renders_placeholder() {
        let config = PreviewConfig::default();
        assert_eq!(
            render_preview("", &samples(), &config),
            Preview::Empty {
                placeholder: "Your content will appear here...".into()
            }
        );
        assert!(matches!(
            render_preview("<p></p>", &samples(), &config),
            Preview::Empty { .. }
        ));
        assert_eq!(
            render_preview("<h2></h2>", &samples(), &config),
            Preview::Rendered {
                html: "<h2></h2>".into()
            }
        );
    }

    #[test]
    fn test_rendered_preview() {
        let preview = render_preview(
            "<p>Dear <b>{{userName}}</b></p>",
            &samples(),
            &PreviewConfig::default(),
        );
        insta::assert_snapshot!(
            serde_json::to_string(&preview).unwrap(),
            @r#"{"state":"rendered","html":"<p>Dear <b>John Doe</b></p>"}"#
        );
    }

    #[test]
    fn test_legend() {
        assert_eq!(
            variable_legend(&samples()),
            vec![
                "{{userName}} → John Doe".to_string(),
                "{{companyName}} → Acme Corporation".to_string(),
            ]
        );
    }
}
