//! Replaying a scripted editing session against an [`EditorShell`].
//!
//! A script is JSON:
//!
//! ```json
//! {
//!   "initial": "<p>Dear ,</p>",
//!   "ops": [
//!     { "op": "select", "anchor": 5, "head": 5 },
//!     { "op": "variable", "name": "userName" },
//!     { "op": "command", "name": "bold" },
//!     { "op": "image", "path": "photo.png", "rect": [100, 50, 200, 150] }
//!   ]
//! }
//! ```
//!
//! Relative image paths resolve against the script's directory.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Deserialize;
use tracing::{info, warn};
use weft_cropper::{PixelRect, Size};
use weft_editor_core::{EditorConfig, EditorShell, ReferenceRegistry, Selection};

use crate::crop::{self, CropRequest};

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub initial: String,
    pub ops: Vec<Op>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    SetContent { markup: String },
    Select { anchor: usize, head: usize },
    ClearSelection,
    Command {
        name: String,
        #[serde(default)]
        value: Option<String>,
    },
    Type { text: String },
    Delete,
    Variable { name: String },
    Toggle,
    EditRaw { markup: String },
    /// Pick an image and confirm the crop.
    Image {
        path: PathBuf,
        #[serde(default)]
        display: Option<Size>,
        /// `[x, y, width, height]` in displayed pixels.
        #[serde(default)]
        rect: Option<[f64; 4]>,
    },
    /// Pick an image and dismiss the cropper.
    CancelCrop { path: PathBuf },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    /// Content after the last op.
    pub content: String,
    /// Every content-changed notification, in order.
    pub notifications: Vec<String>,
    /// Ops that were rejected.
    pub failures: usize,
}

pub fn run_file(path: &Path, config: EditorConfig) -> Result<SessionReport> {
    let json = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    let script: Script = serde_json::from_str(&json)
        .into_diagnostic()
        .wrap_err("parsing session script")?;
    let base = path.parent().unwrap_or(Path::new("."));
    run(&script, config, base)
}

pub fn run(script: &Script, config: EditorConfig, base: &Path) -> Result<SessionReport> {
    let notifications = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&notifications);
    let registry = Rc::new(ReferenceRegistry::new());
    let mut shell = EditorShell::new(
        config,
        &script.initial,
        Rc::clone(&registry),
        move |content: &str| {
            info!(len = content.len(), "content changed");
            sink.borrow_mut().push(content.to_string());
        },
    )?;

    let mut failures = 0;
    for (index, op) in script.ops.iter().enumerate() {
        if let Err(error) = apply(&mut shell, &registry, base, op) {
            warn!(index, ?op, "op rejected: {error}");
            failures += 1;
        }
    }

    let content = shell.content().into_owned();
    drop(shell);
    let notifications = notifications.take();
    Ok(SessionReport {
        content,
        notifications,
        failures,
    })
}

fn apply<N: weft_editor_core::ChangeNotifier>(
    shell: &mut EditorShell<N>,
    registry: &Rc<ReferenceRegistry>,
    base: &Path,
    op: &Op,
) -> Result<()> {
    match op {
        Op::SetContent { markup } => shell.set_content(markup),
        Op::Select { anchor, head } => shell.set_selection(Some(Selection::new(*anchor, *head))),
        Op::ClearSelection => shell.set_selection(None),
        Op::Command { name, value } => {
            shell.apply_named_command(name, value.as_deref())?;
        }
        Op::Type { text } => {
            shell.type_text(text)?;
        }
        Op::Delete => {
            shell.delete_selection()?;
        }
        Op::Variable { name } => shell.insert_variable(name)?,
        Op::Toggle => {
            let mode = shell.toggle_view_mode();
            info!(?mode, "toggled view");
        }
        Op::EditRaw { markup } => shell.edit_raw(markup.as_str())?,
        Op::Image {
            path,
            display,
            rect,
        } => {
            let file = crop::read_image_file(&base.join(path))?;
            if !shell.handle_image_selected(file) {
                return Ok(());
            }
            let Some(file) = shell.pending_image().cloned() else {
                return Ok(());
            };
            let request = CropRequest {
                display: *display,
                rect: rect.map(|[x, y, w, h]| PixelRect::new(x, y, w, h)),
            };
            let config = shell.config().clone();
            match crop::run(file, registry, &config, &request) {
                Ok(cropped) => shell.handle_crop_result(cropped.reference),
                Err(error) => {
                    shell.handle_crop_cancelled();
                    return Err(error);
                }
            }
        }
        Op::CancelCrop { path } => {
            let file = crop::read_image_file(&base.join(path))?;
            if shell.handle_image_selected(file) {
                shell.handle_crop_cancelled();
            }
        }
    }
    Ok(())
}
