//! Conversion between markup strings and the [`Document`](crate::model::Document) tree.
//!
//! Both directions are pure functions. The shell only calls them when the
//! view mode flips or the host replaces the content.

mod parse;
mod serialize;
pub mod tokenizer;

pub(crate) use parse::legacy_font_size;
pub use parse::{parse_document, style_declarations};
pub use serialize::{image_markup, serialize_document, write_document, write_image};
