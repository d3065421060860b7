//! Image files and displayable references.
//!
//! A [`DisplayableRef`] is an in-memory handle (`blob:weft/<n>`) usable as an
//! image `src` without durable storage. The [`ReferenceRegistry`] mints and
//! resolves them; nothing is freed unless someone releases it, so long-lived
//! holders use [`ScopedRef`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use bytes::Bytes;
use smol_str::{SmolStr, format_smolstr};

use crate::model::ImageNode;

/// Scheme prefix of every reference this crate mints.
pub const REFERENCE_PREFIX: &str = "blob:weft/";

/// A file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: SmolStr,
    /// Declared MIME type. Nothing sniffs the bytes.
    pub mime_type: SmolStr,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(
        name: impl Into<SmolStr>,
        mime_type: impl Into<SmolStr>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Only files declared as `image/*` are accepted for cropping.
    pub fn is_image(&self) -> bool {
        self.mime_type
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
    }
}

/// Opaque handle to bytes held by a [`ReferenceRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayableRef(SmolStr);

impl DisplayableRef {
    /// Recognize a reference minted by a registry.
    pub fn parse(s: &str) -> Option<Self> {
        let id = s.strip_prefix(REFERENCE_PREFIX)?;
        (!id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())).then(|| Self(s.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DisplayableRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Bytes behind a live reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub mime_type: SmolStr,
    pub bytes: Bytes,
}

/// Mints and resolves displayable references.
///
/// Single-threaded: shared through `Rc` between the shell and the cropper.
#[derive(Debug, Default)]
pub struct ReferenceRegistry {
    next_id: Cell<u64>,
    live: RefCell<HashMap<DisplayableRef, Resource>>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, bytes: Bytes, mime_type: &str) -> DisplayableRef {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let reference = DisplayableRef(format_smolstr!("{REFERENCE_PREFIX}{id}"));
        tracing::trace!(%reference, len = bytes.len(), mime_type, "minted reference");
        self.live.borrow_mut().insert(
            reference.clone(),
            Resource {
                mime_type: mime_type.into(),
                bytes,
            },
        );
        reference
    }

    /// Free a reference. Returns false if it was not live.
    pub fn release(&self, reference: &DisplayableRef) -> bool {
        let released = self.live.borrow_mut().remove(reference).is_some();
        if released {
            tracing::trace!(%reference, "released reference");
        }
        released
    }

    pub fn resolve(&self, reference: &DisplayableRef) -> Option<Resource> {
        self.live.borrow().get(reference).cloned()
    }

    pub fn is_live(&self, reference: &DisplayableRef) -> bool {
        self.live.borrow().contains_key(reference)
    }

    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }
}

/// A reference released when the guard is dropped.
#[derive(Debug)]
pub struct ScopedRef {
    registry: Rc<ReferenceRegistry>,
    reference: DisplayableRef,
}

impl ScopedRef {
    pub fn acquire(registry: &Rc<ReferenceRegistry>, bytes: Bytes, mime_type: &str) -> Self {
        Self {
            registry: Rc::clone(registry),
            reference: registry.create(bytes, mime_type),
        }
    }

    pub fn reference(&self) -> &DisplayableRef {
        &self.reference
    }

    pub fn resolve(&self) -> Option<Resource> {
        self.registry.resolve(&self.reference)
    }

    pub fn registry(&self) -> &Rc<ReferenceRegistry> {
        &self.registry
    }
}

impl Drop for ScopedRef {
    fn drop(&mut self) {
        self.registry.release(&self.reference);
    }
}

/// The image element inserted for a cropped image.
pub fn image_node(reference: &DisplayableRef, style: &str) -> ImageNode {
    ImageNode {
        src: reference.to_string(),
        alt: None,
        style: (!style.is_empty()).then(|| style.to_string()),
        draggable: true,
    }
}
