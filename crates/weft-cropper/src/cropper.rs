//! The crop modal's state machine.

use std::rc::Rc;

use bytes::Bytes;
use image::GenericImageView;
use tracing::{debug, warn};
use weft_editor_core::{DisplayableRef, ImageFile, ReferenceRegistry, ScopedRef};

use crate::error::CropError;
use crate::geometry::{
    CropRect, PixelRect, Point, ScaleFactors, Size, fit_displayed_size, map_to_natural,
    output_size,
};
use crate::raster;

/// JPEG quality used when the host does not configure one.
pub const DEFAULT_QUALITY: u8 = 90;

/// MIME type of every cropped output.
pub const OUTPUT_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone, Copy, PartialEq)]
struct Loaded {
    natural: Size,
    displayed: Size,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    /// Dragging the existing selection around.
    Move { origin: PixelRect, start: Point },
    /// Drawing a new selection from `anchor`.
    Select { anchor: Point },
}

/// State of an open crop modal for one file.
///
/// Opening mints a preview reference for the file; it is released when the
/// cropper is confirmed, cancelled or dropped.
#[derive(Debug)]
pub struct ImageCropper {
    file: ImageFile,
    preview: ScopedRef,
    crop: CropRect,
    completed: Option<PixelRect>,
    loaded: Option<Loaded>,
    drag: Option<Drag>,
    quality: u8,
}

/// A successful crop: the JPEG bytes and the reference minted for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroppedImage {
    pub reference: DisplayableRef,
    pub size: Size,
    pub bytes: Bytes,
}

/// A failed confirm. The cropper comes back so the user can adjust and retry.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct CropRetry {
    pub cropper: Box<ImageCropper>,
    pub error: CropError,
}

impl CropRetry {
    pub fn into_parts(self) -> (ImageCropper, CropError) {
        (*self.cropper, self.error)
    }
}

impl ImageCropper {
    pub fn open(file: ImageFile, registry: &Rc<ReferenceRegistry>) -> Self {
        let preview = ScopedRef::acquire(registry, file.bytes.clone(), &file.mime_type);
        debug!(file = %file.name, preview = %preview.reference(), "opened cropper");
        Self {
            file,
            preview,
            crop: CropRect::default(),
            completed: None,
            loaded: None,
            drag: None,
            quality: DEFAULT_QUALITY,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// The `src` of the preview image shown in the modal.
    pub fn preview_reference(&self) -> &DisplayableRef {
        self.preview.reference()
    }

    pub fn file(&self) -> &ImageFile {
        &self.file
    }

    /// The crop as currently shown, updated during drags.
    pub fn crop(&self) -> CropRect {
        self.crop
    }

    /// The last crop committed at the end of a gesture, in displayed pixels.
    pub fn completed_crop(&self) -> Option<PixelRect> {
        self.completed
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn natural_size(&self) -> Option<Size> {
        self.loaded.map(|l| l.natural)
    }

    pub fn displayed_size(&self) -> Option<Size> {
        self.loaded.map(|l| l.displayed)
    }

    /// The preview finished loading and was laid out at `displayed`.
    pub fn on_image_load(&mut self, natural: Size, displayed: Size) {
        debug!(%natural, %displayed, "crop preview loaded");
        self.loaded = Some(Loaded { natural, displayed });
    }

    /// Read the natural size from the file header and lay the preview out
    /// inside a `max`×`max` box.
    pub fn load(&mut self, max: u32) -> Result<Size, CropError> {
        let natural = raster::read_size(&self.file.bytes)?;
        let displayed = fit_displayed_size(natural, max);
        self.on_image_load(natural, displayed);
        Ok(displayed)
    }

    pub fn set_crop(&mut self, crop: CropRect) {
        self.crop = crop;
    }

    /// Commit the current crop, clipped to the displayed image.
    ///
    /// Does nothing until the preview has loaded.
    pub fn commit(&mut self) {
        if let Some(loaded) = self.loaded {
            let rect = self.crop.to_pixels(loaded.displayed).clip_to(loaded.displayed);
            self.completed = Some(rect);
        }
    }

    /// Pointer down. Inside the current crop the selection is moved,
    /// elsewhere a new one is drawn.
    pub fn begin_drag(&mut self, at: Point) {
        let Some(loaded) = self.loaded else {
            return;
        };
        let current = self.crop.to_pixels(loaded.displayed);
        self.drag = Some(if !current.is_empty() && current.contains(at) {
            Drag::Move {
                origin: current,
                start: at,
            }
        } else {
            Drag::Select {
                anchor: clamp_point(at, loaded.displayed),
            }
        });
    }

    /// Pointer move. Only the in-progress crop changes.
    pub fn drag_to(&mut self, at: Point) {
        let (Some(drag), Some(loaded)) = (self.drag, self.loaded) else {
            return;
        };
        let rect = match drag {
            Drag::Move { origin, start } => PixelRect::new(
                origin.x + at.x - start.x,
                origin.y + at.y - start.y,
                origin.width,
                origin.height,
            )
            .keep_within(loaded.displayed),
            Drag::Select { anchor } => {
                PixelRect::from_corners(anchor, clamp_point(at, loaded.displayed))
            }
        };
        self.crop = CropRect::pixels(rect);
    }

    /// Pointer up. Commits the crop.
    pub fn end_drag(&mut self) {
        if self.drag.take().is_some() {
            self.commit();
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Loaded, with a committed crop of non-zero width and height.
    pub fn can_confirm(&self) -> bool {
        self.loaded.is_some() && self.completed.is_some_and(|c| !c.is_empty())
    }

    /// Produce the cropped JPEG and mint a reference for it.
    ///
    /// On success the cropper is consumed and its preview released. On
    /// failure it is handed back unchanged.
    pub fn confirm(self) -> Result<CroppedImage, CropRetry> {
        match self.render() {
            Ok((size, bytes)) => {
                let registry = Rc::clone(self.preview.registry());
                drop(self);
                let reference = registry.create(bytes.clone(), OUTPUT_MIME_TYPE);
                debug!(%reference, %size, len = bytes.len(), "crop confirmed");
                Ok(CroppedImage {
                    reference,
                    size,
                    bytes,
                })
            }
            Err(error) => {
                warn!(file = %self.file.name, %error, "crop failed");
                Err(CropRetry {
                    cropper: Box::new(self),
                    error,
                })
            }
        }
    }

    /// Close without producing anything.
    pub fn cancel(self) {
        debug!(file = %self.file.name, "crop cancelled");
    }

    fn render(&self) -> Result<(Size, Bytes), CropError> {
        let (Some(loaded), Some(crop)) = (self.loaded, self.completed) else {
            return Err(CropError::NotReady);
        };
        if crop.is_empty() {
            return Err(CropError::NotReady);
        }
        let output = output_size(&crop);
        raster::check_surface(output)?;

        let resource = self.preview.resolve().ok_or(CropError::ReferenceReleased)?;
        let source = raster::decode(&resource.bytes)?;
        // Scale against what actually decoded; the reported natural size
        // only matters for layout.
        let (width, height) = source.dimensions();
        let natural = Size::new(width, height);
        let scale = ScaleFactors::between(natural, loaded.displayed).ok_or(CropError::NotReady)?;
        let region = map_to_natural(&crop, scale, natural);
        debug!(?region, %output, "sampling crop");

        let raster = raster::render_crop(&source, region, output)?;
        let jpeg = raster::encode_jpeg(&raster, self.quality)?;
        Ok((output, Bytes::from(jpeg)))
    }
}

fn clamp_point(p: Point, bounds: Size) -> Point {
    Point::new(
        p.x.clamp(0.0, f64::from(bounds.width)),
        p.y.clamp(0.0, f64::from(bounds.height)),
    )
}
