//! Driving the cropper from the command line.

use std::path::Path;
use std::rc::Rc;

use miette::{IntoDiagnostic, Result, WrapErr};
use weft_cropper::{CropRect, CroppedImage, ImageCropper, PixelRect, Size, raster};
use weft_editor_core::{EditorConfig, ImageFile, ReferenceRegistry};

/// What the user would have done in the modal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CropRequest {
    /// Size the preview was laid out at. `None` uses the modal's fit.
    pub display: Option<Size>,
    /// Crop in displayed pixels. `None` keeps the initial crop.
    pub rect: Option<PixelRect>,
}

pub fn read_image_file(path: &Path) -> Result<ImageFile> {
    let bytes = std::fs::read(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImageFile::new(name, mime_type_for(path), bytes))
}

/// MIME type from the file extension, the way a file picker reports it.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "html" | "htm" => "text/html",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Open a cropper on `file`, apply `request` and confirm.
///
/// A failed confirm closes the cropper; there is nobody to retry.
pub fn run(
    file: ImageFile,
    registry: &Rc<ReferenceRegistry>,
    config: &EditorConfig,
    request: &CropRequest,
) -> Result<CroppedImage> {
    let mut cropper =
        ImageCropper::open(file, registry).with_quality(config.jpeg_quality_percent());
    match request.display {
        Some(displayed) => {
            let natural = raster::read_size(&cropper.file().bytes)?;
            cropper.on_image_load(natural, displayed);
        }
        None => {
            cropper.load(config.preview_max_display)?;
        }
    }
    if let Some(rect) = request.rect {
        cropper.set_crop(CropRect::pixels(rect));
    }
    cropper.commit();

    match cropper.confirm() {
        Ok(cropped) => Ok(cropped),
        Err(retry) => {
            let (cropper, error) = retry.into_parts();
            cropper.cancel();
            Err(error.into())
        }
    }
}
