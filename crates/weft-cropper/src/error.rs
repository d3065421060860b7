use miette::Diagnostic;

use crate::geometry::Size;

/// Why a crop could not be produced. The cropper stays open after any of these.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum CropError {
    #[error("the image has not loaded or no crop has been committed")]
    #[diagnostic(
        code(weft::crop::not_ready),
        help("drag out a crop rectangle with a non-zero width and height")
    )]
    NotReady,

    #[error("output surface {size} exceeds the raster limits")]
    #[diagnostic(code(weft::crop::surface))]
    Surface { size: Size },

    #[error("the crop produced an empty image")]
    #[diagnostic(code(weft::crop::empty))]
    EmptyOutput,

    #[error("failed to decode the source image")]
    #[diagnostic(code(weft::crop::decode))]
    Decode(#[source] image::ImageError),

    #[error("failed to encode the cropped image")]
    #[diagnostic(code(weft::crop::encode))]
    Encode(#[source] image::ImageError),

    #[error("the preview image reference is no longer live")]
    #[diagnostic(code(weft::crop::released))]
    ReferenceReleased,
}
