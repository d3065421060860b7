//! weft-cropper: the image crop modal behind the editor's image button.
//!
//! An [`ImageCropper`] is opened for one picked file. The user shapes a crop
//! over a scaled-down preview; confirming maps that crop back onto the
//! full-resolution image, samples it into a raster the size of the displayed
//! crop and encodes it as JPEG. The result is handed to the shell as a
//! [`DisplayableRef`](weft_editor_core::DisplayableRef).

pub mod cropper;
pub mod error;
pub mod geometry;
pub mod raster;

pub use cropper::{CropRetry, CroppedImage, DEFAULT_QUALITY, ImageCropper, OUTPUT_MIME_TYPE};
pub use error::CropError;
pub use geometry::{CropRect, CropUnit, PixelRect, Point, Region, ScaleFactors, Size};
