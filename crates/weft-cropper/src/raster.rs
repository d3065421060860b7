//! Decoding, sampling and JPEG encoding.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageError, ImageReader, RgbImage};

use crate::error::CropError;
use crate::geometry::{Region, Size};

/// Largest width or height of an output surface.
pub const MAX_SURFACE_DIMENSION: u32 = 32_767;

/// Largest pixel count of an output surface.
pub const MAX_SURFACE_AREA: u64 = 268_435_456;

/// Read only the header to get the natural size.
pub fn read_size(bytes: &[u8]) -> Result<Size, CropError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CropError::Decode(ImageError::IoError(e)))?;
    let (width, height) = reader.into_dimensions().map_err(CropError::Decode)?;
    Ok(Size::new(width, height))
}

pub fn decode(bytes: &[u8]) -> Result<DynamicImage, CropError> {
    image::load_from_memory(bytes).map_err(CropError::Decode)
}

/// Reject surfaces that are empty or too large to allocate.
pub fn check_surface(size: Size) -> Result<(), CropError> {
    if size.is_empty() {
        return Err(CropError::EmptyOutput);
    }
    if size.width > MAX_SURFACE_DIMENSION
        || size.height > MAX_SURFACE_DIMENSION
        || size.area() > MAX_SURFACE_AREA
    {
        return Err(CropError::Surface { size });
    }
    Ok(())
}

/// Sample `region` of `source` into an `output`-sized RGB raster.
pub fn render_crop(
    source: &DynamicImage,
    region: Region,
    output: Size,
) -> Result<RgbImage, CropError> {
    check_surface(output)?;
    let (width, height) = source.dimensions();
    let region_fits = region.x.saturating_add(region.width) <= width
        && region.y.saturating_add(region.height) <= height;
    if region.size().is_empty() || !region_fits {
        return Err(CropError::EmptyOutput);
    }

    let cropped =
        imageops::crop_imm(source, region.x, region.y, region.width, region.height).to_image();
    let scaled = if region.size() == output {
        cropped
    } else {
        imageops::resize(&cropped, output.width, output.height, FilterType::Triangle)
    };
    // JPEG has no alpha channel.
    Ok(DynamicImage::ImageRgba8(scaled).to_rgb8())
}

pub fn encode_jpeg(raster: &RgbImage, quality: u8) -> Result<Vec<u8>, CropError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode_image(raster)
        .map_err(CropError::Encode)?;
    Ok(buf)
}
