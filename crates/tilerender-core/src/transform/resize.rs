//! Nearest-neighbor resizing of sprites to an object's declared size.
//!
//! Objects may stretch their tile to any size. Resampling is always
//! nearest-neighbor so pixel art keeps its hard edges.

use image::imageops::FilterType;
use image::RgbaImage;

/// Resize a sprite to exact dimensions with nearest-neighbor sampling.
///
/// # Arguments
///
/// * `image` - The source sprite
/// * `width` - Target width in pixels
/// * `height` - Target height in pixels
///
/// # Returns
///
/// A new image with the specified dimensions. Requesting the current size
/// returns an identical copy; a zero-sized target or an empty source gives a
/// fully transparent image of the requested size.
pub fn resize_nearest(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    // Fast path: if dimensions match, just clone
    if image.dimensions() == (width, height) {
        return image.clone();
    }

    if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
        return RgbaImage::new(width, height);
    }

    image::imageops::resize(image, width, height, FilterType::Nearest)
}
