//! Per-object sprite transforms: flip, resize and rotation.
//!
//! # Transform Order
//!
//! For each object the base sprite goes through:
//! 1. Tile flip flags (diagonal, horizontal, vertical)
//! 2. Nearest-neighbor resize to the object's declared width/height
//! 3. Rotation about the center, canvas expanded, uncovered pixels transparent
//!
//! Each step is skipped when it would not change the image, so an object
//! drawn at its tile's native size without rotation borrows the provider's
//! sprite directly.
//!
//! # Coordinate System
//!
//! - Map rotation is clockwise in degrees
//! - [`rotate`] takes counter-clockwise degrees, so objects are rotated by
//!   the negated map angle
//! - Origin is top-left corner

mod flip;
mod resize;
mod rotation;

use std::borrow::Cow;

use image::RgbaImage;

use crate::model::MapObject;
use crate::RenderOptions;

pub use flip::apply_flips;
pub use resize::resize_nearest;
pub use rotation::{compute_rotated_bounds, rotate, InterpolationFilter};

/// Produce the image to composite for one object.
///
/// # Arguments
///
/// * `object` - The object being drawn
/// * `sprite` - Base sprite resolved for the object's tile
/// * `options` - Flip handling and rotation filter
///
/// # Returns
///
/// The transformed sprite, borrowed from `sprite` when no step applies.
pub fn prepare_sprite<'a>(
    object: &MapObject,
    sprite: &'a RgbaImage,
    options: &RenderOptions,
) -> Cow<'a, RgbaImage> {
    let mut image = Cow::Borrowed(sprite);

    if options.apply_flip_flags && object.gid.has_flips() {
        image = Cow::Owned(apply_flips(&image, object.gid));
    }

    let (width, height) = object.pixel_size();
    if image.dimensions() != (width, height) {
        image = Cow::Owned(resize_nearest(&image, width, height));
    }

    if object.rotation != 0.0 {
        image = Cow::Owned(rotate(&image, -object.rotation, options.rotation_filter));
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Gid;
    use image::Rgba;

    fn sprite(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 7, 255]))
    }

    #[test]
    fn test_native_size_borrows() {
        let base = sprite(16, 16);
        let obj = MapObject::new(1, 0.0, 16.0, 16.0, 16.0);
        let out = prepare_sprite(&obj, &base, &RenderOptions::default());
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(*out, base);
    }

    #[test]
    fn test_resizes_to_declared_size() {
        let base = sprite(16, 16);
        let obj = MapObject::new(1, 0.0, 32.0, 32.0, 24.0);
        let out = prepare_sprite(&obj, &base, &RenderOptions::default());
        assert_eq!(out.dimensions(), (32, 24));
    }

    #[test]
    fn test_clockwise_map_rotation() {
        // 2x1: left red, right blue
        let mut base = RgbaImage::new(2, 1);
        base.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        base.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

        let mut obj = MapObject::new(1, 0.0, 1.0, 2.0, 1.0);
        obj.rotation = 90.0;

        let out = prepare_sprite(&obj, &base, &RenderOptions::default());
        assert_eq!(out.dimensions(), (1, 2));
        // Clockwise on screen: the right end swings down
        assert_eq!(out.get_pixel(0, 1), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_flip_flags_respected_and_ignored() {
        let base = sprite(4, 4);
        let obj = MapObject::new(Gid(1 | Gid::FLIPPED_HORIZONTALLY), 0.0, 4.0, 4.0, 4.0);

        let flipped = prepare_sprite(&obj, &base, &RenderOptions::default());
        assert_eq!(flipped.get_pixel(0, 0)[0], 3);

        let options = RenderOptions {
            apply_flip_flags: false,
            ..Default::default()
        };
        let untouched = prepare_sprite(&obj, &base, &options);
        assert_eq!(*untouched, base);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
