//! Tile flip flags applied to sprites.

use image::RgbaImage;

use crate::model::Gid;

/// Apply the flip flags carried by `gid`.
///
/// The diagonal flip is applied first, then horizontal, then vertical, so the
/// eight combinations cover every rotation and mirror of a square tile.
pub fn apply_flips(image: &RgbaImage, gid: Gid) -> RgbaImage {
    let mut out = if gid.flipped_diagonally() {
        transpose(image)
    } else {
        image.clone()
    };

    if gid.flipped_horizontally() {
        image::imageops::flip_horizontal_in_place(&mut out);
    }
    if gid.flipped_vertically() {
        image::imageops::flip_vertical_in_place(&mut out);
    }

    out
}

/// Mirror along the top-left to bottom-right diagonal: (x, y) -> (y, x).
fn transpose(image: &RgbaImage) -> RgbaImage {
    let mut out = image::imageops::rotate90(image);
    image::imageops::flip_horizontal_in_place(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// 3x2 sprite where each pixel encodes its own coordinates.
    fn coords_image() -> RgbaImage {
        RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn test_no_flags_is_identity() {
        let img = coords_image();
        assert_eq!(apply_flips(&img, Gid(1)), img);
    }

    #[test]
    fn test_horizontal_flip() {
        let img = coords_image();
        let out = apply_flips(&img, Gid(1 | Gid::FLIPPED_HORIZONTALLY));
        assert_eq!(out.get_pixel(0, 0), &Rgba([2, 0, 0, 255]));
        assert_eq!(out.get_pixel(2, 1), &Rgba([0, 1, 0, 255]));
    }

    #[test]
    fn test_vertical_flip() {
        let img = coords_image();
        let out = apply_flips(&img, Gid(1 | Gid::FLIPPED_VERTICALLY));
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 1, 0, 255]));
    }

    #[test]
    fn test_diagonal_flip_transposes() {
        let img = coords_image();
        let out = apply_flips(&img, Gid(1 | Gid::FLIPPED_DIAGONALLY));
        assert_eq!(out.dimensions(), (2, 3));
        for y in 0..3 {
            for x in 0..2 {
                assert_eq!(out.get_pixel(x, y), &Rgba([y as u8, x as u8, 0, 255]));
            }
        }
    }
}
