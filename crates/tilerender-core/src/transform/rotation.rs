//! Sprite rotation about the image center with canvas expansion.
//!
//! Two resampling methods are available:
//! - **Nearest**: keeps hard pixel-art edges
//! - **Bilinear**: smooth edges, the look of the reference map editor export
//!
//! # Algorithm
//!
//! Exact quarter turns are lossless pixel shuffles. Every other angle uses
//! inverse mapping: for each pixel center in the output image we find the
//! source position it came from and sample it. Output pixels with no source
//! coverage stay fully transparent.
//!
//! For a counter-clockwise rotation by θ in y-down image space, the inverse
//! transform is:
//! ```text
//! src_x = (dst_x - cx) * cos(θ) - (dst_y - cy) * sin(θ) + src_cx
//! src_y = (dst_x - cx) * sin(θ) + (dst_y - cy) * cos(θ) + src_cy
//! ```

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// Angles closer than this to a quarter turn are treated as exact.
const ANGLE_EPSILON: f64 = 0.001;

/// Interpolation filter for rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterpolationFilter {
    /// Nearest source pixel.
    Nearest,
    /// Bilinear interpolation with premultiplied alpha.
    #[default]
    Bilinear,
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// # Arguments
///
/// * `width` - Original image width
/// * `height` - Original image height
/// * `angle_degrees` - Rotation angle in degrees (sign does not matter)
///
/// # Returns
///
/// Tuple of (new_width, new_height) for the rotated bounding box.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    match quarter_turns(angle_degrees) {
        Some(0) | Some(2) => return (width, height),
        Some(_) => return (height, width),
        None => {}
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    // new_w = |w*cos| + |h*sin|
    // new_h = |w*sin| + |h*cos|
    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate an image counter-clockwise about its center.
///
/// The output canvas is expanded to fit the entire rotated image; pixels
/// outside the rotated source are transparent.
///
/// # Arguments
///
/// * `image` - Source sprite
/// * `angle_degrees` - Rotation angle in degrees (positive = counter-clockwise)
/// * `filter` - Resampling method for non-quarter-turn angles
pub fn rotate(image: &RgbaImage, angle_degrees: f64, filter: InterpolationFilter) -> RgbaImage {
    if image.width() == 0 || image.height() == 0 || !angle_degrees.is_finite() {
        return image.clone();
    }

    match quarter_turns(angle_degrees) {
        Some(0) => return image.clone(),
        // imageops rotates clockwise
        Some(1) => return image::imageops::rotate270(image),
        Some(2) => return image::imageops::rotate180(image),
        Some(3) => return image::imageops::rotate90(image),
        _ => {}
    }

    let (src_w, src_h) = (image.width() as f64, image.height() as f64);
    let (dst_w, dst_h) = compute_rotated_bounds(image.width(), image.height(), angle_degrees);

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    RgbaImage::from_fn(dst_w, dst_h, |dst_x, dst_y| {
        // Pixel center relative to the output center
        let dx = dst_x as f64 + 0.5 - dst_cx;
        let dy = dst_y as f64 + 0.5 - dst_cy;

        let src_x = dx * cos - dy * sin + src_cx;
        let src_y = dx * sin + dy * cos + src_cy;

        match filter {
            InterpolationFilter::Nearest => sample_nearest(image, src_x, src_y),
            InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y),
        }
    })
}

/// Number of counter-clockwise quarter turns if the angle is one, else `None`.
fn quarter_turns(angle_degrees: f64) -> Option<u8> {
    let normalized = angle_degrees.rem_euclid(360.0);
    let turns = (normalized / 90.0).round();
    if (normalized - turns * 90.0).abs() < ANGLE_EPSILON {
        Some((turns as u8) % 4)
    } else {
        None
    }
}

/// Sample the source pixel containing the point, transparent outside.
fn sample_nearest(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    if x < 0.0 || y < 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let (px, py) = (x.floor() as u32, y.floor() as u32);
    if px >= image.width() || py >= image.height() {
        return Rgba([0, 0, 0, 0]);
    }
    *image.get_pixel(px, py)
}

/// Source pixel as premultiplied floats, transparent outside the image.
#[inline]
fn premultiplied(image: &RgbaImage, px: i64, py: i64) -> [f64; 4] {
    if px < 0 || py < 0 || px >= image.width() as i64 || py >= image.height() as i64 {
        return [0.0; 4];
    }
    let p = image.get_pixel(px as u32, py as u32);
    let a = p[3] as f64 / 255.0;
    [p[0] as f64 * a, p[1] as f64 * a, p[2] as f64 * a, p[3] as f64]
}

/// Sample a pixel using bilinear interpolation.
///
/// Interpolation runs on premultiplied color so transparent neighbours do not
/// bleed black into the edges of the sprite.
fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    // Shift from pixel-center to pixel-index space
    let x = x - 0.5;
    let y = y - 0.5;

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = premultiplied(image, x0, y0);
    let p10 = premultiplied(image, x0 + 1, y0);
    let p01 = premultiplied(image, x0, y0 + 1);
    let p11 = premultiplied(image, x0 + 1, y0 + 1);

    let mut acc = [0.0f64; 4];
    for i in 0..4 {
        acc[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }

    let alpha = acc[3].clamp(0.0, 255.0);
    if alpha < 0.5 {
        return Rgba([0, 0, 0, 0]);
    }

    let scale = 255.0 / alpha;
    Rgba([
        (acc[0] * scale).clamp(0.0, 255.0).round() as u8,
        (acc[1] * scale).clamp(0.0, 255.0).round() as u8,
        (acc[2] * scale).clamp(0.0, 255.0).round() as u8,
        alpha.round() as u8,
    ])
}
