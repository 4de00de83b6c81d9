//! Alpha compositing of transformed sprites onto the canvas.
//!
//! The canvas is a plain [`RgbaImage`] owned by the caller. Sprites are
//! blended with "over" semantics; a layer opacity below one adds a uniform
//! alpha mask of `round(opacity * 255)` on top of the sprite's own alpha.
//!
//! Anything falling outside the canvas is dropped silently.

mod blend;
mod placement;

use image::RgbaImage;

pub use blend::{blend_over, blend_over_masked, opacity_mask};
pub use placement::{Placement, RowBand};

/// Composite `src` onto `canvas`, honoring layer opacity.
///
/// Opacity of one or more takes the plain "over" path; anything lower takes
/// the masked path.
pub fn composite(canvas: &mut RgbaImage, src: &RgbaImage, placement: Placement, opacity: f64) {
    if opacity.is_nan() || opacity >= 1.0 {
        composite_over(canvas, src, placement);
    } else {
        composite_masked(canvas, src, placement, opacity_mask(opacity));
    }
}

/// Composite with the sprite's own per-pixel alpha.
pub fn composite_over(canvas: &mut RgbaImage, src: &RgbaImage, placement: Placement) {
    for_each_overlap(canvas, src, placement, |dst, s| blend_over(dst, s));
}

/// Composite with per-pixel alpha attenuated by a uniform `mask`.
pub fn composite_masked(canvas: &mut RgbaImage, src: &RgbaImage, placement: Placement, mask: u8) {
    if mask == 0 {
        return;
    }
    for_each_overlap(canvas, src, placement, |dst, s| {
        blend_over_masked(dst, s, mask)
    });
}

/// Visit every canvas pixel covered by the placed sprite rows.
fn for_each_overlap<F>(canvas: &mut RgbaImage, src: &RgbaImage, placement: Placement, mut blend: F)
where
    F: FnMut(&mut image::Rgba<u8>, image::Rgba<u8>),
{
    let rows = placement.visible_rows(src.height()) as i64;

    let x0 = placement.x.max(0);
    let y0 = placement.y.max(0);
    let x1 = placement
        .x
        .saturating_add(src.width() as i64)
        .min(canvas.width() as i64);
    let y1 = placement.y.saturating_add(rows).min(canvas.height() as i64);

    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for dy in y0..y1 {
        let sy = (dy - placement.y) as u32;
        for dx in x0..x1 {
            let sx = (dx - placement.x) as u32;
            let s = *src.get_pixel(sx, sy);
            blend(canvas.get_pixel_mut(dx as u32, dy as u32), s);
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
