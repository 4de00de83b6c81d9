//! Per-pixel "over" blending on straight (non-premultiplied) RGBA.
//!
//! All arithmetic is integer with exact rounding, so the masked and unmasked
//! paths agree bit for bit when the mask is fully opaque.

use image::Rgba;

/// Uniform alpha mask for a layer opacity: `round(opacity * 255)`.
///
/// Opacity is clamped to 0.0..=1.0 first; NaN counts as fully opaque.
pub fn opacity_mask(opacity: f64) -> u8 {
    if opacity.is_nan() {
        return u8::MAX;
    }
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// `round(a * b / 255)` for 8-bit operands.
#[inline]
pub(crate) fn mul_div_255(a: u8, b: u8) -> u8 {
    let t = a as u32 * b as u32 + 128;
    ((t + (t >> 8)) >> 8) as u8
}

/// Composite `src` over `dst` using the source's own alpha.
#[inline]
pub fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    blend_with_alpha(dst, src, src[3]);
}

/// Composite `src` over `dst` with the source alpha attenuated by `mask`.
#[inline]
pub fn blend_over_masked(dst: &mut Rgba<u8>, src: Rgba<u8>, mask: u8) {
    blend_with_alpha(dst, src, mul_div_255(src[3], mask));
}

/// Porter-Duff "over" with an explicit effective source alpha.
fn blend_with_alpha(dst: &mut Rgba<u8>, src: Rgba<u8>, src_alpha: u8) {
    match src_alpha {
        0 => {}
        255 => *dst = Rgba([src[0], src[1], src[2], 255]),
        sa => {
            let dst_weight = mul_div_255(dst[3], 255 - sa) as u32;
            let sa = sa as u32;
            let out_a = sa + dst_weight;

            for c in 0..3 {
                let num = src[c] as u32 * sa + dst[c] as u32 * dst_weight;
                dst[c] = ((num + out_a / 2) / out_a) as u8;
            }
            dst[3] = out_a as u8;
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
