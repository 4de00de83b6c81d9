//! WASM-compatible wrapper types for canvas and sprite data.
//!
//! This module provides JavaScript-friendly types that wrap the core
//! `RgbaImage` buffers, handling the conversion between Rust and JavaScript
//! data representations.

use image::RgbaImage;
use wasm_bindgen::prelude::*;

/// A rendered canvas for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` and `image_data()`
/// copy it into JavaScript memory. Keep the canvas in WASM memory and only
/// extract pixels when they are about to be drawn.
#[wasm_bindgen]
pub struct JsCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsCanvas {
    /// Get the canvas width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the canvas height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns straight-alpha RGBA pixel data as Uint8Array.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Returns the pixels as a Uint8ClampedArray, ready for `new ImageData(...)`.
    pub fn image_data(&self) -> js_sys::Uint8ClampedArray {
        js_sys::Uint8ClampedArray::from(self.pixels.as_slice())
    }
}

impl JsCanvas {
    /// Wrap a finished core canvas.
    pub(crate) fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }
}

/// Build an RGBA image from a raw JavaScript pixel buffer.
///
/// Returns `None` if the buffer length is not `width * height * 4`.
pub(crate) fn rgba_from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<RgbaImage> {
    RgbaImage::from_raw(width, height, pixels)
}
