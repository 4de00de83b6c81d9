//! Tilerender WASM - WebAssembly bindings for Tilerender
//!
//! This crate is the host side of the renderer for JavaScript/TypeScript
//! applications: JS supplies the parsed map and decoded tileset pixels,
//! tilerender-core composites them, and the RGBA canvas comes back.
//!
//! # Module Structure
//!
//! - `renderer` - Map renderer bindings (tilesets, render calls)
//! - `types` - WASM-compatible wrapper types for canvas data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsTileMapRenderer } from '@tilerender/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const renderer = new JsTileMapRenderer(map, undefined);
//! renderer.add_tile_image(1, 16, 16, treePixels);
//! const canvas = renderer.render_visible_groups();
//! console.log(`Rendered ${canvas.width}x${canvas.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod renderer;
mod types;

// Re-export public types
pub use renderer::JsTileMapRenderer;
pub use types::JsCanvas;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
