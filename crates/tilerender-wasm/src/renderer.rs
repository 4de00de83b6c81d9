//! Tile map rendering WASM bindings.
//!
//! JavaScript parses the map file and decodes the tileset images; this module
//! receives both, drives the core renderer and returns the finished canvas.
//!
//! # Example
//!
//! ```typescript
//! import { JsTileMapRenderer } from '@tilerender/wasm';
//!
//! const renderer = new JsTileMapRenderer(map, { objectStrategy: 'upperBand' });
//! renderer.add_tileset(
//!   { firstGid: 1, tileWidth: 16, tileHeight: 16, columns: 8, tileCount: 64,
//!     imageWidth: 128, imageHeight: 128 },
//!   sheetPixels,
//! );
//! const canvas = renderer.render_visible_groups();
//! ctx.putImageData(new ImageData(canvas.image_data(), canvas.width), 0, 0);
//! ```

use serde::Deserialize;
use tilerender_core::{RenderError, RenderOptions, Renderer, SheetLayout, SpriteAtlas, TileMap};
use wasm_bindgen::prelude::*;

use crate::types::{rgba_from_raw, JsCanvas};

/// Geometry of a tileset sheet passed from JavaScript.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TilesetDescriptor {
    first_gid: u32,
    tile_width: u32,
    tile_height: u32,
    columns: u32,
    tile_count: u32,
    #[serde(default)]
    margin: u32,
    #[serde(default)]
    spacing: u32,
    image_width: u32,
    image_height: u32,
}

impl TilesetDescriptor {
    fn layout(&self) -> SheetLayout {
        SheetLayout {
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            columns: self.columns,
            tile_count: self.tile_count,
            margin: self.margin,
            spacing: self.spacing,
        }
    }
}

/// A parsed map together with its decoded sprites.
#[wasm_bindgen]
pub struct JsTileMapRenderer {
    map: TileMap,
    atlas: SpriteAtlas,
    options: RenderOptions,
}

#[wasm_bindgen]
impl JsTileMapRenderer {
    /// Create a renderer for a parsed map.
    ///
    /// # Arguments
    ///
    /// * `map` - Map model object (camelCase fields, see `TileMap`)
    /// * `options` - Optional render options; `undefined` uses defaults
    ///
    /// # Errors
    ///
    /// Returns an error if either object does not match the expected shape.
    #[wasm_bindgen(constructor)]
    pub fn new(map: JsValue, options: JsValue) -> Result<JsTileMapRenderer, JsValue> {
        let map: TileMap = serde_wasm_bindgen::from_value(map).map_err(to_js_error)?;
        let options = if options.is_undefined() || options.is_null() {
            RenderOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(to_js_error)?
        };
        Ok(Self::from_parts(map, options))
    }

    /// Slice a decoded tileset sheet (RGBA pixels) into sprites.
    ///
    /// # Returns
    ///
    /// The number of tiles registered.
    pub fn add_tileset(&mut self, descriptor: JsValue, pixels: Vec<u8>) -> Result<usize, JsValue> {
        let descriptor: TilesetDescriptor =
            serde_wasm_bindgen::from_value(descriptor).map_err(to_js_error)?;
        self.add_tileset_sheet(&descriptor, pixels)
            .map_err(to_js_error)
    }

    /// Register a single-image tile (RGBA pixels) under `gid`.
    pub fn add_tile_image(
        &mut self,
        gid: u32,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<(), JsValue> {
        let sprite = rgba_from_raw(width, height, pixels).ok_or_else(|| {
            to_js_error(format!(
                "Pixel buffer does not match {}x{} RGBA image",
                width, height
            ))
        })?;
        self.atlas.insert(gid, sprite);
        Ok(())
    }

    /// Number of sprites registered so far
    #[wasm_bindgen(getter)]
    pub fn tile_count(&self) -> usize {
        self.atlas.len()
    }

    /// Render every visible group.
    pub fn render_visible_groups(&self) -> Result<JsCanvas, JsValue> {
        self.render_with(|r| r.render_visible_groups())
            .map_err(report)
    }

    /// Render a single group by index.
    pub fn render_group(&self, index: usize) -> Result<JsCanvas, JsValue> {
        self.render_with(|r| r.render_group(index)).map_err(report)
    }

    /// Render top-level tile layers, then top-level object layers.
    pub fn render_visible_layers_and_object_layers(&self) -> Result<JsCanvas, JsValue> {
        self.render_with(|r| r.render_visible_layers_and_object_layers())
            .map_err(report)
    }
}

impl JsTileMapRenderer {
    /// Build a renderer from already deserialized parts.
    pub(crate) fn from_parts(map: TileMap, options: RenderOptions) -> Self {
        Self {
            map,
            atlas: SpriteAtlas::new(),
            options,
        }
    }

    fn add_tileset_sheet(
        &mut self,
        descriptor: &TilesetDescriptor,
        pixels: Vec<u8>,
    ) -> Result<usize, RenderError> {
        let sheet = rgba_from_raw(descriptor.image_width, descriptor.image_height, pixels)
            .ok_or_else(|| {
                RenderError::InvalidSheet(format!(
                    "pixel buffer does not match {}x{} RGBA image",
                    descriptor.image_width, descriptor.image_height
                ))
            })?;
        self.atlas
            .add_sheet(descriptor.first_gid, &sheet, descriptor.layout())
    }

    /// Run one render call on a fresh canvas.
    fn render_with<F>(&self, draw: F) -> Result<JsCanvas, RenderError>
    where
        F: FnOnce(&mut Renderer<'_, &SpriteAtlas>) -> Result<(), RenderError>,
    {
        let mut renderer = Renderer::with_options(&self.map, &self.atlas, self.options.clone());
        draw(&mut renderer)?;
        Ok(JsCanvas::from_image(renderer.into_canvas()))
    }
}

fn to_js_error(err: impl ToString) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Log a render failure to the browser console and convert it for JavaScript.
fn report(err: RenderError) -> JsValue {
    let value = to_js_error(&err);
    web_sys::console::error_1(&value);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilerender_core::{MapObject, ObjectLayer};

    fn solid_sheet(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        rgba.iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect()
    }

    fn descriptor() -> TilesetDescriptor {
        TilesetDescriptor {
            first_gid: 1,
            tile_width: 8,
            tile_height: 8,
            columns: 2,
            tile_count: 4,
            margin: 0,
            spacing: 0,
            image_width: 16,
            image_height: 16,
        }
    }

    fn renderer_with_object() -> JsTileMapRenderer {
        let mut map = TileMap::new(2, 2, 8, 8);
        map.object_layers.push(ObjectLayer::new(
            "props",
            vec![MapObject::new(1, 0.0, 8.0, 8.0, 8.0)],
        ));
        JsTileMapRenderer::from_parts(map, RenderOptions::default())
    }

    #[test]
    fn test_add_tileset_sheet() {
        let mut renderer = renderer_with_object();
        let added = renderer
            .add_tileset_sheet(&descriptor(), solid_sheet(16, 16, [255, 0, 0, 255]))
            .unwrap();
        assert_eq!(added, 4);
        assert_eq!(renderer.tile_count(), 4);
    }

    #[test]
    fn test_add_tileset_sheet_rejects_short_buffer() {
        let mut renderer = renderer_with_object();
        let err = renderer
            .add_tileset_sheet(&descriptor(), vec![0u8; 16 * 16 * 3])
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidSheet(_)));
    }

    #[test]
    fn test_render_with_returns_canvas() {
        let mut renderer = renderer_with_object();
        renderer
            .add_tileset_sheet(&descriptor(), solid_sheet(16, 16, [255, 0, 0, 255]))
            .unwrap();

        let canvas = renderer
            .render_with(|r| r.render_visible_object_layers())
            .unwrap();
        assert_eq!(canvas.width(), 16);
        assert_eq!(canvas.height(), 16);
        assert_eq!(&canvas.pixels()[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_render_with_propagates_lookup_error() {
        let renderer = renderer_with_object();
        let result = renderer.render_with(|r| r.render_visible_object_layers());
        assert!(matches!(result, Err(RenderError::Lookup(_))));
    }
}
