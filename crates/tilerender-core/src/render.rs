//! Layer walk: draws groups, tile layers and object layers onto one canvas.
//!
//! Drawing is strictly sequential and back-to-front in document order:
//! inside a group its tile layers come first, then its object layers; inside
//! an object layer objects are drawn in depth order (see [`crate::sort`]).
//!
//! A failed tile lookup aborts the call immediately. Everything drawn before
//! the failure stays on the canvas.

use image::RgbaImage;
use tracing::{debug, trace};

use crate::composite::{composite, Placement};
use crate::error::RenderError;
use crate::model::{Group, MapObject, ObjectLayer, TileLayer, TileMap};
use crate::provider::ImageProvider;
use crate::sort::depth_order;
use crate::transform::{apply_flips, prepare_sprite};
use crate::{ObjectStrategy, RenderOptions};

/// Renders a [`TileMap`] into an RGBA canvas.
///
/// # Example
///
/// ```ignore
/// let mut renderer = Renderer::new(&map, &atlas);
/// renderer.render_visible_groups()?;
/// let image = renderer.into_canvas();
/// ```
#[derive(Debug)]
pub struct Renderer<'m, P> {
    map: &'m TileMap,
    provider: P,
    options: RenderOptions,
    canvas: RgbaImage,
}

impl<'m, P: ImageProvider> Renderer<'m, P> {
    /// Create a renderer with default options and a transparent canvas
    /// sized to the map.
    pub fn new(map: &'m TileMap, provider: P) -> Self {
        Self::with_options(map, provider, RenderOptions::default())
    }

    pub fn with_options(map: &'m TileMap, provider: P, options: RenderOptions) -> Self {
        let (width, height) = map.pixel_size();
        Self::with_canvas(map, provider, options, RgbaImage::new(width, height))
    }

    /// Render onto an existing canvas instead of a fresh one.
    pub fn with_canvas(
        map: &'m TileMap,
        provider: P,
        options: RenderOptions,
        canvas: RgbaImage,
    ) -> Self {
        Self {
            map,
            provider,
            options,
            canvas,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Consume the renderer and return the finished canvas.
    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }

    /// Reset every canvas pixel to transparent.
    pub fn clear(&mut self) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = image::Rgba([0, 0, 0, 0]);
        }
    }

    /// Render every visible group in document order.
    pub fn render_visible_groups(&mut self) -> Result<(), RenderError> {
        let map = self.map;
        for group in map.groups.iter().filter(|g| g.visible) {
            self.draw_group(group)?;
        }
        Ok(())
    }

    /// Render one group, visible or not.
    pub fn render_group(&mut self, index: usize) -> Result<(), RenderError> {
        let group = self.group(index)?;
        self.draw_group(group)
    }

    /// Render one object layer of a group.
    pub fn render_group_object_layer(
        &mut self,
        group_index: usize,
        layer_index: usize,
    ) -> Result<(), RenderError> {
        let group = self.group(group_index)?;
        let layer = group
            .object_layers
            .get(layer_index)
            .ok_or(RenderError::LayerOutOfRange {
                index: layer_index,
                len: group.object_layers.len(),
            })?;
        self.draw_object_layer(layer)
    }

    /// Render every visible top-level tile layer.
    pub fn render_visible_layers(&mut self) -> Result<(), RenderError> {
        let map = self.map;
        for layer in map.layers.iter().filter(|l| l.visible) {
            self.draw_tile_layer(layer)?;
        }
        Ok(())
    }

    /// Render one top-level tile layer.
    pub fn render_layer(&mut self, index: usize) -> Result<(), RenderError> {
        let map = self.map;
        let layer = map.layers.get(index).ok_or(RenderError::LayerOutOfRange {
            index,
            len: map.layers.len(),
        })?;
        self.draw_tile_layer(layer)
    }

    /// Render every visible top-level object layer.
    pub fn render_visible_object_layers(&mut self) -> Result<(), RenderError> {
        let map = self.map;
        for layer in map.object_layers.iter().filter(|l| l.visible) {
            self.draw_object_layer(layer)?;
        }
        Ok(())
    }

    /// Render one top-level object layer.
    pub fn render_object_layer(&mut self, index: usize) -> Result<(), RenderError> {
        let map = self.map;
        let layer = map
            .object_layers
            .get(index)
            .ok_or(RenderError::LayerOutOfRange {
                index,
                len: map.object_layers.len(),
            })?;
        self.draw_object_layer(layer)
    }

    /// Render all top-level tile layers, then all top-level object layers.
    ///
    /// Tile layers that sit above an object layer in the document still end
    /// up underneath it. Put layers into groups and use
    /// [`render_visible_groups`](Self::render_visible_groups) when the exact
    /// order matters.
    pub fn render_visible_layers_and_object_layers(&mut self) -> Result<(), RenderError> {
        self.render_visible_layers()?;
        self.render_visible_object_layers()
    }

    /// Draw a single object without row clipping.
    pub fn render_object_full(
        &mut self,
        layer: &ObjectLayer,
        object: &MapObject,
    ) -> Result<(), RenderError> {
        self.draw_object(layer, object, ObjectStrategy::Full)
    }

    /// Draw only the part of an object above the top of its base tile row.
    pub fn render_object_upper_band(
        &mut self,
        layer: &ObjectLayer,
        object: &MapObject,
    ) -> Result<(), RenderError> {
        self.draw_object(layer, object, ObjectStrategy::UpperBand)
    }

    fn group(&self, index: usize) -> Result<&'m Group, RenderError> {
        let map = self.map;
        map.groups.get(index).ok_or(RenderError::GroupOutOfRange {
            index,
            len: map.groups.len(),
        })
    }

    fn draw_group(&mut self, group: &Group) -> Result<(), RenderError> {
        debug!(
            group = %group.name,
            layers = group.layers.len(),
            object_layers = group.object_layers.len(),
            "Rendering group"
        );

        for layer in group.layers.iter().filter(|l| l.visible) {
            self.draw_tile_layer(layer)?;
        }
        for layer in group.object_layers.iter().filter(|l| l.visible) {
            self.draw_object_layer(layer)?;
        }
        Ok(())
    }

    fn draw_tile_layer(&mut self, layer: &TileLayer) -> Result<(), RenderError> {
        let expected = layer.width as usize * layer.height as usize;
        if layer.data.len() != expected {
            return Err(RenderError::TileDataLength {
                layer: layer.name.clone(),
                expected,
                actual: layer.data.len(),
            });
        }

        let opacity = layer.effective_opacity();
        debug!(layer = %layer.name, opacity, "Rendering tile layer");

        let tile_width = self.map.tile_width as i64;
        let tile_height = self.map.tile_height as i64;

        for (index, &gid) in layer.data.iter().enumerate() {
            if gid.is_empty() {
                continue;
            }

            let col = (index % layer.width as usize) as i64;
            let row = (index / layer.width as usize) as i64;

            let sprite = self.provider.resolve(gid)?;
            let flipped;
            let sprite = if self.options.apply_flip_flags && gid.has_flips() {
                flipped = apply_flips(sprite, gid);
                &flipped
            } else {
                sprite
            };

            // Oversized tiles grow upwards from the bottom-left of their cell
            let placement = Placement::at(
                col * tile_width,
                (row + 1) * tile_height - sprite.height() as i64,
            );
            composite(&mut self.canvas, sprite, placement, opacity);
        }

        Ok(())
    }

    fn draw_object_layer(&mut self, layer: &ObjectLayer) -> Result<(), RenderError> {
        let objects = depth_order(&layer.objects);
        debug!(
            layer = %layer.name,
            objects = objects.len(),
            opacity = layer.effective_opacity(),
            "Rendering object layer"
        );

        let strategy = self.options.object_strategy;
        for object in objects {
            self.draw_object(layer, object, strategy)?;
        }
        Ok(())
    }

    fn draw_object(
        &mut self,
        layer: &ObjectLayer,
        object: &MapObject,
        strategy: ObjectStrategy,
    ) -> Result<(), RenderError> {
        if !object.is_drawable() {
            return Ok(());
        }

        let sprite = self.provider.resolve(object.gid)?;

        let (width, height) = object.pixel_size();
        if width == 0 || height == 0 {
            debug!(object = object.id, "Skipping zero-sized object");
            return Ok(());
        }

        let placement = match strategy {
            ObjectStrategy::Full => Placement::full(object),
            ObjectStrategy::UpperBand => {
                match Placement::upper_band(object, self.map.tile_height) {
                    Some(placement) => placement,
                    None => {
                        debug!(object = object.id, "Upper band empty, nothing to draw");
                        return Ok(());
                    }
                }
            }
        };

        let image = prepare_sprite(object, sprite, &self.options);

        trace!(
            object = object.id,
            gid = object.gid.tile_id(),
            x = placement.x,
            y = placement.y,
            rows = placement.visible_rows(image.height()),
            "Compositing object"
        );

        composite(
            &mut self.canvas,
            &image,
            placement,
            layer.effective_opacity(),
        );
        Ok(())
    }
}
