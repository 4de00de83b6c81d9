//! Tilerender Core - Tile map rasterization library
//!
//! This crate composites a parsed tile map into a single RGBA canvas. The
//! interesting part is the object pipeline:
//!
//! - [`sort`] - back-to-front ordering of the objects in a layer
//! - [`transform`] - nearest-neighbor resize and rotation of each sprite
//! - [`composite`] - placement, upper-band row clipping and alpha blending
//! - [`render`] - the layer walk tying it together
//!
//! Map parsing, image decoding and output encoding live outside the crate:
//! callers hand in a [`model::TileMap`] and an [`provider::ImageProvider`]
//! with decoded sprites, and take the finished [`image::RgbaImage`] back.

pub mod composite;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;
pub mod sort;
pub mod transform;

use serde::{Deserialize, Serialize};

pub use error::RenderError;
pub use model::{Gid, Group, MapObject, ObjectLayer, TileLayer, TileMap};
pub use provider::{ImageProvider, LookupError, SheetLayout, SpriteAtlas};
pub use render::Renderer;
pub use transform::InterpolationFilter;

/// How the layer walk draws each object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectStrategy {
    /// Only the part of the sprite above the object's base tile row.
    #[default]
    UpperBand,
    /// The whole sprite.
    Full,
}

/// Options for a render session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Object drawing strategy used when walking object layers
    pub object_strategy: ObjectStrategy,
    /// Resampling filter for rotated objects
    pub rotation_filter: InterpolationFilter,
    /// Apply the flip bits packed into tile gids
    pub apply_flip_flags: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            object_strategy: ObjectStrategy::UpperBand,
            rotation_filter: InterpolationFilter::Bilinear,
            apply_flip_flags: true,
        }
    }
}

impl RenderOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }
}
