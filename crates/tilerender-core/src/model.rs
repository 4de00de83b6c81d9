//! Read-only map model consumed by the renderer.
//!
//! These types are snapshots of an already parsed map: groups contain tile
//! layers and object layers, object layers contain free-positioned objects.
//! Nothing in the core mutates them.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner of the map, in pixels
//! - An object's `y` is the *bottom* edge of its footprint
//! - Rotation is in degrees, positive = clockwise

use serde::{Deserialize, Serialize};

/// Global tile id with the Tiled flip flags packed into the high bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gid(pub u32);

impl Gid {
    /// Tile is mirrored along the vertical axis.
    pub const FLIPPED_HORIZONTALLY: u32 = 0x8000_0000;
    /// Tile is mirrored along the horizontal axis.
    pub const FLIPPED_VERTICALLY: u32 = 0x4000_0000;
    /// Tile is mirrored along the top-left to bottom-right diagonal.
    pub const FLIPPED_DIAGONALLY: u32 = 0x2000_0000;
    /// Hexagonal 120 degree rotation. Stripped, never applied.
    pub const ROTATED_HEXAGONAL_120: u32 = 0x1000_0000;

    const FLAG_MASK: u32 = Self::FLIPPED_HORIZONTALLY
        | Self::FLIPPED_VERTICALLY
        | Self::FLIPPED_DIAGONALLY
        | Self::ROTATED_HEXAGONAL_120;

    /// The tile id with all flag bits cleared.
    #[inline]
    pub fn tile_id(self) -> u32 {
        self.0 & !Self::FLAG_MASK
    }

    /// Zero means "no tile".
    #[inline]
    pub fn is_empty(self) -> bool {
        self.tile_id() == 0
    }

    #[inline]
    pub fn flipped_horizontally(self) -> bool {
        self.0 & Self::FLIPPED_HORIZONTALLY != 0
    }

    #[inline]
    pub fn flipped_vertically(self) -> bool {
        self.0 & Self::FLIPPED_VERTICALLY != 0
    }

    #[inline]
    pub fn flipped_diagonally(self) -> bool {
        self.0 & Self::FLIPPED_DIAGONALLY != 0
    }

    /// Returns true if any flip flag is set.
    #[inline]
    pub fn has_flips(self) -> bool {
        self.flipped_horizontally() || self.flipped_vertically() || self.flipped_diagonally()
    }
}

impl From<u32> for Gid {
    fn from(value: u32) -> Self {
        Gid(value)
    }
}

fn default_visible() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

/// A free-positioned sprite instance inside an object layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapObject {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    /// Left edge in pixels.
    pub x: f64,
    /// Bottom edge of the footprint in pixels.
    pub y: f64,
    /// Declared width; the sprite is resized to this.
    #[serde(default)]
    pub width: f64,
    /// Declared height; the sprite is resized to this.
    #[serde(default)]
    pub height: f64,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Tile drawn by this object. Zero means no sprite.
    #[serde(default)]
    pub gid: Gid,
}

impl MapObject {
    /// Create a visible, unrotated tile object.
    pub fn new(gid: impl Into<Gid>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: 0,
            name: String::new(),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            visible: true,
            gid: gid.into(),
        }
    }

    /// True if the object should reach the compositor at all.
    #[inline]
    pub fn is_drawable(&self) -> bool {
        self.visible && !self.gid.is_empty()
    }

    /// Declared size in whole pixels, truncated and floored at zero.
    pub fn pixel_size(&self) -> (u32, u32) {
        // Float to int casts saturate: negatives and NaN become 0.
        (self.width as u32, self.height as u32)
    }
}

/// A collection of free-positioned objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLayer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub objects: Vec<MapObject>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl ObjectLayer {
    pub fn new(name: impl Into<String>, objects: Vec<MapObject>) -> Self {
        Self {
            name: name.into(),
            objects,
            visible: true,
            opacity: 1.0,
        }
    }

    /// Layer opacity clamped to 0.0..=1.0. NaN is treated as fully opaque.
    pub fn effective_opacity(&self) -> f64 {
        clamp_opacity(self.opacity)
    }
}

/// A fixed grid of tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    #[serde(default)]
    pub name: String,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Row-major gids, `width * height` entries.
    #[serde(default)]
    pub data: Vec<Gid>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl TileLayer {
    pub fn new(name: impl Into<String>, width: u32, height: u32, data: Vec<Gid>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            data,
            visible: true,
            opacity: 1.0,
        }
    }

    /// Layer opacity clamped to 0.0..=1.0. NaN is treated as fully opaque.
    pub fn effective_opacity(&self) -> f64 {
        clamp_opacity(self.opacity)
    }
}

/// One level of layer grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub layers: Vec<TileLayer>,
    #[serde(default)]
    pub object_layers: Vec<ObjectLayer>,
}

/// A parsed map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileMap {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    pub tile_width: u32,
    /// Row height used for upper band clipping of objects.
    pub tile_height: u32,
    #[serde(default)]
    pub layers: Vec<TileLayer>,
    #[serde(default)]
    pub object_layers: Vec<ObjectLayer>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl TileMap {
    /// Create an empty map.
    pub fn new(width: u32, height: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            width,
            height,
            tile_width,
            tile_height,
            layers: Vec::new(),
            object_layers: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Size of the rendered map in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.width.saturating_mul(self.tile_width),
            self.height.saturating_mul(self.tile_height),
        )
    }
}

fn clamp_opacity(opacity: f64) -> f64 {
    if opacity.is_nan() {
        1.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gid_strips_flags() {
        let gid = Gid(5 | Gid::FLIPPED_HORIZONTALLY | Gid::FLIPPED_DIAGONALLY);
        assert_eq!(gid.tile_id(), 5);
        assert!(gid.flipped_horizontally());
        assert!(!gid.flipped_vertically());
        assert!(gid.flipped_diagonally());
        assert!(gid.has_flips());
    }

    #[test]
    fn test_gid_empty() {
        assert!(Gid(0).is_empty());
        // Flags alone do not make a tile.
        assert!(Gid(Gid::FLIPPED_VERTICALLY).is_empty());
        assert!(!Gid(1).is_empty());
    }

    #[test]
    fn test_object_drawable() {
        let mut obj = MapObject::new(3, 0.0, 16.0, 16.0, 16.0);
        assert!(obj.is_drawable());

        obj.visible = false;
        assert!(!obj.is_drawable());

        obj.visible = true;
        obj.gid = Gid(0);
        assert!(!obj.is_drawable());
    }

    #[test]
    fn test_object_pixel_size_truncates() {
        let obj = MapObject::new(1, 0.0, 0.0, 15.9, 32.2);
        assert_eq!(obj.pixel_size(), (15, 32));

        let negative = MapObject::new(1, 0.0, 0.0, -4.0, f64::NAN);
        assert_eq!(negative.pixel_size(), (0, 0));
    }

    #[test]
    fn test_effective_opacity_clamps() {
        let mut layer = ObjectLayer::new("objects", vec![]);
        layer.opacity = 1.5;
        assert_eq!(layer.effective_opacity(), 1.0);
        layer.opacity = -0.2;
        assert_eq!(layer.effective_opacity(), 0.0);
        layer.opacity = f64::NAN;
        assert_eq!(layer.effective_opacity(), 1.0);
        layer.opacity = 0.25;
        assert_eq!(layer.effective_opacity(), 0.25);
    }

    #[test]
    fn test_map_pixel_size() {
        let map = TileMap::new(10, 8, 16, 24);
        assert_eq!(map.pixel_size(), (160, 192));
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "width": 2,
            "height": 2,
            "tileWidth": 16,
            "tileHeight": 16,
            "objectLayers": [
                { "name": "props", "objects": [ { "x": 4, "y": 32, "gid": 7 } ] }
            ]
        }"#;

        let map: TileMap = serde_json::from_str(json).unwrap();
        let layer = &map.object_layers[0];
        assert!(layer.visible);
        assert_eq!(layer.opacity, 1.0);

        let obj = &layer.objects[0];
        assert!(obj.visible);
        assert_eq!(obj.gid, Gid(7));
        assert_eq!(obj.rotation, 0.0);
        assert!(map.groups.is_empty());
    }
}
