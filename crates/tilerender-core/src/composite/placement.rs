//! Destination placement and tile-row clipping for objects.
//!
//! An object's footprint is anchored at its bottom-left corner `(x, y)`.
//! Its sprite is drawn with the top-left corner at `(x, y - height)`.
//!
//! # Upper Band
//!
//! A tall object standing in tile row `n` overlaps the tiles of rows above
//! it. To layer it against the tile grid, the renderer can draw only the part
//! of the sprite that lies above the top of row `n`:
//!
//! ```text
//! row_boundary = floor(y / tile_height) * tile_height
//! left_top     = y - height
//! band_height  = row_boundary - left_top
//! ```
//!
//! Only one band is computed. An object spanning three or more rows draws
//! everything above its base row in a single upper pass.

use crate::model::MapObject;

/// Where a transformed sprite lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Canvas x of the sprite's left edge.
    pub x: i64,
    /// Canvas y of the sprite's top edge.
    pub y: i64,
    /// Draw at most this many sprite rows from the top; `None` draws all.
    pub max_rows: Option<u32>,
}

impl Placement {
    /// Unclipped placement at a canvas position.
    pub fn at(x: i64, y: i64) -> Self {
        Self {
            x,
            y,
            max_rows: None,
        }
    }

    /// Unclipped placement for an object: top-left at `(x, y - height)`.
    pub fn full(object: &MapObject) -> Self {
        Self::at(object.x as i64, (object.y - object.height) as i64)
    }

    /// Placement clipped to the object's upper band.
    ///
    /// Returns `None` when nothing lies above the row boundary, i.e. the
    /// upper pass is a no-op.
    pub fn upper_band(object: &MapObject, tile_height: u32) -> Option<Self> {
        let Some(band) = RowBand::compute(object, tile_height) else {
            return Some(Self::full(object));
        };

        let rows = band.height as i64;
        if rows <= 0 {
            return None;
        }

        Some(Self {
            x: object.x as i64,
            y: band.left_top as i64,
            max_rows: Some(rows.min(u32::MAX as i64) as u32),
        })
    }

    /// Number of sprite rows this placement draws for a sprite of `height` rows.
    pub fn visible_rows(&self, height: u32) -> u32 {
        self.max_rows.map_or(height, |rows| rows.min(height))
    }
}

/// Row-clipping geometry of one object, in continuous map coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBand {
    /// Top edge of the object's bounding box.
    pub left_top: f64,
    /// Top of the tile row containing the object's bottom edge.
    pub row_boundary: f64,
    /// Part of the object's height above `row_boundary`.
    pub height: f64,
}

impl RowBand {
    /// Compute the band for an object on a grid of `tile_height` rows.
    ///
    /// Returns `None` for a zero tile height, where there are no rows to clip
    /// against.
    pub fn compute(object: &MapObject, tile_height: u32) -> Option<Self> {
        if tile_height == 0 {
            return None;
        }

        let tile_height = tile_height as f64;
        let row_boundary = (object.y / tile_height).floor() * tile_height;
        let left_top = object.y - object.height;

        Some(Self {
            left_top,
            row_boundary,
            height: row_boundary - left_top,
        })
    }

    /// True if the whole object fits above the boundary, making the clip a no-op.
    pub fn covers_object(&self, object: &MapObject) -> bool {
        self.height >= object.height
    }
}
