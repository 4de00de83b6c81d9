//! Sprite lookup for tile references.
//!
//! The renderer never decodes or loads images itself. It asks an
//! [`ImageProvider`] for the already decoded sprite of a tile id and treats
//! the result as read-only.
//!
//! [`SpriteAtlas`] is the in-memory provider shipped with the crate: decoded
//! tileset sheets are sliced once into per-tile sprites, which are then shared
//! by every render call.

use std::collections::HashMap;

use image::RgbaImage;
use thiserror::Error;
use tracing::debug;

use crate::error::RenderError;
use crate::model::Gid;

/// Error returned when a tile reference cannot be resolved to a sprite.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No sprite is registered for the tile id.
    #[error("No sprite registered for tile id {0}")]
    UnknownGid(u32),

    /// A sprite is registered but has no pixels.
    #[error("Sprite for tile id {0} is empty")]
    EmptyTile(u32),
}

/// Resolves tile references to decoded sprites.
pub trait ImageProvider {
    /// Look up the sprite for `gid`. Flip flags are ignored.
    fn resolve(&self, gid: Gid) -> Result<&RgbaImage, LookupError>;
}

impl<P: ImageProvider + ?Sized> ImageProvider for &P {
    fn resolve(&self, gid: Gid) -> Result<&RgbaImage, LookupError> {
        (**self).resolve(gid)
    }
}

/// Grid geometry of a tileset sheet, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SheetLayout {
    pub tile_width: u32,
    pub tile_height: u32,
    /// Tiles per row.
    pub columns: u32,
    /// Total tiles in the sheet.
    pub tile_count: u32,
    /// Border around the whole grid.
    pub margin: u32,
    /// Gap between neighbouring tiles.
    pub spacing: u32,
}

impl SheetLayout {
    /// A sheet without margin or spacing.
    pub fn grid(tile_width: u32, tile_height: u32, columns: u32, tile_count: u32) -> Self {
        Self {
            tile_width,
            tile_height,
            columns,
            tile_count,
            margin: 0,
            spacing: 0,
        }
    }

    /// Top-left corner of tile `index` inside the sheet, or `None` if the
    /// position does not fit in `u32`. `columns` must be non-zero.
    fn tile_origin(&self, index: u32) -> Option<(u32, u32)> {
        let col = index % self.columns;
        let row = index / self.columns;
        let x = self
            .tile_width
            .checked_add(self.spacing)?
            .checked_mul(col)?
            .checked_add(self.margin)?;
        let y = self
            .tile_height
            .checked_add(self.spacing)?
            .checked_mul(row)?
            .checked_add(self.margin)?;
        Some((x, y))
    }

    /// Origins of every tile, checked against a `width` x `height` sheet.
    fn tile_origins(&self, width: u32, height: u32) -> Result<Vec<(u32, u32)>, RenderError> {
        (0..self.tile_count)
            .map(|index| {
                let origin = self.tile_origin(index).filter(|&(x, y)| {
                    x.checked_add(self.tile_width).is_some_and(|r| r <= width)
                        && y.checked_add(self.tile_height).is_some_and(|b| b <= height)
                });
                origin.ok_or_else(|| {
                    RenderError::InvalidSheet(format!(
                        "tile {} does not fit in {}x{} sheet",
                        index, width, height
                    ))
                })
            })
            .collect()
    }
}

/// In-memory sprite provider keyed by tile id.
#[derive(Debug, Clone, Default)]
pub struct SpriteAtlas {
    sprites: HashMap<u32, RgbaImage>,
}

impl SpriteAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single sprite. Returns the previous sprite for the id, if any.
    pub fn insert(&mut self, tile_id: u32, sprite: RgbaImage) -> Option<RgbaImage> {
        self.sprites.insert(tile_id, sprite)
    }

    /// Slice a decoded tileset sheet into sprites with consecutive ids
    /// starting at `first_gid`.
    ///
    /// # Returns
    ///
    /// The number of sprites registered.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::InvalidSheet` if the layout has zero-sized tiles
    /// or no columns, if a tile would extend past the sheet, or if the tile
    /// ids would overflow. The atlas is left untouched on error.
    pub fn add_sheet(
        &mut self,
        first_gid: u32,
        sheet: &RgbaImage,
        layout: SheetLayout,
    ) -> Result<usize, RenderError> {
        if layout.tile_width == 0 || layout.tile_height == 0 || layout.columns == 0 {
            return Err(RenderError::InvalidSheet(format!(
                "degenerate layout {}x{} with {} columns",
                layout.tile_width, layout.tile_height, layout.columns
            )));
        }

        if first_gid.checked_add(layout.tile_count).is_none() {
            return Err(RenderError::InvalidSheet(format!(
                "{} tiles from gid {} overflow the tile id range",
                layout.tile_count, first_gid
            )));
        }

        // Validate the whole layout before touching the atlas
        let origins = layout.tile_origins(sheet.width(), sheet.height())?;

        for ((x, y), gid) in origins.into_iter().zip(first_gid..) {
            let sprite =
                image::imageops::crop_imm(sheet, x, y, layout.tile_width, layout.tile_height)
                    .to_image();
            self.sprites.insert(gid, sprite);
        }

        debug!(
            first_gid,
            tiles = layout.tile_count,
            "Sliced tileset sheet into sprites"
        );

        Ok(layout.tile_count as usize)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl ImageProvider for SpriteAtlas {
    fn resolve(&self, gid: Gid) -> Result<&RgbaImage, LookupError> {
        let id = gid.tile_id();
        let sprite = self.sprites.get(&id).ok_or(LookupError::UnknownGid(id))?;
        if sprite.width() == 0 || sprite.height() == 0 {
            return Err(LookupError::EmptyTile(id));
        }
        Ok(sprite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// A sheet where every tile is filled with its own index as the red channel.
    fn indexed_sheet(layout: SheetLayout, width: u32, height: u32) -> RgbaImage {
        let mut sheet = RgbaImage::new(width, height);
        for index in 0..layout.tile_count {
            let (ox, oy) = layout.tile_origin(index).unwrap();
            for y in oy..oy + layout.tile_height {
                for x in ox..ox + layout.tile_width {
                    sheet.put_pixel(x, y, Rgba([index as u8, 0, 0, 255]));
                }
            }
        }
        sheet
    }

    #[test]
    fn test_resolve_unknown_gid() {
        let atlas = SpriteAtlas::new();
        assert_eq!(atlas.resolve(Gid(4)), Err(LookupError::UnknownGid(4)));
    }

    #[test]
    fn test_resolve_ignores_flip_flags() {
        let mut atlas = SpriteAtlas::new();
        atlas.insert(2, RgbaImage::new(4, 4));

        let gid = Gid(2 | Gid::FLIPPED_HORIZONTALLY | Gid::FLIPPED_VERTICALLY);
        assert!(atlas.resolve(gid).is_ok());
    }

    #[test]
    fn test_resolve_empty_sprite() {
        let mut atlas = SpriteAtlas::new();
        atlas.insert(1, RgbaImage::new(0, 0));
        assert_eq!(atlas.resolve(Gid(1)), Err(LookupError::EmptyTile(1)));
    }

    #[test]
    fn test_add_sheet_slices_tiles() {
        let layout = SheetLayout::grid(8, 8, 2, 4);
        let sheet = indexed_sheet(layout, 16, 16);

        let mut atlas = SpriteAtlas::new();
        let added = atlas.add_sheet(10, &sheet, layout).unwrap();
        assert_eq!(added, 4);
        assert_eq!(atlas.len(), 4);

        for index in 0..4u32 {
            let sprite = atlas.resolve(Gid(10 + index)).unwrap();
            assert_eq!(sprite.dimensions(), (8, 8));
            assert_eq!(sprite.get_pixel(3, 3)[0], index as u8);
        }
    }

    #[test]
    fn test_add_sheet_with_margin_and_spacing() {
        let layout = SheetLayout {
            tile_width: 4,
            tile_height: 4,
            columns: 2,
            tile_count: 2,
            margin: 1,
            spacing: 2,
        };
        // 1 + 4 + 2 + 4 + 1 = 12 wide
        let sheet = indexed_sheet(layout, 12, 6);

        let mut atlas = SpriteAtlas::new();
        atlas.add_sheet(1, &sheet, layout).unwrap();

        let second = atlas.resolve(Gid(2)).unwrap();
        assert_eq!(second.get_pixel(0, 0), &Rgba([1, 0, 0, 255]));
        assert_eq!(second.get_pixel(3, 3), &Rgba([1, 0, 0, 255]));
    }

    #[test]
    fn test_add_sheet_rejects_overflow() {
        let layout = SheetLayout::grid(8, 8, 2, 5);
        let sheet = RgbaImage::new(16, 16);

        let mut atlas = SpriteAtlas::new();
        let err = atlas.add_sheet(1, &sheet, layout).unwrap_err();
        assert!(matches!(err, RenderError::InvalidSheet(_)));
        assert!(atlas.is_empty());
    }

    #[test]
    fn test_add_sheet_failure_keeps_existing_sprites() {
        let marker = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));
        let mut atlas = SpriteAtlas::new();
        atlas.insert(1, marker.clone());

        // Tiles 1..=4 fit, tile 5 does not
        let sheet = RgbaImage::new(16, 16);
        assert!(atlas
            .add_sheet(1, &sheet, SheetLayout::grid(8, 8, 2, 5))
            .is_err());

        assert_eq!(atlas.len(), 1);
        assert_eq!(atlas.resolve(Gid(1)).unwrap(), &marker);
    }

    #[test]
    fn test_add_sheet_rejects_huge_spacing() {
        let layout = SheetLayout {
            spacing: u32::MAX,
            ..SheetLayout::grid(8, 8, 2, 2)
        };
        let sheet = RgbaImage::new(16, 16);

        let mut atlas = SpriteAtlas::new();
        let err = atlas.add_sheet(1, &sheet, layout).unwrap_err();
        assert!(matches!(err, RenderError::InvalidSheet(_)));
        assert!(atlas.is_empty());
    }

    #[test]
    fn test_add_sheet_rejects_huge_margin() {
        let layout = SheetLayout {
            margin: u32::MAX,
            ..SheetLayout::grid(8, 8, 1, 1)
        };
        let sheet = RgbaImage::new(16, 16);

        let mut atlas = SpriteAtlas::new();
        assert!(matches!(
            atlas.add_sheet(1, &sheet, layout),
            Err(RenderError::InvalidSheet(_))
        ));
    }

    #[test]
    fn test_add_sheet_rejects_gid_overflow() {
        let layout = SheetLayout::grid(8, 8, 2, 4);
        let sheet = RgbaImage::new(16, 16);

        let mut atlas = SpriteAtlas::new();
        assert!(matches!(
            atlas.add_sheet(u32::MAX - 1, &sheet, layout),
            Err(RenderError::InvalidSheet(_))
        ));
        assert!(atlas.is_empty());
    }

    #[test]
    fn test_add_sheet_rejects_degenerate_layout() {
        let sheet = RgbaImage::new(16, 16);
        let mut atlas = SpriteAtlas::new();
        assert!(atlas
            .add_sheet(1, &sheet, SheetLayout::grid(0, 8, 2, 1))
            .is_err());
        assert!(atlas
            .add_sheet(1, &sheet, SheetLayout::grid(8, 8, 0, 1))
            .is_err());
    }

    #[test]
    fn test_lookup_error_display() {
        assert_eq!(
            LookupError::UnknownGid(9).to_string(),
            "No sprite registered for tile id 9"
        );
    }
}
