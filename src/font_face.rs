use std::path::Path;

use crate::{
    lookups::{prepare_lookups, Lookups},
    render::{render_font_atlas, AtlasBitmap, AtlasOptions},
    shape::{shape_text, Shape},
    text::GlyphBatch,
    true_type::FontTables,
};

/// A parsed font with its rendered atlas. Either fully built or not at all
#[derive(Debug)]
pub struct FontFace {
    lookups: Lookups,
    atlas: AtlasBitmap,
}

impl FontFace {
    pub fn load(path: impl AsRef<Path>, options: &AtlasOptions) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let buffer = std::fs::read(path)?;

        log::debug!("loaded {} ({} bytes)", path.display(), buffer.len());

        Self::from_bytes(&buffer, options)
    }

    pub fn from_bytes(buffer: &[u8], options: &AtlasOptions) -> anyhow::Result<Self> {
        let tables = FontTables::parse(buffer)?;
        let mut lookups = prepare_lookups(tables);
        let atlas = render_font_atlas(&mut lookups, buffer, options)?;

        Ok(Self { lookups, atlas })
    }

    pub fn lookups(&self) -> &Lookups {
        &self.lookups
    }

    pub fn atlas(&self) -> &AtlasBitmap {
        &self.atlas
    }

    pub fn shape(&self, text: &str, font_size: f32) -> anyhow::Result<Shape> {
        shape_text(&self.lookups, text, font_size)
    }

    pub fn batch(
        &self,
        viewport_width: f32,
        viewport_height: f32,
        device_pixel_ratio: f32,
    ) -> GlyphBatch<'_> {
        GlyphBatch::new(
            &self.lookups,
            viewport_width,
            viewport_height,
            device_pixel_ratio,
        )
    }
}
