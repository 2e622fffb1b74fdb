mod canvas;
mod outline;
mod packer;
mod sdf;

use crate::{
    error::FontError,
    geometry::{FlatOutline, Point, Rect, Size},
    lookups::{AtlasLayout, Lookups},
};

pub use canvas::AtlasBitmap;
pub use sdf::{edge_width, sdf_alpha};

pub(crate) use outline::glyph_outline;

use packer::ShelfPacker;
use sdf::{cell_size, render_coverage, render_sdf, CellMapping, MAX_CELL_SIDE};

#[derive(Debug, Clone, PartialEq)]
pub struct AtlasOptions {
    /// Signed distance field when set, plain coverage mask otherwise
    pub use_sdf: bool,

    /// Pixels per em glyphs are rasterized at
    pub em_size: f32,

    /// Empty pixels around each glyph box, on every side
    pub padding: u32,

    /// Distance in pixels over which the field goes from 0.5 to 0 or 1
    pub radius: f32,

    /// Minimum atlas width; widened if a single cell does not fit
    pub atlas_width: u32,

    /// Characters to rasterize, every mapped character when `None`
    pub characters: Option<Vec<char>>,
}

impl AtlasOptions {
    pub fn printable_ascii() -> Vec<char> {
        (32u8..=126).map(char::from).collect()
    }
}

impl Default for AtlasOptions {
    fn default() -> Self {
        Self {
            use_sdf: true,
            em_size: 48.0,
            padding: 6,
            radius: 8.0,
            atlas_width: 1024,
            characters: Some(Self::printable_ascii()),
        }
    }
}

struct GlyphCell {
    character: char,
    width: u32,
    height: u32,
    inner: Size,
    pixels: Vec<u8>,
}

/// Rasterizes the requested glyphs, packs them into one atlas and records
/// their cells and UVs in `lookups`. Can run only once per [`Lookups`]
pub fn render_font_atlas(
    lookups: &mut Lookups,
    buffer: &[u8],
    options: &AtlasOptions,
) -> anyhow::Result<AtlasBitmap> {
    if lookups.atlas.is_some() {
        anyhow::bail!(FontError::AtlasAlreadyRendered);
    }

    let characters = match &options.characters {
        Some(characters) => {
            let mut characters = characters.clone();
            characters.sort_unstable();
            characters.dedup();
            characters
        }
        None => lookups.glyphs().keys().copied().collect(),
    };

    let scale = options.em_size / f32::from(lookups.units_per_em());
    let padding = options.padding as f32;

    let mut cells = Vec::with_capacity(characters.len());

    for character in characters {
        let Some(glyph) = lookups.glyph(character).copied() else {
            log::debug!("{:?} is not in cmap, leaving it out of the atlas", character);
            continue;
        };

        let (width, height) = cell_size(glyph.width, glyph.height, scale, options.padding)
            .ok_or(FontError::GlyphTooLarge {
                codepoint: glyph.id,
                max: MAX_CELL_SIDE,
            })?;

        let outline = glyph_outline(lookups.tables(), buffer, glyph.glyph_index)?;

        let mapping = CellMapping {
            x: glyph.x as f32,
            y: glyph.y as f32,
            height: glyph.height as f32,
            scale,
            padding,
        };

        let flat = FlatOutline::new(&outline, mapping.tolerance());

        let pixels = if options.use_sdf {
            render_sdf(&flat, mapping, options.radius, width, height)
        } else {
            render_coverage(&flat, mapping, width, height)
        };

        log::trace!(
            "rasterized {:?}: {} segments into {}x{}",
            character,
            flat.lines().len(),
            width,
            height
        );

        cells.push(GlyphCell {
            character,
            width,
            height,
            inner: Size::new(
                glyph.width.max(0) as f32 * scale,
                glyph.height.max(0) as f32 * scale,
            ),
            pixels,
        });
    }

    let widest = cells.iter().map(|cell| cell.width).max().unwrap_or(0);
    let mut packer = ShelfPacker::new(options.atlas_width.max(widest).max(1));

    let mut placed = Vec::with_capacity(cells.len());

    for cell in &cells {
        let (x, y) = packer
            .pack(cell.width, cell.height)
            .ok_or(FontError::Malformed {
                table: "atlas",
                reason: "glyph cell wider than the atlas",
            })?;

        placed.push((x, y));
    }

    let mut bitmap = AtlasBitmap::new(packer.width(), packer.height().max(1));
    let mut layout = AtlasLayout {
        width: bitmap.width(),
        height: bitmap.height(),
        ..AtlasLayout::default()
    };

    let atlas_width = bitmap.width() as f32;
    let atlas_height = bitmap.height() as f32;

    for (cell, &(x, y)) in cells.iter().zip(&placed) {
        bitmap.blit(x, y, cell.width, cell.height, &cell.pixels)?;

        layout
            .positions
            .insert(cell.character, Point::new(x as f32, y as f32));
        layout.sizes.insert(
            cell.character,
            Size::new(cell.width as f32, cell.height as f32),
        );

        lookups.uvs.insert(
            cell.character,
            Rect::new(
                (x as f32 + padding) / atlas_width,
                (y as f32 + padding) / atlas_height,
                cell.inner.width / atlas_width,
                cell.inner.height / atlas_height,
            ),
        );
    }

    log::debug!(
        "atlas: {} glyphs in {}x{} pixels",
        cells.len(),
        layout.width,
        layout.height
    );

    lookups.atlas = Some(layout);

    Ok(bitmap)
}

#[cfg(test)]
mod test {
    use crate::{
        error::ErrorKind,
        lookups::prepare_lookups,
        test_font::{GlyphShape, TestFont},
        true_type::FontTables,
    };

    use super::*;

    fn font() -> TestFont {
        let mut font = TestFont::new(1000);

        font.glyph(' ', GlyphShape::Empty, 250, 0);
        font.glyph('A', GlyphShape::rectangle(0, 0, 600, 700), 600, 0);
        font.glyph('B', GlyphShape::rectangle(50, 0, 550, 700), 600, 50);
        font.glyph('g', GlyphShape::rectangle(40, -200, 500, 500), 560, 40);
        font.glyph('l', GlyphShape::rectangle(100, 0, 200, 750), 300, 100);

        font
    }

    fn rendered(options: &AtlasOptions) -> (Lookups, AtlasBitmap) {
        let bytes = font().build();
        let mut lookups = prepare_lookups(FontTables::parse(&bytes).unwrap());
        let bitmap = render_font_atlas(&mut lookups, &bytes, options).unwrap();

        (lookups, bitmap)
    }

    #[test]
    fn every_requested_mapped_glyph_gets_a_uv() {
        let (lookups, bitmap) = rendered(&AtlasOptions::default());

        assert_eq!(
            lookups.uvs().keys().copied().collect::<Vec<_>>(),
            vec![' ', 'A', 'B', 'g', 'l']
        );

        let atlas = lookups.atlas().unwrap();
        assert_eq!((atlas.width, atlas.height), (bitmap.width(), bitmap.height()));
    }

    #[test]
    fn uvs_lie_inside_unit_square() {
        let (lookups, _) = rendered(&AtlasOptions::default());

        for uv in lookups.uvs().values() {
            assert!(uv.x >= 0.0 && uv.y >= 0.0);
            assert!(uv.x + uv.width <= 1.0 && uv.y + uv.height <= 1.0);
        }
    }

    #[test]
    fn cells_do_not_overlap() {
        let options = AtlasOptions {
            atlas_width: 64,
            ..AtlasOptions::default()
        };
        let (lookups, bitmap) = rendered(&options);
        let atlas = lookups.atlas().unwrap();

        let cells = atlas
            .positions
            .iter()
            .map(|(c, p)| (p, atlas.sizes[c]))
            .collect::<Vec<_>>();

        for (i, &(a, a_size)) in cells.iter().enumerate() {
            assert!(a.x + a_size.width <= bitmap.width() as f32);
            assert!(a.y + a_size.height <= bitmap.height() as f32);

            for &(b, b_size) in &cells[i + 1..] {
                let apart = a.x + a_size.width <= b.x
                    || b.x + b_size.width <= a.x
                    || a.y + a_size.height <= b.y
                    || b.y + b_size.height <= a.y;

                assert!(apart);
            }
        }
    }

    #[test]
    fn narrow_atlas_is_widened_to_widest_cell() {
        let options = AtlasOptions {
            atlas_width: 8,
            ..AtlasOptions::default()
        };
        let (lookups, bitmap) = rendered(&options);

        // 'A' is 600 units at 48px/em plus padding
        assert_eq!(bitmap.width(), 29 + 12);
        assert_eq!(lookups.atlas().unwrap().sizes[&'A'], Size::new(41.0, 46.0));
    }

    #[test]
    fn sdf_cell_center_is_inside_and_padding_outside() {
        let (lookups, bitmap) = rendered(&AtlasOptions::default());
        let atlas = lookups.atlas().unwrap();

        let position = atlas.positions[&'A'];
        let size = atlas.sizes[&'A'];

        let center = bitmap
            .value(
                (position.x + size.width / 2.0) as u32,
                (position.y + size.height / 2.0) as u32,
            )
            .unwrap();
        let corner = bitmap.value(position.x as u32, position.y as u32).unwrap();

        assert!(center > 128);
        assert!(corner < 128);
    }

    #[test]
    fn coverage_mode_fills_glyph_box() {
        let options = AtlasOptions {
            use_sdf: false,
            ..AtlasOptions::default()
        };
        let (lookups, bitmap) = rendered(&options);
        let position = lookups.atlas().unwrap().positions[&'l'];

        // 'l' starts 6px in and is 5px wide
        assert_eq!(
            bitmap.value(position.x as u32 + 8, position.y as u32 + 20),
            Some(255)
        );
        assert_eq!(
            bitmap.value(position.x as u32 + 1, position.y as u32 + 20),
            Some(0)
        );
    }

    #[test]
    fn unmapped_characters_are_skipped() {
        let options = AtlasOptions {
            characters: Some(vec!['A', 'Z']),
            ..AtlasOptions::default()
        };
        let (lookups, _) = rendered(&options);

        assert!(lookups.uv('A').is_some());
        assert!(lookups.uv('Z').is_none());
    }

    #[test]
    fn all_characters_when_unrestricted() {
        let options = AtlasOptions {
            characters: None,
            ..AtlasOptions::default()
        };
        let (lookups, _) = rendered(&options);

        assert_eq!(lookups.uvs().len(), lookups.glyphs().len());
    }

    #[test]
    fn oversized_glyph_is_bounds_error() {
        let mut font = TestFont::new(16);
        font.glyph('A', GlyphShape::rectangle(0, 0, 30000, 30000), 30000, 0);

        let bytes = font.build();
        let mut lookups = prepare_lookups(FontTables::parse(&bytes).unwrap());

        let err = render_font_atlas(&mut lookups, &bytes, &AtlasOptions::default()).unwrap_err();

        assert_eq!(FontError::kind_of(&err), Some(ErrorKind::Bounds));
        assert!(matches!(
            err.downcast_ref::<FontError>(),
            Some(FontError::GlyphTooLarge { codepoint: 0x41, .. })
        ));
        assert!(lookups.atlas().is_none());
    }

    /// A dome: one quadratic from (0, 0) over (500, 1000) to (1000, 0), closed
    /// along the baseline. Its apex is at (500, 500)
    fn dome(use_sdf: bool) -> (Point, AtlasBitmap) {
        let mut font = TestFont::new(1000);
        font.glyph(
            'n',
            GlyphShape::Simple(vec![vec![(0, 0, true), (500, 1000, false), (1000, 0, true)]]),
            1000,
            0,
        );

        let bytes = font.build();
        let mut lookups = prepare_lookups(FontTables::parse(&bytes).unwrap());
        let options = AtlasOptions {
            use_sdf,
            characters: Some(vec!['n']),
            ..AtlasOptions::default()
        };
        let bitmap = render_font_atlas(&mut lookups, &bytes, &options).unwrap();

        (lookups.atlas().unwrap().positions[&'n'], bitmap)
    }

    #[test]
    fn sdf_follows_quadratic_outline() {
        let (position, bitmap) = dome(true);
        let at = |x: u32, y: u32| {
            bitmap
                .value(position.x as u32 + x, position.y as u32 + y)
                .unwrap()
        };

        // column 29 is x = 490 units; the curve crosses it at y = 500 units.
        // rows 39, 30 and 20 sit at y = 302, 490 and 698 units
        assert!(at(29, 39) > 128);
        assert!(at(29, 30) > 128);
        assert!(at(29, 20) < 128);
        assert!(at(29, 39) > at(29, 30));
        assert!(at(29, 30) > at(29, 20));

        // inside the glyph box but above the curve's flank
        assert!(at(10, 15) < 128);
    }

    #[test]
    fn coverage_follows_quadratic_outline() {
        let (position, bitmap) = dome(false);
        let at = |x: u32, y: u32| {
            bitmap
                .value(position.x as u32 + x, position.y as u32 + y)
                .unwrap()
        };

        assert_eq!(at(29, 39), 255);
        assert_eq!(at(29, 20), 0);
        assert_eq!(at(10, 15), 0);
    }

    #[test]
    fn second_atlas_pass_is_rejected() {
        let bytes = font().build();
        let mut lookups = prepare_lookups(FontTables::parse(&bytes).unwrap());

        render_font_atlas(&mut lookups, &bytes, &AtlasOptions::default()).unwrap();

        let err = render_font_atlas(&mut lookups, &bytes, &AtlasOptions::default()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FontError>(),
            Some(FontError::AtlasAlreadyRendered)
        ));
    }
}
