use std::collections::BTreeMap;

use crate::{
    geometry::{Point, Rect, Size},
    true_type::FontTables,
};

/// Metrics of one mapped character, in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// Unicode code point
    pub id: u32,
    pub character: char,
    pub glyph_index: u16,

    /// Glyph box from the `glyf` header: `xMin`, `yMin` and extents
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,

    /// Left side bearing from `hmtx`
    pub lsb: i32,
    /// `advance - lsb - width`
    pub rsb: i32,
    pub advance_width: i32,
}

/// Pixel placement of every glyph cell inside the atlas image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtlasLayout {
    pub width: u32,
    pub height: u32,
    pub positions: BTreeMap<char, Point>,
    pub sizes: BTreeMap<char, Size>,
}

/// Everything needed to lay out text with one font. Built from metrics only;
/// the atlas pass adds UVs once, after which it is read-only
#[derive(Debug)]
pub struct Lookups {
    units_per_em: u16,
    cap_height: i32,
    ascender: i32,
    glyphs: BTreeMap<char, Glyph>,
    pub(crate) uvs: BTreeMap<char, Rect>,
    pub(crate) atlas: Option<AtlasLayout>,
    tables: FontTables,
}

impl Lookups {
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// `hhea.ascender + hhea.descender`
    pub fn cap_height(&self) -> i32 {
        self.cap_height
    }

    pub fn ascender(&self) -> i32 {
        self.ascender
    }

    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    pub fn glyphs(&self) -> &BTreeMap<char, Glyph> {
        &self.glyphs
    }

    /// Normalized rectangle of the glyph box inside the atlas
    pub fn uv(&self, c: char) -> Option<Rect> {
        self.uvs.get(&c).copied()
    }

    pub fn uvs(&self) -> &BTreeMap<char, Rect> {
        &self.uvs
    }

    /// `None` until the atlas has been rendered
    pub fn atlas(&self) -> Option<&AtlasLayout> {
        self.atlas.as_ref()
    }

    pub fn tables(&self) -> &FontTables {
        &self.tables
    }

    /// Pair adjustment in font units to add between `a` and `b`, 0 without
    /// a matching GPOS pair
    pub fn kern(&self, a: char, b: char) -> i16 {
        let Some(gpos) = &self.tables.gpos else {
            return 0;
        };

        let first = self.tables.cmap.glyph_index(u32::from(a));
        let second = self.tables.cmap.glyph_index(u32::from(b));

        if first == 0 || second == 0 {
            return 0;
        }

        gpos.pair_x_advance(first, second).unwrap_or(0)
    }
}

/// Derives per-character metrics from the parsed tables. Every codepoint in
/// `cmap` gets a [`Glyph`]; UVs are left empty for the atlas pass
pub fn prepare_lookups(tables: FontTables) -> Lookups {
    let units_per_em = tables.head.units_per_em;
    let ascender = i32::from(tables.hhea.ascender);
    let cap_height = ascender + i32::from(tables.hhea.descender);

    let mut glyphs = BTreeMap::new();

    for (&codepoint, &glyph_index) in &tables.cmap.glyph_index_map {
        let Some(character) = char::from_u32(codepoint) else {
            log::trace!("skipping non-scalar codepoint U+{:04X}", codepoint);
            continue;
        };

        let Some(header) = tables.glyf.glyphs.get(usize::from(glyph_index)) else {
            log::trace!(
                "U+{:04X} maps to glyph {} past the end of glyf",
                codepoint,
                glyph_index
            );
            continue;
        };

        let advance_width = i32::from(tables.hmtx.advance_width(glyph_index));
        let lsb = i32::from(tables.hmtx.left_side_bearing(glyph_index));
        let width = header.width();

        glyphs.insert(
            character,
            Glyph {
                id: codepoint,
                character,
                glyph_index,
                x: i32::from(header.x_min),
                y: i32::from(header.y_min),
                width,
                height: header.height(),
                lsb,
                rsb: advance_width - lsb - width,
                advance_width,
            },
        );
    }

    log::debug!("prepared lookups for {} characters", glyphs.len());

    Lookups {
        units_per_em,
        cap_height,
        ascender,
        glyphs,
        uvs: BTreeMap::new(),
        atlas: None,
        tables,
    }
}
