use crate::error::{ErrorKind, FontError};

use super::{
    parse::TrueTypeParser,
    table::{
        CmapTable, DirectoryTableEntry, FontDirectory, GlyfTable, GposTable, Head, HheaTable,
        HmtxTable, LocaTable, MaxpTable, TableTag,
    },
};

/// Every table the atlas and shaper need, decoded eagerly from one font buffer
#[derive(Debug)]
pub struct FontTables {
    pub directory: FontDirectory,
    pub head: Head,
    pub hhea: HheaTable,
    pub hmtx: HmtxTable,
    pub maxp: MaxpTable,
    pub cmap: CmapTable,
    pub loca: LocaTable,
    pub glyf: GlyfTable,
    pub gpos: Option<GposTable>,
}

impl FontTables {
    pub fn parse(buffer: &[u8]) -> anyhow::Result<Self> {
        let mut parser = TrueTypeParser::new(buffer);

        let directory = parser.read_font_directory()?;

        let head = parser.read_head_table(Self::table_offset(&directory, Head::TAG)?)?;
        let maxp = parser.read_maxp_table(Self::table_offset(&directory, MaxpTable::TAG)?)?;
        let hhea = parser.read_hhea_table(Self::table_offset(&directory, HheaTable::TAG)?)?;
        let hmtx = parser.read_hmtx_table(
            Self::table_offset(&directory, HmtxTable::TAG)?,
            hhea.number_of_h_metrics,
            maxp.num_glyphs,
        )?;
        let cmap = parser.read_cmap_table(Self::table_offset(&directory, CmapTable::TAG)?)?;

        let glyf_entry = *Self::table_entry(&directory, GlyfTable::TAG)?;
        let loca_entry = *Self::table_entry(&directory, LocaTable::TAG)?;

        let loca = parser.read_loca_table(
            &loca_entry,
            head.index_to_loc_format,
            maxp.num_glyphs,
            glyf_entry.length,
        )?;
        let glyf = parser.read_glyf_table(&glyf_entry, &loca)?;

        let gpos = match directory.find_table_offset(GposTable::TAG) {
            Some(offset) => match parser.read_gpos_table(offset as usize) {
                Ok(gpos) => Some(gpos),
                Err(err) if FontError::kind_of(&err) == Some(ErrorKind::UnsupportedFormat) => {
                    log::warn!("ignoring GPOS: {}", err);
                    None
                }
                Err(err) => return Err(err),
            },
            None => None,
        };

        log::debug!(
            "parsed font: {} glyphs, {} units per em, {} cmap entries, kerning: {}",
            maxp.num_glyphs,
            head.units_per_em,
            cmap.glyph_index_map.len(),
            gpos.is_some()
        );

        Ok(Self {
            directory,
            head,
            hhea,
            hmtx,
            maxp,
            cmap,
            loca,
            glyf,
            gpos,
        })
    }

    fn table_entry(
        directory: &FontDirectory,
        tag: TableTag,
    ) -> anyhow::Result<&DirectoryTableEntry> {
        directory
            .find_table_entry(tag)
            .ok_or_else(|| FontError::MissingTable { tag }.into())
    }

    fn table_offset(directory: &FontDirectory, tag: TableTag) -> anyhow::Result<usize> {
        Ok(Self::table_entry(directory, tag)?.offset as usize)
    }

    /// Raw `glyf` bytes of one glyph, empty for glyphs without an outline
    pub fn glyph_data<'a>(&self, buffer: &'a [u8], glyph_index: u16) -> anyhow::Result<&'a [u8]> {
        let entry = self
            .loca
            .get_glyf_entry(glyph_index)
            .ok_or(FontError::Malformed {
                table: "loca",
                reason: "glyph index out of range",
            })?;

        let range = entry.byte_range(self.glyf.offset);

        buffer.get(range.clone()).ok_or_else(|| {
            FontError::OutOfBounds {
                offset: range.start,
                len: range.len(),
                buffer_len: buffer.len(),
            }
            .into()
        })
    }

    pub fn num_glyphs(&self) -> u16 {
        self.maxp.num_glyphs
    }
}
