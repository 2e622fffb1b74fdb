use std::ops::Range;

use super::TableTag;

/// Offsets into `glyf`, one per glyph plus a trailing end offset
#[derive(Debug, Clone)]
pub struct LocaTable {
    pub offsets: Vec<u32>,
}

impl LocaTable {
    pub const TAG: TableTag = TableTag::new(*b"loca");

    pub fn num_glyphs(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn get_glyf_entry(&self, glyph_index: u16) -> Option<GlyfEntry> {
        let index = usize::from(glyph_index);
        let offset = *self.offsets.get(index)?;
        let end = *self.offsets.get(index + 1)?;

        Some(GlyfEntry {
            offset,
            len: end - offset,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyfEntry {
    /// relative to the start of `glyf`
    pub offset: u32,
    pub len: u32,
}

impl GlyfEntry {
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn byte_range(&self, glyf_offset: u32) -> Range<usize> {
        let start = glyf_offset as usize + self.offset as usize;

        start..start + self.len as usize
    }
}
