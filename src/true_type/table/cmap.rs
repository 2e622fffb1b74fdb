use std::collections::BTreeMap;

use super::TableTag;

#[derive(Debug)]
pub struct CmapTable {
    /// Version number (Set to zero)
    pub version: u16,
    pub encoding_records: Vec<EncodingRecord>,

    /// The format 4 subtable glyph indices are resolved from
    pub subtable: CmapFormat4,

    /// Every mapped codepoint, glyph 0 excluded
    pub glyph_index_map: BTreeMap<u32, u16>,
}

impl CmapTable {
    pub const TAG: TableTag = TableTag::new(*b"cmap");

    /// Glyph index for `codepoint`, 0 (`.notdef`) when unmapped
    pub fn glyph_index(&self, codepoint: u32) -> u16 {
        self.glyph_index_map.get(&codepoint).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingRecord {
    pub platform_id: u16,
    pub encoding_id: u16,

    /// Byte offset from the beginning of `cmap` to the subtable
    pub offset: u32,
}

impl EncodingRecord {
    /// Lower is better: Windows Unicode BMP, then any Unicode platform entry
    pub(crate) fn preference(&self) -> u8 {
        match (self.platform_id, self.encoding_id) {
            (3, 1) => 0,
            (0, _) => 1,
            _ => 2,
        }
    }
}

/// Segment mapping to delta values
#[derive(Debug)]
pub struct CmapFormat4 {
    pub length: u16,
    pub language: u16,
    pub seg_count_x2: u16,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,

    /// End character code for each segment, last = 0xFFFF
    pub end_codes: Vec<u16>,
    pub start_codes: Vec<u16>,
    pub id_deltas: Vec<i16>,

    /// Offsets into the glyph index array or 0
    pub id_range_offsets: Vec<u16>,
}

impl CmapFormat4 {
    pub fn seg_count(&self) -> usize {
        usize::from(self.seg_count_x2 / 2)
    }
}
