use crate::true_type::{FWord, Fixed, LongDateTime};

use super::TableTag;

#[derive(Debug)]
pub struct Head {
    pub major_version: u16,
    pub minor_version: u16,
    pub font_revision: Fixed,
    pub check_sum_adjustment: u32,
    pub magic_number: u32,
    pub flags: HeadFlags,

    /// Valid range is from 16 to 16384
    pub units_per_em: u16,

    pub created: LongDateTime,
    pub modified: LongDateTime,

    /// Bounding box extrema over all glyphs
    pub x_min: FWord,
    pub y_min: FWord,
    pub x_max: FWord,
    pub y_max: FWord,

    pub mac_style: MacStyle,

    /// Smallest readable size in pixels
    pub lowest_rec_ppem: u16,

    pub font_direction_hint: i16,
    pub index_to_loc_format: IndexToLocFormat,
    pub glyph_data_format: i16,
}

impl Head {
    pub const TAG: TableTag = TableTag::new(*b"head");
    pub const MAGIC_NUMBER: u32 = 0x5F0F_3CF5;
}

#[derive(Debug, Clone, Copy)]
pub struct HeadFlags(pub u16);

#[derive(Debug, Clone, Copy)]
pub struct MacStyle(pub u16);

/// Width of the `loca` offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexToLocFormat {
    /// `u16` holding the actual offset divided by 2
    Short,
    Long,
}
