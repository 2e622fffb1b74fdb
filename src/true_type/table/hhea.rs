use crate::true_type::FWord;

use super::TableTag;

#[derive(Debug)]
pub struct HheaTable {
    pub major_version: u16,
    pub minor_version: u16,

    /// Distance from baseline of highest ascender
    pub ascender: FWord,

    /// Distance from baseline of lowest descender, usually negative
    pub descender: FWord,

    pub line_gap: FWord,
    pub advance_width_max: u16,
    pub min_left_side_bearing: FWord,
    pub min_right_side_bearing: FWord,
    pub x_max_extent: FWord,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub caret_offset: FWord,
    pub metric_data_format: i16,

    /// Number of explicit (advance, lsb) pairs in `hmtx`
    pub number_of_h_metrics: u16,
}

impl HheaTable {
    pub const TAG: TableTag = TableTag::new(*b"hhea");
}
