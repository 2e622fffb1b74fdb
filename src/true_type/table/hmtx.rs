use crate::true_type::FWord;

use super::TableTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongHorMetric {
    pub advance_width: u16,
    pub left_side_bearing: i16,
}

/// Horizontal metrics. Only the first `numberOfHMetrics` glyphs carry their own
/// advance; every later glyph shares the advance of the last explicit entry
/// and stores just its left side bearing
#[derive(Debug)]
pub struct HmtxTable {
    pub h_metrics: Vec<LongHorMetric>,
    pub left_side_bearings: Vec<FWord>,
}

impl HmtxTable {
    pub const TAG: TableTag = TableTag::new(*b"hmtx");

    pub fn advance_width(&self, glyph_index: u16) -> u16 {
        let index = usize::from(glyph_index);

        self.h_metrics
            .get(index)
            .or_else(|| self.h_metrics.last())
            .map_or(0, |metric| metric.advance_width)
    }

    pub fn left_side_bearing(&self, glyph_index: u16) -> i16 {
        let index = usize::from(glyph_index);

        match self.h_metrics.get(index) {
            Some(metric) => metric.left_side_bearing,
            None => self
                .left_side_bearings
                .get(index - self.h_metrics.len())
                .map_or(0, |lsb| lsb.0),
        }
    }
}
