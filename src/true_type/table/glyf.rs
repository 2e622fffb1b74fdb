use super::TableTag;

/// Per-glyph header; the outline data that follows it is decoded on demand
/// by the atlas renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphHeader {
    /// If the number of contours is positive or zero, it is a single glyph;
    /// If the number of contours less than zero, the glyph is compound
    pub number_of_contours: i16,

    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl GlyphHeader {
    pub const LEN: usize = 10;

    pub fn width(&self) -> i32 {
        i32::from(self.x_max) - i32::from(self.x_min)
    }

    pub fn height(&self) -> i32 {
        i32::from(self.y_max) - i32::from(self.y_min)
    }
}

#[derive(Debug)]
pub struct GlyfTable {
    /// Absolute offset of the table in the font buffer
    pub offset: u32,
    pub length: u32,
    pub glyphs: Vec<GlyphHeader>,
}

impl GlyfTable {
    pub const TAG: TableTag = TableTag::new(*b"glyf");
}

pub(crate) struct OutlineFlag;

impl OutlineFlag {
    pub const ON_CURVE: u8 = 1 << 0;
    pub const X_SHORT_VECTOR: u8 = 1 << 1;
    pub const Y_SHORT_VECTOR: u8 = 1 << 2;
    pub const REPEAT: u8 = 1 << 3;
    pub const X_SAME_OR_POSITIVE: u8 = 1 << 4;
    pub const Y_SAME_OR_POSITIVE: u8 = 1 << 5;
}

pub(crate) struct CompoundGlyphComponentFlags;

impl CompoundGlyphComponentFlags {
    pub const ARG_1_AND_2_ARE_WORDS: u16 = 1 << 0;
    pub const ARGS_ARE_XY_VALUES: u16 = 1 << 1;
    pub const WE_HAVE_A_SCALE: u16 = 1 << 3;
    pub const MORE_COMPONENTS: u16 = 1 << 5;
    pub const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 1 << 6;
    pub const WE_HAVE_A_TWO_BY_TWO: u16 = 1 << 7;
}
