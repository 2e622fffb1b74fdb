mod cmap;
mod font_directory;
mod glyf;
mod gpos;
mod head;
mod hhea;
mod hmtx;
mod loca;
mod maxp;
mod tag;

pub use cmap::{CmapFormat4, CmapTable, EncodingRecord};
pub use font_directory::{DirectoryTableEntry, FontDirectory, OffsetSubtable, TableDirectory};
pub(crate) use glyf::{CompoundGlyphComponentFlags, OutlineFlag};
pub use glyf::{GlyfTable, GlyphHeader};
pub(crate) use gpos::ValueFormat;
pub use gpos::{
    Class2Record, ClassDef, ClassRangeRecord, Coverage, CoverageRangeRecord, FeatureRecord,
    GposLookup, GposTable, PairPos, PairPosFormat1, PairPosFormat2, PairValueRecord, ValueRecord,
};
pub use head::{Head, HeadFlags, IndexToLocFormat, MacStyle};
pub use hhea::HheaTable;
pub use hmtx::{HmtxTable, LongHorMetric};
pub use loca::{GlyfEntry, LocaTable};
pub use maxp::{MaxpProfile, MaxpTable};
pub use tag::TableTag;
