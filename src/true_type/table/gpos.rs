use super::TableTag;

/// Glyph positioning. Only pair adjustment (lookup type 2) is decoded; other
/// lookups are kept so that feature lookup indices stay valid
#[derive(Debug)]
pub struct GposTable {
    pub major_version: u16,
    pub minor_version: u16,
    pub features: Vec<FeatureRecord>,
    pub lookups: Vec<GposLookup>,

    /// Resolved once from `features` and `lookups`
    kern_lookups: Vec<u16>,
}

impl GposTable {
    pub const TAG: TableTag = TableTag::new(*b"GPOS");

    pub const PAIR_ADJUSTMENT: u16 = 2;
    pub const EXTENSION: u16 = 9;

    pub fn new(
        major_version: u16,
        minor_version: u16,
        features: Vec<FeatureRecord>,
        lookups: Vec<GposLookup>,
    ) -> Self {
        let kern_lookups = Self::resolve_kern_lookups(&features, &lookups);

        Self {
            major_version,
            minor_version,
            features,
            lookups,
            kern_lookups,
        }
    }

    /// Indices of the pair adjustment lookups referenced by the `kern`
    /// feature, or of every pair adjustment lookup when the font has no such
    /// feature
    fn resolve_kern_lookups(features: &[FeatureRecord], lookups: &[GposLookup]) -> Vec<u16> {
        let mut indices = features
            .iter()
            .filter(|feature| feature.tag == "kern")
            .flat_map(|feature| feature.lookup_list_indices.iter().copied())
            .collect::<Vec<_>>();

        if indices.is_empty() {
            indices = (0..lookups.len()).filter_map(|i| u16::try_from(i).ok()).collect();
        }

        indices.sort_unstable();
        indices.dedup();

        indices.retain(|&index| {
            lookups
                .get(usize::from(index))
                .map_or(false, |lookup| lookup.lookup_type == Self::PAIR_ADJUSTMENT)
        });

        indices
    }

    /// Lookups consulted by [`GposTable::pair_x_advance`], in lookup list order
    pub fn kern_lookups(&self) -> &[u16] {
        &self.kern_lookups
    }

    /// Horizontal advance adjustment of the first glyph of the pair. Explicit
    /// glyph pairs (format 1) win over class pairs (format 2)
    pub fn pair_x_advance(&self, first: u16, second: u16) -> Option<i16> {
        let subtables = || {
            self.kern_lookups
                .iter()
                .filter_map(|&index| self.lookups.get(usize::from(index)))
                .flat_map(|lookup| lookup.subtables.iter())
        };

        subtables()
            .find_map(|subtable| match subtable {
                PairPos::Format1(pairs) => pairs.x_advance(first, second),
                PairPos::Format2(..) => None,
            })
            .or_else(|| {
                subtables().find_map(|subtable| match subtable {
                    PairPos::Format1(..) => None,
                    PairPos::Format2(classes) => classes.x_advance(first, second),
                })
            })
    }
}

#[derive(Debug)]
pub struct FeatureRecord {
    pub tag: String,

    /// Offset to feature parameters, relative to the feature table; usually 0
    pub params_offset: u16,
    pub lookup_list_indices: Vec<u16>,
}

#[derive(Debug)]
pub struct GposLookup {
    /// Extension lookups report the type they wrap
    pub lookup_type: u16,
    pub lookup_flag: u16,
    pub subtables: Vec<PairPos>,
    pub mark_filtering_set: Option<u16>,
}

impl GposLookup {
    pub const USE_MARK_FILTERING_SET: u16 = 0x0010;
}

#[derive(Debug)]
pub enum PairPos {
    Format1(PairPosFormat1),
    Format2(PairPosFormat2),
}

/// Adjustments for explicitly listed glyph pairs
#[derive(Debug)]
pub struct PairPosFormat1 {
    pub coverage: Coverage,
    pub value_format1: u16,
    pub value_format2: u16,

    /// One set per covered first glyph, in coverage index order
    pub pair_sets: Vec<Vec<PairValueRecord>>,
}

impl PairPosFormat1 {
    pub fn x_advance(&self, first: u16, second: u16) -> Option<i16> {
        let coverage_index = self.coverage.coverage_index(first)?;

        self.pair_sets
            .get(usize::from(coverage_index))?
            .iter()
            .find(|record| record.second_glyph == second)
            .map(|record| record.value1.x_advance.unwrap_or(0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairValueRecord {
    pub second_glyph: u16,
    pub value1: ValueRecord,
    pub value2: ValueRecord,
}

/// Adjustments for pairs of glyph classes
#[derive(Debug)]
pub struct PairPosFormat2 {
    pub coverage: Coverage,
    pub value_format1: u16,
    pub value_format2: u16,
    pub class_def1: ClassDef,
    pub class_def2: ClassDef,
    pub class1_count: u16,
    pub class2_count: u16,

    /// `class1_count` rows of `class2_count` records
    pub class_records: Vec<Vec<Class2Record>>,
}

impl PairPosFormat2 {
    pub fn x_advance(&self, first: u16, second: u16) -> Option<i16> {
        self.coverage.coverage_index(first)?;

        let class1 = self.class_def1.class_of(first);
        let class2 = self.class_def2.class_of(second);

        self.class_records
            .get(usize::from(class1))?
            .get(usize::from(class2))
            .map(|record| record.value1.x_advance.unwrap_or(0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Class2Record {
    pub value1: ValueRecord,
    pub value2: ValueRecord,
}

/// Fields are present only when the matching value format bit is set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueRecord {
    pub x_placement: Option<i16>,
    pub y_placement: Option<i16>,
    pub x_advance: Option<i16>,
    pub y_advance: Option<i16>,

    /// Offsets to device tables, not resolved
    pub x_pla_device: Option<u16>,
    pub y_pla_device: Option<u16>,
    pub x_adv_device: Option<u16>,
    pub y_adv_device: Option<u16>,
}

pub(crate) struct ValueFormat;

impl ValueFormat {
    pub const X_PLACEMENT: u16 = 0x0001;
    pub const Y_PLACEMENT: u16 = 0x0002;
    pub const X_ADVANCE: u16 = 0x0004;
    pub const Y_ADVANCE: u16 = 0x0008;
    pub const X_PLACEMENT_DEVICE: u16 = 0x0010;
    pub const Y_PLACEMENT_DEVICE: u16 = 0x0020;
    pub const X_ADVANCE_DEVICE: u16 = 0x0040;
    pub const Y_ADVANCE_DEVICE: u16 = 0x0080;
}

#[derive(Debug, PartialEq, Eq)]
pub enum Coverage {
    Format1 { glyphs: Vec<u16> },
    Format2 { ranges: Vec<CoverageRangeRecord> },
}

impl Coverage {
    pub fn coverage_index(&self, glyph: u16) -> Option<u16> {
        match self {
            Self::Format1 { glyphs } => glyphs
                .iter()
                .position(|&g| g == glyph)
                .and_then(|index| u16::try_from(index).ok()),
            Self::Format2 { ranges } => ranges
                .iter()
                .find(|range| (range.start_glyph_id..=range.end_glyph_id).contains(&glyph))
                .and_then(|range| {
                    range
                        .start_coverage_index
                        .checked_add(glyph - range.start_glyph_id)
                }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageRangeRecord {
    pub start_glyph_id: u16,
    pub end_glyph_id: u16,
    pub start_coverage_index: u16,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ClassDef {
    /// Dense class values for consecutive glyphs from `start_glyph`
    Format1 { start_glyph: u16, classes: Vec<u16> },
    Format2 { ranges: Vec<ClassRangeRecord> },
}

impl ClassDef {
    /// Glyphs not assigned to any class belong to class 0
    pub fn class_of(&self, glyph: u16) -> u16 {
        match self {
            Self::Format1 {
                start_glyph,
                classes,
            } => glyph
                .checked_sub(*start_glyph)
                .and_then(|index| classes.get(usize::from(index)))
                .copied()
                .unwrap_or(0),
            Self::Format2 { ranges } => ranges
                .iter()
                .find(|range| (range.start_glyph_id..=range.end_glyph_id).contains(&glyph))
                .map_or(0, |range| range.class),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassRangeRecord {
    pub start_glyph_id: u16,
    pub end_glyph_id: u16,
    pub class: u16,
}
