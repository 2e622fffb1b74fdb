//! Builds small but structurally valid TrueType fonts for tests

use std::collections::BTreeMap;

use crate::true_type::{
    parse::TrueTypeParser, CompoundGlyphComponentFlags, GposTable, Head, MaxpTable, OutlineFlag,
    ValueFormat,
};

#[derive(Debug, Clone)]
pub(crate) enum GlyphShape {
    Empty,

    /// Contours of `(x, y, on_curve)` points
    Simple(Vec<Vec<(i16, i16, bool)>>),

    /// `(component, dx, dy, uniform scale)`; components must be added first
    Composite(Vec<(char, i16, i16, Option<f32>)>),
}

impl GlyphShape {
    pub fn rectangle(x_min: i16, y_min: i16, x_max: i16, y_max: i16) -> Self {
        Self::Simple(vec![vec![
            (x_min, y_min, true),
            (x_min, y_max, true),
            (x_max, y_max, true),
            (x_max, y_min, true),
        ]])
    }
}

/// What an encoding record in `cmap` points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CmapSubtable {
    /// Format 4 mapping every added glyph
    Mapping,

    /// Format 4 holding only the `0xFFFF` sentinel segment
    EmptyFormat4,

    /// Format 6 (trimmed table) with no entries
    Format6,
}

#[derive(Debug, Clone)]
struct TestGlyph {
    character: char,
    shape: GlyphShape,
    advance: u16,
    lsb: i16,
}

#[derive(Debug, Clone, Copy, Default)]
struct Bounds {
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
}

/// Big-endian byte sink
#[derive(Debug, Default)]
struct Writer(Vec<u8>);

impl Writer {
    fn u16(&mut self, v: u16) -> &mut Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn i16(&mut self, v: i16) -> &mut Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn u32(&mut self, v: u32) -> &mut Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn bytes(&mut self, v: &[u8]) -> &mut Self {
        self.0.extend_from_slice(v);
        self
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TestFont {
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub magic_number: u32,
    pub head_major_version: u16,

    /// 0 for short `loca` offsets, 1 for long ones; written as is
    pub index_to_loc_format: i16,

    /// `MaxpTable::VERSION_0_5` or `MaxpTable::VERSION_1_0`
    pub maxp_version: u32,

    /// `(platform, encoding, subtable)` in record order
    pub cmap_encodings: Vec<(u16, u16, CmapSubtable)>,

    /// Defaults to one metric per glyph
    pub number_of_h_metrics: Option<u16>,

    pub gpos_major_version: u16,

    /// Wrap the kerning lookup in an extension (type 9) lookup
    pub gpos_extension: bool,

    glyphs: Vec<TestGlyph>,
    kern_pairs: Vec<(char, char, i16)>,
    kern_classes: Vec<(Vec<char>, Vec<char>, i16)>,
    omitted: Vec<[u8; 4]>,
}

impl TestFont {
    pub fn new(units_per_em: u16) -> Self {
        Self {
            units_per_em,
            ascender: (units_per_em as i32 * 4 / 5) as i16,
            descender: -((units_per_em as i32 / 5) as i16),
            magic_number: Head::MAGIC_NUMBER,
            head_major_version: 1,
            index_to_loc_format: 1,
            maxp_version: MaxpTable::VERSION_1_0,
            cmap_encodings: vec![(3, 1, CmapSubtable::Mapping)],
            number_of_h_metrics: None,
            gpos_major_version: 1,
            gpos_extension: false,
            glyphs: Vec::new(),
            kern_pairs: Vec::new(),
            kern_classes: Vec::new(),
            omitted: Vec::new(),
        }
    }

    /// Adds a glyph for `character`; glyph ids follow insertion order after
    /// `.notdef`
    pub fn glyph(&mut self, character: char, shape: GlyphShape, advance: u16, lsb: i16) {
        self.glyphs.push(TestGlyph {
            character,
            shape,
            advance,
            lsb,
        });
    }

    pub fn kern_pair(&mut self, first: char, second: char, x_advance: i16) {
        self.kern_pairs.push((first, second, x_advance));
    }

    /// Every glyph of `first` followed by any glyph of `second` is adjusted
    pub fn kern_class(&mut self, first: &[char], second: &[char], x_advance: i16) {
        self.kern_classes
            .push((first.to_vec(), second.to_vec(), x_advance));
    }

    pub fn omit_table(&mut self, tag: [u8; 4]) {
        self.omitted.push(tag);
    }

    fn glyph_id(&self, character: char) -> u16 {
        self.glyphs
            .iter()
            .position(|glyph| glyph.character == character)
            .map(|index| index as u16 + 1)
            .unwrap_or_else(|| panic!("no glyph for {:?}", character))
    }

    fn num_glyphs(&self) -> u16 {
        self.glyphs.len() as u16 + 1
    }

    pub fn build(&self) -> Vec<u8> {
        let (glyf, loca, bounds) = self.glyf_and_loca();

        let mut tables: Vec<([u8; 4], Vec<u8>)> = vec![
            (*b"cmap", self.cmap()),
            (*b"glyf", glyf),
            (*b"head", self.head(&bounds)),
            (*b"hhea", self.hhea()),
            (*b"hmtx", self.hmtx()),
            (*b"loca", loca),
            (*b"maxp", self.maxp()),
        ];

        if !self.kern_pairs.is_empty() || !self.kern_classes.is_empty() {
            tables.push((*GposTable::TAG.as_bytes(), self.gpos()));
        }

        tables.retain(|(tag, _)| !self.omitted.contains(tag));
        tables.sort_by_key(|(tag, _)| *tag);

        let num_tables = tables.len() as u16;
        let entry_selector = 15 - num_tables.max(1).leading_zeros() as u16;
        let search_range = (1 << entry_selector) * 16;

        let mut font = Writer::default();
        font.u32(TrueTypeParser::SFNT_VERSION_TRUETYPE)
            .u16(num_tables)
            .u16(search_range)
            .u16(entry_selector)
            .u16(num_tables * 16 - search_range);

        let mut offset = 12 + 16 * tables.len();
        let mut data = Vec::new();

        for (tag, table) in &tables {
            font.bytes(tag)
                .u32(0)
                .u32(offset as u32)
                .u32(table.len() as u32);

            let padded = (table.len() + 3) & !3;
            data.extend_from_slice(table);
            data.resize(data.len() + padded - table.len(), 0);
            offset += padded;
        }

        font.bytes(&data);
        font.0
    }

    fn bounds_of(&self, shape: &GlyphShape, bounds: &[Bounds]) -> Bounds {
        match shape {
            GlyphShape::Empty => Bounds::default(),
            GlyphShape::Simple(contours) => {
                let points = contours.iter().flatten();

                Bounds {
                    x_min: points.clone().map(|p| p.0).min().unwrap_or(0),
                    y_min: points.clone().map(|p| p.1).min().unwrap_or(0),
                    x_max: points.clone().map(|p| p.0).max().unwrap_or(0),
                    y_max: points.map(|p| p.1).max().unwrap_or(0),
                }
            }
            GlyphShape::Composite(components) => {
                let mut result: Option<Bounds> = None;

                for &(component, dx, dy, scale) in components {
                    let b = bounds[usize::from(self.glyph_id(component))];
                    let s = scale.unwrap_or(1.0);
                    let map = |v: i16, d: i16| (f32::from(v) * s).round() as i16 + d;

                    let placed = Bounds {
                        x_min: map(b.x_min, dx),
                        y_min: map(b.y_min, dy),
                        x_max: map(b.x_max, dx),
                        y_max: map(b.y_max, dy),
                    };

                    result = Some(match result {
                        None => placed,
                        Some(r) => Bounds {
                            x_min: r.x_min.min(placed.x_min),
                            y_min: r.y_min.min(placed.y_min),
                            x_max: r.x_max.max(placed.x_max),
                            y_max: r.y_max.max(placed.y_max),
                        },
                    });
                }

                result.unwrap_or_default()
            }
        }
    }

    fn encode_glyph(&self, shape: &GlyphShape, b: Bounds) -> Vec<u8> {
        let mut w = Writer::default();

        match shape {
            GlyphShape::Empty => {}
            GlyphShape::Simple(contours) => {
                w.i16(contours.len() as i16)
                    .i16(b.x_min)
                    .i16(b.y_min)
                    .i16(b.x_max)
                    .i16(b.y_max);

                let mut end = 0u16;
                for contour in contours {
                    end += contour.len() as u16;
                    w.u16(end - 1);
                }

                // no instructions
                w.u16(0);

                let points = contours.iter().flatten().collect::<Vec<_>>();

                for &&(_, _, on_curve) in &points {
                    w.bytes(&[if on_curve { OutlineFlag::ON_CURVE } else { 0 }]);
                }

                let mut last = 0;
                for &&(x, _, _) in &points {
                    w.i16(x - last);
                    last = x;
                }

                let mut last = 0;
                for &&(_, y, _) in &points {
                    w.i16(y - last);
                    last = y;
                }
            }
            GlyphShape::Composite(components) => {
                w.i16(-1)
                    .i16(b.x_min)
                    .i16(b.y_min)
                    .i16(b.x_max)
                    .i16(b.y_max);

                for (i, &(component, dx, dy, scale)) in components.iter().enumerate() {
                    let mut flags = CompoundGlyphComponentFlags::ARG_1_AND_2_ARE_WORDS
                        | CompoundGlyphComponentFlags::ARGS_ARE_XY_VALUES;

                    if scale.is_some() {
                        flags |= CompoundGlyphComponentFlags::WE_HAVE_A_SCALE;
                    }

                    if i + 1 < components.len() {
                        flags |= CompoundGlyphComponentFlags::MORE_COMPONENTS;
                    }

                    w.u16(flags).u16(self.glyph_id(component)).i16(dx).i16(dy);

                    if let Some(scale) = scale {
                        w.i16((scale * 16384.0).round() as i16);
                    }
                }
            }
        }

        w.0
    }

    /// `glyf` bytes, `loca` offsets and per-glyph bounds, `.notdef` first
    fn glyf_and_loca(&self) -> (Vec<u8>, Vec<u8>, Vec<Bounds>) {
        let mut glyf = Vec::new();
        let mut offsets = vec![0u32, 0];
        let mut bounds = vec![Bounds::default()];

        for glyph in &self.glyphs {
            let b = self.bounds_of(&glyph.shape, &bounds);
            let mut data = self.encode_glyph(&glyph.shape, b);
            data.resize((data.len() + 1) & !1, 0);

            glyf.extend_from_slice(&data);
            offsets.push(glyf.len() as u32);
            bounds.push(b);
        }

        let mut loca = Writer::default();
        for offset in offsets {
            if self.index_to_loc_format == 0 {
                loca.u16((offset / 2) as u16);
            } else {
                loca.u32(offset);
            }
        }

        (glyf, loca.0, bounds)
    }

    fn head(&self, bounds: &[Bounds]) -> Vec<u8> {
        let x_min = bounds.iter().map(|b| b.x_min).min().unwrap_or(0);
        let y_min = bounds.iter().map(|b| b.y_min).min().unwrap_or(0);
        let x_max = bounds.iter().map(|b| b.x_max).max().unwrap_or(0);
        let y_max = bounds.iter().map(|b| b.y_max).max().unwrap_or(0);

        let mut w = Writer::default();
        w.u16(self.head_major_version)
            .u16(0)
            .u32(0x0001_0000)
            .u32(0)
            .u32(self.magic_number)
            .u16(0b1011)
            .u16(self.units_per_em)
            // created and modified: 2020-01-01
            .u32(0)
            .u32(3_660_681_600)
            .u32(0)
            .u32(3_660_681_600)
            .i16(x_min)
            .i16(y_min)
            .i16(x_max)
            .i16(y_max)
            .u16(0)
            .u16(8)
            .i16(2)
            .i16(self.index_to_loc_format)
            .i16(0);

        debug_assert_eq!(w.len(), 54);
        w.0
    }

    fn hhea(&self) -> Vec<u8> {
        let advance_width_max = self.glyphs.iter().map(|g| g.advance).max().unwrap_or(0);

        let mut w = Writer::default();
        w.u16(1)
            .u16(0)
            .i16(self.ascender)
            .i16(self.descender)
            .i16(0)
            .u16(advance_width_max)
            .i16(0)
            .i16(0)
            .i16(0)
            .i16(1)
            .i16(0)
            .i16(0)
            .bytes(&[0; 8])
            .i16(0)
            .u16(self.number_of_h_metrics.unwrap_or(self.num_glyphs()));

        debug_assert_eq!(w.len(), 36);
        w.0
    }

    fn hmtx(&self) -> Vec<u8> {
        let number_of_h_metrics = usize::from(self.number_of_h_metrics.unwrap_or(self.num_glyphs()));

        let metrics = std::iter::once((self.units_per_em / 2, 0))
            .chain(self.glyphs.iter().map(|g| (g.advance, g.lsb)))
            .collect::<Vec<_>>();

        let mut w = Writer::default();

        for (i, &(advance, lsb)) in metrics.iter().enumerate() {
            if i < number_of_h_metrics {
                w.u16(advance).i16(lsb);
            } else {
                w.i16(lsb);
            }
        }

        w.0
    }

    fn maxp(&self) -> Vec<u8> {
        let mut w = Writer::default();
        w.u32(self.maxp_version).u16(self.num_glyphs());

        if self.maxp_version == MaxpTable::VERSION_0_5 {
            return w.0;
        }

        let (max_points, max_contours) = self
            .glyphs
            .iter()
            .filter_map(|glyph| match &glyph.shape {
                GlyphShape::Simple(contours) => Some((
                    contours.iter().map(Vec::len).sum::<usize>() as u16,
                    contours.len() as u16,
                )),
                _ => None,
            })
            .fold((0, 0), |(p, c), (points, contours)| {
                (p.max(points), c.max(contours))
            });

        w.u16(max_points).u16(max_contours).u16(0).u16(0).u16(2);

        for _ in 0..8 {
            w.u16(0);
        }

        w.0
    }

    /// One subtable per encoding record, each written after the record list
    fn cmap(&self) -> Vec<u8> {
        let mapping = self
            .glyphs
            .iter()
            .map(|g| (g.character as u32 as u16, self.glyph_id(g.character)))
            .collect::<BTreeMap<u16, u16>>();

        let mut subtables = Writer::default();
        let mut offsets = Vec::new();
        let header_len = 4 + 8 * self.cmap_encodings.len();

        for &(_, _, subtable) in &self.cmap_encodings {
            offsets.push((header_len + subtables.len()) as u32);

            match subtable {
                CmapSubtable::Mapping => subtables.bytes(&Self::format4(&mapping)),
                CmapSubtable::EmptyFormat4 => subtables.bytes(&Self::format4(&BTreeMap::new())),
                CmapSubtable::Format6 => subtables.u16(6).u16(10).u16(0).u16(0).u16(0),
            };
        }

        let mut w = Writer::default();
        w.u16(0).u16(self.cmap_encodings.len() as u16);

        for (&(platform, encoding, _), offset) in self.cmap_encodings.iter().zip(offsets) {
            w.u16(platform).u16(encoding).u32(offset);
        }

        w.bytes(&subtables.0);
        w.0
    }

    /// Format 4 with one single-character segment per entry
    fn format4(mapping: &BTreeMap<u16, u16>) -> Vec<u8> {
        let seg_count = mapping.len() as u16 + 1;
        let entry_selector = 15 - seg_count.leading_zeros() as u16;
        let search_range = 2 * (1 << entry_selector);

        let mut subtable = Writer::default();
        subtable
            .u16(4)
            .u16(16 + 8 * seg_count)
            .u16(0)
            .u16(seg_count * 2)
            .u16(search_range)
            .u16(entry_selector)
            .u16(seg_count * 2 - search_range);

        for &code in mapping.keys() {
            subtable.u16(code);
        }
        subtable.u16(0xFFFF).u16(0);

        for &code in mapping.keys() {
            subtable.u16(code);
        }
        subtable.u16(0xFFFF);

        for (&code, &glyph) in mapping {
            subtable.u16(glyph.wrapping_sub(code));
        }
        subtable.u16(1);

        for _ in 0..seg_count {
            subtable.u16(0);
        }

        subtable.0
    }

    fn coverage(glyphs: &[u16]) -> Vec<u8> {
        let mut w = Writer::default();
        w.u16(1).u16(glyphs.len() as u16);

        for &glyph in glyphs {
            w.u16(glyph);
        }

        w.0
    }

    fn pair_pos_format1(&self) -> Vec<u8> {
        let mut sets: BTreeMap<u16, Vec<(u16, i16)>> = BTreeMap::new();

        for &(first, second, value) in &self.kern_pairs {
            sets.entry(self.glyph_id(first))
                .or_default()
                .push((self.glyph_id(second), value));
        }

        let header_len = 10 + 2 * sets.len();
        let mut pair_sets = Writer::default();
        let mut pair_set_offsets = Vec::new();

        for pairs in sets.values() {
            pair_set_offsets.push((header_len + pair_sets.len()) as u16);
            pair_sets.u16(pairs.len() as u16);

            for &(second, value) in pairs {
                pair_sets.u16(second).i16(value);
            }
        }

        let coverage_offset = header_len + pair_sets.len();

        let mut w = Writer::default();
        w.u16(1)
            .u16(coverage_offset as u16)
            .u16(ValueFormat::X_ADVANCE)
            .u16(0)
            .u16(sets.len() as u16);

        for offset in pair_set_offsets {
            w.u16(offset);
        }

        w.bytes(&pair_sets.0)
            .bytes(&Self::coverage(&sets.keys().copied().collect::<Vec<_>>()));
        w.0
    }

    /// Two classes on each side; class 1 x class 1 carries the adjustment
    fn pair_pos_format2(&self, first: &[char], second: &[char], value: i16) -> Vec<u8> {
        let mut first_ids = first.iter().map(|&c| self.glyph_id(c)).collect::<Vec<_>>();
        let mut second_ids = second.iter().map(|&c| self.glyph_id(c)).collect::<Vec<_>>();
        first_ids.sort_unstable();
        second_ids.sort_unstable();

        // class 1 as ranges (format 2)
        let mut class_def1 = Writer::default();
        class_def1.u16(2).u16(first_ids.len() as u16);
        for &glyph in &first_ids {
            class_def1.u16(glyph).u16(glyph).u16(1);
        }

        // class 2 as a dense array (format 1)
        let start = second_ids.first().copied().unwrap_or(0);
        let end = second_ids.last().copied().unwrap_or(0);
        let mut class_def2 = Writer::default();
        class_def2.u16(1).u16(start).u16(end - start + 1);
        for glyph in start..=end {
            class_def2.u16(u16::from(second_ids.contains(&glyph)));
        }

        let header_len = 16 + 4 * 2;
        let coverage = Self::coverage(&first_ids);
        let class_def1_offset = header_len + coverage.len();
        let class_def2_offset = class_def1_offset + class_def1.len();

        let mut w = Writer::default();
        w.u16(2)
            .u16(header_len as u16)
            .u16(ValueFormat::X_ADVANCE)
            .u16(0)
            .u16(class_def1_offset as u16)
            .u16(class_def2_offset as u16)
            .u16(2)
            .u16(2)
            .i16(0)
            .i16(0)
            .i16(0)
            .i16(value)
            .bytes(&coverage)
            .bytes(&class_def1.0)
            .bytes(&class_def2.0);
        w.0
    }

    fn gpos(&self) -> Vec<u8> {
        let mut subtables = Vec::new();

        if !self.kern_pairs.is_empty() {
            subtables.push(self.pair_pos_format1());
        }

        for (first, second, value) in &self.kern_classes {
            subtables.push(self.pair_pos_format2(first, second, *value));
        }

        let (lookup_type, subtables) = if self.gpos_extension {
            let wrapped = subtables
                .into_iter()
                .map(|subtable| {
                    let mut w = Writer::default();
                    w.u16(1)
                        .u16(GposTable::PAIR_ADJUSTMENT)
                        .u32(8)
                        .bytes(&subtable);
                    w.0
                })
                .collect::<Vec<_>>();

            (GposTable::EXTENSION, wrapped)
        } else {
            (GposTable::PAIR_ADJUSTMENT, subtables)
        };

        let mut lookup = Writer::default();
        lookup
            .u16(lookup_type)
            .u16(0)
            .u16(subtables.len() as u16);

        let mut offset = 6 + 2 * subtables.len();
        for subtable in &subtables {
            lookup.u16(offset as u16);
            offset += subtable.len();
        }
        for subtable in &subtables {
            lookup.bytes(subtable);
        }

        let mut lookup_list = Writer::default();
        lookup_list.u16(1).u16(4).bytes(&lookup.0);

        let mut feature_list = Writer::default();
        feature_list
            .u16(1)
            .bytes(b"kern")
            .u16(8)
            .u16(0)
            .u16(1)
            .u16(0);

        let script_list_offset = 10;
        let feature_list_offset = script_list_offset + 2;
        let lookup_list_offset = feature_list_offset + feature_list.len();

        let mut w = Writer::default();
        w.u16(self.gpos_major_version)
            .u16(0)
            .u16(script_list_offset as u16)
            .u16(feature_list_offset as u16)
            .u16(lookup_list_offset as u16)
            // empty script list
            .u16(0)
            .bytes(&feature_list.0)
            .bytes(&lookup_list.0);
        w.0
    }
}
