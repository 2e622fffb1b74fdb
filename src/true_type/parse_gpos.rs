use crate::{error::FontError, parse_binary::BinaryParser};

use super::{
    parse::TrueTypeParser,
    table::{
        Class2Record, ClassDef, ClassRangeRecord, Coverage, CoverageRangeRecord, FeatureRecord,
        GposLookup, GposTable, PairPos, PairPosFormat1, PairPosFormat2, PairValueRecord,
        ValueFormat, ValueRecord,
    },
};

/// GPOS parsing. Offsets inside the table are relative to the start of the
/// structure that holds them, so every sub-table is read through `run_at`
impl TrueTypeParser<'_> {
    pub fn read_gpos_table(&mut self, offset: usize) -> anyhow::Result<GposTable> {
        self.cursor = offset;

        let major_version = self.read_u16()?;
        let minor_version = self.read_u16()?;

        if major_version != 1 {
            anyhow::bail!(FontError::UnsupportedFormat {
                table: "GPOS",
                format: u32::from(major_version),
            });
        }

        let _script_list_offset = self.read_u16()?;
        let feature_list_offset = self.read_u16()?;
        let lookup_list_offset = self.read_u16()?;

        let features = self.run_at(offset + usize::from(feature_list_offset), |parser| {
            parser.read_feature_list()
        })?;
        let lookups = self.run_at(offset + usize::from(lookup_list_offset), |parser| {
            parser.read_lookup_list()
        })?;

        let gpos = GposTable::new(major_version, minor_version, features, lookups);

        log::debug!(
            "GPOS: {} features, {} lookups, kerning from {:?}",
            gpos.features.len(),
            gpos.lookups.len(),
            gpos.kern_lookups()
        );

        Ok(gpos)
    }

    fn read_feature_list(&mut self) -> anyhow::Result<Vec<FeatureRecord>> {
        let base = self.cursor;
        let feature_count = self.read_u16()?;
        let mut features = Vec::with_capacity(usize::from(feature_count));

        for _ in 0..feature_count {
            let tag = self.read_string(4)?;
            let feature_offset = self.read_u16()?;

            let (params_offset, lookup_list_indices) =
                self.run_at(base + usize::from(feature_offset), |parser| {
                    let params_offset = parser.read_u16()?;
                    let lookup_index_count = parser.read_u16()?;
                    let mut indices = Vec::with_capacity(usize::from(lookup_index_count));

                    for _ in 0..lookup_index_count {
                        indices.push(parser.read_u16()?);
                    }

                    anyhow::Ok((params_offset, indices))
                })?;

            features.push(FeatureRecord {
                tag,
                params_offset,
                lookup_list_indices,
            });
        }

        Ok(features)
    }

    fn read_lookup_list(&mut self) -> anyhow::Result<Vec<GposLookup>> {
        let base = self.cursor;
        let lookup_count = self.read_u16()?;
        let mut lookups = Vec::with_capacity(usize::from(lookup_count));

        for _ in 0..lookup_count {
            let lookup_offset = self.read_u16()?;
            lookups.push(self.run_at(base + usize::from(lookup_offset), |parser| {
                parser.read_lookup()
            })?);
        }

        Ok(lookups)
    }

    fn read_lookup(&mut self) -> anyhow::Result<GposLookup> {
        let base = self.cursor;
        let mut lookup_type = self.read_u16()?;
        let lookup_flag = self.read_u16()?;
        let sub_table_count = self.read_u16()?;

        let mut subtable_offsets = Vec::with_capacity(usize::from(sub_table_count));
        for _ in 0..sub_table_count {
            subtable_offsets.push(base + usize::from(self.read_u16()?));
        }

        let mark_filtering_set = if lookup_flag & GposLookup::USE_MARK_FILTERING_SET != 0 {
            Some(self.read_u16()?)
        } else {
            None
        };

        let mut subtables = Vec::new();

        for subtable_offset in subtable_offsets {
            let (effective_type, offset) = if lookup_type == GposTable::EXTENSION {
                self.run_at(subtable_offset, |parser| {
                    let _pos_format = parser.read_u16()?;
                    let extension_lookup_type = parser.read_u16()?;
                    let extension_offset = parser.read_u32()?;

                    anyhow::Ok((
                        extension_lookup_type,
                        subtable_offset + extension_offset as usize,
                    ))
                })?
            } else {
                (lookup_type, subtable_offset)
            };

            if effective_type != GposTable::PAIR_ADJUSTMENT {
                log::trace!("skipping GPOS lookup type {}", effective_type);
                continue;
            }

            if let Some(pair_pos) = self.run_at(offset, |parser| parser.read_pair_pos())? {
                subtables.push(pair_pos);
            }
        }

        // extension lookups all wrap the same type, report that one
        if lookup_type == GposTable::EXTENSION && !subtables.is_empty() {
            lookup_type = GposTable::PAIR_ADJUSTMENT;
        }

        Ok(GposLookup {
            lookup_type,
            lookup_flag,
            subtables,
            mark_filtering_set,
        })
    }

    fn read_pair_pos(&mut self) -> anyhow::Result<Option<PairPos>> {
        let base = self.cursor;
        let pos_format = self.read_u16()?;

        if !matches!(pos_format, 1 | 2) {
            log::warn!("skipping unsupported pair adjustment format {}", pos_format);
            return Ok(None);
        }

        let coverage_offset = self.read_u16()?;
        let value_format1 = self.read_u16()?;
        let value_format2 = self.read_u16()?;

        let coverage = self.run_at(base + usize::from(coverage_offset), |parser| {
            parser.read_coverage()
        })?;

        Ok(Some(match pos_format {
            1 => {
                let pair_set_count = self.read_u16()?;
                let mut pair_sets = Vec::with_capacity(usize::from(pair_set_count));

                for _ in 0..pair_set_count {
                    let pair_set_offset = self.read_u16()?;
                    pair_sets.push(self.run_at(base + usize::from(pair_set_offset), |parser| {
                        parser.read_pair_set(value_format1, value_format2)
                    })?);
                }

                PairPos::Format1(PairPosFormat1 {
                    coverage,
                    value_format1,
                    value_format2,
                    pair_sets,
                })
            }
            _ => {
                let class_def1_offset = self.read_u16()?;
                let class_def2_offset = self.read_u16()?;
                let class1_count = self.read_u16()?;
                let class2_count = self.read_u16()?;

                let mut class_records = Vec::with_capacity(usize::from(class1_count));

                for _ in 0..class1_count {
                    let mut row = Vec::with_capacity(usize::from(class2_count));

                    for _ in 0..class2_count {
                        let value1 = self.read_value_record(value_format1)?;
                        let value2 = self.read_value_record(value_format2)?;

                        row.push(Class2Record { value1, value2 });
                    }

                    class_records.push(row);
                }

                let class_def1 = self.run_at(base + usize::from(class_def1_offset), |parser| {
                    parser.read_class_def()
                })?;
                let class_def2 = self.run_at(base + usize::from(class_def2_offset), |parser| {
                    parser.read_class_def()
                })?;

                PairPos::Format2(PairPosFormat2 {
                    coverage,
                    value_format1,
                    value_format2,
                    class_def1,
                    class_def2,
                    class1_count,
                    class2_count,
                    class_records,
                })
            }
        }))
    }

    fn read_pair_set(
        &mut self,
        value_format1: u16,
        value_format2: u16,
    ) -> anyhow::Result<Vec<PairValueRecord>> {
        let pair_value_count = self.read_u16()?;
        let mut records = Vec::with_capacity(usize::from(pair_value_count));

        for _ in 0..pair_value_count {
            let second_glyph = self.read_u16()?;
            let value1 = self.read_value_record(value_format1)?;
            let value2 = self.read_value_record(value_format2)?;

            records.push(PairValueRecord {
                second_glyph,
                value1,
                value2,
            });
        }

        Ok(records)
    }

    fn read_value_record(&mut self, value_format: u16) -> anyhow::Result<ValueRecord> {
        let read_i16 = |parser: &mut Self, bit: u16| -> anyhow::Result<Option<i16>> {
            if value_format & bit != 0 {
                Ok(Some(parser.read_i16()?))
            } else {
                Ok(None)
            }
        };

        let x_placement = read_i16(self, ValueFormat::X_PLACEMENT)?;
        let y_placement = read_i16(self, ValueFormat::Y_PLACEMENT)?;
        let x_advance = read_i16(self, ValueFormat::X_ADVANCE)?;
        let y_advance = read_i16(self, ValueFormat::Y_ADVANCE)?;

        let x_pla_device = read_i16(self, ValueFormat::X_PLACEMENT_DEVICE)?.map(|v| v as u16);
        let y_pla_device = read_i16(self, ValueFormat::Y_PLACEMENT_DEVICE)?.map(|v| v as u16);
        let x_adv_device = read_i16(self, ValueFormat::X_ADVANCE_DEVICE)?.map(|v| v as u16);
        let y_adv_device = read_i16(self, ValueFormat::Y_ADVANCE_DEVICE)?.map(|v| v as u16);

        Ok(ValueRecord {
            x_placement,
            y_placement,
            x_advance,
            y_advance,
            x_pla_device,
            y_pla_device,
            x_adv_device,
            y_adv_device,
        })
    }

    fn read_coverage(&mut self) -> anyhow::Result<Coverage> {
        let coverage_format = self.read_u16()?;

        match coverage_format {
            1 => {
                let glyph_count = self.read_u16()?;
                let mut glyphs = Vec::with_capacity(usize::from(glyph_count));

                for _ in 0..glyph_count {
                    glyphs.push(self.read_u16()?);
                }

                Ok(Coverage::Format1 { glyphs })
            }
            2 => {
                let range_count = self.read_u16()?;
                let mut ranges = Vec::with_capacity(usize::from(range_count));

                for _ in 0..range_count {
                    ranges.push(CoverageRangeRecord {
                        start_glyph_id: self.read_u16()?,
                        end_glyph_id: self.read_u16()?,
                        start_coverage_index: self.read_u16()?,
                    });
                }

                Ok(Coverage::Format2 { ranges })
            }
            format => anyhow::bail!(FontError::UnsupportedFormat {
                table: "GPOS coverage",
                format: u32::from(format),
            }),
        }
    }

    fn read_class_def(&mut self) -> anyhow::Result<ClassDef> {
        let class_format = self.read_u16()?;

        match class_format {
            1 => {
                let start_glyph = self.read_u16()?;
                let glyph_count = self.read_u16()?;
                let mut classes = Vec::with_capacity(usize::from(glyph_count));

                for _ in 0..glyph_count {
                    classes.push(self.read_u16()?);
                }

                Ok(ClassDef::Format1 {
                    start_glyph,
                    classes,
                })
            }
            2 => {
                let range_count = self.read_u16()?;
                let mut ranges = Vec::with_capacity(usize::from(range_count));

                for _ in 0..range_count {
                    ranges.push(ClassRangeRecord {
                        start_glyph_id: self.read_u16()?,
                        end_glyph_id: self.read_u16()?,
                        class: self.read_u16()?,
                    });
                }

                Ok(ClassDef::Format2 { ranges })
            }
            format => anyhow::bail!(FontError::UnsupportedFormat {
                table: "GPOS class definition",
                format: u32::from(format),
            }),
        }
    }
}
