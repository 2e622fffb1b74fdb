use std::{collections::BTreeMap, fmt};

use crate::{error::FontError, parse_binary::BinaryParser};

use super::table::{
    CmapFormat4, CmapTable, DirectoryTableEntry, EncodingRecord, FontDirectory, GlyfTable,
    GlyphHeader, Head, HeadFlags, HheaTable, HmtxTable, IndexToLocFormat, LocaTable,
    LongHorMetric, MacStyle, MaxpProfile, MaxpTable, OffsetSubtable, TableDirectory,
};

pub(crate) struct TrueTypeParser<'a> {
    pub buffer: &'a [u8],
    pub cursor: usize,
}

impl fmt::Debug for TrueTypeParser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrueTypeParser")
            .field("cursor", &self.cursor)
            .field("buffer", &format!("[ {} bytes ]", self.buffer.len()))
            .finish()
    }
}

impl BinaryParser for TrueTypeParser<'_> {
    fn buffer(&self) -> &[u8] {
        self.buffer
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn cursor_mut(&mut self) -> &mut usize {
        &mut self.cursor
    }
}

impl<'a> TrueTypeParser<'a> {
    pub const SFNT_VERSION_TRUETYPE: u32 = 0x0001_0000;
    pub const SFNT_VERSION_APPLE: u32 = u32::from_be_bytes(*b"true");

    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }
}

/// Table parsing
impl TrueTypeParser<'_> {
    fn read_offset_subtable(&mut self) -> anyhow::Result<OffsetSubtable> {
        let sfnt_version = self.read_u32()?;

        if !matches!(
            sfnt_version,
            Self::SFNT_VERSION_TRUETYPE | Self::SFNT_VERSION_APPLE
        ) {
            anyhow::bail!(FontError::InvalidSfntVersion {
                found: sfnt_version
            });
        }

        let number_of_tables = self.read_u16()?;
        let search_range = self.read_u16()?;
        let entry_selector = self.read_u16()?;
        let range_shift = self.read_u16()?;

        Ok(OffsetSubtable {
            sfnt_version,
            number_of_tables,
            search_range,
            entry_selector,
            range_shift,
        })
    }

    fn read_dir_table_entry(&mut self) -> anyhow::Result<DirectoryTableEntry> {
        let tag = self.read_tag()?;
        let checksum = self.read_u32()?;
        let offset = self.read_u32()?;
        let length = self.read_u32()?;

        // every table must live inside the buffer before anything trusts it
        self.slice(offset as usize, length as usize)?;

        Ok(DirectoryTableEntry {
            tag,
            checksum,
            offset,
            length,
        })
    }

    pub fn read_font_directory(&mut self) -> anyhow::Result<FontDirectory> {
        self.cursor = 0;

        let offset_subtable = self.read_offset_subtable()?;
        let mut table_directory_entries =
            Vec::with_capacity(usize::from(offset_subtable.number_of_tables));

        for _ in 0..offset_subtable.number_of_tables {
            table_directory_entries.push(self.read_dir_table_entry()?);
        }

        Ok(FontDirectory {
            offset_subtable,
            table_directory: TableDirectory(table_directory_entries),
        })
    }

    pub fn read_head_table(&mut self, offset: usize) -> anyhow::Result<Head> {
        self.cursor = offset;

        let major_version = self.read_u16()?;
        let minor_version = self.read_u16()?;

        if major_version != 1 {
            anyhow::bail!(FontError::UnsupportedFormat {
                table: "head",
                format: u32::from(major_version),
            });
        }

        let font_revision = self.read_fixed()?;
        let check_sum_adjustment = self.read_u32()?;
        let magic_number = self.read_u32()?;

        if magic_number != Head::MAGIC_NUMBER {
            anyhow::bail!(FontError::InvalidMagicNumber {
                found: magic_number
            });
        }

        let flags = HeadFlags(self.read_u16()?);
        let units_per_em = self.read_u16()?;

        if units_per_em == 0 {
            anyhow::bail!(FontError::Malformed {
                table: "head",
                reason: "unitsPerEm is zero",
            });
        }

        let created = self.read_date()?;
        let modified = self.read_date()?;
        let x_min = self.read_fword()?;
        let y_min = self.read_fword()?;
        let x_max = self.read_fword()?;
        let y_max = self.read_fword()?;
        let mac_style = MacStyle(self.read_u16()?);
        let lowest_rec_ppem = self.read_u16()?;
        let font_direction_hint = self.read_i16()?;
        let index_to_loc_format = match self.read_i16()? {
            0 => IndexToLocFormat::Short,
            1 => IndexToLocFormat::Long,
            format => anyhow::bail!(FontError::UnsupportedFormat {
                table: "head indexToLocFormat",
                format: format as u32,
            }),
        };
        let glyph_data_format = self.read_i16()?;

        Ok(Head {
            major_version,
            minor_version,
            font_revision,
            check_sum_adjustment,
            magic_number,
            flags,
            units_per_em,
            created,
            modified,
            x_min,
            y_min,
            x_max,
            y_max,
            mac_style,
            lowest_rec_ppem,
            font_direction_hint,
            index_to_loc_format,
            glyph_data_format,
        })
    }

    pub fn read_maxp_table(&mut self, offset: usize) -> anyhow::Result<MaxpTable> {
        self.cursor = offset;

        let version = self.read_u32()?;
        let num_glyphs = self.read_u16()?;

        let profile = match version {
            MaxpTable::VERSION_0_5 => None,
            MaxpTable::VERSION_1_0 => Some(MaxpProfile {
                max_points: self.read_u16()?,
                max_contours: self.read_u16()?,
                max_component_points: self.read_u16()?,
                max_component_contours: self.read_u16()?,
                max_zones: self.read_u16()?,
                max_twilight_points: self.read_u16()?,
                max_storage: self.read_u16()?,
                max_function_defs: self.read_u16()?,
                max_instruction_defs: self.read_u16()?,
                max_stack_elements: self.read_u16()?,
                max_size_of_instructions: self.read_u16()?,
                max_component_elements: self.read_u16()?,
                max_component_depth: self.read_u16()?,
            }),
            _ => anyhow::bail!(FontError::UnsupportedFormat {
                table: "maxp",
                format: version,
            }),
        };

        Ok(MaxpTable {
            version: super::Fixed::from_bits(version),
            num_glyphs,
            profile,
        })
    }

    pub fn read_hhea_table(&mut self, offset: usize) -> anyhow::Result<HheaTable> {
        self.cursor = offset;

        let major_version = self.read_u16()?;
        let minor_version = self.read_u16()?;
        let ascender = self.read_fword()?;
        let descender = self.read_fword()?;
        let line_gap = self.read_fword()?;
        let advance_width_max = self.read_u16()?;
        let min_left_side_bearing = self.read_fword()?;
        let min_right_side_bearing = self.read_fword()?;
        let x_max_extent = self.read_fword()?;
        let caret_slope_rise = self.read_i16()?;
        let caret_slope_run = self.read_i16()?;
        let caret_offset = self.read_fword()?;

        // four reserved words
        self.skip(8)?;

        let metric_data_format = self.read_i16()?;
        let number_of_h_metrics = self.read_u16()?;

        Ok(HheaTable {
            major_version,
            minor_version,
            ascender,
            descender,
            line_gap,
            advance_width_max,
            min_left_side_bearing,
            min_right_side_bearing,
            x_max_extent,
            caret_slope_rise,
            caret_slope_run,
            caret_offset,
            metric_data_format,
            number_of_h_metrics,
        })
    }

    pub fn read_hmtx_table(
        &mut self,
        offset: usize,
        number_of_h_metrics: u16,
        num_glyphs: u16,
    ) -> anyhow::Result<HmtxTable> {
        if number_of_h_metrics == 0 || number_of_h_metrics > num_glyphs {
            anyhow::bail!(FontError::Malformed {
                table: "hmtx",
                reason: "numberOfHMetrics must be between 1 and numGlyphs",
            });
        }

        self.cursor = offset;

        let mut h_metrics = Vec::with_capacity(usize::from(number_of_h_metrics));

        for _ in 0..number_of_h_metrics {
            let advance_width = self.read_u16()?;
            let left_side_bearing = self.read_i16()?;

            h_metrics.push(LongHorMetric {
                advance_width,
                left_side_bearing,
            });
        }

        let remaining = num_glyphs - number_of_h_metrics;
        let mut left_side_bearings = Vec::with_capacity(usize::from(remaining));

        for _ in 0..remaining {
            left_side_bearings.push(self.read_fword()?);
        }

        Ok(HmtxTable {
            h_metrics,
            left_side_bearings,
        })
    }

    pub fn read_cmap_table(&mut self, table_offset: usize) -> anyhow::Result<CmapTable> {
        self.cursor = table_offset;

        let version = self.read_u16()?;

        if version != 0 {
            anyhow::bail!(FontError::UnsupportedFormat {
                table: "cmap",
                format: u32::from(version),
            });
        }

        let number_subtables = self.read_u16()?;
        let mut encoding_records = Vec::with_capacity(usize::from(number_subtables));

        for _ in 0..number_subtables {
            let platform_id = self.read_u16()?;
            let encoding_id = self.read_u16()?;
            let offset = self.read_u32()?;

            encoding_records.push(EncodingRecord {
                platform_id,
                encoding_id,
                offset,
            });
        }

        let mut candidates = Vec::new();
        let mut first_format = None;

        for record in &encoding_records {
            let subtable_offset = table_offset + record.offset as usize;
            let format = self.run_at(subtable_offset, |parser| parser.read_u16())?;

            first_format.get_or_insert(format);

            if format == 4 {
                candidates.push(*record);
            }
        }

        let Some(record) = candidates
            .into_iter()
            .min_by_key(EncodingRecord::preference)
        else {
            anyhow::bail!(FontError::UnsupportedFormat {
                table: "cmap subtable",
                format: u32::from(first_format.unwrap_or(0)),
            });
        };

        log::debug!(
            "using cmap format 4 subtable for platform {} encoding {}",
            record.platform_id,
            record.encoding_id
        );

        self.cursor = table_offset + record.offset as usize;
        let (subtable, glyph_index_map) = self.parse_cmap_subtable_4()?;

        Ok(CmapTable {
            version,
            encoding_records,
            subtable,
            glyph_index_map,
        })
    }

    /// Expects the cursor at the start of the subtable, format included
    pub(crate) fn parse_cmap_subtable_4(
        &mut self,
    ) -> anyhow::Result<(CmapFormat4, BTreeMap<u32, u16>)> {
        let format = self.read_u16()?;

        if format != 4 {
            anyhow::bail!(FontError::UnsupportedFormat {
                table: "cmap subtable",
                format: u32::from(format),
            });
        }

        let length = self.read_u16()?;
        let language = self.read_u16()?;
        let seg_count_x2 = self.read_u16()?;
        let search_range = self.read_u16()?;
        let entry_selector = self.read_u16()?;
        let range_shift = self.read_u16()?;

        let seg_count = usize::from(seg_count_x2 / 2);

        let mut end_codes = Vec::with_capacity(seg_count);
        for _ in 0..seg_count {
            end_codes.push(self.read_u16()?);
        }

        if end_codes.last() != Some(&0xFFFF) {
            anyhow::bail!(FontError::Malformed {
                table: "cmap",
                reason: "segments are not terminated by 0xFFFF",
            });
        }

        let _reserved_pad = self.read_u16()?;

        let mut start_codes = Vec::with_capacity(seg_count);
        for _ in 0..seg_count {
            start_codes.push(self.read_u16()?);
        }

        let mut id_deltas = Vec::with_capacity(seg_count);
        for _ in 0..seg_count {
            id_deltas.push(self.read_i16()?);
        }

        let id_range_offsets_start = self.cursor;

        let mut id_range_offsets = Vec::with_capacity(seg_count);
        for _ in 0..seg_count {
            id_range_offsets.push(self.read_u16()?);
        }

        let mut glyph_index_map = BTreeMap::new();

        for segment in 0..seg_count {
            let start = start_codes[segment];
            let end = end_codes[segment];

            if start > end {
                anyhow::bail!(FontError::Malformed {
                    table: "cmap",
                    reason: "segment starts after it ends",
                });
            }

            let id_delta = id_deltas[segment];
            let id_range_offset = id_range_offsets[segment];

            for code in start..=end {
                if code == 0xFFFF {
                    break;
                }

                let glyph_index = if id_range_offset == 0 {
                    code.wrapping_add(id_delta as u16)
                } else {
                    // idRangeOffset is relative to its own position in the array
                    let address = id_range_offsets_start
                        + segment * 2
                        + usize::from(id_range_offset)
                        + usize::from(code - start) * 2;

                    match self.run_at(address, |parser| parser.read_u16())? {
                        0 => 0,
                        glyph => glyph.wrapping_add(id_delta as u16),
                    }
                };

                if glyph_index != 0 {
                    glyph_index_map.insert(u32::from(code), glyph_index);
                }
            }
        }

        Ok((
            CmapFormat4 {
                length,
                language,
                seg_count_x2,
                search_range,
                entry_selector,
                range_shift,
                end_codes,
                start_codes,
                id_deltas,
                id_range_offsets,
            },
            glyph_index_map,
        ))
    }

    pub fn read_loca_table(
        &mut self,
        entry: &DirectoryTableEntry,
        format: IndexToLocFormat,
        num_glyphs: u16,
        glyf_length: u32,
    ) -> anyhow::Result<LocaTable> {
        let count = usize::from(num_glyphs) + 1;
        let entry_size = match format {
            IndexToLocFormat::Short => 2,
            IndexToLocFormat::Long => 4,
        };

        if count * entry_size > entry.length as usize {
            anyhow::bail!(FontError::Malformed {
                table: "loca",
                reason: "fewer than numGlyphs + 1 offsets",
            });
        }

        let buffer = self.slice(entry.offset as usize, count * entry_size)?;

        let offsets: Vec<u32> = match format {
            IndexToLocFormat::Short => buffer
                .chunks_exact(2)
                .map(|bytes| u32::from(u16::from_be_bytes([bytes[0], bytes[1]])) * 2)
                .collect(),
            IndexToLocFormat::Long => buffer
                .chunks_exact(4)
                .map(|bytes| u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
                .collect(),
        };

        if offsets.windows(2).any(|pair| pair[0] > pair[1]) {
            anyhow::bail!(FontError::Malformed {
                table: "loca",
                reason: "offsets are not non-decreasing",
            });
        }

        if let Some(&last) = offsets.last() {
            if last > glyf_length {
                anyhow::bail!(FontError::OutOfBounds {
                    offset: last as usize,
                    len: 0,
                    buffer_len: glyf_length as usize,
                });
            }
        }

        Ok(LocaTable { offsets })
    }

    pub fn read_glyf_table(
        &mut self,
        entry: &DirectoryTableEntry,
        loca: &LocaTable,
    ) -> anyhow::Result<GlyfTable> {
        let mut glyphs = Vec::with_capacity(loca.num_glyphs());

        for glyph_index in 0..loca.num_glyphs() {
            let glyf_entry = loca
                .get_glyf_entry(glyph_index as u16)
                .ok_or(FontError::Malformed {
                    table: "loca",
                    reason: "missing glyph offset",
                })?;

            if glyf_entry.is_empty() {
                glyphs.push(GlyphHeader::default());
                continue;
            }

            if (glyf_entry.len as usize) < GlyphHeader::LEN {
                anyhow::bail!(FontError::Malformed {
                    table: "glyf",
                    reason: "glyph is shorter than its header",
                });
            }

            self.cursor = glyf_entry.byte_range(entry.offset).start;

            glyphs.push(self.parse_glyph_header()?);
        }

        Ok(GlyfTable {
            offset: entry.offset,
            length: entry.length,
            glyphs,
        })
    }

    pub fn parse_glyph_header(&mut self) -> anyhow::Result<GlyphHeader> {
        let number_of_contours = self.read_i16()?;
        let x_min = self.read_i16()?;
        let y_min = self.read_i16()?;
        let x_max = self.read_i16()?;
        let y_max = self.read_i16()?;

        Ok(GlyphHeader {
            number_of_contours,
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }
}
