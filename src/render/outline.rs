use crate::{
    error::FontError,
    geometry::{Outline, Path, Point, Transform},
    parse_binary::{BinaryParser, ByteCursor},
    true_type::{CompoundGlyphComponentFlags, F2Dot14, FontTables, GlyphHeader, OutlineFlag},
};

/// Composite glyphs referencing composites deeper than this are rejected
const MAX_COMPONENT_DEPTH: usize = 8;

/// Decodes the `glyf` outline of `glyph_index` in font units
pub(crate) fn glyph_outline(
    tables: &FontTables,
    buffer: &[u8],
    glyph_index: u16,
) -> anyhow::Result<Outline> {
    decode_glyph(tables, buffer, glyph_index, 0)
}

fn decode_glyph(
    tables: &FontTables,
    buffer: &[u8],
    glyph_index: u16,
    depth: usize,
) -> anyhow::Result<Outline> {
    if depth > MAX_COMPONENT_DEPTH {
        anyhow::bail!(FontError::Malformed {
            table: "glyf",
            reason: "composite glyphs nested too deeply",
        });
    }

    let data = tables.glyph_data(buffer, glyph_index)?;

    if data.is_empty() {
        return Ok(Outline::empty());
    }

    let mut cursor = ByteCursor::new(data);
    let number_of_contours = cursor.read_i16()?;
    cursor.skip(GlyphHeader::LEN - 2)?;

    if number_of_contours >= 0 {
        parse_simple_glyph(&mut cursor, number_of_contours as usize)
    } else {
        parse_compound_glyph(&mut cursor, tables, buffer, depth)
    }
}

fn parse_simple_glyph_flags(
    cursor: &mut ByteCursor,
    number_of_points: usize,
) -> anyhow::Result<Vec<u8>> {
    let mut flags = Vec::with_capacity(number_of_points);

    while flags.len() < number_of_points {
        let next = cursor.read_u8()?;
        flags.push(next);

        if next & OutlineFlag::REPEAT != 0 {
            let num_repeat = cursor.read_u8()?;
            for _ in 0..num_repeat {
                flags.push(next);
            }
        }
    }

    if flags.len() != number_of_points {
        anyhow::bail!(FontError::Malformed {
            table: "glyf",
            reason: "flag repeat runs past the last point",
        });
    }

    Ok(flags)
}

fn parse_coordinates(
    cursor: &mut ByteCursor,
    flags: &[u8],
    short_vector: u8,
    same_or_positive: u8,
) -> anyhow::Result<Vec<i32>> {
    let mut coords = Vec::with_capacity(flags.len());
    let mut last = 0;

    for &flag in flags {
        let is_short = flag & short_vector != 0;
        let is_same_or_positive = flag & same_or_positive != 0;

        let delta = match (is_short, is_same_or_positive) {
            (false, false) => i32::from(cursor.read_i16()?),
            (false, true) => 0,
            (true, false) => -i32::from(cursor.read_u8()?),
            (true, true) => i32::from(cursor.read_u8()?),
        };

        last += delta;
        coords.push(last);
    }

    Ok(coords)
}

fn parse_simple_glyph(
    cursor: &mut ByteCursor,
    number_of_contours: usize,
) -> anyhow::Result<Outline> {
    let mut end_points_of_contours = Vec::with_capacity(number_of_contours);

    for _ in 0..number_of_contours {
        end_points_of_contours.push(usize::from(cursor.read_u16()?));
    }

    if end_points_of_contours.windows(2).any(|pair| pair[0] >= pair[1]) {
        anyhow::bail!(FontError::Malformed {
            table: "glyf",
            reason: "contour end points are not increasing",
        });
    }

    let instruction_length = cursor.read_u16()?;
    cursor.skip(usize::from(instruction_length))?;

    let number_of_points = match end_points_of_contours.last() {
        Some(&last) => last + 1,
        None => return Ok(Outline::empty()),
    };

    let flags = parse_simple_glyph_flags(cursor, number_of_points)?;

    let x_coords = parse_coordinates(
        cursor,
        &flags,
        OutlineFlag::X_SHORT_VECTOR,
        OutlineFlag::X_SAME_OR_POSITIVE,
    )?;
    let y_coords = parse_coordinates(
        cursor,
        &flags,
        OutlineFlag::Y_SHORT_VECTOR,
        OutlineFlag::Y_SAME_OR_POSITIVE,
    )?;

    let points = flags
        .iter()
        .zip(x_coords.iter().zip(&y_coords))
        .map(|(&flag, (&x, &y))| {
            (
                Point::new(x as f32, y as f32),
                flag & OutlineFlag::ON_CURVE != 0,
            )
        })
        .collect::<Vec<_>>();

    let mut outline = Outline::empty();
    let mut start = 0;

    for end in end_points_of_contours {
        if let Some(path) = contour_path(&points[start..=end]) {
            outline.paths.push(path);
        }

        start = end + 1;
    }

    Ok(outline)
}

/// Builds a closed path from on- and off-curve points. Two consecutive
/// off-curve points imply an on-curve point halfway between them
fn contour_path(points: &[(Point, bool)]) -> Option<Path> {
    let &(first, first_on_curve) = points.first()?;
    let &(last, last_on_curve) = points.last()?;

    let (start, rest) = if first_on_curve {
        (first, &points[1..])
    } else if last_on_curve {
        (last, &points[..points.len() - 1])
    } else {
        (first.midpoint(last), points)
    };

    let mut path = Path::new(start);
    let mut control_point = None;

    for &(point, on_curve) in rest {
        match (on_curve, control_point) {
            (true, Some(control)) => {
                path.quadratic_curve_to(control, point);
                control_point = None;
            }
            (true, None) => path.line_to(point),
            (false, Some(control)) => {
                path.quadratic_curve_to(control, control.midpoint(point));
                control_point = Some(point);
            }
            (false, None) => control_point = Some(point),
        }
    }

    match control_point {
        Some(control) => path.quadratic_curve_to(control, start),
        None => path.close_path(),
    }

    Some(path)
}

fn parse_compound_glyph(
    cursor: &mut ByteCursor,
    tables: &FontTables,
    buffer: &[u8],
    depth: usize,
) -> anyhow::Result<Outline> {
    let mut outline = Outline::empty();

    loop {
        let flags = cursor.read_u16()?;
        let glyph_index = cursor.read_u16()?;

        let (arg1, arg2) = if flags & CompoundGlyphComponentFlags::ARG_1_AND_2_ARE_WORDS != 0 {
            (i32::from(cursor.read_i16()?), i32::from(cursor.read_i16()?))
        } else {
            (
                i32::from(cursor.read_u8()? as i8),
                i32::from(cursor.read_u8()? as i8),
            )
        };

        let (dx, dy) = if flags & CompoundGlyphComponentFlags::ARGS_ARE_XY_VALUES != 0 {
            (arg1 as f32, arg2 as f32)
        } else {
            log::debug!(
                "component {} is positioned by point matching, placing it unshifted",
                glyph_index
            );
            (0.0, 0.0)
        };

        let mut read_f2dot14 = || -> anyhow::Result<f32> {
            Ok(F2Dot14::from_bits(cursor.read_i16()?).to_num())
        };

        let (a, b, c, d) = if flags & CompoundGlyphComponentFlags::WE_HAVE_A_SCALE != 0 {
            let scale = read_f2dot14()?;
            (scale, 0.0, 0.0, scale)
        } else if flags & CompoundGlyphComponentFlags::WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            (read_f2dot14()?, 0.0, 0.0, read_f2dot14()?)
        } else if flags & CompoundGlyphComponentFlags::WE_HAVE_A_TWO_BY_TWO != 0 {
            (
                read_f2dot14()?,
                read_f2dot14()?,
                read_f2dot14()?,
                read_f2dot14()?,
            )
        } else {
            (1.0, 0.0, 0.0, 1.0)
        };

        let mut component = decode_glyph(tables, buffer, glyph_index, depth + 1)?;
        component.apply_transform(Transform::new(a, b, c, d, dx, dy));
        outline.extend(component);

        if flags & CompoundGlyphComponentFlags::MORE_COMPONENTS == 0 {
            break;
        }
    }

    Ok(outline)
}
