use crate::error::{Result, VectorError};

/// Where the converted units go, counted in units of the side being offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PartLayout {
    /// The target is smaller: it takes source units `offset..offset + dst_units`,
    /// zero past the end of the source.
    Extract { offset: usize },
    /// The target is at least as large: the whole source lands at target unit `offset`.
    Insert { offset: usize },
}

/// Resolves `part` for a conversion from `src_units` to `dst_units`.
///
/// A narrower target accepts `part` in `[0, ceil(src / dst))` and selects the
/// `part`-th block of the source, low to high. A wider or equal target accepts
/// `part` in `(-(dst / src), 0]` and places the source at block `-part`.
pub(crate) fn part_layout(src_units: usize, dst_units: usize, part: i32) -> Result<PartLayout> {
    if dst_units < src_units {
        let blocks = src_units.div_ceil(dst_units);
        match usize::try_from(part) {
            Ok(block) if block < blocks => Ok(PartLayout::Extract {
                offset: block * dst_units,
            }),
            _ => Err(VectorError::index(part, blocks)),
        }
    } else {
        let blocks = dst_units / src_units;
        match usize::try_from(-(part as i64)) {
            Ok(block) if block < blocks => Ok(PartLayout::Insert {
                offset: block * src_units,
            }),
            _ => Err(VectorError::index(part, blocks)),
        }
    }
}
