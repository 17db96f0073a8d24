//! Range comparison of byte arrays.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    #[error("{name} offset {offset} out of range for length {len}")]
    OffsetOutOfRange {
        name: &'static str,
        offset: isize,
        len: usize,
    },

    #[error("length should be larger than 0, got {0}")]
    NonPositiveLength(isize),

    #[error("length {length} exceeds the upper bound of {name} (length {len}) when starting from offset {offset}")]
    RangeOutOfBounds {
        name: &'static str,
        offset: usize,
        length: usize,
        len: usize,
    },
}

/// Compare `length` bytes of `src` starting at `src_offset` with `length`
/// bytes of `dest` starting at `dest_offset`.
///
/// Two absent arrays are equal, and so are two empty arrays; an absent or
/// empty array never equals a non-absent or non-empty one. Offsets and length
/// are only validated once both arrays have elements:
///
/// - each offset must lie in `0..len`
/// - `length` must be positive
/// - the range must fit inside both arrays
pub fn equals(
    src: Option<&[u8]>,
    src_offset: isize,
    dest: Option<&[u8]>,
    dest_offset: isize,
    length: isize,
) -> Result<bool, ArrayError> {
    let (src, dest) = match (src, dest) {
        (None, None) => return Ok(true),
        (Some(src), Some(dest)) => (src, dest),
        _ => return Ok(false),
    };
    match (src.is_empty(), dest.is_empty()) {
        (true, true) => return Ok(true),
        (false, false) => {}
        _ => return Ok(false),
    }

    let src_offset = check_offset("src", src, src_offset)?;
    let dest_offset = check_offset("dest", dest, dest_offset)?;

    let length = match usize::try_from(length) {
        Ok(length) if length > 0 => length,
        _ => return Err(ArrayError::NonPositiveLength(length)),
    };
    let src_range = check_range("src", src, src_offset, length)?;
    let dest_range = check_range("dest", dest, dest_offset, length)?;

    let equal = src_range == dest_range;
    tracing::trace!(src_offset, dest_offset, length, equal, "compared ranges");
    Ok(equal)
}

fn check_offset(name: &'static str, array: &[u8], offset: isize) -> Result<usize, ArrayError> {
    match usize::try_from(offset) {
        Ok(start) if start < array.len() => Ok(start),
        _ => Err(ArrayError::OffsetOutOfRange {
            name,
            offset,
            len: array.len(),
        }),
    }
}

fn check_range<'a>(
    name: &'static str,
    array: &'a [u8],
    offset: usize,
    length: usize,
) -> Result<&'a [u8], ArrayError> {
    offset
        .checked_add(length)
        .and_then(|end| array.get(offset..end))
        .ok_or(ArrayError::RangeOutOfBounds {
            name,
            offset,
            length,
            len: array.len(),
        })
}
