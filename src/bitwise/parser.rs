// Parser combinators using nom for fixed-width record fields

use nom::{
    bytes::complete::take, number::complete::le_u16, sequence::preceded, IResult, Parser,
};

/// Slice `width` bytes located `offset` bytes into the input
pub fn field_at(input: &[u8], offset: usize, width: usize) -> IResult<&[u8], &[u8]> {
    preceded(take(offset), take(width)).parse(input)
}

/// Read a little-endian u16 located `offset` bytes into the input
pub fn le_u16_at(input: &[u8], offset: usize) -> IResult<&[u8], u16> {
    preceded(take(offset), le_u16).parse(input)
}

/// Take exactly `width` bytes
fn take_width(input: &[u8], width: usize) -> IResult<&[u8], &[u8]> {
    take(width).parse(input)
}

/// Parse a fixed-width text field terminated or padded by fill bytes
///
/// Returns `None` when the field holds nothing before the first fill byte.
/// Otherwise trailing spaces are trimmed, so an all-space name comes back as
/// `Some("")`. Bytes outside printable ASCII are replaced with `?`.
pub fn parse_fill_terminated<'a>(
    input: &'a [u8],
    width: usize,
    fill: &[u8],
) -> IResult<&'a [u8], Option<String>> {
    let (rest, bytes) = take_width(input, width)?;

    let end = bytes
        .iter()
        .position(|b| fill.contains(b))
        .unwrap_or(bytes.len());
    if end == 0 {
        return Ok((rest, None));
    }

    let text: String = bytes[..end]
        .iter()
        .map(|&b| {
            if (0x20..=0x7e).contains(&b) {
                b as char
            } else {
                '?'
            }
        })
        .collect();

    Ok((rest, Some(text.trim_end().to_string())))
}
