//! Code-unit policy for `.lang` text.
//!
//! Text is stored as one little-endian 16-bit unit per character, with no
//! surrogate pairing in either direction. All conversions between units and
//! `char` go through [`scalar_from_code_unit`] and [`code_unit_from_scalar`] so
//! record framing never depends on the policy.

/// Maps one stored unit to a scalar value.
///
/// Units are taken as scalar values directly. A lone surrogate (0xD800..=0xDFFF)
/// is not a valid `char` and becomes U+FFFD, as legacy readers do.
pub fn scalar_from_code_unit(unit: u16) -> char {
    char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Maps one scalar value to a stored unit, keeping only the low 16 bits.
///
/// Characters outside the Basic Multilingual Plane are not split into a
/// surrogate pair; they are written as a single truncated unit.
pub fn code_unit_from_scalar(ch: char) -> u16 {
    (u32::from(ch) & 0xFFFF) as u16
}

/// Decodes `bytes` as little-endian units. A trailing odd byte is ignored;
/// callers always pass an even-length slice.
pub fn decode_units(bytes: &[u8]) -> String {
    bytes
        .chunks_exact(2)
        .map(|pair| scalar_from_code_unit(u16::from_le_bytes([pair[0], pair[1]])))
        .collect()
}

/// Appends one little-endian unit per scalar of `text` to `out`; returns the unit count.
pub fn encode_units(text: &str, out: &mut Vec<u8>) -> usize {
    let mut units = 0;
    for ch in text.chars() {
        out.extend_from_slice(&code_unit_from_scalar(ch).to_le_bytes());
        units += 1;
    }
    units
}
