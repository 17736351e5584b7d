//! String descriptors (USB 2.0, table 9-15/9-16) built at compile time.
//!
//! Layout: `bLength`, `bDescriptorType` (0x03), then the string as
//! UTF-16LE code units with no terminator. Index 0 is special and holds
//! the list of supported language IDs instead of text.

use super::DescriptorType;

/// Length of the UTF-8 sequence introduced by `lead`.
const fn utf8_width(lead: u8) -> usize {
    if lead < 0x80 {
        1
    } else if lead < 0xE0 {
        2
    } else if lead < 0xF0 {
        3
    } else {
        4
    }
}

/// Decode the scalar value of the sequence starting at `bytes[at]`.
const fn decode_utf8(bytes: &[u8], at: usize, width: usize) -> u32 {
    let lead = bytes[at] as u32;
    let mut scalar = match width {
        1 => lead,
        2 => lead & 0x1F,
        3 => lead & 0x0F,
        _ => lead & 0x07,
    };
    let mut i = 1;
    while i < width {
        scalar = (scalar << 6) | (bytes[at + i] as u32 & 0x3F);
        i += 1;
    }
    scalar
}

/// Number of UTF-16 code units needed to encode `s`.
pub const fn utf16_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut units = 0;
    let mut i = 0;
    while i < bytes.len() {
        let width = utf8_width(bytes[i]);
        units += if width == 4 { 2 } else { 1 };
        i += width;
    }
    units
}

/// Total descriptor length for a text string descriptor holding `s`.
pub const fn string_descriptor_len(s: &str) -> usize {
    2 + 2 * utf16_len(s)
}

/// Encode `s` as a string descriptor.
///
/// `N` must equal [`string_descriptor_len`]; a mismatch, or a string too
/// long for the one-byte length field, fails const evaluation.
pub const fn string_descriptor<const N: usize>(s: &str) -> [u8; N] {
    assert!(N == string_descriptor_len(s), "string descriptor length mismatch");
    assert!(N <= u8::MAX as usize, "string descriptor too long");

    let mut out = [0u8; N];
    out[0] = N as u8;
    out[1] = DescriptorType::STRING;

    let bytes = s.as_bytes();
    let mut i = 0;
    let mut o = 2;
    while i < bytes.len() {
        let width = utf8_width(bytes[i]);
        let scalar = decode_utf8(bytes, i, width);
        if scalar >= 0x1_0000 {
            let v = scalar - 0x1_0000;
            let high = (0xD800 | (v >> 10)) as u16;
            let low = (0xDC00 | (v & 0x3FF)) as u16;
            out[o] = high.to_le_bytes()[0];
            out[o + 1] = high.to_le_bytes()[1];
            out[o + 2] = low.to_le_bytes()[0];
            out[o + 3] = low.to_le_bytes()[1];
            o += 4;
        } else {
            let unit = (scalar as u16).to_le_bytes();
            out[o] = unit[0];
            out[o + 1] = unit[1];
            o += 2;
        }
        i += width;
    }
    out
}

/// String descriptor 0: a single supported language ID.
pub const fn language_descriptor(language_id: u16) -> [u8; 4] {
    let id = language_id.to_le_bytes();
    [4, DescriptorType::STRING, id[0], id[1]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_encodes_one_unit_per_char() {
        const DESC: [u8; 8] = string_descriptor::<8>("abc");
        assert_eq!(DESC, [8, 0x03, b'a', 0, b'b', 0, b'c', 0]);
    }

    #[test]
    fn empty_string_is_header_only() {
        const DESC: [u8; 2] = string_descriptor::<2>("");
        assert_eq!(DESC, [2, 0x03]);
    }

    #[test]
    fn bmp_characters_use_single_units() {
        // "é" is U+00E9 (two UTF-8 bytes), "€" is U+20AC (three).
        assert_eq!(utf16_len("é€"), 2);
        const DESC: [u8; 6] = string_descriptor::<6>("é€");
        assert_eq!(DESC, [6, 0x03, 0xE9, 0x00, 0xAC, 0x20]);
    }

    #[test]
    fn supplementary_characters_use_surrogate_pairs() {
        // U+1F50A SPEAKER WITH THREE SOUND WAVES.
        assert_eq!(utf16_len("\u{1F50A}"), 2);
        const DESC: [u8; 6] = string_descriptor::<6>("\u{1F50A}");
        assert_eq!(DESC, [6, 0x03, 0x3D, 0xD8, 0x0A, 0xDD]);
    }

    #[test]
    fn language_descriptor_layout() {
        assert_eq!(language_descriptor(0x0409), [4, 0x03, 0x09, 0x04]);
    }
}
