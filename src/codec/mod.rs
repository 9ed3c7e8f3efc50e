//! Validating codecs: raw bytes in, decoded scalar values plus an
//! accumulated error list out, and the reverse for encoding. Spec §4.2.
//!
//! Every decoder here follows the same shape the teacher's `fix.rs` used
//! for its single supported encoding (UTF-8): walk forward, and on any
//! malformed byte, record an error, substitute the replacement, and resync
//! at the next plausible boundary. This module generalizes that shape to
//! every encoding spec §4.2 names.

mod ebcdic037;
mod error;
mod legacy;
mod utf16;
mod utf32;
mod utf8;

pub use error::CodecError;

/// Noncharacters are never valid decoded output; every decoder rejects them
/// (spec §4.2, "Noncharacter policy").
pub fn is_noncharacter(cp: u32) -> bool {
    if (0xFDD0..=0xFDEF).contains(&cp) {
        return true;
    }
    matches!(cp & 0xFFFE, 0xFFFE) && (cp & 0xFFFF) >= 0xFFFE
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Endian {
    Big,
    Little,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Encoding {
    Ascii,
    Cp1252,
    Ebcdic037,
    Utf8,
    Utf16(Endian),
    Utf32(Endian),
}

impl Encoding {
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Ascii => "ASCII",
            Encoding::Cp1252 => "CP1252",
            Encoding::Ebcdic037 => "EBCDIC-037",
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16(Endian::Big) => "UTF-16BE",
            Encoding::Utf16(Endian::Little) => "UTF-16LE",
            Encoding::Utf32(Endian::Big) => "UTF-32BE",
            Encoding::Utf32(Endian::Little) => "UTF-32LE",
        }
    }

    /// `true` for the legacy, single-byte-per-unit encodings, which use the
    /// ASCII `'?'` replacement rather than U+FFFD (spec §4.2, "Replacement
    /// policy").
    fn is_legacy(&self) -> bool {
        matches!(self, Encoding::Ascii | Encoding::Cp1252 | Encoding::Ebcdic037)
    }

    fn replacement(&self) -> u32 {
        if self.is_legacy() {
            u32::from(b'?')
        } else {
            0xFFFD
        }
    }
}

/// Decode `bytes` as `encoding`, returning the scalar values and every
/// recorded error. Always succeeds: malformed input is replaced, never
/// raised (spec §7a).
pub fn decode(encoding: Encoding, bytes: &[u8]) -> (Vec<u32>, Vec<CodecError>) {
    let mut errors = Vec::new();
    let codepoints = match encoding {
        Encoding::Ascii => legacy::decode_ascii(bytes, &mut errors),
        Encoding::Cp1252 => legacy::decode_cp1252(bytes, &mut errors),
        Encoding::Ebcdic037 => ebcdic037::decode(bytes, &mut errors),
        Encoding::Utf8 => utf8::decode(bytes, &mut errors),
        Encoding::Utf16(endian) => utf16::decode(bytes, endian, &mut errors),
        Encoding::Utf32(endian) => utf32::decode(bytes, endian, &mut errors),
    };
    for err in &errors {
        tracing::trace!(byte_offset = err.byte_offset(), kind = %err, "codec error");
    }
    (codepoints, errors)
}

/// Encode `codepoints` as `encoding`. Code points without a representation
/// in the target encoding become the encoding's replacement and record a
/// `NoConversion` error (spec §4.2, "Conversion").
pub fn encode(encoding: Encoding, codepoints: &[u32]) -> (Vec<u8>, Vec<CodecError>) {
    let mut errors = Vec::new();
    let bytes = match encoding {
        Encoding::Ascii => legacy::encode_ascii(codepoints, &mut errors),
        Encoding::Cp1252 => legacy::encode_cp1252(codepoints, &mut errors),
        Encoding::Ebcdic037 => ebcdic037::encode(codepoints, &mut errors),
        Encoding::Utf8 => utf8::encode(codepoints),
        Encoding::Utf16(endian) => utf16::encode(codepoints, endian),
        Encoding::Utf32(endian) => utf32::encode(codepoints, endian),
    };
    for err in &errors {
        tracing::trace!(byte_offset = err.byte_offset(), kind = %err, "codec error");
    }
    (bytes, errors)
}

/// Decode in `from`, re-encode in `to` (spec §4.2, "Conversion").
pub fn convert(from: Encoding, to: Encoding, bytes: &[u8]) -> (Vec<u8>, Vec<CodecError>) {
    let (codepoints, mut errors) = decode(from, bytes);
    let (out, encode_errors) = encode(to, &codepoints);
    errors.extend(encode_errors);
    (out, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noncharacter_ranges() {
        assert!(is_noncharacter(0xFDD0));
        assert!(is_noncharacter(0xFDEF));
        assert!(!is_noncharacter(0xFDEF - 1));
        assert!(is_noncharacter(0xFFFE));
        assert!(is_noncharacter(0xFFFF));
        assert!(is_noncharacter(0x1FFFE));
        assert!(is_noncharacter(0x10FFFF));
        assert!(!is_noncharacter(0x41));
    }

    #[test]
    fn convert_ascii_to_utf8_is_identity_for_ascii() {
        let (out, errors) = convert(Encoding::Ascii, Encoding::Utf8, b"hello");
        assert!(errors.is_empty());
        assert_eq!(out, b"hello");
    }
}
