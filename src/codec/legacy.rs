//! ASCII and CP1252, the two single-byte legacy encodings (spec §4.2).

use super::error::CodecError;

pub fn decode_ascii(bytes: &[u8], errors: &mut Vec<CodecError>) -> Vec<u32> {
    bytes
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            if b >= 0x80 {
                errors.push(CodecError::InvalidAscii { byte_offset: i });
                u32::from(b'?')
            } else {
                u32::from(b)
            }
        })
        .collect()
}

pub fn encode_ascii(codepoints: &[u32], errors: &mut Vec<CodecError>) -> Vec<u8> {
    codepoints
        .iter()
        .enumerate()
        .map(|(i, &cp)| {
            if cp < 0x80 {
                cp as u8
            } else {
                errors.push(CodecError::NoConversion {
                    byte_offset: i,
                    codepoint: cp,
                    format_name: "ASCII",
                });
                b'?'
            }
        })
        .collect()
}

/// CP1252 differs from Latin-1 only in the 0x80..=0x9F block, where it
/// assigns printable characters (curly quotes, em dash, etc.) instead of
/// the C1 control set; a handful of codes in that block remain unassigned
/// (spec §4.2: `{0x81, 0x8D, 0x8F, 0x90, 0x9D}`).
const CP1252_HIGH: [u32; 32] = [
    0x20AC, 0xFFFD, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0xFFFD, 0x017D, 0xFFFD, 0xFFFD, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014,
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0xFFFD, 0x017E, 0x0178,
];

fn is_cp1252_unassigned(b: u8) -> bool {
    matches!(b, 0x81 | 0x8D | 0x8F | 0x90 | 0x9D)
}

pub fn decode_cp1252(bytes: &[u8], errors: &mut Vec<CodecError>) -> Vec<u32> {
    bytes
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            if is_cp1252_unassigned(b) {
                errors.push(CodecError::InvalidCp1252 { byte_offset: i });
                u32::from(b'?')
            } else if b >= 0x80 && b <= 0x9F {
                CP1252_HIGH[(b - 0x80) as usize]
            } else {
                u32::from(b)
            }
        })
        .collect()
}

pub fn encode_cp1252(codepoints: &[u32], errors: &mut Vec<CodecError>) -> Vec<u8> {
    codepoints
        .iter()
        .enumerate()
        .map(|(i, &cp)| {
            if cp < 0x80 || (0xA0..=0xFF).contains(&cp) {
                return cp as u8;
            }
            if let Some(pos) = CP1252_HIGH.iter().position(|&c| c == cp) {
                return 0x80 + pos as u8;
            }
            errors.push(CodecError::NoConversion {
                byte_offset: i,
                codepoint: cp,
                format_name: "CP1252",
            });
            b'?'
        })
        .collect()
}
