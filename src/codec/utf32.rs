//! UTF-32 decode/encode with BOM-based endian detection (spec §4.2).

use super::error::CodecError;
use super::is_noncharacter;
use super::Endian;

const REPLACEMENT: u32 = 0xFFFD;

fn read_u32(bytes: &[u8], i: usize, endian: Endian) -> u32 {
    let b = [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]];
    match endian {
        Endian::Big => u32::from_be_bytes(b),
        Endian::Little => u32::from_le_bytes(b),
    }
}

fn write_u32(out: &mut Vec<u8>, v: u32, endian: Endian) {
    match endian {
        Endian::Big => out.extend_from_slice(&v.to_be_bytes()),
        Endian::Little => out.extend_from_slice(&v.to_le_bytes()),
    }
}

fn detect_bom(bytes: &[u8], fallback: Endian) -> (Endian, usize) {
    if bytes.len() >= 4 {
        if bytes[0..4] == [0x00, 0x00, 0xFE, 0xFF] {
            return (Endian::Big, 4);
        }
        if bytes[0..4] == [0xFF, 0xFE, 0x00, 0x00] {
            return (Endian::Little, 4);
        }
    }
    (fallback, 0)
}

pub fn decode(bytes: &[u8], fallback: Endian, errors: &mut Vec<CodecError>) -> Vec<u32> {
    let (endian, bom_len) = detect_bom(bytes, fallback);
    let mut out = Vec::with_capacity(bytes.len() / 4);
    let mut i = bom_len;
    while i < bytes.len() {
        if i + 4 > bytes.len() {
            errors.push(CodecError::Utf32Eos { byte_offset: i });
            out.push(REPLACEMENT);
            break;
        }
        let cp = read_u32(bytes, i, endian);
        if cp > 0x10FFFF || is_noncharacter(cp) {
            errors.push(CodecError::Noncharacter { byte_offset: i, codepoint: cp });
            out.push(REPLACEMENT);
        } else {
            out.push(cp);
        }
        i += 4;
    }
    out
}

pub fn encode(codepoints: &[u32], endian: Endian) -> Vec<u8> {
    let mut out = Vec::with_capacity(codepoints.len() * 4);
    for &cp in codepoints {
        write_u32(&mut out, cp, endian);
    }
    out
}
