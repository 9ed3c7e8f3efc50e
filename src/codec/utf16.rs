//! UTF-16 decode/encode with BOM-based endian detection (spec §4.2).

use super::error::CodecError;
use super::is_noncharacter;
use super::Endian;

const REPLACEMENT: u32 = 0xFFFD;

fn read_u16(bytes: &[u8], i: usize, endian: Endian) -> u16 {
    match endian {
        Endian::Big => u16::from_be_bytes([bytes[i], bytes[i + 1]]),
        Endian::Little => u16::from_le_bytes([bytes[i], bytes[i + 1]]),
    }
}

fn write_u16(out: &mut Vec<u8>, unit: u16, endian: Endian) {
    match endian {
        Endian::Big => out.extend_from_slice(&unit.to_be_bytes()),
        Endian::Little => out.extend_from_slice(&unit.to_le_bytes()),
    }
}

/// Strips a UTF-16 BOM if present, returning the endian it selects (the
/// caller-supplied `endian` is the fallback for an unmarked stream).
fn detect_bom(bytes: &[u8], fallback: Endian) -> (Endian, usize) {
    if bytes.len() >= 2 {
        if bytes[0] == 0xFE && bytes[1] == 0xFF {
            return (Endian::Big, 2);
        }
        if bytes[0] == 0xFF && bytes[1] == 0xFE {
            return (Endian::Little, 2);
        }
    }
    (fallback, 0)
}

pub fn decode(bytes: &[u8], fallback: Endian, errors: &mut Vec<CodecError>) -> Vec<u32> {
    let (endian, bom_len) = detect_bom(bytes, fallback);
    let mut out = Vec::with_capacity(bytes.len() / 2);
    let mut i = bom_len;
    while i < bytes.len() {
        if i + 2 > bytes.len() {
            errors.push(CodecError::Utf16Eos { byte_offset: i });
            out.push(REPLACEMENT);
            break;
        }
        let unit = read_u16(bytes, i, endian);
        if (0xD800..=0xDBFF).contains(&unit) {
            if i + 4 > bytes.len() {
                errors.push(CodecError::Utf16Eos { byte_offset: i });
                out.push(REPLACEMENT);
                i += 2;
                continue;
            }
            let low = read_u16(bytes, i + 2, endian);
            if !(0xDC00..=0xDFFF).contains(&low) {
                errors.push(CodecError::Utf16MissingSurrogate { byte_offset: i });
                out.push(REPLACEMENT);
                i += 2;
                continue;
            }
            let high10 = u32::from(unit) - 0xD800;
            let low10 = u32::from(low) - 0xDC00;
            let cp = 0x10000 + (high10 << 10) + low10;
            push_scalar(&mut out, errors, i, cp);
            i += 4;
            continue;
        }
        if (0xDC00..=0xDFFF).contains(&unit) {
            errors.push(CodecError::Utf16MissingSurrogate { byte_offset: i });
            out.push(REPLACEMENT);
            i += 2;
            continue;
        }
        push_scalar(&mut out, errors, i, u32::from(unit));
        i += 2;
    }
    out
}

fn push_scalar(out: &mut Vec<u32>, errors: &mut Vec<CodecError>, byte_offset: usize, cp: u32) {
    if is_noncharacter(cp) {
        errors.push(CodecError::Noncharacter { byte_offset, codepoint: cp });
        out.push(REPLACEMENT);
    } else {
        out.push(cp);
    }
}

pub fn encode(codepoints: &[u32], endian: Endian) -> Vec<u8> {
    let mut out = Vec::with_capacity(codepoints.len() * 2);
    for &cp in codepoints {
        if cp <= 0xFFFF {
            write_u16(&mut out, cp as u16, endian);
        } else {
            let v = cp - 0x10000;
            let high = 0xD800 + (v >> 10) as u16;
            let low = 0xDC00 + (v & 0x3FF) as u16;
            write_u16(&mut out, high, endian);
            write_u16(&mut out, low, endian);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bom_selects_endian() {
        let mut errors = Vec::new();
        let bytes = [0xFE, 0xFF, 0x00, 0x41];
        let cps = decode(&bytes, Endian::Little, &mut errors);
        assert!(errors.is_empty());
        assert_eq!(cps, vec![0x41]);
    }

    #[test]
    fn surrogate_pair_round_trip() {
        let mut errors = Vec::new();
        let bytes = encode(&[0x1F600], Endian::Big);
        let cps = decode(&bytes, Endian::Big, &mut errors);
        assert!(errors.is_empty());
        assert_eq!(cps, vec![0x1F600]);
    }

    #[test]
    fn lone_high_surrogate_is_an_error() {
        let mut errors = Vec::new();
        let cps = decode(&[0xD8, 0x00, 0x00, 0x41], Endian::Big, &mut errors);
        assert_eq!(cps, vec![0xFFFD, 0x41]);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn lone_low_surrogate_is_an_error() {
        let mut errors = Vec::new();
        let cps = decode(&[0xDC, 0x00], Endian::Big, &mut errors);
        assert_eq!(cps, vec![0xFFFD]);
        assert_eq!(errors.len(), 1);
    }
}
