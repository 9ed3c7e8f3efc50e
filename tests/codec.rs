use kdgu_text::codec::{self, Encoding, Endian};
use kdgu_text::UnicodeString;
use proptest::prelude::*;

#[test]
fn ascii_round_trips_printable_range() {
    let bytes: Vec<u8> = (0x20u8..0x7F).collect();
    let (cps, errors) = codec::decode(Encoding::Ascii, &bytes);
    assert!(errors.is_empty());
    let (out, errors) = codec::encode(Encoding::Ascii, &cps);
    assert!(errors.is_empty());
    assert_eq!(out, bytes);
}

#[test]
fn ascii_high_bit_byte_is_replaced_and_recorded() {
    let (cps, errors) = codec::decode(Encoding::Ascii, &[b'h', b'i', 0x80, b'!']);
    assert_eq!(errors.len(), 1);
    assert_eq!(cps, vec![u32::from(b'h'), u32::from(b'i'), u32::from(b'?'), u32::from(b'!')]);
}

#[test]
fn utf8_overlong_sequence_is_rejected() {
    // C0 is never a valid leading byte (it could only introduce an
    // overlong encoding), so both bytes are rejected individually.
    let (cps, errors) = codec::decode(Encoding::Utf8, &[0xC0, 0xAF]);
    assert_eq!(errors.len(), 2);
    assert_eq!(cps, vec![0xFFFD, 0xFFFD]);
}

#[test]
fn utf8_broken_continuation_run_resyncs_at_next_byte() {
    // E2 82 starts a 3-byte sequence, but 'h' isn't a continuation byte.
    let (cps, errors) = codec::decode(Encoding::Utf8, &[0xE2, 0x82, b'h', b'i']);
    assert_eq!(errors.len(), 2);
    assert_eq!(cps, vec![0xFFFD, 0xFFFD, u32::from(b'h'), u32::from(b'i')]);
}

#[test]
fn utf16_surrogate_pair_decodes_to_supplementary_scalar() {
    // U+1F600 GRINNING FACE as a UTF-16BE surrogate pair.
    let bytes = [0xD8, 0x3D, 0xDE, 0x00];
    let (cps, errors) = codec::decode(Encoding::Utf16(Endian::Big), &bytes);
    assert!(errors.is_empty());
    assert_eq!(cps, vec![0x1F600]);
}

#[test]
fn utf16_unpaired_low_surrogate_is_replaced() {
    let bytes = [0xDC, 0x00];
    let (cps, errors) = codec::decode(Encoding::Utf16(Endian::Big), &bytes);
    assert_eq!(errors.len(), 1);
    assert_eq!(cps, vec![0xFFFD]);
}

#[test]
fn noncharacters_are_rejected_by_utf32() {
    let bytes = [0x00, 0x00, 0xFF, 0xFE]; // U+FFFE, big-endian (not the BOM pattern)
    let (cps, errors) = codec::decode(Encoding::Utf32(Endian::Big), &bytes);
    assert_eq!(errors.len(), 1);
    assert_eq!(cps, vec![0xFFFD]);
}

#[test]
fn ebcdic037_round_trips_digits_and_letters() {
    let s = UnicodeString::new(Encoding::Ebcdic037, &[0xC1, 0xC2, 0xC3, 0xF0, 0xF1]);
    assert!(s.errors().is_empty());
    assert_eq!(s.code_points(), &[b'A' as u32, b'B' as u32, b'C' as u32, b'0' as u32, b'1' as u32]);
    assert_eq!(s.to_bytes(), vec![0xC1, 0xC2, 0xC3, 0xF0, 0xF1]);
}

#[test]
fn cp1252_maps_curly_quotes_into_the_0x80_gap() {
    // 0x93 is LEFT DOUBLE QUOTATION MARK (U+201C) in CP1252, unlike Latin-1.
    let (cps, errors) = codec::decode(Encoding::Cp1252, &[0x93]);
    assert!(errors.is_empty());
    assert_eq!(cps, vec![0x201C]);
}

proptest! {
    #[test]
    fn utf8_decode_of_valid_rust_str_is_always_error_free(s in ".{0,64}") {
        let (_, errors) = codec::decode(Encoding::Utf8, s.as_bytes());
        prop_assert!(errors.is_empty());
    }

    #[test]
    fn utf8_decode_then_encode_round_trips_any_valid_str(s in ".{0,64}") {
        let (cps, _) = codec::decode(Encoding::Utf8, s.as_bytes());
        let (bytes, errors) = codec::encode(Encoding::Utf8, &cps);
        prop_assert!(errors.is_empty());
        prop_assert_eq!(bytes, s.into_bytes());
    }
}
