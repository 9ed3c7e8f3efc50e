use kdgu_text::normalize::{self, NormalForm};
use kdgu_text::property::PropertyDb;
use proptest::prelude::*;

fn db() -> PropertyDb {
    PropertyDb::builtin()
}

#[test]
fn nfc_composes_precomposed_latin() {
    let db = db();
    // "e" + combining acute (U+0065, U+0301) -> U+00E9 (e-acute).
    let input = vec![0x0065, 0x0301];
    let nfc = normalize::normalize(&db, &input, NormalForm::Nfc);
    assert_eq!(nfc, vec![0x00E9]);
}

#[test]
fn nfd_decomposes_precomposed_latin() {
    let db = db();
    let input = vec![0x00E9];
    let nfd = normalize::normalize(&db, &input, NormalForm::Nfd);
    assert_eq!(nfd, vec![0x0065, 0x0301]);
}

#[test]
fn hangul_syllable_round_trips_through_decompose_then_compose() {
    let db = db();
    // U+AC00 (GA) decomposes to L+V jamo U+1100 U+1161, and recomposes.
    let input = vec![0xAC00];
    let decomposed = normalize::decompose(&db, &input, true);
    assert_eq!(decomposed, vec![0x1100, 0x1161]);
    let recomposed = normalize::compose(&db, &decomposed, true);
    assert_eq!(recomposed, vec![0xAC00]);
}

proptest! {
    #[test]
    fn nfc_is_idempotent(cps in prop::collection::vec(0x0041u32..0x0070, 0..16)) {
        let db = db();
        let once = normalize::normalize(&db, &cps, NormalForm::Nfc);
        let twice = normalize::normalize(&db, &once, NormalForm::Nfc);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn nfd_is_idempotent(cps in prop::collection::vec(0x0041u32..0x0070, 0..16)) {
        let db = db();
        let once = normalize::normalize(&db, &cps, NormalForm::Nfd);
        let twice = normalize::normalize(&db, &once, NormalForm::Nfd);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn stream_safe_never_leaves_a_run_over_the_threshold(
        run_len in 0usize..80
    ) {
        let db = db();
        let mut cps = vec![0x0061u32];
        cps.extend(std::iter::repeat(0x0300u32).take(run_len));
        let out = normalize::make_stream_safe(&db, &cps);
        let mut run = 0u32;
        for &cp in &out {
            if db.is_starter(cp) || cp == 0x034F {
                run = 0;
            } else {
                run += 1;
                prop_assert!(run <= 30);
            }
        }
    }
}
