//! Full case mapping: simple 1:1 mappings, context-free special mappings
//! (one code point expanding into several), and the handful of
//! locale/context-sensitive rules `SpecialCasing.txt` documents (spec
//! §4.3). Kept close to the shape the teacher's `case.rs` used for the
//! context-free part; the locale dispatch the teacher flagged as "possibly
//! needing the whole thing made locale-aware" is filled in here instead of
//! left as a gap.

use crate::property::PropertyDb;

/// The locales with documented special-casing rules. A full ISO-639/3166
/// enumeration is out of scope (see DESIGN.md, Open Question 5); every
/// locale this crate does not single out here falls back to the
/// language-neutral mapping.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum Locale {
    #[default]
    None,
    Turkish,
    Lithuanian,
    Azeri,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CaseTarget {
    Upper,
    Lower,
    Title,
}

const COMBINING_DOT_ABOVE: u32 = 0x0307;
const LATIN_CAPITAL_I: u32 = 0x0049;
const LATIN_SMALL_I: u32 = 0x0069;
const LATIN_CAPITAL_I_DOT_ABOVE: u32 = 0x0130;
const LATIN_SMALL_DOTLESS_I: u32 = 0x0131;
const GREEK_CAPITAL_SIGMA: u32 = 0x03A3;
const GREEK_SMALL_SIGMA: u32 = 0x03C3;
const GREEK_SMALL_FINAL_SIGMA: u32 = 0x03C2;

fn is_dotted_lithuanian_base(cp: u32) -> bool {
    matches!(cp, 0x0049 | 0x004A | 0x012E)
}

fn is_lithuanian_accent(cp: u32) -> bool {
    matches!(cp, 0x0300 | 0x0301 | 0x0303)
}

/// Turkish/Azeri dotted-I special casing (SpecialCasing.txt `tr`/`az`
/// conditions). Returns `Some` when this code point has a locale override
/// that differs from the language-neutral mapping, `None` otherwise.
fn turkish_override(cp: u32, target: CaseTarget) -> Option<Vec<u32>> {
    match (target, cp) {
        (CaseTarget::Lower, c) if c == LATIN_CAPITAL_I => Some(vec![LATIN_SMALL_DOTLESS_I]),
        (CaseTarget::Lower, c) if c == LATIN_CAPITAL_I_DOT_ABOVE => Some(vec![LATIN_SMALL_I]),
        (CaseTarget::Upper, c) if c == LATIN_SMALL_I => Some(vec![LATIN_CAPITAL_I_DOT_ABOVE]),
        (CaseTarget::Upper, c) if c == LATIN_SMALL_DOTLESS_I => Some(vec![LATIN_CAPITAL_I]),
        (CaseTarget::Title, c) if c == LATIN_SMALL_I => Some(vec![LATIN_CAPITAL_I_DOT_ABOVE]),
        (CaseTarget::Title, c) if c == LATIN_SMALL_DOTLESS_I => Some(vec![LATIN_CAPITAL_I]),
        _ => None,
    }
}

fn is_cased(db: &PropertyDb, cp: u32) -> bool {
    db.cased(cp)
}

fn is_case_ignorable(db: &PropertyDb, cp: u32) -> bool {
    db.case_ignorable(cp)
}

/// `true` if there is a cased letter before `i` in `cps`, skipping
/// case-ignorable characters (the "Before" condition in the final-sigma
/// rule).
fn cased_letter_before(db: &PropertyDb, cps: &[u32], i: usize) -> bool {
    for &cp in cps[..i].iter().rev() {
        if is_cased(db, cp) {
            return true;
        }
        if !is_case_ignorable(db, cp) {
            return false;
        }
    }
    false
}

/// `true` if there is a cased letter after `i` in `cps` before the next
/// non-case-ignorable character (the "Not_Before" condition).
fn cased_letter_after(db: &PropertyDb, cps: &[u32], i: usize) -> bool {
    for &cp in &cps[i + 1..] {
        if is_cased(db, cp) {
            return true;
        }
        if !is_case_ignorable(db, cp) {
            return false;
        }
    }
    false
}

/// Map every code point in `cps` to `target` case, honoring `locale` and
/// the context-sensitive final-sigma / Lithuanian dot-retention rules
/// (spec §4.3). A code point with no mapping maps to itself.
pub fn case_map(db: &PropertyDb, cps: &[u32], target: CaseTarget, locale: Locale) -> Vec<u32> {
    let mut out = Vec::with_capacity(cps.len());
    for i in 0..cps.len() {
        let cp = cps[i];

        if matches!(locale, Locale::Turkish | Locale::Azeri) {
            if let Some(mapped) = turkish_override(cp, target) {
                out.extend(mapped);
                continue;
            }
        }

        if locale == Locale::Lithuanian
            && target == CaseTarget::Lower
            && is_dotted_lithuanian_base(cp)
            && cps.get(i + 1).copied().is_some_and(is_lithuanian_accent)
        {
            out.push(simple_or_self(db, cp, target));
            out.push(COMBINING_DOT_ABOVE);
            continue;
        }

        if target == CaseTarget::Lower
            && (cp == GREEK_CAPITAL_SIGMA || cp == GREEK_SMALL_SIGMA)
            && cased_letter_before(db, cps, i)
            && !cased_letter_after(db, cps, i)
        {
            out.push(GREEK_SMALL_FINAL_SIGMA);
            continue;
        }

        if let Some(special) = special_mapping(db, cp, target) {
            out.extend(special);
            continue;
        }

        out.push(simple_or_self(db, cp, target));
    }
    out
}

fn special_mapping(db: &PropertyDb, cp: u32, target: CaseTarget) -> Option<Vec<u32>> {
    match target {
        CaseTarget::Upper => db.special_upper(cp),
        CaseTarget::Lower => db.special_lower(cp),
        CaseTarget::Title => db.special_upper(cp),
    }
}

fn simple_or_self(db: &PropertyDb, cp: u32, target: CaseTarget) -> u32 {
    let record = db.lookup(cp);
    match target {
        CaseTarget::Upper => record.simple_upper.unwrap_or(cp),
        CaseTarget::Lower => record.simple_lower.unwrap_or(cp),
        CaseTarget::Title => record.simple_title.or(record.simple_upper).unwrap_or(cp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cps(s: &str) -> Vec<u32> {
        s.chars().map(|c| c as u32).collect()
    }

    #[test]
    fn upper_suess() {
        let db = PropertyDb::builtin();
        let out = case_map(&db, &cps("s\u{00FC}\u{00DF}"), CaseTarget::Upper, Locale::None);
        assert_eq!(out, cps("S\u{00DC}SS"));
    }

    #[test]
    fn capital_i_dot_above_lowercases_to_i_plus_combining_dot() {
        let db = PropertyDb::builtin();
        let out = case_map(&db, &[0x0130], CaseTarget::Lower, Locale::None);
        assert_eq!(out, vec![0x0069, 0x0307]);
    }

    #[test]
    fn turkish_dotted_i_case_insensitive_equivalence() {
        let db = PropertyDb::builtin();
        let lower_i = case_map(&db, &[0x0130], CaseTarget::Lower, Locale::Turkish);
        assert_eq!(lower_i, vec![0x0069]);
        let lower_plain_i = case_map(&db, &[0x0049], CaseTarget::Lower, Locale::Turkish);
        assert_eq!(lower_plain_i, vec![0x0131]);
        assert_ne!(lower_i, lower_plain_i);
    }

    #[test]
    fn greek_final_sigma() {
        let db = PropertyDb::builtin();
        let out = case_map(
            &db,
            &cps("\u{0391}\u{03A3}"),
            CaseTarget::Lower,
            Locale::None,
        );
        assert_eq!(out, cps("\u{03B1}\u{03C2}"));
    }

    #[test]
    fn sigma_mid_word_stays_medial() {
        let db = PropertyDb::builtin();
        let out = case_map(
            &db,
            &cps("\u{0391}\u{03A3}\u{0391}"),
            CaseTarget::Lower,
            Locale::None,
        );
        assert_eq!(out, cps("\u{03B1}\u{03C3}\u{03B1}"));
    }
}
