//! Code-point property database: two-stage table lookup, decomposition
//! (including arithmetic Hangul decomposition), and canonical composition.
//! Spec §3, §4.1.

mod data;
pub mod record;

use lazy_static::lazy_static;
pub use record::{DecompositionType, GeneralCategory, GraphemeBreak, Record};

use data::PropertyData;

/// Hangul syllable arithmetic constants, UAX #29 / §4.1.
pub const S_BASE: u32 = 0xAC00;
pub const L_BASE: u32 = 0x1100;
pub const V_BASE: u32 = 0x1161;
pub const T_BASE: u32 = 0x11A7;
pub const L_COUNT: u32 = 19;
pub const V_COUNT: u32 = 21;
pub const T_COUNT: u32 = 28;
pub const N_COUNT: u32 = V_COUNT * T_COUNT;
pub const S_COUNT: u32 = L_COUNT * N_COUNT;

fn is_hangul_syllable(cp: u32) -> bool {
    (S_BASE..S_BASE + S_COUNT).contains(&cp)
}

fn is_hangul_l(cp: u32) -> bool {
    (L_BASE..L_BASE + L_COUNT).contains(&cp)
}
fn is_hangul_v(cp: u32) -> bool {
    (V_BASE..V_BASE + V_COUNT).contains(&cp)
}
fn is_hangul_t(cp: u32) -> bool {
    (T_BASE + 1..T_BASE + T_COUNT).contains(&cp)
}

const PAGE_SIZE: u32 = 256;

lazy_static! {
    static ref DATA: PropertyData = PropertyData::load();
}

/// The read-only property database. Cheap to construct (it is a thin
/// handle onto the process-wide `lazy_static` singleton); exists as a type
/// so call sites don't sprinkle free functions everywhere, matching the
/// shape the rest of the crate (codec, normalizer) expects to call into.
#[derive(Copy, Clone, Default)]
pub struct PropertyDb;

impl PropertyDb {
    pub fn builtin() -> PropertyDb {
        PropertyDb
    }

    /// `stage1[cp >> 8]` selects a page, `stage2[page + (cp & 0xFF)]`
    /// selects the record. Codepoints outside the Unicode range resolve to
    /// the unassigned record.
    pub fn lookup(&self, cp: u32) -> Record {
        if cp > 0x10FFFF {
            return Record::UNASSIGNED;
        }
        if is_hangul_syllable(cp) {
            let gb = if (cp - S_BASE) % T_COUNT == 0 {
                GraphemeBreak::LV
            } else {
                GraphemeBreak::LVT
            };
            return Record {
                grapheme_break: gb,
                ..Record::UNASSIGNED
            };
        }
        if is_hangul_l(cp) {
            return Record {
                grapheme_break: GraphemeBreak::L,
                ..Record::UNASSIGNED
            };
        }
        if is_hangul_v(cp) {
            return Record {
                grapheme_break: GraphemeBreak::V,
                ..Record::UNASSIGNED
            };
        }
        if is_hangul_t(cp) {
            return Record {
                grapheme_break: GraphemeBreak::T,
                ..Record::UNASSIGNED
            };
        }
        let page = DATA.stage1[(cp / PAGE_SIZE) as usize];
        DATA.stage2[(page + (cp % PAGE_SIZE)) as usize]
    }

    pub fn combining_class(&self, cp: u32) -> u8 {
        self.lookup(cp).ccc
    }

    pub fn is_starter(&self, cp: u32) -> bool {
        self.combining_class(cp) == 0
    }

    pub fn grapheme_break(&self, cp: u32) -> GraphemeBreak {
        self.lookup(cp).grapheme_break
    }

    /// Full (possibly recursive) decomposition of a single codepoint.
    /// `canonical_only` selects NFD-eligible (type `Canonical`) vs. any
    /// decomposition type (NFKD), per spec §4.4.
    pub fn decompose_char(&self, cp: u32, canonical_only: bool) -> Vec<u32> {
        if is_hangul_syllable(cp) {
            let s_index = cp - S_BASE;
            let l = L_BASE + s_index / N_COUNT;
            let v = V_BASE + (s_index % N_COUNT) / T_COUNT;
            let t = s_index % T_COUNT;
            return if t == 0 {
                vec![l, v]
            } else {
                vec![l, v, T_BASE + t]
            };
        }
        let record = self.lookup(cp);
        let Some(pool_index) = record.decomposition else {
            return vec![cp];
        };
        if canonical_only && record.decomposition_type != Some(DecompositionType::Canonical) {
            return vec![cp];
        }
        let seq = DATA.pool.get(pool_index).to_vec();
        seq.into_iter()
            .flat_map(|c| self.decompose_char(c, canonical_only))
            .collect()
    }

    /// Canonical composition of an ordered pair, including the arithmetic
    /// Hangul rule (L+V -> LV, LV+T -> LVT). Composition exclusions are
    /// filtered out at table-build time (spec §4.1).
    pub fn lookup_comp(&self, a: u32, b: u32) -> Option<u32> {
        if is_hangul_l(a) && is_hangul_v(b) {
            let l_index = a - L_BASE;
            let v_index = b - V_BASE;
            return Some(S_BASE + (l_index * V_COUNT + v_index) * T_COUNT);
        }
        if is_hangul_syllable(a) && is_hangul_t(b) && (a - S_BASE) % T_COUNT == 0 {
            return Some(a + (b - T_BASE));
        }
        DATA.composition.get(&(a, b)).copied()
    }

    pub fn special_lower(&self, cp: u32) -> Option<Vec<u32>> {
        self.lookup(cp).special_lower.map(|i| DATA.pool.get(i).to_vec())
    }
    pub fn special_upper(&self, cp: u32) -> Option<Vec<u32>> {
        self.lookup(cp).special_upper.map(|i| DATA.pool.get(i).to_vec())
    }
    pub fn case_folding(&self, cp: u32) -> Option<Vec<u32>> {
        self.lookup(cp).case_folding.map(|i| DATA.pool.get(i).to_vec())
    }
    pub fn cased(&self, cp: u32) -> bool {
        self.lookup(cp).is_cased
    }
    pub fn case_ignorable(&self, cp: u32) -> bool {
        self.lookup(cp).is_case_ignorable
    }
    pub fn extended_pictographic(&self, cp: u32) -> bool {
        self.lookup(cp).is_extended_pictographic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_unassigned_past_max() {
        let db = PropertyDb::builtin();
        assert_eq!(db.lookup(0x110000).category, GeneralCategory::Cn);
    }

    #[test]
    fn combining_class_lookup() {
        let db = PropertyDb::builtin();
        assert_eq!(db.combining_class(0x0301), 230);
        assert_eq!(db.combining_class(0x0041), 0);
        assert!(db.is_starter(0x0041));
        assert!(!db.is_starter(0x0301));
    }

    #[test]
    fn decompose_precomposed() {
        let db = PropertyDb::builtin();
        assert_eq!(db.decompose_char(0x00E5, true), vec![0x0061, 0x030A]);
    }

    #[test]
    fn decompose_hangul_syllable() {
        let db = PropertyDb::builtin();
        // HANGUL SYLLABLE GA (no trailing consonant)
        let ga = S_BASE;
        assert_eq!(db.decompose_char(ga, true), vec![L_BASE, V_BASE]);
        // HANGUL SYLLABLE GAG (has T)
        assert_eq!(
            db.decompose_char(ga + 1, true),
            vec![L_BASE, V_BASE, T_BASE + 1]
        );
    }

    #[test]
    fn compose_pair() {
        let db = PropertyDb::builtin();
        assert_eq!(db.lookup_comp(0x0061, 0x030A), Some(0x00E5));
        assert_eq!(db.lookup_comp(0x0061, 0x0301), None);
    }

    #[test]
    fn compose_hangul() {
        let db = PropertyDb::builtin();
        assert_eq!(db.lookup_comp(L_BASE, V_BASE), Some(S_BASE));
        assert_eq!(db.lookup_comp(S_BASE, T_BASE + 1), Some(S_BASE + 1));
    }

    #[test]
    fn composition_exclusion_is_honored() {
        let db = PropertyDb::builtin();
        // 0344 is a real Composition_Exclusion: even though its
        // decomposition pair is present in the source pairs list, it must
        // never compose back.
        assert_eq!(db.lookup_comp(0x0308, 0x0301), None);
    }
}
