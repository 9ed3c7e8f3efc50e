//! Per-codepoint property record, mirroring the fields UnicodeData.txt and
//! friends ultimately boil down to once a data-table generator has run.

use serde::Deserialize;

/// General category, narrowed to the handful of values the rest of the
/// crate actually branches on (full Unicode has ~30; enumerating the rest
/// is a datum, not an algorithm, see spec §1).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
pub enum GeneralCategory {
    Lu,
    Ll,
    Lt,
    Lm,
    Lo,
    Mn,
    Mc,
    Me,
    Nd,
    Nl,
    No,
    Pc,
    Pd,
    Ps,
    Pe,
    Pi,
    Pf,
    Po,
    Sm,
    Sc,
    Sk,
    So,
    Zs,
    Zl,
    Zp,
    Cc,
    Cf,
    Cs,
    Co,
    Cn,
}

impl GeneralCategory {
    pub fn is_letter(self) -> bool {
        matches!(
            self,
            GeneralCategory::Lu
                | GeneralCategory::Ll
                | GeneralCategory::Lt
                | GeneralCategory::Lm
                | GeneralCategory::Lo
        )
    }

    pub fn is_mark(self) -> bool {
        matches!(
            self,
            GeneralCategory::Mn | GeneralCategory::Mc | GeneralCategory::Me
        )
    }

    pub fn is_number(self) -> bool {
        matches!(
            self,
            GeneralCategory::Nd | GeneralCategory::Nl | GeneralCategory::No
        )
    }

    pub fn is_punct(self) -> bool {
        matches!(
            self,
            GeneralCategory::Pc
                | GeneralCategory::Pd
                | GeneralCategory::Ps
                | GeneralCategory::Pe
                | GeneralCategory::Pi
                | GeneralCategory::Pf
                | GeneralCategory::Po
        )
    }

    pub fn is_space_separator(self) -> bool {
        matches!(self, GeneralCategory::Zs)
    }

    pub fn is_control(self) -> bool {
        matches!(self, GeneralCategory::Cc)
    }
}

/// The kind of decomposition a codepoint has, if any. Only `Canonical`
/// decompositions feed NFD; every other variant only feeds NFKD.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
pub enum DecompositionType {
    Canonical,
    Font,
    NoBreak,
    Initial,
    Medial,
    Final,
    Isolated,
    Circle,
    Super,
    Sub,
    Vertical,
    Wide,
    Narrow,
    Small,
    Square,
    Fraction,
    Compat,
}

/// Extended Grapheme Cluster Break property value, per UAX #29.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Hash)]
pub enum GraphemeBreak {
    Other,
    Cr,
    Lf,
    Control,
    Extend,
    ZWJ,
    RegionalIndicator,
    Prepend,
    SpacingMark,
    L,
    V,
    T,
    LV,
    LVT,
    EBase,
    EModifier,
    GlueAfterZwj,
    EBaseGAZ,
}

/// Index into the record's owning `PropertyDb`'s sequence pool, or absent.
pub type PoolIndex = Option<u32>;

/// The per-codepoint record addressed by the two-stage table (spec §3, §4.1).
#[derive(Copy, Clone, Debug)]
pub struct Record {
    pub category: GeneralCategory,
    pub ccc: u8,
    pub decomposition_type: Option<DecompositionType>,
    pub decomposition: PoolIndex,
    pub simple_upper: Option<u32>,
    pub simple_lower: Option<u32>,
    pub simple_title: Option<u32>,
    /// Context-free special case mapping (e.g. 0130 -> [0069, 0307]), shared
    /// across upper/lower/title via the sequence pool; the caller picks the
    /// field it needs after looking the sequence up.
    pub special_upper: PoolIndex,
    pub special_lower: PoolIndex,
    pub special_title: PoolIndex,
    pub case_folding: PoolIndex,
    pub grapheme_break: GraphemeBreak,
    pub is_cased: bool,
    pub is_case_ignorable: bool,
    pub is_extended_pictographic: bool,
}

impl Record {
    /// The record used for every codepoint the generated tables don't cover
    /// (and every codepoint `>= 0x110000`). Unassigned, category `Cn`.
    pub const UNASSIGNED: Record = Record {
        category: GeneralCategory::Cn,
        ccc: 0,
        decomposition_type: None,
        decomposition: None,
        simple_upper: None,
        simple_lower: None,
        simple_title: None,
        special_upper: None,
        special_lower: None,
        special_title: None,
        case_folding: None,
        grapheme_break: GraphemeBreak::Other,
        is_cased: false,
        is_case_ignorable: false,
        is_extended_pictographic: false,
    };

    pub fn is_starter(&self) -> bool {
        self.ccc == 0
    }
}
