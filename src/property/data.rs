//! Loads the generated (here: curated, see spec §1 / DESIGN.md) property
//! data from embedded JSON and builds the two-stage table, following the
//! teacher's `ucd.rs` `lazy_static!` idiom.

use serde::Deserialize;
use std::collections::HashMap;

use super::record::{DecompositionType, GeneralCategory, GraphemeBreak, Record};

const PROPERTY_DATA_JSON: &str = include_str!("../../resources/property_data.json");

#[derive(Deserialize)]
struct RawRecord {
    cp: u32,
    category: GeneralCategory,
    ccc: u8,
    decomposition_type: Option<DecompositionType>,
    decomposition: Option<Vec<u32>>,
    simple_upper: Option<u32>,
    simple_lower: Option<u32>,
    simple_title: Option<u32>,
    special_upper: Option<Vec<u32>>,
    special_lower: Option<Vec<u32>>,
    special_title: Option<Vec<u32>>,
    case_folding: Option<u32>,
    grapheme_break: GraphemeBreak,
    is_cased: bool,
    is_case_ignorable: bool,
    is_extended_pictographic: bool,
}

#[derive(Deserialize)]
struct RawData {
    records: Vec<RawRecord>,
    composition_pairs: Vec<[u32; 3]>,
    composition_exclusions: Vec<u32>,
}

/// Variable-length codepoint sequences referenced by [`Record`] pool
/// indices (decompositions, special case mappings, full case folding).
///
/// The original C implementation packs these into one flat buffer with a
/// surrogate sentinel marking a BMP/supplementary split; this port instead
/// stores one `Vec<u32>` per sequence and addresses it by plain index,
/// since nothing downstream needs the packed representation's space
/// savings (see DESIGN.md, "Data tables").
#[derive(Default)]
pub struct SequencePool {
    sequences: Vec<Vec<u32>>,
}

impl SequencePool {
    fn intern(&mut self, seq: Vec<u32>) -> u32 {
        self.sequences.push(seq);
        (self.sequences.len() - 1) as u32
    }

    pub fn get(&self, index: u32) -> &[u32] {
        &self.sequences[index as usize]
    }
}

const PAGE_SIZE: u32 = 256;
const MAX_CODEPOINT: u32 = 0x10FFFF;

pub struct PropertyData {
    pub stage1: Vec<u32>,
    pub stage2: Vec<Record>,
    pub pool: SequencePool,
    pub composition: HashMap<(u32, u32), u32>,
}

impl PropertyData {
    pub fn load() -> PropertyData {
        let raw: RawData =
            serde_json::from_str(PROPERTY_DATA_JSON).expect("embedded property_data.json is well-formed");

        let mut pool = SequencePool::default();
        let mut by_cp: HashMap<u32, Record> = HashMap::with_capacity(raw.records.len());
        for r in raw.records {
            let record = Record {
                category: r.category,
                ccc: r.ccc,
                decomposition_type: r.decomposition_type,
                decomposition: r.decomposition.map(|seq| pool.intern(seq)),
                simple_upper: r.simple_upper,
                simple_lower: r.simple_lower,
                simple_title: r.simple_title,
                special_upper: r.special_upper.map(|seq| pool.intern(seq)),
                special_lower: r.special_lower.map(|seq| pool.intern(seq)),
                special_title: r.special_title.map(|seq| pool.intern(seq)),
                case_folding: r.case_folding.map(|cp| pool.intern(vec![cp])),
                grapheme_break: r.grapheme_break,
                is_cased: r.is_cased,
                is_case_ignorable: r.is_case_ignorable,
                is_extended_pictographic: r.is_extended_pictographic,
            };
            by_cp.insert(r.cp, record);
        }

        let excluded: std::collections::HashSet<u32> = raw.composition_exclusions.into_iter().collect();
        let mut composition = HashMap::with_capacity(raw.composition_pairs.len());
        for [a, b, composed] in raw.composition_pairs {
            if !excluded.contains(&composed) {
                composition.insert((a, b), composed);
            }
        }

        let num_pages = (MAX_CODEPOINT / PAGE_SIZE + 1) as usize;
        let mut stage1 = vec![0u32; num_pages];
        // stage2[0..PAGE_SIZE] is the shared "all unassigned" page every
        // untouched stage1 entry points at.
        let mut stage2: Vec<Record> = vec![Record::UNASSIGNED; PAGE_SIZE as usize];

        for page in 0..num_pages as u32 {
            let base = page * PAGE_SIZE;
            let touched = (0..PAGE_SIZE).any(|offset| by_cp.contains_key(&(base + offset)));
            if !touched {
                continue;
            }
            let page_start = stage2.len() as u32;
            stage1[page as usize] = page_start;
            for offset in 0..PAGE_SIZE {
                let cp = base + offset;
                stage2.push(by_cp.get(&cp).copied().unwrap_or(Record::UNASSIGNED));
            }
        }

        tracing::debug!(
            pages = num_pages,
            touched_pages = stage2.len() / PAGE_SIZE as usize,
            records = by_cp.len(),
            "built property two-stage table"
        );

        PropertyData {
            stage1,
            stage2,
            pool,
            composition,
        }
    }
}
