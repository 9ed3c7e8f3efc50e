//! Stream-Safe Text Format enforcement (UAX #15, spec §4.4).
//!
//! The spec's general algorithm computes each code point's leading/trailing
//! non-starter count from its own decomposition, since a single original
//! character can expand into several combining marks during the
//! decomposition pass. By the point this runs (after `decompose`/`compose`
//! have already flattened everything to atomic code points) every code
//! point contributes exactly one non-starter unit or zero, which is the
//! simplification this implementation takes.

use crate::property::PropertyDb;

/// UAX #15's documented maximum non-starter run length. The original C
/// source this crate is modeled on used a local buffer-size literal of 5
/// instead; this crate follows the UAX #15 value deliberately (see
/// DESIGN.md, Open Question 1).
const MAX_NONSTARTER_RUN: u32 = 30;
const COMBINING_GRAPHEME_JOINER: u32 = 0x034F;

pub fn make_stream_safe(db: &PropertyDb, cps: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(cps.len());
    let mut running = 0u32;
    let mut run_start = 0usize;

    for &cp in cps {
        if db.is_starter(cp) {
            running = 0;
            out.push(cp);
            continue;
        }
        if running + 1 > MAX_NONSTARTER_RUN {
            tracing::debug!(
                offset = out.len(),
                run_started_at = run_start,
                "inserting combining grapheme joiner to break non-starter run"
            );
            out.push(COMBINING_GRAPHEME_JOINER);
            running = 0;
        }
        if running == 0 {
            run_start = out.len();
        }
        out.push(cp);
        running += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_runs_are_untouched() {
        let db = PropertyDb::builtin();
        let cps = vec![0x0061, 0x0300, 0x0301];
        assert_eq!(make_stream_safe(&db, &cps), cps);
    }

    #[test]
    fn long_run_gets_a_cgj() {
        let db = PropertyDb::builtin();
        let mut cps = vec![0x0061];
        cps.extend(std::iter::repeat(0x0300).take(31));
        let out = make_stream_safe(&db, &cps);
        assert!(out.contains(&COMBINING_GRAPHEME_JOINER));
        // every run of non-starters in the output is <= 30
        let mut run = 0u32;
        for &cp in &out {
            if db.is_starter(cp) || cp == COMBINING_GRAPHEME_JOINER {
                run = 0;
            } else {
                run += 1;
                assert!(run <= MAX_NONSTARTER_RUN);
            }
        }
    }
}
