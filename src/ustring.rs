//! `UnicodeString`: an owned, validated code-point buffer with an
//! encoding/normalization tag, a code-point cursor, and the splice/reverse/
//! case operations of spec §4.3. Grounded on the teacher's `cp_iter.rs`
//! byte-cursor-over-UTF-8 model, generalized to a cursor that tracks
//! code-point (not byte) position over an already-decoded buffer, since
//! every encoding this crate supports decodes to the same `Vec<u32>`
//! representation internally (spec §3's "internal byte representation"
//! collapses, in this port, to "internal scalar-value buffer" — the
//! encoding tag says how it would round-trip back to bytes).

use crate::case::{self, CaseTarget, Locale};
use crate::codec::{self, CodecError, Encoding};
use crate::error::TextError;
use crate::grapheme;
use crate::normalize::{self, NormalForm};
use crate::property::PropertyDb;

/// A decoded, validated Unicode string: a buffer of scalar values plus the
/// tags and accumulated errors spec §3 describes for the "string" data
/// model element.
#[derive(Clone, Debug)]
pub struct UnicodeString {
    cps: Vec<u32>,
    encoding: Encoding,
    norm: Option<NormalForm>,
    errors: Vec<CodecError>,
    cursor: usize,
    db: PropertyDb,
}

impl UnicodeString {
    /// Decode `bytes` as `encoding`. Always succeeds; malformed input is
    /// replaced and recorded in `errors()` (spec §7a).
    pub fn new(encoding: Encoding, bytes: &[u8]) -> UnicodeString {
        let (cps, errors) = codec::decode(encoding, bytes);
        UnicodeString {
            cps,
            encoding,
            norm: None,
            errors,
            cursor: 0,
            db: PropertyDb::builtin(),
        }
    }

    /// Construct directly from an ASCII `&str` (every byte < 0x80, so
    /// decoding cannot fail).
    pub fn new_ascii(s: &str) -> UnicodeString {
        UnicodeString::new(Encoding::Ascii, s.as_bytes())
    }

    pub fn from_utf8_str(s: &str) -> UnicodeString {
        UnicodeString::new(Encoding::Utf8, s.as_bytes())
    }

    pub fn copy(&self) -> UnicodeString {
        self.clone()
    }

    pub fn len(&self) -> usize {
        self.cps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cps.is_empty()
    }

    pub fn code_points(&self) -> &[u32] {
        &self.cps
    }

    pub fn errors(&self) -> &[CodecError] {
        &self.errors
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn norm_form(&self) -> Option<NormalForm> {
        self.norm
    }

    /// Re-encode the current buffer in `self.encoding`.
    pub fn to_bytes(&self) -> Vec<u8> {
        codec::encode(self.encoding, &self.cps).0
    }

    /// Append the decoded content of `bytes` (interpreted in `self`'s own
    /// encoding) to the buffer.
    pub fn append(&mut self, bytes: &[u8]) {
        let (cps, errors) = codec::decode(self.encoding, bytes);
        self.cps.extend(cps);
        self.errors.extend(errors);
        self.norm = None;
    }

    pub fn concat(&mut self, other: &UnicodeString) {
        self.cps.extend_from_slice(&other.cps);
        self.errors.extend(other.errors.iter().cloned());
        self.norm = None;
    }

    /// Deletes the code points `[a, b)`.
    pub fn delete(&mut self, a: usize, b: usize) -> Result<(), TextError> {
        if a > b {
            return Err(TextError::InvalidRange { start: a, end: b });
        }
        let b = b.min(self.cps.len());
        let a = a.min(b);
        self.cps.drain(a..b);
        self.norm = None;
        Ok(())
    }

    /// Returns the code points `[a, b)` as a new string sharing this
    /// string's encoding tag.
    pub fn substr(&self, a: usize, b: usize) -> Result<UnicodeString, TextError> {
        if a > b {
            return Err(TextError::InvalidRange { start: a, end: b });
        }
        let b = b.min(self.cps.len());
        let a = a.min(b);
        Ok(UnicodeString {
            cps: self.cps[a..b].to_vec(),
            encoding: self.encoding,
            norm: self.norm,
            errors: Vec::new(),
            cursor: 0,
            db: self.db,
        })
    }

    /// Strips trailing whitespace (general category `Zs`, plus the common
    /// ASCII control whitespace).
    pub fn chomp(&mut self) {
        while let Some(&last) = self.cps.last() {
            if is_whitespace(&self.db, last) {
                self.cps.pop();
            } else {
                break;
            }
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.cps.iter().all(|&cp| is_whitespace(&self.db, cp))
    }

    pub fn contains(&self, cp: u32) -> bool {
        self.cps.contains(&cp)
    }

    pub fn equal(&self, other: &UnicodeString) -> bool {
        self.cps == other.cps
    }

    // --- cursor model (spec §4.3) ---

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn seek(&mut self, index: usize) -> Result<(), TextError> {
        if index > self.cps.len() {
            return Err(TextError::CursorOutOfRange {
                index,
                length: self.cps.len(),
            });
        }
        self.cursor = index;
        Ok(())
    }

    /// Advances the cursor by one code point.
    pub fn inc(&mut self) {
        if self.cursor < self.cps.len() {
            self.cursor += 1;
        }
    }

    /// Retreats the cursor by one code point.
    pub fn dec(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Advances the cursor to the start of the next grapheme cluster.
    pub fn next(&mut self) {
        self.cursor = grapheme::next_boundary(&self.db, &self.cps, self.cursor);
    }

    /// Retreats the cursor to the start of the previous grapheme cluster.
    pub fn prev(&mut self) {
        self.cursor = grapheme::prev_boundary(&self.db, &self.cps, self.cursor);
    }

    /// Seeks to the n-th code point (O(1) in this port: the internal
    /// representation is already a flat `Vec<u32>`, so "fixed-width vs.
    /// variable-width" no longer distinguishes the cost the way it did over
    /// raw encoded bytes).
    pub fn nth(&mut self, n: usize) -> Result<(), TextError> {
        self.seek(n)
    }

    /// The code point at the cursor, without moving it.
    pub fn decode(&self) -> Option<u32> {
        self.cps.get(self.cursor).copied()
    }

    /// Number of code points the cursor's current position would occupy if
    /// re-encoded in `self.encoding` (spec §4.3's `chrsize`).
    pub fn chrsize(&self) -> usize {
        match self.decode() {
            Some(cp) => codec::encode(self.encoding, &[cp]).0.len(),
            None => 0,
        }
    }

    /// Replaces the code point at the cursor with `cp`.
    pub fn overwrite(&mut self, cp: u32) -> Result<(), TextError> {
        if self.cursor >= self.cps.len() {
            return Err(TextError::CursorOutOfRange {
                index: self.cursor,
                length: self.cps.len(),
            });
        }
        self.cps[self.cursor] = cp;
        self.norm = None;
        Ok(())
    }

    /// Inserts a single code point at the cursor.
    pub fn insert_point(&mut self, cp: u32) {
        self.cps.insert(self.cursor, cp);
        self.norm = None;
    }

    /// Decodes `bytes` in `self`'s encoding and splices the result in at
    /// the cursor.
    pub fn insert_buffer(&mut self, bytes: &[u8]) {
        let (cps, errors) = codec::decode(self.encoding, bytes);
        let at = self.cursor;
        for (i, cp) in cps.into_iter().enumerate() {
            self.cps.insert(at + i, cp);
        }
        self.errors.extend(errors);
        self.norm = None;
    }

    /// Removes the code point at the cursor.
    pub fn delete_point(&mut self) -> Result<(), TextError> {
        if self.cursor >= self.cps.len() {
            return Err(TextError::CursorOutOfRange {
                index: self.cursor,
                length: self.cps.len(),
            });
        }
        self.cps.remove(self.cursor);
        self.norm = None;
        Ok(())
    }

    /// Reverses the sequence of grapheme clusters, not code points or
    /// bytes (spec §4.3).
    pub fn reverse(&mut self) {
        let clusters = grapheme::clusters(&self.db, &self.cps);
        let mut out = Vec::with_capacity(self.cps.len());
        for &(start, end) in clusters.iter().rev() {
            out.extend_from_slice(&self.cps[start..end]);
        }
        self.cps = out;
        self.cursor = self.cursor.min(self.cps.len());
        self.norm = None;
    }

    pub fn upper(&mut self, locale: Locale) {
        self.cps = case::case_map(&self.db, &self.cps, CaseTarget::Upper, locale);
        self.norm = None;
    }

    pub fn lower(&mut self, locale: Locale) {
        self.cps = case::case_map(&self.db, &self.cps, CaseTarget::Lower, locale);
        self.norm = None;
    }

    /// Normalizes in place; a no-op if the tag already matches `form`
    /// (spec §4.4).
    pub fn normalize(&mut self, form: NormalForm) {
        if self.norm == Some(form) {
            return;
        }
        self.cps = normalize::normalize(&self.db, &self.cps, form);
        self.norm = Some(form);
    }
}

fn is_whitespace(db: &PropertyDb, cp: u32) -> bool {
    db.lookup(cp).category.is_space_separator() || matches!(cp, 0x09..=0x0D | 0x20 | 0x85)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_then_encode_round_trips_utf8() {
        let s = UnicodeString::from_utf8_str("héllo");
        assert!(s.errors().is_empty());
        assert_eq!(s.to_bytes(), "héllo".as_bytes());
    }

    #[test]
    fn reverse_is_cluster_aware() {
        // a + combining grave (U+0300) + b, as raw UTF-8 bytes: 0x61, 0xCC
        // 0x80 (U+0300), 0x62.
        let mut s = UnicodeString::new(Encoding::Utf8, &[0x61u8, 0xCC, 0x80, 0x62]);
        s.reverse();
        assert_eq!(s.code_points(), &[0x0062, 0x0061, 0x0300]);
    }

    #[test]
    fn substr_rejects_inverted_range() {
        let s = UnicodeString::from_utf8_str("hello");
        assert!(s.substr(3, 1).is_err());
    }

    #[test]
    fn chomp_strips_trailing_whitespace() {
        let mut s = UnicodeString::from_utf8_str("hi   ");
        s.chomp();
        assert_eq!(s.to_bytes(), b"hi");
    }

    #[test]
    fn normalize_is_idempotent_via_tag() {
        let mut s = UnicodeString::new(Encoding::Utf8, "\u{00E5}".as_bytes());
        s.normalize(NormalForm::Nfd);
        let after_first = s.code_points().to_vec();
        s.normalize(NormalForm::Nfd);
        assert_eq!(s.code_points(), after_first.as_slice());
    }
}
