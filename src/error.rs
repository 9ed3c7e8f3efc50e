//! Crate-level error types that aren't specific to codec or regex (spec §7).

use thiserror::Error;

/// Precondition violations on [`crate::ustring::UnicodeString`] operations.
/// Codec-originated malformation never surfaces here — it's accumulated in
/// the string's own error list instead (spec §4.3.1, §7a).
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TextError {
    #[error("substr: start {start} is greater than end {end}")]
    InvalidRange { start: usize, end: usize },
    #[error("cursor index {index} is out of range (length {length})")]
    CursorOutOfRange { index: usize, length: usize },
}
