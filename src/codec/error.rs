//! Codec error taxonomy (spec §6, "Codec error taxonomy"). These are
//! *accumulated*, not raised — see spec §7a — so this type only ever
//! travels inside a `Vec<CodecError>` attached to a decoded string.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("byte {byte_offset}: invalid ASCII byte (>= 0x80)")]
    InvalidAscii { byte_offset: usize },
    #[error("byte {byte_offset}: invalid CP1252 byte")]
    InvalidCp1252 { byte_offset: usize },
    #[error("byte {byte_offset}: invalid EBCDIC-037 byte")]
    InvalidEbcdic { byte_offset: usize },

    #[error("byte {byte_offset}: stray UTF-8 continuation byte")]
    Utf8StrayContinuation { byte_offset: usize },
    #[error("byte {byte_offset}: invalid UTF-8 leading byte")]
    Utf8InvalidByte { byte_offset: usize },
    #[error("byte {byte_offset}: missing UTF-8 continuation byte")]
    Utf8MissingContinuation { byte_offset: usize },
    #[error("byte {byte_offset}: UTF-8 leading byte out of valid range")]
    Utf8InvalidRange { byte_offset: usize },
    #[error("byte {byte_offset}: UTF-8 continuation byte out of valid range")]
    Utf8InvalidContinuationRange { byte_offset: usize },
    #[error("byte {byte_offset}: UTF-8 sequence length/range mismatch")]
    Utf8RangeLengthMismatch { byte_offset: usize },
    #[error("byte {byte_offset}: invalid UTF-8 sequence length")]
    Utf8InvalidLength { byte_offset: usize },
    #[error("byte {byte_offset}: incorrect UTF-8 sequence length for decoded scalar")]
    Utf8IncorrectLength { byte_offset: usize },

    #[error("byte {byte_offset}: unexpected end of UTF-16 stream")]
    Utf16Eos { byte_offset: usize },
    #[error("byte {byte_offset}: unpaired UTF-16 surrogate")]
    Utf16MissingSurrogate { byte_offset: usize },

    #[error("byte {byte_offset}: unexpected end of UTF-32 stream")]
    Utf32Eos { byte_offset: usize },

    #[error("byte {byte_offset}: noncharacter U+{codepoint:04X}")]
    Noncharacter { byte_offset: usize, codepoint: u32 },
    #[error("byte {byte_offset}: U+{codepoint:04X} has no representation in {format_name}")]
    NoConversion {
        byte_offset: usize,
        codepoint: u32,
        format_name: &'static str,
    },
}

impl CodecError {
    pub fn byte_offset(&self) -> usize {
        match *self {
            CodecError::InvalidAscii { byte_offset }
            | CodecError::InvalidCp1252 { byte_offset }
            | CodecError::InvalidEbcdic { byte_offset }
            | CodecError::Utf8StrayContinuation { byte_offset }
            | CodecError::Utf8InvalidByte { byte_offset }
            | CodecError::Utf8MissingContinuation { byte_offset }
            | CodecError::Utf8InvalidRange { byte_offset }
            | CodecError::Utf8InvalidContinuationRange { byte_offset }
            | CodecError::Utf8RangeLengthMismatch { byte_offset }
            | CodecError::Utf8InvalidLength { byte_offset }
            | CodecError::Utf8IncorrectLength { byte_offset }
            | CodecError::Utf16Eos { byte_offset }
            | CodecError::Utf16MissingSurrogate { byte_offset }
            | CodecError::Utf32Eos { byte_offset }
            | CodecError::Noncharacter { byte_offset, .. }
            | CodecError::NoConversion { byte_offset, .. } => byte_offset,
        }
    }
}
