//! A Unicode-aware string type over validating codecs, normalization, and
//! a Perl-flavored backtracking regex engine.
//!
//! Data flow: raw bytes decode into a [`ustring::UnicodeString`] (via
//! [`codec`]); [`normalize`] and [`case`] operate on its code-point buffer;
//! [`grapheme`] segments it into user-perceived characters; [`regex`]
//! compiles and executes patterns against it.

pub mod case;
pub mod codec;
pub mod error;
pub mod grapheme;
pub mod normalize;
pub mod property;
pub mod regex;
pub mod ustring;

pub use case::Locale;
pub use codec::Encoding;
pub use error::TextError;
pub use normalize::NormalForm;
pub use regex::{CompileError, Regex, VmError};
pub use ustring::UnicodeString;
