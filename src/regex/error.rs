//! Regex error taxonomy (spec §6/§7b). Compile errors are latched: a
//! `Regex` value only ever exists for a pattern that parsed and compiled
//! cleanly. Runtime errors stop the current `exec` with no partial vector.

use thiserror::Error;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CompileError {
    #[error("byte {loc}: unmatched '('")]
    UnmatchedParen { loc: usize },
    #[error("byte {loc}: unmatched '{{'")]
    UnmatchedBrace { loc: usize },
    #[error("byte {loc}: empty character class")]
    EmptyClass { loc: usize },
    #[error("byte {loc}: unterminated character class")]
    UnterminatedClass { loc: usize },
    #[error("byte {loc}: invalid mode modifier '{ch}'")]
    InvalidModifier { loc: usize, ch: char },
    #[error("byte {loc}: invalid backreference")]
    InvalidBackref { loc: usize },
    #[error("byte {loc}: too many capture groups (max {max})")]
    TooManyGroups { loc: usize, max: usize },
    #[error("byte {loc}: quantifier applied to a non-repeatable construct")]
    InvalidQuantifierTarget { loc: usize },
    #[error("byte {loc}: nothing to repeat")]
    NothingToRepeat { loc: usize },
    #[error("byte {loc}: unexpected end of pattern")]
    UnexpectedEnd { loc: usize },
    #[error("byte {loc}: unknown group name '{name}'")]
    UnknownGroupName { loc: usize, name: String },
    #[error("GLOBAL and CONTINUE options are mutually exclusive")]
    InvalidOptions,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum VmError {
    #[error("thread stack overflow (limit {limit})")]
    StackOverflow { limit: usize },
    #[error("subroutine call depth overflow (limit {limit})")]
    CallOverflow { limit: usize },
    #[error("regex memory cap exceeded (limit {limit} bytes)")]
    OutOfMemory { limit: usize },
}
