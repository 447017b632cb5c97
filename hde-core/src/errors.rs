//! errors.rs - Custom error types for the hde-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// What exactly is wrong with a corpus line or sentence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatIssue {
    #[error("expected {expected} tab-separated columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("token index '{0}' is not a positive integer")]
    InvalidIndex(String),

    #[error("head index '{0}' is not a non-negative integer")]
    InvalidHead(String),

    #[error("dependency relation column is empty")]
    EmptyRelation,

    #[error("token {0} is its own head")]
    SelfLoop(u32),

    #[error("token index {found} out of sequence (expected {expected})")]
    IndexOutOfSequence { expected: u32, found: u32 },

    #[error("token {index} points to head {head} outside its sentence of {sentence_len} tokens")]
    HeadOutOfRange { index: u32, head: u32, sentence_len: usize },
}

/// A malformed line or sentence, located by corpus file and 1-based line number.
///
/// Recoverable: the sentence containing it is dropped and reading continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{source_id}:{line}: {issue}")]
pub struct CorpusFormatError {
    pub source_id: String,
    pub line: u64,
    pub issue: FormatIssue,
}

impl CorpusFormatError {
    pub fn new(source_id: impl Into<String>, line: u64, issue: FormatIssue) -> Self {
        Self {
            source_id: source_id.into(),
            line,
            issue,
        }
    }
}

/// This enum represents all possible error types in the `hde-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HdeError {
    #[error("Malformed corpus input: {0}")]
    CorpusFormat(#[from] CorpusFormatError),

    #[error("No corpus file found for language '{0}'")]
    MissingCorpus(String),

    #[error("Failed to read '{source_id}': {source}")]
    Io {
        source_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),
}

impl HdeError {
    pub fn io(source_id: impl Into<String>, source: std::io::Error) -> Self {
        HdeError::Io {
            source_id: source_id.into(),
            source,
        }
    }
}
