// hde-core/src/lib.rs
//! # HDE Core Library
//!
//! `hde-core` computes the Head Direction Entropy of dependency treebanks: for
//! each language it measures how consistently a head precedes or follows its
//! dependent, per dependency relation, and folds those per-relation entropies
//! into one frequency-weighted word-order-freedom score.
//!
//! The library does no downloading and no plotting. It expects CoNLL-U files
//! on disk and produces a table of numbers.
//!
//! ## Modules
//!
//! * `conllu`: Lazy CoNLL-U reader yielding tokens and sentence boundaries.
//! * `estimator`: Per-language direction counting and entropy aggregation.
//! * `result`: The immutable per-language result record and the aggregate score type.
//! * `corpus`: Maps language identifiers to corpus files on disk.
//! * `batch`: Runs every configured language and collects a report.
//! * `output`: Writes the result table as TSV or JSON.
//! * `config`: YAML run configuration, loading, merging and validation.
//! * `errors`: Structured error types.
//!
//! ## Usage Example
//!
//! ```rust
//! use std::io::Cursor;
//! use hde_core::{CorpusReader, EntropyEstimator, EstimatorOptions, RelationLabelPolicy};
//!
//! fn main() -> Result<(), hde_core::HdeError> {
//!     let text = "1\tdogs\tdog\tNOUN\t_\t_\t2\tnsubj\t_\t_\n\
//!                 2\tbark\tbark\tVERB\t_\t_\t0\troot\t_\t_\n\n";
//!     let reader = CorpusReader::new("inline", Cursor::new(text), RelationLabelPolicy::Base);
//!
//!     let mut estimator = EntropyEstimator::new("en", EstimatorOptions::default());
//!     estimator.fold(reader)?;
//!     let result = estimator.finalize();
//!
//!     assert_eq!(result.relation_entropy("nsubj"), Some(0.0));
//!     assert_eq!(result.aggregate_score.value(), Some(0.0));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Malformed lines surface as [`CorpusFormatError`]s. The estimator absorbs
//! them one sentence at a time and counts them; a language whose corpus is
//! missing or unreadable becomes a [`LanguageFailure`] in the batch report.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod batch;
pub mod config;
pub mod conllu;
pub mod corpus;
pub mod errors;
pub mod estimator;
pub mod output;
pub mod result;

/// Re-exports the run configuration types.
pub use config::{merge_overrides, AnalysisConfig, EstimatorConfig};

/// Re-exports the custom error types for clear error reporting.
pub use errors::{CorpusFormatError, FormatIssue, HdeError};

pub use conllu::{CorpusEvent, CorpusReader, RelationLabelPolicy, Token};
pub use estimator::{Conditioning, EntropyEstimator, EstimatorOptions};
pub use result::{AggregateScore, CorpusResult, FoldStats, RelationStats};

pub use corpus::CorpusCatalog;
pub use batch::{analyze_language, run_batch, run_config, BatchReport, LanguageFailure, RunSummary};
pub use output::{table_rows, write_json, write_tsv, TableRow};

/// The direction tallies are shared with the math crate.
pub use hde_entropy::{Direction, DirectionCount};
