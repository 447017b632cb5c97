// hde-core/src/batch.rs
//! `batch.rs`
//! Runs the estimator over every configured language and collects the
//! results, the per-language failures and a run summary.
//!
//! Languages are independent: each worker owns its own estimator, and the
//! outcomes are only merged when the report is assembled.

use std::path::PathBuf;

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::corpus::CorpusCatalog;
use crate::errors::HdeError;
use crate::estimator::{EntropyEstimator, EstimatorOptions};
use crate::result::CorpusResult;

/// A language that produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageFailure {
    pub language: String,
    pub reason: String,
    /// True when no corpus file was found at all.
    pub missing_corpus: bool,
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub languages_analyzed: usize,
    pub languages_skipped: usize,
    /// Analyzed languages whose aggregate score is undefined.
    pub undefined_scores: usize,
    pub sentences_folded: u64,
    pub sentences_skipped: u64,
    pub format_errors: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Sorted by language.
    pub results: Vec<CorpusResult>,
    /// Sorted by language.
    pub failures: Vec<LanguageFailure>,
    pub summary: RunSummary,
}

/// Folds every file of one language, in order, into a fresh estimator.
pub fn analyze_language(
    language: &str,
    files: &[PathBuf],
    options: &EstimatorOptions,
) -> Result<CorpusResult, HdeError> {
    if files.is_empty() {
        return Err(HdeError::MissingCorpus(language.to_string()));
    }

    let mut estimator = EntropyEstimator::new(language, options.clone());
    for file in files {
        if estimator.is_saturated() {
            break;
        }
        estimator.fold_file(file)?;
    }

    let result = estimator.finalize();
    info!(
        "[{}] aggregate score {} over {} relations ({} sentences, {} skipped)",
        result.language,
        result.aggregate_score,
        result.relation_count(),
        result.stats.sentences_folded,
        result.stats.sentences_skipped
    );
    Ok(result)
}

/// Analyzes `languages` (all catalogued languages when empty).
///
/// A failing language never aborts the batch; it is listed in `failures`.
pub fn run_batch(
    catalog: &CorpusCatalog,
    languages: &[String],
    options: &EstimatorOptions,
    parallel: bool,
) -> BatchReport {
    let jobs = catalog.resolve(languages);
    info!("Analyzing {} languages ({})", jobs.len(), if parallel { "parallel" } else { "sequential" });

    let run_job = |(language, files): (String, Result<Vec<PathBuf>, HdeError>)| {
        let outcome = files.and_then(|files| analyze_language(&language, &files, options));
        (language, outcome)
    };

    let outcomes: Vec<(String, Result<CorpusResult, HdeError>)> = if parallel {
        jobs.into_par_iter().map(run_job).collect()
    } else {
        jobs.into_iter().map(run_job).collect()
    };

    assemble_report(outcomes)
}

/// Builds the catalog from `config` and runs the batch it describes.
pub fn run_config(config: &AnalysisConfig) -> Result<BatchReport, HdeError> {
    let catalog = CorpusCatalog::from_config(config)?;
    Ok(run_batch(
        &catalog,
        &config.languages,
        &config.estimator_options(),
        config.is_parallel(),
    ))
}

fn assemble_report(outcomes: Vec<(String, Result<CorpusResult, HdeError>)>) -> BatchReport {
    let mut report = BatchReport::default();

    for (language, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                let summary = &mut report.summary;
                summary.languages_analyzed += 1;
                summary.sentences_folded += result.stats.sentences_folded;
                summary.sentences_skipped += result.stats.sentences_skipped;
                summary.format_errors += result.stats.format_errors;
                if !result.aggregate_score.is_defined() {
                    warn!("[{}] no countable dependencies, score is undefined", language);
                    summary.undefined_scores += 1;
                }
                report.results.push(result);
            }
            Err(e) => {
                warn!("Skipping language '{}': {}", language, e);
                report.summary.languages_skipped += 1;
                report.failures.push(LanguageFailure {
                    missing_corpus: matches!(e, HdeError::MissingCorpus(_)),
                    reason: e.to_string(),
                    language,
                });
            }
        }
    }

    report.results.sort_by(|a, b| a.language.cmp(&b.language));
    report.failures.sort_by(|a, b| a.language.cmp(&b.language));
    report
}
