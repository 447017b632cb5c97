// hde/src/cli.rs
//! This file defines the command-line interface (CLI) for the hde application,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand, ValueEnum};
use hde_core::{AnalysisConfig, Conditioning, EstimatorConfig, RelationLabelPolicy};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "hde",
    author = "HDE Contributors",
    version = env!("CARGO_PKG_VERSION"),
    about = "Measure word order freedom with head direction entropy",
    long_about = "hde reads Universal Dependencies treebanks in CoNLL-U format and computes, for every language, how predictably a head precedes or follows its dependent. Per-relation binary entropies are folded into one frequency-weighted score: 0 means rigid word order, 1 means fully free.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `hde` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scores every language of a corpus collection and writes the result table.
    #[command(about = "Scores every language of a corpus collection and writes the result table.")]
    Analyze(AnalyzeCommand),

    /// Shows the per-relation breakdown of a single CoNLL-U file.
    #[command(about = "Shows the per-relation breakdown of a single CoNLL-U file.")]
    Inspect(InspectCommand),
}

/// Estimator switches shared by both commands.
#[derive(Args, Debug, Clone, Default)]
pub struct EstimatorArgs {
    /// Only the first N sentences of each language contribute.
    #[arg(long = "max-sentences", value_name = "N", help = "Only count the first N sentences of each language.")]
    pub max_sentences: Option<usize>,

    /// Also report the score over the first N sentences.
    #[arg(long = "capped-sentences", value_name = "N", help = "Also report the score over only the first N sentences of each language.")]
    pub capped_sentences: Option<usize>,

    #[arg(long = "relation-labels", value_name = "POLICY", help = "Keep ('full') or strip ('base') relation subtypes such as ':pass'.")]
    pub relation_labels: Option<LabelChoice>,

    #[arg(long = "conditioning", value_name = "KEY", help = "Group directions by relation, or by dependent POS, head POS and relation.")]
    pub conditioning: Option<ConditioningChoice>,

    /// Ignore dependents tagged PUNCT.
    #[arg(long = "exclude-punct", help = "Ignore dependents whose UPOS is PUNCT.")]
    pub exclude_punct: bool,
}

impl EstimatorArgs {
    /// Only flags the user actually passed become overrides.
    pub fn to_config(&self) -> EstimatorConfig {
        EstimatorConfig {
            relation_labels: self.relation_labels.map(Into::into),
            conditioning: self.conditioning.map(Into::into),
            max_sentences: self.max_sentences,
            capped_sentences: self.capped_sentences,
            exclude_punctuation: self.exclude_punct.then_some(true),
        }
    }
}

/// Arguments for the `analyze` command.
#[derive(Parser, Debug)]
pub struct AnalyzeCommand {
    /// Directory holding `<language>.conllu` files or `<language>/` folders.
    #[arg(value_name = "CORPORA_DIR", help = "Directory of <language>.conllu files or <language>/ folders.")]
    pub corpora_dir: Option<PathBuf>,

    /// Path to a run configuration file (YAML).
    #[arg(long = "config", short = 'c', value_name = "FILE", env = "HDE_CONFIG", help = "Path to a run configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Restrict the run to these languages (comma-separated).
    #[arg(long = "language", short = 'l', value_delimiter = ',', value_name = "LANG", help = "Only analyze these languages (comma-separated).")]
    pub languages: Vec<String>,

    /// Write the result table to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write the result table to a file instead of stdout.")]
    pub output: Option<PathBuf>,

    #[arg(long = "format", value_name = "FORMAT", default_value = "tsv", help = "Output format of the result table.")]
    pub format: OutputFormat,

    /// Analyze one language at a time.
    #[arg(long = "sequential", help = "Analyze languages one at a time instead of in parallel.")]
    pub sequential: bool,

    /// Suppress the summary table on stderr.
    #[arg(long = "no-summary", help = "Do not print the summary table.")]
    pub no_summary: bool,

    #[command(flatten)]
    pub estimator: EstimatorArgs,
}

impl AnalyzeCommand {
    /// The overrides these flags place on top of the config file.
    pub fn to_overrides(&self) -> AnalysisConfig {
        AnalysisConfig {
            corpora_dir: self.corpora_dir.clone(),
            languages: self.languages.clone(),
            estimator: self.estimator.to_config(),
            parallel: self.sequential.then_some(false),
            ..Default::default()
        }
    }
}

/// Arguments for the `inspect` command.
#[derive(Parser, Debug)]
pub struct InspectCommand {
    /// The CoNLL-U file to inspect.
    #[arg(value_name = "FILE", help = "The CoNLL-U file to inspect.")]
    pub file: PathBuf,

    /// Label used in log lines; defaults to the file stem.
    #[arg(long = "language", short = 'l', value_name = "LANG", help = "Language label (defaults to the file name).")]
    pub language: Option<String>,

    /// Hide relations seen fewer than N times.
    #[arg(long = "min-count", value_name = "N", default_value_t = 0, help = "Hide relations seen fewer than N times.")]
    pub min_count: u64,

    #[command(flatten)]
    pub estimator: EstimatorArgs,
}

/// Format of the result table written by `analyze`.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab-separated values, one row per language and relation.
    Tsv,
    /// The full report including failures and run totals.
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LabelChoice {
    /// Strip subtypes: `nsubj:pass` counts as `nsubj`.
    Base,
    /// Keep subtypes as distinct relations.
    Full,
}

impl From<LabelChoice> for RelationLabelPolicy {
    fn from(choice: LabelChoice) -> Self {
        match choice {
            LabelChoice::Base => RelationLabelPolicy::Base,
            LabelChoice::Full => RelationLabelPolicy::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ConditioningChoice {
    /// One distribution per relation label.
    Relation,
    /// One distribution per dependent POS, head POS and relation.
    PosTriple,
}

impl From<ConditioningChoice> for Conditioning {
    fn from(choice: ConditioningChoice) -> Self {
        match choice {
            ConditioningChoice::Relation => Conditioning::Relation,
            ConditioningChoice::PosTriple => Conditioning::PosTriple,
        }
    }
}
