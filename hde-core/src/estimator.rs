// hde-core/src/estimator.rs
//! Head direction entropy estimation.
//!
//! An [`EntropyEstimator`] folds the event stream of one or more corpus files
//! belonging to a single language into per-key [`DirectionCount`] tables and
//! turns them into a [`CorpusResult`]. Only the sentence currently being read
//! is buffered; it is needed to check head indices and, for part-of-speech
//! conditioning, to look up the head's tag.
//!
//! A format error anywhere in a sentence discards that whole sentence. The
//! estimator keeps going with the next one and counts what it dropped.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use hde_entropy::statistics::compute_weighted_stats;
use hde_entropy::{Direction, DirectionCount};

use crate::conllu::{CorpusEvent, CorpusReader, RelationLabelPolicy, Token};
use crate::errors::{CorpusFormatError, FormatIssue, HdeError};
use crate::result::{AggregateScore, CorpusResult, FoldStats, RelationStats};

/// How many format errors are kept verbatim in a [`CorpusResult`].
pub const MAX_ERROR_SAMPLES: usize = 10;

const PUNCT_UPOS: &str = "PUNCT";

/// What the direction distribution is conditioned on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conditioning {
    /// The dependency relation label alone.
    #[default]
    Relation,
    /// Dependent UPOS, head UPOS and relation label, keyed as `DEP|HEAD|rel`.
    PosTriple,
}

/// Settings shared by every language of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorOptions {
    pub relation_labels: RelationLabelPolicy,
    pub conditioning: Conditioning,
    /// Stop after this many successfully folded sentences.
    pub max_sentences: Option<usize>,
    /// Also score the first N folded sentences, alongside the full score.
    pub capped_sentences: Option<usize>,
    /// Ignore dependents tagged `PUNCT`.
    pub exclude_punctuation: bool,
}

/// Accumulates direction counts for exactly one language.
#[derive(Debug)]
pub struct EntropyEstimator {
    language: String,
    options: EstimatorOptions,
    counts: BTreeMap<String, DirectionCount>,
    /// Copy of `counts` taken when `capped_sentences` was reached.
    capped_counts: Option<BTreeMap<String, DirectionCount>>,
    sentence: Vec<Token>,
    sentence_error: bool,
    source_id: String,
    stats: FoldStats,
    error_samples: Vec<String>,
}

impl EntropyEstimator {
    pub fn new(language: impl Into<String>, options: EstimatorOptions) -> Self {
        let language = language.into();
        Self {
            source_id: language.clone(),
            language,
            options,
            counts: BTreeMap::new(),
            capped_counts: None,
            sentence: Vec::new(),
            sentence_error: false,
            stats: FoldStats::default(),
            error_samples: Vec::new(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn options(&self) -> &EstimatorOptions {
        &self.options
    }

    pub fn stats(&self) -> &FoldStats {
        &self.stats
    }

    /// Current tallies, keyed by conditioning key.
    pub fn counts(&self) -> &BTreeMap<String, DirectionCount> {
        &self.counts
    }

    /// True once `max_sentences` sentences have been counted.
    pub fn is_saturated(&self) -> bool {
        self.options
            .max_sentences
            .is_some_and(|max| self.stats.sentences_folded >= max as u64)
    }

    /// Opens `path` as CoNLL-U and folds it.
    pub fn fold_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), HdeError> {
        let reader = CorpusReader::open(path, self.options.relation_labels)?;
        self.source_id = reader.source_id().to_string();
        self.stats.files_read += 1;
        self.fold(reader)?;
        debug!(
            "[{}] folded {} ({} sentences so far)",
            self.language, self.source_id, self.stats.sentences_folded
        );
        Ok(())
    }

    /// Folds one event stream into the counts.
    ///
    /// Format errors are absorbed at sentence granularity. Any other error
    /// drops the partial sentence and is returned. A sentence still open when
    /// the stream ends is closed, so sentences never span two folds.
    pub fn fold<I>(&mut self, stream: I) -> Result<(), HdeError>
    where
        I: IntoIterator<Item = Result<CorpusEvent, HdeError>>,
    {
        for event in stream {
            if self.is_saturated() {
                debug!("[{}] sentence cap reached, ignoring the rest of {}", self.language, self.source_id);
                break;
            }
            match event {
                Ok(CorpusEvent::Token(token)) => self.push_token(token),
                Ok(CorpusEvent::SentenceBoundary) => self.end_sentence(),
                Err(HdeError::CorpusFormat(e)) => self.record_error(e),
                Err(e) => {
                    self.sentence.clear();
                    self.sentence_error = false;
                    return Err(e);
                }
            }
        }
        self.end_sentence();
        Ok(())
    }

    fn push_token(&mut self, token: Token) {
        if self.sentence_error {
            return;
        }
        let expected = self.sentence.len() as u32 + 1;
        if token.index != expected {
            let issue = FormatIssue::IndexOutOfSequence { expected, found: token.index };
            self.record_error(CorpusFormatError::new(self.source_id.clone(), token.line, issue));
            return;
        }
        self.sentence.push(token);
    }

    fn record_error(&mut self, error: CorpusFormatError) {
        warn!("[{}] skipping sentence: {}", self.language, error);
        self.stats.format_errors += 1;
        if self.error_samples.len() < MAX_ERROR_SAMPLES {
            self.error_samples.push(error.to_string());
        }
        self.sentence_error = true;
    }

    fn end_sentence(&mut self) {
        let mut tokens = std::mem::take(&mut self.sentence);
        if std::mem::take(&mut self.sentence_error) {
            self.stats.sentences_skipped += 1;
        } else if !tokens.is_empty() && !self.is_saturated() {
            self.commit_sentence(&tokens);
        }
        tokens.clear();
        self.sentence = tokens;
    }

    fn commit_sentence(&mut self, tokens: &[Token]) {
        let sentence_len = tokens.len();

        let invalid = tokens.iter().find_map(|t| {
            if t.head_index == t.index {
                Some((t.line, FormatIssue::SelfLoop(t.index)))
            } else if t.head_index as usize > sentence_len {
                Some((
                    t.line,
                    FormatIssue::HeadOutOfRange { index: t.index, head: t.head_index, sentence_len },
                ))
            } else {
                None
            }
        });
        if let Some((line, issue)) = invalid {
            self.record_error(CorpusFormatError::new(self.source_id.clone(), line, issue));
            self.sentence_error = false;
            self.stats.sentences_skipped += 1;
            return;
        }

        for token in tokens.iter().filter(|t| !t.is_root()) {
            if self.options.exclude_punctuation && token.upos == PUNCT_UPOS {
                continue;
            }
            let Some(direction) = Direction::classify(token.index, token.head_index) else {
                continue;
            };
            let head = &tokens[token.head_index as usize - 1];
            let key = self.key_for(token, head);
            self.counts.entry(key).or_default().record(direction);
            self.stats.tokens_counted += 1;
        }
        self.stats.sentences_folded += 1;

        if self.capped_counts.is_none()
            && self.options.capped_sentences == Some(self.stats.sentences_folded as usize)
        {
            debug!(
                "[{}] capped estimate frozen after {} sentences",
                self.language, self.stats.sentences_folded
            );
            self.capped_counts = Some(self.counts.clone());
        }
    }

    fn key_for(&self, dependent: &Token, head: &Token) -> String {
        match self.options.conditioning {
            Conditioning::Relation => dependent.relation_label.clone(),
            Conditioning::PosTriple => {
                format!("{}|{}|{}", dependent.upos, head.upos, dependent.relation_label)
            }
        }
    }

    /// Computes per-key entropies and the frequency-weighted aggregate.
    ///
    /// With `capped_sentences` set, a corpus shorter than the cap gets a
    /// capped score equal to its full score.
    pub fn finalize(self) -> CorpusResult {
        let relations = relation_table(&self.counts);
        let weighted = compute_weighted_stats(&weight_samples(&relations));

        let capped_score = self.options.capped_sentences.map(|_| match &self.capped_counts {
            Some(counts) => aggregate_of(&relation_table(counts)),
            None => AggregateScore::from(weighted.map(|w| w.mean)),
        });

        CorpusResult {
            language: self.language,
            relations,
            aggregate_score: AggregateScore::from(weighted.map(|w| w.mean)),
            entropy_std_dev: weighted.map(|w| w.std_dev),
            capped_score,
            stats: self.stats,
            error_samples: self.error_samples,
        }
    }
}

fn relation_table(counts: &BTreeMap<String, DirectionCount>) -> BTreeMap<String, RelationStats> {
    counts
        .iter()
        .filter_map(|(key, count)| {
            count.entropy().map(|entropy| {
                (
                    key.clone(),
                    RelationStats {
                        head_before: count.head_before,
                        head_after: count.head_after,
                        count: count.total(),
                        entropy,
                    },
                )
            })
        })
        .collect()
}

fn weight_samples(relations: &BTreeMap<String, RelationStats>) -> Vec<(f64, u64)> {
    relations.values().map(|r| (r.entropy, r.count)).collect()
}

fn aggregate_of(relations: &BTreeMap<String, RelationStats>) -> AggregateScore {
    AggregateScore::from(compute_weighted_stats(&weight_samples(relations)).map(|w| w.mean))
}
