// hde-core/src/result.rs
//! Result records produced by the estimator and consumed by the output table.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction statistics for one conditioning key (normally a relation label).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationStats {
    pub head_before: u64,
    pub head_after: u64,
    /// `head_before + head_after`; exposed so low-support relations can be filtered downstream.
    pub count: u64,
    /// Binary entropy of the direction distribution, in bits.
    pub entropy: f64,
}

/// Corpus-level score. A corpus with nothing to count has no score at all,
/// which is not the same thing as a perfectly rigid (0.0) word order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum AggregateScore {
    Defined(f64),
    Undefined,
}

impl AggregateScore {
    pub fn value(&self) -> Option<f64> {
        match self {
            AggregateScore::Defined(v) => Some(*v),
            AggregateScore::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, AggregateScore::Defined(_))
    }
}

impl From<Option<f64>> for AggregateScore {
    fn from(value: Option<f64>) -> Self {
        value.map_or(AggregateScore::Undefined, AggregateScore::Defined)
    }
}

impl fmt::Display for AggregateScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateScore::Defined(v) => write!(f, "{}", v),
            AggregateScore::Undefined => write!(f, "undefined"),
        }
    }
}

/// Bookkeeping collected while folding one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldStats {
    pub files_read: u64,
    pub sentences_folded: u64,
    pub sentences_skipped: u64,
    /// Dependents whose direction was counted.
    pub tokens_counted: u64,
    /// Every recovered format error, including several in one skipped sentence.
    pub format_errors: u64,
}

/// Final, immutable result for one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusResult {
    pub language: String,
    pub relations: BTreeMap<String, RelationStats>,
    pub aggregate_score: AggregateScore,
    /// Frequency-weighted spread of the per-relation entropies.
    pub entropy_std_dev: Option<f64>,
    /// Score over the first `capped_sentences` folded sentences, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capped_score: Option<AggregateScore>,
    pub stats: FoldStats,
    /// The first few format errors, rendered as `file:line: issue`.
    #[serde(default)]
    pub error_samples: Vec<String>,
}

impl CorpusResult {
    pub fn relation(&self, label: &str) -> Option<&RelationStats> {
        self.relations.get(label)
    }

    pub fn relation_entropy(&self, label: &str) -> Option<f64> {
        self.relation(label).map(|r| r.entropy)
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Sum of all per-relation counts.
    pub fn total_count(&self) -> u64 {
        self.relations.values().map(|r| r.count).sum()
    }
}
