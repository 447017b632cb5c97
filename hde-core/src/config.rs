//! Configuration management for `hde-core`.
//!
//! This module defines the run configuration: where corpora live, which
//! languages to analyze and how the estimator treats relation labels. It
//! handles YAML deserialization and provides utilities for loading, merging
//! and validating these configs.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::conllu::RelationLabelPolicy;
use crate::errors::HdeError;
use crate::estimator::{Conditioning, EstimatorOptions};

/// Estimator settings as written in a config file. Unset fields fall back to
/// [`EstimatorOptions::default`].
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EstimatorConfig {
    /// `base` (default) strips relation subtypes, `full` keeps them.
    pub relation_labels: Option<RelationLabelPolicy>,
    /// `relation` (default) or `pos_triple`.
    pub conditioning: Option<Conditioning>,
    /// Only the first N sentences of each language contribute.
    pub max_sentences: Option<usize>,
    /// Also report the score over only the first N sentences of each language.
    pub capped_sentences: Option<usize>,
    /// Skip dependents tagged `PUNCT`.
    pub exclude_punctuation: Option<bool>,
}

impl EstimatorConfig {
    pub fn to_options(&self) -> EstimatorOptions {
        EstimatorOptions {
            relation_labels: self.relation_labels.unwrap_or_default(),
            conditioning: self.conditioning.unwrap_or_default(),
            max_sentences: self.max_sentences,
            capped_sentences: self.capped_sentences,
            exclude_punctuation: self.exclude_punctuation.unwrap_or(false),
        }
    }
}

/// Represents the top-level configuration structure for a run.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory scanned for `<language>.conllu` files and `<language>/` folders.
    pub corpora_dir: Option<PathBuf>,
    /// Languages to analyze. Empty means every language that was found.
    pub languages: Vec<String>,
    /// Explicit language -> corpus files mapping, added to whatever the directory scan finds.
    pub corpora: BTreeMap<String, Vec<PathBuf>>,
    pub estimator: EstimatorConfig,
    /// Analyze languages on a worker pool (default: true).
    pub parallel: Option<bool>,
}

impl AnalysisConfig {
    /// Loads a run configuration from a YAML file.
    ///
    /// Relative paths inside the file are resolved against the file's directory.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading analysis config from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AnalysisConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;
        debug!(
            "Config {} lists {} languages and {} explicit corpora.",
            path.display(),
            config.languages.len(),
            config.corpora.len()
        );

        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &Path| if p.is_relative() { base.join(p) } else { p.to_path_buf() };
        if let Some(dir) = self.corpora_dir.as_deref() {
            self.corpora_dir = Some(resolve(dir));
        }
        for files in self.corpora.values_mut() {
            for file in files.iter_mut() {
                *file = resolve(file.as_path());
            }
        }
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }

    pub fn estimator_options(&self) -> EstimatorOptions {
        self.estimator.to_options()
    }

    /// Checks settings that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.estimator.max_sentences == Some(0) {
            errors.push("`estimator.max_sentences` must be greater than 0.".to_string());
        }
        if self.estimator.capped_sentences == Some(0) {
            errors.push("`estimator.capped_sentences` must be greater than 0.".to_string());
        }

        let mut seen = HashSet::new();
        for language in &self.languages {
            if language.trim().is_empty() {
                errors.push("`languages` contains an empty language name.".to_string());
            } else if !seen.insert(language.as_str()) {
                errors.push(format!("Duplicate language found: '{}'.", language));
            }
        }

        for (language, files) in &self.corpora {
            if language.trim().is_empty() {
                errors.push("`corpora` contains an empty language name.".to_string());
            }
            if files.is_empty() {
                errors.push(format!("`corpora.{}` lists no files.", language));
            }
        }

        if !errors.is_empty() {
            Err(HdeError::InvalidConfig(errors.join("\n")).into())
        } else {
            Ok(())
        }
    }
}

/// Layers `overrides` (typically built from CLI flags) on top of `base`.
///
/// Only values the override actually sets replace the base; explicit corpora
/// mappings are combined per language.
pub fn merge_overrides(base: AnalysisConfig, overrides: Option<AnalysisConfig>) -> AnalysisConfig {
    let Some(user) = overrides else {
        return base;
    };
    let mut merged = base;

    if let Some(dir) = user.corpora_dir {
        debug!("Overriding corpora_dir with: {}", dir.display());
        merged.corpora_dir = Some(dir);
    }
    if !user.languages.is_empty() {
        debug!("Overriding language list with {} entries", user.languages.len());
        merged.languages = user.languages;
    }
    for (language, files) in user.corpora {
        merged.corpora.entry(language).or_default().extend(files);
    }

    if let Some(policy) = user.estimator.relation_labels {
        merged.estimator.relation_labels = Some(policy);
    }
    if let Some(conditioning) = user.estimator.conditioning {
        merged.estimator.conditioning = Some(conditioning);
    }
    if let Some(max) = user.estimator.max_sentences {
        debug!("Overriding max_sentences with user value: {}", max);
        merged.estimator.max_sentences = Some(max);
    }
    if let Some(capped) = user.estimator.capped_sentences {
        merged.estimator.capped_sentences = Some(capped);
    }
    if let Some(exclude) = user.estimator.exclude_punctuation {
        merged.estimator.exclude_punctuation = Some(exclude);
    }
    if let Some(parallel) = user.parallel {
        merged.parallel = Some(parallel);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert!(config.is_parallel());
        assert_eq!(config.estimator_options(), EstimatorOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_cap_and_duplicates() {
        let config = AnalysisConfig {
            languages: vec!["en".into(), "en".into(), " ".into()],
            estimator: EstimatorConfig {
                max_sentences: Some(0),
                capped_sentences: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err.downcast_ref::<HdeError>(), Some(HdeError::InvalidConfig(_))));
        let message = err.to_string();
        assert!(message.starts_with("Invalid configuration: "));
        assert!(message.contains("max_sentences"));
        assert!(message.contains("capped_sentences"));
        assert!(message.contains("Duplicate language found: 'en'"));
        assert!(message.contains("empty language name"));
    }

    #[test]
    fn test_merge_keeps_base_when_override_unset() {
        let base = AnalysisConfig {
            languages: vec!["fr".into()],
            estimator: EstimatorConfig { max_sentences: Some(1000), ..Default::default() },
            parallel: Some(false),
            ..Default::default()
        };
        let merged = merge_overrides(base.clone(), Some(AnalysisConfig::default()));
        assert_eq!(merged, base);
        assert_eq!(merge_overrides(base.clone(), None), base);
    }

    #[test]
    fn test_merge_override_wins() {
        let base = AnalysisConfig {
            languages: vec!["fr".into()],
            corpora: BTreeMap::from([("fr".to_string(), vec![PathBuf::from("a.conllu")])]),
            estimator: EstimatorConfig {
                relation_labels: Some(RelationLabelPolicy::Base),
                max_sentences: Some(1000),
                ..Default::default()
            },
            ..Default::default()
        };
        let user = AnalysisConfig {
            languages: vec!["de".into(), "fr".into()],
            corpora: BTreeMap::from([("fr".to_string(), vec![PathBuf::from("b.conllu")])]),
            estimator: EstimatorConfig {
                relation_labels: Some(RelationLabelPolicy::Full),
                exclude_punctuation: Some(true),
                ..Default::default()
            },
            parallel: Some(false),
            ..Default::default()
        };
        let merged = merge_overrides(base, Some(user));
        assert_eq!(merged.languages, vec!["de".to_string(), "fr".to_string()]);
        assert_eq!(merged.corpora["fr"], vec![PathBuf::from("a.conllu"), PathBuf::from("b.conllu")]);
        let options = merged.estimator_options();
        assert_eq!(options.relation_labels, RelationLabelPolicy::Full);
        assert_eq!(options.max_sentences, Some(1000));
        assert!(options.exclude_punctuation);
        assert!(!merged.is_parallel());
    }
}
