// hde-core/src/corpus.rs
//! Locating corpus files per language.
//!
//! The acquisition step leaves either one `<language>.conllu` file or a
//! `<language>/` directory of split files (train/dev/test) under a corpora
//! directory. Every file listed for a language is read as part of one logical
//! stream, in path order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::config::AnalysisConfig;
use crate::errors::HdeError;

pub const CONLLU_EXTENSION: &str = "conllu";

fn is_conllu(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == CONLLU_EXTENSION)
}

/// Language identifier -> ordered list of corpus files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusCatalog {
    languages: BTreeMap<String, Vec<PathBuf>>,
}

impl CorpusCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `dir` for `<language>.conllu` files and `<language>/` directories.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self, HdeError> {
        let dir = dir.as_ref();
        let mut catalog = Self::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_error(dir, e))?;
            let path = entry.path();

            if entry.file_type().is_dir() {
                let Some(language) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let files = collect_conllu_files(path)?;
                if files.is_empty() {
                    debug!("Ignoring {}: no .conllu files inside", path.display());
                    continue;
                }
                for file in files {
                    catalog.add(language, file);
                }
            } else if is_conllu(path) {
                if let Some(language) = path.file_stem().and_then(|s| s.to_str()) {
                    catalog.add(language, path.to_path_buf());
                }
            }
        }

        debug!("Discovered {} languages under {}", catalog.len(), dir.display());
        Ok(catalog)
    }

    /// Builds the catalog a config describes: the directory scan (if any) plus
    /// the explicit `corpora` entries.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, HdeError> {
        let mut catalog = match &config.corpora_dir {
            Some(dir) => Self::discover(dir)?,
            None => Self::new(),
        };
        for (language, files) in &config.corpora {
            for file in files {
                catalog.add(language, file.clone());
            }
        }
        Ok(catalog)
    }

    /// Appends `path` to `language`, skipping exact duplicates.
    pub fn add(&mut self, language: &str, path: PathBuf) {
        let files = self.languages.entry(language.to_string()).or_default();
        if !files.contains(&path) {
            files.push(path);
        }
    }

    pub fn files(&self, language: &str) -> Option<&[PathBuf]> {
        self.languages.get(language).map(Vec::as_slice)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Pairs each requested language with its files, or a `MissingCorpus`
    /// error for that language alone. An empty request selects every language.
    pub fn resolve(&self, requested: &[String]) -> Vec<(String, Result<Vec<PathBuf>, HdeError>)> {
        if requested.is_empty() {
            return self
                .languages
                .iter()
                .map(|(language, files)| (language.clone(), Ok(files.clone())))
                .collect();
        }

        requested
            .iter()
            .map(|language| {
                let files = match self.files(language) {
                    Some(files) if !files.is_empty() => Ok(files.to_vec()),
                    _ => {
                        warn!("No corpus found for language '{}'", language);
                        Err(HdeError::MissingCorpus(language.clone()))
                    }
                };
                (language.clone(), files)
            })
            .collect()
    }
}

fn collect_conllu_files(dir: &Path) -> Result<Vec<PathBuf>, HdeError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        if entry.file_type().is_file() && is_conllu(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn walk_error(dir: &Path, error: walkdir::Error) -> HdeError {
    let source_id = dir.display().to_string();
    match error.into_io_error() {
        Some(io) => HdeError::io(source_id, io),
        None => HdeError::io(source_id, std::io::Error::other("filesystem loop detected")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_files_and_directories() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        fs::write(root.path().join("french.conllu"), "")?;
        fs::write(root.path().join("notes.txt"), "")?;
        let german = root.path().join("german");
        fs::create_dir_all(german.join("extra"))?;
        fs::write(german.join("de-ud-train.conllu"), "")?;
        fs::write(german.join("de-ud-dev.conllu"), "")?;
        fs::write(german.join("extra").join("de-ud-test.conllu"), "")?;
        fs::create_dir(root.path().join("empty"))?;

        let catalog = CorpusCatalog::discover(root.path())?;
        assert_eq!(catalog.languages().collect::<Vec<_>>(), vec!["french", "german"]);
        assert_eq!(catalog.files("french").unwrap(), &[root.path().join("french.conllu")]);

        let german_files: Vec<_> = catalog
            .files("german")
            .unwrap()
            .iter()
            .map(|p| p.strip_prefix(&german).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            german_files,
            vec![
                PathBuf::from("de-ud-dev.conllu"),
                PathBuf::from("de-ud-train.conllu"),
                PathBuf::from("extra/de-ud-test.conllu"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_discover_missing_dir_is_io_error() {
        let result = CorpusCatalog::discover("/no/such/corpora/dir");
        assert!(matches!(result, Err(HdeError::Io { .. })));
    }

    #[test]
    fn test_resolve_reports_missing_language_individually() {
        let mut catalog = CorpusCatalog::new();
        catalog.add("en", PathBuf::from("en.conllu"));
        catalog.add("en", PathBuf::from("en.conllu"));

        let resolved = catalog.resolve(&["en".to_string(), "xx".to_string()]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].1.as_ref().unwrap(), &vec![PathBuf::from("en.conllu")]);
        assert!(matches!(&resolved[1].1, Err(HdeError::MissingCorpus(lang)) if lang == "xx"));
    }

    #[test]
    fn test_resolve_all_when_nothing_requested() {
        let mut catalog = CorpusCatalog::new();
        catalog.add("b", PathBuf::from("b.conllu"));
        catalog.add("a", PathBuf::from("a.conllu"));
        let languages: Vec<_> = catalog.resolve(&[]).into_iter().map(|(l, _)| l).collect();
        assert_eq!(languages, vec!["a", "b"]);
    }

    #[test]
    fn test_from_config_merges_explicit_corpora() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        fs::write(root.path().join("en.conllu"), "")?;
        let config = AnalysisConfig {
            corpora_dir: Some(root.path().to_path_buf()),
            corpora: BTreeMap::from([
                ("en".to_string(), vec![PathBuf::from("/elsewhere/en-extra.conllu")]),
                ("cy".to_string(), vec![PathBuf::from("/elsewhere/cy.conllu")]),
            ]),
            ..Default::default()
        };
        let catalog = CorpusCatalog::from_config(&config)?;
        assert_eq!(catalog.files("en").unwrap().len(), 2);
        assert_eq!(catalog.files("cy").unwrap(), &[PathBuf::from("/elsewhere/cy.conllu")]);
        Ok(())
    }
}
