// hde-core/src/conllu.rs
//! Streaming CoNLL-U reader.
//!
//! Turns a treebank file into a lazy sequence of [`CorpusEvent`]s: one
//! [`Token`] per syntactic word plus a boundary marker after every sentence.
//! Only the columns the direction statistics need are kept (`ID`, `UPOS`,
//! `HEAD`, `DEPREL`); everything else on the line is ignored.
//!
//! License: MIT OR Apache-2.0

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{CorpusFormatError, FormatIssue, HdeError};

/// Number of tab-separated columns on every CoNLL-U word line.
pub const CONLLU_COLUMNS: usize = 10;

const COL_ID: usize = 0;
const COL_UPOS: usize = 3;
const COL_HEAD: usize = 6;
const COL_DEPREL: usize = 7;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// How dependency relation subtypes (`nsubj:pass`, `obl:tmod`, ...) are treated.
///
/// The policy is applied by the reader, so every corpus in a run sees the
/// same relation granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationLabelPolicy {
    /// Keep only the universal label before the first `:`.
    #[default]
    Base,
    /// Keep the label exactly as annotated, subtypes stay distinct.
    Full,
}

impl RelationLabelPolicy {
    pub fn apply<'a>(&self, deprel: &'a str) -> &'a str {
        match self {
            RelationLabelPolicy::Base => deprel.split_once(':').map_or(deprel, |(base, _)| base),
            RelationLabelPolicy::Full => deprel,
        }
    }
}

/// One syntactic word of a sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// 1-based position within the sentence.
    pub index: u32,
    /// Position of the head, `0` for the root.
    pub head_index: u32,
    pub relation_label: String,
    /// Universal part-of-speech tag (`_` when unannotated).
    pub upos: String,
    /// Line of the corpus file this token was read from.
    pub line: u64,
}

impl Token {
    pub fn is_root(&self) -> bool {
        self.head_index == 0
    }
}

/// Item produced by [`CorpusReader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusEvent {
    Token(Token),
    /// Indices restart after this marker.
    SentenceBoundary,
}

/// Lazy, line-oriented reader over one CoNLL-U source.
///
/// Format errors are yielded as `Err(HdeError::CorpusFormat(..))` and do not
/// end the iteration; an I/O failure is yielded once and ends it.
pub struct CorpusReader<R> {
    source_id: String,
    reader: R,
    policy: RelationLabelPolicy,
    line_number: u64,
    buffer: String,
    in_sentence: bool,
    finished: bool,
}

impl CorpusReader<BufReader<File>> {
    /// Opens a corpus file. Calling this again on the same path restarts the
    /// sequence from the first line.
    pub fn open<P: AsRef<Path>>(path: P, policy: RelationLabelPolicy) -> Result<Self, HdeError> {
        let path = path.as_ref();
        let source_id = path.display().to_string();
        debug!("Opening corpus file {}", source_id);
        let file = File::open(path).map_err(|e| HdeError::io(source_id.clone(), e))?;
        Ok(Self::new(source_id, BufReader::new(file), policy))
    }
}

impl<R: BufRead> CorpusReader<R> {
    pub fn new(source_id: impl Into<String>, reader: R, policy: RelationLabelPolicy) -> Self {
        Self {
            source_id: source_id.into(),
            reader,
            policy,
            line_number: 0,
            buffer: String::new(),
            in_sentence: false,
            finished: false,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }
}

impl<R: BufRead> Iterator for CorpusReader<R> {
    type Item = Result<CorpusEvent, HdeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => {
                    self.finished = true;
                    // Close a final sentence that has no trailing blank line.
                    if self.in_sentence {
                        self.in_sentence = false;
                        return Some(Ok(CorpusEvent::SentenceBoundary));
                    }
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(HdeError::io(self.source_id.clone(), e)));
                }
            }
            self.line_number += 1;

            let mut line = self.buffer.trim_end_matches(|c| c == '\n' || c == '\r');
            if self.line_number == 1 {
                line = line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line);
            }
            if line.trim().is_empty() {
                if self.in_sentence {
                    self.in_sentence = false;
                    return Some(Ok(CorpusEvent::SentenceBoundary));
                }
                continue;
            }

            self.in_sentence = true;
            if line.starts_with('#') {
                continue;
            }

            match parse_token_line(line, self.line_number, &self.source_id, self.policy) {
                Ok(Some(token)) => return Some(Ok(CorpusEvent::Token(token))),
                Ok(None) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

fn is_digits(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

/// Plain decimal digits only; `+1` is not an index.
fn parse_digits(field: &str) -> Option<u32> {
    if is_digits(field) {
        field.parse().ok()
    } else {
        None
    }
}

/// `3-4` and `5.1`, digits on both sides of the separator.
fn is_range_or_empty_node(id: &str) -> bool {
    match id.split_once('-').or_else(|| id.split_once('.')) {
        Some((start, end)) => is_digits(start) && is_digits(end),
        None => false,
    }
}

/// Parses one non-comment, non-blank CoNLL-U line.
///
/// Returns `Ok(None)` for multi-word token ranges (`3-4`) and empty nodes
/// (`5.1`), which never take part in direction counting.
pub fn parse_token_line(
    line: &str,
    line_number: u64,
    source_id: &str,
    policy: RelationLabelPolicy,
) -> Result<Option<Token>, CorpusFormatError> {
    let fail = |issue| CorpusFormatError::new(source_id, line_number, issue);

    let mut columns = [""; CONLLU_COLUMNS];
    let mut found = 0;
    for (i, column) in line.split('\t').enumerate() {
        if i < CONLLU_COLUMNS {
            columns[i] = column;
        }
        found += 1;
    }
    if found != CONLLU_COLUMNS {
        return Err(fail(FormatIssue::ColumnCount { expected: CONLLU_COLUMNS, found }));
    }

    let id = columns[COL_ID].trim();
    if is_range_or_empty_node(id) {
        return Ok(None);
    }

    let index = parse_digits(id)
        .filter(|&index| index >= 1)
        .ok_or_else(|| fail(FormatIssue::InvalidIndex(id.to_string())))?;

    let head = columns[COL_HEAD].trim();
    let head_index = parse_digits(head).ok_or_else(|| fail(FormatIssue::InvalidHead(head.to_string())))?;

    if head_index == index {
        return Err(fail(FormatIssue::SelfLoop(index)));
    }

    let relation_label = policy.apply(columns[COL_DEPREL].trim());
    if relation_label.is_empty() || relation_label == "_" {
        return Err(fail(FormatIssue::EmptyRelation));
    }

    Ok(Some(Token {
        index,
        head_index,
        relation_label: relation_label.to_string(),
        upos: columns[COL_UPOS].trim().to_string(),
        line: line_number,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn row(id: &str, upos: &str, head: &str, deprel: &str) -> String {
        format!("{id}\tform\tlemma\t{upos}\t_\t_\t{head}\t{deprel}\t_\t_")
    }

    fn read_all(text: &str, policy: RelationLabelPolicy) -> Vec<Result<CorpusEvent, HdeError>> {
        CorpusReader::new("mem", Cursor::new(text.to_string()), policy).collect()
    }

    fn tokens(events: &[Result<CorpusEvent, HdeError>]) -> Vec<(u32, u32, String)> {
        events
            .iter()
            .filter_map(|e| match e {
                Ok(CorpusEvent::Token(t)) => Some((t.index, t.head_index, t.relation_label.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_parse_basic_line() {
        let token = parse_token_line(&row("2", "VERB", "0", "root"), 7, "f", RelationLabelPolicy::Base)
            .unwrap()
            .unwrap();
        assert_eq!(token.index, 2);
        assert_eq!(token.head_index, 0);
        assert_eq!(token.relation_label, "root");
        assert_eq!(token.upos, "VERB");
        assert_eq!(token.line, 7);
        assert!(token.is_root());
    }

    #[test]
    fn test_subtype_policy() {
        let line = row("1", "NOUN", "2", "nsubj:pass");
        let base = parse_token_line(&line, 1, "f", RelationLabelPolicy::Base).unwrap().unwrap();
        let full = parse_token_line(&line, 1, "f", RelationLabelPolicy::Full).unwrap().unwrap();
        assert_eq!(base.relation_label, "nsubj");
        assert_eq!(full.relation_label, "nsubj:pass");
    }

    #[test]
    fn test_ranges_and_empty_nodes_are_skipped() {
        let policy = RelationLabelPolicy::Base;
        assert_eq!(parse_token_line(&row("3-4", "_", "_", "_"), 1, "f", policy), Ok(None));
        assert_eq!(parse_token_line(&row("5.1", "NOUN", "_", "_"), 1, "f", policy), Ok(None));
    }

    #[test]
    fn test_malformed_lines() {
        let policy = RelationLabelPolicy::Base;

        let err = parse_token_line("1\tonly\tthree", 4, "corpus.conllu", policy).unwrap_err();
        assert_eq!(err.issue, FormatIssue::ColumnCount { expected: 10, found: 3 });
        assert_eq!(err.line, 4);
        assert_eq!(err.source_id, "corpus.conllu");

        let err = parse_token_line(&row("x", "NOUN", "1", "obj"), 1, "f", policy).unwrap_err();
        assert_eq!(err.issue, FormatIssue::InvalidIndex("x".into()));

        let err = parse_token_line(&row("0", "NOUN", "1", "obj"), 1, "f", policy).unwrap_err();
        assert_eq!(err.issue, FormatIssue::InvalidIndex("0".into()));

        let err = parse_token_line(&row("2", "NOUN", "one", "obj"), 1, "f", policy).unwrap_err();
        assert_eq!(err.issue, FormatIssue::InvalidHead("one".into()));

        let err = parse_token_line(&row("2", "NOUN", "2", "obj"), 1, "f", policy).unwrap_err();
        assert_eq!(err.issue, FormatIssue::SelfLoop(2));

        let err = parse_token_line(&row("2", "NOUN", "1", "_"), 1, "f", policy).unwrap_err();
        assert_eq!(err.issue, FormatIssue::EmptyRelation);
    }

    #[test]
    fn test_signed_and_half_ranges_are_invalid() {
        let policy = RelationLabelPolicy::Base;

        let err = parse_token_line(&row("+1", "NOUN", "2", "nsubj"), 1, "f", policy).unwrap_err();
        assert_eq!(err.issue, FormatIssue::InvalidIndex("+1".into()));

        let err = parse_token_line(&row("1", "NOUN", "+2", "nsubj"), 1, "f", policy).unwrap_err();
        assert_eq!(err.issue, FormatIssue::InvalidHead("+2".into()));

        for id in ["-1", "1-", "-", "3-x", ".5", "5."] {
            let err = parse_token_line(&row(id, "NOUN", "2", "nsubj"), 1, "f", policy).unwrap_err();
            assert_eq!(err.issue, FormatIssue::InvalidIndex(id.into()), "id {id}");
        }
    }

    #[test]
    fn test_reader_strips_leading_byte_order_mark() {
        let text = format!(
            "\u{FEFF}# sent_id = 1\n{}\n{}\n\n",
            row("1", "NOUN", "2", "nsubj"),
            row("2", "VERB", "0", "root")
        );
        let events = read_all(&text, RelationLabelPolicy::Base);
        assert!(events.iter().all(|e| e.is_ok()), "{:?}", events);
        assert_eq!(tokens(&events), vec![(1, 2, "nsubj".into()), (2, 0, "root".into())]);

        // Only a mark at the very start of the file is dropped.
        let text = format!("{}\n\u{FEFF}{}\n", row("1", "VERB", "0", "root"), row("2", "NOUN", "1", "obj"));
        let events = read_all(&text, RelationLabelPolicy::Base);
        assert!(matches!(&events[1], Err(HdeError::CorpusFormat(e)) if e.line == 2));
    }

    #[test]
    fn test_reader_emits_boundaries_and_skips_comments() {
        let text = [
            "# sent_id = 1".to_string(),
            "# text = A b".to_string(),
            row("1", "DET", "2", "det"),
            row("2", "NOUN", "0", "root"),
            String::new(),
            String::new(),
            "# sent_id = 2".to_string(),
            row("1", "VERB", "0", "root"),
        ]
        .join("\n");

        let events = read_all(&text, RelationLabelPolicy::Base);
        let boundaries = events
            .iter()
            .filter(|e| matches!(e, Ok(CorpusEvent::SentenceBoundary)))
            .count();
        assert_eq!(boundaries, 2, "duplicate blank lines collapse, EOF closes the last sentence");
        assert_eq!(
            tokens(&events),
            vec![(1, 2, "det".into()), (2, 0, "root".into()), (1, 0, "root".into())]
        );
        assert!(matches!(events.last(), Some(Ok(CorpusEvent::SentenceBoundary))));
    }

    #[test]
    fn test_reader_handles_crlf() {
        let text = format!("{}\r\n{}\r\n\r\n", row("1", "NOUN", "2", "nsubj"), row("2", "VERB", "0", "root"));
        let events = read_all(&text, RelationLabelPolicy::Base);
        assert_eq!(tokens(&events), vec![(1, 2, "nsubj".into()), (2, 0, "root".into())]);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_reader_continues_after_format_error() {
        let text = [
            row("1", "NOUN", "two", "nsubj"),
            row("2", "VERB", "0", "root"),
            String::new(),
            row("1", "VERB", "0", "root"),
        ]
        .join("\n");

        let events = read_all(&text, RelationLabelPolicy::Base);
        match &events[0] {
            Err(HdeError::CorpusFormat(e)) => assert_eq!(e.line, 1),
            other => panic!("expected a format error, got {:?}", other),
        }
        assert_eq!(tokens(&events), vec![(2, 0, "root".into()), (1, 0, "root".into())]);
    }

    #[test]
    fn test_reader_is_restartable() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("xx.conllu");
        std::fs::write(
            &path,
            [row("1", "NOUN", "2", "nsubj"), row("2", "VERB", "0", "root"), String::new()].join("\n"),
        )?;

        let first: Vec<_> = CorpusReader::open(&path, RelationLabelPolicy::Base)?
            .collect::<Result<_, _>>()?;
        let second: Vec<_> = CorpusReader::open(&path, RelationLabelPolicy::Base)?
            .collect::<Result<_, _>>()?;
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        Ok(())
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let result = CorpusReader::open("/definitely/not/here.conllu", RelationLabelPolicy::Base);
        assert!(matches!(result, Err(HdeError::Io { .. })));
    }
}
