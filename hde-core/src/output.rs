// hde-core/src/output.rs
//! Serialization of batch results into the table read by the plotting step.
//!
//! The table has one row per (language, relation) with the columns
//! `language, relation_label, direction_entropy, relation_token_count,
//! aggregate_score`, plus a trailing `capped_score` column when any language
//! carries a capped estimate. Floats are written with Rust's shortest
//! round-trip formatting, so no precision is lost. A language whose score is
//! undefined gets a single row with an empty relation and `NA` in every float
//! column.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::batch::BatchReport;
use crate::result::CorpusResult;

pub const TABLE_COLUMNS: [&str; 5] = [
    "language",
    "relation_label",
    "direction_entropy",
    "relation_token_count",
    "aggregate_score",
];

/// Appended to [`TABLE_COLUMNS`] when a capped estimate was requested.
pub const CAPPED_COLUMN: &str = "capped_score";

/// Written in place of an undefined float.
pub const MISSING_VALUE: &str = "NA";

/// One line of the output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub language: String,
    pub relation_label: String,
    pub direction_entropy: Option<f64>,
    pub relation_token_count: u64,
    pub aggregate_score: Option<f64>,
    pub capped_score: Option<f64>,
}

/// Flattens results into table rows, languages and relations in sorted order.
pub fn table_rows(results: &[CorpusResult]) -> Vec<TableRow> {
    let mut rows = Vec::new();
    for result in results {
        let aggregate_score = result.aggregate_score.value();
        let capped_score = result.capped_score.and_then(|score| score.value());
        if result.relations.is_empty() {
            rows.push(TableRow {
                language: result.language.clone(),
                relation_label: String::new(),
                direction_entropy: None,
                relation_token_count: 0,
                aggregate_score,
                capped_score,
            });
            continue;
        }
        for (label, stats) in &result.relations {
            rows.push(TableRow {
                language: result.language.clone(),
                relation_label: label.clone(),
                direction_entropy: Some(stats.entropy),
                relation_token_count: stats.count,
                aggregate_score,
                capped_score,
            });
        }
    }
    rows
}

fn format_float(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING_VALUE.to_string(), |v| v.to_string())
}

/// Tabs and newlines cannot appear inside a TSV field.
fn sanitize_field(field: &str) -> String {
    field.replace(['\t', '\n', '\r'], " ")
}

/// Writes the table as tab-separated values with a header line.
pub fn write_tsv<W: Write>(writer: &mut W, results: &[CorpusResult]) -> Result<()> {
    let with_capped = results.iter().any(|r| r.capped_score.is_some());

    let mut header = TABLE_COLUMNS.join("\t");
    if with_capped {
        header.push('\t');
        header.push_str(CAPPED_COLUMN);
    }
    writeln!(writer, "{}", header).context("Failed to write table header")?;

    for row in table_rows(results) {
        write!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            sanitize_field(&row.language),
            sanitize_field(&row.relation_label),
            format_float(row.direction_entropy),
            row.relation_token_count,
            format_float(row.aggregate_score),
        )
        .context("Failed to write table row")?;
        if with_capped {
            write!(writer, "\t{}", format_float(row.capped_score)).context("Failed to write table row")?;
        }
        writeln!(writer).context("Failed to write table row")?;
    }
    writer.flush().context("Failed to flush table output")?;
    Ok(())
}

/// Writes the whole report (results, failures, summary) as pretty JSON.
pub fn write_json<W: Write>(writer: &mut W, report: &BatchReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report).context("Failed to serialize report as JSON")?;
    writeln!(writer)?;
    writer.flush().context("Failed to flush JSON output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{AggregateScore, FoldStats, RelationStats};
    use std::collections::BTreeMap;

    fn result(language: &str, relations: &[(&str, u64, u64)]) -> CorpusResult {
        let relations: BTreeMap<String, RelationStats> = relations
            .iter()
            .map(|&(label, before, after)| {
                let count = hde_entropy::DirectionCount::new(before, after);
                (
                    label.to_string(),
                    RelationStats {
                        head_before: before,
                        head_after: after,
                        count: count.total(),
                        entropy: count.entropy().unwrap(),
                    },
                )
            })
            .collect();
        let score = if relations.is_empty() {
            AggregateScore::Undefined
        } else {
            AggregateScore::Defined(0.5)
        };
        CorpusResult {
            language: language.to_string(),
            relations,
            aggregate_score: score,
            entropy_std_dev: None,
            capped_score: None,
            stats: FoldStats::default(),
            error_samples: Vec::new(),
        }
    }

    #[test]
    fn test_tsv_layout() -> Result<()> {
        let results = vec![result("en", &[("obj", 3, 7), ("nsubj", 1, 1)]), result("xx", &[])];
        let mut out = Vec::new();
        write_tsv(&mut out, &results)?;
        let text = String::from_utf8(out)?;
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "language\trelation_label\tdirection_entropy\trelation_token_count\taggregate_score");
        assert_eq!(lines[1], "en\tnsubj\t1\t2\t0.5");
        assert!(lines[2].starts_with("en\tobj\t0.88129089923"));
        assert!(lines[2].ends_with("\t10\t0.5"));
        assert_eq!(lines[3], "xx\t\tNA\t0\tNA");
        assert_eq!(lines.len(), 4);
        Ok(())
    }

    #[test]
    fn test_tsv_capped_column() -> Result<()> {
        let mut en = result("en", &[("nsubj", 1, 1)]);
        en.capped_score = Some(AggregateScore::Defined(0.0));
        let mut xx = result("xx", &[]);
        xx.capped_score = Some(AggregateScore::Undefined);
        let mut out = Vec::new();
        write_tsv(&mut out, &[en, xx])?;
        let text = String::from_utf8(out)?;
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].ends_with("\taggregate_score\tcapped_score"));
        assert_eq!(lines[1], "en\tnsubj\t1\t2\t0.5\t0");
        assert_eq!(lines[2], "xx\t\tNA\t0\tNA\tNA");
        Ok(())
    }

    #[test]
    fn test_tsv_keeps_full_precision() -> Result<()> {
        let results = vec![result("en", &[("obj", 3, 7)])];
        let mut out = Vec::new();
        write_tsv(&mut out, &results)?;
        let text = String::from_utf8(out)?;
        let entropy: f64 = text.lines().nth(1).unwrap().split('\t').nth(2).unwrap().parse()?;
        assert_eq!(entropy, results[0].relations["obj"].entropy);
        Ok(())
    }

    #[test]
    fn test_json_report() -> Result<()> {
        let report = BatchReport {
            results: vec![result("en", &[("obj", 3, 7)])],
            ..Default::default()
        };
        let mut out = Vec::new();
        write_json(&mut out, &report)?;
        let value: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(value["results"][0]["language"], "en");
        assert_eq!(value["results"][0]["relations"]["obj"]["count"], 10);
        assert_eq!(value["results"][0]["aggregate_score"]["state"], "defined");
        assert_eq!(value["summary"]["languages_skipped"], 0);
        assert!(value["results"][0].get("capped_score").is_none());
        Ok(())
    }
}
