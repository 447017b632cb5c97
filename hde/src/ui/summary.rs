//! The per-language summary printed to stderr after an `analyze` run, and
//! the relation table printed by `inspect`.

use std::io::{self, Write};

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use hde_core::{AggregateScore, BatchReport, CorpusResult};

use crate::ui::output_format::styled;
use crate::ui::theme::{ThemeEntry, ThemeMap};

const SUMMARY_HEADER: [&str; 6] = ["Language", "Score", "Relations", "Tokens", "Sentences", "Skipped"];
const RELATION_HEADER: [&str; 5] = ["Relation", "Head before", "Head after", "Count", "Entropy"];

fn new_table(supports_color: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if supports_color {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }
    table
}

fn header_cells(labels: &[&str]) -> Vec<Cell> {
    labels.iter().map(|label| Cell::new(label).fg(Color::Blue)).collect()
}

fn number(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

/// Four decimals for display; the output table keeps full precision.
pub fn format_score(score: &AggregateScore) -> String {
    match score {
        AggregateScore::Defined(value) => format!("{:.4}", value),
        AggregateScore::Undefined => "undefined".to_string(),
    }
}

fn score_cell(score: &AggregateScore) -> Cell {
    let cell = number(format_score(score));
    if score.is_defined() {
        cell.fg(Color::Green)
    } else {
        cell.fg(Color::DarkGrey)
    }
}

/// Renders one row per analyzed language, with a `Capped` column after the
/// score when any language carries a capped estimate.
pub fn build_summary_table(report: &BatchReport, supports_color: bool) -> Table {
    let with_capped = report.results.iter().any(|r| r.capped_score.is_some());

    let mut table = new_table(supports_color);
    let mut header = header_cells(&SUMMARY_HEADER);
    if with_capped {
        header.insert(2, Cell::new("Capped").fg(Color::Blue));
    }
    table.set_header(header);

    for result in &report.results {
        let mut row = vec![
            Cell::new(&result.language).fg(Color::Magenta),
            score_cell(&result.aggregate_score),
            number(result.relation_count()),
            number(result.stats.tokens_counted),
            number(result.stats.sentences_folded),
            number(result.stats.sentences_skipped),
        ];
        if with_capped {
            let capped = result.capped_score.as_ref().map_or_else(|| Cell::new(""), score_cell);
            row.insert(2, capped);
        }
        table.add_row(row);
    }
    table
}

/// Prints the summary table, skipped languages and run totals.
pub fn print_summary<W: Write>(
    writer: &mut W,
    report: &BatchReport,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    if !report.results.is_empty() {
        writeln!(writer, "{}", build_summary_table(report, supports_color))?;
    }

    for failure in &report.failures {
        writeln!(
            writer,
            "{} {}: {}",
            styled("skipped", ThemeEntry::Warn, theme, supports_color),
            failure.language,
            failure.reason
        )?;
    }

    let summary = &report.summary;
    let totals = format!(
        "{} analyzed, {} skipped, {} undefined; {} sentences folded, {} discarded ({} format errors)",
        summary.languages_analyzed,
        summary.languages_skipped,
        summary.undefined_scores,
        summary.sentences_folded,
        summary.sentences_skipped,
        summary.format_errors
    );
    let entry = if summary.languages_skipped == 0 && summary.format_errors == 0 {
        ThemeEntry::Success
    } else {
        ThemeEntry::Warn
    };
    writeln!(writer, "{}", styled(&totals, entry, theme, supports_color))
}

/// Renders the relations of one result that occur at least `min_count` times.
pub fn build_relation_table(result: &CorpusResult, min_count: u64, supports_color: bool) -> Table {
    let mut table = new_table(supports_color);
    table.set_header(header_cells(&RELATION_HEADER));
    for (label, stats) in result.relations.iter().filter(|(_, s)| s.count >= min_count) {
        table.add_row(vec![
            Cell::new(label),
            number(stats.head_before),
            number(stats.head_after),
            number(stats.count),
            number(format!("{:.4}", stats.entropy)),
        ]);
    }
    table
}

/// Prints the relation table of a single corpus followed by its aggregate.
pub fn print_relation_report<W: Write>(
    writer: &mut W,
    result: &CorpusResult,
    min_count: u64,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    writeln!(writer, "{}", build_relation_table(result, min_count, supports_color))?;
    let score_entry = if result.aggregate_score.is_defined() {
        ThemeEntry::Score
    } else {
        ThemeEntry::Undefined
    };
    writeln!(
        writer,
        "{} {} over {} tokens in {} relations",
        styled("Head direction entropy:", ThemeEntry::Header, theme, supports_color),
        styled(&format_score(&result.aggregate_score), score_entry, theme, supports_color),
        result.stats.tokens_counted,
        result.relation_count()
    )?;
    if let Some(capped) = &result.capped_score {
        writeln!(writer, "Capped estimate: {}", format_score(capped))?;
    }
    if let Some(std_dev) = result.entropy_std_dev {
        writeln!(writer, "Weighted std. dev. of relation entropies: {:.4}", std_dev)?;
    }
    if result.stats.sentences_skipped > 0 {
        writeln!(
            writer,
            "{} {} sentences discarded ({} format errors)",
            styled("note:", ThemeEntry::Warn, theme, supports_color),
            result.stats.sentences_skipped,
            result.stats.format_errors
        )?;
        for sample in &result.error_samples {
            writeln!(writer, "  {}", sample)?;
        }
    }
    Ok(())
}
