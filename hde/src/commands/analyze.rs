//! `hde analyze`: score every requested language and write the result table.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};

use hde_core::{merge_overrides, run_config, write_json, write_tsv, AnalysisConfig, BatchReport};

use crate::cli::{AnalyzeCommand, OutputFormat};
use crate::commands::{info_msg, warn_msg};
use crate::ui::summary;
use crate::ui::theme::ThemeMap;

/// Loads the config file (if any) and layers the command-line flags on top.
pub fn resolve_config(cmd: &AnalyzeCommand) -> Result<AnalysisConfig> {
    let base = match &cmd.config {
        Some(path) => AnalysisConfig::load_from_file(path)?,
        None => AnalysisConfig::default(),
    };
    let config = merge_overrides(base, Some(cmd.to_overrides()));
    config.validate()?;

    if config.corpora_dir.is_none() && config.corpora.is_empty() {
        bail!("No corpora to analyze: pass CORPORA_DIR or set `corpora_dir` / `corpora` in a config file.");
    }
    debug!("Effective analysis config: {:?}", config);
    Ok(config)
}

fn write_report<W: Write>(writer: &mut W, report: &BatchReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Tsv => write_tsv(writer, &report.results),
        OutputFormat::Json => write_json(writer, report),
    }
}

pub fn run_analyze(cmd: &AnalyzeCommand, quiet: bool, theme: &ThemeMap) -> Result<()> {
    let config = resolve_config(cmd)?;
    let report = run_config(&config).context("Failed to build the corpus catalog")?;

    match &cmd.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_report(&mut writer, &report, cmd.format)
                .with_context(|| format!("Failed to write results to {}", path.display()))?;
            info!("Results written to {}", path.display());
            if !quiet {
                info_msg(format!("Results written to {}", path.display()), theme);
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_report(&mut handle, &report, cmd.format)?;
        }
    }

    if !quiet {
        if cmd.no_summary {
            for failure in &report.failures {
                warn_msg(format!("skipped {}: {}", failure.language, failure.reason), theme);
            }
        } else {
            let supports_color = io::stderr().is_terminal();
            summary::print_summary(&mut io::stderr(), &report, theme, supports_color)
                .context("Failed to print summary")?;
        }
    }

    if report.results.is_empty() {
        bail!("No language could be analyzed.");
    }
    Ok(())
}
