//! `hde inspect`: per-relation breakdown of one CoNLL-U file.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;

use hde_core::{analyze_language, CorpusResult};

use crate::cli::InspectCommand;
use crate::ui::summary;
use crate::ui::theme::ThemeMap;

/// Scores the single file named by `cmd`.
pub fn inspect_file(cmd: &InspectCommand) -> Result<CorpusResult> {
    let options = cmd.estimator.to_config().to_options();
    if options.max_sentences == Some(0) || options.capped_sentences == Some(0) {
        bail!("--max-sentences and --capped-sentences must be greater than 0.");
    }

    let language = match &cmd.language {
        Some(language) => language.clone(),
        None => cmd
            .file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "corpus".to_string()),
    };

    let result = analyze_language(&language, std::slice::from_ref(&cmd.file), &options)
        .with_context(|| format!("Failed to analyze {}", cmd.file.display()))?;
    Ok(result)
}

pub fn run_inspect(cmd: &InspectCommand, theme: &ThemeMap) -> Result<()> {
    let result = inspect_file(cmd)?;
    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    let mut handle = stdout.lock();
    summary::print_relation_report(&mut handle, &result, cmd.min_count, theme, supports_color)?;
    handle.flush()?;
    Ok(())
}
