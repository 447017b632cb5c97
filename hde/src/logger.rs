// hde/src/logger.rs
//! Logger initialization for the `hde` binary and its tests.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Default filter when neither a flag nor `RUST_LOG` says otherwise.
const DEFAULT_FILTER: &str = "warn";

/// Initializes `env_logger` on stderr.
///
/// `Some(level)` overrides `RUST_LOG`; `None` honours it and falls back to
/// warnings. Safe to call more than once: later calls are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.target(Target::Stderr).format_timestamp(None);
    let _ = builder.try_init();
}

/// Maps the `--quiet` / `--debug` flags to a level override.
pub fn level_from_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins_over_debug() {
        assert_eq!(level_from_flags(true, true), Some(LevelFilter::Off));
        assert_eq!(level_from_flags(false, true), Some(LevelFilter::Debug));
        assert_eq!(level_from_flags(false, false), None);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logger(Some(LevelFilter::Debug));
        init_logger(None);
    }
}
