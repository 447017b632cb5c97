// hde/src/ui/mod.rs
//! Terminal presentation: colors, status messages and the run summary.

pub mod output_format;
pub mod summary;
pub mod theme;
