// hde/src/lib.rs
//! # HDE command-line application
//!
//! This crate provides the terminal interface for the `hde-core` analysis
//! library: argument parsing, logging setup, output files and the summary
//! printed on stderr.

pub mod commands;
pub mod cli;
pub mod ui;
pub mod logger;
