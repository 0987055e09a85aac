//! Command Line Interface (CLI) layer for cubediff.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that loads two ENVI cubes,
//! differences them and writes or prints the resulting histogram.
//!
//! If you are embedding cubediff into another application, prefer using
//! the high-level `cubediff::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
