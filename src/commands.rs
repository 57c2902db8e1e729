//! Subcommands of the `jp` binary that do not evaluate a path.
pub mod generate;
