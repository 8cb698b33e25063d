//! # CLI Behavior
//!
//! One possible UI client for the library. The CLI is the only place that
//! knows about terminal I/O, exit codes, and output formatting.
//!
//! ## Naked Execution
//!
//! Running `nextcloud-cli` without a command prints the grouped help and
//! exits successfully. No connection settings are needed for that.
//!
//! ## Upload Strategies
//!
//! `upload` is best-effort: a file that cannot be read or uploaded is
//! reported and the next file is tried. `upload --fail-fast` and
//! `upload-dir` stop at the first error and exit non-zero.
//!
//! ## Module Structure
//!
//! - `commands`: context wiring and per-command handlers
//! - `render`: output formatting (colors, share listings, JSON)
//! - `setup`: argument parsing via clap, help text

mod commands;
mod render;
pub mod setup;

pub use commands::run;
