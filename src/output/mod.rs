//! Output module
//! Renders normalized records and overlap summaries

pub mod formatter;

pub use formatter::{formatter_for, OutputFormatter};
