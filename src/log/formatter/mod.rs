mod core;
mod pattern_formatter;

pub use core::LogFormatter;
pub use pattern_formatter::{PatternFormatter, PatternFormatterConfig};
