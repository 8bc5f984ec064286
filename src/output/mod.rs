//! Result rendering for the command-line front end

pub mod formatter;

pub use formatter::{formatter_for, save_to_file, ConsoleFormatter, JsonFormatter, OutputFormatter};
