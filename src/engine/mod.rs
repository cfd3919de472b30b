//! Engine: digest functions, CLI parsing and handling, output.

pub mod arg_parser;
pub mod cli;
pub mod hashing;
pub mod output;

pub use arg_parser::{Cli, OutputFormat};
pub use cli::handle_run;
pub use hashing::{FileDigest, HashAlgorithm, digest_file, digest_reader};
pub use output::{write_json, write_records, write_text};
