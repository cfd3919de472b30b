use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::engine::hashing::HashAlgorithm;
use crate::utils::config::PoolDefaults;

/// Output layout for a successful run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `<digest> <path>` per line, like `md5sum`.
    #[default]
    Text,
    /// JSON array of `{ "path", "digest" }` objects.
    Json,
}

/// Deterministic, parallel content checksums for every regular file in a directory tree.
#[derive(Clone, Parser)]
#[command(name = "treesum")]
#[command(about = "Print a sorted digest for every regular file under DIR.")]
pub struct Cli {
    /// Directory to checksum.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Number of concurrent digest workers.
    #[arg(long, short = 'j', default_value_t = PoolDefaults::WORKERS)]
    pub jobs: usize,

    /// Hash algorithm applied to file content.
    #[arg(long, short = 'a', value_enum, default_value_t = HashAlgorithm::Md5)]
    pub algorithm: HashAlgorithm,

    /// Abort the run if it has not finished after this many seconds.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64))]
    pub timeout: Option<u64>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Verbose output (debug logging on stderr).
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose.unwrap_or(false)
    }
}
