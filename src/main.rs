//! treesum CLI: print a sorted content digest for every regular file under a directory.

use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use treesum::ChecksumError;
use treesum::engine::{Cli, handle_run};
use treesum::utils::{ExitCodes, report_failure};

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();
    match handle_run(&cli) {
        Ok(()) => {
            log::debug!("Total time: {:?}", start_time.elapsed());
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_failure(&err);
            let code = match err.downcast_ref::<ChecksumError>() {
                Some(ChecksumError::Cancelled) => ExitCodes::INTERRUPTED,
                Some(ChecksumError::TimedOut(_)) => ExitCodes::TIMED_OUT,
                _ => ExitCodes::FAILURE,
            };
            ExitCode::from(code)
        }
    }
}
