//! CLI command handler: wire Ctrl+C to cancellation, run the checksum, print on success.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::{self, BufWriter};
use std::time::Duration;

use crate::engine::arg_parser::Cli;
use crate::engine::output::write_records;
use crate::pipeline::{CancelToken, Checksummer};
use crate::utils::{clamp_workers, setup_logging};
use crate::{ChecksumOpts, ResultSet};

fn setup_opts(cli: &Cli) -> ChecksumOpts {
    setup_logging(cli.verbose());
    let (workers, clamped) = clamp_workers(cli.jobs);
    if clamped {
        warn!(
            "Requested {} workers exceeds the open file limit; using {}",
            cli.jobs, workers
        );
    }
    ChecksumOpts {
        workers,
        algorithm: cli.algorithm,
        deadline: cli.timeout.map(Duration::from_secs),
    }
}

/// Checksum `cli.dir` and write the sorted records to stdout. Nothing is written unless the
/// whole run succeeds.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli);
    let cancel = CancelToken::new();
    let interrupt = cancel.clone();
    ctrlc::set_handler(move || {
        interrupt.cancel();
    })
    .context("set Ctrl+C handler")?;

    let set = checksum_dir(cli, opts, &cancel)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_records(&mut out, &set, cli.format).context("write results")?;
    Ok(())
}

fn checksum_dir(cli: &Cli, opts: ChecksumOpts, cancel: &CancelToken) -> Result<ResultSet> {
    debug!("Checksumming directory...");
    let checksummer = Checksummer::new(opts)?;
    let set = checksummer
        .run(&cli.dir, cancel)
        .with_context(|| format!("Error checksumming tree {}", cli.dir.display()))?;
    Ok(set)
}
