use colored::Colorize;
use env_logger::Builder;
use log::Level;
use std::io::Write;

/// Initialise `env_logger` on stderr. Our crate logs at `Debug` when `verbose`, else `Info`;
/// dependencies stay at `Warn`. `RUST_LOG` still overrides both.
pub fn setup_logging(verbose: bool) {
    use log::LevelFilter;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // walkdir and ctrlc log nothing useful below warn; treesum's walker and workers log at debug.
    let _ = Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .parse_default_env()
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            // Warnings (e.g. a clamped --jobs) name the module; per-thread progress lines stay bare.
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        Level::Error => "ERROR".red(),
                        _ => unreachable!(),
                    };
                    let path = record.target().to_string().white();
                    format!("[{} {} {}] {}", name.cyan(), level_str, path, record.args())
                }
                _ => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}

/// Write the single failure line to stderr, independent of the log filter.
pub fn report_failure(err: &anyhow::Error) {
    eprintln!(
        "[{} {}] {:#}",
        env!("CARGO_PKG_NAME").cyan(),
        "ERROR".red(),
        err
    );
}
