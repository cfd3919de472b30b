pub mod config;
pub mod fd_limit;
pub mod logger;

pub use config::*;
pub use fd_limit::clamp_workers;
pub use logger::{report_failure, setup_logging};
