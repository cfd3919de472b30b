//! Application configuration constants.
//! Tuning and thresholds in one place.

// ---- Worker pool ----

/// Worker pool sizing.
pub struct PoolDefaults;

impl PoolDefaults {
    /// Default number of digesting workers.
    pub const WORKERS: usize = 20;
}

// ---- Hashing ----

/// Hashing I/O buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// Chunk size for streaming file content into the hasher (bytes). 64 KiB.
    /// Memory per worker stays bounded by this regardless of file size.
    pub const READ_CHUNK_SIZE: usize = 64 * 1024;
}

// ---- Walk ----

/// Directory traversal limits.
pub struct WalkConsts;

impl WalkConsts {
    /// Max directory handles walkdir keeps open at once while descending.
    pub const MAX_OPEN_DIRS: usize = 10;
}

// ---- Exit codes ----

/// Process exit codes for the CLI.
pub struct ExitCodes;

impl ExitCodes {
    /// Any failure that is not a cancellation.
    pub const FAILURE: u8 = 1;
    /// Run stopped because its deadline passed (same as coreutils `timeout`).
    pub const TIMED_OUT: u8 = 124;
    /// Run stopped by Ctrl+C (128 + SIGINT).
    pub const INTERRUPTED: u8 = 130;
}
