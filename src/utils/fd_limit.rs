//! Cap `--jobs` so the digest workers cannot exhaust the process file-descriptor limit (Unix).

/// Descriptors one digest worker may hold: the file being hashed plus one spare.
pub const FDS_PER_WORKER: usize = 2;

/// Share of the limit given to workers; the rest covers the walker's `WalkConsts::MAX_OPEN_DIRS`
/// directory handles and stdio.
const FD_LIMIT_FRACTION: f64 = 0.8;

/// Returns the soft limit for max open file descriptors, or `None` if unavailable (e.g. Windows).
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    use std::mem::MaybeUninit;
    let mut rlim = MaybeUninit::<libc::rlimit>::uninit();
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, rlim.as_mut_ptr()) } != 0 {
        return None;
    }
    let rlim = unsafe { rlim.assume_init() };
    let cur = rlim.rlim_cur;
    // Unlimited (or too large to matter): never clamp the pool.
    if cur == libc::RLIM_INFINITY || cur > i64::MAX as u64 {
        return None;
    }
    Some(cur)
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// Largest pool whose open files stay within `FD_LIMIT_FRACTION` of the soft limit, and at
/// least one worker. `None` when there is no limit to respect.
pub fn max_workers_by_fd_limit() -> Option<usize> {
    let limit = max_open_fds()?;
    let usable = (limit as f64 * FD_LIMIT_FRACTION) as usize;
    if usable < FDS_PER_WORKER {
        return Some(1);
    }
    Some(usable / FDS_PER_WORKER)
}

/// Clamp the requested `--jobs` value. Returns `(workers, was_clamped)`; the CLI warns when clamped.
pub fn clamp_workers(requested: usize) -> (usize, bool) {
    match max_workers_by_fd_limit() {
        Some(cap) if requested > cap => (cap, true),
        _ => (requested, false),
    }
}
