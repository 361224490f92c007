//! Lock file management for single-instance enforcement.
//!
//! One kiosk per machine: a locked file in the runtime directory holds the
//! PID of the running instance. `salatr reload` reads it to know whom to
//! signal, and a stale file left by a crash is detected and replaced.

use anyhow::{Context, Result, bail};
use fs2::FileExt;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};

/// Path of the lock file in the runtime directory.
pub fn lock_path() -> String {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    format!("{runtime_dir}/salatr.lock")
}

/// Acquire the single-instance lock.
///
/// Returns the held file (the lock lives as long as the file handle) and its
/// path. Fails when another live instance holds the lock.
pub fn acquire_lock() -> Result<(File, String)> {
    let path = lock_path();

    let mut lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .with_context(|| format!("failed to open lock file {path}"))?;

    if lock_file.try_lock_exclusive().is_err() {
        match read_locked_pid(&path) {
            Ok(pid) => bail!(
                "another salatr instance is already running (PID {pid});\n\
                 use 'salatr reload' to signal it, or stop it first"
            ),
            Err(_) => bail!("another salatr instance is already running"),
        }
    }

    // Lock acquired; replace any stale content with our PID.
    lock_file.set_len(0)?;
    lock_file.seek(SeekFrom::Start(0))?;
    writeln!(&lock_file, "{}", std::process::id())?;
    lock_file.flush()?;

    Ok((lock_file, path))
}

/// PID of the running instance, if one is alive.
pub fn get_running_pid() -> Result<u32> {
    let path = lock_path();
    let pid = read_locked_pid(&path)?;

    // A PID from a stale lock file may already be dead.
    let proc_path = format!("/proc/{pid}");
    if !std::path::Path::new(&proc_path).exists() {
        bail!("lock file {path} is stale (PID {pid} is not running)");
    }

    Ok(pid)
}

fn read_locked_pid(path: &str) -> Result<u32> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    contents
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .parse::<u32>()
        .with_context(|| format!("lock file {path} does not contain a PID"))
}
