//! Implementation of the reload command.
//!
//! Validates the configuration first, so a typo is reported here in the
//! operator's terminal instead of silently keeping the kiosk on its old
//! settings, then signals the running instance with SIGUSR2.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::lock;

/// Handle the reload command.
pub fn handle_reload_command() -> Result<()> {
    log_version!();

    // Fail fast with a clear message if the edited config is invalid.
    Config::load().context("refusing to reload: configuration is invalid")?;

    let pid = lock::get_running_pid()
        .context("no running salatr instance found; start the kiosk first")?;

    log_block_start!("Signaling salatr to reload...");

    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid as i32), Signal::SIGUSR2)
        .with_context(|| format!("failed to signal salatr (PID {pid})"))?;

    log_decorated!("Sent reload signal to salatr (PID: {pid})");
    log_indented!("The kiosk will re-read its configuration and timetable");
    log_end!();

    Ok(())
}
